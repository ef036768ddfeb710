/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

//! Tests for channel identity, subscription state, and the weak client association.

use std::sync::Arc;

use acton_cable::prelude::*;
use serde_json::json;

use crate::setup::*;

mod setup;

#[tokio::test]
async fn test_auto_subscribe_requests_subscription_on_creation() -> anyhow::Result<()> {
    initialize_tracing();
    let client = Arc::new(MockClient::default());
    let options = ChannelOptions {
        auto_subscribe: true,
        ..manual_options(FlushOrder::Fifo)
    };
    let channel = Channel::with_options(
        "ChatChannel",
        Some(room("lobby")),
        weak(&client),
        Arc::new(SerialDispatcher::spawn()),
        options,
    );

    assert_eq!(client.subscribe_requests(), vec![channel.identifier().to_string()]);
    assert!(channel.auto_subscribe());
    Ok(())
}

#[tokio::test]
async fn test_manual_subscribe_and_unsubscribe_delegate_to_client() -> anyhow::Result<()> {
    let fixture = Fixture::new(manual_options(FlushOrder::Fifo));
    assert!(fixture.client.subscribe_requests().is_empty());

    fixture.channel.subscribe();
    fixture.channel.unsubscribe();

    let identifier = fixture.channel.identifier().to_string();
    assert_eq!(fixture.client.subscribe_requests(), vec![identifier.clone()]);
    assert_eq!(fixture.client.unsubscribe_requests(), vec![identifier]);
    Ok(())
}

/// Subscription state always comes from the client, never from a cached flag.
#[tokio::test]
async fn test_is_subscribed_reads_client_state() -> anyhow::Result<()> {
    let fixture = Fixture::new(manual_options(FlushOrder::Fifo));
    let identifier = fixture.channel.identifier().to_string();

    assert!(!fixture.channel.is_subscribed());
    fixture.client.confirm(&identifier);
    assert!(fixture.channel.is_subscribed());
    fixture.client.drop_subscription(&identifier);
    assert!(!fixture.channel.is_subscribed());

    // A confirmation event alone does not make the channel subscribed.
    fixture
        .channel
        .on_message(CableMessage::lifecycle(MessageType::ConfirmSubscription));
    fixture.settle().await;
    assert!(!fixture.channel.is_subscribed());
    Ok(())
}

#[tokio::test]
async fn test_channel_does_not_keep_client_alive() -> anyhow::Result<()> {
    let fixture = Fixture::new(manual_options(FlushOrder::Fifo));
    let Fixture {
        client,
        dispatcher,
        channel,
    } = fixture;
    client.confirm(channel.identifier());
    assert!(channel.is_subscribed());
    assert_eq!(Arc::strong_count(&client), 1);

    drop(client);

    assert!(!channel.is_subscribed());
    assert!(channel.action("speak", Some(room("lobby"))).is_ok());
    channel.subscribe();
    channel.unsubscribe();
    assert!(channel.buffered_actions().await.is_empty());
    dispatcher.settled().await;
    Ok(())
}

#[tokio::test]
async fn test_buffered_actions_are_discarded_once_client_is_gone() -> anyhow::Result<()> {
    let fixture = Fixture::new(manual_options(FlushOrder::Fifo));
    let Fixture {
        client,
        dispatcher: _dispatcher,
        channel,
    } = fixture;
    let _ = channel.action("a", None);
    assert_eq!(channel.buffered_actions().await.len(), 1);

    drop(client);
    channel.on_message(CableMessage::lifecycle(MessageType::ConfirmSubscription));
    assert!(channel.buffered_actions().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_identifier_matches_static_derivation() -> anyhow::Result<()> {
    let fixture = Fixture::new(manual_options(FlushOrder::Fifo));
    assert_eq!(fixture.channel.name(), "ChatChannel");
    assert_eq!(fixture.channel.parameters(), Some(&room("lobby")));
    assert_eq!(
        fixture.channel.identifier(),
        Channel::identifier_for("ChatChannel", Some(&room("lobby")))
    );
    assert_eq!(
        fixture.channel.identifier(),
        r#"{"channel":"ChatChannel","room":"lobby"}"#
    );
    Ok(())
}

#[test]
fn test_set_equal_parameters_give_equal_identifiers() {
    let orders = [
        vec![("room", json!("lobby")), ("user", json!(42)), ("tags", json!(["a", "b"]))],
        vec![("tags", json!(["a", "b"])), ("room", json!("lobby")), ("user", json!(42))],
        vec![("user", json!(42)), ("tags", json!(["a", "b"])), ("room", json!("lobby"))],
    ];
    let identifiers: Vec<String> = orders
        .iter()
        .map(|entries| {
            let params: Parameters = entries
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect();
            identifier_for("ChatChannel", Some(&params))
        })
        .collect();

    assert!(identifiers.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(
        identifiers[0],
        r#"{"channel":"ChatChannel","room":"lobby","tags":["a","b"],"user":42}"#
    );
}

#[test]
fn test_parameters_from_serializable_struct() {
    #[derive(serde::Serialize)]
    struct Subscription {
        room: String,
        user: u32,
    }

    let params = parameters_from(&Subscription {
        room: "lobby".into(),
        user: 42,
    })
    .expect("struct serializes to an object");
    assert_eq!(
        identifier_for("ChatChannel", Some(&params)),
        r#"{"channel":"ChatChannel","room":"lobby","user":42}"#
    );

    let err = parameters_from(&"not an object").expect_err("strings are not parameter maps");
    assert!(matches!(err, ChannelError::MalformedIdentity(_)));
}
