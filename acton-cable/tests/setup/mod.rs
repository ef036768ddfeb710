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
#![allow(dead_code)]

use std::sync::Once;

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod client;

pub use client::MockClient;

use std::sync::{Arc, Weak};

use acton_cable::prelude::*;
use serde_json::json;

// Ensures tracing initialization happens only once across all tests.
static INIT: Once = Once::new();

/// Initializes the global tracing subscriber for tests.
///
/// Logs go to `logs/cable_tests.txt` so test output stays readable.
pub fn initialize_tracing() {
    INIT.call_once(|| {
        std::fs::create_dir_all("logs").expect("could not create logs dir");

        let file_appender = RollingFileAppender::new(Rotation::NEVER, "logs", "cable_tests.txt");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Leak the guard so the non-blocking writer is not dropped before process exit
        Box::leak(Box::new(guard));

        let filter = EnvFilter::new("trace")
            .add_directive("acton_cable::common::action_buffer=trace".parse().unwrap())
            .add_directive("acton_cable::common::channel=trace".parse().unwrap())
            .add_directive("acton_cable::common::serial_dispatcher=trace".parse().unwrap())
            .add_directive("tokio=info".parse().unwrap());

        let subscriber = FmtSubscriber::builder()
            .with_span_events(FmtSpan::NONE)
            .with_max_level(Level::TRACE)
            .compact()
            .with_line_number(true)
            .without_time()
            .with_target(true)
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    });
}

/// Options with auto-subscribe off, so tests decide when subscription happens.
pub fn manual_options(flush_order: FlushOrder) -> ChannelOptions {
    ChannelOptions {
        auto_subscribe: false,
        buffer_actions: true,
        flush_order,
    }
}

/// A chat-room parameter map.
pub fn room(name: &str) -> Parameters {
    let mut params = Parameters::new();
    params.insert("room".to_string(), json!(name));
    params
}

/// Downgrades a concrete client to the weak trait object channels hold.
pub fn weak(client: &Arc<MockClient>) -> Weak<dyn CableClient> {
    let weak: Weak<MockClient> = Arc::downgrade(client);
    weak
}

/// Everything a channel test needs.
pub struct Fixture {
    pub client: Arc<MockClient>,
    pub dispatcher: SerialDispatcher,
    pub channel: Channel,
}

impl Fixture {
    /// A "ChatChannel" for room `lobby` with the given options.
    pub fn new(options: ChannelOptions) -> Self {
        initialize_tracing();
        let client = Arc::new(MockClient::default());
        let dispatcher = SerialDispatcher::spawn();
        let channel = Channel::with_options(
            "ChatChannel",
            Some(room("lobby")),
            weak(&client),
            Arc::new(dispatcher.clone()),
            options,
        );
        Self {
            client,
            dispatcher,
            channel,
        }
    }

    /// Marks the channel live on the client and delivers the confirmation.
    pub fn confirm(&self) {
        self.client.confirm(self.channel.identifier());
        self.channel
            .on_message(CableMessage::lifecycle(MessageType::ConfirmSubscription));
    }

    /// Waits until the buffer worker and the dispatcher have processed everything queued so far.
    pub async fn settle(&self) {
        let _ = self.channel.buffered_actions().await;
        self.dispatcher.settled().await;
    }

    /// Names of the buffered actions, oldest first.
    pub async fn buffered_names(&self) -> Vec<String> {
        self.channel
            .buffered_actions()
            .await
            .iter()
            .map(|action| action.name().to_string())
            .collect()
    }
}
