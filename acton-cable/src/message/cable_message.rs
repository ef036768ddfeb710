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

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of an inbound protocol event delivered to a channel.
///
/// Deserializes from the snake-case wire names (`confirm_subscription`, ...);
/// any name this crate does not act on becomes [`MessageType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// A broadcast or action reply carrying `data`.
    Message,
    /// The server accepted the subscription.
    ConfirmSubscription,
    /// The server refused the subscription.
    RejectSubscription,
    /// The subscription was suspended by the server.
    HibernateSubscription,
    /// The subscription was cancelled.
    CancelSubscription,
    /// Anything else (welcome, ping, disconnect...). Ignored by channels.
    #[serde(other)]
    Other,
}

impl MessageType {
    /// Maps a wire type name to a `MessageType`.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "message" => Self::Message,
            "confirm_subscription" => Self::ConfirmSubscription,
            "reject_subscription" => Self::RejectSubscription,
            "hibernate_subscription" => Self::HibernateSubscription,
            "cancel_subscription" => Self::CancelSubscription,
            _ => Self::Other,
        }
    }
}

/// A decoded inbound event addressed to one channel.
///
/// Produced by the frame decoder and routed to [`Channel::on_message`](crate::common::Channel::on_message)
/// by whichever registry owns the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableMessage {
    /// What kind of event this is.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// The action name the payload answers, when the server tagged one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    /// Opaque payload forwarded verbatim to receive handlers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error description forwarded verbatim to receive handlers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CableMessage {
    /// A `message` event carrying `data`.
    pub fn message(data: Value) -> Self {
        Self {
            message_type: MessageType::Message,
            action_name: None,
            data: Some(data),
            error: None,
        }
    }

    /// A payload-free event such as a subscription confirmation.
    pub fn lifecycle(message_type: MessageType) -> Self {
        Self {
            message_type,
            action_name: None,
            data: None,
            error: None,
        }
    }

    /// Tags the event with the action it answers.
    #[must_use]
    pub fn with_action(mut self, action_name: impl Into<String>) -> Self {
        self.action_name = Some(action_name.into());
        self
    }

    /// Attaches an error description.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
