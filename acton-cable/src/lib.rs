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

#![forbid(unsafe_code)]
#![forbid(missing_docs)]

//! # Acton Cable
//!
//! Client-side channels for ActionCable-style pub/sub servers. A [`Channel`](prelude::Channel)
//! represents one subscription to a named, parameterized server topic over a
//! connection owned by a [`CableClient`](prelude::CableClient).
//!
//! ## Key Concepts
//!
//! - **Identifier**: the canonical JSON string `parameters ∪ {"channel": name}`
//!   with sorted keys, used to match a local channel with the server's
//!   subscription acknowledgement.
//! - **Subscription state**: never stored locally. `Channel::is_subscribed` asks
//!   the client every time.
//! - **Action buffering**: actions sent while not subscribed are queued on a
//!   per-channel serialized worker and replayed (oldest first by default) when
//!   the subscription is confirmed.
//! - **Handler dispatch**: inbound events become handler jobs on an injected
//!   [`HandlerDispatcher`](prelude::HandlerDispatcher), so handlers never run
//!   concurrently with each other or inside the inbound frame path.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use acton_cable::prelude::*;
//!
//! let dispatcher = Arc::new(SerialDispatcher::spawn());
//! let client: Arc<MyClient> = connect().await?;
//! let chat = Channel::new("ChatChannel", Some(params), Arc::downgrade(&client) as _, dispatcher);
//! chat.on_action("speak", |data, _error| println!("{data:?}"));
//! chat.action("speak", Some(body))?;
//! ```

/// Channel, identifier, dispatcher, and configuration.
pub(crate) mod common;

/// Message types and errors.
pub(crate) mod message;

/// Capabilities a channel consumes.
pub(crate) mod traits;

/// Configuration for Acton Cable.
pub mod config {
    pub use crate::common::config::{CableConfig, ChannelDefaults, FlushOrder, CONFIG};
}

/// A prelude module for conveniently importing the most commonly used items.
///
/// ## Core Types
/// *   [`crate::common::Channel`]: Client-side handle for one subscription.
/// *   [`crate::common::ChannelOptions`]: Policy flags for a new channel.
/// *   [`crate::common::BoundAction`]: An action name bound to a channel.
/// *   [`crate::common::SerialDispatcher`]: Default single-consumer handler dispatcher.
/// *   [`crate::message::Action`]: A deferred outbound call.
/// *   [`crate::message::CableMessage`]: A decoded inbound event.
/// *   [`crate::message::MessageType`]: Kind of inbound event.
/// *   [`crate::message::ChannelError`]: Errors from channel operations.
/// *   [`crate::traits::CableClient`]: The connection-owning client capability.
/// *   [`crate::traits::HandlerDispatcher`]: The handler execution capability.
pub mod prelude {
    pub use serde_json::Value;

    pub use crate::common::{
        identifier_for, parameters_from, BoundAction, CableConfig, Channel, ChannelOptions,
        FlushOrder, HandlerJob, LifecycleHandler, Parameters, ReceiveHandler, SerialDispatcher,
    };
    pub use crate::message::{Action, CableMessage, ChannelError, MessageType};
    pub use crate::traits::{CableClient, HandlerDispatcher};
}
