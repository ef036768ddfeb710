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

// --- Public Re-exports ---
pub use channel::{BoundAction, Channel, ChannelOptions};
pub use config::{CableConfig, FlushOrder};
pub use identifier::{identifier_for, parameters_from};
pub use serial_dispatcher::SerialDispatcher;
pub use types::*;

// --- Submodules ---

/// Common type aliases.
mod types;

/// The `Channel` handle and its options.
mod channel;
/// Serialized buffer worker for deferred actions.
mod action_buffer;
/// Handler slots.
mod handlers;
/// Identifier derivation.
mod identifier;
/// Default handler dispatcher.
mod serial_dispatcher;
/// Configuration loading.
pub mod config;
