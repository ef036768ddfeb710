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

use std::sync::Arc;

use serde_json::Value;

/// Flat mapping of JSON values describing a channel's parameters or an action's payload.
///
/// Keys are kept in lexicographic order, which is what makes channel identifiers canonical.
pub type Parameters = serde_json::Map<String, Value>;

/// Handler receiving the `data` and `error` of an inbound `message` event.
pub type ReceiveHandler = Arc<dyn Fn(Option<Value>, Option<String>) + Send + Sync + 'static>;

/// Handler for subscription lifecycle events (subscribed, unsubscribed, rejected).
pub type LifecycleHandler = Arc<dyn Fn() + Send + Sync + 'static>;

/// A unit of work scheduled onto a [`HandlerDispatcher`](crate::traits::HandlerDispatcher).
pub type HandlerJob = Box<dyn FnOnce() + Send + 'static>;
