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

//! Canonical channel identifiers.
//!
//! The identifier is the JSON object `parameters ∪ {"channel": name}` rendered
//! compactly. `serde_json::Map` keeps keys sorted, so two parameter maps with the
//! same entries always yield the same string regardless of insertion order.

use serde::Serialize;
use serde_json::Value;

use crate::common::Parameters;
use crate::message::ChannelError;

/// Key under which the channel name is stored in the identifier.
pub const CHANNEL_KEY: &str = "channel";

/// Derives the identifier for a channel named `name` with optional `parameters`.
///
/// A `"channel"` entry in `parameters` is overwritten by `name`.
pub fn identifier_for(name: &str, parameters: Option<&Parameters>) -> String {
    let mut identity = parameters.cloned().unwrap_or_default();
    identity.insert(CHANNEL_KEY.to_string(), Value::String(name.to_string()));
    Value::Object(identity).to_string()
}

/// Converts any serializable value into channel [`Parameters`].
///
/// # Errors
///
/// Returns [`ChannelError::MalformedIdentity`] if `value` fails to serialize or
/// does not serialize to a JSON object.
pub fn parameters_from<T: Serialize + ?Sized>(value: &T) -> Result<Parameters, ChannelError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ChannelError::MalformedIdentity(format!(
            "parameters must be a JSON object, got {other}"
        ))),
        Err(e) => Err(ChannelError::MalformedIdentity(e.to_string())),
    }
}
