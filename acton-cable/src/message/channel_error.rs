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

use std::fmt;

/// Errors surfaced by channel operations and by [`CableClient::transmit`](crate::traits::CableClient::transmit).
///
/// The channel never inspects or rewrites a [`ChannelError::Transport`] value;
/// it is handed back to the caller of [`Channel::action`](crate::common::Channel::action)
/// exactly as the client produced it.
#[derive(Debug)]
pub enum ChannelError {
    /// The channel is not currently subscribed, so the action could not be sent.
    ///
    /// When action buffering is enabled this also means the action was queued
    /// and will be replayed on the next subscription confirmation.
    NotSubscribed,

    /// Any other failure reported by the client's transport.
    Transport(anyhow::Error),

    /// Channel parameters could not be represented as a JSON object.
    ///
    /// Raised while building [`Parameters`](crate::common::Parameters) from a
    /// caller-supplied value, before any identifier exists.
    MalformedIdentity(String),
}

impl ChannelError {
    /// Returns `true` for the [`ChannelError::NotSubscribed`] variant.
    #[inline]
    #[must_use]
    pub const fn is_not_subscribed(&self) -> bool {
        matches!(self, Self::NotSubscribed)
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSubscribed => write!(f, "channel is not subscribed"),
            Self::Transport(err) => write!(f, "transport error: {err}"),
            Self::MalformedIdentity(msg) => write!(f, "malformed channel identity: {msg}"),
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ChannelError {
    fn from(err: anyhow::Error) -> Self {
        Self::Transport(err)
    }
}
