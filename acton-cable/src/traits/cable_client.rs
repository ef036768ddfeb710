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

use crate::common::Parameters;
use crate::message::ChannelError;

/// The connection-owning side a [`Channel`](crate::common::Channel) talks to.
///
/// A `CableClient` owns the transport and the set of live subscriptions. Channels
/// hold it only through a `Weak` reference, so every method here may be skipped
/// entirely once the client is dropped.
///
/// All methods are synchronous and are expected to hand work off to the
/// transport without blocking on I/O. They may be called from the channel's
/// buffer worker task as well as from the caller's own context.
pub trait CableClient: Send + Sync + 'static {
    /// Returns `true` if `identifier` is currently an active subscription.
    ///
    /// This is the single source of truth for a channel's subscription state.
    fn subscribed(&self, identifier: &str) -> bool;

    /// Requests a subscription for the channel with the given identifier.
    fn subscribe(&self, identifier: &str);

    /// Requests removal of the subscription with the given identifier.
    fn unsubscribe(&self, identifier: &str);

    /// Sends `action` with optional `data` on the channel `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::NotSubscribed`] when the channel is not live, or
    /// [`ChannelError::Transport`] for any other failure.
    fn transmit(
        &self,
        identifier: &str,
        action: &str,
        data: Option<&Parameters>,
    ) -> Result<(), ChannelError>;
}
