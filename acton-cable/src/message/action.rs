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

use derive_new::new;
use static_assertions::assert_impl_all;

use crate::common::Parameters;

/// An outbound call that could not be sent because the channel was not subscribed.
///
/// Actions are only created when a send has to be deferred. They sit in the
/// channel's buffer until the next subscription confirmation replays them.
#[derive(new, Clone, Debug, PartialEq, Eq)]
pub struct Action {
    name: String,
    params: Option<Parameters>,
}

assert_impl_all!(Action: Send, Sync);

impl Action {
    /// The action name the server-side channel will perform.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload sent alongside the action, if any.
    #[inline]
    pub fn params(&self) -> Option<&Parameters> {
        self.params.as_ref()
    }
}
