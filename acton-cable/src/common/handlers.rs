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

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::common::{LifecycleHandler, ReceiveHandler};

/// Handler slots for one channel.
///
/// Every slot can be replaced at any time from any thread. Readers take a clone
/// of the current `Arc`, so a handler swapped out mid-dispatch still finishes.
#[derive(Default)]
pub(crate) struct Handlers {
    pub(crate) received: RwLock<Option<ReceiveHandler>>,
    /// Keyed by action name.
    pub(crate) actions: DashMap<String, ReceiveHandler>,
    pub(crate) subscribed: RwLock<Option<LifecycleHandler>>,
    pub(crate) unsubscribed: RwLock<Option<LifecycleHandler>>,
    pub(crate) rejected: RwLock<Option<LifecycleHandler>>,
}

impl Handlers {
    pub(crate) fn received(&self) -> Option<ReceiveHandler> {
        self.received.read().clone()
    }

    pub(crate) fn for_action(&self, action_name: &str) -> Option<ReceiveHandler> {
        self.actions.get(action_name).map(|entry| entry.value().clone())
    }

    pub(crate) fn subscribed(&self) -> Option<LifecycleHandler> {
        self.subscribed.read().clone()
    }

    pub(crate) fn unsubscribed(&self) -> Option<LifecycleHandler> {
        self.unsubscribed.read().clone()
    }

    pub(crate) fn rejected(&self) -> Option<LifecycleHandler> {
        self.rejected.read().clone()
    }

    pub(crate) fn clear(&self) {
        *self.received.write() = None;
        self.actions.clear();
        *self.subscribed.write() = None;
        *self.unsubscribed.write() = None;
        *self.rejected.write() = None;
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        [
            self.received.read().is_some(),
            self.subscribed.read().is_some(),
            self.unsubscribed.read().is_some(),
            self.rejected.read().is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
            + self.actions.len()
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("received", &self.received.read().is_some())
            .field("actions", &self.actions.len())
            .field("subscribed", &self.subscribed.read().is_some())
            .field("unsubscribed", &self.unsubscribed.read().is_some())
            .field("rejected", &self.rejected.read().is_some())
            .finish()
    }
}
