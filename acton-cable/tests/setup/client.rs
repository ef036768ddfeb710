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

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use acton_cable::prelude::*;
use parking_lot::Mutex;

/// One call to `transmit`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transmit {
    pub identifier: String,
    pub action: String,
    pub data: Option<Parameters>,
}

/// An in-memory client that records every call and lets tests flip subscription state.
#[derive(Debug, Default)]
pub struct MockClient {
    live: Mutex<HashSet<String>>,
    attempts: Mutex<Vec<Transmit>>,
    delivered: Mutex<Vec<Transmit>>,
    subscribe_requests: Mutex<Vec<String>>,
    unsubscribe_requests: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockClient {
    /// Marks `identifier` as an active subscription.
    pub fn confirm(&self, identifier: &str) {
        self.live.lock().insert(identifier.to_string());
    }

    /// Marks `identifier` as no longer subscribed.
    pub fn drop_subscription(&self, identifier: &str) {
        self.live.lock().remove(identifier);
    }

    /// Makes every subsequent `transmit` fail with a transport error.
    pub fn fail_transport(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Action names of every `transmit` call, successful or not.
    pub fn attempted(&self) -> Vec<String> {
        self.attempts.lock().iter().map(|t| t.action.clone()).collect()
    }

    /// Action names that were handed to the transport.
    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().iter().map(|t| t.action.clone()).collect()
    }

    /// Full records of delivered transmits.
    pub fn delivered_transmits(&self) -> Vec<Transmit> {
        self.delivered.lock().clone()
    }

    pub fn subscribe_requests(&self) -> Vec<String> {
        self.subscribe_requests.lock().clone()
    }

    pub fn unsubscribe_requests(&self) -> Vec<String> {
        self.unsubscribe_requests.lock().clone()
    }
}

impl CableClient for MockClient {
    fn subscribed(&self, identifier: &str) -> bool {
        self.live.lock().contains(identifier)
    }

    fn subscribe(&self, identifier: &str) {
        self.subscribe_requests.lock().push(identifier.to_string());
    }

    fn unsubscribe(&self, identifier: &str) {
        self.unsubscribe_requests.lock().push(identifier.to_string());
        self.live.lock().remove(identifier);
    }

    fn transmit(
        &self,
        identifier: &str,
        action: &str,
        data: Option<&Parameters>,
    ) -> Result<(), ChannelError> {
        let record = Transmit {
            identifier: identifier.to_string(),
            action: action.to_string(),
            data: data.cloned(),
        };
        self.attempts.lock().push(record.clone());

        if self.failing.load(Ordering::SeqCst) {
            return Err(ChannelError::Transport(anyhow::anyhow!("connection reset")));
        }
        if !self.subscribed(identifier) {
            return Err(ChannelError::NotSubscribed);
        }
        self.delivered.lock().push(record);
        Ok(())
    }
}
