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

//! The serialized buffer-mutation context of a channel.
//!
//! Each channel owns one worker task that holds its deferred [`Action`]s. Appends,
//! flushes, clears, and snapshots are commands on an MPSC queue, so they execute
//! one at a time in queue order and never interleave.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, trace, warn};

use crate::common::channel::ChannelCore;
use crate::common::config::FlushOrder;
use crate::message::{Action, ChannelError};

#[derive(Debug)]
enum BufferCommand {
    Append(Action),
    Flush,
    Clear,
    Snapshot(oneshot::Sender<Vec<Action>>),
}

/// Sending half of a channel's buffer worker.
///
/// The worker stops once every `ActionBuffer` clone has been dropped.
#[derive(Debug, Clone)]
pub(crate) struct ActionBuffer {
    outbox: mpsc::UnboundedSender<BufferCommand>,
}

impl ActionBuffer {
    /// Starts the worker task on the current Tokio runtime.
    pub(crate) fn spawn(core: Arc<ChannelCore>, order: FlushOrder) -> Self {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let worker = BufferWorker {
            core,
            order,
            actions: VecDeque::new(),
            inbox,
        };
        tokio::spawn(worker.run());
        Self { outbox }
    }

    pub(crate) fn append(&self, action: Action) {
        self.send(BufferCommand::Append(action));
    }

    pub(crate) fn flush(&self) {
        self.send(BufferCommand::Flush);
    }

    pub(crate) fn clear(&self) {
        self.send(BufferCommand::Clear);
    }

    /// Returns the buffered actions in storage order (oldest first), as seen
    /// after every previously queued command has run.
    pub(crate) async fn snapshot(&self) -> Vec<Action> {
        let (reply_to, reply) = oneshot::channel();
        self.send(BufferCommand::Snapshot(reply_to));
        reply.await.unwrap_or_default()
    }

    fn send(&self, command: BufferCommand) {
        if let Err(e) = self.outbox.send(command) {
            warn!(command = ?e.0, "Action buffer worker has stopped, dropping command");
        }
    }
}

struct BufferWorker {
    core: Arc<ChannelCore>,
    order: FlushOrder,
    /// Oldest entry at the front.
    actions: VecDeque<Action>,
    inbox: mpsc::UnboundedReceiver<BufferCommand>,
}

impl BufferWorker {
    async fn run(mut self) {
        trace!(identifier = %self.core.identifier, "Action buffer worker started");
        while let Some(command) = self.inbox.recv().await {
            match command {
                BufferCommand::Append(action) => {
                    debug!(
                        identifier = %self.core.identifier,
                        action = action.name(),
                        buffered = self.actions.len() + 1,
                        "Buffering action until subscription is confirmed"
                    );
                    self.actions.push_back(action);
                }
                BufferCommand::Flush => self.flush(),
                BufferCommand::Clear => {
                    trace!(identifier = %self.core.identifier, dropped = self.actions.len(), "Clearing action buffer");
                    self.actions.clear();
                }
                BufferCommand::Snapshot(reply_to) => {
                    let _ = reply_to.send(self.actions.iter().cloned().collect());
                }
            }
        }
        trace!(identifier = %self.core.identifier, "Action buffer worker stopped");
    }

    /// Replays buffered actions through the client.
    ///
    /// Runs as a single pass: the first not-subscribed answer (with buffering
    /// still enabled) puts that action and all untried ones back, in their
    /// issue order, and ends the pass.
    #[instrument(skip(self), fields(identifier = %self.core.identifier, order = ?self.order))]
    fn flush(&mut self) {
        if self.actions.is_empty() {
            trace!("Nothing buffered to flush");
            return;
        }

        let pending: Vec<Action> = match self.order {
            FlushOrder::Fifo => self.actions.drain(..).collect(),
            FlushOrder::Lifo => self.actions.drain(..).rev().collect(),
        };
        let total = pending.len();
        let mut pending = pending.into_iter();
        let mut sent = 0usize;
        let mut retained = Vec::new();

        while let Some(action) = pending.next() {
            match self.core.transmit(action.name(), action.params()) {
                Ok(()) => sent += 1,
                Err(ChannelError::NotSubscribed) if self.core.buffers_actions() => {
                    debug!(action = action.name(), "Subscription lost during flush, re-buffering");
                    retained.push(action);
                    retained.extend(pending.by_ref());
                    break;
                }
                Err(ChannelError::NotSubscribed) => {
                    debug!(action = action.name(), "Not subscribed and buffering disabled, dropping action");
                }
                Err(e) => {
                    warn!(action = action.name(), error = %e, "Failed to replay buffered action");
                }
            }
        }

        // Put retained actions back in storage order.
        match self.order {
            FlushOrder::Fifo => self.actions.extend(retained),
            FlushOrder::Lifo => {
                for action in retained {
                    self.actions.push_front(action);
                }
            }
        }

        debug!(total, sent, remaining = self.actions.len(), "Flushed action buffer");
    }
}
