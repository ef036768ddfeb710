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

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::task::TaskTracker;
use tracing::{error, instrument, trace, warn};

use crate::common::HandlerJob;
use crate::traits::HandlerDispatcher;

enum DispatchItem {
    Run(HandlerJob),
    Barrier(oneshot::Sender<()>),
}

/// A Tokio-backed [`HandlerDispatcher`] that runs jobs one at a time, in order.
///
/// All jobs run on a single worker task, so handlers of every channel sharing a
/// `SerialDispatcher` never observe each other concurrently. A panicking handler
/// is logged and the worker moves on to the next job.
///
/// Clones share the same worker.
#[derive(Debug, Clone)]
pub struct SerialDispatcher {
    outbox: mpsc::UnboundedSender<DispatchItem>,
    tracker: TaskTracker,
    panics: Arc<AtomicUsize>,
}

impl SerialDispatcher {
    /// Starts the dispatcher worker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn() -> Self {
        let (outbox, mut inbox) = mpsc::unbounded_channel::<DispatchItem>();
        let tracker = TaskTracker::new();
        let panics = Arc::new(AtomicUsize::new(0));
        let panic_count = panics.clone();

        tracker.spawn(async move {
            trace!("Handler dispatcher started");
            while let Some(item) = inbox.recv().await {
                match item {
                    DispatchItem::Run(job) => {
                        if catch_unwind(AssertUnwindSafe(job)).is_err() {
                            panic_count.fetch_add(1, Ordering::Relaxed);
                            error!("Channel handler panicked; continuing with the next handler");
                        }
                    }
                    DispatchItem::Barrier(reply_to) => {
                        let _ = reply_to.send(());
                    }
                }
            }
            trace!("Handler dispatcher stopped");
        });
        tracker.close();

        Self {
            outbox,
            tracker,
            panics,
        }
    }

    /// Resolves once every job dispatched before this call has finished running.
    pub async fn settled(&self) {
        let (reply_to, reply) = oneshot::channel();
        if self.outbox.send(DispatchItem::Barrier(reply_to)).is_ok() {
            let _ = reply.await;
        }
    }

    /// Number of handler jobs that panicked so far.
    #[must_use]
    pub fn panicked_jobs(&self) -> usize {
        self.panics.load(Ordering::Relaxed)
    }

    /// Stops accepting jobs and waits for already queued ones to finish.
    ///
    /// The worker exits once this and every other clone has been dropped.
    #[instrument(skip(self))]
    pub async fn shutdown(self) {
        let tracker = self.tracker.clone();
        drop(self);
        tracker.wait().await;
        trace!("Handler dispatcher drained");
    }
}

impl HandlerDispatcher for SerialDispatcher {
    fn dispatch(&self, job: HandlerJob) {
        if self.outbox.send(DispatchItem::Run(job)).is_err() {
            warn!("Handler dispatcher has stopped, dropping handler invocation");
        }
    }
}
