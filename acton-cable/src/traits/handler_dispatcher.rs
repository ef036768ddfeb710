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

use std::fmt::Debug;

use crate::common::HandlerJob;

/// A single-consumer execution context for channel handler callbacks.
///
/// Every handler a [`Channel`](crate::common::Channel) invokes is wrapped in a
/// [`HandlerJob`] and passed to `dispatch`. Implementations must:
///
/// * return without running the job (it runs strictly after the dispatching call returns),
/// * never block the caller,
/// * run jobs one at a time, in the order they were dispatched.
///
/// [`SerialDispatcher`](crate::common::SerialDispatcher) is the stock Tokio-backed
/// implementation; a UI toolkit would implement this over its main-thread queue.
pub trait HandlerDispatcher: Debug + Send + Sync + 'static {
    /// Schedules `job` for later execution.
    fn dispatch(&self, job: HandlerJob);
}
