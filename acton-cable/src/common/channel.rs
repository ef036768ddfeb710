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
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use serde_json::Value;
use static_assertions::assert_impl_all;
use tracing::{instrument, trace};

use crate::common::action_buffer::ActionBuffer;
use crate::common::config::{ChannelDefaults, FlushOrder, CONFIG};
use crate::common::handlers::Handlers;
use crate::common::identifier;
use crate::common::{LifecycleHandler, Parameters, ReceiveHandler};
use crate::message::{Action, CableMessage, ChannelError, MessageType};
use crate::traits::{CableClient, HandlerDispatcher};

/// Policy flags for a new [`Channel`].
///
/// `Default` takes its values from the `[channel]` section of the global
/// [`CONFIG`](crate::common::config::CONFIG).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOptions {
    /// Call [`Channel::subscribe`] during construction.
    pub auto_subscribe: bool,
    /// Buffer actions sent while not subscribed.
    pub buffer_actions: bool,
    /// Replay order for buffered actions.
    pub flush_order: FlushOrder,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self::from(&CONFIG.channel)
    }
}

impl From<&ChannelDefaults> for ChannelOptions {
    fn from(defaults: &ChannelDefaults) -> Self {
        Self {
            auto_subscribe: defaults.auto_subscribe,
            buffer_actions: defaults.buffer_actions,
            flush_order: defaults.flush_order,
        }
    }
}

/// State shared between a channel's handles and its buffer worker.
pub(crate) struct ChannelCore {
    pub(crate) name: String,
    pub(crate) parameters: Option<Parameters>,
    pub(crate) identifier: String,
    client: Weak<dyn CableClient>,
    auto_subscribe: AtomicBool,
    buffer_actions: AtomicBool,
}

impl ChannelCore {
    pub(crate) fn client(&self) -> Option<Arc<dyn CableClient>> {
        self.client.upgrade()
    }

    pub(crate) fn buffers_actions(&self) -> bool {
        self.buffer_actions.load(Ordering::Acquire)
    }

    /// Hands one action to the client. Succeeds without sending when the client is gone.
    pub(crate) fn transmit(&self, action: &str, data: Option<&Parameters>) -> Result<(), ChannelError> {
        let Some(client) = self.client() else {
            trace!(identifier = %self.identifier, action, "Client is gone, skipping transmit");
            return Ok(());
        };
        client.transmit(&self.identifier, action, data)
    }
}

/// Client-side handle for one subscription to a server-side pub/sub channel.
///
/// A `Channel` knows its name, parameters, and the canonical identifier derived
/// from them. It sends actions through its [`CableClient`], buffers actions
/// issued while the subscription is not live, and turns inbound protocol events
/// ([`CableMessage`]) into handler invocations on its [`HandlerDispatcher`].
///
/// Channels are created by the client or registry that owns the connection and
/// are cheap to clone; every clone refers to the same channel. Equality and
/// hashing use the identifier only.
///
/// Construction spawns the channel's buffer worker, so it must happen inside a
/// Tokio runtime.
#[derive(Clone)]
pub struct Channel {
    core: Arc<ChannelCore>,
    handlers: Arc<Handlers>,
    buffer: ActionBuffer,
    dispatcher: Arc<dyn HandlerDispatcher>,
}

assert_impl_all!(Channel: Send, Sync, Clone);

impl Channel {
    /// Creates a channel using the configured default options.
    pub fn new(
        name: impl Into<String>,
        parameters: Option<Parameters>,
        client: Weak<dyn CableClient>,
        dispatcher: Arc<dyn HandlerDispatcher>,
    ) -> Self {
        Self::with_options(name, parameters, client, dispatcher, ChannelOptions::default())
    }

    /// Creates a channel with explicit options.
    ///
    /// Subscribes immediately when `options.auto_subscribe` is set.
    pub fn with_options(
        name: impl Into<String>,
        parameters: Option<Parameters>,
        client: Weak<dyn CableClient>,
        dispatcher: Arc<dyn HandlerDispatcher>,
        options: ChannelOptions,
    ) -> Self {
        let name = name.into();
        let identifier = identifier::identifier_for(&name, parameters.as_ref());
        let core = Arc::new(ChannelCore {
            name,
            parameters,
            identifier,
            client,
            auto_subscribe: AtomicBool::new(options.auto_subscribe),
            buffer_actions: AtomicBool::new(options.buffer_actions),
        });
        let buffer = ActionBuffer::spawn(core.clone(), options.flush_order);
        let channel = Self {
            core,
            handlers: Arc::new(Handlers::default()),
            buffer,
            dispatcher,
        };
        trace!(identifier = %channel.core.identifier, ?options, "Created channel");

        if options.auto_subscribe {
            channel.subscribe();
        }
        channel
    }

    /// Derives the identifier a channel named `name` with `parameters` would have.
    ///
    /// Pure; lets a registry correlate server acknowledgements before a channel exists.
    pub fn identifier_for(name: &str, parameters: Option<&Parameters>) -> String {
        identifier::identifier_for(name, parameters)
    }

    /// The channel (topic) name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// The identity-affecting parameters.
    #[inline]
    pub fn parameters(&self) -> Option<&Parameters> {
        self.core.parameters.as_ref()
    }

    /// The canonical identifier, fixed at construction.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.core.identifier
    }

    /// Whether the owner should (re)subscribe this channel automatically.
    pub fn auto_subscribe(&self) -> bool {
        self.core.auto_subscribe.load(Ordering::Acquire)
    }

    /// Updates the auto-subscribe policy.
    pub fn set_auto_subscribe(&self, enabled: bool) {
        self.core.auto_subscribe.store(enabled, Ordering::Release);
    }

    /// Whether actions sent while not subscribed are buffered.
    pub fn buffers_actions(&self) -> bool {
        self.core.buffers_actions()
    }

    /// Updates the buffering policy. Takes effect for the next send or flush.
    pub fn set_buffer_actions(&self, enabled: bool) {
        self.core.buffer_actions.store(enabled, Ordering::Release);
    }

    /// Asks the client whether this channel's subscription is live.
    ///
    /// Returns `false` once the client is gone.
    pub fn is_subscribed(&self) -> bool {
        self.core
            .client()
            .is_some_and(|client| client.subscribed(&self.core.identifier))
    }

    /// Sends `name` with optional `params` to the server-side channel.
    ///
    /// Without a client this is a successful no-op. When the client answers
    /// [`ChannelError::NotSubscribed`] and buffering is enabled, the action is
    /// queued for replay on the next subscription confirmation and the error is
    /// still returned, so the caller knows the send was deferred.
    ///
    /// `Ok(())` means the action was handed to the transport, not that the
    /// server processed it.
    ///
    /// # Errors
    ///
    /// Returns whatever error the client reported, unchanged.
    #[instrument(skip(self, params), fields(identifier = %self.core.identifier))]
    pub fn action(&self, name: &str, params: Option<Parameters>) -> Result<(), ChannelError> {
        match self.core.transmit(name, params.as_ref()) {
            Err(ChannelError::NotSubscribed) if self.core.buffers_actions() => {
                self.buffer.append(Action::new(name.to_string(), params));
                Err(ChannelError::NotSubscribed)
            }
            result => result,
        }
    }

    /// Binds an action name so it can be sent repeatedly with different payloads.
    pub fn bind_action(&self, name: impl Into<String>) -> BoundAction<'_> {
        BoundAction {
            channel: self,
            name: name.into(),
        }
    }

    /// Requests a subscription through the client. No-op without a client.
    #[instrument(skip(self), fields(identifier = %self.core.identifier))]
    pub fn subscribe(&self) {
        if let Some(client) = self.core.client() {
            client.subscribe(&self.core.identifier);
        } else {
            trace!("Client is gone, not subscribing");
        }
    }

    /// Requests unsubscription through the client. No-op without a client.
    ///
    /// Registered handlers stay in place; jobs already queued on the dispatcher
    /// still run.
    #[instrument(skip(self), fields(identifier = %self.core.identifier))]
    pub fn unsubscribe(&self) {
        if let Some(client) = self.core.client() {
            client.unsubscribe(&self.core.identifier);
        } else {
            trace!("Client is gone, not unsubscribing");
        }
    }

    /// Sets the handler for every inbound `message` event.
    pub fn on_receive<F>(&self, handler: F)
    where
        F: Fn(Option<Value>, Option<String>) + Send + Sync + 'static,
    {
        *self.handlers.received.write() = Some(Arc::new(handler));
    }

    /// Sets the handler for inbound `message` events tagged with `action_name`.
    ///
    /// Runs in addition to the [`on_receive`](Self::on_receive) handler.
    pub fn on_action<F>(&self, action_name: impl Into<String>, handler: F)
    where
        F: Fn(Option<Value>, Option<String>) + Send + Sync + 'static,
    {
        let handler: ReceiveHandler = Arc::new(handler);
        self.handlers.actions.insert(action_name.into(), handler);
    }

    /// Removes the handler registered for `action_name`, if any.
    pub fn remove_action_handler(&self, action_name: &str) {
        self.handlers.actions.remove(action_name);
    }

    /// Sets the handler run on every subscription confirmation.
    pub fn on_subscribed<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.handlers.subscribed.write() = Some(Arc::new(handler));
    }

    /// Sets the handler run when the subscription is hibernated or cancelled.
    pub fn on_unsubscribed<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.handlers.unsubscribed.write() = Some(Arc::new(handler));
    }

    /// Sets the handler run when the server rejects the subscription.
    pub fn on_rejected<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.handlers.rejected.write() = Some(Arc::new(handler));
    }

    /// Drops every registered handler.
    pub fn clear_handlers(&self) {
        self.handlers.clear();
    }

    /// Delivers an inbound protocol event to this channel.
    ///
    /// Handlers are looked up now and scheduled on the dispatcher; this call
    /// never waits for them. A subscription confirmation also schedules a flush
    /// of the action buffer.
    #[instrument(skip(self, message), fields(identifier = %self.core.identifier, message_type = ?message.message_type))]
    pub fn on_message(&self, message: CableMessage) {
        match message.message_type {
            MessageType::Message => {
                let CableMessage {
                    action_name,
                    data,
                    error,
                    ..
                } = message;
                if let Some(handler) = self.handlers.received() {
                    self.schedule_receive(handler, data.clone(), error.clone());
                }
                if let Some(handler) = action_name
                    .as_deref()
                    .and_then(|name| self.handlers.for_action(name))
                {
                    self.schedule_receive(handler, data, error);
                }
            }
            MessageType::ConfirmSubscription => {
                self.schedule_lifecycle(self.handlers.subscribed());
                self.buffer.flush();
            }
            MessageType::RejectSubscription => {
                self.schedule_lifecycle(self.handlers.rejected());
            }
            MessageType::HibernateSubscription | MessageType::CancelSubscription => {
                self.schedule_lifecycle(self.handlers.unsubscribed());
            }
            MessageType::Other => {
                trace!("Ignoring message");
            }
        }
    }

    /// Returns the buffered actions, oldest first.
    ///
    /// The snapshot is taken after every append or flush queued before this call.
    pub async fn buffered_actions(&self) -> Vec<Action> {
        self.buffer.snapshot().await
    }

    /// Discards all buffered actions.
    pub fn clear_buffer(&self) {
        self.buffer.clear();
    }

    fn schedule_receive(&self, handler: ReceiveHandler, data: Option<Value>, error: Option<String>) {
        self.dispatcher.dispatch(Box::new(move || handler(data, error)));
    }

    fn schedule_lifecycle(&self, handler: Option<LifecycleHandler>) {
        match handler {
            Some(handler) => self.dispatcher.dispatch(Box::new(move || handler())),
            None => trace!("No handler registered"),
        }
    }
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.core.identifier == other.core.identifier
    }
}

impl Eq for Channel {}

impl Hash for Channel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.identifier.hash(state);
    }
}

impl Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("identifier", &self.core.identifier)
            .field("auto_subscribe", &self.auto_subscribe())
            .field("buffer_actions", &self.buffers_actions())
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

/// An action name bound to a [`Channel`], created by [`Channel::bind_action`].
#[derive(Debug, Clone)]
pub struct BoundAction<'a> {
    channel: &'a Channel,
    name: String,
}

impl BoundAction<'_> {
    /// The bound action name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same as [`Channel::action`] with the bound name.
    ///
    /// # Errors
    ///
    /// Returns whatever error the client reported, unchanged.
    pub fn call(&self, params: Option<Parameters>) -> Result<(), ChannelError> {
        self.channel.action(&self.name, params)
    }
}
