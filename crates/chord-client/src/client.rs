//! Client facade
//!
//! Owns the shared state, the connection engine and the REST layer, and exposes the
//! public lifecycle, cache and request surface.

use std::sync::Arc;

use chord_common::{ClientConfig, ClientError, ClientResult};
use chord_core::{Channel, Guild, Message, Snowflake, User, Webhook};
use chord_gateway::events::mappers::message_from_payload;
use chord_gateway::events::payloads::MessagePayload;
use chord_gateway::{
    ClientEvent, ConnectionEngine, ConnectionStatus, EngineConfig, EventKind, GatewayState,
    Notifier, Scheduler, SharedState, TokioScheduler, Transport, WsTransport,
};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;

use crate::rest::{
    HttpClient, MessageOptions, PayloadBuilder, RequestOptions, ReqwestHttp, RestResponse, Routes,
};

/// Webhook object returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<WebhookPayload> for Webhook {
    fn from(payload: WebhookPayload) -> Self {
        Webhook {
            id: payload.id,
            channel_id: payload.channel_id,
            guild_id: payload.guild_id,
            name: payload.name,
            token: payload.token,
            url: payload.url,
        }
    }
}

/// Builder for [`Client`] with replaceable transport, scheduler and HTTP client
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    http: Option<Arc<dyn HttpClient>>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            scheduler: None,
            http: None,
        }
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn http(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Client {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(WsTransport::new()));
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Arc::new(TokioScheduler::new()));
        let http = self.http.unwrap_or_else(|| Arc::new(ReqwestHttp::new()));

        let state: SharedState = Arc::new(Mutex::new(GatewayState::new()));
        let notifier = Arc::new(Notifier::new());
        let engine = ConnectionEngine::new(
            EngineConfig::from(&self.config),
            transport,
            scheduler,
            state.clone(),
            notifier.clone(),
        );

        Client {
            inner: Arc::new(ClientInner {
                routes: Routes::new(self.config.api_url.clone()),
                token: Mutex::new(self.config.token.clone()),
                config: self.config,
                state,
                notifier,
                engine,
                http,
                payload: RwLock::new(None),
            }),
        }
    }
}

/// Gateway client
///
/// Cheap to clone; clones share the same connection and caches.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    state: SharedState,
    notifier: Arc<Notifier>,
    engine: ConnectionEngine,
    http: Arc<dyn HttpClient>,
    routes: Routes,
    token: Mutex<Option<String>>,
    payload: RwLock<Option<PayloadBuilder>>,
}

impl Client {
    /// Client with the default WebSocket transport, tokio scheduler and reqwest HTTP client
    pub fn new(config: ClientConfig) -> Self {
        ClientBuilder::new(config).build()
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // === Lifecycle ===

    /// Connect and identify
    ///
    /// Uses `token` when given, otherwise the token from a previous login or the
    /// configuration.
    pub fn login(&self, token: Option<&str>) -> ClientResult<()> {
        let token = token
            .map(str::to_string)
            .or_else(|| self.inner.token.lock().clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ClientError::auth("No token provided"))?;

        if self.inner.engine.status() != ConnectionStatus::Disconnected {
            return Err(ClientError::state("Client is already connected"));
        }

        *self.inner.token.lock() = Some(token.clone());
        *self.inner.payload.write() =
            Some(PayloadBuilder::new(&token, &self.inner.config.user_agent));

        self.inner.engine.connect(&token)?;
        tracing::info!(intents = self.inner.config.intents, "Logging in");
        Ok(())
    }

    /// Close the gateway connection with normal closure
    pub fn close(&self) {
        self.inner.engine.close();
    }

    // === Notifications ===

    /// Register a listener; listeners for the same kind run in registration order
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.inner.notifier.on(kind, listener);
    }

    pub fn on_ready<F>(&self, listener: F)
    where
        F: Fn(&User) + Send + Sync + 'static,
    {
        self.on(EventKind::Ready, move |event| {
            if let ClientEvent::Ready(user) = event {
                listener(user);
            }
        });
    }

    pub fn on_message<F>(&self, listener: F)
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.on(EventKind::Message, move |event| {
            if let ClientEvent::Message(message) = event {
                listener(message);
            }
        });
    }

    pub fn on_message_delete<F>(&self, listener: F)
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.on(EventKind::MessageDelete, move |event| {
            if let ClientEvent::MessageDelete(message) = event {
                listener(message);
            }
        });
    }

    pub fn on_debug<F>(&self, listener: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on(EventKind::Debug, move |event| {
            if let ClientEvent::Debug(text) = event {
                listener(text);
            }
        });
    }

    /// Async stream of every notification
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.inner.notifier.subscribe()
    }

    // === State ===

    pub fn status(&self) -> ConnectionStatus {
        self.inner.engine.status()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.state.lock().session.ready
    }

    pub fn ready_time(&self) -> Option<DateTime<Utc>> {
        self.inner.state.lock().session.ready_at
    }

    pub fn sequence(&self) -> Option<u64> {
        self.inner.state.lock().session.sequence
    }

    pub fn session_id(&self) -> Option<String> {
        self.inner.state.lock().session.session_id.clone()
    }

    pub fn resume_url(&self) -> Option<String> {
        self.inner.state.lock().session.resume_url.clone()
    }

    // === Cache ===

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.lock().store.current_user().cloned()
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.inner.state.lock().store.users.get(id).cloned()
    }

    pub fn guild(&self, id: &str) -> Option<Guild> {
        self.inner.state.lock().store.guilds.get(id).cloned()
    }

    pub fn channel(&self, id: &str) -> Option<Channel> {
        self.inner.state.lock().store.channels.get(id).cloned()
    }

    pub fn message(&self, channel_id: &str, message_id: &str) -> Option<Message> {
        self.inner
            .state
            .lock()
            .store
            .channels
            .get(channel_id)
            .and_then(|channel| channel.messages.get(message_id))
            .cloned()
    }

    /// Snapshot of the entity caches
    pub fn with_store<R>(&self, f: impl FnOnce(&chord_gateway::EntityStore) -> R) -> R {
        f(&self.inner.state.lock().store)
    }

    pub fn avatar_url(&self, user: &User) -> Option<String> {
        user.avatar_url(&self.inner.config.cdn_url)
    }

    // === REST ===

    /// Issue a REST request with the bot's headers
    ///
    /// `endpoint` is an absolute URL or a path under the API base. Non-2xx responses
    /// become [`ClientError::Request`]; nothing is retried.
    pub async fn send_request(
        &self,
        endpoint: &str,
        method: Method,
        options: RequestOptions,
    ) -> ClientResult<RestResponse> {
        let request = {
            let payload = self.inner.payload.read();
            let builder = payload
                .as_ref()
                .ok_or_else(|| ClientError::state("Client is not logged in"))?;
            builder.create(self.inner.routes.resolve(endpoint), method, options)
        };

        tracing::debug!(method = %request.method, url = %request.url, "Sending request");
        let response = self.inner.http.execute(request).await?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Request failed");
            return Err(ClientError::request(
                Some(response.status),
                response.error_message(),
            ));
        }
        Ok(response)
    }

    /// Post a message to a channel
    pub async fn send_message(
        &self,
        channel_id: &str,
        options: impl Into<MessageOptions>,
    ) -> ClientResult<Message> {
        let (body, files) = PayloadBuilder::resolve_message(options.into());
        let response = self
            .send_request(
                &self.inner.routes.channel_messages(channel_id),
                Method::POST,
                RequestOptions::new().with_body(body).with_files(files),
            )
            .await?;

        let payload: MessagePayload = response.json()?;
        Ok(self.resolve_message(payload))
    }

    /// Post a message replying to `message`
    pub async fn reply(
        &self,
        message: &Message,
        options: impl Into<MessageOptions>,
    ) -> ClientResult<Message> {
        let options = options.into().replying_to(message);
        self.send_message(message.channel_id.as_str(), options).await
    }

    /// Delete a message and drop it from the cache
    pub async fn delete_message(&self, message: &Message) -> ClientResult<()> {
        self.send_request(
            &self
                .inner
                .routes
                .channel_message(message.channel_id.as_str(), message.id.as_str()),
            Method::DELETE,
            RequestOptions::new(),
        )
        .await?;

        self.inner
            .state
            .lock()
            .store
            .remove_message(&message.channel_id, &message.id);
        Ok(())
    }

    pub async fn create_webhook(&self, channel_id: &str, name: &str) -> ClientResult<Webhook> {
        let response = self
            .send_request(
                &self.inner.routes.channel_webhooks(channel_id),
                Method::POST,
                RequestOptions::new().with_body(json!({ "name": name })),
            )
            .await?;

        let payload: WebhookPayload = response.json()?;
        Ok(Webhook::from(payload))
    }

    /// Fetch a webhook by its URL
    pub async fn fetch_webhook(&self, url: &str) -> ClientResult<Webhook> {
        let response = self
            .send_request(url, Method::GET, RequestOptions::new())
            .await?;
        let payload: WebhookPayload = response.json()?;
        Ok(Webhook::from(payload))
    }

    pub async fn execute_webhook(
        &self,
        webhook: &Webhook,
        options: impl Into<MessageOptions>,
    ) -> ClientResult<RestResponse> {
        let url = webhook
            .execute_url(self.inner.routes.api_url())
            .ok_or_else(|| ClientError::state("Webhook has neither a URL nor a token"))?;
        let (body, files) = PayloadBuilder::resolve_message(options.into());

        self.send_request(
            &url,
            Method::POST,
            RequestOptions::new().with_body(body).with_files(files),
        )
        .await
    }

    /// Build a Message from a REST payload, resolving users through the cache
    fn resolve_message(&self, payload: MessagePayload) -> Message {
        let state = self.inner.state.lock();
        let store = &state.store;

        let mut message = message_from_payload(payload, |user| {
            store.users.get(&user.id).cloned().unwrap_or(user)
        });
        if message.guild_id.is_none() {
            message.guild_id = store
                .channels
                .get(&message.channel_id)
                .and_then(|channel| channel.guild_id.clone());
        }
        message
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("engine", &self.inner.engine)
            .field("notifier", &self.inner.notifier)
            .finish_non_exhaustive()
    }
}
