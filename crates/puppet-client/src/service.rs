//! Session lifecycle controller.
//!
//! `PuppetService` owns the connection to the remote puppet, the listen-loop
//! task that turns the event stream into dispatched events, and the logged-in
//! identity. Lifecycle:
//!
//! ```text
//! Idle -> Connecting -> Started -> Streaming -> Stopped
//!                          ^           |
//!                          +-----------+  (stream ended; restart_events())
//! ```
//!
//! `start`, `stop` and `logout` are not reentrant; callers serialize them.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use puppet_net::{discovery, Connector, Endpoint, GrpcConnector, PuppetStub, RemoteMethod};
use puppet_shared::constants::LOCAL_LOGOUT_DATA;
use puppet_shared::events::{LoginEvent, LogoutEvent};
use puppet_shared::protocol::{DingRequest, DirtyPayloadRequest, Empty};
use puppet_shared::types::PayloadType;
use puppet_shared::{EventKind, PuppetError, PuppetEvent, Result};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::PuppetOptions;
use crate::dispatcher::Dispatcher;
use crate::listener::{EventBridge, EventStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Started,
    Streaming,
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Started => "started",
            Self::Streaming => "streaming",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Mutable session state shared with the listen loop.
pub(crate) struct Session {
    pub state: SessionState,
    /// Present exactly while the transport is open.
    pub stub: Option<PuppetStub>,
    /// Contact id of the logged-in account. Only ever set after a Login
    /// event and cleared on Logout or stop.
    pub login_user_id: Option<String>,
}

impl Session {
    fn new() -> Self {
        Self {
            state: SessionState::Idle,
            stub: None,
            login_user_id: None,
        }
    }
}

pub(crate) fn lock_session(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Listener {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Clears the identity and emits the local Logout event when dropped.
struct LogoutCleanup {
    session: Arc<Mutex<Session>>,
    dispatcher: Arc<Dispatcher>,
    contact_id: String,
}

impl Drop for LogoutCleanup {
    fn drop(&mut self) {
        lock_session(&self.session).login_user_id = None;
        info!(contact_id = %self.contact_id, "Logged out");
        self.dispatcher.emit(&PuppetEvent::Logout(LogoutEvent {
            contact_id: std::mem::take(&mut self.contact_id),
            data: Some(LOCAL_LOGOUT_DATA.to_string()),
        }));
    }
}

pub struct PuppetService {
    options: PuppetOptions,
    connector: Arc<dyn Connector>,
    session: Arc<Mutex<Session>>,
    dispatcher: Arc<Dispatcher>,
    listener: Mutex<Option<Listener>>,
}

impl PuppetService {
    /// Create a service that connects over gRPC. Unset options are filled
    /// from the environment.
    pub fn new(options: PuppetOptions) -> Self {
        Self::with_connector(options.with_env(), Arc::new(GrpcConnector))
    }

    pub fn with_connector(options: PuppetOptions, connector: Arc<dyn Connector>) -> Self {
        Self {
            options,
            connector,
            session: Arc::new(Mutex::new(Session::new())),
            dispatcher: Arc::new(Dispatcher::new()),
            listener: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &PuppetOptions {
        &self.options
    }

    pub fn state(&self) -> SessionState {
        self.session().state
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&PuppetEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.dispatcher.on(kind, handler);
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.dispatcher.listener_count(kind)
    }

    pub fn remove_all_listeners(&self) {
        self.dispatcher.remove_all_listeners();
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Connect, run the start handshake and begin streaming events.
    ///
    /// Returns once the event stream is open; events are dispatched from a
    /// spawned task. On failure the transport is closed and the session is
    /// left `Stopped`.
    pub async fn start(&self) -> Result<()> {
        {
            let mut session = self.session();
            match session.state {
                SessionState::Idle | SessionState::Stopped => {
                    session.state = SessionState::Connecting;
                }
                state => {
                    return Err(PuppetError::precondition(format!(
                        "start() called while {state}"
                    )));
                }
            }
        }
        info!(name = %self.options.name, "Starting puppet service");

        let (stub, events) = match self.connect().await {
            Ok(connected) => connected,
            Err(e) => {
                error!(error = %e, "Puppet service failed to start");
                self.session().state = SessionState::Stopped;
                return Err(e);
            }
        };

        {
            let mut session = self.session();
            session.stub = Some(stub);
            session.state = SessionState::Streaming;
        }
        self.spawn_listener(events);

        info!(name = %self.options.name, "Puppet service started");
        Ok(())
    }

    async fn connect(&self) -> Result<(PuppetStub, EventStream)> {
        self.options.validate()?;
        let endpoint = self.resolve_endpoint().await?;

        let transport = self
            .connector
            .connect(&endpoint, self.options.token.as_deref())
            .await?;
        let stub = PuppetStub::new(transport);

        match self.handshake(&stub).await {
            Ok(events) => Ok((stub, events)),
            Err(e) => {
                stub.close().await;
                Err(e)
            }
        }
    }

    async fn resolve_endpoint(&self) -> Result<Endpoint> {
        if let Some(raw) = &self.options.endpoint {
            return Endpoint::parse(raw);
        }
        match &self.options.token {
            Some(token) => discovery::resolve_endpoint(&self.options.discovery_url, token).await,
            None => Err(PuppetError::Configuration(
                "either a token or an endpoint is required".to_string(),
            )),
        }
    }

    /// Reset any stale remote session, start a fresh one and open the event
    /// stream.
    async fn handshake(&self, stub: &PuppetStub) -> Result<EventStream> {
        if let Err(e) = stub.call::<_, Empty>(RemoteMethod::Stop, Empty {}).await {
            debug!(error = %e, "Remote stop before start failed");
        }
        stub.call::<_, Empty>(RemoteMethod::Start, Empty {}).await?;
        self.session().state = SessionState::Started;

        Ok(stub.event_stream().await?)
    }

    fn spawn_listener(&self, events: EventStream) {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let bridge = EventBridge::new(self.session.clone(), self.dispatcher.clone());
        let handle = tokio::spawn(bridge.run(events, shutdown_rx));

        let previous = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Listener { shutdown, handle });
        if let Some(previous) = previous {
            previous.handle.abort();
        }
    }

    /// Open a fresh event stream after the previous one ended.
    ///
    /// Only valid in `Started`, the state the session falls back to when the
    /// server ends the stream or the stream fails.
    pub async fn restart_events(&self) -> Result<()> {
        let stub = {
            let session = self.session();
            match (&session.state, &session.stub) {
                (SessionState::Started, Some(stub)) => stub.clone(),
                (state, _) => {
                    return Err(PuppetError::precondition(format!(
                        "restart_events() called while {state}"
                    )));
                }
            }
        };

        let events = stub.event_stream().await?;
        self.session().state = SessionState::Streaming;
        self.spawn_listener(events);
        info!("Event stream restarted");
        Ok(())
    }

    /// Stop streaming and close the connection. Safe to call in any state and
    /// any number of times; remote failures are logged, never returned.
    pub async fn stop(&self) {
        self.dispatcher.remove_all_listeners();

        let listener = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(listener) = listener {
            let _ = listener.shutdown.send(());
            if let Err(e) = listener.handle.await {
                warn!(error = %e, "Event listener task did not finish cleanly");
            }
        }

        let stub = {
            let mut session = self.session();
            session.login_user_id = None;
            if session.state != SessionState::Idle {
                session.state = SessionState::Stopped;
            }
            session.stub.take()
        };

        if let Some(stub) = stub {
            if let Err(e) = stub.call::<_, Empty>(RemoteMethod::Stop, Empty {}).await {
                warn!(error = %e, "Remote stop failed");
            }
            stub.close().await;
            info!(name = %self.options.name, "Puppet service stopped");
        }
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Contact id of the logged-in account.
    pub fn self_id(&self) -> Result<String> {
        self.session()
            .login_user_id
            .clone()
            .ok_or_else(|| PuppetError::precondition("no user is logged in"))
    }

    pub fn is_logged_in(&self) -> bool {
        self.session().login_user_id.is_some()
    }

    /// Record `contact_id` as the logged-in account and emit a Login event.
    pub fn login(&self, contact_id: &str) -> Result<()> {
        self.stub()?;
        self.session().login_user_id = Some(contact_id.to_string());
        info!(contact_id, "Logged in");
        self.dispatcher.emit(&PuppetEvent::Login(LoginEvent {
            contact_id: contact_id.to_string(),
        }));
        Ok(())
    }

    /// Log the account out. The identity is cleared and a Logout event is
    /// emitted even when the remote call fails or this future is dropped
    /// before it answers.
    pub async fn logout(&self) -> Result<()> {
        let (contact_id, stub) = {
            let session = self.session();
            let contact_id = session
                .login_user_id
                .clone()
                .ok_or_else(|| PuppetError::precondition("logout() requires a logged-in user"))?;
            (contact_id, session.stub.clone())
        };
        let cleanup = LogoutCleanup {
            session: self.session.clone(),
            dispatcher: self.dispatcher.clone(),
            contact_id,
        };

        if let Some(stub) = stub {
            if let Err(e) = stub.call::<_, Empty>(RemoteMethod::Logout, Empty {}).await {
                warn!(error = %e, "Remote logout failed");
            }
        }

        drop(cleanup);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Session requests
    // -----------------------------------------------------------------------

    /// Ask the service to answer with a Dong event carrying `data`.
    pub async fn ding(&self, data: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::Ding,
                DingRequest {
                    data: data.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Tell the service a cached payload is stale.
    pub async fn dirty_payload(&self, payload_type: PayloadType, id: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::DirtyPayload,
                DirtyPayloadRequest {
                    r#type: payload_type as i32,
                    id: id.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// The request stub of the live session.
    pub(crate) fn stub(&self) -> Result<PuppetStub> {
        let session = self.session();
        match (&session.state, &session.stub) {
            (SessionState::Started | SessionState::Streaming, Some(stub)) => Ok(stub.clone()),
            (state, _) => Err(PuppetError::precondition(format!(
                "puppet service is {state}, call start() first"
            ))),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        lock_session(&self.session)
    }
}
