//! Listen loop bridging the inbound event stream to the dispatcher.

use std::sync::{Arc, Mutex};

use futures::stream::BoxStream;
use futures::StreamExt;
use puppet_shared::protocol::EventResponse;
use puppet_shared::{decode_envelope, PuppetEvent, TransportError};
use tokio::sync::oneshot;
use tracing::{debug, error, info, trace, warn};

use crate::dispatcher::Dispatcher;
use crate::service::{lock_session, Session, SessionState};

pub(crate) type EventStream = BoxStream<'static, Result<EventResponse, TransportError>>;

pub(crate) struct EventBridge {
    session: Arc<Mutex<Session>>,
    dispatcher: Arc<Dispatcher>,
}

impl EventBridge {
    pub fn new(session: Arc<Mutex<Session>>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            session,
            dispatcher,
        }
    }

    /// Consume `events` until the stream ends or `shutdown` fires.
    ///
    /// Envelopes are handled strictly in arrival order. When the stream ends
    /// on its own the session falls back from `Streaming` to `Started`.
    pub async fn run(self, mut events: EventStream, mut shutdown: oneshot::Receiver<()>) {
        info!("Event listener started");

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    debug!("Event listener shutting down");
                    return;
                }
                next = events.next() => match next {
                    Some(Ok(envelope)) => self.handle_envelope(&envelope),
                    Some(Err(TransportError::Frame { method, reason })) => {
                        warn!(method, reason = %reason, "Skipping undecodable event frame");
                        self.dispatcher
                            .emit(&PuppetEvent::error(format!("malformed event frame: {reason}")));
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Event stream failed");
                        self.dispatcher.emit(&PuppetEvent::error(e.to_string()));
                        break;
                    }
                    None => {
                        info!("Event stream ended by server");
                        break;
                    }
                },
            }
        }

        let mut session = lock_session(&self.session);
        if session.state == SessionState::Streaming {
            session.state = SessionState::Started;
        }
    }

    fn handle_envelope(&self, envelope: &EventResponse) {
        match decode_envelope(envelope.r#type, &envelope.payload) {
            Ok(event) => {
                trace!(event = %event.kind(), "Event received");
                self.apply_identity(&event);
                self.dispatcher.emit(&event);
            }
            Err(e) => {
                warn!(tag = envelope.r#type, error = %e, "Dropping undecodable event");
                self.dispatcher.emit(&PuppetEvent::error(e.to_string()));
            }
        }
    }

    /// Login and Logout events update the identity before handlers see them.
    fn apply_identity(&self, event: &PuppetEvent) {
        match event {
            PuppetEvent::Login(login) => {
                info!(contact_id = %login.contact_id, "Logged in");
                lock_session(&self.session).login_user_id = Some(login.contact_id.clone());
            }
            PuppetEvent::Logout(logout) => {
                info!(contact_id = %logout.contact_id, "Logged out by service");
                lock_session(&self.session).login_user_id = None;
            }
            _ => {}
        }
    }
}
