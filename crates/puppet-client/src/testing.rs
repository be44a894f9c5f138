//! In-memory transport for exercising the session without a network.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{future, stream, StreamExt};
use prost::Message;
use puppet_net::{Connector, Endpoint, FrameStream, RemoteMethod, Transport};
use puppet_shared::protocol::{EventResponse, EventType};
use puppet_shared::{EventKind, PuppetError, PuppetEvent, TransportError};
use tokio::sync::mpsc;

use crate::dispatcher::Dispatcher;
use crate::service::PuppetService;

type Frame = Result<Bytes, TransportError>;

/// Records every call and answers from per-method queues. A method without a
/// queued answer gets an empty frame, which decodes to the default message.
#[derive(Default)]
pub struct FakeTransport {
    requests: Mutex<Vec<(RemoteMethod, Bytes)>>,
    responses: Mutex<HashMap<RemoteMethod, VecDeque<Frame>>>,
    streams: Mutex<HashMap<RemoteMethod, Vec<Frame>>>,
    unanswered: Mutex<HashSet<RemoteMethod>>,
    events: Mutex<Option<mpsc::UnboundedSender<Frame>>>,
    closed: AtomicBool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond<M: Message>(&self, method: RemoteMethod, response: M) {
        self.queue(method, Ok(Bytes::from(response.encode_to_vec())));
    }

    pub fn fail(&self, method: RemoteMethod, error: TransportError) {
        self.queue(method, Err(error));
    }

    /// Unary calls of `method` never complete.
    pub fn never_answer(&self, method: RemoteMethod) {
        self.unanswered.lock().unwrap().insert(method);
    }

    fn queue(&self, method: RemoteMethod, frame: Frame) {
        self.responses
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(frame);
    }

    /// Frames returned by the next server-streaming call of `method`.
    pub fn stream_frames<M: Message>(&self, method: RemoteMethod, frames: Vec<M>) {
        let frames = frames
            .into_iter()
            .map(|frame| Ok(Bytes::from(frame.encode_to_vec())))
            .collect();
        self.streams.lock().unwrap().insert(method, frames);
    }

    pub fn push_event(&self, tag: EventType, payload: &str) {
        self.push_raw_event(tag as i32, payload);
    }

    pub fn push_raw_event(&self, tag: i32, payload: &str) {
        let envelope = EventResponse {
            r#type: tag,
            payload: payload.to_string(),
        };
        self.send_event(Ok(Bytes::from(envelope.encode_to_vec())));
    }

    /// Fail the open event stream with `error`.
    pub fn fail_events(&self, error: TransportError) {
        self.send_event(Err(error));
    }

    fn send_event(&self, frame: Frame) {
        if let Some(tx) = self.events.lock().unwrap().as_ref() {
            let _ = tx.send(frame);
        }
    }

    pub fn calls(&self) -> Vec<RemoteMethod> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(method, _)| *method)
            .collect()
    }

    /// Decode the most recent request sent to `method`.
    pub fn last_request<M: Message + Default>(&self, method: RemoteMethod) -> M {
        let requests = self.requests.lock().unwrap();
        let (_, body) = requests
            .iter()
            .rev()
            .find(|(m, _)| *m == method)
            .unwrap_or_else(|| panic!("no request sent to {method}"));
        M::decode(body.clone()).unwrap()
    }

    fn record(&self, method: RemoteMethod, request: Bytes) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        self.requests.lock().unwrap().push((method, request));
        Ok(())
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn unary(&self, method: RemoteMethod, request: Bytes) -> Result<Bytes, TransportError> {
        self.record(method, request)?;
        let unanswered = self.unanswered.lock().unwrap().contains(&method);
        if unanswered {
            return future::pending().await;
        }
        self.responses
            .lock()
            .unwrap()
            .get_mut(&method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Bytes::new()))
    }

    async fn server_streaming(
        &self,
        method: RemoteMethod,
        request: Bytes,
    ) -> Result<FrameStream, TransportError> {
        self.record(method, request)?;

        if method == RemoteMethod::Event {
            let (tx, rx) = mpsc::unbounded_channel();
            *self.events.lock().unwrap() = Some(tx);
            return Ok(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|frame| (frame, rx))
            })
            .boxed());
        }

        let frames = self
            .streams
            .lock()
            .unwrap()
            .remove(&method)
            .unwrap_or_default();
        Ok(stream::iter(frames).boxed())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.events.lock().unwrap().take();
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub struct FakeConnector {
    transport: Arc<FakeTransport>,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub fn new(transport: Arc<FakeTransport>) -> Self {
        Self {
            transport,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(
        &self,
        _endpoint: &Endpoint,
        _token: Option<&str>,
    ) -> Result<Arc<dyn Transport>, PuppetError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.transport.closed.store(false, Ordering::SeqCst);
        Ok(self.transport.clone())
    }
}

/// Forward every event of `kind` into a channel.
pub fn record(service: &PuppetService, kind: EventKind) -> mpsc::UnboundedReceiver<PuppetEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    service.on(kind, move |event| {
        tx.send(event.clone())?;
        Ok(())
    });
    rx
}

pub fn record_dispatcher(
    dispatcher: &Dispatcher,
    kind: EventKind,
) -> mpsc::UnboundedReceiver<PuppetEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    dispatcher.on(kind, move |event| {
        tx.send(event.clone())?;
        Ok(())
    });
    rx
}

pub async fn expect_event(rx: &mut mpsc::UnboundedReceiver<PuppetEvent>) -> PuppetEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

pub async fn expect_no_event(rx: &mut mpsc::UnboundedReceiver<PuppetEvent>) {
    let next = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(next.is_err(), "unexpected event: {next:?}");
}
