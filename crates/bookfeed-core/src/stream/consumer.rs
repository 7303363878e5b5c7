//! Single-session feed consumer

use super::frame::FeedFrame;
use super::session::{ParameterChange, SessionState, StreamSnapshot, StreamStatus};
use super::sse_decoder::{SseDecoder, SseEvent};
use super::transport::{FeedParameters, FeedTransport};
use futures::StreamExt;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

/// Message recorded when the transport fails or ends early
pub const CONNECTION_LOST: &str = "Connection lost";

const NO_RUNTIME: &str = "No async runtime available";
const UNKNOWN_STREAM_ERROR: &str = "Stream error";

/// Drives one live feed session at a time and exposes its evolving state.
///
/// Starting a new session tears down the previous one first. Every mutation
/// made by a session task is checked against the current session id under
/// the state lock, so a superseded task can never touch the new session's
/// items.
///
/// # Examples
///
/// ```no_run
/// use bookfeed_core::stream::{FeedParameters, HttpFeedTransport, StreamConsumer};
/// use reqwest::Url;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpFeedTransport::new(Url::parse("http://localhost:5000/api/books/stream")?);
/// let books: StreamConsumer = StreamConsumer::new(Arc::new(transport));
///
/// books.start(FeedParameters::new().with("genre", "fantasy"));
/// let snapshot = books.wait_for_terminal().await;
/// println!("{} items, status {}", snapshot.items.len(), snapshot.status);
/// # Ok(())
/// # }
/// ```
pub struct StreamConsumer<T = serde_json::Value> {
    name: String,
    transport: Arc<dyn FeedTransport>,
    pub(super) shared: Arc<Shared<T>>,
}

/// State shared between the consumer and its session task
pub(super) struct Shared<T> {
    state: Mutex<SessionState<T>>,
    status_tx: watch::Sender<StreamStatus>,
}

/// What a session task should do after applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FrameOutcome {
    Continue,
    /// Terminal frame applied
    Finished,
    /// Session no longer current
    Superseded,
}

impl<T> StreamConsumer<T> {
    pub fn new(transport: Arc<dyn FeedTransport>) -> Self {
        let (status_tx, _) = watch::channel(StreamStatus::Idle);
        Self {
            name: "feed".to_string(),
            transport,
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState::default()),
                status_tx,
            }),
        }
    }

    /// Label used in log events
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Close the live transport, keeping accumulated items.
    ///
    /// `Connecting`/`Streaming` become `Cancelled`; idle and terminal
    /// sessions are left as they are.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        state.close_transport();
        if state.status.is_active() {
            info!(
                feed = %self.name,
                session_id = state.session_id,
                items = state.items.len(),
                "feed session stopped"
            );
            self.shared.set_status(&mut state, StreamStatus::Cancelled);
        }
    }

    /// Stop if live, then clear results and return to `Idle`
    pub fn reset(&self) {
        let mut state = self.shared.state.lock();
        self.reset_locked(&mut state);
    }

    fn reset_locked(&self, state: &mut SessionState<T>) {
        state.close_transport();
        state.task = None;
        state.clear_results();
        debug!(feed = %self.name, session_id = state.session_id, "feed reset");
        self.shared.set_status(state, StreamStatus::Idle);
    }

    /// Teardown: stop the session and abort its task
    pub fn dispose(&self) {
        let mut state = self.shared.state.lock();
        state.close_transport();
        if let Some(task) = state.task.take() {
            task.abort();
        }
        if state.status.is_active() {
            self.shared.set_status(&mut state, StreamStatus::Cancelled);
        }
    }

    pub fn status(&self) -> StreamStatus {
        self.shared.state.lock().status
    }

    pub fn is_complete(&self) -> bool {
        self.status() == StreamStatus::Complete
    }

    pub fn session_id(&self) -> u64 {
        self.shared.state.lock().session_id
    }

    /// Parameters of the current session, or those stored for the next one
    pub fn parameters(&self) -> FeedParameters {
        self.shared.state.lock().parameters.clone()
    }

    pub fn item_count(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    pub fn progress_count(&self) -> u64 {
        self.shared.state.lock().progress_count
    }

    pub fn error_message(&self) -> Option<String> {
        self.shared.state.lock().error_message.clone()
    }

    /// Receiver of the latest status
    pub fn subscribe(&self) -> watch::Receiver<StreamStatus> {
        self.shared.status_tx.subscribe()
    }
}

impl<T> StreamConsumer<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    /// Begin a new session and return its id.
    ///
    /// Returns immediately; results arrive through the observable state.
    /// Without a tokio runtime the session is marked `Error`.
    pub fn start(&self, parameters: FeedParameters) -> u64 {
        let mut state = self.shared.state.lock();
        self.start_locked(&mut state, parameters)
    }

    fn start_locked(&self, state: &mut SessionState<T>, parameters: FeedParameters) -> u64 {
        if state.close_transport() {
            debug!(
                feed = %self.name,
                session_id = state.session_id,
                "tearing down previous feed session"
            );
        }

        state.session_id += 1;
        state.parameters = parameters.clone();
        state.clear_results();
        let session_id = state.session_id;

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(feed = %self.name, session_id, "cannot start feed session outside a tokio runtime");
                state.task = None;
                state.error_message = Some(NO_RUNTIME.to_string());
                self.shared.set_status(state, StreamStatus::Error);
                return session_id;
            }
        };

        let cancel = CancellationToken::new();
        state.cancel = Some(cancel.clone());
        self.shared.set_status(state, StreamStatus::Connecting);

        info!(
            feed = %self.name,
            session_id,
            parameters = ?parameters,
            "starting feed session"
        );

        let span = info_span!("feed_session", feed = %self.name, session_id);
        let task = handle.spawn(
            run_session(
                Arc::clone(&self.shared),
                Arc::clone(&self.transport),
                session_id,
                parameters,
                cancel,
            )
            .instrument(span),
        );
        state.task = Some(task);

        session_id
    }

    /// Start again with the stored parameters
    pub fn restart(&self) -> u64 {
        let parameters = self.parameters();
        self.start(parameters)
    }

    /// Apply new parameters.
    ///
    /// A live session with different parameters is reset and restarted,
    /// discarding its partial results. Otherwise the parameters are stored
    /// for the next [`start`](Self::start)/[`restart`](Self::restart).
    ///
    /// The decision and the restart happen under one lock, so a session that
    /// finishes concurrently keeps its results.
    pub fn update_parameters(&self, parameters: FeedParameters) -> ParameterChange {
        let mut state = self.shared.state.lock();
        if !state.status.is_active() {
            state.parameters = parameters;
            return ParameterChange::Stored;
        }
        if state.parameters == parameters {
            return ParameterChange::Unchanged;
        }

        self.reset_locked(&mut state);
        ParameterChange::Restarted(self.start_locked(&mut state, parameters))
    }

    pub fn snapshot(&self) -> StreamSnapshot<T> {
        self.shared.state.lock().snapshot()
    }

    pub fn items(&self) -> Vec<T> {
        self.shared.state.lock().items.clone()
    }

    /// Wait until the session is no longer connecting or streaming
    pub async fn wait_for_terminal(&self) -> StreamSnapshot<T> {
        let mut status_rx = self.subscribe();
        loop {
            let status = *status_rx.borrow_and_update();
            if !status.is_active() {
                break;
            }
            if status_rx.changed().await.is_err() {
                break;
            }
        }
        self.snapshot()
    }
}

impl<T> Drop for StreamConsumer<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T> fmt::Debug for StreamConsumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("StreamConsumer")
            .field("name", &self.name)
            .field("session_id", &state.session_id)
            .field("status", &state.status)
            .field("items", &state.items.len())
            .finish()
    }
}

impl<T> Shared<T> {
    /// Publish a status change; called with the state lock held so observers
    /// see changes in order
    fn set_status(&self, state: &mut SessionState<T>, status: StreamStatus) {
        state.status = status;
        self.status_tx.send_replace(status);
    }

    fn mark_streaming(&self, session_id: u64) -> bool {
        let mut state = self.state.lock();
        if !state.accepts(session_id) {
            return false;
        }
        self.set_status(&mut state, StreamStatus::Streaming);
        true
    }

    /// Record a transport-level failure
    fn fail(&self, session_id: u64, message: &str) {
        let mut state = self.state.lock();
        if !state.accepts(session_id) {
            return;
        }
        state.close_transport();
        state.error_message = Some(message.to_string());
        self.set_status(&mut state, StreamStatus::Error);
    }
}

impl<T: DeserializeOwned> Shared<T> {
    /// Apply one decoded event to the session identified by `session_id`
    pub(super) fn apply(&self, session_id: u64, event: &SseEvent) -> FrameOutcome {
        let frame = match FeedFrame::from_event(event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, event_type = ?event.event_type, "skipping malformed feed frame");
                return FrameOutcome::Continue;
            }
        };

        let mut state = self.state.lock();
        if !state.accepts(session_id) {
            return FrameOutcome::Superseded;
        }

        match frame {
            FeedFrame::Start { message } => {
                debug!(message = ?message, "feed acknowledged");
                state.items.clear();
                state.progress_count = 0;
            }
            FeedFrame::Item { data, index } => match serde_json::from_value::<T>(data) {
                Ok(item) => state.items.push(item),
                Err(e) => warn!(index = ?index, error = %e, "skipping undecodable feed item"),
            },
            FeedFrame::Progress { count } => state.progress_count = count,
            FeedFrame::End { total } => {
                info!(items = state.items.len(), total = ?total, "feed complete");
                state.total = total;
                state.close_transport();
                self.set_status(&mut state, StreamStatus::Complete);
                return FrameOutcome::Finished;
            }
            FeedFrame::Error { message } => {
                let message = message.unwrap_or_else(|| UNKNOWN_STREAM_ERROR.to_string());
                warn!(message = %message, "feed reported an error");
                state.error_message = Some(message);
                state.close_transport();
                self.set_status(&mut state, StreamStatus::Error);
                return FrameOutcome::Finished;
            }
        }
        FrameOutcome::Continue
    }
}

async fn run_session<T>(
    shared: Arc<Shared<T>>,
    transport: Arc<dyn FeedTransport>,
    session_id: u64,
    parameters: FeedParameters,
    cancel: CancellationToken,
) where
    T: DeserializeOwned + Send + 'static,
{
    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        opened = transport.open(&parameters) => opened,
    };

    let mut bytes = match opened {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "failed to open feed");
            shared.fail(session_id, CONNECTION_LOST);
            return;
        }
    };

    if !shared.mark_streaming(session_id) {
        return;
    }

    let mut decoder = SseDecoder::new();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("feed session cancelled");
                return;
            }
            next = bytes.next() => next,
        };

        let (events, ended) = match next {
            Some(Ok(chunk)) => (decoder.feed(&chunk), false),
            Some(Err(e)) => {
                warn!(error = %e, "feed connection broken");
                shared.fail(session_id, CONNECTION_LOST);
                return;
            }
            None => (decoder.finish(), true),
        };

        for event in &events {
            match shared.apply(session_id, event) {
                FrameOutcome::Continue => {}
                FrameOutcome::Finished | FrameOutcome::Superseded => return,
            }
        }

        if ended {
            warn!("feed ended without a terminal frame");
            shared.fail(session_id, CONNECTION_LOST);
            return;
        }
    }
}
