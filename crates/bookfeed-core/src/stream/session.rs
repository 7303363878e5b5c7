//! Session status and observable state

use super::transport::FeedParameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifecycle of a feed session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    #[default]
    Idle,
    /// Transport is being opened
    Connecting,
    /// Connection open, frames flowing
    Streaming,
    Complete,
    Error,
    /// Stopped by the caller
    Cancelled,
}

impl StreamStatus {
    /// A transport is (or is about to be) open
    pub fn is_active(&self) -> bool {
        matches!(self, StreamStatus::Connecting | StreamStatus::Streaming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamStatus::Complete | StreamStatus::Error | StreamStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Idle => "idle",
            StreamStatus::Connecting => "connecting",
            StreamStatus::Streaming => "streaming",
            StreamStatus::Complete => "complete",
            StreamStatus::Error => "error",
            StreamStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time copy of a consumer's state
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSnapshot<T> {
    pub session_id: u64,
    pub parameters: FeedParameters,
    pub items: Vec<T>,
    pub status: StreamStatus,
    /// Last count reported by a progress frame; may lag `items.len()`
    pub progress_count: u64,
    pub total: Option<u64>,
    pub error_message: Option<String>,
}

impl<T> StreamSnapshot<T> {
    pub fn is_complete(&self) -> bool {
        self.status == StreamStatus::Complete
    }
}

/// Transition taken by [`StreamConsumer::update_parameters`](super::StreamConsumer::update_parameters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterChange {
    /// The live session was discarded and a new one started with this id
    Restarted(u64),
    /// No live session; parameters kept for the next `start`
    Stored,
    /// Live session already uses these parameters
    Unchanged,
}

/// Mutable session state behind the consumer's lock
#[derive(Debug)]
pub(super) struct SessionState<T> {
    pub session_id: u64,
    pub parameters: FeedParameters,
    pub items: Vec<T>,
    pub status: StreamStatus,
    pub progress_count: u64,
    pub total: Option<u64>,
    pub error_message: Option<String>,
    /// Cancels the live session's transport
    pub cancel: Option<CancellationToken>,
    pub task: Option<JoinHandle<()>>,
}

impl<T> Default for SessionState<T> {
    fn default() -> Self {
        Self {
            session_id: 0,
            parameters: FeedParameters::default(),
            items: Vec::new(),
            status: StreamStatus::Idle,
            progress_count: 0,
            total: None,
            error_message: None,
            cancel: None,
            task: None,
        }
    }
}

impl<T> SessionState<T> {
    /// Whether a task for `session_id` may still mutate this state
    pub fn accepts(&self, session_id: u64) -> bool {
        self.session_id == session_id && self.status.is_active()
    }

    /// Cancel the live transport, if any. Returns whether one was live.
    pub fn close_transport(&mut self) -> bool {
        match self.cancel.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn clear_results(&mut self) {
        self.items.clear();
        self.progress_count = 0;
        self.total = None;
        self.error_message = None;
    }
}

impl<T: Clone> SessionState<T> {
    pub fn snapshot(&self) -> StreamSnapshot<T> {
        StreamSnapshot {
            session_id: self.session_id,
            parameters: self.parameters.clone(),
            items: self.items.clone(),
            status: self.status,
            progress_count: self.progress_count,
            total: self.total,
            error_message: self.error_message.clone(),
        }
    }
}
