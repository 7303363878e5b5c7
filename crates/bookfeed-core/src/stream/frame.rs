//! Feed frame vocabulary

use super::sse_decoder::SseEvent;
use crate::error::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One decoded feed frame.
///
/// Frames are JSON objects tagged by `type`. When the tag is missing the SSE
/// `event:` name is used instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedFrame {
    /// Session acknowledged by the origin
    Start {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// One record, in arrival order
    Item {
        data: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<u64>,
    },
    Progress { count: u64 },
    /// Normal completion
    End {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<u64>,
    },
    /// Origin-reported failure
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl FeedFrame {
    /// Decode a frame from a dispatched event
    pub fn from_event(event: &SseEvent) -> FeedResult<Self> {
        let mut value: Value = serde_json::from_str(&event.data)
            .map_err(|e| FeedError::json_with_context(e.to_string(), "Decoding feed frame"))?;

        let Value::Object(fields) = &mut value else {
            return Err(FeedError::stream("Feed frame is not a JSON object"));
        };
        if !fields.contains_key("type") {
            match &event.event_type {
                Some(event_type) => {
                    fields.insert("type".to_string(), Value::String(event_type.clone()));
                }
                None => return Err(FeedError::stream("Feed frame has no type")),
            }
        }

        serde_json::from_value(value)
            .map_err(|e| FeedError::json_with_context(e.to_string(), "Decoding feed frame"))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeedFrame::Start { .. } => "start",
            FeedFrame::Item { .. } => "item",
            FeedFrame::Progress { .. } => "progress",
            FeedFrame::End { .. } => "end",
            FeedFrame::Error { .. } => "error",
        }
    }

    /// Whether this frame ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, FeedFrame::End { .. } | FeedFrame::Error { .. })
    }
}
