//! Live feed consumption
//!
//! A [`StreamConsumer`] opens a feed through a [`FeedTransport`] (HTTP
//! server-sent events by default), decodes its frames and accumulates the
//! items of one session at a time.

mod consumer;
mod frame;
mod session;
pub mod sse_decoder;
mod transport;

pub use consumer::{CONNECTION_LOST, StreamConsumer};
pub use frame::FeedFrame;
pub use session::{ParameterChange, StreamSnapshot, StreamStatus};
pub use sse_decoder::{MAX_LINE_BYTES, SseDecoder, SseEvent};
pub use transport::{FeedByteStream, FeedParameters, FeedTransport, HttpFeedTransport};
