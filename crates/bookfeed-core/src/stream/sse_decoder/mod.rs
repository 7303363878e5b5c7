//! Incremental decoder for the feed's text framing
//!
//! The feed is normally delivered as server-sent events:
//!
//! ```text
//! event: item\n
//! data: {"type":"item","data":{...},"index":0}\n
//! \n
//! ```
//!
//! Bare newline-delimited JSON (`{...}\n`) is accepted as well: a line that
//! starts with `{` outside of an SSE field is dispatched as one event.
//!
//! Bytes are buffered until a full line is available, so frames and
//! multi-byte UTF-8 sequences may be split across network chunks freely.

mod event;

pub use event::SseEvent;

/// Longest line the decoder buffers before discarding it
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug)]
pub struct SseDecoder {
    /// Bytes of the current, not yet terminated line
    pending: Vec<u8>,
    /// Skipping the rest of an oversized line up to its newline
    discarding: bool,
    max_line_bytes: usize,
    event_type: Option<String>,
    data_lines: Vec<String>,
    id: Option<String>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            discarding: false,
            max_line_bytes: MAX_LINE_BYTES,
            event_type: None,
            data_lines: Vec::new(),
            id: None,
        }
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes.max(1);
        self
    }

    /// Feed raw bytes and collect every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=newline).collect();
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.len() > self.max_line_bytes {
                tracing::warn!(bytes = line.len(), limit = self.max_line_bytes, "dropping oversized line");
                continue;
            }
            self.process_line(&line, &mut events);
        }

        if self.pending.len() > self.max_line_bytes {
            if !self.discarding {
                tracing::warn!(
                    bytes = self.pending.len(),
                    limit = self.max_line_bytes,
                    "line exceeds limit, discarding until next newline"
                );
            }
            self.pending.clear();
            self.discarding = true;
        }
        events
    }

    /// Flush whatever is buffered once the byte stream has ended
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let mut events = Vec::new();
        if std::mem::take(&mut self.discarding) {
            self.pending.clear();
        }
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.process_line(&line, &mut events);
        }
        self.dispatch(&mut events);
        events
    }

    /// Whether a partial line or event is buffered
    pub fn has_remaining(&self) -> bool {
        !self.pending.is_empty() || !self.data_lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.discarding = false;
        self.reset_event();
    }

    fn process_line(&mut self, raw: &[u8], events: &mut Vec<SseEvent>) {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, bytes = raw.len(), "dropping line with invalid UTF-8");
                return;
            }
        };

        if line.is_empty() {
            self.dispatch(events);
            return;
        }
        if line.starts_with(':') {
            // comment / keep-alive
            return;
        }
        if line.starts_with('{') {
            self.dispatch(events);
            events.push(SseEvent::new(line));
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event_type = Some(value.to_string()),
            "data" => self.data_lines.push(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            _ => {}
        }
    }

    fn dispatch(&mut self, events: &mut Vec<SseEvent>) {
        if self.data_lines.is_empty() {
            self.reset_event();
            return;
        }
        events.push(SseEvent {
            event_type: self.event_type.take(),
            data: self.data_lines.join("\n"),
            id: self.id.take(),
        });
        self.reset_event();
    }

    fn reset_event(&mut self) {
        self.event_type = None;
        self.data_lines.clear();
        self.id = None;
    }
}

#[cfg(test)]
mod tests;
