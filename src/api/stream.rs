use crate::api::logging::emit_record_parse_error;
use crate::types::StreamPayload;
use anyhow::Result;

pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded record from the event transport.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamRecord {
    /// Text delta to append to the running assistant message.
    Content(String),
    /// Error payload; captured by the caller, never shown mid-stream.
    Error(String),
    /// End-of-stream sentinel.
    Done,
}

/// Incremental decoder for the newline-delimited `data: <JSON>` framing.
/// Chunks may split a record anywhere; the undelivered tail is kept between
/// calls.
#[derive(Default)]
pub struct StreamParser {
    buffer: String,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, chunk: &[u8]) -> Result<Vec<StreamRecord>> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        let mut records = Vec::new();
        let mut start = 0;

        while let Some(offset) = self.buffer[start..].find('\n') {
            let line_end = start + offset;
            let line = self.buffer[start..line_end].trim_end_matches('\r');
            if let Some(record) = parse_record_line(line) {
                records.push(record);
            }
            start = line_end + 1;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        Ok(records)
    }

    /// Remaining unframed bytes, drained. A well-behaved stream leaves nothing here.
    pub fn flush(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// Decodes whatever is left when the transport closes without a final
    /// newline, as one last record.
    pub fn finish(&mut self) -> Option<StreamRecord> {
        let tail = std::mem::take(&mut self.buffer);
        parse_record_line(tail.trim_end_matches('\r'))
    }
}

fn parse_record_line(line: &str) -> Option<StreamRecord> {
    let data = line.strip_prefix("data:")?.trim();
    if data.is_empty() {
        return None;
    }
    if data == DONE_SENTINEL {
        return Some(StreamRecord::Done);
    }

    match serde_json::from_str::<StreamPayload>(data) {
        Ok(StreamPayload::Content { content }) => Some(StreamRecord::Content(content)),
        Ok(StreamPayload::Error { error }) => Some(StreamRecord::Error(error)),
        Err(parse_error) => {
            // One bad record must not poison the rest of the stream.
            emit_record_parse_error(data, &parse_error);
            None
        }
    }
}
