use crate::api::client::{ByteStream, MockStreamProducer};
use crate::types::ApiMessage;
use anyhow::Result;
use bytes::Bytes;
use futures::stream;
use std::sync::{Arc, Mutex};

/// Scripted transport for session tests. Each inner vec is the chunk sequence
/// for one turn; chunks are emitted as-is so tests can split records across
/// chunk boundaries.
#[derive(Clone)]
pub struct MockApiClient {
    responses: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockApiClient {
    pub fn new(responses: Vec<Vec<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
        }
    }

    /// Convenience constructor: one turn whose records each get their own
    /// chunk and trailing newline.
    pub fn from_records(records: Vec<&str>) -> Self {
        let chunks = records
            .into_iter()
            .map(|record| format!("{record}\n"))
            .collect();
        Self::new(vec![chunks])
    }
}

impl MockStreamProducer for MockApiClient {
    fn create_mock_stream(&self, _messages: &[ApiMessage]) -> Result<ByteStream> {
        let mut responses_guard = self.responses.lock().unwrap();
        if responses_guard.is_empty() {
            return Err(anyhow::anyhow!(
                "MockApiClient: no more responses configured"
            ));
        }
        let chunks = responses_guard.remove(0);

        let byte_chunks: Vec<Result<Bytes>> =
            chunks.into_iter().map(|s| Ok(Bytes::from(s))).collect();

        Ok(Box::pin(stream::iter(byte_chunks)))
    }
}

/// Transport that fails while the body is being read, after any scripted
/// prefix chunks.
pub struct BrokenStreamProducer {
    pub prefix_chunks: Vec<String>,
}

impl MockStreamProducer for BrokenStreamProducer {
    fn create_mock_stream(&self, _messages: &[ApiMessage]) -> Result<ByteStream> {
        let mut items: Vec<Result<Bytes>> = self
            .prefix_chunks
            .iter()
            .map(|s| Ok(Bytes::from(s.clone())))
            .collect();
        items.push(Err(anyhow::anyhow!("connection reset by peer")));
        Ok(Box::pin(stream::iter(items)))
    }
}

/// Transport that cannot even be opened.
pub struct UnreachableProducer;

impl MockStreamProducer for UnreachableProducer {
    fn create_mock_stream(&self, _messages: &[ApiMessage]) -> Result<ByteStream> {
        Err(anyhow::anyhow!("cannot reach advisor endpoint"))
    }
}
