use super::logging::{debug_payload_enabled, emit_debug_payload};
use crate::config::Config;
use crate::types::ApiMessage;
use crate::util::is_local_endpoint_url;
use anyhow::{anyhow, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::json;
use std::pin::Pin;
#[cfg(test)]
use std::sync::Arc;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

const SYSTEM_PROMPT: &str = "You are a study-abroad advisor helping students choose universities.\n\
Answer questions about programs, costs, admissions and deadlines in plain prose.\n\
When you recommend specific universities, wrap each recommendation in tagged markup exactly:\n\
<college_recommendation>\n\
<name>University name</name>\n\
<country>...</country>\n\
<city>...</city>\n\
<program>...</program>\n\
<tuition_annual>...</tuition_annual>\n\
<living_cost_annual>...</living_cost_annual>\n\
<total_cost_annual>...</total_cost_annual>\n\
<duration>...</duration>\n\
<language>...</language>\n\
<ranking>...</ranking>\n\
<gre_required>...</gre_required>\n\
<ielts_minimum>...</ielts_minimum>\n\
<toefl_minimum>...</toefl_minimum>\n\
<application_deadline>...</application_deadline>\n\
<intake_seasons>...</intake_seasons>\n\
<industry_connections>...</industry_connections>\n\
<scholarships_available>...</scholarships_available>\n\
<why_good_fit>...</why_good_fit>\n\
<official_link>...</official_link>\n\
</college_recommendation>\n\
The <name> field is mandatory; omit any other field you are not sure about.\n\
Never nest recommendation blocks and never emit these tags for anything except a concrete university recommendation.\n\
Keep surrounding prose outside the tags so it reads naturally without them.";

#[cfg(test)]
pub trait MockStreamProducer: Send + Sync {
    fn create_mock_stream(&self, messages: &[ApiMessage]) -> Result<ByteStream>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_url: String,
    #[cfg(test)]
    mock_stream_producer: Option<Arc<dyn MockStreamProducer>>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_url: config.api_url.clone(),
            #[cfg(test)]
            mock_stream_producer: None,
        }
    }

    #[cfg(test)]
    pub fn new_mock(mock_producer: Arc<dyn MockStreamProducer>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: None,
            model: "mock-model".to_string(),
            api_url: "http://localhost:8787/api/chat".to_string(),
            mock_stream_producer: Some(mock_producer),
        }
    }

    pub fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.api_url)
    }

    /// Opens the event transport for one turn. The returned stream yields raw
    /// byte chunks of `data: <JSON>` records terminated by `data: [DONE]`.
    pub async fn create_stream(&self, messages: &[ApiMessage]) -> Result<ByteStream> {
        #[cfg(test)]
        {
            if let Some(producer) = &self.mock_stream_producer {
                return producer.create_mock_stream(messages);
            }
        }

        let payload = json!({
            "model": self.model,
            "stream": true,
            "system": SYSTEM_PROMPT,
            "messages": messages,
        });

        let mut request = self
            .http
            .post(&self.api_url)
            .header("content-type", "application/json")
            .json(&payload);

        if debug_payload_enabled() {
            emit_debug_payload(&self.api_url, &payload);
        }

        if let Some(api_key) = &self.api_key {
            request = request.header("authorization", format!("Bearer {api_key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|error| map_api_request_error(error, &self.api_url))?
            .error_for_status()
            .map_err(|error| map_api_request_error(error, &self.api_url))?;

        let request_url_for_stream = self.api_url.clone();
        let stream = response.bytes_stream().map(move |item| {
            item.map_err(|error| map_api_request_error(error, &request_url_for_stream))
        });
        Ok(Box::pin(stream))
    }
}

fn map_api_request_error(error: reqwest::Error, request_url: &str) -> anyhow::Error {
    if error.is_connect() && is_local_endpoint_url(request_url) {
        return anyhow!(
            "cannot reach local advisor endpoint '{}': {}. Start the gateway or update UNI_API_URL.",
            request_url,
            error
        );
    }
    if error.is_connect() {
        return anyhow!("cannot reach advisor endpoint '{}': {}", request_url, error);
    }
    if error.is_timeout() {
        return anyhow!("request to '{}' timed out: {}", request_url, error);
    }
    if let Some(status) = error.status() {
        return anyhow!(
            "advisor endpoint '{}' returned HTTP {}: {}",
            request_url,
            status,
            error
        );
    }
    anyhow!("request to '{}' failed: {}", request_url, error)
}
