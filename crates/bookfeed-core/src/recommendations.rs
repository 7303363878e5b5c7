//! Prompted recommendation lookups
//!
//! The recommendation service is an opaque collaborator: one POST with a
//! prompt, one JSON answer.

use crate::client::RequestClient;
use crate::config::RecommendationConfig;
use crate::error::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

/// One recommended title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Why the service picked it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecommendationResponse {
    List(Vec<Recommendation>),
    Wrapped { recommendations: Vec<Recommendation> },
}

impl From<RecommendationResponse> for Vec<Recommendation> {
    fn from(response: RecommendationResponse) -> Self {
        match response {
            RecommendationResponse::List(items) => items,
            RecommendationResponse::Wrapped { recommendations } => recommendations,
        }
    }
}

pub struct RecommendationClient {
    client: Arc<RequestClient>,
    path: String,
}

impl RecommendationClient {
    pub fn new(client: Arc<RequestClient>, config: &RecommendationConfig) -> Self {
        Self {
            client,
            path: config.path.clone(),
        }
    }

    /// Ask for recommendations matching `prompt`
    #[instrument(skip(self, prompt), fields(path = %self.path, prompt_len = prompt.len()))]
    pub async fn recommend(&self, prompt: &str) -> FeedResult<Vec<Recommendation>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(FeedError::invalid_input_field("Prompt cannot be empty", "prompt"));
        }

        let response: RecommendationResponse = self
            .client
            .post_json(&self.path, &json!({ "prompt": prompt }))
            .await?;
        let recommendations = Vec::from(response);

        info!(count = recommendations.len(), "received recommendations");
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn recommendation_client(base_url: &str) -> RecommendationClient {
        let config = ClientConfig::new(base_url).with_request_timeout(Duration::from_millis(200));
        let client = RequestClient::new(config).expect("client should be created");
        RecommendationClient::new(Arc::new(client), &RecommendationConfig::default())
    }

    #[tokio::test]
    async fn test_recommend_accepts_bare_array() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/recommendations"))
            .and(body_json(json!({"prompt": "space opera"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"title": "Hyperion", "author": "Dan Simmons", "reason": "Pilgrims in space"},
                {"title": "Leviathan Wakes", "isbn": "978-0316129084"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let recommendations = recommendation_client(&server.uri())
            .recommend("  space opera ")
            .await
            .unwrap();

        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].author.as_deref(), Some("Dan Simmons"));
        assert_eq!(recommendations[1].author, None);
        assert_eq!(recommendations[1].extra["isbn"], "978-0316129084");
    }

    #[tokio::test]
    async fn test_recommend_accepts_wrapped_list() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/recommendations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "recommendations": [{"title": "Piranesi"}]
            })))
            .mount(&server)
            .await;

        let recommendations = recommendation_client(&server.uri())
            .recommend("quiet fantasy")
            .await
            .unwrap();

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].title, "Piranesi");
    }

    #[tokio::test]
    async fn test_recommend_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/recommendations"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = recommendation_client(&server.uri())
            .recommend("anything")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let err = recommendation_client("http://localhost:1")
            .recommend("   ")
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::InvalidInput { .. }));
    }
}
