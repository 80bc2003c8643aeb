//! # Prompt API client
//!
//! Calls deployed prompt flows over HTTP. Each flow is a POST to
//! `{endpoint}/{flowName}` with `{"data": <input>}`, answered with
//! `{"result": <output>}`.
//!
//! The API key is wrapped in [`SecretString`] and only exposed when building
//! the request header.

use async_trait::async_trait;
use domains::{DomainError, Result, Summarizer, Tagger};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const SUMMARIZE_FLOW: &str = "summarizeBuildDescriptionFlow";
pub const TAGS_FLOW: &str = "generateBuildTagsFlow";

#[derive(Serialize)]
struct FlowRequest<T> {
    data: T,
}

#[derive(Deserialize)]
struct FlowResponse<T> {
    result: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeInput<'a> {
    build_description: &'a str,
}

#[derive(Deserialize)]
struct SummarizeOutput {
    summary: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TagsInput<'a> {
    description: &'a str,
    image_data_uri: &'a str,
}

#[derive(Deserialize)]
struct TagsOutput {
    tags: Vec<String>,
}

pub struct HttpPromptClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl HttpPromptClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<SecretString>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn run_flow<I, O>(&self, flow: &str, input: I) -> Result<O>
    where
        I: Serialize + Send,
        O: DeserializeOwned,
    {
        let url = format!("{}/{flow}", self.endpoint);
        let mut request = self.client.post(&url).json(&FlowRequest { data: input });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::AiService(format!("{flow}: request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::AiService(format!("{flow}: HTTP {status}: {body}")));
        }

        let parsed: FlowResponse<O> = response
            .json()
            .await
            .map_err(|e| DomainError::AiService(format!("{flow}: invalid response: {e}")))?;
        debug!(flow, "prompt flow completed");
        Ok(parsed.result)
    }
}

#[async_trait]
impl Summarizer for HttpPromptClient {
    #[instrument(skip_all)]
    async fn summarize(&self, description: &str) -> Result<String> {
        let output: SummarizeOutput = self
            .run_flow(SUMMARIZE_FLOW, SummarizeInput { build_description: description })
            .await?;
        Ok(output.summary)
    }
}

#[async_trait]
impl Tagger for HttpPromptClient {
    #[instrument(skip_all)]
    async fn tag(&self, description: &str, image_data_uri: &str) -> Result<Vec<String>> {
        let output: TagsOutput = self
            .run_flow(TAGS_FLOW, TagsInput { description, image_data_uri })
            .await?;
        Ok(output.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn flows() -> Router {
        Router::new()
            .route(
                "/summarizeBuildDescriptionFlow",
                post(|Json(body): Json<Value>| async move {
                    let text = body["data"]["buildDescription"].as_str().unwrap_or_default();
                    let summary = format!("summary of {} chars", text.len());
                    Json(json!({ "result": { "summary": summary } }))
                }),
            )
            .route(
                "/generateBuildTagsFlow",
                post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
                    if auth != Some("Bearer k3y") {
                        return Err(StatusCode::UNAUTHORIZED);
                    }
                    assert!(body["data"]["imageDataUri"].as_str().unwrap().starts_with("data:"));
                    Ok(Json(json!({ "result": { "tags": ["castle", "fantasy"] } })))
                }),
            )
    }

    #[tokio::test]
    async fn test_summarize_flow() {
        let endpoint = serve(flows()).await;
        let client = HttpPromptClient::new(format!("{endpoint}/"), None);
        let summary = client.summarize("twelve chars").await.unwrap();
        assert_eq!(summary, "summary of 12 chars");
    }

    #[tokio::test]
    async fn test_tag_flow_sends_api_key() {
        let endpoint = serve(flows()).await;
        let client = HttpPromptClient::new(endpoint, Some(SecretString::from("k3y".to_string())));
        let tags = client.tag("A castle", "data:image/png;base64,AAAA").await.unwrap();
        assert_eq!(tags, vec!["castle", "fantasy"]);
    }

    #[tokio::test]
    async fn test_http_error_is_ai_service_error() {
        let endpoint = serve(flows()).await;
        let client = HttpPromptClient::new(endpoint, None);
        let err = client.tag("A castle", "data:image/png;base64,AAAA").await.unwrap_err();
        assert!(matches!(err, DomainError::AiService(ref msg) if msg.contains("401")));
    }
}
