//! HTTP client for the Sanity content lake

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ClientError, ContentStore, ImageUrlBuilder, QueryParams};
use crate::config::SanityConfig;
use crate::content::ImageRef;

/// Characters left unescaped in query strings
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    #[serde(rename = "transactionId", default)]
    transaction_id: String,
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: String,
}

/// Content store backed by the Sanity HTTP API
#[derive(Debug, Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    project_id: String,
    dataset: String,
    api_version: String,
    use_cdn: bool,
    token: Option<String>,
    images: ImageUrlBuilder,
}

impl SanityClient {
    /// Build a client from configuration
    pub fn new(config: &SanityConfig) -> Result<Self, ClientError> {
        if config.project_id.is_empty() {
            return Err(ClientError::MissingProjectId);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("inkpost/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
            api_version: config.api_version.trim_start_matches('v').to_string(),
            use_cdn: config.use_cdn.unwrap_or(false),
            token: config.token.clone(),
            images: ImageUrlBuilder::new(&config.project_id, &config.dataset),
        })
    }

    fn host(&self, cdn: bool) -> String {
        let api = if cdn { "apicdn" } else { "api" };
        format!(
            "https://{}.{}.sanity.io/v{}",
            self.project_id, api, self.api_version
        )
    }

    /// Reads go through the CDN only when enabled and unauthenticated
    fn reads_use_cdn(&self) -> bool {
        self.use_cdn && self.token.is_none()
    }

    /// Full GET URL for a query; parameters are JSON-encoded and `$`-prefixed
    pub fn query_url(&self, query: &str, params: &QueryParams) -> String {
        let mut url = format!(
            "{}/data/query/{}?query={}",
            self.host(self.reads_use_cdn()),
            self.dataset,
            utf8_percent_encode(query, QUERY_ENCODE_SET)
        );
        for (name, value) in params {
            url.push_str(&format!(
                "&{}={}",
                utf8_percent_encode(&format!("${}", name), QUERY_ENCODE_SET),
                utf8_percent_encode(&value.to_string(), QUERY_ENCODE_SET)
            ));
        }
        url
    }

    /// Mutation endpoint; never served by the CDN
    pub fn mutate_url(&self) -> String {
        format!("{}/data/mutate/{}", self.host(false), self.dataset)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ClientError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ClientError> {
        let url = self.query_url(query, params);
        tracing::debug!("Query: {}", url);

        let body = self.send(self.http.get(&url)).await?;
        let response: QueryResponse = serde_json::from_str(&body)?;
        Ok(response.result)
    }

    async fn create(&self, doc: Value) -> Result<Value, ClientError> {
        if self.token.is_none() {
            return Err(ClientError::MissingToken);
        }

        let kind = doc.get("_type").cloned().unwrap_or(Value::Null);
        let payload = json!({
            "mutations": [{ "create": doc }],
            "returnIds": true,
        });

        let body = self
            .send(self.http.post(self.mutate_url()).json(&payload))
            .await?;
        let response: MutationResponse = serde_json::from_str(&body)?;
        tracing::debug!("Mutation committed: {}", response.transaction_id);

        let id = response
            .results
            .into_iter()
            .next()
            .map(|r| r.id)
            .unwrap_or_default();
        Ok(json!({ "_id": id, "_type": kind }))
    }

    fn image_url(&self, image: &ImageRef) -> Result<String, ClientError> {
        self.images.url(image)
    }
}
