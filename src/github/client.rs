use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};

const USER_AGENT: &str = "gitwrapped/0.1";

/// Authenticated GitHub transport: plain REST GETs plus the GraphQL endpoint,
/// both with retry/backoff and rate-limit fault translation.
///
/// Every failed attempt (network error, non-2xx status, rate-limit 403,
/// malformed body) is retried up to `retries` times with exponential backoff;
/// the last failure propagates unchanged. A 403 is not slept through until the
/// reset instant — it is surfaced like any other failure, with the reset time
/// embedded in the message when GitHub provides one.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    graphql_url: String,
    retries: u32,
    retry_delay: Duration,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = &config.github_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            graphql_url: format!("{}/graphql", config.api_url),
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// REST GET. `path` is joined to the API base URL; absolute URLs pass
    /// through unchanged.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        };

        let mut attempt = 0;
        loop {
            match self.try_get(&url).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.retries => {
                    tracing::debug!(url = %url, attempt, error = %err, "GET failed, retrying");
                    tokio::time::sleep(self.backoff(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// GraphQL POST. `T` deserializes the `data` field of the envelope.
    pub async fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let mut attempt = 0;
        loop {
            match self.try_graphql(query, &variables).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.retries => {
                    tracing::debug!(attempt, error = %err, "GraphQL call failed, retrying");
                    tokio::time::sleep(self.backoff(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay * 2u32.pow(attempt)
    }

    async fn try_get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        check_rate_limit(&response)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    async fn try_graphql<T: DeserializeOwned>(&self, query: &str, variables: &Value) -> Result<T> {
        let response = self
            .client
            .post(&self.graphql_url)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        check_rate_limit(&response)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GraphQlApi {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlEnvelope<T> = response.json().await?;
        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GraphQl(messages.join("; ")));
        }
        envelope.data.ok_or(Error::NoData)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

fn check_rate_limit(response: &Response) -> Result<()> {
    if response.status() != StatusCode::FORBIDDEN {
        return Ok(());
    }
    let reset_at = response
        .headers()
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    Err(Error::RateLimited(reset_at))
}
