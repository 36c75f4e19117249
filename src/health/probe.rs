//! Single health probe execution.

use std::time::Duration;

use regex::Regex;
use reqwest::{Client, StatusCode};

use crate::config::HealthCheckConfig;
use crate::error::EchoError;

/// One-shot HTTP probe of the monitored endpoint.
///
/// A check passes only when the endpoint answers 200 and the body matches
/// the configured pattern. Every failure mode maps to unhealthy; there is no
/// retry within a check.
pub struct HealthProbe {
    client: Client,
    uri: String,
    pattern: Regex,
}

impl HealthProbe {
    pub fn new(config: &HealthCheckConfig) -> Result<Self, EchoError> {
        let pattern = Regex::new(&config.match_pattern)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            uri: config.uri.clone(),
            pattern,
        })
    }

    /// Run one check against the endpoint.
    pub async fn check(&self) -> bool {
        let response = match self.client.get(&self.uri).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(uri = %self.uri, error = %e, "health check connection failed");
                return false;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::warn!(
                uri = %self.uri,
                status = %response.status(),
                "health check failed: unexpected status code"
            );
            return false;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(uri = %self.uri, error = %e, "health check failed: unreadable body");
                return false;
            }
        };

        if self.pattern.find(&body).is_none() {
            tracing::warn!(
                uri = %self.uri,
                pattern = %self.pattern,
                "health check failed: body did not match pattern"
            );
            return false;
        }

        true
    }
}
