//! Edge provider integration for custom domain routing
//!
//! Custom domains are attached to the running application through the edge
//! provider's GraphQL API. The provider is also the source of truth for
//! whether a tenant's DNS records have propagated: `check_domain` asks it to
//! confirm the routing and ownership records rather than resolving DNS here.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

/// Client for the external domain-routing provider
#[derive(Debug, Clone)]
pub struct EdgeClient {
    client: Client,
    api_url: String,
    api_token: String,
    app_name: String,
}

/// Outcome of an attach call
#[derive(Debug, Clone)]
pub struct DomainAttachment {
    pub hostname: String,
    /// Whether the provider already sees the routing DNS in place
    pub configured: bool,
}

/// Outcome of a verification check
#[derive(Debug, Clone)]
pub struct DomainCheck {
    /// Provider confirmed both routing and ownership records
    pub configured: bool,
}

/// Errors from provider calls
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Connection failures and timeouts; safe to retry
    #[error("provider request failed: {0}")]
    Network(String),

    /// Non-success HTTP status from the provider
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider-side rejection (GraphQL errors); not retried
    #[error("provider rejected request: {0}")]
    Rejected(String),

    /// Response body did not match the expected shape
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Whether a retry with backoff is worthwhile
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Network(_) => true,
            ProviderError::Status { status, .. } => *status >= 500,
            ProviderError::Rejected(_) | ProviderError::Malformed(_) => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct GraphQLRequest<V: Serialize> {
    query: &'static str,
    variables: V,
}

#[derive(Debug, Serialize)]
struct HostnameVariables {
    #[serde(rename = "appId")]
    app_id: String,
    hostname: String,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<D> {
    data: Option<D>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct AttachData {
    #[serde(rename = "attachDomain")]
    attach_domain: Option<DomainPayload>,
}

#[derive(Debug, Deserialize)]
struct CheckData {
    #[serde(rename = "checkDomain")]
    check_domain: Option<DomainPayload>,
}

#[derive(Debug, Deserialize)]
struct DetachData {
    #[serde(rename = "detachDomain")]
    detach_domain: Option<DomainPayload>,
}

#[derive(Debug, Deserialize)]
struct DomainPayload {
    domain: Option<DomainInfo>,
}

#[derive(Debug, Deserialize)]
struct DomainInfo {
    hostname: Option<String>,
    configured: Option<bool>,
}

const ATTACH_MUTATION: &str = r#"
    mutation($appId: ID!, $hostname: String!) {
        attachDomain(appId: $appId, hostname: $hostname) {
            domain {
                hostname
                configured
            }
        }
    }
"#;

const CHECK_MUTATION: &str = r#"
    mutation($appId: ID!, $hostname: String!) {
        checkDomain(appId: $appId, hostname: $hostname) {
            domain {
                hostname
                configured
            }
        }
    }
"#;

const DETACH_MUTATION: &str = r#"
    mutation($appId: ID!, $hostname: String!) {
        detachDomain(appId: $appId, hostname: $hostname) {
            domain {
                hostname
            }
        }
    }
"#;

impl EdgeClient {
    /// Create a new provider client. Every call shares one bounded timeout;
    /// an admin is waiting synchronously on these, so nothing may hang.
    pub fn new(
        api_url: String,
        api_token: String,
        app_name: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self {
            client,
            api_url,
            api_token,
            app_name,
        })
    }

    /// Attach a custom domain to the application.
    ///
    /// Idempotent: the provider reporting the domain already exists is
    /// treated as success, since its own state is the source of truth.
    pub async fn attach_domain(&self, hostname: &str) -> Result<DomainAttachment, ProviderError> {
        let response: GraphQLResponse<AttachData> = self
            .post(ATTACH_MUTATION, hostname)
            .await?;

        if let Some(errors) = response.errors {
            let message = join_messages(&errors);
            if message.contains("already exists") {
                info!("Domain {} already attached at provider", hostname);
                return Ok(DomainAttachment {
                    hostname: hostname.to_string(),
                    configured: false,
                });
            }
            error!("Provider rejected attach for {}: {}", hostname, message);
            return Err(ProviderError::Rejected(message));
        }

        let domain = response
            .data
            .and_then(|d| d.attach_domain)
            .and_then(|p| p.domain)
            .ok_or_else(|| ProviderError::Malformed("no domain data in attach response".into()))?;

        info!("Attached domain {} at provider", hostname);
        Ok(DomainAttachment {
            hostname: domain.hostname.unwrap_or_else(|| hostname.to_string()),
            configured: domain.configured.unwrap_or(false),
        })
    }

    /// Ask the provider to re-check DNS for a domain and report whether the
    /// routing and ownership records are in place.
    pub async fn check_domain(&self, hostname: &str) -> Result<DomainCheck, ProviderError> {
        let response: GraphQLResponse<CheckData> = self.post(CHECK_MUTATION, hostname).await?;

        if let Some(errors) = response.errors {
            let message = join_messages(&errors);
            error!("Provider rejected check for {}: {}", hostname, message);
            return Err(ProviderError::Rejected(message));
        }

        let domain = response
            .data
            .and_then(|d| d.check_domain)
            .and_then(|p| p.domain)
            .ok_or_else(|| ProviderError::Malformed("no domain data in check response".into()))?;

        Ok(DomainCheck {
            configured: domain.configured.unwrap_or(false),
        })
    }

    /// Detach a custom domain from the application.
    ///
    /// Callers must treat a failure here as fatal for the removal flow: the
    /// local record may only be deleted once the provider stopped routing.
    pub async fn detach_domain(&self, hostname: &str) -> Result<(), ProviderError> {
        let response: GraphQLResponse<DetachData> = self.post(DETACH_MUTATION, hostname).await?;

        if let Some(errors) = response.errors {
            let message = join_messages(&errors);
            // Nothing left to detach counts as detached
            if message.contains("not found") {
                info!("Domain {} already absent at provider", hostname);
                return Ok(());
            }
            error!("Provider rejected detach for {}: {}", hostname, message);
            return Err(ProviderError::Rejected(message));
        }

        // The payload itself is informational; a GraphQL-error-free response
        // means the provider accepted the detach.
        let _ = response.data.and_then(|d| d.detach_domain);
        info!("Detached domain {} at provider", hostname);
        Ok(())
    }

    async fn post<D: for<'de> Deserialize<'de>>(
        &self,
        query: &'static str,
        hostname: &str,
    ) -> Result<GraphQLResponse<D>, ProviderError> {
        let request = GraphQLRequest {
            query,
            variables: HostnameVariables {
                app_id: self.app_name.clone(),
                hostname: hostname.to_string(),
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Provider returned error status {}: {}", status, body);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> EdgeClient {
        EdgeClient::new(
            url.to_string(),
            "test-token".to_string(),
            "hireboard-edge".to_string(),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_attach_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(
                r#"{"data":{"attachDomain":{"domain":{"hostname":"careers.acme.io","configured":false}}}}"#,
            )
            .create_async()
            .await;

        let result = client(&server.url()).attach_domain("careers.acme.io").await.unwrap();
        assert_eq!(result.hostname, "careers.acme.io");
        assert!(!result.configured);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_attach_already_exists_is_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"errors":[{"message":"Hostname already exists on app"}]}"#)
            .create_async()
            .await;

        let result = client(&server.url()).attach_domain("careers.acme.io").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_attach_rejection_is_not_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"errors":[{"message":"Hostname is invalid"}]}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .attach_domain("bad host")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rejected(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_check_reports_configured() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                r#"{"data":{"checkDomain":{"domain":{"hostname":"careers.acme.io","configured":true}}}}"#,
            )
            .create_async()
            .await;

        let check = client(&server.url()).check_domain("careers.acme.io").await.unwrap();
        assert!(check.configured);
    }

    #[tokio::test]
    async fn test_detach_not_found_is_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"errors":[{"message":"Hostname not found"}]}"#)
            .create_async()
            .await;

        let result = client(&server.url()).detach_domain("careers.acme.io").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client(&server.url())
            .check_domain("careers.acme.io")
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }
}
