//! Repository-hosting integration.
//! Defines the `RepositoryHost` seam used by the publisher and its GitHub
//! implementation on top of blocking `reqwest`.

use crate::config::GitHubConfig;
use crate::constants::REPOSITORY_DESCRIPTION;
use crate::error::{Error, Result};
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Bearer credential obtained from the OAuth exchange. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(****)")
    }
}

/// A repository created by a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRepository {
    pub owner_name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Operations the publisher needs from a repository-hosting provider.
pub trait RepositoryHost: Send + Sync {
    /// Whether the integration is configured at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Exchanges an authorization code and state nonce for an access token.
    fn fetch_access_token(&self, code: &str, state: &str) -> Result<AccessToken>;

    /// Resolves the login name of the token's account.
    fn login(&self, token: &AccessToken) -> Result<String>;

    fn repository_exists(&self, owner: &str, token: &AccessToken, name: &str) -> Result<bool>;

    /// Creates a repository named `name` for the authenticated account.
    fn create_repository(
        &self,
        owner: &str,
        token: &AccessToken,
        name: &str,
    ) -> Result<RemoteRepository>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    owner: OwnerResponse,
    clone_url: String,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
}

/// Parses the token endpoint body: JSON, form-encoded, or the bare token.
pub fn parse_token_response(body: &str) -> Result<AccessToken> {
    let trimmed = body.trim();
    let parsed = match serde_json::from_str::<TokenResponse>(trimmed) {
        Ok(parsed) => parsed,
        Err(_) if is_bare_token(trimmed) => return Ok(AccessToken::new(trimmed)),
        Err(_) => {
            let mut parsed =
                TokenResponse { access_token: None, error: None, error_description: None };
            for (key, value) in url::form_urlencoded::parse(trimmed.as_bytes()) {
                match key.as_ref() {
                    "access_token" => parsed.access_token = Some(value.into_owned()),
                    "error" => parsed.error = Some(value.into_owned()),
                    "error_description" => parsed.error_description = Some(value.into_owned()),
                    _ => {}
                }
            }
            parsed
        }
    };

    match parsed {
        TokenResponse { access_token: Some(token), .. } if !token.is_empty() => {
            Ok(AccessToken::new(token))
        }
        TokenResponse { error_description: Some(description), .. } => Err(Error::Auth(description)),
        TokenResponse { error: Some(error), .. } => Err(Error::Auth(error)),
        _ => Err(Error::Auth("malformed token response".to_string())),
    }
}

/// A body that is neither JSON nor `key=value` pairs is the token itself.
fn is_bare_token(body: &str) -> bool {
    !body.is_empty()
        && !body.contains('=')
        && !body.starts_with(['{', '[', '"'])
        && !body.chars().any(char::is_whitespace)
}

/// Extracts the provider's message from an error response.
fn provider_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { message: Some(message), errors }) => {
            let details: Vec<String> = errors.into_iter().filter_map(|e| e.message).collect();
            if details.is_empty() {
                message
            } else {
                format!("{message}: {}", details.join(", "))
            }
        }
        _ => format!("unexpected status {status}"),
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    Error::remote(format!("request failed: {e}"))
}

/// GitHub implementation of `RepositoryHost`.
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
}

impl GitHubClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    /// * `Error::Configuration` if the HTTP client cannot be built
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Configuration(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| Error::Configuration(format!("invalid GitHub API url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::Configuration("GitHub API url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url, token: &AccessToken) -> Result<Response> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .bearer_auth(token.secret())
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .map_err(transport_error)
    }
}

impl RepositoryHost for GitHubClient {
    fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Exchanges the code through the OAuth token endpoint.
    ///
    /// # Errors
    /// * `Error::Configuration` if client id or secret are missing
    /// * `Error::Auth` on a non-success status or a body without a token
    fn fetch_access_token(&self, code: &str, state: &str) -> Result<AccessToken> {
        let (client_id, client_secret) = self.config.credentials()?;
        let body = serde_json::json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "state": state,
            "code": code,
        });

        debug!("POST {}", self.config.oauth_url);
        let response = self
            .client
            .post(&self.config.oauth_url)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Auth(format!("token endpoint answered {status}")));
        }
        let text = response
            .text()
            .map_err(|e| Error::Auth(format!("unreadable token response: {e}")))?;
        parse_token_response(&text)
    }

    fn login(&self, token: &AccessToken) -> Result<String> {
        let response = self.get(self.endpoint(&["user"])?, token)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Auth(format!("access token rejected ({status})")));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::remote(provider_message(status, &body)));
        }
        let user: UserResponse = response
            .json()
            .map_err(|e| Error::Auth(format!("malformed user response: {e}")))?;
        Ok(user.login)
    }

    fn repository_exists(&self, owner: &str, token: &AccessToken, name: &str) -> Result<bool> {
        let response = self.get(self.endpoint(&["repos", owner, name])?, token)?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(Error::Auth(format!("access token rejected ({status})")))
            }
            status => {
                let body = response.text().unwrap_or_default();
                Err(Error::remote(provider_message(status, &body)))
            }
        }
    }

    /// Creates the repository with the generator's description tag.
    ///
    /// # Errors
    /// * `Error::RemoteService` carrying the provider's message on failure
    fn create_repository(
        &self,
        owner: &str,
        token: &AccessToken,
        name: &str,
    ) -> Result<RemoteRepository> {
        let url = self.endpoint(&["user", "repos"])?;
        debug!("POST {} (repository '{}/{}')", url, owner, name);
        let response = self
            .client
            .post(url)
            .bearer_auth(token.secret())
            .header(ACCEPT, GITHUB_JSON)
            .json(&CreateRepositoryRequest {
                name,
                description: REPOSITORY_DESCRIPTION,
                private: false,
                auto_init: false,
            })
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::remote(format!(
                "could not create repository '{name}': {}",
                provider_message(status, &body)
            )));
        }

        let created: RepositoryResponse = response
            .json()
            .map_err(|e| Error::remote(format!("malformed repository response: {e}")))?;
        Ok(RemoteRepository {
            owner_name: created.owner.login,
            url: created.clone_url,
            created_at: created.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("gho_secret");
        assert_eq!(format!("{:?}", token), "AccessToken(****)");
    }

    #[test]
    fn test_provider_message() {
        let body = r#"{"message":"Repository creation failed.","errors":[{"message":"name already exists on this account"}]}"#;
        assert_eq!(
            provider_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "Repository creation failed.: name already exists on this account"
        );
        assert_eq!(
            provider_message(StatusCode::BAD_GATEWAY, "<html>"),
            "unexpected status 502 Bad Gateway"
        );
    }
}
