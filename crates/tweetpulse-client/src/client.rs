//! HTTP client for the upstream REST API.
//!
//! Manages the HTTP connection, the credential handshake, and typed response
//! deserialization. Batch endpoints perform one bounded request each; any
//! pagination is the service's concern. A malformed element anywhere in a
//! batch response fails the whole call — no partial record lists are returned.

use std::time::Duration;

use reqwest::{Client, Url};
use tweetpulse_core::{AppConfig, Credentials};

use crate::error::ClientError;
use crate::types::{FriendsResponse, RawPost, RawUser, TokenResponse};

/// Client for the upstream timeline and streaming API.
///
/// Use [`PostClient::connect`] for production or [`PostClient::with_base_url`]
/// to point at a mock server in tests. Construction performs the credential
/// handshake; a client that exists holds a valid bearer token.
pub struct PostClient {
    client: Client,
    bearer: String,
    base_url: Url,
}

impl PostClient {
    /// Connects to the API described by `config` and performs the credential
    /// handshake.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Authentication`] if the handshake is rejected.
    /// - [`ClientError::Http`] if the underlying HTTP client cannot be built
    ///   or the token request fails at the network level.
    pub async fn connect(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.credentials,
            config.request_timeout_secs,
            &config.user_agent,
            &config.api_base_url,
        )
        .await
    }

    /// Connects against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same conditions as [`PostClient::connect`], plus
    /// [`ClientError::Api`] if `base_url` is not a valid URL.
    pub async fn with_base_url(
        credentials: &Credentials,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join resolves endpoint paths under it rather than replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::Api {
            status: 0,
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        let bearer = Self::fetch_token(&client, &base_url, credentials).await?;

        Ok(Self {
            client,
            bearer,
            base_url,
        })
    }

    /// Exchanges the four credential strings for a bearer token.
    ///
    /// The consumer pair authenticates the application via HTTP basic auth;
    /// the account access pair goes in the form body and scopes the returned
    /// token to the account.
    async fn fetch_token(
        client: &Client,
        base_url: &Url,
        credentials: &Credentials,
    ) -> Result<String, ClientError> {
        let url = base_url
            .join("oauth2/token")
            .map_err(|e| ClientError::Authentication(format!("invalid token URL: {e}")))?;

        let response = client
            .post(url)
            .basic_auth(&credentials.consumer_key, Some(&credentials.consumer_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("oauth_token", credentials.access_token.as_str()),
                ("oauth_token_secret", credentials.access_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Authentication(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Authentication(format!("token parse error: {e}")))?;

        Ok(token.access_token)
    }

    /// Fetches the most recent posts on a user's timeline, newest first.
    ///
    /// One bounded request for up to `count` posts; the order is exactly as
    /// supplied by the service.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RateLimited`] on the service's 420/429 markers.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Api`] on any other non-2xx status.
    /// - [`ClientError::Deserialize`] if any element of the response does not
    ///   match the expected shape (the whole call fails).
    pub async fn user_timeline(
        &self,
        screen_name: &str,
        count: u32,
    ) -> Result<Vec<RawPost>, ClientError> {
        let count = count.to_string();
        let url = self.build_url(
            "1.1/statuses/user_timeline.json",
            &[("screen_name", screen_name), ("count", count.as_str())],
        );
        let body = self.get_json(&url).await?;
        let posts: Vec<RawPost> =
            serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
                context: format!("user_timeline(screen_name={screen_name})"),
                source: e,
            })?;
        tracing::debug!(screen_name, count = posts.len(), "fetched user timeline");
        Ok(posts)
    }

    /// Fetches the most recent posts on the authenticated account's home
    /// timeline, newest first.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PostClient::user_timeline`].
    pub async fn home_timeline(&self, count: u32) -> Result<Vec<RawPost>, ClientError> {
        let count = count.to_string();
        let url = self.build_url("1.1/statuses/home_timeline.json", &[("count", count.as_str())]);
        let body = self.get_json(&url).await?;
        let posts: Vec<RawPost> =
            serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
                context: "home_timeline".to_string(),
                source: e,
            })?;
        tracing::debug!(count = posts.len(), "fetched home timeline");
        Ok(posts)
    }

    /// Fetches accounts the given user follows.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PostClient::user_timeline`].
    pub async fn friends(
        &self,
        screen_name: &str,
        count: u32,
    ) -> Result<Vec<RawUser>, ClientError> {
        let count = count.to_string();
        let url = self.build_url(
            "1.1/friends/list.json",
            &[("screen_name", screen_name), ("count", count.as_str())],
        );
        let body = self.get_json(&url).await?;
        let friends: FriendsResponse =
            serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
                context: format!("friends(screen_name={screen_name})"),
                source: e,
            })?;
        Ok(friends.users)
    }

    pub(crate) fn bearer(&self) -> &str {
        &self.bearer
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters.
    pub(crate) fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request with the bearer token, maps the status, and parses
    /// the response body as JSON.
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, ClientError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.bearer)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// Maps non-2xx statuses onto the client error kinds.
    ///
    /// 420 is the service's legacy rate-limit marker and is treated exactly
    /// like 429.
    pub(crate) async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        match status.as_u16() {
            420 | 429 => Err(ClientError::RateLimited {
                status: status.as_u16(),
            }),
            _ if status.is_success() => Ok(response),
            code => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .filter(|body| !body.is_empty())
                    .unwrap_or_else(|| "no response body".to_string());
                Err(ClientError::Api {
                    status: code,
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Handshake-free client for exercising URL construction.
    fn offline_client(base_url: &str) -> PostClient {
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        PostClient {
            client: Client::new(),
            bearer: "test-token".to_string(),
            base_url: Url::parse(&normalised).expect("valid test base URL"),
        }
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = offline_client("https://api.example.com");
        let url = client.build_url(
            "1.1/statuses/user_timeline.json",
            &[("screen_name", "somebody"), ("count", "200")],
        );
        assert_eq!(
            url.as_str(),
            "https://api.example.com/1.1/statuses/user_timeline.json?screen_name=somebody&count=200"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = offline_client("https://api.example.com/");
        let url = client.build_url("1.1/friends/list.json", &[("count", "20")]);
        assert_eq!(
            url.as_str(),
            "https://api.example.com/1.1/friends/list.json?count=20"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = offline_client("https://api.example.com");
        let url = client.build_url("1.1/statuses/filter.json", &[("track", "rust lang,#news")]);
        assert!(
            !url.as_str().contains(' ') && !url.as_str().contains('#'),
            "query params must be percent-encoded: {url}"
        );
    }
}
