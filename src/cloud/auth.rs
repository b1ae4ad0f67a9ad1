// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! OAuth access tokens for the REST client.
//!
//! Sources are tried in order: an explicit token from the environment, the GCE
//! metadata server, then the local `gcloud` CLI. [`CachedToken`] keeps the winner
//! until shortly before it expires.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::CloudError;

pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const METADATA_TIMEOUT: Duration = Duration::from_secs(2);
/// `gcloud` does not report expiry; its tokens live an hour, reuse a fraction of that.
const GCLOUD_TOKEN_LIFETIME: Duration = Duration::from_secs(10 * 60);
/// Refetch this long before the reported expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub secret: String,
    /// Remaining lifetime at issue; `None` when the source does not expire it.
    pub expires_in: Option<Duration>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_in: Option<Duration>) -> Self {
        Self {
            secret: secret.into(),
            expires_in,
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn access_token(&self) -> Result<AccessToken, CloudError>;
}

/// A fixed token, typically from [`ACCESS_TOKEN_ENV`].
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    fn name(&self) -> &'static str {
        "environment"
    }

    async fn access_token(&self) -> Result<AccessToken, CloudError> {
        Ok(AccessToken::new(self.token.clone(), None))
    }
}

/// The default service account of the VM this process runs on.
pub struct MetadataServerToken {
    http: reqwest::Client,
}

impl MetadataServerToken {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[async_trait]
impl TokenSource for MetadataServerToken {
    fn name(&self) -> &'static str {
        "metadata server"
    }

    async fn access_token(&self) -> Result<AccessToken, CloudError> {
        let response = self
            .http
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|err| CloudError::Auth(format!("metadata server unreachable: {err}")))?;
        if !response.status().is_success() {
            return Err(CloudError::Auth(format!(
                "metadata server returned HTTP {}",
                response.status().as_u16()
            )));
        }
        let token: MetadataToken = response
            .json()
            .await
            .map_err(|err| CloudError::Auth(format!("malformed metadata token: {err}")))?;
        Ok(AccessToken::new(token.access_token, token.expires_in.map(Duration::from_secs)))
    }
}

/// `gcloud auth print-access-token` for local development.
pub struct GcloudCliToken;

#[async_trait]
impl TokenSource for GcloudCliToken {
    fn name(&self) -> &'static str {
        "gcloud CLI"
    }

    async fn access_token(&self) -> Result<AccessToken, CloudError> {
        let output = tokio::process::Command::new("gcloud")
            .args(["auth", "print-access-token"])
            .output()
            .await
            .map_err(|err| CloudError::Auth(format!("cannot run gcloud: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CloudError::Auth(format!("gcloud failed: {}", stderr.trim())));
        }
        let token = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        if token.is_empty() {
            return Err(CloudError::Auth("gcloud printed an empty token".to_owned()));
        }
        Ok(AccessToken::new(token, Some(GCLOUD_TOKEN_LIFETIME)))
    }
}

/// First source that yields a token wins.
pub struct TokenChain {
    sources: Vec<Box<dyn TokenSource>>,
}

impl TokenChain {
    pub fn new(sources: Vec<Box<dyn TokenSource>>) -> Self {
        Self { sources }
    }

    /// Environment token (if set), metadata server, `gcloud`.
    pub fn from_environment(http: reqwest::Client) -> Self {
        let mut sources: Vec<Box<dyn TokenSource>> = Vec::new();
        if let Some(token) =
            std::env::var(ACCESS_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty())
        {
            sources.push(Box::new(StaticToken::new(token.trim())));
        }
        sources.push(Box::new(MetadataServerToken::new(http)));
        sources.push(Box::new(GcloudCliToken));
        Self::new(sources)
    }
}

#[async_trait]
impl TokenSource for TokenChain {
    fn name(&self) -> &'static str {
        "credential chain"
    }

    async fn access_token(&self) -> Result<AccessToken, CloudError> {
        let mut failures = Vec::new();
        for source in &self.sources {
            match source.access_token().await {
                Ok(token) => return Ok(token),
                Err(err) => {
                    tracing::debug!(source = source.name(), error = %err, "token source failed");
                    failures.push(format!("{}: {}", source.name(), err));
                }
            }
        }
        Err(CloudError::Auth(if failures.is_empty() {
            "no credential sources configured".to_owned()
        } else {
            failures.join("; ")
        }))
    }
}

struct Cached {
    token: AccessToken,
    refresh_at: Option<Instant>,
}

/// Reuses the token of `source` until [`REFRESH_MARGIN`] before it expires.
/// Concurrent callers wait for one fetch instead of each running the chain.
pub struct CachedToken<S> {
    source: S,
    cached: Mutex<Option<Cached>>,
}

impl<S: TokenSource> CachedToken<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<S: TokenSource> TokenSource for CachedToken<S> {
    fn name(&self) -> &'static str {
        self.source.name()
    }

    async fn access_token(&self) -> Result<AccessToken, CloudError> {
        let mut cached = self.cached.lock().await;
        let now = Instant::now();
        if let Some(entry) = cached.as_ref() {
            if entry.refresh_at.is_none_or(|refresh_at| now < refresh_at) {
                return Ok(entry.token.clone());
            }
        }

        let token = self.source.access_token().await?;
        let refresh_at =
            token.expires_in.map(|lifetime| now + lifetime.saturating_sub(REFRESH_MARGIN));
        *cached = Some(Cached {
            token: token.clone(),
            refresh_at,
        });
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{AccessToken, CachedToken, StaticToken, TokenChain, TokenSource};
    use crate::cloud::CloudError;

    struct Failing;

    #[async_trait]
    impl TokenSource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn access_token(&self) -> Result<AccessToken, CloudError> {
            Err(CloudError::Auth("nope".to_owned()))
        }
    }

    /// Issues `tok-<n>` tokens living `lifetime`, counting fetches.
    struct Counting {
        fetches: Arc<AtomicUsize>,
        lifetime: Duration,
    }

    #[async_trait]
    impl TokenSource for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn access_token(&self) -> Result<AccessToken, CloudError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(AccessToken::new(format!("tok-{n}"), Some(self.lifetime)))
        }
    }

    fn counting(lifetime: Duration) -> (CachedToken<Counting>, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = Counting {
            fetches: fetches.clone(),
            lifetime,
        };
        (CachedToken::new(source), fetches)
    }

    #[tokio::test]
    async fn chain_returns_first_successful_token() {
        let chain = TokenChain::new(vec![Box::new(Failing), Box::new(StaticToken::new("tok"))]);
        assert_eq!(chain.access_token().await.expect("token").secret, "tok");
    }

    #[tokio::test]
    async fn chain_reports_every_failure() {
        let chain = TokenChain::new(vec![Box::new(Failing), Box::new(Failing)]);
        let err = chain.access_token().await.unwrap_err();
        let message = err.to_string();
        assert_eq!(message.matches("failing:").count(), 2);
    }

    #[tokio::test]
    async fn empty_chain_is_an_auth_error() {
        let err = TokenChain::new(Vec::new()).access_token().await.unwrap_err();
        assert!(matches!(err, CloudError::Auth(_)));
    }

    #[tokio::test]
    async fn cached_token_is_reused_until_near_expiry() {
        let (cache, fetches) = counting(Duration::from_secs(3600));
        for _ in 0..5 {
            assert_eq!(cache.access_token().await.expect("token").secret, "tok-1");
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn short_lived_tokens_are_refetched() {
        // Lifetime inside the refresh margin: never worth keeping.
        let (cache, fetches) = counting(Duration::from_secs(30));
        assert_eq!(cache.access_token().await.expect("token").secret, "tok-1");
        assert_eq!(cache.access_token().await.expect("token").secret, "tok-2");
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = CachedToken::new(Failing);
        cache.access_token().await.unwrap_err();
        cache.access_token().await.unwrap_err();

        let cache = CachedToken::new(StaticToken::new("fixed"));
        let token = cache.access_token().await.expect("token");
        assert_eq!(token.expires_in, None);
        assert!(!format!("{token:?}").contains("fixed"));
    }
}
