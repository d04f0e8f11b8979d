//! Model gateway: routing, retry with backoff, and rate-limit cooldown.
//!
//! One entry point, [`ModelGateway::request`], hides two interchangeable
//! backends behind the fallback policy: hosted first unless cooling down,
//! then local, with one cross-backend attempt before a failure propagates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::config::SuggestConfig;
use crate::errors::{BackendKind, SuggestError, SuggestResult};

use super::local::LocalBackend;
use super::openai::OpenAIBackend;
use super::provider::{ChatBackend, ChatMessage, GenerateOptions};

/// Retry policy for one backend.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Total elapsed-time budget across attempts
    pub max_elapsed: Duration,
    /// Base delay for exponential backoff
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Policy for the hosted backend: fail fast, the heuristics are cheap.
    pub fn hosted() -> Self {
        Self {
            max_attempts: 2,
            max_elapsed: Duration::from_secs(30),
            base_delay: Duration::from_millis(500),
        }
    }

    /// Policy for the local backend: longer budget, no rate-limit concern.
    pub fn local() -> Self {
        Self {
            max_attempts: 3,
            max_elapsed: Duration::from_secs(60),
            base_delay: Duration::from_secs(1),
        }
    }

    /// Backoff delay before the given retry (1-based attempt index).
    fn delay(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(2u32.saturating_pow(attempt - 1));
        exp.min(Duration::from_secs(5))
    }
}

/// Time-boxed rate-limit cooldown for the hosted backend.
///
/// Replaces a sticky process-wide flag: a 429 sets a deadline, after which
/// the hosted path opens again. Reads and writes are relaxed atomics; under
/// concurrent load two requests may race to set the deadline, which is fine
/// for a soft hint. This is best-effort, not a guarded critical section.
pub struct RateLimiter {
    cooldown: Duration,
    limited_until_ms: AtomicU64,
}

impl RateLimiter {
    /// Create a limiter with the given cooldown window.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            limited_until_ms: AtomicU64::new(0),
        }
    }

    /// Whether the cooldown window is currently open.
    pub fn is_limited(&self) -> bool {
        now_ms() < self.limited_until_ms.load(Ordering::Relaxed)
    }

    /// Start (or extend) the cooldown window.
    pub fn trip(&self) {
        let until = now_ms() + self.cooldown.as_millis() as u64;
        self.limited_until_ms.store(until, Ordering::Relaxed);
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Result of a gateway health probe.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GatewayHealth {
    pub hosted_configured: bool,
    pub local_configured: bool,
    /// Whether a trivial probe message produced a completion
    pub responsive: bool,
    /// Error text when not responsive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Fallback-aware entry point to the two chat backends.
pub struct ModelGateway {
    hosted: Option<Arc<dyn ChatBackend>>,
    local: Option<Arc<dyn ChatBackend>>,
    hosted_policy: RetryPolicy,
    local_policy: RetryPolicy,
    limiter: RateLimiter,
}

impl ModelGateway {
    /// Build a gateway with explicit backends. `None` means unconfigured.
    pub fn new(
        hosted: Option<Arc<dyn ChatBackend>>,
        local: Option<Arc<dyn ChatBackend>>,
    ) -> Self {
        Self {
            hosted,
            local,
            hosted_policy: RetryPolicy::hosted(),
            local_policy: RetryPolicy::local(),
            limiter: RateLimiter::new(Duration::from_secs(300)),
        }
    }

    /// Build a gateway from configuration.
    pub fn from_config(config: &SuggestConfig) -> Self {
        let hosted: Option<Arc<dyn ChatBackend>> = config.openai_api_key.as_ref().map(|key| {
            Arc::new(OpenAIBackend::new(key).with_model(config.openai_model.clone()))
                as Arc<dyn ChatBackend>
        });
        let local: Option<Arc<dyn ChatBackend>> = config
            .local_llm_url
            .as_ref()
            .map(|url| Arc::new(LocalBackend::new(url)) as Arc<dyn ChatBackend>);

        Self {
            hosted,
            local,
            hosted_policy: RetryPolicy::hosted(),
            local_policy: RetryPolicy::local(),
            limiter: RateLimiter::new(Duration::from_secs(config.rate_limit_cooldown_secs)),
        }
    }

    /// Build a gateway from the environment.
    pub fn from_env() -> Self {
        Self::from_config(&SuggestConfig::from_env())
    }

    /// Override a retry policy (mainly for tests).
    pub fn with_policies(mut self, hosted: RetryPolicy, local: RetryPolicy) -> Self {
        self.hosted_policy = hosted;
        self.local_policy = local;
        self
    }

    /// Whether the hosted backend is configured.
    pub fn hosted_configured(&self) -> bool {
        self.hosted.as_ref().is_some_and(|b| b.is_configured())
    }

    /// Whether the local backend is configured.
    pub fn local_configured(&self) -> bool {
        self.local.as_ref().is_some_and(|b| b.is_configured())
    }

    /// Whether the hosted backend is currently cooling down.
    pub fn rate_limited(&self) -> bool {
        self.limiter.is_limited()
    }

    /// Call the hosted backend with its retry policy.
    ///
    /// A rate-limit signal aborts retries immediately and starts the
    /// cooldown window.
    pub async fn call_hosted(&self, messages: &[ChatMessage]) -> SuggestResult<String> {
        let backend = self.hosted.as_ref().ok_or(SuggestError::NotConfigured {
            backend: BackendKind::Hosted,
        })?;
        self.call_with_retry(backend.as_ref(), self.hosted_policy, messages)
            .await
    }

    /// Call the local backend with its retry policy.
    pub async fn call_local(&self, messages: &[ChatMessage]) -> SuggestResult<String> {
        let backend = self.local.as_ref().ok_or(SuggestError::NotConfigured {
            backend: BackendKind::Local,
        })?;
        self.call_with_retry(backend.as_ref(), self.local_policy, messages)
            .await
    }

    /// Fallback-aware request.
    ///
    /// Policy: hosted if configured and not cooling down, else local. On a
    /// primary failure the other configured backend gets one attempt before
    /// the original error propagates. A 429 trips the cooldown either way.
    pub async fn request(&self, messages: &[ChatMessage]) -> SuggestResult<String> {
        let use_hosted = self.hosted_configured() && !self.limiter.is_limited();

        let primary = if use_hosted {
            BackendKind::Hosted
        } else if self.local_configured() {
            BackendKind::Local
        } else if self.hosted_configured() {
            // Hosted exists but is cooling down and there is nothing else.
            return Err(SuggestError::RateLimited);
        } else {
            return Err(SuggestError::NoBackendConfigured);
        };

        debug!(backend = %primary, "dispatching model request");

        let primary_err = match primary {
            BackendKind::Hosted => match self.call_hosted(messages).await {
                Ok(text) => return Ok(text),
                Err(e) => e,
            },
            BackendKind::Local => match self.call_local(messages).await {
                Ok(text) => return Ok(text),
                Err(e) => e,
            },
        };

        // One cross-backend attempt before the original failure propagates.
        let other = match primary {
            BackendKind::Hosted if self.local_configured() => Some(BackendKind::Local),
            BackendKind::Local if self.hosted_configured() && !self.limiter.is_limited() => {
                Some(BackendKind::Hosted)
            }
            _ => None,
        };

        if let Some(other) = other {
            warn!(
                primary = %primary,
                fallback = %other,
                error = %primary_err,
                "primary backend failed, trying fallback once"
            );
            let attempt = match other {
                BackendKind::Hosted => self.single_attempt(BackendKind::Hosted, messages).await,
                BackendKind::Local => self.single_attempt(BackendKind::Local, messages).await,
            };
            if let Ok(text) = attempt {
                return Ok(text);
            }
        }

        Err(primary_err)
    }

    /// Probe both backends with a trivial message.
    pub async fn probe(&self) -> GatewayHealth {
        let hosted_configured = self.hosted_configured();
        let local_configured = self.local_configured();

        if !hosted_configured && !local_configured {
            return GatewayHealth {
                hosted_configured,
                local_configured,
                responsive: false,
                detail: Some(SuggestError::NoBackendConfigured.to_string()),
            };
        }

        let probe = [ChatMessage::user(
            "Hello, this is a connectivity test. Please respond with \"OK\".",
        )];
        match self.request(&probe).await {
            Ok(_) => GatewayHealth {
                hosted_configured,
                local_configured,
                responsive: true,
                detail: None,
            },
            Err(e) => GatewayHealth {
                hosted_configured,
                local_configured,
                responsive: false,
                detail: Some(e.to_string()),
            },
        }
    }

    /// One attempt against a backend, no retries. Used for the cross-backend
    /// fallback step.
    async fn single_attempt(
        &self,
        kind: BackendKind,
        messages: &[ChatMessage],
    ) -> SuggestResult<String> {
        let backend = match kind {
            BackendKind::Hosted => self.hosted.as_ref(),
            BackendKind::Local => self.local.as_ref(),
        }
        .ok_or(SuggestError::NotConfigured { backend: kind })?;

        let result = backend
            .complete(messages, &GenerateOptions::default())
            .await;
        if let Err(e) = &result {
            if e.is_rate_limit() {
                self.limiter.trip();
            }
        }
        result
    }

    /// Retry loop with exponential backoff and tagged-failure dispatch.
    ///
    /// Terminal errors (rate limit, not configured, parse) break out
    /// immediately; a rate limit additionally trips the cooldown. A spent
    /// elapsed-time budget aborts just like running out of attempts.
    async fn call_with_retry(
        &self,
        backend: &dyn ChatBackend,
        policy: RetryPolicy,
        messages: &[ChatMessage],
    ) -> SuggestResult<String> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match backend
                .complete(messages, &GenerateOptions::default())
                .await
            {
                Ok(text) => {
                    if attempt > 1 {
                        debug!(
                            backend = %backend.kind(),
                            attempt,
                            "request succeeded after retry"
                        );
                    }
                    return Ok(text);
                }
                Err(e) => {
                    if e.is_rate_limit() {
                        self.limiter.trip();
                        warn!(backend = %backend.kind(), "rate limited, cooldown started");
                        return Err(e);
                    }
                    if !e.is_retryable() {
                        return Err(e);
                    }

                    let delay = policy.delay(attempt);
                    if attempt >= policy.max_attempts
                        || started.elapsed() + delay > policy.max_elapsed
                    {
                        return Err(e);
                    }

                    warn!(
                        backend = %backend.kind(),
                        attempt,
                        max_attempts = policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "backend call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct ScriptedBackend {
        kind: BackendKind,
        calls: AtomicUsize,
        results: Vec<SuggestResult<String>>,
    }

    impl ScriptedBackend {
        fn new(kind: BackendKind, results: Vec<SuggestResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                calls: AtomicUsize::new(0),
                results,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        fn kind(&self) -> BackendKind {
            self.kind
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: &GenerateOptions,
        ) -> SuggestResult<String> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .get(idx.min(self.results.len() - 1))
                .cloned()
                .unwrap_or(Err(SuggestError::NoBackendConfigured))
        }
    }

    fn fast_policies(gateway: ModelGateway) -> ModelGateway {
        let policy = RetryPolicy {
            max_attempts: 2,
            max_elapsed: Duration::from_secs(5),
            base_delay: Duration::from_millis(1),
        };
        gateway.with_policies(policy, policy)
    }

    #[tokio::test]
    async fn test_no_backend_configured() {
        let gateway = ModelGateway::new(None, None);
        let err = gateway.request(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, SuggestError::NoBackendConfigured));
    }

    #[tokio::test]
    async fn test_hosted_preferred_when_available() {
        let hosted = ScriptedBackend::new(BackendKind::Hosted, vec![Ok("from hosted".into())]);
        let local = ScriptedBackend::new(BackendKind::Local, vec![Ok("from local".into())]);
        let gateway = fast_policies(ModelGateway::new(
            Some(hosted.clone()),
            Some(local.clone()),
        ));

        let text = gateway.request(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(text, "from hosted");
        assert_eq!(local.call_count(), 0);
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let hosted = ScriptedBackend::new(
            BackendKind::Hosted,
            vec![
                Err(SuggestError::Timeout {
                    backend: BackendKind::Hosted,
                }),
                Ok("second try".into()),
            ],
        );
        let gateway = fast_policies(ModelGateway::new(Some(hosted.clone()), None));

        let text = gateway.request(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(text, "second try");
        assert_eq!(hosted.call_count(), 2);
    }

    #[tokio::test]
    async fn test_spent_elapsed_budget_aborts_retries() {
        let hosted = ScriptedBackend::new(
            BackendKind::Hosted,
            vec![Err(SuggestError::Timeout {
                backend: BackendKind::Hosted,
            })],
        );
        // Attempts remain, but the first backoff delay already overruns
        // the elapsed-time budget.
        let tight = RetryPolicy {
            max_attempts: 3,
            max_elapsed: Duration::from_millis(1),
            base_delay: Duration::from_millis(20),
        };
        let gateway =
            ModelGateway::new(Some(hosted.clone()), None).with_policies(tight, tight);

        let err = gateway.request(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, SuggestError::Timeout { .. }));
        assert_eq!(hosted.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_terminal_and_trips_cooldown() {
        let hosted = ScriptedBackend::new(
            BackendKind::Hosted,
            vec![Err(SuggestError::RateLimited)],
        );
        let gateway = fast_policies(ModelGateway::new(Some(hosted.clone()), None));

        let err = gateway.request(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(err.is_rate_limit());
        // No retry after a 429.
        assert_eq!(hosted.call_count(), 1);
        assert!(gateway.rate_limited());

        // While cooling down with no local backend, requests short-circuit.
        let err = gateway.request(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(err.is_rate_limit());
        assert_eq!(hosted.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_hosted_falls_back_to_local() {
        let hosted = ScriptedBackend::new(
            BackendKind::Hosted,
            vec![Err(SuggestError::RateLimited)],
        );
        let local = ScriptedBackend::new(BackendKind::Local, vec![Ok("local ok".into())]);
        let gateway = fast_policies(ModelGateway::new(
            Some(hosted.clone()),
            Some(local.clone()),
        ));

        let text = gateway.request(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(text, "local ok");
        assert!(gateway.rate_limited());

        // Next request goes straight to local.
        let text = gateway.request(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(text, "local ok");
        assert_eq!(hosted.call_count(), 1);
    }

    #[tokio::test]
    async fn test_primary_failure_propagates_original_error() {
        let hosted = ScriptedBackend::new(
            BackendKind::Hosted,
            vec![Err(SuggestError::BackendUnreachable {
                backend: BackendKind::Hosted,
                reason: "down".into(),
            })],
        );
        let local = ScriptedBackend::new(
            BackendKind::Local,
            vec![Err(SuggestError::Timeout {
                backend: BackendKind::Local,
            })],
        );
        let gateway = fast_policies(ModelGateway::new(Some(hosted), Some(local)));

        let err = gateway.request(&[ChatMessage::user("hi")]).await.unwrap_err();
        // The hosted (primary) error wins, not the fallback's.
        assert!(matches!(
            err,
            SuggestError::BackendUnreachable {
                backend: BackendKind::Hosted,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_probe_reports_configuration() {
        let gateway = ModelGateway::new(None, None);
        let health = gateway.probe().await;
        assert!(!health.hosted_configured);
        assert!(!health.local_configured);
        assert!(!health.responsive);

        let local = ScriptedBackend::new(BackendKind::Local, vec![Ok("OK".into())]);
        let gateway = fast_policies(ModelGateway::new(None, Some(local)));
        let health = gateway.probe().await;
        assert!(health.local_configured);
        assert!(health.responsive);
    }

    #[test]
    fn test_rate_limiter_cooldown_expiry() {
        let limiter = RateLimiter::new(Duration::from_millis(0));
        assert!(!limiter.is_limited());
        limiter.trip();
        // Zero cooldown expires immediately.
        assert!(!limiter.is_limited());

        let limiter = RateLimiter::new(Duration::from_secs(60));
        limiter.trip();
        assert!(limiter.is_limited());
    }

    #[test]
    fn test_backoff_delay_growth() {
        let policy = RetryPolicy::local();
        assert_eq!(policy.delay(1), Duration::from_secs(1));
        assert_eq!(policy.delay(2), Duration::from_secs(2));
        assert_eq!(policy.delay(3), Duration::from_secs(4));
        // Capped.
        assert_eq!(policy.delay(5), Duration::from_secs(5));
    }
}
