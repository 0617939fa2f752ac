use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,   // Calls go through
    Open,     // Upstream considered down, calls rejected until the cooldown ends
    HalfOpen, // Probing: calls go through, one failure reopens
}

/// Thresholds for a [`CircuitBreaker`]
#[derive(Debug, Clone, Copy)]
pub struct BreakerSettings {
    /// Consecutive failures that open a closed circuit
    pub failure_threshold: usize,
    /// Consecutive half-open successes that close the circuit again
    pub success_threshold: usize,
    /// Time an open circuit waits before probing
    pub cooldown: Duration,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: usize,
    probe_successes: usize,
    opened_at: Option<Instant>,
}

impl BreakerState {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            probe_successes: 0,
            opened_at: None,
        }
    }

    /// Time left before an open circuit may be probed, or `None` if calls may proceed.
    fn admit(&mut self, settings: &BreakerSettings, now: Instant) -> Option<Duration> {
        if self.state != CircuitState::Open {
            return None;
        }
        let elapsed = self
            .opened_at
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or(settings.cooldown);
        if elapsed >= settings.cooldown {
            self.state = CircuitState::HalfOpen;
            self.probe_successes = 0;
            None
        } else {
            Some(settings.cooldown - elapsed)
        }
    }

    fn record_success(&mut self, settings: &BreakerSettings) {
        self.consecutive_failures = 0;
        if self.state == CircuitState::HalfOpen {
            self.probe_successes += 1;
            if self.probe_successes >= settings.success_threshold {
                self.state = CircuitState::Closed;
                self.probe_successes = 0;
                self.opened_at = None;
            }
        }
    }

    fn record_failure(&mut self, settings: &BreakerSettings, now: Instant) {
        self.consecutive_failures += 1;
        let trip = match self.state {
            CircuitState::Closed => self.consecutive_failures >= settings.failure_threshold,
            CircuitState::HalfOpen => true,
            CircuitState::Open => false,
        };
        if trip {
            self.state = CircuitState::Open;
            self.probe_successes = 0;
            self.opened_at = Some(now);
        }
    }
}

/// Stops hammering an upstream that keeps failing.
pub struct CircuitBreaker {
    name: String,
    settings: BreakerSettings,
    state: RwLock<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, settings: BreakerSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            state: RwLock::new(BreakerState::new()),
        }
    }

    /// Run `f` unless the circuit is open.
    pub async fn call<F, T, E>(&self, f: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: std::future::Future<Output = Result<T, E>>,
    {
        {
            let mut state = self.state.write().await;
            let before = state.state;
            if let Some(remaining) = state.admit(&self.settings, Instant::now()) {
                return Err(CircuitBreakerError::Open {
                    name: self.name.clone(),
                    retry_in: remaining,
                });
            }
            if before != state.state {
                info!("CircuitBreaker [{}]: Open -> HalfOpen (cooldown elapsed)", self.name);
            }
        }

        let result = f.await;

        let mut state = self.state.write().await;
        let before = state.state;
        match &result {
            Ok(_) => state.record_success(&self.settings),
            Err(_) => state.record_failure(&self.settings, Instant::now()),
        }
        if before != state.state {
            match state.state {
                CircuitState::Open => warn!(
                    "CircuitBreaker [{}]: {:?} -> Open after {} consecutive failures",
                    self.name, before, state.consecutive_failures
                ),
                other => info!("CircuitBreaker [{}]: {:?} -> {:?}", self.name, before, other),
            }
        }

        result.map_err(CircuitBreakerError::Inner)
    }

    pub async fn state(&self) -> CircuitState {
        self.state.read().await.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Error type for circuit breaker
#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError<E> {
    #[error("Circuit breaker [{name}] is open, retry in {retry_in:?}")]
    Open { name: String, retry_in: Duration },

    #[error(transparent)]
    Inner(E),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(failures: usize, successes: usize, cooldown_ms: u64) -> BreakerSettings {
        BreakerSettings {
            failure_threshold: failures,
            success_threshold: successes,
            cooldown: Duration::from_millis(cooldown_ms),
        }
    }

    #[tokio::test]
    async fn test_circuit_opens_after_failures() {
        let cb = CircuitBreaker::new("stocks", settings(3, 1, 1000));

        for _ in 0..3 {
            let result = cb.call(async { Err::<(), &str>("boom") }).await;
            assert!(matches!(result, Err(CircuitBreakerError::Inner("boom"))));
        }
        assert_eq!(cb.state().await, CircuitState::Open);

        let result = cb.call(async { Ok::<(), &str>(()) }).await;
        assert!(matches!(result, Err(CircuitBreakerError::Open { .. })));
    }

    #[tokio::test]
    async fn test_success_resets_failure_streak() {
        let cb = CircuitBreaker::new("stocks", settings(2, 1, 1000));

        let _ = cb.call(async { Err::<(), &str>("boom") }).await;
        let _ = cb.call(async { Ok::<(), &str>(()) }).await;
        let _ = cb.call(async { Err::<(), &str>("boom") }).await;

        assert_eq!(cb.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_circuit_recovers_after_cooldown() {
        let cb = CircuitBreaker::new("stocks", settings(2, 2, 50));

        for _ in 0..2 {
            let _ = cb.call(async { Err::<(), &str>("boom") }).await;
        }
        assert_eq!(cb.state().await, CircuitState::Open);

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(cb.call(async { Ok::<(), &str>(()) }).await.is_ok());
        assert_eq!(cb.state().await, CircuitState::HalfOpen);
        assert!(cb.call(async { Ok::<(), &str>(()) }).await.is_ok());
        assert_eq!(cb.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_half_open_failure_reopens() {
        let cb = CircuitBreaker::new("stocks", settings(1, 1, 50));

        let _ = cb.call(async { Err::<(), &str>("boom") }).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        let _ = cb.call(async { Err::<(), &str>("boom") }).await;

        assert_eq!(cb.state().await, CircuitState::Open);
    }

    #[test]
    fn test_admit_reports_remaining_cooldown() {
        let s = settings(1, 1, 1000);
        let mut state = BreakerState::new();
        let start = Instant::now();
        state.record_failure(&s, start);

        let remaining = state.admit(&s, start + Duration::from_millis(400));
        assert_eq!(remaining, Some(Duration::from_millis(600)));
        assert_eq!(state.state, CircuitState::Open);

        assert_eq!(state.admit(&s, start + Duration::from_millis(1000)), None);
        assert_eq!(state.state, CircuitState::HalfOpen);
    }
}
