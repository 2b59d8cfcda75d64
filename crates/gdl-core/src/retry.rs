//! Fixed-delay retry for Drive API requests.
//!
//! Only the folder lister retries; file downloads fail the run on the first
//! error.

use std::time::Duration;

/// Whether a failed request is worth repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure (connect, DNS, reset, timeout).
    Transport,
    /// Anything else (HTTP error status, undecodable body).
    Other,
}

/// Retry up to `max_retries` extra times, sleeping `delay` between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt, or `None` to give up.
    /// `attempt` is 1-based (1 = first attempt just failed).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> Option<Duration> {
        match kind {
            ErrorKind::Transport if attempt <= self.max_retries => Some(self.delay),
            _ => None,
        }
    }
}

/// Runs `f` until it succeeds or the policy says to stop.
pub fn run_with_retry<T, E, F, C>(policy: &RetryPolicy, classify: C, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    C: Fn(&E) -> ErrorKind,
    E: std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                None => return Err(e),
                Some(delay) => {
                    tracing::warn!(attempt, "request failed, retrying: {}", e);
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn transport_errors_retried_up_to_limit() {
        let mut calls = 0;
        let r: Result<(), String> = run_with_retry(
            &quick(),
            |_| ErrorKind::Transport,
            || {
                calls += 1;
                Err("connection reset".to_string())
            },
        );
        assert!(r.is_err());
        assert_eq!(calls, 4);
    }

    #[test]
    fn other_errors_not_retried() {
        let mut calls = 0;
        let r: Result<(), String> = run_with_retry(
            &quick(),
            |_| ErrorKind::Other,
            || {
                calls += 1;
                Err("HTTP 403".to_string())
            },
        );
        assert!(r.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn succeeds_after_transient_failure() {
        let mut calls = 0;
        let r: Result<u32, String> = run_with_retry(
            &quick(),
            |_| ErrorKind::Transport,
            || {
                calls += 1;
                if calls < 3 {
                    Err("timeout".to_string())
                } else {
                    Ok(7)
                }
            },
        );
        assert_eq!(r.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[test]
    fn default_policy_matches_lister_behavior() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Transport), Some(Duration::from_secs(1)));
        assert_eq!(p.decide(3, ErrorKind::Transport), Some(Duration::from_secs(1)));
        assert_eq!(p.decide(4, ErrorKind::Transport), None);
        assert_eq!(p.decide(1, ErrorKind::Other), None);
    }
}
