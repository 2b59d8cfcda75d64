//! Human-readable transfer progress (bytes done, rate, ETA) on stderr.
//!
//! This is terminal output for the person running `gdl`, not a log; the
//! tracing subscriber writes to the log file independently.

use std::io::Write;
use std::time::{Duration, Instant};

/// Snapshot of one transfer's progress.
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Bytes received so far.
    pub bytes_done: u64,
    /// Total size in bytes, if the server announced it.
    pub total_bytes: Option<u64>,
    /// Elapsed time since the transfer started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if the size is unknown or rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let total = self.total_bytes?;
        let remaining = total.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0], if the size is known.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total_bytes?;
        if total == 0 {
            return Some(1.0);
        }
        Some((self.bytes_done as f64 / total as f64).min(1.0))
    }

    /// One progress line, e.g. `12.0 / 48.0 MiB (25.0%)  3.00 MiB/s  ETA 12s`.
    pub fn render(&self) -> String {
        let done_mib = self.bytes_done as f64 / 1_048_576.0;
        let rate_mib = self.bytes_per_sec() / 1_048_576.0;
        match (self.total_bytes, self.fraction()) {
            (Some(total), Some(fraction)) => {
                let total_mib = total as f64 / 1_048_576.0;
                let eta = self
                    .eta_secs()
                    .map(|s| format!("{:.0}s", s))
                    .unwrap_or_else(|| "?".to_string());
                format!(
                    "{:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}",
                    done_mib,
                    total_mib,
                    fraction * 100.0,
                    rate_mib,
                    eta
                )
            }
            _ => format!("{:.1} MiB  {:.2} MiB/s", done_mib, rate_mib),
        }
    }
}

/// Prints a progress line at most once per `interval`, overwriting the previous one.
pub struct ProgressPrinter {
    interval: Duration,
    start: Instant,
    last_print: Option<Instant>,
    last: Option<ProgressStats>,
}

impl ProgressPrinter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            start: Instant::now(),
            last_print: None,
            last: None,
        }
    }

    /// Record the current byte counters (as reported by libcurl; `total == 0` means unknown).
    pub fn update(&mut self, done: u64, total: u64) {
        let stats = ProgressStats {
            bytes_done: done,
            total_bytes: (total > 0).then_some(total),
            elapsed_secs: self.start.elapsed().as_secs_f64(),
        };
        let now = Instant::now();
        let due = self
            .last_print
            .map_or(true, |t| now.duration_since(t) >= self.interval);
        if due && done > 0 {
            eprint!("\r  {}  ", stats.render());
            let _ = std::io::stderr().flush();
            self.last_print = Some(now);
        }
        self.last = Some(stats);
    }

    /// Print the final line (if anything was received) and end it.
    pub fn finish(self) {
        if let Some(mut stats) = self.last {
            stats.elapsed_secs = self.start.elapsed().as_secs_f64();
            if stats.bytes_done > 0 {
                eprintln!("\r  {}  ", stats.render());
            }
        }
    }
}
