//! Small shared helpers: logging setup and string/number formatting.
//!
//! All three binaries initialize logging the same way, and the channel
//! tool's human output needs duration and view-count formatting, so those
//! live here rather than being repeated per binary.

use tracing_subscriber::{fmt as tfmt, EnvFilter};

/// Initialize the tracing subscriber for a tool run.
///
/// Diagnostics go to stderr so stdout stays reserved for primary output.
/// `RUST_LOG` overrides the default filter; `quiet` drops the default to
/// `error` so progress messages disappear (used directly by `--quiet` and
/// implied by the machine-readable output modes).
pub fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tfmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Convert a duration in seconds to `H:MM:SS`, or `M:SS` under an hour.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_duration(0), "0:00");
/// assert_eq!(format_duration(3661), "1:01:01");
/// ```
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Group a count with comma thousands separators (`1234567` -> `"1,234,567"`).
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Take the first `max` characters of a string.
///
/// Counts Unicode scalars, not bytes, so multi-byte titles truncate
/// cleanly.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Truncate a string for logging purposes, appending the dropped byte
/// count so log lines stay bounded without hiding payload size.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}
