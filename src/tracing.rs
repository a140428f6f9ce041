//! Tracing initialization.
//!
//! Logs go to stderr; stdout belongs to the MCP transport. `RUST_LOG` filters,
//! and `DOCSIFT_LOG_FORMAT=json` switches to one JSON object per line.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

static INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = EnvFilter::from_default_env().add_directive(
            if is_test {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            }
            .into(),
        );

        if is_test {
            // Another test harness may already own the global subscriber.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .compact()
                .with_test_writer()
                .try_init();
            return;
        }

        let json = std::env::var("DOCSIFT_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
        let result = if json {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(true)
                .with_span_events(FmtSpan::NONE)
                .compact()
                .with_writer(std::io::stderr)
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e)
        }
    });
}
