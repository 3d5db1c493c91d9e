//! Tracing initialization for the `ailang` CLI.
//!
//! Controlled by `AILANG_LOG` (falls back to `RUST_LOG`); defaults to
//! `warn` when neither is set. All output goes to stderr so it never mixes
//! with a program's own `print`/`println` on stdout.

use std::sync::OnceLock;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

static INIT: OnceLock<()> = OnceLock::new();

/// Safe to call more than once; only the first call takes effect.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env("AILANG_LOG")
            .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        Registry::default()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .with(filter)
            .init();
    });
}
