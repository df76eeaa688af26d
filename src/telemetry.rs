//! Logging helpers. Raw user ids never reach the logs: only a short hash.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "RANKER_DEV_LOG";

/// Dev environment = debug build OR SHUTTLE_ENV in {local, development, dev}.
fn is_dev_env() -> bool {
    cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        )
}

/// RANKER_DEV_LOG=1 AND dev environment.
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    on && is_dev_env()
}

/// Install a compact subscriber in dev only. No-op otherwise.
pub fn init_dev_tracing() {
    if !dev_logging_enabled() {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ranker=debug,info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

/// First 6 bytes of SHA-256 as hex (12 chars).
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}
