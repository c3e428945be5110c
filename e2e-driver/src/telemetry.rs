use tracing_subscriber::EnvFilter;

/// Logs go to stderr. `RUST_LOG` overrides the default level and
/// `E2E_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = if json_from_env() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn json_from_env() -> bool {
    std::env::var("E2E_LOG_FORMAT")
        .is_ok_and(|v| v.trim().eq_ignore_ascii_case("json"))
}
