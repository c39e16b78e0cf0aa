use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` filter (default `info`); JSON lines when `PAGEPRESENCE_LOG_JSON=1`.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn,tungstenite=warn"));
    let use_json = std::env::var("PAGEPRESENCE_LOG_JSON")
        .map(|value| value == "1")
        .unwrap_or(false);

    if use_json {
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .with_writer(std::io::stderr)
            .try_init();
    } else {
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .pretty()
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_repeatable() {
        init_logging();
        init_logging();
        tracing::info!("pretty subscriber installed");
    }
}
