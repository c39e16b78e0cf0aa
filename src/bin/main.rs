//! Pagepresence CLI
//!
//!   pagepresence fetch             → One-shot REST fetch, output rendered presence
//!   pagepresence watch             → Run the live client, print phase and render changes
//!   pagepresence serve             → Run the live client behind the HTTP view server
//!   pagepresence fallback          → Output one synthetic status for the current time
//!
//! Configuration (lowest precedence first):
//!   pagepresence.json / --config <file>, PAGEPRESENCE_* env (.env is read), CLI flags
//!
//! Output format:
//!   --json     Output raw JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use chrono::Local;
use pagepresence::config::{self, PresenceConfig};
use pagepresence::logging::init_logging;
use pagepresence::presence::{describe, fetch_with_timeout, synthetic_snapshot, HttpSnapshotSource};
use pagepresence::{install_signal_handlers, PageLifecycle, Phase, PresenceManager, SharedPage};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

fn main() {
    let loaded = config::load_dotenv(Path::new(".env"));
    init_logging();
    let _ = rustls::crypto::ring::default_provider().install_default();
    debug!("Loaded {} variables from .env", loaded);

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("pagepresence {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("fetch") | Some("get") => cmd_fetch(&opts),
        Some("watch") => cmd_watch(&opts),
        Some("serve") => cmd_serve(&opts),
        Some("fallback") => cmd_fallback(&opts),
        Some(cmd) => Err(format!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    match result {
        Ok(Value::Null) => {}
        Ok(output) => println!("{}", format_json(&output, pretty)),
        Err(e) => {
            eprintln!("{}", format_json(&json!({"error": e}), pretty));
            std::process::exit(1);
        }
    }
}

fn format_json(value: &Value, pretty: bool) -> String {
    let formatted = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    formatted.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    user: Option<String>,
    config: Option<PathBuf>,
    socket: Option<String>,
    rest: Option<String>,
    // Server options
    bind: Option<String>,
    port: Option<u16>,
    // Output options
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let next = args.get(i + 1).cloned();
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--user" | "-u" if next.is_some() => {
                    opts.user = next;
                    i += 1;
                }
                "--config" | "-c" if next.is_some() => {
                    opts.config = next.map(PathBuf::from);
                    i += 1;
                }
                "--socket" if next.is_some() => {
                    opts.socket = next;
                    i += 1;
                }
                "--rest" if next.is_some() => {
                    opts.rest = next;
                    i += 1;
                }
                "--bind" | "-b" if next.is_some() => {
                    opts.bind = next;
                    i += 1;
                }
                "--port" | "-p" if next.is_some() => {
                    opts.port = next.and_then(|p| p.parse().ok());
                    i += 1;
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        // `pagepresence fetch <id>` as a shorthand for --user
        if opts.user.is_none() && !positional.is_empty() {
            opts.user = Some(positional.remove(0));
        }

        if opts.bind.is_none() {
            opts.bind = env::var("PAGEPRESENCE_BIND").ok().filter(|s| !s.is_empty());
        }

        opts
    }

    /// File + environment config with CLI flags on top.
    fn presence_config(&self) -> Result<PresenceConfig, String> {
        let mut config = config::load(self.config.as_deref()).map_err(|e| e.to_string())?;
        if let Some(user) = &self.user {
            config.user_id = user.clone();
        }
        if let Some(rest) = &self.rest {
            config = config.with_rest_base(rest.clone());
        }
        if let Some(socket) = &self.socket {
            config = config.with_socket_url(socket.clone());
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    fn bind_addr(&self) -> String {
        match (&self.bind, self.port) {
            (_, Some(port)) => format!("127.0.0.1:{}", port),
            (Some(bind), None) => bind.clone(),
            (None, None) => "127.0.0.1:8080".to_string(),
        }
    }
}

fn print_usage() {
    println!(
        r#"pagepresence - live presence for a profile page

USAGE:
    pagepresence <command> [id] [options]

COMMANDS:
    fetch [id]              One-shot fetch, output rendered presence
    watch                   Run the live client until Ctrl+C
    serve                   Live client + HTTP view server
    fallback                Output a synthetic status for the current time

PRESENCE OPTIONS:
    --user, -u <id>         Subscriber id (env: PAGEPRESENCE_USER_ID)
    --config, -c <file>     Config file (default: ./pagepresence.json)
    --rest <url>            REST base (env: PAGEPRESENCE_REST_BASE)
    --socket <url>          Socket URL (env: PAGEPRESENCE_SOCKET_URL)

SERVER OPTIONS:
    --bind, -b <addr>       Listen address (default: 127.0.0.1:8080, env: PAGEPRESENCE_BIND)
    --port, -p <port>       Listen on 127.0.0.1:<port>

OUTPUT OPTIONS:
    --json                  Raw JSON output
    --pretty                Pretty-print JSON
    --version, -V           Print version

ROUTES (serve):
    GET /health             → {{status, service}}
    GET /presence           → {{indicator, activity, activity_visible, synthetic, ...}}
    GET /phase              → {{phase, ...}}

EXAMPLES:
    pagepresence fetch 94490510688792576
    PAGEPRESENCE_USER_ID=94490510688792576 pagepresence serve --port 3000
"#
    );
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to create runtime: {}", e))
}

fn cmd_fetch(opts: &ParsedArgs) -> Result<Value, String> {
    let config = opts.presence_config()?;
    let source = HttpSnapshotSource::new(config.rest_base.clone());

    let rt = runtime()?;
    let snapshot = rt
        .block_on(fetch_with_timeout(&source, &config.user_id, config.fetch_timeout()))
        .map_err(|e| format!("Fetch failed: {}", e))?
        .ok_or_else(|| "No presence data for this id".to_string())?;

    Ok(json!({
        "user_id": config.user_id,
        "rendered": describe(&snapshot),
        "snapshot": snapshot,
    }))
}

fn cmd_fallback(opts: &ParsedArgs) -> Result<Value, String> {
    // No subscriber needed; only the policy matters.
    let config = config::load(opts.config.as_deref()).map_err(|e| e.to_string())?;
    let now = Local::now();
    let snapshot = synthetic_snapshot(&config.fallback, &now, &mut rand::thread_rng());
    Ok(json!({
        "at": now.to_rfc3339(),
        "rendered": describe(&snapshot),
        "snapshot": snapshot,
    }))
}

fn cmd_watch(opts: &ParsedArgs) -> Result<Value, String> {
    let config = opts.presence_config()?;
    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());

    let rt = runtime()?;
    rt.block_on(async {
        let shutdown = install_signal_handlers();
        let mut stop = shutdown.subscribe();

        let page = SharedPage::new();
        let mut lifecycle = PageLifecycle::new(page.clone());
        let mut phase_rx = lifecycle.load(PresenceManager::live(config, page.clone())).await.subscribe_phase();

        let mut poll = tokio::time::interval(Duration::from_millis(250));
        let mut last_render = 0;
        loop {
            let phase_changed = tokio::select! {
                _ = stop.recv() => break,
                changed = phase_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    true
                }
                _ = poll.tick() => false,
            };

            if phase_changed {
                let phase = *phase_rx.borrow_and_update();
                println!("{}", format_json(&json!({"event": "phase", "phase": phase}), pretty));
                if phase == Phase::Closed {
                    break;
                }
            } else {
                let view = page.snapshot();
                if view.renders != last_render {
                    last_render = view.renders;
                    println!("{}", format_json(&json!({"event": "render", "view": view}), pretty));
                }
            }
        }

        lifecycle.unload().await;
        info!("Watch stopped");
        Ok(Value::Null)
    })
}

#[cfg(feature = "server")]
fn cmd_serve(opts: &ParsedArgs) -> Result<Value, String> {
    use pagepresence::server::{self, AppState};

    let config = opts.presence_config()?;
    let addr = opts.bind_addr();

    let rt = runtime()?;
    rt.block_on(async {
        let shutdown = install_signal_handlers();

        let page = SharedPage::new();
        let mut lifecycle = PageLifecycle::new(page.clone());
        let phase = lifecycle.load(PresenceManager::live(config, page.clone())).await.subscribe_phase();

        let router = server::create_router_with_state(AppState::new(page, "pagepresence").with_phase(phase));

        info!("Endpoints:");
        info!("  GET  /health    - Health check");
        info!("  GET  /presence  - Rendered presence view");
        info!("  GET  /phase     - Client phase");

        let mut stop = shutdown.subscribe();
        let served = server::serve(router, &addr, async move {
            let _ = stop.recv().await;
            info!("Shutdown signal received, stopping server...");
        })
        .await;

        lifecycle.unload().await;
        served.map_err(|e| format!("Server error: {}", e))?;
        Ok(json!({"status": "stopped"}))
    })
}

#[cfg(not(feature = "server"))]
fn cmd_serve(_opts: &ParsedArgs) -> Result<Value, String> {
    Err("Built without the `server` feature".to_string())
}
