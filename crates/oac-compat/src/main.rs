use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_flags::env_flags;
use once_cell::sync::OnceCell;

use oac_compat::commands::{self, Cli};
use oac_compat::config;

fn resolve_home(oac_home_flag: &str) -> PathBuf {
    if !oac_home_flag.is_empty() {
        return PathBuf::from(oac_home_flag);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".oac");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".oac")
}

fn init_tracing(oac_home: &std::path::Path) {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "warn";
        /// Preferred filter env (alias). If set, overrides RUST_LOG.
        TRACING_FILTER: &str = "";
        /// Pretty formatting for logs (ignored if TRACING_JSON=true).
        TRACING_PRETTY: bool = false;
        /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
        TRACING_COMPACT: bool = true;
        /// JSON formatting for logs
        TRACING_JSON: bool = false;
        /// If true, also log to file under <OAC_HOME>/logs or LOG_DIR
        LOG_TO_FILE: bool = false;
        /// Optional explicit log directory (absolute). Defaults to <OAC_HOME>/logs
        LOG_DIR: &str = "";
    }

    use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

    // Load user config (optional) and let it fill in whatever env left unset
    let user_cfg = config::load_user_config(oac_home).ok().flatten();
    let env_set = |k: &str| std::env::var_os(k).is_some();

    let mut rust_log = if !(*TRACING_FILTER).is_empty() {
        (*TRACING_FILTER).to_string()
    } else {
        (*RUST_LOG).to_string()
    };
    let mut json = *TRACING_JSON;
    let mut compact = *TRACING_COMPACT;
    let mut pretty = *TRACING_PRETTY;
    let mut log_to_file = *LOG_TO_FILE;
    let mut log_dir: Option<PathBuf> = if !(*LOG_DIR).is_empty() {
        Some(PathBuf::from((*LOG_DIR).to_string()))
    } else {
        None
    };

    if let Some(cfg) = user_cfg.as_ref().and_then(|c| c.logging.as_ref()) {
        if !(env_set("TRACING_FILTER") || env_set("RUST_LOG"))
            && let Some(level) = cfg.level.as_ref()
        {
            rust_log = level.clone();
        }
        if !env_set("TRACING_JSON")
            && let Some(v) = cfg.json
        {
            json = v;
        }
        if !env_set("TRACING_COMPACT")
            && let Some(v) = cfg.compact
        {
            compact = v;
        }
        if !env_set("TRACING_PRETTY")
            && let Some(v) = cfg.pretty
        {
            pretty = v;
        }
        if !env_set("LOG_TO_FILE")
            && let Some(v) = cfg.to_file
        {
            log_to_file = v;
        }
        if !env_set("LOG_DIR")
            && let Some(dir) = cfg.dir.as_ref()
        {
            log_dir = Some(PathBuf::from(dir));
        }
    }

    let filter = EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("warn"));

    fn styled<S, W>(writer: W, ansi: bool, json: bool, compact: bool, pretty: bool) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
        W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        let base = tracing_subscriber::fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_target(true)
            .with_ansi(ansi)
            .with_writer(writer);
        if json {
            base.json().boxed()
        } else if compact {
            base.compact().boxed()
        } else if pretty {
            base.pretty().boxed()
        } else {
            base.boxed()
        }
    }

    // Logs go to stderr; stdout is reserved for command output.
    let stderr_layer = styled(std::io::stderr, true, json, compact, pretty);

    static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
    let file_layer = if log_to_file {
        let dir = log_dir.unwrap_or_else(|| oac_home.join("logs"));
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "oac.log");
                let (nb, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                Some(styled(nb, false, json, compact, pretty))
            }
            Err(e) => {
                eprintln!("warning: failed to create log dir {}: {e}", dir.display());
                None
            }
        }
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);
    if let Err(e) = subscriber.try_init() {
        tracing::debug!("tracing already set: {e:?}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_flags! {
        /// OAC home directory (absolute). Defaults to $HOME/.oac
        OAC_HOME: &str = "";
    }

    let oac_home = resolve_home(*OAC_HOME);
    init_tracing(&oac_home);

    let cli = Cli::parse();
    let defaults = config::load_user_config(&oac_home)
        .ok()
        .flatten()
        .and_then(|c| c.convert)
        .unwrap_or_default();

    match commands::run(cli, &defaults).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
