//! HYDRAA CLI - petition workflow on a local database.
//!
//! This is the entry point for the `hydraa` binary. The logged-in user is
//! kept in the database's session slot between invocations.

mod cli;
mod commands;
mod render;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hydraa_store::RocksStore;
use hydraa_workflow::{WorkflowConfig, WorkflowError, WorkflowService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Args;

fn init_tracing(debug: bool) {
    let default = if debug {
        "hydraa_cli=debug,hydraa_workflow=debug,hydraa_store=debug,warn"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load the workflow configuration, applying the login delay override.
fn load_config(path: Option<&Path>, login_delay_ms: Option<u64>) -> anyhow::Result<WorkflowConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => WorkflowConfig::default(),
    };
    if let Some(delay) = login_delay_ms {
        config.login_delay_ms = delay;
    }
    Ok(config)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.login_delay_ms)?;

    tracing::debug!(
        data_dir = %args.data_dir.display(),
        max_officers = config.max_officers,
        login_delay_ms = config.login_delay_ms,
        "Configuration loaded"
    );

    let store = RocksStore::open(&args.data_dir)
        .with_context(|| format!("opening database at {}", args.data_dir.display()))?;
    let service = WorkflowService::new(Arc::new(store), config);

    commands::run(&service, args.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<WorkflowError>() {
                Some(workflow) => eprintln!("Error: {}", workflow.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_file_and_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_officers": 2, "login_delay_ms": 500 }}"#).unwrap();

        let config = load_config(Some(file.path()), None).unwrap();
        assert_eq!(config.max_officers, 2);
        assert_eq!(config.login_delay_ms, 500);

        let config = load_config(Some(file.path()), Some(0)).unwrap();
        assert_eq!(config.login_delay_ms, 0);

        assert_eq!(load_config(None, None).unwrap().max_officers, 3);
    }

    #[test]
    fn unreadable_config_is_reported() {
        let err = load_config(Some(Path::new("/nonexistent/hydraa.json")), None).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
