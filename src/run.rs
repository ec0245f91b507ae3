use crate::cli::{ConfigArgs, RunArgs};
use fetchqueue::config::Config;
use fetchqueue::fetcher::HttpFetcher;
use fetchqueue::manifest;
use fetchqueue::queue::Scheduler;
use fetchqueue::worker::TaskRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(args: RunArgs) -> Result<(), AnyError> {
    let mut config = load_config(args.config.clone(), None)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let fetcher = HttpFetcher::new(&config.http.to_http_config())?;
    let runner = TaskRunner::new(Arc::new(fetcher), &config.scheduler.destination_root)
        .with_retry_policy(config.retry.to_policy())
        .ignore_missing_assets(config.scheduler.ignore_missing_assets);
    let scheduler = Scheduler::new(runner, config.scheduler.parallelism)?;

    let items = manifest::load(&args.manifest).await?;
    info!(
        items = items.len(),
        destination = %config.scheduler.destination_root.display(),
        "Seeding scheduler"
    );
    scheduler.queue().extend(items).await;

    tokio::select! {
        result = scheduler.start() => {
            let summary = result?;
            info!(
                resolved = summary.items_resolved(),
                fetched = summary.items_fetched,
                skipped = summary.items_skipped,
                missing = summary.assets_missing,
                "Run complete"
            );
            Ok(())
        }
        _ = shutdown_signal() => {
            warn!(pending = scheduler.queue().len().await, "Run interrupted");
            Err("interrupted by signal".into())
        }
    }
}

pub fn print_config(args: ConfigArgs) -> Result<(), AnyError> {
    let config = load_config(args.config, None)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Load `.env` (or `env_file`) into the environment, then the configuration
fn load_config(path: Option<PathBuf>, env_file: Option<&Path>) -> Result<Config, AnyError> {
    let loaded = match env_file {
        Some(env_file) => dotenvy::from_path(env_file),
        None => dotenvy::dotenv().map(|_| ()),
    };
    if let Err(e) = loaded {
        if !e.not_found() {
            warn!(error = %e, "Failed to read .env file");
        }
    }

    let config = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(dest) = &args.dest {
        config.scheduler.destination_root = dest.clone();
    }
    if let Some(parallelism) = args.parallelism {
        config.scheduler.parallelism = parallelism;
    }
    if let Some(timeout) = args.timeout {
        config.http.timeout_secs = timeout;
    }
    if let Some(proxy) = &args.proxy {
        config.http.proxy = Some(proxy.clone());
    }
    if args.ignore_missing_assets {
        config.scheduler.ignore_missing_assets = true;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_args() -> RunArgs {
        RunArgs {
            manifest: PathBuf::from("manifest.json"),
            config: None,
            dest: None,
            parallelism: None,
            timeout: None,
            proxy: None,
            ignore_missing_assets: false,
        }
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config::default();
        apply_overrides(&mut config, &create_args());

        assert_eq!(config.scheduler.parallelism, 4);
        assert!(!config.scheduler.ignore_missing_assets);
        assert!(config.http.proxy.is_none());
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = Config::default();
        let args = RunArgs {
            dest: Some(PathBuf::from("/tmp/out")),
            parallelism: Some(2),
            timeout: Some(5),
            proxy: Some("http://proxy:3128".to_string()),
            ignore_missing_assets: true,
            ..create_args()
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.scheduler.destination_root, PathBuf::from("/tmp/out"));
        assert_eq!(config.scheduler.parallelism, 2);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.proxy.as_deref(), Some("http://proxy:3128"));
        assert!(config.scheduler.ignore_missing_assets);
    }

    #[test]
    fn test_zero_parallelism_override_fails_validation() {
        let mut config = Config::default();
        let args = RunArgs {
            parallelism: Some(0),
            ..create_args()
        };

        apply_overrides(&mut config, &args);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_file_applies_with_explicit_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("fetchqueue.toml");
        let env_path = temp_dir.path().join(".env");
        std::fs::write(&config_path, "[scheduler]\nparallelism = 2\n").unwrap();
        std::fs::write(&env_path, "FETCHQUEUE__RETRY__MAX_ATTEMPTS=7\n").unwrap();

        let config = load_config(Some(config_path), Some(&env_path)).unwrap();

        assert_eq!(config.scheduler.parallelism, 2);
        assert_eq!(config.retry.max_attempts, 7);
    }
}
