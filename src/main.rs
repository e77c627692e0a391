//! Entry point for the translation catalog CLI.

use std::io::Write;
use std::process::ExitCode;
use std::sync::OnceLock;

use clap::Parser;
use json_i18n_translator::EditorState;
use json_i18n_translator::cli::{
    self,
    Args,
    CliError,
};
use json_i18n_translator::config::{
    ConfigError,
    ConfigManager,
};
use json_i18n_translator::storage::FileStore;

/// Keeps the non-blocking log writer alive until exit.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// stderr、または `--log-file` にログを出力する subscriber を設定
fn init_logging(args: &Args) {
    let default_level = if args.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let log_file = args.log_file.as_ref().map(|path| {
        std::fs::OpenOptions::new().create(true).append(true).open(path).map(|file| (path, file))
    });

    match log_file {
        Some(Ok((path, file))) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::debug!(path = %path.display(), "logging initialized");
        }
        other => {
            // ファイルを開けない場合は stderr に出力
            let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(non_blocking)
                .init();
            let _ = LOG_GUARD.set(guard);
            if let Some(Err(e)) = other {
                tracing::warn!(error = %e, "Failed to open log file; logging to stderr");
            }
        }
    }
}

/// 設定を読み込み、永続化ストアを開いてコマンドを実行
async fn run(args: Args) -> Result<(), CliError> {
    let workspace = match &args.workspace {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(ConfigError::from)?,
    };

    let config_manager = ConfigManager::load(workspace, &args.overrides())?;
    let storage_dir = config_manager.storage_path();
    tracing::debug!(
        workspace = %config_manager.workspace_root().display(),
        storage = %storage_dir.display(),
        "Opening storage"
    );
    let mut editor = EditorState::open(FileStore::new(storage_dir), config_manager.settings());

    let mut stdout = std::io::stdout().lock();
    cli::run(&mut editor, &args.command, &config_manager.export_path(), &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            let _ = writeln!(std::io::stderr(), "error: {e}");
            ExitCode::FAILURE
        }
    }
}
