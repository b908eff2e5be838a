use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// stderrへのログ出力と、設定に応じてタイムスタンプ付きログファイルを初期化
///
/// `RUST_LOG` overrides `default_filter`. Returns the log file path when one was opened.
pub fn init(config: &crate::config::LogConfig, default_filter: &str) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let (file_layer, path) = if config.file {
        fs::create_dir_all(&config.dir)
            .with_context(|| format!("failed to create log dir {}", config.dir))?;
        let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = PathBuf::from(&config.dir).join(format!("gesture_{}.log", ts));
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(path)
}
