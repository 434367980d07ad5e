use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::loader::ConfigLoader;
use crate::model::AppConfig;

/// Quiet period after the last file event before the config is re-read.
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Re-reads a config file when it changes on disk.
///
/// Every good reload is stored in the `watch` channel, but receivers are
/// only woken when the dialect name changes.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl ConfigWatcher {
    /// Start watching `config_path`; the receiver starts at `initial_config`.
    /// Must be called inside a tokio runtime.
    pub fn start(
        config_path: PathBuf,
        initial_config: AppConfig,
    ) -> Result<(Self, watch::Receiver<AppConfig>), notify::Error> {
        let (tx, rx) = watch::channel(initial_config);
        let (event_tx, event_rx) = mpsc::channel::<()>(8);

        let file_name = config_path.file_name().unwrap_or_default().to_os_string();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            if event.is_ok_and(|event| is_config_event(&event, &file_name)) {
                // A full queue already guarantees a reload.
                let _ = event_tx.try_send(());
            }
        })?;

        // Saves done through a rename only surface on the directory.
        let dir = config_path.parent().unwrap_or(Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        tokio::spawn(reload_loop(config_path.clone(), event_rx, tx));

        info!(path = %config_path.display(), "config watcher started");
        Ok((
            Self {
                _watcher: watcher,
                path: config_path,
            },
            rx,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_config_event(event: &Event, file_name: &OsStr) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| p.file_name() == Some(file_name))
}

async fn reload_loop(
    path: PathBuf,
    mut events: mpsc::Receiver<()>,
    tx: watch::Sender<AppConfig>,
) {
    while events.recv().await.is_some() {
        loop {
            match tokio::time::timeout(DEBOUNCE, events.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        match reload_config(&path) {
            Ok(config) => {
                let dialect = config.dialect.clone();
                if publish(&tx, config) {
                    info!(%dialect, "config reload changed the dialect");
                } else {
                    debug!("config reloaded, dialect unchanged");
                }
            }
            Err(e) => warn!(path = %path.display(), "keeping previous config: {e}"),
        }

        if tx.is_closed() {
            return;
        }
    }
}

/// Store `config`; wake receivers only if its dialect differs.
fn publish(tx: &watch::Sender<AppConfig>, config: AppConfig) -> bool {
    tx.send_if_modified(|current| {
        let dialect_changed = current.dialect != config.dialect;
        *current = config;
        dialect_changed
    })
}

fn reload_config(path: &Path) -> gosling_common::Result<AppConfig> {
    let mut config = ConfigLoader::load(path)?;
    ConfigLoader::apply_env_overrides(&mut config);
    Ok(config)
}
