use std::sync::Arc;

use gosling_common::Result;
use gosling_config::AppConfig;
use gosling_db::ActiveDialect;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Built-in registry with `config.dialect` active.
pub fn active_dialect_from_config(config: &AppConfig) -> Result<ActiveDialect> {
    let active = ActiveDialect::new();
    active.set(&config.dialect)?;
    Ok(active)
}

/// Keep `active` in line with the dialect named by each config on `rx`.
///
/// Unknown names are logged and skipped; the previous dialect stays active.
/// The task ends when the sender is dropped.
pub fn follow_config(
    mut rx: watch::Receiver<AppConfig>,
    active: Arc<ActiveDialect>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let initial = rx.borrow_and_update().dialect.clone();
        let mut applied = apply(&active, initial, None);

        while rx.changed().await.is_ok() {
            let wanted = rx.borrow_and_update().dialect.clone();
            if applied.as_deref() == Some(wanted.as_str()) {
                continue;
            }
            applied = apply(&active, wanted, applied);
        }
        info!("config channel closed, no longer following dialect changes");
    })
}

fn apply(active: &ActiveDialect, wanted: String, applied: Option<String>) -> Option<String> {
    match active.set(&wanted) {
        Ok(()) => Some(wanted),
        Err(e) => {
            warn!("ignoring dialect from config: {e}");
            applied
        }
    }
}
