//! Config reload on SIGHUP.
//!
//! The config file is re-read and validated, and its policy is published as
//! a whole. Any failure keeps the current policy.

use std::path::{Path, PathBuf};

use tailgate_core::error::Result;
use tokio::task::JoinHandle;

use crate::{app_state::AppState, config};

/// Load `path` and publish its policy into `state`.
pub fn reload_from_file(state: &AppState, path: &Path) -> Result<()> {
    let res = config::load_from_file(path).and_then(|cfg| state.reload(&cfg));
    state.metrics().record_reload(res.is_ok());
    res
}

/// Spawn a task that reloads the policy from `path` on every SIGHUP.
#[cfg(unix)]
pub fn spawn_sighup_reload(state: AppState, path: PathBuf) -> JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "SIGHUP handler unavailable; reload disabled");
                return;
            }
        };

        while hup.recv().await.is_some() {
            tracing::info!(path = %path.display(), "SIGHUP received, reloading policy");
            if let Err(e) = reload_from_file(&state, &path) {
                tracing::warn!(
                    error = %e,
                    code = e.code().as_str(),
                    "policy reload failed; keeping current policy"
                );
            }
        }
    })
}

#[cfg(not(unix))]
pub fn spawn_sighup_reload(_state: AppState, path: PathBuf) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(path = %path.display(), "SIGHUP reload not supported on this platform");
    })
}
