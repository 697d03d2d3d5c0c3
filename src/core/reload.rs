//! Auto-reload for the dev profile.
//!
//! Watches the running executable; once a rebuild replaces it and the file
//! has stopped changing, the server shuts down and re-executes itself.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct ReloadWatcher {
    exe: PathBuf,
    modified: Option<SystemTime>,
    interval: Duration,
}

impl ReloadWatcher {
    pub fn new(exe: PathBuf) -> Self {
        let modified = modified_at(&exe);
        Self {
            exe,
            modified,
            interval: POLL_INTERVAL,
        }
    }

    pub fn for_current_exe() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Resolves once the watched file has changed and then held the same
    /// modification time for one full poll interval.
    pub async fn changed(self) {
        info!("Watching {} for rebuilds", self.exe.display());

        let mut ticker = tokio::time::interval(self.interval);
        let mut pending: Option<SystemTime> = None;

        loop {
            ticker.tick().await;

            let Some(current) = modified_at(&self.exe) else {
                // Mid-replacement; try again next tick
                pending = None;
                continue;
            };

            if Some(current) == self.modified {
                continue;
            }

            if pending == Some(current) {
                info!("Executable changed, reloading");
                return;
            }

            debug!("Executable modified, waiting for it to settle");
            pending = Some(current);
        }
    }
}

/// Replace this process with a fresh copy of the executable, passing the
/// original arguments through. Only returns if that fails.
pub fn restart() -> std::io::Error {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => return e,
    };
    let mut command = std::process::Command::new(exe);
    command.args(std::env::args_os().skip(1));

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.exec()
    }

    #[cfg(not(unix))]
    {
        match command.spawn() {
            Ok(_) => std::process::exit(0),
            Err(e) => e,
        }
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(time) => Some(time),
        Err(e) => {
            warn!("Cannot stat {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "coordinates-api-reload-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::write(&path, b"v1").unwrap();
        path
    }

    #[tokio::test]
    async fn test_changed_resolves_after_rewrite() {
        let path = temp_file("rewrite");
        let watcher = ReloadWatcher::new(path.clone()).with_interval(Duration::from_millis(20));
        let handle = tokio::spawn(watcher.changed());

        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(5))
            .unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("watcher should notice the change")
            .unwrap();

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_changed_stays_pending_without_rewrite() {
        let path = temp_file("idle");
        let watcher = ReloadWatcher::new(path.clone()).with_interval(Duration::from_millis(20));

        let result = tokio::time::timeout(Duration::from_millis(200), watcher.changed()).await;
        assert!(result.is_err());

        let _ = std::fs::remove_file(path);
    }
}
