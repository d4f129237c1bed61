use std::io;
use std::path::{Path, PathBuf};

use fieldhouse_booking_config::BookingOutcome;

/// Append-only store of one flat record per user per run, for later
/// inspection. Records are plain key/value text files.
#[derive(Debug)]
pub struct ResultsSink {
    dir: PathBuf,
}

impl ResultsSink {
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn record(&self, outcome: &BookingOutcome) -> io::Result<PathBuf> {
        let path = self
            .dir
            .join(format!("{}_result_{}.txt", outcome.user_id, outcome.timestamp));
        let status = if outcome.success { "Success" } else { "Failed" };
        let body = format!(
            "User: {}\nTime: {}\nFacility: {}\nStatus: {}\nTimestamp: {}\n",
            outcome.user_id, outcome.time, outcome.facility, status, outcome.timestamp
        );
        std::fs::write(&path, body)?;
        Ok(path)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
