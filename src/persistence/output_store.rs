//! Durable JSON output for one screening run.
//!
//! Layout under the output root:
//!   tickers.json                          — screened universe, sorted
//!   tickers/<sym>/<sym>_bars.json         — per-ticker minute bars
//!
//! Writes are plain file overwrites, not transactional; a crash mid-run
//! leaves a partially populated tree.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::entities::bar::BarBatch;
use crate::domain::entities::screener_record::ScreenerRecord;

/// Which requested tickers made it to disk, and which were absent from
/// the batch. `valid` preserves the requested order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistOutcome {
    pub valid: Vec<String>,
    pub bad: Vec<String>,
}

pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OutputStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the whole output tree. Missing tree is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn universe_path(&self) -> PathBuf {
        self.root.join("tickers.json")
    }

    fn bars_path(&self, symbol: &str) -> PathBuf {
        let lower = symbol.to_lowercase();
        self.root
            .join("tickers")
            .join(&lower)
            .join(format!("{}_bars.json", lower))
    }

    /// Overwrite the canonical ticker universe for this run.
    pub fn write_universe(&self, records: &[ScreenerRecord]) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let encoded = serde_json::to_string_pretty(records)?;
        std::fs::write(self.universe_path(), encoded)?;
        info!(
            "Wrote {} universe records to {}",
            records.len(),
            self.universe_path().display()
        );
        Ok(())
    }

    /// Load a previously persisted universe.
    pub fn load_universe(&self) -> io::Result<Vec<ScreenerRecord>> {
        let raw = std::fs::read_to_string(self.universe_path())?;
        let records = serde_json::from_str(&raw)?;
        Ok(records)
    }

    /// Persist each requested ticker's bars, one file per ticker.
    ///
    /// Tickers absent from the batch are accumulated in `bad` and skipped;
    /// a `None` batch (the fetch itself failed) yields an empty `valid`
    /// list immediately. One provider-side gap never blocks persistence of
    /// the other tickers in the same batch.
    pub fn persist_bar_batch(
        &self,
        batch: Option<&BarBatch>,
        requested: &[String],
    ) -> io::Result<PersistOutcome> {
        let batch = match batch {
            Some(batch) => batch,
            None => {
                warn!("No bar data received; every requested ticker is bad for this run");
                return Ok(PersistOutcome {
                    valid: Vec::new(),
                    bad: requested.to_vec(),
                });
            }
        };

        let mut outcome = PersistOutcome::default();
        for ticker in requested {
            let bars = match batch.get(ticker) {
                Some(bars) => bars,
                None => {
                    warn!("Ticker not found in batch: {}", ticker);
                    outcome.bad.push(ticker.clone());
                    continue;
                }
            };

            let path = self.bars_path(ticker);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let encoded = serde_json::to_string_pretty(bars)?;
            std::fs::write(&path, encoded)?;
            outcome.valid.push(ticker.clone());
        }

        info!(
            "Persisted bars for {}/{} tickers",
            outcome.valid.len(),
            requested.len()
        );
        Ok(outcome)
    }
}
