use std::io::BufRead;

use tracing::info;

use crate::error::MonitorError;
use crate::monitor::history::RunHistory;
use crate::monitor::record::EpochRecord;
use crate::selector::{BestCheckpoint, BestSelector, Offer};
use crate::store::CheckpointStore;

/// Monitor configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Rolling-window size for run statistics.
    pub history_window: usize,
    /// Log a rolling summary every N records.
    pub log_interval: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            history_window: 100,
            log_interval: 10,
        }
    }
}

/// Final tally returned once the record stream ends.
#[derive(Debug)]
pub struct RunSummary {
    pub records: usize,
    pub saves: usize,
    pub skips: usize,
    pub best: Option<BestCheckpoint>,
}

/// Drives a [`BestSelector`] from a JSON-lines stream of [`EpochRecord`]s.
///
/// One record per line; blank lines are skipped. A malformed line fails the
/// run with its line number; checkpoints saved before that line stay on disk.
pub struct Monitor<S: CheckpointStore> {
    config: MonitorConfig,
    selector: BestSelector<S>,
    history: RunHistory,
}

impl<S: CheckpointStore> Monitor<S> {
    pub fn new(config: MonitorConfig, selector: BestSelector<S>) -> Self {
        let history = RunHistory::with_capacity(config.history_window);
        Monitor {
            config,
            selector,
            history,
        }
    }

    /// Consume the stream to the end and return the run summary.
    pub fn run(&mut self, reader: impl BufRead) -> Result<RunSummary, MonitorError> {
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| MonitorError::StreamRead {
                line: line_no,
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let record: EpochRecord =
                serde_json::from_str(&line).map_err(|e| MonitorError::RecordParse {
                    line: line_no,
                    source: e,
                })?;

            let candidate = record.into_candidate();
            let outcome = self.selector.offer(&candidate)?;
            let saved = matches!(outcome, Offer::Saved { .. });
            self.history.record_offer(candidate.score, saved);

            if self.history.total_records() % self.config.log_interval == 0 {
                let window = self.config.log_interval;
                info!(
                    records = self.history.total_records(),
                    saves = self.history.saves(),
                    avg_score = self.history.average_score(window),
                    best_score = self.selector.best().map(|b| b.score),
                    "run progress"
                );
            }
        }

        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            records: self.history.total_records(),
            saves: self.history.saves(),
            skips: self.history.skips(),
            best: self.selector.best().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectorConfig;
    use crate::store::{FsStore, FsStoreConfig};
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    fn monitor(root: &Path) -> Monitor<FsStore> {
        let store = FsStore::new(FsStoreConfig {
            dir: root.join("ckpts"),
            prefix: "ckpt".to_string(),
        });
        let selector = BestSelector::new(store, SelectorConfig::default());
        Monitor::new(MonitorConfig::default(), selector)
    }

    fn write_artifact(dir: &Path) -> PathBuf {
        let path = dir.join("model.bin");
        std::fs::write(&path, b"weights").unwrap();
        path
    }

    fn record_line(epoch: u64, score: f64, artifact: &Path) -> String {
        format!(
            r#"{{"epoch": {}, "score": {}, "artifact": "{}"}}"#,
            epoch,
            score,
            artifact.display()
        )
    }

    #[test]
    fn test_run_counts_saves_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(dir.path());
        let mut m = monitor(dir.path());

        let stream = [
            record_line(1, 0.5, &artifact),
            record_line(2, 0.4, &artifact),
            record_line(3, 0.7, &artifact),
            record_line(4, 0.7, &artifact),
        ]
        .join("\n");

        let summary = m.run(Cursor::new(stream)).unwrap();
        assert_eq!(summary.records, 4);
        assert_eq!(summary.saves, 2);
        assert_eq!(summary.skips, 2);
        let best = summary.best.unwrap();
        assert_eq!(best.epoch, 3);
        assert!((best.score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(dir.path());
        let mut m = monitor(dir.path());

        let stream = format!("\n{}\n\n{}\n", record_line(1, 0.2, &artifact), record_line(2, 0.3, &artifact));
        let summary = m.run(Cursor::new(stream)).unwrap();
        assert_eq!(summary.records, 2);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(dir.path());
        let mut m = monitor(dir.path());

        let stream = format!("{}\nnot json\n", record_line(1, 0.2, &artifact));
        let err = m.run(Cursor::new(stream)).unwrap_err();
        match err {
            MonitorError::RecordParse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected RecordParse, got {other}"),
        }
        // The checkpoint from line 1 survives the failure
        assert_eq!(m.summary().saves, 1);
    }

    #[test]
    fn test_non_monotonic_epochs_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(dir.path());
        let mut m = monitor(dir.path());

        let stream = [
            record_line(5, 0.5, &artifact),
            record_line(2, 0.8, &artifact),
        ]
        .join("\n");

        let summary = m.run(Cursor::new(stream)).unwrap();
        assert_eq!(summary.best.unwrap().epoch, 2);
    }
}
