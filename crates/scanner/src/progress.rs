//! Progress counters shared by the workers of one namespace scan.

use std::sync::{Arc, Mutex, PoisonError};

use sweep::{ScanProgress, ScanResult};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

#[derive(Debug, Default)]
struct Tally {
    scanned: usize,
    orphans: usize,
}

/// Updates the shared tally as repositories finish and offers a snapshot to
/// the caller's sink without ever waiting on it.
#[derive(Clone)]
pub(crate) struct ProgressReporter {
    sink: mpsc::Sender<ScanProgress>,
    tally: Arc<Mutex<Tally>>,
    total: usize,
}

impl ProgressReporter {
    pub(crate) fn new(sink: mpsc::Sender<ScanProgress>, total: usize) -> Self {
        Self {
            sink,
            tally: Arc::new(Mutex::new(Tally::default())),
            total,
        }
    }

    /// Counts `result` and emits a snapshot. A full or closed sink drops it.
    pub(crate) fn record(&self, result: &ScanResult) {
        let snapshot = {
            let mut tally = self.tally.lock().unwrap_or_else(PoisonError::into_inner);
            tally.scanned += 1;
            tally.orphans += result.orphans.len();
            ScanProgress {
                scanned: tally.scanned,
                total: self.total,
                repository: result.repository.full_name.clone(),
                orphans: tally.orphans,
            }
        };

        match self.sink.try_send(snapshot) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                trace!(scanned = dropped.scanned, "Progress sink full; update dropped");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{branch, repo};
    use sweep::{BranchClassifier, ScanOptions};

    fn result_with_orphans(name: &str, count: usize) -> ScanResult {
        let classifier = BranchClassifier::new(ScanOptions::default());
        let repository = repo(name);
        let orphans = (0..count)
            .filter_map(|i| {
                classifier.classify(&repository, &branch(&format!("b{i}"), 30), &[])
            })
            .collect();
        ScanResult::completed(repository, orphans)
    }

    #[tokio::test]
    async fn snapshots_are_cumulative() {
        let (tx, mut rx) = mpsc::channel(8);
        let reporter = ProgressReporter::new(tx, 2);

        reporter.record(&result_with_orphans("a", 2));
        reporter.clone().record(&result_with_orphans("b", 1));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!((first.scanned, first.orphans, first.total), (1, 2, 2));
        assert_eq!(first.repository.as_str(), "acme/a");
        assert_eq!((second.scanned, second.orphans), (2, 3));
        assert_eq!(second.repository.as_str(), "acme/b");
    }

    #[tokio::test]
    async fn full_sink_drops_without_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let reporter = ProgressReporter::new(tx, 3);

        reporter.record(&result_with_orphans("a", 0));
        reporter.record(&result_with_orphans("b", 0));
        reporter.record(&result_with_orphans("c", 0));

        assert_eq!(rx.recv().await.unwrap().scanned, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_sink_is_ignored() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        ProgressReporter::new(tx, 1).record(&result_with_orphans("a", 1));
    }
}
