use idfill_events::{topics, Bus};
use idfill_store::{RecordStore, StoreError, StoreStatus};
use serde::Serialize;
use serde_json::json;
use std::path::Path;

use crate::error::IngestError;
use crate::rows::{parse_row, split_rows, ImportSpec};

/// Outcome of a completed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Logical rows in the file, malformed ones included.
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub batches: usize,
    /// Store count after the final commit.
    pub stored: u64,
}

/// Rounded share of `done` over `total`, in percent.
pub fn progress_pct(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Bulk importer: clears the store, then commits one transaction per batch.
///
/// A failure mid-import leaves the store holding exactly the batches committed so far.
pub struct Importer {
    store: RecordStore,
    spec: ImportSpec,
    bus: Option<Bus>,
}

impl Importer {
    pub fn new(store: RecordStore, spec: ImportSpec) -> Self {
        Self {
            store,
            spec,
            bus: None,
        }
    }

    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn spec(&self) -> &ImportSpec {
        &self.spec
    }

    fn publish(&self, kind: &str, payload: serde_json::Value) {
        if let Some(bus) = &self.bus {
            bus.publish(kind, &payload);
        }
    }

    pub async fn import_file(&self, path: &Path) -> Result<ImportReport, IngestError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let text = String::from_utf8_lossy(&bytes);
        self.import_text(&text).await
    }

    pub async fn import_text(&self, text: &str) -> Result<ImportReport, IngestError> {
        let rows = split_rows(text);
        let total_rows = rows.len();
        let batch_size = self.spec.batch_size.max(1);
        self.publish(
            topics::TOPIC_IMPORT_STARTED,
            json!({"total_rows": total_rows, "batch_size": batch_size}),
        );
        tracing::info!(total_rows, batch_size, "import started");

        let mut committed = 0usize;
        let mut batches = 0usize;
        let fail = |committed: usize, source: StoreError| {
            self.publish(
                topics::TOPIC_IMPORT_FAILED,
                json!({"committed": committed, "error": source.to_string()}),
            );
            tracing::warn!(committed, error = %source, "import failed");
            IngestError::Store { committed, source }
        };

        self.store.clear_async().await.map_err(|e| fail(0, e))?;

        let mut start = 0usize;
        while start < total_rows {
            let end = (start + batch_size).min(total_rows);
            let records: Vec<_> = rows[start..end]
                .iter()
                .filter_map(|line| parse_row(line, &self.spec))
                .collect();
            let written = if records.is_empty() {
                0
            } else {
                self.store
                    .append_batch_async(records)
                    .await
                    .map_err(|e| fail(committed, e))?
            };
            committed += written;
            batches += 1;
            let pct = progress_pct(end, total_rows);
            self.publish(
                topics::TOPIC_IMPORT_PROGRESS,
                json!({"pct": pct, "rows_done": end, "imported": committed}),
            );
            tracing::debug!(batch = batches, pct, imported = committed, "import batch committed");
            start = end;
            if start < total_rows {
                tokio::task::yield_now().await;
            }
        }

        let stored = self
            .store
            .count_async()
            .await
            .map_err(|e| fail(committed, e))?;
        let report = ImportReport {
            total_rows,
            imported: committed,
            skipped: total_rows - committed,
            batches,
            stored,
        };
        self.publish(topics::TOPIC_IMPORT_FINISHED, json!(report));
        let status = if stored > 0 {
            StoreStatus::Ready { count: stored }
        } else {
            StoreStatus::NoData
        };
        self.publish(topics::TOPIC_STORE_STATUS, json!(status));
        tracing::info!(imported = committed, skipped = report.skipped, stored, "import finished");
        Ok(report)
    }
}
