use idfill_store::StoreError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("reading import file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The store failed mid-import; `committed` records from earlier batches remain stored.
    #[error("record store failed after {committed} committed records: {source}")]
    Store {
        committed: usize,
        #[source]
        source: StoreError,
    },
}
