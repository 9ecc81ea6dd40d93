//! Persistent person-record store: SQLite table keyed by a surrogate id with a
//! non-unique secondary index on the 4-digit identifier suffix.

mod error;
mod record;
mod store;

pub use error::{Result, StoreError};
pub use record::{identifier_suffix, is_valid_suffix, PersonRecord, SUFFIX_LEN};
pub use store::{RecordStore, StoreOptions, StoreStatus, SCHEMA_VERSION};
