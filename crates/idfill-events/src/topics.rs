//! Canonical event topic constants.
//!
//! Keep this list grouped by component and favor dot.case names.

// Import pipeline
pub const TOPIC_IMPORT_STARTED: &str = "import.started";
pub const TOPIC_IMPORT_PROGRESS: &str = "import.progress";
pub const TOPIC_IMPORT_FINISHED: &str = "import.finished";
pub const TOPIC_IMPORT_FAILED: &str = "import.failed";

// Record store
pub const TOPIC_STORE_STATUS: &str = "store.status";

// Fill orchestrator
pub const TOPIC_FILL_SUGGESTED: &str = "fill.suggested";
pub const TOPIC_FILL_APPLIED: &str = "fill.applied";
pub const TOPIC_FILL_DEFAULTS_APPLIED: &str = "fill.defaults.applied";
