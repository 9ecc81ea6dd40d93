//! Fill orchestration: reacts to page input, resolves identifiers against the record
//! store and populates the form.

mod memory_page;
mod orchestrator;
mod page;
mod profile;

pub use memory_page::{MemoryPage, PageJournal};
pub use orchestrator::{typed_suffix, FillOutcome, FillReport, Orchestrator};
pub use page::{FormPage, PageError, PageEvent, Suggestion};
pub use profile::{keywords_from_config, FillProfile};
