use idfill_heuristics::{ElementId, PageSnapshot};
use serde::{Deserialize, Serialize};

/// Notification emitted after a programmatic mutation so host-page logic observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageEvent {
    Input,
    Change,
}

/// One entry of the name-suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub value: String,
    pub label: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("element {0} is not on the page")]
    Missing(ElementId),
    #[error("element {handle} does not support {action}")]
    Unsupported {
        handle: ElementId,
        action: &'static str,
    },
    #[error("option {index} out of range for {handle}")]
    NoSuchOption { handle: ElementId, index: usize },
}

/// Host page seam. Implementations observe and mutate the live page; every call runs on
/// the single UI thread, so methods take `&self` and use interior mutability.
pub trait FormPage: Send + Sync {
    /// Fresh view of the page's interactive elements and labels.
    fn snapshot(&self) -> PageSnapshot;

    fn set_value(&self, handle: &str, value: &str) -> Result<(), PageError>;

    fn select_index(&self, handle: &str, index: usize) -> Result<(), PageError>;

    fn dispatch(&self, handle: &str, event: PageEvent) -> Result<(), PageError>;

    fn click(&self, handle: &str) -> Result<(), PageError>;

    fn focus(&self, handle: &str) -> Result<(), PageError>;

    /// Attach `items` as the selectable suggestion list of `anchor`, replacing any previous list.
    fn show_suggestions(&self, anchor: &str, items: &[Suggestion]) -> Result<(), PageError>;

    fn clear_suggestions(&self) -> Result<(), PageError>;
}
