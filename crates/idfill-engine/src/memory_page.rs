//! In-memory [`FormPage`] used by tests and the offline replay command.

use idfill_heuristics::{ElementId, ElementKind, PageSnapshot};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::page::{FormPage, PageError, PageEvent, Suggestion};

type Reaction = Arc<dyn Fn(&mut PageSnapshot) + Send + Sync>;

/// Side effects recorded by a [`MemoryPage`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageJournal {
    pub events: Vec<(ElementId, PageEvent)>,
    pub clicks: Vec<ElementId>,
    pub focused: Option<ElementId>,
    pub suggestions: Option<(ElementId, Vec<Suggestion>)>,
}

struct State {
    page: PageSnapshot,
    journal: PageJournal,
}

/// A page held entirely in memory. Reactions registered with [`MemoryPage::react`]
/// mimic host-page scripts that respond to input/change notifications.
pub struct MemoryPage {
    state: Mutex<State>,
    reactions: Mutex<Vec<(ElementId, PageEvent, Reaction)>>,
}

impl MemoryPage {
    pub fn new(page: PageSnapshot) -> Self {
        Self {
            state: Mutex::new(State {
                page,
                journal: PageJournal::default(),
            }),
            reactions: Mutex::new(Vec::new()),
        }
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` on the page whenever `event` is dispatched on `handle`.
    pub fn react<F>(&self, handle: &str, event: PageEvent, f: F)
    where
        F: Fn(&mut PageSnapshot) + Send + Sync + 'static,
    {
        self.reactions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((handle.to_string(), event, Arc::new(f)));
    }

    /// Simulate the operator typing: replaces the value without notifications.
    pub fn type_text(&self, handle: &str, value: &str) -> Result<(), PageError> {
        let mut state = self.lock();
        let el = state
            .page
            .element_mut(handle)
            .ok_or_else(|| PageError::Missing(handle.to_string()))?;
        el.value = value.to_string();
        Ok(())
    }

    /// Apply an arbitrary edit, e.g. to re-render part of the page.
    pub fn edit<F: FnOnce(&mut PageSnapshot)>(&self, f: F) {
        f(&mut self.lock().page);
    }

    pub fn journal(&self) -> PageJournal {
        self.lock().journal.clone()
    }

    pub fn value_of(&self, handle: &str) -> Option<String> {
        self.lock().page.element(handle).map(|el| el.value.clone())
    }

    pub fn selected_text(&self, handle: &str) -> Option<String> {
        let state = self.lock();
        let el = state.page.element(handle)?;
        el.selected
            .and_then(|idx| el.options.get(idx))
            .map(|o| o.text.clone())
    }

    pub fn is_checked(&self, handle: &str) -> bool {
        self.lock()
            .page
            .element(handle)
            .is_some_and(|el| el.checked)
    }
}

impl FormPage for MemoryPage {
    fn snapshot(&self) -> PageSnapshot {
        self.lock().page.clone()
    }

    fn set_value(&self, handle: &str, value: &str) -> Result<(), PageError> {
        let mut state = self.lock();
        let el = state
            .page
            .element_mut(handle)
            .ok_or_else(|| PageError::Missing(handle.to_string()))?;
        if el.kind == ElementKind::Select {
            return Err(PageError::Unsupported {
                handle: handle.to_string(),
                action: "set_value",
            });
        }
        el.value = value.to_string();
        Ok(())
    }

    fn select_index(&self, handle: &str, index: usize) -> Result<(), PageError> {
        let mut state = self.lock();
        let el = state
            .page
            .element_mut(handle)
            .ok_or_else(|| PageError::Missing(handle.to_string()))?;
        if el.kind != ElementKind::Select {
            return Err(PageError::Unsupported {
                handle: handle.to_string(),
                action: "select_index",
            });
        }
        let value = el
            .options
            .get(index)
            .map(|o| o.value.clone())
            .ok_or_else(|| PageError::NoSuchOption {
                handle: handle.to_string(),
                index,
            })?;
        el.selected = Some(index);
        el.value = value;
        Ok(())
    }

    fn dispatch(&self, handle: &str, event: PageEvent) -> Result<(), PageError> {
        let reactions: Vec<Reaction> = self
            .reactions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|(h, e, _)| h == handle && *e == event)
            .map(|(_, _, f)| f.clone())
            .collect();
        let mut state = self.lock();
        if state.page.element(handle).is_none() {
            return Err(PageError::Missing(handle.to_string()));
        }
        state.journal.events.push((handle.to_string(), event));
        for reaction in reactions {
            reaction(&mut state.page);
        }
        Ok(())
    }

    fn click(&self, handle: &str) -> Result<(), PageError> {
        let mut state = self.lock();
        let el = state
            .page
            .element_mut(handle)
            .ok_or_else(|| PageError::Missing(handle.to_string()))?;
        if el.kind == ElementKind::Checkbox {
            el.checked = !el.checked;
        }
        state.journal.clicks.push(handle.to_string());
        Ok(())
    }

    fn focus(&self, handle: &str) -> Result<(), PageError> {
        let mut state = self.lock();
        if state.page.element(handle).is_none() {
            return Err(PageError::Missing(handle.to_string()));
        }
        state.journal.focused = Some(handle.to_string());
        Ok(())
    }

    fn show_suggestions(&self, anchor: &str, items: &[Suggestion]) -> Result<(), PageError> {
        let mut state = self.lock();
        if state.page.element(anchor).is_none() {
            return Err(PageError::Missing(anchor.to_string()));
        }
        state.journal.suggestions = Some((anchor.to_string(), items.to_vec()));
        Ok(())
    }

    fn clear_suggestions(&self) -> Result<(), PageError> {
        self.lock().journal.suggestions = None;
        Ok(())
    }
}
