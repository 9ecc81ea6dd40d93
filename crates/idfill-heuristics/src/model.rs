//! Abstract view of a live form page, decoupled from any concrete DOM.

use serde::{Deserialize, Serialize};

/// Opaque handle the host uses to address an element.
pub type ElementId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    TextInput,
    Checkbox,
    Select,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub text: String,
    #[serde(default)]
    pub value: String,
}

impl SelectOption {
    pub fn new(text: &str, value: &str) -> Self {
        Self {
            text: text.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormElement {
    pub handle: ElementId,
    pub kind: ElementKind,
    /// Document-level id attribute, the target of a label's `for`.
    #[serde(default)]
    pub dom_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Visible text of the nearest labeling container.
    #[serde(default)]
    pub container_text: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub selected: Option<usize>,
}

impl FormElement {
    pub fn new(handle: &str, kind: ElementKind) -> Self {
        Self {
            handle: handle.to_string(),
            kind,
            dom_id: None,
            name: None,
            placeholder: None,
            container_text: None,
            value: String::new(),
            checked: false,
            options: Vec::new(),
            selected: None,
        }
    }

    pub fn text_input(handle: &str) -> Self {
        Self::new(handle, ElementKind::TextInput)
    }

    pub fn select(handle: &str, options: &[(&str, &str)]) -> Self {
        let mut el = Self::new(handle, ElementKind::Select);
        el.options = options
            .iter()
            .map(|(text, value)| SelectOption::new(text, value))
            .collect();
        el
    }

    pub fn checkbox(handle: &str) -> Self {
        Self::new(handle, ElementKind::Checkbox)
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_container_text(mut self, text: &str) -> Self {
        self.container_text = Some(text.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_dom_id(mut self, id: &str) -> Self {
        self.dom_id = Some(id.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn is_text_entry(&self) -> bool {
        self.kind == ElementKind::TextInput
    }
}

/// A `<label>`-like element and the controls reachable from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLabel {
    pub text: String,
    /// Explicit `for` target (a `dom_id`).
    #[serde(default)]
    pub for_target: Option<String>,
    /// Controls nested inside the label.
    #[serde(default)]
    pub nested: Vec<ElementId>,
    /// Controls inside the label's parent container.
    #[serde(default)]
    pub container: Vec<ElementId>,
}

/// Everything the classifier may look at, captured fresh for each event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub elements: Vec<FormElement>,
    #[serde(default)]
    pub labels: Vec<FormLabel>,
}

impl PageSnapshot {
    pub fn element(&self, handle: &str) -> Option<&FormElement> {
        self.elements.iter().find(|el| el.handle == handle)
    }

    pub fn element_mut(&mut self, handle: &str) -> Option<&mut FormElement> {
        self.elements.iter_mut().find(|el| el.handle == handle)
    }

    pub fn by_dom_id(&self, dom_id: &str) -> Option<&FormElement> {
        self.elements
            .iter()
            .find(|el| el.dom_id.as_deref() == Some(dom_id))
    }
}
