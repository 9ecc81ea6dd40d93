//! Stateless field-classification heuristics over an abstract form page.
//!
//! Nothing here is cached: callers hand in a fresh [`PageSnapshot`] per event because
//! the host page may re-render between events.

use serde::{Deserialize, Serialize};

mod keywords;
mod model;

pub use keywords::{contains_any, contains_any_ci, Keywords};
pub use model::{ElementId, ElementKind, FormElement, FormLabel, PageSnapshot, SelectOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Identifier,
    Name,
    Gender,
    SubRegion,
    SubBlock,
    DateOfBirth,
    Consent,
    Unknown,
}

fn placeholder_or_container_ci(el: &FormElement, needles: &[String]) -> bool {
    el.placeholder
        .as_deref()
        .is_some_and(|p| contains_any_ci(p, needles))
        || el
            .container_text
            .as_deref()
            .is_some_and(|t| contains_any_ci(t, needles))
}

pub fn is_identifier_field(el: &FormElement, kw: &Keywords) -> bool {
    el.is_text_entry() && placeholder_or_container_ci(el, &kw.identifier)
}

pub fn is_name_field(el: &FormElement, kw: &Keywords) -> bool {
    el.is_text_entry() && placeholder_or_container_ci(el, &kw.name)
}

fn is_gender_selector(el: &FormElement, kw: &Keywords) -> bool {
    if el.kind != ElementKind::Select {
        return false;
    }
    let markup: String = el
        .options
        .iter()
        .flat_map(|o| [o.text.as_str(), o.value.as_str()])
        .collect::<Vec<_>>()
        .join(" ");
    contains_any_ci(&markup, &kw.gender_option)
}

fn is_date_of_birth_field(el: &FormElement, kw: &Keywords) -> bool {
    el.is_text_entry()
        && (el
            .placeholder
            .as_deref()
            .is_some_and(|p| contains_any(p, &kw.dob_placeholder))
            || el
                .container_text
                .as_deref()
                .is_some_and(|t| contains_any(t, &kw.dob_label)))
}

fn select_matches_label(el: &FormElement, label: &str) -> bool {
    let needle = [label.to_string()];
    el.kind == ElementKind::Select
        && (el.name.as_deref().is_some_and(|n| contains_any_ci(n, &needle))
            || el
                .container_text
                .as_deref()
                .is_some_and(|t| contains_any_ci(t, &needle)))
}

pub fn find_name_field<'a>(els: &'a [FormElement], kw: &Keywords) -> Option<&'a FormElement> {
    els.iter().find(|el| is_name_field(el, kw))
}

/// First selection control whose option markup mentions a gender keyword.
pub fn find_gender_selector<'a>(els: &'a [FormElement], kw: &Keywords) -> Option<&'a FormElement> {
    els.iter().find(|el| is_gender_selector(el, kw))
}

pub fn find_date_of_birth_field<'a>(
    els: &'a [FormElement],
    kw: &Keywords,
) -> Option<&'a FormElement> {
    els.iter().find(|el| is_date_of_birth_field(el, kw))
}

/// First selection control whose name or container text holds a label; labels are tried in order.
pub fn find_selector_by_label<'a>(
    els: &'a [FormElement],
    labels: &[String],
) -> Option<&'a FormElement> {
    labels
        .iter()
        .filter(|l| !l.trim().is_empty())
        .find_map(|label| els.iter().find(|el| select_matches_label(el, label)))
}

/// Checkbox tied to the first label mentioning consent: its `for` target, then a nested
/// checkbox, then a checkbox in the label's parent container.
pub fn find_consent_checkbox<'a>(page: &'a PageSnapshot, kw: &Keywords) -> Option<&'a FormElement> {
    let label = page
        .labels
        .iter()
        .find(|l| contains_any_ci(&l.text, &kw.consent))?;
    let checkbox = |el: &&FormElement| el.kind == ElementKind::Checkbox;
    label
        .for_target
        .as_deref()
        .and_then(|id| page.by_dom_id(id))
        .filter(checkbox)
        .or_else(|| {
            label
                .nested
                .iter()
                .filter_map(|h| page.element(h))
                .find(checkbox)
        })
        .or_else(|| {
            label
                .container
                .iter()
                .filter_map(|h| page.element(h))
                .find(checkbox)
        })
}

/// Index of the first option whose text or value contains `wanted` (trimmed, case-insensitive).
pub fn match_option(options: &[SelectOption], wanted: &str) -> Option<usize> {
    let target = wanted.trim().to_lowercase();
    if target.is_empty() {
        return None;
    }
    options.iter().position(|o| {
        o.text.to_lowercase().contains(&target) || o.value.to_lowercase().contains(&target)
    })
}

/// Role of a single element, judged on its own attributes.
pub fn classify(el: &FormElement, kw: &Keywords) -> FieldRole {
    match el.kind {
        ElementKind::TextInput => {
            if is_identifier_field(el, kw) {
                FieldRole::Identifier
            } else if is_name_field(el, kw) {
                FieldRole::Name
            } else if is_date_of_birth_field(el, kw) {
                FieldRole::DateOfBirth
            } else {
                FieldRole::Unknown
            }
        }
        ElementKind::Select => {
            if is_gender_selector(el, kw) {
                FieldRole::Gender
            } else if kw.sub_district.iter().any(|l| select_matches_label(el, l)) {
                FieldRole::SubRegion
            } else if kw.block.iter().any(|l| select_matches_label(el, l)) {
                FieldRole::SubBlock
            } else {
                FieldRole::Unknown
            }
        }
        ElementKind::Checkbox => {
            if el
                .container_text
                .as_deref()
                .is_some_and(|t| contains_any_ci(t, &kw.consent))
            {
                FieldRole::Consent
            } else {
                FieldRole::Unknown
            }
        }
        ElementKind::Other => FieldRole::Unknown,
    }
}

/// Fill targets located on one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldMap {
    pub name: Option<ElementId>,
    pub gender: Option<ElementId>,
    pub date_of_birth: Option<ElementId>,
    pub sub_district: Option<ElementId>,
    pub block: Option<ElementId>,
    pub consent: Option<ElementId>,
}

impl FieldMap {
    pub fn scan(page: &PageSnapshot, kw: &Keywords) -> Self {
        let els = &page.elements;
        let handle = |el: Option<&FormElement>| el.map(|e| e.handle.clone());
        Self {
            name: handle(find_name_field(els, kw)),
            gender: handle(find_gender_selector(els, kw)),
            date_of_birth: handle(find_date_of_birth_field(els, kw)),
            sub_district: handle(find_selector_by_label(els, &kw.sub_district)),
            block: handle(find_selector_by_label(els, &kw.block)),
            consent: handle(find_consent_checkbox(page, kw)),
        }
    }
}
