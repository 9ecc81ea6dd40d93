use idfill_core::FillDefaults;
use idfill_events::{topics, Bus};
use idfill_heuristics::{
    find_name_field, is_identifier_field, is_name_field, match_option, FieldMap, FormElement,
    PageSnapshot, SelectOption,
};
use idfill_store::{is_valid_suffix, PersonRecord, RecordStore, StoreStatus, SUFFIX_LEN};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, Mutex, RwLock};

use crate::page::{FormPage, PageError, PageEvent, Suggestion};
use crate::profile::FillProfile;

/// What a single input event led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FillOutcome {
    /// The event did not come from a tracked field.
    Ignored,
    /// Identifier typed but no name field is on the page.
    NoNameField,
    /// Identifier not yet at full length.
    Incomplete { len: usize },
    NoMatch,
    /// Several candidates are waiting for the operator to pick one.
    Suggested { count: usize },
    Filled {
        person: PersonRecord,
        report: FillReport,
    },
    /// An internal failure was contained at the listener boundary.
    Failed { reason: String },
}

/// Which fill steps took effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub name_set: bool,
    pub gender_option: Option<usize>,
    pub date_of_birth: Option<String>,
    pub sub_district_option: Option<usize>,
    pub block_option: Option<usize>,
    pub consent_clicked: bool,
}

/// Trailing digits of a typed identifier, or `None` if they are not all digits.
pub fn typed_suffix(typed: &str) -> Option<String> {
    let chars: Vec<char> = typed.chars().collect();
    if chars.len() < SUFFIX_LEN {
        return None;
    }
    let tail: String = chars[chars.len() - SUFFIX_LEN..].iter().collect();
    is_valid_suffix(&tail).then_some(tail)
}

/// Reacts to page input events, resolves identifiers against the store, and fills the form.
///
/// The only session state is the current match set, replaced on every qualifying lookup.
pub struct Orchestrator<P: FormPage> {
    page: Arc<P>,
    store: Option<RecordStore>,
    profile: FillProfile,
    defaults: RwLock<FillDefaults>,
    matches: Mutex<Vec<PersonRecord>>,
    bus: Option<Bus>,
}

impl<P: FormPage + 'static> Orchestrator<P> {
    /// `store: None` runs the engine in "no data" mode: every lookup finds nothing.
    pub fn new(page: Arc<P>, store: Option<RecordStore>, profile: FillProfile) -> Self {
        Self {
            page,
            store,
            profile,
            defaults: RwLock::new(FillDefaults::default()),
            matches: Mutex::new(Vec::new()),
            bus: None,
        }
    }

    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_defaults(self, defaults: FillDefaults) -> Self {
        self.set_defaults(defaults);
        self
    }

    pub fn set_defaults(&self, defaults: FillDefaults) {
        *self
            .defaults
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = defaults;
    }

    pub fn defaults(&self) -> FillDefaults {
        self.defaults
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn current_matches(&self) -> Vec<PersonRecord> {
        self.matches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn replace_matches(&self, matches: Vec<PersonRecord>) {
        *self
            .matches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = matches;
    }

    pub fn profile(&self) -> &FillProfile {
        &self.profile
    }

    pub fn page(&self) -> &Arc<P> {
        &self.page
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus::of(self.store.as_ref())
    }

    fn publish(&self, kind: &str, payload: serde_json::Value) {
        if let Some(bus) = &self.bus {
            bus.publish(kind, &payload);
        }
    }

    /// Listener entry point for an input event on `target`.
    ///
    /// Runs the handling on its own task so that a panic is contained here and reported
    /// as [`FillOutcome::Failed`] instead of unwinding into the host's event dispatch.
    pub async fn on_input(self: &Arc<Self>, target: &str) -> FillOutcome {
        let this = Arc::clone(self);
        let target = target.to_string();
        match tokio::spawn(async move { this.handle_input(&target).await }).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, "input handler aborted");
                FillOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Handle an input event inline. Prefer [`Orchestrator::on_input`] at the host boundary.
    pub async fn handle_input(&self, target: &str) -> FillOutcome {
        let page = self.page.snapshot();
        let Some(el) = page.element(target) else {
            tracing::debug!(target, "input from unknown element");
            return FillOutcome::Ignored;
        };
        let kw = &self.profile.keywords;
        let mut outcome = FillOutcome::Ignored;
        if is_identifier_field(el, kw) {
            outcome = self.on_identifier_input(el, &page).await;
        }
        if is_name_field(el, kw) {
            let selected = self.on_name_input(el).await;
            if matches!(selected, FillOutcome::Filled { .. }) || outcome == FillOutcome::Ignored {
                outcome = selected;
            }
        }
        outcome
    }

    async fn on_identifier_input(&self, el: &FormElement, page: &PageSnapshot) -> FillOutcome {
        let typed: String = el.value.chars().filter(|c| !c.is_whitespace()).collect();
        let Some(name_field) = find_name_field(&page.elements, &self.profile.keywords) else {
            tracing::debug!("identifier typed but no name field on page");
            return FillOutcome::NoNameField;
        };
        let len = typed.chars().count();
        if len != self.profile.identifier_length {
            return FillOutcome::Incomplete { len };
        }

        let matches = match typed_suffix(&typed) {
            Some(suffix) => self.lookup(&suffix).await,
            None => Vec::new(),
        };
        self.replace_matches(matches.clone());

        if matches.is_empty() {
            self.attempt("clear suggestions", self.page.clear_suggestions());
            return FillOutcome::NoMatch;
        }

        let items: Vec<Suggestion> = matches
            .iter()
            .map(|m| Suggestion {
                value: m.name.clone(),
                label: m.suggestion_label(),
            })
            .collect();
        self.attempt(
            "show suggestions",
            self.page.show_suggestions(&name_field.handle, &items),
        );
        self.publish(
            topics::TOPIC_FILL_SUGGESTED,
            json!({"count": matches.len(), "suffix": matches[0].identifier_suffix}),
        );

        if let [person] = matches.as_slice() {
            let report = self.fill(person).await;
            return FillOutcome::Filled {
                person: person.clone(),
                report,
            };
        }
        self.attempt("focus name field", self.page.focus(&name_field.handle));
        FillOutcome::Suggested {
            count: matches.len(),
        }
    }

    async fn on_name_input(&self, el: &FormElement) -> FillOutcome {
        // Duplicate names within one match set resolve to the first record.
        let chosen = self
            .current_matches()
            .into_iter()
            .find(|p| p.name == el.value);
        match chosen {
            Some(person) => {
                let report = self.fill(&person).await;
                FillOutcome::Filled { person, report }
            }
            None => FillOutcome::Ignored,
        }
    }

    async fn lookup(&self, suffix: &str) -> Vec<PersonRecord> {
        let Some(store) = &self.store else {
            tracing::debug!(suffix, "no record store; lookup skipped");
            return Vec::new();
        };
        match store.find_by_suffix_async(suffix).await {
            Ok(found) => {
                tracing::debug!(suffix, count = found.len(), "suffix lookup");
                found
            }
            Err(err) => {
                tracing::warn!(suffix, error = %err, "record lookup failed");
                Vec::new()
            }
        }
    }

    fn attempt(&self, what: &str, result: Result<(), PageError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(step = what, error = %err, "page mutation failed");
                false
            }
        }
    }

    fn choose(&self, handle: &str, options: &[SelectOption], wanted: &str) -> Option<usize> {
        let idx = match_option(options, wanted)?;
        let ok = self.attempt("select option", self.page.select_index(handle, idx))
            && self.attempt("change event", self.page.dispatch(handle, PageEvent::Change));
        ok.then_some(idx)
    }

    /// Populate the form from `person`: name, gender and birth date immediately, then the
    /// configured defaults and consent after the settle delay.
    pub async fn fill(&self, person: &PersonRecord) -> FillReport {
        let mut report = FillReport::default();
        let kw = &self.profile.keywords;
        let page = self.page.snapshot();
        let fields = FieldMap::scan(&page, kw);

        if let Some(el) = fields.name.as_deref().and_then(|h| page.element(h)) {
            if el.value != person.name {
                report.name_set = self
                    .attempt("set name", self.page.set_value(&el.handle, &person.name))
                    && self.attempt(
                        "name input event",
                        self.page.dispatch(&el.handle, PageEvent::Input),
                    );
            }
        }

        if !person.gender.trim().is_empty() {
            if let Some(el) = fields.gender.as_deref().and_then(|h| page.element(h)) {
                report.gender_option = self.choose(&el.handle, &el.options, &person.gender);
            }
        }

        if self.profile.fill_date_of_birth {
            let year = person.birth_year.as_deref().map(str::trim).unwrap_or("");
            if let (Some(handle), false) = (fields.date_of_birth.as_deref(), year.is_empty()) {
                let dob = format!("01/01/{year}");
                let ok = self.attempt("set dob", self.page.set_value(handle, &dob))
                    && self.attempt("dob input event", self.page.dispatch(handle, PageEvent::Input))
                    && self.attempt("dob change event", self.page.dispatch(handle, PageEvent::Change));
                if ok {
                    report.date_of_birth = Some(dob);
                }
            }
        }

        self.publish(
            topics::TOPIC_FILL_APPLIED,
            json!({"suffix": person.identifier_suffix, "report": report}),
        );

        let defaults = self.defaults();
        tokio::time::sleep(self.profile.settle_delay).await;

        // Dependent selectors may have been re-rendered; look again.
        let page = self.page.snapshot();
        let fields = FieldMap::scan(&page, kw);
        if !defaults.sub_district.trim().is_empty() {
            if let Some(el) = fields.sub_district.as_deref().and_then(|h| page.element(h)) {
                report.sub_district_option =
                    self.choose(&el.handle, &el.options, &defaults.sub_district);
            }
        }
        // Choosing a sub-district usually repopulates the block options.
        let page = self.page.snapshot();
        let fields = FieldMap::scan(&page, kw);
        if !defaults.block.trim().is_empty() {
            if let Some(el) = fields.block.as_deref().and_then(|h| page.element(h)) {
                report.block_option = self.choose(&el.handle, &el.options, &defaults.block);
            }
        }
        if let Some(el) = fields.consent.as_deref().and_then(|h| page.element(h)) {
            if !el.checked {
                report.consent_clicked = self.attempt("click consent", self.page.click(&el.handle));
            }
        }

        self.publish(
            topics::TOPIC_FILL_DEFAULTS_APPLIED,
            json!({
                "sub_district": report.sub_district_option,
                "block": report.block_option,
                "consent": report.consent_clicked,
            }),
        );
        tracing::info!(suffix = %person.identifier_suffix, "form filled");
        report
    }
}
