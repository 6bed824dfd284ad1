use crate::document::Document;
use crate::errors::StoreError;
use crate::models::{Habit, HabitId, HabitSummary, StateResponse, Target};
use crate::storage::{load_habits, persist_habits, Storage};
use crate::store::{progress, HabitStore};
use crate::ui::render_page;
use crate::validate::{validate, FormFields, InvalidFields, ValidForm};
use crate::view::{Action, Form, Renderer};
use serde_json::Value;
use tracing::{debug, error, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Mutating,
    Persisting,
    Rendering,
}

/// Where a submission came from. Only page forms are reflected back into the
/// document's form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Page,
    Api,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied(Habit),
    Invalid(InvalidFields),
    Ignored(StoreError),
    PopupToggled(bool),
}

/// Runs every user action to completion: validate, mutate, save, render.
pub struct Controller {
    store: HabitStore,
    renderer: Renderer,
    document: Document,
    storage: Storage,
    retained: Vec<Value>,
    popup_open: bool,
    location: Option<String>,
    notice: Option<String>,
    phase: Phase,
}

impl Controller {
    pub async fn init(storage: Storage) -> Self {
        let stored = load_habits(&storage).await;
        info!(
            count = stored.habits.len(),
            retained = stored.retained.len(),
            "loaded habits"
        );

        let mut store = HabitStore::new(stored.habits.clone());
        for id in stored.retained_ids() {
            store.reserve_id(id);
        }
        let mut controller = Self {
            popup_open: store.habits().is_empty(),
            store,
            renderer: Renderer::new(),
            document: Document::new(),
            storage,
            retained: stored.retained,
            location: None,
            notice: None,
            phase: Phase::Idle,
        };
        controller.render();
        controller
    }

    pub fn store(&self) -> &HabitStore {
        &self.store
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fragment reflecting the active habit, e.g. `#3`.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn page(&self) -> String {
        render_page(&self.document.to_html())
    }

    pub fn snapshot(&self) -> StateResponse {
        StateResponse {
            habits: self
                .store
                .habits()
                .iter()
                .map(|habit| HabitSummary {
                    progress: progress(habit.days.len(), &habit.target),
                    habit: habit.clone(),
                })
                .collect(),
            active_habit_id: self.store.active_id(),
            notice: self.notice.clone(),
        }
    }

    /// Habit form submitted from the page.
    pub async fn submit_habit(&mut self, raw: &FormFields) -> Outcome {
        self.create_habit(Origin::Page, raw).await
    }

    pub async fn create_habit(&mut self, origin: Origin, raw: &FormFields) -> Outcome {
        let form = match self.validate(origin, Form::Habit, raw) {
            Ok(form) => form,
            Err(invalid) => return Outcome::Invalid(invalid),
        };

        self.transition(Phase::Mutating);
        let created = self.store.create_habit(
            form.get("name"),
            Target::from(form.get("target")),
            form.get("icon"),
        );
        match created {
            Ok(habit) => {
                info!(id = habit.id, name = %habit.name, "habit created");
                if origin == Origin::Page {
                    self.renderer
                        .fill_fields(&mut self.document, Form::Habit, &FormFields::new());
                    self.popup_open = false;
                }
                self.commit(habit).await
            }
            Err(err) => self.reject(origin, Form::Habit, raw, err),
        }
    }

    /// Logs a day for the active habit.
    pub async fn submit_day(&mut self, raw: &FormFields) -> Outcome {
        match self.store.active_id() {
            Some(id) => self.log_day(Origin::Page, id, raw).await,
            None => self.reject(Origin::Page, Form::Day, raw, StoreError::NoActiveHabit),
        }
    }

    pub async fn log_day(&mut self, origin: Origin, id: HabitId, raw: &FormFields) -> Outcome {
        let form = match self.validate(origin, Form::Day, raw) {
            Ok(form) => form,
            Err(invalid) => return Outcome::Invalid(invalid),
        };

        self.transition(Phase::Mutating);
        match self.store.log_day(id, form.get("comment")) {
            Ok(habit) => {
                debug!(id, days = habit.days.len(), "day logged");
                if origin == Origin::Page {
                    self.renderer
                        .fill_fields(&mut self.document, Form::Day, &FormFields::new());
                }
                self.commit(habit).await
            }
            Err(err) => self.reject(origin, Form::Day, raw, err),
        }
    }

    pub async fn remove_day(&mut self, id: HabitId, index: usize) -> Outcome {
        self.transition(Phase::Mutating);
        match self.store.remove_day(id, index) {
            Ok(habit) => {
                debug!(id, index, "day removed");
                self.commit(habit).await
            }
            Err(err) => self.ignore(err),
        }
    }

    /// Selection change: renders, never saves.
    pub fn select(&mut self, id: HabitId) -> Outcome {
        self.transition(Phase::Mutating);
        match self.store.set_active_habit(id) {
            Ok(habit) => {
                self.transition(Phase::Rendering);
                self.render();
                self.transition(Phase::Idle);
                Outcome::Applied(habit)
            }
            Err(err) => self.ignore(err),
        }
    }

    pub fn toggle_popup(&mut self) -> Outcome {
        self.popup_open = !self.popup_open;
        self.renderer.show_popup(&mut self.document, self.popup_open);
        Outcome::PopupToggled(self.popup_open)
    }

    pub async fn dispatch(&mut self, action: Action) -> Outcome {
        match action {
            Action::SelectHabit(id) => self.select(id),
            Action::RemoveDay { habit, index } => self.remove_day(habit, index).await,
            Action::TogglePopup => self.toggle_popup(),
        }
    }

    fn validate(
        &mut self,
        origin: Origin,
        form: Form,
        raw: &FormFields,
    ) -> Result<ValidForm, InvalidFields> {
        self.transition(Phase::Validating);
        let result = validate(raw, form.fields());
        match &result {
            Ok(_) if origin == Origin::Page => {
                self.renderer.flag_fields(&mut self.document, form, &[])
            }
            Ok(_) => {}
            Err(invalid) => self.mark_invalid(origin, form, raw, invalid),
        }
        result
    }

    fn mark_invalid(&mut self, origin: Origin, form: Form, raw: &FormFields, invalid: &InvalidFields) {
        debug!(?origin, ?form, fields = ?invalid.fields, "form rejected");
        self.transition(Phase::Idle);
        if origin == Origin::Api {
            return;
        }
        self.renderer
            .flag_fields(&mut self.document, form, &invalid.fields);
        self.renderer.fill_fields(&mut self.document, form, raw);
        if form == Form::Habit {
            self.popup_open = true;
            self.renderer.show_popup(&mut self.document, true);
        }
    }

    fn reject(&mut self, origin: Origin, form: Form, raw: &FormFields, err: StoreError) -> Outcome {
        match err {
            StoreError::Validation { field } => {
                let invalid = InvalidFields {
                    fields: vec![field.to_string()],
                };
                self.mark_invalid(origin, form, raw, &invalid);
                Outcome::Invalid(invalid)
            }
            other => self.ignore(other),
        }
    }

    fn ignore(&mut self, err: StoreError) -> Outcome {
        debug!(error = %err, "ignoring stale request");
        self.transition(Phase::Idle);
        Outcome::Ignored(err)
    }

    async fn commit(&mut self, habit: Habit) -> Outcome {
        self.transition(Phase::Persisting);
        self.notice = match persist_habits(&self.storage, self.store.habits(), &self.retained).await {
            Ok(()) => None,
            Err(err) => {
                error!("failed to save habits: {}", err.message);
                Some(format!("Changes could not be saved: {}", err.message))
            }
        };

        self.transition(Phase::Rendering);
        self.render();
        self.transition(Phase::Idle);
        Outcome::Applied(habit)
    }

    fn render(&mut self) {
        self.renderer.render(&mut self.document, &self.store);
        self.renderer.show_popup(&mut self.document, self.popup_open);
        self.renderer
            .show_notice(&mut self.document, self.notice.as_deref());
        self.location = self.store.active_id().map(|id| format!("#{id}"));
    }

    fn transition(&mut self, next: Phase) {
        trace!(from = ?self.phase, to = ?next, "phase");
        self.phase = next;
    }
}
