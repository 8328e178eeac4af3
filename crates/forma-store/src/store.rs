//! The form store: one draft, many saved forms.

use chrono::Utc;
use forma_core::ids::{PREFIX_FORM, generate_id};
use forma_core::{Field, FieldValues, FormSchema, FormSummary};
use forma_eval::{Recomputation, recompute_in_order};
use forma_schema::{Removal, WorkingForm, check_invariants};
use forma_validate::{ValidationErrors, validate_all};

use crate::backend::SavedFormsBackend;
use crate::error::StoreError;

/// Owns the working form and the saved-forms collection.
///
/// Every mutation takes `&mut self`, so one store has one writer. Callers that
/// hold on to a revision across turns check it with [`FormStore::ensure_revision`]
/// or submit through [`FormStore::submit_at`].
#[derive(Debug)]
pub struct FormStore<B> {
    backend: B,
    saved: Vec<FormSchema>,
    working: WorkingForm,
    base_revision: u64,
}

impl<B: SavedFormsBackend> FormStore<B> {
    /// Load the saved collection from `backend` and start with an empty draft.
    ///
    /// Saved forms that break structural invariants are kept, with a warning
    /// per violation.
    ///
    /// # Errors
    ///
    /// `StoreError::Persistence` if the collection cannot be loaded.
    pub fn open(backend: B) -> Result<Self, StoreError> {
        let saved = backend.load_saved_forms()?;
        for form in &saved {
            for violation in check_invariants(form) {
                tracing::warn!(
                    form_id = %form.id,
                    field_id = %violation.field_id,
                    "saved form violates schema invariants: {}",
                    violation.message
                );
            }
        }
        tracing::debug!(forms = saved.len(), "form store opened");
        Ok(Self {
            backend,
            saved,
            working: WorkingForm::new(),
            base_revision: 0,
        })
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// The current draft.
    #[must_use]
    pub const fn draft(&self) -> &FormSchema {
        self.working.schema()
    }

    #[must_use]
    pub const fn working(&self) -> &WorkingForm {
        &self.working
    }

    /// Monotonic across the lifetime of the store, including draft
    /// replacement.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.base_revision + self.working.revision()
    }

    // --- Saved forms ---

    #[must_use]
    pub fn saved_forms(&self) -> &[FormSchema] {
        &self.saved
    }

    #[must_use]
    pub fn list_saved(&self) -> Vec<FormSummary> {
        self.saved.iter().map(FormSchema::summary).collect()
    }

    #[must_use]
    pub fn get_saved(&self, id: &str) -> Option<&FormSchema> {
        self.saved.iter().find(|f| f.id == id)
    }

    /// Replace the draft with a fresh empty form.
    pub fn create_draft(&mut self) -> &FormSchema {
        self.replace_working(WorkingForm::new());
        self.working.schema()
    }

    /// Name and timestamp the draft, append a copy to the saved collection,
    /// persist it, and start a fresh draft.
    ///
    /// A draft whose id is already in the collection (one loaded for editing)
    /// is saved under a new id; saved forms are never overwritten.
    ///
    /// # Errors
    ///
    /// `EmptyName` if `name` is blank and the draft has no fields,
    /// `Persistence` if the backend write fails (nothing changes).
    pub fn save_draft(&mut self, name: &str) -> Result<FormSchema, StoreError> {
        if name.trim().is_empty() && self.working.schema().fields.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let mut form = self.working.schema().clone();
        form.name = name.to_string();
        form.created_at = Utc::now();
        if self.get_saved(&form.id).is_some() {
            form.id = generate_id(PREFIX_FORM);
        }

        let mut next = self.saved.clone();
        next.push(form.clone());
        self.backend.persist_saved_forms(&next)?;

        self.saved = next;
        self.replace_working(WorkingForm::new());
        tracing::info!(form_id = %form.id, name = %form.name, fields = form.fields.len(), "form saved");
        Ok(form)
    }

    /// Make a deep copy of a saved form the draft.
    ///
    /// # Errors
    ///
    /// `NotFound` if no saved form has this id.
    pub fn load_for_editing_or_preview(&mut self, id: &str) -> Result<&FormSchema, StoreError> {
        let form = self
            .get_saved(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        self.replace_working(WorkingForm::from_schema(form));
        tracing::debug!(form_id = id, "saved form loaded into draft");
        Ok(self.working.schema())
    }

    /// Remove a saved form and persist. Returns whether it existed; an
    /// unknown id changes nothing.
    ///
    /// # Errors
    ///
    /// `Persistence` if the backend write fails (nothing changes).
    pub fn delete_saved(&mut self, id: &str) -> Result<bool, StoreError> {
        if self.get_saved(id).is_none() {
            return Ok(false);
        }
        let next: Vec<FormSchema> = self.saved.iter().filter(|f| f.id != id).cloned().collect();
        self.backend.persist_saved_forms(&next)?;
        self.saved = next;
        tracing::info!(form_id = id, "saved form deleted");
        Ok(true)
    }

    // --- Editor ---

    pub fn set_name(&mut self, name: impl Into<String>) -> &FormSchema {
        self.working.set_name(name)
    }

    /// # Errors
    ///
    /// See [`WorkingForm::add_field`].
    pub fn add_field(&mut self, field: Field) -> Result<&FormSchema, StoreError> {
        Ok(self.working.add_field(field)?)
    }

    /// # Errors
    ///
    /// See [`WorkingForm::update_field`].
    pub fn update_field(&mut self, field: Field) -> Result<&FormSchema, StoreError> {
        Ok(self.working.update_field(field)?)
    }

    /// # Errors
    ///
    /// See [`WorkingForm::remove_field`].
    pub fn remove_field(&mut self, id: &str) -> Result<Removal, StoreError> {
        Ok(self.working.remove_field(id)?)
    }

    pub fn reorder_field(&mut self, from: usize, to: usize) -> bool {
        self.working.reorder_field(from, to)
    }

    /// # Errors
    ///
    /// See [`WorkingForm::set_derived`].
    pub fn set_derived(
        &mut self,
        field_id: &str,
        parents: Vec<String>,
        expression: impl Into<String>,
    ) -> Result<&FormSchema, StoreError> {
        Ok(self.working.set_derived(field_id, parents, expression)?)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown field id.
    pub fn clear_derived(&mut self, field_id: &str) -> Result<bool, StoreError> {
        Ok(self.working.clear_derived(field_id)?)
    }

    pub fn reset_fields(&mut self) {
        self.working.reset_fields();
    }

    // --- Preview ---

    /// Recompute the draft's derived fields using its cached order.
    ///
    /// # Errors
    ///
    /// `Schema` if the draft's dependency graph is cyclic or a derived field
    /// has too many parents.
    pub fn recompute(&self, values: &FieldValues) -> Result<Recomputation, StoreError> {
        let order = self.working.evaluation_order()?;
        Ok(recompute_in_order(self.working.schema(), order, values)?)
    }

    #[must_use]
    pub fn validate_all(&self, values: &FieldValues) -> ValidationErrors {
        validate_all(self.working.schema(), values)
    }

    /// Recompute, validate, and save the draft under `name`.
    ///
    /// A blank name is saved as a single space so a form with fields always
    /// saves.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` with every failing field, or any error from
    /// [`FormStore::recompute`] and [`FormStore::save_draft`].
    pub fn submit(&mut self, values: &FieldValues, name: &str) -> Result<FormSchema, StoreError> {
        let recomputed = self.recompute(values)?;
        let errors = self.validate_all(&recomputed.values);
        if !errors.is_empty() {
            tracing::debug!(failed = errors.len(), "submit rejected");
            return Err(StoreError::ValidationFailed(errors));
        }
        let name = if name.trim().is_empty() { " " } else { name };
        self.save_draft(name)
    }

    /// # Errors
    ///
    /// `Conflict` if the store has moved past `expected`.
    pub fn ensure_revision(&self, expected: u64) -> Result<(), StoreError> {
        let actual = self.revision();
        if actual == expected {
            Ok(())
        } else {
            Err(StoreError::Conflict { expected, actual })
        }
    }

    /// [`FormStore::submit`] guarded by [`FormStore::ensure_revision`].
    ///
    /// # Errors
    ///
    /// `Conflict` for a stale revision, otherwise as for `submit`.
    pub fn submit_at(
        &mut self,
        expected: u64,
        values: &FieldValues,
        name: &str,
    ) -> Result<FormSchema, StoreError> {
        self.ensure_revision(expected)?;
        self.submit(values, name)
    }

    fn replace_working(&mut self, working: WorkingForm) {
        self.base_revision = self.revision() + 1;
        self.working = working;
    }
}
