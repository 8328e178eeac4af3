//! The working form (draft) and its editor operations.
//!
//! Each operation validates against a candidate copy first and only then
//! commits, so a returned `SchemaError` means the draft is unchanged.

use std::cell::OnceCell;

use forma_core::{DerivedSpec, Field, FormSchema, SchemaError};

use crate::checks::{check_around, check_field_shape};
use crate::graph::DependencyGraph;

/// Result of [`WorkingForm::remove_field`].
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub removed: Field,
    /// Fields whose derived spec referenced the removed field and was dropped.
    pub invalidated: Vec<String>,
}

/// The draft form being edited or previewed.
///
/// Tracks a revision counter bumped by every successful mutation and caches
/// the derived-field evaluation order until the dependency graph changes.
#[derive(Debug, Clone)]
pub struct WorkingForm {
    schema: FormSchema,
    revision: u64,
    order: OnceCell<Vec<String>>,
}

impl Default for WorkingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkingForm {
    /// A fresh empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::from_schema(FormSchema::empty())
    }

    /// Wrap an existing schema, e.g. a deep copy of a saved form.
    #[must_use]
    pub const fn from_schema(schema: FormSchema) -> Self {
        Self {
            schema,
            revision: 0,
            order: OnceCell::new(),
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &FormSchema {
        &self.schema
    }

    #[must_use]
    pub fn into_schema(self) -> FormSchema {
        self.schema
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &FormSchema {
        self.schema.name = name.into();
        self.touch(false);
        &self.schema
    }

    /// Append a field.
    ///
    /// # Errors
    ///
    /// `InvalidField` for a malformed or duplicate-id field; the `set_derived`
    /// errors when the field arrives with a derived spec.
    pub fn add_field(&mut self, field: Field) -> Result<&FormSchema, SchemaError> {
        check_field_shape(&field)?;
        if self.schema.field(&field.id).is_some() {
            return Err(SchemaError::invalid_field(format!(
                "a field with id {} already exists",
                field.id
            )));
        }

        let mut candidate = self.schema.clone();
        let id = field.id.clone();
        candidate.fields.push(field);
        check_around(&candidate, &id)?;

        tracing::debug!(field_id = %id, form_id = %self.schema.id, "field added");
        self.commit(candidate, true);
        Ok(&self.schema)
    }

    /// Replace the field with the same id.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `InvalidField` for a malformed field, and
    /// `TypeMismatch`/`Cycle`/`TooManyParents` if the replacement breaks a
    /// dependency, including dependents of this field.
    pub fn update_field(&mut self, field: Field) -> Result<&FormSchema, SchemaError> {
        let idx = self
            .schema
            .field_index(&field.id)
            .ok_or_else(|| SchemaError::not_found(field.id.clone()))?;
        check_field_shape(&field)?;

        let mut candidate = self.schema.clone();
        let id = field.id.clone();
        candidate.fields[idx] = field;
        check_around(&candidate, &id)?;

        tracing::debug!(field_id = %id, form_id = %self.schema.id, "field updated");
        self.commit(candidate, true);
        Ok(&self.schema)
    }

    /// Delete a field and drop the derived spec of every field that used it as
    /// a parent. The dropped specs are listed in the returned [`Removal`].
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn remove_field(&mut self, id: &str) -> Result<Removal, SchemaError> {
        let idx = self
            .schema
            .field_index(id)
            .ok_or_else(|| SchemaError::not_found(id))?;

        let removed = self.schema.fields.remove(idx);
        let mut invalidated = Vec::new();
        for field in &mut self.schema.fields {
            if field.parents().iter().any(|p| p == id) {
                field.derived = None;
                invalidated.push(field.id.clone());
            }
        }

        if !invalidated.is_empty() {
            tracing::warn!(
                field_id = %id,
                invalidated = ?invalidated,
                "removed field was a parent; dependent derived specs dropped"
            );
        }
        self.touch(true);
        Ok(Removal {
            removed,
            invalidated,
        })
    }

    /// Move the field at `from` to position `to`. Indices past the end are
    /// clamped to the last position. Returns whether anything moved.
    pub fn reorder_field(&mut self, from: usize, to: usize) -> bool {
        let Some(last) = self.schema.fields.len().checked_sub(1) else {
            return false;
        };
        let from = from.min(last);
        let to = to.min(last);
        if from == to {
            return false;
        }

        let field = self.schema.fields.remove(from);
        self.schema.fields.insert(to, field);
        self.touch(false);
        true
    }

    /// Make `field_id` a derived field computed from `parents`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown target or parent, `TooManyParents` beyond 26,
    /// `TypeMismatch` if a parent's type differs, `Cycle` if the new edges
    /// close a loop.
    pub fn set_derived(
        &mut self,
        field_id: &str,
        parents: Vec<String>,
        expression: impl Into<String>,
    ) -> Result<&FormSchema, SchemaError> {
        let idx = self
            .schema
            .field_index(field_id)
            .ok_or_else(|| SchemaError::not_found(field_id))?;

        let mut candidate = self.schema.clone();
        candidate.fields[idx].derived = Some(DerivedSpec {
            parents,
            expression: expression.into(),
        });
        check_around(&candidate, field_id)?;

        tracing::debug!(field_id, form_id = %self.schema.id, "derived spec set");
        self.commit(candidate, true);
        Ok(&self.schema)
    }

    /// Turn a derived field back into an input field. Returns whether it was
    /// derived.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn clear_derived(&mut self, field_id: &str) -> Result<bool, SchemaError> {
        let idx = self
            .schema
            .field_index(field_id)
            .ok_or_else(|| SchemaError::not_found(field_id))?;
        let was_derived = self.schema.fields[idx].derived.take().is_some();
        if was_derived {
            self.touch(true);
        }
        Ok(was_derived)
    }

    /// Drop every field, keeping id and name.
    pub fn reset_fields(&mut self) {
        self.schema.fields.clear();
        self.touch(true);
    }

    /// Derived field ids in dependency order, cached until the graph changes.
    ///
    /// # Errors
    ///
    /// `SchemaError::Cycle` if the graph has a cycle (only possible for a
    /// schema loaded from outside this editor).
    pub fn evaluation_order(&self) -> Result<&[String], SchemaError> {
        if let Some(order) = self.order.get() {
            return Ok(order);
        }
        let order = DependencyGraph::from_fields(&self.schema.fields).evaluation_order()?;
        Ok(self.order.get_or_init(|| order))
    }

    fn commit(&mut self, candidate: FormSchema, graph_changed: bool) {
        self.schema = candidate;
        self.touch(graph_changed);
    }

    fn touch(&mut self, graph_changed: bool) {
        self.revision += 1;
        if graph_changed {
            self.order = OnceCell::new();
        }
    }
}
