use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Field;
use crate::ids::{PREFIX_FORM, generate_id};

/// A form: an ordered list of fields plus identity and naming.
///
/// Field order drives display only; dependency order between derived fields
/// is computed separately.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl FormSchema {
    /// A fresh, unnamed form with no fields.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: generate_id(PREFIX_FORM),
            name: String::new(),
            created_at: Utc::now(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn field_index(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Derived fields in declaration order.
    pub fn derived_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_derived())
    }

    #[must_use]
    pub fn summary(&self) -> FormSummary {
        FormSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            field_count: self.fields.len(),
        }
    }
}

/// Read-only listing entry for saved forms.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub field_count: usize,
}
