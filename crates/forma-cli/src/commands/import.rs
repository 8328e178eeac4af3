use std::fs;

use anyhow::Context;
use forma_core::{Field, FormSummary};
use forma_store::{FormStore, SavedFormsBackend};
use serde::Deserialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;

/// An importable form: a name and its field list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormDefinition {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: Vec<Field>,
}

/// Handle `forma import`.
pub fn handle(args: &ImportArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let definition: FormDefinition = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a form definition", args.file.display()))?;

    let summary = run(definition, args.name.as_deref(), &mut ctx.store)?;
    output(&summary, flags.format)
}

/// Replay the definition through the editor operations so every structural
/// check applies, then save. Derived specs go last so parents may appear in
/// any order.
fn run<B: SavedFormsBackend>(
    definition: FormDefinition,
    name: Option<&str>,
    store: &mut FormStore<B>,
) -> anyhow::Result<FormSummary> {
    store.create_draft();

    let mut derived = Vec::new();
    for mut field in definition.fields {
        if let Some(spec) = field.derived.take() {
            derived.push((field.id.clone(), spec));
        }
        let id = field.id.clone();
        store
            .add_field(field)
            .with_context(|| format!("field {id} rejected"))?;
    }
    for (id, spec) in derived {
        store
            .set_derived(&id, spec.parents, spec.expression)
            .with_context(|| format!("derived spec of {id} rejected"))?;
    }

    let name = name.map_or(definition.name, str::to_string);
    let saved = store.save_draft(&name)?;
    Ok(saved.summary())
}

#[cfg(test)]
mod tests {
    use forma_store::MemoryBackend;
    use pretty_assertions::assert_eq;

    use super::*;

    fn definition(json: &str) -> FormDefinition {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn derived_fields_may_precede_their_parents() {
        let mut store = FormStore::open(MemoryBackend::new()).unwrap();
        let def = definition(
            r#"{
                "name": "Order",
                "fields": [
                    {"id": "total", "type": "number", "label": "Total",
                     "derived": {"parents": ["price", "qty"], "expression": "${a} * ${b}"}},
                    {"id": "price", "type": "number", "label": "Price"},
                    {"id": "qty", "type": "number", "label": "Qty"}
                ]
            }"#,
        );

        let summary = run(def, None, &mut store).unwrap();

        assert_eq!(summary.name, "Order");
        assert_eq!(summary.field_count, 3);
        let saved = store.get_saved(&summary.id).unwrap();
        assert_eq!(saved.fields[0].parents(), ["price", "qty"]);
    }

    #[test]
    fn name_flag_overrides_file_name() {
        let mut store = FormStore::open(MemoryBackend::new()).unwrap();
        let def = definition(r#"{"name": "File", "fields": [{"id": "a", "type": "text", "label": "A"}]}"#);
        let summary = run(def, Some("Flag"), &mut store).unwrap();
        assert_eq!(summary.name, "Flag");
    }

    #[test]
    fn structural_errors_abort_without_saving() {
        let mut store = FormStore::open(MemoryBackend::new()).unwrap();
        let def = definition(
            r#"{
                "name": "Broken",
                "fields": [
                    {"id": "a", "type": "text", "label": "A"},
                    {"id": "b", "type": "number", "label": "B",
                     "derived": {"parents": ["a"], "expression": "${a}"}}
                ]
            }"#,
        );

        let error = run(def, None, &mut store).unwrap_err();
        assert!(error.to_string().contains("derived spec of b"));
        assert!(store.saved_forms().is_empty());
    }
}
