use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use forma_core::{FieldValues, FormSummary};
use forma_eval::Diagnostic;
use forma_store::{FormStore, SavedFormsBackend, StoreError};
use forma_validate::ValidationErrors;
use serde::Serialize;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PreviewArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    form_id: String,
    values: FieldValues,
    diagnostics: BTreeMap<String, Diagnostic>,
    errors: ValidationErrors,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<FormSummary>,
}

/// Handle `forma preview`.
pub fn handle(args: &PreviewArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut values = match &args.values {
        Some(path) => read_values(path)?,
        None => FieldValues::new(),
    };
    for assignment in &args.set {
        let (id, value) = parse_assignment(assignment)?;
        values.insert(id, value);
    }

    let submit = args.submit.then(|| args.name.as_deref());
    let response = run(&args.id, &values, submit, &mut ctx.store)?;
    output(&response, flags.format)?;

    if args.submit && !response.valid {
        bail!("form {} did not validate; nothing saved", args.id);
    }
    Ok(())
}

/// `submit` is `Some(name)` to save on success; a `None` name keeps the
/// form's own name.
fn run<B: SavedFormsBackend>(
    id: &str,
    values: &FieldValues,
    submit: Option<Option<&str>>,
    store: &mut FormStore<B>,
) -> anyhow::Result<PreviewResponse> {
    let form_name = store.load_for_editing_or_preview(id)?.name.clone();
    let recomputed = store
        .recompute(values)
        .with_context(|| format!("form {id} cannot be computed"))?;
    let errors = store.validate_all(&recomputed.values);

    let saved = match submit {
        Some(name) if errors.is_empty() => {
            let name = name.unwrap_or(form_name.as_str());
            match store.submit(values, name) {
                Ok(form) => Some(form.summary()),
                Err(StoreError::ValidationFailed(_)) => None,
                Err(error) => return Err(error.into()),
            }
        }
        _ => None,
    };

    Ok(PreviewResponse {
        form_id: id.to_string(),
        valid: errors.is_empty(),
        values: recomputed.values,
        diagnostics: recomputed.diagnostics,
        errors,
        saved,
    })
}

fn read_values(path: &Path) -> anyhow::Result<FieldValues> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON object of field values", path.display()))
}

/// `id=value`; the value is JSON when it parses as JSON, else text.
fn parse_assignment(raw: &str) -> anyhow::Result<(String, Value)> {
    let Some((id, value)) = raw.split_once('=') else {
        bail!("expected FIELD=VALUE, got '{raw}'");
    };
    let id = id.trim();
    if id.is_empty() {
        bail!("missing field id in '{raw}'");
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((id.to_string(), value))
}
