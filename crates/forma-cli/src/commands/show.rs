use anyhow::Context;
use forma_core::FormSchema;
use forma_schema::{Violation, check_invariants};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ShowResponse<'a> {
    form: &'a FormSchema,
    violations: Vec<Violation>,
}

/// Handle `forma show`.
pub fn handle(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let form = ctx
        .store
        .get_saved(id)
        .with_context(|| format!("saved form not found: {id}"))?;
    output(
        &ShowResponse {
            form,
            violations: check_invariants(form),
        },
        flags.format,
    )
}
