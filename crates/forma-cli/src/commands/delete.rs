use forma_store::{FormStore, SavedFormsBackend};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse {
    id: String,
    deleted: bool,
}

/// Handle `forma delete`.
pub fn handle(id: &str, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = run(id, &mut ctx.store)?;
    if !response.deleted && !flags.quiet {
        tracing::warn!(form_id = id, "no saved form with this id");
    }
    output(&response, flags.format)
}

fn run<B: SavedFormsBackend>(id: &str, store: &mut FormStore<B>) -> anyhow::Result<DeleteResponse> {
    let deleted = store.delete_saved(id)?;
    Ok(DeleteResponse {
        id: id.to_string(),
        deleted,
    })
}
