use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `forma list`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.store.list_saved(), flags.format)
}
