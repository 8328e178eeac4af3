use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::List => commands::list::handle(ctx, flags),
        Commands::Show { id } => commands::show::handle(&id, ctx, flags),
        Commands::Delete { id } => commands::delete::handle(&id, ctx, flags),
        Commands::Import(args) => commands::import::handle(&args, ctx, flags),
        Commands::Preview(args) => commands::preview::handle(&args, ctx, flags),
    }
}
