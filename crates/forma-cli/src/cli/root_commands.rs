use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List saved forms.
    List,
    /// Show a saved form and any schema problems it has.
    Show { id: String },
    /// Delete a saved form. Unknown ids are ignored.
    Delete { id: String },
    /// Build a form from a JSON definition and save it.
    Import(ImportArgs),
    /// Fill in a saved form, compute derived fields and validate.
    Preview(PreviewArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// JSON file with `name` and `fields`.
    pub file: PathBuf,

    /// Name to save under (overrides the file's `name`).
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct PreviewArgs {
    /// Saved form id.
    pub id: String,

    /// Field value as `field_id=value`; repeatable. Values that parse as JSON
    /// are used as JSON, anything else as text.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// JSON object of field values, applied before `--set`.
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Save the filled-in form as a new saved form when it validates.
    #[arg(long)]
    pub submit: bool,

    /// Name for `--submit` (defaults to the form's name).
    #[arg(long, requires = "submit")]
    pub name: Option<String>,
}
