//! CLI argument definitions.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
    name = "crudlist",
    version,
    about = "Browse and prune JSON record collections",
    long_about = "Browse and prune JSON record collections.\n\n\
                  A collection is a JSON file holding an array of objects. Lists can be\n\
                  sorted, searched, filtered and paginated; layout preferences are kept\n\
                  per collection."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Also log to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a page of a collection.
    List(ListArgs),

    /// Delete records from a collection.
    Delete(DeleteArgs),

    /// Show or reset the saved preferences of a collection.
    Prefs(PrefsArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// JSON file holding an array of records.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Collection key (default: the file stem).
    #[arg(long)]
    pub key: Option<String>,

    /// Field holding the unique identifier of a record.
    #[arg(long = "id-field", default_value = "id")]
    pub id_field: String,

    /// Columns to show, in order (default: every field).
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

impl SourceArgs {
    pub fn key(&self) -> String {
        self.key.clone().unwrap_or_else(|| {
            self.file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "records".to_string())
        })
    }
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only fetch records whose field equals a value (FIELD=VALUE).
    #[arg(long = "where", value_name = "FIELD=VALUE")]
    pub wheres: Vec<String>,

    /// Sort by a column.
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Case-insensitive pattern matched against the search field.
    #[arg(long, short)]
    pub search: Option<String>,

    /// Field the search pattern is matched against.
    #[arg(long = "search-field", default_value = "name")]
    pub search_field: String,

    /// Keep records whose column equals a value (COLUMN=VALUE).
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    pub filters: Vec<String>,

    /// Keep records whose column is one of several values (COLUMN=A,B).
    #[arg(long = "any", value_name = "COLUMN=A,B")]
    pub any: Vec<String>,

    /// Page to show (1-based).
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page.
    #[arg(long = "rows-per-page", short = 'n')]
    pub rows_per_page: Option<usize>,

    /// Show every record on one page.
    #[arg(long, conflicts_with_all = ["page", "rows_per_page"])]
    pub all: bool,

    /// Hide or show a column.
    #[arg(long = "toggle", value_name = "COLUMN")]
    pub toggle: Vec<String>,

    /// Swap two columns (A:B).
    #[arg(long, value_name = "A:B")]
    pub swap: Vec<String>,

    /// Save sort, page size and column layout as the collection's preferences.
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Identifier of a record to delete.
    #[arg(long = "id", value_name = "ID", required = true)]
    pub ids: Vec<String>,

    /// Delete without asking.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct PrefsArgs {
    /// Collection key.
    pub key: String,

    /// Forget the saved preferences.
    #[arg(long)]
    pub reset: bool,
}
