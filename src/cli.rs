use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "wanderlist",
    about = "Find tourist destinations worth visiting this month"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load destinations from a JSON export into the catalog
    Import(ImportArgs),
    /// List destinations worth visiting in a month
    Browse(BrowseArgs),
    /// Rank in-season destinations against a free-text query
    Ask(AskArgs),
    /// Ask repeated questions in one session
    Chat(ChatArgs),
    /// Show destinations whose name matches a glob pattern
    Show(ShowArgs),
    /// List the categories and states available for filtering
    Options(OptionsArgs),
    /// Expand a best-months string
    Months(MonthsArgs),
    /// Manage persistent settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show catalog status
    Status(StatusArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Import --

#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// JSON file holding an array of catalog rows
    pub file: PathBuf,

    /// Drop the existing catalog before importing
    #[arg(long)]
    pub replace: bool,
}

// -- Filters --

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Travel date (YYYY-MM-DD); only its month is used. Defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Restrict to a category (can be repeated)
    #[arg(short = 'c', long = "category")]
    pub categories: Vec<String>,

    /// Restrict to a state (can be repeated)
    #[arg(short = 's', long = "state")]
    pub states: Vec<String>,
}

// -- Browse --

#[derive(Debug, Parser)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Ask --

#[derive(Debug, Parser)]
pub struct AskArgs {
    /// What you are looking for
    pub query: String,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of results to return (defaults to the top_k setting)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Chat --

#[derive(Debug, Parser)]
pub struct ChatArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of results per query (defaults to the top_k setting)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
}

// -- Show --

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Glob pattern applied to destination names
    pub pattern: String,

    /// Output as JSON array
    #[arg(long)]
    pub json: bool,
}

// -- Options --

#[derive(Debug, Parser)]
pub struct OptionsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Months --

#[derive(Debug, Parser)]
pub struct MonthsArgs {
    /// A best-months string such as "Oct-Mar, Jun"
    pub raw: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Settings --

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show all stored settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Store a setting
    Set { key: String, value: String },
    /// Remove a stored setting (revert to default)
    Clear { key: String },
}

// -- Status --

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "wanderlist",
            &mut std::io::stdout(),
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_ask_defaults() {
        let cli = Cli::parse_from(["wanderlist", "ask", "red temple"]);
        match cli.command {
            Command::Ask(args) => {
                assert_eq!(args.query, "red temple");
                assert_eq!(args.count, None);
                assert!(!args.json);
                assert!(args.filters.date.is_none());
                assert!(args.filters.categories.is_empty());
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn parse_repeated_filters() {
        let cli = Cli::parse_from([
            "wanderlist",
            "browse",
            "--date",
            "2025-01-15",
            "-c",
            "Beach",
            "-c",
            "Temple",
            "--state",
            "Goa",
            "--json",
        ]);
        match cli.command {
            Command::Browse(args) => {
                assert_eq!(args.filters.date.as_deref(), Some("2025-01-15"));
                assert_eq!(args.filters.categories, vec!["Beach", "Temple"]);
                assert_eq!(args.filters.states, vec!["Goa"]);
                assert!(args.json);
            }
            _ => panic!("expected browse command"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["wanderlist", "-q", "-v", "status"]).is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
