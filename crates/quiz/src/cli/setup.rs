use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Version with git hash and commit date for non-release builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "quiz",
    bin_name = "quiz",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Leaderboards, game reports and question sets for the trivia quiz", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (QUIZ_DATA takes precedence)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a finished game from a JSON file of answers
    #[command(display_order = 1)]
    Submit {
        /// Player name
        player: String,

        /// JSON file: [{"question": {...}, "chosen": 0, "elapsedSecs": 4.5}, ...]
        answers: PathBuf,

        /// Question set the game was played on
        #[arg(long, short = 's')]
        set: Option<String>,
    },

    /// Show the global top scores
    #[command(display_order = 2)]
    Top {
        /// How many rows (defaults to `top_display`)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show a player's global rank
    #[command(display_order = 3)]
    Rank { player: String },

    /// Show a player's best global score
    #[command(display_order = 4)]
    Best { player: String },

    /// Show a question set's leaderboard
    #[command(display_order = 5)]
    Board {
        set: String,

        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// List question sets that have a leaderboard
    #[command(display_order = 6)]
    Boards,

    /// Statistics for one player, or for everyone
    #[command(display_order = 7)]
    Stats { player: Option<String> },

    /// List game reports, newest first
    #[command(display_order = 8)]
    Reports {
        #[arg(long, short = 'p')]
        player: Option<String>,

        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// Show the most recent game report
    #[command(display_order = 9)]
    Last,

    /// Manage error reports
    #[command(subcommand, display_order = 10)]
    Errors(ErrorsCommand),

    /// Manage question sets
    #[command(subcommand, display_order = 11)]
    Sets(SetsCommand),

    /// Clear stored results
    #[command(subcommand, display_order = 12)]
    Clear(ClearCommand),

    /// Show where data is stored
    #[command(display_order = 13)]
    Paths,
}

#[derive(Subcommand, Debug)]
pub enum ErrorsCommand {
    /// List error report files, newest first
    List,
    /// Print one error report
    Read { file: String },
    /// Delete one error report
    Delete { file: String },
    /// Delete all error reports
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SetsCommand {
    /// List stored question sets
    List,
    /// Name and question count of a set
    Info { file: String },
    /// Print a set's questions
    Show(ShowArgs),
    /// Delete a stored set
    Delete { file: String },
    /// Validate a question-set JSON file and store it
    Import { path: PathBuf },
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub file: String,

    /// Also print the correct answers
    #[arg(long)]
    pub answers: bool,
}

#[derive(Subcommand, Debug)]
pub enum ClearCommand {
    /// Empty the global leaderboard
    Global,
    /// Delete all game reports
    Reports,
    /// Delete one question set's leaderboard
    Board { set: String },
    /// Delete every question-set leaderboard
    Boards,
}
