//! # CLI Layer
//!
//! One possible UI client for `quizapp`. This is the only place that knows about
//! stdout, stderr and exit codes.
//!
//! - `run()`: parse, install logging, build the context, dispatch
//! - `handle_*()`: per-command handlers that call the API and print the result
//! - rendering lives in `render.rs`

use super::render::{
    info, render_global_statistics, render_outcome, render_player_statistics,
    render_question_set, render_report, render_reports, render_scores, render_set_statistics,
    success, warning,
};
use super::setup::{ClearCommand, Cli, Commands, ErrorsCommand, SetsCommand, ShowArgs};
use clap::Parser;
use quizapp::api::QuizApi;
use quizapp::config::QuizConfig;
use quizapp::error::{QuizError, Result};
use quizapp::init::initialize;
use quizapp::model::{Question, QuestionSet};
use quizapp::paths::{
    CONFIG_FILE, CUSTOM_KAHOOTS_DIR, ERROR_REPORTS_DIR, GLOBAL_LEADERBOARD_FILE,
    LEADERBOARDS_DIR, REPORTS_FILE,
};
use quizapp::store::fs_backend::FsBackend;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "QUIZ_LOG";

struct AppContext {
    api: QuizApi<FsBackend>,
    config: QuizConfig,
    root: PathBuf,
}

/// One answered question in a `quiz submit` file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayedAnswer {
    question: Question,
    chosen: usize,
    elapsed_secs: f64,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context(cli.data)?;

    match cli.command {
        Commands::Submit {
            player,
            answers,
            set,
        } => handle_submit(&mut ctx, &player, &answers, set.as_deref()),
        Commands::Top { count } => handle_top(&ctx, count),
        Commands::Rank { player } => handle_rank(&ctx, &player),
        Commands::Best { player } => handle_best(&ctx, &player),
        Commands::Board { set, count } => handle_board(&ctx, &set, count),
        Commands::Boards => handle_boards(&ctx),
        Commands::Stats { player } => handle_stats(&ctx, player.as_deref()),
        Commands::Reports { player, count } => handle_reports(&ctx, player.as_deref(), count),
        Commands::Last => handle_last(&ctx),
        Commands::Errors(cmd) => handle_errors(&ctx, cmd),
        Commands::Sets(cmd) => handle_sets(&mut ctx, cmd),
        Commands::Clear(cmd) => handle_clear(&mut ctx, cmd),
        Commands::Paths => handle_paths(&ctx),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second init (tests) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn init_context(data: Option<PathBuf>) -> Result<AppContext> {
    let ctx = initialize(data)?;
    Ok(AppContext {
        api: ctx.api,
        config: ctx.config,
        root: ctx.root,
    })
}

fn handle_submit(ctx: &mut AppContext, player: &str, answers: &Path, set: Option<&str>) -> Result<()> {
    let text = std::fs::read_to_string(answers)?;
    let played: Vec<PlayedAnswer> = serde_json::from_str(&text)?;
    if played.is_empty() {
        return Err(QuizError::Validation(format!(
            "{} contains no answers",
            answers.display()
        )));
    }

    tracing::debug!(player, answers = played.len(), "scoring submitted game");
    let mut session = ctx.api.start_session(player);
    for answer in &played {
        session.answer(&answer.question, answer.chosen, answer.elapsed_secs);
    }

    let outcome = ctx.api.submit_session(set, &session)?;
    print!("{}", render_outcome(&outcome));
    if outcome.is_complete() {
        Ok(())
    } else {
        Err(QuizError::Store(format!(
            "game only partly saved ({} of the writes failed)",
            outcome.failures.len()
        )))
    }
}

fn handle_top(ctx: &AppContext, count: Option<usize>) -> Result<()> {
    let n = count.unwrap_or(ctx.config.top_display);
    print!(
        "{}",
        render_scores("Top scores", ctx.api.leaderboard().top_scores(n))
    );
    Ok(())
}

fn handle_rank(ctx: &AppContext, player: &str) -> Result<()> {
    let board = ctx.api.leaderboard();
    match board.player_rank(player) {
        Some(rank) => println!("{} is ranked #{} of {}", player, rank, board.total_games()),
        None => info(&format!("{} is not on the leaderboard.", player)),
    }
    Ok(())
}

fn handle_best(ctx: &AppContext, player: &str) -> Result<()> {
    match ctx.api.leaderboard().player_best_score(player) {
        Some(best) => print!(
            "{}",
            render_scores(&format!("Best score for {}", player), std::slice::from_ref(best))
        ),
        None => info(&format!("No scores recorded for {}.", player)),
    }
    Ok(())
}

fn handle_board(ctx: &AppContext, set: &str, count: Option<usize>) -> Result<()> {
    let n = count.unwrap_or(ctx.config.top_display);
    let boards = ctx.api.set_boards();
    let entries = boards.top_scores(set, n);
    print!("{}", render_scores(&format!("Leaderboard: {}", set), &entries));
    if !entries.is_empty() {
        println!("{}", render_set_statistics(&boards.set_statistics(set)));
    }
    Ok(())
}

fn handle_boards(ctx: &AppContext) -> Result<()> {
    let names = ctx.api.set_boards().available_leaderboards();
    if names.is_empty() {
        info("No question-set leaderboards yet.");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn handle_stats(ctx: &AppContext, player: Option<&str>) -> Result<()> {
    match player {
        Some(name) => {
            let stats = ctx.api.player_statistics(name);
            if stats.total_games == 0 {
                info(&format!("No games recorded for {}.", name));
            } else {
                print!("{}", render_player_statistics(name, &stats));
            }
        }
        None => {
            print!("{}", render_global_statistics(&ctx.api.global_statistics()));
            let board = ctx.api.leaderboard();
            info(&format!(
                "Leaderboard: {} entries · average {:.1} · highest {}",
                board.total_games(),
                board.average_score(),
                board.highest_score()
            ));
        }
    }
    Ok(())
}

fn handle_reports(ctx: &AppContext, player: Option<&str>, count: usize) -> Result<()> {
    let reports = match player {
        Some(name) => {
            let mut mine = ctx.api.reports().player_reports(name);
            mine.truncate(count);
            mine
        }
        None => ctx.api.reports().recent_reports(count),
    };
    print!("{}", render_reports(&reports));
    Ok(())
}

fn handle_last(ctx: &AppContext) -> Result<()> {
    match ctx.api.reports().last_report() {
        Some(report) => print!("{}", render_report(report)),
        None => info("No game reports."),
    }
    Ok(())
}

fn handle_errors(ctx: &AppContext, cmd: ErrorsCommand) -> Result<()> {
    let errors = ctx.api.errors();
    match cmd {
        ErrorsCommand::List => {
            let names = errors.list();
            if names.is_empty() {
                info("No error reports.");
            }
            for name in names {
                println!("{}", name);
            }
        }
        ErrorsCommand::Read { file } => {
            let content = errors
                .read(&file)
                .ok_or_else(|| QuizError::NotFound(file.clone()))?;
            print!("{}", content);
        }
        ErrorsCommand::Delete { file } => {
            if !errors.delete(&file) {
                return Err(QuizError::NotFound(file));
            }
            success(&format!("Deleted {}", file));
        }
        ErrorsCommand::Clear => {
            let removed = errors.clear_all();
            success(&format!("Deleted {} error report(s)", removed));
        }
    }
    Ok(())
}

fn handle_sets(ctx: &mut AppContext, cmd: SetsCommand) -> Result<()> {
    match cmd {
        SetsCommand::List => {
            let sets = ctx.api.question_sets();
            let files = sets.list();
            if files.is_empty() {
                info("No question sets.");
            }
            for file in files {
                let (name, count) = sets.info(&file);
                println!("{}  {} ({} questions)", file, name, count);
            }
        }
        SetsCommand::Info { file } => {
            let (name, count) = ctx.api.question_sets().info(&file);
            println!("{} ({} questions)", name, count);
        }
        SetsCommand::Show(ShowArgs { file, answers }) => {
            let set = ctx.api.question_sets().read(&file)?;
            print!("{}", render_question_set(&set, answers));
        }
        SetsCommand::Delete { file } => {
            if !ctx.api.question_sets().delete(&file) {
                return Err(QuizError::NotFound(file));
            }
            success(&format!("Deleted {}", file));
        }
        SetsCommand::Import { path } => {
            let text = std::fs::read_to_string(&path)?;
            let set: QuestionSet = serde_json::from_str(&text)?;
            let file = ctx.api.question_sets_mut().write(&set)?;
            success(&format!(
                "Imported '{}' ({} questions) as {}",
                set.set_name,
                set.questions.len(),
                file
            ));
        }
    }
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, cmd: ClearCommand) -> Result<()> {
    match cmd {
        ClearCommand::Global => {
            ctx.api.leaderboard_mut().clear()?;
            success("Global leaderboard cleared.");
        }
        ClearCommand::Reports => {
            ctx.api.reports_mut().clear()?;
            success("Game reports cleared.");
        }
        ClearCommand::Board { set } => {
            if ctx.api.set_boards().clear(&set) {
                success(&format!("Leaderboard for '{}' deleted.", set));
            } else {
                warning(&format!("No leaderboard for '{}'.", set));
            }
        }
        ClearCommand::Boards => {
            let removed = ctx.api.set_boards().clear_all();
            success(&format!("Deleted {} question-set leaderboard(s).", removed));
        }
    }
    Ok(())
}

fn handle_paths(ctx: &AppContext) -> Result<()> {
    let rows = [
        ("Data root", ctx.root.clone()),
        ("Config", ctx.root.join(CONFIG_FILE)),
        ("Leaderboard", ctx.root.join(GLOBAL_LEADERBOARD_FILE)),
        ("Reports", ctx.root.join(REPORTS_FILE)),
        ("Set leaderboards", ctx.root.join(LEADERBOARDS_DIR)),
        ("Question sets", ctx.root.join(CUSTOM_KAHOOTS_DIR)),
        ("Error reports", ctx.root.join(ERROR_REPORTS_DIR)),
    ];
    for (label, path) in rows {
        println!("{:<18}{}", label, path.display());
    }
    Ok(())
}
