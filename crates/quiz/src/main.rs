//! # Quiz CLI
//!
//! A thin terminal client over `quizapp`. This file only installs logging,
//! invokes `cli::run()` and turns an error into a non-zero exit.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  CLI Layer (src/cli/)                                │
//! │  - clap argument parsing (setup.rs)                  │
//! │  - context wiring + dispatch (commands.rs)           │
//! │  - coloured terminal output (render.rs)              │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  API Layer (quizapp::api::QuizApi)                   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr through `tracing-subscriber`. The filter comes from
//! `QUIZ_LOG` (default `warn`); `-v` forces `debug`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
