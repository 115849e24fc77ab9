use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use quizapp::api::SubmitOutcome;
use quizapp::model::{GameReport, QuestionSet, ScoreEntry};
use quizapp::set_boards::SetStatistics;
use quizapp::stats::{GlobalStatistics, PlayerStatistics};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 20;

pub(super) fn success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn info(message: &str) {
    println!("{}", message.dimmed());
}

pub(super) fn warning(message: &str) {
    println!("{}", message.yellow());
}

fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

/// Truncate to `max_width` columns, then pad with spaces to exactly that width.
fn fit(s: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width.saturating_sub(1) && s.width() > max_width {
            out.push('…');
            width += 1;
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str(&" ".repeat(max_width.saturating_sub(width)));
    out
}

pub(super) fn render_scores(title: &str, entries: &[ScoreEntry]) -> String {
    let mut out = format!("{}\n", title.bold());
    if entries.is_empty() {
        out.push_str(&format!("{}\n", "No scores yet.".dimmed()));
        return out;
    }
    for (i, entry) in entries.iter().enumerate() {
        let rank = format!("{:>3}.", i + 1);
        let rank = match i {
            0 => rank.yellow().bold(),
            1 | 2 => rank.yellow(),
            _ => rank.normal(),
        };
        out.push_str(&format!(
            "{} {} {:>7}  {:>6.2}%  {}/{}  {}\n",
            rank,
            fit(&entry.player_name, NAME_WIDTH),
            entry.score.to_string().bold(),
            entry.accuracy,
            entry.correct_answers,
            entry.questions_answered,
            format_date(entry.timestamp).dimmed()
        ));
    }
    out
}

pub(super) fn render_set_statistics(stats: &SetStatistics) -> String {
    format!(
        "{} games · average {:.1} · best {} · accuracy {:.2}%",
        stats.total_games, stats.average_score, stats.highest_score, stats.average_accuracy
    )
    .dimmed()
    .to_string()
}

fn stat_line(label: &str, value: String) -> String {
    format!("  {:<24}{}\n", label, value)
}

pub(super) fn render_player_statistics(name: &str, stats: &PlayerStatistics) -> String {
    let mut out = format!("{}\n", format!("Statistics for {}", name).bold());
    out.push_str(&stat_line("Games played", stats.total_games.to_string()));
    out.push_str(&stat_line("Average score", format!("{:.1}", stats.average_score)));
    out.push_str(&stat_line("Best score", stats.best_score.to_string()));
    out.push_str(&stat_line("Average accuracy", format!("{:.2}%", stats.average_accuracy)));
    out.push_str(&stat_line(
        "Correct answers",
        format!("{}/{}", stats.total_correct_answers, stats.total_questions_answered),
    ));
    out.push_str(&stat_line("Best streak", stats.best_streak.to_string()));
    out.push_str(&stat_line("Perfect answers", stats.total_perfect_answers.to_string()));
    out
}

pub(super) fn render_global_statistics(stats: &GlobalStatistics) -> String {
    let mut out = format!("{}\n", "Global statistics".bold());
    out.push_str(&stat_line("Games played", stats.total_games_played.to_string()));
    out.push_str(&stat_line("Players", stats.total_players.to_string()));
    out.push_str(&stat_line("Average score", format!("{:.1}", stats.average_score)));
    out.push_str(&stat_line("Highest score", stats.highest_score.to_string()));
    out.push_str(&stat_line("Average accuracy", format!("{:.2}%", stats.average_accuracy)));
    out.push_str(&stat_line("Questions answered", stats.total_questions_answered.to_string()));
    if !stats.category_frequency.is_empty() {
        out.push_str(&format!("{}\n", "Categories".bold()));
        let mut categories: Vec<(&String, &usize)> = stats.category_frequency.iter().collect();
        // Most played first, then alphabetical
        categories.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (category, count) in categories {
            out.push_str(&format!("  {} {}\n", fit(category, NAME_WIDTH), count));
        }
    }
    out
}

pub(super) fn render_report(report: &GameReport) -> String {
    let mut out = format!(
        "{} {} {}\n",
        fit(&report.player_name, NAME_WIDTH).bold(),
        report.total_score.to_string().green(),
        format_date(report.timestamp).dimmed()
    );
    out.push_str(&format!(
        "  {}/{} correct ({:.2}%) · {:.1}s per question · streak {} · perfect {}\n",
        report.correct_answers,
        report.questions_answered,
        report.accuracy,
        report.average_time_per_question,
        report.longest_streak,
        report.perfect_answers
    ));
    if !report.categories_played.is_empty() {
        let categories: Vec<&str> = report.categories_played.iter().map(String::as_str).collect();
        out.push_str(&format!("  {}\n", categories.join(", ").dimmed()));
    }
    out
}

pub(super) fn render_reports(reports: &[&GameReport]) -> String {
    if reports.is_empty() {
        return format!("{}\n", "No game reports.".dimmed());
    }
    reports.iter().map(|r| render_report(r)).collect()
}

pub(super) fn render_question_set(set: &QuestionSet, show_answers: bool) -> String {
    let mut out = format!("{}", set.set_name.bold());
    if !set.theme.is_empty() {
        out.push_str(&format!(" {}", format!("({})", set.theme).dimmed()));
    }
    out.push('\n');
    for (i, question) in set.questions.iter().enumerate() {
        out.push_str(&format!(
            "{} {} {}\n",
            format!("{:>3}.", i + 1).yellow(),
            question.question_text,
            format!("[{}, {}s]", question.category, question.time_limit).dimmed()
        ));
        for (a, answer) in question.answers.iter().enumerate() {
            let marker = if show_answers && question.is_correct(a) { "*" } else { " " };
            let line = format!("      {} {}) {}", marker, (b'a' + (a % 26) as u8) as char, answer);
            if show_answers && question.is_correct(a) {
                out.push_str(&format!("{}\n", line.green()));
            } else {
                out.push_str(&format!("{}\n", line));
            }
        }
    }
    out
}

pub(super) fn render_outcome(outcome: &SubmitOutcome) -> String {
    let entry = &outcome.entry;
    let mut out = format!(
        "{} scored {} ({}/{} correct, {:.2}%)\n",
        entry.player_name.bold(),
        entry.score.to_string().green().bold(),
        entry.correct_answers,
        entry.questions_answered,
        entry.accuracy
    );
    match outcome.global_rank {
        Some(rank) => out.push_str(&format!("Global rank: #{}\n", rank)),
        None => out.push_str(&format!("{}\n", "Not in the global top scores.".dimmed())),
    }
    for failure in &outcome.failures {
        out.push_str(&format!(
            "{}\n",
            format!("Could not save {}: {}", failure.target, failure.error).red()
        ));
    }
    out
}
