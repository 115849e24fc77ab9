use chrono::{TimeZone, Utc};
use quizapp::api::QuizApi;
use quizapp::config::QuizConfig;
use quizapp::error_reports::ErrorKind;
use quizapp::init::ensure_data_dirs;
use quizapp::model::{Question, QuestionSet, ScoreEntry};
use quizapp::paths::{ERROR_REPORTS_DIR, GLOBAL_LEADERBOARD_FILE, LEADERBOARDS_DIR};
use quizapp::store::fs_backend::FsBackend;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

fn setup() -> (TempDir, QuizApi<FsBackend>) {
    let dir = TempDir::new().unwrap();
    ensure_data_dirs(dir.path()).unwrap();
    let api = open(dir.path());
    (dir, api)
}

fn open(root: &Path) -> QuizApi<FsBackend> {
    QuizApi::new(
        Rc::new(FsBackend::new(root.to_path_buf())),
        QuizConfig::default(),
    )
}

fn error_report_files(root: &Path) -> Vec<String> {
    fs::read_dir(root.join(ERROR_REPORTS_DIR))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn corrupt_global_leaderboard_recovers() {
    let dir = TempDir::new().unwrap();
    ensure_data_dirs(dir.path()).unwrap();
    fs::write(
        dir.path().join(GLOBAL_LEADERBOARD_FILE),
        [0xff, 0xfe, b'{', b'x', 0x00],
    )
    .unwrap();

    let mut api = open(dir.path());
    assert_eq!(api.leaderboard().total_games(), 0);
    let reports = api.errors().session_reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, ErrorKind::JsonParse);
    assert_eq!(error_report_files(dir.path()).len(), 1);

    api.leaderboard_mut()
        .add_score(ScoreEntry::new("Alice", 500, 10, 8, Utc::now()))
        .unwrap();

    let text = fs::read_to_string(dir.path().join(GLOBAL_LEADERBOARD_FILE)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["entries"][0]["playerName"], "Alice");

    let reopened = open(dir.path());
    assert_eq!(reopened.leaderboard().total_games(), 1);
    assert!(reopened.errors().session_reports().is_empty());
}

#[test]
fn set_board_round_trip_on_disk() {
    let (dir, api) = setup();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    api.set_boards()
        .save_entry("Capitals: Europe", ScoreEntry::new("Alice", 500, 3, 2, at))
        .unwrap();
    api.set_boards()
        .save_entry("Capitals: Europe", ScoreEntry::new("Bob", 300, 10, 6, at))
        .unwrap();

    let file = dir
        .path()
        .join(LEADERBOARDS_DIR)
        .join("Capitals_ Europe.xml");
    let xml = fs::read_to_string(&file).unwrap();
    assert!(xml.contains("kahoot=\"Capitals: Europe\""));
    assert!(xml.contains("<Accuracy>66.67</Accuracy>"));

    let reopened = open(dir.path());
    let entries = reopened.set_boards().load_leaderboard("Capitals: Europe");
    let summary: Vec<(&str, u32, String)> = entries
        .iter()
        .map(|e| (e.player_name.as_str(), e.score, format!("{:.2}", e.accuracy)))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Alice", 500, "66.67".to_string()),
            ("Bob", 300, "60.00".to_string())
        ]
    );
    assert_eq!(entries[0].timestamp, at);
    assert_eq!(
        reopened.set_boards().available_leaderboards(),
        vec!["Capitals_ Europe".to_string()]
    );
}

#[test]
fn corrupt_set_board_only_affects_that_set() {
    let (dir, api) = setup();
    api.set_boards()
        .save_entry("Good", ScoreEntry::new("Alice", 10, 1, 1, Utc::now()))
        .unwrap();
    fs::write(dir.path().join(LEADERBOARDS_DIR).join("Bad.xml"), "<Leaderboard><Entry>").unwrap();

    assert!(api.set_boards().load_leaderboard("Bad").is_empty());
    assert_eq!(api.set_boards().load_leaderboard("Good").len(), 1);
    assert_eq!(api.errors().session_reports()[0].kind, ErrorKind::XmlParse);
}

#[test]
fn question_set_files_are_plain_json() {
    let (dir, mut api) = setup();
    let sets = api.question_sets_mut();
    sets.create("Space/Time", "Science");
    sets.add_question(
        Question::new("Closest star?", vec!["Sun".into(), "Sirius".into()], 0)
            .with_category("Astronomy"),
    )
    .unwrap();
    let file_name = sets.save().unwrap();
    assert_eq!(file_name, "Space_Time.json");

    let text = fs::read_to_string(dir.path().join("CustomKahoots").join(&file_name)).unwrap();
    let parsed: QuestionSet = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.set_name, "Space/Time");
    assert_eq!(parsed.questions[0].correct_answer(), Some("Sun"));

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["questions"][0]["correctAnswerIndex"], 0);
    assert_eq!(value["questions"][0]["timeLimit"], 20);
}

#[test]
fn error_reports_are_listed_read_and_cleared() {
    let (_dir, api) = setup();
    let first = api
        .errors()
        .report_general_error("test", "first failure", None);
    let second = api
        .errors()
        .report_general_error("test", "second failure", None);
    assert_ne!(first.file_name, second.file_name);

    let listed = api.errors().list();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&first.file_name));

    let body = api.errors().read(&second.file_name).unwrap();
    assert!(body.contains("ERROR REPORT - QUIZ"));
    assert!(body.contains("second failure"));
    assert!(body.contains("GENERAL"));

    assert!(api.errors().read("../leaderboard.json").is_none());
    assert!(api.errors().delete(&first.file_name));
    assert_eq!(api.errors().clear_all(), 1);
    assert!(api.errors().list().is_empty());
}

#[test]
fn dot_prefixed_names_are_listed_and_cleared() {
    let (dir, mut api) = setup();
    api.set_boards()
        .save_entry(".NET Trivia", ScoreEntry::new("Alice", 10, 1, 1, Utc::now()))
        .unwrap();
    assert_eq!(
        api.set_boards().available_leaderboards(),
        vec![".NET Trivia".to_string()]
    );
    assert_eq!(api.set_boards().clear_all(), 1);
    assert!(!dir.path().join(LEADERBOARDS_DIR).join(".NET Trivia.xml").exists());

    let sets = api.question_sets_mut();
    sets.create(".NET Quiz", "Programming");
    sets.add_question(Question::new("Runtime?", vec!["CLR".into(), "JVM".into()], 0))
        .unwrap();
    let file_name = sets.save().unwrap();
    assert_eq!(file_name, ".NET Quiz.json");
    assert_eq!(api.question_sets().list(), vec![file_name]);
}
