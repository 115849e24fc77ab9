use quizapp::store::backend::StorageBackend;
use quizapp::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_text_io() {
    let (_dir, backend) = setup();

    backend.write_text("leaderboard.json", "{}").unwrap();
    assert_eq!(
        backend.read_text("leaderboard.json").unwrap(),
        Some("{}".to_string())
    );
    assert!(backend.exists("leaderboard.json"));

    assert!(backend.delete("leaderboard.json").unwrap());
    assert!(!backend.delete("leaderboard.json").unwrap());
    assert_eq!(backend.read_text("leaderboard.json").unwrap(), None);
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();

    backend.write_text("Leaderboards/Capitals.xml", "one").unwrap();
    backend.write_text("Leaderboards/Capitals.xml", "two").unwrap();

    let board_dir = dir.path().join("Leaderboards");
    let on_disk = fs::read_to_string(board_dir.join("Capitals.xml")).unwrap();
    assert_eq!(on_disk, "two");

    for entry in fs::read_dir(&board_dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_creates_parent_dirs() {
    let (dir, backend) = setup();
    backend.write_text("ErrorReports/ErrorReport_x.txt", "body").unwrap();
    assert!(dir.path().join("ErrorReports").is_dir());
    assert_eq!(
        backend.full_path("ErrorReports/ErrorReport_x.txt"),
        dir.path().join("ErrorReports").join("ErrorReport_x.txt")
    );
}

#[test]
fn test_fs_backend_list_filters_and_sorts() {
    let (_dir, backend) = setup();
    backend.write_text("CustomKahoots/b.json", "{}").unwrap();
    backend.write_text("CustomKahoots/a.json", "{}").unwrap();
    backend.write_text("CustomKahoots/notes.txt", "").unwrap();

    assert_eq!(
        backend.list("CustomKahoots", ".json").unwrap(),
        vec!["a.json".to_string(), "b.json".to_string()]
    );
    assert!(backend.list("Missing", ".json").unwrap().is_empty());
}

#[test]
fn test_fs_backend_list_keeps_dot_files_but_not_temp_files() {
    let (dir, backend) = setup();
    backend.write_text("Leaderboards/.NET.xml", "<x/>").unwrap();
    fs::write(dir.path().join("Leaderboards").join(".write-1234.tmp"), "partial").unwrap();

    assert_eq!(
        backend.list("Leaderboards", ".xml").unwrap(),
        vec![".NET.xml".to_string()]
    );
    assert!(backend.list("Leaderboards", ".tmp").unwrap().is_empty());
}

#[test]
fn test_fs_backend_failed_rename_leaves_target_and_no_tmp() {
    let (dir, backend) = setup();
    // A non-empty directory where the file should go makes the rename fail.
    let target = dir.path().join("Leaderboards").join("Capitals.xml");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("keep.txt"), "kept").unwrap();

    assert!(backend.write_text("Leaderboards/Capitals.xml", "<new/>").is_err());

    assert!(target.is_dir());
    assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "kept");
    for entry in fs::read_dir(dir.path().join("Leaderboards")).unwrap() {
        let name = entry.unwrap().file_name().to_string_lossy().into_owned();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}
