use pattern_renamer_core::{
    apply_renames, revert_renames, ApplyError, ApplyOptions, Config, Mistake, OsFileSystem,
    Platform, RenameEngine, RenameInput, RenameTarget, Session, SessionError, SessionState,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_extension_change_on_full_path() {
    let temp_dir = TempDir::new().unwrap();
    let a = write(temp_dir.path(), "a.txt", "a");

    let engine = RenameEngine::new(Platform::host());
    let preview = engine.compute(&RenameInput::new(&[&a], r"\.txt$", ".bak", RenameTarget::Full));

    let expected = temp_dir.path().join("a.bak");
    assert_eq!(preview.renamed_paths, vec![expected.to_str().unwrap()]);
    assert!(preview.mistakes.is_empty());
    assert!(preview.can_apply);
}

#[test]
fn test_identity_replacement_cannot_apply() {
    let temp_dir = TempDir::new().unwrap();
    let a = write(temp_dir.path(), "a", "a");

    let engine = RenameEngine::new(Platform::host());
    let preview = engine.compute(&RenameInput::new(&[&a], "a", "a", RenameTarget::Name));

    assert_eq!(preview.renamed_paths, vec![a]);
    assert!(preview.mistakes.is_empty());
    assert!(!preview.can_apply);
}

#[test]
fn test_apply_then_undo_restores_file_set() {
    let temp_dir = TempDir::new().unwrap();
    let paths = vec![
        write(temp_dir.path(), "draft 01.md", "one"),
        write(temp_dir.path(), "draft 02.md", "two"),
        write(temp_dir.path(), "notes.md", "notes"),
    ];
    let before = list(temp_dir.path());

    let mut session = Session::new(&Config::default());
    session.set_picked_paths(&paths);
    session.set_regex(r"draft (\d+)");
    session.set_replace_pattern("chapter-$1");
    session.set_target(RenameTarget::Stem);
    assert!(session.can_apply());

    let journal = session.apply().unwrap().to_vec();
    assert_eq!(journal.len(), 2);
    assert_eq!(
        list(temp_dir.path()),
        vec!["chapter-01.md", "chapter-02.md", "notes.md"]
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("chapter-02.md")).unwrap(),
        "two"
    );

    session.undo().unwrap();
    assert_eq!(list(temp_dir.path()), before);
    assert_eq!(session.state(), SessionState::Renaming);
}

#[test]
fn test_failed_rename_rolls_back_batch() {
    let temp_dir = TempDir::new().unwrap();
    let first = write(temp_dir.path(), "first", "1");
    let second = write(temp_dir.path(), "second", "2");
    let third = write(temp_dir.path(), "third", "3");

    // The second destination's parent does not exist
    let renames = vec![
        (PathBuf::from(&first), temp_dir.path().join("first-renamed")),
        (PathBuf::from(&second), temp_dir.path().join("missing").join("second")),
        (PathBuf::from(&third), temp_dir.path().join("third-renamed")),
    ];

    let err = apply_renames(&OsFileSystem, &renames, &ApplyOptions::default()).unwrap_err();
    assert!(matches!(err, ApplyError::Rename { .. }));
    assert!(err.is_rolled_back());
    assert_eq!(list(temp_dir.path()), vec!["first", "second", "third"]);
}

#[test]
fn test_undo_refuses_when_destination_reappears() {
    let temp_dir = TempDir::new().unwrap();
    let a = write(temp_dir.path(), "a", "a");
    let renames = vec![(PathBuf::from(&a), temp_dir.path().join("b"))];

    let journal = apply_renames(&OsFileSystem, &renames, &ApplyOptions::default()).unwrap();
    write(temp_dir.path(), "a", "someone else");

    let err = revert_renames(&OsFileSystem, &journal, &ApplyOptions::default()).unwrap_err();
    assert!(matches!(err, ApplyError::DestinationExists(_)));
    assert_eq!(fs::read_to_string(temp_dir.path().join("b")).unwrap(), "a");
}

#[test]
fn test_renaming_onto_another_picked_path_is_a_collision() {
    let temp_dir = TempDir::new().unwrap();
    let x = write(temp_dir.path(), "x", "x");
    let prefixed = write(temp_dir.path(), "_x", "_x");

    let mut session = Session::new(&Config::default());
    session.set_picked_paths(&[x, prefixed]);
    session.set_regex("^");
    session.set_replace_pattern("_");
    assert_eq!(session.preview().mistakes, vec![Mistake::Exists { index: 0 }]);

    assert!(!session.can_apply());
    assert!(matches!(
        session.apply(),
        Err(SessionError::CannotApply { .. })
    ));
    assert_eq!(list(temp_dir.path()), vec!["_x", "x"]);
}

#[test]
fn test_decomposed_input_matches_composed_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let name = "cafe\u{301}.txt";
    let path = write(temp_dir.path(), name, "coffee");

    let mut session = Session::new(&Config::default());
    session.set_picked_paths(&[path]);
    session.set_regex("\u{e9}$");
    session.set_replace_pattern("e");
    session.set_target(RenameTarget::Stem);

    let renamed = &session.preview().renamed_paths[0];
    assert!(renamed.ends_with("cafe.txt"));
}
