use std::fs;

use mer_uploader::scan::find_transfer_tasks;

fn names(tasks: &[mer_uploader::scan::TransferTask]) -> Vec<&str> {
    tasks.iter().map(|t| t.remote_filename.as_str()).collect()
}

#[test]
fn keeps_only_matching_extension() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.mer", "b.mer", "c.txt"] {
        fs::write(dir.path().join(name), "order").unwrap();
    }

    let tasks = find_transfer_tasks(dir.path(), "mer", None);
    assert_eq!(names(&tasks), vec!["a.mer", "b.mer"]);
}

#[test]
fn date_token_selects_that_day_only() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("orders20240501.mer"), "1").unwrap();
    fs::write(dir.path().join("orders20240502.mer"), "2").unwrap();

    let tasks = find_transfer_tasks(dir.path(), "mer", Some("20240501"));
    assert_eq!(names(&tasks), vec!["orders20240501.mer"]);
    assert_eq!(tasks[0].local_path, dir.path().join("orders20240501.mer"));
}

#[test]
fn missing_folder_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = find_transfer_tasks(&dir.path().join("does-not-exist"), "mer", None);
    assert!(tasks.is_empty());
}

#[test]
fn file_path_instead_of_folder_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("orders.mer");
    fs::write(&file, "x").unwrap();
    assert!(find_transfer_tasks(&file, "mer", None).is_empty());
}

#[test]
fn directories_with_matching_names_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("archive.mer")).unwrap();
    fs::write(dir.path().join("today.mer"), "x").unwrap();

    let tasks = find_transfer_tasks(dir.path(), "mer", None);
    assert_eq!(names(&tasks), vec!["today.mer"]);
}

#[test]
fn extension_accepts_leading_dot() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.mer"), "x").unwrap();
    assert_eq!(find_transfer_tasks(dir.path(), ".mer", None).len(), 1);
}

#[test]
fn results_are_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["c.mer", "a.mer", "b.mer"] {
        fs::write(dir.path().join(name), "x").unwrap();
    }
    let tasks = find_transfer_tasks(dir.path(), "mer", None);
    assert_eq!(names(&tasks), vec!["a.mer", "b.mer", "c.mer"]);
}
