use std::cell::RefCell;
use std::path::PathBuf;

use anyhow::anyhow;
use mer_uploader::scan::TransferTask;
use mer_uploader::transfer::Uploader;
use mer_uploader::upload::upload_all;

/// Records every call and fails for the listed filenames.
struct FakeUploader {
    failing: Vec<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl FakeUploader {
    fn new(failing: Vec<&'static str>) -> Self {
        Self {
            failing,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Uploader for FakeUploader {
    async fn upload(&self, task: &TransferTask) -> anyhow::Result<u64> {
        self.calls.borrow_mut().push(task.remote_filename.clone());
        if self.failing.contains(&task.remote_filename.as_str()) {
            return Err(anyhow!("connection reset by peer"));
        }
        Ok(42)
    }
}

fn task(name: &str) -> TransferTask {
    TransferTask {
        local_path: PathBuf::from("/exports").join(name),
        remote_filename: name.to_string(),
    }
}

#[tokio::test]
async fn one_failure_out_of_two_exits_one() {
    let uploader = FakeUploader::new(vec!["orders20240501a.mer"]);
    let tasks = vec![task("orders20240501a.mer"), task("orders20240501b.mer")];

    let summary = upload_all(&uploader, &tasks).await;

    assert_eq!(summary.success_count(), 1);
    assert_eq!(summary.failure_count(), 1);
    assert_eq!(summary.succeeded, vec!["orders20240501b.mer"]);
    assert_eq!(summary.failed[0].0, "orders20240501a.mer");
    assert!(summary.failed[0].1.contains("connection reset"));
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn failure_does_not_stop_the_batch() {
    let uploader = FakeUploader::new(vec!["a.mer"]);
    let tasks = vec![task("a.mer"), task("b.mer"), task("c.mer")];

    upload_all(&uploader, &tasks).await;

    assert_eq!(*uploader.calls.borrow(), vec!["a.mer", "b.mer", "c.mer"]);
}

#[tokio::test]
async fn failed_files_are_not_retried() {
    let uploader = FakeUploader::new(vec!["a.mer", "b.mer"]);
    let tasks = vec![task("a.mer"), task("b.mer")];

    let summary = upload_all(&uploader, &tasks).await;

    assert_eq!(uploader.calls.borrow().len(), 2);
    assert_eq!(summary.failure_count(), 2);
}

#[tokio::test]
async fn all_succeeding_exits_zero() {
    let uploader = FakeUploader::new(vec![]);
    let tasks = vec![task("a.mer"), task("b.mer")];

    let summary = upload_all(&uploader, &tasks).await;

    assert_eq!(summary.success_count(), 2);
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn empty_batch_exits_zero() {
    let uploader = FakeUploader::new(vec![]);
    let summary = upload_all(&uploader, &[]).await;

    assert!(uploader.calls.borrow().is_empty());
    assert_eq!(summary.exit_code(), 0);
}
