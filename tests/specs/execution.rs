//! Dispatch and execution through the worker pool.

use crate::prelude::*;
use tasse_core::JobId;

#[tokio::test]
async fn forced_firing_runs_the_task_and_streams_its_output() {
    let world = World::new();
    world.write_task("hello", INTERVAL_HOURLY, "echo hello world\n");
    world.reconcile().await;

    world.scheduler.fire_now(&JobId::for_task("hello")).unwrap();
    let runner = world.exec_runner();
    assert_eq!(world.scheduler.dispatch_due(&runner), 1);

    world
        .wait_for_log("hello", |log| log.contains("ended with status code 0"))
        .await;
    let log = world.task_log("hello");
    assert!(log.contains(">>> Task hello/task.sh"));
    assert!(log.contains("hello world"));
}

#[tokio::test]
async fn failing_task_is_recorded_not_escalated() {
    let world = World::new();
    world.write_task("cranky", INTERVAL_HOURLY, "echo about to fail\nexit 2\n");
    world.reconcile().await;

    world.scheduler.fire_now(&JobId::for_task("cranky")).unwrap();
    let runner = world.exec_runner();
    world.scheduler.dispatch_due(&runner);

    world
        .wait_for_log("cranky", |log| log.contains("ended with status code 2"))
        .await;
    // The job is still scheduled; the next trigger firing is the retry.
    assert!(world.job("cranky").is_some());
}

#[tokio::test]
async fn overlapping_firings_of_one_task_do_not_run_twice() {
    let world = World::new();
    world.write_task("slow", INTERVAL_HOURLY, "echo running\nsleep 2\n");
    world.reconcile().await;
    let id = JobId::for_task("slow");
    let runner = world.exec_runner();

    world.scheduler.fire_now(&id).unwrap();
    assert_eq!(world.scheduler.dispatch_due(&runner), 1);

    // Second firing while the first instance is still admitted.
    world.scheduler.fire_now(&id).unwrap();
    assert_eq!(world.scheduler.dispatch_due(&runner), 0);
    assert!(world.scheduler.is_running(&id));
}

#[tokio::test]
async fn dependency_file_wins_over_project_file() {
    let world = World::new();
    world.write_task("deps", INTERVAL_HOURLY, "echo ran anyway\n");
    let dir = world.tasks_dir.join("deps");
    std::fs::write(dir.join("requirements.txt"), "requests\n").unwrap();
    std::fs::write(dir.join("pyproject.toml"), "[tool.poetry]\n").unwrap();
    world.reconcile().await;

    world.scheduler.fire_now(&JobId::for_task("deps")).unwrap();
    let runner = world.exec_runner();
    world.scheduler.dispatch_due(&runner);

    world
        .wait_for_log("deps", |log| log.contains("ended with status code"))
        .await;
    let log = world.task_log("deps");
    // Isolated-interpreter provisioning was chosen, never poetry.
    assert!(log.contains("[Run virtualenv"));
    assert!(!log.contains("[Run poetry install"));
    // The task itself still ran after the (failed or not) install steps.
    assert!(log.contains("ran anyway"));
}

#[tokio::test]
async fn unknown_job_cannot_be_forced() {
    let world = World::new();
    assert!(world
        .scheduler
        .fire_now(&JobId::for_task("missing"))
        .is_err());
}
