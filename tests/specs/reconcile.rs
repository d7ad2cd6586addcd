//! Reconciliation lifecycle: add, modify, remove, restart.

use crate::prelude::*;
use tasse_core::{JobId, Trigger};
use tasse_store::JobStore;

#[tokio::test]
async fn full_lifecycle_add_modify_remove() {
    let world = World::new();
    world.write_task("report", INTERVAL_HOURLY, "echo report\n");

    // Add
    let summary = world.reconcile().await;
    assert_eq!((summary.added, summary.updated, summary.removed), (1, 0, 0));
    let job = world.job("report").unwrap();
    assert_eq!(job.trigger, Trigger::Interval { secs: 3600 });

    // Steady state
    assert!(world.reconcile().await.is_noop());

    // Modify
    world.write_task(
        "report",
        "scheduler:\n  trigger: interval\n  minutes: 30\n",
        "echo report\n",
    );
    let summary = world.reconcile().await;
    assert_eq!((summary.added, summary.updated, summary.removed), (0, 1, 0));
    let job = world.job("report").unwrap();
    assert_eq!(job.trigger, Trigger::Interval { secs: 1800 });

    // Remove
    world.remove_task("report");
    let summary = world.reconcile().await;
    assert_eq!((summary.added, summary.updated, summary.removed), (0, 0, 1));
    assert!(world.job("report").is_none());
    assert!(world.scheduler.list_all().is_empty());
}

#[tokio::test]
async fn schedule_survives_a_restart() {
    let world = World::new();
    world.write_task("durable", INTERVAL_HOURLY, "echo durable\n");
    world.reconcile().await;
    let before = world.job("durable").unwrap();

    // A new store opened on the same file sees the same schedule.
    let reopened = JobStore::open(&world.store_path).unwrap();
    let after = reopened.get(&JobId::for_task("durable")).unwrap();
    assert_eq!(*after, before);
}

#[tokio::test]
async fn mixed_tree_with_cron_and_date_triggers() {
    let world = World::new();
    world.write_task(
        "nightly",
        "scheduler:\n  trigger: cron\n  hour: 4\n  minute: 30\n",
        "echo nightly\n",
    );
    world.write_task(
        "once",
        "scheduler:\n  trigger: date\n  run_date: \"2099-01-01T00:00:00Z\"\n",
        "echo once\n",
    );

    let summary = world.reconcile().await;
    assert_eq!(summary.added, 2);

    let nightly = world.job("nightly").unwrap();
    assert_eq!(
        nightly.trigger,
        Trigger::Cron {
            expr: "0 30 4 * * *".to_string()
        }
    );
    assert!(nightly.next_fire_at.is_some());

    let once = world.job("once").unwrap();
    assert!(matches!(once.trigger, Trigger::Date { .. }));
}

#[tokio::test]
async fn manifest_comments_and_formatting_do_not_churn_jobs() {
    let world = World::new();
    world.write_task("tidy", INTERVAL_HOURLY, "echo tidy\n");
    world.reconcile().await;

    // Same semantics, different surface.
    world.write_task(
        "tidy",
        "# owner: data-team\nscheduler:\n    hours: 1\n    trigger: interval\n",
        "echo tidy\n",
    );
    assert!(world.reconcile().await.is_noop());
}
