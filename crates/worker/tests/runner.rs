//! Tests for the job runner: dispatch, results and dependency handling.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::FakeLms;
use quizext_db::models::job::JobType;
use quizext_db::models::status::JobStatus;
use quizext_db::repositories::{JobRepo, WorkerHeartbeatRepo};
use quizext_worker::{JobRunner, WorkerConfig};
use serde_json::json;
use sqlx::PgPool;

fn runner(pool: PgPool, lms: FakeLms) -> JobRunner {
    let config = WorkerConfig {
        poll_interval: Duration::from_millis(10),
        worker_name: "test-worker".to_string(),
    };
    JobRunner::new(pool, Arc::new(lms), &config)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_runs_after_refresh(pool: PgPool) {
    let lms = FakeLms::new()
        .with_course(1, "Biology")
        .with_student(11, "Student, A")
        .with_quiz(2, "Quiz 2", Some(10.0));
    let runner = runner(pool.clone(), lms);

    let refresh = JobRepo::enqueue(&pool, JobType::Refresh, &json!({"course_id": 1}), None)
        .await
        .unwrap();
    let update = JobRepo::enqueue(
        &pool,
        JobType::Update,
        &json!({"course_id": 1, "extension": {"percent": "200", "user_ids": ["11"]}}),
        Some(refresh.id),
    )
    .await
    .unwrap();

    assert!(runner.run_next().await.unwrap());
    let done = JobRepo::find_by_id(&pool, refresh.id).await.unwrap().unwrap();
    assert_eq!(done.status(), Some(JobStatus::Finished));
    assert_eq!(
        done.result.as_ref().unwrap()["status_msg"],
        "No active extensions were found.<br>"
    );

    assert!(runner.run_next().await.unwrap());
    let done = JobRepo::find_by_id(&pool, update.id).await.unwrap().unwrap();
    assert_eq!(done.status(), Some(JobStatus::Finished));
    let result = done.result.unwrap();
    assert_eq!(result["status"], "complete");
    assert_eq!(result["quiz_list"][0]["added_time"], 10);

    assert!(!runner.run_next().await.unwrap());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_business_failure_still_finishes_job(pool: PgPool) {
    let runner = runner(pool.clone(), FakeLms::new());
    let job = JobRepo::enqueue(&pool, JobType::Refresh, &json!({"course_id": 5}), None)
        .await
        .unwrap();

    runner.run_next().await.unwrap();
    let done = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(done.status(), Some(JobStatus::Finished));
    assert_eq!(done.result.unwrap()["status_msg"], "Course not found.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_malformed_job_fails_with_dependents(pool: PgPool) {
    let runner = runner(pool.clone(), FakeLms::new());
    let refresh = JobRepo::enqueue(&pool, JobType::Refresh, &json!({"course": "x"}), None)
        .await
        .unwrap();
    let update = JobRepo::enqueue(&pool, JobType::Update, &json!({"course_id": 1}), Some(refresh.id))
        .await
        .unwrap();

    runner.run_next().await.unwrap();

    let failed = JobRepo::find_by_id(&pool, refresh.id).await.unwrap().unwrap();
    assert_eq!(failed.status(), Some(JobStatus::Failed));
    assert!(failed.error_message.unwrap().starts_with("Invalid job"));

    let dependent = JobRepo::find_by_id(&pool, update.id).await.unwrap().unwrap();
    assert_eq!(dependent.status(), Some(JobStatus::Failed));
    assert!(!runner.run_next().await.unwrap());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_run_beats_and_stops_on_cancel(pool: PgPool) {
    let runner = runner(pool.clone(), FakeLms::new().with_course(1, "Biology"));
    let job = JobRepo::enqueue(&pool, JobType::Refresh, &json!({"course_id": 1}), None)
        .await
        .unwrap();

    let cancel = tokio_util::sync::CancellationToken::new();
    let handle = {
        let cancel = cancel.clone();
        tokio::spawn(async move { runner.run(cancel).await })
    };

    let mut finished = false;
    for _ in 0..100 {
        let row = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
        if row.status() == Some(JobStatus::Finished) {
            finished = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    cancel.cancel();
    handle.await.unwrap();

    assert!(finished, "job should be processed by the running loop");
    let beat = WorkerHeartbeatRepo::latest(&pool).await.unwrap().unwrap();
    assert_eq!(beat.worker_name, "test-worker");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_heartbeat_continues_while_a_job_runs(pool: PgPool) {
    let lms = FakeLms::new()
        .with_course(1, "Biology")
        .with_course_delay(Duration::from_millis(1500));
    let runner = Arc::new(runner(pool.clone(), lms));
    let job = JobRepo::enqueue(&pool, JobType::Refresh, &json!({"course_id": 1}), None)
        .await
        .unwrap();

    let handle = {
        let runner = runner.clone();
        tokio::spawn(async move { runner.run_next().await })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    let early = WorkerHeartbeatRepo::latest(&pool).await.unwrap().unwrap();
    let running = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(running.status(), Some(JobStatus::Started));

    tokio::time::sleep(Duration::from_millis(700)).await;
    let later = WorkerHeartbeatRepo::latest(&pool).await.unwrap().unwrap();
    assert!(
        later.last_seen_at > early.last_seen_at,
        "heartbeat should advance during the job"
    );

    assert!(handle.await.unwrap().unwrap());
    let done = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(done.status(), Some(JobStatus::Finished));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_job_failed_as_stale_stays_failed(pool: PgPool) {
    let lms = FakeLms::new()
        .with_course(1, "Biology")
        .with_course_delay(Duration::from_millis(500));
    let runner = Arc::new(runner(pool.clone(), lms));
    let refresh = JobRepo::enqueue(&pool, JobType::Refresh, &json!({"course_id": 1}), None)
        .await
        .unwrap();
    let update = JobRepo::enqueue(
        &pool,
        JobType::Update,
        &json!({"course_id": 1, "extension": {"percent": "200"}}),
        Some(refresh.id),
    )
    .await
    .unwrap();

    let handle = {
        let runner = runner.clone();
        tokio::spawn(async move { runner.run_next().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Another worker declares the running job stale.
    let stale = JobRepo::fail_stale(&pool, "test-worker", Duration::from_secs(30))
        .await
        .unwrap();
    assert_eq!(stale.len(), 1);

    assert!(handle.await.unwrap().unwrap());
    let row = JobRepo::find_by_id(&pool, refresh.id).await.unwrap().unwrap();
    assert_eq!(row.status(), Some(JobStatus::Failed));
    assert!(row.result.is_none());
    let dependent = JobRepo::find_by_id(&pool, update.id).await.unwrap().unwrap();
    assert_eq!(dependent.status(), Some(JobStatus::Failed));
}
