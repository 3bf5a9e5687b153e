//! Tests for the deferred enrichment flow: create returns immediately,
//! a background job later fills in the summary.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use test_context::test_context;

use server_core::kernel::testing::FailingPageScraper;

use common::harness::run_jobs_once;
use common::{build_test_app, send_request, TestHarness};

#[test_context(TestHarness)]
#[tokio::test]
async fn enrichment_fills_in_summary(ctx: &TestHarness) {
    let (_, created) = ctx
        .request(
            Method::POST,
            "/summaries/",
            Some(json!({"url": "http://foo.bar/"})),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    // Summary is empty before the job runs
    let (_, before) = ctx
        .request(Method::GET, &format!("/summaries/{}/", id), None)
        .await;
    assert_eq!(before["summary"], "");

    ctx.drain_jobs().await;

    let (status, after) = ctx
        .request(Method::GET, &format!("/summaries/{}/", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let summary = after["summary"].as_str().unwrap();
    assert!(!summary.is_empty());
    // Extractive summary comes from the scraped fixture text
    assert!(summary.contains("Rust"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn enrichment_job_is_queued_on_create(ctx: &TestHarness) {
    let (_, created) = ctx
        .request(
            Method::POST,
            "/summaries/",
            Some(json!({"url": "http://foo.bar/"})),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (job_type, status, args): (String, String, serde_json::Value) =
        sqlx::query_as("SELECT job_type, status, args FROM jobs ORDER BY created_at DESC LIMIT 1")
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();

    assert_eq!(job_type, "generate_summary");
    assert_eq!(status, "pending");
    assert_eq!(args["summary_id"].as_i64().unwrap(), id);
    assert_eq!(args["url"], "http://foo.bar/");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failed_scrape_is_scheduled_for_retry(ctx: &TestHarness) {
    // Same database, but an app whose scraper always fails
    let (app, deps) = build_test_app(ctx.db_pool.clone(), Arc::new(FailingPageScraper));

    let (status, created) = send_request(
        &app,
        Method::POST,
        "/summaries/",
        Some(json!({"url": "http://unreachable.example/"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let ran = run_jobs_once(&deps).await;
    assert_eq!(ran, 1);

    // The job failed, was classified retryable, and went back to pending
    // with a backoff; the record's summary stays empty.
    let (job_status, retry_count): (String, i32) =
        sqlx::query_as("SELECT status, retry_count FROM jobs ORDER BY created_at DESC LIMIT 1")
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(job_status, "pending");
    assert_eq!(retry_count, 1);

    let (_, record) = send_request(&app, Method::GET, &format!("/summaries/{}/", id), None).await;
    assert_eq!(record["summary"], "");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failed_scrape_is_dead_lettered_after_retries_exhaust(ctx: &TestHarness) {
    let (app, deps) = build_test_app(ctx.db_pool.clone(), Arc::new(FailingPageScraper));

    let (_, created) = send_request(
        &app,
        Method::POST,
        "/summaries/",
        Some(json!({"url": "http://unreachable.example/"})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Initial attempt plus max_retries = 3 re-attempts. The backoff pushes
    // run_at into the future, so pull it back before each pass.
    for _ in 0..4 {
        sqlx::query("UPDATE jobs SET run_at = NOW() WHERE status = 'pending'")
            .execute(&ctx.db_pool)
            .await
            .unwrap();
        let ran = run_jobs_once(&deps).await;
        assert_eq!(ran, 1);
    }

    let (job_status, retry_count, error_message): (String, i32, Option<String>) = sqlx::query_as(
        "SELECT status, retry_count, error_message FROM jobs ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_one(&ctx.db_pool)
    .await
    .unwrap();
    assert_eq!(job_status, "dead_letter");
    assert_eq!(retry_count, 3);
    assert!(error_message.unwrap().contains("connection refused"));

    // Nothing left to claim, and the record's summary stays empty
    assert_eq!(run_jobs_once(&deps).await, 0);
    let (_, record) = send_request(&app, Method::GET, &format!("/summaries/{}/", id), None).await;
    assert_eq!(record["summary"], "");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn enrichment_after_delete_is_a_noop(ctx: &TestHarness) {
    let (_, created) = ctx
        .request(
            Method::POST,
            "/summaries/",
            Some(json!({"url": "http://foo.bar/"})),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = ctx
        .request(Method::DELETE, &format!("/summaries/{}/", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // The pending job targets a deleted record; it completes quietly.
    ctx.drain_jobs().await;

    let (job_status,): (String,) =
        sqlx::query_as("SELECT status FROM jobs ORDER BY created_at DESC LIMIT 1")
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(job_status, "succeeded");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_racing_enrichment_is_last_writer_wins(ctx: &TestHarness) {
    let (_, created) = ctx
        .request(
            Method::POST,
            "/summaries/",
            Some(json!({"url": "http://foo.bar/"})),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    // Client updates the summary while the enrichment job is still pending
    ctx.request(
        Method::PUT,
        &format!("/summaries/{}/", id),
        Some(json!({"url": "http://foo.bar/", "summary": "manual text"})),
    )
    .await;

    // The job then runs and overwrites it: last writer wins
    ctx.drain_jobs().await;

    let (_, record) = ctx
        .request(Method::GET, &format!("/summaries/{}/", id), None)
        .await;
    let summary = record["summary"].as_str().unwrap();
    assert_ne!(summary, "manual text");
    assert!(!summary.is_empty());
}
