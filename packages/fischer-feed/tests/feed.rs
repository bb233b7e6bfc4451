use std::{sync::Arc, time::Duration};

use fischer_domain::Cursor;
use fischer_feed::{Error, FeedEngine, FetchMode, FetchOutcome, MergeReport};
use fischer_testkit::{
	ScriptedBackend,
	fixtures::{self, ids},
};

fn engine_with(backend: &Arc<ScriptedBackend>, first: &[i64], cursor: i64) -> FeedEngine {
	FeedEngine::with_first_page(
		fixtures::settings(),
		backend.clone(),
		fixtures::page(first.iter().copied(), cursor),
	)
}

#[tokio::test(start_paused = true)]
async fn bootstrap_loads_the_initial_cursor() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(0, fixtures::page([12, 11, 10], 10));

	let engine = FeedEngine::bootstrap(fixtures::settings(), backend.clone(), Cursor(0))
		.await
		.expect("Bootstrap should succeed.");

	assert_eq!(ids(&engine.posts()), [12, 11, 10]);
	assert_eq!(engine.cursor(), Cursor(10));
	assert_eq!(engine.mode(), FetchMode::Normal);
	assert!(!engine.is_loading());
	assert_eq!(backend.calls().pages, [Cursor(0)]);
}

#[tokio::test(start_paused = true)]
async fn bootstrap_failure_is_reported() {
	let backend = ScriptedBackend::new().into_arc();
	let result = FeedEngine::bootstrap(fixtures::settings(), backend, Cursor(0)).await;

	assert!(matches!(result, Err(Error::FetchFailure { .. })));
}

#[tokio::test(start_paused = true)]
async fn repeated_triggers_within_the_window_fetch_once() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));

	let engine = engine_with(&backend, &[10, 9], 10);
	let accepted = engine.sentinel_visibility(true).expect("First trigger should be accepted.");

	assert!(engine.is_loading());

	for _ in 0..5 {
		assert!(engine.sentinel_visibility(false).is_none());
		assert!(engine.sentinel_visibility(true).is_none());
		assert!(engine.request_more().is_none());
	}

	accepted.await.expect("Continuation task should finish.");

	assert_eq!(backend.page_calls(), 1);
	assert_eq!(ids(&engine.posts()), [10, 9, 8, 7]);
	assert_eq!(engine.cursor(), Cursor(5));
	assert!(!engine.is_loading());
}

#[tokio::test(start_paused = true)]
async fn fetch_waits_for_the_throttle_interval() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8], 5));

	let engine = engine_with(&backend, &[9], 10);
	let accepted = engine.sentinel_visibility(true).expect("Trigger should be accepted.");

	tokio::time::sleep(fixtures::THROTTLE / 2).await;

	assert_eq!(backend.page_calls(), 0);

	accepted.await.expect("Continuation task should finish.");

	assert_eq!(backend.page_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn sentinel_still_visible_fires_again_after_cursor_moves() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));
	backend.page(5, fixtures::page([4, 3], 2));

	let engine = engine_with(&backend, &[10, 9], 10);

	engine.sentinel_visibility(true).expect("First trigger should be accepted.").await.unwrap();
	engine.sentinel_visibility(true).expect("Rebound trigger should be accepted.").await.unwrap();

	assert_eq!(backend.calls().pages, [Cursor(10), Cursor(5)]);
	assert_eq!(ids(&engine.posts()), [10, 9, 8, 7, 4, 3]);
	assert_eq!(engine.cursor(), Cursor(2));
}

#[tokio::test(start_paused = true)]
async fn duplicate_ids_are_appended_once() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([9, 8, 7], 5));

	let engine = engine_with(&backend, &[10, 9], 10);
	let outcome = engine.continue_feed().await.expect("Fetch should succeed.");

	assert_eq!(
		outcome,
		FetchOutcome::Merged {
			mode: FetchMode::Normal,
			report: MergeReport { appended: 2, duplicates: 1 },
		}
	);
	assert_eq!(ids(&engine.posts()), [10, 9, 8, 7]);
}

#[tokio::test(start_paused = true)]
async fn search_leaves_the_chronological_feed_untouched() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));
	backend.search("tax", fixtures::search_state("tax", [50, 51, 52], Some(1)));
	backend.continuation(fixtures::search_state("tax", [50, 51, 52, 53], Some(2)), Duration::ZERO);

	let engine = engine_with(&backend, &[10, 9], 10);
	let count = engine.begin_search("tax").await.expect("Search should start.");

	assert_eq!(count, 3);
	assert_eq!(engine.mode(), FetchMode::Search);
	assert_eq!(ids(&engine.visible_posts()), [50, 51, 52]);

	let outcome = engine.continue_feed().await.expect("Search continuation should succeed.");

	assert_eq!(
		outcome,
		FetchOutcome::Merged {
			mode: FetchMode::Search,
			report: MergeReport { appended: 1, duplicates: 3 },
		}
	);
	assert_eq!(ids(&engine.visible_posts()), [50, 51, 52, 53]);
	assert_eq!(engine.search_state().search_cursor, Some(Cursor(2)));
	assert_eq!(ids(&engine.posts()), [10, 9]);
	assert_eq!(engine.cursor(), Cursor(10));
	assert!(backend.calls().pages.is_empty());
	assert_eq!(backend.calls().continuations[0].search_cursor, Some(Cursor(1)));

	engine.clear_search();

	assert_eq!(engine.mode(), FetchMode::Normal);
	assert_eq!(ids(&engine.visible_posts()), [10, 9]);

	engine.continue_feed().await.expect("Normal fetch should succeed.");

	assert_eq!(ids(&engine.posts()), [10, 9, 8, 7]);
	assert_eq!(backend.calls().pages, [Cursor(10)]);
	assert_eq!(backend.calls().continuations.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn exhausted_search_ignores_the_sentinel() {
	let backend = ScriptedBackend::new().into_arc();

	backend.search("rare", fixtures::search_state("rare", [50], Some(1)));

	let engine = engine_with(&backend, &[10, 9], 10);

	engine.begin_search("rare").await.expect("Search should start.");

	assert_eq!(engine.mode(), FetchMode::Search);
	assert!(engine.sentinel_visibility(true).is_none());
	assert!(!engine.is_loading());
	assert_eq!(engine.continue_feed().await, Ok(FetchOutcome::Exhausted));

	let calls = backend.calls();

	assert!(calls.pages.is_empty());
	assert!(calls.continuations.is_empty());
}

#[tokio::test(start_paused = true)]
async fn blank_search_query_is_rejected() {
	let backend = ScriptedBackend::new().into_arc();
	let engine = engine_with(&backend, &[10], 10);

	assert!(matches!(engine.begin_search("   ").await, Err(Error::InvalidRequest { .. })));
	assert!(backend.calls().searches.is_empty());
	assert_eq!(engine.mode(), FetchMode::Normal);
}

#[tokio::test(start_paused = true)]
async fn normal_result_arriving_after_search_started_is_dropped() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));
	backend.delay_page(10, Duration::from_secs(5));
	backend.search("tax", fixtures::search_state("tax", [50, 51], Some(1)));

	let engine = engine_with(&backend, &[10, 9], 10);
	let pending = tokio::spawn({
		let engine = engine.clone();

		async move { engine.continue_feed().await }
	});

	tokio::task::yield_now().await;

	assert!(engine.is_loading());

	engine.begin_search("tax").await.expect("Search should start.");

	let outcome = pending.await.expect("Fetch task should finish.");

	assert_eq!(outcome, Ok(FetchOutcome::Stale { mode: FetchMode::Normal }));
	assert_eq!(ids(&engine.posts()), [10, 9]);
	assert_eq!(engine.cursor(), Cursor(10));
	assert!(!engine.is_loading());
}

#[tokio::test(start_paused = true)]
async fn search_result_arriving_after_clear_is_dropped() {
	let backend = ScriptedBackend::new().into_arc();

	backend.search("tax", fixtures::search_state("tax", [50, 51], Some(1)));
	backend.continuation(
		fixtures::search_state("tax", [50, 51, 52], Some(2)),
		Duration::from_secs(5),
	);

	let engine = engine_with(&backend, &[10, 9], 10);

	engine.begin_search("tax").await.expect("Search should start.");

	let pending = tokio::spawn({
		let engine = engine.clone();

		async move { engine.continue_feed().await }
	});

	tokio::task::yield_now().await;
	engine.clear_search();

	let outcome = pending.await.expect("Fetch task should finish.");

	assert_eq!(outcome, Ok(FetchOutcome::Stale { mode: FetchMode::Search }));
	assert_eq!(engine.mode(), FetchMode::Normal);
	assert!(engine.search_state().search_results.is_empty());
	assert_eq!(ids(&engine.visible_posts()), [10, 9]);
}

#[tokio::test(start_paused = true)]
async fn older_response_arriving_last_is_ignored() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));
	backend.delay_page(10, Duration::from_secs(5));

	let engine = engine_with(&backend, &[10, 9], 10);
	let slow = tokio::spawn({
		let engine = engine.clone();

		async move { engine.continue_feed().await }
	});

	tokio::task::yield_now().await;

	let fast = engine.continue_feed().await.expect("Second fetch should succeed.");

	assert!(matches!(fast, FetchOutcome::Merged { mode: FetchMode::Normal, .. }));
	assert_eq!(engine.cursor(), Cursor(5));

	let slow = slow.await.expect("Fetch task should finish.");

	assert_eq!(slow, Ok(FetchOutcome::Stale { mode: FetchMode::Normal }));
	assert_eq!(ids(&engine.posts()), [10, 9, 8, 7]);
	assert_eq!(engine.cursor(), Cursor(5));
}

#[tokio::test(start_paused = true)]
async fn timed_out_fetch_clears_loading_and_can_be_retried() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));
	backend.delay_page(10, fixtures::FETCH_TIMEOUT * 2);

	let engine = engine_with(&backend, &[10, 9], 10);
	let result = engine.continue_feed().await;

	assert_eq!(result, Err(Error::FetchTimeout { timeout_ms: 15_000 }));
	assert!(!engine.is_loading());
	assert_eq!(ids(&engine.posts()), [10, 9]);
	assert_eq!(engine.cursor(), Cursor(10));

	engine.continue_feed().await.expect("Retry should succeed.");

	assert_eq!(ids(&engine.posts()), [10, 9, 8, 7]);
}

#[tokio::test(start_paused = true)]
async fn failed_scroll_fetch_leaves_state_and_allows_retry() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));
	backend.fail_page(10, Error::FetchFailure { message: "HTTP 500".to_string() });

	let engine = engine_with(&backend, &[10, 9], 10);

	engine.sentinel_visibility(true).expect("Trigger should be accepted.").await.unwrap();

	assert!(!engine.is_loading());
	assert_eq!(ids(&engine.posts()), [10, 9]);
	assert_eq!(engine.cursor(), Cursor(10));

	engine.sentinel_visibility(false);
	engine.sentinel_visibility(true).expect("Retry trigger should be accepted.").await.unwrap();

	assert_eq!(backend.page_calls(), 2);
	assert_eq!(ids(&engine.posts()), [10, 9, 8, 7]);
}

#[tokio::test(start_paused = true)]
async fn continuation_scheduled_before_a_search_does_not_fetch_the_old_cursor() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));
	backend.search("tax", fixtures::search_state("tax", [50, 51], Some(1)));
	backend.continuation(fixtures::search_state("tax", [50, 51, 52], Some(2)), Duration::ZERO);

	let engine = engine_with(&backend, &[10, 9], 10);
	let scheduled = engine.sentinel_visibility(true).expect("Trigger should be accepted.");

	engine.begin_search("tax").await.expect("Search should start.");

	assert!(engine.sentinel_visibility(false).is_none());

	let rebound = engine.sentinel_visibility(true).expect("Rebound trigger should be accepted.");

	scheduled.await.expect("Old continuation task should finish.");
	rebound.await.expect("Search continuation task should finish.");

	let calls = backend.calls();

	assert!(calls.pages.is_empty());
	assert_eq!(calls.continuations.len(), 1);
	assert_eq!(ids(&engine.visible_posts()), [50, 51, 52]);
	assert_eq!(ids(&engine.posts()), [10, 9]);
	assert_eq!(engine.cursor(), Cursor(10));
	assert!(!engine.is_loading());
}

#[tokio::test(start_paused = true)]
async fn aborted_continuation_clears_loading() {
	let backend = ScriptedBackend::new().into_arc();

	backend.page(10, fixtures::page([8, 7], 5));

	let engine = engine_with(&backend, &[10, 9], 10);
	let scheduled = engine.sentinel_visibility(true).expect("Trigger should be accepted.");

	assert!(engine.is_loading());

	scheduled.abort();

	assert!(scheduled.await.is_err());
	assert!(!engine.is_loading());
	assert_eq!(backend.page_calls(), 0);

	engine.sentinel_visibility(false);
	engine.sentinel_visibility(true).expect("Retry trigger should be accepted.").await.unwrap();

	assert_eq!(ids(&engine.posts()), [10, 9, 8, 7]);
	assert!(!engine.is_loading());
}

#[tokio::test(start_paused = true)]
async fn post_closure_can_query_the_engine() {
	let backend = ScriptedBackend::new().into_arc();
	let engine = engine_with(&backend, &[10, 9], 10);
	let unvoted = engine.with_posts(|posts| {
		posts.iter().filter(|post| !engine.has_voted(post.id)).count()
	});

	assert_eq!(unvoted, 2);
	assert!(engine.with_posts(|posts| posts.len() == engine.posts().len()));
}
