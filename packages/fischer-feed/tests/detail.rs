use fischer_domain::Compliance;
use fischer_feed::{DetailStatus, Error, PostDetail, ScoreView, TruthBand, presenter};
use fischer_testkit::{ScriptedBackend, fixtures};

#[tokio::test]
async fn loads_a_post_and_folds_in_a_new_vote() {
	let backend = ScriptedBackend::new();

	backend.post(fixtures::scored_post(7, &[], &[0.5], Some(0.1)));

	let mut detail = PostDetail::new();

	detail.load(&backend, 7).await.expect("Post should load.");

	assert_eq!(detail.status(), DetailStatus::Idle);
	assert_eq!(detail.error(), None);

	let before = presenter::compute_truthiness(detail.post().expect("Post should be loaded."))
		.expect("Post should have a score.");

	assert!((before.percent() - 30.0).abs() < 1e-9);
	assert_eq!(before.band(), TruthBand::Green);

	detail
		.add_user_compliance(&fixtures::vote(7, 3, Compliance::False))
		.expect("Vote should apply to the loaded post.");

	let post = detail.post().expect("Post should be loaded.");

	assert_eq!(post.user_compliances.len(), 1);
	assert_eq!(ScoreView::of(post).to_string(), "-13.33%");
	assert_eq!(presenter::compute_truthiness(post).map(|score| score.band()), Ok(TruthBand::Yellow));
}

#[tokio::test]
async fn failed_load_keeps_the_previous_post() {
	let backend = ScriptedBackend::new();

	backend.post(fixtures::post(7));

	let mut detail = PostDetail::new();

	detail.load(&backend, 7).await.expect("Post should load.");

	let result = detail.load(&backend, 8).await;

	assert!(matches!(result, Err(Error::FetchFailure { .. })));
	assert_eq!(detail.status(), DetailStatus::Idle);
	assert!(detail.error().is_some());
	assert_eq!(detail.post().map(|post| post.id), Some(7));
}

#[test]
fn vote_for_another_post_is_rejected() {
	let mut detail = PostDetail::new();

	assert!(matches!(
		detail.add_user_compliance(&fixtures::vote(7, 3, Compliance::True)),
		Err(Error::InvalidRequest { .. })
	));
}

#[test]
fn unscored_post_renders_as_unavailable() {
	let post = fixtures::post(7);

	assert_eq!(ScoreView::of(&post), ScoreView::Unavailable);
	assert_eq!(ScoreView::of(&post).to_string(), "n/a");
	assert_eq!(presenter::compute_truthiness(&post), Err(Error::MissingComplianceData));
	assert_eq!(presenter::host_label(&post), Some("example.com"));
	assert_eq!(presenter::author_label(&post), "author-7");
}
