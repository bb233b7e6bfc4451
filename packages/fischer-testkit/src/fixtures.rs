use std::time::Duration;

use fischer_domain::{
	Author, Compliance, ComplianceRecord, ComplianceVote, Cursor, FeedPage, Post, PostId,
	SearchState, UserId, Website, WebsiteArticle,
};
use fischer_feed::EngineSettings;

pub const THROTTLE: Duration = Duration::from_millis(600);
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const RETRY_BACKOFF: Duration = Duration::from_millis(500);

pub fn settings() -> EngineSettings {
	EngineSettings {
		throttle: THROTTLE,
		fetch_timeout: FETCH_TIMEOUT,
		max_submit_attempts: 3,
		retry_backoff: RETRY_BACKOFF,
	}
}

pub fn post(id: PostId) -> Post {
	Post {
		id,
		assertion: format!("Assertion {id}."),
		ai_response: String::new(),
		topic_name: "General".to_string(),
		website_article: Some(WebsiteArticle {
			article_url: format!("https://news.example.com/articles/{id}"),
			website: Some(Website { host_site: "news.example.com".to_string() }),
		}),
		user: Some(Author { id: Some(100 + id), name: format!("author-{id}") }),
		user_compliances: Vec::new(),
		expert_compliances: Vec::new(),
		ai_compliance: None,
		comment_count: 0,
	}
}

pub fn scored_post(id: PostId, user: &[f64], expert: &[f64], ai: Option<f64>) -> Post {
	Post {
		user_compliances: user.iter().copied().map(ComplianceRecord::new).collect(),
		expert_compliances: expert.iter().copied().map(ComplianceRecord::new).collect(),
		ai_compliance: ai,
		..post(id)
	}
}

pub fn page(ids: impl IntoIterator<Item = PostId>, new_cursor: i64) -> FeedPage {
	FeedPage { posts: ids.into_iter().map(post).collect(), new_cursor: Cursor(new_cursor) }
}

pub fn search_state(
	query: &str,
	ids: impl IntoIterator<Item = PostId>,
	search_cursor: Option<i64>,
) -> SearchState {
	SearchState {
		query: query.to_string(),
		search_results: ids.into_iter().map(post).collect(),
		search_cursor: search_cursor.map(Cursor),
	}
}

pub fn vote(post_id: PostId, user_id: UserId, compliance: Compliance) -> ComplianceVote {
	ComplianceVote { post_id, fischer_id: user_id, compliance }
}

pub fn ids(posts: &[Post]) -> Vec<PostId> {
	posts.iter().map(|post| post.id).collect()
}
