pub mod page;
pub mod post;
pub mod vote;

mod error;

pub use error::ValidationError;
pub use page::{Cursor, FeedPage, SearchState};
pub use post::{Author, ComplianceRecord, Post, Website, WebsiteArticle};
pub use vote::{Compliance, ComplianceVote};

pub type PostId = i64;

pub type UserId = i64;
