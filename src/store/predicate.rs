//! Filters for attribute queries
//!
//! "Before" comparisons are strict. Text containment is a case-sensitive
//! substring match.

use chrono::NaiveDate;

use crate::model::{PostRecord, Timestamp, UserId, UserRecord};

/// Filter applied by `UserStore::users_where`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    NameContains(String),
    JoinedBefore(Timestamp),
}

impl UserFilter {
    pub fn matches(&self, user: &UserRecord) -> bool {
        match self {
            UserFilter::All => true,
            UserFilter::NameContains(query) => user.display_name.contains(query.as_str()),
            UserFilter::JoinedBefore(cutoff) => user.joined_at < *cutoff,
        }
    }
}

/// Filter applied by `PostStore::posts_where`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    TextContains(String),
    PostedBefore(Timestamp),
    /// Same UTC calendar day
    PostedOn(NaiveDate),
    AuthorIs(UserId),
}

impl PostFilter {
    pub fn matches(&self, post: &PostRecord) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::TextContains(query) => post.text.contains(query.as_str()),
            PostFilter::PostedBefore(cutoff) => post.posted_at < *cutoff,
            PostFilter::PostedOn(day) => post.posted_on() == *day,
            PostFilter::AuthorIs(author) => post.author_id == *author,
        }
    }
}
