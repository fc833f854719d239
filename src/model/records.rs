//! Record types for users, posts and follow edges

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Unique user identity
pub type UserId = u64;

/// Unique post identity
pub type PostId = u64;

/// Every write carries an explicit timestamp; the core never samples a clock.
pub type Timestamp = DateTime<Utc>;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: String,
    pub joined_at: Timestamp,
}

impl UserRecord {
    pub fn new(id: UserId, display_name: impl Into<String>, joined_at: Timestamp) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            joined_at,
        }
    }
}

/// A single post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    pub author_id: UserId,
    pub text: String,
    pub posted_at: Timestamp,
}

impl PostRecord {
    pub fn new(id: PostId, author_id: UserId, text: impl Into<String>, posted_at: Timestamp) -> Self {
        Self {
            id,
            author_id,
            text: text.into(),
            posted_at,
        }
    }

    /// UTC calendar day the post was made on
    pub fn posted_on(&self) -> NaiveDate {
        self.posted_at.date_naive()
    }
}

/// A directed follow relationship: `follower_id` follows `followee_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub followee_id: UserId,
    pub since: Timestamp,
}

impl FollowEdge {
    pub fn new(follower_id: UserId, followee_id: UserId, since: Timestamp) -> Self {
        Self {
            follower_id,
            followee_id,
            since,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_posted_on_is_utc_day() {
        let at = Utc.with_ymd_and_hms(2012, 11, 2, 23, 11, 0).unwrap();
        let post = PostRecord::new(1, 1, "Hello World!", at);
        assert_eq!(post.posted_on(), NaiveDate::from_ymd_opt(2012, 11, 2).unwrap());
    }

    #[test]
    fn test_records_serialize() {
        let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let user = UserRecord::new(7, "ada", at);
        let json = serde_json::to_string(&user).unwrap();
        let back: UserRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
