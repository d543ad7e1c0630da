//! Uploader identity as seen by the domain.
//!
//! The relational store also keeps credential hashes; those never cross the
//! persistence adapter. Only the summary below reaches services and responses.

use serde::{Deserialize, Serialize};

/// Integer primary key of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public identity of the user who uploaded a file.
///
/// Serialised as `{ "id", "email", "fullName" }`; `fullName` is `null` when
/// the user never provided one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploaderSummary {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
}
