//! Audit context threaded through mutating calls.
//!
//! The DAO never interprets a [`CallContext`]; it is handed to the store so
//! the record can be stamped with who changed it and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a call entered the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallOrigin {
    #[default]
    Internal,
    External,
    Test,
}

/// Kind of principal making the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    System,
    Admin,
    Customer,
    Migration,
    Test,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Per-request token used to correlate audit rows.
    pub user_token: Uuid,
    pub user_name: String,
    pub call_origin: CallOrigin,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl CallContext {
    /// New context for `user_name`, stamped now with a fresh token.
    pub fn new(user_name: impl Into<String>, call_origin: CallOrigin, user_type: UserType) -> Self {
        Self {
            user_token: Uuid::now_v7(),
            user_name: user_name.into(),
            call_origin,
            user_type,
            reason_code: None,
            comments: None,
            created_date: Utc::now(),
        }
    }

    /// Context for background or internal processes.
    pub fn system(user_name: impl Into<String>) -> Self {
        Self::new(user_name, CallOrigin::Internal, UserType::System)
    }

    pub fn with_reason_code(mut self, reason_code: impl Into<String>) -> Self {
        self.reason_code = Some(reason_code.into());
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    pub fn with_created_date(mut self, created_date: DateTime<Utc>) -> Self {
        self.created_date = created_date;
        self
    }
}
