/// Domain records shared by the store adapters and route handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered identity.
///
/// The stored bcrypt hash is serialized under `password`, matching the wire
/// shape the API has always exposed. The plaintext never reaches this struct.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A job application record. `user_id` is set at creation and never changes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

/// Application progress state for a job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
}

impl JobStatus {
    /// Text form stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Interview => "interview",
            JobStatus::Declined => "declined",
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "interview" => Ok(JobStatus::Interview),
            "declined" => Ok(JobStatus::Declined),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(JobStatus::default(), JobStatus::Pending);
    }

    #[test]
    fn status_column_text_parses_back() {
        for status in [JobStatus::Pending, JobStatus::Interview, JobStatus::Declined] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        assert!("ghosted".parse::<JobStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Interview).unwrap();
        assert_eq!(json, r#""interview""#);
    }

    #[test]
    fn user_serializes_hash_under_password_key() {
        let user = User {
            id: Uuid::new_v4(),
            username: "zhila".to_string(),
            email: "zhila@gmail.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["password"], "$2b$12$abcdefghijklmnopqrstuv");
        assert!(value.get("password_hash").is_none());
    }
}
