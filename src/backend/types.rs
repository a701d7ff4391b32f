//! Wire types for the dashboard backend API.

use serde::{Deserialize, Serialize};

use crate::core::session::UserProfile;

/// Body of `POST /auth/login`.
#[derive(Serialize, Debug)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful `POST /auth/login` response.
#[derive(Deserialize, Debug)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Error body the backend sends with non-2xx responses, when it sends one.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    #[serde(alias = "message", alias = "detail")]
    pub error: String,
}

/// `GET /health` from the upstream service. Every field is optional;
/// reaching the endpoint with a 2xx is what counts.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct UpstreamHealth {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// `GET /reports/summary`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub title: String,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub stats: Vec<ReportStat>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReportStat {
    pub label: String,
    pub value: String,
    /// Change against the previous period, e.g. "+4%".
    #[serde(default)]
    pub change: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary_sparse_json() {
        let summary: ReportSummary = serde_json::from_str(r#"{"title":"Weekly"}"#).unwrap();
        assert_eq!(summary.title, "Weekly");
        assert!(summary.stats.is_empty());
        assert!(summary.highlights.is_empty());
    }

    #[test]
    fn test_error_body_accepts_aliases() {
        let a: ErrorBody = serde_json::from_str(r#"{"error":"bad"}"#).unwrap();
        let b: ErrorBody = serde_json::from_str(r#"{"message":"bad"}"#).unwrap();
        let c: ErrorBody = serde_json::from_str(r#"{"detail":"bad"}"#).unwrap();
        assert_eq!(a.error, "bad");
        assert_eq!(b.error, "bad");
        assert_eq!(c.error, "bad");
    }

    #[test]
    fn test_login_request_serializes() {
        let body = serde_json::to_value(LoginRequest {
            email: "ada@example.com",
            password: "pw",
        })
        .unwrap();
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["password"], "pw");
    }
}
