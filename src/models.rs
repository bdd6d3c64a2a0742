use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything with an integer identity that a foreign key can point at.
pub trait Entity {
    fn id(&self) -> i64;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub linkedin: Option<String>,
    pub company_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub job_title: String,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub status: ApplicationStatus,
    pub company_id: i64,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: String,
    pub applied_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: i64,
    pub application_id: i64,
    pub interview_type: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub notes: Option<String>,
    pub feedback: Option<String>,
    pub result: Option<InterviewResult>,
}

impl Entity for Company {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Contact {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Application {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Interview {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Application pipeline stage. Closed set; the wire form is snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Saved,
    Applied,
    PhoneScreen,
    Interview,
    FinalInterview,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Applied => "applied",
            Self::PhoneScreen => "phone_screen",
            Self::Interview => "interview",
            Self::FinalInterview => "final_interview",
            Self::Offer => "offer",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "saved" => Some(Self::Saved),
            "applied" => Some(Self::Applied),
            "phone_screen" => Some(Self::PhoneScreen),
            "interview" => Some(Self::Interview),
            "final_interview" => Some(Self::FinalInterview),
            "offer" => Some(Self::Offer),
            "rejected" => Some(Self::Rejected),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }

    /// Display form: underscores become spaces, words are capitalized
    /// ("phone_screen" -> "Phone Screen").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Saved => "Saved",
            Self::Applied => "Applied",
            Self::PhoneScreen => "Phone Screen",
            Self::Interview => "Interview",
            Self::FinalInterview => "Final Interview",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
            Self::Withdrawn => "Withdrawn",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interview outcome. An absent result reads as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewResult {
    Passed,
    Failed,
    Pending,
}

impl InterviewResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Pending => "pending",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for InterviewResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form_round_trips() {
        for s in [
            ApplicationStatus::Saved,
            ApplicationStatus::Applied,
            ApplicationStatus::PhoneScreen,
            ApplicationStatus::Interview,
            ApplicationStatus::FinalInterview,
            ApplicationStatus::Offer,
            ApplicationStatus::Rejected,
            ApplicationStatus::Withdrawn,
        ] {
            assert_eq!(ApplicationStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ApplicationStatus::parse("ghosted"), None);
    }

    #[test]
    fn test_status_serde_is_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::PhoneScreen).unwrap();
        assert_eq!(json, "\"phone_screen\"");
        let back: ApplicationStatus = serde_json::from_str("\"final_interview\"").unwrap();
        assert_eq!(back, ApplicationStatus::FinalInterview);
    }

    #[test]
    fn test_status_label_replaces_underscores() {
        assert_eq!(ApplicationStatus::PhoneScreen.label(), "Phone Screen");
        assert_eq!(ApplicationStatus::FinalInterview.label(), "Final Interview");
        assert_eq!(ApplicationStatus::Saved.label(), "Saved");
    }

    #[test]
    fn test_application_deserializes_from_wire_json() {
        let json = r#"{
            "id": 10,
            "job_title": "Engineer",
            "job_description": null,
            "job_url": "https://example.com/jobs/1",
            "status": "interview",
            "company_id": 1,
            "salary_min": 120000.0,
            "salary_max": null,
            "salary_currency": "USD",
            "applied_date": "2024-03-01T00:00:00Z"
        }"#;
        let app: Application = serde_json::from_str(json).unwrap();
        assert_eq!(app.id, 10);
        assert_eq!(app.status, ApplicationStatus::Interview);
        assert_eq!(app.salary_min, Some(120000.0));
        assert_eq!(app.salary_max, None);
    }

    #[test]
    fn test_interview_result_parse() {
        assert_eq!(InterviewResult::parse("passed"), Some(InterviewResult::Passed));
        assert_eq!(InterviewResult::parse(""), None);
        assert_eq!(InterviewResult::parse("maybe"), None);
    }
}
