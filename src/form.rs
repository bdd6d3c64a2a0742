use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{
    Application, ApplicationStatus, Company, Contact, Interview, InterviewResult,
};

/// Whether a form is backed by an existing entity. Edit carries the id the
/// payload will be PUT against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// A submit-time problem with form input. Validation failure blocks the
/// submission; the form struct itself is never touched, so nothing the
/// user typed is lost.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field}: '{value}' is not a valid number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field}: '{value}' is not a valid date")]
    InvalidDate { field: &'static str, value: String },
    #[error("unknown status '{0}'")]
    UnknownStatus(String),
    #[error("unknown interview result '{0}'")]
    UnknownResult(String),
}

// --- field coercion helpers ---

/// Empty optional text fields normalize to null, never to "".
fn opt_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn text_of(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn required_text(field: &'static str, s: &str) -> Result<String, ValidationError> {
    opt_text(s).ok_or(ValidationError::MissingField(field))
}

fn required_id(field: &'static str, s: &str) -> Result<i64, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}

fn optional_id(field: &'static str, s: &str) -> Result<Option<i64>, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}

/// Optional numeric fields: empty or unparseable input coerces to null.
fn optional_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

fn number_text(v: &Option<f64>) -> String {
    v.map(|n| {
        if n.fract() == 0.0 {
            format!("{}", n as i64)
        } else {
            n.to_string()
        }
    })
    .unwrap_or_default()
}

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_LOCAL_FMT: &str = "%Y-%m-%dT%H:%M";

/// Date-only input field ("2024-03-01"). The stored value is an absolute
/// instant; the date binds as-is and parses back to midnight UTC.
fn optional_date(
    field: &'static str,
    s: &str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date =
        NaiveDate::parse_from_str(trimmed, DATE_FMT).map_err(|_| ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })?;
    Ok(Some(date.and_time(NaiveTime::MIN).and_utc()))
}

fn date_text(v: &Option<DateTime<Utc>>) -> String {
    v.map(|d| d.format(DATE_FMT).to_string()).unwrap_or_default()
}

/// Date-time input field ("2024-03-01T14:30"). The form field is local
/// wall-clock text; parsing reconstructs the equivalent absolute instant.
/// An ambiguous local time (DST fold) takes the earlier reading; a
/// nonexistent one (DST gap) is rejected.
fn required_datetime_local(
    field: &'static str,
    s: &str,
) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    let naive = NaiveDateTime::parse_from_str(trimmed, DATETIME_LOCAL_FMT).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        }
    })?;
    let local = match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            return Err(ValidationError::InvalidDate {
                field,
                value: trimmed.to_string(),
            });
        }
    };
    Ok(local.with_timezone(&Utc))
}

fn datetime_local_text(v: DateTime<Utc>) -> String {
    v.with_timezone(&Local).format(DATETIME_LOCAL_FMT).to_string()
}

// --- Company ---

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyForm {
    pub name: String,
    pub website: String,
    pub industry: String,
    pub size: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyPayload {
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl CompanyForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            website: String::new(),
            industry: String::new(),
            size: String::new(),
            location: String::new(),
            description: String::new(),
        }
    }

    pub fn edit(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            website: text_of(&company.website),
            industry: text_of(&company.industry),
            size: text_of(&company.size),
            location: text_of(&company.location),
            description: text_of(&company.description),
        }
    }

    pub fn payload(&self) -> Result<CompanyPayload, ValidationError> {
        Ok(CompanyPayload {
            name: required_text("name", &self.name)?,
            website: opt_text(&self.website),
            industry: opt_text(&self.industry),
            size: opt_text(&self.size),
            location: opt_text(&self.location),
            description: opt_text(&self.description),
        })
    }
}

impl Default for CompanyForm {
    fn default() -> Self {
        Self::new()
    }
}

// --- Contact ---

#[derive(Debug, Clone, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub linkedin: String,
    pub company_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub linkedin: Option<String>,
    pub company_id: Option<i64>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            title: String::new(),
            linkedin: String::new(),
            company_id: String::new(),
        }
    }

    pub fn edit(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: text_of(&contact.email),
            phone: text_of(&contact.phone),
            title: text_of(&contact.title),
            linkedin: text_of(&contact.linkedin),
            company_id: contact.company_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    pub fn payload(&self) -> Result<ContactPayload, ValidationError> {
        Ok(ContactPayload {
            name: required_text("name", &self.name)?,
            email: opt_text(&self.email),
            phone: opt_text(&self.phone),
            title: opt_text(&self.title),
            linkedin: opt_text(&self.linkedin),
            company_id: optional_id("company_id", &self.company_id)?,
        })
    }
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

// --- Application ---

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationForm {
    pub job_title: String,
    pub job_description: String,
    pub job_url: String,
    pub status: String,
    pub company_id: String,
    pub salary_min: String,
    pub salary_max: String,
    pub salary_currency: String,
    pub applied_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationPayload {
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

impl ApplicationForm {
    /// Canonical defaults for a fresh application.
    pub fn new() -> Self {
        Self {
            job_title: String::new(),
            job_description: String::new(),
            job_url: String::new(),
            status: ApplicationStatus::Saved.as_str().to_string(),
            company_id: String::new(),
            salary_min: String::new(),
            salary_max: String::new(),
            salary_currency: "USD".to_string(),
            applied_date: String::new(),
        }
    }

    pub fn edit(app: &Application) -> Self {
        Self {
            job_title: app.job_title.clone(),
            job_description: text_of(&app.job_description),
            job_url: text_of(&app.job_url),
            status: app.status.as_str().to_string(),
            company_id: app.company_id.to_string(),
            salary_min: number_text(&app.salary_min),
            salary_max: number_text(&app.salary_max),
            salary_currency: app.salary_currency.clone(),
            applied_date: date_text(&app.applied_date),
        }
    }

    pub fn payload(&self) -> Result<ApplicationPayload, ValidationError> {
        let status = ApplicationStatus::parse(self.status.trim())
            .ok_or_else(|| ValidationError::UnknownStatus(self.status.clone()))?;
        let currency = self.salary_currency.trim();
        Ok(ApplicationPayload {
            job_title: required_text("job_title", &self.job_title)?,
            job_description: opt_text(&self.job_description),
            job_url: opt_text(&self.job_url),
            status,
            company_id: required_id("company_id", &self.company_id)?,
            salary_min: optional_number(&self.salary_min),
            salary_max: optional_number(&self.salary_max),
            salary_currency: if currency.is_empty() {
                "USD".to_string()
            } else {
                currency.to_string()
            },
            applied_date: optional_date("applied_date", &self.applied_date)?,
        })
    }
}

impl Default for ApplicationForm {
    fn default() -> Self {
        Self::new()
    }
}

// --- Interview ---

#[derive(Debug, Clone, PartialEq)]
pub struct InterviewForm {
    pub application_id: String,
    pub interview_type: String,
    pub scheduled_at: String,
    pub location: String,
    pub interviewer_name: String,
    pub interviewer_email: String,
    pub notes: String,
    pub feedback: String,
    pub result: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewPayload {
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

impl InterviewForm {
    pub fn new() -> Self {
        Self {
            application_id: String::new(),
            interview_type: String::new(),
            scheduled_at: String::new(),
            location: String::new(),
            interviewer_name: String::new(),
            interviewer_email: String::new(),
            notes: String::new(),
            feedback: String::new(),
            result: String::new(),
        }
    }

    pub fn edit(interview: &Interview) -> Self {
        Self {
            application_id: interview.application_id.to_string(),
            interview_type: text_of(&interview.interview_type),
            scheduled_at: datetime_local_text(interview.scheduled_at),
            location: text_of(&interview.location),
            interviewer_name: text_of(&interview.interviewer_name),
            interviewer_email: text_of(&interview.interviewer_email),
            notes: text_of(&interview.notes),
            feedback: text_of(&interview.feedback),
            result: interview.result.map(|r| r.as_str().to_string()).unwrap_or_default(),
        }
    }

    pub fn payload(&self) -> Result<InterviewPayload, ValidationError> {
        let result = match opt_text(&self.result) {
            None => None,
            Some(r) => Some(
                InterviewResult::parse(&r).ok_or(ValidationError::UnknownResult(r))?,
            ),
        };
        Ok(InterviewPayload {
            application_id: required_id("application_id", &self.application_id)?,
            interview_type: opt_text(&self.interview_type),
            scheduled_at: required_datetime_local("scheduled_at", &self.scheduled_at)?,
            location: opt_text(&self.location),
            interviewer_name: opt_text(&self.interviewer_name),
            interviewer_email: opt_text(&self.interviewer_email),
            notes: opt_text(&self.notes),
            feedback: opt_text(&self.feedback),
            result,
        })
    }
}

impl Default for InterviewForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_application() -> Application {
        Application {
            id: 10,
            job_title: "Engineer".to_string(),
            job_description: None,
            job_url: Some("https://example.com/jobs/1".to_string()),
            status: ApplicationStatus::Interview,
            company_id: 3,
            salary_min: Some(120000.0),
            salary_max: None,
            salary_currency: "USD".to_string(),
            applied_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
        }
    }

    fn sample_interview() -> Interview {
        Interview {
            id: 1,
            application_id: 10,
            interview_type: Some("Video".to_string()),
            scheduled_at: Utc.with_ymd_and_hms(2024, 6, 10, 14, 30, 0).unwrap(),
            location: None,
            interviewer_name: Some("Dana".to_string()),
            interviewer_email: None,
            notes: None,
            feedback: None,
            result: None,
        }
    }

    #[test]
    fn test_application_form_defaults() {
        let form = ApplicationForm::new();
        assert_eq!(form.status, "saved");
        assert_eq!(form.salary_currency, "USD");
        assert_eq!(form.job_title, "");
        assert_eq!(form.company_id, "");
        assert_eq!(form.applied_date, "");
    }

    #[test]
    fn test_edit_maps_none_to_empty_string() {
        let app = sample_application();
        let form = ApplicationForm::edit(&app);
        assert_eq!(form.job_description, "");
        assert_eq!(form.salary_max, "");
        assert_eq!(form.salary_min, "120000");
        assert_eq!(form.company_id, "3");
        assert_eq!(form.applied_date, "2024-03-01");
    }

    #[test]
    fn test_application_round_trip() {
        let app = sample_application();
        let payload = ApplicationForm::edit(&app).payload().unwrap();
        assert_eq!(payload.job_title, app.job_title);
        assert_eq!(payload.job_description, None);
        assert_eq!(payload.job_url, app.job_url);
        assert_eq!(payload.status, app.status);
        assert_eq!(payload.company_id, app.company_id);
        assert_eq!(payload.salary_min, app.salary_min);
        assert_eq!(payload.salary_max, None);
        assert_eq!(payload.salary_currency, app.salary_currency);
        assert_eq!(payload.applied_date, app.applied_date);
    }

    #[test]
    fn test_payload_serializes_nulls_explicitly() {
        let payload = ApplicationForm::edit(&sample_application()).payload().unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("salary_max").unwrap().is_null());
        assert!(json.get("job_description").unwrap().is_null());
        assert_eq!(json.get("status").unwrap(), "interview");
    }

    #[test]
    fn test_missing_required_fields_block_submission() {
        let mut form = ApplicationForm::new();
        assert_eq!(
            form.payload().unwrap_err(),
            ValidationError::MissingField("job_title")
        );

        form.job_title = "Engineer".to_string();
        assert_eq!(
            form.payload().unwrap_err(),
            ValidationError::MissingField("company_id")
        );

        // The form itself is untouched by failed validation.
        assert_eq!(form.job_title, "Engineer");
        assert_eq!(form.status, "saved");
    }

    #[test]
    fn test_unparseable_required_id_is_an_error() {
        let mut form = ApplicationForm::new();
        form.job_title = "Engineer".to_string();
        form.company_id = "acme".to_string();
        assert_eq!(
            form.payload().unwrap_err(),
            ValidationError::InvalidNumber {
                field: "company_id",
                value: "acme".to_string()
            }
        );
    }

    #[test]
    fn test_optional_salary_coerces_to_null() {
        let mut form = ApplicationForm::new();
        form.job_title = "Engineer".to_string();
        form.company_id = "1".to_string();
        form.salary_min = "".to_string();
        form.salary_max = "lots".to_string();
        let payload = form.payload().unwrap();
        assert_eq!(payload.salary_min, None);
        assert_eq!(payload.salary_max, None);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut form = ApplicationForm::new();
        form.job_title = "Engineer".to_string();
        form.company_id = "1".to_string();
        form.status = "ghosted".to_string();
        assert_eq!(
            form.payload().unwrap_err(),
            ValidationError::UnknownStatus("ghosted".to_string())
        );
    }

    #[test]
    fn test_interview_round_trip_preserves_instant() {
        let interview = sample_interview();
        let form = InterviewForm::edit(&interview);
        // The form field holds local wall-clock text to minute precision.
        assert_eq!(
            form.scheduled_at,
            interview
                .scheduled_at
                .with_timezone(&Local)
                .format("%Y-%m-%dT%H:%M")
                .to_string()
        );
        let payload = form.payload().unwrap();
        assert_eq!(payload.scheduled_at, interview.scheduled_at);
        assert_eq!(payload.application_id, 10);
        assert_eq!(payload.interview_type, Some("Video".to_string()));
        assert_eq!(payload.location, None);
        assert_eq!(payload.result, None);
    }

    #[test]
    fn test_interview_requires_schedule() {
        let mut form = InterviewForm::new();
        form.application_id = "10".to_string();
        assert_eq!(
            form.payload().unwrap_err(),
            ValidationError::MissingField("scheduled_at")
        );

        form.scheduled_at = "next tuesday".to_string();
        assert!(matches!(
            form.payload().unwrap_err(),
            ValidationError::InvalidDate { field: "scheduled_at", .. }
        ));
    }

    #[test]
    fn test_interview_empty_result_is_pending() {
        let mut form = InterviewForm::new();
        form.application_id = "10".to_string();
        form.scheduled_at = "2024-06-10T09:00".to_string();
        let payload = form.payload().unwrap();
        assert_eq!(payload.result, None);

        form.result = "passed".to_string();
        assert_eq!(form.payload().unwrap().result, Some(InterviewResult::Passed));

        form.result = "maybe".to_string();
        assert_eq!(
            form.payload().unwrap_err(),
            ValidationError::UnknownResult("maybe".to_string())
        );
    }

    #[test]
    fn test_company_form_round_trip() {
        let company = Company {
            id: 1,
            name: "Acme".to_string(),
            website: Some("https://acme.test".to_string()),
            industry: None,
            size: None,
            location: Some("Berlin".to_string()),
            description: None,
        };
        let payload = CompanyForm::edit(&company).payload().unwrap();
        assert_eq!(payload.name, "Acme");
        assert_eq!(payload.website, Some("https://acme.test".to_string()));
        assert_eq!(payload.industry, None);
        assert_eq!(payload.location, Some("Berlin".to_string()));

        assert_eq!(
            CompanyForm::new().payload().unwrap_err(),
            ValidationError::MissingField("name")
        );
    }

    #[test]
    fn test_contact_form_optional_company() {
        let mut form = ContactForm::new();
        form.name = "Sam".to_string();
        let payload = form.payload().unwrap();
        assert_eq!(payload.company_id, None);

        form.company_id = "7".to_string();
        assert_eq!(form.payload().unwrap().company_id, Some(7));

        form.company_id = "seven".to_string();
        assert!(matches!(
            form.payload().unwrap_err(),
            ValidationError::InvalidNumber { field: "company_id", .. }
        ));
    }

    #[test]
    fn test_date_only_round_trip_is_date_precise() {
        // An applied_date with a time-of-day survives to date precision only.
        let mut app = sample_application();
        app.applied_date = Some(Utc.with_ymd_and_hms(2024, 3, 1, 15, 45, 0).unwrap());
        let payload = ApplicationForm::edit(&app).payload().unwrap();
        assert_eq!(
            payload.applied_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }
}
