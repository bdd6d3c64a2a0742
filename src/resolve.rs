use crate::models::{Application, Company, Entity, Interview};

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_POSITION: &str = "Unknown Position";

/// Outcome of a foreign-key lookup. A miss is a distinct variant rather
/// than a sentinel entity, so it can never collide with real data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a, T> {
    Found(&'a T),
    Unknown,
}

impl<'a, T> Resolved<'a, T> {
    pub fn found(self) -> Option<&'a T> {
        match self {
            Resolved::Found(e) => Some(e),
            Resolved::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Resolved::Unknown)
    }
}

/// Look up `id` in a collection snapshot. Total: an absent id and an id
/// with no match both come back `Unknown`. Collections are small, so a
/// linear scan is fine.
pub fn resolve<T: Entity>(items: &[T], id: Option<i64>) -> Resolved<'_, T> {
    let Some(id) = id else {
        return Resolved::Unknown;
    };
    match items.iter().find(|e| e.id() == id) {
        Some(e) => Resolved::Found(e),
        None => Resolved::Unknown,
    }
}

/// Company name for a foreign key, with the standard placeholder on a miss.
pub fn company_name(companies: &[Company], company_id: Option<i64>) -> String {
    match resolve(companies, company_id) {
        Resolved::Found(c) => c.name.clone(),
        Resolved::Unknown => UNKNOWN_COMPANY.to_string(),
    }
}

/// Joined interview context: the position and company behind an interview.
#[derive(Debug, Clone, PartialEq)]
pub struct AppContext {
    pub job_title: String,
    pub company_name: Option<String>,
}

/// Chain Interview -> Application -> Company. If the application link is
/// broken the chain short-circuits: the company hop is never attempted and
/// the context degrades to the position placeholder with no company.
pub fn application_context(
    interview: &Interview,
    applications: &[Application],
    companies: &[Company],
) -> AppContext {
    match resolve(applications, Some(interview.application_id)) {
        Resolved::Found(app) => {
            let company = resolve(companies, Some(app.company_id))
                .found()
                .map(|c| c.name.clone());
            AppContext {
                job_title: app.job_title.clone(),
                company_name: company,
            }
        }
        Resolved::Unknown => AppContext {
            job_title: UNKNOWN_POSITION.to_string(),
            company_name: None,
        },
    }
}
