use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::models::{Application, ApplicationStatus, Company, Contact, Interview};
use crate::store::EntityStore;

/// Group applications by status, in order of first occurrence. Statuses
/// with no applications do not appear at all.
pub fn count_by_status(applications: &[Application]) -> Vec<(ApplicationStatus, usize)> {
    let mut counts: Vec<(ApplicationStatus, usize)> = Vec::new();
    for app in applications {
        match counts.iter_mut().find(|(s, _)| *s == app.status) {
            Some((_, n)) => *n += 1,
            None => counts.push((app.status, 1)),
        }
    }
    counts
}

/// Count interviews strictly after `now`. Both sides are absolute instants;
/// no local-time interpretation happens here.
pub fn upcoming_interviews(interviews: &[Interview], now: DateTime<Utc>) -> usize {
    interviews.iter().filter(|i| i.scheduled_at > now).count()
}

/// Top-`limit` applications by recency: `applied_date` descending, with
/// undated applications after all dated ones. The sort is stable, so ties
/// and the undated tail keep their fetched order.
pub fn recent_applications(applications: &[Application], limit: usize) -> Vec<&Application> {
    let mut recent: Vec<&Application> = applications.iter().collect();
    recent.sort_by(|a, b| match (a.applied_date, b.applied_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    recent.truncate(limit);
    recent
}

/// The next `limit` future interviews, soonest first.
pub fn next_interviews(
    interviews: &[Interview],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<&Interview> {
    let mut upcoming: Vec<&Interview> = interviews
        .iter()
        .filter(|i| i.scheduled_at > now)
        .collect();
    upcoming.sort_by_key(|i| i.scheduled_at);
    upcoming.truncate(limit);
    upcoming
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub total_companies: usize,
    pub total_contacts: usize,
}

pub fn totals(companies: &[Company], contacts: &[Contact]) -> Totals {
    Totals {
        total_companies: companies.len(),
        total_contacts: contacts.len(),
    }
}

/// Everything the dashboard shows, derived fresh from the current snapshot
/// on each call. Nothing here is cached, so the stats can never drift from
/// the store.
pub struct DashboardStats<'a> {
    pub total_applications: usize,
    pub applications_by_status: Vec<(ApplicationStatus, usize)>,
    pub upcoming_interviews: usize,
    pub total_companies: usize,
    pub total_contacts: usize,
    pub recent_applications: Vec<&'a Application>,
    pub next_interviews: Vec<&'a Interview>,
}

const DASHBOARD_LIST_LIMIT: usize = 5;

pub fn dashboard_stats(store: &EntityStore, now: DateTime<Utc>) -> DashboardStats<'_> {
    let applications = store.applications.items();
    let interviews = store.interviews.items();
    let t = totals(store.companies.items(), store.contacts.items());
    DashboardStats {
        total_applications: applications.len(),
        applications_by_status: count_by_status(applications),
        upcoming_interviews: upcoming_interviews(interviews, now),
        total_companies: t.total_companies,
        total_contacts: t.total_contacts,
        recent_applications: recent_applications(applications, DASHBOARD_LIST_LIMIT),
        next_interviews: next_interviews(interviews, now, DASHBOARD_LIST_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn app(id: i64, status: ApplicationStatus, applied: Option<&str>) -> Application {
        Application {
            id,
            job_title: format!("Job {id}"),
            job_description: None,
            job_url: None,
            status,
            company_id: 1,
            salary_min: None,
            salary_max: None,
            salary_currency: "USD".to_string(),
            applied_date: applied.map(|d| {
                format!("{d}T00:00:00Z")
                    .parse::<DateTime<Utc>>()
                    .unwrap()
            }),
        }
    }

    fn interview_at(id: i64, scheduled_at: DateTime<Utc>) -> Interview {
        Interview {
            id,
            application_id: 10,
            interview_type: None,
            scheduled_at,
            location: None,
            interviewer_name: None,
            interviewer_email: None,
            notes: None,
            feedback: None,
            result: None,
        }
    }

    #[test]
    fn test_count_by_status_counts_and_sums() {
        use ApplicationStatus::*;
        let apps = vec![
            app(1, Applied, None),
            app(2, Interview, None),
            app(3, Applied, None),
            app(4, Offer, None),
            app(5, Applied, None),
        ];
        let counts = count_by_status(&apps);
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, apps.len());
        assert_eq!(counts, vec![(Applied, 3), (Interview, 1), (Offer, 1)]);
    }

    #[test]
    fn test_count_by_status_omits_unobserved_and_keeps_first_occurrence_order() {
        use ApplicationStatus::*;
        let apps = vec![app(1, Offer, None), app(2, Saved, None), app(3, Offer, None)];
        let counts = count_by_status(&apps);
        // Offer seen first, so it leads; statuses never seen are absent.
        assert_eq!(counts, vec![(Offer, 2), (Saved, 1)]);
        assert!(!counts.iter().any(|(s, _)| *s == Rejected));
    }

    #[test]
    fn test_count_by_status_empty() {
        assert!(count_by_status(&[]).is_empty());
    }

    #[test]
    fn test_upcoming_interviews_strictly_after_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let interviews = vec![
            interview_at(1, now + chrono::Duration::hours(1)),
            interview_at(2, now - chrono::Duration::hours(1)),
            interview_at(3, now),
        ];
        assert_eq!(upcoming_interviews(&interviews, now), 1);
        assert_eq!(upcoming_interviews(&[], now), 0);
    }

    #[test]
    fn test_recent_applications_dated_first_then_stable() {
        use ApplicationStatus::*;
        let apps = vec![
            app(1, Applied, None),
            app(2, Applied, Some("2024-01-05")),
            app(3, Applied, Some("2024-03-01")),
            app(4, Applied, None),
            app(5, Applied, Some("2024-03-01")),
        ];
        let recent = recent_applications(&apps, 10);
        let ids: Vec<i64> = recent.iter().map(|a| a.id).collect();
        // Newest date first; equal dates and the undated tail keep input order.
        assert_eq!(ids, vec![3, 5, 2, 1, 4]);

        let top2 = recent_applications(&apps, 2);
        assert_eq!(top2.len(), 2);
        assert_eq!(top2[0].id, 3);
    }

    #[test]
    fn test_recent_applications_empty_and_short() {
        assert!(recent_applications(&[], 5).is_empty());
        let apps = vec![app(1, ApplicationStatus::Saved, None)];
        assert_eq!(recent_applications(&apps, 5).len(), 1);
    }

    #[test]
    fn test_next_interviews_sorted_soonest_first() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let interviews = vec![
            interview_at(1, now + chrono::Duration::days(3)),
            interview_at(2, now - chrono::Duration::days(1)),
            interview_at(3, now + chrono::Duration::days(1)),
        ];
        let next = next_interviews(&interviews, now, 5);
        let ids: Vec<i64> = next.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_totals() {
        let t = totals(&[], &[]);
        assert_eq!(t.total_companies, 0);
        assert_eq!(t.total_contacts, 0);
    }

    #[test]
    fn test_dashboard_stats_on_empty_store() {
        let store = EntityStore::new();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let stats = dashboard_stats(&store, now);
        assert_eq!(stats.total_applications, 0);
        assert!(stats.applications_by_status.is_empty());
        assert_eq!(stats.upcoming_interviews, 0);
        assert!(stats.recent_applications.is_empty());
        assert!(stats.next_interviews.is_empty());
    }

    #[test]
    fn test_dashboard_stats_reflects_snapshot() {
        use ApplicationStatus::*;
        let mut store = EntityStore::new();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let t = store.begin_fetch();
        store
            .applications
            .commit(t, vec![app(10, Interview, Some("2024-05-20")), app(11, Applied, None)]);
        let t = store.begin_fetch();
        store.interviews.commit(
            t,
            vec![
                interview_at(1, now + chrono::Duration::hours(2)),
                interview_at(2, now - chrono::Duration::hours(2)),
            ],
        );

        let stats = dashboard_stats(&store, now);
        assert_eq!(stats.total_applications, 2);
        assert_eq!(stats.applications_by_status, vec![(Interview, 1), (Applied, 1)]);
        assert_eq!(stats.upcoming_interviews, 1);
        assert_eq!(stats.recent_applications[0].id, 10);
        assert_eq!(stats.next_interviews.len(), 1);
        assert_eq!(stats.next_interviews[0].id, 1);
    }
}
