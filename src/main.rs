mod aggregate;
mod api;
mod client;
mod form;
mod models;
mod resolve;
mod store;

use anyhow::{anyhow, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};

use api::{ApiClient, ApiConfig};
use client::Tracker;
use form::{ApplicationForm, CompanyForm, ContactForm, FormMode, InterviewForm};
use models::{Application, ApplicationStatus, Company};
use store::EntityStore;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Job search tracker - applications, companies, contacts, interviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show job search progress
    Dashboard,

    /// Manage job applications
    Application {
        #[command(subcommand)]
        command: ApplicationCommands,
    },

    /// Manage companies
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Manage contacts
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Manage interviews
    Interview {
        #[command(subcommand)]
        command: InterviewCommands,
    },
}

#[derive(Subcommand)]
enum ApplicationCommands {
    /// List applications
    List {
        /// Filter by status (saved, applied, phone_screen, interview,
        /// final_interview, offer, rejected, withdrawn)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show application details
    Show {
        /// Application ID
        id: i64,
    },

    /// Add an application
    Add {
        /// Job title
        #[arg(short, long)]
        title: String,

        /// Company ID
        #[arg(short, long)]
        company_id: String,

        /// Status (defaults to saved)
        #[arg(short, long)]
        status: Option<String>,

        /// Job posting URL
        #[arg(short, long)]
        url: Option<String>,

        /// Job description
        #[arg(short, long)]
        description: Option<String>,

        /// Minimum salary
        #[arg(long)]
        salary_min: Option<String>,

        /// Maximum salary
        #[arg(long)]
        salary_max: Option<String>,

        /// Salary currency (defaults to USD)
        #[arg(long)]
        currency: Option<String>,

        /// Date applied (YYYY-MM-DD)
        #[arg(long)]
        applied: Option<String>,
    },

    /// Edit an application (unset flags keep their current values)
    Edit {
        /// Application ID
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        company_id: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        salary_min: Option<String>,

        #[arg(long)]
        salary_max: Option<String>,

        #[arg(long)]
        currency: Option<String>,

        #[arg(long)]
        applied: Option<String>,
    },

    /// Delete an application
    Delete {
        /// Application ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// List companies
    List,

    /// Show company details
    Show {
        /// Company name or ID
        name: String,
    },

    /// Add a company
    Add {
        /// Company name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        website: Option<String>,

        #[arg(short, long)]
        industry: Option<String>,

        /// Company size (e.g., "50-200")
        #[arg(long)]
        size: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Edit a company (unset flags keep their current values)
    Edit {
        /// Company ID
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        website: Option<String>,

        #[arg(short, long)]
        industry: Option<String>,

        #[arg(long)]
        size: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a company
    Delete {
        /// Company ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// List contacts
    List,

    /// Add a contact
    Add {
        /// Contact name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,

        /// Job title of the contact
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        linkedin: Option<String>,

        /// Company ID
        #[arg(short, long)]
        company_id: Option<String>,
    },

    /// Edit a contact (unset flags keep their current values)
    Edit {
        /// Contact ID
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        linkedin: Option<String>,

        #[arg(short, long)]
        company_id: Option<String>,
    },

    /// Delete a contact
    Delete {
        /// Contact ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum InterviewCommands {
    /// List interviews
    List,

    /// Add an interview
    Add {
        /// Application ID
        #[arg(short, long)]
        application_id: String,

        /// Scheduled date and time, local (YYYY-MM-DDTHH:MM)
        #[arg(short, long)]
        scheduled: String,

        /// Interview type (e.g., Phone, Video, Onsite)
        #[arg(short = 't', long = "type")]
        interview_type: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// Interviewer name
        #[arg(short, long)]
        interviewer: Option<String>,

        /// Interviewer email
        #[arg(long)]
        interviewer_email: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        #[arg(short, long)]
        feedback: Option<String>,

        /// Result (passed, failed, pending)
        #[arg(short, long)]
        result: Option<String>,
    },

    /// Edit an interview (unset flags keep their current values)
    Edit {
        /// Interview ID
        id: i64,

        #[arg(short, long)]
        application_id: Option<String>,

        #[arg(short, long)]
        scheduled: Option<String>,

        #[arg(short = 't', long = "type")]
        interview_type: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        interviewer: Option<String>,

        #[arg(long)]
        interviewer_email: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        #[arg(short, long)]
        feedback: Option<String>,

        #[arg(short, long)]
        result: Option<String>,
    },

    /// Delete an interview
    Delete {
        /// Interview ID
        id: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let api = ApiClient::new(ApiConfig::load()?);
    let mut tracker = Tracker::new(api);

    match cli.command {
        Commands::Dashboard => {
            tracker.refresh_all()?;
            print_dashboard(&tracker.store);
        }

        Commands::Application { command } => run_application(&mut tracker, command)?,
        Commands::Company { command } => run_company(&mut tracker, command)?,
        Commands::Contact { command } => run_contact(&mut tracker, command)?,
        Commands::Interview { command } => run_interview(&mut tracker, command)?,
    }

    Ok(())
}

fn print_dashboard(store: &EntityStore) {
    let stats = aggregate::dashboard_stats(store, Utc::now());

    println!("Job search dashboard");
    println!("  {:<22} {}", "Applications:", stats.total_applications);
    println!("  {:<22} {}", "Companies:", stats.total_companies);
    println!("  {:<22} {}", "Contacts:", stats.total_contacts);
    println!("  {:<22} {}", "Upcoming interviews:", stats.upcoming_interviews);

    if !stats.applications_by_status.is_empty() {
        println!("\nApplications by status:");
        for (status, count) in &stats.applications_by_status {
            println!("  {:<16} {}", status.label(), count);
        }
    }

    if !stats.recent_applications.is_empty() {
        println!("\nRecent applications:");
        println!("  {:<6} {:<28} {:<20} {:<14}", "ID", "TITLE", "COMPANY", "STATUS");
        for app in &stats.recent_applications {
            println!(
                "  {:<6} {:<28} {:<20} {:<14}",
                app.id,
                truncate(&app.job_title, 26),
                truncate(
                    &resolve::company_name(store.companies.items(), Some(app.company_id)),
                    18
                ),
                app.status.label()
            );
        }
    }

    if !stats.next_interviews.is_empty() {
        println!("\nUpcoming interviews:");
        println!("  {:<18} {:<12} {:<28} {:<20}", "WHEN", "TYPE", "POSITION", "COMPANY");
        for interview in &stats.next_interviews {
            let ctx = resolve::application_context(
                interview,
                store.applications.items(),
                store.companies.items(),
            );
            println!(
                "  {:<18} {:<12} {:<28} {:<20}",
                interview
                    .scheduled_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M"),
                truncate(interview.interview_type.as_deref().unwrap_or("-"), 10),
                truncate(&ctx.job_title, 26),
                truncate(ctx.company_name.as_deref().unwrap_or("-"), 18)
            );
        }
    }
}

fn run_application(tracker: &mut Tracker, command: ApplicationCommands) -> Result<()> {
    match command {
        ApplicationCommands::List { status } => {
            let filter = match status.as_deref() {
                Some(s) => Some(
                    ApplicationStatus::parse(s).ok_or_else(|| anyhow!("Unknown status '{s}'"))?,
                ),
                None => None,
            };
            tracker.refresh_applications()?;
            tracker.refresh_companies()?;

            let store = &tracker.store;
            let apps: Vec<&Application> = store
                .applications
                .items()
                .iter()
                .filter(|a| filter.is_none_or(|f| a.status == f))
                .collect();
            if apps.is_empty() {
                println!("No applications found.");
                return Ok(());
            }
            println!(
                "{:<6} {:<16} {:<28} {:<20} {:<16} {:<12}",
                "ID", "STATUS", "TITLE", "COMPANY", "SALARY", "APPLIED"
            );
            println!("{}", "-".repeat(100));
            for app in apps {
                println!(
                    "{:<6} {:<16} {:<28} {:<20} {:<16} {:<12}",
                    app.id,
                    app.status.label(),
                    truncate(&app.job_title, 26),
                    truncate(
                        &resolve::company_name(store.companies.items(), Some(app.company_id)),
                        18
                    ),
                    format_salary(app),
                    app.applied_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }

        ApplicationCommands::Show { id } => {
            tracker.refresh_applications()?;
            tracker.refresh_companies()?;
            let store = &tracker.store;
            let app = find_application(store, id)?;
            println!("Application #{}", app.id);
            println!("Title: {}", app.job_title);
            println!(
                "Company: {}",
                resolve::company_name(store.companies.items(), Some(app.company_id))
            );
            println!("Status: {}", app.status.label());
            if let Some(url) = &app.job_url {
                println!("URL: {url}");
            }
            if app.salary_min.is_some() || app.salary_max.is_some() {
                println!("Salary: {}", format_salary(app));
            }
            if let Some(date) = app.applied_date {
                println!("Applied: {}", date.format("%Y-%m-%d"));
            }
            if let Some(desc) = &app.job_description {
                println!("\n--- Description ---\n{desc}");
            }
        }

        ApplicationCommands::Add {
            title,
            company_id,
            status,
            url,
            description,
            salary_min,
            salary_max,
            currency,
            applied,
        } => {
            let mut form = ApplicationForm::new();
            form.job_title = title;
            form.company_id = company_id;
            set_if(&mut form.status, status);
            set_if(&mut form.job_url, url);
            set_if(&mut form.job_description, description);
            set_if(&mut form.salary_min, salary_min);
            set_if(&mut form.salary_max, salary_max);
            set_if(&mut form.salary_currency, currency);
            set_if(&mut form.applied_date, applied);

            tracker.submit_application(&form, FormMode::Create)?;
            println!("Added application '{}'", form.job_title);
        }

        ApplicationCommands::Edit {
            id,
            title,
            company_id,
            status,
            url,
            description,
            salary_min,
            salary_max,
            currency,
            applied,
        } => {
            tracker.refresh_applications()?;
            let app = find_application(&tracker.store, id)?.clone();

            let mut form = ApplicationForm::edit(&app);
            set_if(&mut form.job_title, title);
            set_if(&mut form.company_id, company_id);
            set_if(&mut form.status, status);
            set_if(&mut form.job_url, url);
            set_if(&mut form.job_description, description);
            set_if(&mut form.salary_min, salary_min);
            set_if(&mut form.salary_max, salary_max);
            set_if(&mut form.salary_currency, currency);
            set_if(&mut form.applied_date, applied);

            tracker.submit_application(&form, FormMode::Edit(id))?;
            println!("Updated application #{id}");
        }

        ApplicationCommands::Delete { id } => {
            tracker.delete_application(id)?;
            println!("Deleted application #{id}");
        }
    }
    Ok(())
}

fn run_company(tracker: &mut Tracker, command: CompanyCommands) -> Result<()> {
    match command {
        CompanyCommands::List => {
            tracker.refresh_companies()?;
            let companies = tracker.store.companies.items();
            if companies.is_empty() {
                println!("No companies found.");
                return Ok(());
            }
            println!(
                "{:<6} {:<24} {:<18} {:<18} {:<10}",
                "ID", "NAME", "INDUSTRY", "LOCATION", "SIZE"
            );
            println!("{}", "-".repeat(78));
            for company in companies {
                println!(
                    "{:<6} {:<24} {:<18} {:<18} {:<10}",
                    company.id,
                    truncate(&company.name, 22),
                    truncate(company.industry.as_deref().unwrap_or("-"), 16),
                    truncate(company.location.as_deref().unwrap_or("-"), 16),
                    truncate(company.size.as_deref().unwrap_or("-"), 8)
                );
            }
        }

        CompanyCommands::Show { name } => {
            tracker.refresh_companies()?;
            tracker.refresh_applications()?;
            let store = &tracker.store;
            let company = find_company(store, &name)?;
            println!("Company #{}", company.id);
            println!("Name: {}", company.name);
            if let Some(website) = &company.website {
                println!("Website: {website}");
            }
            if let Some(industry) = &company.industry {
                println!("Industry: {industry}");
            }
            if let Some(location) = &company.location {
                println!("Location: {location}");
            }
            if let Some(size) = &company.size {
                println!("Size: {size}");
            }
            if let Some(description) = &company.description {
                println!("\n{description}");
            }
            let apps: Vec<&Application> = store
                .applications
                .items()
                .iter()
                .filter(|a| a.company_id == company.id)
                .collect();
            if !apps.is_empty() {
                println!("\nApplications ({}):", apps.len());
                for app in apps {
                    println!("  #{} - {} ({})", app.id, app.job_title, app.status.label());
                }
            }
        }

        CompanyCommands::Add {
            name,
            website,
            industry,
            size,
            location,
            description,
        } => {
            let mut form = CompanyForm::new();
            form.name = name;
            set_if(&mut form.website, website);
            set_if(&mut form.industry, industry);
            set_if(&mut form.size, size);
            set_if(&mut form.location, location);
            set_if(&mut form.description, description);

            tracker.submit_company(&form, FormMode::Create)?;
            println!("Added company '{}'", form.name);
        }

        CompanyCommands::Edit {
            id,
            name,
            website,
            industry,
            size,
            location,
            description,
        } => {
            tracker.refresh_companies()?;
            let company = resolve::resolve(tracker.store.companies.items(), Some(id))
                .found()
                .ok_or_else(|| anyhow!("Company #{id} not found"))?
                .clone();

            let mut form = CompanyForm::edit(&company);
            set_if(&mut form.name, name);
            set_if(&mut form.website, website);
            set_if(&mut form.industry, industry);
            set_if(&mut form.size, size);
            set_if(&mut form.location, location);
            set_if(&mut form.description, description);

            tracker.submit_company(&form, FormMode::Edit(id))?;
            println!("Updated company #{id}");
        }

        CompanyCommands::Delete { id } => {
            tracker.delete_company(id)?;
            println!("Deleted company #{id}");
        }
    }
    Ok(())
}

fn run_contact(tracker: &mut Tracker, command: ContactCommands) -> Result<()> {
    match command {
        ContactCommands::List => {
            tracker.refresh_contacts()?;
            tracker.refresh_companies()?;
            let store = &tracker.store;
            let contacts = store.contacts.items();
            if contacts.is_empty() {
                println!("No contacts found.");
                return Ok(());
            }
            println!(
                "{:<6} {:<22} {:<20} {:<24} {:<16}",
                "ID", "NAME", "COMPANY", "EMAIL", "PHONE"
            );
            println!("{}", "-".repeat(90));
            for contact in contacts {
                let company = match contact.company_id {
                    Some(id) => resolve::company_name(store.companies.items(), Some(id)),
                    None => "-".to_string(),
                };
                println!(
                    "{:<6} {:<22} {:<20} {:<24} {:<16}",
                    contact.id,
                    truncate(&contact.name, 20),
                    truncate(&company, 18),
                    truncate(contact.email.as_deref().unwrap_or("-"), 22),
                    truncate(contact.phone.as_deref().unwrap_or("-"), 14)
                );
            }
        }

        ContactCommands::Add {
            name,
            email,
            phone,
            title,
            linkedin,
            company_id,
        } => {
            let mut form = ContactForm::new();
            form.name = name;
            set_if(&mut form.email, email);
            set_if(&mut form.phone, phone);
            set_if(&mut form.title, title);
            set_if(&mut form.linkedin, linkedin);
            set_if(&mut form.company_id, company_id);

            tracker.submit_contact(&form, FormMode::Create)?;
            println!("Added contact '{}'", form.name);
        }

        ContactCommands::Edit {
            id,
            name,
            email,
            phone,
            title,
            linkedin,
            company_id,
        } => {
            tracker.refresh_contacts()?;
            let contact = resolve::resolve(tracker.store.contacts.items(), Some(id))
                .found()
                .ok_or_else(|| anyhow!("Contact #{id} not found"))?
                .clone();

            let mut form = ContactForm::edit(&contact);
            set_if(&mut form.name, name);
            set_if(&mut form.email, email);
            set_if(&mut form.phone, phone);
            set_if(&mut form.title, title);
            set_if(&mut form.linkedin, linkedin);
            set_if(&mut form.company_id, company_id);

            tracker.submit_contact(&form, FormMode::Edit(id))?;
            println!("Updated contact #{id}");
        }

        ContactCommands::Delete { id } => {
            tracker.delete_contact(id)?;
            println!("Deleted contact #{id}");
        }
    }
    Ok(())
}

fn run_interview(tracker: &mut Tracker, command: InterviewCommands) -> Result<()> {
    match command {
        InterviewCommands::List => {
            tracker.refresh_interviews()?;
            tracker.refresh_applications()?;
            tracker.refresh_companies()?;
            let store = &tracker.store;
            let interviews = store.interviews.items();
            if interviews.is_empty() {
                println!("No interviews found.");
                return Ok(());
            }
            println!(
                "{:<6} {:<18} {:<12} {:<26} {:<18} {:<10}",
                "ID", "WHEN", "TYPE", "POSITION", "COMPANY", "RESULT"
            );
            println!("{}", "-".repeat(92));
            for interview in interviews {
                let ctx = resolve::application_context(
                    interview,
                    store.applications.items(),
                    store.companies.items(),
                );
                println!(
                    "{:<6} {:<18} {:<12} {:<26} {:<18} {:<10}",
                    interview.id,
                    interview
                        .scheduled_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M"),
                    truncate(interview.interview_type.as_deref().unwrap_or("-"), 10),
                    truncate(&ctx.job_title, 24),
                    truncate(ctx.company_name.as_deref().unwrap_or("-"), 16),
                    interview
                        .result
                        .map(|r| r.as_str())
                        .unwrap_or("pending")
                );
            }
        }

        InterviewCommands::Add {
            application_id,
            scheduled,
            interview_type,
            location,
            interviewer,
            interviewer_email,
            notes,
            feedback,
            result,
        } => {
            let mut form = InterviewForm::new();
            form.application_id = application_id;
            form.scheduled_at = scheduled;
            set_if(&mut form.interview_type, interview_type);
            set_if(&mut form.location, location);
            set_if(&mut form.interviewer_name, interviewer);
            set_if(&mut form.interviewer_email, interviewer_email);
            set_if(&mut form.notes, notes);
            set_if(&mut form.feedback, feedback);
            set_if(&mut form.result, result);

            tracker.submit_interview(&form, FormMode::Create)?;
            println!("Added interview for application #{}", form.application_id);
        }

        InterviewCommands::Edit {
            id,
            application_id,
            scheduled,
            interview_type,
            location,
            interviewer,
            interviewer_email,
            notes,
            feedback,
            result,
        } => {
            tracker.refresh_interviews()?;
            let interview = resolve::resolve(tracker.store.interviews.items(), Some(id))
                .found()
                .ok_or_else(|| anyhow!("Interview #{id} not found"))?
                .clone();

            let mut form = InterviewForm::edit(&interview);
            set_if(&mut form.application_id, application_id);
            set_if(&mut form.scheduled_at, scheduled);
            set_if(&mut form.interview_type, interview_type);
            set_if(&mut form.location, location);
            set_if(&mut form.interviewer_name, interviewer);
            set_if(&mut form.interviewer_email, interviewer_email);
            set_if(&mut form.notes, notes);
            set_if(&mut form.feedback, feedback);
            set_if(&mut form.result, result);

            tracker.submit_interview(&form, FormMode::Edit(id))?;
            println!("Updated interview #{id}");
        }

        InterviewCommands::Delete { id } => {
            tracker.delete_interview(id)?;
            println!("Deleted interview #{id}");
        }
    }
    Ok(())
}

// --- helpers ---

/// Overlay a provided CLI flag onto a form field; absent flags leave the
/// field as the form reconciler mapped it.
fn set_if(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn find_application(store: &EntityStore, id: i64) -> Result<&Application> {
    resolve::resolve(store.applications.items(), Some(id))
        .found()
        .ok_or_else(|| anyhow!("Application #{id} not found"))
}

fn find_company<'a>(store: &'a EntityStore, name_or_id: &str) -> Result<&'a Company> {
    if let Ok(id) = name_or_id.parse::<i64>() {
        return resolve::resolve(store.companies.items(), Some(id))
            .found()
            .ok_or_else(|| anyhow!("Company #{id} not found"));
    }
    store
        .companies
        .items()
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name_or_id))
        .ok_or_else(|| anyhow!("Company '{name_or_id}' not found"))
}

fn format_salary(app: &Application) -> String {
    match (app.salary_min, app.salary_max) {
        (Some(min), Some(max)) => {
            format!("{} {}-{}", app.salary_currency, min as i64, max as i64)
        }
        (Some(min), None) => format!("{} {}+", app.salary_currency, min as i64),
        (None, Some(max)) => format!("{} <{}", app.salary_currency, max as i64),
        (None, None) => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
