use anyhow::Result;

use crate::api::ApiClient;
use crate::form::{ApplicationForm, CompanyForm, ContactForm, FormMode, InterviewForm};
use crate::store::EntityStore;

/// Client core: the API transport plus the entity store it feeds.
///
/// Every refresher follows the same shape: take a fetch ticket, fetch,
/// commit. A failed fetch never reaches the commit, so the previous
/// snapshot stays in place. Writes go payload-first: the form is
/// validated, sent, and only on success are the affected collections
/// re-fetched — the caller's form state is never consumed, so a failed
/// submission loses nothing.
pub struct Tracker {
    api: ApiClient,
    pub store: EntityStore,
}

impl Tracker {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            store: EntityStore::new(),
        }
    }

    // --- refresh ---

    pub fn refresh_companies(&mut self) -> Result<()> {
        let ticket = self.store.begin_fetch();
        let items = self.api.list_companies()?;
        self.store.companies.commit(ticket, items);
        Ok(())
    }

    pub fn refresh_contacts(&mut self) -> Result<()> {
        let ticket = self.store.begin_fetch();
        let items = self.api.list_contacts()?;
        self.store.contacts.commit(ticket, items);
        Ok(())
    }

    pub fn refresh_applications(&mut self) -> Result<()> {
        let ticket = self.store.begin_fetch();
        let items = self.api.list_applications()?;
        self.store.applications.commit(ticket, items);
        Ok(())
    }

    pub fn refresh_interviews(&mut self) -> Result<()> {
        let ticket = self.store.begin_fetch();
        let items = self.api.list_interviews()?;
        self.store.interviews.commit(ticket, items);
        Ok(())
    }

    pub fn refresh_all(&mut self) -> Result<()> {
        self.refresh_companies()?;
        self.refresh_contacts()?;
        self.refresh_applications()?;
        self.refresh_interviews()
    }

    // --- writes; success triggers a re-fetch rather than an in-place merge ---

    pub fn submit_company(&mut self, form: &CompanyForm, mode: FormMode) -> Result<()> {
        let payload = form.payload()?;
        match mode {
            FormMode::Create => self.api.create_company(&payload)?,
            FormMode::Edit(id) => self.api.update_company(id, &payload)?,
        }
        self.refresh_companies()
    }

    pub fn delete_company(&mut self, id: i64) -> Result<()> {
        self.api.delete_company(id)?;
        self.refresh_companies()
    }

    pub fn submit_contact(&mut self, form: &ContactForm, mode: FormMode) -> Result<()> {
        let payload = form.payload()?;
        match mode {
            FormMode::Create => self.api.create_contact(&payload)?,
            FormMode::Edit(id) => self.api.update_contact(id, &payload)?,
        }
        self.refresh_contacts()
    }

    pub fn delete_contact(&mut self, id: i64) -> Result<()> {
        self.api.delete_contact(id)?;
        self.refresh_contacts()
    }

    pub fn submit_application(&mut self, form: &ApplicationForm, mode: FormMode) -> Result<()> {
        let payload = form.payload()?;
        match mode {
            FormMode::Create => self.api.create_application(&payload)?,
            FormMode::Edit(id) => self.api.update_application(id, &payload)?,
        }
        self.refresh_applications()
    }

    pub fn delete_application(&mut self, id: i64) -> Result<()> {
        self.api.delete_application(id)?;
        self.refresh_applications()
    }

    pub fn submit_interview(&mut self, form: &InterviewForm, mode: FormMode) -> Result<()> {
        let payload = form.payload()?;
        match mode {
            FormMode::Create => self.api.create_interview(&payload)?,
            FormMode::Edit(id) => self.api.update_interview(id, &payload)?,
        }
        self.refresh_interviews()
    }

    pub fn delete_interview(&mut self, id: i64) -> Result<()> {
        self.api.delete_interview(id)?;
        self.refresh_interviews()
    }
}
