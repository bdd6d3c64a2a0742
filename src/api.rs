use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::form::{ApplicationPayload, CompanyPayload, ContactPayload, InterviewPayload};
use crate::models::{Application, Company, Contact, Interview};

const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ApiConfig {
    /// Base URL from JOBTRACK_API_URL, token from JOBTRACK_TOKEN or the
    /// token file under the XDG data directory.
    pub fn load() -> Result<Self> {
        let base_url =
            env::var("JOBTRACK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token = match env::var("JOBTRACK_TOKEN") {
            Ok(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
            _ => Self::token_from_file()?,
        };
        Ok(Self { base_url, token })
    }

    pub fn token_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "jobtrack")
            .map(|dirs| dirs.data_dir().join("token.txt"))
    }

    fn token_from_file() -> Result<Option<String>> {
        let Some(path) = Self::token_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let token = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read token file: {}", path.display()))?;
        Ok(Some(token.trim().to_string()))
    }
}

/// Blocking HTTP client for the tracker API. Collections come back as
/// plain JSON arrays with integer ids and bare foreign keys; write
/// responses are only checked for success, since the caller re-fetches
/// the affected collections afterwards.
pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn check(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().unwrap_or_default();
            Err(anyhow!("API request failed ({status}): {body}"))
        }
    }

    fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let resp = self
            .authed(self.client.get(self.url(path)))
            .send()
            .with_context(|| format!("Failed to reach API at {}", self.base_url))?;
        Self::check(resp)?
            .json()
            .with_context(|| format!("Failed to decode response from {path}"))
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self
            .authed(self.client.post(self.url(path)).json(body))
            .send()
            .with_context(|| format!("Failed to reach API at {}", self.base_url))?;
        Self::check(resp)?;
        Ok(())
    }

    fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self
            .authed(self.client.put(self.url(path)).json(body))
            .send()
            .with_context(|| format!("Failed to reach API at {}", self.base_url))?;
        Self::check(resp)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let resp = self
            .authed(self.client.delete(self.url(path)))
            .send()
            .with_context(|| format!("Failed to reach API at {}", self.base_url))?;
        Self::check(resp)?;
        Ok(())
    }

    // --- Companies ---

    pub fn list_companies(&self) -> Result<Vec<Company>> {
        self.get_list("/api/companies/")
    }

    pub fn create_company(&self, payload: &CompanyPayload) -> Result<()> {
        self.post("/api/companies/", payload)
    }

    pub fn update_company(&self, id: i64, payload: &CompanyPayload) -> Result<()> {
        self.put(&format!("/api/companies/{id}"), payload)
    }

    pub fn delete_company(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/companies/{id}"))
    }

    // --- Contacts ---

    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.get_list("/api/contacts/")
    }

    pub fn create_contact(&self, payload: &ContactPayload) -> Result<()> {
        self.post("/api/contacts/", payload)
    }

    pub fn update_contact(&self, id: i64, payload: &ContactPayload) -> Result<()> {
        self.put(&format!("/api/contacts/{id}"), payload)
    }

    pub fn delete_contact(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/contacts/{id}"))
    }

    // --- Applications ---

    pub fn list_applications(&self) -> Result<Vec<Application>> {
        self.get_list("/api/applications/")
    }

    pub fn create_application(&self, payload: &ApplicationPayload) -> Result<()> {
        self.post("/api/applications/", payload)
    }

    pub fn update_application(&self, id: i64, payload: &ApplicationPayload) -> Result<()> {
        self.put(&format!("/api/applications/{id}"), payload)
    }

    pub fn delete_application(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/applications/{id}"))
    }

    // --- Interviews ---

    pub fn list_interviews(&self) -> Result<Vec<Interview>> {
        self.get_list("/api/interviews/")
    }

    pub fn create_interview(&self, payload: &InterviewPayload) -> Result<()> {
        self.post("/api/interviews/", payload)
    }

    pub fn update_interview(&self, id: i64, payload: &InterviewPayload) -> Result<()> {
        self.put(&format!("/api/interviews/{id}"), payload)
    }

    pub fn delete_interview(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/interviews/{id}"))
    }
}
