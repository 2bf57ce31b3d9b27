use std::time::Duration;

use dumpwatch_shared::error::FetchError;
use dumpwatch_shared::models::{Incident, IncidentStatus, NewIncident, StatusUpdate};
use serde::de::DeserializeOwned;

/// Blocking client for the incident service.
pub struct Client {
    base: String,
    http: reqwest::blocking::Client,
    timeout: Duration,
}

impl Client {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Client {
            base: base.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    fn incidents_url(&self) -> String {
        format!("{}/api/incidents", self.base)
    }

    fn map_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }

    fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<T, FetchError> {
        let resp = req.send().map_err(|e| self.map_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        resp.json().map_err(|e| self.map_error(e))
    }

    pub fn list_incidents(&self) -> Result<Vec<Incident>, FetchError> {
        tracing::debug!(url = %self.incidents_url(), "Fetching incidents");
        self.send(self.http.get(self.incidents_url()))
    }

    pub fn create_incident(&self, input: &NewIncident) -> Result<Incident, FetchError> {
        self.send(self.http.post(self.incidents_url()).json(input))
    }

    pub fn update_status(&self, id: &str, status: IncidentStatus) -> Result<Incident, FetchError> {
        let url = format!("{}/{}", self.incidents_url(), id);
        self.send(self.http.patch(url).json(&StatusUpdate { status }))
    }
}
