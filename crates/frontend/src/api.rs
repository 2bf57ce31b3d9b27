use std::time::Duration;

use dumpwatch_shared::error::FetchError;
use dumpwatch_shared::models::{Incident, IncidentStatus, NewIncident, StatusUpdate};
use dumpwatch_shared::store::IncidentSource;
use futures_lite::future::{self, Future};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;

/// Upper bound on any single request to the incident service.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub fn incidents_url(origin: &str) -> String {
    format!("{}/api/incidents", origin.trim_end_matches('/'))
}

pub fn incident_url(origin: &str, id: &str) -> String {
    format!("{}/{}", incidents_url(origin), id)
}

fn window_origin() -> Result<String, FetchError> {
    // Same origin in production; the backend also serves the built frontend
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .ok_or_else(|| FetchError::Transport("no window origin".to_string()))
}

/// Race `request` against a timer. Whichever finishes first wins; the loser
/// is dropped, which aborts the underlying fetch.
async fn with_timeout<T>(
    request: impl Future<Output = Result<T, FetchError>>,
    timeout: Duration,
) -> Result<T, FetchError> {
    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    let expired = async move {
        TimeoutFuture::new(millis).await;
        Err(FetchError::Timeout(timeout))
    };
    future::or(request, expired).await
}

async fn send_json<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<T, FetchError> {
    let resp = req
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    resp.json().await.map_err(|e| FetchError::Decode(e.to_string()))
}

/// The incident service reached over HTTP from the browser.
#[derive(Debug, Clone)]
pub struct HttpIncidentSource {
    origin: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpIncidentSource {
    pub fn new(origin: impl Into<String>) -> Self {
        HttpIncidentSource {
            origin: origin.into(),
            client: reqwest::Client::new(),
            timeout: FETCH_TIMEOUT,
        }
    }

    pub fn from_window() -> Result<Self, FetchError> {
        Ok(Self::new(window_origin()?))
    }

    pub async fn fetch_incident(&self, id: &str) -> Result<Incident, FetchError> {
        let req = self.client.get(incident_url(&self.origin, id));
        with_timeout(send_json(req), self.timeout).await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: IncidentStatus,
    ) -> Result<Incident, FetchError> {
        let req = self
            .client
            .patch(incident_url(&self.origin, id))
            .json(&StatusUpdate { status });
        with_timeout(send_json(req), self.timeout).await
    }

    pub async fn create_incident(&self, input: &NewIncident) -> Result<Incident, FetchError> {
        let req = self.client.post(incidents_url(&self.origin)).json(input);
        with_timeout(send_json(req), self.timeout).await
    }
}

impl IncidentSource for HttpIncidentSource {
    async fn list_incidents(&self) -> Result<Vec<Incident>, FetchError> {
        let req = self.client.get(incidents_url(&self.origin));
        with_timeout(send_json(req), self.timeout).await
    }
}
