use crate::error::FetchError;
use crate::models::{FilterMode, Incident, IncidentStatus};

/// Where incidents come from. Implemented over HTTP by the clients and by
/// in-memory fakes in tests.
#[allow(async_fn_in_trait)]
pub trait IncidentSource {
    async fn list_incidents(&self) -> Result<Vec<Incident>, FetchError>;
}

/// Identifies one in-flight refresh. Tickets are issued in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    /// A newer request already landed; this response was dropped.
    Superseded,
}

/// Monotonic counter that requests a refresh each time it is fired.
///
/// Kept apart from [`IncidentStore`] so a refresh effect can depend on the
/// counter alone and never on the incident data it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshTrigger(u64);

impl RefreshTrigger {
    pub fn fire(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Client-side cache of the remote incident set.
#[derive(Debug, Clone, Default)]
pub struct IncidentStore {
    incidents: Vec<Incident>,
    next_request: u64,
    applied_request: Option<u64>,
    last_error: Option<FetchError>,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Error from the most recent completed refresh, cleared on success.
    /// While set, the cached set is stale.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Incidents visible under `mode`, in fetch order. Recomputed on every
    /// call; clone the iterator to walk it again.
    pub fn filtered(&self, mode: FilterMode) -> impl Iterator<Item = &Incident> + Clone + '_ {
        self.incidents.iter().filter(move |i| mode.matches(i))
    }

    pub fn count(&self, mode: FilterMode) -> usize {
        self.filtered(mode).count()
    }

    pub fn count_status(&self, status: IncidentStatus) -> usize {
        self.incidents.iter().filter(|i| i.status == status).count()
    }

    /// Start a refresh. Pair with [`complete_refresh`](Self::complete_refresh)
    /// once the source has answered.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next_request += 1;
        RefreshTicket(self.next_request)
    }

    /// Apply the result of a refresh started with `ticket`.
    ///
    /// On success the cached set is replaced wholesale, unless a later ticket
    /// has already been applied. On failure the cached set is kept and the
    /// error is handed back for the caller to log.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Incident>, FetchError>,
    ) -> Result<RefreshOutcome, FetchError> {
        let incidents = match result {
            Ok(incidents) => incidents,
            Err(e) => {
                if self.applied_request.map_or(true, |applied| ticket.0 > applied) {
                    self.last_error = Some(e.clone());
                }
                return Err(e);
            }
        };

        if self.applied_request.is_some_and(|applied| ticket.0 < applied) {
            tracing::debug!(
                ticket = ticket.0,
                applied = ?self.applied_request,
                "Dropping superseded incident list"
            );
            return Ok(RefreshOutcome::Superseded);
        }

        let count = incidents.len();
        self.incidents = incidents;
        self.applied_request = Some(ticket.0);
        self.last_error = None;
        tracing::debug!(count, ticket = ticket.0, "Incident list refreshed");
        Ok(RefreshOutcome::Applied { count })
    }

    /// Fetch from `source` and replace the cached set.
    pub async fn refresh<S: IncidentSource>(
        &mut self,
        source: &S,
    ) -> Result<&[Incident], FetchError> {
        let ticket = self.begin_refresh();
        let result = source.list_incidents().await;
        self.complete_refresh(ticket, result)?;
        Ok(&self.incidents)
    }
}
