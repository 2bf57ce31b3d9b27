use std::collections::HashMap;
use std::fmt::Write;

use dumpwatch_shared::coords::REFERENCE_SIZE;
use dumpwatch_shared::error::FetchError;
use dumpwatch_shared::models::{FilterMode, Incident, IncidentStatus};
use dumpwatch_shared::overlay::{self, PinPlacement, SkipLog};
use dumpwatch_shared::store::IncidentStore;

fn summary(store: &IncidentStore, filter: FilterMode) -> String {
    format!(
        "{} incidents ({} reported, {} resolved), showing {}",
        store.len(),
        store.count_status(IncidentStatus::Reported),
        store.count_status(IncidentStatus::Resolved),
        filter.label().to_lowercase(),
    )
}

fn incident_line(incident: &Incident, placement: Option<&PinPlacement>) -> String {
    let position = match placement {
        Some(p) => format!("{:>5.1}% {:>5.1}%", p.left_percent, p.top_percent),
        None => format!("{:>13}", "unplaceable"),
    };
    format!(
        "{:<36}  {:<8}  {:<20}  {}  {}",
        incident.id, incident.status, incident.coordinates, position, incident.description
    )
}

/// Render the filtered incidents as a table, with each pin's position on the
/// map as a percentage of the image.
pub fn format_listing(
    store: &IncidentStore,
    filter: FilterMode,
    skip_log: &mut SkipLog,
) -> String {
    let placements: HashMap<&str, PinPlacement> =
        match overlay::project_pins(store.filtered(filter), None, REFERENCE_SIZE) {
            Ok(frame) => {
                skip_log.record(&frame.skipped);
                frame
                    .pins
                    .into_iter()
                    .filter_map(|pin| Some((pin.incident_id?, pin.placement)))
                    .collect()
            }
            Err(_) => HashMap::new(),
        };

    let mut out = String::new();
    let _ = writeln!(out, "{}", summary(store, filter));
    for incident in store.filtered(filter) {
        let _ = writeln!(
            out,
            "{}",
            incident_line(incident, placements.get(incident.id.as_str()))
        );
    }
    if let Some(e) = store.last_error() {
        let _ = writeln!(out, "(stale: {e})");
    }
    out
}

/// What a watch loop last printed. The listing is reprinted when either the
/// incidents or the stale marker change.
#[derive(Debug, Default)]
pub struct ShownListing {
    last: Option<(Vec<Incident>, Option<FetchError>)>,
}

impl ShownListing {
    /// Remember the store's current state. Returns true if it differs from
    /// what was shown before.
    pub fn update(&mut self, store: &IncidentStore) -> bool {
        let current = (store.incidents().to_vec(), store.last_error().cloned());
        if self.last.as_ref() == Some(&current) {
            return false;
        }
        self.last = Some(current);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: &str, coordinates: &str, status: IncidentStatus) -> Incident {
        Incident {
            id: id.to_string(),
            coordinates: coordinates.to_string(),
            status,
            description: format!("pile {id}"),
            reported_at: None,
            resolved_at: None,
        }
    }

    fn store_with(incidents: Vec<Incident>) -> IncidentStore {
        let mut store = IncidentStore::new();
        let ticket = store.begin_refresh();
        store.complete_refresh(ticket, Ok(incidents)).unwrap();
        store
    }

    #[test]
    fn test_listing_shows_percent_positions() {
        let store = store_with(vec![incident("a", "(600, 449.5)", IncidentStatus::Reported)]);
        let out = format_listing(&store, FilterMode::All, &mut SkipLog::new());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "1 incidents (1 reported, 0 resolved), showing all");
        assert!(lines[1].starts_with("a "));
        assert!(lines[1].contains(" 50.0%  50.0%"));
        assert!(lines[1].ends_with("pile a"));
    }

    #[test]
    fn test_listing_respects_filter() {
        let store = store_with(vec![
            incident("a", "(1, 1)", IncidentStatus::Reported),
            incident("b", "(2, 2)", IncidentStatus::Resolved),
            incident("c", "(3, 3)", IncidentStatus::Reported),
        ]);
        let out = format_listing(&store, FilterMode::Resolved, &mut SkipLog::new());
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().nth(1).unwrap().starts_with("b "));
    }

    #[test]
    fn test_listing_marks_unplaceable_incidents() {
        let store = store_with(vec![incident("bad", "\"(abc, 1)\"", IncidentStatus::Reported)]);
        let out = format_listing(&store, FilterMode::All, &mut SkipLog::new());
        assert!(out.contains("unplaceable"));
    }

    #[test]
    fn test_listing_flags_stale_data() {
        let mut store = store_with(vec![incident("a", "(1, 1)", IncidentStatus::Reported)]);
        let ticket = store.begin_refresh();
        let _ = store.complete_refresh(
            ticket,
            Err(FetchError::Status(503)),
        );
        let out = format_listing(&store, FilterMode::All, &mut SkipLog::new());
        assert!(out.contains("a "));
        assert!(out.ends_with("(stale: server responded with status 503)\n"));
    }

    #[test]
    fn test_watch_reprints_when_staleness_changes() {
        let mut store = store_with(vec![incident("a", "(1, 1)", IncidentStatus::Reported)]);
        let mut shown = ShownListing::default();
        assert!(shown.update(&store));
        assert!(!shown.update(&store));

        // Same incidents, but the refresh failed
        let ticket = store.begin_refresh();
        let _ = store.complete_refresh(ticket, Err(FetchError::Status(503)));
        assert!(shown.update(&store));
        assert!(!shown.update(&store));

        // A different failure changes the stale line
        let ticket = store.begin_refresh();
        let timeout = FetchError::Timeout(std::time::Duration::from_secs(10));
        let _ = store.complete_refresh(ticket, Err(timeout));
        assert!(shown.update(&store));

        // Recovery with the same data clears it
        let ticket = store.begin_refresh();
        store
            .complete_refresh(ticket, Ok(vec![incident("a", "(1, 1)", IncidentStatus::Reported)]))
            .unwrap();
        assert!(store.last_error().is_none());
        assert!(shown.update(&store));
    }

    #[test]
    fn test_watch_reprints_when_incidents_change() {
        let mut store = store_with(vec![incident("a", "(1, 1)", IncidentStatus::Reported)]);
        let mut shown = ShownListing::default();
        assert!(shown.update(&store));

        let ticket = store.begin_refresh();
        store
            .complete_refresh(ticket, Ok(vec![incident("a", "(1, 1)", IncidentStatus::Resolved)]))
            .unwrap();
        assert!(shown.update(&store));
    }
}
