use dioxus::prelude::*;
use dumpwatch_shared::coords::{MAP_IMAGE_URL, REFERENCE_SIZE};
use dumpwatch_shared::overlay::{self, OverlayFrame, PinKind, SkipLog};
use dumpwatch_shared::selection::SelectionState;
use dumpwatch_shared::session::MapSession;
use dumpwatch_shared::store::IncidentStore;

use crate::coords::{self, MAP_IMAGE_ID};

/// Everything needed to draw one pin, detached from the store borrow.
#[derive(Debug, Clone, PartialEq)]
pub struct PinView {
    pub key: String,
    pub class: String,
    pub style: String,
    pub title: &'static str,
    pub incident_id: Option<String>,
}

fn pin_class(kind: PinKind, selected: bool) -> String {
    let base = match kind {
        PinKind::Reported => "pin pin-reported",
        PinKind::Resolved => "pin pin-resolved",
        PinKind::Pending => "pin pin-pending",
    };
    if selected {
        format!("{base} selected")
    } else {
        base.to_string()
    }
}

pub fn pin_views(frame: &OverlayFrame<'_>, selection: &SelectionState) -> Vec<PinView> {
    frame
        .pins
        .iter()
        .map(|pin| {
            let selected = pin.incident_id.is_some_and(|id| selection.is_selected(id));
            PinView {
                key: pin.incident_id.unwrap_or("pending").to_string(),
                class: pin_class(pin.kind, selected),
                style: pin.placement.style(),
                title: pin.kind.label(),
                incident_id: pin.incident_id.map(str::to_string),
            }
        })
        .collect()
}

#[component]
fn PinMarker(pin: PinView, on_select: EventHandler<String>) -> Element {
    let id = pin.incident_id.clone();
    rsx! {
        div {
            class: "{pin.class}",
            style: "{pin.style}",
            title: "{pin.title}",
            onclick: move |evt: Event<MouseData>| {
                // Keep the click off the map image underneath
                evt.stop_propagation();
                if let Some(id) = &id {
                    on_select.call(id.clone());
                }
            },
        }
    }
}

#[component]
pub fn MapView(store: Signal<IncidentStore>, session: Signal<MapSession>) -> Element {
    let mut session = session;
    let mut skip_log = use_signal(SkipLog::new);

    // Log unreadable records once per view, not on every render
    use_effect(move || {
        let store = store.read();
        let filter = session.read().filter;
        if let Ok(frame) = overlay::project_pins(store.filtered(filter), None, REFERENCE_SIZE) {
            skip_log.write().record(&frame.skipped);
        }
    });

    // One projection pass for saved pins and the click pin
    let (pins, skipped) = {
        let store = store.read();
        let current = session.read();
        match overlay::project_pins(
            store.filtered(current.filter),
            current.pending_click,
            REFERENCE_SIZE,
        ) {
            Ok(frame) => (pin_views(&frame, &current.selection), frame.skipped.len()),
            Err(e) => {
                tracing::debug!(error = %e, "No pins for this render");
                (Vec::new(), 0)
            }
        }
    };

    rsx! {
        div { class: "map-container",
            div { class: "map-frame",
                img {
                    id: MAP_IMAGE_ID,
                    src: MAP_IMAGE_URL,
                    alt: "Reference map",
                    draggable: "false",
                    onclick: move |evt: Event<MouseData>| {
                        let c = evt.client_coordinates();
                        match coords::click_to_natural(c.x, c.y, MAP_IMAGE_ID) {
                            Ok(point) => session.write().click_at(point),
                            Err(e) => tracing::debug!(error = %e, "Ignoring click before the map is laid out"),
                        }
                    },
                }
                for pin in pins {
                    PinMarker {
                        key: "{pin.key}",
                        pin: pin.clone(),
                        on_select: move |id: String| session.write().toggle_pin(&id),
                    }
                }
            }
            if skipped > 0 {
                div { class: "map-note",
                    "{skipped} incident(s) have unreadable coordinates and are not shown"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dumpwatch_shared::models::{Incident, IncidentStatus, NaturalPoint};

    fn incident(id: &str, coordinates: &str, status: IncidentStatus) -> Incident {
        Incident {
            id: id.to_string(),
            coordinates: coordinates.to_string(),
            status,
            description: String::new(),
            reported_at: None,
            resolved_at: None,
        }
    }

    #[test]
    fn test_pin_views_mark_selection() {
        let incidents = vec![
            incident("a", "(600, 449.5)", IncidentStatus::Reported),
            incident("b", "(0, 0)", IncidentStatus::Resolved),
        ];
        let frame = overlay::project_pins(&incidents, None, REFERENCE_SIZE).unwrap();
        let mut selection = SelectionState::new();
        selection.select("b");

        let views = pin_views(&frame, &selection);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].class, "pin pin-reported");
        assert_eq!(views[0].style, "left: 50%; top: 50%; transform: translate(-50%, -50%);");
        assert_eq!(views[1].class, "pin pin-resolved selected");
        assert_eq!(views[1].incident_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_pending_pin_has_no_incident() {
        let incidents: Vec<Incident> = Vec::new();
        let frame = overlay::project_pins(
            &incidents,
            Some(NaturalPoint { x: 1200.0, y: 899.0 }),
            REFERENCE_SIZE,
        )
        .unwrap();

        let views = pin_views(&frame, &SelectionState::new());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].key, "pending");
        assert_eq!(views[0].title, "Click Pin");
        assert!(views[0].incident_id.is_none());
        assert!(views[0].style.starts_with("left: 100%; top: 100%;"));
    }

    #[test]
    fn test_malformed_incident_gets_no_pin() {
        let incidents = vec![
            incident("good", "(10, 10)", IncidentStatus::Reported),
            incident("bad", "\"(abc, 1)\"", IncidentStatus::Reported),
        ];
        let frame = overlay::project_pins(&incidents, None, REFERENCE_SIZE).unwrap();
        let views = pin_views(&frame, &SelectionState::new());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].key, "good");
        assert_eq!(frame.skipped.len(), 1);
        assert_eq!(frame.skipped[0].incident_id, "bad");
    }
}
