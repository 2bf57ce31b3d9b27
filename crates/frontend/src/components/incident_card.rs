use dioxus::prelude::*;
use dumpwatch_shared::models::{Incident, IncidentStatus};

use crate::api::HttpIncidentSource;

/// Status the card's action button moves the incident to.
pub fn next_status(incident: &Incident) -> IncidentStatus {
    match incident.status {
        IncidentStatus::Reported => IncidentStatus::Resolved,
        IncidentStatus::Resolved => IncidentStatus::Reported,
    }
}

fn action_label(incident: &Incident) -> &'static str {
    if incident.is_resolved() {
        "Reopen"
    } else {
        "Mark resolved"
    }
}

/// Detail view for the selected incident.
///
/// Loads its own copy by id and calls `on_incident_change` once after every
/// successful status change, so the owner can refresh the pins.
#[component]
pub fn IncidentCard(
    incident_id: String,
    on_incident_change: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let mut detail = use_resource(move || {
        let id = incident_id.clone();
        async move {
            let source = HttpIncidentSource::from_window()?;
            source.fetch_incident(&id).await
        }
    });

    let body = match &*detail.read() {
        None => rsx! { p { class: "muted", "Loading..." } },
        Some(Err(e)) => rsx! { p { class: "error", "Could not load incident: {e}" } },
        Some(Ok(incident)) => {
            let id = incident.id.clone();
            let target = next_status(incident);
            let reported = incident.reported_at.clone().unwrap_or_else(|| "unknown".to_string());
            rsx! {
                dl {
                    dt { "Status" }
                    dd { class: "status", "{incident.status}" }
                    dt { "Location" }
                    dd { "{incident.coordinates}" }
                    dt { "Reported" }
                    dd { "{reported}" }
                    if let Some(resolved) = &incident.resolved_at {
                        dt { "Resolved" }
                        dd { "{resolved}" }
                    }
                }
                if !incident.description.is_empty() {
                    p { class: "description", "{incident.description}" }
                }
                button {
                    disabled: *busy.read(),
                    onclick: move |_| {
                        let id = id.clone();
                        busy.set(true);
                        spawn(async move {
                            let result = match HttpIncidentSource::from_window() {
                                Ok(source) => source.update_status(&id, target).await,
                                Err(e) => Err(e),
                            };
                            busy.set(false);
                            match result {
                                Ok(updated) => {
                                    tracing::info!(id = %updated.id, status = %updated.status, "Incident updated");
                                    error.set(None);
                                    detail.restart();
                                    on_incident_change.call(());
                                }
                                Err(e) => {
                                    tracing::warn!(id = %id, error = %e, "Incident update failed");
                                    error.set(Some(format!("Update failed: {e}")));
                                }
                            }
                        });
                    },
                    "{action_label(incident)}"
                }
            }
        }
    };

    rsx! {
        div { class: "panel incident-card",
            div { class: "card-header",
                h3 { "Incident" }
                button {
                    class: "secondary",
                    "aria-label": "Close",
                    onclick: move |_| on_close.call(()),
                    "x"
                }
            }
            {body}
            if let Some(message) = &*error.read() {
                p { class: "error", "{message}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(status: IncidentStatus) -> Incident {
        Incident {
            id: "7".to_string(),
            coordinates: "(5, 5)".to_string(),
            status,
            description: "Paint tins".to_string(),
            reported_at: None,
            resolved_at: None,
        }
    }

    #[test]
    fn test_next_status_flips() {
        assert_eq!(
            next_status(&incident(IncidentStatus::Reported)),
            IncidentStatus::Resolved
        );
        assert_eq!(
            next_status(&incident(IncidentStatus::Resolved)),
            IncidentStatus::Reported
        );
    }

    #[test]
    fn test_action_label() {
        assert_eq!(action_label(&incident(IncidentStatus::Reported)), "Mark resolved");
        assert_eq!(action_label(&incident(IncidentStatus::Resolved)), "Reopen");
    }
}
