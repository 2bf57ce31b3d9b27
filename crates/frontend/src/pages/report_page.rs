use dioxus::prelude::*;
use dumpwatch_shared::coords::format_packed_coordinates;
use dumpwatch_shared::models::{NaturalPoint, NewIncident};

use crate::api::HttpIncidentSource;
use crate::Route;

/// Build the create request, or `None` while the description is blank.
pub fn build_report(description: &str, position: NaturalPoint) -> Option<NewIncident> {
    let description = description.trim();
    if description.is_empty() {
        return None;
    }
    Some(NewIncident {
        description: description.to_string(),
        coordinates: format_packed_coordinates(position),
    })
}

#[component]
pub fn ReportPage(x: f64, y: f64) -> Element {
    let mut description = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);
    let nav = use_navigator();

    let position = NaturalPoint { x, y };
    let packed = format_packed_coordinates(position);
    let ready = build_report(&description.read(), position).is_some();

    rsx! {
        div { class: "app report",
            div { class: "header",
                h1 { "Report an incident" }
            }
            div { class: "panel",
                p { "Location on map: {packed}" }
                textarea {
                    placeholder: "What was dumped here?",
                    value: "{description}",
                    oninput: move |evt: Event<FormData>| description.set(evt.value()),
                }
                if let Some(message) = &*error.read() {
                    p { class: "error", "{message}" }
                }
                div { class: "actions",
                    button {
                        disabled: *submitting.read() || !ready,
                        onclick: move |_| {
                            let Some(input) = build_report(&description.read(), position) else {
                                return;
                            };
                            submitting.set(true);
                            spawn(async move {
                                let result = match HttpIncidentSource::from_window() {
                                    Ok(source) => source.create_incident(&input).await,
                                    Err(e) => Err(e),
                                };
                                submitting.set(false);
                                match result {
                                    Ok(incident) => {
                                        tracing::info!(id = %incident.id, coordinates = %incident.coordinates, "Incident reported");
                                        nav.push(Route::MapPage {});
                                    }
                                    Err(e) => {
                                        tracing::warn!(error = %e, "Report submission failed");
                                        error.set(Some(format!("Could not submit report: {e}")));
                                    }
                                }
                            });
                        },
                        "Submit report"
                    }
                    Link { class: "secondary", to: Route::MapPage {}, "Cancel" }
                }
            }
        }
    }
}
