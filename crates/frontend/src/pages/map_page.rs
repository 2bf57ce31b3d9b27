use dioxus::prelude::*;
use dumpwatch_shared::session::MapSession;
use dumpwatch_shared::store::{IncidentSource, IncidentStore, RefreshOutcome, RefreshTrigger};
use gloo_timers::future::TimeoutFuture;

use crate::api::HttpIncidentSource;
use crate::components::filter_bar::{filter_counts, FilterBar};
use crate::components::incident_card::IncidentCard;
use crate::components::map_view::MapView;
use crate::coords;
use crate::Route;

/// How often the pins are refreshed while the map is open.
const POLL_INTERVAL_MS: u32 = 15_000;

#[component]
pub fn MapPage() -> Element {
    let mut store = use_signal(IncidentStore::new);
    let mut trigger = use_signal(RefreshTrigger::default);
    let mut session = use_signal(MapSession::new);
    let nav = use_navigator();

    // Reruns only when the trigger fires. It writes the store but never reads it.
    let _refresh = use_resource(move || {
        let generation = trigger.read().generation();
        async move {
            let ticket = store.write().begin_refresh();
            let result = match HttpIncidentSource::from_window() {
                Ok(source) => source.list_incidents().await,
                Err(e) => Err(e),
            };
            match store.write().complete_refresh(ticket, result) {
                Ok(RefreshOutcome::Applied { count }) => {
                    tracing::debug!(generation, count, "Incident pins refreshed");
                }
                Ok(RefreshOutcome::Superseded) => {}
                Err(e) => {
                    tracing::warn!(generation, error = %e, "Incident refresh failed, keeping cached pins");
                }
            }
        }
    });

    use_future(move || async move {
        loop {
            TimeoutFuture::new(POLL_INTERVAL_MS).await;
            trigger.write().fire();
        }
    });

    let counts = filter_counts(&store.read());
    let stale = store.read().last_error().map(|e| e.to_string());
    let filter = session.read().filter;
    let pending = session.read().pending_click;
    let selected = {
        let store = store.read();
        let current = session.read();
        current
            .selection
            .current(store.incidents())
            .map(|incident| incident.id.clone())
    };

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Dumpwatch" }
                FilterBar {
                    active: filter,
                    counts: counts,
                    on_change: move |mode| session.write().set_filter(mode),
                }
            }

            if let Some(err) = stale {
                div { class: "stale-banner", "Showing cached incidents ({err})" }
            }

            div { class: "main",
                MapView { store: store, session: session }

                div { class: "sidebar",
                    div { class: "panel",
                        h3 { "New report" }
                        if let Some(point) = pending {
                            p { "Marked at {coords::format_position(point)}" }
                        } else {
                            p { class: "muted", "Click the map to mark a spot." }
                        }
                        button {
                            onclick: move |_| {
                                let position = session.read().report_position();
                                nav.push(Route::ReportPage { x: position.x, y: position.y });
                            },
                            "Report incident here"
                        }
                        button {
                            class: "secondary",
                            onclick: move |_| session.write().reset(),
                            "Reset view"
                        }
                    }

                    if let Some(id) = selected {
                        IncidentCard {
                            key: "{id}",
                            incident_id: id.clone(),
                            on_incident_change: move |_| {
                                trigger.write().fire();
                            },
                            on_close: move |_| session.write().selection.clear(),
                        }
                    }
                }
            }
        }
    }
}
