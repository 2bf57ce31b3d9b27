use dioxus::prelude::*;
use dumpwatch_shared::models::FilterMode;
use dumpwatch_shared::store::IncidentStore;

/// Count per filter mode, in button order.
pub fn filter_counts(store: &IncidentStore) -> Vec<(FilterMode, usize)> {
    FilterMode::ALL_MODES
        .iter()
        .map(|&mode| (mode, store.count(mode)))
        .collect()
}

#[component]
pub fn FilterBar(
    active: FilterMode,
    counts: Vec<(FilterMode, usize)>,
    on_change: EventHandler<FilterMode>,
) -> Element {
    rsx! {
        div { class: "filter-bar", "aria-label": "Filter incidents",
            for (mode, count) in counts {
                button {
                    class: if mode == active { "active" } else { "" },
                    onclick: move |_| on_change.call(mode),
                    "{mode.label()} ({count})"
                }
            }
        }
    }
}
