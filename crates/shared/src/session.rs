use crate::models::{FilterMode, NaturalPoint, PendingClick};
use crate::selection::SelectionState;

/// State that lives exactly as long as the map view is mounted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapSession {
    pub filter: FilterMode,
    pub pending_click: Option<PendingClick>,
    pub selection: SelectionState,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A click on the bare map replaces the pending click and closes any
    /// open detail card.
    pub fn click_at(&mut self, point: NaturalPoint) {
        self.pending_click = Some(point);
        self.selection.clear();
    }

    /// Clicking a pin opens its card; clicking the open pin again closes it.
    pub fn toggle_pin(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    /// Filtering never refetches; only the rendered subset changes.
    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
    }

    /// Position handed to the report flow. Falls back to the image origin
    /// when nothing has been clicked yet.
    pub fn report_position(&self) -> PendingClick {
        self.pending_click.unwrap_or_default()
    }

    /// Teardown on leaving the view.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
