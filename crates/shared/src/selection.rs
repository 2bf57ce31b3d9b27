use crate::models::Incident;

/// The incident whose detail card is open, held by id only.
///
/// The id is resolved against the live incident set on every read, so a
/// refresh that drops the incident simply ends the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any existing selection. Unknown ids are accepted.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Select `id`, or clear if it is already the selection.
    pub fn toggle(&mut self, id: &str) {
        if self.is_selected(id) {
            self.clear();
        } else {
            self.select(id);
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn current<'a>(&self, incidents: &'a [Incident]) -> Option<&'a Incident> {
        let id = self.selected.as_deref()?;
        incidents.iter().find(|i| i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IncidentStatus;

    fn incident(id: &str) -> Incident {
        Incident {
            id: id.to_string(),
            coordinates: "(1, 1)".to_string(),
            status: IncidentStatus::Reported,
            description: String::new(),
            reported_at: None,
            resolved_at: None,
        }
    }

    #[test]
    fn test_select_resolves_against_set() {
        let set = vec![incident("id-1"), incident("id-7")];
        let mut sel = SelectionState::new();
        sel.select("id-7");
        assert_eq!(sel.current(&set).map(|i| i.id.as_str()), Some("id-7"));
    }

    #[test]
    fn test_selection_ends_when_incident_disappears() {
        let before = vec![incident("id-1"), incident("id-7")];
        let mut sel = SelectionState::new();
        sel.select("id-7");
        assert!(sel.current(&before).is_some());

        // Refresh drops id-7
        let after = vec![incident("id-1")];
        assert!(sel.current(&after).is_none());
        // The id is still held; it comes back if the incident does
        assert_eq!(sel.selected_id(), Some("id-7"));
    }

    #[test]
    fn test_select_unknown_id_is_no_selection() {
        let set = vec![incident("id-1")];
        let mut sel = SelectionState::new();
        sel.select("missing");
        assert!(sel.current(&set).is_none());
    }

    #[test]
    fn test_select_replaces_without_clear() {
        let set = vec![incident("a"), incident("b")];
        let mut sel = SelectionState::new();
        sel.select("a");
        sel.select("b");
        assert_eq!(sel.current(&set).map(|i| i.id.as_str()), Some("b"));
    }

    #[test]
    fn test_clear_and_toggle() {
        let set = vec![incident("a")];
        let mut sel = SelectionState::new();
        sel.toggle("a");
        assert!(sel.is_selected("a"));
        sel.toggle("a");
        assert!(sel.current(&set).is_none());
        sel.select("a");
        sel.clear();
        assert_eq!(sel.selected_id(), None);
    }
}
