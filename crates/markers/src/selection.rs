use foundation::ids::BuildingId;

/// Single-selection state machine over marker ids.
///
/// Transition contract:
/// - `click(id)` selects `id`, atomically replacing any previous selection.
/// - `click(id)` on the already-selected id toggles back to unselected.
/// - `clear()` forces unselected from any state.
///
/// There is never an intermediate state with two selected ids.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    selected: Option<BuildingId>,
}

/// Observable outcome of a selection transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// `id` became the selection.
    Selected(BuildingId),
    /// The selection was cleared (toggle-off or explicit deselect).
    Cleared,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&BuildingId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &BuildingId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Applies one marker click.
    pub fn click(&mut self, id: BuildingId) -> SelectionChange {
        if self.is_selected(&id) {
            self.selected = None;
            return SelectionChange::Cleared;
        }
        self.selected = Some(id.clone());
        SelectionChange::Selected(id)
    }

    /// Forces the unselected state. Returns `true` if something was selected.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use foundation::ids::BuildingId;

    use super::{Selection, SelectionChange};

    fn id(s: &str) -> BuildingId {
        BuildingId::new(s)
    }

    #[test]
    fn clicking_selects_and_reclicking_toggles_off() {
        let mut s = Selection::new();
        assert_eq!(s.click(id("1")), SelectionChange::Selected(id("1")));
        assert!(s.is_selected(&id("1")));

        assert_eq!(s.click(id("1")), SelectionChange::Cleared);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn clicking_another_marker_replaces_the_selection() {
        let mut s = Selection::new();
        s.click(id("1"));
        assert_eq!(s.click(id("2")), SelectionChange::Selected(id("2")));
        assert!(s.is_selected(&id("2")));
        assert!(!s.is_selected(&id("1")));
    }

    #[test]
    fn clear_reports_whether_anything_was_selected() {
        let mut s = Selection::new();
        assert!(!s.clear());
        s.click(id("1"));
        assert!(s.clear());
        assert_eq!(s.selected(), None);
    }
}
