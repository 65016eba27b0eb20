// Bulk-mode selection state for the current page.

use crate::api::Track;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: bool,
    ids: Vec<String>,
}

impl Selection {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Leaving bulk mode always forgets what was checked.
    pub fn toggle_mode(&mut self) {
        self.active = !self.active;
        self.ids.clear();
    }

    pub fn exit(&mut self) {
        self.active = false;
        self.ids.clear();
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(index) = self.ids.iter().position(|selected| selected == id) {
            self.ids.remove(index);
        } else {
            self.ids.push(id.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// True when every visible track is checked (and there is at least one).
    pub fn all_selected(&self, visible: &[Track]) -> bool {
        !visible.is_empty() && visible.iter().all(|track| self.contains(&track.id))
    }

    /// Switches between nothing and every currently displayed track.
    pub fn toggle_all(&mut self, visible: &[Track]) {
        if self.all_selected(visible) {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|track| track.id.clone()).collect();
        }
    }

    pub fn retain_only(&mut self, ids: &[String]) {
        self.ids.retain(|selected| ids.contains(selected));
    }

    /// Drops checked ids that are no longer displayed. Returns whether anything was dropped.
    pub fn prune_to(&mut self, visible: &[Track]) -> bool {
        let before = self.ids.len();
        self.ids
            .retain(|selected| visible.iter().any(|track| &track.id == selected));
        self.ids.len() != before
    }

    /// Ids of the selected tracks that are on the page, in page order.
    pub fn visible_ids(&self, visible: &[Track]) -> Vec<String> {
        visible
            .iter()
            .filter(|track| self.contains(&track.id))
            .map(|track| track.id.clone())
            .collect()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected tracks that are on the page, in page order.
    pub fn selected_tracks(&self, visible: &[Track]) -> Vec<Track> {
        visible
            .iter()
            .filter(|track| self.contains(&track.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::track;

    fn page() -> Vec<Track> {
        vec![
            track("a", "Song A", "X"),
            track("b", "Song B", "Y"),
            track("c", "Song C", "Z"),
        ]
    }

    #[test]
    fn leaving_select_mode_clears_selection() {
        let mut selection = Selection::default();
        selection.toggle_mode();
        selection.toggle("a");
        selection.toggle("b");
        assert_eq!(selection.len(), 2);

        selection.toggle_mode();
        assert!(!selection.is_active());
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_twice_returns_to_empty() {
        let tracks = page();
        let mut selection = Selection::default();
        selection.toggle_mode();

        selection.toggle_all(&tracks);
        assert!(selection.all_selected(&tracks));
        assert_eq!(selection.ids(), ["a", "b", "c"]);

        selection.toggle_all(&tracks);
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_from_partial_selects_everything() {
        let tracks = page();
        let mut selection = Selection::default();
        selection.toggle("b");
        selection.toggle_all(&tracks);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn toggle_flips_single_ids() {
        let mut selection = Selection::default();
        selection.toggle("a");
        assert!(selection.contains("a"));
        selection.toggle("a");
        assert!(!selection.contains("a"));
    }

    #[test]
    fn empty_page_is_never_all_selected() {
        assert!(!Selection::default().all_selected(&[]));
    }

    #[test]
    fn selected_tracks_follow_page_order() {
        let tracks = page();
        let mut selection = Selection::default();
        selection.toggle("c");
        selection.toggle("a");
        let titles: Vec<String> = selection
            .selected_tracks(&tracks)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Song A", "Song C"]);
    }

    #[test]
    fn changing_page_forgets_checks_from_the_previous_page() {
        let first_page = vec![track("a", "Song A", "X"), track("b", "Song B", "Y")];
        let second_page = vec![track("c", "Song C", "Z"), track("d", "Song D", "W")];
        let mut selection = Selection::default();
        selection.toggle_mode();
        selection.toggle("a");

        assert!(selection.prune_to(&second_page));
        selection.toggle("c");

        let shown: Vec<String> = selection
            .selected_tracks(&second_page)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(selection.ids(), shown.as_slice());
        assert_eq!(selection.visible_ids(&second_page), ["c"]);
        assert_eq!(selection.len(), 1);
        assert!(selection.is_active());
        assert!(!selection.prune_to(&second_page));
        assert!(selection.visible_ids(&first_page).is_empty());
    }

    #[test]
    fn retain_only_narrows_to_failed_ids() {
        let mut selection = Selection::default();
        selection.toggle("a");
        selection.toggle("b");
        selection.retain_only(&["b".to_string()]);
        assert_eq!(selection.ids(), ["b"]);
    }
}
