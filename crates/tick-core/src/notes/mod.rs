//! In-memory note list synchronized with the remote todo API.
//!
//! The controller is the only writer of the collection. Toggles and title
//! edits stay local; creates and deletes are applied locally only after the
//! remote side confirmed them.

use crate::models::{normalize_title, Note, NoteId, StatusFilter, ViewState};
use crate::todos::{RemoteTodoGateway, TodoBackend};

pub struct NoteListController<B: TodoBackend> {
    gateway: RemoteTodoGateway<B>,
    notes: Vec<Note>,
    editing: Option<usize>,
    view: ViewState,
}

impl<B: TodoBackend> NoteListController<B> {
    pub const fn new(backend: B) -> Self {
        Self {
            gateway: RemoteTodoGateway::new(backend),
            notes: Vec::new(),
            editing: None,
            view: ViewState {
                filter: StatusFilter::All,
                search_text: String::new(),
            },
        }
    }

    pub const fn gateway(&self) -> &RemoteTodoGateway<B> {
        &self.gateway
    }

    /// Replace the whole collection with the remote list.
    pub async fn hydrate(&mut self, token: Option<&str>) -> usize {
        self.notes = self.gateway.list(token).await;
        self.editing = None;
        tracing::debug!("Hydrated note list with {} notes", self.notes.len());
        self.notes.len()
    }

    /// Flip `done` for the note at `index` in the full collection.
    pub fn toggle_done(&mut self, index: usize) -> bool {
        let Some(note) = self.notes.get_mut(index) else {
            return false;
        };
        note.done = !note.done;
        true
    }

    /// Next [`Self::create_or_update`] creates a new note.
    pub fn start_create(&mut self) {
        self.editing = None;
    }

    /// Next [`Self::create_or_update`] retitles the note at `index`.
    pub fn start_edit(&mut self, index: usize) -> bool {
        if index >= self.notes.len() {
            return false;
        }
        self.editing = Some(index);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub const fn editing_index(&self) -> Option<usize> {
        self.editing
    }

    /// Initial text for the add/edit prompt.
    pub fn editing_title(&self) -> &str {
        self.editing
            .and_then(|index| self.notes.get(index))
            .map_or("", |note| note.title.as_str())
    }

    /// Retitle the edit target locally, or create a note remotely.
    ///
    /// Blank titles are ignored. Returns whether the collection changed.
    pub async fn create_or_update(&mut self, token: Option<&str>, title: &str) -> bool {
        let Some(title) = normalize_title(title) else {
            return false;
        };

        if let Some(index) = self.editing.take() {
            return match self.notes.get_mut(index) {
                Some(note) => {
                    note.title = title;
                    true
                }
                None => false,
            };
        }

        match self.gateway.create(token, &title).await {
            Some(note) => {
                self.notes.push(note);
                true
            }
            None => false,
        }
    }

    /// Remove a note once the remote delete succeeded.
    pub async fn delete(&mut self, token: Option<&str>, id: &NoteId) -> bool {
        if !self.gateway.remove(token, id).await {
            return false;
        }
        let edited_id = self
            .editing
            .and_then(|index| self.notes.get(index))
            .map(|note| note.id.clone());
        self.notes.retain(|note| &note.id != id);
        self.editing = edited_id.and_then(|edited| self.position(&edited));
        true
    }

    /// Notes passing `filter` and the case-insensitive `search_text`, in
    /// collection order.
    pub fn derived_view(&self, filter: StatusFilter, search_text: &str) -> Vec<&Note> {
        let view = ViewState {
            filter,
            search_text: search_text.to_string(),
        };
        self.notes.iter().filter(|note| view.matches(note)).collect()
    }

    /// The controller's own view state applied to the collection.
    pub fn visible_notes(&self) -> Vec<&Note> {
        self.derived_view(self.view.filter, &self.view.search_text)
    }

    /// Like [`Self::visible_notes`], paired with each note's index in the
    /// full collection.
    pub fn visible_entries(&self) -> Vec<(usize, &Note)> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| self.view.matches(note))
            .collect()
    }

    /// Changing the filter also resets the search text.
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.view.filter = filter;
        self.view.search_text.clear();
    }

    pub fn set_search(&mut self, text: &str) {
        self.view.search_text = text.trim().to_string();
    }

    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Drop all notes and view state.
    pub fn clear(&mut self) {
        self.notes.clear();
        self.editing = None;
        self.view = ViewState::default();
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|note| &note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::todos::testing::{Call, FakeTodoBackend};
    use crate::todos::TodoApiError;

    fn seeded() -> Vec<Note> {
        vec![
            Note::new("1", "Buy milk", false),
            Note::new("2", "Call mom", true),
            Note::new("3", "Pay MILKman", false),
            Note::new("4", "Walk dog", true),
        ]
    }

    async fn hydrated(notes: Vec<Note>) -> (NoteListController<FakeTodoBackend>, FakeTodoBackend) {
        let fake = FakeTodoBackend::with_notes(notes);
        let mut controller = NoteListController::new(fake.clone());
        controller.hydrate(Some("tok")).await;
        (controller, fake)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hydrate_replaces_collection_and_passes_token() {
        let (mut controller, fake) = hydrated(seeded()).await;
        assert_eq!(controller.notes(), seeded().as_slice());

        fake.push_list_result(Ok(vec![Note::new("9", "Only one", false)]));
        assert_eq!(controller.hydrate(Some("tok")).await, 1);
        assert_eq!(controller.notes(), &[Note::new("9", "Only one", false)]);

        assert_eq!(
            fake.calls(),
            vec![
                Call::List(Some("tok".to_string())),
                Call::List(Some("tok".to_string()))
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hydrate_failure_leaves_empty_collection() {
        let (mut controller, fake) = hydrated(seeded()).await;
        fake.push_list_result(Err(TodoApiError::Api("down".to_string())));

        assert_eq!(controller.hydrate(Some("tok")).await, 0);
        assert!(controller.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn toggle_flips_exactly_one_note() {
        let (mut controller, _) = hydrated(seeded()).await;
        let before = controller.notes().to_vec();

        for index in [0, 2, 2, 3, 1] {
            let snapshot = controller.notes().to_vec();
            assert!(controller.toggle_done(index));
            for (i, (old, new)) in snapshot.iter().zip(controller.notes()).enumerate() {
                if i == index {
                    assert_eq!(old.done, !new.done);
                } else {
                    assert_eq!(old, new);
                }
            }
        }

        assert!(!controller.toggle_done(42));
        assert_eq!(controller.len(), before.len());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn toggle_is_local_only() {
        let (mut controller, fake) = hydrated(seeded()).await;
        controller.toggle_done(0);
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_appends_remote_note() {
        let (mut controller, fake) = hydrated(seeded()).await;

        assert!(controller.create_or_update(Some("tok"), "  Feed cat ").await);

        let created = controller.notes().last().unwrap();
        assert_eq!(created, &Note::new("5", "Feed cat", false));
        assert_eq!(
            fake.calls().last(),
            Some(&Call::Create(Some("tok".to_string()), "Feed cat".to_string()))
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_failure_inserts_nothing() {
        let (mut controller, fake) = hydrated(seeded()).await;
        fake.fail_create(true);

        assert!(!controller.create_or_update(Some("tok"), "Feed cat").await);
        assert_eq!(controller.notes(), seeded().as_slice());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn blank_titles_are_ignored_for_create_and_edit() {
        let (mut controller, fake) = hydrated(seeded()).await;

        assert!(!controller.create_or_update(Some("tok"), "   ").await);
        assert!(controller.start_edit(0));
        assert!(!controller.create_or_update(Some("tok"), "\t").await);

        assert_eq!(controller.notes(), seeded().as_slice());
        assert_eq!(controller.editing_index(), Some(0));
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn edit_retitles_locally_without_remote_call() {
        let (mut controller, fake) = hydrated(seeded()).await;

        assert!(controller.start_edit(1));
        assert_eq!(controller.editing_title(), "Call mom");
        assert!(controller.create_or_update(Some("tok"), "Call dad").await);

        assert_eq!(controller.notes()[1], Note::new("2", "Call dad", true));
        assert_eq!(controller.editing_index(), None);
        assert_eq!(controller.len(), 4);
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn start_edit_rejects_out_of_range_and_cancel_resets() {
        let (mut controller, _) = hydrated(seeded()).await;
        assert!(!controller.start_edit(10));
        assert!(controller.start_edit(3));
        controller.cancel_edit();
        assert_eq!(controller.editing_index(), None);
        assert_eq!(controller.editing_title(), "");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn delete_removes_only_after_remote_success() {
        let (mut controller, fake) = hydrated(seeded()).await;

        fake.fail_remove(true);
        assert!(!controller.delete(Some("tok"), &NoteId::new("2")).await);
        assert_eq!(controller.notes(), seeded().as_slice());

        fake.fail_remove(false);
        assert!(controller.delete(Some("tok"), &NoteId::new("2")).await);
        assert_eq!(controller.len(), 3);
        assert_eq!(controller.position(&NoteId::new("2")), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn delete_keeps_edit_target_pointing_at_same_note() {
        let (mut controller, _) = hydrated(seeded()).await;
        assert!(controller.start_edit(3));

        assert!(controller.delete(Some("tok"), &NoteId::new("1")).await);
        assert_eq!(controller.editing_title(), "Walk dog");

        assert!(controller.delete(Some("tok"), &NoteId::new("4")).await);
        assert_eq!(controller.editing_index(), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn derived_view_filters_by_status() {
        let (controller, _) = hydrated(seeded()).await;

        let done = controller.derived_view(StatusFilter::Done, "");
        assert!(done.iter().all(|note| note.done));
        assert_eq!(done.len(), 2);

        let todo = controller.derived_view(StatusFilter::Todo, "");
        assert!(todo.iter().all(|note| !note.done));
        assert_eq!(todo.len(), 2);

        let all = controller.derived_view(StatusFilter::All, "");
        assert_eq!(all, controller.notes().iter().collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn derived_view_search_is_case_insensitive_subset() {
        let (controller, _) = hydrated(seeded()).await;

        for filter in [StatusFilter::All, StatusFilter::Todo, StatusFilter::Done] {
            let unsearched = controller.derived_view(filter, "");
            let searched = controller.derived_view(filter, "milk");
            assert!(searched.iter().all(|note| unsearched.contains(note)));
            assert!(searched
                .iter()
                .all(|note| note.title.to_lowercase().contains("milk")));
        }

        let ids = controller
            .derived_view(StatusFilter::All, "MiLk")
            .into_iter()
            .map(|note| note.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn set_filter_clears_search_and_visible_entries_keep_positions() {
        let (mut controller, _) = hydrated(seeded()).await;

        controller.set_search("  milk ");
        assert_eq!(controller.view().search_text, "milk");
        controller.set_filter(StatusFilter::Done);
        assert_eq!(controller.view().search_text, "");

        let positions = controller
            .visible_entries()
            .into_iter()
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        assert_eq!(positions, vec![1, 3]);
        assert_eq!(controller.visible_notes().len(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn clear_resets_notes_and_view() {
        let (mut controller, _) = hydrated(seeded()).await;
        controller.set_filter(StatusFilter::Todo);
        controller.set_search("dog");
        controller.start_edit(0);

        controller.clear();

        assert!(controller.is_empty());
        assert!(controller.view().is_default());
        assert_eq!(controller.editing_index(), None);
    }
}
