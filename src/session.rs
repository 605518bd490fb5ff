//! Editing workflow over the post store
//!
//! An edit works on a copy of a post. Each change is written to the store's
//! staging slot, so separate edit steps build on each other, and nothing
//! reaches the saved post until [`EditSession::commit`].

use crate::error::StoreError;
use crate::post::{Element, ElementId, Post};
use crate::store::PostStore;

/// An in-progress edit of one post
pub struct EditSession<'a> {
    store: &'a mut PostStore,
    post: Post,
}

impl<'a> EditSession<'a> {
    /// Start editing a copy of `post` and stage it
    pub fn begin(store: &'a mut PostStore, post: &Post) -> Result<Self, StoreError> {
        let working = post.copy();
        store.save_staging(&working)?;
        tracing::debug!("Editing post: {}", working.filename());
        Ok(Self {
            store,
            post: working,
        })
    }

    /// Pick up the staged post, e.g. in a later edit step
    pub fn resume(store: &'a mut PostStore) -> Option<Self> {
        let post = store.get_staging()?;
        Some(Self { store, post })
    }

    /// The working copy
    pub fn post(&self) -> &Post {
        &self.post
    }

    fn stage(&mut self) -> Result<(), StoreError> {
        self.store.save_staging(&self.post)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), StoreError> {
        self.post.set_title(title);
        self.stage()
    }

    /// Append an element to the end of the post
    pub fn add(&mut self, element: impl Into<Element>) -> Result<ElementId, StoreError> {
        let id = self.post.element_list_mut().append(element.into());
        self.stage()?;
        Ok(id)
    }

    /// Change the element at `index` in place. Returns false if there is none.
    pub fn edit<F>(&mut self, index: usize, change: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut Element),
    {
        let Some(element) = self.post.element_list_mut().get_mut(index) else {
            return Ok(false);
        };
        change(element);
        self.stage()?;
        Ok(true)
    }

    pub fn remove(&mut self, index: usize) -> Result<Option<Element>, StoreError> {
        let removed = self.post.element_list_mut().remove_at(index);
        if removed.is_some() {
            self.stage()?;
        }
        Ok(removed)
    }

    pub fn move_up(&mut self, index: usize) -> Result<bool, StoreError> {
        self.reorder(index, true)
    }

    pub fn move_down(&mut self, index: usize) -> Result<bool, StoreError> {
        self.reorder(index, false)
    }

    fn reorder(&mut self, index: usize, up: bool) -> Result<bool, StoreError> {
        let list = self.post.element_list_mut();
        let Some(id) = list.get(index).map(Element::id) else {
            return Ok(false);
        };
        let moved = if up { list.move_up(id) } else { list.move_down(id) };
        if moved {
            self.stage()?;
        }
        Ok(moved)
    }

    /// Save the working copy into the store and return it. The staged copy is
    /// refreshed so it carries the assigned filename.
    pub fn commit(mut self) -> Result<Post, StoreError> {
        self.store.save(&mut self.post)?;
        self.store.save_staging(&self.post)?;
        Ok(self.post)
    }

    /// Abandon the edit. The saved post is left as it was.
    pub fn cancel(self) {
        tracing::debug!("Cancelled edit of post: {}", self.post.filename());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{ImageElement, MediaLocation, TextElement, VideoElement};

    #[test]
    fn test_new_post_commit() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PostStore::open(dir.path()).unwrap();

        let mut session = EditSession::begin(&mut store, &Post::new()).unwrap();
        session.set_title("Road Trip").unwrap();
        session.add(TextElement::new("Day one")).unwrap();
        session
            .add(ImageElement::new(MediaLocation::Internet, "http://x/y.jpg"))
            .unwrap();
        let post = session.commit().unwrap();

        assert_eq!(post.filename(), "RoadTrip");
        assert_eq!(store.list(), ["RoadTrip".to_string()]);
        assert_eq!(store.load("RoadTrip").unwrap().render(), post.render());
        assert_eq!(store.get_staging().unwrap().filename(), "RoadTrip");
    }

    #[test]
    fn test_steps_accumulate_through_staging() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PostStore::open(dir.path()).unwrap();

        EditSession::begin(&mut store, &Post::new())
            .unwrap()
            .add(TextElement::new("a"))
            .unwrap();
        EditSession::resume(&mut store)
            .unwrap()
            .add(VideoElement::new(MediaLocation::Local, "v.mp4"))
            .unwrap();

        let mut session = EditSession::resume(&mut store).unwrap();
        assert_eq!(session.post().element_list().len(), 2);
        assert!(session.move_up(1).unwrap());
        assert!(!session.move_up(0).unwrap());
        assert!(session
            .edit(1, |e| e.as_text_mut().unwrap().set_markup("b"))
            .unwrap());
        assert!(!session.edit(9, |_| {}).unwrap());
        session.commit().unwrap();

        let saved = store.get(0).unwrap();
        assert!(saved.render().ends_with("b</html>"));
        assert!(saved.element_list().get(0).unwrap().as_video().is_some());
    }

    #[test]
    fn test_cancel_leaves_saved_post() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PostStore::open(dir.path()).unwrap();

        let mut post = Post::new();
        post.set_title("Keep");
        post.element_list_mut().append(TextElement::new("original").into());
        store.save(&mut post).unwrap();

        let mut session = EditSession::begin(&mut store, &post).unwrap();
        session.remove(0).unwrap();
        session.add(TextElement::new("changed")).unwrap();
        session.set_title("Changed").unwrap();
        session.cancel();

        let saved = store.load("Keep").unwrap();
        assert_eq!(saved.title(), "Keep");
        assert_eq!(saved.summary(), "original");
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_edit_existing_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PostStore::open(dir.path()).unwrap();

        let mut post = Post::new();
        post.set_title("Notes");
        store.save(&mut post).unwrap();

        let mut session = EditSession::begin(&mut store, &post).unwrap();
        session.add(TextElement::new("more")).unwrap();
        assert!(session.remove(5).unwrap().is_none());
        session.commit().unwrap();

        assert_eq!(store.list(), ["Notes".to_string()]);
        assert_eq!(store.load("Notes").unwrap().summary(), "more");
    }
}
