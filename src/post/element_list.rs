//! Ordered composite of elements

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::element::{Element, ElementId, ElementKind, ListId, PostId};

/// An ordered list of elements. Insertion order is render order.
///
/// A list can itself be held by another list as an [`ElementKind::List`],
/// and the root list of a post records that post as its owner.
#[derive(Debug)]
pub struct ElementList {
    id: ListId,
    owner: Option<PostId>,
    items: Vec<Element>,
}

impl Default for ElementList {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementList {
    /// Create a new empty list
    pub fn new() -> Self {
        Self {
            id: ListId::fresh(),
            owner: None,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    /// The post this list belongs to
    pub fn owner_post(&self) -> Option<PostId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<PostId>) {
        self.owner = owner;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.items.iter_mut()
    }

    /// Append an element, making this list its parent.
    ///
    /// A nested list also takes this list's owning post. Only that one level
    /// is updated; lists deeper inside it keep whatever owner they had.
    pub fn append(&mut self, mut element: Element) -> ElementId {
        element.set_parent(Some(self.id));
        if let ElementKind::List(nested) = element.kind_mut() {
            nested.set_owner(self.owner);
        }
        let id = element.id();
        self.items.push(element);
        id
    }

    /// Remove an element by id. Later elements shift down by one.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        self.remove_at(index)
    }

    /// Remove the element at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<Element> {
        if index >= self.items.len() {
            return None;
        }
        let mut element = self.items.remove(index);
        element.set_parent(None);
        Some(element)
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Swap an element with the one before it. Returns false when it is
    /// already first or not in this list.
    pub fn move_up(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.items.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Swap an element with the one after it. Returns false when it is
    /// already last or not in this list.
    pub fn move_down(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.items.len() => {
                self.items.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Find an element anywhere in this list or its nested lists
    pub fn find(&self, id: ElementId) -> Option<&Element> {
        for element in &self.items {
            if element.id() == id {
                return Some(element);
            }
            if let Some(found) = element.as_list().and_then(|list| list.find(id)) {
                return Some(found);
            }
        }
        None
    }

    /// Resolve a list id (for example an element's parent) within this tree
    pub fn find_list(&self, id: ListId) -> Option<&ElementList> {
        if self.id == id {
            return Some(self);
        }
        self.items
            .iter()
            .filter_map(Element::as_list)
            .find_map(|list| list.find_list(id))
    }

    pub fn find_list_mut(&mut self, id: ListId) -> Option<&mut ElementList> {
        if self.id == id {
            return Some(self);
        }
        self.items
            .iter_mut()
            .filter_map(Element::as_list_mut)
            .find_map(|list| list.find_list_mut(id))
    }

    /// Concatenated markup of every element, in order
    pub fn render(&self) -> String {
        self.items.iter().map(Element::render).collect()
    }

    /// Deep copy. Every element is copied and appended afresh, so the copy's
    /// parent links point at the copy. The copy has no owning post.
    pub fn copy(&self) -> Self {
        let mut copy = Self::new();
        for element in &self.items {
            copy.append(element.copy());
        }
        copy
    }
}

impl FromIterator<Element> for ElementList {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut list = Self::new();
        for element in iter {
            list.append(element);
        }
        list
    }
}

impl<'a> IntoIterator for &'a ElementList {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Serialize)]
struct ListRef<'a> {
    items: &'a [Element],
}

#[derive(Deserialize)]
struct ListRepr {
    #[serde(default)]
    items: Vec<Element>,
}

impl Serialize for ElementList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ListRef { items: &self.items }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ElementList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = ListRepr::deserialize(deserializer)?;
        Ok(repr.items.into_iter().collect())
    }
}
