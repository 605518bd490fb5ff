//! A single unit of post content and the ids that tie the content tree together

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::element_list::ElementList;
use super::media::{ImageElement, VideoElement};
use super::text::TextElement;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

macro_rules! runtime_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            pub(crate) fn fresh() -> Self {
                Self(next_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

runtime_id!(
    /// Identity of an element instance. Never persisted; a copy or a reload gets a new one.
    ElementId,
    "element"
);
runtime_id!(
    /// Identity of an element list instance
    ListId,
    "list"
);
runtime_id!(
    /// Identity of a post instance
    PostId,
    "post"
);

/// The content variants an element can hold
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    Text(TextElement),
    Image(ImageElement),
    Video(VideoElement),
    List(ElementList),
}

impl ElementKind {
    /// Render this content to its markup fragment
    pub fn render(&self) -> String {
        match self {
            ElementKind::Text(text) => text.render(),
            ElementKind::Image(image) => image.render(),
            ElementKind::Video(video) => video.render(),
            ElementKind::List(list) => list.render(),
        }
    }

    /// Structural deep copy
    pub fn copy(&self) -> Self {
        match self {
            ElementKind::Text(text) => ElementKind::Text(text.copy()),
            ElementKind::Image(image) => ElementKind::Image(image.copy()),
            ElementKind::Video(video) => ElementKind::Video(video.copy()),
            ElementKind::List(list) => ElementKind::List(list.copy()),
        }
    }

    /// Short name of the variant, as written in the persisted `kind` tag
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
            ElementKind::Video(_) => "video",
            ElementKind::List(_) => "list",
        }
    }
}

/// An element in a post: some text, an image, a video or a nested list.
///
/// The element knows which list holds it through `parent_list`, which is a
/// plain id resolved through the owning tree and never an owning pointer.
#[derive(Debug)]
pub struct Element {
    id: ElementId,
    parent: Option<ListId>,
    kind: ElementKind,
}

impl Element {
    /// Wrap content in a new, parent-less element
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::fresh(),
            parent: None,
            kind,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The list this element was last appended to
    pub fn parent_list(&self) -> Option<ListId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ListId>) {
        self.parent = parent;
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    /// Unwrap the content
    pub fn into_kind(self) -> ElementKind {
        self.kind
    }

    /// Markup used to display this element
    pub fn render(&self) -> String {
        self.kind.render()
    }

    /// Deep copy with a fresh id and no parent list
    pub fn copy(&self) -> Self {
        Self::new(self.kind.copy())
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match &mut self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match &self.kind {
            ElementKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageElement> {
        match &mut self.kind {
            ElementKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_video(&self) -> Option<&VideoElement> {
        match &self.kind {
            ElementKind::Video(video) => Some(video),
            _ => None,
        }
    }

    pub fn as_video_mut(&mut self) -> Option<&mut VideoElement> {
        match &mut self.kind {
            ElementKind::Video(video) => Some(video),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ElementList> {
        match &self.kind {
            ElementKind::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ElementList> {
        match &mut self.kind {
            ElementKind::List(list) => Some(list),
            _ => None,
        }
    }
}

impl From<ElementKind> for Element {
    fn from(kind: ElementKind) -> Self {
        Self::new(kind)
    }
}

impl From<TextElement> for Element {
    fn from(text: TextElement) -> Self {
        Self::new(ElementKind::Text(text))
    }
}

impl From<ImageElement> for Element {
    fn from(image: ImageElement) -> Self {
        Self::new(ElementKind::Image(image))
    }
}

impl From<VideoElement> for Element {
    fn from(video: VideoElement) -> Self {
        Self::new(ElementKind::Video(video))
    }
}

impl From<ElementList> for Element {
    fn from(list: ElementList) -> Self {
        Self::new(ElementKind::List(list))
    }
}

// Ids and back-references are runtime relations, so only the content is written.
impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.kind.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ElementKind::deserialize(deserializer).map(Element::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::media::MediaLocation;

    #[test]
    fn test_copy_has_fresh_id_and_no_parent() {
        let mut list = ElementList::new();
        let id = list.append(TextElement::new("<p>hi</p>").into());
        let original = list.get(0).unwrap();
        assert_eq!(original.id(), id);
        assert_eq!(original.parent_list(), Some(list.id()));

        let copy = original.copy();
        assert_ne!(copy.id(), original.id());
        assert_eq!(copy.parent_list(), None);
        assert_eq!(copy.render(), original.render());
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let element: Element = ImageElement::new(MediaLocation::Internet, "http://x/y.png").into();
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["location"], "internet");

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back.render(), element.render());
        assert_ne!(back.id(), element.id());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Element, _> =
            serde_json::from_str(r#"{"kind":"audio","src":"a.mp3"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_accessors() {
        let mut element: Element = TextElement::new("a").into();
        assert_eq!(element.kind().name(), "text");
        assert!(element.as_image().is_none());
        element.as_text_mut().unwrap().set_markup("b");
        assert_eq!(element.render(), "b");
    }

    #[test]
    fn test_media_accessors_edit_in_place() {
        let mut image: Element = ImageElement::new(MediaLocation::Local, "a.png").into();
        assert!(image.as_video_mut().is_none());
        image.as_image_mut().unwrap().set_width("50%");
        assert!(image.render().contains("width=\"50%\""));

        let mut video: Element = VideoElement::new(MediaLocation::Local, "v.mp4").into();
        assert!(video.as_image_mut().is_none());
        video.as_video_mut().unwrap().set_height("240");
        assert!(video.render().contains("height=\"240\""));

        match video.into_kind() {
            ElementKind::Video(v) => assert_eq!(v.height(), "240"),
            other => panic!("unexpected kind {}", other.name()),
        }
    }
}
