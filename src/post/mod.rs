//! The post document model: elements, element lists and posts

pub mod document;
pub mod element;
pub mod element_list;
pub mod media;
pub mod text;

pub use document::{Post, PostSummary, DEFAULT_TITLE, UNSAVED};
pub use element::{Element, ElementId, ElementKind, ListId, PostId};
pub use element_list::ElementList;
pub use media::{ImageElement, MediaLocation, VideoElement};
pub use text::TextElement;
