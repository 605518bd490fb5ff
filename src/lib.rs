//! BlogBuilder - blog post authoring core
//!
//! Posts are ordered trees of text, image, video and list elements that
//! render to HTML. The post store persists them as files under a storage
//! root and keeps a staged copy of the post being edited.

pub mod config;
pub mod error;
pub mod post;
pub mod session;
pub mod store;

pub use error::{ModelError, StoreError};
pub use post::{
    Element, ElementKind, ElementList, ImageElement, MediaLocation, Post, TextElement, VideoElement,
};
pub use session::EditSession;
pub use store::PostStore;
