//! Posts: a title and a root list of elements

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::element::PostId;
use super::element_list::ElementList;
use super::media::ImageElement;

/// Filename of a post that has never been saved
pub const UNSAVED: &str = "new file";

/// Title given to new posts
pub const DEFAULT_TITLE: &str = "New Post";

/// Number of characters included in a post summary
const SUMMARY_LENGTH: usize = 50;

/// A blog post made of elements
#[derive(Debug)]
pub struct Post {
    id: PostId,
    filename: String,
    title: String,
    root: ElementList,
}

impl Default for Post {
    fn default() -> Self {
        Self::new()
    }
}

impl Post {
    /// Create a new, unsaved, empty post
    pub fn new() -> Self {
        Self::with_parts(UNSAVED.to_string(), DEFAULT_TITLE.to_string(), ElementList::new())
    }

    fn with_parts(filename: String, title: String, root: ElementList) -> Self {
        let mut post = Self {
            id: PostId::fresh(),
            filename,
            title,
            root: ElementList::new(),
        };
        post.set_element_list(root);
        post
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    /// Name of this post in the store, or [`UNSAVED`]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    /// True until the store assigns a filename
    pub fn is_unsaved(&self) -> bool {
        self.filename == UNSAVED
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn element_list(&self) -> &ElementList {
        &self.root
    }

    pub fn element_list_mut(&mut self) -> &mut ElementList {
        &mut self.root
    }

    /// Replace the root list, returning the previous one
    pub fn set_element_list(&mut self, mut list: ElementList) -> ElementList {
        list.set_owner(Some(self.id));
        let mut previous = std::mem::replace(&mut self.root, list);
        previous.set_owner(None);
        previous
    }

    /// Opening text of the first text element among the root list's
    /// children, cut to 50 characters with "..." when longer. Empty when the
    /// post has no text.
    pub fn summary(&self) -> String {
        let Some(text) = self.root.iter().find_map(|e| e.as_text()) else {
            return String::new();
        };

        let text = text.text();
        if text.chars().count() > SUMMARY_LENGTH {
            let mut summary: String = text.chars().take(SUMMARY_LENGTH).collect();
            summary.push_str("...");
            summary
        } else {
            text
        }
    }

    /// First image among the root list's children
    pub fn first_image(&self) -> Option<&ImageElement> {
        self.root.iter().find_map(|e| e.as_image())
    }

    /// Markup of the whole post
    pub fn render(&self) -> String {
        format!("<html>{}</html>", self.root.render())
    }

    /// Copy with the same filename and title and an independent element tree
    pub fn copy(&self) -> Self {
        Self::with_parts(self.filename.clone(), self.title.clone(), self.root.copy())
    }
}

#[derive(Serialize)]
struct PostRef<'a> {
    filename: &'a str,
    title: &'a str,
    root: &'a ElementList,
}

#[derive(Deserialize)]
struct PostRepr {
    filename: String,
    title: String,
    #[serde(default)]
    root: ElementList,
}

impl Serialize for Post {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PostRef {
            filename: &self.filename,
            title: &self.title,
            root: &self.root,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Post {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PostRepr::deserialize(deserializer)?;
        let mut post = Self::with_parts(repr.filename, repr.title, repr.root);
        // Lists directly under the root belonged to this post when it was written.
        let owner = Some(post.id);
        for element in post.root.iter_mut() {
            if let Some(nested) = element.as_list_mut() {
                nested.set_owner(owner);
            }
        }
        Ok(post)
    }
}

/// Title used in place of a post that could not be loaded
pub const CORRUPTED_TITLE: &str = "Post File Corrupted or Serializable Class Changed.";

/// Summary used in place of a post that could not be loaded
pub const CORRUPTED_SUMMARY: &str = "Unable to load the blog post.";

/// What a post list shows for one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    /// Store filename
    pub filename: String,
    pub title: String,
    pub summary: String,
    /// Markup src of the first image, if any
    pub thumbnail: Option<String>,
    /// False when the post failed to load and this is a placeholder
    pub loaded: bool,
}

impl PostSummary {
    pub fn from_post(post: &Post) -> Self {
        Self {
            filename: post.filename().to_string(),
            title: post.title().to_string(),
            summary: post.summary(),
            thumbnail: post.first_image().map(ImageElement::full_src),
            loaded: true,
        }
    }

    /// Placeholder for a post that failed to load
    pub fn corrupted(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            title: CORRUPTED_TITLE.to_string(),
            summary: CORRUPTED_SUMMARY.to_string(),
            thumbnail: None,
            loaded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::element::Element;
    use crate::post::media::{MediaLocation, VideoElement};
    use crate::post::text::TextElement;

    const LONG: &str =
        "Hello world, this is a sample paragraph that definitely exceeds fifty characters";

    #[test]
    fn test_new_post_defaults() {
        let post = Post::new();
        assert_eq!(post.title(), "New Post");
        assert!(post.is_unsaved());
        assert!(post.element_list().is_empty());
        assert_eq!(post.element_list().owner_post(), Some(post.id()));
        assert_eq!(post.render(), "<html></html>");
    }

    #[test]
    fn test_summary_truncates() {
        let mut post = Post::new();
        post.element_list_mut()
            .append(ImageElement::new(MediaLocation::Local, "a.png").into());
        post.element_list_mut().append(TextElement::new(LONG).into());
        post.element_list_mut().append(TextElement::new("second").into());

        let expected = format!("{}...", &LONG[..50]);
        assert_eq!(post.summary(), expected);
    }

    #[test]
    fn test_summary_short_and_empty() {
        let mut post = Post::new();
        assert_eq!(post.summary(), "");

        post.element_list_mut()
            .append(TextElement::new("<p>Short text</p>\n").into());
        assert_eq!(post.summary(), "Short text");
    }

    #[test]
    fn test_summary_ignores_nested_lists() {
        let mut nested = ElementList::new();
        nested.append(TextElement::new("inside").into());

        let mut post = Post::new();
        post.element_list_mut().append(nested.into());
        assert_eq!(post.summary(), "");

        post.element_list_mut().append(TextElement::new("outside").into());
        assert_eq!(post.summary(), "outside");
    }

    #[test]
    fn test_append_nested_list_takes_owner() {
        let mut post = Post::new();
        let id = post.element_list_mut().append(ElementList::new().into());
        let nested = post.element_list().find(id).unwrap().as_list().unwrap();
        assert_eq!(nested.owner_post(), Some(post.id()));
    }

    #[test]
    fn test_set_element_list() {
        let mut post = Post::new();
        let mut list = ElementList::new();
        list.append(TextElement::new("x").into());

        let previous = post.set_element_list(list);
        assert_eq!(previous.owner_post(), None);
        assert_eq!(post.element_list().owner_post(), Some(post.id()));
        assert_eq!(post.render(), "<html>x</html>");
    }

    #[test]
    fn test_copy_independence() {
        let mut post = Post::new();
        post.set_filename("Trip");
        post.set_title("Trip");
        post.element_list_mut().append(TextElement::new("a").into());
        post.element_list_mut()
            .append(VideoElement::new(MediaLocation::Internet, "http://v/1.mp4").into());
        let before = post.render();

        let mut copy = post.copy();
        assert_eq!(copy.filename(), "Trip");
        assert_eq!(copy.title(), "Trip");
        assert_ne!(copy.id(), post.id());
        assert_eq!(copy.element_list().owner_post(), Some(copy.id()));
        assert_eq!(copy.render(), before);

        let first = copy.element_list().get(0).unwrap().id();
        copy.element_list_mut().move_down(first);
        copy.element_list_mut().append(TextElement::new("b").into());
        let second = copy.element_list().get(0).unwrap().id();
        copy.element_list_mut().remove(second);

        assert_eq!(post.render(), before);
        assert_ne!(copy.render(), before);
    }

    #[test]
    fn test_first_image_and_summary_view() {
        let mut post = Post::new();
        post.element_list_mut().append(TextElement::new("t").into());
        post.element_list_mut()
            .append(ImageElement::new(MediaLocation::Internet, "http://a/1.png").into());
        post.element_list_mut()
            .append(ImageElement::new(MediaLocation::Internet, "http://a/2.png").into());

        let summary = PostSummary::from_post(&post);
        assert_eq!(summary.thumbnail.as_deref(), Some("http://a/1.png"));
        assert_eq!(summary.summary, "t");
        assert!(summary.loaded);

        let corrupted = PostSummary::corrupted("Gone");
        assert_eq!(corrupted.title, CORRUPTED_TITLE);
        assert!(!corrupted.loaded);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut post = Post::new();
        post.set_title("Round Trip");
        post.element_list_mut().append(TextElement::new("<p>hi</p>").into());
        let mut nested = ElementList::new();
        nested.append(ImageElement::new(MediaLocation::Local, "x.png").into());
        post.element_list_mut().append(Element::from(nested));

        let json = serde_json::to_string(&post).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title(), "Round Trip");
        assert_eq!(back.filename(), UNSAVED);
        assert_eq!(back.render(), post.render());
        assert_eq!(back.element_list().owner_post(), Some(back.id()));
    }

    #[test]
    fn test_reload_restores_nested_list_owner() {
        let mut post = Post::new();
        let id = post.element_list_mut().append(ElementList::new().into());
        let before = post.element_list().find(id).unwrap().as_list().unwrap();
        assert_eq!(before.owner_post(), Some(post.id()));

        let json = serde_json::to_string(&post).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        let nested = back.element_list().get(0).unwrap().as_list().unwrap();
        assert_eq!(nested.owner_post(), Some(back.id()));
    }
}
