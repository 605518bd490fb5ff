//! Image and video content

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Width given to new media elements
pub const DEFAULT_WIDTH: &str = "75%";

/// Scheme prepended to internet paths entered without one
pub const WEB_PATH_START: &str = "http://";

/// Where a media file lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaLocation {
    /// A file on local storage
    #[default]
    Local,
    /// A URL on the internet
    Internet,
}

impl MediaLocation {
    /// Raw code of the location: Local is 0, Internet is 1
    pub fn code(self) -> i32 {
        match self {
            MediaLocation::Local => 0,
            MediaLocation::Internet => 1,
        }
    }

    /// The src as it appears in markup
    pub fn full_src(self, src: &str) -> String {
        match self {
            MediaLocation::Local => format!("file:///{}", src),
            MediaLocation::Internet => src.to_string(),
        }
    }
}

impl TryFrom<i32> for MediaLocation {
    type Error = ModelError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MediaLocation::Local),
            1 => Ok(MediaLocation::Internet),
            other => Err(ModelError::InvalidLocation(other)),
        }
    }
}

/// Normalize a path or URL: backslashes become forward slashes
pub fn normalize_src(src: &str) -> String {
    src.replace('\\', "/")
}

/// Prefix a user-entered internet path with `http://` when it has no scheme
pub fn web_path(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() || input.starts_with(WEB_PATH_START) || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("{}{}", WEB_PATH_START, input)
    }
}

/// A post element that displays an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageElement {
    location: MediaLocation,
    src: Option<String>,
    height: Option<String>,
    width: String,
}

impl Default for ImageElement {
    fn default() -> Self {
        Self {
            location: MediaLocation::Local,
            src: None,
            height: None,
            width: DEFAULT_WIDTH.to_string(),
        }
    }
}

impl ImageElement {
    /// Create an image element pointing at `src`
    pub fn new(location: MediaLocation, src: &str) -> Self {
        let mut image = Self::default();
        image.set_location(location);
        image.set_src(Some(src));
        image
    }

    pub fn location(&self) -> MediaLocation {
        self.location
    }

    pub fn set_location(&mut self, location: MediaLocation) {
        self.location = location;
    }

    /// Set the location from its raw code
    pub fn set_location_code(&mut self, code: i32) -> Result<(), ModelError> {
        self.location = MediaLocation::try_from(code)?;
        Ok(())
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    /// Set the real path or URL of the image. `None` leaves the current value.
    pub fn set_src(&mut self, src: Option<&str>) {
        if let Some(src) = src {
            self.src = Some(normalize_src(src));
        }
    }

    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    pub fn set_height(&mut self, height: Option<String>) {
        self.height = height;
    }

    pub fn width(&self) -> &str {
        &self.width
    }

    pub fn set_width(&mut self, width: impl Into<String>) {
        self.width = width.into();
    }

    /// The src as it appears in markup
    pub fn full_src(&self) -> String {
        self.location.full_src(self.src.as_deref().unwrap_or_default())
    }

    pub fn render(&self) -> String {
        format!(
            "<center><img src=\"{}\" height=\"{}\" width=\"{}\" /></center>",
            self.full_src(),
            self.height.as_deref().unwrap_or_default(),
            self.width
        )
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

/// A post element that plays a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoElement {
    location: MediaLocation,
    src: String,
    width: String,
    height: String,
}

impl Default for VideoElement {
    fn default() -> Self {
        Self {
            location: MediaLocation::Local,
            src: String::new(),
            width: DEFAULT_WIDTH.to_string(),
            height: String::new(),
        }
    }
}

impl VideoElement {
    /// Create a video element pointing at `src`
    pub fn new(location: MediaLocation, src: &str) -> Self {
        let mut video = Self::default();
        video.set_location(location);
        video.set_src(Some(src));
        video
    }

    pub fn location(&self) -> MediaLocation {
        self.location
    }

    pub fn set_location(&mut self, location: MediaLocation) {
        self.location = location;
    }

    /// Set the location from its raw code
    pub fn set_location_code(&mut self, code: i32) -> Result<(), ModelError> {
        self.location = MediaLocation::try_from(code)?;
        Ok(())
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// Set the real path or URL of the video. `None` leaves the current value.
    pub fn set_src(&mut self, src: Option<&str>) {
        if let Some(src) = src {
            self.src = normalize_src(src);
        }
    }

    pub fn height(&self) -> &str {
        &self.height
    }

    pub fn set_height(&mut self, height: impl Into<String>) {
        self.height = height.into();
    }

    pub fn width(&self) -> &str {
        &self.width
    }

    pub fn set_width(&mut self, width: impl Into<String>) {
        self.width = width.into();
    }

    /// The src as it appears in markup
    pub fn full_src(&self) -> String {
        self.location.full_src(&self.src)
    }

    pub fn render(&self) -> String {
        format!(
            "<center><video poster preload=\"true\" controls autoplay width=\"{}\" height=\"{}\">\
             <source src=\"{}\" type=\"video/mp4\"/></video></center>",
            self.width,
            self.height,
            self.full_src()
        )
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}
