//! On-disk persistence for posts
//!
//! Every post is a JSON file named by its filename inside the storage root.
//! A separate index file lists the saved filenames in the order they were
//! first saved, and a reserved staging file holds the copy of the post that
//! is currently being edited.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::post::{Post, PostSummary};

/// Name of the file holding the list of post filenames
pub const INDEX_FILE: &str = "post-file-names";

/// Name of the file holding the staged copy of the post being edited
pub const STAGING_FILE: &str = "temp";

const RESERVED: [&str; 2] = [INDEX_FILE, STAGING_FILE];

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Longest generated base name in bytes, leaving room for a numeric suffix
/// under the usual 255 byte file name limit.
const MAX_BASE_LEN: usize = 240;

fn is_valid_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
        && !filename.chars().any(char::is_control)
        && !RESERVED.contains(&filename)
}

/// Persistent store for posts.
///
/// One store is opened per storage root and handed to whoever needs it.
/// Calls must be serialized by the caller; nothing here locks.
#[derive(Debug)]
pub struct PostStore {
    root: PathBuf,
    index: Vec<String>,
    staging: Option<Post>,
}

impl PostStore {
    /// Open the store at `root`, creating the directory if needed and
    /// loading the index. A missing index means no posts yet.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let index = match read_json::<Vec<String>>(&root.join(INDEX_FILE)) {
            Ok(index) => index,
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };

        tracing::info!("Opened post store at {} with {} posts", root.display(), index.len());
        Ok(Self {
            root,
            index,
            staging: None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    fn is_taken(&self, filename: &str) -> bool {
        RESERVED.contains(&filename)
            || self.index.iter().any(|f| f == filename)
            || self.path_for(filename).exists()
    }

    /// Derive a filename from the post title with whitespace, control
    /// characters and path separators removed, cut to at most 240 bytes.
    /// When that name is taken, 1, 2, 3... is appended until a free name is
    /// found.
    pub fn generate_filename(&self, post: &Post) -> String {
        let mut base = String::new();
        for c in post.title().chars() {
            if c.is_whitespace() || c.is_control() || c == '/' || c == '\\' {
                continue;
            }
            if base.len() + c.len_utf8() > MAX_BASE_LEN {
                break;
            }
            base.push(c);
        }

        let mut filename = base.clone();
        let mut suffix = 0u32;
        while self.is_taken(&filename) {
            suffix += 1;
            filename = format!("{}{}", base, suffix);
        }
        filename
    }

    fn write_index(&self) -> Result<(), StoreError> {
        write_json(&self.path_for(INDEX_FILE), &self.index)
    }

    /// Save a post. An unsaved post is given a generated filename, which is
    /// written back into `post` once its file exists. Saving a post already in
    /// the index overwrites its file. On error an unsaved post stays unsaved.
    pub fn save(&mut self, post: &mut Post) -> Result<(), StoreError> {
        let filename = if post.is_unsaved() {
            self.generate_filename(post)
        } else {
            post.filename().to_string()
        };
        if !is_valid_filename(&filename) {
            return Err(StoreError::InvalidFilename(filename));
        }

        write_json(&self.path_for(&filename), &*post)?;
        post.set_filename(filename.as_str());

        if !self.index.contains(&filename) {
            self.index.push(filename.clone());
            if let Err(e) = self.write_index() {
                self.index.pop();
                return Err(e);
            }
        }

        tracing::info!("Saved post: {} ({})", filename, post.title());
        Ok(())
    }

    /// Load a post, or `None` if it is missing or cannot be read
    pub fn load(&self, filename: &str) -> Option<Post> {
        match self.try_load(filename) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::error!("Failed to load post {}: {}", filename, e);
                None
            }
        }
    }

    /// Load a post, reporting why it could not be read
    pub fn try_load(&self, filename: &str) -> Result<Post, StoreError> {
        if !is_valid_filename(filename) {
            return Err(StoreError::InvalidFilename(filename.to_string()));
        }
        read_json(&self.path_for(filename))
    }

    /// Delete a post's file and index entry.
    ///
    /// Returns `Ok(false)` if the post is not in the index. The index entry is
    /// only dropped once the file is gone; if removing the file fails the
    /// entry stays and the error is returned.
    pub fn delete(&mut self, post: &Post) -> Result<bool, StoreError> {
        let filename = post.filename();
        if !self.contains(post) {
            return Ok(false);
        }

        if let Err(e) = fs::remove_file(self.path_for(filename)) {
            tracing::warn!("Failed to delete post file {}: {}", filename, e);
            return Err(e.into());
        }

        self.index.retain(|f| f != filename);
        self.write_index()?;
        tracing::info!("Deleted post: {}", filename);
        Ok(true)
    }

    /// Stage a copy of the post being edited.
    ///
    /// The post as passed in is written to the staging file and a deep copy
    /// is kept in memory. If the write fails the previous staged post stays.
    /// Nothing in the index changes.
    pub fn save_staging(&mut self, post: &Post) -> Result<(), StoreError> {
        write_json(&self.path_for(STAGING_FILE), post)?;
        self.staging = Some(post.copy());
        tracing::debug!("Staged post: {} ({})", post.filename(), post.title());
        Ok(())
    }

    /// A copy of the staged post. Falls back to the staging file when nothing
    /// is staged in memory, caching what it reads.
    pub fn get_staging(&mut self) -> Option<Post> {
        if self.staging.is_none() {
            match read_json::<Post>(&self.path_for(STAGING_FILE)) {
                Ok(post) => self.staging = Some(post),
                Err(e) => {
                    tracing::error!("Failed to load staged post: {}", e);
                    return None;
                }
            }
        }
        self.staging.as_ref().map(Post::copy)
    }

    /// The staged post held in memory, without touching disk
    pub fn staging(&self) -> Option<&Post> {
        self.staging.as_ref()
    }

    /// Filenames of saved posts, in first-save order
    pub fn list(&self) -> &[String] {
        &self.index
    }

    /// Load the post at position `i` of the index
    pub fn get(&self, i: usize) -> Option<Post> {
        self.index.get(i).and_then(|filename| self.load(filename))
    }

    pub fn count(&self) -> usize {
        self.index.len()
    }

    pub fn contains(&self, post: &Post) -> bool {
        self.index.iter().any(|f| f == post.filename())
    }

    /// Summary of the post at position `i`, or a placeholder if it fails to load
    pub fn summary(&self, i: usize) -> Option<PostSummary> {
        let filename = self.index.get(i)?;
        Some(match self.load(filename) {
            Some(post) => PostSummary::from_post(&post),
            None => PostSummary::corrupted(filename.clone()),
        })
    }

    pub fn summaries(&self) -> Vec<PostSummary> {
        (0..self.count()).filter_map(|i| self.summary(i)).collect()
    }

    /// Drop index entries whose file no longer exists. Returns the dropped
    /// filenames.
    pub fn reconcile(&mut self) -> Result<Vec<String>, StoreError> {
        let (kept, missing): (Vec<String>, Vec<String>) = std::mem::take(&mut self.index)
            .into_iter()
            .partition(|f| self.root.join(f).is_file());
        self.index = kept;

        if !missing.is_empty() {
            self.write_index()?;
            tracing::warn!("Dropped {} missing posts from the index", missing.len());
        }
        Ok(missing)
    }
}
