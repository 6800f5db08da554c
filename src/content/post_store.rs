use std::path::{Path, PathBuf};
use std::{fs, io};

use tracing::{debug, warn};

use crate::content::Post;

pub const POST_EXTENSION: &str = "mdx";
pub const DRAFT_PREFIX: char = '_';

/// Posts live as `{root_dir}/{slug}.mdx`. Nothing is cached, every call goes
/// back to the file system.
pub struct PostStore {
    pub root_dir: PathBuf,
}

impl PostStore {
    pub fn new(root_dir: PathBuf) -> Self {
        PostStore { root_dir }
    }

    /// All published posts, newest first. The order is a plain comparison of the
    /// date strings, so `2024-1-5` sorts after `2024-01-15`.
    pub fn list_posts(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.list_slugs().iter()
            .filter_map(|slug| self.read_post(slug))
            .collect();

        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    pub fn get_post(&self, slug: &str) -> Option<Post> {
        if !Self::is_valid_slug(slug) {
            return None;
        }
        self.read_post(slug)
    }

    pub fn list_slugs(&self) -> Vec<String> {
        match self.retrieve_files() {
            Ok(files) => files.iter()
                .filter_map(|f| f.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect(),
            Err(e) => {
                warn!("Could not list posts in {}: {}", self.root_dir.display(), e);
                vec![]
            }
        }
    }

    fn read_post(&self, slug: &str) -> Option<Post> {
        let file_path = self.post_path(slug);
        let raw = match fs::read_to_string(&file_path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Post {} not readable: {}", file_path.display(), e);
                return None;
            }
        };

        match Post::from_string(slug, &raw) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!("Skipping post {}: {}", file_path.display(), e);
                None
            }
        }
    }

    fn post_path(&self, slug: &str) -> PathBuf {
        self.root_dir.join(format!("{}.{}", slug, POST_EXTENSION))
    }

    fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && !slug.starts_with(DRAFT_PREFIX)
            && !slug.contains(['/', '\\'])
            && !slug.contains("..")
    }

    fn is_post_file(path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|f| f.to_str()) else {
            return false;
        };
        let has_ext = path.extension().is_some_and(|ext| ext == POST_EXTENSION);
        has_ext && !file_name.starts_with(DRAFT_PREFIX)
    }

    fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        let entries = fs::read_dir(self.root_dir.as_path())?;
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type() {
                if !file_type.is_file() {
                    continue;
                }
                let path = entry.path();
                if Self::is_post_file(&path) {
                    posts.push(path);
                }
            }
        }
        // read_dir order is platform dependent
        posts.sort();
        Ok(posts)
    }
}
