//! Post collection, loaded once per build.

use super::{Post, post::load_site_posts};
use crate::config::SiteConfig;
use anyhow::Result;
use std::cell::OnceCell;

/// Memoized post collection for one build context.
///
/// The first [`PostCache::posts`] call scans the posts section; later calls
/// return the same collection.
#[derive(Debug)]
pub struct PostCache<'a> {
    config: &'a SiteConfig,
    posts: OnceCell<Vec<Post>>,
}

impl<'a> PostCache<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self {
            config,
            posts: OnceCell::new(),
        }
    }

    /// Cache pre-filled with `posts`; never touches the filesystem.
    #[cfg(test)]
    pub fn with_posts(config: &'a SiteConfig, posts: Vec<Post>) -> Self {
        Self {
            config,
            posts: OnceCell::from(posts),
        }
    }

    pub fn config(&self) -> &'a SiteConfig {
        self.config
    }

    /// Posts sorted newest first. Load errors are returned and not cached.
    pub fn posts(&self) -> Result<&[Post]> {
        if let Some(posts) = self.posts.get() {
            return Ok(posts);
        }
        let loaded = load_site_posts(self.config)?;
        Ok(self.posts.get_or_init(|| loaded))
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.posts.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_for(dir: &std::path::Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.content = dir.to_path_buf();
        config
    }

    #[test]
    fn test_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(posts_dir.join("a.md"), "---\ntitle: A\ndate: 2022-01-07\n---\n").unwrap();

        let config = config_for(dir.path());
        let cache = PostCache::new(&config);
        assert!(!cache.is_loaded());
        assert_eq!(cache.posts().unwrap().len(), 1);
        assert!(cache.is_loaded());

        // New files are not picked up by a cache that is already loaded.
        fs::write(posts_dir.join("b.md"), "---\ntitle: B\ndate: 2022-01-08\n---\n").unwrap();
        assert_eq!(cache.posts().unwrap().len(), 1);
        assert_eq!(PostCache::new(&config).posts().unwrap().len(), 2);
    }

    #[test]
    fn test_error_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(posts_dir.join("a.md"), "---\ntitle: A\n---\n").unwrap();

        let config = config_for(dir.path());
        let cache = PostCache::new(&config);
        assert!(cache.posts().is_err());
        assert!(!cache.is_loaded());

        fs::write(posts_dir.join("a.md"), "---\ntitle: A\ndate: 2022-01-07\n---\n").unwrap();
        assert_eq!(cache.posts().unwrap().len(), 1);
    }

    #[test]
    fn test_with_posts() {
        let config = SiteConfig::default();
        let cache = PostCache::with_posts(&config, vec![]);
        assert!(cache.is_loaded());
        assert!(cache.posts().unwrap().is_empty());
    }
}
