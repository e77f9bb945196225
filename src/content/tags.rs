//! Tag counts and tag filtering.

use super::Post;
use rustc_hash::FxHashMap;

/// Tag → number of posts carrying it, in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    entries: Vec<(String, usize)>,
    /// tag → position in `entries`
    index: FxHashMap<String, usize>,
}

impl TagIndex {
    /// Count tags over `posts`. Order follows the first post mentioning each tag.
    pub fn from_posts(posts: &[Post]) -> Self {
        let mut tags = Self::default();
        for tag in posts.iter().flat_map(|post| &post.tags) {
            tags.add(tag);
        }
        tags
    }

    fn add(&mut self, tag: &str) {
        match self.index.get(tag) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(tag.to_owned(), self.entries.len());
                self.entries.push((tag.to_owned(), 1));
            }
        }
    }

    /// Count for `tag`, `None` if no post carries it.
    pub fn get(&self, tag: &str) -> Option<usize> {
        self.index.get(tag).map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    /// Distinct tags, first-seen order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Posts carrying `tag` (exact match), in their original order.
pub fn filter_by_tag<'a>(posts: &'a [Post], tag: &str) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|post| post.tags.iter().any(|t| t == tag))
        .collect()
}
