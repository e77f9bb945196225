//! Markdown content: pages, posts and the indexes derived from them.
//!
//! # Build Flow
//!
//! ```text
//! collect_pages() ───────────────► Page[] ──► per-page transform (build.rs)
//!                                                    │
//! load_posts() ──► Post[] (date desc) ──► PostCache ─┤
//!                        │                           ├── json-ld
//!                        └──► TagIndex               └── feed entries
//! ```
//!
//! - **frontmatter**: split and deserialize the YAML block
//! - **page**: every Markdown file of the site with its layout
//! - **post**: normalized records of the posts section
//! - **tags**: tag counts and tag filtering
//! - **cache**: the post collection, loaded once per build

pub mod cache;
pub mod frontmatter;
pub mod page;
pub mod post;
pub mod tags;

pub use cache::PostCache;
pub use frontmatter::FrontMatter;
pub use page::{Layout, Page, collect_pages, collect_static_files};
pub use post::Post;
pub use tags::{TagIndex, filter_by_tag};

use crate::utils::date::DateError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading content. All of them abort the build.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to walk `{0}`")]
    Walk(PathBuf, #[source] walkdir::Error),

    #[error("invalid glob `{0}`")]
    Glob(String, #[source] globset::Error),

    #[error("`{0}` has no front-matter block")]
    MissingFrontMatter(PathBuf),

    #[error("`{0}` has malformed front-matter")]
    FrontMatter(PathBuf, #[source] serde_yaml::Error),

    #[error("`{path}` is missing required front-matter field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("`{0}` has an invalid date")]
    Date(PathBuf, #[source] DateError),
}
