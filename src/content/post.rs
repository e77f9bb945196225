//! Post loading.
//!
//! Posts are the Markdown files matched by `[build].posts`. Each one must carry
//! front-matter with a `title` and a parseable `date`; anything else fails the
//! build with the offending file named.

use super::{
    ContentError, frontmatter,
    page::{build_globset, relative_path, url_for_relative, walk_files},
};
use crate::{config::SiteConfig, utils::date::{DateFormatter, PostDate}};
use anyhow::{Context, Result};
use globset::GlobBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Normalized record of one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub title: String,
    /// Site-relative URL, e.g. `/posts/hello.html`
    pub url: String,
    pub summary: Option<String>,
    pub date: PostDate,
    /// Tags in authored order
    pub tags: Vec<String>,
    pub lang: Option<String>,
    pub dependencies: Vec<String>,
    #[serde(rename = "proficiencyLevel")]
    pub proficiency_level: Option<String>,
}

impl Post {
    /// Parse a post document. `relative` is the path under the content dir.
    pub fn parse(
        text: &str,
        relative: &str,
        path: &Path,
        formatter: &DateFormatter,
    ) -> Result<Self, ContentError> {
        let (front, _) = frontmatter::parse(text)
            .map_err(|err| ContentError::FrontMatter(path.to_path_buf(), err))?
            .ok_or_else(|| ContentError::MissingFrontMatter(path.to_path_buf()))?;

        let missing = |field| ContentError::MissingField {
            path: path.to_path_buf(),
            field,
        };
        let summary = front.summary().map(str::to_owned);
        let title = front.title.ok_or_else(|| missing("title"))?;
        let raw_date = front.date.ok_or_else(|| missing("date"))?;
        let date = formatter
            .format(&raw_date, front.lang.as_deref())
            .map_err(|err| ContentError::Date(path.to_path_buf(), err))?;

        Ok(Self {
            title,
            url: url_for_relative(relative),
            summary,
            date,
            tags: front.tags,
            lang: front.lang,
            dependencies: front.dependencies,
            proficiency_level: front.proficiency_level,
        })
    }

    /// Read and parse a post file.
    pub fn read(
        path: &Path,
        content_dir: &Path,
        formatter: &DateFormatter,
    ) -> Result<Self, ContentError> {
        let text =
            fs::read_to_string(path).map_err(|err| ContentError::Io(path.to_path_buf(), err))?;
        Self::parse(&text, &relative_path(path, content_dir), path, formatter)
    }
}

/// Post files under `content_dir` matching `pattern`, in path order.
///
/// `*` does not cross directories, `**` does.
pub fn find_posts(
    content_dir: &Path,
    pattern: &str,
    exclude: &[String],
) -> Result<Vec<PathBuf>, ContentError> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|err| ContentError::Glob(pattern.to_owned(), err))?
        .compile_matcher();
    let exclude = build_globset(exclude)?;

    Ok(walk_files(content_dir, &exclude)?
        .into_iter()
        .filter(|path| matcher.is_match(relative_path(path, content_dir)))
        .collect())
}

/// Load posts sorted by publish time, newest first.
///
/// Files are parsed in parallel; ties in publish time keep path order.
pub fn load_posts(
    content_dir: &Path,
    pattern: &str,
    exclude: &[String],
    formatter: &DateFormatter,
) -> Result<Vec<Post>, ContentError> {
    let files = find_posts(content_dir, pattern, exclude)?;
    let mut posts = files
        .par_iter()
        .map(|path| Post::read(path, content_dir, formatter))
        .collect::<Result<Vec<_>, _>>()?;

    sort_by_date_desc(&mut posts);
    Ok(posts)
}

/// Load the posts section described by `config`.
pub fn load_site_posts(config: &SiteConfig) -> Result<Vec<Post>> {
    let formatter = DateFormatter::from_config(&config.build.date)?;
    load_posts(
        &config.build.content,
        &config.build.posts,
        &config.build.exclude,
        &formatter,
    )
    .with_context(|| format!("loading posts from {}", config.build.content.display()))
}

/// Stable sort, newest first.
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.time.cmp(&a.date.time));
}
