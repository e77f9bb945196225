//! Site pages and layout selection.
//!
//! Every Markdown file under the content directory becomes a [`Page`]. Paths
//! map to URLs the same way for every page:
//!
//! | Source (relative)     | Output                 | URL                   |
//! |-----------------------|------------------------|-----------------------|
//! | `index.md`            | `index.html`           | `/`                   |
//! | `posts/hello.md`      | `posts/hello.html`     | `/posts/hello.html`   |
//! | `guides/index.md`     | `guides/index.html`    | `/guides/`            |
//! | `404.md`              | `404.html`             | `/404.html`           |

use super::{ContentError, FrontMatter, frontmatter};
use crate::config::SiteConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Which view a page is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Post listing (`layout: home`, or the root `index.md` without a layout).
    Home,
    /// Tag browser filtered by the `t` query parameter (`layout: tags`).
    Tags,
    /// `404.md`.
    NotFound,
    /// Everything else, posts included.
    Article,
}

impl Layout {
    pub fn select(relative: &str, front: &FrontMatter) -> Self {
        match front.layout.as_deref() {
            Some("home") => Self::Home,
            Some("tags") => Self::Tags,
            None if relative == "index.md" => Self::Home,
            _ if relative == "404.md" => Self::NotFound,
            _ => Self::Article,
        }
    }
}

/// One Markdown page of the site.
#[derive(Debug, Clone)]
pub struct Page {
    /// Source file path
    pub source: PathBuf,
    /// Path relative to the content directory, `/`-separated
    pub relative: String,
    pub front: FrontMatter,
    /// Markdown body without the front-matter block
    pub body: String,
    pub layout: Layout,
    /// Source modification time (sitemap `lastmod`)
    pub lastmod: Option<SystemTime>,
}

impl Page {
    /// Read a page from disk. A missing front-matter block is allowed for pages.
    pub fn read(source: &Path, content_dir: &Path) -> Result<Self, ContentError> {
        let relative = relative_path(source, content_dir);
        let text = fs::read_to_string(source)
            .map_err(|err| ContentError::Io(source.to_path_buf(), err))?;

        let (front, body) = match frontmatter::parse(&text) {
            Ok(Some((front, body))) => (front, body.to_owned()),
            Ok(None) => (FrontMatter::default(), text.clone()),
            Err(err) => return Err(ContentError::FrontMatter(source.to_path_buf(), err)),
        };

        let mut page = Self::new(&relative, front, body);
        page.source = source.to_path_buf();
        page.lastmod = fs::metadata(source).and_then(|m| m.modified()).ok();
        Ok(page)
    }

    /// Build a page that has no file behind it (generated pages, tests).
    pub fn new(relative: &str, front: FrontMatter, body: String) -> Self {
        Self {
            source: PathBuf::from(relative),
            relative: relative.to_owned(),
            layout: Layout::select(relative, &front),
            front,
            body,
            lastmod: None,
        }
    }

    pub fn is_home(&self) -> bool {
        self.layout == Layout::Home
    }

    pub fn is_not_found(&self) -> bool {
        self.layout == Layout::NotFound
    }

    /// Site-relative URL, see the module table.
    pub fn url_path(&self) -> String {
        url_for_relative(&self.relative)
    }

    /// Output path relative to the output directory.
    pub fn html_relative(&self) -> PathBuf {
        PathBuf::from(html_for_relative(&self.relative))
    }
}

/// `posts/a.md` → `posts/a.html`
fn html_for_relative(relative: &str) -> String {
    let stem = relative.strip_suffix(".md").unwrap_or(relative);
    format!("{stem}.html")
}

/// Site-relative URL of a content-relative Markdown path.
pub fn url_for_relative(relative: &str) -> String {
    if relative == "index.md" {
        return "/".to_owned();
    }
    if let Some(dir) = relative.strip_suffix("/index.md") {
        return format!("/{dir}/");
    }
    format!("/{}", html_for_relative(relative))
}

/// `/`-separated path of `path` relative to `root`.
pub fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Compile glob patterns into one set.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet, ContentError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|err| ContentError::Glob(pattern.clone(), err))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| ContentError::Glob(patterns.join(", "), err))
}

/// Relative paths of all files under `dir`, minus `exclude`, sorted.
pub fn walk_files(dir: &Path, exclude: &GlobSet) -> Result<Vec<PathBuf>, ContentError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|err| ContentError::Walk(dir.to_path_buf(), err))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or_default();
        if IGNORED_FILES.contains(&name) {
            continue;
        }
        if exclude.is_match(relative_path(entry.path(), dir)) {
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Read every Markdown page of the site, in path order.
pub fn collect_pages(config: &SiteConfig) -> Result<Vec<Page>, ContentError> {
    let content = &config.build.content;
    let exclude = build_globset(&config.build.exclude)?;

    walk_files(content, &exclude)?
        .iter()
        .filter(|path| is_markdown(path))
        .map(|path| Page::read(path, content))
        .collect()
}

/// Non-Markdown files of the content directory (images, demo sources, …).
pub fn collect_static_files(config: &SiteConfig) -> Result<Vec<PathBuf>, ContentError> {
    let exclude = build_globset(&config.build.exclude)?;
    Ok(walk_files(&config.build.content, &exclude)?
        .into_iter()
        .filter(|path| !is_markdown(path))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_with_layout(layout: &str) -> FrontMatter {
        FrontMatter {
            layout: Some(layout.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_select() {
        let plain = FrontMatter::default();
        assert_eq!(Layout::select("index.md", &front_with_layout("home")), Layout::Home);
        assert_eq!(Layout::select("tags.md", &front_with_layout("tags")), Layout::Tags);
        assert_eq!(Layout::select("404.md", &plain), Layout::NotFound);
        assert_eq!(Layout::select("posts/a.md", &plain), Layout::Article);
        assert_eq!(Layout::select("about.md", &front_with_layout("doc")), Layout::Article);
    }

    #[test]
    fn test_root_index_is_home_without_layout() {
        let plain = FrontMatter::default();
        assert_eq!(Layout::select("index.md", &plain), Layout::Home);
        assert_eq!(Layout::select("guides/index.md", &plain), Layout::Article);
        assert_eq!(Layout::select("index.md", &front_with_layout("tags")), Layout::Tags);

        let page = Page::new("index.md", plain, String::new());
        assert!(page.is_home());
        let tags = Page::new("index.md", front_with_layout("tags"), String::new());
        assert!(!tags.is_home());
    }

    #[test]
    fn test_url_for_relative() {
        assert_eq!(url_for_relative("index.md"), "/");
        assert_eq!(url_for_relative("posts/hello.md"), "/posts/hello.html");
        assert_eq!(url_for_relative("guides/index.md"), "/guides/");
        assert_eq!(url_for_relative("404.md"), "/404.html");
    }

    #[test]
    fn test_html_relative() {
        let page = Page::new("posts/hello.md", FrontMatter::default(), String::new());
        assert_eq!(page.html_relative(), PathBuf::from("posts/hello.html"));
        let page = Page::new("index.md", FrontMatter::default(), String::new());
        assert_eq!(page.html_relative(), PathBuf::from("index.html"));
        assert!(page.is_home());
    }

    #[test]
    fn test_read_page_with_and_without_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let with = dir.path().join("about.md");
        fs::write(&with, "---\ntitle: About\n---\nHello").unwrap();
        let without = dir.path().join("plain.md");
        fs::write(&without, "# Plain").unwrap();

        let page = Page::read(&with, dir.path()).unwrap();
        assert_eq!(page.relative, "about.md");
        assert_eq!(page.front.title.as_deref(), Some("About"));
        assert_eq!(page.body, "Hello");
        assert!(page.lastmod.is_some());

        let page = Page::read(&without, dir.path()).unwrap();
        assert_eq!(page.front, FrontMatter::default());
        assert_eq!(page.body, "# Plain");
    }

    #[test]
    fn test_read_page_malformed_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, "---\ntitle: [oops\n---\n").unwrap();

        let err = Page::read(&path, dir.path()).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter(p, _) if p == path));
    }

    #[test]
    fn test_walk_files_excludes_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("posts")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("posts/b.md"), "").unwrap();
        fs::write(root.join("posts/a.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/readme.md"), "").unwrap();
        fs::write(root.join(".DS_Store"), "").unwrap();

        let exclude = build_globset(&["**/node_modules/**".to_string()]).unwrap();
        let files: Vec<_> = walk_files(root, &exclude)
            .unwrap()
            .iter()
            .map(|p| relative_path(p, root))
            .collect();
        assert_eq!(files, vec!["posts/a.md", "posts/b.md"]);
    }

    #[test]
    fn test_build_globset_invalid() {
        let err = build_globset(&["posts/[".to_string()]).unwrap_err();
        assert!(matches!(err, ContentError::Glob(p, _) if p == "posts/["));
    }
}
