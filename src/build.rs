//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── PostCache::posts() ──► Post[] ──► TagIndex
//!     │
//!     ├── for each page (sequential)
//!     │       ├── StructuredData::for_page() ──► head_tags()
//!     │       ├── RenderContext::page() ──► minify ──► write html
//!     │       ├── SitemapBuilder::record()
//!     │       └── FeedBuilder::record()            (post pages)
//!     │
//!     ├── tag pages ──► tags/<tag>.html
//!     ├── static files (parallel copy)
//!     │
//!     └── finish() sitemap.xml, rss.xml
//! ```

use crate::{
    config::SiteConfig,
    content::{
        Page, Post, PostCache, TagIndex, collect_pages, collect_static_files, filter_by_tag,
        page::relative_path,
    },
    generator::{FeedBuilder, SitemapBuilder, StructuredData, head_tags, render::RenderContext},
    log,
    utils::{
        minify::{MinifyType, minify},
        slug::{tag_page_relative, tag_page_url},
    },
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

/// What one build produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildStats {
    pub pages: usize,
    pub posts: usize,
    pub tags: usize,
    pub static_files: usize,
    pub sitemap_urls: usize,
    pub feed_items: usize,
}

/// Build the whole site into `[build].output`.
///
/// Any error aborts the build; nothing is retried.
pub fn build_site(config: &SiteConfig) -> Result<BuildStats> {
    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;

    let cache = PostCache::new(config);
    let posts = cache.posts()?;
    log!("posts"; "loaded {} posts", posts.len());

    let tags = TagIndex::from_posts(posts);
    log!("tags"; "{} tags", tags.len());

    let pages = collect_pages(config)?;
    let structured = StructuredData::new(&cache);
    let ctx = RenderContext {
        config,
        posts,
        tags: &tags,
    };
    let mut sitemap = SitemapBuilder::new(config);
    let mut feed = FeedBuilder::new(config);

    for page in &pages {
        let post = post_for_page(posts, page);
        build_page(config, &ctx, &structured, page, post)
            .with_context(|| format!("failed to build {}", page.source.display()))?;

        if config.build.sitemap.enable {
            sitemap.record(page)?;
        }
        if config.build.rss.enable
            && let Some(post) = post
        {
            feed.record(page, post)?;
        }
    }
    log!("build"; "{} pages", pages.len());

    for (tag, posts) in tag_pages(posts, &tags, &pages) {
        let html = ctx.tag_page(tag, posts.iter().copied());
        write_html(config, &output.join(tag_page_relative(tag)), &html)?;
        if config.build.sitemap.enable {
            let lastmod = posts
                .first()
                .and_then(|post| post.date.iso.get(..10))
                .map(str::to_owned);
            sitemap.record_url(&tag_page_url(tag), lastmod)?;
        }
    }

    let static_files = copy_static_files(config)?;

    if config.build.sitemap.enable {
        let path = output.join(&config.build.sitemap.path);
        sitemap.finish(create_file(&path)?)?;
        log!("sitemap"; "{} urls -> {}", sitemap.len(), path.display());
    }
    if config.build.rss.enable {
        let path = output.join(&config.build.rss.path);
        feed.finish(create_file(&path)?)?;
        log!("rss"; "{} items -> {}", feed.len(), path.display());
    }

    Ok(BuildStats {
        pages: pages.len(),
        posts: posts.len(),
        tags: tags.len(),
        static_files,
        sitemap_urls: sitemap.len(),
        feed_items: feed.len(),
    })
}

/// The loaded post a page was built from, matched by URL.
fn post_for_page<'p>(posts: &'p [Post], page: &Page) -> Option<&'p Post> {
    let url = page.url_path();
    posts.iter().find(|post| post.url == url)
}

/// Render one page with its head tags and write it.
fn build_page(
    config: &SiteConfig,
    ctx: &RenderContext,
    structured: &StructuredData,
    page: &Page,
    post: Option<&Post>,
) -> Result<()> {
    let json_ld = structured.for_page(page)?;
    let head = head_tags(config, page, &json_ld)?;
    let html = ctx.page(page, &head, post);
    write_html(config, &config.build.output.join(page.html_relative()), &html)
}

/// Every tag with its posts. Tags whose slugs collide share the first
/// tag's page; the others are reported and skipped. So are tags whose page
/// would overwrite a content page.
fn tag_pages<'p>(
    posts: &'p [Post],
    tags: &'p TagIndex,
    content: &[Page],
) -> Vec<(&'p str, Vec<&'p Post>)> {
    let written: FxHashSet<PathBuf> = content.iter().map(Page::html_relative).collect();
    let mut seen: FxHashMap<String, &str> = FxHashMap::default();
    let mut pages = Vec::with_capacity(tags.len());

    for tag in tags.tags() {
        let relative = tag_page_relative(tag);
        if written.contains(Path::new(&relative)) {
            log!("warn"; "tag `{}` would overwrite content page `{}`, skipped", tag, relative);
            continue;
        }
        if let Some(first) = seen.get(&relative) {
            log!("warn"; "tag `{}` maps to the page of `{}`, skipped", tag, first);
            continue;
        }
        seen.insert(relative, tag);
        pages.push((tag, filter_by_tag(posts, tag)));
    }
    pages
}

/// Create the output directory, emptying it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clean {}", output.display()))?;
        log!("build"; "cleaned {}", output.display());
    }
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))
}

fn write_html(config: &SiteConfig, path: &Path, html: &str) -> Result<()> {
    let html = minify(MinifyType::Html(html.as_bytes()), config);
    ensure_parent(path)?;
    fs::write(path, &*html).with_context(|| format!("failed to write {}", path.display()))
}

fn create_file(path: &Path) -> Result<BufWriter<fs::File>> {
    ensure_parent(path)?;
    let file =
        fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Copy non-Markdown content files (images, demo sources) to the output.
fn copy_static_files(config: &SiteConfig) -> Result<usize> {
    let content = &config.build.content;
    let files: Vec<PathBuf> = collect_static_files(config)?;

    files.par_iter().try_for_each(|source| -> Result<()> {
        let dest = config.build.output.join(relative_path(source, content));
        ensure_parent(&dest)?;
        fs::copy(source, &dest)
            .with_context(|| format!("failed to copy {}", source.display()))?;
        Ok(())
    })?;

    if !files.is_empty() {
        log!("build"; "{} static files", files.len());
    }
    Ok(files.len())
}
