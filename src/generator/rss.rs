//! rss feed generation.
//!
//! Post pages are recorded while they are built; at the end of the build the
//! entries are sorted newest first and written as one RSS 2.0 document.

use super::{OutputError, Phase, write_document};
use crate::{
    config::SiteConfig,
    content::{Page, Post},
    utils::date::PostDate,
};
use regex::Regex;
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::{io::Write, sync::LazyLock};

const NAME: &str = "rss";

/// One post of the feed.
#[derive(Debug, Clone)]
struct FeedEntry {
    link: String,
    title: String,
    description: Option<String>,
    date: PostDate,
    tags: Vec<String>,
}

// ============================================================================
// Feed Builder
// ============================================================================

/// Accumulates feed entries during the build.
#[derive(Debug)]
pub struct FeedBuilder<'a> {
    config: &'a SiteConfig,
    entries: Vec<FeedEntry>,
    phase: Phase,
}

impl<'a> FeedBuilder<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            phase: Phase::Collecting,
        }
    }

    /// Record the post behind a built page. Pages outside the posts section
    /// are skipped; returns whether an entry was added.
    pub fn record(&mut self, page: &Page, post: &Post) -> Result<bool, OutputError> {
        self.phase.ensure_collecting(NAME)?;
        if !self.config.is_post_path(&page.relative) {
            return Ok(false);
        }

        self.entries.push(FeedEntry {
            link: self.config.absolute_url(&post.url),
            title: post.title.clone(),
            description: post.summary.clone(),
            date: post.date.clone(),
            tags: post.tags.clone(),
        });
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sort, serialize and write the feed. Returns once `writer` is flushed.
    ///
    /// The channel serializes without indentation, so the document is
    /// written as is; line trimming would join multi-line summaries.
    pub fn finish(&mut self, writer: impl Write) -> Result<(), OutputError> {
        self.phase.begin_finish(NAME)?;

        self.entries.sort_by(|a, b| b.date.time.cmp(&a.date.time));
        let xml = self.to_xml()?;
        write_document(NAME, writer, xml.as_bytes())?;

        self.phase = Phase::Done;
        Ok(())
    }

    /// Generate the rss xml string from the sorted entries.
    fn to_xml(&self) -> Result<String, OutputError> {
        let author = normalize_rss_author(self.config);
        let items: Vec<_> = self
            .entries
            .iter()
            .map(|entry| entry_to_rss_item(entry, author.as_deref()))
            .collect();

        let channel = ChannelBuilder::default()
            .title(&self.config.base.title)
            .link(self.config.base_url())
            .description(&self.config.base.description)
            .language(self.config.base.language.clone())
            .generator(concat!("quire ", env!("CARGO_PKG_VERSION")).to_string())
            .last_build_date(self.entries.first().and_then(|e| e.date.to_rfc2822()))
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| OutputError::Invalid(NAME, e.to_string()))?;
        Ok(channel.to_string())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn entry_to_rss_item(entry: &FeedEntry, author: Option<&str>) -> rss::Item {
    let categories = entry
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.as_str()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(entry.title.clone())
        .link(entry.link.clone())
        .guid(
            GuidBuilder::default()
                .permalink(true)
                .value(entry.link.clone())
                .build(),
        )
        .description(entry.description.clone())
        .pub_date(entry.date.to_rfc2822())
        .author(author.map(str::to_owned))
        .categories(categories)
        .build()
}

/// Normalize the site author to rss format: "email@example.com (Name)"
///
/// `[base].author` is used as-is when already in that format, otherwise it
/// is combined with `[base].email`. Without an email there is no valid
/// `<author>`, so items carry none.
fn normalize_rss_author(config: &SiteConfig) -> Option<String> {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$")
            .expect("author pattern is valid")
    });

    let author = config.base.author.trim();
    let email = config.base.email.trim();
    if RE_VALID_AUTHOR.is_match(author) {
        return Some(author.to_owned());
    }
    match (email.is_empty(), author.is_empty()) {
        (true, _) => None,
        (false, true) => Some(email.to_owned()),
        (false, false) => Some(format!("{email} ({author})")),
    }
}
