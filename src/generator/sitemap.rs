//! Sitemap generation.
//!
//! Pages are recorded while they are built; the document is written once at
//! the end of the build.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/posts/hello.html</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use super::{OutputError, Phase, write_document};
use crate::{
    config::SiteConfig,
    content::Page,
    utils::{
        date::ymd,
        minify::{MinifyType, minify},
    },
};
use quick_xml::escape::escape;
use std::{fmt::Write as _, io::Write};

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const NAME: &str = "sitemap";

// ============================================================================
// Sitemap Builder
// ============================================================================

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (optional, YYYY-MM-DD format)
    lastmod: Option<String>,
}

/// Accumulates sitemap entries during the build.
#[derive(Debug)]
pub struct SitemapBuilder<'a> {
    config: &'a SiteConfig,
    urls: Vec<UrlEntry>,
    phase: Phase,
}

impl<'a> SitemapBuilder<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self {
            config,
            urls: Vec::new(),
            phase: Phase::Collecting,
        }
    }

    /// Whether `page` is left out of the sitemap: the homepage, the
    /// not-found page and pages under an excluded asset path.
    pub fn excludes(&self, page: &Page) -> bool {
        page.is_home()
            || page.is_not_found()
            || self
                .config
                .build
                .sitemap
                .exclude
                .iter()
                .any(|prefix| page.relative.starts_with(prefix.as_str()))
    }

    /// Record a built page. Returns whether it was added.
    pub fn record(&mut self, page: &Page) -> Result<bool, OutputError> {
        self.phase.ensure_collecting(NAME)?;
        if self.excludes(page) {
            return Ok(false);
        }
        self.push(&page.url_path(), page.lastmod.map(ymd));
        Ok(true)
    }

    /// Record a generated page that has no source file (per-tag pages).
    pub fn record_url(&mut self, url_path: &str, lastmod: Option<String>) -> Result<(), OutputError> {
        self.phase.ensure_collecting(NAME)?;
        self.push(url_path, lastmod);
        Ok(())
    }

    fn push(&mut self, url_path: &str, lastmod: Option<String>) {
        self.urls.push(UrlEntry {
            loc: self.config.absolute_url(url_path),
            lastmod,
        });
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Serialize and write the sitemap. Returns once `writer` is flushed.
    pub fn finish(&mut self, writer: impl Write) -> Result<(), OutputError> {
        self.phase.begin_finish(NAME)?;

        let xml = self.to_xml();
        let xml = minify(MinifyType::Xml(xml.as_bytes()), self.config);
        write_document(NAME, writer, &xml)?;

        self.phase = Phase::Done;
        Ok(())
    }

    /// Generate sitemap XML string.
    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 96);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        let _ = writeln!(xml, r#"<urlset xmlns="{SITEMAP_NS}">"#);

        for entry in &self.urls {
            xml.push_str("  <url>\n");
            let _ = writeln!(xml, "    <loc>{}</loc>", escape(entry.loc.as_str()));
            if let Some(lastmod) = &entry.lastmod {
                let _ = writeln!(xml, "    <lastmod>{lastmod}</lastmod>");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;
    use std::time::{Duration, UNIX_EPOCH};

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.url = Some("https://example.com".into());
        config.build.minify = false;
        config
    }

    fn page(relative: &str, lastmod_days: Option<u64>) -> Page {
        let mut page = Page::new(relative, FrontMatter::default(), String::new());
        page.lastmod = lastmod_days.map(|days| UNIX_EPOCH + Duration::from_secs(days * 86400));
        page
    }

    fn finish(builder: &mut SitemapBuilder) -> String {
        let mut out = Vec::new();
        builder.finish(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_sitemap_empty() {
        let config = config();
        let mut builder = SitemapBuilder::new(&config);
        let xml = finish(&mut builder);

        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
        assert_eq!(builder.phase, Phase::Done);
    }

    #[test]
    fn test_sitemap_entries() {
        let config = config();
        let mut builder = SitemapBuilder::new(&config);
        assert!(builder.record(&page("posts/hello.md", Some(20089))).unwrap()); // 2025-01-01
        assert!(builder.record(&page("about.md", None)).unwrap());
        builder
            .record_url("/tags/rust.html", Some("2025-01-02".into()))
            .unwrap();
        assert_eq!(builder.len(), 3);

        let xml = finish(&mut builder);
        assert!(xml.contains("<loc>https://example.com/posts/hello.html</loc>"));
        assert!(xml.contains("<lastmod>2025-01-01</lastmod>"));
        assert!(xml.contains("<loc>https://example.com/about.html</loc>"));
        assert!(xml.contains("<loc>https://example.com/tags/rust.html</loc>"));
        assert_eq!(xml.matches("<url>").count(), 3);
        assert_eq!(xml.matches("<lastmod>").count(), 2);

        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert!(lines[1].starts_with("<urlset"));
        assert_eq!(lines.last().unwrap().trim(), "</urlset>");
    }

    #[test]
    fn test_sitemap_exclusions() {
        let config = config();
        let mut builder = SitemapBuilder::new(&config);
        assert!(!builder.record(&page("index.md", None)).unwrap());
        assert!(!builder.record(&page("404.md", None)).unwrap());
        assert!(!builder.record(&page("posts-assets/demo/readme.md", None)).unwrap());
        assert!(!builder.record(&page("_posts_assets/demo/readme.md", None)).unwrap());
        assert!(builder.record(&page("guides/index.md", None)).unwrap());
        assert_eq!(builder.len(), 1);

        let home = Page::new(
            "home.md",
            FrontMatter {
                layout: Some("home".into()),
                ..Default::default()
            },
            String::new(),
        );
        assert!(builder.excludes(&home));
    }

    #[test]
    fn test_sitemap_escapes_special_chars() {
        let config = config();
        let mut builder = SitemapBuilder::new(&config);
        builder.record_url("/search?q=a&b=c", None).unwrap();

        let xml = finish(&mut builder);
        assert!(xml.contains("<loc>https://example.com/search?q=a&amp;b=c</loc>"));
    }

    #[test]
    fn test_sitemap_minified() {
        let mut config = config();
        config.build.minify = true;
        let mut builder = SitemapBuilder::new(&config);
        builder.record(&page("about.md", None)).unwrap();

        let xml = finish(&mut builder);
        assert!(!xml.contains('\n'));
        assert!(xml.contains("<url><loc>https://example.com/about.html</loc></url>"));
    }

    #[test]
    fn test_record_after_finish_fails() {
        let config = config();
        let mut builder = SitemapBuilder::new(&config);
        finish(&mut builder);

        assert!(matches!(
            builder.record(&page("about.md", None)),
            Err(OutputError::Finalized("sitemap"))
        ));
        assert!(matches!(
            builder.finish(Vec::new()),
            Err(OutputError::AlreadyFinished("sitemap"))
        ));
    }

    #[test]
    fn test_flush_failure_is_fatal() {
        let config = config();
        let mut builder = SitemapBuilder::new(&config);
        let err = builder
            .finish(crate::generator::tests::FailingFlush)
            .unwrap_err();
        assert!(matches!(err, OutputError::Write("sitemap", _)));
        assert_ne!(builder.phase, Phase::Done);
    }
}
