//! `[build]` section configuration.
//!
//! Contains build settings: directories, the posts glob, minification and the
//! generated artifacts (rss, sitemap, dates, Open Graph).

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in quire.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"      # Markdown source directory
/// output = "public"        # Output directory
/// posts = "posts/*.md"     # Glob selecting posts, relative to content
/// minify = true
///
/// [build.rss]
/// path = "rss.xml"
///
/// [build.date]
/// display_offset = "-05:00"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Markdown source directory.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Glob selecting post files, relative to the content directory.
    #[serde(default = "defaults::build::posts")]
    #[educe(Default = defaults::build::posts())]
    pub posts: String,

    /// Relative path prefix of the posts section (feed, json-ld, og tags).
    #[serde(default = "defaults::build::posts_path")]
    #[educe(Default = defaults::build::posts_path())]
    pub posts_path: String,

    /// Globs never treated as content.
    #[serde(default = "defaults::build::exclude")]
    #[educe(Default = defaults::build::exclude())]
    pub exclude: Vec<String>,

    /// Minify HTML and XML output.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Remove the output directory before building.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// RSS feed generation settings.
    #[serde(default)]
    pub rss: RssConfig,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Date display settings.
    #[serde(default)]
    pub date: DateConfig,

    /// Open Graph / Twitter Card settings.
    #[serde(default)]
    pub og: OgConfig,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[build.rss]` section - RSS feed generation configuration.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RssConfig {
    /// Enable RSS feed generation.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub enable: bool,

    /// Output path for RSS feed file, relative to the output directory.
    #[serde(default = "defaults::build::rss::path")]
    #[educe(Default = defaults::build::rss::path())]
    pub path: PathBuf,
}

/// `[build.sitemap]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Enable sitemap generation.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub enable: bool,

    /// Output path, relative to the output directory.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,

    /// Relative path prefixes whose pages are left out of the sitemap.
    #[serde(default = "defaults::build::sitemap::exclude")]
    #[educe(Default = defaults::build::sitemap::exclude())]
    pub exclude: Vec<String>,
}

/// `[build.date]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DateConfig {
    /// Locale used when a post sets no `lang`.
    #[serde(default = "defaults::build::date::locale")]
    #[educe(Default = defaults::build::date::locale())]
    pub locale: String,

    /// UTC offset the display string is rendered in (e.g. "-08:00").
    #[serde(default = "defaults::build::date::display_offset")]
    #[educe(Default = defaults::build::date::display_offset())]
    pub display_offset: String,

    /// Pin the time of day to 12:00 UTC before rendering the display string.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub noon: bool,
}

/// `[build.og]` section
///
/// ```toml
/// [build.og]
/// image = "https://og.example.com/api/og?title={title}"
/// twitter_site = "@example"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OgConfig {
    /// Image URL template, `{title}` is replaced by the URL-encoded page title.
    #[serde(default)]
    pub image: Option<String>,

    /// `twitter:site` handle.
    #[serde(default)]
    pub twitter_site: Option<String>,
}

impl OgConfig {
    /// Expand the image template for a page title.
    pub fn image_for(&self, title: &str) -> Option<String> {
        self.image
            .as_deref()
            .map(|template| template.replace("{title}", &urlencoding::encode(title)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test blog"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.posts, "posts/*.md");
        assert_eq!(config.build.posts_path, "posts/");
        assert!(config.build.minify);
        assert!(!config.build.clean);
        assert!(config.build.rss.enable);
        assert_eq!(config.build.rss.path, PathBuf::from("rss.xml"));
        assert!(config.build.sitemap.enable);
        assert_eq!(config.build.sitemap.path, PathBuf::from("sitemap.xml"));
        assert_eq!(
            config.build.sitemap.exclude,
            vec!["posts-assets/".to_string(), "_posts_assets/".to_string()]
        );
        assert_eq!(config.build.date.locale, "en-US");
        assert_eq!(config.build.date.display_offset, "+00:00");
        assert!(config.build.date.noon);
        assert!(config.build.og.image.is_none());
    }

    #[test]
    fn test_build_config_overrides() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test blog"

            [build]
            content = "site"
            posts = "articles/**/*.md"
            posts_path = "articles/"

            [build.rss]
            enable = false
            path = "feed.xml"

            [build.date]
            locale = "fr-FR"
            display_offset = "-08:00"
            noon = false
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("site"));
        assert_eq!(config.build.posts, "articles/**/*.md");
        assert!(!config.build.rss.enable);
        assert_eq!(config.build.rss.path, PathBuf::from("feed.xml"));
        assert_eq!(config.build.date.locale, "fr-FR");
        assert!(!config.build.date.noon);
    }

    #[test]
    fn test_og_image_template() {
        let og = OgConfig {
            image: Some("https://og.example.com/api?title={title}".into()),
            twitter_site: None,
        };
        assert_eq!(
            og.image_for("Doctrine & joins").as_deref(),
            Some("https://og.example.com/api?title=Doctrine%20%26%20joins")
        );
        assert_eq!(OgConfig::default().image_for("x"), None);
    }
}
