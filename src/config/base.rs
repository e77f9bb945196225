//! `[base]` section configuration.
//!
//! Site identity: title, description, author and the public URL. The author
//! fields double as the JSON-LD publisher and the rss item author.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in quire.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Hugo's Blog"
/// description = "My Personal Blog"
/// author = "Hugo"
/// email = "hugo@example.com"
/// url = "https://blog.example.com"
/// job_title = "Lead developer"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title, also the JSON-LD `name` and the rss channel title.
    pub title: String,

    /// Author name for rss feed and structured data.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Author email for rss feed and structured data.
    #[serde(default = "defaults::base::email")]
    #[educe(Default = defaults::base::email())]
    pub email: String,

    /// Site description for SEO meta tags.
    pub description: String,

    /// Base URL for absolute links in rss/sitemap/json-ld.
    /// Required when the feed or the sitemap is enabled.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code of the rss channel (e.g., "en-US").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Publisher job title in structured data. Omitted when unset.
    #[serde(default)]
    pub job_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            title = "Hugo Alliaume"
            description = "My Personal Blog"
            url = "https://hugo.alliau.me"
            author = "Hugo Alliaume"
            email = "hugo@alliau.me"
            job_title = "Lead developer full-stack"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Hugo Alliaume");
        assert_eq!(config.base.description, "My Personal Blog");
        assert_eq!(config.base.url.as_deref(), Some("https://hugo.alliau.me"));
        assert_eq!(config.base.email, "hugo@alliau.me");
        assert_eq!(
            config.base.job_title.as_deref(),
            Some("Lead developer full-stack")
        );
    }

    #[test]
    fn test_base_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test blog"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.author, "<YOUR_NAME>");
        assert_eq!(config.base.email, "user@noreply.quire");
        assert_eq!(config.base.language, "en-US");
        assert_eq!(config.base.url, None);
        assert_eq!(config.base.job_title, None);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test blog"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }
}
