//! schema.org structured data (JSON-LD) for each page.
//!
//! Every page gets a `Blog` object. The home layout adds `blogPosts`; a page
//! under the posts section that matches a loaded post becomes a
//! `TechArticle`.
//!
//! ```json
//! {
//!   "@context": "https://schema.org",
//!   "@type": "TechArticle",
//!   "url": "https://example.com/posts/hello.html",
//!   "headline": "Hello",
//!   "datePublished": "2022-01-07T00:00:00.000Z",
//!   "inLanguage": "en",
//!   ...
//! }
//! ```

use crate::{
    config::SiteConfig,
    content::{Page, Post, PostCache},
};
use anyhow::Result;
use serde_json::{Map, Value};

/// `inLanguage` of posts without a `lang`.
const DEFAULT_LANGUAGE: &str = "en";

// ============================================================================
// Object Builder
// ============================================================================

/// JSON object builder with optional fields.
#[derive(Debug, Default)]
struct JsonObject(Map<String, Value>);

impl JsonObject {
    fn new() -> Self {
        Self::default()
    }

    /// Insert unconditionally.
    fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    /// Insert only when `value` is present and non-empty.
    fn optional(self, key: &str, value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Null => self,
            Value::String(s) if s.is_empty() => self,
            Value::Array(a) if a.is_empty() => self,
            Value::Object(o) if o.is_empty() => self,
            value => self.field(key, value),
        }
    }

    fn build(self) -> Map<String, Value> {
        self.0
    }
}

// ============================================================================
// Structured Data
// ============================================================================

/// Builds JSON-LD objects from the site config and the cached posts.
pub struct StructuredData<'a> {
    cache: &'a PostCache<'a>,
}

impl<'a> StructuredData<'a> {
    pub fn new(cache: &'a PostCache<'a>) -> Self {
        Self { cache }
    }

    fn config(&self) -> &'a SiteConfig {
        self.cache.config()
    }

    /// Structured data for one page.
    ///
    /// Loads the post collection on first use. A post page with no matching
    /// post gets the base object only.
    pub fn for_page(&self, page: &Page) -> Result<Map<String, Value>> {
        let mut data = self.base(page);

        if page.is_home() {
            data.extend(self.for_homepage()?);
        } else if self.config().is_post_path(&page.relative)
            && let Some(post) = self.matching_post(page)?
        {
            data.extend(self.for_post(post));
        }

        Ok(data)
    }

    /// The post whose title and summary equal the page front-matter.
    pub fn matching_post(&self, page: &Page) -> Result<Option<&'a Post>> {
        let title = page.front.title.as_deref();
        let summary = page.front.summary();
        Ok(self
            .cache
            .posts()?
            .iter()
            .find(|post| Some(post.title.as_str()) == title && post.summary.as_deref() == summary))
    }

    fn base(&self, page: &Page) -> Map<String, Value> {
        let config = self.config();
        let html = page.html_relative();
        JsonObject::new()
            .field("@context", "https://schema.org")
            .field("@type", "Blog")
            .field("url", config.absolute_url(&html.to_string_lossy()))
            .field("name", config.base.title.as_str())
            .field("description", config.base.description.as_str())
            .field("publisher", self.publisher())
            .build()
    }

    fn for_homepage(&self) -> Result<Map<String, Value>> {
        let posts: Vec<Value> = self
            .cache
            .posts()?
            .iter()
            .map(|post| Value::Object(self.for_post(post)))
            .collect();

        Ok(JsonObject::new()
            .field("url", self.config().base_url())
            .field("blogPosts", posts)
            .build())
    }

    /// `TechArticle` fields of a post.
    pub fn for_post(&self, post: &Post) -> Map<String, Value> {
        JsonObject::new()
            .field("@type", "TechArticle")
            .field("mainEntityOfPage", self.config().absolute_url(&post.url))
            .field("headline", post.title.as_str())
            .optional("abstract", post.summary.as_deref())
            .field("datePublished", post.date.iso.as_str())
            .field("author", self.publisher())
            .field("publisher", self.publisher())
            .field("keywords", post.tags.as_slice())
            .field(
                "inLanguage",
                post.lang.as_deref().unwrap_or(DEFAULT_LANGUAGE),
            )
            .optional("dependencies", post.dependencies.as_slice())
            .optional("proficiencyLevel", post.proficiency_level.as_deref())
            .build()
    }

    fn publisher(&self) -> Value {
        let base = &self.config().base;
        Value::Object(
            JsonObject::new()
                .field("@type", "Person")
                .field("name", base.author.as_str())
                .optional("url", self.config().base_url())
                .optional("jobTitle", base.job_title.as_deref())
                .optional("email", base.email.as_str())
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{content::FrontMatter, utils::date::DateFormatter};
    use serde_json::json;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.title = "Hugo Alliaume".into();
        config.base.description = "My Personal Blog".into();
        config.base.author = "Hugo Alliaume".into();
        config.base.email = "hugo@example.com".into();
        config.base.url = Some("https://blog.example.com".into());
        config.base.job_title = Some("Lead developer".into());
        config
    }

    fn post(title: &str, dependencies: &[&str]) -> Post {
        Post {
            title: title.into(),
            url: format!("/posts/{title}.html"),
            summary: Some(format!("About {title}")),
            date: DateFormatter::default().format("2022-01-07", None).unwrap(),
            tags: vec!["php".into()],
            lang: None,
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            proficiency_level: None,
        }
    }

    fn post_page(title: &str, summary: &str) -> Page {
        let front = FrontMatter {
            title: Some(title.into()),
            summary: Some(summary.into()),
            ..Default::default()
        };
        Page::new(&format!("posts/{title}.md"), front, String::new())
    }

    #[test]
    fn test_base_object() {
        let config = config();
        let cache = PostCache::with_posts(&config, vec![]);
        let page = Page::new("about.md", FrontMatter::default(), String::new());

        let data = StructuredData::new(&cache).for_page(&page).unwrap();
        assert_eq!(data["@context"], "https://schema.org");
        assert_eq!(data["@type"], "Blog");
        assert_eq!(data["url"], "https://blog.example.com/about.html");
        assert_eq!(data["name"], "Hugo Alliaume");
        assert_eq!(data["description"], "My Personal Blog");
        assert_eq!(
            data["publisher"],
            json!({
                "@type": "Person",
                "name": "Hugo Alliaume",
                "url": "https://blog.example.com",
                "jobTitle": "Lead developer",
                "email": "hugo@example.com",
            })
        );
    }

    #[test]
    fn test_homepage_lists_every_post() {
        let config = config();
        let cache = PostCache::with_posts(&config, vec![post("a", &[]), post("b", &[])]);
        let front = FrontMatter {
            layout: Some("home".into()),
            ..Default::default()
        };
        let page = Page::new("index.md", front, String::new());

        let data = StructuredData::new(&cache).for_page(&page).unwrap();
        assert_eq!(data["@type"], "Blog");
        assert_eq!(data["url"], "https://blog.example.com");
        let posts = data["blogPosts"].as_array().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0]["headline"], "a");
        assert_eq!(posts[0]["@type"], "TechArticle");
    }

    #[test]
    fn test_root_index_without_layout_is_home() {
        let config = config();
        let cache = PostCache::with_posts(&config, vec![post("a", &[])]);
        let page = Page::new("index.md", FrontMatter::default(), String::new());

        let data = StructuredData::new(&cache).for_page(&page).unwrap();
        assert_eq!(data["url"], "https://blog.example.com");
        assert_eq!(data["blogPosts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_article_fields() {
        let config = config();
        let cache = PostCache::with_posts(&config, vec![post("a", &["x"])]);

        let data = StructuredData::new(&cache)
            .for_page(&post_page("a", "About a"))
            .unwrap();
        assert_eq!(data["@type"], "TechArticle");
        assert_eq!(data["url"], "https://blog.example.com/posts/a.html");
        assert_eq!(data["mainEntityOfPage"], "https://blog.example.com/posts/a.html");
        assert_eq!(data["headline"], "a");
        assert_eq!(data["abstract"], "About a");
        assert_eq!(data["datePublished"], "2022-01-07T00:00:00.000Z");
        assert_eq!(data["keywords"], json!(["php"]));
        assert_eq!(data["inLanguage"], "en");
        assert_eq!(data["dependencies"], json!(["x"]));
        assert_eq!(data["author"], data["publisher"]);
        assert!(!data.contains_key("proficiencyLevel"));
    }

    #[test]
    fn test_empty_dependencies_omitted() {
        let config = config();
        let cache = PostCache::with_posts(&config, vec![post("a", &[])]);

        let data = StructuredData::new(&cache)
            .for_page(&post_page("a", "About a"))
            .unwrap();
        assert_eq!(data["@type"], "TechArticle");
        assert!(!data.contains_key("dependencies"));
    }

    #[test]
    fn test_language_and_proficiency() {
        let config = config();
        let mut fr = post("a", &[]);
        fr.lang = Some("fr".into());
        fr.proficiency_level = Some("Expert".into());
        let mut blank = post("b", &[]);
        blank.proficiency_level = Some(String::new());
        let cache = PostCache::with_posts(&config, vec![fr, blank]);
        let data = StructuredData::new(&cache);

        let a = data.for_page(&post_page("a", "About a")).unwrap();
        assert_eq!(a["inLanguage"], "fr");
        assert_eq!(a["proficiencyLevel"], "Expert");

        let b = data.for_page(&post_page("b", "About b")).unwrap();
        assert!(!b.contains_key("proficiencyLevel"));
    }

    #[test]
    fn test_no_match_falls_back_to_base() {
        let config = config();
        let cache = PostCache::with_posts(&config, vec![post("a", &[])]);

        let data = StructuredData::new(&cache)
            .for_page(&post_page("a", "A different summary"))
            .unwrap();
        assert_eq!(data["@type"], "Blog");
        assert!(!data.contains_key("headline"));
    }

    #[test]
    fn test_non_post_pages_never_load_posts() {
        let config = config();
        let cache = PostCache::new(&config);
        let page = Page::new("about.md", FrontMatter::default(), String::new());

        StructuredData::new(&cache).for_page(&page).unwrap();
        assert!(!cache.is_loaded());
    }
}
