//! Markdown rendering and page layouts.
//!
//! Markdown goes through `pulldown-cmark`; layouts are `maud` templates
//! selected by [`Layout`]. Styling is left to the site's own stylesheet.

use crate::{
    config::SiteConfig,
    content::{Layout, Page, Post, TagIndex},
    utils::slug::{tag_filter_url, tag_page_url},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html::push_html};

/// Hides posts that do not carry the tag named by the `t` query parameter.
const TAG_FILTER_SCRIPT: &str = r#"(function () {
  var tag = new URLSearchParams(window.location.search).get("t");
  if (!tag) return;
  document.querySelectorAll("article[data-tags]").forEach(function (post) {
    post.hidden = JSON.parse(post.dataset.tags).indexOf(tag) < 0;
  });
  document.querySelectorAll("[data-tag]").forEach(function (link) {
    if (link.dataset.tag === tag) link.setAttribute("aria-current", "true");
  });
})();"#;

/// Render Markdown to HTML with GFM-style extensions.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(markdown, options);

    let mut html = String::with_capacity(markdown.len() * 2);
    push_html(&mut html, parser);
    html
}

/// Site-wide data shared by every layout.
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    /// All posts, newest first
    pub posts: &'a [Post],
    pub tags: &'a TagIndex,
}

impl RenderContext<'_> {
    /// Render a content page. `head` is injected into `<head>` verbatim;
    /// `post` is the loaded post record of an article page, if any.
    pub fn page(&self, page: &Page, head: &str, post: Option<&Post>) -> String {
        let body = markdown_to_html(&page.body);
        let title = page.front.title.as_deref();

        let main = match page.layout {
            Layout::Home => html! {
                (PreEscaped(body))
                (post_list(self.posts.iter()))
            },
            Layout::Tags => html! {
                (PreEscaped(body))
                (tag_list(self.tags))
                (post_list(self.posts.iter()))
                script { (PreEscaped(TAG_FILTER_SCRIPT)) }
            },
            Layout::NotFound => html! {
                h1 { (title.unwrap_or("Page not found")) }
                (PreEscaped(body))
                p { a href="/" { "Take me home" } }
            },
            Layout::Article => html! {
                article {
                    @if let Some(title) = title {
                        h1 { (title) }
                    }
                    @if let Some(post) = post {
                        p class="post-meta" {
                            time datetime=(post.date.iso) { (post.date.string) }
                            (tag_links(post))
                        }
                    }
                    (PreEscaped(body))
                }
            },
        };

        let lang = post
            .and_then(|post| post.lang.as_deref())
            .or(page.front.lang.as_deref());
        self.document(title, lang, head, main)
    }

    /// Render the listing page of one tag.
    pub fn tag_page<'p>(&self, tag: &str, posts: impl IntoIterator<Item = &'p Post>) -> String {
        let title = format!("Posts tagged \u{201c}{tag}\u{201d}");
        let main = html! {
            h1 { (title) }
            (post_list(posts))
            p { a href=(tag_filter_url(tag)) { "All tags" } }
        };
        self.document(Some(title.as_str()), None, "", main)
    }

    fn document(&self, title: Option<&str>, lang: Option<&str>, head: &str, main: Markup) -> String {
        let config = self.config;
        let site_title = config.base.title.as_str();
        let full_title = match title {
            Some(title) if title != site_title => format!("{title} | {site_title}"),
            _ => site_title.to_owned(),
        };

        html! {
            (DOCTYPE)
            html lang=(lang.unwrap_or(config.base.language.as_str())) {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (full_title) }
                    (PreEscaped(head))
                    @if config.build.rss.enable {
                        link rel="alternate" type="application/rss+xml" title=(site_title)
                            href=(format!("/{}", config.build.rss.path.display()));
                    }
                }
                body {
                    header {
                        nav {
                            a href="/" { (site_title) }
                            " "
                            a href="/tags.html" { "Tags" }
                        }
                    }
                    main { (main) }
                }
            }
        }
        .into_string()
    }
}

/// Posts as `<article>` cards: title link, summary, date and tag links.
fn post_list<'p>(posts: impl IntoIterator<Item = &'p Post>) -> Markup {
    html! {
        section class="posts" {
            @for post in posts {
                article data-tags=(serde_json::to_string(&post.tags).unwrap_or_default()) {
                    header { a href=(post.url) { (post.title) } }
                    @if let Some(summary) = &post.summary {
                        section { p { (summary) } }
                    }
                    footer {
                        time datetime=(post.date.iso) { (post.date.string) }
                        (tag_links(post))
                    }
                }
            }
        }
    }
}

fn tag_links(post: &Post) -> Markup {
    html! {
        @for tag in &post.tags {
            " "
            a class="tag" href=(tag_filter_url(tag)) { (tag) }
        }
    }
}

/// Every tag with its count and a link to its own page.
fn tag_list(tags: &TagIndex) -> Markup {
    html! {
        ul class="tags" {
            @for (tag, count) in tags.iter() {
                li {
                    a href=(tag_filter_url(tag)) data-tag=(tag) { (tag) }
                    " (" (count) ") "
                    a href=(tag_page_url(tag)) title=(format!("Page of {tag}")) { "#" }
                }
            }
        }
    }
}
