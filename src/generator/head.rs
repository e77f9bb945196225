//! Tags injected into each page's `<head>`.
//!
//! - `<meta name="description">`
//! - `<script type="application/ld+json">` with the page's structured data
//! - Open Graph and Twitter Card tags, for pages under the posts section

use crate::{config::SiteConfig, content::Page};
use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, Event},
};
use serde_json::{Map, Value};
use std::io::{Cursor, Write};

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Render the head tags of `page`.
pub fn head_tags(
    config: &SiteConfig,
    page: &Page,
    json_ld: &Map<String, Value>,
) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let description = page
        .front
        .summary()
        .unwrap_or(config.base.description.as_str());
    if !description.is_empty() {
        write_empty_elem(
            &mut writer,
            "meta",
            &[("name", "description"), ("content", description)],
        )?;
    }

    write_json_ld(&mut writer, json_ld)?;

    if config.is_post_path(&page.relative) {
        write_social_tags(&mut writer, config, page)?;
    }

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

/// `og:*` and `twitter:*` meta tags of an article page.
fn write_social_tags(writer: &mut XmlWriter, config: &SiteConfig, page: &Page) -> Result<()> {
    let title = page.front.title.as_deref().unwrap_or(config.base.title.as_str());
    let description = page.front.summary().unwrap_or_default();
    let url = config.absolute_url(&page.url_path());
    let image = config.build.og.image_for(title);

    let mut og = vec![
        ("og:type", "article"),
        ("og:site_name", config.base.title.as_str()),
        ("og:title", title),
        ("og:url", url.as_str()),
    ];
    if !description.is_empty() {
        og.push(("og:description", description));
    }
    if let Some(image) = &image {
        og.push(("og:image", image.as_str()));
    }
    for (property, content) in og {
        write_empty_elem(writer, "meta", &[("property", property), ("content", content)])?;
    }

    let card = if image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };
    let mut twitter = vec![("twitter:card", card), ("twitter:title", title)];
    if !description.is_empty() {
        twitter.push(("twitter:description", description));
    }
    if let Some(image) = &image {
        twitter.push(("twitter:image", image.as_str()));
    }
    if let Some(site) = &config.build.og.twitter_site {
        twitter.push(("twitter:site", site.as_str()));
    }
    for (name, content) in twitter {
        write_empty_elem(writer, "meta", &[("name", name), ("content", content)])?;
    }

    Ok(())
}

/// Write the JSON-LD script. The JSON is written raw; `</` is escaped so the
/// data cannot close the script element.
fn write_json_ld(writer: &mut XmlWriter, json_ld: &Map<String, Value>) -> Result<()> {
    let json = serde_json::to_string(json_ld)?.replace("</", "<\\/");

    let mut script = BytesStart::new("script");
    script.push_attribute(("type", "application/ld+json"));
    writer.write_event(Event::Start(script))?;
    writer.get_mut().write_all(json.as_bytes())?;
    writer.write_event(Event::End(BytesEnd::new("script")))?;
    Ok(())
}

/// Write an empty element with attributes: `<tag attr1="val1" ... />`.
fn write_empty_elem(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}
