//! Site initialization module.
//!
//! Creates a new site with a default configuration and starter content.

use crate::config::SiteConfig;
use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore"];

/// Default config filename
const CONFIG_FILE: &str = "quire.toml";

/// Starter content, relative to the content directory
const STARTER_PAGES: &[(&str, &str)] = &[
    ("index.md", "---\nlayout: home\n---\n\n# Latest posts\n"),
    ("tags.md", "---\nlayout: tags\ntitle: Tags\n---\n"),
    (
        "404.md",
        "---\ntitle: Page not found\n---\n\nThere is nothing here.\n",
    ),
];

/// Create a new site with default structure
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Without a name the site is created in place, which must be empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `quire init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_default_config(root)?;
    init_content(&root.join("content"))?;
    init_ignored_files(root, &["/public"])?;

    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Config written by `init`: defaults plus placeholder site identity.
fn starter_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.base.title = "My Blog".into();
    config.base.description = "My Personal Blog".into();
    config.base.url = Some("https://example.com".into());
    config
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let path = root.join(CONFIG_FILE);
    if path.exists() {
        bail!(
            "Path `{}` already exists. Try `quire init <SITE_NAME>` instead.",
            path.display()
        );
    }
    fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;
    let content = toml::to_string_pretty(&starter_config())?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the starter pages and a first post
fn init_content(content: &Path) -> Result<()> {
    fs::create_dir_all(content.join("posts"))
        .with_context(|| format!("Failed to create {}", content.display()))?;

    for (relative, text) in STARTER_PAGES {
        fs::write(content.join(relative), text)?;
    }

    let today = Utc::now().format("%Y-%m-%d");
    let post = format!(
        "---\ntitle: Hello World\nsummary: The first post of this blog\ndate: {today}\ntags: [meta]\n---\n\nWrite something here.\n"
    );
    fs::write(content.join("posts/hello-world.md"), post)?;
    Ok(())
}

/// Initialize ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&str]) -> Result<()> {
    let content = paths.join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}
