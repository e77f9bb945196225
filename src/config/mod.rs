//! Site configuration management for `quire.toml`.
//!
//! # Sections
//!
//! | Section            | Purpose                                       |
//! |--------------------|-----------------------------------------------|
//! | `[base]`           | Site metadata (title, author, url)            |
//! | `[build]`          | Directories, posts glob, minification         |
//! | `[build.rss]`      | Feed output                                   |
//! | `[build.sitemap]`  | Sitemap output and excluded paths             |
//! | `[build.date]`     | Default locale and display offset for dates   |
//! | `[build.og]`       | Open Graph image template                     |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "My Blog"
//! description = "A personal blog"
//! url = "https://example.com"
//!
//! [build]
//! content = "content"
//! output = "public"
//!
//! [build.og]
//! image = "https://og.example.com/api?title={title}"
//! ```

mod base;
mod build;
pub mod defaults;
mod error;

pub use build::DateConfig;
pub use error::ConfigError;

use base::BaseConfig;
use build::BuildConfig;

use crate::{
    cli::{Cli, Commands},
    utils::date::parse_offset,
};
use anyhow::{Result, bail};
use educe::Educe;
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing quire.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Base URL without trailing slash, empty when unset.
    pub fn base_url(&self) -> &str {
        self.base
            .url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
    }

    /// Join a site-relative URL path onto the base URL.
    pub fn absolute_url(&self, url_path: &str) -> String {
        format!("{}/{}", self.base_url(), url_path.trim_start_matches('/'))
    }

    /// Whether a content-relative path belongs to the posts section.
    pub fn is_post_path(&self, relative: &str) -> bool {
        relative.starts_with(&self.build.posts_path)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.update_path_with_root(&root, &cli.config);

        if let Commands::Build { build_args } = &cli.command {
            self.build.clean |= build_args.clean;
            Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
            Self::update_option(&mut self.build.rss.enable, build_args.rss.as_ref());
            Self::update_option(&mut self.build.sitemap.enable, build_args.sitemap.as_ref());
            if let Some(url) = &build_args.base_url {
                self.base.url = Some(url.clone());
            }
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve all paths against the root directory as absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_name: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_name));
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before a build
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        let needs_url = self.build.rss.enable || self.build.sitemap.enable;
        match &self.base.url {
            None if needs_url => bail!(ConfigError::Validation(
                "[base.url] is required for rss and sitemap generation".into()
            )),
            Some(url) if !url.starts_with("http") => bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            )),
            _ => {}
        }

        if parse_offset(&self.build.date.display_offset).is_none() {
            bail!(ConfigError::Validation(format!(
                "[build.date.display_offset] `{}` is not an offset like +02:00",
                self.build.date.display_offset
            )));
        }

        if let Err(err) = Glob::new(&self.build.posts) {
            bail!(ConfigError::Validation(format!(
                "[build.posts] is not a valid glob: {err}"
            )));
        }

        if !self.build.posts_path.ends_with('/') {
            bail!(ConfigError::Validation(
                "[build.posts_path] must end with `/`".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
