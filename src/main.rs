//! quire - a static blog builder for Markdown posts.

mod build;
mod cli;
mod config;
mod content;
mod generator;
mod init;
mod logger;
mod utils;

use anyhow::{Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use content::{PostCache, TagIndex, filter_by_tag};
use init::new_site;
use std::{path::Path, process::ExitCode};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Init { name } => new_site(&config, name.is_some()),
        Commands::Build { .. } => {
            let stats = build_site(&config)?;
            log!(
                "build";
                "done: {} pages, {} posts, {} tags -> {}",
                stats.pages,
                stats.posts,
                stats.tags,
                config.build.output.display()
            );
            Ok(())
        }
        Commands::Tags { tag } => print_tags(&config, tag.as_deref()),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() && !cli.is_init() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

/// `quire tags [TAG]`: the tag index, or the posts carrying `tag`.
fn print_tags(config: &SiteConfig, tag: Option<&str>) -> Result<()> {
    let cache = PostCache::new(config);
    let posts = cache.posts()?;

    match tag {
        None => {
            let tags = TagIndex::from_posts(posts);
            if tags.is_empty() {
                log!("tags"; "no tags");
            }
            for (tag, count) in tags.iter() {
                log!("tags"; "{tag} ({count})");
            }
        }
        Some(tag) => {
            let matching = filter_by_tag(posts, tag);
            let count = TagIndex::from_posts(posts).get(tag).unwrap_or(0);
            log!("tags"; "{count} posts tagged `{tag}`");
            for post in matching {
                log!("tags"; "{}  {}  {}", post.date.string, post.title, post.url);
            }
        }
    }
    Ok(())
}
