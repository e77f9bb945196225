//! YAML front-matter.
//!
//! ```markdown
//! ---
//! title: Doctrine, setMaxResults() and join relationships
//! summary: Why a LIMIT does not do what you expect with fetch joins
//! date: 2022-01-07
//! tags: [php, doctrine]
//! dependencies: ["PHP 8.1", "Doctrine ORM 2.10"]
//! proficiencyLevel: Expert
//! ---
//!
//! Body…
//! ```

use serde::Deserialize;

/// Front-matter fields the build understands. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub lang: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(rename = "proficiencyLevel")]
    pub proficiency_level: Option<String>,
    /// Layout override: `home` or `tags`.
    pub layout: Option<String>,
}

impl FrontMatter {
    /// `summary`, falling back to `description`.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref().or(self.description.as_deref())
    }
}

/// Split a document into its YAML block and Markdown body.
///
/// Returns `None` when the document does not open with a `---` line or the
/// block is never closed.
pub fn split(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = source.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a document. `Ok(None)` means it has no front-matter block.
pub fn parse(source: &str) -> Result<Option<(FrontMatter, &str)>, serde_yaml::Error> {
    let Some((yaml, body)) = split(source) else {
        return Ok(None);
    };
    let front = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    Ok(Some((front, body)))
}
