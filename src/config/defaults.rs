//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }

    pub fn email() -> String {
        "user@noreply.quire".into()
    }

    pub fn language() -> String {
        "en-US".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn posts() -> String {
        "posts/*.md".into()
    }

    pub fn posts_path() -> String {
        "posts/".into()
    }

    pub fn exclude() -> Vec<String> {
        vec!["**/node_modules/**".into(), "**/dist/**".into()]
    }

    pub mod rss {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "rss.xml".into()
        }
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }

        pub fn exclude() -> Vec<String> {
            vec!["posts-assets/".into(), "_posts_assets/".into()]
        }
    }

    pub mod date {
        pub fn locale() -> String {
            "en-US".into()
        }

        pub fn display_offset() -> String {
            "+00:00".into()
        }
    }
}
