//! Everything the build writes besides copied static files.
//!
//! Per page, [`jsonld`] and [`head`] produce the tags injected into `<head>`
//! and [`render`] produces the HTML document. Across pages, [`sitemap`] and
//! [`rss`] accumulate entries and write their document once at the end:
//!
//! ```text
//! Collecting ──finish()──► Finalizing ──flush ok──► Done
//!     ▲  │
//!     └──┘ record()
//! ```

pub mod head;
pub mod jsonld;
pub mod render;
pub mod rss;
pub mod sitemap;

pub use head::head_tags;
pub use jsonld::StructuredData;
pub use rss::FeedBuilder;
pub use sitemap::SitemapBuilder;

use std::io::{self, Write};
use thiserror::Error;

/// Errors of the sitemap and feed builders.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{0}: cannot record entries after finish()")]
    Finalized(&'static str),

    #[error("{0}: finish() called twice")]
    AlreadyFinished(&'static str),

    #[error("{0}: invalid document: {1}")]
    Invalid(&'static str, String),

    #[error("{0}: write failed")]
    Write(&'static str, #[source] io::Error),
}

/// Lifecycle of an accumulating builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Collecting,
    Finalizing,
    Done,
}

impl Phase {
    /// Error unless entries may still be recorded.
    fn ensure_collecting(self, name: &'static str) -> Result<(), OutputError> {
        match self {
            Self::Collecting => Ok(()),
            _ => Err(OutputError::Finalized(name)),
        }
    }

    /// Move to `Finalizing`; only valid from `Collecting`.
    fn begin_finish(&mut self, name: &'static str) -> Result<(), OutputError> {
        match self {
            Self::Collecting => {
                *self = Self::Finalizing;
                Ok(())
            }
            _ => Err(OutputError::AlreadyFinished(name)),
        }
    }
}

/// Write a serialized document and wait for the flush.
fn write_document(
    name: &'static str,
    mut writer: impl Write,
    bytes: &[u8],
) -> Result<(), OutputError> {
    writer
        .write_all(bytes)
        .and_then(|()| writer.flush())
        .map_err(|err| OutputError::Write(name, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let mut phase = Phase::default();
        assert!(phase.ensure_collecting("sitemap").is_ok());
        assert!(phase.begin_finish("sitemap").is_ok());
        assert_eq!(phase, Phase::Finalizing);
        assert!(matches!(
            phase.ensure_collecting("sitemap"),
            Err(OutputError::Finalized("sitemap"))
        ));
        assert!(matches!(
            phase.begin_finish("sitemap"),
            Err(OutputError::AlreadyFinished("sitemap"))
        ));
    }

    /// Accepts writes but fails on flush.
    pub(super) struct FailingFlush;

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_write_document_reports_flush_failure() {
        let err = write_document("rss", FailingFlush, b"<rss/>").unwrap_err();
        assert!(matches!(err, OutputError::Write("rss", _)));
        assert_eq!(err.to_string(), "rss: write failed");
    }
}
