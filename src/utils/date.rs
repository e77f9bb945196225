//! Post date parsing and formatting.
//!
//! A raw front-matter date becomes a [`PostDate`]: epoch milliseconds, an
//! ISO-8601 string and a long-form display string in the post's locale.
//!
//! # Noon normalization
//!
//! Date-only values parse to midnight UTC. Rendered in an offset west of UTC
//! that instant falls on the previous day, so by default the display string
//! is computed from 12:00 UTC of the same calendar day. `time` and `iso` are
//! never touched by this.

use crate::config::DateConfig;
use chrono::{
    DateTime, FixedOffset, Locale, NaiveDate, NaiveDateTime, Offset, SecondsFormat, Utc,
};
use serde::Serialize;
use std::time::SystemTime;
use thiserror::Error;

/// Naive layouts accepted after RFC 3339, interpreted as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unparseable date `{0}`")]
    Unparseable(String),

    #[error("invalid display offset `{0}`")]
    Offset(String),
}

/// Structured post date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDate {
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    /// RFC 3339 in UTC with millisecond precision, e.g. `2022-01-07T00:00:00.000Z`.
    pub iso: String,
    /// Locale-aware long form, e.g. `January 7, 2022`.
    pub string: String,
}

impl PostDate {
    /// The instant as a UTC datetime.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }

    /// RFC 2822 form for rss `pubDate`.
    pub fn to_rfc2822(&self) -> Option<String> {
        self.to_utc().map(|dt| dt.to_rfc2822())
    }
}

/// Turns raw date strings into [`PostDate`] values.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    default_locale: String,
    offset: FixedOffset,
    noon: bool,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            default_locale: "en-US".into(),
            offset: Utc.fix(),
            noon: true,
        }
    }
}

impl DateFormatter {
    pub fn new(default_locale: impl Into<String>, offset: FixedOffset, noon: bool) -> Self {
        Self {
            default_locale: default_locale.into(),
            offset,
            noon,
        }
    }

    pub fn from_config(config: &DateConfig) -> Result<Self, DateError> {
        let offset = parse_offset(&config.display_offset)
            .ok_or_else(|| DateError::Offset(config.display_offset.clone()))?;
        Ok(Self::new(config.locale.clone(), offset, config.noon))
    }

    /// Format `raw` for a post, using `lang` when set and non-empty.
    pub fn format(&self, raw: &str, lang: Option<&str>) -> Result<PostDate, DateError> {
        let instant = parse_date(raw)?;
        Ok(PostDate {
            time: instant.timestamp_millis(),
            iso: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            string: self.display(instant, lang),
        })
    }

    fn display(&self, instant: DateTime<Utc>, lang: Option<&str>) -> String {
        let instant = if self.noon {
            instant
                .date_naive()
                .and_hms_opt(12, 0, 0)
                .map_or(instant, |noon| noon.and_utc())
        } else {
            instant
        };

        let tag = lang
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(self.default_locale.as_str());
        let style = LongDate::for_tag(tag);

        instant
            .with_timezone(&self.offset)
            .format_localized(style.pattern, style.locale)
            .to_string()
    }
}

/// Parse a raw front-matter date.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, and the naive layouts in
/// [`NAIVE_LAYOUTS`] (UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, DateError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateError::Unparseable(raw.to_owned()))
}

/// Parse `Z`, `+HH:MM`, `-HH:MM` or `+HHMM`.
pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") {
        return Some(Utc.fix());
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => return None,
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// `YYYY-MM-DD` of a file timestamp, in UTC.
pub fn ymd(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y-%m-%d").to_string()
}

/// Long-form date layout of a locale.
struct LongDate {
    locale: Locale,
    pattern: &'static str,
}

impl LongDate {
    const fn new(locale: Locale, pattern: &'static str) -> Self {
        Self { locale, pattern }
    }

    /// Resolve a BCP 47 tag. Unknown languages render as en-US.
    fn for_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase().replace('_', "-");
        let primary = tag.split('-').next().unwrap_or_default();

        match (primary, tag.as_str()) {
            (_, "en-gb" | "en-au" | "en-ie" | "en-nz") => Self::new(Locale::en_GB, "%-d %B %Y"),
            ("fr", _) => Self::new(Locale::fr_FR, "%-d %B %Y"),
            ("de", _) => Self::new(Locale::de_DE, "%-d. %B %Y"),
            ("es", _) => Self::new(Locale::es_ES, "%-d de %B de %Y"),
            ("pt", _) => Self::new(Locale::pt_PT, "%-d de %B de %Y"),
            ("it", _) => Self::new(Locale::it_IT, "%-d %B %Y"),
            ("nl", _) => Self::new(Locale::nl_NL, "%-d %B %Y"),
            ("ja", _) => Self::new(Locale::ja_JP, "%Y年%-m月%-d日"),
            ("zh", _) => Self::new(Locale::zh_CN, "%Y年%-m月%-d日"),
            _ => Self::new(Locale::en_US, "%B %-d, %Y"),
        }
    }
}
