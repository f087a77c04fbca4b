// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::{NoteId, UserId, ValidationError};
use crate::constants::{DEFAULT_XSEC_SOURCE, WEB_ORIGIN};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Session cookies copied from a logged-in browser, the only credential the web API takes.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    raw: String,
    pairs: Vec<(String, String)>,
}

impl Credentials {
    /// Parses a `name=value; name2=value2` cookie header string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("cookies"));
        }

        let mut pairs = Vec::new();
        for segment in trimmed.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((name, value)) = segment.split_once('=') else {
                return Err(ValidationError::InvalidCookies {
                    reason: format!("segment without '=': {}", segment),
                });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::InvalidCookies {
                    reason: "cookie with an empty name".to_string(),
                });
            }
            pairs.push((name.to_string(), value.trim().to_string()));
        }

        if pairs.is_empty() {
            return Err(ValidationError::EmptyField("cookies"));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            pairs,
        })
    }

    /// The cookie string as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Name/value pairs in their original order.
    pub fn cookies(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Looks up one cookie by name (e.g. `a1`, `web_session`).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are secrets; only names are shown
        let names: Vec<&str> = self.pairs.iter().map(|(n, _)| n.as_str()).collect();
        write!(f, "cookies[{}]", names.join(", "))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials({})", self)
    }
}

/// A user together with the access tokens their profile link carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub xsec_token: String,
    pub xsec_source: String,
}

impl UserRef {
    /// Parses a profile URL (`https://www.xiaohongshu.com/user/profile/<id>?xsec_token=..`)
    /// or a bare user id.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if !is_url(input) {
            return Ok(Self {
                id: UserId::parse(input)?,
                xsec_token: String::new(),
                xsec_source: DEFAULT_XSEC_SOURCE.to_string(),
            });
        }

        let link = ObjectLink::parse(input)?;
        Ok(Self {
            id: UserId::parse(&link.id)?,
            xsec_token: link.xsec_token.unwrap_or_default(),
            xsec_source: link
                .xsec_source
                .unwrap_or_else(|| DEFAULT_XSEC_SOURCE.to_string()),
        })
    }
}

/// A note together with the access token required to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRef {
    pub id: NoteId,
    pub xsec_token: String,
    pub xsec_source: String,
}

impl NoteRef {
    pub fn new(id: NoteId, xsec_token: impl Into<String>) -> Self {
        Self {
            id,
            xsec_token: xsec_token.into(),
            xsec_source: DEFAULT_XSEC_SOURCE.to_string(),
        }
    }

    /// Parses an explore URL (`https://www.xiaohongshu.com/explore/<id>?xsec_token=..`).
    ///
    /// The token is mandatory: detail and comment endpoints reject requests without it.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        let link = ObjectLink::parse(input)?;
        let xsec_token = link
            .xsec_token
            .ok_or_else(|| ValidationError::MissingParameter {
                url: input.to_string(),
                name: "xsec_token",
            })?;

        Ok(Self {
            id: NoteId::parse(&link.id)?,
            xsec_token,
            xsec_source: link
                .xsec_source
                .unwrap_or_else(|| DEFAULT_XSEC_SOURCE.to_string()),
        })
    }

    /// The public web URL of the note, including its access token.
    pub fn to_url(&self) -> String {
        let mut url = format!("{}/explore/{}", WEB_ORIGIN, self.id);
        url.push_str("?xsec_token=");
        url.push_str(&self.xsec_token);
        url.push_str("&xsec_source=");
        url.push_str(&self.xsec_source);
        url
    }
}

/// The pieces of a profile or note link.
struct ObjectLink {
    id: String,
    xsec_token: Option<String>,
    xsec_source: Option<String>,
}

impl ObjectLink {
    fn parse(input: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(input).map_err(|e| ValidationError::InvalidUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ValidationError::InvalidUrl {
                url: input.to_string(),
                reason: "Only HTTP and HTTPS URLs are supported".to_string(),
            });
        }

        let id = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(str::to_string)
            .ok_or_else(|| ValidationError::InvalidUrl {
                url: input.to_string(),
                reason: "URL path does not end with an ID".to_string(),
            })?;

        // Query values are kept exactly as written, without percent-decoding
        let mut xsec_token = None;
        let mut xsec_source = None;
        for pair in url.query().unwrap_or_default().split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "xsec_token" => xsec_token = Some(value.to_string()),
                "xsec_source" => xsec_source = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(Self {
            id,
            xsec_token,
            xsec_source: xsec_source.filter(|s| !s.is_empty()),
        })
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Ordering of search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    #[default]
    General,
    TimeDescending,
    PopularityDescending,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::TimeDescending => "time_descending",
            Self::PopularityDescending => "popularity_descending",
        }
    }
}

impl FromStr for SearchSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "general" => Ok(Self::General),
            "time_descending" | "time" => Ok(Self::TimeDescending),
            "popularity_descending" | "popularity" => Ok(Self::PopularityDescending),
            other => Err(ValidationError::InvalidOption {
                name: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of notes a search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteType {
    #[default]
    All,
    Video,
    Image,
}

impl NoteType {
    /// The numeric code the search endpoint expects.
    pub fn code(&self) -> u8 {
        match self {
            Self::All => 0,
            Self::Video => 1,
            Self::Image => 2,
        }
    }
}

impl FromStr for NoteType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" | "0" => Ok(Self::All),
            "video" | "1" => Ok(Self::Video),
            "image" | "2" => Ok(Self::Image),
            other => Err(ValidationError::InvalidOption {
                name: "note type",
                value: other.to_string(),
            }),
        }
    }
}

/// A keyword search with its ordering and type filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub sort: SearchSort,
    pub note_type: NoteType,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>) -> Result<Self, ValidationError> {
        let keyword = keyword.into();
        if keyword.trim().is_empty() {
            return Err(ValidationError::EmptyField("search keyword"));
        }
        Ok(Self {
            keyword,
            sort: SearchSort::default(),
            note_type: NoteType::default(),
        })
    }

    pub fn with_sort(self, sort: SearchSort) -> Self {
        Self { sort, ..self }
    }

    pub fn with_note_type(self, note_type: NoteType) -> Self {
        Self { note_type, ..self }
    }
}
