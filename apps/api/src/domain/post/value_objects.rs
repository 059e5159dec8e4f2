use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref UNSAFE_FILE_CHARS: regex::Regex = regex::Regex::new(r"[^a-zA-Z0-9._-]+").unwrap();
    static ref NON_SLUG_CHARS: regex::Regex = regex::Regex::new(r"[^a-z0-9]+").unwrap();
}

pub const MAX_CAPTION_CHARS: usize = 2200;

/// Words of the caption kept in a slug.
const SLUG_WORDS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Caption {
    #[validate(length(max = 2200))]
    pub value: String,
}

impl Caption {
    /// Trims surrounding whitespace; an empty caption is allowed.
    pub fn new(value: &str) -> Result<Self, validator::ValidationErrors> {
        let caption = Self {
            value: value.trim().to_string(),
        };
        caption.validate()?;
        Ok(caption)
    }
}

/// File name made safe for use inside an object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeFileName(String);

impl SafeFileName {
    pub fn new(raw: &str) -> Self {
        let cleaned = UNSAFE_FILE_CHARS.replace_all(raw.trim(), "_").to_string();
        if cleaned.trim_matches(|c| c == '_' || c == '.').is_empty() {
            Self("upload".to_string())
        } else {
            Self(cleaned)
        }
    }

    /// Replaces (or appends) the extension.
    pub fn with_extension(&self, ext: &str) -> Self {
        let stem = match self.0.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => self.0.as_str(),
        };
        Self(format!("{}.{}", stem, ext))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// URL slug derived from the first words of a caption plus a short id suffix,
/// e.g. `sunny-nap-on-the-porch-3f9a1c2b`.
pub fn slug_for(caption: &str, id: Uuid) -> String {
    let lowered = caption.to_lowercase();
    let words: Vec<&str> = NON_SLUG_CHARS
        .split(&lowered)
        .filter(|w| !w.is_empty())
        .take(SLUG_WORDS)
        .collect();

    // The tail of a v7 id is random; the head is a timestamp shared by
    // posts created in the same millisecond.
    let simple = id.simple().to_string();
    let suffix = &simple[simple.len() - 8..];

    if words.is_empty() {
        format!("post-{}", suffix)
    } else {
        format!("{}-{}", words.join("-"), suffix)
    }
}
