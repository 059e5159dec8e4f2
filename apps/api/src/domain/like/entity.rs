use std::fmt;
use uuid::Uuid;

/// Longest device identifier accepted from a cookie.
const MAX_DEVICE_ID_LEN: usize = 64;

/// Anonymous per-browser identifier carried in the device cookie.
///
/// Only used to deduplicate likes; it grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts a cookie value if it looks like something we minted.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let well_formed = !raw.is_empty()
            && raw.len() <= MAX_DEVICE_ID_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        well_formed.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
