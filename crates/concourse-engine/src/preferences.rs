//! Startup preference lookup.
//!
//! Preferences are read once at engine construction and never watched;
//! changing a preference takes effect on the next session. The engine
//! reads `share_location` at startup and exposes it to the host, which
//! decides whether to forward the local player's movement off-process
//! (the local feeds keep flowing either way).

use std::collections::BTreeMap;

use tracing::debug;

/// Preference key for broadcasting the local player's position.
pub const SHARE_LOCATION: &str = "share_location";

/// A read-only string key-value store seeded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// Build preferences from a configuration map.
    pub const fn from_map(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Raw string value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Boolean value for a key. Accepts `true`/`false`, `yes`/`no`, and
    /// `1`/`0` (case-insensitive); anything else is `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            other => {
                debug!(key, value = other, "unparseable boolean preference");
                None
            }
        }
    }

    /// The `share_location` preference; absent or unparseable means on.
    pub fn share_location(&self) -> bool {
        self.get_bool(SHARE_LOCATION).unwrap_or(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn prefs(pairs: &[(&str, &str)]) -> Preferences {
        Preferences::from_map(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        let p = prefs(&[("a", "true"), ("b", "NO"), ("c", "1"), ("d", "maybe")]);
        assert_eq!(p.get_bool("a"), Some(true));
        assert_eq!(p.get_bool("b"), Some(false));
        assert_eq!(p.get_bool("c"), Some(true));
        assert_eq!(p.get_bool("d"), None);
        assert_eq!(p.get_bool("missing"), None);
    }

    #[test]
    fn share_location_defaults_on() {
        assert!(Preferences::default().share_location());
        assert!(!prefs(&[(SHARE_LOCATION, "false")]).share_location());
        assert!(prefs(&[(SHARE_LOCATION, "garbage")]).share_location());
    }
}
