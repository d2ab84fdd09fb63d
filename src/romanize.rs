//! Tone-neutral pinyin keys for color names and the curated override table.

use indexmap::IndexMap;
use pinyin::ToPinyin;
use serde::Deserialize;

/// Curated name -> key pairs breaking collisions between default keys.
const BUILTIN_OVERRIDES: &[(&str, &str)] = &[
    ("殷紅", "yinhong1"),
    ("銀紅", "yinhong2"),
    ("絳紫", "jiangzi1"),
    ("醬紫", "jiangzi2"),
    ("緇色", "zise1"),
    ("紫色", "zise2"),
    ("黧", "li1"),
    ("黎", "li2"),
];

/// Hand-maintained mapping from display name to romanized key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RomanizationOverrides {
    keys: IndexMap<String, String>,
}

impl RomanizationOverrides {
    /// An empty table: every name uses its default key.
    pub fn empty() -> Self {
        Self {
            keys: IndexMap::new(),
        }
    }

    /// Curated override for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.keys.get(name).map(String::as_str)
    }

    /// Key for `name`: the curated override, else `default_key`.
    pub fn resolve<'a>(&'a self, name: &str, default_key: &'a str) -> &'a str {
        self.get(name).unwrap_or(default_key)
    }

    /// Number of curated names.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no name is curated.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for RomanizationOverrides {
    fn default() -> Self {
        BUILTIN_OVERRIDES.iter().copied().collect()
    }
}

impl<N: Into<String>, K: Into<String>> FromIterator<(N, K)> for RomanizationOverrides {
    fn from_iter<I: IntoIterator<Item = (N, K)>>(iter: I) -> Self {
        let keys = iter
            .into_iter()
            .map(|(name, key)| (name.into(), key.into()))
            .collect();
        Self { keys }
    }
}

/// Concatenate the toneless reading of every character of `name`.
///
/// Characters without a reading are kept as-is, and `ü` is spelled `v` so keys
/// stay ASCII.
pub fn default_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len() * 2);
    for c in name.chars() {
        match c.to_pinyin() {
            Some(reading) => key.extend(reading.plain().chars().map(|c| match c {
                'ü' => 'v',
                other => other,
            })),
            None => key.push(c),
        }
    }
    key
}
