//! Municipality name normalization and URL slugs.
//!
//! The consumption dataset and the boundary dataset do not always spell a
//! municipality the same way. CBS disambiguates duplicate names with a
//! parenthetical province suffix ("Hengelo (Gelderland)"), while the
//! boundary file may or may not carry the same suffix. Both sides are
//! reduced to a normalized name before they are joined.
//!
//! The suffix list is a closed table. A name carrying a suffix that is not
//! in the table keeps it, and its join silently fails.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Suffixes stripped by [`normalize_municipality_name`].
pub const DEFAULT_SUFFIXES: &[&str] = &[
    " (gemeente)",
    " (Utrecht)",
    " (Groningen)",
    " (Limburg)",
    " (Friesland)",
    " (Noord-Brabant)",
    " (Gelderland)",
    " (Noord-Holland)",
    " (Zuid-Holland)",
    " (Overijssel)",
];

/// Apostrophe variants dropped before slugging ('s-Hertogenbosch, ’s-Gravenhage).
const APOSTROPHES: &[char] = &[
    '\'', '\u{2018}', '\u{2019}', '\u{201B}', '\u{02BC}', '`', '\u{00B4}',
];

/// Table of disambiguation suffixes used to build normalized names.
///
/// Serializes as a plain JSON array of strings so the table can be
/// supplied from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SuffixTable {
    suffixes: Vec<String>,
}

impl Default for SuffixTable {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIXES.iter().copied())
    }
}

impl From<Vec<String>> for SuffixTable {
    fn from(suffixes: Vec<String>) -> Self {
        Self::new(suffixes)
    }
}

impl From<SuffixTable> for Vec<String> {
    fn from(table: SuffixTable) -> Self {
        table.suffixes
    }
}

impl SuffixTable {
    /// Build a table from the given suffixes.
    ///
    /// Blank entries are dropped: they would match every name.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suffixes = suffixes
            .into_iter()
            .map(Into::<String>::into)
            .filter(|s| !s.trim().is_empty())
            .collect();
        Self { suffixes }
    }

    /// A table that strips nothing; normalization only trims.
    pub fn empty() -> Self {
        Self {
            suffixes: Vec::new(),
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Add a suffix to the table (ignored if blank or already present).
    pub fn push(&mut self, suffix: impl Into<String>) {
        let suffix = suffix.into();
        if !suffix.trim().is_empty() && !self.suffixes.contains(&suffix) {
            self.suffixes.push(suffix);
        }
    }

    /// Strip every listed suffix from the end of `name` and trim whitespace.
    ///
    /// Stripping repeats until no suffix matches, so the result is a fixed
    /// point: normalizing it again returns it unchanged, and the order of
    /// the table does not matter.
    pub fn normalize(&self, name: &str) -> String {
        let mut current = name.trim();
        while let Some(rest) = self
            .suffixes
            .iter()
            .find_map(|suffix| current.strip_suffix(suffix.as_str()))
        {
            current = rest.trim();
        }
        current.to_string()
    }
}

impl SuffixTable {
    /// Shared instance of [`SuffixTable::default`].
    pub fn builtin() -> &'static SuffixTable {
        static TABLE: OnceLock<SuffixTable> = OnceLock::new();
        TABLE.get_or_init(SuffixTable::default)
    }
}

/// Normalize a municipality display name with the default suffix table.
pub fn normalize_municipality_name(name: &str) -> String {
    SuffixTable::builtin().normalize(name)
}

/// Turn a display name into a URL identifier.
///
/// Lower-cases, drops apostrophes, transliterates to ASCII and collapses
/// every run of other characters into one hyphen. The result never starts
/// or ends with a hyphen ("Súdwest-Fryslân" becomes "sudwest-fryslan").
pub fn slugify(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !APOSTROPHES.contains(c)).collect();
    let ascii = deunicode::deunicode(&stripped).to_ascii_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    // Transliteration can turn other marks into ASCII apostrophes.
    for c in ascii.chars().filter(|c| *c != '\'') {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
