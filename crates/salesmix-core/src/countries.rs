//! Francophone / other classification of customer country codes.

use std::collections::HashSet;

/// ISO 3166-1 alpha-2 codes counted as francophone markets: France, Belgium,
/// Switzerland, New Caledonia, Canada and Luxembourg.
pub const FRANCOPHONE_CODES: [&str; 6] = ["fr", "be", "ch", "nc", "ca", "lu"];

/// Lowercase and trim a raw country code.
///
/// ```
/// use salesmix_core::countries::normalize_country_code;
///
/// assert_eq!(normalize_country_code(" FR "), "fr");
/// assert_eq!(normalize_country_code(""), "");
/// ```
pub fn normalize_country_code(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Classifies country codes against a fixed in-group set.
///
/// The set is normalized once at construction and never changes afterwards.
#[derive(Debug, Clone)]
pub struct CountryClassifier {
    codes: HashSet<String>,
}

impl CountryClassifier {
    /// Build a classifier for an arbitrary set of codes.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|c| normalize_country_code(c.as_ref()))
                .collect(),
        }
    }

    /// Classifier for [`FRANCOPHONE_CODES`].
    pub fn francophone() -> Self {
        Self::new(FRANCOPHONE_CODES)
    }

    /// `true` when `code` (raw or normalized) belongs to the set.
    ///
    /// Empty or malformed codes never match.
    pub fn is_francophone(&self, code: &str) -> bool {
        self.codes.contains(&normalize_country_code(code))
    }
}

impl Default for CountryClassifier {
    fn default() -> Self {
        Self::francophone()
    }
}

/// Shorthand for `CountryClassifier::francophone().is_francophone(code)`.
pub fn is_francophone(code: &str) -> bool {
    let normalized = normalize_country_code(code);
    FRANCOPHONE_CODES.contains(&normalized.as_str())
}
