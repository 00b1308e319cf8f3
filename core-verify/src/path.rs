//! Path normalization.
//!
//! Turns a raw store key (`proj123/sub/b.txt`, `/runs/sub/b.txt`) into the
//! canonical relative path both listings are joined on (`sub/b.txt`):
//! case-sensitive, `/`-separated, no leading or trailing separator.

/// Path separator shared by both stores
pub const SEPARATOR: char = '/';

/// Result of normalizing one raw key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Prefix stripped (or no prefix requested)
    Canonical(String),
    /// A prefix was requested but the key does not live under it; the key is
    /// passed through with only its leading separators removed
    PrefixMismatch(String),
    /// Folder placeholder or empty basename; never reconciled
    DirectoryMarker,
}

impl Normalized {
    /// The path to record, if any
    pub fn into_path(self) -> Option<String> {
        match self {
            Normalized::Canonical(path) | Normalized::PrefixMismatch(path) => Some(path),
            Normalized::DirectoryMarker => None,
        }
    }
}

/// Normalize `raw_key`, stripping `strip_prefix` when the key lives under it.
///
/// Prefix matching respects separators: prefix `a` strips `a/b.txt` but not
/// `ab/c.txt`. Leading and trailing separators on the prefix are ignored.
/// Normalizing an already-canonical path returns it unchanged.
///
/// ```
/// use core_verify::path::{normalize, Normalized};
///
/// assert_eq!(
///     normalize("proj123/b.txt", Some("proj123/")),
///     Normalized::Canonical("b.txt".to_string())
/// );
/// assert_eq!(normalize("proj123/sub/", Some("proj123")), Normalized::DirectoryMarker);
/// ```
pub fn normalize(raw_key: &str, strip_prefix: Option<&str>) -> Normalized {
    if raw_key.is_empty() || raw_key.ends_with(SEPARATOR) {
        return Normalized::DirectoryMarker;
    }

    let key = raw_key.trim_start_matches(SEPARATOR);
    if key.is_empty() {
        return Normalized::DirectoryMarker;
    }

    let prefix = strip_prefix
        .map(|p| p.trim_matches(SEPARATOR))
        .filter(|p| !p.is_empty());

    let Some(prefix) = prefix else {
        return Normalized::Canonical(key.to_string());
    };

    match key.strip_prefix(prefix) {
        Some("") => Normalized::DirectoryMarker,
        Some(rest) if rest.starts_with(SEPARATOR) => {
            Normalized::Canonical(rest.trim_start_matches(SEPARATOR).to_string())
        }
        _ => Normalized::PrefixMismatch(key.to_string()),
    }
}
