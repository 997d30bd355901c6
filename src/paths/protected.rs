use glob::Pattern;
use std::path::Path;

/// Default protected prefixes: reserved system trees that must survive any
/// user selection.
const DEFAULT_PREFIXES: [&str; 7] = [
    "/system",
    "/data/system",
    "/proc",
    "/sys",
    "/dev",
    "/vendor",
    "/boot",
];

/// Fixed structural rules: files under reserved system directories and
/// files with reserved extensions (shared libraries, installer packages).
/// These apply regardless of the configured prefix set.
const STRUCTURAL_PATTERNS: [&str; 8] = [
    "/system/**",
    "/vendor/**",
    "/boot/**",
    "/proc/**",
    "/sys/**",
    "/dev/**",
    "**/*.so",
    "**/*.apk",
];

/// Paths excluded from wiping regardless of user selection.
///
/// A path is protected if it starts with any configured prefix
/// (case-insensitive) or matches one of the fixed structural patterns.
#[derive(Debug, Clone)]
pub struct ProtectedPathSet {
    prefixes: Vec<String>,
    patterns: Vec<Pattern>,
}

impl Default for ProtectedPathSet {
    fn default() -> Self {
        let patterns = STRUCTURAL_PATTERNS
            .iter()
            .map(|p| Pattern::new(p).expect("structural pattern must parse"))
            .collect();

        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_lowercase()).collect(),
            patterns,
        }
    }
}

impl ProtectedPathSet {
    /// A set with the structural patterns only, no prefixes. Useful for
    /// tests and for callers that manage their own prefix list.
    pub fn without_prefixes() -> Self {
        Self {
            prefixes: Vec::new(),
            ..Self::default()
        }
    }

    pub fn is_protected(&self, path: &Path) -> bool {
        let lower = path.to_string_lossy().to_lowercase();

        if self.prefixes.iter().any(|prefix| lower.starts_with(prefix)) {
            return true;
        }

        self.patterns.iter().any(|pattern| pattern.matches(&lower))
    }

    pub fn add_prefix(&mut self, prefix: impl AsRef<str>) {
        let prefix = prefix.as_ref().to_lowercase();
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
    }

    /// Returns true if the prefix was present.
    pub fn remove_prefix(&mut self, prefix: impl AsRef<str>) -> bool {
        let prefix = prefix.as_ref().to_lowercase();
        let before = self.prefixes.len();
        self.prefixes.retain(|p| *p != prefix);
        self.prefixes.len() != before
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}
