//! Name filters applied while listing.

use crate::config::ListConfig;

/// Skip files and folders whose names contain certain substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRules {
    substrings: Vec<String>,
    /// Stored lowercased.
    substrings_ci: Vec<String>,
}

impl SkipRules {
    pub fn new(substrings: Vec<String>, substrings_ci: Vec<String>) -> Self {
        Self {
            substrings,
            substrings_ci: substrings_ci.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Rules that skip nothing.
    pub fn none() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn skips(&self, name: &str) -> bool {
        if self.substrings.iter().any(|s| name.contains(s.as_str())) {
            return true;
        }
        if self.substrings_ci.is_empty() {
            return false;
        }
        let lower = name.to_lowercase();
        self.substrings_ci.iter().any(|s| lower.contains(s.as_str()))
    }
}

impl Default for SkipRules {
    fn default() -> Self {
        Self::from(&ListConfig::default())
    }
}

impl From<&ListConfig> for SkipRules {
    fn from(cfg: &ListConfig) -> Self {
        Self::new(cfg.skip_substrings.clone(), cfg.skip_substrings_ci.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules() {
        let r = SkipRules::default();
        assert!(r.skips("Collection 1970-2019"));
        assert!(r.skips("Movie BDMV"));
        assert!(r.skips("CERTIFICATE.pdf"));
        assert!(r.skips("disc.ISO"));
        assert!(r.skips("Isolation.mkv"));
        assert!(!r.skips("bdmv-lowercase.mkv"));
        assert!(!r.skips("ep01.mkv"));
    }

    #[test]
    fn none_skips_nothing() {
        assert!(!SkipRules::none().skips("disc.iso"));
    }
}
