//! Loader configuration.

/// Options controlling how an [`Asset`](crate::Asset) is loaded and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Check decoded accessor values against their declared `min`/`max`.
    pub check_bounds: bool,
    /// Reject binary containers whose header version is not 2.
    pub strict_version: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            check_bounds: true,
            strict_version: true,
        }
    }
}

impl LoadOptions {
    /// Create default load options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the accessor bounds pass.
    pub fn with_bounds_check(mut self, enabled: bool) -> Self {
        self.check_bounds = enabled;
        self
    }

    /// Accept binary containers of any version.
    pub fn lenient_version(mut self) -> Self {
        self.strict_version = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = LoadOptions::new().with_bounds_check(false).lenient_version();
        assert!(!options.check_bounds);
        assert!(!options.strict_version);
        assert_eq!(LoadOptions::new(), LoadOptions { check_bounds: true, strict_version: true });
    }
}
