//! Import configuration.

/// Per-import settings
///
/// Limits guard against runaway documents. `None` means unbounded, which is
/// the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportConfig {
    /// Maximum number of start tags in one document
    pub max_elements: Option<usize>,
    /// Maximum open-element depth (the root element is depth 1)
    pub max_depth: Option<usize>,
}

impl ImportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_elements(mut self, max: usize) -> Self {
        self.max_elements = Some(max);
        self
    }

    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let config = ImportConfig::new();
        assert_eq!(config.max_elements, None);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_builder() {
        let config = ImportConfig::new().with_max_elements(100).with_max_depth(8);
        assert_eq!(config.max_elements, Some(100));
        assert_eq!(config.max_depth, Some(8));
    }
}
