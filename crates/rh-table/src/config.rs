//! Configuration for a [`Table`](crate::Table).

use rh_dice::DEFAULT_PREVIEW_LIMIT;

/// Configuration for a table service.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// RNG seed for reproducible rolls; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Columns used when rendering an attribute sheet.
    pub columns: usize,
    /// Values shown before a roll preview is truncated.
    pub preview_limit: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seed: None,
            columns: 3,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

impl TableConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the sheet column count (at least 1).
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Set the preview limit (at least 1).
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.columns, 3);
        assert_eq!(cfg.preview_limit, 50);
    }

    #[test]
    fn builder_methods() {
        let cfg = TableConfig::default()
            .with_seed(7)
            .with_columns(4)
            .with_preview_limit(10);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.columns, 4);
        assert_eq!(cfg.preview_limit, 10);
    }

    #[test]
    fn zero_clamped() {
        let cfg = TableConfig::default().with_columns(0).with_preview_limit(0);
        assert_eq!(cfg.columns, 1);
        assert_eq!(cfg.preview_limit, 1);
    }
}
