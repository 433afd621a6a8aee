//! Configuration for PrismDB
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a PrismDB repository
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Sort-Key Encoder Configuration
    // -------------------------------------------------------------------------
    /// Max number of string characters folded into a sort score,
    /// shared across all properties of one position
    pub string_fold_cap: usize,

    /// Scale applied per folded character (`score = score * scale + codepoint`)
    pub string_fold_scale: f64,

    // -------------------------------------------------------------------------
    // Index Derivation Configuration
    // -------------------------------------------------------------------------
    /// Max number of composite keys one index may expand to for a single
    /// entity (cartesian product over list-valued attributes)
    pub max_fanout: usize,

    // -------------------------------------------------------------------------
    // Rebuild Configuration
    // -------------------------------------------------------------------------
    /// Page size used when re-deriving indexes for existing records
    pub rebuild_batch: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            string_fold_cap: 10,
            string_fold_scale: 1000.0,
            max_fanout: 64,
            rebuild_batch: 512,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the string fold cap (characters folded into a sort score)
    pub fn string_fold_cap(mut self, cap: usize) -> Self {
        self.config.string_fold_cap = cap;
        self
    }

    /// Set the per-character fold scale
    pub fn string_fold_scale(mut self, scale: f64) -> Self {
        self.config.string_fold_scale = scale;
        self
    }

    /// Set the max fan-out per index and entity
    pub fn max_fanout(mut self, limit: usize) -> Self {
        self.config.max_fanout = limit;
        self
    }

    /// Set the rebuild page size
    pub fn rebuild_batch(mut self, batch: usize) -> Self {
        self.config.rebuild_batch = batch;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
