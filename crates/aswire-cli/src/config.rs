use aswire_core::{DecodeConfig, RangePolicy};

/// Runtime configuration for the `aswire` binary.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Machine-readable output on stdout and JSON log lines on stderr.
    pub json: bool,

    /// Options handed to every decode.
    pub decode: DecodeConfig,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Set the tree range policy; `None` keeps the default.
    #[must_use]
    pub fn with_range_policy(mut self, policy: Option<RangePolicy>) -> Self {
        if let Some(policy) = policy {
            self.decode = self.decode.with_tree_ranges(policy);
        }
        self
    }
}
