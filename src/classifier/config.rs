// Configuration for the threshold-sweep classifier

use serde::{Deserialize, Serialize};

/// Sweep resolution used when none is configured
pub const DEFAULT_RESOLUTION: u32 = 100;

/// Configuration for the threshold-sweep classifier
///
/// # Example
/// ```
/// use distview::classifier::ClassifierConfig;
///
/// let config = ClassifierConfig::default();
/// assert_eq!(config.resolution, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of equal steps between the two group means
    ///
    /// The sweep evaluates `resolution + 1` thresholds: one per step from
    /// just above the lower mean up to one step past the upper mean.
    pub resolution: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl ClassifierConfig {
    pub fn with_resolution(resolution: u32) -> Self {
        Self { resolution }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution == 0 {
            return Err("resolution must be >= 1, got 0".to_string());
        }
        Ok(())
    }
}
