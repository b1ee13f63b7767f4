use rand::RngCore;

use crate::{error::Result, styles::vhs::VhsParams, video::types::Frame};

/// Core trait for frame effects driven by the tape parameter record
pub trait Style: Send + Sync {
    /// Returns the unique name of this style
    fn name(&self) -> &str;

    /// Returns a human-readable description of this style
    fn description(&self) -> &str;

    /// Apply the effect to a video frame
    ///
    /// # Arguments
    ///
    /// * `frame` - The decoded input frame; left untouched
    /// * `params` - Parameter record for this frame
    /// * `rng` - Random source for the stochastic stages
    ///
    /// # Returns
    ///
    /// A new frame with the same dimensions and channel order.
    fn apply_effect(&self, frame: &Frame, params: &VhsParams, rng: &mut dyn RngCore) -> Result<Frame>;

    /// Validate parameters before any frame is processed
    fn validate_params(&self, params: &VhsParams) -> Result<()> {
        params.validate()
    }

    /// Get style-specific metadata or capabilities
    fn metadata(&self) -> StyleMetadata {
        StyleMetadata::default()
    }
}

/// Metadata about a style's capabilities and characteristics
#[derive(Debug, Clone, Default)]
pub struct StyleMetadata {
    /// Estimated performance impact (0.0 = minimal, 1.0 = heavy)
    pub performance_impact: f32,

    /// Whether output depends on the random source
    pub stochastic: bool,

    /// Tunable parameters with descriptions
    pub parameters: Vec<(String, String)>,
}
