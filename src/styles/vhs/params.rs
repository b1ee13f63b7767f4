use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, StyleError, TapeError};

/// Tape recording speed
///
/// Slower speeds pack more signal into less tape and lose horizontal
/// resolution accordingly. The set is closed; names are resolved once when
/// parameters are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TapeSpeed {
    /// Standard play
    #[default]
    Sp,
    /// Long play
    Lp,
    /// Extended play
    Ep,
}

impl TapeSpeed {
    pub const ALL: [TapeSpeed; 3] = [TapeSpeed::Sp, TapeSpeed::Lp, TapeSpeed::Ep];

    /// Horizontal blur kernel size in samples
    pub fn blur_kernel(self) -> usize {
        match self {
            TapeSpeed::Sp => 3,
            TapeSpeed::Lp => 5,
            TapeSpeed::Ep => 7,
        }
    }

    /// Luma bandwidth of the format in Hz
    pub fn luma_cutoff_hz(self) -> f64 {
        match self {
            TapeSpeed::Sp => 2_400_000.0,
            TapeSpeed::Lp => 1_900_000.0,
            TapeSpeed::Ep => 1_400_000.0,
        }
    }

    /// Chroma bandwidth of the format in Hz
    pub fn chroma_cutoff_hz(self) -> f64 {
        match self {
            TapeSpeed::Sp => 320_000.0,
            TapeSpeed::Lp => 300_000.0,
            TapeSpeed::Ep => 280_000.0,
        }
    }

    /// Chroma delay relative to luma, in samples
    pub fn chroma_delay(self) -> u32 {
        match self {
            TapeSpeed::Sp => 9,
            TapeSpeed::Lp => 12,
            TapeSpeed::Ep => 14,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TapeSpeed::Sp => "SP",
            TapeSpeed::Lp => "LP",
            TapeSpeed::Ep => "EP",
        }
    }
}

impl fmt::Display for TapeSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TapeSpeed {
    type Err = StyleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SP" => Ok(TapeSpeed::Sp),
            "LP" => Ok(TapeSpeed::Lp),
            "EP" => Ok(TapeSpeed::Ep),
            _ => Err(StyleError::InvalidPreset { name: s.to_string() }),
        }
    }
}

impl TryFrom<String> for TapeSpeed {
    type Error = StyleError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TapeSpeed> for String {
    fn from(speed: TapeSpeed) -> Self {
        speed.as_str().to_string()
    }
}

/// Longest color-bleed amount accepted (a 129-tap filter)
pub const MAX_COLOR_BLEEDING: f32 = 64.0;

/// Highest ringing exponent accepted
pub const MAX_RINGING_POWER: u32 = 8;

/// Per-frame parameters of the tape pipeline
///
/// Field names match the keys of existing parameter files; anything left out
/// takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VhsParams {
    /// Accepted for parameter-file compatibility; no stage reads it
    pub composite_preemphasis: f32,

    /// Unsharp-mask strength on the final frame (off at 1.0 and below)
    pub vhs_out_sharpen: f32,

    /// Chroma smear along scanlines (off at 0)
    pub color_bleeding: f32,

    /// Luma noise amount, sigma = amount / 100 (off at 0)
    pub video_noise: f32,

    /// Chroma noise amount, sigma = amount / 100 (off at 0)
    pub chroma_noise: f32,

    /// Chroma phase jitter, sigma = value / 10 degrees (off at 0)
    pub chroma_phase_noise: f32,

    /// Run the frequency-domain ringing stage
    pub enable_ringing: bool,

    /// Exponent applied to the ringing mask
    pub ringing_power: u32,

    pub tape_speed: TapeSpeed,
}

impl Default for VhsParams {
    fn default() -> Self {
        Self {
            composite_preemphasis: 4.0,
            vhs_out_sharpen: 2.5,
            color_bleeding: 5.0,
            video_noise: 1000.0,
            chroma_noise: 5000.0,
            chroma_phase_noise: 25.0,
            enable_ringing: true,
            ringing_power: 2,
            tape_speed: TapeSpeed::Sp,
        }
    }
}

impl VhsParams {
    /// Parameters that leave every optional stage switched off
    pub fn passthrough() -> Self {
        Self {
            vhs_out_sharpen: 1.0,
            color_bleeding: 0.0,
            video_noise: 0.0,
            chroma_noise: 0.0,
            chroma_phase_noise: 0.0,
            enable_ringing: false,
            ..Self::default()
        }
    }

    /// Parse a JSON parameter object, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let params: VhsParams = serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson {
            reason: e.to_string(),
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| TapeError::generic(e.to_string()))
    }

    /// Check every amount before any frame is touched
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("composite_preemphasis", self.composite_preemphasis),
            ("vhs_out_sharpen", self.vhs_out_sharpen),
            ("color_bleeding", self.color_bleeding),
            ("video_noise", self.video_noise),
            ("chroma_noise", self.chroma_noise),
            ("chroma_phase_noise", self.chroma_phase_noise),
        ];
        for (key, value) in finite {
            if !value.is_finite() {
                return Err(invalid(key, value));
            }
        }

        if self.color_bleeding > MAX_COLOR_BLEEDING {
            return Err(invalid("color_bleeding", self.color_bleeding));
        }

        if self.enable_ringing && !(1..=MAX_RINGING_POWER).contains(&self.ringing_power) {
            return Err(invalid("ringing_power", self.ringing_power));
        }

        Ok(())
    }
}

fn invalid<V: ToString>(key: &str, value: V) -> TapeError {
    StyleError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}
