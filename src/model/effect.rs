//! Effect names, their parameter sets and the slider state behind them.
//!
//! Which parameters an effect takes lives in one place,
//! [`EffectKind::param_shape`]. [`EffectParams`] carries exactly those
//! fields, so a request can never include parameters for another effect.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::color::Rgb;
use crate::error::{PanelError, Result};

/// Animation patterns the controller can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    ColorCycle,
    Pulsate,
    StarryNight,
    Candle,
    CandleV2,
    CandleGradient,
    Snake,
    Strobe,
    GradientWave,
    FavoriteCycle,
    FavoriteJump,
}

/// Parameter set an effect accepts beyond `groups`, `effect` and `speed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    Vibrancy,
    PulsateRange,
    Candle,
    CandleGradient,
    None,
}

impl ParamShape {
    /// Request field names, in the order they are listed to the user.
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Vibrancy => &["vibrancy"],
            Self::PulsateRange => &["pulsate_min", "pulsate_max"],
            Self::Candle => &["intensity", "candle_base_color"],
            Self::CandleGradient => &[
                "intensity",
                "candle_base_color",
                "gradient_amplitude",
                "gradient_speed",
            ],
            Self::None => &[],
        }
    }
}

impl EffectKind {
    pub const ALL: [Self; 11] = [
        Self::ColorCycle,
        Self::Pulsate,
        Self::StarryNight,
        Self::Candle,
        Self::CandleV2,
        Self::CandleGradient,
        Self::Snake,
        Self::Strobe,
        Self::GradientWave,
        Self::FavoriteCycle,
        Self::FavoriteJump,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColorCycle => "color_cycle",
            Self::Pulsate => "pulsate",
            Self::StarryNight => "starry_night",
            Self::Candle => "candle",
            Self::CandleV2 => "candle_v2",
            Self::CandleGradient => "candle_gradient",
            Self::Snake => "snake",
            Self::Strobe => "strobe",
            Self::GradientWave => "gradient_wave",
            Self::FavoriteCycle => "favorite_cycle",
            Self::FavoriteJump => "favorite_jump",
        }
    }

    pub const fn param_shape(self) -> ParamShape {
        match self {
            Self::ColorCycle => ParamShape::Vibrancy,
            Self::Pulsate => ParamShape::PulsateRange,
            Self::Candle | Self::CandleV2 => ParamShape::Candle,
            Self::CandleGradient => ParamShape::CandleGradient,
            Self::StarryNight
            | Self::Snake
            | Self::Strobe
            | Self::GradientWave
            | Self::FavoriteCycle
            | Self::FavoriteJump => ParamShape::None,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = PanelError;

    /// Accepts `candle_gradient` as well as `candle-gradient` or `candle gradient`.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| PanelError::UnknownEffect {
                name: s.to_string(),
            })
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

/// Effect speed in seconds per step (lower is faster).
///
/// Serialized as a string with exactly two decimals, e.g. `"0.20"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Speed(f64);

impl Speed {
    pub const MIN: f64 = 0.10;
    pub const MAX: f64 = 1.00;
    pub const STEP: f64 = 0.05;

    pub fn new(seconds: f64) -> Self {
        Self(clamp(seconds, Self::MIN, Self::MAX))
    }

    pub const fn seconds(self) -> f64 {
        self.0
    }

    pub fn formatted(self) -> String {
        format!("{:.2}", self.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(0.20)
    }
}

impl Serialize for Speed {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

/// Candle flicker intensity, 0.70 to 2.00.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Intensity(f64);

impl Intensity {
    pub const MIN: f64 = 0.70;
    pub const MAX: f64 = 2.00;

    pub fn new(value: f64) -> Self {
        Self(clamp(value, Self::MIN, Self::MAX))
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(1.0)
    }
}

/// A 0.00 to 1.00 slider value (gradient amplitude and gradient speed).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Fraction(f64);

impl Fraction {
    pub fn new(value: f64) -> Self {
        Self(clamp(value, 0.0, 1.0))
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self(0.5)
    }
}

/// Effect-specific request fields, one variant per [`ParamShape`].
///
/// Serializes to the bare fields (or to nothing for `Plain`) so it can be
/// merged into the base `{groups, effect, speed}` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EffectParams {
    ColorCycle {
        vibrancy: u8,
    },
    Pulsate {
        pulsate_min: u8,
        pulsate_max: u8,
    },
    Candle {
        intensity: Intensity,
        candle_base_color: Rgb,
    },
    CandleGradient {
        intensity: Intensity,
        candle_base_color: Rgb,
        gradient_amplitude: Fraction,
        gradient_speed: Fraction,
    },
    Plain,
}

/// Slider state for every effect control on the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSettings {
    pub effect: EffectKind,
    pub speed: Speed,
    pub vibrancy: u8,
    pub pulsate_min: u8,
    pub pulsate_max: u8,
    pub intensity: Intensity,
    pub candle_base: Rgb,
    pub gradient_amplitude: Fraction,
    pub gradient_speed: Fraction,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            effect: EffectKind::ColorCycle,
            speed: Speed::default(),
            vibrancy: 255,
            pulsate_min: 50,
            pulsate_max: 255,
            intensity: Intensity::default(),
            candle_base: Rgb::CANDLE,
            gradient_amplitude: Fraction::default(),
            gradient_speed: Fraction::default(),
        }
    }
}

impl EffectSettings {
    /// Parameters for the currently selected effect.
    pub fn params(&self) -> EffectParams {
        match self.effect.param_shape() {
            ParamShape::Vibrancy => EffectParams::ColorCycle {
                vibrancy: self.vibrancy,
            },
            ParamShape::PulsateRange => EffectParams::Pulsate {
                pulsate_min: self.pulsate_min,
                pulsate_max: self.pulsate_max,
            },
            ParamShape::Candle => EffectParams::Candle {
                intensity: self.intensity,
                candle_base_color: self.candle_base,
            },
            ParamShape::CandleGradient => EffectParams::CandleGradient {
                intensity: self.intensity,
                candle_base_color: self.candle_base,
                gradient_amplitude: self.gradient_amplitude,
                gradient_speed: self.gradient_speed,
            },
            ParamShape::None => EffectParams::Plain,
        }
    }

    /// Set one parameter by its request field name from text input.
    pub fn set_param(&mut self, name: &str, value: &str) -> Result<()> {
        let invalid = || PanelError::Other(format!("Invalid value '{value}' for {name}"));
        let byte = || value.trim().parse::<u8>().map_err(|_| invalid());
        let decimal = || value.trim().parse::<f64>().map_err(|_| invalid());

        match name {
            "speed" => self.speed = Speed::new(decimal()?),
            "vibrancy" => self.vibrancy = byte()?,
            "pulsate_min" => self.pulsate_min = byte()?,
            "pulsate_max" => self.pulsate_max = byte()?,
            "intensity" => self.intensity = Intensity::new(decimal()?),
            "candle_base_color" => self.candle_base = Rgb::from_hex(value)?,
            "gradient_amplitude" => self.gradient_amplitude = Fraction::new(decimal()?),
            "gradient_speed" => self.gradient_speed = Fraction::new(decimal()?),
            _ => return Err(PanelError::Other(format!("Unknown effect parameter: {name}"))),
        }
        Ok(())
    }
}
