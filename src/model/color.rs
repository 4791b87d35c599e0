//! RGB colors and their hex form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};

/// An RGB color, serialized as the `[r, g, b]` array the controller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self(255, 255, 255);

    /// Warm yellow-orange used as the default candle base color.
    pub const CANDLE: Self = Self(255, 147, 41);

    /// Parse a 6-digit hex color, with or without a leading `#`.
    pub fn from_hex(input: &str) -> Result<Self> {
        let digits = input.trim().strip_prefix('#').unwrap_or(input.trim());
        let mut bytes = [0u8; 3];
        if digits.len() != 6 || hex::decode_to_slice(digits, &mut bytes).is_err() {
            return Err(PanelError::InvalidColor {
                input: input.to_string(),
            });
        }
        Ok(Self(bytes[0], bytes[1], bytes[2]))
    }

    /// Lowercase `#rrggbb`, zero-padded per byte.
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.0, self.1, self.2]))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Rgb {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
