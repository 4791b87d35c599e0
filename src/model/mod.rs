//! Panel data model: groups, colors, effects and LED ranges.

pub mod color;
pub mod effect;
pub mod group;
pub mod range;

pub use color::Rgb;
pub use effect::{EffectKind, EffectParams, EffectSettings, Fraction, Intensity, ParamShape, Speed};
pub use group::{DisplayGroup, GroupSelection, backend_id_for_label};
pub use range::{LedRange, RangeField, RangeMap, default_ranges, parse_index};
