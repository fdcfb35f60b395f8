//! Unit algebra (`spec.md` §3, §4.3). Units form families with a fixed
//! conversion factor to a canonical base unit within the family; units in
//! different families (or unrecognized custom idents) are never compatible.
//!
//! The concrete family groupings and conversion factors follow CSS Values
//! and Units' definitions, the same ones libsass encodes in its number
//! coercion helpers (`examples/original_source/src/fn_utils.hpp`); `spec.md`
//! only states the policy ("fixed conversion table"), not the table itself.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    None,
    Percent,
    /// Any identifier not recognized as a standard CSS unit. Two custom
    /// units are compatible only if their names match exactly.
    Custom(String),

    // Absolute length, base = px
    Px,
    In,
    Cm,
    Mm,
    Q,
    Pt,
    Pc,

    // Angle, base = deg
    Deg,
    Grad,
    Rad,
    Turn,

    // Time, base = s
    S,
    Ms,

    // Frequency, base = Hz
    Hz,
    Khz,

    // Resolution, base = dppx
    Dpi,
    Dpcm,
    Dppx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
    Custom,
}

impl Unit {
    pub fn parse(name: &str) -> Unit {
        match name.to_ascii_lowercase().as_str() {
            "" => Unit::None,
            "%" => Unit::Percent,
            "px" => Unit::Px,
            "in" => Unit::In,
            "cm" => Unit::Cm,
            "mm" => Unit::Mm,
            "q" => Unit::Q,
            "pt" => Unit::Pt,
            "pc" => Unit::Pc,
            "deg" => Unit::Deg,
            "grad" => Unit::Grad,
            "rad" => Unit::Rad,
            "turn" => Unit::Turn,
            "s" => Unit::S,
            "ms" => Unit::Ms,
            "hz" => Unit::Hz,
            "khz" => Unit::Khz,
            "dpi" => Unit::Dpi,
            "dpcm" => Unit::Dpcm,
            "dppx" | "x" => Unit::Dppx,
            _ => Unit::Custom(name.to_owned()),
        }
    }

    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Px | Unit::In | Unit::Cm | Unit::Mm | Unit::Q | Unit::Pt | Unit::Pc => {
                UnitFamily::Length
            }
            Unit::Deg | Unit::Grad | Unit::Rad | Unit::Turn => UnitFamily::Angle,
            Unit::S | Unit::Ms => UnitFamily::Time,
            Unit::Hz | Unit::Khz => UnitFamily::Frequency,
            Unit::Dpi | Unit::Dpcm | Unit::Dppx => UnitFamily::Resolution,
            Unit::None | Unit::Percent | Unit::Custom(_) => UnitFamily::Custom,
        }
    }

    /// Multiplying a value in this unit by this factor converts it to the
    /// family's canonical base unit.
    pub fn factor_to_base(&self) -> f64 {
        match self {
            Unit::Px => 1.0,
            Unit::In => 96.0,
            Unit::Cm => 96.0 / 2.54,
            Unit::Mm => 96.0 / 25.4,
            Unit::Q => 96.0 / 101.6,
            Unit::Pt => 96.0 / 72.0,
            Unit::Pc => 16.0,

            Unit::Deg => 1.0,
            Unit::Grad => 0.9,
            Unit::Rad => 180.0 / std::f64::consts::PI,
            Unit::Turn => 360.0,

            Unit::S => 1.0,
            Unit::Ms => 0.001,

            Unit::Hz => 1.0,
            Unit::Khz => 1000.0,

            Unit::Dppx => 1.0,
            Unit::Dpi => 1.0 / 96.0,
            Unit::Dpcm => 1.0 / (96.0 / 2.54),

            Unit::None | Unit::Percent | Unit::Custom(_) => 1.0,
        }
    }

    /// Two units can be converted between one another iff they share a
    /// non-`Custom` family, or are identical `Custom`/`None`/`Percent`
    /// units.
    pub fn is_compatible(&self, other: &Unit) -> bool {
        match (self.family(), other.family()) {
            (UnitFamily::Custom, UnitFamily::Custom) => self == other,
            (a, b) => a == b,
        }
    }

    pub fn conversion_factor(&self, to: &Unit) -> Option<f64> {
        if !self.is_compatible(to) {
            return None;
        }
        Some(self.factor_to_base() / to.factor_to_base())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::None => Ok(()),
            Unit::Percent => f.write_str("%"),
            Unit::Custom(name) => f.write_str(name),
            Unit::Px => f.write_str("px"),
            Unit::In => f.write_str("in"),
            Unit::Cm => f.write_str("cm"),
            Unit::Mm => f.write_str("mm"),
            Unit::Q => f.write_str("Q"),
            Unit::Pt => f.write_str("pt"),
            Unit::Pc => f.write_str("pc"),
            Unit::Deg => f.write_str("deg"),
            Unit::Grad => f.write_str("grad"),
            Unit::Rad => f.write_str("rad"),
            Unit::Turn => f.write_str("turn"),
            Unit::S => f.write_str("s"),
            Unit::Ms => f.write_str("ms"),
            Unit::Hz => f.write_str("Hz"),
            Unit::Khz => f.write_str("kHz"),
            Unit::Dpi => f.write_str("dpi"),
            Unit::Dpcm => f.write_str("dpcm"),
            Unit::Dppx => f.write_str("dppx"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn in_and_cm_are_compatible() {
        let inch = Unit::In;
        let cm = Unit::Cm;
        assert!(inch.is_compatible(&cm));
        let factor = inch.conversion_factor(&cm).unwrap();
        // 1in == 2.54cm
        assert!((factor - 2.54).abs() < 1e-9);
    }

    #[test]
    fn px_and_em_like_custom_units_are_incompatible_by_default() {
        let px = Unit::Px;
        let em = Unit::Custom("em".to_owned());
        assert!(!px.is_compatible(&em));
    }
}
