//! `Number(value, numerators, denominators, as-slash)` (`spec.md` §3,
//! §4.3). Units form multisets on the numerator and denominator side;
//! addition/subtraction require compatible units, multiplication/division
//! merge and then cancel matching units.

use crate::unit::Unit;

pub const EPSILON: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct SassNumber {
    pub value: f64,
    pub numerators: Vec<Unit>,
    pub denominators: Vec<Unit>,
    /// Preserves an `a / b` literal so `list-separator()`/slash-aware
    /// functions can still see it; dropped by any arithmetic op or by
    /// [`SassNumber::without_slash`] (`spec.md` §3's invariant).
    pub as_slash: Option<(Box<SassNumber>, Box<SassNumber>)>,
}

impl SassNumber {
    pub fn unitless(value: f64) -> Self {
        SassNumber {
            value,
            numerators: Vec::new(),
            denominators: Vec::new(),
            as_slash: None,
        }
    }

    pub fn with_unit(value: f64, unit: Unit) -> Self {
        if matches!(unit, Unit::None) {
            return Self::unitless(value);
        }
        SassNumber {
            value,
            numerators: vec![unit],
            denominators: Vec::new(),
            as_slash: None,
        }
    }

    pub fn is_unitless(&self) -> bool {
        self.numerators.is_empty() && self.denominators.is_empty()
    }

    pub fn without_slash(&self) -> Self {
        SassNumber {
            as_slash: None,
            ..self.clone()
        }
    }

    pub fn is_int(&self) -> bool {
        (self.value - self.value.round()).abs() < EPSILON
    }

    pub fn as_int(&self) -> Option<i64> {
        if self.is_int() {
            Some(self.value.round() as i64)
        } else {
            None
        }
    }

    /// Reduces numerator/denominator multisets by canceling units that
    /// appear, after conversion to a common representative, on both sides.
    /// Returns the reduced number with its value rescaled accordingly.
    pub fn reduce(&self) -> SassNumber {
        let mut numerators = self.numerators.clone();
        let mut denominators = self.denominators.clone();
        let mut value = self.value;

        let mut i = 0;
        while i < numerators.len() {
            let mut cancelled = false;
            for j in 0..denominators.len() {
                if let Some(factor) = numerators[i].conversion_factor(&denominators[j]) {
                    value *= factor;
                    numerators.remove(i);
                    denominators.remove(j);
                    cancelled = true;
                    break;
                }
            }
            if !cancelled {
                i += 1;
            }
        }

        SassNumber {
            value,
            numerators,
            denominators,
            as_slash: None,
        }
    }

    /// Converts this number's value into the base unit of each of its
    /// current units, for epsilon-stable equality/hashing.
    pub fn normalized_value(&self) -> (f64, Vec<String>, Vec<String>) {
        let reduced = self.reduce();
        let mut value = reduced.value;
        for u in &reduced.numerators {
            value *= u.factor_to_base();
        }
        for u in &reduced.denominators {
            value /= u.factor_to_base();
        }
        let mut nums: Vec<String> = reduced
            .numerators
            .iter()
            .map(|u| format!("{:?}:{}", u.family(), u.factor_to_base()))
            .collect();
        let mut dens: Vec<String> = reduced
            .denominators
            .iter()
            .map(|u| format!("{:?}:{}", u.family(), u.factor_to_base()))
            .collect();
        nums.sort();
        dens.sort();
        (value, nums, dens)
    }

    pub fn unit_string(&self) -> String {
        if self.numerators.is_empty() && self.denominators.is_empty() {
            return String::new();
        }
        let nums: Vec<String> = self.numerators.iter().map(|u| u.to_string()).collect();
        if self.denominators.is_empty() {
            return nums.join("*");
        }
        let dens: Vec<String> = self.denominators.iter().map(|u| u.to_string()).collect();
        format!("{}/{}", nums.join("*"), dens.join("*"))
    }

    /// Attempts to convert this number to the units of `other`, used by
    /// addition/subtraction/relational comparisons (`spec.md` §4.3).
    pub fn convert_to_match(&self, other: &SassNumber) -> Option<SassNumber> {
        if self.is_unitless() {
            return Some(SassNumber {
                value: self.value,
                numerators: other.numerators.clone(),
                denominators: other.denominators.clone(),
                as_slash: None,
            });
        }
        if other.is_unitless() {
            return Some(self.clone());
        }
        if self.numerators.len() != other.numerators.len()
            || self.denominators.len() != other.denominators.len()
        {
            return None;
        }
        let mut value = self.value;
        for (a, b) in self.numerators.iter().zip(other.numerators.iter()) {
            value *= a.conversion_factor(b)?;
        }
        for (a, b) in self.denominators.iter().zip(other.denominators.iter()) {
            value /= a.conversion_factor(b)?;
        }
        Some(SassNumber {
            value,
            numerators: other.numerators.clone(),
            denominators: other.denominators.clone(),
            as_slash: None,
        })
    }

    pub fn add(&self, other: &SassNumber) -> Option<SassNumber> {
        let converted = self.convert_to_match(other)?;
        Some(SassNumber {
            value: converted.value + other.value,
            numerators: other.numerators.clone(),
            denominators: other.denominators.clone(),
            as_slash: None,
        })
    }

    pub fn sub(&self, other: &SassNumber) -> Option<SassNumber> {
        let converted = self.convert_to_match(other)?;
        Some(SassNumber {
            value: converted.value - other.value,
            numerators: other.numerators.clone(),
            denominators: other.denominators.clone(),
            as_slash: None,
        })
    }

    pub fn mul(&self, other: &SassNumber) -> SassNumber {
        let mut numerators = self.numerators.clone();
        numerators.extend(other.numerators.clone());
        let mut denominators = self.denominators.clone();
        denominators.extend(other.denominators.clone());
        SassNumber {
            value: self.value * other.value,
            numerators,
            denominators,
            as_slash: None,
        }
        .reduce()
    }

    pub fn div(&self, other: &SassNumber) -> SassNumber {
        let mut numerators = self.numerators.clone();
        numerators.extend(other.denominators.clone());
        let mut denominators = self.denominators.clone();
        denominators.extend(other.numerators.clone());
        SassNumber {
            value: self.value / other.value,
            numerators,
            denominators,
            as_slash: None,
        }
        .reduce()
    }

    pub fn rem(&self, other: &SassNumber) -> Option<SassNumber> {
        let converted = self.convert_to_match(other)?;
        let value = if other.value == 0.0 {
            f64::NAN
        } else {
            converted.value % other.value
        };
        Some(SassNumber {
            value,
            numerators: other.numerators.clone(),
            denominators: other.denominators.clone(),
            as_slash: None,
        })
    }

    pub fn neg(&self) -> SassNumber {
        SassNumber {
            value: -self.value,
            as_slash: None,
            ..self.clone()
        }
    }

    /// Epsilon-aware comparison used by equality and `==`/`<`/`<=`/etc.
    pub fn fuzzy_eq(&self, other: &SassNumber) -> bool {
        match self.convert_to_match(other) {
            Some(converted) => (converted.value - other.value).abs() < EPSILON,
            None => false,
        }
    }

    pub fn fuzzy_cmp(&self, other: &SassNumber) -> Option<std::cmp::Ordering> {
        let converted = self.convert_to_match(other)?;
        if (converted.value - other.value).abs() < EPSILON {
            Some(std::cmp::Ordering::Equal)
        } else {
            converted.value.partial_cmp(&other.value)
        }
    }

    /// `round()`/`ceil()`/`floor()` all epsilon-nudge toward the boundary
    /// per `spec.md` §4.5, so a value within epsilon of `X.5` rounds up.
    pub fn round_half_up(&self) -> SassNumber {
        let shifted = self.value + if self.value >= 0.0 { EPSILON } else { -EPSILON };
        SassNumber {
            value: shifted.round(),
            as_slash: None,
            ..self.clone()
        }
    }

    pub fn ceil(&self) -> SassNumber {
        SassNumber {
            value: (self.value - EPSILON).ceil(),
            as_slash: None,
            ..self.clone()
        }
    }

    pub fn floor(&self) -> SassNumber {
        SassNumber {
            value: (self.value + EPSILON).floor(),
            as_slash: None,
            ..self.clone()
        }
    }
}

impl PartialEq for SassNumber {
    fn eq(&self, other: &Self) -> bool {
        self.fuzzy_eq(other)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn px_plus_px() {
        let a = SassNumber::with_unit(5.0, Unit::Px);
        let b = SassNumber::with_unit(5.0, Unit::Px);
        let sum = a.add(&b).unwrap();
        assert!((sum.value - 10.0).abs() < EPSILON);
    }

    #[test]
    fn px_plus_unitless() {
        let a = SassNumber::with_unit(5.0, Unit::Px);
        let b = SassNumber::unitless(5.0);
        let sum = a.add(&b).unwrap();
        assert!((sum.value - 10.0).abs() < EPSILON);
        assert_eq!(sum.numerators, vec![Unit::Px]);
    }

    #[test]
    fn px_plus_em_is_incompatible() {
        let a = SassNumber::with_unit(5.0, Unit::Px);
        let b = SassNumber::with_unit(5.0, Unit::Custom("em".into()));
        assert!(a.add(&b).is_none());
    }

    #[test]
    fn in_plus_cm_equals_254cm() {
        let one_in = SassNumber::with_unit(1.0, Unit::In);
        let one_cm = SassNumber::with_unit(1.0, Unit::Cm);
        let sum = one_in.add(&one_cm).unwrap();
        let target = SassNumber::with_unit(2.54, Unit::Cm);
        assert!(sum.fuzzy_eq(&target));
    }

    #[test]
    fn division_by_zero_integer_yields_infinity() {
        let one = SassNumber::unitless(1.0);
        let zero = SassNumber::unitless(0.0);
        assert!(one.div(&zero).value.is_infinite());
    }

    #[test]
    fn zero_div_zero_is_nan() {
        let zero = SassNumber::unitless(0.0);
        assert!(zero.div(&zero).value.is_nan());
    }

    #[test]
    fn px_times_px_over_px_cancels_to_px() {
        let px = SassNumber::with_unit(2.0, Unit::Px);
        let product = px.mul(&px);
        let back = product.div(&px);
        assert_eq!(back.numerators, vec![Unit::Px]);
        assert!(back.denominators.is_empty());
    }
}
