//! `calc()`/`min()`/`max()`/`clamp()` (`spec.md` §3). Sass treats a
//! calculation as opaque unless every argument reduces to a plain number:
//! a calculation containing an unresolved interpolation or a CSS custom
//! property reference round-trips to CSS verbatim. Grounded on libsass's
//! calc handling in `examples/original_source/src/ast_values.cpp`, which
//! keeps `calc()` arguments as an un-evaluated token tree for exactly this
//! reason.

use std::fmt;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum CalculationName {
    Calc,
    Min,
    Max,
    Clamp,
}

impl fmt::Display for CalculationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CalculationName::Calc => "calc",
            CalculationName::Min => "min",
            CalculationName::Max => "max",
            CalculationName::Clamp => "clamp",
        })
    }
}

/// One operand of a calculation: either a fully evaluated Sass value, a
/// nested calculation, or an opaque string fragment that could not be
/// reduced further (e.g. `var(--x)`).
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationArg {
    Value(Box<Value>),
    Calculation(Box<Calculation>),
    Operation {
        left: Box<CalculationArg>,
        op: char,
        right: Box<CalculationArg>,
    },
    Interpolation(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub name: CalculationName,
    pub args: Vec<CalculationArg>,
}

impl Calculation {
    pub fn calc(arg: CalculationArg) -> Calculation {
        Calculation {
            name: CalculationName::Calc,
            args: vec![arg],
        }
    }

    /// Attempts to fully reduce this calculation to a single numeric
    /// `Value::Number`. Returns `None` if any operand is opaque
    /// (interpolation, unresolved custom property), in which case the
    /// calculation must be serialized verbatim.
    pub fn try_reduce(&self) -> Option<Value> {
        match self.name {
            CalculationName::Calc if self.args.len() == 1 => reduce_arg(&self.args[0]),
            CalculationName::Min => reduce_many(&self.args, |a, b| if a < b { a } else { b }),
            CalculationName::Max => reduce_many(&self.args, |a, b| if a > b { a } else { b }),
            CalculationName::Clamp if self.args.len() == 3 => {
                let min = reduce_arg(&self.args[0])?;
                let val = reduce_arg(&self.args[1])?;
                let max = reduce_arg(&self.args[2])?;
                let (min, val, max) = (as_f64(&min)?, as_f64(&val)?, as_f64(&max)?);
                Some(Value::number(val.clamp(min.min(max), max.max(min))))
            }
            _ => None,
        }
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => Some(n.value),
        _ => None,
    }
}

fn reduce_arg(arg: &CalculationArg) -> Option<Value> {
    match arg {
        CalculationArg::Value(v) => Some((**v).clone()),
        CalculationArg::Calculation(c) => c.try_reduce(),
        CalculationArg::Operation { left, op, right } => {
            let l = as_f64(&reduce_arg(left)?)?;
            let r = as_f64(&reduce_arg(right)?)?;
            let result = match op {
                '+' => l + r,
                '-' => l - r,
                '*' => l * r,
                '/' => l / r,
                _ => return None,
            };
            Some(Value::number(result))
        }
        CalculationArg::Interpolation(_) => None,
    }
}

fn reduce_many(args: &[CalculationArg], pick: impl Fn(f64, f64) -> f64) -> Option<Value> {
    let mut acc: Option<f64> = None;
    for arg in args {
        let v = as_f64(&reduce_arg(arg)?)?;
        acc = Some(match acc {
            Some(prev) => pick(prev, v),
            None => v,
        });
    }
    acc.map(Value::number)
}

impl fmt::Display for CalculationArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationArg::Value(v) => write!(f, "{}", v.css_repr()),
            CalculationArg::Calculation(c) => write!(f, "{}", c),
            CalculationArg::Operation { left, op, right } => {
                write!(f, "{} {} {}", left, op, right)
            }
            CalculationArg::Interpolation(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.name, parts.join(", "))
    }
}
