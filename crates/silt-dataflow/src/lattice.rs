//! The three-level constant lattice.
//!
//! ```text
//!            NAC (not a constant)
//!           /  |  \
//!   ..., Constant(-1), Constant(0), Constant(1), ...
//!           \  |  /
//!            Undef
//! ```
//!
//! `Undef` is the bottom element, `Nac` the top; distinct constants are
//! unordered and only meet to `Nac`.

use serde::{Deserialize, Serialize};

/// Abstract value of an integer-typed variable at a program point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Bottom: not yet computed, or no defined value reaches this point.
    Undef,
    /// Exactly one known signed 32-bit value.
    Constant(i32),
    /// Top: provably non-constant or unknown.
    Nac,
}

impl Value {
    /// Meet of two values: `Nac` absorbs, equal constants survive, and
    /// `Undef` is the identity.
    pub fn meet(self, other: Value) -> Value {
        match (self, other) {
            (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
            (Value::Constant(a), Value::Constant(b)) => {
                if a == b {
                    Value::Constant(a)
                } else {
                    Value::Nac
                }
            }
            (Value::Undef, v) | (v, Value::Undef) => v,
        }
    }

    pub fn is_constant(self) -> bool {
        matches!(self, Value::Constant(_))
    }

    pub fn as_constant(self) -> Option<i32> {
        match self {
            Value::Constant(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_nac(self) -> bool {
        matches!(self, Value::Nac)
    }

    pub fn is_undef(self) -> bool {
        matches!(self, Value::Undef)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undef => write!(f, "undef"),
            Value::Constant(n) => write!(f, "{}", n),
            Value::Nac => write!(f, "NAC"),
        }
    }
}
