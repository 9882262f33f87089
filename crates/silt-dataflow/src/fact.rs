//! Variable-to-value fact store for constant propagation.

use crate::lattice::Value;
use indexmap::IndexMap;
use silt_ir::Var;

/// A mapping from variable to abstract value.
///
/// Absent variables are implicitly `Undef`. Iteration order is insertion
/// order, stable within a run; consumers must be order-independent (the meet
/// is commutative and associative).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpFact {
    bindings: IndexMap<Var, Value>,
}

impl CpFact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &Var) -> Value {
        self.bindings.get(var).copied().unwrap_or(Value::Undef)
    }

    /// Bind `var` to `value`. Returns true iff the stored mapping changed;
    /// this drives the solver's change detection.
    pub fn update(&mut self, var: Var, value: Value) -> bool {
        self.bindings.insert(var, value) != Some(value)
    }

    /// Replace the contents with a copy of `other`. Returns whether anything
    /// changed.
    pub fn copy_from(&mut self, other: &CpFact) -> bool {
        if self == other {
            return false;
        }
        self.bindings = other.bindings.clone();
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, Value)> {
        self.bindings.iter().map(|(var, value)| (var, *value))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Display for CpFact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", var, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_variable_is_undef() {
        let fact = CpFact::new();
        assert_eq!(fact.get(&Var::int("x")), Value::Undef);
    }

    #[test]
    fn test_update_reports_change() {
        let x = Var::int("x");
        let mut fact = CpFact::new();
        assert!(fact.update(x.clone(), Value::Constant(1)));
        assert!(!fact.update(x.clone(), Value::Constant(1)));
        assert!(fact.update(x.clone(), Value::Constant(2)));
        assert_eq!(fact.get(&x), Value::Constant(2));
    }

    #[test]
    fn test_copy_from_reports_change() {
        let x = Var::int("x");
        let mut source = CpFact::new();
        source.update(x.clone(), Value::Nac);

        let mut target = CpFact::new();
        assert!(target.copy_from(&source));
        assert!(!target.copy_from(&source));
        assert_eq!(target.get(&x), Value::Nac);
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let x = Var::int("x");
        let y = Var::int("y");

        let mut left = CpFact::new();
        left.update(x.clone(), Value::Constant(1));
        left.update(y.clone(), Value::Constant(2));

        let mut right = CpFact::new();
        right.update(y, Value::Constant(2));
        right.update(x, Value::Constant(1));

        assert_eq!(left, right);
    }
}
