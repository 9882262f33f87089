//! Expressions, variables, and assignment targets.
//!
//! Binary operators are grouped into four families (arithmetic, condition,
//! shift, bitwise) so that evaluation can match each family exhaustively;
//! adding an operator forces every consumer to handle it.

use crate::types::{PrimitiveType, Type};
use serde::{Deserialize, Serialize};

/// A named program variable with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    pub ty: Type,
}

impl Var {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Convenience constructor for an `int`-typed variable.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, Type::Primitive(PrimitiveType::Int))
    }

    pub fn holds_int(&self) -> bool {
        self.ty.holds_int()
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Relational and equality operators; they fold to 1 or 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Shift operators; `Ushr` is the logical (zero-filling) right shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftOp {
    Shl,
    Shr,
    Ushr,
}

/// Bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
}

/// A binary operator, tagged by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Arithmetic(ArithmeticOp),
    Condition(ConditionOp),
    Shift(ShiftOp),
    Bitwise(BitwiseOp),
}

/// A binary expression over two sub-expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExp {
    pub op: BinaryOp,
    pub lhs: Box<Exp>,
    pub rhs: Box<Exp>,
}

/// Right-hand-side expression shapes.
///
/// Allocation, cast, field access, array access, and call are recognized but
/// not modeled by the constant lattice; they matter to dead-code detection
/// because each of them can fault or run arbitrary code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Exp {
    Var(Var),
    IntLiteral(i32),
    Binary(BinaryExp),
    /// Object or array allocation.
    New { ty: Type },
    Cast { ty: Type, value: Box<Exp> },
    /// Field read; `base` is `None` for static fields.
    FieldAccess {
        base: Option<Box<Exp>>,
        field: String,
    },
    ArrayAccess { array: Box<Exp>, index: Box<Exp> },
    Call { callee: String, args: Vec<Exp> },
}

impl Exp {
    pub fn var(var: Var) -> Self {
        Exp::Var(var)
    }

    pub fn lit(value: i32) -> Self {
        Exp::IntLiteral(value)
    }

    pub fn binary(op: BinaryOp, lhs: Exp, rhs: Exp) -> Self {
        Exp::Binary(BinaryExp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn arithmetic(op: ArithmeticOp, lhs: Exp, rhs: Exp) -> Self {
        Self::binary(BinaryOp::Arithmetic(op), lhs, rhs)
    }

    pub fn condition(op: ConditionOp, lhs: Exp, rhs: Exp) -> Self {
        Self::binary(BinaryOp::Condition(op), lhs, rhs)
    }

    pub fn shift(op: ShiftOp, lhs: Exp, rhs: Exp) -> Self {
        Self::binary(BinaryOp::Shift(op), lhs, rhs)
    }

    pub fn bitwise(op: BitwiseOp, lhs: Exp, rhs: Exp) -> Self {
        Self::binary(BinaryOp::Bitwise(op), lhs, rhs)
    }
}

/// Assignment targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LValue {
    Var(Var),
    Field {
        base: Option<Box<Exp>>,
        field: String,
    },
    ArrayElem { array: Box<Exp>, index: Box<Exp> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_constructor_boxes_operands() {
        let exp = Exp::arithmetic(ArithmeticOp::Add, Exp::lit(1), Exp::lit(2));
        let Exp::Binary(bin) = exp else {
            panic!("expected binary expression");
        };
        assert_eq!(bin.op, BinaryOp::Arithmetic(ArithmeticOp::Add));
        assert_eq!(*bin.lhs, Exp::IntLiteral(1));
        assert_eq!(*bin.rhs, Exp::IntLiteral(2));
    }

    #[test]
    fn test_var_identity_includes_type() {
        let as_int = Var::int("x");
        let as_long = Var::new("x", Type::Primitive(PrimitiveType::Long));
        assert_ne!(as_int, as_long);
    }
}
