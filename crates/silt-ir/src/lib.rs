//! Typed three-address intermediate representation
//!
//! This crate defines the language-side surface consumed by the analyses in
//! `silt-dataflow`:
//! - Primitive and reference types, with the word-sized-integer predicate
//! - Variables, expressions, and assignment targets
//! - Statements with stable indices and explicit branch targets
//! - Method bodies with a fluent builder and target validation

pub mod body;
pub mod exp;
pub mod stmt;
pub mod types;

pub use body::{BodyBuilder, BodyError, MethodBody};
pub use exp::{ArithmeticOp, BinaryExp, BinaryOp, BitwiseOp, ConditionOp, Exp, LValue, ShiftOp, Var};
pub use stmt::{Stmt, StmtIndex, StmtKind};
pub use types::{PrimitiveType, Type};
