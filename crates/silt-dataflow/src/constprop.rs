//! Forward constant propagation over the integer lattice.
//!
//! Computes, for every program point, which integer-typed variables hold a
//! known constant. Assignments outside the modeled subset (non-variable
//! targets, variables that cannot hold an int) pass facts through unchanged.

use crate::cfg::{ControlFlowGraph, NodeId};
use crate::config::AnalysisConfig;
use crate::fact::CpFact;
use crate::lattice::Value;
use crate::solver::{DataflowAnalysis, Direction};
use silt_ir::{ArithmeticOp, BinaryExp, BinaryOp, BitwiseOp, ConditionOp, Exp, LValue, ShiftOp, StmtKind};

pub struct ConstantPropagation {
    config: AnalysisConfig,
}

impl ConstantPropagation {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

impl DataflowAnalysis<ControlFlowGraph> for ConstantPropagation {
    type Fact = CpFact;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn boundary_fact(&self, graph: &ControlFlowGraph) -> CpFact {
        let mut fact = CpFact::new();
        for param in graph.body().params() {
            if param.holds_int() {
                // parameters come from callers and are never statically known
                fact.update(param.clone(), Value::Nac);
            }
        }
        fact
    }

    fn initial_fact(&self) -> CpFact {
        CpFact::new()
    }

    fn meet_into(&self, source: &CpFact, target: &mut CpFact) {
        for (var, value) in source.iter() {
            let merged = value.meet(target.get(var));
            target.update(var.clone(), merged);
        }
    }

    fn transfer_node(
        &self,
        graph: &ControlFlowGraph,
        node: NodeId,
        input: &CpFact,
        output: &mut CpFact,
    ) -> bool {
        let mut changed = output.copy_from(input);
        let Some(stmt) = graph.stmt_of(node) else {
            return changed;
        };
        let StmtKind::Assign {
            lhs: LValue::Var(lhs),
            rhs,
        } = &stmt.kind
        else {
            return changed;
        };
        if !lhs.holds_int() {
            return changed;
        }
        changed |= output.update(lhs.clone(), evaluate(rhs, input));
        changed
    }
}

/// Evaluate an expression against the fact holding before the statement.
///
/// Pure in both arguments. Unmodeled expression shapes evaluate to `Nac`,
/// a sound over-approximation.
pub fn evaluate(exp: &Exp, fact: &CpFact) -> Value {
    match exp {
        Exp::Var(var) => fact.get(var),
        Exp::IntLiteral(n) => Value::Constant(*n),
        Exp::Binary(bin) => evaluate_binary(bin, fact),
        Exp::New { .. }
        | Exp::Cast { .. }
        | Exp::FieldAccess { .. }
        | Exp::ArrayAccess { .. }
        | Exp::Call { .. } => Value::Nac,
    }
}

fn evaluate_binary(bin: &BinaryExp, fact: &CpFact) -> Value {
    let lhs = evaluate(&bin.lhs, fact);
    let rhs = evaluate(&bin.rhs, fact);
    // division or remainder by a known zero faults at run time: no defined
    // value reaches this point, whatever the left operand is
    if rhs == Value::Constant(0) {
        if let BinaryOp::Arithmetic(ArithmeticOp::Div | ArithmeticOp::Rem) = bin.op {
            return Value::Undef;
        }
    }
    match (lhs, rhs) {
        (Value::Constant(a), Value::Constant(b)) => fold(bin.op, a, b),
        (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
        _ => Value::Undef,
    }
}

/// Apply a concrete operator with 32-bit wraparound signed semantics.
fn fold(op: BinaryOp, a: i32, b: i32) -> Value {
    match op {
        BinaryOp::Arithmetic(op) => fold_arithmetic(op, a, b),
        BinaryOp::Condition(op) => Value::Constant(fold_condition(op, a, b) as i32),
        BinaryOp::Shift(op) => Value::Constant(fold_shift(op, a, b)),
        BinaryOp::Bitwise(op) => Value::Constant(fold_bitwise(op, a, b)),
    }
}

fn fold_arithmetic(op: ArithmeticOp, a: i32, b: i32) -> Value {
    let n = match op {
        ArithmeticOp::Add => a.wrapping_add(b),
        ArithmeticOp::Sub => a.wrapping_sub(b),
        ArithmeticOp::Mul => a.wrapping_mul(b),
        ArithmeticOp::Div => {
            if b == 0 {
                return Value::Undef;
            }
            a.wrapping_div(b)
        }
        ArithmeticOp::Rem => {
            if b == 0 {
                return Value::Undef;
            }
            a.wrapping_rem(b)
        }
    };
    Value::Constant(n)
}

fn fold_condition(op: ConditionOp, a: i32, b: i32) -> bool {
    match op {
        ConditionOp::Eq => a == b,
        ConditionOp::Ne => a != b,
        ConditionOp::Lt => a < b,
        ConditionOp::Le => a <= b,
        ConditionOp::Gt => a > b,
        ConditionOp::Ge => a >= b,
    }
}

// Shift amounts take only their low five bits, as in the source language.
fn fold_shift(op: ShiftOp, a: i32, b: i32) -> i32 {
    match op {
        ShiftOp::Shl => a.wrapping_shl(b as u32),
        ShiftOp::Shr => a.wrapping_shr(b as u32),
        ShiftOp::Ushr => ((a as u32).wrapping_shr(b as u32)) as i32,
    }
}

fn fold_bitwise(op: BitwiseOp, a: i32, b: i32) -> i32 {
    match op {
        BitwiseOp::And => a & b,
        BitwiseOp::Or => a | b,
        BitwiseOp::Xor => a ^ b,
    }
}
