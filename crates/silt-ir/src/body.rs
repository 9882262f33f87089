//! Method bodies and their construction.

use crate::exp::{Exp, LValue, Var};
use crate::stmt::{Stmt, StmtIndex, StmtKind};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors found while validating a method body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    #[error("statement {index} jumps to nonexistent target {target}")]
    TargetOutOfBounds { index: StmtIndex, target: StmtIndex },
    #[error("statement at position {position} carries index {index}")]
    IndexMismatch { position: usize, index: StmtIndex },
}

/// A single method: its parameters and ordered statements.
///
/// Bodies are immutable once built; analyses treat them as read-only input
/// for the lifetime of one solve.
#[derive(Debug, Clone)]
pub struct MethodBody {
    name: String,
    params: SmallVec<[Var; 4]>,
    stmts: Vec<Stmt>,
}

impl MethodBody {
    pub fn builder(name: impl Into<String>) -> BodyBuilder {
        BodyBuilder {
            name: name.into(),
            params: SmallVec::new(),
            stmts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Var] {
        &self.params
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn stmt(&self, index: StmtIndex) -> Option<&Stmt> {
        self.stmts.get(index)
    }

    /// Check that statement indices are consecutive and every branch target
    /// names an existing statement.
    pub fn validate(&self) -> Result<(), BodyError> {
        for (position, stmt) in self.stmts.iter().enumerate() {
            if stmt.index != position {
                return Err(BodyError::IndexMismatch {
                    position,
                    index: stmt.index,
                });
            }
            for target in branch_targets(stmt) {
                if target >= self.stmts.len() {
                    return Err(BodyError::TargetOutOfBounds {
                        index: stmt.index,
                        target,
                    });
                }
            }
        }
        Ok(())
    }
}

fn branch_targets(stmt: &Stmt) -> Vec<StmtIndex> {
    match &stmt.kind {
        StmtKind::If { target, .. } | StmtKind::Goto { target } => vec![*target],
        StmtKind::Switch { cases, default, .. } => {
            let mut targets: Vec<StmtIndex> = cases.iter().map(|(_, t)| *t).collect();
            targets.push(*default);
            targets
        }
        StmtKind::Assign { .. } | StmtKind::Return { .. } | StmtKind::Nop => Vec::new(),
    }
}

/// Fluent builder for method bodies. Statement indices are assigned in
/// insertion order; each statement defaults to source line `index + 1`.
pub struct BodyBuilder {
    name: String,
    params: SmallVec<[Var; 4]>,
    stmts: Vec<Stmt>,
}

impl BodyBuilder {
    pub fn param(&mut self, var: Var) -> &mut Self {
        self.params.push(var);
        self
    }

    /// Assignment to a plain variable.
    pub fn assign(&mut self, lhs: Var, rhs: Exp) -> StmtIndex {
        self.push(StmtKind::Assign {
            lhs: LValue::Var(lhs),
            rhs,
        })
    }

    /// Assignment to an arbitrary lvalue (field, array element).
    pub fn store(&mut self, lhs: LValue, rhs: Exp) -> StmtIndex {
        self.push(StmtKind::Assign { lhs, rhs })
    }

    /// Conditional branch: jumps to `target` when `condition` holds, falls
    /// through otherwise.
    pub fn branch_if(&mut self, condition: Exp, target: StmtIndex) -> StmtIndex {
        self.push(StmtKind::If { condition, target })
    }

    pub fn goto(&mut self, target: StmtIndex) -> StmtIndex {
        self.push(StmtKind::Goto { target })
    }

    pub fn switch(
        &mut self,
        discriminant: Exp,
        cases: Vec<(i32, StmtIndex)>,
        default: StmtIndex,
    ) -> StmtIndex {
        self.push(StmtKind::Switch {
            discriminant,
            cases,
            default,
        })
    }

    pub fn ret(&mut self, value: Option<Exp>) -> StmtIndex {
        self.push(StmtKind::Return { value })
    }

    pub fn nop(&mut self) -> StmtIndex {
        self.push(StmtKind::Nop)
    }

    /// Override the source line of an already-added statement. Passing `None`
    /// marks it as compiler-synthesized.
    pub fn set_line(&mut self, index: StmtIndex, line: Option<u32>) -> &mut Self {
        if let Some(stmt) = self.stmts.get_mut(index) {
            stmt.line = line;
        }
        self
    }

    pub fn build(self) -> Result<MethodBody, BodyError> {
        let body = MethodBody {
            name: self.name,
            params: self.params,
            stmts: self.stmts,
        };
        body.validate()?;
        Ok(body)
    }

    fn push(&mut self, kind: StmtKind) -> StmtIndex {
        let index = self.stmts.len();
        self.stmts.push(Stmt {
            index,
            line: Some(index as u32 + 1),
            kind,
        });
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exp::ConditionOp;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn prop_builder_indices_are_consecutive(count: u8) -> bool {
        let mut builder = MethodBody::builder("generated");
        for _ in 0..count {
            builder.nop();
        }
        builder.ret(None);
        let body = builder.build().unwrap();
        body.stmts().iter().enumerate().all(|(i, s)| s.index == i)
    }

    #[test]
    fn test_builder_assigns_consecutive_indices() {
        let x = Var::int("x");
        let mut builder = MethodBody::builder("m");
        let first = builder.assign(x.clone(), Exp::lit(1));
        let second = builder.assign(x.clone(), Exp::lit(2));
        let third = builder.ret(Some(Exp::var(x)));
        assert_eq!((first, second, third), (0, 1, 2));

        let body = builder.build().unwrap();
        assert_eq!(body.stmts().len(), 3);
        assert_eq!(body.stmt(1).unwrap().line, Some(2));
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_target() {
        let x = Var::int("x");
        let mut builder = MethodBody::builder("m");
        builder.branch_if(
            Exp::condition(ConditionOp::Eq, Exp::var(x), Exp::lit(0)),
            7,
        );
        builder.ret(None);
        let err = builder.build().unwrap_err();
        assert_eq!(err, BodyError::TargetOutOfBounds { index: 0, target: 7 });
    }

    #[test]
    fn test_set_line_marks_synthetic() {
        let mut builder = MethodBody::builder("m");
        let index = builder.nop();
        builder.set_line(index, None);
        builder.ret(None);
        let body = builder.build().unwrap();
        assert!(body.stmt(index).unwrap().is_synthetic());
    }

    #[test]
    fn test_params_are_recorded_in_order() {
        let mut builder = MethodBody::builder("m");
        builder.param(Var::int("a")).param(Var::int("b"));
        builder.ret(None);
        let body = builder.build().unwrap();
        let names: Vec<_> = body.params().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
