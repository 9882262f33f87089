//! Statements of a three-address method body.

use crate::exp::{Exp, LValue};
use serde::{Deserialize, Serialize};

/// Index of a statement within its method body.
pub type StmtIndex = usize;

/// Statement shapes. Branch targets are statement indices; conditional
/// branches fall through to the next statement when the condition is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Assign {
        lhs: LValue,
        rhs: Exp,
    },
    If {
        condition: Exp,
        target: StmtIndex,
    },
    Goto {
        target: StmtIndex,
    },
    Switch {
        discriminant: Exp,
        cases: Vec<(i32, StmtIndex)>,
        default: StmtIndex,
    },
    Return {
        value: Option<Exp>,
    },
    Nop,
}

/// A statement with its stable index and source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub index: StmtIndex,
    /// Source line; `None` marks compiler-synthesized statements.
    pub line: Option<u32>,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn is_synthetic(&self) -> bool {
        self.line.is_none()
    }
}
