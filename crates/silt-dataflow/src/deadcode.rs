//! Dead-code detection: unreachable statements and dead assignments.
//!
//! Walks the CFG from its entry, pruning branch and switch edges whose
//! outcome is fixed by constant propagation. Statements never reached are
//! unreachable code; reachable assignments whose target is not live
//! afterwards and whose right-hand side cannot fault are dead assignments.

use crate::cfg::{ControlFlowGraph, EdgeKind, NodeId};
use crate::config::AnalysisConfig;
use crate::constprop::evaluate;
use crate::fact::CpFact;
use crate::solver::DataflowResult;
use silt_ir::{ArithmeticOp, BinaryOp, Exp, LValue, Stmt, StmtIndex, StmtKind, Var};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Per-statement sets of variables live immediately after the statement.
///
/// Produced by an external liveness analysis and consumed read-only; this
/// crate's solver is forward-only, so liveness facts arrive from outside.
#[derive(Debug, Clone, Default)]
pub struct LiveVariables {
    live_after: HashMap<StmtIndex, HashSet<Var>>,
}

impl LiveVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_live_after(&mut self, index: StmtIndex, vars: impl IntoIterator<Item = Var>) {
        self.live_after.insert(index, vars.into_iter().collect());
    }

    pub fn is_live_after(&self, index: StmtIndex, var: &Var) -> bool {
        self.live_after
            .get(&index)
            .is_some_and(|vars| vars.contains(var))
    }
}

/// Finds statements that can never execute or whose results are never read.
pub struct DeadCodeDetection {
    config: AnalysisConfig,
}

impl DeadCodeDetection {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Returns dead statement indices in ascending order. Compiler-synthesized
    /// statements (no source line) are never reported.
    pub fn analyze(
        &self,
        cfg: &ControlFlowGraph,
        constants: &DataflowResult<NodeId, CpFact>,
        live: &LiveVariables,
    ) -> BTreeSet<StmtIndex> {
        let mut dead = BTreeSet::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(cfg.entry());

        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            let Some(stmt) = cfg.stmt_of(node) else {
                queue.extend(cfg.succs_of(node));
                continue;
            };

            if is_dead_assign(stmt, live) {
                dead.insert(stmt.index);
            }

            match &stmt.kind {
                StmtKind::If { condition, .. } => {
                    match branch_value(condition, constants, node) {
                        Some(1) => {
                            self.follow_edges(cfg, node, EdgeKind::IfTrue, &mut queue);
                        }
                        Some(0) => {
                            self.follow_edges(cfg, node, EdgeKind::IfFalse, &mut queue);
                        }
                        _ => queue.extend(cfg.succs_of(node)),
                    }
                }
                StmtKind::Switch { discriminant, .. } => {
                    match branch_value(discriminant, constants, node) {
                        Some(value) => {
                            let matched =
                                self.follow_edges(cfg, node, EdgeKind::SwitchCase(value), &mut queue);
                            if !matched {
                                self.follow_edges(cfg, node, EdgeKind::SwitchDefault, &mut queue);
                            }
                        }
                        None => queue.extend(cfg.succs_of(node)),
                    }
                }
                StmtKind::Assign { .. }
                | StmtKind::Goto { .. }
                | StmtKind::Return { .. }
                | StmtKind::Nop => queue.extend(cfg.succs_of(node)),
            }
        }

        // everything the walk never reached is unreachable code
        for stmt in cfg.body().stmts() {
            if !visited.contains(&cfg.node_of(stmt.index)) {
                dead.insert(stmt.index);
            }
        }

        dead.retain(|&index| {
            cfg.body()
                .stmt(index)
                .is_some_and(|stmt| !stmt.is_synthetic())
        });
        dead
    }

    /// Enqueue the targets of every outgoing edge of the given kind; returns
    /// whether any edge matched.
    fn follow_edges(
        &self,
        cfg: &ControlFlowGraph,
        node: NodeId,
        kind: EdgeKind,
        queue: &mut VecDeque<NodeId>,
    ) -> bool {
        let mut matched = false;
        for edge in cfg.out_edges_of(node) {
            if edge.kind == kind {
                queue.push_back(edge.target);
                matched = true;
            }
        }
        matched
    }
}

fn branch_value(
    exp: &Exp,
    constants: &DataflowResult<NodeId, CpFact>,
    node: NodeId,
) -> Option<i32> {
    let fact = constants.out_fact(node)?;
    evaluate(exp, fact).as_constant()
}

fn is_dead_assign(stmt: &Stmt, live: &LiveVariables) -> bool {
    let StmtKind::Assign {
        lhs: LValue::Var(var),
        rhs,
    } = &stmt.kind
    else {
        return false;
    };
    if live.is_live_after(stmt.index, var) {
        return false;
    }
    has_no_side_effect(rhs)
}

/// Whether evaluating the expression is provably free of side effects.
/// Division and remainder are excluded categorically, independent of
/// operand values.
fn has_no_side_effect(exp: &Exp) -> bool {
    match exp {
        Exp::Var(_) | Exp::IntLiteral(_) => true,
        Exp::Binary(bin) => {
            if matches!(
                bin.op,
                BinaryOp::Arithmetic(ArithmeticOp::Div | ArithmeticOp::Rem)
            ) {
                return false;
            }
            has_no_side_effect(&bin.lhs) && has_no_side_effect(&bin.rhs)
        }
        // allocation may run initializers, a cast may fail, field and array
        // accesses may fault, and a call runs arbitrary code
        Exp::New { .. }
        | Exp::Cast { .. }
        | Exp::FieldAccess { .. }
        | Exp::ArrayAccess { .. }
        | Exp::Call { .. } => false,
    }
}
