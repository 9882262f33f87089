//! One-call per-method analysis pipeline.

use crate::cfg::ControlFlowGraph;
use crate::config::{AnalysisConfig, AnalysisId};
use crate::constprop::ConstantPropagation;
use crate::deadcode::{DeadCodeDetection, LiveVariables};
use crate::solver::WorklistSolver;
use anyhow::Result;
use serde::Serialize;
use silt_ir::{MethodBody, StmtIndex};
use std::collections::BTreeMap;
use tracing::debug;

/// Summary of one analyzed method.
#[derive(Debug, Clone, Serialize)]
pub struct MethodReport {
    pub method: String,
    /// Dead statement indices, ascending.
    pub dead_statements: Vec<StmtIndex>,
    /// Per statement, the variables with a known constant on exit from it.
    pub constants: BTreeMap<StmtIndex, BTreeMap<String, i32>>,
    /// Solver iterations until the fixed point.
    pub iterations: usize,
}

impl MethodReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the CFG for a method body, run constant propagation, and detect
/// dead code against the supplied liveness facts.
pub fn analyze_method(body: MethodBody, live: &LiveVariables) -> Result<MethodReport> {
    let cfg = ControlFlowGraph::build(body)?;

    let constprop =
        ConstantPropagation::new(AnalysisConfig::new(AnalysisId::CONSTANT_PROPAGATION));
    let constants = WorklistSolver::solve(&constprop, &cfg);
    debug!(
        method = cfg.body().name(),
        iterations = constants.iterations(),
        "constant propagation converged"
    );

    let detector = DeadCodeDetection::new(AnalysisConfig::new(AnalysisId::DEAD_CODE));
    let dead = detector.analyze(&cfg, &constants, live);

    let mut constant_bindings = BTreeMap::new();
    for stmt in cfg.body().stmts() {
        let Some(fact) = constants.out_fact(cfg.node_of(stmt.index)) else {
            continue;
        };
        let known: BTreeMap<String, i32> = fact
            .iter()
            .filter_map(|(var, value)| value.as_constant().map(|n| (var.name.clone(), n)))
            .collect();
        if !known.is_empty() {
            constant_bindings.insert(stmt.index, known);
        }
    }

    Ok(MethodReport {
        method: cfg.body().name().to_string(),
        dead_statements: dead.into_iter().collect(),
        constants: constant_bindings,
        iterations: constants.iterations(),
    })
}
