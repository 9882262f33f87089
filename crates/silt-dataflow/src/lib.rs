//! Fixed-point dataflow analysis over statement-level control-flow graphs.
//!
//! This crate implements:
//! - Control-flow graph construction from three-address method bodies, with
//!   kinded edges and synthetic entry/exit nodes
//! - A three-level constant lattice (`Undef ⊑ Constant(n) ⊑ NAC`) with meet
//! - A worklist-based fixpoint solver generic over node and fact types
//! - Forward constant propagation for integer-typed variables
//! - Dead-code detection combining constant facts, external liveness facts,
//!   and CFG reachability

pub mod cfg;
pub mod config;
pub mod constprop;
pub mod deadcode;
pub mod fact;
pub mod lattice;
pub mod runner;
pub mod solver;

pub use cfg::{CfgError, ControlFlowGraph, Edge, EdgeKind, FlowGraph, NodeId};
pub use config::{AnalysisConfig, AnalysisId};
pub use constprop::{evaluate, ConstantPropagation};
pub use deadcode::{DeadCodeDetection, LiveVariables};
pub use fact::CpFact;
pub use lattice::Value;
pub use runner::{analyze_method, MethodReport};
pub use solver::{DataflowAnalysis, DataflowResult, Direction, WorklistSolver};
