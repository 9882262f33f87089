//! Statement-level control-flow graphs.
//!
//! Each statement of a method body becomes one node; two synthetic nodes
//! mark entry and exit. Edges carry the kind of transition they represent
//! (fallthrough, branch outcome, switch case, exceptional), and predecessor
//! lists are maintained symmetrically with successor edges.

use silt_ir::{BodyError, MethodBody, Stmt, StmtIndex, StmtKind};
use smallvec::SmallVec;
use std::hash::Hash;
use thiserror::Error;

/// Identifier of a CFG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

const ENTRY: NodeId = NodeId(0);
const EXIT: NodeId = NodeId(1);
const STMT_BASE: usize = 2;

/// Kind of a control-flow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Normal sequential flow, including jumps to and from unconditional
    /// gotos and the edge from a return to the exit node.
    Fallthrough,
    IfTrue,
    IfFalse,
    /// Switch edge taken when the discriminant equals the carried value.
    SwitchCase(i32),
    SwitchDefault,
    Exceptional,
}

/// An outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub target: NodeId,
}

/// Errors raised while building a CFG.
#[derive(Debug, Error)]
pub enum CfgError {
    #[error(transparent)]
    InvalidBody(#[from] BodyError),
}

/// Capability contract the solver needs from a graph.
pub trait FlowGraph {
    type Node: Copy + Eq + Hash;

    fn entry(&self) -> Self::Node;

    /// Every node, in a deterministic order starting at the entry.
    fn node_order(&self) -> Vec<Self::Node>;

    fn preds_of(&self, node: Self::Node) -> &[Self::Node];

    fn succs_of(&self, node: Self::Node) -> Vec<Self::Node>;
}

/// The control-flow graph of one method body, which it owns.
#[derive(Debug)]
pub struct ControlFlowGraph {
    body: MethodBody,
    out_edges: Vec<SmallVec<[Edge; 2]>>,
    preds: Vec<SmallVec<[NodeId; 2]>>,
}

impl ControlFlowGraph {
    /// Build the graph for a method body, validating it first.
    pub fn build(body: MethodBody) -> Result<Self, CfgError> {
        body.validate()?;
        let node_count = body.stmts().len() + STMT_BASE;
        let mut cfg = Self {
            body,
            out_edges: vec![SmallVec::new(); node_count],
            preds: vec![SmallVec::new(); node_count],
        };

        let first = if cfg.body.stmts().is_empty() {
            EXIT
        } else {
            cfg.node_of(0)
        };
        cfg.add_edge(ENTRY, Edge {
            kind: EdgeKind::Fallthrough,
            target: first,
        });

        for position in 0..cfg.body.stmts().len() {
            let kind = cfg.body.stmts()[position].kind.clone();
            let next = cfg.next_in_sequence(position);
            match kind {
                StmtKind::Assign { .. } | StmtKind::Nop => {
                    cfg.add_edge(cfg.node_of(position), Edge {
                        kind: EdgeKind::Fallthrough,
                        target: next,
                    });
                }
                StmtKind::If { target, .. } => {
                    cfg.add_edge(cfg.node_of(position), Edge {
                        kind: EdgeKind::IfTrue,
                        target: cfg.node_of(target),
                    });
                    cfg.add_edge(cfg.node_of(position), Edge {
                        kind: EdgeKind::IfFalse,
                        target: next,
                    });
                }
                StmtKind::Goto { target } => {
                    cfg.add_edge(cfg.node_of(position), Edge {
                        kind: EdgeKind::Fallthrough,
                        target: cfg.node_of(target),
                    });
                }
                StmtKind::Switch { cases, default, .. } => {
                    for (value, target) in cases {
                        cfg.add_edge(cfg.node_of(position), Edge {
                            kind: EdgeKind::SwitchCase(value),
                            target: cfg.node_of(target),
                        });
                    }
                    cfg.add_edge(cfg.node_of(position), Edge {
                        kind: EdgeKind::SwitchDefault,
                        target: cfg.node_of(default),
                    });
                }
                StmtKind::Return { .. } => {
                    cfg.add_edge(cfg.node_of(position), Edge {
                        kind: EdgeKind::Fallthrough,
                        target: EXIT,
                    });
                }
            }
        }

        Ok(cfg)
    }

    pub fn entry(&self) -> NodeId {
        ENTRY
    }

    pub fn exit(&self) -> NodeId {
        EXIT
    }

    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// The node carrying the statement at `index`.
    pub fn node_of(&self, index: StmtIndex) -> NodeId {
        NodeId(index + STMT_BASE)
    }

    /// The statement at `node`, or `None` for the synthetic entry/exit.
    pub fn stmt_of(&self, node: NodeId) -> Option<&Stmt> {
        node.0.checked_sub(STMT_BASE).and_then(|i| self.body.stmt(i))
    }

    pub fn out_edges_of(&self, node: NodeId) -> &[Edge] {
        &self.out_edges[node.0]
    }

    pub fn preds_of(&self, node: NodeId) -> &[NodeId] {
        &self.preds[node.0]
    }

    pub fn succs_of(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges[node.0].iter().map(|edge| edge.target)
    }

    /// All nodes: entry, the statements in index order, then exit.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(ENTRY)
            .chain((0..self.body.stmts().len()).map(|i| self.node_of(i)))
            .chain(std::iter::once(EXIT))
    }

    fn next_in_sequence(&self, position: usize) -> NodeId {
        if position + 1 < self.body.stmts().len() {
            self.node_of(position + 1)
        } else {
            EXIT
        }
    }

    fn add_edge(&mut self, from: NodeId, edge: Edge) {
        self.out_edges[from.0].push(edge);
        if !self.preds[edge.target.0].contains(&from) {
            self.preds[edge.target.0].push(from);
        }
    }
}

impl FlowGraph for ControlFlowGraph {
    type Node = NodeId;

    fn entry(&self) -> NodeId {
        ENTRY
    }

    fn node_order(&self) -> Vec<NodeId> {
        self.nodes().collect()
    }

    fn preds_of(&self, node: NodeId) -> &[NodeId] {
        ControlFlowGraph::preds_of(self, node)
    }

    fn succs_of(&self, node: NodeId) -> Vec<NodeId> {
        ControlFlowGraph::succs_of(self, node).collect()
    }
}
