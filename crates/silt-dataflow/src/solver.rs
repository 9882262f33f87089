//! Dataflow analysis contract and worklist-based fixpoint solver.

use crate::cfg::FlowGraph;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use tracing::debug;

/// Direction of a dataflow analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Contract every dataflow analysis implements.
///
/// The solver drives the analysis entirely through this trait: it never
/// inspects facts beyond cloning and comparing them.
pub trait DataflowAnalysis<G: FlowGraph> {
    /// The fact type propagated through the graph.
    type Fact: Clone + PartialEq;

    fn direction(&self) -> Direction;

    /// Fact assumed to hold at the graph's entry before anything executes.
    fn boundary_fact(&self, graph: &G) -> Self::Fact;

    /// Fact every other node starts from.
    fn initial_fact(&self) -> Self::Fact;

    /// Accumulate `source` into `target` in place.
    fn meet_into(&self, source: &Self::Fact, target: &mut Self::Fact);

    /// Apply the node's transfer function: `output` holds the node's previous
    /// out-fact on entry and the new one on return. Returns whether `output`
    /// changed.
    fn transfer_node(
        &self,
        graph: &G,
        node: G::Node,
        input: &Self::Fact,
        output: &mut Self::Fact,
    ) -> bool;
}

/// Per-node in/out facts of a completed solve, read-only afterward.
#[derive(Debug)]
pub struct DataflowResult<N, F> {
    in_facts: HashMap<N, F>,
    out_facts: HashMap<N, F>,
    iterations: usize,
}

impl<N: Copy + Eq + Hash, F> DataflowResult<N, F> {
    pub fn in_fact(&self, node: N) -> Option<&F> {
        self.in_facts.get(&node)
    }

    pub fn out_fact(&self, node: N) -> Option<&F> {
        self.out_facts.get(&node)
    }

    /// Number of nodes dequeued before the fixed point was reached.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Worklist-based fixpoint solver.
///
/// Termination follows from the finite lattice height: every enqueue after
/// the initial seeding is caused by some node's fact strictly rising, so the
/// total work is bounded by height times the number of edges.
pub struct WorklistSolver;

impl WorklistSolver {
    pub fn solve<G, A>(analysis: &A, graph: &G) -> DataflowResult<G::Node, A::Fact>
    where
        G: FlowGraph,
        A: DataflowAnalysis<G>,
    {
        match analysis.direction() {
            Direction::Forward => Self::solve_forward(analysis, graph),
            // declaring a backward analysis is a configuration error, not a
            // data error; it must fail, never degrade to a no-op
            Direction::Backward => {
                unimplemented!("backward dataflow solving is not supported")
            }
        }
    }

    fn solve_forward<G, A>(analysis: &A, graph: &G) -> DataflowResult<G::Node, A::Fact>
    where
        G: FlowGraph,
        A: DataflowAnalysis<G>,
    {
        let nodes = graph.node_order();
        let entry = graph.entry();

        let mut in_facts: HashMap<G::Node, A::Fact> = HashMap::with_capacity(nodes.len());
        let mut out_facts: HashMap<G::Node, A::Fact> = HashMap::with_capacity(nodes.len());
        for &node in &nodes {
            if node == entry {
                in_facts.insert(node, analysis.boundary_fact(graph));
                out_facts.insert(node, analysis.boundary_fact(graph));
            } else {
                in_facts.insert(node, analysis.initial_fact());
                out_facts.insert(node, analysis.initial_fact());
            }
        }

        let mut worklist: VecDeque<G::Node> = nodes.iter().copied().collect();
        let mut pending: HashSet<G::Node> = worklist.iter().copied().collect();

        let mut iterations = 0usize;
        while let Some(node) = worklist.pop_front() {
            pending.remove(&node);
            iterations += 1;

            let mut input = in_facts
                .remove(&node)
                .unwrap_or_else(|| analysis.initial_fact());
            for &pred in graph.preds_of(node) {
                if let Some(pred_out) = out_facts.get(&pred) {
                    analysis.meet_into(pred_out, &mut input);
                }
            }

            let mut output = out_facts
                .remove(&node)
                .unwrap_or_else(|| analysis.initial_fact());
            let changed = analysis.transfer_node(graph, node, &input, &mut output);

            in_facts.insert(node, input);
            out_facts.insert(node, output);

            if changed {
                for succ in graph.succs_of(node) {
                    if pending.insert(succ) {
                        worklist.push_back(succ);
                    }
                }
            }
        }

        debug!(iterations, "dataflow solve reached its fixed point");
        DataflowResult {
            in_facts,
            out_facts,
            iterations,
        }
    }
}
