//! Look-through ownership propagation from a root company.
//!
//! The root starts at 100%, each edge scales the running percentage by its
//! direct stake, and every distinct path adds its contribution to the child's
//! total. Because contributions are linear, amounts are summed per company
//! and depth and pushed down the condensation of the graph in topological
//! order; shared subsidiaries are expanded once per depth, not once per path.
//! Inside a strongly connected component the walk falls back to an explicit
//! stack with an active-path set, so cyclic data is cut at the back edge
//! instead of recursing forever.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::company::CompanyId;
use crate::error::EngineError;

use super::index::OwnershipGraph;

/// Company id → ultimate ownership percentage (0–100 scale, not clamped).
pub type OwnershipMap = BTreeMap<CompanyId, f64>;

/// Default ceiling on traversal depth below a root.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for a propagation run.
#[derive(Debug, Clone)]
pub struct PropagationConfig {
    /// Maximum number of ownership levels followed below the root.
    pub max_depth: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Data-quality finding raised while propagating. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PropagationWarning {
    /// An edge led back onto the active path; it was not followed.
    Cycle {
        /// Active path from the company where the chain entered the cycle,
        /// ending with the company that was about to be re-entered.
        path: Vec<CompanyId>,
    },
    /// Descent stopped at the depth ceiling below this company.
    DepthTruncated { company_id: CompanyId, depth: usize },
    /// A reachable company has a relationship to a company not in the snapshot.
    DanglingEdge {
        relationship_id: String,
        missing: CompanyId,
    },
}

impl std::fmt::Display for PropagationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropagationWarning::Cycle { path } => {
                let ids: Vec<&str> = path.iter().map(CompanyId::as_str).collect();
                write!(f, "ownership cycle: {}", ids.join(" -> "))
            }
            PropagationWarning::DepthTruncated { company_id, depth } => {
                write!(f, "traversal truncated below {company_id} at depth {depth}")
            }
            PropagationWarning::DanglingEdge {
                relationship_id,
                missing,
            } => write!(
                f,
                "relationship {relationship_id} references unknown company {missing}"
            ),
        }
    }
}

/// Result of one propagation (or of several, merged).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Propagation {
    /// Roots the figures were computed from.
    pub roots: Vec<CompanyId>,
    /// Ultimate ownership of every reachable company. Roots are not listed
    /// under their own propagation.
    pub ownership: OwnershipMap,
    pub warnings: Vec<PropagationWarning>,
    /// Deepest level reached below any root.
    pub depth_reached: usize,
}

impl Propagation {
    /// Ownership of one company, if it was reached.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.ownership.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ownership.is_empty()
    }

    pub fn has_cycles(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, PropagationWarning::Cycle { .. }))
    }
}

struct Frame {
    node: NodeIndex,
    running: f64,
    children: Vec<(NodeIndex, f64)>,
    next: usize,
}

impl Frame {
    fn new(graph: &OwnershipGraph, node: NodeIndex, running: f64) -> Self {
        let children = graph
            .graph()
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.target(), e.weight().direct_pct))
            .collect();
        Self {
            node,
            running,
            children,
            next: 0,
        }
    }
}

/// Compute the ultimate ownership `root` holds in every company it reaches.
///
/// A child's figure is `running × direct_pct / 100` summed over all distinct
/// paths. An edge back onto the active path is dropped and reported as a
/// [`PropagationWarning::Cycle`]. Descent stops at `config.max_depth`.
///
/// Returns [`EngineError::UnknownRoot`] when `root` is not in the graph.
pub fn compute_ultimate_ownership(
    graph: &OwnershipGraph,
    root: &str,
    config: &PropagationConfig,
) -> Result<Propagation, EngineError> {
    let root_idx = graph.node(root).ok_or_else(|| EngineError::UnknownRoot {
        company_id: root.to_string(),
    })?;
    let g = graph.graph();

    // tarjan_scc yields the condensation in reverse topological order.
    let components = tarjan_scc(g);
    let mut component_of = vec![0; g.node_count()];
    for (i, component) in components.iter().enumerate() {
        for node in component {
            component_of[node.index()] = i;
        }
    }

    let mut acc = Accumulator {
        graph,
        root,
        max_depth: config.max_depth,
        component_of,
        inflow: HashMap::new(),
        ownership: OwnershipMap::new(),
        warnings: Vec::new(),
        depth_reached: 0,
    };
    acc.inflow.insert(root_idx, BTreeMap::from([(0, 100.0)]));

    for component in components.iter().rev() {
        for &node in component {
            let Some(arrivals) = acc.inflow.remove(&node) else {
                continue;
            };
            for (depth, running) in arrivals {
                if acc.arrive(node, depth, running) {
                    acc.walk_component(node, depth, running);
                }
            }
        }
    }

    let Accumulator {
        ownership,
        mut warnings,
        depth_reached,
        ..
    } = acc;

    for edge in graph.dangling() {
        let reached = edge.parent_id.as_str() == root || ownership.contains_key(&edge.parent_id);
        if reached {
            warnings.push(PropagationWarning::DanglingEdge {
                relationship_id: edge.relationship_id.clone(),
                missing: edge.missing.clone(),
            });
        }
    }

    tracing::debug!(
        root,
        reached = ownership.len(),
        depth = depth_reached,
        warnings = warnings.len(),
        "propagated ownership"
    );

    Ok(Propagation {
        roots: vec![g[root_idx].clone()],
        ownership,
        warnings,
        depth_reached,
    })
}

/// Running state of one propagation.
///
/// Amounts entering a strongly connected component from outside are summed
/// per arrival depth in `inflow` and pushed on once per depth, so a company
/// shared by many paths is expanded once rather than once per path. Only
/// inside a cyclic component does the walk follow individual paths.
struct Accumulator<'a> {
    graph: &'a OwnershipGraph,
    root: &'a str,
    max_depth: usize,
    component_of: Vec<usize>,
    /// Node → arrival depth → summed running percentage.
    inflow: HashMap<NodeIndex, BTreeMap<usize, f64>>,
    ownership: OwnershipMap,
    warnings: Vec<PropagationWarning>,
    depth_reached: usize,
}

impl Accumulator<'_> {
    /// Credit `running` to `node` at `depth`. Returns whether to descend.
    fn arrive(&mut self, node: NodeIndex, depth: usize, running: f64) -> bool {
        let graph = self.graph;
        let g = graph.graph();
        if depth > 0 {
            *self.ownership.entry(g[node].clone()).or_insert(0.0) += running;
            self.depth_reached = self.depth_reached.max(depth);
        }
        if depth >= self.max_depth {
            if g.neighbors_directed(node, Direction::Outgoing).next().is_some() {
                self.warn(PropagationWarning::DepthTruncated {
                    company_id: g[node].clone(),
                    depth,
                });
            }
            return false;
        }
        true
    }

    /// Active-path walk from `entry` through its own component. Holdings
    /// outside the component are queued in `inflow` at their arrival depth.
    fn walk_component(&mut self, entry: NodeIndex, depth: usize, running: f64) {
        let graph = self.graph;
        let g = graph.graph();
        let component = self.component_of[entry.index()];

        let mut on_path: HashSet<NodeIndex> = HashSet::from([entry]);
        let mut stack = vec![Frame::new(graph, entry, running)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.children.len() {
                on_path.remove(&frame.node);
                stack.pop();
                continue;
            }
            let (child, pct) = frame.children[frame.next];
            frame.next += 1;
            let contribution = frame.running * pct / 100.0;
            let child_depth = depth + stack.len();

            if self.component_of[child.index()] != component {
                *self
                    .inflow
                    .entry(child)
                    .or_default()
                    .entry(child_depth)
                    .or_insert(0.0) += contribution;
                continue;
            }

            if on_path.contains(&child) {
                let mut path: Vec<CompanyId> = stack.iter().map(|f| g[f.node].clone()).collect();
                path.push(g[child].clone());
                self.warn(PropagationWarning::Cycle { path });
                continue;
            }

            if self.arrive(child, child_depth, contribution) {
                on_path.insert(child);
                stack.push(Frame::new(graph, child, contribution));
            }
        }
    }

    fn warn(&mut self, warning: PropagationWarning) {
        if self.warnings.contains(&warning) {
            return;
        }
        match &warning {
            PropagationWarning::Cycle { .. } => {
                tracing::warn!(root = self.root, %warning, "cycle in ownership data, edge not followed")
            }
            _ => tracing::warn!(root = self.root, %warning, "depth ceiling reached"),
        }
        self.warnings.push(warning);
    }
}
