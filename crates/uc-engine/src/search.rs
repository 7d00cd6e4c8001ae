//! Equivalence graph over units and constants.
//!
//! Nodes are the seven SI base units, every registry label and every
//! constant name that resolves to a single store entry. Each non-base node
//! carries a scalar and has outgoing edges weighted by exponent: to base
//! units, or to the registry unit a constant is quoted in. Resolving a name
//! walks the graph breadth-first, raising each node's scalar to the
//! accumulated exponent along the path.

use std::collections::{HashMap, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;
use uc_constants::{ConstantEntry, ConstantStore, MatchSpec};
use uc_core::{BaseDim, DimVec, UcError, UcResult};
use uc_units::UnitRegistry;

/// Longest path a resolution may follow before the graph is deemed cyclic.
const MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Base(BaseDim),
    Unit,
    Constant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub label: String,
    pub kind: NodeKind,
    /// Dimensionless scalar contributed by this node (base units contribute
    /// their own dimension instead).
    pub scale: DimVec,
}

impl GraphNode {
    fn contribution(&self) -> DimVec {
        match self.kind {
            NodeKind::Base(dim) => DimVec::base(dim),
            NodeKind::Unit | NodeKind::Constant => self.scale,
        }
    }
}

#[derive(Debug, Default)]
pub struct UnitGraph {
    graph: DiGraph<GraphNode, i32>,
    by_label: HashMap<String, NodeIndex>,
}

fn scalar_of(dims: &DimVec) -> DimVec {
    DimVec::dimensionless(dims.mantissa()).with_pow10(dims.exp10())
}

impl UnitGraph {
    pub fn build(registry: &UnitRegistry, store: &ConstantStore) -> Self {
        let mut g = Self::default();

        let bases: Vec<NodeIndex> = BaseDim::ALL
            .into_iter()
            .map(|dim| {
                g.add_node(GraphNode {
                    label: dim.symbol().to_string(),
                    kind: NodeKind::Base(dim),
                    scale: DimVec::dimensionless(1.0),
                })
            })
            .collect();

        for entry in registry.entries() {
            if g.by_label.contains_key(&entry.label) {
                continue;
            }
            let idx = g.add_node(GraphNode {
                label: entry.label.clone(),
                kind: NodeKind::Unit,
                scale: scalar_of(&entry.dims),
            });
            g.link_to_bases(idx, &bases, &entry.dims);
        }

        for entry in store.entries() {
            for name in &entry.names {
                if g.by_label.contains_key(name) || !resolves_uniquely(store, name, entry) {
                    continue;
                }
                g.add_constant(name, entry, &bases);
            }
        }

        debug!(
            nodes = g.graph.node_count(),
            edges = g.graph.edge_count(),
            "built unit graph"
        );
        g
    }

    fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        let label = node.label.clone();
        let idx = self.graph.add_node(node);
        self.by_label.insert(label, idx);
        idx
    }

    fn link_to_bases(&mut self, idx: NodeIndex, bases: &[NodeIndex], dims: &DimVec) {
        for (dim, &base) in BaseDim::ALL.iter().zip(bases) {
            let exp = dims.exp(*dim);
            if exp != 0 {
                self.graph.add_edge(idx, base, exp);
            }
        }
    }

    /// A constant quoted in a registry unit points at that unit's node;
    /// anything else is decomposed straight onto the base units.
    fn add_constant(&mut self, name: &str, entry: &ConstantEntry, bases: &[NodeIndex]) {
        let via_unit = self
            .by_label
            .get(entry.unit.as_str())
            .copied()
            .filter(|&u| self.graph[u].kind == NodeKind::Unit);
        let (scale, target) = match via_unit {
            Some(unit) => (DimVec::dimensionless(entry.value), Some(unit)),
            None => (scalar_of(&entry.si_dims()), None),
        };
        let idx = self.add_node(GraphNode {
            label: name.to_string(),
            kind: NodeKind::Constant,
            scale,
        });
        match target {
            Some(unit) => {
                self.graph.add_edge(idx, unit, 1);
            }
            None => self.link_to_bases(idx, bases, &entry.si_dims()),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    pub fn node(&self, label: &str) -> Option<&GraphNode> {
        self.by_label.get(label).map(|&idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Dimension vector of `label`, accumulated breadth-first from its node.
    pub fn resolve(&self, label: &str) -> UcResult<DimVec> {
        let start = *self.by_label.get(label).ok_or_else(|| UcError::UnknownUnit {
            label: label.to_string(),
        })?;

        let mut acc = DimVec::dimensionless(1.0);
        let mut queue = VecDeque::from([(start, 1, 0usize)]);
        while let Some((current, power, depth)) = queue.pop_front() {
            if depth > MAX_DEPTH {
                return Err(UcError::InconsistentRegistry {
                    what: format!("cycle while resolving '{label}'"),
                });
            }
            acc = acc.multiply(&self.graph[current].contribution().pow_int(power)?)?;
            let mut edges = self.graph.neighbors_directed(current, Direction::Outgoing).detach();
            while let Some((edge, next)) = edges.next(&self.graph) {
                let power = power
                    .checked_mul(self.graph[edge])
                    .ok_or(UcError::InvalidArg {
                        what: "dimension exponent out of range",
                    })?;
                queue.push_back((next, power, depth + 1));
            }
        }
        Ok(acc)
    }
}

/// Whether a bare lookup of `name` in `store` lands on `entry`.
fn resolves_uniquely(store: &ConstantStore, name: &str, entry: &ConstantEntry) -> bool {
    store
        .find(&MatchSpec::literal(name), "")
        .is_ok_and(|found| std::ptr::eq(found, entry))
}
