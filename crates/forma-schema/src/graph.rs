//! Derived-field dependency graph.
//!
//! Every field is a node; each derived field gets an edge from each of its
//! parents. Parents that do not exist in the schema are skipped here and
//! reported by [`crate::checks`] instead.

use std::collections::HashMap;

use forma_core::{Field, SchemaError};
use rustworkx_core::petgraph::algo::toposort;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};

/// Node payload: one form field.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub field_id: String,
    pub derived: bool,
}

/// Directed graph with edges `parent → derived field`.
pub struct DependencyGraph {
    graph: DiGraph<GraphNode, ()>,
    id_to_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph for a field list. Nodes are added in declaration order.
    #[must_use]
    pub fn from_fields(fields: &[Field]) -> Self {
        let mut graph = DiGraph::with_capacity(fields.len(), fields.len());
        let mut id_to_index = HashMap::with_capacity(fields.len());

        for field in fields {
            let idx = graph.add_node(GraphNode {
                field_id: field.id.clone(),
                derived: field.is_derived(),
            });
            id_to_index.insert(field.id.clone(), idx);
        }

        for field in fields {
            let child = id_to_index[&field.id];
            for parent in field.parents() {
                if let Some(&parent_idx) = id_to_index.get(parent) {
                    graph.add_edge(parent_idx, child, ());
                }
            }
        }

        Self { graph, id_to_index }
    }

    /// Derived field ids ordered so every parent precedes its dependents.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Cycle` naming a field on the cycle.
    pub fn evaluation_order(&self) -> Result<Vec<String>, SchemaError> {
        let sorted = toposort(&self.graph, None).map_err(|cycle| SchemaError::Cycle {
            id: self.graph[cycle.node_id()].field_id.clone(),
        })?;
        Ok(sorted
            .into_iter()
            .filter(|idx| self.graph[*idx].derived)
            .map(|idx| self.graph[idx].field_id.clone())
            .collect())
    }

    /// Whether the graph has any cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        toposort(&self.graph, None).is_err()
    }

    /// Ids of the fields that list `id` as a parent.
    #[must_use]
    pub fn dependents(&self, id: &str) -> Vec<String> {
        let Some(&idx) = self.id_to_index.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<String> = self
            .graph
            .neighbors(idx)
            .map(|child| self.graph[child].field_id.clone())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
