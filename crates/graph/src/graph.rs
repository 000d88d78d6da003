use crate::class::ConfigurationClass;
use crate::error::{GraphError, Result};
use crate::types::TypeName;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Directed view of the resolved set: importer -> imported.
///
/// Built from the `imported_by` back-references, so it never owns or
/// mutates the configuration classes themselves.
pub struct ImportGraph {
    graph: DiGraph<TypeName, ()>,
    index: HashMap<TypeName, NodeIndex>,
}

impl ImportGraph {
    pub fn from_classes<'a, I>(classes: I) -> Self
    where
        I: IntoIterator<Item = &'a ConfigurationClass>,
    {
        let mut classes: Vec<&ConfigurationClass> = classes.into_iter().collect();
        classes.sort_by(|a, b| a.declaring_type().cmp(b.declaring_type()));

        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for class in &classes {
            let idx = graph.add_node(class.declaring_type().clone());
            index.insert(class.declaring_type().clone(), idx);
        }

        for class in &classes {
            let to = index[class.declaring_type()];
            for importer in class.imported_by() {
                // Importers outside the resolved set carry no node
                if let Some(&from) = index.get(importer) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        log::debug!(
            "Built import graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn node(&self, type_name: &str) -> Result<NodeIndex> {
        self.index
            .get(type_name)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(type_name.to_string()))
    }

    fn neighbors(&self, type_name: &str, direction: Direction) -> Result<Vec<&TypeName>> {
        let node = self.node(type_name)?;
        let mut out: Vec<&TypeName> = self
            .graph
            .edges_directed(node, direction)
            .map(|e| match direction {
                Direction::Outgoing => &self.graph[e.target()],
                Direction::Incoming => &self.graph[e.source()],
            })
            .collect();
        out.sort();
        Ok(out)
    }

    /// Types imported directly by `type_name`
    pub fn imports_of(&self, type_name: &str) -> Result<Vec<&TypeName>> {
        self.neighbors(type_name, Direction::Outgoing)
    }

    /// Types that import `type_name` directly
    pub fn importers_of(&self, type_name: &str) -> Result<Vec<&TypeName>> {
        self.neighbors(type_name, Direction::Incoming)
    }

    /// Classes nobody imports, sorted by name
    pub fn roots(&self) -> Vec<&TypeName> {
        let mut roots: Vec<&TypeName> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| &self.graph[idx])
            .collect();
        roots.sort();
        roots
    }

    /// Import cycles, each sorted by name
    pub fn cycles(&self) -> Vec<Vec<&TypeName>> {
        let mut cycles: Vec<Vec<&TypeName>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || self.graph.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut members: Vec<&TypeName> =
                    component.into_iter().map(|idx| &self.graph[idx]).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Groups in an order where every imported class precedes its importers.
    ///
    /// Classes that import each other end up in the same group.
    pub fn materialization_order(&self) -> Vec<Vec<&TypeName>> {
        // tarjan_scc yields components in reverse topological order, which
        // for importer -> imported edges means leaves first.
        tarjan_scc(&self.graph)
            .into_iter()
            .map(|component| {
                let mut members: Vec<&TypeName> =
                    component.into_iter().map(|idx| &self.graph[idx]).collect();
                members.sort();
                members
            })
            .collect()
    }

    /// All nodes, sorted by name
    pub fn nodes(&self) -> Vec<&TypeName> {
        let mut nodes: Vec<&TypeName> = self
            .graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .collect();
        nodes.sort();
        nodes
    }

    /// All (importer, imported) pairs, sorted
    pub fn edges(&self) -> Vec<(&TypeName, &TypeName)> {
        let mut edges: Vec<(&TypeName, &TypeName)> = self
            .graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()]))
            .collect();
        edges.sort();
        edges
    }

    /// Graphviz rendering, nodes labelled with the simple type name
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph imports {\n");
        for node in self.nodes() {
            out.push_str(&format!(
                "    \"{}\" [label=\"{}\"];\n",
                node,
                node.simple_name()
            ));
        }
        for (from, to) in self.edges() {
            out.push_str(&format!("    \"{from}\" -> \"{to}\";\n"));
        }
        out.push('}');
        out
    }
}
