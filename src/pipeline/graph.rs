// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Graph view of a pipeline
//!
//! A pipeline is a linear chain: component `i` feeds component `i + 1`.
//! The graph is used for rendering (text, DOT, Mermaid) and for data-flow
//! queries; it never reorders components.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use crate::pipeline::Pipeline;

/// Data-flow graph of a pipeline
pub struct PipelineGraph<'a> {
    pipeline: &'a Pipeline,
    graph: DiGraph<usize, ()>,
    id_to_index: HashMap<&'a str, NodeIndex>,
}

impl<'a> PipelineGraph<'a> {
    /// Build the chain graph for a pipeline
    pub fn build(pipeline: &'a Pipeline) -> Self {
        let mut graph = DiGraph::new();
        let mut id_to_index = HashMap::new();
        let mut previous: Option<NodeIndex> = None;

        for (idx, component) in pipeline.components.iter().enumerate() {
            let node = graph.add_node(idx);
            id_to_index.entry(component.id.as_str()).or_insert(node);

            if let Some(prev) = previous {
                graph.add_edge(prev, node, ());
            }
            previous = Some(node);
        }

        Self {
            pipeline,
            graph,
            id_to_index,
        }
    }

    /// Component indices in execution order
    pub fn execution_order(&self) -> Vec<usize> {
        // Nodes are added in pipeline order, so index order is execution order
        self.graph.node_indices().map(|n| self.graph[n]).collect()
    }

    /// Component feeding into `id`
    pub fn upstream(&self, id: &str) -> Option<&'a str> {
        let node = self.id_to_index.get(id)?;
        self.graph
            .neighbors_directed(*node, petgraph::Direction::Incoming)
            .next()
            .map(|n| self.component_id(n))
    }

    /// Component consuming the output of `id`
    pub fn downstream(&self, id: &str) -> Option<&'a str> {
        let node = self.id_to_index.get(id)?;
        self.graph
            .neighbors_directed(*node, petgraph::Direction::Outgoing)
            .next()
            .map(|n| self.component_id(n))
    }

    /// Check if data from `from` reaches `to`
    pub fn feeds(&self, from: &str, to: &str) -> bool {
        let (Some(a), Some(b)) = (self.id_to_index.get(from), self.id_to_index.get(to)) else {
            return false;
        };
        a != b && petgraph::algo::has_path_connecting(&self.graph, *a, *b, None)
    }

    fn component_id(&self, node: NodeIndex) -> &'a str {
        &self.pipeline.components[self.graph[node]].id
    }

    fn label(&self, node: NodeIndex) -> String {
        let component = &self.pipeline.components[self.graph[node]];
        format!("{} ({})", component.name, component.kind)
    }

    /// Generate Mermaid diagram
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for node in self.graph.node_indices() {
            out.push_str(&format!(
                "    n{}[\"{}\"]\n",
                node.index(),
                self.label(node).replace('"', "'")
            ));
        }

        for edge in self.graph.edge_references() {
            out.push_str(&format!(
                "    n{} --> n{}\n",
                edge.source().index(),
                edge.target().index()
            ));
        }

        out
    }

    /// Generate DOT diagram
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pipeline {\n");
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for node in self.graph.node_indices() {
            out.push_str(&format!(
                "    n{} [label=\"{}\"];\n",
                node.index(),
                self.label(node).replace('\\', "\\\\").replace('"', "\\\"")
            ));
        }

        for edge in self.graph.edge_references() {
            out.push_str(&format!(
                "    n{} -> n{};\n",
                edge.source().index(),
                edge.target().index()
            ));
        }

        out.push_str("}\n");
        out
    }

    /// Generate text representation of execution order
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for (position, idx) in self.execution_order().into_iter().enumerate() {
            let component = &self.pipeline.components[idx];
            out.push_str(&format!(
                "{}. {} ({})",
                position + 1,
                component.name,
                component.kind
            ));

            if position > 0 {
                out.push_str(&format!(
                    " [input: {}]",
                    self.pipeline.components[idx - 1].id
                ));
            }

            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ComponentKind, PipelineComponent};

    fn make_test_pipeline() -> Pipeline {
        let mut pipeline = Pipeline::new("p", "Test");
        pipeline.append_components(vec![
            PipelineComponent::new("scaler", "Standard Scaler", ComponentKind::Preprocessing, ""),
            PipelineComponent::new("model", "Forecaster", ComponentKind::Model, ""),
            PipelineComponent::new("fmt", "JSON Output", ComponentKind::Postprocessing, ""),
        ]);
        pipeline
    }

    #[test]
    fn test_linear_chain() {
        let pipeline = make_test_pipeline();
        let graph = PipelineGraph::build(&pipeline);

        assert_eq!(graph.execution_order(), vec![0, 1, 2]);
        assert_eq!(graph.upstream("model"), Some("scaler"));
        assert_eq!(graph.downstream("model"), Some("fmt"));
        assert_eq!(graph.upstream("scaler"), None);
    }

    #[test]
    fn test_feeds_is_transitive() {
        let pipeline = make_test_pipeline();
        let graph = PipelineGraph::build(&pipeline);

        assert!(graph.feeds("scaler", "fmt"));
        assert!(!graph.feeds("fmt", "scaler"));
        assert!(!graph.feeds("scaler", "scaler"));
        assert!(!graph.feeds("scaler", "missing"));
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = Pipeline::new("p", "Empty");
        let graph = PipelineGraph::build(&pipeline);
        assert!(graph.execution_order().is_empty());
        assert_eq!(graph.to_text(), "");
    }

    #[test]
    fn test_text_output() {
        let pipeline = make_test_pipeline();
        insta::assert_snapshot!(PipelineGraph::build(&pipeline).to_text(), @r###"
1. Standard Scaler (preprocessing)
2. Forecaster (model) [input: scaler]
3. JSON Output (postprocessing) [input: model]
"###);
    }

    #[test]
    fn test_mermaid_output() {
        let pipeline = make_test_pipeline();
        insta::assert_snapshot!(PipelineGraph::build(&pipeline).to_mermaid(), @r###"
graph TD
    n0["Standard Scaler (preprocessing)"]
    n1["Forecaster (model)"]
    n2["JSON Output (postprocessing)"]
    n0 --> n1
    n1 --> n2
"###);
    }

    #[test]
    fn test_dot_output() {
        let pipeline = make_test_pipeline();
        let dot = PipelineGraph::build(&pipeline).to_dot();

        assert!(dot.starts_with("digraph pipeline {"));
        assert!(dot.contains("n0 [label=\"Standard Scaler (preprocessing)\"];"));
        assert!(dot.contains("n1 -> n2;"));
    }
}
