//! Graphviz DOT rendering of a [`ScenarioGraph`].

use std::collections::HashSet;
use std::fmt::Write;

use super::projection::ScenarioGraph;

/// Renders `graph` as a DOT digraph. The entry node is drawn doubled and
/// endings boxed. Each dangling edge is dashed and leads into its own
/// placeholder node labelled with the missing target.
#[must_use]
pub fn to_dot(graph: &ScenarioGraph) -> String {
    let mut out = String::from("digraph scenario {\n");
    let entry = graph.entry();
    let sinks: HashSet<&str> = graph.sinks().collect();

    for node in &graph.nodes {
        let mut attrs = Vec::new();
        if Some(node.as_str()) == entry {
            attrs.push("peripheries=2");
        }
        if sinks.contains(node.as_str()) {
            attrs.push("shape=box");
        }
        if attrs.is_empty() {
            let _ = writeln!(out, "  {};", quote(node));
        } else {
            let _ = writeln!(out, "  {} [{}];", quote(node), attrs.join(", "));
        }
    }
    for edge in &graph.edges {
        let _ = writeln!(
            out,
            "  {} -> {} [label={}];",
            quote(&edge.from),
            quote(&edge.to),
            quote(&edge.label)
        );
    }
    let prefix = placeholder_prefix(graph);
    for (n, edge) in graph.dangling_edges.iter().enumerate() {
        let placeholder = quote(&format!("{prefix}_{n}"));
        let _ = writeln!(
            out,
            "  {placeholder} [label={}, style=dashed];",
            quote(&format!("missing: {}", edge.target))
        );
        let _ = writeln!(
            out,
            "  {} -> {placeholder} [label={}, style=dashed];",
            quote(&edge.from),
            quote(&edge.label)
        );
    }

    out.push_str("}\n");
    out
}

/// A prefix no scene id starts with. DOT treats quoted and bare ids alike,
/// so placeholders must differ from every node by content.
fn placeholder_prefix(graph: &ScenarioGraph) -> String {
    let mut prefix = String::from("missing");
    while graph.nodes.iter().any(|node| node.starts_with(&prefix)) {
        prefix.push('_');
    }
    prefix
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use storyloom_scenario::domain::codec::parse_scenario;
    use storyloom_test_support::fixtures;

    use super::*;
    use crate::domain::projection::{DanglingEdge, ProjectionOptions, project};

    fn dangling(from: &str, target: &str, label: &str) -> DanglingEdge {
        DanglingEdge {
            from: from.to_owned(),
            target: target.to_owned(),
            choice_index: 0,
            label: label.to_owned(),
        }
    }

    #[test]
    fn test_start_end_example_renders() {
        let document = parse_scenario(fixtures::START_END_JSON).unwrap();

        let dot = to_dot(&project(&document, ProjectionOptions::default()));

        assert_eq!(
            dot,
            "digraph scenario {\n  \"start\" [peripheries=2];\n  \"end\" [shape=box];\n  \"start\" -> \"end\" [label=\"Go\"];\n}\n"
        );
    }

    #[test]
    fn test_labels_are_escaped() {
        assert_eq!(quote(r#"Say "hi"\now"#), r#""Say \"hi\"\\now""#);
        assert_eq!(quote("two\nlines"), "\"two\\nlines\"");
        assert_eq!(quote("dos\r\nline"), "\"dos\\r\\nline\"");
    }

    #[test]
    fn test_dangling_edges_are_dashed() {
        let graph = ScenarioGraph {
            nodes: vec!["a".to_owned()],
            edges: Vec::new(),
            dangling_edges: vec![dangling("a", "b", "go")],
        };

        let dot = to_dot(&graph);

        assert!(dot.contains("  \"a\" [peripheries=2];\n"));
        assert!(dot.contains("  \"missing_0\" [label=\"missing: b\", style=dashed];\n"));
        assert!(dot.contains("  \"a\" -> \"missing_0\" [label=\"go\", style=dashed];\n"));
    }

    #[test]
    fn test_placeholder_does_not_merge_with_scene_of_same_name() {
        // Arrange
        let graph = ScenarioGraph {
            nodes: vec!["start".to_owned(), "missing: end".to_owned()],
            edges: Vec::new(),
            dangling_edges: vec![dangling("start", "end", "Go"), dangling("start", "end", "Run")],
        };

        // Act
        let dot = to_dot(&graph);

        // Assert
        assert!(dot.contains("  \"missing: end\" [shape=box];\n"));
        assert!(dot.contains("  \"start\" -> \"missing__0\" [label=\"Go\", style=dashed];\n"));
        assert!(dot.contains("  \"start\" -> \"missing__1\" [label=\"Run\", style=dashed];\n"));
        assert!(!dot.contains("-> \"missing: end\""));
    }

    #[test]
    fn test_lone_scene_is_entry_and_ending() {
        let graph = ScenarioGraph {
            nodes: vec!["only".to_owned()],
            ..ScenarioGraph::default()
        };

        let dot = to_dot(&graph);

        assert!(dot.contains("  \"only\" [peripheries=2, shape=box];\n"));
    }
}
