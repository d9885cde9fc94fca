//! Abstract node/edge description of the automata, handed to an external renderer.

use std::fmt::Write;

use lrkit_parser::{Parser, Symbol};
use lrkit_regex::{Dfa, MinimizedDfa, Nfa};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Circle,
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub initial: bool,
    pub accepting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub style: EdgeStyle,
}

/// Directed graph where nodes are automaton states and edges are labelled transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    name: String,
    shape: NodeShape,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(name: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Renders the graph in the [graphviz](https://graphviz.org/docs/layouts/dot/) dot language.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();

        // Note: Writing into a `String` never fails.
        let _ = writeln!(dot, "digraph {} {{", self.name);
        let _ = writeln!(dot, "\trankdir = LR;");
        match self.shape {
            NodeShape::Circle => {
                let _ = writeln!(dot, "\tnode [shape = circle];");
            }
            NodeShape::Box => {
                let _ = writeln!(dot, "\tnode [shape = box, style = rounded];");
            }
        }

        for node in self.nodes.iter().filter(|node| node.initial) {
            let _ = writeln!(dot, "\t__start_{} [shape = point];", node.id);
            let _ = writeln!(dot, "\t__start_{} -> {};", node.id, node.id);
        }

        for node in &self.nodes {
            let mut attributes = vec![format!("label = \"{}\"", escape(&node.label))];
            if node.accepting {
                match self.shape {
                    NodeShape::Circle => attributes.push("shape = doublecircle".to_string()),
                    NodeShape::Box => attributes.push("peripheries = 2".to_string()),
                }
            }
            let _ = writeln!(dot, "\t{} [{}];", node.id, attributes.join(", "));
        }

        for edge in &self.edges {
            let mut attributes = vec![format!("label = \"{}\"", escape(&edge.label))];
            if edge.style == EdgeStyle::Dashed {
                attributes.push("style = dashed".to_string());
            }
            let _ = writeln!(
                dot,
                "\t{} -> {} [{}];",
                edge.from,
                edge.to,
                attributes.join(", ")
            );
        }

        dot.push('}');
        dot
    }
}

/// Escapes a label for use inside a double quoted dot string. Newlines become `\l` so that
/// multi-line labels are left aligned.
fn escape(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\l"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl From<&Nfa> for Graph {
    fn from(nfa: &Nfa) -> Self {
        let mut graph = Graph::new("nfa", NodeShape::Circle);

        for id in 0..nfa.len() {
            graph.add_node(Node {
                id: id.to_string(),
                label: id.to_string(),
                initial: id == nfa.start_state(),
                accepting: nfa.is_final(id),
            });
        }

        for (from, input, to) in nfa.transitions() {
            graph.add_edge(Edge {
                from: from.to_string(),
                to: to.to_string(),
                label: input.to_string(),
                style: EdgeStyle::Solid,
            });
        }

        graph
    }
}

impl From<&Dfa> for Graph {
    fn from(dfa: &Dfa) -> Self {
        let mut graph = Graph::new("dfa", NodeShape::Circle);

        for id in 0..dfa.len() {
            graph.add_node(Node {
                id: id.to_string(),
                label: id.to_string(),
                initial: id == dfa.start_state(),
                accepting: dfa.is_final(id),
            });
        }

        for (from, input, to) in dfa.transitions() {
            graph.add_edge(Edge {
                from: from.to_string(),
                to: to.to_string(),
                label: input.to_string(),
                style: EdgeStyle::Solid,
            });
        }

        graph
    }
}

impl From<&MinimizedDfa> for Graph {
    fn from(minimized: &MinimizedDfa) -> Self {
        let mut graph = Graph::new("minimized_dfa", NodeShape::Circle);

        for id in 0..minimized.len() {
            graph.add_node(Node {
                id: id.to_string(),
                label: id.to_string(),
                initial: id == minimized.start_partition(),
                accepting: minimized.is_accepting(id),
            });
        }

        for (from, input, to) in minimized.transitions() {
            graph.add_edge(Edge {
                from: from.to_string(),
                to: to.to_string(),
                label: input.to_string(),
                style: EdgeStyle::Solid,
            });
        }

        graph
    }
}

/// Graph of the canonical collection. Edges on variables are GOTO entries and are dashed.
impl From<&Parser> for Graph {
    fn from(parser: &Parser) -> Self {
        let grammar = parser.grammar();
        let cfsm = parser.cfsm();
        let accept_states = parser.table().accept_states().collect::<Vec<_>>();

        let mut graph = Graph::new("cfsm", NodeShape::Box);

        for state in cfsm.states() {
            let mut label = format!("I{}\n", state.id());
            for item in state.item_set().iter() {
                let _ = writeln!(label, "{}", item.display(grammar));
            }

            graph.add_node(Node {
                id: format!("I{}", state.id()),
                label,
                initial: state.id() == cfsm.start_state(),
                accepting: accept_states.contains(&state.id()),
            });
        }

        for state in cfsm.states() {
            for (symbol, dest) in state.transitions() {
                let style = match symbol {
                    Symbol::Variable(_) => EdgeStyle::Dashed,
                    _ => EdgeStyle::Solid,
                };

                graph.add_edge(Edge {
                    from: format!("I{}", state.id()),
                    to: format!("I{dest}"),
                    label: symbol.to_string(),
                    style,
                });
            }
        }

        graph
    }
}
