use crate::Innovation;

use serde::{Deserialize, Serialize};

use std::fmt;

/// A NodeType indicates the function of
/// the node's network equivalent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Input nodes. Their value is supplied by the caller.
    Input,
    /// Output nodes. Their values are the network's result.
    Output,
    /// Hidden nodes, created by node mutations.
    Hidden,
}

/// Nodes are the structural elements of genomes
/// between which genes are created.
///
/// A node's id doubles as its position in the
/// genome's node list, as ids are assigned in
/// creation order and never reused.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Node {
    id: Innovation,
    node_type: NodeType,
}

impl Node {
    /// Generate a new node with the passed parameters.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{Node, NodeType};
    ///
    /// let node = Node::new(5, NodeType::Hidden);
    /// ```
    pub fn new(id: Innovation, node_type: NodeType) -> Node {
        Node { id, node_type }
    }

    /// Returns the node's id.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{Node, NodeType};
    ///
    /// let node = Node::new(5, NodeType::Hidden);
    ///
    /// assert_eq!(node.id(), 5);
    /// ```
    pub fn id(&self) -> Innovation {
        self.id
    }

    /// Returns the node's node type.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{Node, NodeType};
    ///
    /// let node = Node::new(5, NodeType::Hidden);
    ///
    /// assert_eq!(node.node_type(), NodeType::Hidden);
    /// ```
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Returns whether a gene created between `self` and
    /// `other` must run from `other` to `self`, keeping
    /// edges flowing input → hidden → output.
    pub(super) fn precedes_reversed(&self, other: &Node) -> bool {
        use NodeType::*;
        matches!(
            (self.node_type, other.node_type),
            (Hidden, Input) | (Output, Hidden) | (Output, Input)
        )
    }

    /// Returns whether a gene between `self` and `other`
    /// would join two nodes of the same terminal kind.
    pub(super) fn incompatible_with(&self, other: &Node) -> bool {
        use NodeType::*;
        matches!(
            (self.node_type, other.node_type),
            (Input, Input) | (Output, Output)
        )
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{:?}]", self.id, self.node_type)
    }
}
