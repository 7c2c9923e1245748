use crate::Innovation;

use super::NodeType;

use std::error::Error;
use std::fmt;

/// An error type indicating the gene being
/// manually added is invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneValidityError {
    /// The gene's endpoints do not exist.
    NonexistantEndpoints(Innovation, Innovation),
    /// The gene's target is an input node, which is not allowed.
    InputTarget(Innovation),
    /// A gene already joins the same pair of nodes, in either direction.
    DuplicateGeneWithEndpoints(Innovation, (Innovation, Innovation)),
    /// The gene would close a cycle of expressed genes.
    CreatesCycle(Innovation, Innovation),
}

/// Reasons a weight mutation could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMutationError {
    /// The genome has no genes.
    EmptyGenome,
    /// The randomly selected gene was disabled.
    SuppressedGene(Innovation),
}

/// Reasons a node mutation could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMutationError {
    /// The genome has no genes.
    EmptyGenome,
    /// The gene to split was disabled.
    SuppressedGene(Innovation),
}

/// Reasons a connection mutation could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMutationError {
    /// The same node was drawn twice.
    SameNode(Innovation),
    /// Both nodes are inputs, or both are outputs.
    IncompatibleEndpoints(NodeType),
    /// The gene would close a cycle of expressed genes.
    CreatesCycle(Innovation, Innovation),
    /// An expressed gene already joins the nodes.
    AlreadyExpressed(Innovation),
}

impl fmt::Display for GeneValidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonexistantEndpoints(input, output) => write!(
                f,
                "gene insertion between nonexistant endpoint(s) {} -> {}",
                input, output
            ),
            Self::InputTarget(id) => write!(
                f,
                "gene insertion with input node as target with id {}",
                id
            ),
            Self::DuplicateGeneWithEndpoints(duplicate_id, (input, output)) => write!(
                f,
                "gene insertion with endpoints {} -> {} shadows gene {} with same endpoints",
                input, output, duplicate_id,
            ),
            Self::CreatesCycle(input, output) => write!(
                f,
                "gene insertion with endpoints {} -> {} closes a cycle",
                input, output
            ),
        }
    }
}

impl fmt::Display for WeightMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGenome => write!(f, "weight mutation on empty genome"),
            Self::SuppressedGene(id) => {
                write!(f, "weight mutation selected suppressed gene {}", id)
            }
        }
    }
}

impl fmt::Display for NodeMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGenome => write!(f, "node mutation on empty genome"),
            Self::SuppressedGene(id) => write!(f, "node mutation on suppressed gene {}", id),
        }
    }
}

impl fmt::Display for ConnectionMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameNode(id) => write!(f, "connection mutation drew node {} twice", id),
            Self::IncompatibleEndpoints(node_type) => write!(
                f,
                "connection mutation between two {:?} nodes",
                node_type
            ),
            Self::CreatesCycle(input, output) => write!(
                f,
                "connection mutation {} -> {} closes a cycle",
                input, output
            ),
            Self::AlreadyExpressed(id) => {
                write!(f, "connection mutation on already expressed gene {}", id)
            }
        }
    }
}

impl Error for GeneValidityError {}
impl Error for WeightMutationError {}
impl Error for NodeMutationError {}
impl Error for ConnectionMutationError {}
