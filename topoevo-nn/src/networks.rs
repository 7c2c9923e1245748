//! A network is the phenotype of an [`NNGenome`]:
//! the genome's expressed genes, read as weighted
//! connections between sigmoid neurons.
//!
//! Networks here are thin views that borrow their genome
//! instead of copying it, as the genome's adjacency index
//! already holds everything evaluation needs.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
mod feed_forward;

pub use feed_forward::FeedForwardNetwork;
