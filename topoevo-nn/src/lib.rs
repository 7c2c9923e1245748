//! # topoevo-nn
//! A feed-forward neural network implementation of the `topoevo` crate's `Genome` trait.
//!
//! Provides an [`NNGenome`] type usable in `topoevo` `Population`s, and the
//! [`FeedForwardNetwork`] it is read as during evaluation. Genomes only
//! ever grow acyclic: connection mutations that may close a cycle of
//! expressed connections are rejected.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
//! [`FeedForwardNetwork`]: crate::networks::FeedForwardNetwork
//!
//! # Example usage: growing a genome by hand
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use topoevo_nn::genomics::{GeneticConfig, NNGenome};
//! use std::num::NonZeroUsize;
//!
//! let config = GeneticConfig::new(
//!     NonZeroUsize::new(2).unwrap(),
//!     NonZeroUsize::new(1).unwrap(),
//! );
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut genome = NNGenome::new(&config);
//!
//! // Mutations may fail; a failed mutation leaves the genome as it was.
//! while genome.mutate_add_connection(&mut rng, &config).is_err() {}
//! genome.mutate_add_node().unwrap();
//! for _ in 0..10 {
//!     let _ = genome.mutate_weight(&mut rng, &config);
//! }
//!
//! assert_eq!(genome.hidden_count(), 1);
//! assert_eq!(genome.gene_count(), 3);
//!
//! let output = genome.evaluate(&[0.5, -0.5])[0];
//! assert!(output > 0.0 && output < 1.0);
//! ```

pub mod genomics;
pub mod networks;

/// Identifier type used for node ids and gene
/// innovation numbers. Both are local to a genome.
pub type Innovation = usize;
