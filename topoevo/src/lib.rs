//! A minimal topology-evolving neuroevolution engine.
//!
//! Genomes describing feed-forward networks are grown by
//! mutation alone: connections are added, split into new
//! nodes, and have their weights perturbed. There is no
//! crossover or speciation. Selection is left to the caller,
//! who evaluates the population however it sees fit and
//! hands the survivors of each generation to [`Population::evolve`].
//!
//! Genome structure is user-defined via the [`Genome`] trait.
//! A neural network-based implementation is supplied by the
//! `topoevo-nn` crate. Generational population logging is
//! supported through the [`logging`] module.
//!
//! All randomness is drawn from a caller-supplied [`rand::Rng`],
//! so seeded runs are reproducible.
//!
//! # Example usage: Evolution of XOR function approximator, using `topoevo-nn`
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use topoevo::{Population, PopulationConfig};
//! use topoevo_nn::genomics::{GeneticConfig, NNGenome};
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_xor(genome: &NNGenome) -> f32 {
//!     let values = [
//!         ([1.0, 0.0, 0.0], 0.0),
//!         ([1.0, 0.0, 1.0], 1.0),
//!         ([1.0, 1.0, 0.0], 1.0),
//!         ([1.0, 1.0, 1.0], 0.0),
//!     ];
//!
//!     let error: f32 = values
//!         .iter()
//!         .map(|(input, output)| (genome.evaluate(input)[0] - output).abs())
//!         .sum();
//!     (4.0 - error).powf(2.0)
//! }
//!
//! let genetic_config = GeneticConfig::new(
//!     NonZeroUsize::new(3).unwrap(),
//!     NonZeroUsize::new(1).unwrap(),
//! );
//! let population_config = PopulationConfig::new(NonZeroUsize::new(50).unwrap());
//!
//! let mut population = Population::new(population_config, genetic_config);
//! let mut rng = StdRng::seed_from_u64(42);
//! for _ in 0..20 {
//!     let ranking = population.rank_by(evaluate_xor);
//!     // Keep the best fifth of the population.
//!     let survivors = &ranking[..population.size() / 5];
//!     if let Err(e) = population.evolve(survivors, &mut rng) {
//!         eprintln!("{}", e);
//!         break;
//!     }
//! }
//! assert_eq!(population.generation(), 20);
//! ```

mod genome;
mod populations;

pub use genome::*;
pub use populations::*;
