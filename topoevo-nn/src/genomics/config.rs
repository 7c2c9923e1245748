use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// How a replicated genome inherits the
/// expression status of its parent's genes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionInheritance {
    /// Every gene's expression status is flipped on replication:
    /// expressed genes become disabled and vice versa.
    ///
    /// A replica whose most recent gene ends up disabled can't
    /// take a node mutation until a new gene is added, so under a
    /// bounded retry policy every node mutation selected for it
    /// spends all of its permitted attempts before giving up.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{ExpressionInheritance, GeneticConfig, NNGenome};
    ///
    /// let config = GeneticConfig {
    ///     expression_inheritance: ExpressionInheritance::Inverted,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut genome = NNGenome::new(&config);
    /// genome.add_gene(0, 1, 1.0).unwrap();
    ///
    /// let mut replica = genome.replicate(&config);
    /// assert!(replica.mutate_add_node().is_err());
    /// assert!(replica.replicate(&config).mutate_add_node().is_ok());
    /// ```
    Inverted,
    /// Genes keep their parent's expression status.
    Preserved,
}

/// Configuration data for genome generation
/// and mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Magnitude of bound on weight mutation uniform distribution.
    /// Weight mutations add a value from
    /// `[-weight_mutation_power, weight_mutation_power)`.
    pub weight_mutation_power: f32,
    /// Magnitude of bound on the weights of newly created genes,
    /// drawn from `[-weight_bound, weight_bound)`. Mutated weights
    /// are not held to this bound.
    pub weight_bound: f32,
    /// Expression status inheritance rule used when
    /// a genome is replicated into the next generation.
    pub expression_inheritance: ExpressionInheritance,
}

impl GeneticConfig {
    /// Returns the standard configuration for genomes
    /// with the specified number of inputs and outputs:
    /// a weight mutation power of 1, a weight bound of 5,
    /// and [`Inverted`] expression inheritance.
    ///
    /// [`Inverted`]: ExpressionInheritance::Inverted
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(
    ///     NonZeroUsize::new(2).unwrap(),
    ///     NonZeroUsize::new(1).unwrap(),
    /// );
    ///
    /// assert_eq!(config.weight_bound, 5.0);
    /// ```
    pub const fn new(input_count: NonZeroUsize, output_count: NonZeroUsize) -> GeneticConfig {
        GeneticConfig {
            input_count,
            output_count,
            weight_mutation_power: 1.0,
            weight_bound: 5.0,
            expression_inheritance: ExpressionInheritance::Inverted,
        }
    }

    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1. Replication preserves
    /// gene expression.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::GeneticConfig;
    ///
    /// let config = GeneticConfig {
    ///     // Specify some values here...
    ///     weight_bound: 3.0,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            // SAFETY: 1 is a valid NonZeroUsize. Replace this with
            // NonZeroUsize::new(1).unwrap() once const Option::unwrap
            // becomes stable.
            input_count: unsafe { NonZeroUsize::new_unchecked(1) },
            output_count: unsafe { NonZeroUsize::new_unchecked(1) },
            weight_mutation_power: 0.0,
            weight_bound: 0.0,
            expression_inheritance: ExpressionInheritance::Preserved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let config = GeneticConfig::new(
            NonZeroUsize::new(4).unwrap(),
            NonZeroUsize::new(2).unwrap(),
        );
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GeneticConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_zero_inputs() {
        let json = r#"{
            "input_count": 0,
            "output_count": 1,
            "weight_mutation_power": 1.0,
            "weight_bound": 5.0,
            "expression_inheritance": "Inverted"
        }"#;
        assert!(serde_json::from_str::<GeneticConfig>(json).is_err());
    }
}
