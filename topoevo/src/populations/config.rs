use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// What to do with a genome whose selected
/// mutation failed every permitted attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExhaustionPolicy {
    /// Leave the genome unmutated and move on.
    Skip,
    /// Try each remaining mutation kind, in the order
    /// connection, node, weight, under the same bound.
    Fallback,
    /// Stop mutating the generation and report an error.
    Abort,
}

/// Rule bounding how many times a failed mutation
/// is retried on the same genome during evolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// Retry until the mutation succeeds. Never returns
    /// for a genome on which the selected mutation can't
    /// succeed, such as a node mutation on a genome whose
    /// most recent connection is disabled.
    Unbounded,
    /// Give up after `max_attempts` failures, then
    /// act as dictated by `on_exhausted`.
    ///
    /// Attempts that can't succeed still count against the
    /// bound. With genomes that invert expression on replication,
    /// a sizeable share of each generation may exhaust its node
    /// mutations, at a cost of `max_attempts` attempts each.
    Bounded {
        max_attempts: NonZeroUsize,
        on_exhausted: ExhaustionPolicy,
    },
}

impl RetryPolicy {
    /// Returns whether another attempt is permitted
    /// after `attempts` failed ones.
    pub(super) fn permits(&self, attempts: usize) -> bool {
        match self {
            RetryPolicy::Unbounded => true,
            RetryPolicy::Bounded { max_attempts, .. } => attempts < max_attempts.get(),
        }
    }

    pub(super) fn on_exhausted(&self) -> ExhaustionPolicy {
        match self {
            RetryPolicy::Unbounded => ExhaustionPolicy::Skip,
            RetryPolicy::Bounded { on_exhausted, .. } => *on_exhausted,
        }
    }
}

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// Mutation rates are relative weights: they need
/// not sum to 1, but should be non-negative with a
/// positive sum. Other values may result in odd
/// behaviours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Relative rate of connection mutations.
    pub connection_mutation_rate: f32,
    /// Relative rate of node mutations.
    pub node_mutation_rate: f32,
    /// Relative rate of weight mutations.
    pub weight_mutation_rate: f32,
    /// Bound on repeated mutation attempts.
    pub retry_policy: RetryPolicy,
}

impl PopulationConfig {
    /// Returns the standard configuration for a population
    /// of the specified size: mutation rates of 0.4 for
    /// connections, 0.4 for nodes and 0.2 for weights, and
    /// at most 1000 attempts per genome before skipping it.
    ///
    /// # Examples
    /// ```
    /// use topoevo::{ExhaustionPolicy, PopulationConfig, RetryPolicy};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = PopulationConfig::new(NonZeroUsize::new(150).unwrap());
    ///
    /// assert_eq!(config.connection_mutation_rate, 0.4);
    /// assert_eq!(
    ///     config.retry_policy,
    ///     RetryPolicy::Bounded {
    ///         max_attempts: NonZeroUsize::new(1000).unwrap(),
    ///         on_exhausted: ExhaustionPolicy::Skip,
    ///     }
    /// );
    /// ```
    pub const fn new(size: NonZeroUsize) -> PopulationConfig {
        PopulationConfig {
            size,
            connection_mutation_rate: 0.4,
            node_mutation_rate: 0.4,
            weight_mutation_rate: 0.2,
            retry_policy: RetryPolicy::Bounded {
                // SAFETY: 1000 is a valid NonZeroUsize. Replace this with
                // NonZeroUsize::new(1000).unwrap() once const Option::unwrap
                // becomes stable.
                max_attempts: unsafe { NonZeroUsize::new_unchecked(1000) },
                on_exhausted: ExhaustionPolicy::Skip,
            },
        }
    }

    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1. Failed mutations are
    /// not retried.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use topoevo::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     weight_mutation_rate: 1.0,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: 1 is a valid NonZeroUsize. Replace this with
            // NonZeroUsize::new(1).unwrap() once const Option::unwrap
            // becomes stable.
            size: unsafe { NonZeroUsize::new_unchecked(1) },
            connection_mutation_rate: 0.0,
            node_mutation_rate: 0.0,
            weight_mutation_rate: 0.0,
            retry_policy: RetryPolicy::Bounded {
                // SAFETY: as above.
                max_attempts: unsafe { NonZeroUsize::new_unchecked(1) },
                on_exhausted: ExhaustionPolicy::Skip,
            },
        }
    }
}
