use super::{EvolutionReport, ExhaustionPolicy, PopulationConfig};
use crate::Genome;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// The kinds of mutation applied during evolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    Connection,
    Node,
    Weight,
}

impl MutationKind {
    /// Every kind, in fallback order.
    pub const ALL: [MutationKind; 3] = [
        MutationKind::Connection,
        MutationKind::Node,
        MutationKind::Weight,
    ];

    /// Draws a kind with probability proportional to its configured
    /// rate. If no rate is positive, kinds are drawn uniformly.
    pub(super) fn select<R: Rng + ?Sized>(rng: &mut R, config: &PopulationConfig) -> MutationKind {
        let rates = [
            config.connection_mutation_rate,
            config.node_mutation_rate,
            config.weight_mutation_rate,
        ];
        let total: f32 = rates.iter().sum();
        if !(total > 0.0) {
            return Self::ALL[rng.gen_range(0..Self::ALL.len())];
        }

        let draw = rng.gen::<f32>() * total;
        let mut cumulative = 0.0;
        for (kind, rate) in Self::ALL.iter().zip(rates) {
            cumulative += rate;
            if draw < cumulative {
                return *kind;
            }
        }
        // Rounding can leave `draw` at `total`.
        Self::ALL
            .iter()
            .zip(rates)
            .rev()
            .find(|(_, rate)| *rate > 0.0)
            .map_or(MutationKind::Weight, |(kind, _)| *kind)
    }

    fn apply<G, R>(self, genome: &mut G, rng: &mut R, config: &G::Config) -> bool
    where
        G: Genome,
        R: Rng + ?Sized,
    {
        match self {
            MutationKind::Connection => genome.mutate_add_connection(rng, config),
            MutationKind::Node => genome.mutate_add_node(rng, config),
            MutationKind::Weight => genome.mutate_weight(rng, config),
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Connection => write!(f, "connection"),
            MutationKind::Node => write!(f, "node"),
            MutationKind::Weight => write!(f, "weight"),
        }
    }
}

/// Final state of a genome's mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum MutationOutcome {
    /// The genome had no connections and was given
    /// a single connection attempt instead.
    Seeded,
    /// A mutation of this kind succeeded.
    Mutated(MutationKind),
    /// Every permitted attempt failed. `kind`
    /// is the kind initially selected.
    Exhausted { kind: MutationKind, attempts: usize },
}

enum RetryState {
    Selecting,
    Attempting {
        kind: MutationKind,
        failures: usize,
    },
    Exhausted(MutationKind),
}

/// Applies one mutation per genome, retrying failed
/// attempts as the population's retry policy dictates.
pub(super) struct Mutator<'a, C> {
    genetic_config: &'a C,
    population_config: &'a PopulationConfig,
}

impl<'a, C> Mutator<'a, C> {
    pub(super) fn new(
        genetic_config: &'a C,
        population_config: &'a PopulationConfig,
    ) -> Mutator<'a, C> {
        Mutator {
            genetic_config,
            population_config,
        }
    }

    /// Mutates `genome`, recording every attempt in `report`.
    pub(super) fn mutate<G, R>(
        &self,
        genome: &mut G,
        rng: &mut R,
        report: &mut EvolutionReport,
    ) -> MutationOutcome
    where
        G: Genome<Config = C>,
        R: Rng + ?Sized,
    {
        if genome.connection_count() == 0 {
            let connected = genome.mutate_add_connection(rng, self.genetic_config);
            report.record_seed(connected);
            return MutationOutcome::Seeded;
        }

        let policy = self.population_config.retry_policy;
        let mut exhausted = Vec::with_capacity(MutationKind::ALL.len());
        let mut attempts = 0;
        let mut state = RetryState::Selecting;
        loop {
            state = match state {
                RetryState::Selecting => RetryState::Attempting {
                    kind: MutationKind::select(rng, self.population_config),
                    failures: 0,
                },
                RetryState::Attempting { kind, failures } => {
                    let succeeded = kind.apply(genome, rng, self.genetic_config);
                    report.record_attempt(kind, succeeded);
                    attempts += 1;
                    if succeeded {
                        return MutationOutcome::Mutated(kind);
                    } else if policy.permits(failures + 1) {
                        RetryState::Attempting {
                            kind,
                            failures: failures + 1,
                        }
                    } else {
                        RetryState::Exhausted(kind)
                    }
                }
                RetryState::Exhausted(kind) => {
                    exhausted.push(kind);
                    let fallback = match policy.on_exhausted() {
                        ExhaustionPolicy::Fallback => MutationKind::ALL
                            .iter()
                            .copied()
                            .find(|k| !exhausted.contains(k)),
                        ExhaustionPolicy::Skip | ExhaustionPolicy::Abort => None,
                    };
                    match fallback {
                        Some(kind) => RetryState::Attempting { kind, failures: 0 },
                        None => {
                            return MutationOutcome::Exhausted {
                                kind: exhausted[0],
                                attempts,
                            }
                        }
                    }
                }
            }
        }
    }
}
