use super::MutationKind;

use std::fmt;

/// Attempt and success counts for one kind of mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationTally {
    pub attempts: usize,
    pub successes: usize,
}

impl MutationTally {
    /// Returns the fraction of attempts that succeeded,
    /// or `None` if there were no attempts.
    ///
    /// # Examples
    /// ```
    /// use topoevo::MutationTally;
    ///
    /// let tally = MutationTally { attempts: 4, successes: 1 };
    /// assert_eq!(tally.success_rate(), Some(0.25));
    /// assert_eq!(MutationTally::default().success_rate(), None);
    /// ```
    pub fn success_rate(&self) -> Option<f32> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.successes as f32 / self.attempts as f32)
        }
    }
}

/// A summary of what happened during a single
/// call to [`Population::evolve`].
///
/// [`Population::evolve`]: crate::Population::evolve
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvolutionReport {
    /// Generation number of the evolved population.
    pub generation: usize,
    /// Number of genomes carried over from the previous generation.
    pub survivors: usize,
    /// Number of genomes replicated from survivors.
    pub replicated: usize,
    /// Number of connection-less genomes given a
    /// single connection attempt instead of a mutation.
    pub seeded: usize,
    /// Number of those attempts that added a connection.
    pub seeds_connected: usize,
    pub connection: MutationTally,
    pub node: MutationTally,
    pub weight: MutationTally,
    /// Positions of genomes left unmutated
    /// because every permitted attempt failed.
    pub exhausted: Vec<usize>,
}

impl EvolutionReport {
    pub(super) fn new(generation: usize, survivors: usize, replicated: usize) -> EvolutionReport {
        EvolutionReport {
            generation,
            survivors,
            replicated,
            ..EvolutionReport::default()
        }
    }

    pub(super) fn record_seed(&mut self, connected: bool) {
        self.seeded += 1;
        if connected {
            self.seeds_connected += 1;
        }
    }

    pub(super) fn record_attempt(&mut self, kind: MutationKind, succeeded: bool) {
        let tally = self.tally_mut(kind);
        tally.attempts += 1;
        if succeeded {
            tally.successes += 1;
        }
    }

    /// Returns the attempt and success counts for `kind`.
    pub fn tally(&self, kind: MutationKind) -> &MutationTally {
        match kind {
            MutationKind::Connection => &self.connection,
            MutationKind::Node => &self.node,
            MutationKind::Weight => &self.weight,
        }
    }

    fn tally_mut(&mut self, kind: MutationKind) -> &mut MutationTally {
        match kind {
            MutationKind::Connection => &mut self.connection,
            MutationKind::Node => &mut self.node,
            MutationKind::Weight => &mut self.weight,
        }
    }

    /// Returns the total number of mutation attempts,
    /// excluding seeding attempts.
    pub fn attempts(&self) -> usize {
        MutationKind::ALL
            .iter()
            .map(|&kind| self.tally(kind).attempts)
            .sum()
    }
}

impl fmt::Display for EvolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "generation {}: {} survivors, {} replicated",
            self.generation, self.survivors, self.replicated
        )?;
        writeln!(
            f,
            "\tseeded: {} ({} connected)",
            self.seeded, self.seeds_connected
        )?;
        for kind in MutationKind::ALL {
            let tally = self.tally(kind);
            writeln!(
                f,
                "\t{}: {}/{} attempts succeeded",
                kind, tally.successes, tally.attempts
            )?;
        }
        write!(f, "\texhausted: {:?}", self.exhausted)
    }
}
