use super::PopulationConfig;
use crate::Genome;

use rand::Rng;

/// Auxiliary type for offspring generation.
/// Fills a generation up to the configured size
/// with replicas of its survivors.
pub(super) struct OffspringFactory<'a, C> {
    genetic_config: &'a C,
    population_config: &'a PopulationConfig,
}

impl<'a, C> OffspringFactory<'a, C> {
    pub(super) fn new(
        genetic_config: &'a C,
        population_config: &'a PopulationConfig,
    ) -> OffspringFactory<'a, C> {
        OffspringFactory {
            genetic_config,
            population_config,
        }
    }

    /// Returns the survivors, in order, followed by replicas of
    /// uniformly chosen survivors. Survivors may be chosen several
    /// times, and replicas are never chosen as parents.
    ///
    /// `survivors` must not be empty unless the population is full.
    pub(super) fn generate_offspring<G, R>(&self, survivors: Vec<G>, rng: &mut R) -> Vec<G>
    where
        G: Genome<Config = C>,
        R: Rng + ?Sized,
    {
        let size = self.population_config.size.get();
        let parent_count = survivors.len();
        let mut offspring = survivors;
        offspring.reserve(size.saturating_sub(parent_count));

        while offspring.len() < size {
            let parent = rng.gen_range(0..parent_count);
            let child = offspring[parent].replicate(self.genetic_config);
            offspring.push(child);
        }
        offspring
    }
}
