//! A Population is a fixed-size collection of genomes.
//! It is evolved generation by generation: the caller
//! selects the survivors of each generation, which are
//! replicated to refill the population and then mutated.
mod config;
mod errors;
pub mod logging;
mod mutation;
mod offspring_factory;
mod report;

use crate::Genome;
pub use config::{ExhaustionPolicy, PopulationConfig, RetryPolicy};
pub use errors::{EvaluationError, EvolutionError};
pub use mutation::MutationKind;
use mutation::{MutationOutcome, Mutator};
use offspring_factory::OffspringFactory;
pub use report::{EvolutionReport, MutationTally};

use ahash::RandomState;
use rand::Rng;

use std::collections::HashSet;

/// A population of genomes.
#[derive(Clone, Debug)]
pub struct Population<C, G> {
    genomes: Vec<G>,
    generation: usize,
    last_report: Option<EvolutionReport>,
    population_config: PopulationConfig,
    genetic_config: C,
}

impl<C, G> Population<C, G>
where
    G: Genome<Config = C>,
{
    /// Creates a new population of [`size`] fresh genomes
    /// using the passed configurations.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// [`size`]: PopulationConfig::size
    /// [`Genome`]: crate::Genome
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use topoevo::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let pop_config = PopulationConfig::new(NonZeroUsize::new(5).unwrap());
    /// # let genetic_config = GeneticConfig::zero();
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, G>::new(pop_config, genetic_config);
    ///
    /// assert_eq!(population.size(), 5);
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn new(population_config: PopulationConfig, genetic_config: C) -> Population<C, G> {
        Population {
            genomes: Self::fresh_genomes(&population_config, &genetic_config),
            generation: 0,
            last_report: None,
            population_config,
            genetic_config,
        }
    }

    fn fresh_genomes(population_config: &PopulationConfig, genetic_config: &C) -> Vec<G> {
        (0..population_config.size.get())
            .map(|_| G::new(genetic_config))
            .collect()
    }

    /// Evaluates the genome at position `index` on the passed inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no genome at `index`, or
    /// the genome doesn't take `inputs.len()` inputs.
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use topoevo::{EvaluationError, Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, G>::new(
    ///     PopulationConfig::new(NonZeroUsize::new(2).unwrap()),
    ///     genetic_config,
    /// );
    ///
    /// assert_eq!(population.evaluate(1, &[0.0]), Ok(vec![0.5]));
    /// assert_eq!(
    ///     population.evaluate(2, &[0.0]),
    ///     Err(EvaluationError::GenomeIndexOutOfRange { index: 2, size: 2 })
    /// );
    /// ```
    pub fn evaluate(&self, index: usize, inputs: &[f32]) -> Result<Vec<f32>, EvaluationError> {
        let genome = self
            .genomes
            .get(index)
            .ok_or(EvaluationError::GenomeIndexOutOfRange {
                index,
                size: self.genomes.len(),
            })?;
        if inputs.len() != genome.input_count() {
            return Err(EvaluationError::InputLengthMismatch {
                expected: genome.input_count(),
                found: inputs.len(),
            });
        }
        Ok(genome.evaluate(inputs))
    }

    /// Evolves the population into its next generation.
    ///
    /// The genomes at positions `survivors` are moved, in the given
    /// order, to the front of the new generation. The rest of it is
    /// filled with replicas of survivors chosen uniformly at random.
    /// Every genome is then mutated once: genomes without connections
    /// get a single connection attempt, while the rest get a mutation
    /// of a kind drawn according to the configured mutation rates,
    /// retried on failure as the [retry policy] dictates.
    ///
    /// Returns a report of the mutations performed, which is also
    /// kept as the population's [last report].
    ///
    /// # Errors
    ///
    /// Returns an error, without modifying the population, if
    /// `survivors` is empty, longer than the population, or holds
    /// an out of range or repeated index.
    ///
    /// Under [`ExhaustionPolicy::Abort`], returns an error once a
    /// genome exhausts its attempts. The new generation is still
    /// installed, with the remaining genomes unmutated.
    ///
    /// [retry policy]: PopulationConfig::retry_policy
    /// [last report]: Population::last_report
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use rand::thread_rng;
    /// use topoevo::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::new(
    /// #     NonZeroUsize::new(2).unwrap(),
    /// #     NonZeroUsize::new(1).unwrap(),
    /// # );
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, G>::new(
    ///     PopulationConfig::new(NonZeroUsize::new(5).unwrap()),
    ///     genetic_config,
    /// );
    ///
    /// let report = population.evolve(&[1, 3], &mut thread_rng()).unwrap();
    ///
    /// assert_eq!(population.size(), 5);
    /// assert_eq!(population.generation(), 1);
    /// assert_eq!((report.survivors, report.replicated), (2, 3));
    /// // Every genome started without connections.
    /// assert_eq!(report.seeded, 5);
    /// ```
    pub fn evolve<R: Rng + ?Sized>(
        &mut self,
        survivors: &[usize],
        rng: &mut R,
    ) -> Result<EvolutionReport, EvolutionError> {
        self.check_survivors(survivors)?;
        let survivors = self.take_survivors(survivors);
        let survivor_count = survivors.len();

        let mut genomes = OffspringFactory::new(&self.genetic_config, &self.population_config)
            .generate_offspring(survivors, rng);
        let mut report = EvolutionReport::new(
            self.generation + 1,
            survivor_count,
            genomes.len() - survivor_count,
        );

        let mutator = Mutator::new(&self.genetic_config, &self.population_config);
        let mut aborted = None;
        for (index, genome) in genomes.iter_mut().enumerate() {
            if let MutationOutcome::Exhausted { kind, attempts } =
                mutator.mutate(genome, rng, &mut report)
            {
                report.exhausted.push(index);
                if self.population_config.retry_policy.on_exhausted() == ExhaustionPolicy::Abort {
                    aborted = Some(EvolutionError::MutationExhausted {
                        genome: index,
                        kind,
                        attempts,
                    });
                    break;
                }
            }
        }

        self.genomes = genomes;
        self.generation += 1;
        self.last_report = Some(report.clone());
        match aborted {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    fn check_survivors(&self, survivors: &[usize]) -> Result<(), EvolutionError> {
        let size = self.genomes.len();
        if survivors.is_empty() {
            return Err(EvolutionError::NoSurvivors);
        }
        if survivors.len() > size {
            return Err(EvolutionError::TooManySurvivors {
                count: survivors.len(),
                size,
            });
        }
        let mut seen: HashSet<usize, RandomState> = HashSet::default();
        for &index in survivors {
            if index >= size {
                return Err(EvolutionError::SurvivorOutOfRange { index, size });
            }
            if !seen.insert(index) {
                return Err(EvolutionError::DuplicateSurvivor(index));
            }
        }
        Ok(())
    }

    /// Moves the survivors out of the population, in order.
    /// Survivors must have been checked beforehand.
    fn take_survivors(&mut self, survivors: &[usize]) -> Vec<G> {
        let mut slots: Vec<Option<G>> = std::mem::take(&mut self.genomes)
            .into_iter()
            .map(Some)
            .collect();
        survivors
            .iter()
            .filter_map(|&index| slots[index].take())
            .collect()
    }

    /// Returns genome positions in decreasing order of the
    /// fitness assigned to them by `fitness`. Genomes of equal
    /// fitness keep their relative order. NaN fitnesses rank last.
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use topoevo::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, G>::new(
    ///     PopulationConfig::new(NonZeroUsize::new(4).unwrap()),
    ///     genetic_config,
    /// );
    ///
    /// let scores = [1.0, 3.0, 1.0, 2.0];
    /// let mut next = scores.iter().copied();
    /// let ranking = population.rank_by(|_| next.next().unwrap());
    ///
    /// assert_eq!(ranking, vec![1, 3, 0, 2]);
    /// ```
    pub fn rank_by<F>(&self, fitness: F) -> Vec<usize>
    where
        F: FnMut(&G) -> f32,
    {
        let scores: Vec<f32> = self.genomes.iter().map(fitness).collect();
        rank(&scores)
    }

    /// Resets the population to its initial state:
    /// [`size`] fresh genomes at generation 0.
    ///
    /// [`size`]: PopulationConfig::size
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use rand::thread_rng;
    /// use topoevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// );
    ///
    /// population.evolve(&[0], &mut thread_rng()).unwrap();
    /// population.reset();
    ///
    /// assert_eq!(population.generation(), 0);
    /// assert!(population.last_report().is_none());
    /// ```
    pub fn reset(&mut self) {
        self.genomes = Self::fresh_genomes(&self.population_config, &self.genetic_config);
        self.generation = 0;
        self.last_report = None;
    }

    /// Returns all current genomes, in population order.
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use topoevo::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, G>::new(PopulationConfig::zero(), genetic_config);
    ///
    /// for genome in population.genomes() {
    ///     println!("{}", genome);
    /// }
    /// ```
    pub fn genomes(&self) -> &[G] {
        &self.genomes
    }

    /// Returns the genome at position `index`, if any.
    pub fn genome(&self, index: usize) -> Option<&G> {
        self.genomes.get(index)
    }

    /// Returns the number of genomes in the population.
    pub fn size(&self) -> usize {
        self.genomes.len()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the report of the latest evolution,
    /// or `None` if the population hasn't evolved
    /// since its creation or last reset.
    pub fn last_report(&self) -> Option<&EvolutionReport> {
        self.last_report.as_ref()
    }

    /// Returns the population's configuration.
    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the configuration passed to the genomes.
    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

/// Returns positions in `scores` in decreasing order of score.
/// Equal scores keep their relative order. NaNs rank last.
///
/// # Examples
/// ```
/// let ranking = topoevo::rank(&[0.5, f32::NAN, 2.0, 0.5]);
/// assert_eq!(ranking, vec![2, 0, 3, 1]);
/// ```
pub fn rank(scores: &[f32]) -> Vec<usize> {
    let mut ranking: Vec<usize> = (0..scores.len()).collect();
    ranking.sort_by(|&a, &b| {
        let (a, b) = (scores[a], scores[b]);
        match (a.is_nan(), b.is_nan()) {
            (false, false) => b.total_cmp(&a),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        }
    });
    ranking
}
