use super::{EvolutionReport, Population};

use crate::genome::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones the first `n` genomes of the population.
    /// After evolution these are the survivors, in the
    /// order they were selected.
    Leading(usize),
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord<G>,
    pub population_size: usize,
    pub genome_stats: Vec<(String, Stats)>,
    /// Report of the evolution that produced the generation.
    pub report: Option<EvolutionReport>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tpopulation_size: {:?}\n\
            {}",
            &self.generation_number,
            &self.population_size,
            self.genome_stats
                .iter()
                .map(|(name, stats)| format!("\t{}: {:?}\n", name, stats))
                .collect::<Vec<_>>()
                .join("")
        )?;
        if let Some(report) = &self.report {
            writeln!(f, "\treport: {}", report)?;
        }
        write!(f, "}}")
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// All statistics of an empty sequence are NaN.
    ///
    /// # Examples
    /// ```
    /// use topoevo::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied());
    /// assert_eq!(stats.median, 2.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: f32::NAN,
                minimum: f32::NAN,
                mean: f32::NAN,
                median: f32::NAN,
            };
        }
        data.sort_unstable_by(f32::total_cmp);

        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        }
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord<G> {
    /// Genomes, in population order.
    Genomes(Vec<G>),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome + Clone> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::NNGenome as G;
    /// use topoevo::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::NoGenomes);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population.
    ///
    /// The `genome_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use topoevo::{Genome, Population, PopulationConfig};
    /// use topoevo::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut logger = EvolutionLogger::<G>::new(ReportingLevel::NoGenomes);
    /// # let genetic_config = GeneticConfig::zero();
    /// let population = Population::new(PopulationConfig::zero(), genetic_config);
    ///
    /// // Do something with the population...
    /// // Then log a snapshot.
    /// logger.log(
    ///     &population,
    ///     &|g: &G| [g.node_count() as f32, g.connection_count() as f32],
    ///     ["nodes", "connections"],
    /// );
    /// ```
    pub fn log<C, GSE, const N: usize>(
        &mut self,
        population: &Population<C, G>,
        genome_stat_extractor: &GSE,
        stat_names: [&str; N],
    ) where
        G: Genome<Config = C>,
        GSE: Fn(&G) -> [f32; N],
    {
        let stats: Vec<[f32; N]> = population
            .genomes()
            .iter()
            .map(genome_stat_extractor)
            .collect();
        let stats = stat_names
            .iter()
            .cloned()
            .map(String::from)
            .zip(unzip_n_vecs(stats.into_iter()))
            .map(|(name, data)| (name, Stats::from(data.into_iter())))
            .collect();
        let genomes = population.genomes();
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => GenerationMemberRecord::Genomes(genomes.to_vec()),
                ReportingLevel::Leading(n) => {
                    GenerationMemberRecord::Genomes(genomes[..n.min(genomes.len())].to_vec())
                }
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            population_size: population.size(),
            genome_stats: stats,
            report: population.last_report().cloned(),
        })
    }

    /// Iterate over all logged snapshots.
    ///
    /// # Examples
    /// ```
    /// # use topoevo_nn::genomics::NNGenome as G;
    /// use topoevo::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::AllGenomes);
    /// // Log some stuff... then
    /// for log in logger.iter() {
    ///     println!("{}", log);
    /// }
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot, if any.
    pub fn last(&self) -> Option<&Log<G>> {
        self.logs.last()
    }
}

fn unzip_n_vecs<T: Clone, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs = vec![Vec::default(); N];
    for items in iter {
        for (vec, item) in vecs.iter_mut().zip(items) {
            vec.push(item);
        }
    }
    vecs
}
