use topoevo::logging::{EvolutionLogger, ReportingLevel, Stats};
use topoevo::{Genome, Population, PopulationConfig};
use topoevo_nn::genomics::{GeneticConfig, NNGenome};

use std::error::Error;
use std::fs;
use std::num::NonZeroUsize;

use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Allowed error margin for neural net answers.
const ERROR_MARGIN: f32 = 0.3;
/// Fitness of a genome answering every case within the margin.
const SOLVED_FITNESS: f32 = 16.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ExperimentConfig {
    genetic: GeneticConfig,
    population: PopulationConfig,
    /// Fraction of each generation kept as survivors.
    survival_fraction: f32,
    max_generations: usize,
    runs: usize,
    seed: u64,
}

impl ExperimentConfig {
    fn standard() -> ExperimentConfig {
        ExperimentConfig {
            genetic: GeneticConfig {
                weight_mutation_power: 2.5,
                ..GeneticConfig::new(NonZeroUsize::new(3).unwrap(), NonZeroUsize::new(1).unwrap())
            },
            population: PopulationConfig::new(NonZeroUsize::new(150).unwrap()),
            survival_fraction: 0.2,
            max_generations: 100,
            runs: 20,
            seed: 0,
        }
    }

    fn survivor_count(&self) -> usize {
        let size = self.population.size.get();
        ((size as f32 * self.survival_fraction) as usize).clamp(1, size)
    }
}

fn evaluate_xor(genome: &NNGenome) -> f32 {
    let values = [
        ([1.0, 0.0, 0.0], 0.0),
        ([1.0, 0.0, 1.0], 1.0),
        ([1.0, 1.0, 0.0], 1.0),
        ([1.0, 1.0, 1.0], 0.0),
    ];

    let mut errors = [0.0, 0.0, 0.0, 0.0];
    for (i, (input, output)) in values.iter().enumerate() {
        errors[i] = (genome.evaluate(input)[0] - output).abs();
        if errors[i] < ERROR_MARGIN {
            errors[i] = 0.0;
        }
    }

    (4.0 - errors.iter().copied().sum::<f32>()).powf(2.0)
}

/// Evolves a single population, returning the generation
/// at which a solution was found, if any.
fn run(config: &ExperimentConfig, seed: u64, verbose: bool) -> Option<usize> {
    let mut population: Population<_, NNGenome> =
        Population::new(config.population.clone(), config.genetic.clone());
    let mut logger = EvolutionLogger::new(ReportingLevel::Leading(1));
    let mut rng = StdRng::seed_from_u64(seed);
    let survivor_count = config.survivor_count();

    for _ in 0..config.max_generations {
        let fitness: Vec<f32> = population.genomes().par_iter().map(evaluate_xor).collect();
        let ranking = topoevo::rank(&fitness);

        if verbose {
            logger.log(
                &population,
                &|g: &NNGenome| [g.node_count() as f32, g.connection_count() as f32],
                ["nodes", "connections"],
            );
            if let Some(log) = logger.last() {
                println!("{}", log);
            }
            println!("\tfitness: {:?}", Stats::from(fitness.iter().copied()));
        }
        if (fitness[ranking[0]] - SOLVED_FITNESS).abs() < f32::EPSILON {
            if verbose {
                println!("Solution found: {}", population.genomes()[ranking[0]]);
            }
            return Some(population.generation());
        }
        if let Err(e) = population.evolve(&ranking[..survivor_count], &mut rng) {
            eprintln!("{}", e);
            return None;
        }
    }
    None
}

fn main() -> Result<(), Box<dyn Error>> {
    let config: ExperimentConfig = match std::env::args().nth(1) {
        Some(path) => ron::from_str(&fs::read_to_string(path)?)?,
        None => {
            let config = ExperimentConfig::standard();
            println!(
                "Using standard configuration:\n{}",
                ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new())?
            );
            config
        }
    };

    run(&config, config.seed, true);

    let generations: Vec<Option<usize>> = (0..config.runs as u64)
        .map(|i| run(&config, config.seed.wrapping_add(i + 1), false))
        .collect();
    let failures = generations.iter().filter(|g| g.is_none()).count();

    println!(
        "Successful run generation count {:?}, {}% failure rate over {} runs",
        Stats::from(generations.iter().flatten().map(|&g| g as f32)),
        failures as f32 * 100.0 / config.runs.max(1) as f32,
        config.runs
    );
    Ok(())
}
