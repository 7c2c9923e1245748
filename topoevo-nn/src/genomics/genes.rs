use crate::genomics::GeneticConfig;
use crate::Innovation;

use rand::Rng;

use std::fmt;

/// Genes are the principal components of genomes.
/// They are created between two nodes, and become
/// network connections in the genome's phenotype.
///
/// A gene that is not _expressed_ contributes nothing
/// to evaluation, but is kept so it can be re-enabled.
#[derive(Clone, PartialEq, Debug)]
pub struct Gene {
    id: Innovation,
    input: Innovation,
    output: Innovation,
    weight: f32,
    expressed: bool,
}

impl Gene {
    /// Returns a new _expressed_ gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    /// ```
    pub fn new(id: Innovation, input: Innovation, output: Innovation, weight: f32) -> Gene {
        Gene {
            id,
            input,
            output,
            weight,
            expressed: true,
        }
    }

    /// Returns a random weight, uniformly distributed
    /// over `[-weight_bound, weight_bound)`.
    pub(super) fn random_weight<R: Rng + ?Sized>(rng: &mut R, config: &GeneticConfig) -> f32 {
        symmetric_sample(rng, config.weight_bound)
    }

    /// Nudges the gene's weight by a random amount, uniformly
    /// distributed over `[-weight_mutation_power, weight_mutation_power)`.
    /// The result is not clamped.
    ///
    /// # Examples
    /// ```
    /// use rand::thread_rng;
    /// use topoevo_nn::genomics::{Gene, GeneticConfig};
    ///
    /// let mut gene = Gene::new(42, 3, 9, 3.0);
    ///
    /// gene.nudge_weight(&mut thread_rng(), &GeneticConfig {
    ///     weight_mutation_power: 1.0,
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// assert!((gene.weight() - 3.0).abs() <= 1.0);
    /// ```
    pub fn nudge_weight<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &GeneticConfig) {
        self.weight += symmetric_sample(rng, config.weight_mutation_power);
    }

    /// Returns the gene's innovation number.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.innovation(), 42);
    /// ```
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the id of the gene's source node.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.input(), 3);
    /// ```
    pub fn input(&self) -> Innovation {
        self.input
    }

    /// Returns the id of the gene's target node.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.output(), 9);
    /// ```
    pub fn output(&self) -> Innovation {
        self.output
    }

    /// Returns the gene's weight.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Sets the gene's weight.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::Gene;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 2.0);
    /// gene.set_weight(-5.0);
    ///
    /// assert_eq!(gene.weight(), -5.0);
    /// ```
    pub fn set_weight(&mut self, w: f32) {
        self.weight = w;
    }

    /// Returns whether the gene is expressed.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert!(gene.expressed());
    /// ```
    pub fn expressed(&self) -> bool {
        self.expressed
    }

    /// Sets the gene's expression status.
    pub fn set_expressed(&mut self, expressed: bool) {
        self.expressed = expressed;
    }

    /// Returns the gene's source and target node ids.
    pub fn endpoints(&self) -> (Innovation, Innovation) {
        (self.input, self.output)
    }

    /// Returns whether the gene joins `a` and `b`,
    /// in either direction.
    pub(super) fn joins(&self, a: Innovation, b: Innovation) -> bool {
        (self.input == a && self.output == b) || (self.input == b && self.output == a)
    }
}

/// Uniform sample from `[-magnitude, magnitude)`.
/// A zero magnitude always yields 0.
fn symmetric_sample<R: Rng + ?Sized>(rng: &mut R, magnitude: f32) -> f32 {
    if magnitude > 0.0 {
        rng.gen_range(-magnitude..magnitude)
    } else {
        0.0
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}",
            if self.expressed { "" } else { "(" },
            self.id,
            self.input,
            self.output,
            self.weight,
            if self.expressed { "" } else { ")" },
        )
    }
}
