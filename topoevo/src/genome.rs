use rand::Rng;

/// An interface for genomes that can be evolved by a [`Population`].
///
/// Mutation methods report whether the genome was changed. A `false`
/// return must leave the genome exactly as it was, as the population
/// may retry the same mutation on it.
///
/// [`Population`]: crate::Population
pub trait Genome: Sized {
    type Config;

    /// Returns a fresh genome with no connections.
    fn new(config: &Self::Config) -> Self;

    /// Attempts to add (or re-enable) a connection.
    fn mutate_add_connection<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &Self::Config)
        -> bool;

    /// Attempts to add a node by splitting a connection.
    fn mutate_add_node<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &Self::Config) -> bool;

    /// Attempts to perturb a connection's weight.
    fn mutate_weight<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &Self::Config) -> bool;

    /// Returns the genome's offspring for the next generation.
    fn replicate(&self, config: &Self::Config) -> Self;

    /// Computes the genome's outputs for the passed inputs.
    ///
    /// Callers guarantee `inputs.len() == self.input_count()`.
    fn evaluate(&self, inputs: &[f32]) -> Vec<f32>;

    /// Returns the number of values [`evaluate`] expects.
    ///
    /// [`evaluate`]: Genome::evaluate
    fn input_count(&self) -> usize;

    /// Returns the number of values [`evaluate`] produces.
    ///
    /// [`evaluate`]: Genome::evaluate
    fn output_count(&self) -> usize;

    /// Returns the number of nodes in the genome.
    fn node_count(&self) -> usize;

    /// Returns the number of connections in the genome,
    /// including disabled ones.
    fn connection_count(&self) -> usize;
}
