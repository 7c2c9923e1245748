use crate::genomics::NNGenome;
use crate::Innovation;

/// Largest `f32` strictly below 1.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Evaluation state of a single node.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Activation {
    Unvisited,
    InProgress,
    Settled(f32),
}

/// A feed-forward network evaluated on demand, output by output.
///
/// Each node's value is the sigmoid of the weighted sum of its
/// expressed inputs. Values are computed once per evaluation and
/// shared between all nodes that depend on them, so diamond-shaped
/// topologies cost linear time. Evaluation walks the graph with an
/// explicit stack, so deep networks can't overflow the call stack.
#[derive(Clone, Debug)]
pub struct FeedForwardNetwork<'a> {
    genome: &'a NNGenome,
    activations: Vec<Activation>,
    pending: Vec<(Innovation, bool)>,
}

impl<'a> From<&'a NNGenome> for FeedForwardNetwork<'a> {
    /// Generates a new network from the passed genome.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome};
    /// use topoevo_nn::networks::FeedForwardNetwork;
    ///
    /// let genome = NNGenome::new(&GeneticConfig::zero());
    /// let network = FeedForwardNetwork::from(&genome);
    /// ```
    fn from(genome: &'a NNGenome) -> FeedForwardNetwork<'a> {
        FeedForwardNetwork {
            genome,
            activations: vec![Activation::Unvisited; genome.node_count()],
            pending: vec![],
        }
    }
}

impl<'a> FeedForwardNetwork<'a> {
    /// Returns the value of every output node, in id order,
    /// for the given input values.
    ///
    /// All returned values lie in the open interval (0, 1)
    /// for finite inputs. An output node with no expressed
    /// inputs evaluates to 0.5.
    ///
    /// # Panics
    /// Panics if `inputs` doesn't hold exactly one value
    /// per input node of the genome.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome};
    /// use topoevo_nn::networks::FeedForwardNetwork;
    ///
    /// fn sigmoid(x: f32) -> f32 {
    ///     1.0 / (1.0 + (-x).exp())
    /// }
    ///
    /// // Create a network with a single hidden node between
    /// // the input and the output.
    /// let mut genome = NNGenome::new(&GeneticConfig::zero());
    /// let hidden = genome.add_node().id();
    /// genome.add_gene(0, hidden, 1.0).unwrap();
    /// genome.add_gene(hidden, 1, 1.0).unwrap();
    /// let mut network = FeedForwardNetwork::from(&genome);
    ///
    /// // The result is identical to double application of a sigmoid function.
    /// for input in -20..=20 {
    ///     let input = input as f32 / 10.0;
    ///     assert_eq!(network.evaluate_at(&[input])[0], sigmoid(sigmoid(input)));
    /// }
    /// ```
    pub fn evaluate_at(&mut self, inputs: &[f32]) -> Vec<f32> {
        assert_eq!(
            inputs.len(),
            self.genome.input_count(),
            "network evaluated with {} values for {} inputs",
            inputs.len(),
            self.genome.input_count(),
        );
        self.activations.fill(Activation::Unvisited);

        let first_output = self.genome.input_count();
        (first_output..first_output + self.genome.output_count())
            .map(|output| self.activate(output, inputs))
            .collect()
    }

    /// Settles `root` and every non-input node it depends on.
    fn activate(&mut self, root: Innovation, inputs: &[f32]) -> f32 {
        let genome = self.genome;
        self.pending.clear();
        self.pending.push((root, false));

        while let Some((node, expanded)) = self.pending.pop() {
            if expanded {
                let value = self.settle(node, inputs);
                self.activations[node] = Activation::Settled(value);
                continue;
            }
            if self.activations[node] != Activation::Unvisited {
                continue;
            }
            self.activations[node] = Activation::InProgress;
            self.pending.push((node, true));
            for gene in genome.incoming_genes(node).filter(|g| g.expressed()) {
                let source = gene.input();
                if source >= genome.input_count()
                    && self.activations[source] == Activation::Unvisited
                {
                    self.pending.push((source, false));
                }
            }
        }

        match self.activations[root] {
            Activation::Settled(value) => value,
            // Only reachable when evaluating an input node as a root.
            _ => sigmoid(0.0),
        }
    }

    /// Computes a node's value from its already settled sources.
    /// Sources still in progress close a cycle, and are skipped.
    fn settle(&self, node: Innovation, inputs: &[f32]) -> f32 {
        let input_count = self.genome.input_count();
        let sum: f32 = self
            .genome
            .incoming_genes(node)
            .filter(|g| g.expressed())
            .filter_map(|g| {
                let source = g.input();
                if source < input_count {
                    Some(g.weight() * inputs[source])
                } else if let Activation::Settled(value) = self.activations[source] {
                    Some(g.weight() * value)
                } else {
                    None
                }
            })
            .sum();
        // Opposing overflows sum to NaN; such a node reads as unstimulated.
        if sum.is_nan() {
            sigmoid(0.0)
        } else {
            sigmoid(sum)
        }
    }
}

/// Logistic sigmoid, kept strictly inside (0, 1)
/// where `f32` rounding would saturate it.
fn sigmoid(x: f32) -> f32 {
    (1.0 / (1.0 + (-x).exp())).clamp(f32::MIN_POSITIVE, BELOW_ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{ExpressionInheritance, GeneValidityError, GeneticConfig};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::num::NonZeroUsize;

    fn reference_sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            ..GeneticConfig::zero()
        }
    }

    #[test]
    fn unconnected_outputs_are_half() {
        let genome = NNGenome::new(&config(3, 2));
        let mut network = FeedForwardNetwork::from(&genome);
        assert_eq!(network.evaluate_at(&[1.0, -4.0, 9.0]), vec![0.5, 0.5]);
    }

    #[test]
    fn weighted_sum_of_inputs() {
        let mut genome = NNGenome::new(&config(2, 1));
        genome.add_gene(0, 2, 0.5).unwrap();
        genome.add_gene(1, 2, -2.0).unwrap();
        let mut network = FeedForwardNetwork::from(&genome);
        assert_eq!(
            network.evaluate_at(&[2.0, 1.0])[0],
            reference_sigmoid(0.5 * 2.0 + -2.0 * 1.0)
        );
    }

    #[test]
    fn disabled_genes_are_ignored() {
        let mut genome = NNGenome::new(&config(2, 1));
        genome.add_gene(0, 2, 3.0).unwrap();
        genome.add_gene(1, 2, 1.0).unwrap();
        genome.suppress_gene(0);
        let mut network = FeedForwardNetwork::from(&genome);
        assert_eq!(network.evaluate_at(&[1.0, 1.0])[0], reference_sigmoid(1.0));
    }

    #[test]
    fn diamond_shares_hidden_values() {
        // 0 -> 2, 0 -> 3, 2 -> 4, 3 -> 4, 2 -> 3, 4 -> 1
        let mut genome = NNGenome::new(&config(1, 1));
        for _ in 0..3 {
            genome.add_node();
        }
        genome.add_gene(0, 2, 1.0).unwrap();
        genome.add_gene(0, 3, -1.0).unwrap();
        genome.add_gene(2, 4, 2.0).unwrap();
        genome.add_gene(3, 4, 0.5).unwrap();
        genome.add_gene(2, 3, 1.5).unwrap();
        genome.add_gene(4, 1, 1.0).unwrap();

        let x = 0.7;
        let h2 = reference_sigmoid(x);
        let h3 = reference_sigmoid(-x + 1.5 * h2);
        let h4 = reference_sigmoid(2.0 * h2 + 0.5 * h3);
        let expected = reference_sigmoid(h4);

        let mut network = FeedForwardNetwork::from(&genome);
        assert_eq!(network.evaluate_at(&[x])[0], expected);
        // Reuse doesn't carry state over between evaluations.
        assert_eq!(network.evaluate_at(&[x])[0], expected);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut genome = NNGenome::new(&config(1, 1));
        genome.add_gene(0, 1, 1.0).unwrap();
        // Each split lengthens the chain into the output by one node.
        for _ in 0..100_000 {
            genome.mutate_add_node().unwrap();
        }
        let output = FeedForwardNetwork::from(&genome).evaluate_at(&[1.0])[0];
        assert!(output > 0.0 && output < 1.0);
    }

    #[test]
    fn saturated_outputs_stay_in_open_interval() {
        let mut genome = NNGenome::new(&config(1, 2));
        genome.add_gene(0, 1, 5.0).unwrap();
        genome.add_gene(0, 2, -5.0).unwrap();
        let mut network = FeedForwardNetwork::from(&genome);
        for value in network.evaluate_at(&[1.0e6]) {
            assert!(value > 0.0 && value < 1.0);
        }
    }

    #[test]
    fn opposing_overflows_read_as_unstimulated() {
        let mut genome = NNGenome::new(&config(2, 1));
        genome.add_gene(0, 2, 4.0).unwrap();
        genome.add_gene(1, 2, -4.0).unwrap();
        let mut network = FeedForwardNetwork::from(&genome);
        assert_eq!(network.evaluate_at(&[1.0e38, 1.0e38]), vec![0.5]);
        // A single overflowing term still saturates.
        let value = network.evaluate_at(&[1.0e38, 0.0])[0];
        assert!(value > 0.5 && value < 1.0);
    }

    /// Returns the replica of a genome whose genes are all suppressed,
    /// the loop 2 -> 3 -> 4 -> 2 among them.
    fn looped_replica() -> (NNGenome, GeneticConfig) {
        let config = GeneticConfig {
            expression_inheritance: ExpressionInheritance::Inverted,
            ..config(1, 1)
        };
        let mut genome = NNGenome::new(&config);
        for _ in 0..3 {
            genome.add_node();
        }
        let endpoints = [(0, 2), (2, 3), (3, 4), (4, 2), (4, 1)];
        for (index, &(input, output)) in endpoints.iter().enumerate() {
            genome.add_gene(input, output, 1.0).unwrap();
            genome.suppress_gene(index);
        }
        let replica = genome.replicate(&config);
        assert!(replica.genes().all(|g| g.expressed()));
        (replica, config)
    }

    #[test]
    fn expressed_loop_skips_back_edge() {
        let (genome, _) = looped_replica();
        let x = 0.8;
        // Node 2 settles while 4 is still in progress, so 4 -> 2 is dropped.
        let expected = (0..4).fold(x, |value, _| reference_sigmoid(value));
        let mut network = FeedForwardNetwork::from(&genome);
        assert_eq!(network.evaluate_at(&[x]), vec![expected]);
        assert_eq!(network.evaluate_at(&[x]), vec![expected]);
    }

    #[test]
    fn expressed_loop_allows_further_growth() {
        let (mut genome, config) = looped_replica();
        assert_eq!(
            genome.add_gene(1, 3, 1.0).unwrap_err(),
            GeneValidityError::CreatesCycle(1, 3)
        );
        genome.add_gene(2, 1, -1.0).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for _ in 0..200 {
            let _ = genome.mutate_add_connection(&mut rng, &config);
        }
        let value = genome.evaluate(&[0.8])[0];
        assert!(value > 0.0 && value < 1.0);
    }

    #[test]
    #[should_panic]
    fn wrong_input_length() {
        let genome = NNGenome::new(&config(2, 1));
        FeedForwardNetwork::from(&genome).evaluate_at(&[1.0]);
    }
}
