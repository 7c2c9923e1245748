//! Genomes are the focus of evolution.
//! They are a collection of genes and nodes that can be read
//! as a phenotype (a feed-forward neural network). Genomes are
//! progressively mutated, thus adding complexity and functionality.

mod config;
mod errors;
mod genes;
mod nodes;

pub use config::{ExpressionInheritance, GeneticConfig};
pub use errors::*;
pub use genes::Gene;
pub use nodes::{Node, NodeType};

use crate::networks::FeedForwardNetwork;
use crate::Innovation;

use ahash::RandomState;
use rand::Rng;

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// A mutable collection of genes and nodes.
///
/// Nodes and genes are stored in creation order, and
/// a node's id is its index in the node list. An index
/// from each node to the genes ending at it is kept
/// alongside, so evaluation and cycle checks never
/// need to scan the whole gene list.
#[derive(Clone, PartialEq, Debug)]
pub struct NNGenome {
    nodes: Vec<Node>,
    genes: Vec<Gene>,
    incoming: HashMap<Innovation, Vec<usize>, RandomState>,
    input_count: usize,
    output_count: usize,
}

impl NNGenome {
    /// Create a new genome with the specified configuration.
    ///
    /// The genome holds `input_count` input nodes, with ids
    /// `0..input_count`, followed by `output_count` output
    /// nodes, and no genes.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(
    ///     NonZeroUsize::new(3).unwrap(),
    ///     NonZeroUsize::new(2).unwrap(),
    /// );
    ///
    /// let genome = NNGenome::new(&config);
    ///
    /// assert_eq!(genome.node_count(), 3 + 2);
    /// assert_eq!(genome.nodes().filter(|n| n.node_type() == NodeType::Input).count(), 3);
    /// assert_eq!(genome.nodes().filter(|n| n.node_type() == NodeType::Output).count(), 2);
    /// assert_eq!(genome.gene_count(), 0);
    /// ```
    pub fn new(config: &GeneticConfig) -> NNGenome {
        Self::with_terminals(config.input_count.get(), config.output_count.get())
    }

    fn with_terminals(input_count: usize, output_count: usize) -> NNGenome {
        let mut genome = NNGenome {
            nodes: Vec::with_capacity(input_count + output_count),
            genes: vec![],
            incoming: HashMap::default(),
            input_count,
            output_count,
        };
        for _ in 0..input_count {
            genome.push_node(NodeType::Input);
        }
        for _ in 0..output_count {
            genome.push_node(NodeType::Output);
        }
        genome
    }

    fn push_node(&mut self, node_type: NodeType) -> Innovation {
        let id = self.nodes.len();
        self.nodes.push(Node::new(id, node_type));
        id
    }

    /// Appends the gene and indexes it under its target.
    /// Returns the gene's position in the gene list.
    fn push_gene(&mut self, gene: Gene) -> usize {
        let index = self.genes.len();
        self.incoming.entry(gene.output()).or_default().push(index);
        self.genes.push(gene);
        index
    }

    /// Add a new hidden node to the genome.
    /// Returns a reference to the newly created node.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::zero());
    /// let node = *genome.add_node();
    ///
    /// assert_eq!(node.id(), 2);
    /// assert_eq!(node.node_type(), NodeType::Hidden);
    /// assert_eq!(genome.node_count(), 1 + 1 + 1);
    /// ```
    pub fn add_node(&mut self) -> &Node {
        let id = self.push_node(NodeType::Hidden);
        &self.nodes[id]
    }

    /// Add a new expressed gene to the genome.
    /// Its innovation number is the number of genes
    /// already in the genome.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint doesn't exist,
    /// the target is an input node, a gene already joins
    /// both nodes (in either direction), or the gene would
    /// close a cycle of expressed genes.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::zero());
    /// let hidden = genome.add_node().id();
    ///
    /// let gene = genome.add_gene(0, hidden, 2.5).unwrap().clone();
    /// assert_eq!(gene.innovation(), 0);
    /// assert_eq!(gene.endpoints(), (0, hidden));
    /// assert_eq!(gene.weight(), 2.5);
    ///
    /// genome.add_gene(hidden, 1, -1.0).unwrap();
    ///
    /// // Duplicates, input targets and cycles are rejected.
    /// assert!(genome.add_gene(hidden, 0, 1.0).is_err());
    /// assert!(genome.add_gene(1, 0, 1.0).is_err());
    /// assert!(genome.add_gene(1, hidden, 1.0).is_err());
    /// ```
    pub fn add_gene(
        &mut self,
        input_id: Innovation,
        output_id: Innovation,
        weight: f32,
    ) -> Result<&Gene, GeneValidityError> {
        self.check_gene_viability(input_id, output_id)?;
        let id = self.genes.len();
        let index = self.push_gene(Gene::new(id, input_id, output_id, weight));
        Ok(&self.genes[index])
    }

    fn check_gene_viability(
        &self,
        input_id: Innovation,
        output_id: Innovation,
    ) -> Result<(), GeneValidityError> {
        use GeneValidityError::*;
        let output = match (self.nodes.get(input_id), self.nodes.get(output_id)) {
            (Some(_), Some(output)) => output,
            _ => return Err(NonexistantEndpoints(input_id, output_id)),
        };
        if output.node_type() == NodeType::Input {
            Err(InputTarget(output_id))
        } else if let Some(index) = self.gene_between(input_id, output_id) {
            Err(DuplicateGeneWithEndpoints(
                self.genes[index].innovation(),
                (input_id, output_id),
            ))
        } else if self.is_upstream(output_id, input_id) {
            Err(CreatesCycle(input_id, output_id))
        } else {
            Ok(())
        }
    }

    /// Disables the gene at position `index` in the gene list.
    /// Returns the gene, or `None` if there is no such gene.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::zero());
    /// genome.add_gene(0, 1, 1.0).unwrap();
    ///
    /// assert!(!genome.suppress_gene(0).unwrap().expressed());
    /// assert!(genome.suppress_gene(1).is_none());
    /// ```
    pub fn suppress_gene(&mut self, index: usize) -> Option<&Gene> {
        let gene = self.genes.get_mut(index)?;
        gene.set_expressed(false);
        Some(&*gene)
    }

    /// Induces a _weight mutation_ in the genome.
    ///
    /// A gene is chosen uniformly at random; if it is expressed,
    /// a random value from `[-weight_mutation_power, weight_mutation_power)`
    /// is added to its weight. The weight is not clamped.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the genome untouched, if the
    /// genome has no genes or the chosen gene is suppressed.
    ///
    /// # Examples
    /// ```
    /// use rand::thread_rng;
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(
    ///     NonZeroUsize::new(1).unwrap(),
    ///     NonZeroUsize::new(1).unwrap(),
    /// );
    /// let mut genome = NNGenome::new(&config);
    ///
    /// // Nothing to mutate yet.
    /// assert!(genome.mutate_weight(&mut thread_rng(), &config).is_err());
    ///
    /// genome.add_gene(0, 1, 2.0).unwrap();
    /// let gene = genome.mutate_weight(&mut thread_rng(), &config).unwrap();
    /// assert!((gene.weight() - 2.0).abs() <= config.weight_mutation_power);
    /// ```
    pub fn mutate_weight<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &GeneticConfig,
    ) -> Result<&Gene, WeightMutationError> {
        if self.genes.is_empty() {
            return Err(WeightMutationError::EmptyGenome);
        }
        let index = rng.gen_range(0..self.genes.len());
        let gene = &mut self.genes[index];
        if !gene.expressed() {
            return Err(WeightMutationError::SuppressedGene(gene.innovation()));
        }
        gene.nudge_weight(rng, config);
        Ok(&*gene)
    }

    /// Induces a _node mutation_ in the genome.
    /// If succesful, returns the triplet (_in gene_, _new node_, _out gene_)
    /// as a tuple of references.
    ///
    /// The most recently added gene is always the one split. It is
    /// suppressed, and replaced by a gene of weight 1 from its source to
    /// a new hidden node and a gene with its weight from the new node
    /// to its target. Both new genes share one innovation number: the
    /// gene count before either was added.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the genome untouched, if the genome
    /// has no genes or its most recent gene is suppressed.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::zero());
    /// genome.add_gene(0, 1, 5.0).unwrap();
    ///
    /// let (in_gene, node, out_gene) = genome.mutate_add_node().unwrap();
    /// let (in_gene, node, out_gene) = (in_gene.clone(), *node, out_gene.clone());
    ///
    /// assert_eq!(node.id(), 2);
    /// assert_eq!(node.node_type(), NodeType::Hidden);
    /// assert_eq!(in_gene.endpoints(), (0, 2));
    /// assert_eq!(in_gene.weight(), 1.0);
    /// assert_eq!(out_gene.endpoints(), (2, 1));
    /// assert_eq!(out_gene.weight(), 5.0);
    ///
    /// // The split gene is suppressed.
    /// assert!(!genome.genes().next().unwrap().expressed());
    /// ```
    pub fn mutate_add_node(&mut self) -> Result<(&Gene, &Node, &Gene), NodeMutationError> {
        let split = match self.genes.len().checked_sub(1) {
            Some(split) => split,
            None => return Err(NodeMutationError::EmptyGenome),
        };
        let split_gene = &mut self.genes[split];
        if !split_gene.expressed() {
            return Err(NodeMutationError::SuppressedGene(split_gene.innovation()));
        }
        split_gene.set_expressed(false);
        let (input_node, output_node) = split_gene.endpoints();
        let weight = split_gene.weight();

        let innovation = self.genes.len();
        let new_node = self.push_node(NodeType::Hidden);
        let input_gene = self.push_gene(Gene::new(innovation, input_node, new_node, 1.0));
        let output_gene = self.push_gene(Gene::new(innovation, new_node, output_node, weight));

        Ok((
            &self.genes[input_gene],
            &self.nodes[new_node],
            &self.genes[output_gene],
        ))
    }

    /// Induces a _connection mutation_ in the genome.
    /// If successful, returns the new or re-enabled gene.
    ///
    /// Two node positions are drawn uniformly at random. The gene
    /// between them runs from the first to the second, unless that
    /// would make it flow backwards (hidden → input, output → hidden
    /// or output → input), in which case it is reversed. A suppressed
    /// gene already joining the nodes is re-enabled and has its weight
    /// nudged; otherwise a new gene with a weight from
    /// `[-weight_bound, weight_bound)` is added.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the genome untouched, if the same node
    /// is drawn twice, both nodes are inputs or both outputs, an expressed
    /// gene already joins them, or the gene may close a cycle. The cycle
    /// check is conservative: it also rejects genes whose source has two
    /// distinct upstream paths to a hidden or output node.
    ///
    /// # Examples
    /// ```
    /// use rand::thread_rng;
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(
    ///     NonZeroUsize::new(2).unwrap(),
    ///     NonZeroUsize::new(1).unwrap(),
    /// );
    /// let mut genome = NNGenome::new(&config);
    ///
    /// let mut rng = thread_rng();
    /// while genome.mutate_add_connection(&mut rng, &config).is_err() {}
    ///
    /// // The only possible gene runs from an input to the output.
    /// let gene = genome.genes().next().unwrap();
    /// assert!(gene.input() < 2);
    /// assert_eq!(gene.output(), 2);
    /// assert!(gene.weight().abs() <= config.weight_bound);
    /// ```
    pub fn mutate_add_connection<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &GeneticConfig,
    ) -> Result<&Gene, ConnectionMutationError> {
        use ConnectionMutationError::*;
        let first = self.nodes[rng.gen_range(0..self.nodes.len())];
        let second = self.nodes[rng.gen_range(0..self.nodes.len())];

        if first.id() == second.id() {
            return Err(SameNode(first.id()));
        }
        if first.incompatible_with(&second) {
            return Err(IncompatibleEndpoints(first.node_type()));
        }

        let (input_node, output_node) = if first.precedes_reversed(&second) {
            (second.id(), first.id())
        } else {
            (first.id(), second.id())
        };
        let existing = self.gene_between(input_node, output_node);
        let weight = Gene::random_weight(rng, config);

        // An existing gene keeps its own orientation,
        // so that is the edge that must not close a cycle.
        let (checked_input, checked_output) = match existing {
            Some(index) => self.genes[index].endpoints(),
            None => (input_node, output_node),
        };
        if self.closes_cycle(checked_input, checked_output) {
            return Err(CreatesCycle(checked_input, checked_output));
        }

        match existing {
            Some(index) => {
                let gene = &mut self.genes[index];
                if gene.expressed() {
                    return Err(AlreadyExpressed(gene.innovation()));
                }
                gene.nudge_weight(rng, config);
                gene.set_expressed(true);
                Ok(&*gene)
            }
            None => {
                let id = self.genes.len();
                let index = self.push_gene(Gene::new(id, input_node, output_node, weight));
                Ok(&self.genes[index])
            }
        }
    }

    /// Returns the position of the gene joining
    /// `a` and `b` in either direction, if any.
    fn gene_between(&self, a: Innovation, b: Innovation) -> Option<usize> {
        self.genes.iter().position(|g| g.joins(a, b))
    }

    /// Breadth-first walk upstream from `source` along expressed genes,
    /// with `target` marked as already visited. Input nodes are not
    /// followed. Reaching any followed node twice counts as a cycle.
    fn closes_cycle(&self, source: Innovation, target: Innovation) -> bool {
        let mut visited: HashSet<Innovation, RandomState> = HashSet::default();
        visited.insert(target);
        let mut queue = VecDeque::from([source]);

        while let Some(node) = queue.pop_front() {
            for upstream in self.expressed_sources(node) {
                if upstream < self.input_count {
                    continue;
                }
                if !visited.insert(upstream) {
                    return true;
                }
                queue.push_back(upstream);
            }
        }
        false
    }

    /// Returns whether `ancestor` is `node` or can reach
    /// it through expressed genes.
    fn is_upstream(&self, ancestor: Innovation, node: Innovation) -> bool {
        let mut visited: HashSet<Innovation, RandomState> = HashSet::default();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.expressed_sources(current));
            }
        }
        false
    }

    fn expressed_sources(&self, node: Innovation) -> impl Iterator<Item = Innovation> + '_ {
        self.incoming_genes(node)
            .filter(|g| g.expressed())
            .map(Gene::input)
    }

    /// Returns a new genome with the same nodes and one
    /// copy of each gene, with innovation numbers, endpoints
    /// and weights preserved. Expression status is inherited
    /// as set by [`expression_inheritance`].
    ///
    /// [`expression_inheritance`]: GeneticConfig::expression_inheritance
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{ExpressionInheritance, GeneticConfig, NNGenome};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::zero());
    /// genome.add_gene(0, 1, 5.0).unwrap();
    /// genome.mutate_add_node().unwrap();
    ///
    /// let config = GeneticConfig {
    ///     expression_inheritance: ExpressionInheritance::Inverted,
    ///     ..GeneticConfig::zero()
    /// };
    /// let child = genome.replicate(&config);
    ///
    /// assert_eq!(child.node_count(), genome.node_count());
    /// for (original, copy) in genome.genes().zip(child.genes()) {
    ///     assert_eq!(original.endpoints(), copy.endpoints());
    ///     assert_eq!(original.expressed(), !copy.expressed());
    /// }
    /// ```
    pub fn replicate(&self, config: &GeneticConfig) -> NNGenome {
        let mut child = Self::with_terminals(self.input_count, self.output_count);
        for _ in 0..self.hidden_count() {
            child.push_node(NodeType::Hidden);
        }
        for gene in &self.genes {
            let mut copy = gene.clone();
            if config.expression_inheritance == ExpressionInheritance::Inverted {
                copy.set_expressed(!gene.expressed());
            }
            child.push_gene(copy);
        }
        child
    }

    /// Returns the value of every output node, in id order,
    /// for the given input values. See [`FeedForwardNetwork`].
    ///
    /// # Panics
    /// Panics if `inputs.len()` differs from the genome's input count.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::zero());
    /// assert_eq!(genome.evaluate(&[3.0]), vec![0.5]);
    ///
    /// genome.add_gene(0, 1, 1.0).unwrap();
    /// assert_eq!(genome.evaluate(&[0.0]), vec![0.5]);
    /// assert!(genome.evaluate(&[3.0])[0] > 0.5);
    /// ```
    pub fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        FeedForwardNetwork::from(self).evaluate_at(inputs)
    }

    /// Returns an iterator over the genome's genes, in creation order.
    ///
    /// # Examples
    /// ```
    /// use topoevo_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let genome = NNGenome::new(&GeneticConfig::zero());
    ///
    /// for gene in genome.genes() {
    ///     println!("gene: {}", gene);
    /// }
    /// ```
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.iter()
    }

    /// Returns an iterator over the genome's nodes, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns an iterator over the genes ending at `node`,
    /// expressed or not, in creation order.
    pub fn incoming_genes(&self, node: Innovation) -> impl Iterator<Item = &Gene> {
        self.incoming
            .get(&node)
            .into_iter()
            .flatten()
            .map(move |&index| &self.genes[index])
    }

    /// Returns the number of nodes in the genome.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of genes in the genome,
    /// expressed or not.
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Returns the number of expressed genes in the genome.
    pub fn expressed_gene_count(&self) -> usize {
        self.genes.iter().filter(|g| g.expressed()).count()
    }

    /// Returns the number of hidden nodes in the genome.
    pub fn hidden_count(&self) -> usize {
        self.nodes.len() - self.input_count - self.output_count
    }

    /// Returns the number of input nodes in the genome.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the number of output nodes in the genome.
    pub fn output_count(&self) -> usize {
        self.output_count
    }
}

impl topoevo::Genome for NNGenome {
    type Config = GeneticConfig;

    fn new(config: &GeneticConfig) -> Self {
        Self::new(config)
    }

    fn mutate_add_connection<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &GeneticConfig,
    ) -> bool {
        self.mutate_add_connection(rng, config).is_ok()
    }

    fn mutate_add_node<R: Rng + ?Sized>(&mut self, _rng: &mut R, _config: &GeneticConfig) -> bool {
        self.mutate_add_node().is_ok()
    }

    fn mutate_weight<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &GeneticConfig) -> bool {
        self.mutate_weight(rng, config).is_ok()
    }

    fn replicate(&self, config: &GeneticConfig) -> Self {
        self.replicate(config)
    }

    fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        self.evaluate(inputs)
    }

    fn input_count(&self) -> usize {
        self.input_count
    }

    fn output_count(&self) -> usize {
        self.output_count
    }

    fn node_count(&self) -> usize {
        self.node_count()
    }

    fn connection_count(&self) -> usize {
        self.gene_count()
    }
}

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NNGenome")
            .field("Genes", &self.genes.iter().map(Gene::to_string).collect::<Vec<_>>())
            .field("Nodes", &self.nodes.iter().map(Node::to_string).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::num::NonZeroUsize;

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig::new(
            NonZeroUsize::new(inputs).unwrap(),
            NonZeroUsize::new(outputs).unwrap(),
        )
    }

    /// Checks that every gene is indexed exactly once, under its target.
    fn assert_index_consistent(genome: &NNGenome) {
        let indexed: usize = genome.incoming.values().map(Vec::len).sum();
        assert_eq!(indexed, genome.genes.len());
        for (target, indices) in &genome.incoming {
            for &index in indices {
                assert_eq!(genome.genes[index].output(), *target);
            }
        }
        for (index, gene) in genome.genes.iter().enumerate() {
            assert_eq!(
                genome.incoming[&gene.output()]
                    .iter()
                    .filter(|&&i| i == index)
                    .count(),
                1
            );
        }
    }

    /// Kahn's algorithm over expressed genes.
    fn assert_acyclic(genome: &NNGenome) {
        let mut in_degree = vec![0usize; genome.node_count()];
        let mut outgoing = vec![vec![]; genome.node_count()];
        for gene in genome.genes().filter(|g| g.expressed()) {
            in_degree[gene.output()] += 1;
            outgoing[gene.input()].push(gene.output());
        }
        let mut ready: Vec<_> = (0..genome.node_count())
            .filter(|&n| in_degree[n] == 0)
            .collect();
        let mut settled = 0;
        while let Some(node) = ready.pop() {
            settled += 1;
            for &target in &outgoing[node] {
                in_degree[target] -= 1;
                if in_degree[target] == 0 {
                    ready.push(target);
                }
            }
        }
        assert_eq!(settled, genome.node_count(), "cycle in {}", genome);
    }

    #[test]
    fn new_genome_layout() {
        for input_count in 1..5 {
            for output_count in 1..5 {
                let genome = NNGenome::new(&config(input_count, output_count));
                assert_eq!(genome.node_count(), input_count + output_count);
                assert_eq!(genome.hidden_count(), 0);
                assert_eq!(genome.gene_count(), 0);
                for (i, node) in genome.nodes().enumerate() {
                    assert_eq!(node.id(), i);
                    let expected = if i < input_count {
                        NodeType::Input
                    } else {
                        NodeType::Output
                    };
                    assert_eq!(node.node_type(), expected);
                }
            }
        }
    }

    #[test]
    fn add_gene_invalid_endpoints() {
        let mut genome = NNGenome::new(&config(1, 1));
        assert_eq!(
            genome.add_gene(500, 1, 1.0).unwrap_err(),
            GeneValidityError::NonexistantEndpoints(500, 1)
        );
        assert_eq!(
            genome.add_gene(0, 500, 1.0).unwrap_err(),
            GeneValidityError::NonexistantEndpoints(0, 500)
        );
        assert_eq!(
            genome.add_gene(1, 0, 1.0).unwrap_err(),
            GeneValidityError::InputTarget(0)
        );
    }

    #[test]
    fn add_gene_duplicate_either_direction() {
        let mut genome = NNGenome::new(&config(1, 1));
        let a = genome.add_node().id();
        let b = genome.add_node().id();
        genome.add_gene(a, b, 1.0).unwrap();
        assert!(matches!(
            genome.add_gene(a, b, 1.0),
            Err(GeneValidityError::DuplicateGeneWithEndpoints(0, _))
        ));
        assert!(matches!(
            genome.add_gene(b, a, 1.0),
            Err(GeneValidityError::DuplicateGeneWithEndpoints(0, _))
        ));
    }

    #[test]
    fn add_gene_rejects_cycles_but_not_diamonds() {
        let mut genome = NNGenome::new(&config(1, 1));
        let a = genome.add_node().id();
        let b = genome.add_node().id();
        let c = genome.add_node().id();
        genome.add_gene(a, b, 1.0).unwrap();
        genome.add_gene(b, c, 1.0).unwrap();
        genome.add_gene(a, c, 1.0).unwrap();
        assert_eq!(
            genome.add_gene(c, a, 1.0).unwrap_err(),
            GeneValidityError::CreatesCycle(c, a)
        );
        assert_eq!(
            genome.add_gene(a, a, 1.0).unwrap_err(),
            GeneValidityError::CreatesCycle(a, a)
        );
        assert_acyclic(&genome);
    }

    #[test]
    fn weight_mutation_empty_genome() {
        let config = config(2, 1);
        let mut genome = NNGenome::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            genome.mutate_weight(&mut rng, &config).unwrap_err(),
            WeightMutationError::EmptyGenome
        );
    }

    #[test]
    fn weight_mutation_all_suppressed() {
        let config = config(2, 1);
        let mut genome = NNGenome::new(&config);
        genome.add_gene(0, 2, 1.0).unwrap();
        genome.add_gene(1, 2, -1.0).unwrap();
        genome.suppress_gene(0);
        genome.suppress_gene(1);
        let before = genome.clone();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(matches!(
                genome.mutate_weight(&mut rng, &config),
                Err(WeightMutationError::SuppressedGene(_))
            ));
        }
        assert_eq!(genome, before);
    }

    #[test]
    fn weight_mutation_changes_a_single_weight() {
        let config = config(3, 1);
        let mut genome = NNGenome::new(&config);
        genome.add_gene(0, 3, 1.0).unwrap();
        genome.add_gene(1, 3, 2.0).unwrap();
        genome.add_gene(2, 3, 3.0).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..100 {
            let before = genome.clone();
            genome.mutate_weight(&mut rng, &config).unwrap();
            let changed = before
                .genes()
                .zip(genome.genes())
                .filter(|(old, new)| {
                    assert_eq!(old.endpoints(), new.endpoints());
                    assert_eq!(old.innovation(), new.innovation());
                    assert_eq!(old.expressed(), new.expressed());
                    old.weight() != new.weight()
                })
                .count();
            assert!(changed <= 1);
            assert_eq!(genome.gene_count(), 3);
        }
    }

    #[test]
    fn node_mutation_empty_genome() {
        let mut genome = NNGenome::new(&config(1, 1));
        assert_eq!(
            genome.mutate_add_node().unwrap_err(),
            NodeMutationError::EmptyGenome
        );
    }

    #[test]
    fn node_mutation_splits_last_gene() {
        let mut genome = NNGenome::new(&config(1, 1));
        genome.add_gene(0, 1, 5.0).unwrap();

        genome.mutate_add_node().unwrap();

        assert_eq!(genome.node_count(), 3);
        assert_eq!(genome.nodes[2].node_type(), NodeType::Hidden);
        assert_eq!(genome.gene_count(), 3);
        assert!(!genome.genes[0].expressed());
        assert_eq!(genome.genes[1], Gene::new(1, 0, 2, 1.0));
        assert_eq!(genome.genes[2], Gene::new(1, 2, 1, 5.0));
        assert_index_consistent(&genome);

        // The most recent gene is split next, not a random one.
        genome.mutate_add_node().unwrap();
        assert!(genome.genes[1].expressed());
        assert!(!genome.genes[2].expressed());
        assert_eq!(genome.genes[3], Gene::new(3, 2, 3, 1.0));
        assert_eq!(genome.genes[4], Gene::new(3, 3, 1, 5.0));
    }

    #[test]
    fn node_mutation_on_suppressed_last_gene() {
        let mut genome = NNGenome::new(&config(2, 1));
        genome.add_gene(0, 2, 1.0).unwrap();
        genome.add_gene(1, 2, 1.0).unwrap();
        genome.suppress_gene(1);
        let before = genome.clone();

        assert_eq!(
            genome.mutate_add_node().unwrap_err(),
            NodeMutationError::SuppressedGene(1)
        );
        assert_eq!(genome, before);
    }

    #[test]
    fn connection_mutation_first_gene() {
        let config = config(2, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let mut genome = NNGenome::new(&config);
            let gene = loop {
                if let Ok(gene) = genome.mutate_add_connection(&mut rng, &config) {
                    break gene.clone();
                }
            };
            assert!(gene.input() < 2);
            assert_eq!(gene.output(), 2);
            assert!((-5.0..5.0).contains(&gene.weight()));
            assert_eq!(gene.innovation(), 0);
            assert_eq!(genome.gene_count(), 1);
            assert_index_consistent(&genome);
        }
    }

    #[test]
    fn connection_mutation_rejects_terminal_pairs() {
        // With only inputs and one output, every failure
        // is either a repeated node, an input pair, or a duplicate.
        let config = config(3, 1);
        let mut genome = NNGenome::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..200 {
            match genome.mutate_add_connection(&mut rng, &config) {
                Ok(gene) => assert_eq!(gene.output(), 3),
                Err(ConnectionMutationError::SameNode(_))
                | Err(ConnectionMutationError::IncompatibleEndpoints(NodeType::Input))
                | Err(ConnectionMutationError::AlreadyExpressed(_)) => {}
                Err(e) => panic!("unexpected failure: {}", e),
            }
        }
        assert_eq!(genome.gene_count(), 3);
    }

    #[test]
    fn connection_mutation_reenables_suppressed_gene() {
        let config = GeneticConfig {
            weight_mutation_power: 1.0,
            ..config(1, 1)
        };
        let mut genome = NNGenome::new(&config);
        genome.add_gene(0, 1, 2.0).unwrap();
        genome.suppress_gene(0);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let gene = loop {
            if let Ok(gene) = genome.mutate_add_connection(&mut rng, &config) {
                break gene.clone();
            }
        };
        assert!(gene.expressed());
        assert_eq!(gene.innovation(), 0);
        assert!((gene.weight() - 2.0).abs() <= 1.0);
        assert_eq!(genome.gene_count(), 1);
    }

    #[test]
    fn cycle_check_is_conservative() {
        // 0 -> 3 -> 4 and 0 -> 3 -> 5 -> 4: node 4 has two upstream paths
        // through node 3, so any gene out of 4 is refused.
        let mut genome = NNGenome::new(&config(1, 2));
        let a = genome.add_node().id();
        let b = genome.add_node().id();
        let c = genome.add_node().id();
        genome.add_gene(0, a, 1.0).unwrap();
        genome.add_gene(a, b, 1.0).unwrap();
        genome.add_gene(a, c, 1.0).unwrap();
        genome.add_gene(c, b, 1.0).unwrap();

        assert!(genome.closes_cycle(b, 1));
        assert!(genome.closes_cycle(b, a));
        assert!(!genome.closes_cycle(a, 1));
        assert!(!genome.closes_cycle(c, 2));
    }

    #[test]
    fn random_mutations_keep_invariants() {
        let config = config(3, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut genome = NNGenome::new(&config);
        for step in 0..1000 {
            let (nodes, genes) = (genome.node_count(), genome.gene_count());
            match step % 5 {
                0 | 1 => {
                    let _ = genome.mutate_add_connection(&mut rng, &config);
                }
                2 => {
                    if genome.mutate_add_node().is_ok() {
                        assert_eq!(genome.node_count(), nodes + 1);
                        assert_eq!(genome.gene_count(), genes + 2);
                    }
                }
                _ => {
                    let _ = genome.mutate_weight(&mut rng, &config);
                    assert_eq!(genome.gene_count(), genes);
                }
            }
            assert_index_consistent(&genome);
            assert_acyclic(&genome);
            let outputs = genome.evaluate(&[0.3, -1.2, 2.0]);
            assert_eq!(outputs.len(), 2);
            assert!(outputs.iter().all(|&v| v > 0.0 && v < 1.0));
        }
        assert!(genome.hidden_count() > 0);
    }

    #[test]
    fn replicate_inverts_expression() {
        let config = config(2, 1);
        let mut genome = NNGenome::new(&config);
        genome.add_gene(0, 2, 5.0).unwrap();
        genome.mutate_add_node().unwrap();

        let child = genome.replicate(&config);
        assert_eq!(child.node_count(), genome.node_count());
        assert_eq!(child.hidden_count(), 1);
        assert_eq!(child.gene_count(), genome.gene_count());
        for (original, copy) in genome.genes().zip(child.genes()) {
            assert_eq!(original.innovation(), copy.innovation());
            assert_eq!(original.endpoints(), copy.endpoints());
            assert_eq!(original.weight(), copy.weight());
            assert_eq!(original.expressed(), !copy.expressed());
        }
        assert_index_consistent(&child);

        // Replicating twice restores the original expression pattern.
        assert_eq!(child.replicate(&config), genome);
    }

    #[test]
    fn replicate_preserving_expression() {
        let config = GeneticConfig {
            expression_inheritance: ExpressionInheritance::Preserved,
            ..config(2, 1)
        };
        let mut genome = NNGenome::new(&config);
        genome.add_gene(0, 2, 5.0).unwrap();
        genome.mutate_add_node().unwrap();
        assert_eq!(genome.replicate(&config), genome);
    }

    /// Whether `genome` starts with the genes of `parent`.
    fn descends_from(genome: &NNGenome, parent: &NNGenome) -> bool {
        genome.gene_count() >= parent.gene_count()
            && parent
                .genes()
                .zip(genome.genes())
                .all(|(a, b)| a.innovation() == b.innovation() && a.endpoints() == b.endpoints())
    }

    #[test]
    fn population_evolution_keeps_invariants() {
        use topoevo::{ExhaustionPolicy, Population, PopulationConfig, RetryPolicy};

        let population_config = PopulationConfig {
            retry_policy: RetryPolicy::Bounded {
                max_attempts: NonZeroUsize::new(100).unwrap(),
                on_exhausted: ExhaustionPolicy::Skip,
            },
            ..PopulationConfig::new(NonZeroUsize::new(30).unwrap())
        };
        let mut population: Population<GeneticConfig, NNGenome> =
            Population::new(population_config, config(2, 1));
        let mut rng = ChaCha8Rng::seed_from_u64(29);
        let inputs = [0.6, -1.4];

        for generation in 0..200 {
            let ranking = population.rank_by(|g: &NNGenome| g.evaluate(&inputs)[0]);
            let survivors = &ranking[..6];
            let parents: Vec<NNGenome> = survivors
                .iter()
                .map(|&i| population.genomes()[i].clone())
                .collect();
            population.evolve(survivors, &mut rng).unwrap();

            assert_eq!(population.generation(), generation + 1);
            assert_eq!(population.size(), 30);
            assert_eq!(population.genomes().len(), 30);
            assert_eq!(population.last_report().map(|r| r.survivors), Some(6));
            for (parent, survivor) in parents.iter().zip(population.genomes()) {
                assert!(descends_from(survivor, parent));
            }
            for genome in &population.genomes()[6..] {
                assert!(parents.iter().any(|parent| descends_from(genome, parent)));
            }
            for (index, genome) in population.genomes().iter().enumerate() {
                assert_index_consistent(genome);
                let outputs = population.evaluate(index, &inputs).unwrap();
                assert_eq!(outputs.len(), 1);
                assert!(outputs[0] > 0.0 && outputs[0] < 1.0);
            }
        }
        assert!(population.genomes().iter().any(|g| g.hidden_count() > 0));
    }

    #[test]
    fn display() {
        let mut genome = NNGenome::new(&GeneticConfig::zero());
        genome.add_gene(0, 1, 1.0).unwrap();
        genome.suppress_gene(0);
        let shown = genome.to_string();
        assert!(shown.contains("(0[0->1, 1.000])"));
        assert!(shown.contains("1[Output]"));
    }
}
