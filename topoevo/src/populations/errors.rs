use super::MutationKind;

use std::error::Error;
use std::fmt;

/// Reasons a genome of the population could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationError {
    /// There is no genome at the requested position.
    GenomeIndexOutOfRange { index: usize, size: usize },
    /// The number of inputs doesn't match the genome's.
    InputLengthMismatch { expected: usize, found: usize },
}

/// Reasons a population could not be evolved.
///
/// All variants but `MutationExhausted` are raised
/// before the population is modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvolutionError {
    /// No survivors were selected.
    NoSurvivors,
    /// More survivors than the population size were selected.
    TooManySurvivors { count: usize, size: usize },
    /// A survivor index doesn't designate a genome.
    SurvivorOutOfRange { index: usize, size: usize },
    /// A genome was selected as survivor more than once.
    DuplicateSurvivor(usize),
    /// A mutation failed every permitted attempt under
    /// [`ExhaustionPolicy::Abort`]. The new generation is
    /// installed, with this and later genomes unmutated.
    ///
    /// [`ExhaustionPolicy::Abort`]: crate::ExhaustionPolicy::Abort
    MutationExhausted {
        genome: usize,
        kind: MutationKind,
        attempts: usize,
    },
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenomeIndexOutOfRange { index, size } => write!(
                f,
                "genome index {} out of range for population of size {}",
                index, size
            ),
            Self::InputLengthMismatch { expected, found } => write!(
                f,
                "evaluation with {} inputs on genome with {} inputs",
                found, expected
            ),
        }
    }
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSurvivors => write!(f, "attempted evolution without survivors"),
            Self::TooManySurvivors { count, size } => write!(
                f,
                "{} survivors selected for population of size {}",
                count, size
            ),
            Self::SurvivorOutOfRange { index, size } => write!(
                f,
                "survivor index {} out of range for population of size {}",
                index, size
            ),
            Self::DuplicateSurvivor(index) => {
                write!(f, "genome {} selected as survivor more than once", index)
            }
            Self::MutationExhausted {
                genome,
                kind,
                attempts,
            } => write!(
                f,
                "{} mutation of genome {} failed {} times",
                kind, genome, attempts
            ),
        }
    }
}

impl Error for EvaluationError {}
impl Error for EvolutionError {}
