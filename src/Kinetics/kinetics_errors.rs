//! Errors of the kinetics engine and the mechanism validation report.
use std::fmt;
use thiserror::Error;

/// One defect found while validating a mechanism. Reaction indices are 0-based;
/// the `Display` output numbers reactions from 1.
#[derive(Debug, Clone, PartialEq)]
pub enum MechanismProblem {
    UnknownSpecies {
        reaction: usize,
        formula: String,
        species: String,
        /// the species was named in the third-body efficiencies
        thirdbody: bool,
    },
    Duplicate {
        reaction: usize,
        formula: String,
        duplicate_of: usize,
        other_formula: String,
    },
    NotConserved {
        reaction: usize,
        formula: String,
        element: String,
        imbalance: f64,
    },
}

impl MechanismProblem {
    /// index of the reaction the problem was found in
    pub fn reaction(&self) -> usize {
        match self {
            MechanismProblem::UnknownSpecies { reaction, .. }
            | MechanismProblem::Duplicate { reaction, .. }
            | MechanismProblem::NotConserved { reaction, .. } => *reaction,
        }
    }
}

impl fmt::Display for MechanismProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MechanismProblem::UnknownSpecies {
                reaction,
                formula,
                species,
                thirdbody,
            } => write!(
                f,
                "reaction {} \"{}\": {}species \"{}\" does not exist in the mixture",
                reaction + 1,
                formula,
                if *thirdbody { "third-body " } else { "" },
                species
            ),
            MechanismProblem::Duplicate {
                reaction,
                formula,
                duplicate_of,
                other_formula,
            } => write!(
                f,
                "reactions {} \"{}\" and {} \"{}\" are identical",
                duplicate_of + 1,
                other_formula,
                reaction + 1,
                formula
            ),
            MechanismProblem::NotConserved {
                reaction,
                formula,
                element,
                imbalance,
            } => write!(
                f,
                "reaction {} \"{}\" does not conserve element {} (imbalance {})",
                reaction + 1,
                formula,
                element,
                imbalance
            ),
        }
    }
}

/// All problems found by one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub problems: Vec<MechanismProblem>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for problem in self.problems.iter() {
            writeln!(f, "  {}", problem)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MechanismError {
    #[error("mechanism validation failed with {n} problem(s):\n{0}", n = .0.len())]
    Invalid(ValidationReport),
}

impl MechanismError {
    pub fn report(&self) -> &ValidationReport {
        match self {
            MechanismError::Invalid(report) => report,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum KineticsError {
    #[error("reactions are not closed yet")]
    NotClosed,
    #[error("reactions are already closed")]
    AlreadyClosed,
    #[error("invalid thermodynamic state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Mechanism(#[from] MechanismError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_one_based() {
        let report = ValidationReport {
            problems: vec![
                MechanismProblem::Duplicate {
                    reaction: 3,
                    formula: "B => A".to_string(),
                    duplicate_of: 0,
                    other_formula: "B = A".to_string(),
                },
                MechanismProblem::UnknownSpecies {
                    reaction: 1,
                    formula: "X + M = 2Y + M".to_string(),
                    species: "Z".to_string(),
                    thirdbody: true,
                },
            ],
        };
        let message = MechanismError::Invalid(report).to_string();
        assert!(message.contains("2 problem(s)"));
        assert!(message.contains("reactions 1 \"B = A\" and 4 \"B => A\" are identical"));
        assert!(message.contains("reaction 2 \"X + M = 2Y + M\": third-body species \"Z\""));
    }
}
