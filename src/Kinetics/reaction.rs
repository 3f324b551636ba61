//! # Reaction records
//!
//! A [`Reaction`] is the immutable description of one elementary reaction: the species on
//! both sides (as names, repeated according to their coefficients), reversibility, the third
//! body with its collision efficiencies, and the rate law. It is built from a formula string
//!
//! ```text
//! "N2 + M = 2N + M"        reversible, third body
//! "N + O => NO+ + e-"      irreversible, ions
//! "2O+M<=>O2+M"
//! ```
//! `=` and `<=>` mark reversible reactions, `=>` and `->` irreversible ones. A `+` is read as
//! an ionic charge when it is followed by another `+` or ends the side, otherwise it
//! separates two species.
use crate::Kinetics::rate_laws::RateLaw;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// name of the third-body pseudo-species in formulae
pub const THIRD_BODY: &str = "M";

static ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<=>|=>|->|=").expect("valid arrow pattern"));
static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)?\s*(\S+)$").expect("valid term pattern"));

#[derive(Debug, Error, PartialEq)]
pub enum FormulaError {
    #[error("no reaction arrow in '{0}'")]
    MissingArrow(String),
    #[error("more than one reaction arrow in '{0}'")]
    MultipleArrows(String),
    #[error("empty side in '{0}'")]
    EmptySide(String),
    #[error("empty species name in '{0}'")]
    EmptySpecies(String),
    #[error("cannot read term '{term}' in '{formula}'")]
    BadTerm { formula: String, term: String },
    #[error("third body must appear once on each side in '{0}'")]
    UnbalancedThirdBody(String),
}

/// Species content of a reaction formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionEquation {
    /// reactant names, repeated by coefficient (`2N` gives `["N", "N"]`)
    pub reactants: Vec<String>,
    pub products: Vec<String>,
    pub reversible: bool,
    pub thirdbody: bool,
}

// splits one side on '+' separators, leaving charge signs attached to the names
fn split_side(side: &str) -> Vec<String> {
    let chars: Vec<char> = side.chars().collect();
    let mut terms = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c != '+' {
            current.push(c);
            continue;
        }
        let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
        let is_charge = !current.trim().is_empty() && matches!(next, None | Some('+'));
        if is_charge {
            current.push(c);
        } else {
            terms.push(current.trim().to_string());
            current.clear();
        }
    }
    terms.push(current.trim().to_string());
    terms
}

fn parse_side(formula: &str, side: &str) -> Result<(Vec<String>, usize), FormulaError> {
    if side.trim().is_empty() {
        return Err(FormulaError::EmptySide(formula.to_string()));
    }
    let mut species = Vec::new();
    let mut third_bodies = 0;
    for term in split_side(side) {
        if term.is_empty() {
            return Err(FormulaError::EmptySpecies(formula.to_string()));
        }
        let bad_term = || FormulaError::BadTerm {
            formula: formula.to_string(),
            term: term.clone(),
        };
        let caps = TERM.captures(&term).ok_or_else(bad_term)?;
        let nu: usize = match caps.get(1) {
            Some(m) => m.as_str().parse().map_err(|_| bad_term())?,
            None => 1,
        };
        if nu == 0 {
            return Err(bad_term());
        }
        let name = &caps[2];
        if name == THIRD_BODY {
            third_bodies += nu;
        } else {
            species.extend(std::iter::repeat_n(name.to_string(), nu));
        }
    }
    Ok((species, third_bodies))
}

impl ReactionEquation {
    pub fn parse(formula: &str) -> Result<Self, FormulaError> {
        let arrows: Vec<_> = ARROW.find_iter(formula).collect();
        let arrow = match arrows.as_slice() {
            [] => return Err(FormulaError::MissingArrow(formula.to_string())),
            [arrow] => *arrow,
            _ => return Err(FormulaError::MultipleArrows(formula.to_string())),
        };
        let reversible = matches!(arrow.as_str(), "=" | "<=>");
        let (reactants, m_left) = parse_side(formula, &formula[..arrow.start()])?;
        let (products, m_right) = parse_side(formula, &formula[arrow.end()..])?;
        let thirdbody = match (m_left, m_right) {
            (0, 0) => false,
            (1, 1) => true,
            _ => return Err(FormulaError::UnbalancedThirdBody(formula.to_string())),
        };
        if reactants.is_empty() || products.is_empty() {
            return Err(FormulaError::EmptySide(formula.to_string()));
        }
        Ok(Self {
            reactants,
            products,
            reversible,
            thirdbody,
        })
    }

    /// number of reactant molecules, plus one for a third body
    pub fn order(&self) -> usize {
        self.reactants.len() + usize::from(self.thirdbody)
    }
}

/// One elementary reaction of a mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    formula: String,
    equation: ReactionEquation,
    /// collision efficiencies of the third body; unlisted species have efficiency 1
    efficiencies: Vec<(String, f64)>,
    rate_law: RateLaw,
}

impl Reaction {
    pub fn new(formula: &str, rate_law: impl Into<RateLaw>) -> Result<Self, FormulaError> {
        let equation = ReactionEquation::parse(formula)?;
        Ok(Self::from_equation(formula, equation, rate_law))
    }

    /// for callers that needed the parsed equation to build the rate law (reaction order)
    pub fn from_equation(
        formula: &str,
        equation: ReactionEquation,
        rate_law: impl Into<RateLaw>,
    ) -> Self {
        Self {
            formula: formula.trim().to_string(),
            equation,
            efficiencies: Vec::new(),
            rate_law: rate_law.into(),
        }
    }

    /// Attaches third-body efficiencies. A species listed twice keeps the last value.
    pub fn with_efficiencies<S: Into<String>>(
        mut self,
        efficiencies: impl IntoIterator<Item = (S, f64)>,
    ) -> Self {
        for (name, eff) in efficiencies {
            let name = name.into();
            match self.efficiencies.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = eff,
                None => self.efficiencies.push((name, eff)),
            }
        }
        if !self.equation.thirdbody && !self.efficiencies.is_empty() {
            warn!(
                "reaction {} has no third body, its efficiencies are ignored",
                self.formula
            );
        }
        self
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn equation(&self) -> &ReactionEquation {
        &self.equation
    }

    pub fn reactants(&self) -> &[String] {
        &self.equation.reactants
    }

    pub fn products(&self) -> &[String] {
        &self.equation.products
    }

    pub fn is_reversible(&self) -> bool {
        self.equation.reversible
    }

    pub fn is_thirdbody(&self) -> bool {
        self.equation.thirdbody
    }

    pub fn efficiencies(&self) -> &[(String, f64)] {
        &self.efficiencies
    }

    pub fn rate_law(&self) -> &RateLaw {
        &self.rate_law
    }

    /// stoichiometric coefficient of `name` among the reactants
    pub fn reactant(&self, name: &str) -> usize {
        self.equation.reactants.iter().filter(|s| *s == name).count()
    }

    /// stoichiometric coefficient of `name` among the products
    pub fn product(&self, name: &str) -> usize {
        self.equation.products.iter().filter(|s| *s == name).count()
    }

    pub fn order(&self) -> usize {
        self.equation.order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::rate_laws::Arrhenius;

    fn law() -> Arrhenius {
        Arrhenius::new(1.0, 0.0, 0.0).unwrap()
    }

    #[test]
    fn test_thirdbody_dissociation() {
        let r = Reaction::new("N2 + M = 2N + M", law()).unwrap();
        assert_eq!(r.reactants(), &["N2"]);
        assert_eq!(r.products(), &["N", "N"]);
        assert!(r.is_reversible());
        assert!(r.is_thirdbody());
        assert_eq!(r.product("N"), 2);
        assert_eq!(r.reactant("N"), 0);
        assert_eq!(r.order(), 2);
    }

    #[test]
    fn test_ions_and_arrows() {
        let r = Reaction::new("N + O => NO+ + e-", law()).unwrap();
        assert_eq!(r.reactants(), &["N", "O"]);
        assert_eq!(r.products(), &["NO+", "e-"]);
        assert!(!r.is_reversible());
        assert!(!r.is_thirdbody());

        let r = Reaction::new("2O+M<=>O2+M", law()).unwrap();
        assert_eq!(r.reactants(), &["O", "O"]);
        assert_eq!(r.products(), &["O2"]);
        assert!(r.is_reversible() && r.is_thirdbody());

        let r = Reaction::new("N++ + e- -> N+", law()).unwrap();
        assert_eq!(r.reactants(), &["N++", "e-"]);
        assert_eq!(r.products(), &["N+"]);
        assert!(!r.is_reversible());

        let r = Reaction::new("O2++O = O2 + O+", law()).unwrap();
        assert_eq!(r.reactants(), &["O2+", "O"]);
    }

    #[test]
    fn test_bad_formulae() {
        assert_eq!(
            ReactionEquation::parse("N2 + O2"),
            Err(FormulaError::MissingArrow("N2 + O2".to_string()))
        );
        assert!(matches!(
            ReactionEquation::parse("A = B = C"),
            Err(FormulaError::MultipleArrows(_))
        ));
        assert!(matches!(
            ReactionEquation::parse(" => B"),
            Err(FormulaError::EmptySide(_))
        ));
        assert!(matches!(
            ReactionEquation::parse("A + M => B"),
            Err(FormulaError::UnbalancedThirdBody(_))
        ));
        assert!(matches!(
            ReactionEquation::parse("+ A => C"),
            Err(FormulaError::EmptySpecies(_))
        ));
        assert!(matches!(
            ReactionEquation::parse("0A => B"),
            Err(FormulaError::BadTerm { .. })
        ));
        assert!(matches!(
            ReactionEquation::parse("M = M"),
            Err(FormulaError::EmptySide(_))
        ));
    }

    #[test]
    fn test_efficiencies() {
        let r = Reaction::new("O2 + M = 2O + M", law())
            .unwrap()
            .with_efficiencies([("O", 5.0), ("N", 4.0), ("O", 4.5)]);
        assert_eq!(
            r.efficiencies(),
            &[("O".to_string(), 4.5), ("N".to_string(), 4.0)]
        );
    }
}
