//! Module to calculate the atomic composition and molar mass of a species formula.
//!
//! Charged species are supported: the charge is stored as the electron pseudo-element `e-`
//! with count equal to minus the charge, so that charge conservation becomes an ordinary
//! element balance (`N + O => NO+ + e-` balances `e-` as `-1 + 1 = 0`).
use log::debug;
use nalgebra::DMatrix;
use std::collections::HashMap;
use thiserror::Error;

/// name of the electron pseudo-element and of the free electron species
pub const ELECTRON: &str = "e-";
/// molar mass of the electron, g/mol
const ELECTRON_MASS: f64 = 5.4857990946e-4;

/// element symbol and atomic mass, g/mol
const ELEMENTS: &[(&str, f64)] = &[
    ("H", 1.008),
    ("He", 4.0026),
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.18),
    ("Na", 22.99),
    ("Mg", 24.305),
    ("Al", 26.98),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.065),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.102),
    ("Ca", 40.08),
    ("Ti", 47.867),
    ("Cr", 51.9961),
    ("Fe", 55.845),
    ("Ni", 58.6934),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Kr", 83.798),
    ("Xe", 131.293),
];

#[derive(Debug, Error, PartialEq)]
pub enum CompositionError {
    #[error("empty species formula")]
    EmptyFormula,
    #[error("unknown element '{element}' in formula '{formula}'")]
    UnknownElement { formula: String, element: String },
    #[error("unexpected character '{character}' in formula '{formula}'")]
    UnexpectedCharacter { formula: String, character: char },
    #[error("unbalanced brackets in formula '{0}'")]
    UnbalancedBrackets(String),
    #[error("species '{0}' is listed more than once")]
    DuplicateSpecies(String),
}

fn atomic_mass(element: &str) -> Option<f64> {
    if element == ELECTRON {
        return Some(ELECTRON_MASS);
    }
    ELEMENTS
        .iter()
        .find(|(name, _)| *name == element)
        .map(|(_, mass)| *mass)
}

// phase marks like "(g)" or "(s)" are not part of the composition
fn filter_phases_marks(formula: &str) -> String {
    let mut formula = formula.to_string();
    for phase in ["(C)", "(c)", "(L)", "(l)", "(G)", "(g)", "(S)", "(s)"] {
        formula = formula.replace(phase, "");
    }
    formula
}

fn read_count(chars: &[char], pos: &mut usize) -> i32 {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if start == *pos {
        1
    } else {
        chars[start..*pos]
            .iter()
            .collect::<String>()
            .parse()
            .unwrap_or(1)
    }
}

fn merge(into: &mut Vec<(String, i32)>, element: &str, count: i32) {
    match into.iter_mut().find(|(name, _)| name == element) {
        Some((_, n)) => *n += count,
        None => into.push((element.to_string(), count)),
    }
}

// parses until the end of input or a closing bracket, which is left for the caller
fn parse_group(
    formula: &str,
    chars: &[char],
    pos: &mut usize,
) -> Result<Vec<(String, i32)>, CompositionError> {
    let mut counts = Vec::new();
    while *pos < chars.len() {
        let c = chars[*pos];
        if c == '(' {
            *pos += 1;
            let inner = parse_group(formula, chars, pos)?;
            if *pos >= chars.len() || chars[*pos] != ')' {
                return Err(CompositionError::UnbalancedBrackets(formula.to_string()));
            }
            *pos += 1;
            let multiplier = read_count(chars, pos);
            for (element, count) in inner {
                merge(&mut counts, &element, count * multiplier);
            }
        } else if c == ')' {
            return Ok(counts);
        } else if c.is_ascii_uppercase() {
            let start = *pos;
            *pos += 1;
            if *pos < chars.len() && chars[*pos].is_ascii_lowercase() {
                *pos += 1;
            }
            let element: String = chars[start..*pos].iter().collect();
            if atomic_mass(&element).is_none() {
                return Err(CompositionError::UnknownElement {
                    formula: formula.to_string(),
                    element,
                });
            }
            let count = read_count(chars, pos);
            merge(&mut counts, &element, count);
        } else {
            return Err(CompositionError::UnexpectedCharacter {
                formula: formula.to_string(),
                character: c,
            });
        }
    }
    Ok(counts)
}

/// Parses a species formula into (element, count) pairs in order of first appearance.
/// A trailing run of `+` or `-` is the ionic charge and is stored as the `e-` pseudo-element.
pub fn parse_formula(formula: &str) -> Result<Vec<(String, i32)>, CompositionError> {
    let cleaned: String = filter_phases_marks(formula)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(CompositionError::EmptyFormula);
    }
    if cleaned == ELECTRON || cleaned == "E-" {
        return Ok(vec![(ELECTRON.to_string(), 1)]);
    }
    let body = cleaned.trim_end_matches(['+', '-']);
    let charge: i32 = cleaned[body.len()..]
        .chars()
        .map(|c| if c == '+' { 1 } else { -1 })
        .sum();
    if body.is_empty() {
        return Err(CompositionError::EmptyFormula);
    }
    let chars: Vec<char> = body.chars().collect();
    let mut pos = 0;
    let mut counts = parse_group(formula, &chars, &mut pos)?;
    if pos != chars.len() {
        return Err(CompositionError::UnbalancedBrackets(formula.to_string()));
    }
    if charge != 0 {
        merge(&mut counts, ELECTRON, -charge);
    }
    debug!("formula {} parsed into {:?}", formula, counts);
    Ok(counts)
}

/// molar mass of a species formula, kg/mol
pub fn calculate_molar_mass(formula: &str) -> Result<f64, CompositionError> {
    let counts = parse_formula(formula)?;
    let grams: f64 = counts
        .iter()
        .map(|(element, count)| atomic_mass(element).unwrap_or(0.0) * *count as f64)
        .sum();
    Ok(grams * 1e-3)
}

/// Builds the species x element matrix of atom counts for a list of formulae.
/// Elements are ordered by first appearance; the electron, if present, comes last.
pub fn create_elem_composition_matrix(
    vec_of_formulae: &[&str],
) -> Result<(DMatrix<f64>, Vec<String>), CompositionError> {
    let compositions = vec_of_formulae
        .iter()
        .map(|formula| parse_formula(formula))
        .collect::<Result<Vec<_>, _>>()?;
    let mut elements: Vec<String> = Vec::new();
    for composition in compositions.iter() {
        for (element, _) in composition {
            if element != ELECTRON && !elements.contains(element) {
                elements.push(element.clone());
            }
        }
    }
    if compositions
        .iter()
        .any(|composition| composition.iter().any(|(e, _)| e == ELECTRON))
    {
        elements.push(ELECTRON.to_string());
    }
    let index: HashMap<&str, usize> = elements
        .iter()
        .enumerate()
        .map(|(j, e)| (e.as_str(), j))
        .collect();
    let mut matrix = DMatrix::zeros(vec_of_formulae.len(), elements.len());
    for (i, composition) in compositions.iter().enumerate() {
        for (element, count) in composition {
            matrix[(i, index[element.as_str()])] += *count as f64;
        }
    }
    Ok((matrix, elements))
}
