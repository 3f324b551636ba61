//! # Ideal-gas mixture with NASA 7-coefficient polynomials
//!
//! The reference implementation of [`ThermoState`]. Each species carries two sets of NASA-7
//! coefficients (low and high temperature range); molecular weights and the element matrix
//! are derived from the species names, which are read as chemical formulae.
//!
//! ```text
//! Cp/R   = a1 + a2 T + a3 T^2 + a4 T^3 + a5 T^4
//! H/RT   = a1 + a2 T/2 + a3 T^2/3 + a4 T^3/4 + a5 T^4/5 + a6/T
//! S/R    = a1 ln T + a2 T + a3 T^2/2 + a4 T^3/3 + a5 T^4/4 + a7
//! G/RT   = H/RT - S/R
//! ```
//! Heavy species are evaluated at the translational temperature and the free electron at the
//! electron temperature. Temperatures outside the data range are clamped to it.
use super::molmass::{CompositionError, ELECTRON, calculate_molar_mass, create_elem_composition_matrix};
use super::thermo_state::{Temperatures, ThermoState};
use log::{error, info};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// NASA-7 record of one species as it appears in the species data file
#[allow(non_snake_case)]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NasaSpecies {
    pub name: String,
    /// chemical formula when it differs from the name (e.g. name "N2(X)" formula "N2")
    #[serde(default)]
    pub formula: Option<String>,
    /// [T_low, T_mid, T_high]
    pub T: [f64; 3],
    pub low: [f64; 7],
    pub high: [f64; 7],
}

impl NasaSpecies {
    #[allow(non_snake_case)]
    fn coeffs(&self, T: f64) -> (&[f64; 7], f64) {
        let T = T.clamp(self.T[0], self.T[2]);
        if T < self.T[1] {
            (&self.low, T)
        } else {
            (&self.high, T)
        }
    }

    #[allow(non_snake_case)]
    pub fn h_over_rt(&self, T: f64) -> f64 {
        let (a, T) = self.coeffs(T);
        a[0] + a[1] * T / 2.0
            + a[2] * T.powi(2) / 3.0
            + a[3] * T.powi(3) / 4.0
            + a[4] * T.powi(4) / 5.0
            + a[5] / T
    }

    #[allow(non_snake_case)]
    pub fn s_over_r(&self, T: f64) -> f64 {
        let (a, T) = self.coeffs(T);
        a[0] * T.ln()
            + a[1] * T
            + a[2] * T.powi(2) / 2.0
            + a[3] * T.powi(3) / 3.0
            + a[4] * T.powi(4) / 4.0
            + a[6]
    }

    #[allow(non_snake_case)]
    pub fn g_over_rt(&self, T: f64) -> f64 {
        self.h_over_rt(T) - self.s_over_r(T)
    }
}

/// species data file layout: `{"species": [...]}`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NasaSpeciesList {
    pub species: Vec<NasaSpecies>,
}

pub struct NasaMixture {
    species: Vec<NasaSpecies>,
    index: HashMap<String, usize>,
    mw: Vec<f64>,
    elements: Vec<String>,
    element_matrix: DMatrix<f64>,
    electron: Option<usize>,
}

impl NasaMixture {
    /// Fails on unparsable formulae and on species names given more than once.
    pub fn new(species: Vec<NasaSpecies>) -> Result<Self, CompositionError> {
        let mut index = HashMap::new();
        for (i, s) in species.iter().enumerate() {
            if index.insert(s.name.clone(), i).is_some() {
                error!("species {} is listed twice", s.name);
                return Err(CompositionError::DuplicateSpecies(s.name.clone()));
            }
        }
        let formulae: Vec<&str> = species
            .iter()
            .map(|s| s.formula.as_deref().unwrap_or(&s.name))
            .collect();
        let mw = formulae
            .iter()
            .map(|f| calculate_molar_mass(f))
            .collect::<Result<Vec<_>, _>>()?;
        let (element_matrix, elements) = create_elem_composition_matrix(&formulae)?;
        let electron = species.iter().position(|s| s.name == ELECTRON);
        info!(
            "mixture with {} species and {} elements created",
            species.len(),
            elements.len()
        );
        Ok(Self {
            species,
            index,
            mw,
            elements,
            element_matrix,
            electron,
        })
    }

    pub fn species(&self) -> &[NasaSpecies] {
        &self.species
    }
}

impl ThermoState for NasaMixture {
    fn n_species(&self) -> usize {
        self.species.len()
    }

    fn species_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn species_name(&self, i: usize) -> &str {
        &self.species[i].name
    }

    fn species_mw(&self, i: usize) -> f64 {
        self.mw[i]
    }

    fn n_elements(&self) -> usize {
        self.elements.len()
    }

    fn element_name(&self, i: usize) -> &str {
        &self.elements[i]
    }

    fn element_matrix(&self) -> &DMatrix<f64> {
        &self.element_matrix
    }

    fn species_g_over_rt(&self, temperatures: &Temperatures, g: &mut [f64]) {
        assert_eq!(g.len(), self.species.len());
        for (gi, s) in g.iter_mut().zip(self.species.iter()) {
            *gi = s.g_over_rt(temperatures.t);
        }
        if let Some(e) = self.electron {
            g[e] = self.species[e].g_over_rt(temperatures.te);
        }
    }
}
