//! # Thermodynamic state interface
//!
//! The kinetics engine never computes thermodynamic properties itself. Everything it needs
//! about the mixture (species list, molecular weights, elemental composition and the
//! dimensionless Gibbs energies that enter the equilibrium constants) comes through the
//! [`ThermoState`] trait. Any mixture model can drive the engine by implementing it;
//! [`crate::Thermodynamics::NASAmixture::NasaMixture`] is the implementation shipped with
//! the crate.
use nalgebra::DMatrix;

/// Temperatures of the internal energy modes of a (possibly) thermal-nonequilibrium gas.
///
/// Single-temperature models read only `t`; multi-temperature models may use the others.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    /// translational (heavy particle) temperature, K
    pub t: f64,
    /// rotational temperature, K
    pub tr: f64,
    /// vibrational temperature, K
    pub tv: f64,
    /// electronic excitation temperature, K
    pub tel: f64,
    /// free electron temperature, K
    pub te: f64,
}

impl Temperatures {
    /// all modes in equilibrium at `T`
    #[allow(non_snake_case)]
    pub fn equilibrium(T: f64) -> Self {
        Self {
            t: T,
            tr: T,
            tv: T,
            tel: T,
            te: T,
        }
    }

    /// every mode, in the order t, tr, tv, tel, te
    pub fn modes(&self) -> [f64; 5] {
        [self.t, self.tr, self.tv, self.tel, self.te]
    }

    /// true when no mode differs from `other` by `tolerance` or more
    pub fn is_close(&self, other: &Temperatures, tolerance: f64) -> bool {
        self.modes()
            .iter()
            .zip(other.modes().iter())
            .all(|(a, b)| (a - b).abs() < tolerance)
    }
}


/// Read-only view of the thermodynamic mixture consumed by the kinetics engine.
pub trait ThermoState {
    /// number of species in the mixture
    fn n_species(&self) -> usize;
    /// dense index of a species, `None` if the mixture has no such species
    fn species_index(&self, name: &str) -> Option<usize>;
    /// name of the species with index `i`
    fn species_name(&self, i: usize) -> &str;
    /// molecular weight of species `i`, kg/mol
    fn species_mw(&self, i: usize) -> f64;
    /// number of elements (the electron counts as an element when charged species exist)
    fn n_elements(&self) -> usize;
    /// name of element `i`
    fn element_name(&self, i: usize) -> &str;
    /// species x element matrix of atom counts
    fn element_matrix(&self) -> &DMatrix<f64>;
    /// dimensionless standard-state Gibbs energy g/(R T) of every species
    fn species_g_over_rt(&self, temperatures: &Temperatures, g: &mut [f64]);
}
