//! # HyperKin
//! Gas-phase chemical kinetics for hypersonic and plasma flow solvers: sparse stoichiometric
//! bookkeeping, cached Arrhenius rate evaluation, equilibrium constants from the mixture
//! Gibbs energies, net production rates and their analytic Jacobian.
//!
//! The engine lives in [`Kinetics`]; the thermodynamic mixture it reads from is any
//! implementation of [`Thermodynamics::thermo_state::ThermoState`]. Mechanisms and NASA-7
//! species data are read from JSON with [`Utils::load_from_file`].
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod constants;
