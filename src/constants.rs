//! Physical constants shared by the kinetics and thermodynamics modules (SI units)

/// Universal gas constant, J/(mol K)
pub const RU: f64 = 8.314471468617452;
/// Standard-state (reference) pressure, Pa
pub const ONEATM: f64 = 101325.0;
/// Boltzmann constant, J/K
pub const KB: f64 = 1.3806503e-23;
/// Elementary charge, C
pub const QE: f64 = 1.602176487e-19;
/// Avogadro number, 1/mol
pub const NA: f64 = 6.0221415e23;
/// Thermochemical calorie, J
pub const CAL_TO_J: f64 = 4.184;
