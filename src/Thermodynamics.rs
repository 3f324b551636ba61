/// the interface through which the kinetics engine reads the mixture
pub mod thermo_state;
/// ideal-gas mixture with NASA 7-coefficient polynomials
#[allow(non_snake_case)]
pub mod NASAmixture;
/// element composition and molar mass from a species formula
pub mod molmass;
