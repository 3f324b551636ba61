/// the kinetics engine: mechanism assembly, validation and evaluation of rates, production
/// rates and the Jacobian
/// # Examples
/// ```
/// use HyperKin::Kinetics::kinetics_engine::Kinetics;
/// use HyperKin::Kinetics::kinetics_errors::KineticsError;
/// use HyperKin::Kinetics::reaction::Reaction;
/// use HyperKin::Kinetics::rate_laws::Arrhenius;
/// use HyperKin::Thermodynamics::NASAmixture::{NasaMixture, NasaSpecies};
/// let flat = |name: &str| NasaSpecies {
///     name: name.to_string(),
///     formula: None,
///     T: [200.0, 1000.0, 6000.0],
///     low: [3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
///     high: [3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
/// };
/// let mixture = NasaMixture::new(vec![flat("O2"), flat("O")]).unwrap();
/// let mut kinetics = Kinetics::new(&mixture);
/// let rate = Arrhenius::new(2e15, -1.5, 59500.0).unwrap();
/// kinetics.add_reaction(Reaction::new("O2 + M = 2O + M", rate).unwrap()).unwrap();
/// // nothing can be evaluated before the mechanism is closed
/// assert_eq!(kinetics.update_t(3000.0), Err(KineticsError::NotClosed));
/// kinetics.close_reactions(true).unwrap();
/// let jac = kinetics.jacobian_rho_matrix(3000.0, &[1.0, 0.1]).unwrap();
/// assert_eq!(jac.shape(), (2, 2));
/// ```
pub mod kinetics_engine;
/// validation report and error types
pub mod kinetics_errors;
/// analytic Jacobian of the production rates
pub mod jacobian;
/// rate laws, their units and the rate coefficient manager
pub mod rate_laws;
/// reaction records and formula parsing
pub mod reaction;
/// sparse reactant/product incidence sets
pub mod stoichiometry;
/// third-body efficiencies
pub mod thirdbody;
