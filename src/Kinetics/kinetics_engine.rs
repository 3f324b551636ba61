//! # Kinetics engine
//!
//! [`Kinetics`] owns a gas-phase mechanism and evaluates its source terms for a given
//! temperature and composition. Thermodynamic data (species, molecular weights, element
//! matrix, Gibbs energies) come from a [`ThermoState`] the engine borrows for its lifetime.
//!
//! Life cycle:
//! 1. reactions are appended with [`Kinetics::add_reaction`];
//! 2. [`Kinetics::close_reactions`] validates the mechanism and allocates the work arrays;
//! 3. the evaluation methods may then be called any number of times.
//!
//! Log forward rate coefficients and log equilibrium constants depend on temperature only and
//! are cached; they are recomputed only when a temperature moves by at least 1e-6 K. The
//! `*_tt` variants take a full [`Temperatures`] state for thermal-nonequilibrium mixtures;
//! the plain variants assume every mode is at `T`.
//! Everything that depends on concentrations is recomputed on every call.
//!
//! All vector results are written into caller-owned slices; the `*_vec` variants allocate.
//! Concentrations are molar, mol/m^3; production rates are on a mass basis, kg/m^3/s.
//! # Examples
//! ```
//! use HyperKin::Kinetics::kinetics_engine::Kinetics;
//! use HyperKin::Kinetics::reaction::Reaction;
//! use HyperKin::Kinetics::rate_laws::Arrhenius;
//! use HyperKin::Thermodynamics::NASAmixture::{NasaMixture, NasaSpecies};
//! let flat = |name: &str| NasaSpecies {
//!     name: name.to_string(),
//!     formula: None,
//!     T: [200.0, 1000.0, 6000.0],
//!     low: [2.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
//!     high: [2.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
//! };
//! let mixture = NasaMixture::new(vec![flat("N2"), flat("N")]).unwrap();
//! let mut kinetics = Kinetics::new(&mixture);
//! let rate = Arrhenius::new(1e10, 0.0, 0.0).unwrap();
//! kinetics.add_reaction(Reaction::new("N2 => 2N", rate).unwrap()).unwrap();
//! kinetics.close_reactions(true).unwrap();
//! let wdot = kinetics.net_production_rates_vec(1000.0, &[1.0, 0.0]).unwrap();
//! assert!(wdot[0] < 0.0 && wdot[1] > 0.0);
//! ```
use crate::Kinetics::jacobian::JacobianManager;
use crate::Kinetics::kinetics_errors::{
    KineticsError, MechanismError, MechanismProblem, ValidationReport,
};
use crate::Kinetics::rate_laws::RateManager;
use crate::Kinetics::reaction::Reaction;
use crate::Kinetics::stoichiometry::StoichiometryManager;
use crate::Kinetics::thirdbody::ThirdbodyManager;
use crate::Thermodynamics::thermo_state::{Temperatures, ThermoState};
use crate::constants::{ONEATM, RU};
use log::{debug, error, info, warn};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// smallest temperature change that invalidates the cached rate data, K
pub const T_TOLERANCE: f64 = 1e-6;

/// Options of a mechanism, read from the optional `settings` block of a mechanism file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticsSettings {
    /// run the duplicate and conservation checks when the mechanism is closed
    pub validate_mechanism: bool,
    /// largest component-wise difference of two normalized net stoichiometric vectors
    /// for which the reactions are reported as duplicates
    pub duplicate_tolerance: f64,
}

impl Default for KineticsSettings {
    fn default() -> Self {
        Self {
            validate_mechanism: true,
            duplicate_tolerance: 1e-10,
        }
    }
}

fn fill_exp(ln: &[f64], out: &mut [f64]) {
    assert_eq!(out.len(), ln.len());
    for (x, lnx) in out.iter_mut().zip(ln.iter()) {
        *x = lnx.exp();
    }
}

fn fill_backward(lnkf: &[f64], lnkeq: &[f64], reversible: &[bool], kb: &mut [f64]) {
    assert_eq!(kb.len(), lnkf.len());
    for j in 0..kb.len() {
        kb[j] = if reversible[j] {
            (lnkf[j] - lnkeq[j]).exp()
        } else {
            0.0
        };
    }
}

pub struct Kinetics<'a, Th: ThermoState + ?Sized> {
    thermo: &'a Th,
    settings: KineticsSettings,
    reactions: Vec<Reaction>,
    reversible: Vec<bool>,
    mw: Vec<f64>,

    reactants: StoichiometryManager,
    rev_prods: StoichiometryManager,
    irr_prods: StoichiometryManager,
    thirdbodies: ThirdbodyManager,
    rates: RateManager,
    jacobian: JacobianManager,

    closed: bool,
    /// state of the cached logs; negative until the first update
    state_last: Temperatures,
    dnu: Vec<f64>,
    lnkf: Vec<f64>,
    lnkeq: Vec<f64>,
    g: Vec<f64>,
    kf: Vec<f64>,
    kb: Vec<f64>,
    ropf: Vec<f64>,
    ropb: Vec<f64>,
    rop: Vec<f64>,
}

impl<'a, Th: ThermoState + ?Sized> Kinetics<'a, Th> {
    pub fn new(thermo: &'a Th) -> Self {
        Self::with_settings(thermo, KineticsSettings::default())
    }

    pub fn with_settings(thermo: &'a Th, settings: KineticsSettings) -> Self {
        let ns = thermo.n_species();
        Self {
            thermo,
            settings,
            reactions: Vec::new(),
            reversible: Vec::new(),
            mw: (0..ns).map(|i| thermo.species_mw(i)).collect(),
            reactants: StoichiometryManager::new(),
            rev_prods: StoichiometryManager::new(),
            irr_prods: StoichiometryManager::new(),
            thirdbodies: ThirdbodyManager::new(),
            rates: RateManager::new(),
            jacobian: JacobianManager::new(ns),
            closed: false,
            state_last: Temperatures::equilibrium(-1.0),
            dnu: Vec::new(),
            lnkf: Vec::new(),
            lnkeq: Vec::new(),
            g: Vec::new(),
            kf: Vec::new(),
            kb: Vec::new(),
            ropf: Vec::new(),
            ropb: Vec::new(),
            rop: Vec::new(),
        }
    }

    fn indices(&self, names: &[String]) -> Vec<usize> {
        names
            .iter()
            .filter_map(|name| self.thermo.species_index(name))
            .collect()
    }

    /// Appends a reaction and registers it with every manager. Returns its index.
    ///
    /// Species the mixture does not know are left out of the managers; they are reported
    /// when the mechanism is closed.
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<usize, KineticsError> {
        if self.closed {
            return Err(KineticsError::AlreadyClosed);
        }
        let j = self.reactions.len();
        let reactants = self.indices(reaction.reactants());
        let products = self.indices(reaction.products());

        self.reactants.add_reaction(j, &reactants);
        if reaction.is_reversible() {
            self.rev_prods.add_reaction(j, &products);
        } else {
            self.irr_prods.add_reaction(j, &products);
        }
        let efficiencies: Option<Vec<(usize, f64)>> = reaction.is_thirdbody().then(|| {
            reaction
                .efficiencies()
                .iter()
                .filter_map(|(name, eff)| self.thermo.species_index(name).map(|i| (i, *eff)))
                .collect()
        });
        if let Some(effs) = &efficiencies {
            self.thirdbodies.add_reaction(j, effs);
        }
        self.rates.add_rate_coefficient(j, reaction.rate_law().clone());
        self.jacobian.add_reaction(
            &reactants,
            &products,
            reaction.is_reversible(),
            efficiencies.as_deref(),
        );
        debug!("reaction {} \"{}\" registered", j + 1, reaction.formula());

        self.reversible.push(reaction.is_reversible());
        self.reactions.push(reaction);
        Ok(j)
    }

    /// Seals the mechanism. Species existence is always checked; with `validate` the
    /// duplicate and element conservation checks run as well. All problems found are
    /// returned together; the mechanism stays open in that case.
    pub fn close_reactions(&mut self, validate: bool) -> Result<(), KineticsError> {
        if self.closed {
            return Err(KineticsError::AlreadyClosed);
        }
        let ns = self.thermo.n_species();
        let nr = self.reactions.len();
        if nr == 0 {
            warn!("closing an empty mechanism");
        }

        let mut report = ValidationReport::default();
        self.check_species(&mut report);
        if validate {
            info!("validating reaction mechanism...");
            self.check_duplicates(&mut report);
            self.check_conservation(&mut report);
        }
        if !report.is_empty() {
            for problem in report.problems.iter() {
                error!("{}", problem);
            }
            error!("validation checks failed!");
            return Err(MechanismError::Invalid(report).into());
        }

        let mut dnu = vec![0.0; nr];
        self.get_reaction_delta(&vec![1.0; ns], &mut dnu);
        self.dnu = dnu;

        self.lnkf = vec![0.0; nr];
        self.lnkeq = vec![0.0; nr];
        self.g = vec![0.0; ns];
        self.kf = vec![0.0; nr];
        self.kb = vec![0.0; nr];
        self.ropf = vec![0.0; nr];
        self.ropb = vec![0.0; nr];
        self.rop = vec![0.0; nr];
        self.closed = true;
        info!(
            "mechanism closed with {} reactions and {} species",
            nr, ns
        );
        Ok(())
    }

    fn check_species(&self, report: &mut ValidationReport) {
        for (j, reaction) in self.reactions.iter().enumerate() {
            let sides = reaction
                .reactants()
                .iter()
                .chain(reaction.products().iter())
                .map(|name| (name, false));
            let partners = reaction
                .efficiencies()
                .iter()
                .filter(|_| reaction.is_thirdbody())
                .map(|(name, _)| (name, true));
            let mut reported: Vec<&String> = Vec::new();
            for (name, thirdbody) in sides.chain(partners) {
                if self.thermo.species_index(name).is_none() && !reported.contains(&name) {
                    reported.push(name);
                    report.problems.push(MechanismProblem::UnknownSpecies {
                        reaction: j,
                        formula: reaction.formula().to_string(),
                        species: name.clone(),
                        thirdbody,
                    });
                }
            }
        }
    }

    // None when nothing changes in the reaction (a collision partner on both sides)
    fn normalized_net_stoichiometry(&self, reaction: &Reaction) -> Option<Vec<f64>> {
        let mut nu = vec![0.0; self.thermo.n_species()];
        for i in self.indices(reaction.products()) {
            nu[i] += 1.0;
        }
        for i in self.indices(reaction.reactants()) {
            nu[i] -= 1.0;
        }
        let norm = nu.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            return None;
        }
        nu.iter_mut().for_each(|x| *x /= norm);
        Some(nu)
    }

    fn check_duplicates(&self, report: &mut ValidationReport) {
        let tolerance = self.settings.duplicate_tolerance;
        let stoich: Vec<Option<Vec<f64>>> = self
            .reactions
            .iter()
            .map(|r| self.normalized_net_stoichiometry(r))
            .collect();
        for i in 0..stoich.len() {
            let Some(nu_i) = &stoich[i] else { continue };
            for j in i + 1..stoich.len() {
                let Some(nu_j) = &stoich[j] else { continue };
                let identical = nu_i
                    .iter()
                    .zip(nu_j.iter())
                    .all(|(a, b)| (a - b).abs() <= tolerance);
                if identical {
                    report.problems.push(MechanismProblem::Duplicate {
                        reaction: j,
                        formula: self.reactions[j].formula().to_string(),
                        duplicate_of: i,
                        other_formula: self.reactions[i].formula().to_string(),
                    });
                }
            }
        }
    }

    fn check_conservation(&self, report: &mut ValidationReport) {
        let elements = self.thermo.element_matrix();
        let mut delta = vec![0.0; self.reactions.len()];
        for e in 0..self.thermo.n_elements() {
            let column: Vec<f64> = elements.column(e).iter().copied().collect();
            self.get_reaction_delta(&column, &mut delta);
            for (j, imbalance) in delta.iter().enumerate() {
                if *imbalance != 0.0 {
                    report.problems.push(MechanismProblem::NotConserved {
                        reaction: j,
                        formula: self.reactions[j].formula().to_string(),
                        element: self.thermo.element_name(e).to_string(),
                        imbalance: *imbalance,
                    });
                }
            }
        }
    }

    /// `r[j] = Σ_products s - Σ_reactants s` for every reaction j
    pub fn get_reaction_delta(&self, s: &[f64], r: &mut [f64]) {
        assert_eq!(s.len(), self.thermo.n_species());
        assert_eq!(r.len(), self.reactions.len());
        r.fill(0.0);
        self.reactants.decr_reactions(s, r);
        self.rev_prods.incr_reactions(s, r);
        self.irr_prods.incr_reactions(s, r);
    }

    fn check_state(
        &self,
        state: &Temperatures,
        conc: Option<&[f64]>,
    ) -> Result<(), KineticsError> {
        if !self.closed {
            return Err(KineticsError::NotClosed);
        }
        const MODES: [&str; 5] = [
            "heavy-particle",
            "rotational",
            "vibrational",
            "electronic",
            "electron",
        ];
        for (mode, t) in MODES.iter().zip(state.modes().iter()) {
            if !(t.is_finite() && *t > 0.0) {
                return Err(KineticsError::InvalidState(format!(
                    "{} temperature must be positive and finite, got {} K",
                    mode, t
                )));
            }
        }
        if let Some(conc) = conc {
            assert_eq!(conc.len(), self.thermo.n_species());
            if let Some((i, c)) = conc
                .iter()
                .enumerate()
                .find(|(_, c)| !(c.is_finite() && **c >= 0.0))
            {
                return Err(KineticsError::InvalidState(format!(
                    "concentration of {} must be non-negative and finite, got {}",
                    self.thermo.species_name(i),
                    c
                )));
            }
        }
        Ok(())
    }

    // ln k_f follows the heavy-particle temperature only; ln K follows every mode
    #[allow(non_snake_case)]
    fn refresh(&mut self, state: &Temperatures) {
        if state.is_close(&self.state_last, T_TOLERANCE) {
            return;
        }
        let T = state.t;
        if (T - self.state_last.t).abs() >= T_TOLERANCE {
            self.rates.ln_forward_rate_coefficients(T, &mut self.lnkf);
        }

        self.thermo.species_g_over_rt(state, &mut self.g);
        let ln_ref = (ONEATM / (RU * T)).ln();
        for (lnk, dnu) in self.lnkeq.iter_mut().zip(self.dnu.iter()) {
            *lnk = dnu * ln_ref;
        }
        self.reactants.incr_reactions(&self.g, &mut self.lnkeq);
        self.rev_prods.decr_reactions(&self.g, &mut self.lnkeq);
        self.irr_prods.decr_reactions(&self.g, &mut self.lnkeq);
        self.state_last = *state;
    }

    /// Brings the cached rate data to temperature `T` with every mode in equilibrium.
    #[allow(non_snake_case)]
    pub fn update_t(&mut self, T: f64) -> Result<(), KineticsError> {
        self.update_state(&Temperatures::equilibrium(T))
    }

    /// Brings the cached rate data to a (possibly) thermal-nonequilibrium state.
    pub fn update_state(&mut self, state: &Temperatures) -> Result<(), KineticsError> {
        self.check_state(state, None)?;
        self.refresh(state);
        Ok(())
    }

    /// equilibrium constants in concentration units
    #[allow(non_snake_case)]
    pub fn equilibrium_constants(&mut self, T: f64, keq: &mut [f64]) -> Result<(), KineticsError> {
        self.equilibrium_constants_tt(&Temperatures::equilibrium(T), keq)
    }

    /// equilibrium constants with the Gibbs energies evaluated at `state`
    pub fn equilibrium_constants_tt(
        &mut self,
        state: &Temperatures,
        keq: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.update_state(state)?;
        fill_exp(&self.lnkeq, keq);
        Ok(())
    }

    #[allow(non_snake_case)]
    pub fn forward_rate_coefficients(
        &mut self,
        T: f64,
        kf: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.update_t(T)?;
        fill_exp(&self.lnkf, kf);
        Ok(())
    }

    /// `k_f / K` for reversible reactions, zero for irreversible ones
    #[allow(non_snake_case)]
    pub fn backward_rate_coefficients(
        &mut self,
        T: f64,
        kb: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.backward_rate_coefficients_tt(&Temperatures::equilibrium(T), kb)
    }

    pub fn backward_rate_coefficients_tt(
        &mut self,
        state: &Temperatures,
        kb: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.update_state(state)?;
        fill_backward(&self.lnkf, &self.lnkeq, &self.reversible, kb);
        Ok(())
    }

    #[allow(non_snake_case)]
    pub fn forward_rates_of_progress(
        &mut self,
        T: f64,
        conc: &[f64],
        ropf: &mut [f64],
    ) -> Result<(), KineticsError> {
        let state = Temperatures::equilibrium(T);
        self.check_state(&state, Some(conc))?;
        self.refresh(&state);
        fill_exp(&self.lnkf, ropf);
        self.reactants.mult_reactions(conc, ropf);
        self.thirdbodies.multiply_thirdbodies(conc, ropf);
        Ok(())
    }

    #[allow(non_snake_case)]
    pub fn backward_rates_of_progress(
        &mut self,
        T: f64,
        conc: &[f64],
        ropb: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.backward_rates_of_progress_tt(&Temperatures::equilibrium(T), conc, ropb)
    }

    pub fn backward_rates_of_progress_tt(
        &mut self,
        state: &Temperatures,
        conc: &[f64],
        ropb: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.check_state(state, Some(conc))?;
        self.refresh(state);
        fill_backward(&self.lnkf, &self.lnkeq, &self.reversible, ropb);
        self.rev_prods.mult_reactions(conc, ropb);
        self.thirdbodies.multiply_thirdbodies(conc, ropb);
        Ok(())
    }

    // fills self.rop; state must have been checked
    fn update_rop(&mut self, conc: &[f64]) {
        fill_exp(&self.lnkf, &mut self.ropf);
        self.reactants.mult_reactions(conc, &mut self.ropf);
        fill_backward(&self.lnkf, &self.lnkeq, &self.reversible, &mut self.ropb);
        self.rev_prods.mult_reactions(conc, &mut self.ropb);
        for j in 0..self.rop.len() {
            self.rop[j] = self.ropf[j] - self.ropb[j];
        }
        self.thirdbodies.multiply_thirdbodies(conc, &mut self.rop);
    }

    #[allow(non_snake_case)]
    pub fn net_rates_of_progress(
        &mut self,
        T: f64,
        conc: &[f64],
        rop: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.net_rates_of_progress_tt(&Temperatures::equilibrium(T), conc, rop)
    }

    pub fn net_rates_of_progress_tt(
        &mut self,
        state: &Temperatures,
        conc: &[f64],
        rop: &mut [f64],
    ) -> Result<(), KineticsError> {
        assert_eq!(rop.len(), self.reactions.len());
        self.check_state(state, Some(conc))?;
        self.refresh(state);
        self.update_rop(conc);
        rop.copy_from_slice(&self.rop);
        Ok(())
    }

    /// mass production rate of every species, kg/m^3/s
    #[allow(non_snake_case)]
    pub fn net_production_rates(
        &mut self,
        T: f64,
        conc: &[f64],
        wdot: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.net_production_rates_tt(&Temperatures::equilibrium(T), conc, wdot)
    }

    pub fn net_production_rates_tt(
        &mut self,
        state: &Temperatures,
        conc: &[f64],
        wdot: &mut [f64],
    ) -> Result<(), KineticsError> {
        assert_eq!(wdot.len(), self.thermo.n_species());
        self.check_state(state, Some(conc))?;
        self.refresh(state);
        self.update_rop(conc);
        wdot.fill(0.0);
        self.reactants.decr_species(&self.rop, wdot);
        self.rev_prods.incr_species(&self.rop, wdot);
        self.irr_prods.incr_species(&self.rop, wdot);
        for (w, mw) in wdot.iter_mut().zip(self.mw.iter()) {
            *w *= mw;
        }
        Ok(())
    }

    /// `J[i][j] = ∂ω̇_i/∂ρ_j` of the mass production rates with respect to partial densities
    #[allow(non_snake_case)]
    pub fn jacobian_rho(
        &mut self,
        T: f64,
        conc: &[f64],
        jac: &mut DMatrix<f64>,
    ) -> Result<(), KineticsError> {
        self.jacobian_rho_tt(&Temperatures::equilibrium(T), conc, jac)
    }

    pub fn jacobian_rho_tt(
        &mut self,
        state: &Temperatures,
        conc: &[f64],
        jac: &mut DMatrix<f64>,
    ) -> Result<(), KineticsError> {
        self.check_state(state, Some(conc))?;
        self.refresh(state);
        fill_exp(&self.lnkf, &mut self.kf);
        fill_backward(&self.lnkf, &self.lnkeq, &self.reversible, &mut self.kb);
        self.jacobian
            .compute_jacobian(&self.kf, &self.kb, conc, &self.mw, jac);
        Ok(())
    }

    ////////////////////////////////////////////////////////////////////////////////
    // allocating variants
    ////////////////////////////////////////////////////////////////////////////////

    #[allow(non_snake_case)]
    pub fn equilibrium_constants_vec(&mut self, T: f64) -> Result<Vec<f64>, KineticsError> {
        let mut out = vec![0.0; self.reactions.len()];
        self.equilibrium_constants(T, &mut out)?;
        Ok(out)
    }

    #[allow(non_snake_case)]
    pub fn forward_rate_coefficients_vec(&mut self, T: f64) -> Result<Vec<f64>, KineticsError> {
        let mut out = vec![0.0; self.reactions.len()];
        self.forward_rate_coefficients(T, &mut out)?;
        Ok(out)
    }

    #[allow(non_snake_case)]
    pub fn backward_rate_coefficients_vec(&mut self, T: f64) -> Result<Vec<f64>, KineticsError> {
        let mut out = vec![0.0; self.reactions.len()];
        self.backward_rate_coefficients(T, &mut out)?;
        Ok(out)
    }

    #[allow(non_snake_case)]
    pub fn forward_rates_of_progress_vec(
        &mut self,
        T: f64,
        conc: &[f64],
    ) -> Result<Vec<f64>, KineticsError> {
        let mut out = vec![0.0; self.reactions.len()];
        self.forward_rates_of_progress(T, conc, &mut out)?;
        Ok(out)
    }

    #[allow(non_snake_case)]
    pub fn backward_rates_of_progress_vec(
        &mut self,
        T: f64,
        conc: &[f64],
    ) -> Result<Vec<f64>, KineticsError> {
        let mut out = vec![0.0; self.reactions.len()];
        self.backward_rates_of_progress(T, conc, &mut out)?;
        Ok(out)
    }

    #[allow(non_snake_case)]
    pub fn net_rates_of_progress_vec(
        &mut self,
        T: f64,
        conc: &[f64],
    ) -> Result<Vec<f64>, KineticsError> {
        let mut out = vec![0.0; self.reactions.len()];
        self.net_rates_of_progress(T, conc, &mut out)?;
        Ok(out)
    }

    #[allow(non_snake_case)]
    pub fn net_production_rates_vec(
        &mut self,
        T: f64,
        conc: &[f64],
    ) -> Result<Vec<f64>, KineticsError> {
        let mut out = vec![0.0; self.thermo.n_species()];
        self.net_production_rates(T, conc, &mut out)?;
        Ok(out)
    }

    #[allow(non_snake_case)]
    pub fn jacobian_rho_matrix(
        &mut self,
        T: f64,
        conc: &[f64],
    ) -> Result<DMatrix<f64>, KineticsError> {
        let ns = self.thermo.n_species();
        let mut jac = DMatrix::zeros(ns, ns);
        self.jacobian_rho(T, conc, &mut jac)?;
        Ok(jac)
    }

    ////////////////////////////////////////////////////////////////////////////////
    // introspection
    ////////////////////////////////////////////////////////////////////////////////

    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn n_species(&self) -> usize {
        self.thermo.n_species()
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn reaction(&self, j: usize) -> &Reaction {
        &self.reactions[j]
    }

    /// net change of the number of moles in every reaction (empty before closing)
    pub fn dnu(&self) -> &[f64] {
        &self.dnu
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// how many times the rate laws have been evaluated
    pub fn rate_evaluations(&self) -> usize {
        self.rates.evaluations()
    }

    pub fn settings(&self) -> &KineticsSettings {
        &self.settings
    }

    pub fn thermo(&self) -> &'a Th {
        self.thermo
    }
}
