//! Rate laws and the rate coefficient manager.
//!
//! Every reaction owns exactly one [`RateLaw`]. The set of rate-law kinds is closed and
//! dispatched statically through `enum_dispatch`, so the per-reaction loop in
//! [`RateManager::ln_forward_rate_coefficients`] has no virtual calls.
//!
//! Units of the Arrhenius parameters are an explicit [`ArrheniusUnits`] value passed to
//! [`Arrhenius::with_units`]. The conversion of the pre-exponential factor depends on the
//! reaction order, so it has to be done when the reaction is known.
use crate::constants::{CAL_TO_J, KB, NA, QE, RU};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RateLawError {
    #[error("pre-exponential factor must be positive, got {0}")]
    NonPositivePreExponential(f64),
    #[error("unknown unit '{unit}' in '{units}'")]
    UnknownUnit { units: String, unit: String },
    #[error("units '{0}' must have the form length-quantity-time, e.g. cm-mol-s")]
    MalformedUnits(String),
}

/// Evaluation interface shared by all rate-law kinds.
#[enum_dispatch]
pub trait RateLawEval {
    /// natural logarithm of the rate coefficient at temperature `T` (SI units)
    #[allow(non_snake_case)]
    fn ln_rate_coefficient(&self, T: f64) -> f64;
}

/// Unit of the activation energy as given in the mechanism
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnergyUnit {
    /// activation temperature given directly
    Kelvin,
    /// energy per mole; the value is the number of J/mol in one unit
    PerMole(f64),
    ElectronVolt,
}

/// Units of the Arrhenius parameters used by a mechanism.
///
/// Built once per mechanism and handed to every Arrhenius constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrheniusUnits {
    /// metres in one length unit
    pub length: f64,
    /// moles in one quantity unit
    pub quantity: f64,
    /// seconds in one time unit
    pub time: f64,
    pub energy: EnergyUnit,
}

impl Default for ArrheniusUnits {
    fn default() -> Self {
        Self {
            length: 1.0,
            quantity: 1.0,
            time: 1.0,
            energy: EnergyUnit::Kelvin,
        }
    }
}

impl ArrheniusUnits {
    /// Parses unit strings such as `("cm-mol-s", "kcal-mol")`.
    ///
    /// Length: `m`, `cm`, `mm`. Quantity: `mol`, `kmol`, `molecule`. Time: `s`, `ms`.
    /// Energy: `K`, `J-mol`, `kJ-mol`, `cal-mol`, `kcal-mol`, `J-kmol`, `eV`.
    pub fn parse(a_units: &str, e_units: &str) -> Result<Self, RateLawError> {
        let unknown = |unit: &str| RateLawError::UnknownUnit {
            units: a_units.to_string(),
            unit: unit.to_string(),
        };
        let parts: Vec<&str> = a_units.trim().split('-').collect();
        if parts.len() != 3 {
            return Err(RateLawError::MalformedUnits(a_units.to_string()));
        }
        let length = match parts[0] {
            "m" => 1.0,
            "cm" => 1e-2,
            "mm" => 1e-3,
            other => return Err(unknown(other)),
        };
        let quantity = match parts[1] {
            "mol" => 1.0,
            "kmol" => 1e3,
            "molecule" | "molec" => 1.0 / NA,
            other => return Err(unknown(other)),
        };
        let time = match parts[2] {
            "s" => 1.0,
            "ms" => 1e-3,
            other => return Err(unknown(other)),
        };
        let energy = match e_units.trim() {
            "K" => EnergyUnit::Kelvin,
            "J-mol" | "J/mol" => EnergyUnit::PerMole(1.0),
            "J-kmol" | "J/kmol" => EnergyUnit::PerMole(1e-3),
            "kJ-mol" | "kJ/mol" => EnergyUnit::PerMole(1e3),
            "cal-mol" | "cal/mol" => EnergyUnit::PerMole(CAL_TO_J),
            "kcal-mol" | "kcal/mol" => EnergyUnit::PerMole(CAL_TO_J * 1e3),
            "eV" => EnergyUnit::ElectronVolt,
            other => {
                return Err(RateLawError::UnknownUnit {
                    units: e_units.to_string(),
                    unit: other.to_string(),
                });
            }
        };
        Ok(Self {
            length,
            quantity,
            time,
            energy,
        })
    }

    /// factor bringing a pre-exponential factor of a reaction of the given order to SI
    pub fn pre_exponential_factor(&self, order: usize) -> f64 {
        let volume_per_quantity = self.length.powi(3) / self.quantity;
        volume_per_quantity.powi(order as i32 - 1) / self.time
    }

    /// activation temperature, K, of an activation energy given in these units
    pub fn activation_temperature(&self, e: f64) -> f64 {
        match self.energy {
            EnergyUnit::Kelvin => e,
            EnergyUnit::PerMole(j_per_unit) => e * j_per_unit / RU,
            EnergyUnit::ElectronVolt => e * QE / KB,
        }
    }
}

/// Modified Arrhenius law `k = A T^n exp(-T_a / T)` stored as `(ln A, n, T_a)` in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrhenius {
    pub ln_a: f64,
    pub n: f64,
    pub t_a: f64,
}

impl Arrhenius {
    /// from SI parameters: `A` in (m^3/mol)^(order-1)/s, activation temperature in K
    #[allow(non_snake_case)]
    pub fn new(A: f64, n: f64, T_a: f64) -> Result<Self, RateLawError> {
        if !(A > 0.0) {
            return Err(RateLawError::NonPositivePreExponential(A));
        }
        Ok(Self {
            ln_a: A.ln(),
            n,
            t_a: T_a,
        })
    }

    /// from parameters given in `units` for a reaction of the given order
    #[allow(non_snake_case)]
    pub fn with_units(
        A: f64,
        n: f64,
        E: f64,
        units: &ArrheniusUnits,
        order: usize,
    ) -> Result<Self, RateLawError> {
        Self::new(
            A * units.pre_exponential_factor(order),
            n,
            units.activation_temperature(E),
        )
    }

    pub fn pre_exponential_factor(&self) -> f64 {
        self.ln_a.exp()
    }
}

impl RateLawEval for Arrhenius {
    #[allow(non_snake_case)]
    fn ln_rate_coefficient(&self, T: f64) -> f64 {
        self.ln_a + self.n * T.ln() - self.t_a / T
    }
}

/// All rate-law kinds understood by the engine.
#[enum_dispatch(RateLawEval)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RateLaw {
    Arrhenius(Arrhenius),
}

/// Holds one rate law per reaction and evaluates all of them at once.
#[derive(Debug, Clone, Default)]
pub struct RateManager {
    rates: Vec<RateLaw>,
    evaluations: usize,
}

impl RateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// reactions must be registered in order, starting from 0
    pub fn add_rate_coefficient(&mut self, reaction: usize, rate: RateLaw) {
        assert_eq!(
            reaction,
            self.rates.len(),
            "rate coefficients must be added in reaction order"
        );
        self.rates.push(rate);
    }

    pub fn n_rates(&self) -> usize {
        self.rates.len()
    }

    /// number of times [`Self::ln_forward_rate_coefficients`] has run
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    #[allow(non_snake_case)]
    pub fn ln_forward_rate_coefficients(&mut self, T: f64, lnkf: &mut [f64]) {
        assert_eq!(lnkf.len(), self.rates.len());
        for (lnk, rate) in lnkf.iter_mut().zip(self.rates.iter()) {
            *lnk = rate.ln_rate_coefficient(T);
        }
        self.evaluations += 1;
    }
}
