//! `hyperkin <mechanism.json> <species.json> <T> <c1,c2,...>`
//!
//! Loads a mechanism and its species data, closes the mechanism and prints rate
//! coefficients, rates of progress and mass production rates at the given state.
use crate::Kinetics::kinetics_engine::Kinetics;
use crate::Kinetics::kinetics_errors::KineticsError;
use crate::Thermodynamics::thermo_state::ThermoState;
use crate::Utils::load_from_file::{LoadData, LoadError};
use log::info;
use prettytable::{Table, row};
use thiserror::Error;

pub const USAGE: &str = "usage: hyperkin <mechanism.json> <species.json> <T, K> <c1,c2,... mol/m^3>";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
    #[error("cannot read '{0}' as a number")]
    BadNumber(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Kinetics(#[from] KineticsError),
}

/// Parsed command line.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct CliTask {
    pub mechanism_file: String,
    pub species_file: String,
    pub T: f64,
    pub concentrations: Vec<f64>,
}

fn parse_number(s: &str) -> Result<f64, CliError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| CliError::BadNumber(s.to_string()))
}

pub fn parse_args(args: &[String]) -> Result<CliTask, CliError> {
    let [mechanism_file, species_file, t, conc] = args else {
        return Err(CliError::Usage(format!(
            "expected 4 arguments, got {}",
            args.len()
        )));
    };
    let concentrations = conc
        .split(',')
        .map(parse_number)
        .collect::<Result<Vec<f64>, _>>()?;
    Ok(CliTask {
        mechanism_file: mechanism_file.clone(),
        species_file: species_file.clone(),
        T: parse_number(t)?,
        concentrations,
    })
}

/// one row per reaction: formula, k_f, k_b, net rate of progress
#[allow(non_snake_case)]
pub fn reaction_table<Th: ThermoState + ?Sized>(
    kinetics: &mut Kinetics<'_, Th>,
    T: f64,
    conc: &[f64],
) -> Result<Table, KineticsError> {
    let kf = kinetics.forward_rate_coefficients_vec(T)?;
    let kb = kinetics.backward_rate_coefficients_vec(T)?;
    let rop = kinetics.net_rates_of_progress_vec(T, conc)?;
    let mut table = Table::new();
    table.add_row(row!["#", "Reaction", "kf (SI)", "kb (SI)", "rop, mol/m^3/s"]);
    for (j, reaction) in kinetics.reactions().iter().enumerate() {
        table.add_row(row![
            (j + 1).to_string(),
            reaction.formula(),
            format!("{:.6e}", kf[j]),
            format!("{:.6e}", kb[j]),
            format!("{:.6e}", rop[j])
        ]);
    }
    Ok(table)
}

/// one row per species: concentration and mass production rate
#[allow(non_snake_case)]
pub fn species_table<Th: ThermoState + ?Sized>(
    kinetics: &mut Kinetics<'_, Th>,
    T: f64,
    conc: &[f64],
) -> Result<Table, KineticsError> {
    let wdot = kinetics.net_production_rates_vec(T, conc)?;
    let thermo = kinetics.thermo();
    let mut table = Table::new();
    table.add_row(row!["Species", "c, mol/m^3", "wdot, kg/m^3/s"]);
    for (i, w) in wdot.iter().enumerate() {
        table.add_row(row![
            thermo.species_name(i),
            format!("{:.6e}", conc[i]),
            format!("{:.6e}", w)
        ]);
    }
    Ok(table)
}

pub fn run(args: &[String]) -> Result<(), CliError> {
    let task = parse_args(args)?;
    let mechanism = LoadData::new(task.mechanism_file.clone()).load_mechanism()?;
    let data = LoadData::new(task.species_file.clone()).load_species()?;
    let mixture = mechanism.mixture(data)?;
    if task.concentrations.len() != mixture.n_species() {
        return Err(CliError::Usage(format!(
            "expected {} concentrations, got {}",
            mixture.n_species(),
            task.concentrations.len()
        )));
    }
    let mut kinetics = mechanism.build_kinetics(&mixture)?;
    info!(
        "evaluating {} reactions at T = {} K",
        kinetics.n_reactions(),
        task.T
    );

    println!("\n=== RATES AT T = {} K ===", task.T);
    reaction_table(&mut kinetics, task.T, &task.concentrations)?.printstd();
    println!("\n=== PRODUCTION RATES ===");
    species_table(&mut kinetics, task.T, &task.concentrations)?.printstd();
    Ok(())
}
