//! Loading of mechanism and species-data files.
//!
//! A mechanism file is a JSON object:
//! ```text
//! {
//!   "name": "air5",
//!   "species": ["N2", "O2", "NO", "N", "O"],
//!   "arrhenius_units": {"A": "cm-mol-s", "E": "K"},
//!   "settings": {"validate_mechanism": true},
//!   "reactions": [
//!     {"formula": "N2 + M = 2N + M",
//!      "arrhenius": {"A": 7.0e21, "n": -1.6, "E": 113200.0},
//!      "efficiencies": {"N": 4.2857, "O": 4.2857}},
//!     {"formula": "N2 + O = NO + N", "arrhenius": [6.4e17, -1.0, 38400.0]}
//!   ]
//! }
//! ```
//! Only `reactions` is required. The units apply to every reaction and may be declared at
//! most once, before the reactions. A species-data file holds NASA-7 records,
//! `{"species": [{"name": ..., "T": [...], "low": [...], "high": [...]}, ...]}`.
//!
//! JSON syntax errors are logged together with the offending line and a pointer to the column.
use crate::Kinetics::kinetics_engine::{Kinetics, KineticsSettings};
use crate::Kinetics::kinetics_errors::KineticsError;
use crate::Kinetics::rate_laws::{Arrhenius, ArrheniusUnits, RateLawError};
use crate::Kinetics::reaction::{FormulaError, Reaction, ReactionEquation};
use crate::Thermodynamics::NASAmixture::{NasaMixture, NasaSpecies, NasaSpeciesList};
use crate::Thermodynamics::molmass::CompositionError;
use crate::Thermodynamics::thermo_state::ThermoState;
use log::{error, info};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file '{0}' does not exist")]
    FileNotFound(String),
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mechanism root must be an object with a 'reactions' array")]
    MalformedRoot,
    #[error("arrhenius units are declared more than once")]
    DuplicateUnits,
    #[error("arrhenius units must be declared before the reactions")]
    UnitsAfterReactions,
    #[error("invalid arrhenius units: {0}")]
    Units(RateLawError),
    #[error("reaction {}: {source}", .index + 1)]
    Formula { index: usize, source: FormulaError },
    #[error("reaction {}: {source}", .index + 1)]
    RateLaw { index: usize, source: RateLawError },
    #[error("no species data for '{0}'")]
    MissingSpeciesData(String),
    #[error(transparent)]
    Composition(#[from] CompositionError),
    #[error(transparent)]
    Kinetics(#[from] KineticsError),
}

/// Unit strings of the Arrhenius parameters.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitsRecord {
    #[serde(default = "UnitsRecord::default_a")]
    pub A: String,
    #[serde(default = "UnitsRecord::default_e")]
    pub E: String,
}

impl UnitsRecord {
    fn default_a() -> String {
        "m-mol-s".to_string()
    }
    fn default_e() -> String {
        "K".to_string()
    }
}

/// Arrhenius parameters either as `{"A": .., "n": .., "E": ..}` or as `[A, n, E]`.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrheniusRecord {
    Named {
        A: f64,
        #[serde(default)]
        n: f64,
        #[serde(default)]
        E: f64,
    },
    Array([f64; 3]),
}

impl ArrheniusRecord {
    /// (A, n, E)
    #[allow(non_snake_case)]
    pub fn parameters(&self) -> (f64, f64, f64) {
        match *self {
            ArrheniusRecord::Named { A, n, E } => (A, n, E),
            ArrheniusRecord::Array([A, n, E]) => (A, n, E),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub formula: String,
    pub arrhenius: ArrheniusRecord,
    #[serde(default)]
    pub efficiencies: BTreeMap<String, f64>,
}

/// Contents of a mechanism file.
#[derive(Debug, Clone, Default)]
pub struct MechanismFile {
    pub name: Option<String>,
    /// species of the mixture, in index order; all species of the data file if absent
    pub species: Option<Vec<String>>,
    /// every units declaration, with a flag telling whether it followed the reactions
    units_declarations: Vec<(UnitsRecord, bool)>,
    pub settings: KineticsSettings,
    pub reactions: Vec<ReactionRecord>,
}

// Keys are visited in document order, so repeated or misplaced unit declarations are seen.
impl<'de> Deserialize<'de> for MechanismFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MechanismVisitor;

        impl<'de> Visitor<'de> for MechanismVisitor {
            type Value = MechanismFile;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mechanism object")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<MechanismFile, M::Error> {
                let mut file = MechanismFile::default();
                let mut reactions: Option<Vec<ReactionRecord>> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => file.name = Some(map.next_value()?),
                        "species" => file.species = Some(map.next_value()?),
                        "settings" => file.settings = map.next_value()?,
                        "arrhenius_units" => {
                            let units = map.next_value()?;
                            file.units_declarations.push((units, reactions.is_some()));
                        }
                        "reactions" => {
                            if reactions.is_some() {
                                return Err(de::Error::duplicate_field("reactions"));
                            }
                            reactions = Some(map.next_value()?);
                        }
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                file.reactions = reactions.ok_or_else(|| de::Error::missing_field("reactions"))?;
                Ok(file)
            }
        }

        deserializer.deserialize_map(MechanismVisitor)
    }
}

impl MechanismFile {
    /// the single units declaration, SI with kelvin if there is none
    pub fn units(&self) -> Result<ArrheniusUnits, LoadError> {
        match self.units_declarations.as_slice() {
            [] => Ok(ArrheniusUnits::default()),
            [(_, true)] => Err(LoadError::UnitsAfterReactions),
            [(units, false)] => ArrheniusUnits::parse(&units.A, &units.E).map_err(LoadError::Units),
            _ => Err(LoadError::DuplicateUnits),
        }
    }

    /// reaction records converted to SI
    pub fn reactions(&self) -> Result<Vec<Reaction>, LoadError> {
        let units = self.units()?;
        self.reactions
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let equation = ReactionEquation::parse(&record.formula)
                    .map_err(|source| LoadError::Formula { index, source })?;
                #[allow(non_snake_case)]
                let (A, n, E) = record.arrhenius.parameters();
                let rate = Arrhenius::with_units(A, n, E, &units, equation.order())
                    .map_err(|source| LoadError::RateLaw { index, source })?;
                Ok(Reaction::from_equation(&record.formula, equation, rate)
                    .with_efficiencies(record.efficiencies.clone()))
            })
            .collect()
    }

    /// Mixture of the mechanism species (or of every record when the mechanism lists none).
    pub fn mixture(&self, data: NasaSpeciesList) -> Result<NasaMixture, LoadError> {
        let species: Vec<NasaSpecies> = match &self.species {
            None => data.species,
            Some(names) => names
                .iter()
                .map(|name| {
                    data.species
                        .iter()
                        .find(|s| &s.name == name)
                        .cloned()
                        .ok_or_else(|| LoadError::MissingSpeciesData(name.clone()))
                })
                .collect::<Result<_, _>>()?,
        };
        Ok(NasaMixture::new(species)?)
    }

    /// Builds the engine, adds every reaction and closes the mechanism with its settings.
    pub fn build_kinetics<'a, Th: ThermoState + ?Sized>(
        &self,
        thermo: &'a Th,
    ) -> Result<Kinetics<'a, Th>, LoadError> {
        let mut kinetics = Kinetics::with_settings(thermo, self.settings);
        for reaction in self.reactions()? {
            kinetics.add_reaction(reaction)?;
        }
        kinetics.close_reactions(self.settings.validate_mechanism)?;
        info!(
            "mechanism {} loaded",
            self.name.as_deref().unwrap_or("<unnamed>")
        );
        Ok(kinetics)
    }
}

// logs a JSON error with the problematic line and a pointer to the column
fn report_json_error(source: &str, text: &str, e: &serde_json::Error) {
    let error_line = e.line();
    let error_column = e.column();
    error!(
        "Error parsing {} at line {}, column {}: {}",
        source, error_line, error_column, e
    );
    if error_line >= 1 {
        if let Some(problem_line) = text.lines().nth(error_line - 1) {
            error!("Problematic line: {}", problem_line);
            if error_column >= 1 && error_column <= problem_line.len() + 1 {
                let pointer = " ".repeat(error_column - 1) + "^";
                error!("{}", pointer);
            }
        }
    }
}

fn parse_json<T: de::DeserializeOwned>(source: &str, text: &str) -> Result<T, LoadError> {
    serde_json::from_str(text).map_err(|e| {
        report_json_error(source, text, &e);
        LoadError::Json(e)
    })
}

fn has_reactions_array(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok_and(|root| {
        root.as_object()
            .and_then(|obj| obj.get("reactions"))
            .is_some_and(Value::is_array)
    })
}

/// Parses the text of a mechanism file.
///
/// The typed pass reads the text itself: a `Value` map would lose the key order and the
/// repeated keys the units checks rely on. The root is inspected only when that pass fails.
pub fn parse_mechanism(text: &str) -> Result<MechanismFile, LoadError> {
    match serde_json::from_str::<MechanismFile>(text) {
        Ok(mechanism) => Ok(mechanism),
        Err(e) if e.is_data() && !has_reactions_array(text) => {
            error!("mechanism root must be an object with a 'reactions' array");
            Err(LoadError::MalformedRoot)
        }
        Err(e) => {
            report_json_error("mechanism", text, &e);
            Err(LoadError::Json(e))
        }
    }
}

fn read_file(file_name: &str) -> Result<String, LoadError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(LoadError::FileNotFound(file_name.to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Reads one JSON data file: a mechanism or a species-data library.
pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }

    pub fn load_mechanism(&self) -> Result<MechanismFile, LoadError> {
        let mechanism = parse_mechanism(&read_file(&self.file_name)?)?;
        info!(
            "Successfully parsed {} reactions from file '{}'",
            mechanism.reactions.len(),
            self.file_name
        );
        Ok(mechanism)
    }

    pub fn load_species(&self) -> Result<NasaSpeciesList, LoadError> {
        let list: NasaSpeciesList = parse_json("species data", &read_file(&self.file_name)?)?;
        info!(
            "Successfully parsed {} species from file '{}'",
            list.species.len(),
            self.file_name
        );
        Ok(list)
    }
}

/// Reads a mechanism file and returns the closed engine for `thermo`.
pub fn load_mechanism<'a, Th: ThermoState + ?Sized>(
    file_name: &str,
    thermo: &'a Th,
) -> Result<Kinetics<'a, Th>, LoadError> {
    LoadData::new(file_name.to_string())
        .load_mechanism()?
        .build_kinetics(thermo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::kinetics_errors::MechanismError;
    use crate::Kinetics::rate_laws::RateLaw;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SPECIES: &str = r#"{"species": [
        {"name": "N2", "T": [300.0, 1000.0, 5000.0],
         "low": [3.298677, 0.0014082404, -3.963222e-06, 5.641515e-09, -2.444854e-12, -1020.8999, 3.950372],
         "high": [2.92664, 0.0014879768, -5.68476e-07, 1.0097038e-10, -6.753351e-15, -922.7977, 5.980528]},
        {"name": "N", "T": [200.0, 1000.0, 6000.0],
         "low": [2.5, 0.0, 0.0, 0.0, 0.0, 56104.637, 4.1939087],
         "high": [2.4159429, 0.00017489065, -1.1902369e-07, 3.0226245e-11, -2.0360982e-15, 56133.773, 4.6496096]},
        {"name": "Ar", "T": [200.0, 1000.0, 6000.0],
         "low": [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366],
         "high": [2.5, 0.0, 0.0, 0.0, 0.0, -745.375, 4.366]}
    ]}"#;

    const MECHANISM: &str = r#"{
        "name": "nitrogen",
        "species": ["N2", "N"],
        "arrhenius_units": {"A": "cm-mol-s", "E": "K"},
        "settings": {"validate_mechanism": true},
        "reactions": [
            {"formula": "N2 + M = 2N + M",
             "arrhenius": {"A": 7.0e21, "n": -1.6, "E": 113200.0},
             "efficiencies": {"N": 4.2857}},
            {"formula": "2N => N2",
             "arrhenius": [1.0e22, -1.6, 0.0]}
        ]
    }"#;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn species_data() -> NasaSpeciesList {
        serde_json::from_str(SPECIES).unwrap()
    }

    #[test]
    fn test_parse_mechanism() {
        let mechanism = parse_mechanism(MECHANISM).unwrap();
        assert_eq!(mechanism.name.as_deref(), Some("nitrogen"));
        assert_eq!(mechanism.reactions.len(), 2);
        assert!(mechanism.settings.validate_mechanism);
        assert_eq!(mechanism.settings.duplicate_tolerance, 1e-10);
        assert_eq!(
            mechanism.reactions[1].arrhenius.parameters(),
            (1.0e22, -1.6, 0.0)
        );

        let reactions = mechanism.reactions().unwrap();
        assert!(reactions[0].is_thirdbody());
        assert_eq!(reactions[0].efficiencies(), &[("N".to_string(), 4.2857)]);
        let RateLaw::Arrhenius(rate) = reactions[0].rate_law();
        // bimolecular in SI: cm^3 -> m^3
        assert_relative_eq!(rate.pre_exponential_factor(), 7.0e15, max_relative = 1e-12);
        assert_eq!(rate.t_a, 113200.0);
        let RateLaw::Arrhenius(rate) = reactions[1].rate_law();
        assert_relative_eq!(rate.pre_exponential_factor(), 1.0e16, max_relative = 1e-12);
    }

    #[test]
    fn test_load_and_build() {
        let mech_file = temp_file(MECHANISM);
        let species_file = temp_file(SPECIES);
        let mechanism = LoadData::new(mech_file.path().to_str().unwrap().to_string())
            .load_mechanism()
            .unwrap();
        let data = LoadData::new(species_file.path().to_str().unwrap().to_string())
            .load_species()
            .unwrap();
        assert_eq!(data.species.len(), 3);
        // the mechanism picks its own species, in its own order
        let mixture = mechanism.mixture(data).unwrap();
        assert_eq!(mixture.n_species(), 2);
        assert_eq!(mixture.species_name(1), "N");

        let mut kinetics = load_mechanism(mech_file.path().to_str().unwrap(), &mixture).unwrap();
        assert!(kinetics.is_closed());
        assert_eq!(kinetics.n_reactions(), 2);
        let wdot = kinetics.net_production_rates_vec(6000.0, &[1.0, 0.0]).unwrap();
        assert!(wdot[0] < 0.0);
        assert_relative_eq!(wdot[0], -wdot[1], max_relative = 1e-12);
    }

    #[test]
    fn test_defaults() {
        let mechanism = parse_mechanism(
            r#"{"reactions": [{"formula": "N2 => 2N", "arrhenius": {"A": 2.0}}]}"#,
        )
        .unwrap();
        assert_eq!(mechanism.units().unwrap(), ArrheniusUnits::default());
        assert!(mechanism.species.is_none());
        let reactions = mechanism.reactions().unwrap();
        let RateLaw::Arrhenius(rate) = reactions[0].rate_law();
        assert_relative_eq!(rate.pre_exponential_factor(), 2.0);
        assert_eq!((rate.n, rate.t_a), (0.0, 0.0));
        // no species list: every record of the data file
        assert_eq!(mechanism.mixture(species_data()).unwrap().n_species(), 3);
    }

    #[test]
    fn test_malformed_root() {
        for text in [
            "[1, 2]",
            r#"{"name": "empty"}"#,
            r#"{"reactions": {"formula": "A => B"}}"#,
        ] {
            assert!(matches!(parse_mechanism(text), Err(LoadError::MalformedRoot)));
        }
        // a well-formed root with a bad record is reported where the record is
        let text = "{\n  \"reactions\": [\n    {\"formula\": 3, \"arrhenius\": [1.0, 0.0, 0.0]}\n  ]\n}";
        match parse_mechanism(text) {
            Err(LoadError::Json(e)) => assert_eq!(e.line(), 3),
            other => panic!("expected a JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error() {
        let text = "{\n  \"reactions\": [\n    {\"formula\": \"N2 => 2N\",, }\n  ]\n}";
        match parse_mechanism(text) {
            Err(LoadError::Json(e)) => assert_eq!(e.line(), 3),
            other => panic!("expected a JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_units_declarations() {
        let twice = r#"{
            "arrhenius_units": {"A": "cm-mol-s", "E": "K"},
            "arrhenius_units": {"A": "m-mol-s", "E": "K"},
            "reactions": []
        }"#;
        let mechanism = parse_mechanism(twice).unwrap();
        assert!(matches!(mechanism.units(), Err(LoadError::DuplicateUnits)));
        assert!(matches!(mechanism.reactions(), Err(LoadError::DuplicateUnits)));

        let late = r#"{
            "reactions": [],
            "arrhenius_units": {"A": "cm-mol-s", "E": "kcal-mol"}
        }"#;
        let mechanism = parse_mechanism(late).unwrap();
        assert!(matches!(mechanism.units(), Err(LoadError::UnitsAfterReactions)));

        let bad = r#"{"arrhenius_units": {"A": "ft-mol-s"}, "reactions": []}"#;
        let mechanism = parse_mechanism(bad).unwrap();
        assert!(matches!(
            mechanism.units(),
            Err(LoadError::Units(RateLawError::UnknownUnit { .. }))
        ));
    }

    #[test]
    fn test_bad_reactions() {
        let mechanism = parse_mechanism(
            r#"{"reactions": [
                {"formula": "N2 => 2N", "arrhenius": [1.0, 0.0, 0.0]},
                {"formula": "N2 + N", "arrhenius": [1.0, 0.0, 0.0]}
            ]}"#,
        )
        .unwrap();
        let err = mechanism.reactions().unwrap_err();
        assert!(matches!(
            err,
            LoadError::Formula { index: 1, source: FormulaError::MissingArrow(_) }
        ));
        assert!(err.to_string().starts_with("reaction 2:"));

        let mechanism = parse_mechanism(
            r#"{"reactions": [{"formula": "N2 => 2N", "arrhenius": [-1.0, 0.0, 0.0]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            mechanism.reactions(),
            Err(LoadError::RateLaw { index: 0, .. })
        ));
    }

    #[test]
    fn test_validation_failure_surfaces() {
        let mixture = parse_mechanism(MECHANISM)
            .unwrap()
            .mixture(species_data())
            .unwrap();
        let mechanism = parse_mechanism(
            r#"{"reactions": [{"formula": "N2 => N", "arrhenius": [1.0, 0.0, 0.0]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            mechanism.build_kinetics(&mixture),
            Err(LoadError::Kinetics(KineticsError::Mechanism(MechanismError::Invalid(_))))
        ));
    }

    #[test]
    fn test_missing_files_and_species() {
        assert!(matches!(
            LoadData::new("no/such/mechanism.json".to_string()).load_mechanism(),
            Err(LoadError::FileNotFound(_))
        ));
        let mechanism = parse_mechanism(
            r#"{"species": ["N2", "O2"], "reactions": []}"#,
        )
        .unwrap();
        assert!(matches!(
            mechanism.mixture(species_data()),
            Err(LoadError::MissingSpeciesData(name)) if name == "O2"
        ));
    }
}
