/// reading of mechanism and species-data JSON files
pub mod load_from_file;
