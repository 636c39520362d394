//! Static shared data structures

pub mod catalogue;
pub mod excluded_names;
pub mod languages;
pub mod path_rules;

pub use catalogue::{CatalogueEntry, WELL_KNOWN_SAMPLES};
pub use excluded_names::{EXCLUDED_EXTENSIONS, EXCLUDED_FILENAMES};
pub use languages::{LanguageSpec, LANGUAGE_TABLE};
pub use path_rules::DEFAULT_PATH_RULES;
