use lazy_static::lazy_static;
use primer_checks::LengthBands;

pub mod about;
pub mod analysis;
pub mod binding;
pub mod dimer;
pub mod dna_sequence;
pub mod engine;
pub mod error;
pub mod hairpin;
pub mod parameters;
pub mod primer;
pub mod primer_checks;
pub mod primer_set;
pub mod primer_split;
pub mod report_export;

pub use lampcheck_protocol::{DimerRecord, HairpinResult, HalfRole, Orientation, Span};

lazy_static! {
    // Recommended primer lengths per role
    pub static ref LENGTH_BANDS: LengthBands = LengthBands::default();
}
