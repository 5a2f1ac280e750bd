//! Synthetic data: the generative model, replicate tables, the population
//! generator and Parquet persistence.

pub mod generator;
pub mod io;
pub mod model;
pub mod population;
pub mod table;

pub use generator::PopulationGenerator;
pub use io::{read_population, unit_record_schema, write_population};
pub use model::{
    ExposureAssignment, GenerativeModel, OutcomeKind, TRUE_EFFECT, UnitRecord, columns,
};
pub use population::Population;
pub use table::{DataTable, Replicate};
