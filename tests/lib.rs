/// Main test module that includes all sub-modules
/// Run specific tests with `cargo test <module>::<submodule>`
/// For example: `cargo test simulation::pipeline_test`
// Utility modules
pub mod utils;

// Data generation and persistence
pub mod data {
    pub mod parquet_test;
}

// Monte Carlo loop
pub mod simulation {
    pub mod pipeline_test;
}

// Time-varying treatment demonstration
pub mod longitudinal {
    pub mod gformula_test;
}
