//! modelsweep - Exhaustive regression model search over game telemetry
//!
//! Enumerates every feature-subset candidate model up to a size cap,
//! evaluates each under multiple seeded train/test splits, ranks the results
//! by R², rehydrates the ranked models into capped per-point prediction
//! samples, and persists a multi-table result store for an external
//! visualization consumer.
//!
//! # Modules
//!
//! - [`dataset`] - Immutable tabular dataset with a designated target column
//! - [`config`] - Explicit run parameters (candidates, splits, seed, caps)
//! - [`preprocessing`] - Train-statistics standardization
//! - [`training`] - Ordinary least squares fitting
//! - [`evaluation`] - Seeded splits, per-pair evaluation, test metrics
//! - [`search`] - Subset enumeration, parallel fan-out, ranking
//! - [`sampling`] - Capped, reproducible prediction sampling
//! - [`store`] - Atomic persistence of the result tables and document
//! - [`sweep`] - End-to-end orchestration
//! - [`cli`] - Command-line surface

pub mod error;

pub mod config;
pub mod dataset;
pub mod evaluation;
pub mod preprocessing;
pub mod sampling;
pub mod search;
pub mod store;
pub mod sweep;
pub mod training;

pub mod cli;

pub use error::{Result, SweepError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::SweepConfig;
    pub use crate::dataset::Dataset;
    pub use crate::error::{Result, SweepError};
    pub use crate::evaluation::{ModelResult, RegressionMetrics, SplitEvaluator, SplitSpec};
    pub use crate::preprocessing::Standardizer;
    pub use crate::sampling::{PredictionRecord, PredictionSampler};
    pub use crate::search::{
        FeatureCombinations, ModelSearchDriver, RankedResultSet, SearchOutcome,
    };
    pub use crate::store::{ResultStoreWriter, RunMetadata, StorePaths};
    pub use crate::sweep::{SweepReport, SweepRunner};
    pub use crate::training::LinearRegression;
}
