//! Data preprocessing for model fitting

mod standardizer;

pub use standardizer::Standardizer;
