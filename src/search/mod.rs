//! Exhaustive model search: subset enumeration, parallel fan-out, ranking

mod combinations;
mod driver;
mod ranker;

pub use combinations::FeatureCombinations;
pub use driver::{ModelSearchDriver, SearchOutcome, SkippedPair};
pub use ranker::RankedResultSet;
