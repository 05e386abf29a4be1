//! Model fitting

mod linear;

pub use linear::LinearRegression;
