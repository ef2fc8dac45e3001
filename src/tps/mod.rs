pub mod coefficients;
pub mod kernel;
pub mod solver;

pub use coefficients::*;
pub use kernel::*;
pub use solver::*;
