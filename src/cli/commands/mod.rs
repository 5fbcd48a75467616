//! Command execution functions for installer operations.

mod install;
mod place;
mod signals;

pub use install::install;
pub use place::place;
pub use signals::Shutdown;
