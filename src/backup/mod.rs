pub mod dump;
pub mod fleet;
pub mod fs;
pub mod purge;

#[cfg(test)]
pub(crate) mod testing;

pub use fleet::{run_fleet, Mode};
