//! The Poseidon permutation and its sponge mode.

mod parameters;
pub mod permutation;
mod sponge;
mod state;

pub use parameters::Parameters;
pub use permutation::{permute, RoundKind};
pub use sponge::{run_hash, Digest, DuplexSpongeMode, Sponge};
pub use state::State;

#[cfg(test)]
mod tests;
