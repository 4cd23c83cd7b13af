//! A sponge construction over the Poseidon permutation, for prime fields
//! whose modulus is chosen at runtime.
//!
//! The crate covers the hash core only: field arithmetic, the Hades
//! full/partial round structure, the `x ↦ x^alpha` S-box, the MDS mixing
//! layer, and the absorb/squeeze sponge protocol with injective padding.
//! Round constants and the mixing matrix are consumed as opaque precomputed
//! data; generating them, and every protocol built on top of the hash, is out
//! of scope.
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use poseidon_sponge::{run_hash, Parameters};
//!
//! // A toy instance over F_17. Real instances use a large prime modulus and
//! // published constant tables.
//! let constants = vec![vec![BigUint::from(0u8); 3]; 5];
//! let mds = vec![
//!     vec![BigUint::from(1u8), BigUint::from(0u8), BigUint::from(0u8)],
//!     vec![BigUint::from(0u8), BigUint::from(1u8), BigUint::from(0u8)],
//!     vec![BigUint::from(0u8), BigUint::from(0u8), BigUint::from(1u8)],
//! ];
//! let params = Parameters::new(BigUint::from(17u8), 4, 5, 2, 3, 4, 1, constants, mds)?;
//!
//! let digest = run_hash(&params, &[params.element(1u8), params.element(2u8)])?;
//! assert_eq!(digest, run_hash(&params, &[params.element(1u8), params.element(2u8)])?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(
    missing_docs,
    non_shorthand_field_patterns,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts
)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod poseidon;

pub use error::{FieldError, InvalidParametersError, SpongeError, StateLengthMismatchError};
pub use field::FieldElement;
pub use poseidon::{run_hash, Digest, DuplexSpongeMode, Parameters, Sponge, State};
