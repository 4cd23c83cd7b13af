use std::sync::Arc;

use num_bigint::BigUint;

use crate::error::InvalidParametersError;
use crate::field::FieldElement;
use crate::poseidon::permutation::RoundKind;

/// Parameters describing a Poseidon instance over `F_p`.
///
/// A parameter set is validated once at construction, immutable afterwards,
/// and safely shared read-only across any number of concurrent sponge
/// sessions. Construction is the expensive step (the constant tables are
/// reduced into the field); amortize it by reusing one instance across many
/// hash computations.
///
/// # Caller-guaranteed preconditions
///
/// These determine cryptographic security and are not checked at runtime:
///
/// * `modulus` is prime and large enough for the target security level;
/// * `gcd(alpha, p - 1) = 1`, so the S-box `x ↦ x^alpha` is a bijection;
/// * every square submatrix of `mds` is non-singular.
#[derive(Clone, Debug)]
pub struct Parameters {
    modulus: Arc<BigUint>,
    security_level: usize,
    alpha: u64,
    rate: usize,
    width: usize,
    full_rounds: usize,
    partial_rounds: usize,
    round_constants: Vec<Vec<FieldElement>>,
    mds: Vec<Vec<FieldElement>>,
    // Partial rounds occupy `partial_start..partial_end` in the schedule.
    // Fixed by `full_rounds`/`partial_rounds` at construction, never
    // re-derived per round.
    partial_start: usize,
    partial_end: usize,
    digest_elements: usize,
    optimize_sbox_layer: bool,
}

impl Parameters {
    /// Builds a parameter set from externally supplied data.
    ///
    /// `round_constants` must hold `full_rounds + partial_rounds` rows of
    /// `width` entries each, and `mds` must be a `width × width` matrix; both
    /// are treated as opaque precomputed data and reduced modulo `p`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        modulus: BigUint,
        security_level: usize,
        alpha: u64,
        rate: usize,
        width: usize,
        full_rounds: usize,
        partial_rounds: usize,
        round_constants: Vec<Vec<BigUint>>,
        mds: Vec<Vec<BigUint>>,
    ) -> Result<Self, InvalidParametersError> {
        if rate == 0 || rate >= width {
            return Err(InvalidParametersError::RateOutOfRange { rate, width });
        }
        if full_rounds % 2 != 0 {
            return Err(InvalidParametersError::OddFullRounds { full_rounds });
        }
        let total_rounds = full_rounds + partial_rounds;
        if round_constants.len() != total_rounds {
            return Err(InvalidParametersError::RoundConstantCount {
                expected: total_rounds,
                actual: round_constants.len(),
            });
        }
        for (row, constants) in round_constants.iter().enumerate() {
            if constants.len() != width {
                return Err(InvalidParametersError::RoundConstantWidth {
                    row,
                    expected: width,
                    actual: constants.len(),
                });
            }
        }
        if mds.len() != width {
            return Err(InvalidParametersError::MdsRowCount {
                width,
                rows: mds.len(),
            });
        }
        for (row, entries) in mds.iter().enumerate() {
            if entries.len() != width {
                return Err(InvalidParametersError::MdsRowWidth {
                    row,
                    expected: width,
                    actual: entries.len(),
                });
            }
        }

        let modulus = Arc::new(modulus);
        let reduce_rows = |rows: Vec<Vec<BigUint>>| -> Vec<Vec<FieldElement>> {
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|entry| FieldElement::new(entry, Arc::clone(&modulus)))
                        .collect()
                })
                .collect()
        };
        let round_constants = reduce_rows(round_constants);
        let mds = reduce_rows(mds);

        let partial_start = full_rounds / 2;
        let partial_end = partial_start + partial_rounds;
        let modulus_bits = modulus.bits().max(1) as usize;
        let digest_elements = ((security_level + modulus_bits - 1) / modulus_bits).max(1);

        tracing::debug!(
            width,
            rate,
            alpha,
            full_rounds,
            partial_rounds,
            security_level,
            digest_elements,
            "constructed Poseidon parameter set"
        );

        Ok(Self {
            modulus,
            security_level,
            alpha,
            rate,
            width,
            full_rounds,
            partial_rounds,
            round_constants,
            mds,
            partial_start,
            partial_end,
            digest_elements,
            optimize_sbox_layer: false,
        })
    }

    /// Selects the batched S-box exponentiation path.
    ///
    /// Both paths compute `x^alpha` exactly; this only changes how the
    /// exponentiation is carried out, never the digest.
    pub fn with_optimized_sbox_layer(mut self, enabled: bool) -> Self {
        self.optimize_sbox_layer = enabled;
        self
    }

    /// The field modulus `p`.
    pub fn modulus(&self) -> &Arc<BigUint> {
        &self.modulus
    }

    /// The targeted security level in bits (informational; sizes the
    /// [`run_hash`](crate::poseidon::run_hash) digest).
    pub fn security_level(&self) -> usize {
        self.security_level
    }

    /// The S-box exponent.
    pub fn alpha(&self) -> u64 {
        self.alpha
    }

    /// Number of state cells exposed to input and output.
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Number of hidden state cells (`width - rate`).
    pub fn capacity(&self) -> usize {
        self.width - self.rate
    }

    /// The state width `t`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of full rounds `R_f` (split in half around the partial rounds).
    pub fn full_rounds(&self) -> usize {
        self.full_rounds
    }

    /// Number of partial rounds `R_p`.
    pub fn partial_rounds(&self) -> usize {
        self.partial_rounds
    }

    /// Total round count `R_f + R_p`.
    pub fn total_rounds(&self) -> usize {
        self.full_rounds + self.partial_rounds
    }

    /// Number of field elements a [`run_hash`](crate::poseidon::run_hash)
    /// digest carries for this parameter set.
    pub fn digest_elements(&self) -> usize {
        self.digest_elements
    }

    /// Whether the batched S-box exponentiation path is selected.
    pub fn optimize_sbox_layer(&self) -> bool {
        self.optimize_sbox_layer
    }

    /// The constants added at the start of the given round.
    pub fn round_constants(&self, round: usize) -> &[FieldElement] {
        &self.round_constants[round]
    }

    /// The mixing matrix, row-major.
    pub fn mds(&self) -> &[Vec<FieldElement>] {
        &self.mds
    }

    /// Classifies a round index as full or partial.
    pub fn round_kind(&self, round: usize) -> RoundKind {
        if (self.partial_start..self.partial_end).contains(&round) {
            RoundKind::Partial
        } else {
            RoundKind::Full
        }
    }

    /// The full round schedule, in execution order.
    pub fn schedule(&self) -> impl Iterator<Item = RoundKind> + '_ {
        (0..self.total_rounds()).map(|round| self.round_kind(round))
    }

    /// Binds an integer to this parameter set's field.
    pub fn element(&self, value: impl Into<BigUint>) -> FieldElement {
        FieldElement::new(value, Arc::clone(&self.modulus))
    }
}
