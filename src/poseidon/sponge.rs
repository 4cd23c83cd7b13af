use std::ops::Index;

use crate::error::SpongeError;
use crate::field::FieldElement;
use crate::poseidon::{Parameters, State};

/// The sponge's phase, tracking the next rate position to use.
///
/// The transition from absorbing to squeezing is one-way: it applies the
/// padding rule, and absorbing afterwards is rejected because interleaving
/// the phases breaks the construction's security argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplexSpongeMode {
    /// The sponge is accepting input.
    Absorbing {
        /// Next rate position an absorbed element is added into.
        next_absorb_index: usize,
    },
    /// The sponge is emitting output.
    Squeezing {
        /// Next rate position to be read out.
        next_squeeze_index: usize,
    },
}

/// A hash digest: an owned copy of squeezed field elements, in emission
/// order, with no further relationship to the sponge that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digest(Vec<FieldElement>);

impl Digest {
    /// The digest elements in emission order.
    pub fn elements(&self) -> &[FieldElement] {
        &self.0
    }

    /// Consumes the digest, yielding its elements.
    pub fn into_elements(self) -> Vec<FieldElement> {
        self.0
    }

    /// Number of elements in the digest.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the digest holds no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for Digest {
    type Output = FieldElement;

    fn index(&self, index: usize) -> &FieldElement {
        &self.0[index]
    }
}

impl IntoIterator for Digest {
    type Item = FieldElement;
    type IntoIter = std::vec::IntoIter<FieldElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Digest {
    type Item = &'a FieldElement;
    type IntoIter = std::slice::Iter<'a, FieldElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A sponge over the Poseidon permutation.
///
/// Input is added into the rate portion of the state (positions
/// `[0, rate)`), with the permutation invoked each time a full rate block has
/// been injected. The first squeeze pads the input (a single `1` element
/// followed by the implicit zero-fill of the remaining block) and permutes;
/// output is then read from the rate portion, permuting again for every
/// additional block requested.
///
/// Each sponge exclusively owns its state. Many sponges may share one
/// [`Parameters`] concurrently, but a single sponge must only ever be driven
/// by one logical caller.
#[derive(Clone, Debug)]
pub struct Sponge<'a> {
    /// The underlying sponge state.
    pub state: State<'a>,
    /// Current mode (whether it is absorbing or squeezing).
    pub mode: DuplexSpongeMode,
    parameters: &'a Parameters,
}

impl<'a> Sponge<'a> {
    /// Creates a sponge with an all-zero state, ready to absorb.
    pub fn new(parameters: &'a Parameters) -> Self {
        Self {
            state: State::new(parameters),
            mode: DuplexSpongeMode::Absorbing {
                next_absorb_index: 0,
            },
            parameters,
        }
    }

    /// Absorbs a sequence of field elements.
    ///
    /// Fails with [`SpongeError::InvalidSpongeState`] once squeezing has
    /// begun, and with [`SpongeError::TypeMismatch`] if any element belongs
    /// to a different field than the sponge's parameter set — elements are
    /// never coerced. Both checks run before any state mutation, so a failed
    /// call leaves the sponge unchanged.
    pub fn absorb(&mut self, elements: &[FieldElement]) -> Result<(), SpongeError> {
        let mut index = match self.mode {
            DuplexSpongeMode::Absorbing { next_absorb_index } => next_absorb_index,
            DuplexSpongeMode::Squeezing { .. } => return Err(SpongeError::InvalidSpongeState),
        };
        let probe = self.parameters.element(0u8);
        if elements.iter().any(|element| !element.same_field(&probe)) {
            return Err(SpongeError::TypeMismatch);
        }

        let rate = self.parameters.rate();
        for element in elements {
            self.state[index] += element;
            index += 1;
            if index == rate {
                self.state.permute();
                index = 0;
            }
        }
        self.mode = DuplexSpongeMode::Absorbing {
            next_absorb_index: index,
        };
        Ok(())
    }

    /// Squeezes exactly `count` field elements, in emission order.
    ///
    /// The first call pads the absorbed input and transitions the sponge to
    /// squeezing; later calls continue emitting from where the previous one
    /// stopped. `squeeze(0)` still performs that transition and returns an
    /// empty digest. The permutation runs exactly once per additional rate
    /// block of output requested.
    pub fn squeeze(&mut self, count: usize) -> Result<Digest, SpongeError> {
        let mut index = match self.mode {
            DuplexSpongeMode::Absorbing { next_absorb_index } => {
                self.pad_and_permute(next_absorb_index);
                0
            }
            DuplexSpongeMode::Squeezing { next_squeeze_index } => next_squeeze_index,
        };

        let rate = self.parameters.rate();
        let mut output = Vec::with_capacity(count);
        for _ in 0..count {
            if index == rate {
                self.state.permute();
                index = 0;
            }
            output.push(self.state[index].clone());
            index += 1;
        }
        self.mode = DuplexSpongeMode::Squeezing {
            next_squeeze_index: index,
        };
        Ok(Digest(output))
    }

    // 10* padding: a single `1` marker is added into the next rate position
    // and the rest of the block is left as the implicit zero fill. The marker
    // is appended even when the input ended on a block boundary, which keeps
    // the padded block sequence injective across distinct input lengths.
    fn pad_and_permute(&mut self, next_absorb_index: usize) {
        let marker = self.parameters.element(1u8);
        self.state[next_absorb_index] += &marker;
        self.state.permute();
        tracing::trace!(next_absorb_index, "sponge padded; entering squeeze phase");
    }
}

/// Hashes `inputs` in one call: a fresh sponge absorbs everything and
/// squeezes the digest width configured on `parameters`.
pub fn run_hash(parameters: &Parameters, inputs: &[FieldElement]) -> Result<Digest, SpongeError> {
    let mut sponge = Sponge::new(parameters);
    sponge.absorb(inputs)?;
    sponge.squeeze(parameters.digest_elements())
}
