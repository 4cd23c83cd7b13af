//! The Hades round function: AddRoundConstant, S-box, MixLayer.

use crate::error::StateLengthMismatchError;
use crate::field::FieldElement;
use crate::poseidon::Parameters;

/// How many state cells receive the non-linear S-box step in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundKind {
    /// Every cell passes through `x ↦ x^alpha`.
    Full,
    /// Only `state[0]` passes through `x ↦ x^alpha`.
    Partial,
}

/// Applies the permutation to a state of exactly `params.width()` elements.
///
/// The schedule runs `R_f / 2` full rounds, then `R_p` partial rounds, then
/// the remaining `R_f / 2` full rounds. The computation is deterministic and
/// pure: the only failure mode is a state slice of the wrong width, which
/// signals a bug in the caller rather than a runtime condition.
pub fn permute(
    params: &Parameters,
    state: &mut [FieldElement],
) -> Result<(), StateLengthMismatchError> {
    if state.len() != params.width() {
        return Err(StateLengthMismatchError {
            expected: params.width(),
            actual: state.len(),
        });
    }
    permute_unchecked(params, state);
    Ok(())
}

/// The round loop, for callers that guarantee the state width structurally.
pub(crate) fn permute_unchecked(params: &Parameters, state: &mut [FieldElement]) {
    for round in 0..params.total_rounds() {
        apply_round_constants(params, state, round);
        apply_sbox(params, state, params.round_kind(round));
        apply_mds(params, state);
    }
}

fn apply_round_constants(params: &Parameters, state: &mut [FieldElement], round: usize) {
    for (cell, constant) in state.iter_mut().zip(params.round_constants(round)) {
        *cell += constant;
    }
}

fn apply_sbox(params: &Parameters, state: &mut [FieldElement], kind: RoundKind) {
    match kind {
        RoundKind::Full => {
            for cell in state.iter_mut() {
                *cell = sbox(params, cell);
            }
        }
        RoundKind::Partial => {
            state[0] = sbox(params, &state[0]);
        }
    }
}

fn sbox(params: &Parameters, cell: &FieldElement) -> FieldElement {
    // The batched path expands the exponentiation into an addition chain,
    // saving the generic modpow setup in the common alpha = 5 instances.
    // Both paths compute exactly x^alpha.
    if params.optimize_sbox_layer() && params.alpha() == 5 {
        let squared = cell * cell;
        let fourth = &squared * &squared;
        &fourth * cell
    } else {
        cell.pow(params.alpha())
    }
}

fn apply_mds(params: &Parameters, state: &mut [FieldElement]) {
    let mut mixed = Vec::with_capacity(state.len());
    for row in params.mds() {
        let mut acc = params.element(0u8);
        for (entry, cell) in row.iter().zip(state.iter()) {
            acc += &(entry * cell);
        }
        mixed.push(acc);
    }
    state.clone_from_slice(&mixed);
}
