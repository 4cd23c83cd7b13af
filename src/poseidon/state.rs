use std::ops::{Index, IndexMut};
use std::slice::SliceIndex;

use crate::field::FieldElement;
use crate::poseidon::{permutation, Parameters};

/// A raw Poseidon state, with direct access to the permutation.
///
/// This is a lower-level API than [`Sponge`](crate::poseidon::Sponge), which
/// drives the state through the absorb/squeeze protocol. The rate portion is
/// positions `[0, rate)`; the capacity portion `[rate, width)` is never
/// touched by input or output.
///
/// A new all-zero state is constructed from a borrowed [`Parameters`] with
/// [`State::new`]. Cells can be read and written through [`Index`] and
/// [`IndexMut`] or [`AsRef`] and [`AsMut`]; the length is fixed at
/// construction and never changes.
#[derive(Clone, Debug)]
pub struct State<'a> {
    // Box<[_]> rather than Vec<_> because the state is not resizable.
    elements: Box<[FieldElement]>,
    parameters: &'a Parameters,
}

impl<'a> State<'a> {
    /// Creates a state of `width` additive identities.
    pub fn new(parameters: &'a Parameters) -> Self {
        let elements = vec![parameters.element(0u8); parameters.width()].into_boxed_slice();
        Self {
            elements,
            parameters,
        }
    }

    /// Runs the permutation, updating the state in place.
    pub fn permute(&mut self) {
        // The width invariant is structural here, so the checked entry point
        // in `permutation` is not needed.
        permutation::permute_unchecked(self.parameters, &mut self.elements);
    }

    /// The parameter set this state is bound to.
    pub fn parameters(&self) -> &'a Parameters {
        self.parameters
    }

    /// Number of state cells exposed to input and output.
    pub fn rate(&self) -> usize {
        self.parameters.rate()
    }

    /// Number of hidden state cells.
    pub fn capacity(&self) -> usize {
        self.parameters.capacity()
    }
}

impl<'a, I> Index<I> for State<'a>
where
    I: SliceIndex<[FieldElement]>,
{
    type Output = <I as SliceIndex<[FieldElement]>>::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        self.elements.index(index)
    }
}

impl<'a, I> IndexMut<I> for State<'a>
where
    I: SliceIndex<[FieldElement]>,
{
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        self.elements.index_mut(index)
    }
}

impl<'a> AsRef<[FieldElement]> for State<'a> {
    #[inline]
    fn as_ref(&self) -> &[FieldElement] {
        self.elements.as_ref()
    }
}

impl<'a> AsMut<[FieldElement]> for State<'a> {
    #[inline]
    fn as_mut(&mut self) -> &mut [FieldElement] {
        self.elements.as_mut()
    }
}
