use crate::common::{NonZeroUInt, UInt};
use crate::term::DiceTerm;
use rand::{
    distributions::{DistIter, Distribution, Uniform},
    Rng,
};

/// Source of die faces.
///
/// Every [`Rng`] is a `Roller`; tests plug in a deterministic one.
pub trait Roller {
    type Faces<'a>: Iterator<Item = UInt> + 'a
    where
        Self: 'a;

    /// A uniformly distributed face in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;

    /// One face for each die of `dice`.
    fn roll_dice(&mut self, dice: &DiceTerm) -> Self::Faces<'_>;
}

impl<R: Rng> Roller for R {
    type Faces<'a> = std::iter::Take<DistIter<Uniform<UInt>, &'a mut Self, UInt>>
    where
        Self: 'a;

    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }

    fn roll_dice(&mut self, dice: &DiceTerm) -> Self::Faces<'_> {
        Uniform::new_inclusive(1, dice.sides())
            .sample_iter(self)
            .take(dice.count())
    }
}

pub type DefaultRoller = rand::rngs::ThreadRng;

/// Replays a fixed sequence of faces, cycling when it runs out and wrapping
/// each face into the die's range.
#[cfg(test)]
pub(crate) struct FixedRoller {
    faces: Vec<UInt>,
    next: usize,
}

#[cfg(test)]
impl FixedRoller {
    pub fn new(faces: Vec<UInt>) -> Self {
        assert!(!faces.is_empty());
        Self { faces, next: 0 }
    }

    fn next_face(&mut self, sides: UInt) -> UInt {
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        (face.max(1) - 1) % sides + 1
    }
}

#[cfg(test)]
impl Roller for FixedRoller {
    type Faces<'a> = std::vec::IntoIter<UInt>;

    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.next_face(sides.get())
    }

    fn roll_dice(&mut self, dice: &DiceTerm) -> Self::Faces<'_> {
        let faces: Vec<_> = (0..dice.count())
            .map(|_| self.next_face(dice.sides()))
            .collect();
        faces.into_iter()
    }
}
