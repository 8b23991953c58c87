use crate::*;
use ndarray::Array2;
pub use random::*;

mod random;

/// Chooses where the next piece of food goes.
///
/// `occupied` is indexed `[x, y]` and marks every cell covered by the snake. Implementations must
/// never return an occupied cell, and return `None` only when no free cell is left.
pub trait FoodPlacer {
    fn place(&mut self, occupied: &Array2<bool>) -> Option<Cell>;
}

impl<P: FoodPlacer + ?Sized> FoodPlacer for &mut P {
    fn place(&mut self, occupied: &Array2<bool>) -> Option<Cell> {
        (**self).place(occupied)
    }
}

pub(crate) fn free_cells(occupied: &Array2<bool>) -> impl Iterator<Item = Cell> + '_ {
    occupied
        .indexed_iter()
        .filter(|&(_, &taken)| !taken)
        .filter_map(|((x, y), _)| Some((Coord::try_from(x).ok()?, Coord::try_from(y).ok()?)))
}
