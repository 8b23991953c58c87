use super::*;
use ndarray::Array2;

/// Upper bound on blind resampling before falling back to scanning the free cells.
pub const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Uniformly random placement over the free cells, seeded for reproducibility.
#[derive(Clone, Debug)]
pub struct RandomFoodPlacer {
    rng: rand::rngs::SmallRng,
}

impl RandomFoodPlacer {
    pub fn new(seed: u64) -> Self {
        use rand::prelude::*;

        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl FoodPlacer for RandomFoodPlacer {
    fn place(&mut self, occupied: &Array2<bool>) -> Option<Cell> {
        use rand::prelude::*;

        let (size_x, size_y) = occupied.dim();
        if size_x == 0 || size_y == 0 {
            return None;
        }

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let x = self.rng.random_range(0..size_x);
            let y = self.rng.random_range(0..size_y);
            if !occupied[[x, y]] {
                return Some((Coord::try_from(x).ok()?, Coord::try_from(y).ok()?));
            }
        }

        // crowded board, pick among what is actually left
        let free_count = free_cells(occupied).count();
        if free_count == 0 {
            log::warn!("No free cell left for food on a {}x{} board", size_x, size_y);
            return None;
        }
        log::debug!(
            "Food resampling exhausted after {} attempts, choosing among {} free cells",
            MAX_SAMPLE_ATTEMPTS,
            free_count
        );
        let pick = self.rng.random_range(0..free_count);
        free_cells(occupied).nth(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_returns_an_occupied_cell() {
        let mut occupied = Array2::from_elem([6, 6], false);
        for x in 0..6 {
            for y in 0..5 {
                occupied[[x, y]] = true;
            }
        }

        let mut placer = RandomFoodPlacer::new(7);
        for _ in 0..200 {
            let (x, y) = placer.place(&occupied).unwrap();
            assert!(!occupied[(x, y).to_nd_index()]);
            assert_eq!(y, 5);
        }
    }

    #[test]
    fn finds_the_single_free_cell() {
        let mut occupied = Array2::from_elem([20, 20], true);
        occupied[[13, 2]] = false;

        let mut placer = RandomFoodPlacer::new(1);
        assert_eq!(placer.place(&occupied), Some((13, 2)));
    }

    #[test]
    fn full_board_yields_none() {
        let occupied = Array2::from_elem([4, 4], true);
        let mut placer = RandomFoodPlacer::new(3);
        assert_eq!(placer.place(&occupied), None);
    }

    #[test]
    fn same_seed_same_sequence() {
        let occupied = Array2::from_elem([20, 20], false);
        let mut a = RandomFoodPlacer::new(42);
        let mut b = RandomFoodPlacer::new(42);
        for _ in 0..10 {
            assert_eq!(a.place(&occupied), b.place(&occupied));
        }
    }
}
