use alloc::vec::Vec;

use super::*;

/// Uniform placement over every cell except the safe cell and its neighbors.
///
/// Shuffle-and-take: a partial Fisher-Yates pass over the candidate cells, so each layout with the
/// requested mine count is equally likely. Seeded, so the same seed and safe cell give the same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    safe: Coord2,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, safe: Coord2) -> Self {
        Self { seed, safe }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        config.validate()?;
        let (rows, cols) = config.size;
        if self.safe.0 >= rows || self.safe.1 >= cols {
            return Err(GameError::InvalidPosition);
        }

        let mut candidates: Vec<Coord2> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .filter(|&pos| !is_within_one(pos, self.safe))
            .collect();

        // validation leaves at least one candidate more than there are mines
        let mines = usize::from(config.mines);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in 0..mines {
            let pick = rng.random_range(i..candidates.len());
            candidates.swap(i, pick);
        }

        let layout = MineLayout::from_mine_coords(config.size, &candidates[..mines])?;
        log::debug!(
            "Generated {:?} with {} mines, safe around {:?}, seed {}",
            config.size,
            layout.mine_count(),
            self.safe,
            self.seed
        );
        Ok(layout)
    }
}
