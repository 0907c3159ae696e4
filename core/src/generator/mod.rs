use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// Builds a ready-to-play board whose first click at `safe` opens a region.
pub fn generate(config: GameConfig, safe: Coord2, seed: u64) -> Result<Board> {
    RandomLayoutGenerator::new(seed, safe)
        .generate(config)
        .map(Board::new)
}

/// Seed for callers that do not bring their own, taken from the wall clock.
#[cfg(feature = "std")]
pub fn clock_seed() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map_or(0, |since| since.as_nanos() as u64)
}
