use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Change notifications for the presentation layer, emitted in the order they happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CellChanged { pos: Coord2, view: CellView },
    StatusChanged { status: GameStatus },
    CountersChanged {
        moves: u32,
        flags: CellCount,
        mines_left: i32,
    },
    Tick { elapsed: Duration },
}
