#![warn(clippy::all)]

mod bitplane;
mod board;
mod chunk;
mod coords;
mod rule;

pub use bitplane::BitPlane;
pub use board::Board;
pub use chunk::{Border, Chunk, Direction, CHUNK_SIZE};
pub use coords::{chunk_and_local, split_axis, wrap_point};
pub use rule::RuleTable;

pub const VERSION: &str = "0.1.0";
