pub mod space;

pub use space::{FloorType, OccupancyStatus};
