pub mod location;
pub mod slot_grid;

pub use location::CourtLocation;
pub use slot_grid::SlotGridService;
