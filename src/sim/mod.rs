/// Simulation layer: level store, collectible ledger, the per-tick step
/// functions, and flat-file persistence.

pub mod event;
pub mod ledger;
pub mod level;
pub mod save;
pub mod session;
pub mod step;
