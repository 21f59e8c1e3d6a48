//! Query surface: filters plus the facade that runs clustering and
//! similarity ranking over store snapshots.

mod facade;
mod filter;

pub use facade::{QueryFacade, StoreStats};
pub use filter::EntityFilter;
