pub mod store;

pub use store::{PairingReport, SnapshotStore};
