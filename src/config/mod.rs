pub mod settings;

pub use settings::{AppConfig, ByePriority, Disparity, PairingSettings, ShortfallPolicy, SnapshotSettings};
