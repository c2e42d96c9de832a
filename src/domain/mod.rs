pub mod models;

pub use models::{HistoryRecord, PlayerId, PlayerRecord};
