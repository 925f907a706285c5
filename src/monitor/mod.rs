mod history;
mod record;
mod runner;

pub use history::RunHistory;
pub use record::EpochRecord;
pub use runner::{Monitor, MonitorConfig, RunSummary};
