pub mod run;
pub mod summary;

pub use run::RunMetrics;
pub use summary::RunSummary;
