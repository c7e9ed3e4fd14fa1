//! Windowed aggregation and drift detection over the prediction log.

pub mod config;
pub mod distribution;
pub mod drift;
pub mod monitor;
pub mod report;
pub mod statistics;
pub mod window;

pub use config::MonitorConfig;
pub use distribution::{distribution, Distribution};
pub use drift::{compare_distributions, ShiftReport};
pub use monitor::SentimentMonitor;
pub use report::{render_report, Report};
pub use statistics::{compute_statistics, WindowStatistics};
