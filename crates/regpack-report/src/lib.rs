//! Reporting layer for register allocations.
//!
//! Renders allocations as text tables, markdown, utilization bars, and the
//! persisted JSON record, and compares packing strategies over one field set.

pub mod compare;
pub mod error;
pub mod format;
pub mod record;
pub mod report;
pub mod timing;
pub mod view;

pub use compare::{best, compare_strategies, render_comparison, StrategyComparison};
pub use error::ReportError;
pub use format::{bar_chart, format_time_ns};
pub use record::{AllocationRecord, MappingRecord, SummaryRecord};
pub use report::{AllocationReport, RegisterUsage, Summary};
pub use timing::{timing_rows, timing_table, TimingRow};
pub use view::{render, ReportFormat};
