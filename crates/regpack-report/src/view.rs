//! Output format selection.

use crate::error::{ReportError, Result};
use crate::report::AllocationReport;

/// How an allocation report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Table,
    Markdown,
    Json,
    Bars,
}

impl ReportFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "table" | "text" | "ascii" => Ok(ReportFormat::Table),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            "bars" | "utilization" => Ok(ReportFormat::Bars),
            _ => Err(ReportError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Table => "table",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
            ReportFormat::Bars => "bars",
        }
    }
}

/// Render a report in the requested format.
pub fn render(report: &AllocationReport<'_>, format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Table => report.table(),
        ReportFormat::Markdown => report.markdown(),
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Bars => report.utilization_bars(),
    })
}
