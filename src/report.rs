//! Ranked report rendering.
//!
//! A report is a header line `<LABEL>;NUMBER_CERTIFIED_APPLICATIONS;PERCENTAGE`
//! followed by one `<value>;<count>;<percentage>%` line per ranked entry,
//! newline-separated with no trailing newline. Percentages are shares of the
//! column's certified total with one fractional digit.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::{
    config::ReportPlan, engine::CertifiedCounter, io_utils, request::TopCount, schema::Role,
};

pub const REPORT_SEPARATOR: &str = ";";
pub const COUNT_HEADER: &str = "NUMBER_CERTIFIED_APPLICATIONS";
pub const PERCENT_HEADER: &str = "PERCENTAGE";

pub fn format_percentage(count: usize, total: usize) -> String {
    let percentage = if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    };
    format!("{percentage:.1}%")
}

pub fn render_report(label: &str, ranked: &[(String, usize)], total: usize) -> String {
    let mut lines = Vec::with_capacity(ranked.len() + 1);
    lines.push([label, COUNT_HEADER, PERCENT_HEADER].join(REPORT_SEPARATOR));
    for (value, count) in ranked {
        lines.push(format!(
            "{value}{sep}{count}{sep}{percent}",
            sep = REPORT_SEPARATOR,
            percent = format_percentage(*count, total)
        ));
    }
    lines.join("\n")
}

/// Writes the top `top` values of `column` to `path` under `label`.
pub fn write_report(
    counter: &mut CertifiedCounter,
    column: &str,
    path: &Path,
    top: TopCount,
    label: &str,
) -> Result<()> {
    let ranked = counter
        .top_n(column, top.get())
        .with_context(|| format!("Ranking column '{column}'"))?;
    let total = counter.certified_total(column).unwrap_or_default();
    let rendered = render_report(label, &ranked, total);
    io_utils::write_text(path, &rendered)?;
    info!(
        "Wrote {} ranked value(s) of {} to {:?}",
        ranked.len(),
        column.to_uppercase(),
        path
    );
    Ok(())
}

/// Writes every report in `plan`, counting all of their columns in one scan
/// before the first file is written.
pub fn write_plan(counter: &mut CertifiedCounter, plan: &ReportPlan) -> Result<usize> {
    let reports = plan.bind(counter)?;
    let columns = reports
        .iter()
        .map(|report| report.column.clone())
        .collect::<Vec<_>>();
    counter
        .count(columns)
        .with_context(|| format!("Counting certified rows in {:?}", counter.path()))?;
    for report in &reports {
        write_report(
            counter,
            &report.column,
            &report.output,
            report.top,
            &report.label,
        )?;
    }
    Ok(reports.len())
}

pub fn write_role_report(
    counter: &mut CertifiedCounter,
    role: Role,
    path: &Path,
    top: TopCount,
) -> Result<()> {
    let column = counter.column_for(role).to_string();
    write_report(counter, &column, path, top, role.report_label())
}

pub fn write_occupation_report(
    counter: &mut CertifiedCounter,
    path: &Path,
    top: TopCount,
) -> Result<()> {
    write_role_report(counter, Role::Occupation, path, top)
}

pub fn write_state_report(
    counter: &mut CertifiedCounter,
    path: &Path,
    top: TopCount,
) -> Result<()> {
    write_role_report(counter, Role::WorksiteState, path, top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_has_one_fractional_digit() {
        assert_eq!(format_percentage(2, 10), "20.0%");
        assert_eq!(format_percentage(1, 3), "33.3%");
        assert_eq!(format_percentage(2, 3), "66.7%");
        assert_eq!(format_percentage(7, 7), "100.0%");
        assert_eq!(format_percentage(0, 0), "0.0%");
    }

    #[test]
    fn render_report_has_no_trailing_newline() {
        let ranked = vec![("FL".to_string(), 2), ("AL".to_string(), 1)];
        let rendered = render_report("TOP_STATES", &ranked, 3);
        assert_eq!(
            rendered,
            "TOP_STATES;NUMBER_CERTIFIED_APPLICATIONS;PERCENTAGE\nFL;2;66.7%\nAL;1;33.3%"
        );
    }

    #[test]
    fn render_report_with_no_entries_is_header_only() {
        assert_eq!(
            render_report("TOP_OCCUPATIONS", &[], 0),
            "TOP_OCCUPATIONS;NUMBER_CERTIFIED_APPLICATIONS;PERCENTAGE"
        );
    }
}
