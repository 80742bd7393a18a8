//! Check report - star status of every resolved package

use crate::cli::args::OutputFormat;
use crate::error::StarsResult;
use crate::resolve::{ResolutionResult, StarStatus};
use crate::walk::DepthMap;
use console::{measure_text_width, pad_str, Alignment};
use serde::Serialize;

const MARK: &str = "X";
const NOT_APPLICABLE: &str = "n/a";

/// One report line: a result and the depth its package was found at
#[derive(Debug, Serialize)]
pub struct ReportRow<'a> {
    #[serde(flatten)]
    pub result: &'a ResolutionResult,
    pub depth: Option<u32>,
}

/// Rows ordered by depth, then package name
pub fn rows<'a>(results: &'a [ResolutionResult], depths: &DepthMap) -> Vec<ReportRow<'a>> {
    let mut rows: Vec<ReportRow<'a>> = results
        .iter()
        .map(|result| ReportRow {
            result,
            depth: depths.get(&result.package_name.to_lowercase()).copied(),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.depth
            .unwrap_or(u32::MAX)
            .cmp(&b.depth.unwrap_or(u32::MAX))
            .then_with(|| a.result.package_name.cmp(&b.result.package_name))
    });
    rows
}

fn starred_cell(result: &ResolutionResult) -> &'static str {
    match result.star_status {
        StarStatus::Starred => MARK,
        StarStatus::NotStarred => "",
        StarStatus::NotFound | StarStatus::NotAvailable => NOT_APPLICABLE,
    }
}

fn owner_cell(result: &ResolutionResult) -> &'static str {
    match result.is_owned {
        Some(true) => MARK,
        Some(false) => "",
        None => NOT_APPLICABLE,
    }
}

/// Render the rows as a Markdown table; `verbosity` adds Depth (1) and URL (2) columns
pub fn render_table(rows: &[ReportRow<'_>], verbosity: u8) -> String {
    let mut header = vec!["Package", "Repository", "Starred", "Owner"];
    if verbosity >= 1 {
        header.push("Depth");
    }
    if verbosity >= 2 {
        header.push("URL");
    }

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let result = row.result;
            let mut cells = vec![
                result.package_name.clone(),
                result.repository_id.clone(),
                starred_cell(result).to_string(),
                owner_cell(result).to_string(),
            ];
            if verbosity >= 1 {
                cells.push(row.depth.map(|d| d.to_string()).unwrap_or_default());
            }
            if verbosity >= 2 {
                cells.push(result.url.clone().unwrap_or_default());
            }
            cells
        })
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, title)| {
            body.iter()
                .map(|cells| measure_text_width(&cells[i]))
                .chain(std::iter::once(measure_text_width(title)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut out = vec![line(&header)];
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push(format!("| {} |", rule.join(" | ")));
    for cells in &body {
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        out.push(line(&cells));
    }

    out.join("\n")
}

/// Print the report to stdout
pub fn print(
    results: &[ResolutionResult],
    depths: &DepthMap,
    verbosity: u8,
    format: OutputFormat,
) -> StarsResult<()> {
    let rows = rows(results, depths);

    match format {
        OutputFormat::Table => println!("{}", render_table(&rows, verbosity)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    Ok(())
}
