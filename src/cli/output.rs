//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use anyhow::Result;
use serde::Serialize;
use survey_query::{
    Column, CommentReport, FlyerReport, Guidance, Intent, QueryResponse, QueryResult, StoreSummary,
    SurveyRecord, VisitReport,
};

/// Widest a table cell may get before it is truncated.
const MAX_CELL_WIDTH: usize = 40;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a query response.
pub fn print_query_response(response: &QueryResponse, json: bool) -> Result<()> {
    if json {
        return print_json(response);
    }

    if let Some(error) = &response.error {
        println!("Error: {}", error);
        return Ok(());
    }

    match &response.result {
        Some(QueryResult::NotVisited(report)) => print_visit_report(report),
        Some(QueryResult::NoFlyer(report)) => print_flyer_report(report),
        Some(QueryResult::FlyerComments(report)) => print_comment_report(report),
        Some(QueryResult::Unrecognized(guidance)) => print_examples(guidance, false)?,
        None => {}
    }
    Ok(())
}

fn print_visit_report(report: &VisitReport) {
    println!("{}", Intent::NotVisited.display_name());
    println!("{}", "=".repeat(40));
    println!("Not Visited:      {} of {}", report.matched_count, report.total);
    println!("Completion Rate:  {:.1}%", report.rate);
    println!();

    if report.stores.is_empty() {
        println!("All stores have been visited!");
    } else {
        println!("{} Stores Awaiting Visits", report.matched_count);
        print_table(&report.columns, &report.stores);
    }
}

fn print_flyer_report(report: &FlyerReport) {
    println!("{}", Intent::NoFlyer.display_name());
    println!("{}", "=".repeat(40));
    println!(
        "No Flyer:                 {} of {}",
        report.matched_count, report.responses
    );
    println!("Flyer Availability Rate:  {:.1}%", report.rate);
    println!();
    println!(
        "Flyer compliance is {} at {:.1}%",
        report.band.as_str(),
        report.rate
    );
    println!();

    if report.stores.is_empty() {
        println!("All stores have flyers!");
    } else {
        println!("{} Stores Missing Flyers", report.matched_count);
        print_table(&report.columns, &report.stores);
    }
}

fn print_comment_report(report: &CommentReport) {
    println!("{}", Intent::SummarizeFlyerComments.display_name());
    println!("{}", "=".repeat(40));
    println!(
        "Stores with Flyer Comments: {} of {}",
        report.matched_count, report.total
    );
    println!();

    if report.comments.is_empty() {
        println!("No comments found regarding flyers.");
        return;
    }

    if !report.top_terms.is_empty() {
        println!("Common Themes in Flyer Comments");
        println!("Most frequently mentioned terms:");
        for entry in &report.top_terms {
            let bar = "\u{2588}".repeat((entry.share_of_corpus / 2.0) as usize);
            println!(
                "  {}: {} mentions {} ({:.1}%)",
                entry.term, entry.count, bar, entry.share_of_corpus
            );
        }
        println!();
    }

    println!("All Flyer Comments");
    println!("{}", "-".repeat(40));
    for record in &report.comments {
        let name = record.value(Column::SiteName).unwrap_or_default();
        println!("{} (Code: {})", name, record.site_code);
        if let Some(comment) = record.value(Column::FlyerComment) {
            println!("  \"{}\"", comment.trim());
        }
    }
}

/// Print the example questions.
pub fn print_examples(guidance: &Guidance, json: bool) -> Result<()> {
    if json {
        return print_json(guidance);
    }

    println!("{}", guidance.message);
    for example in &guidance.examples {
        println!("  - \"{}\"", example);
    }
    Ok(())
}

/// Print the loaded extract overview.
pub fn print_store_summary(summary: &StoreSummary, json: bool) -> Result<()> {
    if json {
        return print_json(summary);
    }

    println!("Survey Data");
    println!("{}", "=".repeat(40));
    println!("Rows:          {}", summary.rows);
    match (summary.first_activity, summary.last_activity) {
        (Some(first), Some(last)) => println!("Activity:      {} to {}", first, last),
        _ => println!("Activity:      no dated rows"),
    }
    println!("Undated rows:  {}", summary.undated_rows);
    println!();
    println!("Columns:");
    for header in &summary.present_columns {
        println!("  + {}", header);
    }
    for header in &summary.missing_columns {
        println!("  - {} (missing)", header);
    }
    Ok(())
}

fn print_table(columns: &[Column], rows: &[SurveyRecord]) {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| fit_cell(&row.value(*c).unwrap_or_default()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.label().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column.label().to_uppercase(), width = width))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

/// Collapse line breaks and truncate long values.
fn fit_cell(value: &str) -> String {
    let flat = value.replace(['\r', '\n'], " ");
    if flat.chars().count() > MAX_CELL_WIDTH {
        let head: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        flat
    }
}
