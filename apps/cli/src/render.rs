//! Plain-text rendering of view-model state for the terminal.

use chrono::NaiveDateTime;
use client_core::{ClientError, ListView, SortColumn, SortDirection, SortState};
use shared::domain::{Todo, TodoStatus, UserProfile};

pub const SIGN_IN_PLACEHOLDER: &str = "Sign In to use Todos";

/// User-facing text for a failed command. A missing or refused token
/// points the user at signing in instead of echoing the backend.
pub fn error_text(err: &ClientError) -> String {
    if err.needs_sign_in() {
        SIGN_IN_PLACEHOLDER.to_string()
    } else {
        err.display_message()
    }
}

const DUE_TIME_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Normalizes a due time to the `YYYY-MM-DDTHH:MM` form the backend stores.
pub fn parse_due_time(raw: &str) -> Result<String, String> {
    DUE_TIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .map(|due| due.format("%Y-%m-%dT%H:%M").to_string())
        .ok_or_else(|| format!("invalid due time '{raw}', expected YYYY-MM-DDTHH:MM"))
}

pub fn parse_status(raw: &str) -> Result<TodoStatus, String> {
    TodoStatus::parse(raw).ok_or_else(|| {
        format!(
            "unknown status '{raw}', expected one of: {}",
            TodoStatus::ALL.map(TodoStatus::as_str).join(", ")
        )
    })
}

fn header_cell(column: SortColumn, sort: SortState) -> String {
    if column != sort.column {
        return column.label().to_string();
    }
    let arrow = match sort.direction {
        SortDirection::Asc => '↑',
        SortDirection::Desc => '↓',
    };
    format!("{} {arrow}", column.label())
}

fn cell(todo: &Todo, column: SortColumn) -> &str {
    column.key(todo)
}

pub fn render_list(view: &ListView<'_>, sort: SortState) -> String {
    let rows = match view {
        ListView::SignInRequired => return SIGN_IN_PLACEHOLDER.to_string(),
        ListView::Table(rows) => rows,
    };

    let headers: Vec<String> = SortColumn::ALL
        .iter()
        .map(|column| header_cell(*column, sort))
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for todo in rows.iter() {
        for (idx, column) in SortColumn::ALL.iter().enumerate() {
            widths[idx] = widths[idx].max(cell(todo, *column).chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().map(String::as_str), &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, separator.iter().map(String::as_str), &widths);

    for todo in rows.iter() {
        push_row(
            &mut out,
            SortColumn::ALL.iter().map(|column| cell(todo, *column)),
            &widths,
        );
    }
    if rows.is_empty() {
        out.push_str("(no todos)\n");
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(text, width)| {
            let pad = width.saturating_sub(text.chars().count());
            format!("{text}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn render_profile(profile: &UserProfile) -> String {
    format!(
        "Last Name:  {}\nFirst Name: {}\nEmail:      {}\n",
        profile.name, profile.firstname, profile.email
    )
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
