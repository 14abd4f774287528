//! Command output: aligned tables for people, JSON for scripts.
//!
//! Everything user-facing goes to stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

use serde::Serialize;

/// Where and how command results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON in `--json` mode, otherwise as a table built by
    /// `rows`.
    pub fn show<T, F>(&self, value: &T, headers: &[&str], rows: F)
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> Vec<Vec<String>>,
    {
        if self.json {
            self.print_json(value);
        } else {
            print_table(headers, &rows());
        }
    }

    /// Print a key/value listing of one record.
    pub fn detail<T: Serialize + ?Sized>(&self, value: &T, fields: &[(&str, String)]) {
        if self.json {
            self.print_json(value);
            return;
        }
        let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in fields {
            println!("{key:<width$}  {value}");
        }
    }

    /// Print a one-line confirmation.
    pub fn done(&self, message: &str) {
        if self.json {
            println!("{}", serde_json::json!({ "ok": true, "message": message }));
        } else {
            println!("{message}");
        }
    }

    fn print_json<T: Serialize + ?Sized>(self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(e) => tracing::error!("failed to render JSON output: {e}"),
        }
    }
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(none)");
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!("{}", format_row(headers.iter().copied(), &widths));
    for row in rows {
        println!("{}", format_row(row.iter().map(String::as_str), &widths));
    }
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Render an optional value, `-` when absent.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
