//! Terminal output utilities: notes, table rendering and the view/row
//! renderers for each output format.

use std::sync::atomic::{AtomicBool, Ordering};

use clap::ValueEnum;

use hostwatch_core::{DisplayTuple, QueryView, ViewState};

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm'
            for next in chars.by_ref() {
                if next == 'm' { break; }
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Drop control characters from service-supplied text so it cannot move the
/// cursor or recolor the terminal.
pub fn sanitize_cell(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

static NOTES_ON_STDERR: AtomicBool = AtomicBool::new(false);

/// Send every note to stderr, leaving stdout to machine-readable output.
pub fn notes_to_stderr(enabled: bool) {
    NOTES_ON_STDERR.store(enabled, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream { Stdout, Stderr }

fn note_stream(is_error: bool) -> Stream {
    if is_error || NOTES_ON_STDERR.load(Ordering::Relaxed) {
        Stream::Stderr
    } else {
        Stream::Stdout
    }
}

fn emit(is_error: bool, colored: String, plain: String) {
    let line = if supports_color() { colored } else { plain };
    match note_stream(is_error) {
        Stream::Stdout => println!("{line}"),
        Stream::Stderr => eprintln!("{line}"),
    }
}

/// Print a formatted INFO note.
pub fn note_info(msg: &str) {
    emit(false, format!("{CYAN}{BOLD}ℹ{RESET} {msg}"), format!("INFO: {msg}"));
}

/// Print a formatted WARNING note.
pub fn note_warn(msg: &str) {
    emit(false, format!("{YELLOW}{BOLD}⚠{RESET} {msg}"), format!("WARN: {msg}"));
}

/// Print a formatted ERROR note. Always stderr.
pub fn note_error(msg: &str) {
    emit(true, format!("{RED}{BOLD}✗{RESET} {msg}"), format!("ERROR: {msg}"));
}

/// Print a formatted SUCCESS note.
pub fn note_success(msg: &str) {
    emit(false, format!("{GREEN}{BOLD}✓{RESET} {msg}"), format!("OK: {msg}"));
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Column alignment.
pub enum Align { Left, Right }

/// A table column definition.
pub struct Column {
    pub header: String,
    pub align: Align,
}

impl Column {
    pub fn left(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Left }
    }
    pub fn right(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Right }
    }
}

fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Render a table with given columns and rows.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let num_cols = columns.len();
    let mut widths: Vec<usize> = columns.iter().map(|c| visible_width(&c.header)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(num_cols) {
            widths[i] = widths[i].max(visible_width(cell));
        }
    }

    let (bold, reset) = if supports_color() { (BOLD, RESET) } else { ("", "") };
    let mut out = String::new();

    let header_cells: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| pad_cell(&col.header, widths[i], &col.align))
        .collect();
    out.push_str(&format!("{bold}  {}  {reset}\n", header_cells.join("  ")));

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}  \n", sep.join("  ")));

    for row in rows {
        let cells: Vec<String> = (0..num_cols)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                pad_cell(cell, widths[i], &columns[i].align)
            })
            .collect();
        out.push_str(&format!("  {}  \n", cells.join("  ")));
    }

    out
}

fn pad_cell(s: &str, width: usize, align: &Align) -> String {
    let pad = width.saturating_sub(visible_width(s));
    match align {
        Align::Left => format!("{s}{}", " ".repeat(pad)),
        Align::Right => format!("{}{s}", " ".repeat(pad)),
    }
}

// ---------------------------------------------------------------------------
// View and row renderers
// ---------------------------------------------------------------------------

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    /// Inventory cards as an HTML fragment
    Html,
}

/// One line describing who is logged in, if anyone.
pub fn describe_view(view: &ViewState) -> String {
    match view {
        ViewState::LoggedOut => "Not logged in.".to_string(),
        ViewState::Admin { username } => {
            format!("Logged in as {} (admin).", sanitize_cell(username))
        }
        ViewState::NoPrivilege { display_identity } => format!(
            "Logged in as {}. This account has no administrative privileges.",
            sanitize_cell(display_identity)
        ),
    }
}

pub fn print_view(view: &ViewState, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
        OutputFormat::Table | OutputFormat::Html => match view {
            ViewState::LoggedOut => note_info(&describe_view(view)),
            ViewState::Admin { .. } => note_success(&describe_view(view)),
            ViewState::NoPrivilege { .. } => note_warn(&describe_view(view)),
        },
    }
    Ok(())
}

pub fn render_rows_table(rows: &[DisplayTuple]) -> String {
    let columns = [
        Column::left("NAME"),
        Column::left("ADDRESS"),
        Column::right("ID"),
    ];
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![sanitize_cell(&r.name), sanitize_cell(&r.address), sanitize_cell(&r.id)])
        .collect();
    render_table(&columns, &cells)
}

/// Cards in the layout of the web dashboard. Tuple values arrive escaped
/// and are inserted as-is.
pub fn render_rows_html(rows: &[DisplayTuple]) -> String {
    if rows.is_empty() {
        return "<div class=\"no-results\">No computers found</div>\n".to_string();
    }
    let mut out = String::new();
    for row in rows {
        out.push_str("<div class=\"computer-card\">\n");
        out.push_str(&format!("  <h3>{}</h3>\n", row.name));
        out.push_str(&format!(
            "  <p><strong>IP Address:</strong> <span class=\"ip\">{}</span></p>\n",
            row.address
        ));
        out.push_str(&format!("  <p><strong>ID:</strong> {}</p>\n", row.id));
        out.push_str("</div>\n");
    }
    out
}

pub fn print_query_view(view: &QueryView, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
        OutputFormat::Html => {
            if let Some(notice) = &view.notice {
                note_warn(&sanitize_cell(notice));
            }
            print!("{}", render_rows_html(&view.rows));
        }
        OutputFormat::Table => {
            if let Some(notice) = &view.notice {
                note_warn(&sanitize_cell(notice));
            }
            if view.rows.is_empty() {
                if view.notice.is_none() {
                    note_info("No computers found.");
                }
            } else {
                print!("{}", render_rows_table(&view.rows));
                if supports_color() {
                    println!("{DIM}  {} row(s){RESET}", view.rows.len());
                } else {
                    println!("  {} row(s)", view.rows.len());
                }
            }
        }
    }
    Ok(())
}
