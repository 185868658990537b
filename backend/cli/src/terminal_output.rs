//! Terminal output helpers: ANSI formatting and note printing.

use std::io::Write;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

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

/// Print a formatted INFO note to stdout.
pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

/// Print a formatted WARNING note.
pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

/// Print a formatted ERROR note.
pub fn note_error(msg: &str) {
    if supports_color() {
        println!("{RED}{BOLD}✖{RESET} {msg}");
    } else {
        println!("ERROR: {msg}");
    }
}

/// Print the assistant's final response.
pub fn note_response(msg: &str) {
    if supports_color() {
        println!("\n{GREEN}{BOLD}assistant{RESET} {msg}");
    } else {
        println!("\nassistant: {msg}");
    }
}

/// Print the input prompt without a trailing newline and flush.
pub fn prompt(label: &str) {
    if supports_color() {
        print!("\n{BOLD}{label}{RESET} ");
    } else {
        print!("\n{label} ");
    }
    let _ = std::io::stdout().flush();
}
