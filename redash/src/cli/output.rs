//! Terminal output formatting
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print usage hint (yellow "usage:" prefix) to stderr
pub fn usage(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "usage".yellow(), msg);
}

/// Render a value as JSON indented by four spaces
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Print a value as indented JSON to stdout
pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", render_json(value)?);
    Ok(())
}
