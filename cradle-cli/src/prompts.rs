//! Output helpers shared by commands.

use dialoguer::console::style;
use std::io::{self, Write};

const HEADER_WIDTH: usize = 60;

/// Draws a boxed header with the given title.
pub fn print_header(title: &str) -> io::Result<()> {
    print_header_to(&mut io::stdout().lock(), title)
}

/// Draws a boxed header to a writer (for testing).
pub fn print_header_to<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    let border = "─".repeat(HEADER_WIDTH);
    writeln!(w, "┌{}┐", border)?;
    writeln!(w, "│ {:<width$} │", title, width = HEADER_WIDTH - 2)?;
    writeln!(w, "└{}┘", border)?;
    writeln!(w)?;
    Ok(())
}

/// Prints a success message with a green checkmark.
pub fn print_success(message: &str) -> io::Result<()> {
    print_success_to(&mut io::stdout().lock(), message)
}

/// Prints a success message to a writer (for testing).
pub fn print_success_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        style("✓").green().bold(),
        style(message).green()
    )
}

/// Prints a failure message with a red X.
pub fn print_error(message: &str) -> io::Result<()> {
    print_error_to(&mut io::stdout().lock(), message)
}

/// Prints a failure message to a writer (for testing).
pub fn print_error_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", style("✗").red().bold(), style(message).red())
}

/// Prints a warning with a yellow marker.
pub fn print_warning(message: &str) -> io::Result<()> {
    print_warning_to(&mut io::stdout().lock(), message)
}

/// Prints a warning to a writer (for testing).
pub fn print_warning_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", style("!").yellow().bold(), style(message).yellow())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_header_draws_box_with_title() {
        let mut output = Vec::new();
        print_header_to(&mut output, "LLM Provider Status").unwrap();
        let result = String::from_utf8(output).unwrap();

        assert!(result.contains("┌"), "Missing top-left corner");
        assert!(result.contains("┘"), "Missing bottom-right corner");
        assert!(result.contains("LLM Provider Status"), "Missing title");
    }

    #[test]
    fn print_header_pads_title_to_width() {
        let mut output = Vec::new();
        print_header_to(&mut output, "Short").unwrap();
        let result = String::from_utf8(output).unwrap();

        let lines: Vec<&str> = result.lines().collect();
        assert!(lines.len() >= 3, "Header should have at least 3 lines");
        assert_eq!(
            lines[0].chars().filter(|&c| c == '─').count(),
            HEADER_WIDTH,
            "Border should be {} chars wide",
            HEADER_WIDTH
        );
    }

    #[test]
    fn print_success_shows_checkmark() {
        let mut output = Vec::new();
        print_success_to(&mut output, "Set Ollama (Local) as default provider").unwrap();
        let result = String::from_utf8(output).unwrap();
        assert!(result.contains("✓"));
        assert!(result.contains("Set Ollama (Local) as default provider"));
    }

    #[test]
    fn print_error_and_warning_markers() {
        let mut output = Vec::new();
        print_error_to(&mut output, "Not available").unwrap();
        print_warning_to(&mut output, "This will cost real money").unwrap();
        let result = String::from_utf8(output).unwrap();
        assert!(result.contains("✗"));
        assert!(result.contains("!"));
        assert!(result.contains("This will cost real money"));
    }
}
