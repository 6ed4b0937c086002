//! Operator interaction used by the interactive flows.
//!
//! The library never talks to a terminal directly. The `cradle` binary
//! supplies a terminal implementation, tests supply a scripted one.

use std::io;

use crate::Error;

/// Line-oriented prompts and output.
pub trait Console {
    /// Print one line of output.
    fn println(&mut self, line: &str) -> io::Result<()>;

    /// Read a line of text. An empty answer yields `default` when given.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool>;

    /// Pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> io::Result<usize>;
}

/// Prompt failure as a crate error. Interrupts become [`Error::Cancelled`].
pub(crate) fn prompt_error(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => Error::Cancelled,
        _ => Error::Io(err),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_prompts_cancel() {
        let err = prompt_error(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert!(matches!(err, Error::Cancelled));

        let err = prompt_error(io::Error::other("tty gone"));
        assert!(matches!(err, Error::Io(_)));
    }
}
