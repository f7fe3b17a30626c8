use std::cell::RefCell;
use std::io::{self, Write as _};
use std::rc::Rc;

/// Trait for handling output from the printing words (`show`, `peek`,
/// `show.repr`, `peek.repr`, `show.scopes`) and the `input` prompt.
///
/// Implement this to capture or redirect interpreter output. The default
/// implementation [`StdPrint`] writes to stdout.
pub trait PrintWriter {
    /// Writes text without a trailing newline (used for the `input`
    /// prompt).
    fn write_text(&mut self, text: &str);

    /// Writes one line of output, terminated with a newline.
    fn write_line(&mut self, line: &str) {
        self.write_text(line);
        self.write_text("\n");
    }
}

/// Default `PrintWriter` that writes to stdout, flushing after every write
/// so prompts appear before blocking reads.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn write_text(&mut self, text: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

/// A `PrintWriter` that collects all output into a shared string buffer.
///
/// Cloning shares the buffer, so a test can hand one handle to the
/// interpreter and keep another to read the output afterwards.
#[derive(Debug, Clone, Default)]
pub struct CollectStringPrint(Rc<RefCell<String>>);

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything written so far.
    #[must_use]
    pub fn output(&self) -> String {
        self.0.borrow().clone()
    }
}

impl PrintWriter for CollectStringPrint {
    fn write_text(&mut self, text: &str) {
        self.0.borrow_mut().push_str(text);
    }
}

/// `PrintWriter` that ignores all output.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn write_text(&mut self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_writer_shares_its_buffer() {
        let collect = CollectStringPrint::new();
        let mut handle = collect.clone();
        handle.write_line("first");
        handle.write_text("second");
        assert_eq!(collect.output(), "first\nsecond");
    }
}
