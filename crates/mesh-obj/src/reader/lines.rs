//! Logical line iteration with `\` continuation.

use std::io::BufRead;

use tracing::warn;

use crate::error::ObjResult;

/// One logical line: trimmed text and the number of its first physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
    pub number: usize,
    pub text: String,
}

/// Iterator over the logical lines of a reader.
pub(crate) struct LogicalLines<R> {
    reader: R,
    physical: usize,
    done: bool,
}

impl<R: BufRead> LogicalLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            physical: 0,
            done: false,
        }
    }

    /// Read one physical line without its line terminator.
    fn read_physical(&mut self) -> ObjResult<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.physical += 1;
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(Some(buf))
    }

    fn next_logical(&mut self) -> ObjResult<Option<LogicalLine>> {
        let Some(first) = self.read_physical()? else {
            return Ok(None);
        };
        let number = self.physical;
        let mut text = first.trim().to_string();

        while text.ends_with('\\') {
            // Drop the marker and the separator character in front of it.
            text.pop();
            text.pop();
            match self.read_physical()? {
                Some(next) => {
                    text.push(' ');
                    text.push_str(next.trim());
                }
                None => {
                    warn!(
                        "Input ended during a line continuation started at line {}; discarding it",
                        number
                    );
                    return Ok(None);
                }
            }
        }

        Ok(Some(LogicalLine { number, text }))
    }
}

impl<R: BufRead> Iterator for LogicalLines<R> {
    type Item = ObjResult<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_logical() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
