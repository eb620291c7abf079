use crate::core::source::ByteSource;
use crate::domain::error::{McuxeqError, McuxeqResult};
use crate::infrastructure::serial::Port;
use regex::bytes::Regex;
use tracing::debug;

/// Line buffer size, terminator included
pub const LINE_SIZE: usize = 1024;
/// Longest line content that fits in the buffer
pub const MAX_LINE_LEN: usize = LINE_SIZE - 1;

/// What the assembler produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A complete line, `\n` included, `\r` removed
    Line(Vec<u8>),
    /// The prompt matched; the partial line was discarded
    PromptSeen,
}

/// Turns a byte stream into lines, spotting the prompt mid-line
///
/// The prompt is tested against the whole pending line after every byte,
/// so a prompt with no trailing newline still ends the stream.
#[derive(Debug)]
pub struct LineAssembler<'a> {
    prompt: &'a Regex,
    line: Vec<u8>,
}

impl<'a> LineAssembler<'a> {
    pub fn new(prompt: &'a Regex) -> Self {
        Self {
            prompt,
            line: Vec::with_capacity(LINE_SIZE),
        }
    }

    /// Read from `source` until a line completes or the prompt appears
    pub fn next_line<P: Port>(&mut self, source: &mut ByteSource<P>) -> McuxeqResult<LineEvent> {
        loop {
            let byte = source.next_byte()?;
            if let Some(event) = self.push(byte)? {
                return Ok(event);
            }
        }
    }

    /// Feed one byte
    pub fn push(&mut self, byte: u8) -> McuxeqResult<Option<LineEvent>> {
        if byte == b'\r' {
            return Ok(None);
        }
        if self.line.len() >= MAX_LINE_LEN {
            return Err(McuxeqError::LineTooLong {
                limit: MAX_LINE_LEN,
            });
        }

        self.line.push(byte);

        if self.prompt.is_match(&self.line) {
            debug!("Prompt seen, end of data");
            self.line.clear();
            return Ok(Some(LineEvent::PromptSeen));
        }
        if byte == b'\n' {
            let line = std::mem::replace(&mut self.line, Vec::with_capacity(LINE_SIZE));
            return Ok(Some(LineEvent::Line(line)));
        }
        Ok(None)
    }

    /// Bytes of the line currently being assembled
    pub fn pending(&self) -> &[u8] {
        &self.line
    }
}
