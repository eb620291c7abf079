/// Bytes sent to the device for one invocation
///
/// The words are joined by single spaces and terminated by one newline.
/// Argument text is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    bytes: Vec<u8>,
}

impl Command {
    /// Build a command from its words
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let len = words.iter().map(|w| w.as_ref().len() + 1).sum();
        let mut bytes = Vec::with_capacity(len);
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                bytes.push(b' ');
            }
            bytes.extend_from_slice(word.as_ref().as_bytes());
        }
        bytes.push(b'\n');
        Self { bytes }
    }

    /// Full byte sequence, trailing newline included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether `line` contains the command's echo
    pub fn is_echoed_by(&self, line: &[u8]) -> bool {
        line.windows(self.bytes.len()).any(|window| window == self.bytes)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes).trim_end_matches('\n'))
    }
}
