/// Largest hook output kept in a stored verdict.
pub const MAX_OUTPUT_BYTES: usize = 10 * 1024;

/// Largest hook output quoted in an error message.
pub const ERROR_OUTPUT_BYTES: usize = 1024;

pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Cut `s` to at most `max` bytes on a character boundary, appending
/// [`TRUNCATION_MARKER`] when anything was dropped.
pub fn truncate_output(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{TRUNCATION_MARKER}", &s[..end])
}

/// Combined stdout/stderr of one hook run, bounded in memory.
#[derive(Debug)]
pub(crate) struct OutputCapture {
    buf:       String,
    limit:     usize,
    truncated: bool,
}

impl OutputCapture {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            buf: String::new(),
            limit,
            truncated: false,
        }
    }

    pub(crate) fn push_line(&mut self, line: &str) {
        if self.truncated {
            return;
        }
        if self.buf.len() == self.limit {
            self.truncated = true;
            return;
        }
        let room = self.limit - self.buf.len();
        if line.len() < room {
            self.buf.push_str(line);
            self.buf.push('\n');
            return;
        }
        if line.len() == room {
            // Fills the capture exactly; only the newline is lost.
            self.buf.push_str(line);
            return;
        }
        let mut end = room;
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.push_str(&line[..end]);
        self.truncated = true;
    }

    pub(crate) fn is_full(&self) -> bool {
        self.truncated
    }

    pub(crate) fn finish(&self) -> String {
        if self.truncated {
            format!("{}{TRUNCATION_MARKER}", self.buf)
        } else {
            self.buf.clone()
        }
    }
}

/// Splits a byte stream into lines on `\n`, `\r` or `\r\n`.
///
/// A line longer than `max_line` bytes is emitted in `max_line` pieces, so
/// memory stays bounded whatever the producer writes.
#[derive(Debug)]
pub(crate) struct LineSplitter {
    pending:  Vec<u8>,
    max_line: usize,
    after_cr: bool,
}

impl LineSplitter {
    pub(crate) fn new(max_line: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line,
            after_cr: false,
        }
    }

    pub(crate) fn feed(&mut self, mut chunk: &[u8], mut emit: impl FnMut(&[u8])) {
        if self.after_cr && chunk.first() == Some(&b'\n') {
            chunk = &chunk[1..];
        }
        self.after_cr = false;

        while !chunk.is_empty() {
            let room = self.max_line - self.pending.len();
            match chunk.iter().take(room + 1).position(|b| *b == b'\n' || *b == b'\r') {
                Some(i) => {
                    self.pending.extend_from_slice(&chunk[..i]);
                    emit(&self.pending);
                    self.pending.clear();
                    let cr = chunk[i] == b'\r';
                    let step = if cr && chunk.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    self.after_cr = cr && i + 1 == chunk.len();
                    chunk = &chunk[i + step..];
                }
                None if chunk.len() > room => {
                    self.pending.extend_from_slice(&chunk[..room]);
                    emit(&self.pending);
                    self.pending.clear();
                    chunk = &chunk[room..];
                }
                None => {
                    self.pending.extend_from_slice(chunk);
                    chunk = &[];
                }
            }
        }
    }

    /// Emit whatever follows the last line break.
    pub(crate) fn finish(&mut self, mut emit: impl FnMut(&[u8])) {
        if !self.pending.is_empty() {
            emit(&self.pending);
            self.pending.clear();
        }
    }
}
