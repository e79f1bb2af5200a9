use std::io::{self, BufRead, Write};

pub struct ShellPrompt {
    prompt: String,
    max_line: usize,
}

impl ShellPrompt {
    pub fn new(prompt: &str, max_line: usize) -> Self {
        ShellPrompt {
            prompt: prompt.to_string(),
            max_line,
        }
    }

    pub fn show_prompt(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(self.prompt.as_bytes())?;
        out.flush()
    }

    pub fn read_line(&self) -> io::Result<Option<String>> {
        self.read_line_from(&mut io::stdin().lock())
    }

    /// Reads one line, drops the terminator and cuts it to `max_line` bytes.
    /// `None` means end of input.
    pub fn read_line_from<R: BufRead>(&self, reader: &mut R) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        let bytes_read = reader.read_until(b'\n', &mut buf)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        let mut line = String::from_utf8_lossy(&buf).into_owned();
        if line.len() > self.max_line {
            log::warn!("line truncated to {} bytes", self.max_line);
            let mut cut = self.max_line;
            while !line.is_char_boundary(cut) {
                cut -= 1;
            }
            line.truncate(cut);
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_until_eof() {
        let prompt = ShellPrompt::new(">>> ", 100);
        let mut input = Cursor::new("echo a\nls | wc\nlast");
        assert_eq!(prompt.read_line_from(&mut input).unwrap(), Some("echo a".to_string()));
        assert_eq!(prompt.read_line_from(&mut input).unwrap(), Some("ls | wc".to_string()));
        assert_eq!(prompt.read_line_from(&mut input).unwrap(), Some("last".to_string()));
        assert_eq!(prompt.read_line_from(&mut input).unwrap(), None);
    }

    #[test]
    fn test_blank_line_is_not_eof() {
        let prompt = ShellPrompt::new("", 100);
        let mut input = Cursor::new("\n");
        assert_eq!(prompt.read_line_from(&mut input).unwrap(), Some(String::new()));
    }

    #[test]
    fn test_long_line_is_truncated() {
        let prompt = ShellPrompt::new("", 8);
        let mut input = Cursor::new("echo 0123456789\necho ok\n");
        assert_eq!(prompt.read_line_from(&mut input).unwrap(), Some("echo 012".to_string()));
        assert_eq!(prompt.read_line_from(&mut input).unwrap(), Some("echo ok".to_string()));
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let prompt = ShellPrompt::new("", 6);
        let mut input = Cursor::new("echo é\n");
        // "echo é" is 7 bytes; the two-byte char cannot be split.
        assert_eq!(prompt.read_line_from(&mut input).unwrap(), Some("echo ".to_string()));
    }
}
