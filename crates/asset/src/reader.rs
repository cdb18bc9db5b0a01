//! Line reader over an in-memory buffer plus the delimiter tokenizer used by
//! both text formats.

/// Longest line the reader hands out; the rest of a longer line is dropped.
pub const MAX_LINE_LEN: usize = 512;

/// Forward-only line reader over a byte buffer.
///
/// Each reader owns its scratch line, so a returned `&str` stays valid until
/// the next call to [`TextReader::read_line`].
#[derive(Debug)]
pub struct TextReader<'a> {
    buf: &'a [u8],
    pos: usize,
    line: String,
}

impl<'a> TextReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            line: String::with_capacity(MAX_LINE_LEN),
        }
    }

    /// Byte offset of the next unread line.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Next line without its `\n`, `\r` or `\r\n` terminator, or `None` once
    /// the buffer is exhausted.
    pub fn read_line(&mut self) -> Option<&str> {
        let buf = self.buf;
        let rest = &buf[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let end = rest
            .iter()
            .position(|&c| c == b'\n' || c == b'\r')
            .unwrap_or(rest.len());

        // Skip the terminator, treating "\r\n" as one.
        let consumed = match rest.get(end) {
            Some(b'\r') if rest.get(end + 1) == Some(&b'\n') => end + 2,
            Some(_) => end + 1,
            None => end,
        };
        self.pos += consumed;

        let kept = if end > MAX_LINE_LEN {
            log::warn!(
                "Line at byte {} is {} bytes long, truncating to {}",
                self.pos - consumed,
                end,
                MAX_LINE_LEN
            );
            MAX_LINE_LEN
        } else {
            end
        };

        self.line.clear();
        self.line.push_str(&String::from_utf8_lossy(&rest[..kept]));
        Some(&self.line)
    }
}

/// Split `line` on `delim`, dropping empty tokens.
pub fn split(line: &str, delim: char) -> Vec<&str> {
    line.split(delim).filter(|token| !token.is_empty()).collect()
}

/// Parse a float field; malformed input reads as 0.
pub(crate) fn parse_f32(token: &str) -> f32 {
    token.parse().unwrap_or_else(|_| {
        log::warn!("Malformed number '{}', using 0", token);
        0.0
    })
}

/// Parse an integer field; malformed input reads as 0.
pub(crate) fn parse_i64(token: &str) -> i64 {
    token.parse().unwrap_or_else(|_| {
        log::warn!("Malformed integer '{}', using 0", token);
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_numbers_read_as_zero() {
        assert_eq!(parse_f32("1.5"), 1.5);
        assert_eq!(parse_f32("-2e1"), -20.0);
        assert_eq!(parse_f32("abc"), 0.0);
        assert_eq!(parse_i64("7"), 7);
        assert_eq!(parse_i64("x"), 0);
    }

    fn all_lines(src: &[u8]) -> Vec<String> {
        let mut reader = TextReader::new(src);
        let mut out = Vec::new();
        while let Some(line) = reader.read_line() {
            out.push(line.to_owned());
        }
        out
    }

    #[test]
    fn strips_all_line_endings() {
        let lines = all_lines(b"a\nb\r\nc\rd");
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn keeps_empty_lines() {
        let lines = all_lines(b"v 1\n\n# note\n");
        assert_eq!(lines, vec!["v 1", "", "# note"]);
    }

    #[test]
    fn empty_buffer_has_no_lines() {
        let mut reader = TextReader::new(b"");
        assert!(reader.read_line().is_none());
        assert!(reader.read_line().is_none());
    }

    #[test]
    fn long_lines_are_truncated() {
        let mut src = vec![b'x'; MAX_LINE_LEN + 40];
        src.extend_from_slice(b"\nnext");
        let lines = all_lines(&src);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), MAX_LINE_LEN);
        assert_eq!(lines[1], "next");
    }

    #[test]
    fn position_is_monotonic() {
        let mut reader = TextReader::new(b"ab\r\ncd\n");
        assert_eq!(reader.position(), 0);
        reader.read_line();
        assert_eq!(reader.position(), 4);
        reader.read_line();
        assert_eq!(reader.position(), 7);
        assert!(reader.read_line().is_none());
        assert_eq!(reader.position(), 7);
    }

    #[test]
    fn split_drops_empty_tokens() {
        assert_eq!(split("v  1.0 2.0   3.0", ' '), vec!["v", "1.0", "2.0", "3.0"]);
        assert_eq!(split("  lead", ' '), vec!["lead"]);
        assert_eq!(split("trail ", ' '), vec!["trail"]);
        assert!(split("", ' ').is_empty());
        assert_eq!(split("1/2/3", '/'), vec!["1", "2", "3"]);
    }
}
