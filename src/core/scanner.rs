//! SIMD-accelerated delimiter scanning using memchr
//!
//! Works on `&str` input but searches bytes: every delimiter it looks for is
//! ASCII, so every position it returns is a valid char boundary.

use memchr::memchr;

/// Scanner for XML delimiter detection over one content segment
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get a slice from start to end positions
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Get the input from a position to the end
    #[inline]
    pub fn tail(&self, start: usize) -> &'a str {
        &self.input[start..]
    }

    /// Find next '<' (tag start) using SIMD
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        self.find_byte_from(b'<', self.pos)
    }

    /// Find next '>' at or after `from`
    ///
    /// Quotes are not tracked: attribute values are always written with `>`
    /// escaped, so the first '>' ends the tag.
    #[inline]
    pub fn find_tag_end(&self, from: usize) -> Option<usize> {
        self.find_byte_from(b'>', from)
    }

    #[inline]
    fn find_byte_from(&self, byte: u8, from: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        if from > bytes.len() {
            return None;
        }
        memchr(byte, &bytes[from..]).map(|i| from + i)
    }

    /// Find the `</name` that closes an element named `name` whose opening
    /// tag ended just before `from`
    ///
    /// The name must be followed by a boundary (`>`, `/`, whitespace or end of
    /// input), so `</ab>` never closes `<a>`. Nested openings of the same name
    /// that are not self-closing are counted, so `<a><a></a></a>` pairs up.
    /// Returns the position of the `<` of the closing marker.
    pub fn find_closing_tag(&self, name: &str, from: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut depth = 0usize;
        let mut pos = from;

        while let Some(lt) = self.find_byte_from(b'<', pos) {
            let after = lt + 1;
            pos = after;

            let (closing, name_start) = if bytes.get(after) == Some(&b'/') {
                (true, after + 1)
            } else {
                (false, after)
            };
            if !bytes[name_start..].starts_with(name.as_bytes())
                || !is_name_boundary(bytes.get(name_start + name.len()).copied())
            {
                continue;
            }

            if closing {
                if depth == 0 {
                    return Some(lt);
                }
                depth -= 1;
            } else {
                // Same-name opening tag: only a container if not self-closing
                let gt = self.find_tag_end(name_start)?;
                if bytes[gt - 1] != b'/' {
                    depth += 1;
                }
                pos = gt + 1;
            }
        }
        None
    }
}

/// Byte that may legally follow a tag name inside `<name` / `</name`
#[inline]
fn is_name_boundary(b: Option<u8>) -> bool {
    match b {
        None => true,
        Some(b) => matches!(b, b'>' | b'/') || b.is_ascii_whitespace(),
    }
}
