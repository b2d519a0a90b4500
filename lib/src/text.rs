use std::ops::Range;

use crate::options::WildcardOptions;

/// An immutable view over a run of text.
///
/// A `TextView` is just a pointer and a length; it never owns the text it
/// points at. Whoever hands out a view is responsible for keeping the backing
/// buffer alive for as long as the view is used. All offsets handled by the
/// scan primitives are byte offsets that fall on character boundaries.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct TextView<'a> {
    text: &'a str,
}

impl<'a> TextView<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Length of the viewed text, in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Narrows the view to the text starting at byte offset `start`.
    pub fn slice_from(&self, start: usize) -> TextView<'a> {
        TextView::new(&self.text[start..])
    }

    pub fn chars(&self) -> std::str::Chars<'a> {
        self.text.chars()
    }

    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    /// Returns the offset one character past `pos`, or the end of the text
    /// when `pos` is at or past the last character.
    pub fn next_char_boundary(&self, pos: usize) -> usize {
        match self.text[pos..].chars().next() {
            Some(c) => pos + c.len_utf8(),
            None => self.text.len(),
        }
    }

    /// Tests whether the view starts with `needle`, comparing characters
    /// under `options`. Returns the number of bytes of this view that the
    /// needle covered, which can differ from `needle.len()` when case
    /// folding crosses byte lengths.
    pub fn starts_with(
        &self,
        needle: &TextView,
        options: &WildcardOptions,
    ) -> Option<usize> {
        let mut chars = self.text.chars();
        let mut consumed = 0;
        for expected in needle.chars() {
            let c = chars.next()?;
            if !options.chars_eq(c, expected) {
                return None;
            }
            consumed += c.len_utf8();
        }
        Some(consumed)
    }

    /// Finds the first occurrence of `needle` in the view, scanning for the
    /// needle's first character and verifying the remainder at each
    /// candidate. Returns the matched byte range. An empty needle is never
    /// found.
    pub fn find(
        &self,
        needle: &TextView,
        options: &WildcardOptions,
    ) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        let first = needle.first_char()?;

        if options.is_case_sensitive() {
            // Case-sensitive matching is byte equality, so the anchor scan
            // can run over raw bytes. A full-needle byte match is always
            // boundary aligned: the needle's first byte is a UTF-8 leading
            // byte, which never occurs as a continuation byte.
            let haystack = self.text.as_bytes();
            let needle_bytes = needle.text.as_bytes();
            for pos in memchr::memchr_iter(needle_bytes[0], haystack) {
                if haystack[pos..].starts_with(needle_bytes) {
                    return Some(pos..pos + needle_bytes.len());
                }
            }
            return None;
        }

        let needle_rest = needle.slice_from(first.len_utf8());
        for (pos, c) in self.text.char_indices() {
            if !options.chars_eq(c, first) {
                continue;
            }
            let rest = self.slice_from(pos + c.len_utf8());
            if let Some(len) = rest.starts_with(&needle_rest, options) {
                return Some(pos..pos + c.len_utf8() + len);
            }
        }
        None
    }

    /// Finds the first character satisfying `pred`, returning its byte
    /// range.
    pub fn find_char(
        &self,
        mut pred: impl FnMut(char) -> bool,
    ) -> Option<Range<usize>> {
        for (pos, c) in self.text.char_indices() {
            if pred(c) {
                return Some(pos..pos + c.len_utf8());
            }
        }
        None
    }
}
