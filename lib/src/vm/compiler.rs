use std::fmt::{Display, Formatter};
use std::str::CharIndices;

use crate::buffer::GrowableBuffer;
use crate::errors::Error;
use crate::vm::instr::{Instr, InstrParser};

/// Inline capacity of the code buffer, in bytes. Most patterns compile into
/// less code than this and don't touch the heap until the code is
/// materialized for keeping.
const CODE_INLINE_CAPACITY: usize = 0x100;

/// Longest payload a single instruction can carry. Longer runs are chunked
/// at character boundaries into consecutive instructions.
const MAX_PAYLOAD: usize = u16::MAX as usize;

/// A compiler that takes a wildcard pattern and produces code for
/// [`WildcardVM`].
///
/// The pattern is scanned left to right in a single pass. Ordinary
/// characters accumulate into a pending literal run that is flushed as one
/// `Literal` instruction whenever a special character is reached; `*`, `?`
/// and `[...]` emit their own instructions; a backtick makes the character
/// after it ordinary.
///
/// [`WildcardVM`]: crate::vm::WildcardVM
pub(crate) struct Compiler<'p> {
    pattern: &'p str,
    pending: String,
    seq: InstrSeq,
}

impl<'p> Compiler<'p> {
    /// Creates a compiler for `pattern`.
    pub fn new(pattern: &'p str) -> Self {
        Self { pattern, pending: String::new(), seq: InstrSeq::new() }
    }

    /// Compiles the pattern into an instruction sequence.
    ///
    /// Fails with [`Error::InvalidPattern`] when a character class is
    /// opened with `[` and the pattern ends before an unescaped `]` closes
    /// it. Failure is atomic; no partial sequence is produced.
    pub fn compile(mut self) -> Result<InstrSeq, Error> {
        let mut chars = self.pattern.char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                // A trailing backtick at the end of the pattern escapes
                // nothing and is dropped.
                '`' => {
                    if let Some((_, escaped)) = chars.next() {
                        self.pending.push(escaped);
                    }
                }
                '*' => {
                    self.flush_pending();
                    self.seq.emit_any_any();
                }
                '?' => {
                    self.flush_pending();
                    self.seq.emit_any_one();
                }
                '[' => {
                    self.flush_pending();
                    self.compile_class(offset, &mut chars)?;
                }
                _ => self.pending.push(c),
            }
        }
        self.flush_pending();
        Ok(self.seq)
    }

    // Parses a character class opened at byte offset `open`. Members
    // accumulate until an unescaped `]` closes the class. A backtick inside
    // the class emits the members accumulated so far as a partial class (if
    // there are any) and starts a new member run with the escaped
    // character; the terminating `]` emits the tail run as the final class
    // instruction of the fragment run.
    fn compile_class(
        &mut self,
        open: usize,
        chars: &mut CharIndices<'p>,
    ) -> Result<(), Error> {
        let mut members = String::new();
        loop {
            match chars.next() {
                Some((_, ']')) => {
                    self.seq.emit_class(&members);
                    return Ok(());
                }
                Some((_, '`')) => {
                    if !members.is_empty() {
                        self.seq.emit_partial_class(&members);
                        members.clear();
                    }
                    match chars.next() {
                        Some((_, escaped)) => members.push(escaped),
                        None => return Err(self.unterminated_class(open)),
                    }
                }
                Some((_, c)) => members.push(c),
                None => return Err(self.unterminated_class(open)),
            }
        }
    }

    fn unterminated_class(&self, open: usize) -> Error {
        Error::InvalidPattern { pattern: self.pattern.to_string(), offset: open }
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            self.seq.emit_literal(&self.pending);
            self.pending.clear();
        }
    }
}

/// Helper type for emitting a sequence of instructions for
/// [`crate::vm::WildcardVM`].
pub(crate) struct InstrSeq {
    seq: GrowableBuffer<u8, CODE_INLINE_CAPACITY>,
}

impl InstrSeq {
    /// Creates a new [`InstrSeq`].
    pub fn new() -> Self {
        Self { seq: GrowableBuffer::new() }
    }

    /// Returns the code as one contiguous slice while it still fits the
    /// inline region. One-off matches run straight from this slice without
    /// materializing the code.
    pub fn try_as_slice(&self) -> Option<&[u8]> {
        self.seq.try_as_slice()
    }

    /// Consumes the sequence, materializing the code into an owned vector.
    pub fn into_code(self) -> Vec<u8> {
        self.seq.into_vec()
    }

    pub fn emit_any_any(&mut self) {
        self.seq.append(Instr::ANY_ANY);
    }

    pub fn emit_any_one(&mut self) {
        self.seq.append(Instr::ANY_ONE);
    }

    pub fn emit_literal(&mut self, text: &str) {
        self.emit_chunked(Instr::LITERAL, Instr::LITERAL, text);
    }

    /// Emits a character class. A member set too long for one instruction
    /// becomes partial fragments followed by the final class, which the
    /// engine merges back together at match time.
    pub fn emit_class(&mut self, members: &str) {
        self.emit_chunked(Instr::PARTIAL_CLASS, Instr::CLASS, members);
    }

    pub fn emit_partial_class(&mut self, members: &str) {
        self.emit_chunked(Instr::PARTIAL_CLASS, Instr::PARTIAL_CLASS, members);
    }

    fn emit_chunked(&mut self, lead_opcode: u8, tail_opcode: u8, text: &str) {
        let mut rest = text;
        while rest.len() > MAX_PAYLOAD {
            let (chunk, tail) = split_at_char_boundary(rest, MAX_PAYLOAD);
            self.emit_with_payload(lead_opcode, chunk);
            rest = tail;
        }
        self.emit_with_payload(tail_opcode, rest);
    }

    fn emit_with_payload(&mut self, opcode: u8, payload: &str) {
        self.seq.append(opcode);
        let payload_len = payload.len() as u16;
        self.seq.extend_from_slice(&payload_len.to_le_bytes());
        self.seq.extend_from_slice(payload.as_bytes());
    }
}

impl Display for InstrSeq {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let code: Vec<u8> = self.seq.iter().copied().collect();
        let mut code = code.as_slice();
        let mut offset = 0;
        writeln!(f)?;
        while !code.is_empty() {
            let (instr, size) = InstrParser::decode_instr(code);
            match instr {
                Instr::Literal(text) => {
                    writeln!(f, "{:05}: LITERAL `{}`", offset, text.as_str())?
                }
                Instr::AnyOne => writeln!(f, "{:05}: ANY_ONE", offset)?,
                Instr::AnyAny => writeln!(f, "{:05}: ANY_ANY", offset)?,
                Instr::Class(text) => {
                    writeln!(f, "{:05}: CLASS `{}`", offset, text.as_str())?
                }
                Instr::PartialClass(text) => {
                    writeln!(f, "{:05}: PARTIAL_CLASS `{}`", offset, text.as_str())?
                }
            }
            offset += size;
            code = &code[size..];
        }
        Ok(())
    }
}

// Splits `text` at the largest character boundary not exceeding `max`.
// Only called with `text.len() > max`.
fn split_at_char_boundary(text: &str, max: usize) -> (&str, &str) {
    let mut index = max;
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    text.split_at(index)
}
