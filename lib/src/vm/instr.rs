use std::mem::size_of;

use crate::text::TextView;

/// Instructions supported by the wildcard VM.
///
/// Payload-carrying instructions borrow their text from the code buffer
/// they were decoded from; the compiler copies the relevant pattern text
/// into the code, so the code buffer is the only thing that has to stay
/// alive while instructions are in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Instr<'a> {
    /// Matches an exact run of characters.
    Literal(TextView<'a>),

    /// Matches exactly one character, whatever it is.
    AnyOne,

    /// Matches zero or more characters.
    AnyAny,

    /// Matches one character present in the member set.
    Class(TextView<'a>),

    /// A fragment of a character class that was split up during
    /// compilation. Contiguous fragments, including the `Class` that
    /// terminates the run, are merged at match time and handled as a
    /// single class.
    PartialClass(TextView<'a>),
}

impl<'a> Instr<'a> {
    pub const LITERAL: u8 = 0x00;
    pub const ANY_ONE: u8 = 0x01;
    pub const ANY_ANY: u8 = 0x02;
    pub const CLASS: u8 = 0x03;
    pub const PARTIAL_CLASS: u8 = 0x04;
}

/// Parses a slice of bytes that contains wildcard VM instructions,
/// returning individual instructions and their arguments.
///
/// Instructions are encoded as one opcode byte, followed for the
/// payload-carrying opcodes by a little-endian `u16` with the payload
/// length and that many bytes of UTF-8 text.
pub(crate) struct InstrParser<'a> {
    code: &'a [u8],
}

impl<'a> InstrParser<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        Self { code }
    }

    #[inline(always)]
    pub(crate) fn decode_instr(code: &'a [u8]) -> (Instr<'a>, usize) {
        match code[..] {
            [Instr::LITERAL, ..] => Self::decode_text_instr(code, Instr::Literal),
            [Instr::ANY_ONE, ..] => (Instr::AnyOne, 1),
            [Instr::ANY_ANY, ..] => (Instr::AnyAny, 1),
            [Instr::CLASS, ..] => Self::decode_text_instr(code, Instr::Class),
            [Instr::PARTIAL_CLASS, ..] => {
                Self::decode_text_instr(code, Instr::PartialClass)
            }
            [opcode, ..] => {
                unreachable!("unknown opcode for wildcard VM: {}", opcode)
            }
            [] => unreachable!(),
        }
    }

    fn decode_text_instr(
        code: &'a [u8],
        instr: fn(TextView<'a>) -> Instr<'a>,
    ) -> (Instr<'a>, usize) {
        let payload_len = Self::decode_u16(&code[1..]) as usize;
        let payload_start = 1 + size_of::<u16>();
        let payload = &code[payload_start..payload_start + payload_len];
        // The payload was copied verbatim from `&str` data by the compiler.
        let text = unsafe { std::str::from_utf8_unchecked(payload) };
        (instr(TextView::new(text)), payload_start + payload_len)
    }

    fn decode_u16(slice: &[u8]) -> u16 {
        u16::from_le_bytes([slice[0], slice[1]])
    }
}

impl<'a> Iterator for InstrParser<'a> {
    type Item = Instr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.code.is_empty() {
            return None;
        }
        let (instr, size) = InstrParser::decode_instr(self.code);
        self.code = &self.code[size..];
        Some(instr)
    }
}
