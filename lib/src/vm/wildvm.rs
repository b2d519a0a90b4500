use std::ops::Range;

use smallvec::SmallVec;

use crate::buffer::GrowableBuffer;
use crate::options::WildcardOptions;
use crate::text::TextView;
use crate::vm::instr::{Instr, InstrParser};

/// Inline capacity of the decoded instruction list.
const INSTRS_INLINE_CAPACITY: usize = 0x10;

/// Inline capacity of the per-call frame table. Patterns with more
/// instructions than this spill their frames to the heap.
const FRAMES_INLINE_CAPACITY: usize = 0x20;

/// Inline capacity, in characters, of the scratch buffer that merged
/// character class fragments are materialized into.
const CLASS_SCRATCH_CAPACITY: usize = 0x40;

/// The wildcard matching engine.
///
/// `WildcardVM` executes code produced by [`Compiler`], testing whether a
/// pattern matches the whole of a subject string. Matching is iterative
/// rather than recursive: the engine keeps one frame of match state per
/// instruction, and a `*` that matched too early is retried further into
/// the subject by rewinding to the nearest frame that can resume a search.
///
/// The VM only borrows the code; the same code can back any number of
/// simultaneous `is_match` calls, each with its own call-local state.
///
/// [`Compiler`]: crate::vm::Compiler
pub(crate) struct WildcardVM<'r> {
    /// The code for the VM. Produced by [`crate::vm::Compiler`].
    code: &'r [u8],
}

impl<'r> WildcardVM<'r> {
    /// Creates a new [`WildcardVM`].
    pub fn new(code: &'r [u8]) -> Self {
        Self { code }
    }

    /// Returns true if the compiled pattern matches the whole of `subject`.
    pub fn is_match(&self, subject: &str, options: &WildcardOptions) -> bool {
        let instrs: SmallVec<[Instr<'r>; INSTRS_INLINE_CAPACITY]> =
            InstrParser::new(self.code).collect();

        let mut frames = GrowableBuffer::new();
        frames.set_len(instrs.len());

        Interp {
            subject: TextView::new(subject),
            instrs: &instrs,
            frames,
            options,
            ip: 0,
            tp: 0,
        }
        .run()
    }
}

/// Per-instruction match state. Frames exist only for the duration of one
/// `is_match` call and are never persisted.
#[derive(Clone, Copy, Default)]
struct Frame {
    /// Start of the subject byte range this instruction matched.
    start: usize,
    /// End of that range.
    end: usize,
    /// Whether matching may resume at this instruction, retrying one
    /// character past `start`.
    backtrackable: bool,
    /// Set when the instruction before this one is a `*`. Turns the
    /// instruction's at-position test into a forward search.
    preceded_by_wildcard: bool,
}

/// A literal or class step about to be tested against the subject. A merged
/// class carries its freshly materialized member set instead of a view into
/// the code.
enum Step<'m, 's> {
    Literal(TextView<'s>),
    Class(Members<'m, 's>),
}

enum Members<'m, 's> {
    Text(TextView<'s>),
    Merged(&'m GrowableBuffer<char, CLASS_SCRATCH_CAPACITY>),
}

impl Members<'_, '_> {
    fn contains(&self, c: char, options: &WildcardOptions) -> bool {
        match self {
            Members::Text(members) => {
                members.chars().any(|m| options.chars_eq(m, c))
            }
            Members::Merged(members) => {
                members.iter().any(|m| options.chars_eq(*m, c))
            }
        }
    }
}

struct Interp<'s> {
    subject: TextView<'s>,
    instrs: &'s [Instr<'s>],
    frames: GrowableBuffer<Frame, FRAMES_INLINE_CAPACITY>,
    options: &'s WildcardOptions,
    /// Index of the instruction being executed.
    ip: usize,
    /// Byte offset of the text cursor within the subject.
    tp: usize,
}

impl<'s> Interp<'s> {
    fn run(mut self) -> bool {
        loop {
            if self.ip == self.instrs.len() {
                // The pattern anchors at the end of the subject; there is
                // no implicit trailing wildcard. Leftover text sends the
                // engine back to the nearest resumable `*`.
                if self.tp == self.subject.len() {
                    return true;
                }
                if !self.try_backtrack() {
                    return false;
                }
                continue;
            }

            let advanced = match self.instrs[self.ip] {
                Instr::AnyAny => {
                    // A trailing `*` consumes the remainder unconditionally.
                    if self.ip == self.instrs.len() - 1 {
                        return true;
                    }
                    // The wildcard itself consumes nothing; the instruction
                    // after it performs the search the wildcard enables.
                    self.frames[self.ip + 1].preceded_by_wildcard = true;
                    self.ip += 1;
                    true
                }
                Instr::AnyOne => self.any_one(),
                Instr::Literal(text) => self.text_step(&Step::Literal(text), 1),
                Instr::Class(members) => {
                    self.text_step(&Step::Class(Members::Text(members)), 1)
                }
                Instr::PartialClass(_) => self.merged_class_step(),
            };

            if !advanced && !self.try_backtrack() {
                return false;
            }
        }
    }

    // Consumes exactly one character. After a `*` the consumed range is
    // recorded and the frame marked resumable, so `*?` requires at least
    // one character while still letting the pair slide forward.
    fn any_one(&mut self) -> bool {
        let Some(c) = self.remaining().first_char() else {
            return false;
        };
        let frame = &mut self.frames[self.ip];
        if frame.preceded_by_wildcard {
            frame.backtrackable = true;
            frame.start = self.tp;
            frame.end = self.tp + c.len_utf8();
        }
        self.tp += c.len_utf8();
        self.ip += 1;
        true
    }

    // Runs a literal or class step: a search through the remaining subject
    // when the instruction follows a `*`, an at-position test otherwise.
    // `frames_to_jump` is 1 except for merged classes, which advance past
    // every instruction that contributed members.
    fn text_step(&mut self, step: &Step, frames_to_jump: usize) -> bool {
        let matched = if self.frames[self.ip].preceded_by_wildcard {
            self.frames[self.ip].backtrackable = true;
            match self.find_next(step) {
                Some(range) => range,
                None => return false,
            }
        } else {
            match self.at_match(step) {
                Some(len) => self.tp..self.tp + len,
                None => return false,
            }
        };

        let frame = &mut self.frames[self.ip];
        frame.start = matched.start;
        frame.end = matched.end;
        self.tp = frame.end;
        self.ip += frames_to_jump;
        true
    }

    // Searches the remaining subject for the next occurrence of the step,
    // returning absolute byte offsets.
    fn find_next(&self, step: &Step) -> Option<Range<usize>> {
        let remaining = self.remaining();
        let found = match step {
            Step::Literal(text) => remaining.find(text, self.options),
            Step::Class(members) => {
                remaining.find_char(|c| members.contains(c, self.options))
            }
        }?;
        Some(self.tp + found.start..self.tp + found.end)
    }

    // Tests whether the step matches exactly at the text cursor, returning
    // the number of subject bytes it covers.
    fn at_match(&self, step: &Step) -> Option<usize> {
        let remaining = self.remaining();
        match step {
            Step::Literal(text) => remaining.starts_with(text, self.options),
            Step::Class(members) => {
                let c = remaining.first_char()?;
                members.contains(c, self.options).then_some(c.len_utf8())
            }
        }
    }

    // Concatenates the contiguous run of class fragments starting at the
    // current instruction (every `PartialClass` plus the `Class` that
    // terminates the run) into a scratch buffer, then handles the merge as
    // one class spanning all of the fragment instructions. The scratch
    // holds an owned copy of the member characters; nothing aliases the
    // code buffer.
    fn merged_class_step(&mut self) -> bool {
        let mut scratch: GrowableBuffer<char, CLASS_SCRATCH_CAPACITY> =
            GrowableBuffer::new();
        let mut fragments = 0;
        for instr in &self.instrs[self.ip..] {
            match instr {
                Instr::PartialClass(members) => {
                    for c in members.chars() {
                        scratch.append(c);
                    }
                    fragments += 1;
                }
                Instr::Class(members) => {
                    for c in members.chars() {
                        scratch.append(c);
                    }
                    fragments += 1;
                    break;
                }
                _ => break,
            }
        }
        self.text_step(&Step::Class(Members::Merged(&scratch)), fragments)
    }

    // Scans frames backward for the nearest one marked resumable and
    // retries it with the text cursor one character past its last match
    // start. Returns false when no frame can resume, which fails the whole
    // match.
    fn try_backtrack(&mut self) -> bool {
        for index in (0..self.ip).rev() {
            let frame = self.frames[index];
            if frame.backtrackable {
                self.ip = index;
                self.tp = self.subject.next_char_boundary(frame.start);
                return true;
            }
        }
        false
    }

    fn remaining(&self) -> TextView<'s> {
        self.subject.slice_from(self.tp)
    }
}
