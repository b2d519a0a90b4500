/*! This module implements the wildcard pattern compiler and the VM that
executes compiled patterns.

[`Compiler`] turns pattern text into a compact byte-encoded instruction
sequence, and [`WildcardVM`] runs that sequence against a subject string.
The VM keeps one frame of match state per instruction, which is all the
state backtracking needs: when a step fails, the engine rewinds to the
nearest frame whose instruction can retry its search further into the
subject, so a `*` followed by a literal is allowed to slide forward past
false starts without any recursion.
*/

pub(crate) use compiler::Compiler;
pub(crate) use wildvm::WildcardVM;

mod compiler;
mod instr;
mod wildvm;
