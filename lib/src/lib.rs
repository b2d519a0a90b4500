/*! A wildcard pattern compiler and matching engine.

Patterns use the classic wildcard syntax: `*` matches zero or more
characters, `?` matches exactly one character, `[abc]` matches one
character from the set, and a backtick makes the character after it
literal. A pattern is anchored at both ends of the input; there is no
implicit leading or trailing wildcard, and the empty pattern matches only
the empty input. Matching is case-insensitive by default and configurable
through [`WildcardOptions`].

A pattern is compiled into a compact code sequence that a small virtual
machine executes against the subject, backtracking iteratively when a `*`
matched too early. One-off matches go through [`is_match`]; when the same
pattern is matched repeatedly, compile it once into a [`CompiledPattern`].

# Example

```rust
use wildcard_vm::{CompiledPattern, WildcardOptions};

assert!(wildcard_vm::is_match("this test should work", "this*should*")?);

let pattern = CompiledPattern::compile("te[sx]t")?;

assert!(pattern.is_match("test")?);
assert!(pattern.is_match("TEXT")?);
assert!(!pattern.is_match_with("TEST", WildcardOptions::ordinal())?);
# Ok::<(), wildcard_vm::Error>(())
```
*/

#![deny(missing_docs)]

pub use errors::Error;
pub use options::CaseFold;
pub use options::WildcardOptions;
pub use pattern::CompiledPattern;

mod buffer;
mod errors;
mod options;
mod pattern;
mod text;
mod vm;

#[cfg(test)]
mod tests;

/// Returns true if the wildcard `pattern` matches the whole of `input`,
/// using the default options.
///
/// Fails with [`Error::InvalidPattern`] when the pattern opens a character
/// class that is never closed.
pub fn is_match(input: &str, pattern: &str) -> Result<bool, Error> {
    is_match_with(input, pattern, WildcardOptions::default())
}

/// Returns true if the wildcard `pattern` matches the whole of `input`
/// under `options`.
///
/// The pattern is compiled, run once, and discarded. Compile into a
/// [`CompiledPattern`] instead when matching the same pattern repeatedly.
pub fn is_match_with(
    input: &str,
    pattern: &str,
    options: WildcardOptions,
) -> Result<bool, Error> {
    let seq = vm::Compiler::new(pattern).compile()?;
    // Code that fits the compiler's inline region runs from it directly.
    if let Some(code) = seq.try_as_slice() {
        return Ok(vm::WildcardVM::new(code).is_match(input, &options));
    }
    let code = seq.into_code();
    Ok(vm::WildcardVM::new(&code).is_match(input, &options))
}
