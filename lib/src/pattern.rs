use std::fmt::{Debug, Formatter};

use log::debug;

use crate::errors::Error;
use crate::options::WildcardOptions;
use crate::vm::{Compiler, WildcardVM};

/// A wildcard pattern compiled into code ready for repeated matching.
///
/// A `CompiledPattern` owns a copy of the pattern text and the code
/// produced from it, so a pattern compiled once can be matched against any
/// number of subjects without recompiling. Matching borrows the pattern
/// immutably and keeps all of its working state call-local, which makes a
/// compiled pattern safe to match from multiple threads at once.
/// [`release`] requires exclusive access, so the borrow checker rules out
/// releasing a pattern while a match on it is in flight.
///
/// # Example
///
/// ```rust
/// use wildcard_vm::CompiledPattern;
///
/// let mut pattern = CompiledPattern::compile("this*should*")?;
///
/// assert!(pattern.is_match("this test should work")?);
/// assert!(!pattern.is_match("but not this")?);
///
/// pattern.release();
/// assert!(pattern.is_match("anything").is_err());
/// # Ok::<(), wildcard_vm::Error>(())
/// ```
///
/// [`release`]: CompiledPattern::release
pub struct CompiledPattern {
    inner: Option<Inner>,
}

struct Inner {
    pattern: Box<str>,
    code: Box<[u8]>,
}

impl CompiledPattern {
    /// Compiles `pattern` into code for repeated matching.
    ///
    /// Fails with [`Error::InvalidPattern`] when the pattern opens a
    /// character class that is never closed.
    pub fn compile(pattern: &str) -> Result<Self, Error> {
        let seq = Compiler::new(pattern).compile()?;
        let code = seq.into_code().into_boxed_slice();
        debug!(
            "compiled wildcard pattern `{}` into {} bytes of code",
            pattern,
            code.len()
        );
        Ok(Self { inner: Some(Inner { pattern: pattern.into(), code }) })
    }

    /// The pattern this object was compiled from, or `None` once it has
    /// been released.
    pub fn pattern(&self) -> Option<&str> {
        self.inner.as_ref().map(|inner| &*inner.pattern)
    }

    /// Returns true if the pattern matches the whole of `input`, using the
    /// default options.
    pub fn is_match(&self, input: &str) -> Result<bool, Error> {
        self.is_match_with(input, WildcardOptions::default())
    }

    /// Returns true if the pattern matches the whole of `input` under
    /// `options`.
    ///
    /// Fails with [`Error::UseAfterRelease`] once the pattern has been
    /// released.
    pub fn is_match_with(
        &self,
        input: &str,
        options: WildcardOptions,
    ) -> Result<bool, Error> {
        let inner = self.inner.as_ref().ok_or(Error::UseAfterRelease)?;
        Ok(WildcardVM::new(&inner.code).is_match(input, &options))
    }

    /// Releases the pattern text and its code. Matching afterwards returns
    /// [`Error::UseAfterRelease`]. Releasing more than once is a no-op, and
    /// dropping the pattern releases it implicitly.
    pub fn release(&mut self) {
        self.inner = None;
    }
}

impl Debug for CompiledPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(inner) => write!(f, "CompiledPattern({:?})", &*inner.pattern),
            None => write!(f, "CompiledPattern(<released>)"),
        }
    }
}
