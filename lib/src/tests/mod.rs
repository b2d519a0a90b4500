/*! End-to-end matching tests. */

use pretty_assertions::assert_eq;

use crate::{CompiledPattern, Error, WildcardOptions};

macro_rules! assert_match {
    ($input:expr, $pattern:expr) => {{
        assert!(
            crate::is_match($input, $pattern).unwrap(),
            "`{}` should match `{}`",
            $input,
            $pattern
        );
    }};
    ($input:expr, $pattern:expr, $options:expr) => {{
        assert!(
            crate::is_match_with($input, $pattern, $options).unwrap(),
            "`{}` should match `{}`",
            $input,
            $pattern
        );
    }};
}

macro_rules! assert_no_match {
    ($input:expr, $pattern:expr) => {{
        assert!(
            !crate::is_match($input, $pattern).unwrap(),
            "`{}` should not match `{}`",
            $input,
            $pattern
        );
    }};
    ($input:expr, $pattern:expr, $options:expr) => {{
        assert!(
            !crate::is_match_with($input, $pattern, $options).unwrap(),
            "`{}` should not match `{}`",
            $input,
            $pattern
        );
    }};
}

#[test]
fn exact() {
    assert_match!("test", "test");
    assert_no_match!("tes", "test");
    assert_match!(
        "this is a pretty long string that is doing some things and should work.",
        "this is a pretty long string that is doing some things and should work."
    );
}

#[test]
fn no_implicit_start_or_end_wildcard() {
    assert_no_match!("ttest", "test");
    assert_no_match!("testt", "test");
    assert_no_match!("ttestt", "test");
}

#[test]
fn empty_pattern_matches_only_empty_input() {
    assert_match!("", "");
    assert_no_match!("a", "");
    assert_match!("", "*");
    assert_no_match!("", "?");
    assert_no_match!("", "a");
}

#[test]
fn start_wildcard() {
    assert_match!("there are some thing before test", "*test");
}

#[test]
fn end_wildcard() {
    assert_match!("test there are some things after", "test*");
}

#[test]
fn middle_wildcard() {
    assert_match!("test there are some things after", "test*after");
    assert_no_match!("test there are some things after", "test*incorrect");
    assert_no_match!("test there are some things after", "test*[x]");
}

#[test]
fn wildcard_can_be_zero_characters() {
    assert_match!("test", "test*");
    assert_match!("test", "*test");
    assert_match!("test", "te*st");
    assert_match!("", "*");
}

#[test]
fn multiple_wildcards() {
    assert_match!("this test should work", "this*should*");
    assert_match!("this test should work", "this*sh*work");
    assert_match!("this test should work", "*his*sh*work");
    assert_match!("this test should work", "*his*sh*wor*");
}

#[test]
fn consecutive_wildcards_behave_as_one() {
    for input in ["", "a", "this test should work"] {
        assert_eq!(
            crate::is_match(input, "**").unwrap(),
            crate::is_match(input, "*").unwrap()
        );
    }
    assert_match!("this test should work", "this**should*");
}

#[test]
fn wildcard_slides_past_false_starts() {
    assert_match!("aba", "*a");
    assert_match!("something test wrong test right", "*test [r]*");
    assert_no_match!("something test wrong test right", "*test [x]*");
    assert_match!("something test wrong test right", "something*[rt]ight");
}

#[test]
fn any_one() {
    assert_match!("test", "te?t");
    assert_match!("a", "?");
    assert_no_match!("", "?");
    assert_no_match!("ab", "?");
}

#[test]
fn any_one_at_end() {
    assert_match!("test", "tes?");
    assert_no_match!("test", "test?");
}

#[test]
fn any_one_at_start() {
    assert_match!("test", "?est");
    assert_no_match!("test", "?test");
}

#[test]
fn any_one_after_wildcard() {
    assert_match!("testing", "test*?g");
    assert_match!("testing", "test*?");
    assert_match!("abc", "*?");
    assert_no_match!("", "*?");
}

#[test]
fn any_one_makes_wildcard_require_a_character() {
    assert_match!("testing", "testi*?g");
    assert_no_match!("testing", "testin*?g");
}

#[test]
fn any_of() {
    assert_match!("test", "te[st]t");
    for input in [
        "test", "tett", "teat", "tegt", "teft", "text", "tect", "tebt", "tevt",
    ] {
        assert_match!(input, "te[stagfxcbv]t");
    }
    assert_no_match!("teqt", "te[stagfxcbv]t");
}

#[test]
fn any_of_specials_count_as_literals() {
    assert_match!("tes*t", "tes[*[?]t");
    assert_match!("tes[t", "tes[*[?]t");
    assert_match!("tes?t", "tes[*[?]t");
}

#[test]
fn any_of_escaped_members() {
    assert_match!("testt", "tes[`]t]t");
    assert_match!("tes]t", "tes[`]t]t");
    assert_match!("tes]t", "tes[`]`tfajsd`*qw]t");
    assert_no_match!("tes`t", "tes[`]t]t");
}

#[test]
fn empty_class_matches_nothing() {
    assert_no_match!("a", "[]");
    assert_no_match!("", "[]");
    assert_no_match!("anything", "*[]");
}

#[test]
fn escapes_make_specials_literal() {
    assert_match!("a*b", "a`*b");
    assert_no_match!("aXb", "a`*b");
    assert_match!("*?", "`*`?");
    assert_no_match!("ab", "`*`?");
    assert_match!("ab", "ab`");
}

#[test]
fn multibyte_subjects_and_patterns() {
    assert_match!("grüße", "gr?ße");
    assert_match!("grüße", "gr*e");
    assert_match!("näp", "n[aä]p");
    assert_no_match!("nop", "n[aä]p");
    assert_match!("xβyz", "*β?z");
    assert_no_match!("aβcβz", "*β?z");
}

#[test]
fn default_options_ignore_case() {
    assert_match!("TEST", "test");
    assert_match!("Test Value", "test*");
    assert_match!("TEXT", "te[sx]t");
    assert_match!("ÄBC", "äbc");
    assert_match!("ΑΒΓ", "αβγ");
}

#[test]
fn ordinal_options_respect_case() {
    let ordinal = WildcardOptions::ordinal();
    assert_match!("test", "test", ordinal);
    assert_no_match!("TEST", "test", ordinal);
    assert_no_match!("Test Value", "test*", ordinal);
    assert_no_match!("TEXT", "te[sx]t", ordinal);
}

#[test]
fn injected_case_fold_is_honored() {
    // A fold that treats `0` as `o`, on top of ASCII lowering.
    fn fold(c: char) -> char {
        if c == '0' {
            'o'
        } else {
            c.to_ascii_lowercase()
        }
    }
    let options = WildcardOptions::culture_ignore_case(fold);
    assert_match!("R00T", "root", options);
    assert_no_match!("R00T", "root");
}

#[test]
fn more_instructions_than_the_inline_code_region_holds() {
    // Each `?` is one instruction; 512 of them spill the compiler's inline
    // code region and the engine's inline frame table.
    let pattern = "?".repeat(0x200);
    let input = "x".repeat(0x200);
    assert_match!(&input, &pattern);
    assert_no_match!(&input[..0x1ff], &pattern);
}

#[test]
fn long_fragmented_class_spills_the_merge_scratch() {
    // An escape splits the class, and the merged member set is far larger
    // than the engine's inline scratch region.
    let pattern = format!("[a`{}]", "c".repeat(0x200));
    assert_match!("c", &pattern);
    assert_match!("a", &pattern);
    assert_no_match!("b", &pattern);
}

#[test]
fn invalid_pattern_reports_the_open_class() {
    assert_eq!(
        crate::is_match("anything", "te[st"),
        Err(Error::InvalidPattern { pattern: "te[st".to_string(), offset: 2 })
    );
    assert_eq!(
        CompiledPattern::compile("[never closed").err(),
        Some(Error::InvalidPattern {
            pattern: "[never closed".to_string(),
            offset: 0,
        })
    );
}

#[test]
fn compiled_pattern_is_reusable() {
    let pattern = CompiledPattern::compile("*test [r]*").unwrap();
    assert_eq!(pattern.pattern(), Some("*test [r]*"));
    assert!(pattern.is_match("something test wrong test right").unwrap());
    assert!(!pattern.is_match("something test wrong").unwrap());
    assert!(pattern.is_match("test right").unwrap());
    assert!(!pattern
        .is_match_with("SOMETHING TEST RIGHT", WildcardOptions::ordinal())
        .unwrap());
}

#[test]
fn release_is_idempotent_and_fails_later_use() {
    let mut pattern = CompiledPattern::compile("te?t").unwrap();
    assert!(pattern.is_match("test").unwrap());

    pattern.release();
    assert_eq!(pattern.pattern(), None);
    assert_eq!(pattern.is_match("test"), Err(Error::UseAfterRelease));

    // Releasing again is fine.
    pattern.release();
    assert_eq!(pattern.is_match("test"), Err(Error::UseAfterRelease));
}

#[test]
fn compiled_patterns_match_from_multiple_threads() {
    let pattern = CompiledPattern::compile("*[rt]ight").unwrap();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert!(pattern.is_match("something right").unwrap());
                assert!(!pattern.is_match("something wrong").unwrap());
            });
        }
    });
}

#[test]
fn literal_patterns_match_themselves() {
    for pattern in ["x", "some literal text", "grüße"] {
        assert_match!(pattern, pattern);
        assert_no_match!(&format!("{}x", pattern), pattern);
    }
}
