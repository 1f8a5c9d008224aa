//! Natural filename ordering.
//!
//! Numeric-aware, case-insensitive comparison: embedded digit runs compare as
//! numbers, so `2-file.md` sorts before `10-file.md` where plain lexicographic
//! ordering would invert them.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two filenames with numeric awareness.
///
/// Ties that only differ in case (or in digit-run padding, `01` vs `1`) fall
/// back to plain byte order so the result is a deterministic total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ia = a.chars().peekable();
    let mut ib = b.chars().peekable();

    loop {
        match (ia.peek().copied(), ib.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let run_a = take_digit_run(&mut ia);
                    let run_b = take_digit_run(&mut ib);
                    match compare_digit_runs(&run_a, &run_b) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                } else {
                    match ca.to_ascii_lowercase().cmp(&cb.to_ascii_lowercase()) {
                        Ordering::Equal => {
                            ia.next();
                            ib.next();
                        }
                        ord => return ord,
                    }
                }
            }
        }
    }
}

/// Consume a run of ASCII digits from the iterator.
fn take_digit_run(it: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(&c) = it.peek() {
        if c.is_ascii_digit() {
            run.push(c);
            it.next();
        } else {
            break;
        }
    }
    run
}

/// Compare two digit runs as numbers without parsing (no overflow on long runs).
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    match a.len().cmp(&b.len()) {
        Ordering::Equal => a.cmp(b),
        ord => ord,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_runs_beat_lexicographic() {
        assert_eq!(natural_cmp("2-file.md", "10-file.md"), Ordering::Less);
        assert_eq!(natural_cmp("f2.md", "f10.md"), Ordering::Less);
        // Plain string order would invert both
        assert_eq!("2-file.md".cmp("10-file.md"), Ordering::Greater);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(natural_cmp("Alpha.md", "beta.md"), Ordering::Less);
        assert_eq!(natural_cmp("zeta.md", "Beta.md"), Ordering::Greater);
    }

    #[test]
    fn test_equal_and_padding_ties_are_deterministic() {
        assert_eq!(natural_cmp("a.md", "a.md"), Ordering::Equal);
        // 01 and 1 compare as the same number, byte order breaks the tie
        assert_eq!(natural_cmp("01.md", "1.md"), Ordering::Less);
        assert_eq!(natural_cmp("1.md", "01.md"), Ordering::Greater);
    }

    #[test]
    fn test_long_digit_runs() {
        assert_eq!(
            natural_cmp("99999999999999999999998.md", "99999999999999999999999.md"),
            Ordering::Less
        );
    }

    #[test]
    fn test_sorted_sequence() {
        let mut names = vec!["10-generics.md", "2-oop.md", "1-intro.md", "3-io.md"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec!["1-intro.md", "2-oop.md", "3-io.md", "10-generics.md"]
        );
    }
}
