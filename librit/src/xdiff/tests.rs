use super::*;
use quickcheck_macros::quickcheck;

fn lines(s: &str) -> Vec<&str> {
    s.split('\n').collect()
}

fn diff_counts(trace: &[DiffTraceAction]) -> (usize, usize, usize) {
    let count = |action| trace.iter().filter(|&&a| a == action).count();
    (count(DiffTraceAction::Match), count(DiffTraceAction::Delete), count(DiffTraceAction::Add))
}

#[test]
fn test_identical_sequences_are_all_matches() {
    let a = lines("a\nb\nc");
    let trace = myers_diff(&a, &a);
    assert_eq!(diff_counts(&trace), (3, 0, 0));
}

#[test]
fn test_empty_sequences() {
    let trace = myers_diff::<&str>(&[], &[]);
    assert!(trace.is_empty());

    let trace = myers_diff(&[], &lines("a\nb"));
    assert_eq!(diff_counts(&trace), (0, 0, 2));

    let trace = myers_diff(&lines("a\nb"), &[]);
    assert_eq!(diff_counts(&trace), (0, 2, 0));
}

#[test]
fn test_classic_myers_example() {
    // the ABCABBA/CBABAC example has edit distance 5
    let a = ["A", "B", "C", "A", "B", "B", "A"];
    let b = ["C", "B", "A", "B", "A", "C"];
    let trace = myers_diff(&a, &b);
    assert_eq!(xdiff_dist(&a, &b), 5);
    assert_eq!(apply_trace(&a, &b, &trace), b);
}

#[test]
fn test_trace_is_ordered_and_applies() {
    let base = lines("one\ntwo\nthree\nfour");
    let target = lines("one\ntwo point five\nthree\nfour\nfive");
    let trace = myers_diff(&base, &target);
    assert_eq!(apply_trace(&base, &target, &trace), target);
    let (_, deletions, additions) = diff_counts(&trace);
    assert_eq!((deletions, additions), (1, 2));
}

#[test]
fn test_trailing_newline_yields_empty_final_line() {
    // the line model keeps the empty element after a trailing newline
    let with_newline = lines("a\n");
    assert_eq!(with_newline, vec!["a", ""]);
    let without = lines("a");
    assert_eq!(xdiff_dist(&with_newline, &without), 1);
}

#[quickcheck]
fn test_applying_trace_yields_target(a: Vec<u8>, b: Vec<u8>) -> bool {
    let trace = myers_diff(&a, &b);
    apply_trace(&a, &b, &trace) == b
}

#[quickcheck]
fn test_diff_distance_is_minimal_for_disjoint(a: Vec<u8>) -> bool {
    // against an empty sequence the minimal script is exactly `a.len()` deletes
    xdiff_dist(&a, &[]) == a.len()
}

#[quickcheck]
fn test_diff_symmetric_distance(a: Vec<u8>, b: Vec<u8>) -> bool {
    // deletions and additions swap roles when the sides swap
    let forward = diff_counts(&myers_diff(&a, &b));
    let backward = diff_counts(&myers_diff(&b, &a));
    forward.1 == backward.2 && forward.2 == backward.1 && forward.0 == backward.0
}
