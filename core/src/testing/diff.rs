//! Line and character level differences for presenting wrong answers.
//!
//! Both diffs are index aligned: line `i` of one side is only ever compared with line
//! `i` of the other. An inserted or deleted line therefore makes every following line
//! show up as a mismatch.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LineDiffKind {
    Match,
    Mismatch,
    /// Only the expected side has a line at this position.
    ExtraExpected,
    /// Only the actual side has a line at this position.
    ExtraActual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff<'a> {
    /// 1-based
    pub line_num: usize,
    pub expected: &'a str,
    pub actual: &'a str,
    pub kind: LineDiffKind,
}

impl LineDiff<'_> {
    pub fn is_match(&self) -> bool {
        self.kind == LineDiffKind::Match
    }
}

pub fn compute_line_diff<'a>(expected: &'a str, actual: &'a str) -> Vec<LineDiff<'a>> {
    let exp_lines: Vec<&str> = expected.split('\n').map(str::trim_end).collect();
    let act_lines: Vec<&str> = actual.split('\n').map(str::trim_end).collect();
    let len = exp_lines.len().max(act_lines.len());

    (0..len)
        .map(|i| {
            let (expected, actual, kind) = match (exp_lines.get(i), act_lines.get(i)) {
                (Some(&e), Some(&a)) if e == a => (e, a, LineDiffKind::Match),
                (Some(&e), Some(&a)) => (e, a, LineDiffKind::Mismatch),
                (Some(&e), None) => (e, "", LineDiffKind::ExtraExpected),
                (None, Some(&a)) => ("", a, LineDiffKind::ExtraActual),
                (None, None) => unreachable!("index below the longer side"),
            };
            LineDiff {
                line_num: i + 1,
                expected,
                actual,
                kind,
            }
        })
        .collect()
}

pub fn count_mismatched_lines(diff: &[LineDiff]) -> usize {
    diff.iter().filter(|d| !d.is_match()).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffChar {
    pub ch: char,
    pub differs: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharDiff {
    pub expected: Vec<DiffChar>,
    pub actual: Vec<DiffChar>,
}

/// Marks each character that differs from the character at the same index on the
/// other side. Characters beyond the end of the shorter side always differ.
pub fn compute_char_diff(a: &str, b: &str) -> CharDiff {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let len = a.len().max(b.len());

    let mut diff = CharDiff {
        expected: Vec::with_capacity(a.len()),
        actual: Vec::with_capacity(b.len()),
    };
    for i in 0..len {
        let (ca, cb) = (a.get(i).copied(), b.get(i).copied());
        let differs = ca != cb;
        if let Some(ch) = ca {
            diff.expected.push(DiffChar { ch, differs });
        }
        if let Some(ch) = cb {
            diff.actual.push(DiffChar { ch, differs });
        }
    }
    diff
}

#[cfg(test)]
mod test {
    use super::*;
    use LineDiffKind::*;

    fn kinds(diff: &[LineDiff]) -> Vec<LineDiffKind> {
        diff.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn single_mismatched_line() {
        let diff = compute_line_diff("1\n2\n3", "1\n5\n3");
        assert_eq!(kinds(&diff), vec![Match, Mismatch, Match]);
        assert_eq!(
            diff[1],
            LineDiff {
                line_num: 2,
                expected: "2",
                actual: "5",
                kind: Mismatch,
            }
        );
        assert_eq!(count_mismatched_lines(&diff), 1);
    }

    #[test]
    fn trailing_whitespace_is_trimmed_per_line() {
        let diff = compute_line_diff("1 \n2\r", "1\n2");
        assert_eq!(kinds(&diff), vec![Match, Match]);
    }

    #[test]
    fn extra_lines_on_either_side() {
        let diff = compute_line_diff("1\n2\n3", "1");
        assert_eq!(kinds(&diff), vec![Match, ExtraExpected, ExtraExpected]);
        assert_eq!(diff[2].expected, "3");
        assert_eq!(diff[2].actual, "");

        let diff = compute_line_diff("1", "1\n2");
        assert_eq!(kinds(&diff), vec![Match, ExtraActual]);
        assert_eq!(diff[1].line_num, 2);
        assert_eq!(diff[1].actual, "2");
    }

    #[test]
    fn inserted_line_cascades() {
        let diff = compute_line_diff("a\nb\nc", "x\na\nb\nc");
        assert_eq!(kinds(&diff), vec![Mismatch, Mismatch, Mismatch, ExtraActual]);
    }

    #[test]
    fn char_diff_is_index_aligned() {
        let diff = compute_char_diff("1 2 3", "1 3 2");
        let flags: Vec<bool> = diff.expected.iter().map(|c| c.differs).collect();
        assert_eq!(flags, vec![false, false, true, false, true]);
        assert_eq!(diff.actual.len(), 5);
    }

    #[test]
    fn char_diff_marks_overhang() {
        let diff = compute_char_diff("abc", "ab");
        assert_eq!(diff.expected.len(), 3);
        assert_eq!(diff.actual.len(), 2);
        assert!(diff.expected[2].differs);
        assert!(diff.actual.iter().all(|c| !c.differs));

        let diff = compute_char_diff("", "é");
        assert!(diff.expected.is_empty());
        assert_eq!(diff.actual, vec![DiffChar { ch: 'é', differs: true }]);
    }
}
