//! Output normalization shared by the verdict rules and the stress loop.
//!
//! Two outputs are equal when they agree after trailing whitespace is removed from
//! every line and trailing blank lines are dropped. Whitespace inside a line, the
//! number of lines and their order are all significant.

pub fn normalize_output(s: &str) -> String {
    let mut lines: Vec<&str> = s.split('\n').map(str::trim_end).collect();
    while lines.last().map_or(false, |line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n").trim_end().to_owned()
}

pub fn compare_outputs(expected: &str, actual: &str) -> bool {
    normalize_output(expected) == normalize_output(actual)
}
