use colored::{Color, ColoredString, Colorize};
use crossterm::terminal;

use crate::storage::Submission;
use crate::testing::{
    compute_char_diff, compute_line_diff, count_mismatched_lines, DiffChar, LineDiffKind,
    RunSummary, StressResult, TestCase, Verdict,
};

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

impl ColorTheme for Verdict {
    fn color(&self) -> Color {
        use Verdict::*;
        if !self::is_truecolor_supported() {
            return match self {
                AC => Color::Green,
                WA => Color::Yellow,
                TLE => Color::Red,
                RTE => Color::Magenta,
                CE => Color::Blue,
                Pending | Running => Color::BrightBlack,
            };
        }

        let (r, g, b) = match self {
            AC => (30, 180, 40),
            WA => (210, 138, 4),
            TLE => (220, 42, 42),
            RTE => (171, 40, 200),
            CE => (40, 110, 220),
            Pending | Running => (110, 110, 110),
        };
        Color::TrueColor { r, g, b }
    }
}

pub fn verdict_icon(verdict: Verdict) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    // Widest judged verdict is 3 chars.
    format!(" {:<3} ", verdict.to_string())
        .on_color(verdict.color())
        .bold()
        .color(fg)
}

pub fn print_run_summary(summary: &RunSummary) {
    let bar = "-".repeat(5);
    print!("{} ", bar);

    let count = summary.count_by_verdict();
    let num_total_test = summary.len();
    let num_passed = summary.num_accepted();
    let num_failed = num_total_test - num_passed;

    if summary.all_accepted() {
        let msg = format!("All {} tests passed ✨", num_total_test);
        print!("{}", msg.green());
    } else {
        let summary_msg = if num_passed > 0 {
            format!("{}/{} tests failed 💣", num_failed, num_total_test)
        } else {
            format!("All {} tests failed 💀", num_total_test)
        };

        let mut failed: Vec<_> = count
            .iter()
            .filter(|(&verdict, _)| verdict != Verdict::AC)
            .collect();
        failed.sort_by_key(|(&verdict, _)| verdict as u8);
        let detail_msg = failed
            .into_iter()
            .map(|(&verdict, &cnt)| {
                format!(
                    "{}{}{}",
                    self::verdict_icon(verdict),
                    "x".dimmed(),
                    cnt.to_string().bold().bright_white(),
                )
            })
            .collect::<Vec<String>>()
            .join(", ");

        print!("{} ({})", summary_msg.bright_red(), detail_msg);
    }

    println!(" {}", bar);
    if summary.newly_solved {
        println!("{}", "Problem solved 🎉".green().bold());
    }
}

const BOLD_LINE: &str = "━";
const THIN_LINE: &str = "─";

fn term_cols() -> usize {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    cols as usize
}

fn print_sub_title(s: &str, cols: usize) {
    println!(
        "{}{}",
        s.cyan().bold(),
        THIN_LINE
            .repeat(cols.saturating_sub(s.chars().count() + 1))
            .bright_black(),
    )
}

fn print_text(s: &str) {
    if s.is_empty() {
        println!("{}", "<EMPTY>".magenta().dimmed());
        return;
    }
    print!("{}", s);
    if !s.ends_with('\n') {
        println!();
    }
}

fn highlighted(chars: &[DiffChar], color: Color) -> String {
    chars
        .iter()
        .map(|c| {
            let s = c.ch.to_string();
            if c.differs {
                s.on_color(color).bold().to_string()
            } else {
                s
            }
        })
        .collect()
}

/// Prints expected and actual output side by side per line, highlighting the
/// differing characters of mismatched lines.
pub fn print_output_diff(expected: &str, actual: &str) {
    let diff = compute_line_diff(expected, actual);
    let width = diff.len().to_string().len();
    println!(
        "{}",
        format!("{} mismatched line(s)", count_mismatched_lines(&diff)).bright_red()
    );

    for d in &diff {
        let num = format!("{:>width$}", d.line_num, width = width).bright_black();
        match d.kind {
            LineDiffKind::Match => println!("{}   {}", num, d.expected),
            LineDiffKind::Mismatch => {
                let chars = compute_char_diff(d.expected, d.actual);
                println!(
                    "{} {} {}",
                    num,
                    "-".green(),
                    highlighted(&chars.expected, Color::Green)
                );
                println!(
                    "{} {} {}",
                    " ".repeat(width),
                    "+".red(),
                    highlighted(&chars.actual, Color::Red)
                );
            }
            LineDiffKind::ExtraExpected => {
                println!("{} {} {}", num, "-".green(), d.expected.on_green())
            }
            LineDiffKind::ExtraActual => println!("{} {} {}", num, "+".red(), d.actual.on_red()),
        }
    }
}

/// Detail of a testcase that was not accepted.
pub fn print_testcase_detail(index: usize, t: &TestCase) {
    let cols = term_cols();
    let bold_bar = BOLD_LINE.repeat(cols).blue().bold();
    let verdict = t.verdict();
    let time = t
        .execution_time()
        .map(|d| format!(" [{}ms]", d.as_millis()))
        .unwrap_or_default();

    println!(
        "\n{}: {}{}\n{}",
        format!("Testcase #{}", index + 1)
            .color(Color::BrightYellow)
            .bold(),
        self::verdict_icon(verdict),
        time,
        bold_bar,
    );

    print_sub_title("[input]", cols);
    print_text(t.input());

    let actual = t.actual_output().unwrap_or_default();
    match verdict {
        Verdict::WA => {
            print_sub_title("[diff: expected(-) / actual(+)]", cols);
            print_output_diff(t.expected_output(), actual);
        }
        Verdict::CE => {
            print_sub_title("[compile error]", cols);
            print_text(actual);
        }
        Verdict::RTE | Verdict::TLE => {
            print_sub_title("[expected]", cols);
            print_text(t.expected_output());
            print_sub_title("[output]", cols);
            print_text(actual);
        }
        _ => {}
    }

    println!("{}", bold_bar);
}

pub fn print_counterexample(r: &StressResult) {
    let cols = term_cols();
    let bold_bar = BOLD_LINE.repeat(cols).red().bold();
    println!(
        "\n{} {} [{}ms]\n{}",
        "Counter-example found on test".bright_red().bold(),
        format!("#{}", r.test_number).bold(),
        r.time.as_millis(),
        bold_bar
    );
    print_sub_title("[input]", cols);
    print_text(&r.input);
    print_sub_title("[diff: reference(-) / candidate(+)]", cols);
    print_output_diff(&r.expected_output, &r.actual_output);
    println!("{}", bold_bar);
}

pub fn print_submission(s: &Submission) {
    let time = s
        .execution_time_ms
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "-".to_owned());
    println!(
        "{} {} {:>10} {:>8}  {}",
        s.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
        self::verdict_icon(s.verdict),
        s.language.to_string(),
        time,
        s.id.dimmed(),
    );
}
