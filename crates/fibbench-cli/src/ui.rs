//! UI helpers for CLI display.

use console::style;

use fibbench_orchestration::interfaces::Verdict;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

/// `✔` for a pass, `✗` for a failure; green or red when `colors` is set.
#[must_use]
pub fn verdict_glyph(verdict: Verdict, colors: bool) -> String {
    let glyph = match verdict {
        Verdict::Pass => "\u{2714}",
        Verdict::Fail => "\u{2717}",
    };
    if !colors {
        return glyph.to_string();
    }
    let styled = match verdict {
        Verdict::Pass => style(glyph).green().bold(),
        Verdict::Fail => style(glyph).red().bold(),
    };
    styled.force_styling(true).to_string()
}

/// Print a success message.
pub fn print_success(text: &str) {
    if is_color_disabled() {
        println!("[OK] {text}");
    } else {
        println!("{} {text}", style("[OK]").green().bold());
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_glyphs() {
        assert_eq!(verdict_glyph(Verdict::Pass, false), "\u{2714}");
        assert_eq!(verdict_glyph(Verdict::Fail, false), "\u{2717}");
    }

    #[test]
    fn colored_glyphs_carry_escape_codes() {
        let pass = verdict_glyph(Verdict::Pass, true);
        assert!(pass.contains("\u{2714}"));
        assert!(pass.starts_with('\u{1b}'));
        assert_eq!(console::measure_text_width(&pass), 1);
    }

    #[test]
    fn print_functions_do_not_panic() {
        print_success("all cells passed");
        print_error("1 result(s) disagree with the oracle");
    }
}
