use crate::error::{ErrorKind, Result};
use std::io::{self, BufRead, Write};

/// Asks the user whether to go ahead with something expensive.
pub trait Confirm {
    /// Present `prompt` and return whether the user agreed.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Interactive confirmation on the terminal.
///
/// Pressing ENTER (or answering `y`/`yes`) accepts; `n`/`no` declines. End of
/// input also declines, so a non-interactive run never silently starts a
/// multi-gigabyte download.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        ask(prompt, &mut io::stdin().lock(), &mut io::stdout().lock())
    }
}

/// Accepts everything without asking (the `--yes` flag).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        tracing::info!(prompt, "Confirmation assumed");
        Ok(true)
    }
}

fn ask(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    writeln!(output, "{prompt}").map_err(ErrorKind::Io)?;
    output.flush().map_err(ErrorKind::Io)?;
    let mut line = String::new();
    if input.read_line(&mut line).map_err(ErrorKind::Io)? == 0 {
        tracing::warn!("No answer on standard input; treating as declined");
        return Ok(false);
    }
    Ok(!matches!(line.trim().to_lowercase().as_str(), "n" | "no"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case("\n", true)]
    #[case("y\n", true)]
    #[case("YES\n", true)]
    #[case("whatever\n", true)]
    #[case("n\n", false)]
    #[case("  No \n", false)]
    #[case("", false)]
    fn test_ask(#[case] answer: &str, #[case] expected: bool) {
        let mut input = Cursor::new(answer.as_bytes());
        let mut output = Vec::new();
        assert_eq!(ask("Download?", &mut input, &mut output).unwrap(), expected);
        assert_eq!(output, b"Download?\n");
    }

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("Download?").unwrap());
    }
}
