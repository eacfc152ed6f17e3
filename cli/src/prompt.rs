//! Interactive prompts for fields missing from the command line.

use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::str::FromStr;

use zeroize::Zeroizing;

/// Line prompter over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter on the process's terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for `label` until the answer parses. An empty answer keeps
    /// `current` when there is one.
    ///
    /// # Errors
    ///
    /// Fails when the input ends before a valid answer arrives.
    pub fn value<T>(&mut self, label: &str, current: Option<&T>) -> io::Result<T>
    where
        T: FromStr + Display + Clone,
        T::Err: Display,
    {
        loop {
            match current {
                Some(current) => write!(self.output, "{label} [{current}]: ")?,
                None => write!(self.output, "{label}: ")?,
            }
            self.output.flush()?;

            let answer = self.read_line()?;
            if answer.is_empty() {
                if let Some(current) = current {
                    return Ok(current.clone());
                }
                continue;
            }
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(err) => writeln!(self.output, "invalid {label}: {err}")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before every field was answered",
            ));
        }
        Ok(line.trim().to_owned())
    }
}

/// Use the flag value when given, otherwise prompt for it.
pub fn flag_or_prompt<T, R, W>(
    flag: Option<T>,
    prompter: &mut Prompter<R, W>,
    label: &str,
    current: Option<&T>,
) -> io::Result<T>
where
    T: FromStr + Display + Clone,
    T::Err: Display,
    R: BufRead,
    W: Write,
{
    match flag {
        Some(value) => Ok(value),
        None => prompter.value(label, current),
    }
}

/// Read a password without echoing it.
pub fn password(label: &str) -> io::Result<Zeroizing<String>> {
    rpassword::prompt_password(format!("{label}: ")).map(Zeroizing::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[rstest]
    fn retries_until_the_answer_parses() {
        let mut prompter = prompter("soon\n\n42\n");

        let value: i64 = prompter.value("duration", None).expect("value");

        assert_eq!(value, 42);
        let shown = String::from_utf8(prompter.output).expect("utf-8");
        assert!(shown.contains("invalid duration"));
    }

    #[rstest]
    fn empty_answer_keeps_current_value() {
        let mut prompter = prompter("\n");

        let label = prompter
            .value("label", Some(&"Morning run".to_owned()))
            .expect("value");

        assert_eq!(label, "Morning run");
        let shown = String::from_utf8(prompter.output).expect("utf-8");
        assert_eq!(shown, "label [Morning run]: ");
    }

    #[rstest]
    fn end_of_input_is_an_error() {
        let mut prompter = prompter("");

        let err = prompter.value::<String>("label", None).expect_err("eof");

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[rstest]
    fn flags_win_over_prompts() {
        let mut prompter = prompter("");

        let value = flag_or_prompt(Some(3.5_f64), &mut prompter, "value", None).expect("flag");

        assert!((value - 3.5).abs() < f64::EPSILON);
        assert!(prompter.output.is_empty());
    }
}
