use crate::runner::RecordResult;
use std::io::Write;
use std::time::Duration;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub struct Output {
    stdout: StandardStream,
}

impl Output {
    pub fn new(color: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(color_choice),
        }
    }

    fn set_color(&mut self, color: Color) {
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    }

    fn set_bold(&mut self) {
        let _ = self.stdout.set_color(ColorSpec::new().set_bold(true));
    }

    fn set_dim(&mut self) {
        let _ = self.stdout.set_color(ColorSpec::new().set_dimmed(true));
    }

    fn reset(&mut self) {
        let _ = self.stdout.reset();
    }

    pub fn print_result(&mut self, result: &RecordResult) -> std::io::Result<()> {
        if result.matched() {
            self.set_color(Color::Green);
            write!(self.stdout, "✓")?;
        } else {
            self.set_color(Color::Yellow);
            write!(self.stdout, "⊘")?;
        }
        self.reset();

        write!(self.stdout, " line {} ({})", result.line, result.kind)?;

        match (result.clause, result.label(), &result.message) {
            (Some(clause), Some(label), Some(message)) => {
                self.set_dim();
                write!(self.stdout, " clause {} [{}]", clause, label)?;
                self.reset();
                writeln!(self.stdout, ": {}", message)?;
            }
            _ => {
                self.set_dim();
                writeln!(self.stdout, " no clause matched")?;
                self.reset();
            }
        }
        Ok(())
    }

    pub fn print_results(
        &mut self,
        results: &[RecordResult],
        elapsed: Duration,
    ) -> std::io::Result<()> {
        for result in results {
            self.print_result(result)?;
        }

        let matched = results.iter().filter(|r| r.matched()).count();
        let unmatched = results.len() - matched;

        writeln!(self.stdout)?;
        self.set_bold();
        write!(self.stdout, "{} records", results.len())?;
        self.reset();
        write!(self.stdout, ": ")?;
        self.set_color(Color::Green);
        write!(self.stdout, "{} matched", matched)?;
        self.reset();
        write!(self.stdout, ", ")?;
        if unmatched > 0 {
            self.set_color(Color::Yellow);
        }
        write!(self.stdout, "{} unmatched", unmatched)?;
        self.reset();
        self.set_dim();
        writeln!(self.stdout, " in {:.2}s", elapsed.as_secs_f64())?;
        self.reset();
        self.stdout.flush()
    }

    pub fn print_json(&mut self, results: &[RecordResult]) -> crate::error::Result<()> {
        for result in results {
            writeln!(self.stdout, "{}", serde_json::to_string(result)?)?;
        }
        self.stdout.flush()?;
        Ok(())
    }
}
