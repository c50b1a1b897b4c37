//! Line-based prompts for the interactive session.
//!
//! Every question re-asks until the answer is in its accepted set, so callers
//! only ever see validated values.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use bikeshare_explorer::error::InvalidFilterValue;
use bikeshare_explorer::filters::{City, DayFilter, MonthFilter};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Reads one trimmed, lowercased line. `None` at end of input.
    fn read_answer(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }

    fn ask<T>(&mut self, question: &str) -> io::Result<Option<T>>
    where
        T: FromStr<Err = InvalidFilterValue>,
    {
        let mut question = question.to_string();
        loop {
            let Some(answer) = self.read_answer(&question)? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    tracing::debug!(axis = %e.axis, value = %e.value, "Rejected input");
                    question = format!("Invalid input, enter one of the following ({}): ", e.expected);
                }
            }
        }
    }

    pub fn ask_city(&mut self) -> io::Result<Option<City>> {
        self.ask(
            "Which city's bikeshare data do you want to explore (chicago, new york city or washington)?: ",
        )
    }

    pub fn ask_month(&mut self) -> io::Result<Option<MonthFilter>> {
        self.ask(
            "Month that you want to explore the data for ('all', 'january', 'february', 'march', 'april', 'may', 'june')?: ",
        )
    }

    pub fn ask_day(&mut self) -> io::Result<Option<DayFilter>> {
        self.ask(
            "Day of the week that you want to explore the data for ('all', 'monday', 'tuesday', 'wednesday', 'thursday', 'friday', 'saturday', 'sunday')?: ",
        )
    }

    /// Asks until the answer is `yes` or `no`. End of input counts as `no`.
    pub fn ask_yes_no(&mut self, question: &str) -> io::Result<bool> {
        let mut question = question.to_string();
        loop {
            match self.read_answer(&question)?.as_deref() {
                Some("yes" | "y") => return Ok(true),
                Some("no" | "n") | None => return Ok(false),
                Some(_) => question = "Invalid input, please type 'yes' or 'no': \n".to_string(),
            }
        }
    }
}
