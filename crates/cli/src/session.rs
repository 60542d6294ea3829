//! The interactive part: the update prompt and the question loop.
//!
//! Everything here works on any `BufRead`/`Write` pair, so the binary passes
//! stdin/stdout and tests pass in-memory buffers.

use async_trait::async_trait;
use common::AssistantResult;
use console::style;
use router::AgentExecutor;
use std::io::{self, BufRead, Write};

pub const UPDATE_PROMPT: &str = "Do you want to update the issues (y/N):";
pub const QUESTION_PROMPT: &str = "Ask a question about github issues (q to quit): ";
pub const QUIT: &str = "q";

/// Anything that turns a question into an answer
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, question: &str) -> AssistantResult<String>;
}

#[async_trait]
impl Answerer for AgentExecutor {
    async fn answer(&self, question: &str) -> AssistantResult<String> {
        Ok(self.invoke(question).await?.output)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub answered: usize,
    pub failed: usize,
}

/// Only an exact `y` or `yes` means yes.
pub fn should_update(answer: &str) -> bool {
    matches!(answer.trim_end_matches(['\r', '\n']), "y" | "yes")
}

/// Read one line without its line ending. `None` at end of input.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

/// Show the update prompt and read the answer. End of input counts as no.
pub fn ask_update<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<bool> {
    write!(writer, "{}", style(UPDATE_PROMPT).bold())?;
    writer.flush()?;

    Ok(read_line(reader)?.map(|a| should_update(&a)).unwrap_or(false))
}

/// Prompt for questions until `q` or end of input.
///
/// A failed question is reported and the loop goes on.
pub async fn question_loop<R, W, A>(
    reader: &mut R,
    writer: &mut W,
    answerer: &A,
) -> io::Result<LoopSummary>
where
    R: BufRead,
    W: Write,
    A: Answerer + ?Sized,
{
    let mut summary = LoopSummary::default();

    loop {
        write!(writer, "{}", style(QUESTION_PROMPT).cyan().bold())?;
        writer.flush()?;

        let question = match read_line(reader)? {
            None => {
                writeln!(writer)?;
                break;
            }
            Some(line) if line == QUIT => break,
            Some(line) => line,
        };

        if question.trim().is_empty() {
            continue;
        }

        match answerer.answer(&question).await {
            Ok(answer) => {
                writeln!(writer, "{}", answer)?;
                summary.answered += 1;
            }
            Err(e) => {
                writeln!(writer, "{} {}", style("Error:").red().bold(), e)?;
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_should_update() {
        assert!(should_update("y"));
        assert!(should_update("yes"));
        assert!(should_update("y\n"));
        assert!(should_update("yes\r\n"));

        assert!(!should_update(""));
        assert!(!should_update("n"));
        assert!(!should_update("Y"));
        assert!(!should_update("YES"));
        assert!(!should_update(" y"));
        assert!(!should_update("yeah"));
    }

    #[test]
    fn test_read_line_strips_line_endings() {
        let mut input = Cursor::new("first\r\nsecond\nlast");
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("first"));
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("second"));
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("last"));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }

    #[test]
    fn test_ask_update() {
        let mut out = Vec::new();
        assert!(ask_update(&mut Cursor::new("y\n"), &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains(UPDATE_PROMPT));

        let mut out = Vec::new();
        assert!(!ask_update(&mut Cursor::new("\n"), &mut out).unwrap());
        assert!(!ask_update(&mut Cursor::new(""), &mut out).unwrap());
    }
}
