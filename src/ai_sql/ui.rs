//! Interactive question / confirm / execute loop

use crate::ai_sql::client::CompletionProvider;
use crate::ai_sql::error::{AiError, AiResult};
use crate::ai_sql::prompt::PromptGenerator;
use crate::ai_sql::schema::DatabaseSchema;
use crate::database::QueryExecutor;
use crate::format::format_query_results_psql;
use std::future::Future;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

pub const QUESTION_PROMPT: &str = "-> ";
pub const RESPONSE_START: &str = "Response start=======";
pub const RESPONSE_FINISH: &str = "Response finish======";
pub const CONFIRM_PROMPT: &str = "Execute query? [y/N]";

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    EndOfInput,
    Interrupted,
}

enum ReadOutcome {
    Line(String),
    EndOfInput,
    Interrupted,
    Failed(io::Error),
}

/// Drop the line terminator (`\n` or `\r\n`) and nothing else
fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Only an exact `y` confirms execution
pub fn is_confirmation(answer: &str) -> bool {
    answer == "y"
}

/// Interactive mode for AI SQL generation
pub struct InteractiveMode<'a, R, W> {
    input: R,
    output: W,
    schema: &'a DatabaseSchema,
    completion: &'a dyn CompletionProvider,
    executor: &'a dyn QueryExecutor,
}

impl<'a, R, W> InteractiveMode<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        input: R,
        output: W,
        schema: &'a DatabaseSchema,
        completion: &'a dyn CompletionProvider,
        executor: &'a dyn QueryExecutor,
    ) -> Self {
        Self {
            input,
            output,
            schema,
            completion,
            executor,
        }
    }

    /// Run until end of input or until `shutdown` resolves.
    ///
    /// Per-question failures are reported and the loop carries on; only a
    /// failure to write to the output stops it with an error.
    pub async fn run<F>(&mut self, shutdown: F) -> io::Result<LoopExit>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Interactive session started using {}", self.completion.name());

        loop {
            write!(self.output, "{}", QUESTION_PROMPT)?;
            self.output.flush()?;

            let question = match self.read_line(&mut shutdown).await {
                ReadOutcome::Line(line) => line,
                ReadOutcome::EndOfInput => return self.finish(LoopExit::EndOfInput),
                ReadOutcome::Interrupted => return self.finish(LoopExit::Interrupted),
                ReadOutcome::Failed(e) => {
                    self.report(&AiError::InputRead(e))?;
                    continue;
                }
            };

            let candidate = match self.generate_sql(&question).await {
                Ok(candidate) => candidate,
                Err(e) => {
                    self.report(&e)?;
                    continue;
                }
            };

            self.display_sql(&candidate)?;

            let answer = match self.read_line(&mut shutdown).await {
                ReadOutcome::Line(line) => line,
                ReadOutcome::EndOfInput => return self.finish(LoopExit::EndOfInput),
                ReadOutcome::Interrupted => return self.finish(LoopExit::Interrupted),
                ReadOutcome::Failed(e) => {
                    self.report(&AiError::InputRead(e))?;
                    continue;
                }
            };

            if !is_confirmation(&answer) {
                debug!("Candidate query declined");
                continue;
            }

            match self.execute(&candidate).await {
                Ok(table) => {
                    writeln!(self.output, "{}", table)?;
                }
                Err(e) => self.report(&e)?,
            }
        }
    }

    /// Compose the prompt and ask the completion service for candidate SQL
    async fn generate_sql(&self, question: &str) -> AiResult<String> {
        info!("Generating SQL for question: {}", question);
        let prompt = PromptGenerator::user_prompt(self.schema, question);
        debug!("Prompt length: {} chars", prompt.len());

        Ok(self.completion.complete(&prompt).await?)
    }

    async fn execute(&self, sql: &str) -> AiResult<String> {
        info!("Executing confirmed query");
        let results = self.executor.execute_query(sql).await?;
        Ok(format_query_results_psql(&results))
    }

    async fn read_line<S>(&mut self, shutdown: &mut S) -> ReadOutcome
    where
        S: Future<Output = ()> + Unpin,
    {
        let mut line = String::new();
        let result = tokio::select! {
            biased;
            _ = shutdown => None,
            read = self.input.read_line(&mut line) => Some(read),
        };

        match result {
            None => ReadOutcome::Interrupted,
            Some(Ok(0)) => ReadOutcome::EndOfInput,
            Some(Ok(_)) => ReadOutcome::Line(strip_line_ending(line)),
            Some(Err(e)) => ReadOutcome::Failed(e),
        }
    }

    /// Display generated SQL between the response markers, then ask to run it
    fn display_sql(&mut self, sql: &str) -> io::Result<()> {
        writeln!(self.output, "{}", RESPONSE_START)?;
        writeln!(self.output, "{}", sql)?;
        writeln!(self.output, "{}", RESPONSE_FINISH)?;
        writeln!(self.output, "{}", CONFIRM_PROMPT)?;
        self.output.flush()
    }

    fn report(&mut self, error: &AiError) -> io::Result<()> {
        warn!("{}", error);
        writeln!(self.output, "Error: {}", error.user_message())?;
        self.output.flush()
    }

    fn finish(&mut self, exit: LoopExit) -> io::Result<LoopExit> {
        writeln!(self.output)?;
        self.output.flush()?;
        info!("Interactive session ended: {:?}", exit);
        Ok(exit)
    }
}
