//! CLI command handlers.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use survey_query::{Config, Guidance, QueryExecutor, RecordStore};

use super::output;

/// Survey data and executor shared by every query of one process.
pub struct Session {
    store: RecordStore,
    executor: QueryExecutor,
}

impl Session {
    /// Load the extract named by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        let store = survey_query::load_store(config).with_context(|| {
            format!(
                "Survey data could not be loaded from {}. Please check the file and try again.",
                config.data_path().display()
            )
        })?;
        Ok(Self {
            store,
            executor: QueryExecutor::from_config(config),
        })
    }

    fn answer(&self, query: &str, json_output: bool) -> Result<()> {
        let response = self.executor.run(query, &self.store);
        output::print_query_response(&response, json_output)
    }
}

/// Answer a single question.
pub fn run_query(session: &Session, query: &str, json_output: bool) -> Result<()> {
    session.answer(query, json_output)
}

/// Read questions from stdin, answering each before reading the next.
pub fn run_ask(session: &Session, json_output: bool) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    if !json_output {
        println!("Ask a question about the survey results (\"exit\" to quit).");
        output::print_examples(&Guidance::default(), false)?;
    }

    loop {
        if !json_output {
            print!("> ");
            stdout.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let query = line.trim();
        if query.is_empty() {
            if !json_output {
                println!("Please enter a query above.");
            }
            continue;
        }
        if matches!(query, "exit" | "quit") {
            break;
        }

        session.answer(query, json_output)?;
        if !json_output {
            println!();
        }
    }

    Ok(())
}

/// Show what the loaded extract contains.
pub fn run_stats(session: &Session, json_output: bool) -> Result<()> {
    output::print_store_summary(&session.store.summary(), json_output)
}

/// Show the example questions.
pub fn run_examples(json_output: bool) -> Result<()> {
    output::print_examples(&Guidance::default(), json_output)
}
