//! Ordered transform steps and their execution.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrubberError};
use crate::input::DataTable;
use crate::transform::Registry;

/// One named transform with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Transform name, resolved through the registry.
    pub name: String,
    /// Positional parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

impl Step {
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a step written on one line, e.g. `replace city "New York" NYC`.
    ///
    /// Words are separated by whitespace. Double quotes group words and are
    /// removed; inside them `\"` and `\\` stand for a quote and a backslash.
    /// Apostrophes and backslashes outside quotes are ordinary characters.
    pub fn parse(line: &str) -> Result<Self> {
        let invalid = |message: &str| ScrubberError::InvalidStep {
            step: line.to_string(),
            message: message.to_string(),
        };

        let mut words: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut in_word = false;
        let mut in_quotes = false;
        let mut chars = line.chars();

        while let Some(ch) = chars.next() {
            if in_quotes {
                match ch {
                    '"' => in_quotes = false,
                    '\\' => match chars.next() {
                        Some(c @ ('"' | '\\')) => current.push(c),
                        Some(c) => {
                            current.push('\\');
                            current.push(c);
                        }
                        None => current.push('\\'),
                    },
                    c => current.push(c),
                }
                continue;
            }

            match ch {
                '"' => {
                    in_quotes = true;
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            }
        }

        if in_quotes {
            return Err(invalid("unterminated quote"));
        }
        if in_word {
            words.push(current);
        }

        let mut words = words.into_iter();
        let name = words.next().ok_or_else(|| invalid("empty step"))?;
        Ok(Self {
            name,
            params: words.collect(),
        })
    }
}

impl FromStr for Step {
    type Err = ScrubberError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for param in &self.params {
            if param.is_empty() || param.chars().any(|c| c.is_whitespace() || c == '"') {
                write!(f, " \"")?;
                for c in param.chars() {
                    if c == '"' || c == '\\' {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "\"")?;
            } else {
                write!(f, " {}", param)?;
            }
        }
        Ok(())
    }
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Optional label used in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pipeline label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a step.
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a step.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Parse one step per line, skipping blank lines and `#` comments.
    pub fn parse_lines(text: &str) -> Result<Self> {
        let steps = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(Step::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name: None, steps })
    }

    /// Load a pipeline from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ScrubberError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let pipeline = serde_json::from_reader(BufReader::new(file))?;
        Ok(pipeline)
    }

    /// Save the pipeline as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ScrubberError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, threading the table through.
    ///
    /// Stops at the first error.
    pub fn execute(&self, registry: &Registry, table: Option<DataTable>) -> Result<PipelineRun> {
        let label = self.name.as_deref().unwrap_or("pipeline");
        tracing::info!(pipeline = label, steps = self.steps.len(), "Starting pipeline");

        let mut table = table;
        let mut reports = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let (rows_before, columns_before) = shape(table.as_ref());
            let operation = registry.create(table.take(), &step.name, &step.params)?;
            let description = operation.kind().description();
            tracing::info!(step = index + 1, name = %step.name, "{}", description);

            let result = operation.transform()?;
            tracing::debug!(
                step = index + 1,
                rows = result.row_count(),
                columns = result.column_count(),
                "Step finished"
            );

            reports.push(StepReport {
                name: step.name.clone(),
                params: step.params.clone(),
                description,
                rows_before,
                rows_after: result.row_count(),
                columns_before,
                columns_after: result.column_count(),
            });
            table = Some(result);
        }

        tracing::info!(pipeline = label, "Pipeline finished");
        Ok(PipelineRun {
            steps: reports,
            table,
        })
    }
}

fn shape(table: Option<&DataTable>) -> (Option<usize>, Option<usize>) {
    match table {
        Some(t) => (Some(t.row_count()), Some(t.column_count())),
        None => (None, None),
    }
}

/// What one step did to the table's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Transform name.
    pub name: String,
    /// Parameters as given.
    pub params: Vec<String>,
    /// Human-readable description of the operation.
    pub description: String,
    /// Row count going in (None if no table was open).
    pub rows_before: Option<usize>,
    pub rows_after: usize,
    /// Column count going in (None if no table was open).
    pub columns_before: Option<usize>,
    pub columns_after: usize,
}

/// Result of executing a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Per-step reports, in order.
    pub steps: Vec<StepReport>,
    /// Final table; `None` only if no table was given and no step ran.
    pub table: Option<DataTable>,
}
