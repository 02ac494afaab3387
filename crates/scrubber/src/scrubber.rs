//! Main Scrubber struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::pipeline::{Pipeline, StepReport};
use crate::transform::Registry;

/// Configuration for running pipelines.
#[derive(Debug, Clone, Default)]
pub struct ScrubberConfig {
    /// Parser configuration, used for the input file and for `open` steps.
    pub parser: ParserConfig,
}

/// Result of running a pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Metadata about the input file, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// What each step did.
    pub steps: Vec<StepReport>,
    /// Final table.
    #[serde(skip)]
    pub table: Option<DataTable>,
}

impl PipelineReport {
    /// Final row count, if a table exists.
    pub fn rows(&self) -> Option<usize> {
        self.table.as_ref().map(DataTable::row_count)
    }

    /// Final column count, if a table exists.
    pub fn columns(&self) -> Option<usize> {
        self.table.as_ref().map(DataTable::column_count)
    }
}

/// Runs transform pipelines over delimited files.
pub struct Scrubber {
    parser: Parser,
    registry: Registry,
}

impl Scrubber {
    /// Create a new Scrubber with default configuration.
    pub fn new() -> Self {
        Self::with_config(ScrubberConfig::default())
    }

    /// Create a Scrubber with custom configuration.
    pub fn with_config(config: ScrubberConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let registry = Registry::new().with_parser_config(config.parser);
        Self { parser, registry }
    }

    /// Replace the transform registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Run a pipeline, optionally loading `input` as the starting table.
    ///
    /// Without an input the pipeline has to `open` a table before anything
    /// that needs one.
    pub fn run(&self, pipeline: &Pipeline, input: Option<&Path>) -> Result<PipelineReport> {
        let (table, source) = match input {
            Some(path) => {
                let (table, source) = self.parser.parse_file(path)?;
                (Some(table), Some(source))
            }
            None => (None, None),
        };

        let run = pipeline.execute(&self.registry, table)?;
        Ok(PipelineReport {
            source,
            steps: run.steps,
            table: run.table,
        })
    }

    /// Run a pipeline over a table already in memory.
    pub fn run_table(&self, pipeline: &Pipeline, table: DataTable) -> Result<PipelineReport> {
        let run = pipeline.execute(&self.registry, Some(table))?;
        Ok(PipelineReport {
            source: None,
            steps: run.steps,
            table: run.table,
        })
    }
}

impl Default for Scrubber {
    fn default() -> Self {
        Self::new()
    }
}
