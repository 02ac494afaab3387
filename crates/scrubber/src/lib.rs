//! Scrubber: named, parameterized transform pipelines for tabular data.
//!
//! A delimited file is read into a [`DataTable`], a sequence of transforms is
//! applied to it (rename columns, filter rows, drop/replace/strip values,
//! validate emails, convert date formats), and the result is written back out.
//!
//! Transforms are looked up by name in a [`Registry`] and configured with
//! positional string parameters, so a pipeline is just a list of
//! `(name, params)` steps.
//!
//! # Example
//!
//! ```no_run
//! use scrubber::{Pipeline, Scrubber, Step};
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new()
//!     .with_step(Step::parse("camelcase").unwrap())
//!     .with_step(Step::parse("filter is-na email").unwrap())
//!     .with_step(Step::parse("save contacts_clean.csv").unwrap());
//!
//! let report = Scrubber::new()
//!     .run(&pipeline, Some(Path::new("contacts.csv")))
//!     .unwrap();
//! println!("Rows left: {:?}", report.rows());
//! ```

pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod transform;

mod scrubber;

pub use crate::scrubber::{PipelineReport, Scrubber, ScrubberConfig};
pub use error::{Result, ScrubberError};
pub use input::{Cell, DataTable, Parser, ParserConfig, SourceMetadata};
pub use output::{OutputFormat, Writer};
pub use pipeline::{Pipeline, PipelineRun, Step, StepReport};
pub use transform::{ColumnTransform, Filter, Operation, Registry, Transform, TransformInfo, create};
