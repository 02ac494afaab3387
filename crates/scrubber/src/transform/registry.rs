//! Name → transform factory registry.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, ScrubberError};
use crate::input::{DataTable, ParserConfig};

use super::column::DateConverter;
use super::operations::{ColumnTransform, Filter, Transform};

/// Builds a [`Transform`] from positional parameters.
///
/// The registry is passed in so composite transforms can resolve inner names.
pub type Factory = fn(&Registry, Params<'_>) -> Result<Transform>;

/// Descriptive information about a registered transform.
#[derive(Debug, Clone, Serialize)]
pub struct TransformInfo {
    /// Name used in pipelines.
    pub name: &'static str,
    /// Positional parameter names, in order. A trailing `...` means the rest
    /// is passed through.
    pub params: &'static [&'static str],
    /// One-line summary.
    pub summary: &'static str,
}

/// Positional parameters for one transform, with arity checks.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    transform: &'a str,
    values: &'a [String],
}

impl<'a> Params<'a> {
    pub fn new(transform: &'a str, values: &'a [String]) -> Self {
        Self { transform, values }
    }

    /// Name of the transform these parameters belong to.
    pub fn transform(&self) -> &'a str {
        self.transform
    }

    /// Get the parameter at `position`, or fail with `MissingParameter`.
    pub fn required(&self, position: usize, name: &'static str) -> Result<&'a str> {
        self.values
            .get(position)
            .map(String::as_str)
            .ok_or_else(|| ScrubberError::MissingParameter {
                transform: self.transform.to_string(),
                position,
                name,
            })
    }

    /// All parameters from `position` on.
    pub fn rest(&self, position: usize) -> &'a [String] {
        self.values.get(position..).unwrap_or(&[])
    }

    /// Log parameters past the ones the transform uses.
    fn note_unused(&self, used: usize) {
        let extra = self.rest(used);
        if !extra.is_empty() {
            tracing::debug!(transform = self.transform, ?extra, "Ignoring extra parameters");
        }
    }
}

struct Entry {
    info: TransformInfo,
    factory: Factory,
}

/// Maps transform names to factories.
///
/// [`Registry::default`] registers the built-in transforms. More can be
/// added with [`Registry::register`]; a later registration under the same
/// name replaces the earlier one.
pub struct Registry {
    entries: IndexMap<&'static str, Entry>,
    parser: ParserConfig,
}

impl Registry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
            parser: ParserConfig::default(),
        }
    }

    /// Create a registry with the built-in transforms.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (info, factory) in builtins() {
            registry.register(info, factory);
        }
        registry
    }

    /// Parser settings handed to `open`.
    pub fn with_parser_config(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn parser_config(&self) -> &ParserConfig {
        &self.parser
    }

    /// Register a transform.
    pub fn register(&mut self, info: TransformInfo, factory: Factory) {
        self.entries.insert(info.name, Entry { info, factory });
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered transforms in registration order.
    pub fn transforms(&self) -> impl Iterator<Item = &TransformInfo> {
        self.entries.values().map(|e| &e.info)
    }

    /// Build a transform from its name and parameters.
    ///
    /// Fails with `UnsupportedTransform` for unknown names and with
    /// `MissingParameter` when a required parameter is absent.
    pub fn build(&self, name: &str, params: &[String]) -> Result<Transform> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ScrubberError::UnsupportedTransform {
                name: name.to_string(),
            })?;
        (entry.factory)(self, Params::new(name, params))
    }

    /// Build an operation bound to `table`.
    ///
    /// `table` is `None` before anything has been opened.
    pub fn create(
        &self,
        table: Option<DataTable>,
        name: &str,
        params: &[String],
    ) -> Result<Operation> {
        let transform = self.build(name, params)?;
        Ok(Operation {
            name: name.to_string(),
            table,
            transform,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an operation using the built-in transforms.
pub fn create(table: Option<DataTable>, name: &str, params: &[String]) -> Result<Operation> {
    Registry::new().create(table, name, params)
}

/// One pipeline step: a transform bound to the table it will run on.
///
/// Consumed by [`Operation::transform`].
#[derive(Debug, Clone)]
pub struct Operation {
    name: String,
    table: Option<DataTable>,
    transform: Transform,
}

impl Operation {
    /// The name the operation was created under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &Transform {
        &self.transform
    }

    /// The resolved column, for column-scoped operations.
    pub fn column(&self) -> Option<&str> {
        self.transform.column()
    }

    pub fn table(&self) -> Option<&DataTable> {
        self.table.as_ref()
    }

    /// Run the operation and return the resulting table.
    pub fn transform(self) -> Result<DataTable> {
        self.transform.apply(self.table)
    }
}

fn builtin(
    name: &'static str,
    params: &'static [&'static str],
    summary: &'static str,
    factory: Factory,
) -> (TransformInfo, Factory) {
    (
        TransformInfo {
            name,
            params,
            summary,
        },
        factory,
    )
}

/// Built-in transforms in listing order.
fn builtins() -> Vec<(TransformInfo, Factory)> {
    vec![
        builtin("print", &[], "Print the table", |_, p| {
            p.note_unused(0);
            Ok(Transform::Print)
        }),
        builtin("print-columns", &[], "Print the column names", |_, p| {
            p.note_unused(0);
            Ok(Transform::PrintColumns)
        }),
        builtin(
            "open",
            &["path", "..."],
            "Replace the working table with a file",
            |registry, p| {
                let path = PathBuf::from(p.required(0, "path")?);
                p.note_unused(1);
                Ok(Transform::Open {
                    path,
                    parser: registry.parser_config().clone(),
                })
            },
        ),
        builtin("save", &["path"], "Write the table to a file", |_, p| {
            let path = PathBuf::from(p.required(0, "path")?);
            p.note_unused(1);
            Ok(Transform::Save { path })
        }),
        builtin(
            "filter",
            &["transform", "..."],
            "Remove the rows a column transform would keep",
            |registry, p| {
                let inner_name = p.required(0, "transform")?;
                match registry.build(inner_name, p.rest(1))? {
                    Transform::Column(inner) => Ok(Transform::Filter(Filter::new(inner))),
                    other => Err(ScrubberError::NotColumnScoped {
                        transform: other.name().to_string(),
                    }),
                }
            },
        ),
        builtin("is-na", &["column"], "Keep rows where the column is null", |_, p| {
            let column = column_param(p, 1)?;
            Ok(Transform::Column(ColumnTransform::IsNa { column }))
        }),
        builtin(
            "not-na",
            &["column"],
            "Keep rows where the column is not null",
            |_, p| {
                let column = column_param(p, 1)?;
                Ok(Transform::Column(ColumnTransform::NotNa { column }))
            },
        ),
        builtin("drop-column", &["column"], "Remove the column", |_, p| {
            let column = column_param(p, 1)?;
            Ok(Transform::Column(ColumnTransform::DropColumn { column }))
        }),
        builtin("camelcase", &[], "Rename all columns to camelCase", |_, p| {
            p.note_unused(0);
            Ok(Transform::CamelCase)
        }),
        builtin("lower", &["column"], "Lowercase the column's values", |_, p| {
            let column = column_param(p, 1)?;
            Ok(Transform::Column(ColumnTransform::Lower { column }))
        }),
        builtin(
            "date-convert",
            &["column", "strptime_format", "strftime_format"],
            "Reformat UTC dates into local time",
            |_, p| {
                let column = p.required(0, "column")?.to_string();
                let converter = DateConverter::new(
                    p.required(1, "strptime_format")?,
                    p.required(2, "strftime_format")?,
                )?;
                p.note_unused(3);
                Ok(Transform::Column(ColumnTransform::DateConvert { column, converter }))
            },
        ),
        builtin(
            "replace",
            &["column", "find", "replace"],
            "Replace a literal substring in the column",
            |_, p| {
                let column = p.required(0, "column")?.to_string();
                let find = p.required(1, "find")?.to_string();
                let replace = p.required(2, "replace")?.to_string();
                p.note_unused(3);
                Ok(Transform::Column(ColumnTransform::Replace {
                    column,
                    find,
                    replace,
                }))
            },
        ),
        builtin(
            "strip",
            &["column"],
            "Trim surrounding whitespace in the column",
            |_, p| {
                let column = column_param(p, 1)?;
                Ok(Transform::Column(ColumnTransform::Strip { column }))
            },
        ),
        builtin(
            "valid-email",
            &["column"],
            "Keep rows whose column value is an email address",
            |_, p| {
                let column = column_param(p, 1)?;
                Ok(Transform::Column(ColumnTransform::ValidEmail { column }))
            },
        ),
    ]
}

/// Parameter 0 as the target column; anything from `used` on is unused.
fn column_param(p: Params<'_>, used: usize) -> Result<String> {
    let column = p.required(0, "column")?.to_string();
    p.note_unused(used);
    Ok(column)
}
