//! Run command - execute a pipeline and summarize each step.

use std::path::PathBuf;

use colored::Colorize;
use scrubber::{
    ParserConfig, Pipeline, PipelineReport, Scrubber, ScrubberConfig, Step, StepReport,
};

/// Arguments for `scrubber run`.
pub struct RunArgs {
    pub path: Option<PathBuf>,
    pub pipeline: Option<PathBuf>,
    pub delimiter: Option<u8>,
    pub no_header: bool,
    pub steps: Vec<String>,
}

pub fn run(
    args: RunArgs,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(&args)?;
    if pipeline.is_empty() {
        return Err("No steps given. Pass steps as arguments or use --pipeline.".into());
    }
    if json_output {
        check_json_output(&pipeline)?;
    }

    let mut parser = ParserConfig::default();
    if let Some(delimiter) = args.delimiter {
        parser = parser.with_delimiter(delimiter);
    }
    if args.no_header {
        parser = parser.without_header();
    }

    let scrubber = Scrubber::with_config(ScrubberConfig { parser });
    let report = scrubber.run(&pipeline, args.path.as_deref())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, verbose);
    }

    Ok(())
}

/// Steps from the pipeline file first, then positional steps.
fn build_pipeline(args: &RunArgs) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let mut pipeline = match &args.pipeline {
        Some(path) => Pipeline::load(path)?,
        None => Pipeline::new(),
    };
    for line in &args.steps {
        pipeline.push(Step::parse(line)?);
    }
    Ok(pipeline)
}

/// Steps that write the table to stdout, where the JSON report goes.
const STDOUT_STEPS: &[&str] = &["print", "print-columns"];

fn check_json_output(pipeline: &Pipeline) -> Result<(), Box<dyn std::error::Error>> {
    match pipeline
        .steps
        .iter()
        .find(|s| STDOUT_STEPS.contains(&s.name.as_str()))
    {
        Some(step) => Err(format!(
            "--json cannot be combined with a '{}' step; both write to stdout.",
            step.name
        )
        .into()),
        None => Ok(()),
    }
}

fn print_summary(report: &PipelineReport, verbose: bool) {
    println!();
    if let Some(source) = &report.source {
        println!(
            "{} {} ({} rows, {} columns)",
            "Loaded".cyan().bold(),
            source.file.white(),
            source.row_count,
            source.column_count
        );
        if verbose {
            println!("  Format: {}", source.format);
            println!("  SHA-256: {}", source.hash.dimmed());
        }
        println!();
    }

    println!("{}", "Steps:".yellow().bold());
    for (index, step) in report.steps.iter().enumerate() {
        println!(
            "  {}. {} {}",
            index + 1,
            step.description.white(),
            shape_change(step)
        );
    }
    println!();

    match (report.rows(), report.columns()) {
        (Some(rows), Some(columns)) => println!(
            "{} {} rows, {} columns",
            "Done:".green().bold(),
            rows.to_string().white().bold(),
            columns.to_string().white().bold()
        ),
        _ => println!("{}", "Done.".green().bold()),
    }
}

fn shape_change(step: &StepReport) -> String {
    let rows = match step.rows_before {
        Some(before) if before != step.rows_after => {
            let removed = before.saturating_sub(step.rows_after);
            format!("{} -> {} rows (-{})", before, step.rows_after, removed)
                .red()
                .to_string()
        }
        _ => format!("{} rows", step.rows_after).dimmed().to_string(),
    };

    match step.columns_before {
        Some(before) if before != step.columns_after => format!(
            "[{}, {}]",
            rows,
            format!("{} -> {} columns", before, step.columns_after).blue()
        ),
        _ => format!("[{}]", rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(steps: &[&str]) -> RunArgs {
        RunArgs {
            path: None,
            pipeline: None,
            delimiter: None,
            no_header: false,
            steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_build_pipeline_from_arguments() {
        let pipeline = build_pipeline(&args(&["camelcase", "replace city \"New York\" NYC"])).unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.steps[1], Step::new("replace", ["city", "New York", "NYC"]));
    }

    #[test]
    fn test_build_pipeline_rejects_bad_step() {
        assert!(build_pipeline(&args(&["replace \"open"])).is_err());
    }

    #[test]
    fn test_json_output_rejects_print_steps() {
        let pipeline = build_pipeline(&args(&["not-na email", "print"])).unwrap();
        let err = check_json_output(&pipeline).unwrap_err();
        assert!(err.to_string().contains("'print'"));

        let pipeline = build_pipeline(&args(&["print-columns"])).unwrap();
        assert!(check_json_output(&pipeline).is_err());

        let pipeline = build_pipeline(&args(&["not-na email", "save out.csv"])).unwrap();
        assert!(check_json_output(&pipeline).is_ok());
    }

    #[test]
    fn test_json_run_fails_before_running_steps() {
        let result = run(args(&["print"]), true, false);
        assert!(result.unwrap_err().to_string().contains("--json"));
    }

    #[test]
    fn test_shape_change() {
        colored::control::set_override(false);
        let step = StepReport {
            name: "lower".to_string(),
            params: vec!["email".to_string()],
            description: "Lowercase values in 'email'".to_string(),
            rows_before: Some(3),
            rows_after: 3,
            columns_before: Some(2),
            columns_after: 2,
        };
        assert_eq!(shape_change(&step), "[3 rows]");

        let step = StepReport {
            rows_after: 1,
            columns_after: 1,
            ..step
        };
        assert_eq!(shape_change(&step), "[3 -> 1 rows (-2), 2 -> 1 columns]");
    }
}
