//! Transforms command - list registered transforms.

use colored::Colorize;
use scrubber::Registry;

pub fn run(json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::new();

    if json_output {
        let infos: Vec<_> = registry.transforms().collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!("{}", "Available transforms:".cyan().bold());
    println!();

    for info in registry.transforms() {
        let params: Vec<String> = info.params.iter().map(|p| format!("<{}>", p)).collect();
        println!("  {} {}", info.name.white().bold(), params.join(" ").dimmed());
        println!("      {}", info.summary);
    }

    if verbose {
        println!();
        println!(
            "{} scrubber run --path contacts.csv \"filter valid-email email\" \"save bad.csv\"",
            "Example:".yellow().bold()
        );
    }

    Ok(())
}
