//! Fuzz target for step parsing and transform construction.
//!
//! Arbitrary step lines are parsed, built through the registry and, when
//! construction succeeds, applied to a small fixed table. Errors are fine,
//! panics are not.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrubber::{DataTable, Registry, Step};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if line.len() > 4_096 {
        return;
    }

    let Ok(step) = Step::parse(line) else {
        return;
    };

    // Never touch the filesystem.
    if matches!(step.name.as_str(), "open" | "save") {
        return;
    }

    let registry = Registry::new();
    if registry.build(&step.name, &step.params).is_err() {
        return;
    }

    let table = DataTable::from_rows(
        ["First Name", "email", "date"],
        vec![
            vec![Some("Alice"), Some("alice@example.com"), Some("2023-01-15")],
            vec![Some("Bob"), None, Some("12:30")],
            vec![None, Some("not an email"), None],
        ],
    );
    if let Ok(op) = registry.create(Some(table), &step.name, &step.params) {
        let _ = op.transform();
    }
});
