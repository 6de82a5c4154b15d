use super::{describe_error, json_pretty, EXIT_FAILURE, EXIT_SUCCESS};
use libpty_locator::{Candidate, LayoutKind, LibraryResolver};
use serde::Serialize;

#[derive(Serialize)]
struct CandidateReport<'a> {
    found: bool,
    candidates: &'a [Candidate],
}

pub fn run(resolver: &LibraryResolver, file: Option<&str>, json: bool) -> Result<u8, String> {
    let candidates = match file {
        Some(name) => resolver.file_candidates(name),
        None => resolver.library_candidates(),
    }
    .map_err(|e| describe_error(&e))?;
    let found = candidates.iter().any(|c| c.exists);

    if json {
        let report = CandidateReport {
            found,
            candidates: &candidates,
        };
        println!("{}", json_pretty(&report)?);
    } else {
        print_table(&candidates);
    }
    Ok(if found { EXIT_SUCCESS } else { EXIT_FAILURE })
}

fn print_table(candidates: &[Candidate]) {
    println!("{:<8} {:<7} PATH", "LAYOUT", "STATUS");
    let mut selected = false;
    for candidate in candidates {
        let status = if candidate.exists && !selected {
            selected = true;
            "use"
        } else if candidate.exists {
            "found"
        } else {
            "missing"
        };
        println!(
            "{:<8} {:<7} {}",
            layout_label(candidate.layout),
            status,
            candidate.path.display()
        );
    }
}

fn layout_label(layout: LayoutKind) -> &'static str {
    match layout {
        LayoutKind::Flat => "flat",
        LayoutKind::Nested => "nested",
        LayoutKind::Sibling => "sibling",
    }
}
