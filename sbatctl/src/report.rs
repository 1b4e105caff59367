//! Text and JSON rendering of the subcommand results.

use std::path::Path;

use pe_utils::Machine;
use sbat::{Entry, ValidationResult, Vendor};

#[derive(Debug, serde::Serialize)]
struct ImageReport<'a> {
    machine: String,
    entries: &'a [Entry<'a>],
}

#[derive(Debug, serde::Serialize)]
struct RevocationsReport<'a> {
    date: Option<String>,
    components: &'a [sbat::Component<'a>],
}

#[derive(Debug, serde::Serialize)]
struct CheckReport<'a> {
    image: String,
    allowed: bool,
    revoked_by: Option<&'a Entry<'a>>,
}

pub fn print_image(machine: Machine, metadata: &sbat::VecMetadata) {
    println!("machine: {machine}");
    for entry in metadata.entries() {
        match vendor_line(&entry.vendor) {
            Some(vendor) => println!("  {}  ({vendor})", entry.component),
            None => println!("  {}", entry.component),
        }
    }
}

pub fn image_json(machine: Machine, metadata: &sbat::VecMetadata) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ImageReport {
        machine: machine.to_string(),
        entries: metadata.entries(),
    })
}

pub fn print_revocations(revocations: &sbat::VecRevocations) {
    if let Some(date) = revocations.date() {
        println!("date: {date}");
    }
    for component in revocations.revoked_components() {
        println!("  {component}");
    }
}

pub fn revocations_json(revocations: &sbat::VecRevocations) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RevocationsReport {
        date: revocations.date().map(ToString::to_string),
        components: revocations.revoked_components(),
    })
}

pub fn print_check(image: &Path, verdict: ValidationResult<'_, '_>) {
    match verdict {
        ValidationResult::Allowed => println!("{}: allowed", image.display()),
        ValidationResult::Revoked(entry) => {
            println!("{}: revoked by {}", image.display(), entry.component);
        }
    }
}

pub fn check_json(image: &Path, verdict: ValidationResult<'_, '_>) -> serde_json::Result<String> {
    let revoked_by = match verdict {
        ValidationResult::Allowed => None,
        ValidationResult::Revoked(entry) => Some(entry),
    };

    serde_json::to_string_pretty(&CheckReport {
        image: image.display().to_string(),
        allowed: revoked_by.is_none(),
        revoked_by,
    })
}

fn vendor_line(vendor: &Vendor) -> Option<String> {
    let parts: Vec<String> = [vendor.name, vendor.package_name, vendor.version, vendor.url]
        .into_iter()
        .flatten()
        .map(ToString::to_string)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
