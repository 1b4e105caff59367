#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::Path;

use anyhow::Context as _;
use tracing_subscriber::{Layer as _, Registry, layer::SubscriberExt as _};

mod config;
mod efivar;
mod report;
mod utils;

/// PE section that carries the image metadata.
const SBAT_SECTION: &str = ".sbat";

fn main() -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;
    let log_env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_filter(log_env_filter);
    let subscriber = Registry::default().with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    let args = config::Args::new();
    match args.command {
        config::Command::Inspect { image, json } => inspect(&image, json),
        config::Command::Revocations { input, json } => show_revocations(input.as_deref(), json),
        config::Command::Check {
            image,
            revocations,
            json,
        } => check(&image, revocations.as_deref(), json),
    }
}

fn inspect(image: &Path, json: bool) -> anyhow::Result<()> {
    let (machine, payload) = read_sbat_section(image)?;
    let mut metadata = sbat::VecMetadata::new(Vec::new());
    metadata.parse(&payload).context("parsing image metadata")?;
    log::debug!("`{}` carries {} sbat entries", image.display(), metadata.entries().len());

    if json {
        println!("{}", report::image_json(machine, &metadata)?);
    } else {
        report::print_image(machine, &metadata);
    }
    Ok(())
}

fn show_revocations(input: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let list = load_revocations(input)?;
    let mut revocations = sbat::VecRevocations::new(Vec::new());
    revocations.parse(&list).context("parsing revocation list")?;

    if json {
        println!("{}", report::revocations_json(&revocations)?);
    } else {
        report::print_revocations(&revocations);
    }
    Ok(())
}

fn check(image: &Path, input: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let (_, payload) = read_sbat_section(image)?;
    let mut metadata = sbat::VecMetadata::new(Vec::new());
    metadata.parse(&payload).context("parsing image metadata")?;

    let list = load_revocations(input)?;
    let mut revocations = sbat::VecRevocations::new(Vec::new());
    revocations.parse(&list).context("parsing revocation list")?;

    let verdict = revocations.validate_metadata(&metadata);

    if json {
        println!("{}", report::check_json(image, verdict)?);
    } else {
        report::print_check(image, verdict);
    }

    if matches!(verdict, sbat::ValidationResult::Revoked(_)) {
        std::process::exit(1);
    }
    Ok(())
}

/// Pull the `.sbat` payload out of a PE image, along with the machine
/// type for display.
fn read_sbat_section(image: &Path) -> anyhow::Result<(pe_utils::Machine, Vec<u8>)> {
    let bytes = std::fs::read(image).with_context(|| format!("reading `{}`", image.display()))?;
    let pe = pe_utils::PeFile::parse(&bytes)
        .with_context(|| format!("parsing `{}`", image.display()))?;
    let section = pe
        .section_data(SBAT_SECTION)
        .with_context(|| format!("`{}` has no {SBAT_SECTION} section", image.display()))?;
    Ok((pe.machine(), utils::trim_trailing_nuls(section).to_vec()))
}

fn load_revocations(input: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    let Some(path) = input else {
        return efivar::read_sbat_level();
    };

    let raw = std::fs::read(path).with_context(|| format!("reading `{}`", path.display()))?;
    Ok(utils::trim_trailing_nuls(&raw).to_vec())
}
