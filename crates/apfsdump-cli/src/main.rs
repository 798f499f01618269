//! apfsdump - extract APFS volumes from a raw device or disk image
//!
//! A read-only, non-mounting extraction path: the source is never written,
//! and every volume's namespace is mirrored under
//! `<output_dir>/Volume <index>/out`.

mod backend;
mod exit;

use apfsdump_core::{Error, Result};
use apfsdump_device::{Device, DeviceConfig, DeviceWindow};
use apfsdump_extract::{ExtractOptions, VolumeExtractor};
use apfsdump_gpt::locate_container;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "apfsdump",
    version,
    about = "Extract the file tree of APFS volumes from a device or disk image"
)]
struct Args {
    /// Raw device or disk image containing (optionally GPT-partitioned) APFS data
    #[arg(short = 'i', value_name = "DEVICE")]
    input: PathBuf,

    /// Output directory; refused if it already exists
    #[arg(short = 'o', value_name = "DIR")]
    output: PathBuf,

    /// Verbose strict mode: debug logging, and any single object failure
    /// aborts the run
    #[arg(short = 'v')]
    verbose: bool,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit::SUCCESS,
                _ => exit::USAGE,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&args) {
        error!("{}", err);
        process::exit(exit::code_for(&err));
    }
}

fn run(args: &Args) -> Result<()> {
    // Checked exactly once, before anything else touches the filesystem
    if args.output.exists() {
        return Err(Error::already_exists(format!(
            "will not write to existing path {}; delete or move it and try again",
            args.output.display()
        )));
    }

    let mut device = Device::open(&args.input, DeviceConfig::default())?;
    let span = locate_container(&mut device)?;

    let window = DeviceWindow::new(device.into_content(), span.offset, span.length)?;
    let mut container = backend::open_container(window)?;

    let options = ExtractOptions {
        strict: args.verbose,
        progress: true,
    };

    let report = VolumeExtractor::new(container.as_mut(), &args.output, options).extract_all()?;

    for volume in &report.volumes {
        info!(
            index = volume.index,
            name = %volume.name,
            processed = volume.objects_processed,
            skipped = volume.objects_skipped,
            "volume done"
        );
    }

    Ok(())
}
