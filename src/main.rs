use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use e2check::{Report, Snapshot, Verifier};

/// Exit status when the arguments or the dump file can't be used.
const EXIT_USAGE: u8 = 1;
/// Exit status when at least one inconsistency was found.
const EXIT_INCONSISTENT: u8 = 2;

#[derive(Parser)]
#[command(version, about = "Reports inconsistencies in an ext2 metadata dump")]
struct Args {
    /// Metadata dump (CSV) of the filesystem
    dump_file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    let report = match check(args) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    print!("{report}");

    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INCONSISTENT)
    }
}

fn check(args: Args) -> Result<Report> {
    let snapshot = Snapshot::open(args.dump_file)?;

    Ok(Verifier::new(snapshot).run())
}
