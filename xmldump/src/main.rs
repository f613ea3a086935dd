//! A CLI tool for inspecting the contents of a Native DICOM Model XML file
//! by printing it in a human readable format.
use clap::Parser;
use dicom_xml::NativeDicomModel;
use snafu::{Report, ResultExt, Whatever};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

/// Exit code for when an error emerged while reading the XML file.
const ERROR_READ: i32 = -2;
/// Exit code for when an error emerged while printing the file.
const ERROR_PRINT: i32 = -3;

/// Dump the contents of Native DICOM Model XML files
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// The XML file(s) to read
    #[clap(required = true)]
    files: Vec<PathBuf>,
    /// Write the decoded document back as XML
    /// instead of dumping its attributes
    #[clap(long = "reformat")]
    reformat: bool,
    /// Print more information about each file
    #[clap(short = 'v', long = "verbose")]
    verbose: bool,
    /// Fail if any errors are encountered
    #[clap(long = "fail-first")]
    fail_first: bool,
}

fn main() {
    let App {
        files: filenames,
        reformat,
        verbose,
        fail_first,
    } = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
            .with_writer(std::io::stderr)
            .finish(),
    )
    .whatever_context("Could not set up global logging subscriber")
    .unwrap_or_else(|e: Whatever| {
        eprintln!("[ERROR] {}", Report::from_error(e));
    });

    let fail_first = filenames.len() == 1 || fail_first;
    let mut errors: i32 = 0;

    for filename in &filenames {
        println!("{}: ", filename.display());
        match open_model(filename) {
            Err(e) => {
                eprintln!("{}", Report::from_error(e));
                if fail_first {
                    std::process::exit(ERROR_READ);
                }
                errors += 1;
            }
            Ok(model) => {
                debug!(
                    "{}: {} top-level attributes",
                    filename.display(),
                    model.dataset().len()
                );
                if let Err(e) = print_model(&model, reformat) {
                    if e.kind() == ErrorKind::BrokenPipe {
                        // handle broken pipe separately with a no-op
                    } else {
                        eprintln!("[ERROR] {}", Report::from_error(e));
                        if fail_first {
                            std::process::exit(ERROR_PRINT);
                        }
                    }
                    errors += 1;
                }
            }
        }
    }

    std::process::exit(errors);
}

fn open_model(path: &Path) -> Result<NativeDicomModel, Whatever> {
    let file = File::open(path)
        .with_whatever_context(|_| format!("Could not open {}", path.display()))?;
    dicom_xml::from_reader(BufReader::new(file))
        .with_whatever_context(|_| format!("Could not decode {}", path.display()))
}

fn print_model(model: &NativeDicomModel, reformat: bool) -> std::io::Result<()> {
    if reformat {
        let stdout = std::io::stdout();
        let mut to = stdout.lock();
        dicom_xml::to_writer(&mut to, model).map_err(|e| match e {
            dicom_xml::Error::WriteXml { source, .. } => source,
            e => std::io::Error::new(ErrorKind::Other, e.to_string()),
        })?;
        writeln!(to)
    } else {
        dicom_xmldump::dump_model(model)
    }
}

#[cfg(test)]
mod tests {
    use crate::App;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        App::command().debug_assert();
    }
}
