#[macro_use]
extern crate clap;

use clap::Arg;
use log::info;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tenasm::diag::Diagnostics;
use tenobj::{write_object_file, write_table_file};

#[derive(Debug)]
enum IoErrorContext {
    ReadSource,
    WriteArtifact,
}

#[derive(Debug)]
enum Error {
    Io(std::io::Error, IoErrorContext, PathBuf),
    Rejected(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err, context, path) => write!(
                f,
                "{} \"{}\" failed: {}",
                match context {
                    IoErrorContext::ReadSource => "Reading source",
                    IoErrorContext::WriteArtifact => "Writing artifact",
                },
                path.display(),
                err
            ),
            Error::Rejected(count) => {
                write!(f, "{} error(s), no artifacts written", count)
            }
        }
    }
}

fn main() {
    env_logger::init();

    // Parse command line arguments
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("SOURCES")
                .help("Base names of the assembly sources; <NAME>.as is read for each")
                .multiple(true)
                .index(1),
        )
        .get_matches();

    match matches.values_of("SOURCES") {
        None => println!("usage: tenasm NAME1 [NAME2 ...]"),
        Some(sources) => {
            // one bad source never stops the ones behind it
            for name in sources {
                if let Err(err) = assemble_source(name) {
                    eprintln!("{}: {}", name, err);
                }
            }
        }
    }
}

fn assemble_source(name: &str) -> Result<(), Error> {
    let source_path = artifact_path(name, "as");
    let source = fs::read_to_string(&source_path)
        .map_err(|err| Error::Io(err, IoErrorContext::ReadSource, source_path.clone()))?;

    // Macro expansion, reported against the raw source
    let mut diags = Diagnostics::new();
    let expanded = tenasm::expand_macros(&source, &mut diags);
    report(&source_path, &diags);
    if diags.has_errors() {
        return Err(Error::Rejected(diags.error_count()));
    }

    let expanded_path = artifact_path(name, "am");
    fs::write(&expanded_path, &expanded)
        .map_err(|err| Error::Io(err, IoErrorContext::WriteArtifact, expanded_path.clone()))?;

    // Both passes, reported against the expanded text
    let mut diags = Diagnostics::new();
    let output = tenasm::assemble(&expanded, &mut diags);
    report(&expanded_path, &diags);
    let output = match output {
        Some(output) => output,
        None => return Err(Error::Rejected(diags.error_count())),
    };

    info!(
        "{}: {} code word(s), {} data word(s), {} entry row(s), {} external use(s)",
        name,
        output.image.code_len(),
        output.image.data_len(),
        output.entries.len(),
        output.externals.len()
    );

    let object_path = artifact_path(name, "ob");
    write_object_file(&object_path, &output.image)
        .map_err(|err| Error::Io(err, IoErrorContext::WriteArtifact, object_path))?;

    if !output.entries.is_empty() {
        let entries_path = artifact_path(name, "ent");
        write_table_file(&entries_path, &output.entries)
            .map_err(|err| Error::Io(err, IoErrorContext::WriteArtifact, entries_path))?;
    }

    if !output.externals.is_empty() {
        let externals_path = artifact_path(name, "ext");
        write_table_file(&externals_path, &output.externals)
            .map_err(|err| Error::Io(err, IoErrorContext::WriteArtifact, externals_path))?;
    }

    Ok(())
}

fn artifact_path(name: &str, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", name, extension))
}

fn report(path: &PathBuf, diags: &Diagnostics) {
    for diagnostic in diags.items() {
        eprintln!("{}:{}", path.display(), diagnostic);
    }
}
