//! Resolves a path-spec chain against the host filesystem and dumps the addressed entry.
//!
//! `cargo run --example dump_path_spec -- --config demos/dump_path_spec/config.toml /notes.txt`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dfvfs_rs::path_spec::{PathSpecAttrs, TypeIndicator};
use dfvfs_rs::{PathSpec, ResolverConfig, ResolverContext};

#[derive(Parser)]
#[command(version, about = "Dump a file addressed by an OS path spec", long_about = None)]
struct CommandLineArguments {
    /// Resolver configuration file (retention policy, named mount roots)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Location of the file to dump, relative to the OS mount root
    location: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let arguments = CommandLineArguments::parse();
    let config = match &arguments.config {
        Some(path) => match ResolverConfig::from_path(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("unable to read config {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => ResolverConfig::default(),
    };

    let context = match config.build_context() {
        Ok(context) => context,
        Err(err) => {
            eprintln!("unable to build resolver context: {err}");
            return ExitCode::FAILURE;
        }
    };

    match dump(&context, &arguments.location) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unable to dump {}: {err}", arguments.location);
            ExitCode::FAILURE
        }
    }
}

fn dump(context: &ResolverContext, location: &str) -> dfvfs_rs::VfsResult<()> {
    let spec =
        PathSpec::new(TypeIndicator::Os, None, PathSpecAttrs::with_location(location))?;
    let fs = dfvfs_rs::resolver::open_file_system(&spec, context)?;
    let descriptor = fs.lookup_entry(&spec)?.ok_or(dfvfs_rs::VfsError::NotFound)?;
    let entry = dfvfs_rs::FileEntry::new(fs, spec, descriptor);

    if entry.is_directory()? {
        for child in entry.sub_file_entries()? {
            println!("{}", child.name());
        }
        return Ok(());
    }

    let mut object = entry.get_file_object()?;
    let bytes = object.read(None)?;
    std::io::Write::write_all(&mut std::io::stdout(), &bytes)?;
    Ok(())
}
