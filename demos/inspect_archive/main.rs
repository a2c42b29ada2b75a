//! Opens an archive (TAR, ZIP, CPIO, or GZIP) sitting on the host filesystem and lists or dumps
//! one of its members.
//!
//! `cargo run --example inspect_archive -- --kind tar evidence.tar reports/case-42.txt`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use dfvfs_rs::path_spec::{PathSpecAttrs, TypeIndicator};
use dfvfs_rs::{PathSpec, ResolverContext};

#[derive(Clone, ValueEnum)]
enum ArchiveKind {
    Tar,
    Zip,
    Cpio,
    Gzip,
}

impl From<ArchiveKind> for TypeIndicator {
    fn from(kind: ArchiveKind) -> Self {
        match kind {
            ArchiveKind::Tar => TypeIndicator::Tar,
            ArchiveKind::Zip => TypeIndicator::Zip,
            ArchiveKind::Cpio => TypeIndicator::Cpio,
            ArchiveKind::Gzip => TypeIndicator::Gzip,
        }
    }
}

#[derive(Parser)]
#[command(version, about = "List or dump a member of an archive", long_about = None)]
struct CommandLineArguments {
    /// Archive container format
    #[arg(long, value_enum)]
    kind: ArchiveKind,

    /// Path to the archive on the host filesystem
    archive: PathBuf,

    /// Member path to dump; lists the archive root when omitted
    member: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let arguments = CommandLineArguments::parse();
    let context = ResolverContext::new();

    match run(&context, arguments) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unable to inspect archive: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(context: &ResolverContext, arguments: CommandLineArguments) -> dfvfs_rs::VfsResult<()> {
    let type_indicator: TypeIndicator = arguments.kind.into();
    let archive_path = arguments.archive.to_string_lossy().into_owned();
    let os_spec =
        PathSpec::new(TypeIndicator::Os, None, PathSpecAttrs::with_location(archive_path))?;
    let archive_spec = PathSpec::new(type_indicator, Some(os_spec), PathSpecAttrs::default())?;

    let member_spec = match (type_indicator, arguments.member.as_deref()) {
        (TypeIndicator::Gzip, Some(_)) => {
            return Err(dfvfs_rs::VfsError::Unsupported(
                "GZIP projects a single stream and has no named members",
            ));
        }
        (TypeIndicator::Gzip, None) => archive_spec.clone(),
        (_, location) => PathSpec::new(
            type_indicator,
            archive_spec.parent().cloned(),
            PathSpecAttrs::with_location(location.unwrap_or("/")),
        )?,
    };

    let fs = dfvfs_rs::resolver::open_file_system(&archive_spec, context)?;
    let descriptor = fs.lookup_entry(&member_spec)?.ok_or(dfvfs_rs::VfsError::NotFound)?;
    let entry = dfvfs_rs::FileEntry::new(fs, member_spec, descriptor);

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
