use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "yep",
    about = "Pack directories into yep resource archives and read them back.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands]
)]
pub struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    pub verbose: bool,

    #[structopt(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, StructOpt)]
pub enum Commands {
    #[structopt(name = "pack", visible_alias = "p", about = "Pack a directory into an archive")]
    Pack(PackArgs),

    #[structopt(name = "list", visible_aliases = &["l", "ls"], about = "List the entries of an archive")]
    List(ListArgs),

    #[structopt(name = "extract", visible_alias = "x", about = "Extract one entry from an archive")]
    Extract(ExtractArgs),
}

impl Commands {
    /// `extract` keeps stdout for payloads; everything else reports there.
    pub fn logs_to_stdout(&self) -> bool {
        !matches!(self, Commands::Extract(_))
    }
}

#[derive(Debug, StructOpt)]
pub struct PackArgs {
    #[structopt(parse(from_os_str), help = "Directory to pack")]
    pub input_directory: PathBuf,

    #[structopt(parse(from_os_str), help = "Archive to write")]
    pub output_file: PathBuf,

    #[structopt(long, help = "Only pack if the directory is newer than the archive")]
    pub if_stale: bool,

    #[structopt(
        long,
        help = "Fail instead of skipping files whose names do not fit in an archive"
    )]
    pub strict_names: bool,

    #[structopt(
        long,
        value_name = "bytes",
        help = "Compress files larger than this many bytes [default: 256]"
    )]
    pub threshold: Option<usize>,

    #[structopt(short, long, help = "Suppress progress and summary output")]
    pub quiet: bool,
}

#[derive(Debug, StructOpt)]
pub struct ListArgs {
    #[structopt(parse(from_os_str), help = "Path to the archive")]
    pub archive: PathBuf,
}

#[derive(Debug, StructOpt)]
pub struct ExtractArgs {
    #[structopt(parse(from_os_str), help = "Path to the archive")]
    pub archive: PathBuf,

    #[structopt(required = true, help = "Names of the entries to extract")]
    pub names: Vec<String>,

    #[structopt(
        short,
        long,
        parse(from_os_str),
        help = "Write to this file, or into this directory when extracting several entries [default: stdout]"
    )]
    pub output: Option<PathBuf>,
}
