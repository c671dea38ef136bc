use indicatif::ProgressBar;
use yep_format::{
    force_pack_directory, pack_directory, NamePolicy, PackOptions, PackProgress,
    DEFAULT_COMPRESSION_THRESHOLD,
};

use crate::cli::PackArgs;
use crate::error::{Error, Result};
use crate::util::{create_progress_bar, format_size, ratio};

fn options(args: &PackArgs) -> PackOptions {
    PackOptions {
        long_names: if args.strict_names {
            NamePolicy::Fail
        } else {
            NamePolicy::Skip
        },
        compression_threshold: args.threshold.unwrap_or(DEFAULT_COMPRESSION_THRESHOLD),
    }
}

pub fn run(args: PackArgs, verbose: bool) -> Result<()> {
    let options = options(&args);

    // Debug logging and the bar would draw over each other.
    let pb = if args.quiet || verbose {
        ProgressBar::hidden()
    } else {
        create_progress_bar("Packing")
    };

    let progress = |p: PackProgress<'_>| {
        pb.set_length(p.total as u64);
        pb.set_position(p.current as u64);
        pb.set_message(p.name.to_string());
    };

    let result = if args.if_stale {
        pack_directory(&args.input_directory, &args.output_file, &options, progress)
    } else {
        force_pack_directory(&args.input_directory, &args.output_file, &options, progress)
            .map(Some)
    };

    pb.finish_and_clear();

    let summary = result.map_err(|source| Error::Pack {
        input: args.input_directory.clone(),
        output: args.output_file.clone(),
        source,
    })?;

    if args.quiet {
        return Ok(());
    }

    match summary {
        Some(summary) => println!(
            "Packed {} entries ({} compressed) into `{}`: {} -> {} ({:.1}% saved)",
            summary.entries,
            summary.compressed_entries,
            args.output_file.display(),
            format_size(summary.uncompressed_bytes),
            format_size(summary.stored_bytes),
            ratio(summary.stored_bytes, summary.uncompressed_bytes),
        ),
        None => println!("`{}` is up to date", args.output_file.display()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(strict_names: bool, threshold: Option<usize>) -> PackArgs {
        PackArgs {
            input_directory: PathBuf::from("in"),
            output_file: PathBuf::from("out.yep"),
            if_stale: false,
            strict_names,
            threshold,
            quiet: true,
        }
    }

    #[test]
    fn flags_map_onto_options() {
        assert_eq!(options(&args(false, None)), PackOptions::default());

        let strict = options(&args(true, Some(1024)));
        assert_eq!(strict.long_names, NamePolicy::Fail);
        assert_eq!(strict.compression_threshold, 1024);
    }
}
