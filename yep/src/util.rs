use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Create a progress bar for packing, drawn on stdout alongside the pack
/// messages. Its length is set once the first entry reports in.
pub fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stdout());
    if let Ok(style) =
        ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(message.to_string());
    pb
}

pub fn format_size(size: u64) -> String {
    use humansize::{file_size_opts as options, FileSize};

    size.file_size(options::BINARY)
        .unwrap_or_else(|_| format!("{} B", size))
}

/// Percentage saved by compression.
pub fn ratio(stored: u64, size: u64) -> f64 {
    if size == 0 {
        0.0
    } else {
        100.0 - (stored as f64 / size as f64 * 100.0)
    }
}

/// The error followed by each of its sources, joined with `: `.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(e) = source {
        message.push_str(": ");
        message.push_str(&e.to_string());
        source = e.source();
    }
    message
}
