use std::path::PathBuf;

use super::ok_line;

pub fn run_export_strings(
    input: PathBuf,
    out: Option<PathBuf>,
    limit: usize,
    use_color: bool,
    quiet: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "export_strings_args", input = ?input, out = ?out, limit = limit);

    let store = xliffkit_xliff::load_store(&input)?;

    match out {
        Some(path) => {
            // Build in memory first so a failed export leaves no file behind.
            let mut buf = Vec::new();
            let written = xliffkit_export_csv::write_strings(&mut buf, &store, limit)?;
            std::fs::write(&path, buf)?;

            tracing::info!(event = "export_strings_saved", path = %path.display(), pairs = written);
            if !quiet {
                ok_line(
                    use_color,
                    &format!("{} pair(s) saved to {}", written, path.display()),
                );
            }
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            xliffkit_export_csv::write_strings(&mut lock, &store, limit)?;
        }
    }
    Ok(())
}
