use std::path::PathBuf;

use color_eyre::eyre::bail;

use super::ok_line;
use xliffkit_core::{CLASSIC_SLOT, TARGET_SLOT};
use xliffkit_export_csv::{Column, ID_SLOT, SOURCE_SLOT};

#[allow(clippy::too_many_arguments)]
pub fn run_export_csv(
    input: PathBuf,
    out_csv: Option<PathBuf>,
    slot: Option<String>,
    second_slot: Option<String>,
    blind: bool,
    mapping_out: Option<PathBuf>,
    use_color: bool,
    quiet: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "export_csv_args", input = ?input, out_csv = ?out_csv, slot = ?slot, second_slot = ?second_slot, blind = blind, mapping_out = ?mapping_out);
    let cfg = xliffkit_config::load_config().unwrap_or_default();

    let slot = slot
        .or_else(|| cfg.export.as_ref().and_then(|e| e.slot.clone()))
        .unwrap_or_else(|| TARGET_SLOT.to_string());
    let blind = blind || cfg.export.as_ref().and_then(|e| e.blind).unwrap_or(false);

    let store = xliffkit_xliff::load_store(&input)?;

    if blind {
        let second = second_slot.unwrap_or_else(|| CLASSIC_SLOT.to_string());
        let Some(out_csv) = out_csv else {
            bail!("blind export needs --out-csv so the mapping can be written next to it");
        };
        let mapping_out = mapping_out
            .or_else(|| {
                cfg.export
                    .as_ref()
                    .and_then(|e| e.mapping_out.clone())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| out_csv.with_extension("mapping.json"));

        let left = Column::new("First translation", slot);
        let right = Column::new("Second translation", second);
        let mut csv_buf = Vec::new();
        let mapping = xliffkit_export_csv::write_blind_csv(
            &mut csv_buf,
            &store,
            &left,
            &right,
            &mut rand::thread_rng(),
        )?;
        // The mapping lands first: a blind CSV without its mapping cannot be
        // de-blinded, so the CSV must never exist alone.
        std::fs::write(&mapping_out, serde_json::to_vec_pretty(&mapping)?)?;
        std::fs::write(&out_csv, csv_buf)?;

        tracing::info!(
            event = "export_blind_saved",
            csv = %out_csv.display(),
            mapping = %mapping_out.display(),
            rows = mapping.rows.len(),
            skipped = mapping.skipped,
        );
        if !quiet {
            ok_line(
                use_color,
                &format!(
                    "blind CSV with {} row(s) saved to {} (mapping in {}, {} unit(s) skipped)",
                    mapping.rows.len(),
                    out_csv.display(),
                    mapping_out.display(),
                    mapping.skipped,
                ),
            );
        }
        return Ok(());
    }

    let mut columns = vec![
        Column::new("Id", ID_SLOT),
        Column::new("Original", SOURCE_SLOT),
        Column::new(slot.clone(), slot),
    ];
    if let Some(second) = second_slot {
        columns.push(Column::new(second.clone(), second));
    }

    match out_csv {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            xliffkit_export_csv::write_csv(file, &store, &columns)?;
            if !quiet {
                ok_line(
                    use_color,
                    &format!("{} row(s) saved to {}", store.total_units(), path.display()),
                );
            }
        }
        None => {
            let stdout = std::io::stdout();
            let lock = stdout.lock();
            xliffkit_export_csv::write_csv(lock, &store, &columns)?;
        }
    }
    Ok(())
}
