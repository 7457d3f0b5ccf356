use std::path::PathBuf;

use color_eyre::eyre::bail;

use super::{ok_line, SamplePolicyArg};
use xliffkit_services::SamplePolicy;

fn policy_from_config(name: &str) -> Option<SamplePolicy> {
    match name {
        "uniform-random" => Some(SamplePolicy::UniformRandom),
        "first-n" => Some(SamplePolicy::FirstN),
        _ => None,
    }
}

pub fn run_sample(
    input: PathBuf,
    out: PathBuf,
    count: Option<usize>,
    policy: Option<SamplePolicyArg>,
    use_color: bool,
    quiet: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "sample_args", input = ?input, out = ?out, count = ?count, policy = ?policy);
    let cfg = xliffkit_config::load_config().unwrap_or_default();

    let Some(count) = count.or_else(|| cfg.sample.as_ref().and_then(|s| s.count)) else {
        bail!("sample count required: pass --count or set [sample].count in xliffkit.toml");
    };
    let policy: SamplePolicy = policy
        .map(Into::into)
        .or_else(|| {
            cfg.sample
                .as_ref()
                .and_then(|s| s.policy.as_deref())
                .and_then(policy_from_config)
        })
        .unwrap_or_default();

    let store = xliffkit_xliff::load_store(&input)?;
    let (sampled, report) = xliffkit_services::sample(&store, count, policy);
    xliffkit_xliff::save_store(&out, &sampled)?;

    tracing::info!(
        event = "sample_saved",
        path = %out.display(),
        requested = report.requested,
        selected = report.selected,
        population = report.population,
    );
    if !quiet {
        ok_line(
            use_color,
            &format!(
                "sampled {} of {} unit(s) into {}",
                report.selected,
                report.population,
                out.display(),
            ),
        );
    }
    Ok(())
}
