pub mod combine;
pub mod diff;
pub mod enrich;
pub mod export_csv;
pub mod export_strings;
pub mod sample;

pub use combine::run_combine;
pub use diff::run_diff;
pub use enrich::run_enrich;
pub use export_csv::run_export_csv;
pub use export_strings::run_export_strings;
pub use sample::run_sample;

use xliffkit_core::ConflictPolicy;
use xliffkit_services::SamplePolicy;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ConflictPolicyArg {
    KeepFirst,
    Overwrite,
}

impl From<ConflictPolicyArg> for ConflictPolicy {
    fn from(arg: ConflictPolicyArg) -> Self {
        match arg {
            ConflictPolicyArg::KeepFirst => ConflictPolicy::KeepFirst,
            ConflictPolicyArg::Overwrite => ConflictPolicy::Overwrite,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SamplePolicyArg {
    UniformRandom,
    FirstN,
}

impl From<SamplePolicyArg> for SamplePolicy {
    fn from(arg: SamplePolicyArg) -> Self {
        match arg {
            SamplePolicyArg::UniformRandom => SamplePolicy::UniformRandom,
            SamplePolicyArg::FirstN => SamplePolicy::FirstN,
        }
    }
}

pub(crate) fn ok_line(use_color: bool, msg: &str) {
    if use_color {
        use owo_colors::OwoColorize;
        println!("{} {}", "✔".green(), msg);
    } else {
        println!("✔ {}", msg);
    }
}
