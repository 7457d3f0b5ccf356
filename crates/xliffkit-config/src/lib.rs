use serde::Deserialize;
use xliffkit_core::ConflictPolicy;

/// Optional defaults for CLI flags. Search order: `CWD/xliffkit.toml`, then
/// `$HOME/.config/xliffkit/xliffkit.toml`; the first file to set a field
/// wins, explicit CLI flags win over both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XliffKitConfig {
    pub combine: Option<CombineCfg>,
    pub enrich: Option<EnrichCfg>,
    pub sample: Option<SampleCfg>,
    pub export: Option<ExportCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombineCfg {
    pub policy: Option<ConflictPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrichCfg {
    pub slot: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleCfg {
    pub count: Option<usize>,
    /// "uniform-random" or "first-n".
    pub policy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportCfg {
    pub blind: Option<bool>,
    pub mapping_out: Option<String>,
    /// Slot rendered by the translation column, defaults to the document's
    /// own target.
    pub slot: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

pub fn load_config() -> Result<XliffKitConfig, ConfigError> {
    let mut merged = XliffKitConfig::default();
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join("xliffkit.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<XliffKitConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    if let Some(base) = dirs::config_dir() {
        let path = base.join("xliffkit").join("xliffkit.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<XliffKitConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    Ok(merged)
}

fn merge(mut a: XliffKitConfig, b: XliffKitConfig) -> XliffKitConfig {
    a.combine = merge_opt(a.combine, b.combine, |mut x, y| {
        if x.policy.is_none() {
            x.policy = y.policy;
        }
        x
    });
    a.enrich = merge_opt(a.enrich, b.enrich, |mut x, y| {
        if x.slot.is_none() {
            x.slot = y.slot;
        }
        x
    });
    a.sample = merge_opt(a.sample, b.sample, |mut x, y| {
        if x.count.is_none() {
            x.count = y.count;
        }
        if x.policy.is_none() {
            x.policy = y.policy;
        }
        x
    });
    a.export = merge_opt(a.export, b.export, |mut x, y| {
        if x.blind.is_none() {
            x.blind = y.blind;
        }
        if x.mapping_out.is_none() {
            x.mapping_out = y.mapping_out;
        }
        if x.slot.is_none() {
            x.slot = y.slot;
        }
        x
    });
    a
}

fn merge_opt<T>(a: Option<T>, b: Option<T>, f: impl FnOnce(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(f(x, y)),
        (Some(x), None) => Some(x),
        (None, y) => y,
    }
}
