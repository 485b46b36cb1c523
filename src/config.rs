use serde::Deserialize;

/// Top-level wvar configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WvarConfig {
    /// Estimation settings.
    #[serde(default)]
    pub estimate: EstimateToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateToml {
    #[serde(default = "default_decomposition")]
    pub decomposition: String,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub levels: Option<usize>,
    #[serde(default)]
    pub robust: bool,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_sampling_frequency")]
    pub sampling_frequency: f64,
    #[serde(default = "default_boundary")]
    pub boundary: String,
    #[serde(default)]
    pub from_unit: Option<String>,
    #[serde(default)]
    pub to_unit: Option<String>,
}

impl Default for EstimateToml {
    fn default() -> Self {
        Self {
            decomposition: default_decomposition(),
            filter: default_filter(),
            levels: None,
            robust: false,
            efficiency: default_efficiency(),
            alpha: default_alpha(),
            sampling_frequency: default_sampling_frequency(),
            boundary: default_boundary(),
            from_unit: None,
            to_unit: None,
        }
    }
}

fn default_decomposition() -> String {
    "modwt".to_string()
}
fn default_filter() -> String {
    wvar_variance::DEFAULT_FILTER.to_string()
}
fn default_efficiency() -> f64 {
    wvar_variance::DEFAULT_EFFICIENCY
}
fn default_alpha() -> f64 {
    wvar_variance::DEFAULT_ALPHA
}
fn default_sampling_frequency() -> f64 {
    1.0
}
fn default_boundary() -> String {
    "exclude".to_string()
}
