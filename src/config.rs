use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub osc: OscConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// 指伸展判定: 先端がPIPよりこの値以上上にあれば伸展
    #[serde(default = "default_extension_threshold")]
    pub extension_threshold: f32,
    /// open_palm 判定に必要な指先の広がり
    #[serde(default = "default_spread_threshold")]
    pub spread_threshold: f32,
    /// 方向判定の不感帯
    #[serde(default = "default_direction_dead_zone")]
    pub direction_dead_zone: f32,
}

fn default_extension_threshold() -> f32 { 0.05 }
fn default_spread_threshold() -> f32 { 0.3 }
fn default_direction_dead_zone() -> f32 { 0.1 }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            extension_threshold: default_extension_threshold(),
            spread_threshold: default_spread_threshold(),
            direction_dead_zone: default_direction_dead_zone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmoothingConfig {
    /// 平滑化に使う履歴フレーム数
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_history_size() -> usize { 5 }

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    /// スライディングウィンドウの最大フレーム数
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
    /// 確定に必要な同一ジェスチャーのフレーム数
    #[serde(default = "default_min_majority")]
    pub min_majority: usize,
    /// 確定に必要な平均信頼度 (これを超えること)
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

fn default_window_capacity() -> usize { 12 }
fn default_min_majority() -> usize { 10 }
fn default_confidence_threshold() -> f32 { 0.7 }

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            window_capacity: default_window_capacity(),
            min_majority: default_min_majority(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OscConfig {
    #[serde(default = "default_osc_enabled")]
    pub enabled: bool,
    /// 送信先 (ドローン制御ブリッジ)
    #[serde(default = "default_osc_addr")]
    pub addr: String,
}

fn default_osc_enabled() -> bool { true }
fn default_osc_addr() -> String { crate::osc::OSC_DEFAULT_ADDR.to_string() }

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            enabled: default_osc_enabled(),
            addr: default_osc_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_listen_addr() -> String { "0.0.0.0:9100".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// ログファイルにも書き出すか
    #[serde(default = "default_log_file")]
    pub file: bool,
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_file() -> bool { true }
fn default_log_dir() -> String { "logs".to_string() }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// 読み込みに失敗した場合はデフォルト値とエラーを返す
    ///
    /// The error is handed back instead of logged since logging itself is
    /// configured from the result.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<anyhow::Error>) {
        match Self::load(path.as_ref()) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.classifier;
        if c.extension_threshold.is_nan() || c.extension_threshold < 0.0 {
            bail!("classifier.extension_threshold must be >= 0");
        }
        if !(0.0..=1.0).contains(&c.spread_threshold) {
            bail!("classifier.spread_threshold must be within 0..=1");
        }
        if c.direction_dead_zone.is_nan() || c.direction_dead_zone < 0.0 {
            bail!("classifier.direction_dead_zone must be >= 0");
        }
        if self.smoothing.history_size == 0 {
            bail!("smoothing.history_size must be at least 1");
        }
        let v = &self.validation;
        if v.min_majority == 0 {
            bail!("validation.min_majority must be at least 1");
        }
        if v.min_majority > v.window_capacity {
            bail!(
                "validation.min_majority ({}) exceeds validation.window_capacity ({})",
                v.min_majority,
                v.window_capacity
            );
        }
        if !(0.0..=1.0).contains(&v.confidence_threshold) {
            bail!("validation.confidence_threshold must be within 0..=1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_tunables() {
        let config = Config::default();
        assert_eq!(config.classifier.extension_threshold, 0.05);
        assert_eq!(config.classifier.spread_threshold, 0.3);
        assert_eq!(config.classifier.direction_dead_zone, 0.1);
        assert_eq!(config.smoothing.history_size, 5);
        assert_eq!(config.validation.window_capacity, 12);
        assert_eq!(config.validation.min_majority, 10);
        assert_eq!(config.validation.confidence_threshold, 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.validation.min_majority, 10);
        assert_eq!(config.server.listen_addr, "0.0.0.0:9100");
        assert!(config.osc.enabled);
    }

    #[test]
    fn test_partial_section() {
        let config = Config::parse(
            r#"
            [validation]
            min_majority = 6

            [osc]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.validation.min_majority, 6);
        assert_eq!(config.validation.window_capacity, 12);
        assert!(!config.osc.enabled);
        assert_eq!(config.osc.addr, crate::osc::OSC_DEFAULT_ADDR);
    }

    #[test]
    fn test_majority_larger_than_window_rejected() {
        let err = Config::parse(
            r#"
            [validation]
            window_capacity = 8
            min_majority = 10
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("min_majority"));
    }

    #[test]
    fn test_zero_history_rejected() {
        assert!(Config::parse("[smoothing]\nhistory_size = 0\n").is_err());
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        assert!(Config::parse("[validation]\nconfidence_threshold = 1.5\n").is_err());
        assert!(Config::parse("[classifier]\nspread_threshold = -0.1\n").is_err());
    }

    #[test]
    fn test_type_error_rejected() {
        assert!(Config::parse("[smoothing]\nhistory_size = \"five\"\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load("does/not/exist.toml").is_err());
        let (config, err) = Config::load_or_default("does/not/exist.toml");
        assert!(err.is_some());
        assert_eq!(config.smoothing.history_size, 5);
    }
}
