use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DbConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub reports: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Native type of `user_id`; the owner parameter is cast to it.
    #[serde(default)]
    pub owner_id_type: OwnerIdType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerIdType {
    #[default]
    Text,
    Uuid,
}

impl OwnerIdType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            OwnerIdType::Text => "TEXT",
            OwnerIdType::Uuid => "UUID",
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

fn default_api_host() -> String {
    "0.0.0.0".into()
}

fn default_api_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// How often a connected dashboard stream recomputes its snapshot.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

fn default_refresh_interval_secs() -> u64 {
    30
}

/// Which rows a request may aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OwnerScope {
    /// Every query is filtered by the requesting owner; anonymous requests are rejected.
    #[default]
    Owner,
    /// No owner filter anywhere.
    Global,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_title")]
    pub title: String,
    #[serde(default = "default_activity_limit")]
    pub activity_limit: usize,
    #[serde(default)]
    pub owner_scope: OwnerScope,
    /// Fixed offset used for day alignment. Unset means the host's local zone.
    #[serde(default)]
    pub utc_offset_hours: Option<i32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_report_title(),
            activity_limit: default_activity_limit(),
            owner_scope: OwnerScope::default(),
            utc_offset_hours: None,
        }
    }
}

fn default_report_title() -> String {
    "Relatório do Biodigestor".into()
}

fn default_activity_limit() -> usize {
    10
}

impl ReportConfig {
    /// Current time in the zone reports are anchored to.
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self
            .utc_offset_hours
            .and_then(|h| h.checked_mul(3600))
            .and_then(FixedOffset::east_opt)
        {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, anyhow::Error> {
        let expanded = expand_env_placeholders(raw)?;
        let mut cfg: Self = serde_yaml::from_str(&expanded)?;

        // DATABASE_URL wins over whatever the YAML had
        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database.url = url;
        }

        if cfg.dashboard.refresh_interval_secs == 0 {
            anyhow::bail!("dashboard.refresh_interval_secs must be greater than zero");
        }
        if let Some(hours) = cfg.reports.utc_offset_hours {
            if !(-23..=23).contains(&hours) {
                anyhow::bail!("reports.utc_offset_hours must be within -23..=23, got {}", hours);
            }
        }

        Ok(cfg)
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
fn expand_env_placeholders(input: &str) -> Result<String, anyhow::Error> {
    use anyhow::Context;

    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();

    while let Some(c) = it.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let close = match it.peek().copied() {
            Some('$') => {
                it.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };
        it.next();
        let var = read_until(&mut it, close)
            .with_context(|| format!("unterminated env placeholder: missing '{}'", close))?;
        let val = std::env::var(&var)
            .with_context(|| format!("missing environment variable: {}", var))?;
        out.push_str(&val);
    }

    Ok(out)
}

/// Read characters until we hit `end`, returning the collected string.
fn read_until<I>(it: &mut std::iter::Peekable<I>, end: char) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut buf = String::new();
    for ch in it.by_ref() {
        if ch == end {
            return Some(buf);
        }
        buf.push(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_plain_text_untouched() {
        assert_eq!(expand_env_placeholders("a: 1\nb: x$").unwrap(), "a: 1\nb: x$");
    }

    #[test]
    fn test_expand_dollar_escape() {
        assert_eq!(expand_env_placeholders("price: $$5").unwrap(), "price: $5");
    }

    #[test]
    fn test_expand_both_placeholder_styles() {
        std::env::set_var("BIODASH_TEST_HOST", "db.internal");
        let out = expand_env_placeholders("a: $(BIODASH_TEST_HOST)\nb: ${BIODASH_TEST_HOST}").unwrap();
        assert_eq!(out, "a: db.internal\nb: db.internal");
    }

    #[test]
    fn test_expand_missing_variable_fails() {
        let err = expand_env_placeholders("url: ${BIODASH_SURELY_UNSET_VAR}").unwrap_err();
        assert!(err.to_string().contains("BIODASH_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_expand_unterminated_placeholder_fails() {
        assert!(expand_env_placeholders("url: ${OOPS").is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let cfg: Config = serde_yaml::from_str("database:\n  url: postgres://x\n").unwrap();
        assert_eq!(cfg.api.port, 8080);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.owner_id_type, OwnerIdType::Text);
        assert_eq!(cfg.dashboard.refresh_interval_secs, 30);
        assert_eq!(cfg.reports.activity_limit, 10);
        assert_eq!(cfg.reports.owner_scope, OwnerScope::Owner);
        assert_eq!(cfg.reports.title, "Relatório do Biodigestor");
    }

    #[test]
    fn test_owner_scope_parses_lowercase() {
        let cfg: Config = serde_yaml::from_str(
            "database:\n  url: postgres://x\nreports:\n  owner_scope: global\n  utc_offset_hours: -3\n",
        )
        .unwrap();
        assert_eq!(cfg.reports.owner_scope, OwnerScope::Global);
        assert_eq!(cfg.reports.now().offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        let err = Config::from_yaml(
            "database:\n  url: postgres://x\nreports:\n  utc_offset_hours: 2000000\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("utc_offset_hours"));

        let cfg = Config::from_yaml("database:\n  url: postgres://x\nreports:\n  utc_offset_hours: 23\n")
            .unwrap();
        assert_eq!(cfg.reports.now().offset().local_minus_utc(), 23 * 3600);
    }

    #[test]
    fn test_overflowing_offset_falls_back_to_local() {
        let reports = ReportConfig {
            utc_offset_hours: Some(i32::MAX),
            ..Default::default()
        };
        assert_eq!(
            reports.now().offset().local_minus_utc(),
            Local::now().offset().local_minus_utc()
        );
    }
}
