//! Tenant entity - a customer organization with its own configuration

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{TenantError, TenantResult, TENANT_ID_REQUIRED};

lazy_static! {
    static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
}

/// Numeric tenant identifier used by the directory
pub type TenantId = i64;

/// Parse the string form of a tenant identifier.
///
/// Empty strings and anything that is not a plain integer are rejected.
pub fn parse_tenant_id(raw: &str) -> TenantResult<TenantId> {
    if raw.is_empty() {
        return Err(TenantError::validation(TENANT_ID_REQUIRED));
    }
    raw.parse::<TenantId>()
        .map_err(|_| TenantError::validation(format!("Invalid tenant ID: {}", raw)))
}

/// UI theme for a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// CSS hex color (`#rgb` or `#rrggbb`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(value: impl Into<String>) -> TenantResult<Self> {
        let value = value.into();
        if HEX_COLOR_REGEX.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(TenantError::validation(format!("Invalid color: {}", value)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = TenantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self("#3b82f6".to_string())
    }
}

/// Per-tenant configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    pub theme: Theme,
    pub primary_color: HexColor,
    /// Feature name -> enabled
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

/// Tenant represents a customer organization.
///
/// Immutable once loaded from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Directory identifier
    pub id: TenantId,

    /// Display name (e.g. "ACME Corporation")
    pub name: String,

    /// Primary domain
    pub domain: String,

    /// Optional emoji or logo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    pub config: TenantConfig,
}

impl Tenant {
    /// Create a tenant with the default configuration and no features
    pub fn new(id: TenantId, name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            domain: domain.into(),
            logo: None,
            config: TenantConfig::default(),
        }
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.config.theme = theme;
        self
    }

    pub fn with_primary_color(mut self, color: HexColor) -> Self {
        self.config.primary_color = color;
        self
    }

    /// Set a feature flag
    pub fn with_feature(mut self, feature: impl Into<String>, enabled: bool) -> Self {
        self.config.features.insert(feature.into(), enabled);
        self
    }

    /// Raw flag lookup (`None` when the tenant has no entry for the feature)
    pub fn feature(&self, feature: &str) -> Option<bool> {
        self.config.features.get(feature).copied()
    }
}
