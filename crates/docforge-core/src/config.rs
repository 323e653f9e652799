//! Configuration settings
//!
//! Settings are read from `docforge.toml`. Every section is optional and
//! falls back to its defaults.
//!
//! ```toml
//! [templates]
//! dir = "templates"
//!
//! [renderer]
//! program = "libreoffice"
//! timeout_secs = 120
//!
//! [validation]
//! default_phone_prefix = "+1"
//!
//! [[validation.phone_rules]]
//! country = "india"
//! prefix = "+91"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use docforge_pdf::{LibreOfficeRenderer, DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};

use crate::catalog::DocumentKind;
use crate::error::{CoreError, Result};
use crate::validate::{default_phone_rules, PhoneRule, PhoneRules, DEFAULT_PHONE_PREFIX};

/// Default configuration file name
pub const CONFIG_FILE: &str = "docforge.toml";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Template lookup
    pub templates: TemplateSettings,
    /// PDF converter
    pub renderer: RendererSettings,
    /// Request validation
    pub validation: ValidationSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read settings from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(CoreError::Config)
    }

    /// Path of the template file for a document type
    pub fn template_path(&self, kind: DocumentKind) -> PathBuf {
        self.templates.dir.join(kind.template())
    }

    /// Phone validation table
    pub fn phone_rules(&self) -> PhoneRules {
        PhoneRules::new(
            self.validation.phone_rules.clone(),
            self.validation.default_phone_prefix.clone(),
        )
    }

    /// Converter configured by the `[renderer]` section
    pub fn renderer(&self) -> LibreOfficeRenderer {
        LibreOfficeRenderer::new(self.renderer.program.clone())
            .with_args(self.renderer.args.iter().cloned())
            .with_timeout(Duration::from_secs(self.renderer.timeout_secs))
    }
}

/// Template configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory holding the DOCX templates
    pub dir: PathBuf,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
        }
    }
}

/// PDF converter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RendererSettings {
    /// Converter executable
    pub program: String,
    /// Extra arguments placed before the conversion arguments
    pub args: Vec<String>,
    /// Seconds before the converter is killed
    pub timeout_secs: u64,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationSettings {
    /// Prefix required when no rule matches the country
    pub default_phone_prefix: String,
    /// Per-country prefixes; replaces the built-in table when given
    pub phone_rules: Vec<PhoneRule>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            default_phone_prefix: DEFAULT_PHONE_PREFIX.to_string(),
            phone_rules: default_phone_rules(),
        }
    }
}
