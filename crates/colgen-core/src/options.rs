use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::util;

pub const DEFAULT_REFERENCE_TIMEZONE: &str = "Europe/Moscow";
pub const DEFAULT_RUNTIME_CRATE: &str = "colgen_rt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenOptions {
    /// IANA zone Date/DateTime oracle values are rendered in.
    pub reference_timezone: String,
    /// Path of the runtime helper crate as seen from the generated module.
    pub runtime_crate: String,
    /// Prepended to every generated type alias.
    pub type_prefix: Option<String>,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions {
            reference_timezone: DEFAULT_REFERENCE_TIMEZONE.to_string(),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            type_prefix: None,
        }
    }
}

impl GenOptions {
    pub fn validate(&self) -> Result<()> {
        if self.reference_timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(Diagnostic::error(
                DiagnosticCode::CG0300UnknownTimezone,
                format!("{:?}", self.reference_timezone),
            )
            .into());
        }
        let path = self
            .runtime_crate
            .strip_prefix("::")
            .unwrap_or(&self.runtime_crate);
        if !path.split("::").all(util::is_ident) {
            return Err(Diagnostic::error(
                DiagnosticCode::CG0301InvalidRuntimeCrate,
                format!("{:?}", self.runtime_crate),
            )
            .into());
        }
        if let Some(prefix) = &self.type_prefix {
            if !util::is_ident(prefix) {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0200InvalidName,
                    format!("type prefix {prefix:?} is not an identifier"),
                )
                .into());
            }
        }
        Ok(())
    }
}
