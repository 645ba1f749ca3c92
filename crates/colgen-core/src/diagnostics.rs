use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Parse,
    Validate,
    Emit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticCode {
    CG0001SchemaParseError,
    CG0002SchemaVersionMismatch,
    CG0100TypeSyntax,
    CG0101UnknownType,
    CG0102BadTypeArgs,
    CG0110FixedStringLength,
    CG0111DecimalScale,
    CG0120EnumEmpty,
    CG0121EnumDuplicateName,
    CG0122EnumDuplicateCode,
    CG0123EnumCodeOutOfRange,
    CG0200InvalidName,
    CG0201DuplicateField,
    CG0202TypeNameCollision,
    CG0300UnknownTimezone,
    CG0301InvalidRuntimeCrate,
}

impl DiagnosticCode {
    pub fn code_str(self) -> &'static str {
        match self {
            DiagnosticCode::CG0001SchemaParseError => "CG0001",
            DiagnosticCode::CG0002SchemaVersionMismatch => "CG0002",
            DiagnosticCode::CG0100TypeSyntax => "CG0100",
            DiagnosticCode::CG0101UnknownType => "CG0101",
            DiagnosticCode::CG0102BadTypeArgs => "CG0102",
            DiagnosticCode::CG0110FixedStringLength => "CG0110",
            DiagnosticCode::CG0111DecimalScale => "CG0111",
            DiagnosticCode::CG0120EnumEmpty => "CG0120",
            DiagnosticCode::CG0121EnumDuplicateName => "CG0121",
            DiagnosticCode::CG0122EnumDuplicateCode => "CG0122",
            DiagnosticCode::CG0123EnumCodeOutOfRange => "CG0123",
            DiagnosticCode::CG0200InvalidName => "CG0200",
            DiagnosticCode::CG0201DuplicateField => "CG0201",
            DiagnosticCode::CG0202TypeNameCollision => "CG0202",
            DiagnosticCode::CG0300UnknownTimezone => "CG0300",
            DiagnosticCode::CG0301InvalidRuntimeCrate => "CG0301",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            DiagnosticCode::CG0001SchemaParseError => "failed to parse schema document",
            DiagnosticCode::CG0002SchemaVersionMismatch => "schema_version mismatch",
            DiagnosticCode::CG0100TypeSyntax => "malformed type expression",
            DiagnosticCode::CG0101UnknownType => "unknown column type",
            DiagnosticCode::CG0102BadTypeArgs => "wrong arguments for column type",
            DiagnosticCode::CG0110FixedStringLength => "FixedString length must be positive",
            DiagnosticCode::CG0111DecimalScale => "decimal scale exceeds precision",
            DiagnosticCode::CG0120EnumEmpty => "enum has no values",
            DiagnosticCode::CG0121EnumDuplicateName => "enum name is mapped twice",
            DiagnosticCode::CG0122EnumDuplicateCode => "enum code is mapped twice",
            DiagnosticCode::CG0123EnumCodeOutOfRange => "enum code does not fit the enum width",
            DiagnosticCode::CG0200InvalidName => "name is not an identifier",
            DiagnosticCode::CG0201DuplicateField => "duplicate field name",
            DiagnosticCode::CG0202TypeNameCollision => "generated names collide",
            DiagnosticCode::CG0300UnknownTimezone => "unknown timezone",
            DiagnosticCode::CG0301InvalidRuntimeCrate => "runtime crate is not a Rust path",
        }
    }

    pub fn default_help(self) -> Option<&'static str> {
        match self {
            DiagnosticCode::CG0002SchemaVersionMismatch => {
                Some("Set \"schema_version\" to \"colgen.schema@0.1.0\".")
            }
            DiagnosticCode::CG0101UnknownType => Some(
                "Supported: (U)Int8..64, Float32/64, Decimal*, Date, DateTime, String, FixedString(N), UUID, Enum8/16, Array(T), Nullable(T).",
            ),
            DiagnosticCode::CG0200InvalidName => Some("Use [A-Za-z_][A-Za-z0-9_]*."),
            DiagnosticCode::CG0202TypeNameCollision => {
                Some("Rename the field; aliases are UpperCamelCase and enum helpers snake_case.")
            }
            DiagnosticCode::CG0300UnknownTimezone => {
                Some("Use an IANA zone name such as \"Europe/Moscow\" or \"UTC\".")
            }
            _ => None,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            DiagnosticCode::CG0001SchemaParseError
            | DiagnosticCode::CG0100TypeSyntax
            | DiagnosticCode::CG0101UnknownType => Phase::Parse,
            DiagnosticCode::CG0300UnknownTimezone | DiagnosticCode::CG0301InvalidRuntimeCrate => {
                Phase::Emit
            }
            _ => Phase::Validate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub phase: Phase,
    pub severity: Severity,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            phase: code.phase(),
            severity: Severity::Error,
            message: message.into(),
            help: code.default_help().map(|s| s.to_string()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} {:?}: {}",
            self.code.code_str(),
            self.phase,
            self.severity,
            self.message
        )?;
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

pub fn render_diagnostics_md() -> String {
    let mut rows: Vec<(String, Phase, String, String)> = all_codes()
        .iter()
        .map(|code| {
            (
                code.code_str().to_string(),
                code.phase(),
                code.default_message().to_string(),
                code.default_help().unwrap_or("").to_string(),
            )
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    out.push_str("# colgen diagnostics catalog\n\n");
    out.push_str("This document is generated from `crates/colgen-core/src/diagnostics.rs`.\n\n");
    out.push_str("| Code | Phase | Message | Help |\n");
    out.push_str("| ---- | ----- | ------- | ---- |\n");
    for (code, phase, msg, help) in rows {
        out.push_str(&format!("| {code} | {phase:?} | {msg} | {help} |\n"));
    }
    out
}

fn all_codes() -> &'static [DiagnosticCode] {
    &[
        DiagnosticCode::CG0001SchemaParseError,
        DiagnosticCode::CG0002SchemaVersionMismatch,
        DiagnosticCode::CG0100TypeSyntax,
        DiagnosticCode::CG0101UnknownType,
        DiagnosticCode::CG0102BadTypeArgs,
        DiagnosticCode::CG0110FixedStringLength,
        DiagnosticCode::CG0111DecimalScale,
        DiagnosticCode::CG0120EnumEmpty,
        DiagnosticCode::CG0121EnumDuplicateName,
        DiagnosticCode::CG0122EnumDuplicateCode,
        DiagnosticCode::CG0123EnumCodeOutOfRange,
        DiagnosticCode::CG0200InvalidName,
        DiagnosticCode::CG0201DuplicateField,
        DiagnosticCode::CG0202TypeNameCollision,
        DiagnosticCode::CG0300UnknownTimezone,
        DiagnosticCode::CG0301InvalidRuntimeCrate,
    ]
}
