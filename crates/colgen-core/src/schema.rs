//! Field descriptors: the closed, recursively composable set of column types.

use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;
use serde::{Serialize, Serializer};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnumWidth {
    Enum8,
    Enum16,
}

impl EnumWidth {
    pub fn native(self) -> &'static str {
        match self {
            EnumWidth::Enum8 => "i8",
            EnumWidth::Enum16 => "i16",
        }
    }

    fn range(self) -> (i64, i64) {
        match self {
            EnumWidth::Enum8 => (i64::from(i8::MIN), i64::from(i8::MAX)),
            EnumWidth::Enum16 => (i64::from(i16::MIN), i64::from(i16::MAX)),
        }
    }
}

/// Bijective name <-> code mapping, kept sorted by code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMapping {
    width: EnumWidth,
    by_code: Vec<(String, i16)>,
}

impl EnumMapping {
    pub fn new(width: EnumWidth, pairs: Vec<(String, i64)>) -> Result<Self, Diagnostic> {
        if pairs.is_empty() {
            return Err(Diagnostic::error(
                DiagnosticCode::CG0120EnumEmpty,
                format!("{width:?}() needs at least one value"),
            ));
        }
        let (lo, hi) = width.range();
        let mut names: BTreeSet<&str> = BTreeSet::new();
        let mut codes: BTreeSet<i64> = BTreeSet::new();
        for (name, code) in &pairs {
            if !names.insert(name.as_str()) {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0121EnumDuplicateName,
                    format!("enum name {name:?} is mapped more than once"),
                ));
            }
            if !codes.insert(*code) {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0122EnumDuplicateCode,
                    format!("enum code {code} is mapped more than once"),
                ));
            }
            if *code < lo || *code > hi {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0123EnumCodeOutOfRange,
                    format!("enum code {code} for {name:?} is outside {lo}..={hi} ({width:?})"),
                ));
            }
        }

        let mut by_code: Vec<(String, i16)> = pairs
            .into_iter()
            .map(|(name, code)| (name, code as i16))
            .collect();
        by_code.sort_by_key(|(_, code)| *code);
        Ok(EnumMapping { width, by_code })
    }

    pub fn width(&self) -> EnumWidth {
        self.width
    }

    /// Entries sorted by code.
    pub fn entries(&self) -> &[(String, i16)] {
        &self.by_code
    }

    pub fn name_of(&self, code: i16) -> Option<&str> {
        self.by_code
            .binary_search_by_key(&code, |(_, c)| *c)
            .ok()
            .map(|idx| self.by_code[idx].0.as_str())
    }

    pub fn code_of(&self, name: &str) -> Option<i16> {
        self.by_code
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, code)| *code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal32 { scale: u32 },
    Decimal64 { scale: u32 },
    Decimal128 { scale: u32 },
    Date,
    DateTime,
    String,
    FixedString { length: usize },
    Uuid,
    Enum(EnumMapping),
    Array(Box<FieldType>),
    Nullable(Box<FieldType>),
}

impl FieldType {
    /// The innermost non-composite type.
    pub fn leaf(&self) -> &FieldType {
        match self {
            FieldType::Array(inner) | FieldType::Nullable(inner) => inner.leaf(),
            other => other,
        }
    }
}

fn quote_enum_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('\'');
    for c in name.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Renders the type expression the schema would spell.
impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int8 => f.write_str("Int8"),
            FieldType::Int16 => f.write_str("Int16"),
            FieldType::Int32 => f.write_str("Int32"),
            FieldType::Int64 => f.write_str("Int64"),
            FieldType::UInt8 => f.write_str("UInt8"),
            FieldType::UInt16 => f.write_str("UInt16"),
            FieldType::UInt32 => f.write_str("UInt32"),
            FieldType::UInt64 => f.write_str("UInt64"),
            FieldType::Float32 => f.write_str("Float32"),
            FieldType::Float64 => f.write_str("Float64"),
            FieldType::Decimal32 { scale } => write!(f, "Decimal32({scale})"),
            FieldType::Decimal64 { scale } => write!(f, "Decimal64({scale})"),
            FieldType::Decimal128 { scale } => write!(f, "Decimal128({scale})"),
            FieldType::Date => f.write_str("Date"),
            FieldType::DateTime => f.write_str("DateTime"),
            FieldType::String => f.write_str("String"),
            FieldType::FixedString { length } => write!(f, "FixedString({length})"),
            FieldType::Uuid => f.write_str("UUID"),
            FieldType::Enum(mapping) => {
                write!(f, "{:?}(", mapping.width())?;
                for (idx, (name, code)) in mapping.entries().iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} = {code}", quote_enum_name(name))?;
                }
                f.write_str(")")
            }
            FieldType::Array(inner) => write!(f, "Array({inner})"),
            FieldType::Nullable(inner) => write!(f, "Nullable({inner})"),
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Field {
            name: name.into(),
            ty,
        }
    }
}

/// An ordered, validated field list for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub table: String,
    pub fields: Vec<Field>,
    pub source_path: Option<String>,
    pub source_sha256: Option<String>,
}

impl Schema {
    pub fn new(table: impl Into<String>, fields: Vec<Field>) -> Result<Self> {
        let table = table.into();
        if !util::is_ident(&table) {
            return Err(Diagnostic::error(
                DiagnosticCode::CG0200InvalidName,
                format!("table name {table:?} is not an identifier"),
            )
            .into());
        }

        let mut names: BTreeSet<&str> = BTreeSet::new();
        let mut type_names: BTreeSet<String> = BTreeSet::new();
        for field in &fields {
            if !util::is_ident(&field.name) {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0200InvalidName,
                    format!("field name {:?} is not an identifier", field.name),
                )
                .into());
            }
            if !names.insert(field.name.as_str()) {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0201DuplicateField,
                    format!("field {:?} is declared more than once", field.name),
                )
                .into());
            }
            let type_name = util::upper_camel(&field.name);
            if !type_names.insert(type_name.clone()) {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0202TypeNameCollision,
                    format!(
                        "field {:?} maps to type name {type_name} which is already taken",
                        field.name
                    ),
                )
                .into());
            }
        }

        Ok(Schema {
            table,
            fields,
            source_path: None,
            source_sha256: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(xs: &[(&str, i64)]) -> Vec<(String, i64)> {
        xs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn enum_mapping_is_sorted_by_code_and_bidirectional() {
        let m = EnumMapping::new(EnumWidth::Enum8, pairs(&[("b", 2), ("a", -1), ("c", 0)]))
            .expect("mapping");
        let codes: Vec<i16> = m.entries().iter().map(|(_, c)| *c).collect();
        assert_eq!(codes, vec![-1, 0, 2]);
        for (name, code) in m.entries() {
            assert_eq!(m.name_of(*code), Some(name.as_str()));
            assert_eq!(m.code_of(name), Some(*code));
        }
        assert_eq!(m.name_of(1), None);
        assert_eq!(m.code_of("z"), None);
    }

    #[test]
    fn enum_mapping_rejects_non_injective_input() {
        let err = EnumMapping::new(EnumWidth::Enum8, pairs(&[("a", 1), ("a", 2)])).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::CG0121EnumDuplicateName);
        let err = EnumMapping::new(EnumWidth::Enum8, pairs(&[("a", 1), ("b", 1)])).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::CG0122EnumDuplicateCode);
        let err = EnumMapping::new(EnumWidth::Enum8, pairs(&[("a", 128)])).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::CG0123EnumCodeOutOfRange);
        assert!(EnumMapping::new(EnumWidth::Enum16, pairs(&[("a", 128)])).is_ok());
        let err = EnumMapping::new(EnumWidth::Enum16, Vec::new()).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::CG0120EnumEmpty);
    }

    #[test]
    fn display_spells_type_expressions() {
        let m = EnumMapping::new(EnumWidth::Enum8, pairs(&[("it's", 1), ("a", 0)])).unwrap();
        let ty = FieldType::Array(Box::new(FieldType::Nullable(Box::new(FieldType::Enum(m)))));
        assert_eq!(ty.to_string(), r"Array(Nullable(Enum8('a' = 0, 'it\'s' = 1)))");
        assert_eq!(
            FieldType::Decimal128 { scale: 4 }.to_string(),
            "Decimal128(4)"
        );
    }

    #[test]
    fn schema_rejects_colliding_names() {
        let err = Schema::new(
            "t",
            vec![
                Field::new("user_id", FieldType::UInt64),
                Field::new("userId", FieldType::UInt64),
            ],
        )
        .unwrap_err();
        let diag = err.downcast_ref::<Diagnostic>().expect("diagnostic");
        assert_eq!(diag.code, DiagnosticCode::CG0202TypeNameCollision);

        let err = Schema::new(
            "t",
            vec![Field::new("a", FieldType::Int8), Field::new("a", FieldType::Int8)],
        )
        .unwrap_err();
        let diag = err.downcast_ref::<Diagnostic>().expect("diagnostic");
        assert_eq!(diag.code, DiagnosticCode::CG0201DuplicateField);

        let err = Schema::new("bad table", Vec::new()).unwrap_err();
        let diag = err.downcast_ref::<Diagnostic>().expect("diagnostic");
        assert_eq!(diag.code, DiagnosticCode::CG0200InvalidName);
    }
}
