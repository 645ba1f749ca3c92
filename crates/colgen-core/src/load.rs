//! Schema documents: JSON on disk -> validated `Schema`.

use std::path::Path;

use anyhow::{Context, Result};
use colgen_contracts::SCHEMA_SCHEMA_VERSION;
use serde::Deserialize;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::schema::{Field, Schema};
use crate::type_expr::parse_type;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDoc {
    schema_version: String,
    table: String,
    fields: Vec<FieldDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDoc {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

pub fn load_schema_file(path: &Path) -> Result<Schema> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read schema: {}", path.display()))?;
    let mut schema =
        parse_schema_json(&bytes).with_context(|| format!("load schema: {}", path.display()))?;
    schema.source_path = Some(path.to_string_lossy().to_string());
    Ok(schema)
}

pub fn parse_schema_json(bytes: &[u8]) -> Result<Schema> {
    let doc: SchemaDoc = serde_json::from_slice(bytes).map_err(|err| {
        Diagnostic::error(DiagnosticCode::CG0001SchemaParseError, err.to_string())
    })?;
    if doc.schema_version.trim() != SCHEMA_SCHEMA_VERSION {
        return Err(Diagnostic::error(
            DiagnosticCode::CG0002SchemaVersionMismatch,
            format!(
                "expected {SCHEMA_SCHEMA_VERSION} got {:?}",
                doc.schema_version
            ),
        )
        .into());
    }

    let mut fields = Vec::with_capacity(doc.fields.len());
    for (idx, f) in doc.fields.into_iter().enumerate() {
        let ty = parse_type(&f.ty)
            .with_context(|| format!("fields[{idx}] ({:?}) type {:?}", f.name, f.ty))?;
        fields.push(Field::new(f.name, ty));
    }

    let mut schema = Schema::new(doc.table, fields)?;
    schema.source_sha256 = Some(crate::util::sha256_hex(bytes));
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn diag_code(err: &anyhow::Error) -> DiagnosticCode {
        err.chain()
            .find_map(|e| e.downcast_ref::<Diagnostic>())
            .expect("diagnostic in chain")
            .code
    }

    #[test]
    fn loads_fields_in_declared_order() {
        let schema = parse_schema_json(
            br#"{
                "schema_version": "colgen.schema@0.1.0",
                "table": "events",
                "fields": [
                    {"name": "id", "type": "UInt64"},
                    {"name": "tags", "type": "Array(String)"}
                ]
            }"#,
        )
        .expect("schema");
        assert_eq!(schema.table, "events");
        let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "tags"]);
        assert_eq!(
            schema.fields[1].ty,
            FieldType::Array(Box::new(FieldType::String))
        );
        assert_eq!(schema.source_sha256.as_deref().map(str::len), Some(64));
    }

    #[test]
    fn rejects_wrong_version_and_bad_types() {
        let err = parse_schema_json(
            br#"{"schema_version": "colgen.schema@9", "table": "t", "fields": []}"#,
        )
        .unwrap_err();
        assert_eq!(diag_code(&err), DiagnosticCode::CG0002SchemaVersionMismatch);

        let err = parse_schema_json(
            br#"{"schema_version": "colgen.schema@0.1.0", "table": "t",
                 "fields": [{"name": "x", "type": "Nullable(Text)"}]}"#,
        )
        .unwrap_err();
        assert_eq!(diag_code(&err), DiagnosticCode::CG0101UnknownType);
        assert!(format!("{err:#}").contains("fields[0]"));

        let err = parse_schema_json(b"{not json").unwrap_err();
        assert_eq!(diag_code(&err), DiagnosticCode::CG0001SchemaParseError);
    }
}
