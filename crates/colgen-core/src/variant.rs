//! Per-variant declarations: alias name, native type and auxiliary helpers.

use crate::options::GenOptions;
use crate::rsir::{RsExpr, RsFn, RsItem, RsParam, RsPat, RsStmt};
use crate::schema::{EnumMapping, Field, FieldType};
use crate::util;

/// Alias declared for the field, e.g. `UserId`.
pub fn type_name(field: &Field, opts: &GenOptions) -> String {
    let prefix = opts.type_prefix.as_deref().unwrap_or("");
    format!("{prefix}{}", util::upper_camel(&field.name))
}

/// Name the field is bound to in generated signatures.
pub fn param_name(field: &Field) -> String {
    util::rust_ident(&field.name)
}

pub fn native_type_name(ty: &FieldType) -> String {
    match ty {
        FieldType::Int8 => "i8".to_string(),
        FieldType::Int16 => "i16".to_string(),
        FieldType::Int32 | FieldType::Decimal32 { .. } => "i32".to_string(),
        FieldType::Int64 | FieldType::Decimal64 { .. } => "i64".to_string(),
        FieldType::Decimal128 { .. } => "i128".to_string(),
        FieldType::UInt8 => "u8".to_string(),
        FieldType::UInt16 | FieldType::Date => "u16".to_string(),
        FieldType::UInt32 | FieldType::DateTime => "u32".to_string(),
        FieldType::UInt64 => "u64".to_string(),
        FieldType::Float32 => "f32".to_string(),
        FieldType::Float64 => "f64".to_string(),
        FieldType::String | FieldType::FixedString { .. } => "String".to_string(),
        FieldType::Uuid => "[u8; 16]".to_string(),
        FieldType::Enum(mapping) => mapping.width().native().to_string(),
        FieldType::Array(inner) => format!("Vec<{}>", native_type_name(inner)),
        FieldType::Nullable(inner) => format!("Option<{}>", native_type_name(inner)),
    }
}

/// Shape of the oracle value, e.g. `Array(Nullable(Text))`.
pub fn oracle_shape(ty: &FieldType) -> String {
    match ty {
        FieldType::Int8 | FieldType::Int16 | FieldType::Int32 | FieldType::Int64 => {
            "Int".to_string()
        }
        FieldType::UInt8 | FieldType::UInt16 | FieldType::UInt32 | FieldType::UInt64 => {
            "UInt".to_string()
        }
        FieldType::Float32 | FieldType::Float64 => "Float".to_string(),
        FieldType::Decimal32 { .. } | FieldType::Decimal64 { .. } | FieldType::Decimal128 { .. } => {
            "Decimal".to_string()
        }
        FieldType::Date
        | FieldType::DateTime
        | FieldType::String
        | FieldType::FixedString { .. }
        | FieldType::Uuid
        | FieldType::Enum(_) => "Text".to_string(),
        FieldType::Array(inner) => format!("Array({})", oracle_shape(inner)),
        FieldType::Nullable(inner) => format!("Nullable({})", oracle_shape(inner)),
    }
}

pub struct EnumHelperNames {
    pub values: String,
    pub name_fn: String,
    pub code_fn: String,
}

pub fn enum_helper_names(field: &Field) -> EnumHelperNames {
    let base = util::snake(&field.name);
    EnumHelperNames {
        values: format!("{}_VALUES", base.to_ascii_uppercase()),
        name_fn: format!("{base}_name"),
        code_fn: format!("{base}_code"),
    }
}

/// Auxiliary items the field needs next to its alias; empty for most variants.
pub fn helper(field: &Field, ty: &FieldType) -> Vec<RsItem> {
    match ty {
        FieldType::Enum(mapping) => enum_helper(field, mapping),
        FieldType::Array(inner) | FieldType::Nullable(inner) => helper(field, inner),
        _ => Vec::new(),
    }
}

fn enum_helper(field: &Field, mapping: &EnumMapping) -> Vec<RsItem> {
    let names = enum_helper_names(field);
    let native = mapping.width().native();

    let table = RsExpr::SliceRef(
        mapping
            .entries()
            .iter()
            .map(|(name, code)| {
                RsExpr::Tuple(vec![RsExpr::string(name.clone()), RsExpr::Int(i128::from(*code))])
            })
            .collect(),
    );

    let mut by_code: Vec<(RsPat, RsExpr)> = mapping
        .entries()
        .iter()
        .map(|(name, code)| {
            (
                RsPat::Int(i128::from(*code)),
                RsExpr::call("Some", vec![RsExpr::string(name.clone())]),
            )
        })
        .collect();
    by_code.push((RsPat::Raw("_".to_string()), RsExpr::path("None")));

    let mut by_name: Vec<(RsPat, RsExpr)> = mapping
        .entries()
        .iter()
        .map(|(name, code)| {
            (
                RsPat::Str(name.clone()),
                RsExpr::call("Some", vec![RsExpr::Int(i128::from(*code))]),
            )
        })
        .collect();
    by_name.push((RsPat::Raw("_".to_string()), RsExpr::path("None")));

    vec![
        RsItem::Const {
            public: true,
            name: names.values,
            ty: format!("&[(&str, {native})]"),
            value: table,
        },
        RsItem::Blank,
        RsItem::Fn(RsFn {
            doc: vec![format!("Name mapped to `code` in `{}`.", field.name)],
            attrs: Vec::new(),
            public: true,
            name: names.name_fn,
            receiver: None,
            params: vec![RsParam {
                name: "code".to_string(),
                ty: native.to_string(),
            }],
            ret: Some("Option<&'static str>".to_string()),
            body: vec![RsStmt::Tail(RsExpr::match_(RsExpr::path("code"), by_code))],
        }),
        RsItem::Blank,
        RsItem::Fn(RsFn {
            doc: Vec::new(),
            attrs: Vec::new(),
            public: true,
            name: names.code_fn,
            receiver: None,
            params: vec![RsParam {
                name: "name".to_string(),
                ty: "&str".to_string(),
            }],
            ret: Some(format!("Option<{native}>")),
            body: vec![RsStmt::Tail(RsExpr::match_(RsExpr::path("name"), by_name))],
        }),
    ]
}
