//! Test-oracle path: a comparable `oracle::Value` for every variant.

use crate::composite;
use crate::needs::{Need, Needs};
use crate::rsir::{RsExpr, RsPat};
use crate::schema::{Field, FieldType};
use crate::variant;

pub const REFERENCE_TIMEZONE_CONST: &str = "REFERENCE_TIMEZONE";

pub fn field_test_encoding(field: &Field, src: &str, needs: &mut Needs) -> RsExpr {
    needs.mark(Need::Oracle);
    test_encoding(field, &field.ty, src, 0, needs)
}

fn value_ctor(variant: &str, arg: RsExpr) -> RsExpr {
    RsExpr::call(format!("oracle::Value::{variant}"), vec![arg])
}

fn widen(to: &str, src: &str) -> RsExpr {
    RsExpr::call(
        format!("{to}::from"),
        vec![RsExpr::deref(RsExpr::path(src))],
    )
}

fn decimal(func: &str, scale: u32, src: &str, needs: &mut Needs) -> RsExpr {
    needs.mark(Need::Decimal);
    value_ctor(
        "Decimal",
        RsExpr::call(
            format!("decimal::{func}"),
            vec![
                RsExpr::Int(i128::from(scale)),
                RsExpr::deref(RsExpr::path(src)),
            ],
        ),
    )
}

fn time(func: &str, src: &str, needs: &mut Needs) -> RsExpr {
    needs.mark(Need::Time);
    value_ctor(
        "Text",
        RsExpr::call(
            format!("time::{func}"),
            vec![
                RsExpr::deref(RsExpr::path(src)),
                RsExpr::path(REFERENCE_TIMEZONE_CONST),
            ],
        ),
    )
}

pub fn test_encoding(
    field: &Field,
    ty: &FieldType,
    src: &str,
    depth: usize,
    needs: &mut Needs,
) -> RsExpr {
    match ty {
        FieldType::Int8 | FieldType::Int16 | FieldType::Int32 | FieldType::Int64 => {
            value_ctor("Int", widen("i64", src))
        }
        FieldType::UInt8 | FieldType::UInt16 | FieldType::UInt32 | FieldType::UInt64 => {
            value_ctor("UInt", widen("u64", src))
        }
        FieldType::Float32 | FieldType::Float64 => value_ctor("Float", widen("f64", src)),
        FieldType::Decimal32 { scale } => decimal("decimal32", *scale, src, needs),
        FieldType::Decimal64 { scale } => decimal("decimal64", *scale, src, needs),
        FieldType::Decimal128 { scale } => decimal("decimal128", *scale, src, needs),
        FieldType::Date => time("render_date", src, needs),
        FieldType::DateTime => time("render_datetime", src, needs),
        FieldType::String | FieldType::FixedString { .. } => {
            value_ctor("Text", RsExpr::method(RsExpr::path(src), "clone", vec![]))
        }
        FieldType::Uuid => {
            needs.mark(Need::Uuid);
            let uuid = RsExpr::call(
                "uuid::Uuid::from_bytes",
                vec![RsExpr::deref(RsExpr::path(src))],
            );
            let hyphenated = RsExpr::method(uuid, "hyphenated", vec![]);
            value_ctor("Text", RsExpr::method(hyphenated, "to_string", vec![]))
        }
        FieldType::Enum(_) => enum_test_encoding(field, src),
        FieldType::Array(inner) => composite::array_test_encoding(src, depth, |item| {
            test_encoding(field, inner, item, depth + 1, needs)
        }),
        FieldType::Nullable(inner) => composite::nullable_test_encoding(src, depth, |value| {
            test_encoding(field, inner, value, depth + 1, needs)
        }),
    }
}

// Unmapped codes panic when the oracle runs, naming the code.
fn enum_test_encoding(field: &Field, src: &str) -> RsExpr {
    let names = variant::enum_helper_names(field);
    let lookup = RsExpr::call(names.name_fn, vec![RsExpr::deref(RsExpr::path(src))]);
    let resolved = RsExpr::match_(
        lookup,
        vec![
            (
                RsPat::Raw("Some(label)".to_string()),
                RsExpr::method(RsExpr::path("label"), "to_string", vec![]),
            ),
            (
                RsPat::Raw("None".to_string()),
                RsExpr::Macro {
                    name: "panic".to_string(),
                    args: vec![
                        RsExpr::string(format!(
                            "value {{}} has no key mapped to in enum {}",
                            field.name
                        )),
                        RsExpr::deref(RsExpr::path(src)),
                    ],
                },
            ),
        ],
    );
    value_ctor("Text", resolved)
}
