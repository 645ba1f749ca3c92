//! Production path: the exact wire bytes for every variant.
//!
//! `src` always names a `&T` for the variant's native `T`. Multi-byte integers
//! are little-endian; lengths are ULEB128; a nullable is one flag byte
//! (0 present, 1 absent) followed by the payload when present.

use crate::composite::{self, write_stmt};
use crate::needs::{Need, Needs};
use crate::rsir::{BinOp, RsExpr, RsStmt};
use crate::schema::{Field, FieldType};

pub fn field_encoding(field: &Field, src: &str, needs: &mut Needs) -> Vec<RsStmt> {
    needs.mark(Need::Wire);
    encoding(field, &field.ty, src, 0, needs)
}

pub fn encoding(
    field: &Field,
    ty: &FieldType,
    src: &str,
    depth: usize,
    needs: &mut Needs,
) -> Vec<RsStmt> {
    let value = || RsExpr::deref(RsExpr::path(src));
    match ty {
        FieldType::Int8 => vec![write_stmt("write_i8", value())],
        FieldType::Int16 => vec![write_stmt("write_i16", value())],
        FieldType::Int32 | FieldType::Decimal32 { .. } => vec![write_stmt("write_i32", value())],
        FieldType::Int64 | FieldType::Decimal64 { .. } => vec![write_stmt("write_i64", value())],
        FieldType::UInt8 => vec![write_stmt("write_u8", value())],
        FieldType::UInt16 | FieldType::Date => vec![write_stmt("write_u16", value())],
        FieldType::UInt32 | FieldType::DateTime => vec![write_stmt("write_u32", value())],
        FieldType::UInt64 => vec![write_stmt("write_u64", value())],
        FieldType::Float32 => vec![write_stmt(
            "write_u32",
            RsExpr::method(RsExpr::path(src), "to_bits", vec![]),
        )],
        FieldType::Float64 => vec![write_stmt(
            "write_u64",
            RsExpr::method(RsExpr::path(src), "to_bits", vec![]),
        )],
        FieldType::Decimal128 { .. } => {
            let high = RsExpr::binary(BinOp::Shr, value(), RsExpr::Int(64));
            vec![
                write_stmt("write_u64", RsExpr::cast(value(), "u64")),
                write_stmt("write_u64", RsExpr::cast(high, "u64")),
            ]
        }
        FieldType::String => vec![
            write_stmt("write_uleb128", composite::len_u64(src)),
            write_stmt("write_bytes", as_bytes(src)),
        ],
        FieldType::FixedString { length } => fixed_string_encoding(field, src, *length),
        FieldType::Uuid => vec![write_stmt(
            "write_bytes",
            RsExpr::method(RsExpr::path(src), "as_slice", vec![]),
        )],
        FieldType::Enum(mapping) => {
            let method = match mapping.width().native() {
                "i8" => "write_i8",
                _ => "write_i16",
            };
            vec![write_stmt(method, value())]
        }
        FieldType::Array(inner) => composite::array_encoding(src, depth, |item| {
            encoding(field, inner, item, depth + 1, needs)
        }),
        FieldType::Nullable(inner) => composite::nullable_encoding(src, depth, |value| {
            encoding(field, inner, value, depth + 1, needs)
        }),
    }
}

fn as_bytes(src: &str) -> RsExpr {
    RsExpr::method(RsExpr::path(src), "as_bytes", vec![])
}

fn fixed_string_encoding(field: &Field, src: &str, length: usize) -> Vec<RsStmt> {
    let len = RsExpr::method(RsExpr::path(src), "len", vec![]);
    let mismatch = RsExpr::call(
        "Err",
        vec![RsExpr::call(
            "wire::EncodeError::fixed_string_length",
            vec![
                RsExpr::string(field.name.clone()),
                RsExpr::Int(length as i128),
                as_bytes(src),
            ],
        )],
    );
    vec![
        RsStmt::If {
            cond: RsExpr::binary(BinOp::Ne, len, RsExpr::Int(length as i128)),
            then_body: vec![RsStmt::Return(mismatch)],
        },
        write_stmt("write_bytes", as_bytes(src)),
    ]
}
