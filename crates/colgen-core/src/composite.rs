//! Array-of and Nullable-of wrappers, generic over the wrapped variant.
//!
//! Each combinator binds a fresh reference to the element (or the present
//! payload) and hands its name to `inner`; it never looks at what `inner` is.

use crate::rsir::{RsExpr, RsPat, RsStmt};

pub const NULL_FLAG_PRESENT: i128 = 0;
pub const NULL_FLAG_ABSENT: i128 = 1;

pub fn item_var(depth: usize) -> String {
    format!("item{depth}")
}

pub fn value_var(depth: usize) -> String {
    format!("value{depth}")
}

/// Writer call `self.writer.<method>(arg)?`.
pub fn write_stmt(method: &str, arg: RsExpr) -> RsStmt {
    RsStmt::Semi(RsExpr::try_(RsExpr::method(
        RsExpr::path("self.writer"),
        method,
        vec![arg],
    )))
}

/// `src.len() as u64`.
pub fn len_u64(src: &str) -> RsExpr {
    RsExpr::cast(RsExpr::method(RsExpr::path(src), "len", vec![]), "u64")
}

pub fn array_encoding(
    src: &str,
    depth: usize,
    inner: impl FnOnce(&str) -> Vec<RsStmt>,
) -> Vec<RsStmt> {
    let item = item_var(depth);
    let body = inner(&item);
    vec![
        write_stmt("write_uleb128", len_u64(src)),
        RsStmt::For {
            var: item,
            iter: RsExpr::method(RsExpr::path(src), "iter", vec![]),
            body,
        },
    ]
}

pub fn nullable_encoding(
    src: &str,
    depth: usize,
    inner: impl FnOnce(&str) -> Vec<RsStmt>,
) -> Vec<RsStmt> {
    let value = value_var(depth);
    let mut present = vec![write_stmt("write_u8", RsExpr::Int(NULL_FLAG_PRESENT))];
    present.extend(inner(&value));
    vec![RsStmt::Match {
        scrutinee: RsExpr::path(src),
        arms: vec![
            (RsPat::Raw(format!("Some({value})")), present),
            (
                RsPat::Raw("None".to_string()),
                vec![write_stmt("write_u8", RsExpr::Int(NULL_FLAG_ABSENT))],
            ),
        ],
    }]
}

pub fn array_test_encoding(
    src: &str,
    depth: usize,
    inner: impl FnOnce(&str) -> RsExpr,
) -> RsExpr {
    let item = item_var(depth);
    let body = inner(&item);
    let mapped = RsExpr::method(
        RsExpr::method(RsExpr::path(src), "iter", vec![]),
        "map",
        vec![RsExpr::closure(item, body)],
    );
    RsExpr::call(
        "oracle::Value::Array",
        vec![RsExpr::method(mapped, "collect", vec![])],
    )
}

pub fn nullable_test_encoding(
    src: &str,
    depth: usize,
    inner: impl FnOnce(&str) -> RsExpr,
) -> RsExpr {
    let value = value_var(depth);
    let present = inner(&value);
    RsExpr::match_(
        RsExpr::path(src),
        vec![
            (RsPat::Raw(format!("Some({value})")), present),
            (
                RsPat::Raw("None".to_string()),
                RsExpr::path("oracle::Value::Null"),
            ),
        ],
    )
}
