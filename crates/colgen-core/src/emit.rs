//! Emission driver: one ordered pass over the fields, then module assembly.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::encoding;
use crate::needs::{Need, Needs};
use crate::options::GenOptions;
use crate::rs_emit;
use crate::rsir::{
    Receiver, RsExpr, RsFn, RsImpl, RsItem, RsModule, RsParam, RsStmt, RsStruct, RsStructField,
};
use crate::schema::{Field, FieldType, Schema};
use crate::testing;
use crate::util;
use crate::variant;

// Clippy's default `too_many_arguments` threshold.
const MAX_ARGS_WITHOUT_ALLOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub module: RsModule,
    pub needs: Needs,
}

pub fn encoder_name(schema: &Schema) -> String {
    format!("{}Encoder", util::upper_camel(&schema.table))
}

pub fn test_encoder_name(schema: &Schema) -> String {
    format!("{}TestEncoder", util::upper_camel(&schema.table))
}

pub fn emit_module(schema: &Schema, opts: &GenOptions) -> Result<String> {
    let generated = build_module(schema, opts)?;
    rs_emit::emit_module(&generated.module)
}

pub fn emit_module_to<W: Write>(out: &mut W, schema: &Schema, opts: &GenOptions) -> Result<Needs> {
    let generated = build_module(schema, opts)?;
    rs_emit::write_module(out, &generated.module)?;
    Ok(generated.needs)
}

pub fn build_module(schema: &Schema, opts: &GenOptions) -> Result<GeneratedModule> {
    opts.validate()?;
    check_reserved_names(schema, opts)?;

    let mut needs = Needs::default();
    let types = type_items(schema, opts);
    let encoder = encoder_items(schema, opts, &mut needs);
    let test_encoder = test_encoder_items(schema, opts, &mut needs);

    let mut items = header_items(schema, opts, &needs);
    items.extend(types);
    items.extend(encoder);
    items.push(RsItem::Blank);
    items.extend(test_encoder);

    Ok(GeneratedModule {
        module: RsModule { items },
        needs,
    })
}

// Type names the generated module refers to unqualified.
const RESERVED_TYPE_NAMES: &[&str] = &["Self", "String", "Vec", "Option", "Result", "W"];

// Values the generated bodies call or read unqualified.
const RESERVED_VALUE_NAMES: &[&str] = &[
    "Ok",
    "Err",
    "Some",
    "None",
    testing::REFERENCE_TIMEZONE_CONST,
];

fn check_reserved_names(schema: &Schema, opts: &GenOptions) -> Result<()> {
    let encoders = [encoder_name(schema), test_encoder_name(schema)];
    for field in &schema.fields {
        let name = variant::type_name(field, opts);
        if encoders.contains(&name) || RESERVED_TYPE_NAMES.contains(&name.as_str()) {
            return Err(Diagnostic::error(
                DiagnosticCode::CG0202TypeNameCollision,
                format!(
                    "field {:?} maps to type name {name} which the generated module already uses",
                    field.name
                ),
            )
            .into());
        }
    }

    // Parameters, enum helper fns and their tables share one namespace.
    let mut owners: BTreeMap<String, String> = RESERVED_VALUE_NAMES
        .iter()
        .map(|name| (name.to_string(), "the generated module".to_string()))
        .collect();
    for field in &schema.fields {
        for name in value_names(field) {
            if let Some(owner) = owners.get(&name) {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0202TypeNameCollision,
                    format!(
                        "field {:?} generates {name} which collides with {owner}",
                        field.name
                    ),
                )
                .into());
            }
            owners.insert(name, format!("field {:?}", field.name));
        }
    }
    Ok(())
}

fn value_names(field: &Field) -> Vec<String> {
    let mut names = vec![variant::param_name(field)];
    if matches!(field.ty.leaf(), FieldType::Enum(_)) {
        let helpers = variant::enum_helper_names(field);
        names.extend([helpers.values, helpers.name_fn, helpers.code_fn]);
    }
    names
}

fn header_items(schema: &Schema, opts: &GenOptions, needs: &Needs) -> Vec<RsItem> {
    let mut header = format!(
        "Code generated by {} from schema `{}`. DO NOT EDIT.",
        colgen_contracts::GENERATED_BY,
        schema.table
    );
    if let Some(sha) = &schema.source_sha256 {
        header.push_str(&format!("\nsource sha256: {sha}"));
    }

    let mut items = vec![RsItem::Comment(header), RsItem::Blank];
    for module in needs.modules() {
        items.push(RsItem::Use(format!("{}::{module}", opts.runtime_crate)));
    }
    items.push(RsItem::Blank);
    if needs.contains(Need::Time) {
        items.push(RsItem::Const {
            public: false,
            name: testing::REFERENCE_TIMEZONE_CONST.to_string(),
            ty: "&str".to_string(),
            value: RsExpr::string(opts.reference_timezone.clone()),
        });
        items.push(RsItem::Blank);
    }
    items
}

/// Per field: alias, then helper declarations, each followed by a blank line.
fn type_items(schema: &Schema, opts: &GenOptions) -> Vec<RsItem> {
    let mut items = Vec::new();
    for field in &schema.fields {
        items.push(RsItem::TypeAlias {
            name: variant::type_name(field, opts),
            ty: variant::native_type_name(&field.ty),
        });
        items.push(RsItem::Blank);
        for helper in variant::helper(field, &field.ty) {
            items.push(helper);
        }
        if !matches!(items.last(), Some(RsItem::Blank)) {
            items.push(RsItem::Blank);
        }
    }
    items
}

fn field_params(schema: &Schema, opts: &GenOptions) -> Vec<RsParam> {
    schema
        .fields
        .iter()
        .map(|field| RsParam {
            name: variant::param_name(field),
            ty: format!("&{}", variant::type_name(field, opts)),
        })
        .collect()
}

fn arg_attrs(n_params: usize) -> Vec<String> {
    if n_params > MAX_ARGS_WITHOUT_ALLOW {
        vec!["allow(clippy::too_many_arguments)".to_string()]
    } else {
        Vec::new()
    }
}

fn encoder_items(schema: &Schema, opts: &GenOptions, needs: &mut Needs) -> Vec<RsItem> {
    let name = encoder_name(schema);
    let params = field_params(schema, opts);
    needs.mark(Need::Wire);

    let mut body = vec![RsStmt::Semi(RsExpr::method(
        RsExpr::path("self.writer"),
        "begin_row",
        vec![],
    ))];
    for field in &schema.fields {
        body.extend(encoding::field_encoding(
            field,
            &variant::param_name(field),
            needs,
        ));
    }
    body.push(RsStmt::Semi(RsExpr::try_(RsExpr::method(
        RsExpr::path("self.writer"),
        "finish_row",
        vec![],
    ))));
    body.push(RsStmt::Tail(RsExpr::call("Ok", vec![RsExpr::path("()")])));

    let new_fn = RsFn {
        doc: Vec::new(),
        attrs: Vec::new(),
        public: true,
        name: "new".to_string(),
        receiver: None,
        params: vec![RsParam {
            name: "sink".to_string(),
            ty: "W".to_string(),
        }],
        ret: Some("Self".to_string()),
        body: vec![RsStmt::Tail(RsExpr::StructLit {
            path: "Self".to_string(),
            fields: vec![(
                "writer".to_string(),
                RsExpr::call("wire::RowWriter::new", vec![RsExpr::path("sink")]),
            )],
        })],
    };
    let into_inner = RsFn {
        doc: Vec::new(),
        attrs: Vec::new(),
        public: true,
        name: "into_inner".to_string(),
        receiver: Some(Receiver::Value),
        params: Vec::new(),
        ret: Some("W".to_string()),
        body: vec![RsStmt::Tail(RsExpr::method(
            RsExpr::path("self.writer"),
            "into_inner",
            vec![],
        ))],
    };
    let encode = RsFn {
        doc: vec![
            "Appends one row in wire format. A row that fails validation leaves the"
                .to_string(),
            "sink untouched.".to_string(),
        ],
        attrs: arg_attrs(params.len() + 1),
        public: true,
        name: "encode".to_string(),
        receiver: Some(Receiver::RefMut),
        params,
        ret: Some("Result<(), wire::EncodeError>".to_string()),
        body,
    };

    vec![
        RsItem::Struct(RsStruct {
            doc: vec![format!("Row encoder for table `{}`.", schema.table)],
            derives: Vec::new(),
            name: format!("{name}<W: std::io::Write>"),
            fields: vec![RsStructField {
                public: false,
                name: "writer".to_string(),
                ty: "wire::RowWriter<W>".to_string(),
            }],
        }),
        RsItem::Blank,
        RsItem::Impl(RsImpl {
            generics: Some("W: std::io::Write".to_string()),
            target: format!("{name}<W>"),
            fns: vec![new_fn, into_inner, encode],
        }),
    ]
}

fn test_encoder_items(schema: &Schema, opts: &GenOptions, needs: &mut Needs) -> Vec<RsItem> {
    let name = test_encoder_name(schema);
    let params = field_params(schema, opts);
    needs.mark(Need::Oracle);

    let values: Vec<RsExpr> = schema
        .fields
        .iter()
        .map(|field| testing::field_test_encoding(field, &variant::param_name(field), needs))
        .collect();
    let args: Vec<RsExpr> = params.iter().map(|p| RsExpr::path(p.name.clone())).collect();

    let new_fn = RsFn {
        doc: Vec::new(),
        attrs: Vec::new(),
        public: true,
        name: "new".to_string(),
        receiver: None,
        params: Vec::new(),
        ret: Some("Self".to_string()),
        body: vec![RsStmt::Tail(RsExpr::call("Self::default", vec![]))],
    };
    let encode = RsFn {
        doc: vec!["Records the oracle values of one row.".to_string()],
        attrs: arg_attrs(params.len() + 1),
        public: true,
        name: "encode".to_string(),
        receiver: Some(Receiver::RefMut),
        params: params.clone(),
        ret: None,
        body: vec![RsStmt::Semi(RsExpr::method(
            RsExpr::path("self.rows"),
            "push",
            vec![RsExpr::call("Self::row", args)],
        ))],
    };
    let row = RsFn {
        doc: Vec::new(),
        attrs: arg_attrs(params.len()),
        public: true,
        name: "row".to_string(),
        receiver: None,
        params,
        ret: Some("Vec<oracle::Value>".to_string()),
        body: vec![RsStmt::Tail(RsExpr::Macro {
            name: "vec".to_string(),
            args: values,
        })],
    };

    vec![
        RsItem::Struct(RsStruct {
            doc: vec![format!("Test oracle for table `{}`.", schema.table)],
            derives: vec!["Debug".to_string(), "Default".to_string()],
            name: name.clone(),
            fields: vec![RsStructField {
                public: true,
                name: "rows".to_string(),
                ty: "Vec<Vec<oracle::Value>>".to_string(),
            }],
        }),
        RsItem::Blank,
        RsItem::Impl(RsImpl {
            generics: None,
            target: name,
            fns: vec![new_fn, encode, row],
        }),
    ]
}
