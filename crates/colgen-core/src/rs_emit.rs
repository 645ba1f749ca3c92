use std::io::Write;

use anyhow::{Context, Result};

use crate::rsir::{Receiver, RsExpr, RsFn, RsImpl, RsItem, RsModule, RsPat, RsStmt, RsStruct};

const INDENT: &str = "    ";

pub fn emit_module(m: &RsModule) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();
    write_module(&mut out, m)?;
    String::from_utf8(out).context("generated module is not UTF-8")
}

/// Prints `m` item by item; a failed write aborts the run.
pub fn write_module<W: Write>(out: &mut W, m: &RsModule) -> Result<()> {
    for item in &m.items {
        let mut text = String::new();
        item_text(&mut text, item);
        out.write_all(text.as_bytes())
            .context("write generated module")?;
    }
    out.flush().context("flush generated module")?;
    Ok(())
}

pub fn rust_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn pad(level: usize) -> String {
    INDENT.repeat(level)
}

fn item_text(out: &mut String, item: &RsItem) {
    match item {
        RsItem::Comment(text) => {
            for line in text.lines() {
                if line.is_empty() {
                    out.push_str("//\n");
                } else {
                    out.push_str(&format!("// {line}\n"));
                }
            }
        }
        RsItem::Use(path) => out.push_str(&format!("use {path};\n")),
        RsItem::Const {
            public,
            name,
            ty,
            value,
        } => {
            let vis = if *public { "pub " } else { "" };
            out.push_str(&format!("{vis}const {name}: {ty} = {};\n", expr(value, 0)));
        }
        RsItem::TypeAlias { name, ty } => out.push_str(&format!("pub type {name} = {ty};\n")),
        RsItem::Fn(f) => fn_text(out, f, 0),
        RsItem::Struct(s) => struct_text(out, s),
        RsItem::Impl(imp) => impl_text(out, imp),
        RsItem::Blank => out.push('\n'),
    }
}

fn struct_text(out: &mut String, s: &RsStruct) {
    for line in &s.doc {
        out.push_str(&format!("/// {line}\n"));
    }
    if !s.derives.is_empty() {
        out.push_str(&format!("#[derive({})]\n", s.derives.join(", ")));
    }
    out.push_str(&format!("pub struct {} {{\n", s.name));
    for f in &s.fields {
        let vis = if f.public { "pub " } else { "" };
        out.push_str(&format!("{INDENT}{vis}{}: {},\n", f.name, f.ty));
    }
    out.push_str("}\n");
}

fn impl_text(out: &mut String, imp: &RsImpl) {
    match &imp.generics {
        Some(g) => out.push_str(&format!("impl<{g}> {} {{\n", imp.target)),
        None => out.push_str(&format!("impl {} {{\n", imp.target)),
    }
    for (idx, f) in imp.fns.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        fn_text(out, f, 1);
    }
    out.push_str("}\n");
}

fn fn_text(out: &mut String, f: &RsFn, level: usize) {
    let p = pad(level);
    for line in &f.doc {
        out.push_str(&format!("{p}/// {line}\n"));
    }
    for attr in &f.attrs {
        out.push_str(&format!("{p}#[{attr}]\n"));
    }
    let mut params: Vec<String> = Vec::with_capacity(f.params.len() + 1);
    if let Some(recv) = f.receiver {
        params.push(
            match recv {
                Receiver::Value => "self",
                Receiver::RefMut => "&mut self",
            }
            .to_string(),
        );
    }
    params.extend(f.params.iter().map(|p| format!("{}: {}", p.name, p.ty)));
    let vis = if f.public { "pub " } else { "" };
    let ret = match &f.ret {
        Some(ty) => format!(" -> {ty}"),
        None => String::new(),
    };
    if f.body.is_empty() {
        out.push_str(&format!("{p}{vis}fn {}({}){ret} {{}}\n", f.name, params.join(", ")));
        return;
    }
    out.push_str(&format!("{p}{vis}fn {}({}){ret} {{\n", f.name, params.join(", ")));
    block_text(out, &f.body, level + 1);
    out.push_str(&format!("{p}}}\n"));
}

fn block_text(out: &mut String, body: &[RsStmt], level: usize) {
    for s in body {
        stmt_text(out, s, level);
    }
}

fn stmt_text(out: &mut String, s: &RsStmt, level: usize) {
    let p = pad(level);
    match s {
        RsStmt::Semi(e) => out.push_str(&format!("{p}{};\n", expr(e, level))),
        RsStmt::Return(e) => out.push_str(&format!("{p}return {};\n", expr(e, level))),
        RsStmt::Tail(e) => out.push_str(&format!("{p}{}\n", expr(e, level))),
        RsStmt::If { cond, then_body } => {
            out.push_str(&format!("{p}if {} {{\n", expr(cond, level)));
            block_text(out, then_body, level + 1);
            out.push_str(&format!("{p}}}\n"));
        }
        RsStmt::For { var, iter, body } => {
            out.push_str(&format!("{p}for {var} in {} {{\n", expr(iter, level)));
            block_text(out, body, level + 1);
            out.push_str(&format!("{p}}}\n"));
        }
        RsStmt::Match { scrutinee, arms } => {
            out.push_str(&format!("{p}match {} {{\n", expr(scrutinee, level)));
            let ap = pad(level + 1);
            for (pat, body) in arms {
                out.push_str(&format!("{ap}{} => {{\n", pat_text(pat)));
                block_text(out, body, level + 2);
                out.push_str(&format!("{ap}}}\n"));
            }
            out.push_str(&format!("{p}}}\n"));
        }
    }
}

fn pat_text(p: &RsPat) -> String {
    match p {
        RsPat::Raw(s) => s.clone(),
        RsPat::Int(i) => i.to_string(),
        RsPat::Str(s) => rust_string_literal(s),
    }
}

// Binding strength; an operand printed where a stronger form is required gets parentheses.
fn prec(e: &RsExpr) -> u8 {
    match e {
        RsExpr::Closure { .. } | RsExpr::Match { .. } => 0,
        RsExpr::Binary { .. } => 1,
        RsExpr::Cast { .. } => 2,
        RsExpr::Deref(_) => 3,
        _ => 4,
    }
}

fn operand(e: &RsExpr, min: u8, level: usize) -> String {
    let s = expr(e, level);
    if prec(e) < min {
        format!("({s})")
    } else {
        s
    }
}

fn args_text(args: &[RsExpr], level: usize) -> String {
    args.iter()
        .map(|a| expr(a, level))
        .collect::<Vec<_>>()
        .join(", ")
}

// Multi-line `open ... close` list with one element per line.
fn list_text(open: &str, close: &str, items: &[RsExpr], level: usize) -> String {
    if items.is_empty() {
        return format!("{open}{close}");
    }
    let ip = pad(level + 1);
    let mut s = format!("{open}\n");
    for item in items {
        s.push_str(&format!("{ip}{},\n", expr(item, level + 1)));
    }
    s.push_str(&format!("{}{close}", pad(level)));
    s
}

/// Renders `e` as it would appear on a line indented `level` deep.
pub fn expr(e: &RsExpr, level: usize) -> String {
    match e {
        RsExpr::Path(p) => p.clone(),
        RsExpr::Int(i) => i.to_string(),
        RsExpr::Str(s) => rust_string_literal(s),
        RsExpr::Deref(inner) => format!("*{}", operand(inner, 3, level)),
        RsExpr::Cast { expr: inner, ty } => format!("{} as {ty}", operand(inner, 2, level)),
        RsExpr::Binary { op, lhs, rhs } => format!(
            "{} {} {}",
            operand(lhs, 2, level),
            op.as_str(),
            operand(rhs, 2, level)
        ),
        RsExpr::Call { func, args } => format!("{func}({})", args_text(args, level)),
        RsExpr::MethodCall { recv, method, args } => format!(
            "{}.{method}({})",
            operand(recv, 4, level),
            args_text(args, level)
        ),
        RsExpr::Try(inner) => format!("{}?", operand(inner, 4, level)),
        RsExpr::Macro { name, args } => {
            if name == "vec" {
                format!("vec!{}", list_text("[", "]", args, level))
            } else {
                format!("{name}!({})", args_text(args, level))
            }
        }
        RsExpr::Closure { param, body } => format!("|{param}| {}", expr(body, level)),
        RsExpr::Match { scrutinee, arms } => {
            let ap = pad(level + 1);
            let mut s = format!("match {} {{\n", expr(scrutinee, level));
            for (pat, body) in arms {
                s.push_str(&format!("{ap}{} => {},\n", pat_text(pat), expr(body, level + 1)));
            }
            s.push_str(&format!("{}}}", pad(level)));
            s
        }
        RsExpr::Tuple(items) => format!("({})", args_text(items, level)),
        RsExpr::SliceRef(items) => format!("&{}", list_text("[", "]", items, level)),
        RsExpr::StructLit { path, fields } => {
            let fs: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("{name}: {}", expr(value, level)))
                .collect();
            format!("{path} {{ {} }}", fs.join(", "))
        }
    }
}
