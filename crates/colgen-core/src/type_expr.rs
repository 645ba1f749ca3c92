//! Parser for column type expressions such as `Array(Nullable(Decimal(18, 4)))`.

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::schema::{EnumMapping, EnumWidth, FieldType};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Int(i64),
    Str(String),
    LParen,
    RParen,
    Comma,
    Eq,
}

#[derive(Debug)]
struct Node {
    name: String,
    args: Option<Vec<Arg>>,
}

#[derive(Debug)]
enum Arg {
    Type(Node),
    Int(i64),
    Str(String),
    Pair(String, i64),
}

pub fn parse_type(src: &str) -> Result<FieldType, Diagnostic> {
    let toks = tokenize(src)?;
    let mut p = Parser {
        src,
        toks,
        idx: 0,
    };
    let node = p.node()?;
    if let Some((pos, tok)) = p.toks.get(p.idx) {
        return Err(p.syntax(*pos, format!("unexpected {tok:?} after type")));
    }
    lower(&node)
}

fn syntax_error(src: &str, pos: usize, msg: impl AsRef<str>) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::CG0100TypeSyntax,
        format!("{} at offset {pos} in {src:?}", msg.as_ref()),
    )
}

fn tokenize(src: &str) -> Result<Vec<(usize, Tok)>, Diagnostic> {
    let mut out = Vec::new();
    let mut chars = src.char_indices().peekable();
    while let Some(&(pos, c)) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' | '=' => {
                chars.next();
                let tok = match c {
                    '(' => Tok::LParen,
                    ')' => Tok::RParen,
                    ',' => Tok::Comma,
                    _ => Tok::Eq,
                };
                out.push((pos, tok));
            }
            '\'' => {
                chars.next();
                let mut s = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some((_, esc)) => s.push(esc),
                            None => break,
                        },
                        '\'' => {
                            closed = true;
                            break;
                        }
                        _ => s.push(c),
                    }
                }
                if !closed {
                    return Err(syntax_error(src, pos, "unterminated string"));
                }
                out.push((pos, Tok::Str(s)));
            }
            '-' | '0'..='9' => {
                let mut text = String::new();
                text.push(c);
                chars.next();
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    text.push(d);
                    chars.next();
                }
                let n: i64 = text
                    .parse()
                    .map_err(|_| syntax_error(src, pos, format!("bad integer {text:?}")))?;
                out.push((pos, Tok::Int(n)));
            }
            _ if c == '_' || c.is_ascii_alphabetic() => {
                let mut text = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !(d == '_' || d.is_ascii_alphanumeric()) {
                        break;
                    }
                    text.push(d);
                    chars.next();
                }
                out.push((pos, Tok::Ident(text)));
            }
            _ => return Err(syntax_error(src, pos, format!("unexpected character {c:?}"))),
        }
    }
    Ok(out)
}

struct Parser<'a> {
    src: &'a str,
    toks: Vec<(usize, Tok)>,
    idx: usize,
}

impl Parser<'_> {
    fn syntax(&self, pos: usize, msg: impl AsRef<str>) -> Diagnostic {
        syntax_error(self.src, pos, msg)
    }

    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.idx).map(|(_, t)| t)
    }

    fn pos(&self) -> usize {
        self.toks
            .get(self.idx)
            .map(|(pos, _)| *pos)
            .unwrap_or(self.src.len())
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.idx).map(|(_, t)| t.clone());
        if tok.is_some() {
            self.idx += 1;
        }
        tok
    }

    fn expect(&mut self, want: Tok) -> Result<(), Diagnostic> {
        let pos = self.pos();
        match self.bump() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(self.syntax(pos, format!("expected {want:?}, got {tok:?}"))),
            None => Err(self.syntax(pos, format!("expected {want:?}, got end of input"))),
        }
    }

    fn node(&mut self) -> Result<Node, Diagnostic> {
        let pos = self.pos();
        let name = match self.bump() {
            Some(Tok::Ident(name)) => name,
            Some(tok) => return Err(self.syntax(pos, format!("expected type name, got {tok:?}"))),
            None => return Err(self.syntax(pos, "expected type name")),
        };
        if self.peek() != Some(&Tok::LParen) {
            return Ok(Node { name, args: None });
        }
        self.bump();

        let mut args = Vec::new();
        if self.peek() == Some(&Tok::RParen) {
            self.bump();
            return Ok(Node {
                name,
                args: Some(args),
            });
        }
        loop {
            args.push(self.arg()?);
            let pos = self.pos();
            match self.bump() {
                Some(Tok::Comma) => continue,
                Some(Tok::RParen) => break,
                Some(tok) => {
                    return Err(self.syntax(pos, format!("expected ',' or ')', got {tok:?}")))
                }
                None => return Err(self.syntax(pos, "unclosed '('")),
            }
        }
        Ok(Node {
            name,
            args: Some(args),
        })
    }

    fn arg(&mut self) -> Result<Arg, Diagnostic> {
        match self.peek() {
            Some(Tok::Ident(_)) => Ok(Arg::Type(self.node()?)),
            Some(Tok::Int(n)) => {
                let n = *n;
                self.bump();
                Ok(Arg::Int(n))
            }
            Some(Tok::Str(s)) => {
                let s = s.clone();
                self.bump();
                if self.peek() != Some(&Tok::Eq) {
                    return Ok(Arg::Str(s));
                }
                self.expect(Tok::Eq)?;
                let pos = self.pos();
                match self.bump() {
                    Some(Tok::Int(code)) => Ok(Arg::Pair(s, code)),
                    _ => Err(self.syntax(pos, format!("expected integer code for {s:?}"))),
                }
            }
            _ => Err(self.syntax(self.pos(), "expected type argument")),
        }
    }
}

fn bad_args(node: &Node, want: &str) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::CG0102BadTypeArgs,
        format!("{} expects {want}", node.name),
    )
}

fn no_args(node: &Node, ty: FieldType) -> Result<FieldType, Diagnostic> {
    match &node.args {
        None => Ok(ty),
        Some(_) => Err(bad_args(node, "no arguments")),
    }
}

fn int_args(node: &Node, n: usize) -> Result<Vec<i64>, Diagnostic> {
    let want = if n == 1 {
        "one integer argument".to_string()
    } else {
        format!("{n} integer arguments")
    };
    let Some(args) = &node.args else {
        return Err(bad_args(node, &want));
    };
    if args.len() != n {
        return Err(bad_args(node, &want));
    }
    args.iter()
        .map(|a| match a {
            Arg::Int(x) => Ok(*x),
            _ => Err(bad_args(node, &want)),
        })
        .collect()
}

fn inner_arg(node: &Node) -> Result<FieldType, Diagnostic> {
    match node.args.as_deref() {
        Some([Arg::Type(inner)]) => lower(inner),
        _ => Err(bad_args(node, "exactly one type argument")),
    }
}

fn decimal_scale(node: &Node, scale: i64, max: u32) -> Result<u32, Diagnostic> {
    if scale < 0 || scale > i64::from(max) {
        return Err(Diagnostic::error(
            DiagnosticCode::CG0111DecimalScale,
            format!("{} scale {scale} is outside 0..={max}", node.name),
        ));
    }
    Ok(scale as u32)
}

fn lower(node: &Node) -> Result<FieldType, Diagnostic> {
    match node.name.as_str() {
        "Int8" => no_args(node, FieldType::Int8),
        "Int16" => no_args(node, FieldType::Int16),
        "Int32" => no_args(node, FieldType::Int32),
        "Int64" => no_args(node, FieldType::Int64),
        "UInt8" => no_args(node, FieldType::UInt8),
        "UInt16" => no_args(node, FieldType::UInt16),
        "UInt32" => no_args(node, FieldType::UInt32),
        "UInt64" => no_args(node, FieldType::UInt64),
        "Float32" => no_args(node, FieldType::Float32),
        "Float64" => no_args(node, FieldType::Float64),
        "Date" => no_args(node, FieldType::Date),
        "String" => no_args(node, FieldType::String),
        "UUID" => no_args(node, FieldType::Uuid),
        "DateTime" => match node.args.as_deref() {
            None => Ok(FieldType::DateTime),
            // The zone is column metadata; only its name is checked.
            Some([Arg::Str(zone)]) => match zone.parse::<chrono_tz::Tz>() {
                Ok(_) => Ok(FieldType::DateTime),
                Err(_) => Err(Diagnostic::error(
                    DiagnosticCode::CG0300UnknownTimezone,
                    format!("DateTime column zone {zone:?}"),
                )),
            },
            _ => Err(bad_args(node, "no arguments or a quoted timezone")),
        },
        "Decimal32" => {
            let scale = decimal_scale(node, int_args(node, 1)?[0], 9)?;
            Ok(FieldType::Decimal32 { scale })
        }
        "Decimal64" => {
            let scale = decimal_scale(node, int_args(node, 1)?[0], 18)?;
            Ok(FieldType::Decimal64 { scale })
        }
        "Decimal128" => {
            let scale = decimal_scale(node, int_args(node, 1)?[0], 38)?;
            Ok(FieldType::Decimal128 { scale })
        }
        "Decimal" => {
            let args = int_args(node, 2)?;
            let (precision, scale) = (args[0], args[1]);
            if !(1..=38).contains(&precision) {
                return Err(bad_args(node, "a precision in 1..=38"));
            }
            let scale = decimal_scale(node, scale, precision as u32)?;
            Ok(match precision {
                1..=9 => FieldType::Decimal32 { scale },
                10..=18 => FieldType::Decimal64 { scale },
                _ => FieldType::Decimal128 { scale },
            })
        }
        "FixedString" => {
            let length = int_args(node, 1)?[0];
            if length <= 0 {
                return Err(Diagnostic::error(
                    DiagnosticCode::CG0110FixedStringLength,
                    format!("FixedString({length})"),
                ));
            }
            Ok(FieldType::FixedString {
                length: length as usize,
            })
        }
        "Enum8" | "Enum16" => {
            let width = if node.name == "Enum8" {
                EnumWidth::Enum8
            } else {
                EnumWidth::Enum16
            };
            let args = node.args.as_deref().unwrap_or(&[]);
            let mut pairs = Vec::with_capacity(args.len());
            for arg in args {
                match arg {
                    Arg::Pair(name, code) => pairs.push((name.clone(), *code)),
                    _ => return Err(bad_args(node, "'name' = code pairs")),
                }
            }
            Ok(FieldType::Enum(EnumMapping::new(width, pairs)?))
        }
        "Array" => Ok(FieldType::Array(Box::new(inner_arg(node)?))),
        "Nullable" => Ok(FieldType::Nullable(Box::new(inner_arg(node)?))),
        other => Err(Diagnostic::error(
            DiagnosticCode::CG0101UnknownType,
            format!("unknown type {other:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(src: &str) -> DiagnosticCode {
        parse_type(src).expect_err(src).code
    }

    #[test]
    fn parses_scalars_and_composites() {
        assert_eq!(parse_type("UInt32").unwrap(), FieldType::UInt32);
        assert_eq!(
            parse_type(" Array( Nullable(String) ) ").unwrap(),
            FieldType::Array(Box::new(FieldType::Nullable(Box::new(FieldType::String))))
        );
        assert_eq!(
            parse_type("Nullable(Array(UInt8))").unwrap(),
            FieldType::Nullable(Box::new(FieldType::Array(Box::new(FieldType::UInt8))))
        );
        assert_eq!(
            parse_type("FixedString(16)").unwrap(),
            FieldType::FixedString { length: 16 }
        );
        assert_eq!(
            parse_type("DateTime('Europe/Moscow')").unwrap(),
            FieldType::DateTime
        );
    }

    #[test]
    fn datetime_zone_must_be_known() {
        assert_eq!(parse_type("DateTime('UTC')").unwrap(), FieldType::DateTime);
        assert_eq!(
            code_of("DateTime('Nowhere/Atlantis')"),
            DiagnosticCode::CG0300UnknownTimezone
        );
        assert_eq!(code_of("DateTime(3)"), DiagnosticCode::CG0102BadTypeArgs);
    }

    #[test]
    fn decimal_precision_selects_width() {
        assert_eq!(
            parse_type("Decimal(9, 2)").unwrap(),
            FieldType::Decimal32 { scale: 2 }
        );
        assert_eq!(
            parse_type("Decimal(18,4)").unwrap(),
            FieldType::Decimal64 { scale: 4 }
        );
        assert_eq!(
            parse_type("Decimal(38, 10)").unwrap(),
            FieldType::Decimal128 { scale: 10 }
        );
        assert_eq!(code_of("Decimal(4, 5)"), DiagnosticCode::CG0111DecimalScale);
        assert_eq!(code_of("Decimal32(10)"), DiagnosticCode::CG0111DecimalScale);
        assert_eq!(code_of("Decimal(39, 0)"), DiagnosticCode::CG0102BadTypeArgs);
    }

    #[test]
    fn parses_enum_with_escapes_and_negative_codes() {
        let ty = parse_type(r"Enum8('a' = -1, 'it\'s' = 5)").unwrap();
        let FieldType::Enum(m) = &ty else {
            panic!("expected enum, got {ty:?}");
        };
        assert_eq!(m.width(), EnumWidth::Enum8);
        assert_eq!(m.name_of(-1), Some("a"));
        assert_eq!(m.name_of(5), Some("it's"));
    }

    #[test]
    fn display_output_parses_back() {
        for src in [
            "Array(Array(Nullable(Int64)))",
            "Enum16('x' = 300, 'y' = -300)",
            "Nullable(Decimal128(20))",
            "FixedString(3)",
        ] {
            let ty = parse_type(src).unwrap();
            assert_eq!(parse_type(&ty.to_string()).unwrap(), ty, "{src}");
        }
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(code_of("Array(String"), DiagnosticCode::CG0100TypeSyntax);
        assert_eq!(code_of("String)"), DiagnosticCode::CG0100TypeSyntax);
        assert_eq!(code_of("Enum8('a = 1)"), DiagnosticCode::CG0100TypeSyntax);
        assert_eq!(code_of("Text"), DiagnosticCode::CG0101UnknownType);
        assert_eq!(code_of("Array(1)"), DiagnosticCode::CG0102BadTypeArgs);
        assert_eq!(code_of("UInt8(3)"), DiagnosticCode::CG0102BadTypeArgs);
        assert_eq!(code_of("FixedString(0)"), DiagnosticCode::CG0110FixedStringLength);
        assert_eq!(code_of("Enum8()"), DiagnosticCode::CG0120EnumEmpty);
        assert_eq!(code_of("Enum8('a' = 1, 'b')"), DiagnosticCode::CG0102BadTypeArgs);
    }
}
