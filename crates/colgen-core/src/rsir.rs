//! A small Rust syntax tree: the emitters build it, `rs_emit` prints it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Ne,
    Shr,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Ne => "!=",
            BinOp::Shr => ">>",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsPat {
    Raw(String),
    Int(i128),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsExpr {
    /// A path or identifier, printed verbatim (`self.writer`, `oracle::Value::Null`).
    Path(String),
    Int(i128),
    Str(String),
    Deref(Box<RsExpr>),
    Cast {
        expr: Box<RsExpr>,
        ty: String,
    },
    Binary {
        op: BinOp,
        lhs: Box<RsExpr>,
        rhs: Box<RsExpr>,
    },
    Call {
        func: String,
        args: Vec<RsExpr>,
    },
    MethodCall {
        recv: Box<RsExpr>,
        method: String,
        args: Vec<RsExpr>,
    },
    Try(Box<RsExpr>),
    Macro {
        name: String,
        args: Vec<RsExpr>,
    },
    Closure {
        param: String,
        body: Box<RsExpr>,
    },
    Match {
        scrutinee: Box<RsExpr>,
        arms: Vec<(RsPat, RsExpr)>,
    },
    Tuple(Vec<RsExpr>),
    SliceRef(Vec<RsExpr>),
    StructLit {
        path: String,
        fields: Vec<(String, RsExpr)>,
    },
}

impl RsExpr {
    pub fn path(p: impl Into<String>) -> Self {
        RsExpr::Path(p.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        RsExpr::Str(s.into())
    }

    pub fn deref(e: RsExpr) -> Self {
        RsExpr::Deref(Box::new(e))
    }

    pub fn cast(e: RsExpr, ty: impl Into<String>) -> Self {
        RsExpr::Cast {
            expr: Box::new(e),
            ty: ty.into(),
        }
    }

    pub fn binary(op: BinOp, lhs: RsExpr, rhs: RsExpr) -> Self {
        RsExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(func: impl Into<String>, args: Vec<RsExpr>) -> Self {
        RsExpr::Call {
            func: func.into(),
            args,
        }
    }

    pub fn method(recv: RsExpr, method: impl Into<String>, args: Vec<RsExpr>) -> Self {
        RsExpr::MethodCall {
            recv: Box::new(recv),
            method: method.into(),
            args,
        }
    }

    pub fn try_(e: RsExpr) -> Self {
        RsExpr::Try(Box::new(e))
    }

    pub fn closure(param: impl Into<String>, body: RsExpr) -> Self {
        RsExpr::Closure {
            param: param.into(),
            body: Box::new(body),
        }
    }

    pub fn match_(scrutinee: RsExpr, arms: Vec<(RsPat, RsExpr)>) -> Self {
        RsExpr::Match {
            scrutinee: Box::new(scrutinee),
            arms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsStmt {
    Semi(RsExpr),
    Return(RsExpr),
    If {
        cond: RsExpr,
        then_body: Vec<RsStmt>,
    },
    For {
        var: String,
        iter: RsExpr,
        body: Vec<RsStmt>,
    },
    Match {
        scrutinee: RsExpr,
        arms: Vec<(RsPat, Vec<RsStmt>)>,
    },
    Tail(RsExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Value,
    RefMut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsParam {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsFn {
    pub doc: Vec<String>,
    pub attrs: Vec<String>,
    pub public: bool,
    pub name: String,
    pub receiver: Option<Receiver>,
    pub params: Vec<RsParam>,
    pub ret: Option<String>,
    pub body: Vec<RsStmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsStructField {
    pub public: bool,
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsStruct {
    pub doc: Vec<String>,
    pub derives: Vec<String>,
    /// Name including generic parameters, e.g. `EventsEncoder<W: std::io::Write>`.
    pub name: String,
    pub fields: Vec<RsStructField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsImpl {
    pub generics: Option<String>,
    pub target: String,
    pub fns: Vec<RsFn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsItem {
    Comment(String),
    Use(String),
    Const {
        public: bool,
        name: String,
        ty: String,
        value: RsExpr,
    },
    TypeAlias {
        name: String,
        ty: String,
    },
    Fn(RsFn),
    Struct(RsStruct),
    Impl(RsImpl),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RsModule {
    pub items: Vec<RsItem>,
}
