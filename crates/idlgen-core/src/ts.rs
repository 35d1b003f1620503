//! Tree model of the emitted TypeScript. The lowering stage builds these
//! nodes; `ts_emit` renders them to text. Keeping the two apart means the
//! type algebra never concatenates source strings, and identity detection
//! (see `lower`) is structural equality on expressions instead of string
//! comparison.

/// A type expression, as used in interfaces, aliases and annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    Name(String),
    StrLit(String),
    Generic(String, Vec<TsType>),
    Union(Vec<TsType>),
    Tuple(Vec<TsType>),
    Object(Vec<(String, TsType)>),
}

impl TsType {
    pub fn name(n: impl Into<String>) -> TsType {
        TsType::Name(n.into())
    }

    pub fn array_of(inner: TsType) -> TsType {
        TsType::Generic("Array".to_string(), vec![inner])
    }

    pub fn promise_of(inner: TsType) -> TsType {
        TsType::Generic("Promise".to_string(), vec![inner])
    }

    pub fn nullable(inner: TsType) -> TsType {
        TsType::Union(vec![inner, TsType::name("null")])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsProp {
    KeyValue(String, TsExpr),
    Spread(TsExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrowBody {
    Expr(Box<TsExpr>),
    Block(Vec<TsStmt>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsExpr {
    Ident(String),
    Str(String),
    Num(String),
    Bool(bool),
    Null,
    Undefined,
    Array(Vec<TsExpr>),
    Object(Vec<TsProp>),
    Prop(Box<TsExpr>, String),
    Index(Box<TsExpr>, Box<TsExpr>),
    Call(Box<TsExpr>, Vec<TsExpr>),
    New(Box<TsExpr>, Vec<TsExpr>),
    Arrow(Vec<String>, ArrowBody),
    Binary(&'static str, Box<TsExpr>, Box<TsExpr>),
    Not(Box<TsExpr>),
    Paren(Box<TsExpr>),
    Await(Box<TsExpr>),
    /// Verbatim source, for the rare token the tree does not model
    /// (e.g. regex literals).
    Raw(String),
}

impl TsExpr {
    pub fn ident(name: impl Into<String>) -> TsExpr {
        TsExpr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> TsExpr {
        TsExpr::Str(value.into())
    }

    pub fn num(value: impl ToString) -> TsExpr {
        TsExpr::Num(value.to_string())
    }

    /// Splits a dotted path (`types.BarStruct.layout`) into property access.
    pub fn path(dotted: &str) -> TsExpr {
        let mut parts = dotted.split('.');
        let mut expr = TsExpr::ident(parts.next().unwrap_or_default());
        for part in parts {
            expr = TsExpr::Prop(Box::new(expr), part.to_string());
        }
        expr
    }

    pub fn prop(self, name: impl Into<String>) -> TsExpr {
        TsExpr::Prop(Box::new(self), name.into())
    }

    pub fn index(self, idx: TsExpr) -> TsExpr {
        TsExpr::Index(Box::new(self), Box::new(idx))
    }

    pub fn index_str(self, key: impl Into<String>) -> TsExpr {
        self.index(TsExpr::Str(key.into()))
    }

    pub fn call(self, args: Vec<TsExpr>) -> TsExpr {
        TsExpr::Call(Box::new(self), args)
    }

    pub fn method(self, name: impl Into<String>, args: Vec<TsExpr>) -> TsExpr {
        self.prop(name).call(args)
    }

    pub fn paren(self) -> TsExpr {
        TsExpr::Paren(Box::new(self))
    }

    pub fn and(self, rhs: TsExpr) -> TsExpr {
        TsExpr::Binary("&&", Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: TsExpr) -> TsExpr {
        TsExpr::Binary("||", Box::new(self), Box::new(rhs))
    }

    pub fn arrow(param: &str, body: TsExpr) -> TsExpr {
        TsExpr::Arrow(vec![param.to_string()], ArrowBody::Expr(Box::new(body)))
    }

    pub fn new_(callee: TsExpr, args: Vec<TsExpr>) -> TsExpr {
        TsExpr::New(Box::new(callee), args)
    }

    pub fn throw_error(message: &str) -> TsStmt {
        TsStmt::Throw(TsExpr::new_(
            TsExpr::ident("Error"),
            vec![TsExpr::str(message)],
        ))
    }

    /// Byte-array literal, rendered as a plain number sequence.
    pub fn byte_array(bytes: &[u8]) -> TsExpr {
        TsExpr::Array(bytes.iter().map(|b| TsExpr::num(b)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsStmt {
    Const(String, TsExpr),
    Let(String, Option<TsType>, Option<TsExpr>),
    Assign(TsExpr, TsExpr),
    Expr(TsExpr),
    Return(Option<TsExpr>),
    If {
        cond: TsExpr,
        then_body: Vec<TsStmt>,
        else_body: Vec<TsStmt>,
    },
    Switch {
        scrutinee: TsExpr,
        cases: Vec<(TsExpr, Vec<TsStmt>)>,
    },
    ForOf {
        var: String,
        iter: TsExpr,
        body: Vec<TsStmt>,
    },
    Break,
    Throw(TsExpr),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsParam {
    pub name: String,
    pub ty: Option<TsType>,
    pub optional: bool,
}

impl TsParam {
    pub fn new(name: impl Into<String>, ty: TsType) -> TsParam {
        TsParam {
            name: name.into(),
            ty: Some(ty),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TsType) -> TsParam {
        TsParam {
            name: name.into(),
            ty: Some(ty),
            optional: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassMember {
    Property {
        is_static: bool,
        is_readonly: bool,
        name: String,
        ty: Option<TsType>,
        init: Option<TsExpr>,
    },
    Ctor {
        params: Vec<TsParam>,
        body: Vec<TsStmt>,
    },
    Method {
        is_static: bool,
        is_async: bool,
        name: String,
        params: Vec<TsParam>,
        ret: Option<TsType>,
        body: Vec<TsStmt>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsItem {
    Import {
        names: Vec<String>,
        namespace: Option<String>,
        default: Option<String>,
        module: String,
    },
    ExportFrom {
        names: Vec<String>,
        module: String,
    },
    ExportNames(Vec<String>),
    Interface {
        exported: bool,
        name: String,
        props: Vec<(String, TsType)>,
    },
    TypeAlias {
        exported: bool,
        name: String,
        ty: TsType,
    },
    Const {
        exported: bool,
        name: String,
        ty: Option<TsType>,
        init: TsExpr,
    },
    Class {
        exported: bool,
        name: String,
        extends: Option<String>,
        members: Vec<ClassMember>,
    },
    Function {
        exported: bool,
        name: String,
        params: Vec<TsParam>,
        ret: Option<TsType>,
        body: Vec<TsStmt>,
    },
}

impl TsItem {
    pub fn named_import(names: &[&str], module: &str) -> TsItem {
        TsItem::Import {
            names: names.iter().map(|s| s.to_string()).collect(),
            namespace: None,
            default: None,
            module: module.to_string(),
        }
    }

    pub fn namespace_import(ns: &str, module: &str) -> TsItem {
        TsItem::Import {
            names: Vec::new(),
            namespace: Some(ns.to_string()),
            default: None,
            module: module.to_string(),
        }
    }

    pub fn default_import(name: &str, module: &str) -> TsItem {
        TsItem::Import {
            names: Vec::new(),
            namespace: None,
            default: Some(name.to_string()),
            module: module.to_string(),
        }
    }
}

/// One generated file: a relative output path plus its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: String,
    pub items: Vec<TsItem>,
}
