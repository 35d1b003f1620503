//! Renders `ts` trees to TypeScript source text. Expressions render
//! compactly on one line (block-bodied arrows excepted); statements and
//! items own the layout. Consumers that want prettier output can pipe the
//! result through a formatter, the way the original toolchain did.

use crate::ts::{ArrowBody, ClassMember, SourceUnit, TsExpr, TsItem, TsParam, TsProp, TsStmt, TsType};

const INDENT: &str = "  ";

pub fn render_unit(unit: &SourceUnit) -> String {
    let mut out = String::new();
    let mut prev_was_import = false;
    for (i, item) in unit.items.iter().enumerate() {
        let is_import = matches!(item, TsItem::Import { .. });
        if i > 0 && !(prev_was_import && is_import) {
            out.push('\n');
        }
        render_item(&mut out, item, 0);
        prev_was_import = is_import;
    }
    out
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}

fn render_item(out: &mut String, item: &TsItem, indent: usize) {
    match item {
        TsItem::Import {
            names,
            namespace,
            default,
            module,
        } => {
            pad(out, indent);
            out.push_str("import ");
            if let Some(def) = default {
                out.push_str(def);
            } else if let Some(ns) = namespace {
                out.push_str(&format!("* as {ns}"));
            } else {
                out.push_str(&format!("{{ {} }}", names.join(", ")));
            }
            out.push_str(&format!(" from \"{module}\"\n"));
        }
        TsItem::ExportFrom { names, module } => {
            pad(out, indent);
            out.push_str(&format!(
                "export {{ {} }} from \"{module}\"\n",
                names.join(", ")
            ));
        }
        TsItem::ExportNames(names) => {
            pad(out, indent);
            out.push_str(&format!("export {{ {} }}\n", names.join(", ")));
        }
        TsItem::Interface {
            exported,
            name,
            props,
        } => {
            pad(out, indent);
            if *exported {
                out.push_str("export ");
            }
            out.push_str(&format!("interface {name} {{\n"));
            for (prop, ty) in props {
                pad(out, indent + 1);
                out.push_str(&format!("{prop}: {}\n", type_to_string(ty)));
            }
            pad(out, indent);
            out.push_str("}\n");
        }
        TsItem::TypeAlias { exported, name, ty } => {
            pad(out, indent);
            if *exported {
                out.push_str("export ");
            }
            out.push_str(&format!("type {name} = {}\n", type_to_string(ty)));
        }
        TsItem::Const {
            exported,
            name,
            ty,
            init,
        } => {
            pad(out, indent);
            if *exported {
                out.push_str("export ");
            }
            match ty {
                Some(t) => out.push_str(&format!(
                    "const {name}: {} = {}\n",
                    type_to_string(t),
                    expr_to_string(init, indent)
                )),
                None => out.push_str(&format!("const {name} = {}\n", expr_to_string(init, indent))),
            }
        }
        TsItem::Class {
            exported,
            name,
            extends,
            members,
        } => {
            pad(out, indent);
            if *exported {
                out.push_str("export ");
            }
            out.push_str(&format!("class {name}"));
            if let Some(base) = extends {
                out.push_str(&format!(" extends {base}"));
            }
            out.push_str(" {\n");
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                render_member(out, member, indent + 1);
            }
            pad(out, indent);
            out.push_str("}\n");
        }
        TsItem::Function {
            exported,
            name,
            params,
            ret,
            body,
        } => {
            pad(out, indent);
            if *exported {
                out.push_str("export ");
            }
            out.push_str(&format!("function {name}({})", params_to_string(params)));
            if let Some(r) = ret {
                out.push_str(&format!(": {}", type_to_string(r)));
            }
            out.push_str(" {\n");
            render_stmts(out, body, indent + 1);
            pad(out, indent);
            out.push_str("}\n");
        }
    }
}

fn render_member(out: &mut String, member: &ClassMember, indent: usize) {
    match member {
        ClassMember::Property {
            is_static,
            is_readonly,
            name,
            ty,
            init,
        } => {
            pad(out, indent);
            if *is_static {
                out.push_str("static ");
            }
            if *is_readonly {
                out.push_str("readonly ");
            }
            out.push_str(name);
            if let Some(t) = ty {
                out.push_str(&format!(": {}", type_to_string(t)));
            }
            if let Some(e) = init {
                out.push_str(&format!(" = {}", expr_to_string(e, indent)));
            }
            out.push('\n');
        }
        ClassMember::Ctor { params, body } => {
            pad(out, indent);
            out.push_str(&format!("constructor({}) {{\n", params_to_string(params)));
            render_stmts(out, body, indent + 1);
            pad(out, indent);
            out.push_str("}\n");
        }
        ClassMember::Method {
            is_static,
            is_async,
            name,
            params,
            ret,
            body,
        } => {
            pad(out, indent);
            if *is_static {
                out.push_str("static ");
            }
            if *is_async {
                out.push_str("async ");
            }
            out.push_str(&format!("{name}({})", params_to_string(params)));
            if let Some(r) = ret {
                out.push_str(&format!(": {}", type_to_string(r)));
            }
            out.push_str(" {\n");
            render_stmts(out, body, indent + 1);
            pad(out, indent);
            out.push_str("}\n");
        }
    }
}

fn render_stmts(out: &mut String, stmts: &[TsStmt], indent: usize) {
    for stmt in stmts {
        render_stmt(out, stmt, indent);
    }
}

fn render_stmt(out: &mut String, stmt: &TsStmt, indent: usize) {
    match stmt {
        TsStmt::Const(name, init) => {
            pad(out, indent);
            out.push_str(&format!("const {name} = {}\n", expr_to_string(init, indent)));
        }
        TsStmt::Let(name, ty, init) => {
            pad(out, indent);
            out.push_str(&format!("let {name}"));
            if let Some(t) = ty {
                out.push_str(&format!(": {}", type_to_string(t)));
            }
            if let Some(e) = init {
                out.push_str(&format!(" = {}", expr_to_string(e, indent)));
            }
            out.push('\n');
        }
        TsStmt::Assign(target, value) => {
            pad(out, indent);
            out.push_str(&format!(
                "{} = {}\n",
                expr_to_string(target, indent),
                expr_to_string(value, indent)
            ));
        }
        TsStmt::Expr(e) => {
            pad(out, indent);
            out.push_str(&expr_to_string(e, indent));
            out.push('\n');
        }
        TsStmt::Return(e) => {
            pad(out, indent);
            match e {
                Some(e) => out.push_str(&format!("return {}\n", expr_to_string(e, indent))),
                None => out.push_str("return\n"),
            }
        }
        TsStmt::If {
            cond,
            then_body,
            else_body,
        } => {
            pad(out, indent);
            out.push_str(&format!("if ({}) {{\n", expr_to_string(cond, indent)));
            render_stmts(out, then_body, indent + 1);
            pad(out, indent);
            if else_body.is_empty() {
                out.push_str("}\n");
            } else {
                out.push_str("} else {\n");
                render_stmts(out, else_body, indent + 1);
                pad(out, indent);
                out.push_str("}\n");
            }
        }
        TsStmt::Switch { scrutinee, cases } => {
            pad(out, indent);
            out.push_str(&format!("switch ({}) {{\n", expr_to_string(scrutinee, indent)));
            for (value, body) in cases {
                pad(out, indent + 1);
                out.push_str(&format!("case {}: {{\n", expr_to_string(value, indent + 1)));
                render_stmts(out, body, indent + 2);
                pad(out, indent + 1);
                out.push_str("}\n");
            }
            pad(out, indent);
            out.push_str("}\n");
        }
        TsStmt::ForOf { var, iter, body } => {
            pad(out, indent);
            out.push_str(&format!(
                "for (const {var} of {}) {{\n",
                expr_to_string(iter, indent)
            ));
            render_stmts(out, body, indent + 1);
            pad(out, indent);
            out.push_str("}\n");
        }
        TsStmt::Break => {
            pad(out, indent);
            out.push_str("break\n");
        }
        TsStmt::Throw(e) => {
            pad(out, indent);
            out.push_str(&format!("throw {}\n", expr_to_string(e, indent)));
        }
        TsStmt::Blank => out.push('\n'),
    }
}

fn params_to_string(params: &[TsParam]) -> String {
    params
        .iter()
        .map(|p| {
            let opt = if p.optional { "?" } else { "" };
            match &p.ty {
                Some(t) => format!("{}{opt}: {}", p.name, type_to_string(t)),
                None => format!("{}{opt}", p.name),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn type_to_string(ty: &TsType) -> String {
    match ty {
        TsType::Name(n) => n.clone(),
        TsType::StrLit(s) => format!("\"{}\"", escape(s)),
        TsType::Generic(head, args) => {
            let args = args.iter().map(type_to_string).collect::<Vec<_>>();
            format!("{head}<{}>", args.join(", "))
        }
        TsType::Union(parts) => parts
            .iter()
            .map(type_to_string)
            .collect::<Vec<_>>()
            .join(" | "),
        TsType::Tuple(parts) => {
            let parts = parts.iter().map(type_to_string).collect::<Vec<_>>();
            format!("[{}]", parts.join(", "))
        }
        TsType::Object(props) => {
            if props.is_empty() {
                return "{}".to_string();
            }
            let props = props
                .iter()
                .map(|(name, ty)| format!("{name}: {}", type_to_string(ty)))
                .collect::<Vec<_>>();
            format!("{{ {} }}", props.join("; "))
        }
    }
}

pub fn expr_to_string(expr: &TsExpr, indent: usize) -> String {
    match expr {
        TsExpr::Ident(name) => name.clone(),
        TsExpr::Str(s) => format!("\"{}\"", escape(s)),
        TsExpr::Num(n) => n.clone(),
        TsExpr::Bool(b) => b.to_string(),
        TsExpr::Null => "null".to_string(),
        TsExpr::Undefined => "undefined".to_string(),
        TsExpr::Array(items) => {
            let items = items
                .iter()
                .map(|e| expr_to_string(e, indent))
                .collect::<Vec<_>>();
            format!("[{}]", items.join(", "))
        }
        TsExpr::Object(props) => {
            if props.is_empty() {
                return "{}".to_string();
            }
            let props = props
                .iter()
                .map(|p| match p {
                    TsProp::KeyValue(key, value) => {
                        format!("{key}: {}", expr_to_string(value, indent))
                    }
                    TsProp::Spread(e) => format!("...{}", expr_to_string(e, indent)),
                })
                .collect::<Vec<_>>();
            format!("{{ {} }}", props.join(", "))
        }
        TsExpr::Prop(obj, name) => format!("{}.{name}", expr_to_string(obj, indent)),
        TsExpr::Index(obj, idx) => format!(
            "{}[{}]",
            expr_to_string(obj, indent),
            expr_to_string(idx, indent)
        ),
        TsExpr::Call(callee, args) => {
            let args = args
                .iter()
                .map(|e| expr_to_string(e, indent))
                .collect::<Vec<_>>();
            format!("{}({})", expr_to_string(callee, indent), args.join(", "))
        }
        TsExpr::New(callee, args) => {
            let args = args
                .iter()
                .map(|e| expr_to_string(e, indent))
                .collect::<Vec<_>>();
            format!("new {}({})", expr_to_string(callee, indent), args.join(", "))
        }
        TsExpr::Arrow(params, body) => {
            let params = params.join(", ");
            match body {
                ArrowBody::Expr(e) => format!("({params}) => {}", expr_to_string(e, indent)),
                ArrowBody::Block(stmts) => {
                    let mut block = String::new();
                    render_stmts(&mut block, stmts, indent + 1);
                    let mut close = String::new();
                    pad(&mut close, indent);
                    format!("({params}) => {{\n{block}{close}}}")
                }
            }
        }
        TsExpr::Binary(op, lhs, rhs) => format!(
            "{} {op} {}",
            expr_to_string(lhs, indent),
            expr_to_string(rhs, indent)
        ),
        TsExpr::Not(e) => format!("!{}", expr_to_string(e, indent)),
        TsExpr::Paren(e) => format!("({})", expr_to_string(e, indent)),
        TsExpr::Await(e) => format!("await {}", expr_to_string(e, indent)),
        TsExpr::Raw(src) => src.clone(),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_expressions() {
        let e = TsExpr::path("types.BarStruct")
            .method("toEncodable", vec![TsExpr::path("fields.nested")]);
        assert_eq!(
            expr_to_string(&e, 0),
            "types.BarStruct.toEncodable(fields.nested)"
        );

        let guarded = TsExpr::path("this.value")
            .and(TsExpr::path("this.value").method("toJSON", vec![]))
            .paren()
            .or(TsExpr::Null);
        assert_eq!(
            expr_to_string(&guarded, 0),
            "(this.value && this.value.toJSON()) || null"
        );
    }

    #[test]
    fn renders_map_arrow() {
        let e = TsExpr::path("fields.vec").method(
            "map",
            vec![TsExpr::arrow(
                "item",
                TsExpr::ident("item").method("toString", vec![]),
            )],
        );
        assert_eq!(
            expr_to_string(&e, 0),
            "fields.vec.map((item) => item.toString())"
        );
    }

    #[test]
    fn renders_union_and_tuple_types() {
        let ty = TsType::Union(vec![
            TsType::Tuple(vec![TsType::name("boolean"), TsType::name("number")]),
            TsType::name("null"),
        ]);
        assert_eq!(type_to_string(&ty), "[boolean, number] | null");
    }

    #[test]
    fn renders_interface_item() {
        let item = TsItem::Interface {
            exported: true,
            name: "CounterJSON".to_string(),
            props: vec![("count".to_string(), TsType::name("string"))],
        };
        let mut out = String::new();
        render_item(&mut out, &item, 0);
        assert_eq!(out, "export interface CounterJSON {\n  count: string\n}\n");
    }
}
