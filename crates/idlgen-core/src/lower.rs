//! Lowers IDL type references into the seven projections every generated
//! composite needs: native type, JSON type, borsh layout, encode, decode,
//! toJSON and fromJSON expressions, plus the defensive constructor
//! initializer. The wrapper shapes (vec, array, option) share one
//! recursive walk; the projections differ only in how they treat leaves,
//! supplied as a [`ValueInterp`].

use anyhow::Result;

use crate::diagnostics::{Diagnostic, DiagnosticCode, Phase};
use crate::idl::{Idl, IdlType, Primitive, TypeDefKind};
use crate::ts::{TsExpr, TsType};

pub fn fields_interface_name(type_name: &str) -> String {
    format!("{type_name}Fields")
}

pub fn value_interface_name(type_name: &str) -> String {
    format!("{type_name}Value")
}

pub fn kind_interface_name(type_name: &str) -> String {
    format!("{type_name}Kind")
}

pub fn json_interface_name(type_name: &str) -> String {
    format!("{type_name}JSON")
}

fn unsupported(context: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "{}",
        Diagnostic::error(
            DiagnosticCode::Idg0210UnsupportedTypeShape,
            Phase::Lower,
            format!("coption is not supported (field: {context})"),
        )
    )
}

/// One type-level projection, defined rule by rule over the closed set
/// of shapes. [`fold_ty`] supplies the recursion, so a projection never
/// re-walks wrappers itself and a new shape means one new fold rule.
pub trait TypeInterp {
    type Out;
    fn prim(&self, p: Primitive) -> Self::Out;
    fn vec(&self, inner: Self::Out) -> Self::Out;
    fn array(&self, inner: Self::Out, len: u64) -> Self::Out;
    fn option(&self, inner: Self::Out) -> Self::Out;
    fn defined(&self, idl: &Idl, name: &str) -> Result<Self::Out>;
}

/// Folds `ty` through an interpretation. `ctx` names the field for the
/// unsupported-shape diagnostic.
pub fn fold_ty<I: TypeInterp>(idl: &Idl, ty: &IdlType, interp: &I, ctx: &str) -> Result<I::Out> {
    match ty {
        IdlType::Simple(p) => Ok(interp.prim(*p)),
        IdlType::Vec { vec } => Ok(interp.vec(fold_ty(idl, vec, interp, ctx)?)),
        IdlType::Array { array } => Ok(interp.array(fold_ty(idl, &array.0, interp, ctx)?, array.1)),
        IdlType::Option { option } => Ok(interp.option(fold_ty(idl, option, interp, ctx)?)),
        IdlType::COption { .. } => Err(unsupported(ctx)),
        IdlType::Defined { defined } => interp.defined(idl, defined),
    }
}

struct NativeType<'a> {
    prefix: &'a str,
    use_fields_interface: bool,
}

impl TypeInterp for NativeType<'_> {
    type Out = TsType;

    fn prim(&self, p: Primitive) -> TsType {
        match p {
            Primitive::Bool => TsType::name("boolean"),
            Primitive::U8
            | Primitive::I8
            | Primitive::U16
            | Primitive::I16
            | Primitive::U32
            | Primitive::I32
            | Primitive::F32
            | Primitive::F64 => TsType::name("number"),
            Primitive::U64 | Primitive::I64 | Primitive::U128 | Primitive::I128 => {
                TsType::name("BN")
            }
            Primitive::Bytes => TsType::array_of(TsType::name("number")),
            Primitive::String => TsType::name("string"),
            Primitive::PublicKey => TsType::name("PublicKey"),
        }
    }

    fn vec(&self, inner: TsType) -> TsType {
        TsType::array_of(inner)
    }

    fn array(&self, inner: TsType, _len: u64) -> TsType {
        TsType::array_of(inner)
    }

    fn option(&self, inner: TsType) -> TsType {
        TsType::nullable(inner)
    }

    fn defined(&self, idl: &Idl, name: &str) -> Result<TsType> {
        let def = idl.resolve_defined(name)?;
        let name = match def.ty {
            TypeDefKind::Struct { .. } if self.use_fields_interface => fields_interface_name(name),
            TypeDefKind::Struct { .. } => name.to_string(),
            TypeDefKind::Enum { .. } => kind_interface_name(name),
        };
        Ok(TsType::name(format!("{}{name}", self.prefix)))
    }
}

struct JsonType<'a> {
    prefix: &'a str,
}

impl TypeInterp for JsonType<'_> {
    type Out = TsType;

    fn prim(&self, p: Primitive) -> TsType {
        match p {
            Primitive::Bool => TsType::name("boolean"),
            Primitive::U8
            | Primitive::I8
            | Primitive::U16
            | Primitive::I16
            | Primitive::U32
            | Primitive::I32
            | Primitive::F32
            | Primitive::F64 => TsType::name("number"),
            Primitive::U64
            | Primitive::I64
            | Primitive::U128
            | Primitive::I128
            | Primitive::String
            | Primitive::PublicKey => TsType::name("string"),
            Primitive::Bytes => TsType::array_of(TsType::name("number")),
        }
    }

    fn vec(&self, inner: TsType) -> TsType {
        TsType::array_of(inner)
    }

    fn array(&self, inner: TsType, _len: u64) -> TsType {
        TsType::array_of(inner)
    }

    fn option(&self, inner: TsType) -> TsType {
        TsType::nullable(inner)
    }

    fn defined(&self, _idl: &Idl, name: &str) -> Result<TsType> {
        Ok(TsType::name(format!(
            "{}{}",
            self.prefix,
            json_interface_name(name)
        )))
    }
}

/// Layout expressions are built unnamed; the outermost call takes the
/// borsh property name as its final argument, appended afterwards.
struct LayoutOf<'a> {
    prefix: &'a str,
}

impl TypeInterp for LayoutOf<'_> {
    type Out = TsExpr;

    fn prim(&self, p: Primitive) -> TsExpr {
        let ctor = match p {
            Primitive::Bool => "bool",
            Primitive::U8 => "u8",
            Primitive::I8 => "i8",
            Primitive::U16 => "u16",
            Primitive::I16 => "i16",
            Primitive::U32 => "u32",
            Primitive::I32 => "i32",
            Primitive::F32 => "f32",
            Primitive::U64 => "u64",
            Primitive::I64 => "i64",
            Primitive::F64 => "f64",
            Primitive::U128 => "u128",
            Primitive::I128 => "i128",
            Primitive::Bytes => "vecU8",
            Primitive::String => "str",
            Primitive::PublicKey => "publicKey",
        };
        TsExpr::ident("borsh").method(ctor, vec![])
    }

    fn vec(&self, inner: TsExpr) -> TsExpr {
        TsExpr::ident("borsh").method("vec", vec![inner])
    }

    fn array(&self, inner: TsExpr, len: u64) -> TsExpr {
        TsExpr::ident("borsh").method("array", vec![inner, TsExpr::num(len)])
    }

    fn option(&self, inner: TsExpr) -> TsExpr {
        TsExpr::ident("borsh").method("option", vec![inner])
    }

    fn defined(&self, _idl: &Idl, name: &str) -> Result<TsExpr> {
        Ok(TsExpr::path(&format!("{}{name}", self.prefix)).method("layout", vec![]))
    }
}

/// The in-memory TypeScript type of a value of `ty`.
///
/// `use_fields_interface` controls how a defined struct appears: the
/// loose `XFields` shape for constructor inputs, the class itself for
/// stored properties. Enums always appear as their `XKind` union.
pub fn native_type(
    idl: &Idl,
    ty: &IdlType,
    prefix: &str,
    use_fields_interface: bool,
) -> Result<TsType> {
    fold_ty(
        idl,
        ty,
        &NativeType {
            prefix,
            use_fields_interface,
        },
        "<type position>",
    )
}

/// The JSON mirror of `ty`: wide integers and pubkeys widen to strings,
/// everything else keeps its structure.
pub fn json_type(idl: &Idl, ty: &IdlType, prefix: &str) -> Result<TsType> {
    fold_ty(idl, ty, &JsonType { prefix }, "<type position>")
}

/// The borsh layout expression for `ty`, optionally bound to a field
/// name. Defined composites defer to their own statically emitted
/// `layout()`, which is what keeps recursive type graphs finite here.
pub fn layout_for(idl: &Idl, ty: &IdlType, name: Option<&str>, prefix: &str) -> Result<TsExpr> {
    let mut expr = fold_ty(idl, ty, &LayoutOf { prefix }, name.unwrap_or("<unnamed>"))?;
    if let (Some(n), TsExpr::Call(_, args)) = (name, &mut expr) {
        args.push(TsExpr::str(n));
    }
    Ok(expr)
}

/// Leaf behavior for one value-level projection. The shared recursion in
/// [`map_value`] handles vec, array and option wrapping plus the
/// identity short-circuit; an interpretation only decides what happens
/// to primitives and defined composites.
pub trait ValueInterp {
    fn prim(&self, p: Primitive, val: TsExpr) -> TsExpr;
    fn defined(&self, idl: &Idl, name: &str, val: TsExpr) -> Result<TsExpr>;
}

/// Maps a value expression of type `ty` through an interpretation.
///
/// Wrapping only happens when the inner transform is not the identity:
/// a vec of plain numbers stays `fields.x`, never `fields.x.map((item) =>
/// item)`. The short-circuit is cosmetic and must not change behavior.
pub fn map_value(
    idl: &Idl,
    interp: &dyn ValueInterp,
    val: TsExpr,
    ty: &IdlType,
) -> Result<TsExpr> {
    match ty {
        IdlType::Simple(p) => Ok(interp.prim(*p, val)),
        IdlType::Vec { vec } => map_elements(idl, interp, val, vec),
        IdlType::Array { array } => map_elements(idl, interp, val, &array.0),
        IdlType::Option { option } => {
            let mapped = map_value(idl, interp, val.clone(), option)?;
            if mapped == val {
                Ok(val)
            } else {
                Ok(val.clone().and(mapped).paren().or(TsExpr::Null))
            }
        }
        IdlType::COption { .. } => Err(unsupported(&crate::ts_emit::expr_to_string(&val, 0))),
        IdlType::Defined { defined } => interp.defined(idl, defined, val),
    }
}

fn map_elements(
    idl: &Idl,
    interp: &dyn ValueInterp,
    val: TsExpr,
    inner: &IdlType,
) -> Result<TsExpr> {
    let item = TsExpr::ident("item");
    let mapped = map_value(idl, interp, item.clone(), inner)?;
    if mapped == item {
        Ok(val)
    } else {
        Ok(val.method("map", vec![TsExpr::arrow("item", mapped)]))
    }
}

/// Native value to what the borsh layout accepts.
pub struct ToEncodable<'a> {
    pub prefix: &'a str,
}

impl ValueInterp for ToEncodable<'_> {
    fn prim(&self, p: Primitive, val: TsExpr) -> TsExpr {
        match p {
            Primitive::Bytes => TsExpr::path("Buffer.from").call(vec![val]),
            _ => val,
        }
    }

    fn defined(&self, idl: &Idl, name: &str, val: TsExpr) -> Result<TsExpr> {
        let def = idl.resolve_defined(name)?;
        Ok(match def.ty {
            TypeDefKind::Struct { .. } => TsExpr::path(&format!("{}{name}", self.prefix))
                .method("toEncodable", vec![val]),
            TypeDefKind::Enum { .. } => val.method("toEncodable", vec![]),
        })
    }
}

/// Layout decode output back to the native value.
pub struct FromDecoded<'a> {
    pub prefix: &'a str,
}

impl ValueInterp for FromDecoded<'_> {
    fn prim(&self, p: Primitive, val: TsExpr) -> TsExpr {
        match p {
            Primitive::Bytes => TsExpr::path("Array.from").call(vec![val]),
            _ => val,
        }
    }

    fn defined(&self, idl: &Idl, name: &str, val: TsExpr) -> Result<TsExpr> {
        idl.resolve_defined(name)?;
        Ok(TsExpr::path(&format!("{}{name}", self.prefix)).method("fromDecoded", vec![val]))
    }
}

/// Native value to its JSON mirror.
pub struct ToJson;

impl ValueInterp for ToJson {
    fn prim(&self, p: Primitive, val: TsExpr) -> TsExpr {
        match p {
            Primitive::U64
            | Primitive::I64
            | Primitive::U128
            | Primitive::I128
            | Primitive::PublicKey => val.method("toString", vec![]),
            _ => val,
        }
    }

    fn defined(&self, idl: &Idl, name: &str, val: TsExpr) -> Result<TsExpr> {
        idl.resolve_defined(name)?;
        Ok(val.method("toJSON", vec![]))
    }
}

/// JSON mirror back to the native value.
pub struct FromJson<'a> {
    pub prefix: &'a str,
}

impl ValueInterp for FromJson<'_> {
    fn prim(&self, p: Primitive, val: TsExpr) -> TsExpr {
        match p {
            Primitive::U64 | Primitive::I64 | Primitive::U128 | Primitive::I128 => {
                TsExpr::new_(TsExpr::ident("BN"), vec![val])
            }
            Primitive::PublicKey => TsExpr::new_(TsExpr::ident("PublicKey"), vec![val]),
            _ => val,
        }
    }

    fn defined(&self, _idl: &Idl, name: &str, val: TsExpr) -> Result<TsExpr> {
        Ok(TsExpr::path(&format!("{}{name}", self.prefix)).method("fromJSON", vec![val]))
    }
}

/// Constructor initializer for a loosely-typed field bag. Nested structs
/// are copy-constructed from a spread so the class never aliases caller
/// data; enums pass through because their variant classes are already
/// immutable values.
pub struct Initializer<'a> {
    pub prefix: &'a str,
}

impl ValueInterp for Initializer<'_> {
    fn prim(&self, _p: Primitive, val: TsExpr) -> TsExpr {
        val
    }

    fn defined(&self, idl: &Idl, name: &str, val: TsExpr) -> Result<TsExpr> {
        let def = idl.resolve_defined(name)?;
        Ok(match def.ty {
            TypeDefKind::Struct { .. } => TsExpr::new_(
                TsExpr::path(&format!("{}{name}", self.prefix)),
                vec![TsExpr::Object(vec![crate::ts::TsProp::Spread(val)])],
            ),
            TypeDefKind::Enum { .. } => val,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts_emit::expr_to_string;

    fn idl_with_types(types_json: &str) -> Idl {
        let src = format!(
            r#"{{"version": "0.1.0", "name": "test", "instructions": [], "types": {types_json}}}"#
        );
        Idl::from_json(&src).unwrap()
    }

    fn bare_idl() -> Idl {
        idl_with_types("[]")
    }

    #[test]
    fn option_u64_layout() {
        let idl = bare_idl();
        let ty = IdlType::Option {
            option: Box::new(IdlType::Simple(Primitive::U64)),
        };
        let layout = layout_for(&idl, &ty, Some("maybeNum"), "types.").unwrap();
        assert_eq!(
            expr_to_string(&layout, 0),
            r#"borsh.option(borsh.u64(), "maybeNum")"#
        );
    }

    #[test]
    fn fixed_array_layout_carries_length() {
        let idl = bare_idl();
        let ty = IdlType::Array {
            array: (Box::new(IdlType::Simple(Primitive::Bool)), 3),
        };
        let layout = layout_for(&idl, &ty, Some("flags"), "types.").unwrap();
        assert_eq!(
            expr_to_string(&layout, 0),
            r#"borsh.array(borsh.bool(), 3, "flags")"#
        );
    }

    #[test]
    fn identity_short_circuit_skips_vec_map() {
        let idl = bare_idl();
        let ty = IdlType::Vec {
            vec: Box::new(IdlType::Simple(Primitive::U32)),
        };
        let out = map_value(
            &idl,
            &ToEncodable { prefix: "types." },
            TsExpr::path("fields.nums"),
            &ty,
        )
        .unwrap();
        assert_eq!(expr_to_string(&out, 0), "fields.nums");
    }

    #[test]
    fn vec_of_wide_ints_maps_in_json_projections() {
        let idl = bare_idl();
        let ty = IdlType::Vec {
            vec: Box::new(IdlType::Simple(Primitive::U64)),
        };
        let to = map_value(&idl, &ToJson, TsExpr::path("this.vecField"), &ty).unwrap();
        assert_eq!(
            expr_to_string(&to, 0),
            "this.vecField.map((item) => item.toString())"
        );
        let from = map_value(
            &idl,
            &FromJson { prefix: "types." },
            TsExpr::path("obj.vecField"),
            &ty,
        )
        .unwrap();
        assert_eq!(
            expr_to_string(&from, 0),
            "obj.vecField.map((item) => new BN(item))"
        );
    }

    #[test]
    fn optional_struct_guards_with_null() {
        let idl = idl_with_types(
            r#"[{"name": "Bar", "type": {"kind": "struct", "fields": [{"name": "x", "type": "u8"}]}}]"#,
        );
        let ty = IdlType::Option {
            option: Box::new(IdlType::Defined {
                defined: "Bar".to_string(),
            }),
        };
        let out = map_value(
            &idl,
            &ToEncodable { prefix: "types." },
            TsExpr::path("fields.opt"),
            &ty,
        )
        .unwrap();
        assert_eq!(
            expr_to_string(&out, 0),
            "(fields.opt && types.Bar.toEncodable(fields.opt)) || null"
        );
    }

    #[test]
    fn nested_struct_delegates_per_projection() {
        let idl = idl_with_types(
            r#"[{"name": "Bar", "type": {"kind": "struct", "fields": [{"name": "x", "type": "u8"}]}},
                {"name": "Foo", "type": {"kind": "enum", "variants": [{"name": "A"}]}}]"#,
        );
        let bar = IdlType::Defined {
            defined: "Bar".to_string(),
        };
        let foo = IdlType::Defined {
            defined: "Foo".to_string(),
        };

        let enc = map_value(
            &idl,
            &ToEncodable { prefix: "types." },
            TsExpr::path("fields.nested"),
            &bar,
        )
        .unwrap();
        assert_eq!(
            expr_to_string(&enc, 0),
            "types.Bar.toEncodable(fields.nested)"
        );

        // enums encode through the instance, not the module
        let enc = map_value(
            &idl,
            &ToEncodable { prefix: "types." },
            TsExpr::path("fields.e"),
            &foo,
        )
        .unwrap();
        assert_eq!(expr_to_string(&enc, 0), "fields.e.toEncodable()");

        let init = map_value(
            &idl,
            &Initializer { prefix: "types." },
            TsExpr::path("fields.nested"),
            &bar,
        )
        .unwrap();
        assert_eq!(
            expr_to_string(&init, 0),
            "new types.Bar({ ...fields.nested })"
        );

        let init = map_value(
            &idl,
            &Initializer { prefix: "types." },
            TsExpr::path("fields.e"),
            &foo,
        )
        .unwrap();
        assert_eq!(expr_to_string(&init, 0), "fields.e");
    }

    #[test]
    fn native_and_json_types_for_defined() {
        let idl = idl_with_types(
            r#"[{"name": "Bar", "type": {"kind": "struct", "fields": [{"name": "x", "type": "u8"}]}},
                {"name": "Foo", "type": {"kind": "enum", "variants": [{"name": "A"}]}}]"#,
        );
        let bar = IdlType::Defined {
            defined: "Bar".to_string(),
        };
        let foo = IdlType::Defined {
            defined: "Foo".to_string(),
        };

        assert_eq!(
            crate::ts_emit::type_to_string(&native_type(&idl, &bar, "types.", true).unwrap()),
            "types.BarFields"
        );
        assert_eq!(
            crate::ts_emit::type_to_string(&native_type(&idl, &bar, "types.", false).unwrap()),
            "types.Bar"
        );
        assert_eq!(
            crate::ts_emit::type_to_string(&native_type(&idl, &foo, "types.", true).unwrap()),
            "types.FooKind"
        );
        assert_eq!(
            crate::ts_emit::type_to_string(&json_type(&idl, &bar, "types.").unwrap()),
            "types.BarJSON"
        );
    }

    #[test]
    fn coption_is_rejected() {
        let idl = bare_idl();
        let ty = IdlType::COption {
            coption: Box::new(IdlType::Simple(Primitive::U64)),
        };
        let err = map_value(&idl, &ToJson, TsExpr::path("this.x"), &ty).unwrap_err();
        assert!(err.to_string().contains("IDG0210"));
        assert!(layout_for(&idl, &ty, Some("x"), "types.").is_err());
    }

    #[test]
    fn bytes_projections() {
        let idl = bare_idl();
        let ty = IdlType::Simple(Primitive::Bytes);
        let enc = map_value(
            &idl,
            &ToEncodable { prefix: "types." },
            TsExpr::path("fields.data"),
            &ty,
        )
        .unwrap();
        assert_eq!(expr_to_string(&enc, 0), "Buffer.from(fields.data)");
        let dec = map_value(
            &idl,
            &FromDecoded { prefix: "types." },
            TsExpr::path("obj.data"),
            &ty,
        )
        .unwrap();
        assert_eq!(expr_to_string(&dec, 0), "Array.from(obj.data)");
    }
}
