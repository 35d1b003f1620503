use std::collections::BTreeSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticCode, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "u8")]
    U8,
    #[serde(rename = "i8")]
    I8,
    #[serde(rename = "u16")]
    U16,
    #[serde(rename = "i16")]
    I16,
    #[serde(rename = "u32")]
    U32,
    #[serde(rename = "i32")]
    I32,
    #[serde(rename = "f32")]
    F32,
    #[serde(rename = "u64")]
    U64,
    #[serde(rename = "i64")]
    I64,
    #[serde(rename = "f64")]
    F64,
    #[serde(rename = "u128")]
    U128,
    #[serde(rename = "i128")]
    I128,
    #[serde(rename = "bytes")]
    Bytes,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "publicKey")]
    PublicKey,
}

/// One type reference as it appears in the IDL document. The `coption`
/// shape is carried through parsing so the lowering stage can reject it
/// with a diagnostic naming the field, instead of a parse error naming
/// a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlType {
    Simple(Primitive),
    Vec {
        vec: Box<IdlType>,
    },
    Option {
        option: Box<IdlType>,
    },
    COption {
        coption: Box<IdlType>,
    },
    Array {
        array: (Box<IdlType>, u64),
    },
    Defined {
        defined: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumFields {
    Named(Vec<IdlField>),
    Tuple(Vec<IdlType>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    #[serde(default)]
    pub fields: Option<EnumFields>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeDefKind {
    #[serde(rename = "struct")]
    Struct { fields: Vec<IdlField> },
    #[serde(rename = "enum")]
    Enum { variants: Vec<EnumVariant> },
}

/// A named composite declaration. Also the shape of an account (stored
/// record) declaration, whose kind is always a struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlTypeDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDefKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlAccountItem {
    Group {
        name: String,
        accounts: Vec<IdlAccountItem>,
    },
    Account {
        name: String,
        #[serde(rename = "isMut")]
        is_mut: bool,
        #[serde(rename = "isSigner")]
        is_signer: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<IdlAccountItem>,
    #[serde(default)]
    pub args: Vec<IdlField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlErrorCode {
    pub code: u32,
    pub name: String,
    #[serde(default)]
    pub msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlMetadata {
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idl {
    pub version: String,
    pub name: String,
    #[serde(default)]
    pub instructions: Vec<IdlInstruction>,
    #[serde(default)]
    pub accounts: Vec<IdlTypeDef>,
    #[serde(default)]
    pub types: Vec<IdlTypeDef>,
    #[serde(default)]
    pub errors: Vec<IdlErrorCode>,
    #[serde(default)]
    pub metadata: Option<IdlMetadata>,
}

impl Idl {
    pub fn from_json(src: &str) -> Result<Idl> {
        let idl: Idl = serde_json::from_str(src).map_err(|e| {
            anyhow::anyhow!(
                "{}",
                Diagnostic::error(DiagnosticCode::Idg0001ParseError, Phase::Parse, e.to_string())
            )
        })?;
        idl.check_unique_names()?;
        Ok(idl)
    }

    /// Resolve a `defined` reference to its declaration. Exactly one
    /// declaration must carry the name.
    pub fn resolve_defined(&self, name: &str) -> Result<&IdlTypeDef> {
        let mut found = self.types.iter().filter(|t| t.name == name);
        let first = found.next().ok_or_else(|| {
            anyhow::anyhow!(
                "{}",
                Diagnostic::error(
                    DiagnosticCode::Idg0201UnresolvedTypeRef,
                    Phase::Resolve,
                    format!("defined type not found: {name}")
                )
            )
        })?;
        if found.next().is_some() {
            anyhow::bail!(
                "{}",
                Diagnostic::error(
                    DiagnosticCode::Idg0202DuplicateDeclaration,
                    Phase::Resolve,
                    format!("type declared more than once: {name}")
                )
            );
        }
        Ok(first)
    }

    pub fn program_address(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.address.as_deref())
    }

    fn check_unique_names(&self) -> Result<()> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for decl in self.types.iter().chain(self.accounts.iter()) {
            if !seen.insert(decl.name.as_str()) {
                anyhow::bail!(
                    "{}",
                    Diagnostic::error(
                        DiagnosticCode::Idg0202DuplicateDeclaration,
                        Phase::Resolve,
                        format!("declaration name used twice: {}", decl.name)
                    )
                );
            }
        }
        Ok(())
    }
}
