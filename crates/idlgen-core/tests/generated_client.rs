//! End-to-end check over a representative IDL: every section present,
//! projections consistent across the generated files.

use idlgen_core::generate::generate;
use idlgen_core::idl::Idl;

const IDL: &str = r#"{
    "version": "0.1.0",
    "name": "example_program",
    "instructions": [
        {
            "name": "initializeWithValues",
            "accounts": [
                {"name": "state", "isMut": true, "isSigner": true},
                {"name": "nested", "accounts": [
                    {"name": "clock", "isMut": false, "isSigner": false},
                    {"name": "rent", "isMut": false, "isSigner": false}
                ]},
                {"name": "payer", "isMut": true, "isSigner": true},
                {"name": "systemProgram", "isMut": false, "isSigner": false}
            ],
            "args": [
                {"name": "boolField", "type": "bool"},
                {"name": "u64Field", "type": "u64"},
                {"name": "bytesField", "type": "bytes"},
                {"name": "vecStructField", "type": {"vec": {"defined": "FooStruct"}}},
                {"name": "optionField", "type": {"option": "bool"}},
                {"name": "enumField1", "type": {"defined": "FooEnum"}}
            ]
        },
        {"name": "causeError", "accounts": [], "args": []}
    ],
    "accounts": [
        {
            "name": "State",
            "type": {"kind": "struct", "fields": [
                {"name": "boolField", "type": "bool"},
                {"name": "u64Field", "type": "u64"},
                {"name": "i128Field", "type": "i128"},
                {"name": "bytesField", "type": "bytes"},
                {"name": "pubkeyField", "type": "publicKey"},
                {"name": "vecField", "type": {"vec": "u64"}},
                {"name": "arrayField", "type": {"array": ["bool", 3]}},
                {"name": "optionField", "type": {"option": "u64"}},
                {"name": "structField", "type": {"defined": "FooStruct"}},
                {"name": "enumField", "type": {"defined": "FooEnum"}}
            ]}
        }
    ],
    "types": [
        {
            "name": "BarStruct",
            "type": {"kind": "struct", "fields": [
                {"name": "someField", "type": "bool"},
                {"name": "otherField", "type": "u8"}
            ]}
        },
        {
            "name": "FooStruct",
            "type": {"kind": "struct", "fields": [
                {"name": "field1", "type": "u8"},
                {"name": "field2", "type": "u16"},
                {"name": "nested", "type": {"defined": "BarStruct"}},
                {"name": "vecNested", "type": {"vec": {"defined": "BarStruct"}}},
                {"name": "optionNested", "type": {"option": {"defined": "BarStruct"}}},
                {"name": "enumField", "type": {"defined": "FooEnum"}}
            ]}
        },
        {
            "name": "FooEnum",
            "type": {"kind": "enum", "variants": [
                {"name": "Unnamed", "fields": ["bool", "u8"]},
                {"name": "Named", "fields": [
                    {"name": "bool_field", "type": "bool"},
                    {"name": "u8_field", "type": "u8"}
                ]},
                {"name": "Struct", "fields": [{"defined": "BarStruct"}]},
                {"name": "NoFields"}
            ]}
        }
    ],
    "errors": [
        {"code": 6000, "name": "SomeError", "msg": "Example error."}
    ],
    "metadata": {"address": "3rTQ3R4B2PxZrAyx7EUefySPgZY8RhJf16cZajbmrzp8"}
}"#;

fn file(path: &str) -> String {
    let idl = Idl::from_json(IDL).unwrap();
    let client = generate(&idl, None).unwrap();
    client
        .files()
        .into_iter()
        .find(|(p, _)| p == path)
        .unwrap_or_else(|| panic!("no generated file at {path}"))
        .1
}

#[test]
fn account_file_covers_all_projections() {
    let src = file("accounts/State.ts");

    // fields interface follows native types
    assert!(src.contains("u64Field: BN"));
    assert!(src.contains("bytesField: Array<number>"));
    assert!(src.contains("pubkeyField: PublicKey"));
    assert!(src.contains("structField: types.FooStructFields"));
    assert!(src.contains("enumField: types.FooEnumKind"));

    // JSON interface swaps wide ints and pubkeys for strings
    assert!(src.contains("u64Field: string"));
    assert!(src.contains("pubkeyField: string"));
    assert!(src.contains("structField: types.FooStructJSON"));

    // layout binds each field name on the outermost call only
    assert!(src.contains(r#"borsh.u64("u64Field")"#));
    assert!(src.contains(r#"borsh.vec(borsh.u64(), "vecField")"#));
    assert!(src.contains(r#"borsh.array(borsh.bool(), 3, "arrayField")"#));
    assert!(src.contains(r#"borsh.option(borsh.u64(), "optionField")"#));
    assert!(src.contains(r#"types.FooStruct.layout("structField")"#));

    // decode delegates to the nested types
    assert!(src.contains("types.FooStruct.fromDecoded(dec.structField)"));
    assert!(src.contains("types.FooEnum.fromDecoded(dec.enumField)"));

    // JSON round trip for wide ints and pubkeys
    assert!(src.contains("u64Field: this.u64Field.toString()"));
    assert!(src.contains("u64Field: new BN(obj.u64Field)"));
    assert!(src.contains("pubkeyField: this.pubkeyField.toString()"));
    assert!(src.contains("pubkeyField: new PublicKey(obj.pubkeyField)"));

    // ownership and discriminator guards
    assert!(src.contains("account doesn't belong to this program"));
    assert!(src.contains("invalid account discriminator"));
}

#[test]
fn enum_file_keeps_wire_and_native_casing_apart() {
    let src = file("types/FooEnum.ts");

    // named variant payloads: lowerCamel on the native side, snake on the wire
    assert!(src.contains("boolField: value.boolField"));
    assert!(src.contains(r#"borsh.bool("bool_field")"#));
    assert!(src.contains(r#"val["bool_field"]"#));

    // tuple variants use positional keys
    assert!(src.contains(r#"val["_0"]"#));
    assert!(src.contains("readonly discriminator = 0"));
    assert!(src.contains(r#"readonly kind = "NoFields""#));
    assert!(src.contains("borsh.rustEnum"));
}

#[test]
fn instruction_args_encode_through_types() {
    let src = file("instructions/initializeWithValues.ts");

    assert!(src.contains("export interface InitializeWithValuesArgs"));
    assert!(src.contains("vecStructField: Array<types.FooStructFields>"));
    assert!(src.contains(
        "vecStructField: args.vecStructField.map((item) => types.FooStruct.toEncodable(item))"
    ));
    assert!(src.contains("enumField1: args.enumField1.toEncodable()"));
    assert!(src.contains("Buffer.from(args.bytesField)"));
    assert!(src.contains("nested: { clock: PublicKey; rent: PublicKey }"));
    assert!(src.contains("{ pubkey: accounts.nested.rent, isSigner: false, isWritable: false }"));
    assert!(src.contains("const data = Buffer.concat([identifier, buffer]).slice(0, 8 + len)"));
}

#[test]
fn errors_wire_custom_codes_through_index() {
    let src = file("errors/index.ts");
    assert!(src.contains("custom.fromCode(code)"));
    let custom = file("errors/custom.ts");
    assert!(custom.contains("readonly code = 6000"));
    assert!(custom.contains(r#"super("6000: Example error.")"#));
}

#[test]
fn coption_field_fails_generation() {
    let bad = r#"{
        "version": "0.1.0",
        "name": "bad",
        "accounts": [
            {
                "name": "Holder",
                "type": {"kind": "struct", "fields": [
                    {"name": "maybe", "type": {"coption": "u64"}}
                ]}
            }
        ]
    }"#;
    let idl = Idl::from_json(bad).unwrap();
    let err = generate(&idl, None).unwrap_err();
    assert!(err.to_string().contains("IDG0210"));
}

#[test]
fn unresolved_defined_type_fails_generation() {
    let bad = r#"{
        "version": "0.1.0",
        "name": "bad",
        "types": [
            {
                "name": "Holder",
                "type": {"kind": "struct", "fields": [
                    {"name": "inner", "type": {"defined": "Missing"}}
                ]}
            }
        ]
    }"#;
    let idl = Idl::from_json(bad).unwrap();
    let err = generate(&idl, None).unwrap_err();
    assert!(err.to_string().contains("IDG0201"));
}
