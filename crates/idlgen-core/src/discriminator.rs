use heck::{ToSnakeCase, ToUpperCamelCase};
use sha2::{Digest, Sha256};

/// 8-byte tags prefixed to instruction call-data and account bytes. Both are
/// functions of the declared name alone (no shape information), mirroring the
/// convention of the executing runtime: two declarations sharing a name get
/// the same tag, and that collision is not detected here.

pub const DISCRIMINATOR_LEN: usize = 8;

fn sighash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Identifier of a callable operation: `sha256("global:<snake_name>")[..8]`.
pub fn instruction_identifier(ix_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash("global", &ix_name.to_snake_case())
}

/// Leading discriminator of a stored record: `sha256("account:<PascalName>")[..8]`.
pub fn account_discriminator(account_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash("account", &account_name.to_upper_camel_case())
}
