//! The framework's fixed error table. Codes and messages are reproduced
//! verbatim; custom program errors start at 6000 and never overlap it.

#[derive(Debug)]
pub struct BuiltinError {
    pub name: &'static str,
    pub code: u32,
    pub msg: &'static str,
}

pub fn lookup(code: u32) -> Option<&'static BuiltinError> {
    BUILTIN_ERRORS.iter().find(|e| e.code == code)
}

pub const BUILTIN_ERRORS: &[BuiltinError] = &[
    // instructions
    BuiltinError {
        name: "InstructionMissing",
        code: 100,
        msg: "8 byte instruction identifier not provided",
    },
    BuiltinError {
        name: "InstructionFallbackNotFound",
        code: 101,
        msg: "Fallback functions are not supported",
    },
    BuiltinError {
        name: "InstructionDidNotDeserialize",
        code: 102,
        msg: "The program could not deserialize the given instruction",
    },
    BuiltinError {
        name: "InstructionDidNotSerialize",
        code: 103,
        msg: "The program could not serialize the given instruction",
    },
    // idl instructions
    BuiltinError {
        name: "IdlInstructionStub",
        code: 1000,
        msg: "The program was compiled without idl instructions",
    },
    BuiltinError {
        name: "IdlInstructionInvalidProgram",
        code: 1001,
        msg: "The transaction was given an invalid program for the IDL instruction",
    },
    // constraints
    BuiltinError {
        name: "ConstraintMut",
        code: 2000,
        msg: "A mut constraint was violated",
    },
    BuiltinError {
        name: "ConstraintHasOne",
        code: 2001,
        msg: "A has_one constraint was violated",
    },
    BuiltinError {
        name: "ConstraintSigner",
        code: 2002,
        msg: "A signer constraint was violated",
    },
    BuiltinError {
        name: "ConstraintRaw",
        code: 2003,
        msg: "A raw constraint was violated",
    },
    BuiltinError {
        name: "ConstraintOwner",
        code: 2004,
        msg: "An owner constraint was violated",
    },
    BuiltinError {
        name: "ConstraintRentExempt",
        code: 2005,
        msg: "A rent exempt constraint was violated",
    },
    BuiltinError {
        name: "ConstraintSeeds",
        code: 2006,
        msg: "A seeds constraint was violated",
    },
    BuiltinError {
        name: "ConstraintExecutable",
        code: 2007,
        msg: "An executable constraint was violated",
    },
    BuiltinError {
        name: "ConstraintState",
        code: 2008,
        msg: "A state constraint was violated",
    },
    BuiltinError {
        name: "ConstraintAssociated",
        code: 2009,
        msg: "An associated constraint was violated",
    },
    BuiltinError {
        name: "ConstraintAssociatedInit",
        code: 2010,
        msg: "An associated init constraint was violated",
    },
    BuiltinError {
        name: "ConstraintClose",
        code: 2011,
        msg: "A close constraint was violated",
    },
    BuiltinError {
        name: "ConstraintAddress",
        code: 2012,
        msg: "An address constraint was violated",
    },
    BuiltinError {
        name: "ConstraintZero",
        code: 2013,
        msg: "Expected zero account discriminant",
    },
    BuiltinError {
        name: "ConstraintTokenMint",
        code: 2014,
        msg: "A token mint constraint was violated",
    },
    BuiltinError {
        name: "ConstraintTokenOwner",
        code: 2015,
        msg: "A token owner constraint was violated",
    },
    BuiltinError {
        name: "ConstraintMintMintAuthority",
        code: 2016,
        msg: "A mint mint authority constraint was violated",
    },
    BuiltinError {
        name: "ConstraintMintFreezeAuthority",
        code: 2017,
        msg: "A mint freeze authority constraint was violated",
    },
    BuiltinError {
        name: "ConstraintMintDecimals",
        code: 2018,
        msg: "A mint decimals constraint was violated",
    },
    BuiltinError {
        name: "ConstraintSpace",
        code: 2019,
        msg: "A space constraint was violated",
    },
    // require
    BuiltinError {
        name: "RequireViolated",
        code: 2500,
        msg: "A require expression was violated",
    },
    BuiltinError {
        name: "RequireEqViolated",
        code: 2501,
        msg: "A require_eq expression was violated",
    },
    BuiltinError {
        name: "RequireKeysEqViolated",
        code: 2502,
        msg: "A require_keys_eq expression was violated",
    },
    BuiltinError {
        name: "RequireNeqViolated",
        code: 2503,
        msg: "A require_neq expression was violated",
    },
    BuiltinError {
        name: "RequireKeysNeqViolated",
        code: 2504,
        msg: "A require_keys_neq expression was violated",
    },
    BuiltinError {
        name: "RequireGtViolated",
        code: 2505,
        msg: "A require_gt expression was violated",
    },
    BuiltinError {
        name: "RequireGteViolated",
        code: 2506,
        msg: "A require_gte expression was violated",
    },
    // accounts
    BuiltinError {
        name: "AccountDiscriminatorAlreadySet",
        code: 3000,
        msg: "The account discriminator was already set on this account",
    },
    BuiltinError {
        name: "AccountDiscriminatorNotFound",
        code: 3001,
        msg: "No 8 byte discriminator was found on the account",
    },
    BuiltinError {
        name: "AccountDiscriminatorMismatch",
        code: 3002,
        msg: "8 byte discriminator did not match what was expected",
    },
    BuiltinError {
        name: "AccountDidNotDeserialize",
        code: 3003,
        msg: "Failed to deserialize the account",
    },
    BuiltinError {
        name: "AccountDidNotSerialize",
        code: 3004,
        msg: "Failed to serialize the account",
    },
    BuiltinError {
        name: "AccountNotEnoughKeys",
        code: 3005,
        msg: "Not enough account keys given to the instruction",
    },
    BuiltinError {
        name: "AccountNotMutable",
        code: 3006,
        msg: "The given account is not mutable",
    },
    BuiltinError {
        name: "AccountOwnedByWrongProgram",
        code: 3007,
        msg: "The given account is owned by a different program than expected",
    },
    BuiltinError {
        name: "InvalidProgramId",
        code: 3008,
        msg: "Program ID was not as expected",
    },
    BuiltinError {
        name: "InvalidProgramExecutable",
        code: 3009,
        msg: "Program account is not executable",
    },
    BuiltinError {
        name: "AccountNotSigner",
        code: 3010,
        msg: "The given account did not sign",
    },
    BuiltinError {
        name: "AccountNotSystemOwned",
        code: 3011,
        msg: "The given account is not owned by the system program",
    },
    BuiltinError {
        name: "AccountNotInitialized",
        code: 3012,
        msg: "The program expected this account to be already initialized",
    },
    BuiltinError {
        name: "AccountNotProgramData",
        code: 3013,
        msg: "The given account is not a program data account",
    },
    BuiltinError {
        name: "AccountNotAssociatedTokenAccount",
        code: 3014,
        msg: "The given account is not the associated token account",
    },
    BuiltinError {
        name: "AccountSysvarMismatch",
        code: 3015,
        msg: "The given public key does not match the required sysvar",
    },
    // state
    BuiltinError {
        name: "StateInvalidAddress",
        code: 4000,
        msg: "The given state account does not have the correct address",
    },
    // misc
    BuiltinError {
        name: "Deprecated",
        code: 5000,
        msg: "The API being used is deprecated and should no longer be used",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_known_codes() {
        assert_eq!(lookup(100).unwrap().name, "InstructionMissing");
        assert_eq!(lookup(2001).unwrap().name, "ConstraintHasOne");
        assert_eq!(lookup(5000).unwrap().name, "Deprecated");
        assert!(lookup(6000).is_none());
        assert!(lookup(0).is_none());
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<u32> = BUILTIN_ERRORS.iter().map(|e| e.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), BUILTIN_ERRORS.len());
    }
}
