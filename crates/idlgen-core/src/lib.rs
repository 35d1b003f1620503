pub mod anchor_errors;
pub mod diagnostics;
pub mod discriminator;
pub mod errors;
pub mod gen;
pub mod generate;
pub mod idl;
pub mod lower;
pub mod ts;
pub mod ts_emit;
