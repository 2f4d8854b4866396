//! LLVM-style IR node model.
//!
//! Every node lives in an [`IrContext`] arena and is addressed by a `u32`
//! entity ref. Operand slots hold [`Value`]s, a tagged union over the refs
//! that can be used as an operand.

// === Node model ===
pub mod constant;
pub mod inst;
pub mod metadata;
pub mod module;
pub mod opcode;
pub mod refs;
pub mod term;
pub mod types;

// === Storage and rendering ===
pub mod context;
pub mod ident;
pub mod printer;

// Re-export smallvec for external crates building `FuncData`
pub use smallvec;

pub use constant::{ConstData, ConstExpr};
pub use context::IrContext;
pub use ident::{IdError, Ident};
pub use inst::{Clause, ClauseKind, Incoming, InstData, InstKind, OperandBundle};
pub use metadata::{MetadataData, NamedMetadataData};
pub use module::{
    AliasData, BlockData, FuncData, GlobalData, IFuncData, ModuleData, ParamData,
    UseListOrderBbData, UseListOrderData,
};
pub use refs::*;
pub use term::{Case, TermData, TermKind};
pub use types::{FloatKind, TypeData, TypeInterner};
