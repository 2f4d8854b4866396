//! Block terminators.

use crate::ident::Ident;
use crate::inst::OperandBundle;
use crate::refs::{BlockRef, TypeRef, Value};

/// A `switch` case: the constant compared against and the block jumped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub x: Value,
    pub target: Value,
}

/// Terminator payload.
///
/// Jump targets are `Value::Block` operands so they can be rewritten through
/// the same slot machinery as any other operand.
#[derive(Clone, Debug, PartialEq)]
pub enum TermKind {
    Ret {
        x: Option<Value>,
    },
    Br {
        target: Value,
    },
    CondBr {
        cond: Value,
        target_true: Value,
        target_false: Value,
    },
    Switch {
        x: Value,
        target_default: Value,
        cases: Vec<Case>,
    },
    IndirectBr {
        addr: Value,
        valid_targets: Vec<Value>,
    },
    Invoke {
        func_ty: TypeRef,
        invokee: Value,
        args: Vec<Value>,
        normal: Value,
        exception: Value,
        bundles: Vec<OperandBundle>,
    },
    CallBr {
        func_ty: TypeRef,
        callee: Value,
        args: Vec<Value>,
        normal: Value,
        others: Vec<Value>,
        bundles: Vec<OperandBundle>,
    },
    Resume {
        x: Value,
    },
    CatchSwitch {
        /// Parent pad, or `none`.
        scope: Value,
        handlers: Vec<Value>,
        /// `None` means "unwind to caller".
        unwind_target: Option<Value>,
    },
    CatchRet {
        /// The `catchpad` being exited.
        from: Value,
        to: Value,
    },
    CleanupRet {
        /// The `cleanuppad` being exited.
        from: Value,
        /// `None` means "unwind to caller".
        unwind_target: Option<Value>,
    },
    Unreachable,
}

impl TermKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TermKind::Ret { .. } => "ret",
            TermKind::Br { .. } => "br",
            TermKind::CondBr { .. } => "condbr",
            TermKind::Switch { .. } => "switch",
            TermKind::IndirectBr { .. } => "indirectbr",
            TermKind::Invoke { .. } => "invoke",
            TermKind::CallBr { .. } => "callbr",
            TermKind::Resume { .. } => "resume",
            TermKind::CatchSwitch { .. } => "catchswitch",
            TermKind::CatchRet { .. } => "catchret",
            TermKind::CleanupRet { .. } => "cleanupret",
            TermKind::Unreachable => "unreachable",
        }
    }
}

/// Data for a single terminator in the arena.
pub struct TermData {
    pub kind: TermKind,
    /// Result type; `void` unless the terminator produces a value.
    pub ty: TypeRef,
    pub ident: Ident,
    pub parent_block: Option<BlockRef>,
}
