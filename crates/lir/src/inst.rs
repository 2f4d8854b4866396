//! Non-terminator instructions.

use crate::ident::Ident;
use crate::opcode::{
    AtomicOp, AtomicOrdering, BinaryOp, BitwiseOp, ConvOp, FPred, IPred, UnaryOp,
};
use crate::refs::{BlockRef, TypeRef, Value};

/// Incoming edge of a `phi`: the value flowing in and its predecessor block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Incoming {
    pub x: Value,
    pub pred: Value,
}

/// Kind of a `landingpad` clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseKind {
    Catch,
    Filter,
}

/// A `landingpad` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    pub kind: ClauseKind,
    pub x: Value,
}

/// Tagged operand bundle of a call-like instruction (`[ "deopt"(i32 %x) ]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperandBundle {
    pub tag: String,
    pub inputs: Vec<Value>,
}

/// Instruction payload, grouped by category with an opcode tag where a
/// category has several members sharing one operand shape.
#[derive(Clone, Debug, PartialEq)]
pub enum InstKind {
    // === Unary, binary and bitwise ===
    Unary {
        op: UnaryOp,
        x: Value,
    },
    Binary {
        op: BinaryOp,
        x: Value,
        y: Value,
    },
    Bitwise {
        op: BitwiseOp,
        x: Value,
        y: Value,
    },

    // === Vector ===
    ExtractElement {
        x: Value,
        index: Value,
    },
    InsertElement {
        x: Value,
        elem: Value,
        index: Value,
    },
    ShuffleVector {
        x: Value,
        y: Value,
        mask: Value,
    },

    // === Aggregate ===
    ExtractValue {
        x: Value,
        indices: Vec<u64>,
    },
    InsertValue {
        x: Value,
        elem: Value,
        indices: Vec<u64>,
    },

    // === Memory ===
    Alloca {
        elem_ty: TypeRef,
        nelems: Option<Value>,
        addr_space: u32,
    },
    Load {
        elem_ty: TypeRef,
        src: Value,
        volatile: bool,
    },
    Store {
        src: Value,
        dst: Value,
        volatile: bool,
    },
    Fence {
        ordering: AtomicOrdering,
    },
    CmpXchg {
        ptr: Value,
        cmp: Value,
        new: Value,
        success: AtomicOrdering,
        failure: AtomicOrdering,
    },
    AtomicRmw {
        op: AtomicOp,
        dst: Value,
        x: Value,
        ordering: AtomicOrdering,
    },
    GetElementPtr {
        elem_ty: TypeRef,
        src: Value,
        indices: Vec<Value>,
        in_bounds: bool,
    },

    // === Conversion ===
    Conversion {
        op: ConvOp,
        from: Value,
        to: TypeRef,
    },

    // === Other ===
    ICmp {
        pred: IPred,
        x: Value,
        y: Value,
    },
    FCmp {
        pred: FPred,
        x: Value,
        y: Value,
    },
    Phi {
        ty: TypeRef,
        incs: Vec<Incoming>,
    },
    Select {
        cond: Value,
        x: Value,
        y: Value,
    },
    Call {
        /// Function type of the callee; its return type is the call's type.
        func_ty: TypeRef,
        callee: Value,
        args: Vec<Value>,
        bundles: Vec<OperandBundle>,
        tail: bool,
    },
    VaArg {
        arg_list: Value,
        ty: TypeRef,
    },
    LandingPad {
        ty: TypeRef,
        cleanup: bool,
        clauses: Vec<Clause>,
    },
    CatchPad {
        /// The `catchswitch` this pad belongs to.
        scope: Value,
        args: Vec<Value>,
    },
    CleanupPad {
        /// Parent pad, or `none`.
        scope: Value,
        args: Vec<Value>,
    },

    /// Free-form annotation rendered as `; text`. Has no operands and no result.
    Comment {
        text: String,
    },
}

impl InstKind {
    /// Assembly keyword of the instruction, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            InstKind::Unary { op, .. } => op.keyword(),
            InstKind::Binary { op, .. } => op.keyword(),
            InstKind::Bitwise { op, .. } => op.keyword(),
            InstKind::ExtractElement { .. } => "extractelement",
            InstKind::InsertElement { .. } => "insertelement",
            InstKind::ShuffleVector { .. } => "shufflevector",
            InstKind::ExtractValue { .. } => "extractvalue",
            InstKind::InsertValue { .. } => "insertvalue",
            InstKind::Alloca { .. } => "alloca",
            InstKind::Load { .. } => "load",
            InstKind::Store { .. } => "store",
            InstKind::Fence { .. } => "fence",
            InstKind::CmpXchg { .. } => "cmpxchg",
            InstKind::AtomicRmw { .. } => "atomicrmw",
            InstKind::GetElementPtr { .. } => "getelementptr",
            InstKind::Conversion { op, .. } => op.keyword(),
            InstKind::ICmp { .. } => "icmp",
            InstKind::FCmp { .. } => "fcmp",
            InstKind::Phi { .. } => "phi",
            InstKind::Select { .. } => "select",
            InstKind::Call { .. } => "call",
            InstKind::VaArg { .. } => "va_arg",
            InstKind::LandingPad { .. } => "landingpad",
            InstKind::CatchPad { .. } => "catchpad",
            InstKind::CleanupPad { .. } => "cleanuppad",
            InstKind::Comment { .. } => "comment",
        }
    }

    pub fn binary(op: BinaryOp, x: impl Into<Value>, y: impl Into<Value>) -> Self {
        InstKind::Binary {
            op,
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn bitwise(op: BitwiseOp, x: impl Into<Value>, y: impl Into<Value>) -> Self {
        InstKind::Bitwise {
            op,
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn call(func_ty: TypeRef, callee: impl Into<Value>, args: Vec<Value>) -> Self {
        InstKind::Call {
            func_ty,
            callee: callee.into(),
            args,
            bundles: Vec::new(),
            tail: false,
        }
    }
}

/// Data for a single instruction in the arena.
pub struct InstData {
    pub kind: InstKind,
    /// Result type; `void` for instructions that produce no value.
    pub ty: TypeRef,
    pub ident: Ident,
    pub parent_block: Option<BlockRef>,
}
