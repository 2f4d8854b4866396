//! Constants and constant expressions.

use crate::opcode::{BinaryOp, BitwiseOp, ConvOp, FPred, IPred, UnaryOp};
use crate::refs::{TypeRef, Value};

/// Data for a single constant in the arena.
///
/// Element and operand positions hold `Value`s; global, function and alias
/// addresses are referenced through their own `Value` variants rather than
/// duplicated here.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstData {
    // === Simple constants ===
    Int {
        ty: TypeRef,
        value: i128,
    },
    Float {
        ty: TypeRef,
        value: f64,
    },
    Null {
        ty: TypeRef,
    },
    NoneToken,

    // === Complex constants ===
    Struct {
        ty: TypeRef,
        fields: Vec<Value>,
    },
    Array {
        ty: TypeRef,
        elems: Vec<Value>,
    },
    CharArray {
        ty: TypeRef,
        bytes: Vec<u8>,
    },
    Vector {
        ty: TypeRef,
        elems: Vec<Value>,
    },
    ZeroInitializer {
        ty: TypeRef,
    },

    // === Undefined values ===
    Undef {
        ty: TypeRef,
    },

    /// Address of a basic block inside a function.
    BlockAddress {
        func: Value,
        block: Value,
    },

    Expr(ConstExpr),
}

impl ConstData {
    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstData::Int { .. } => "int",
            ConstData::Float { .. } => "float",
            ConstData::Null { .. } => "null",
            ConstData::NoneToken => "none",
            ConstData::Struct { .. } => "struct",
            ConstData::Array { .. } => "array",
            ConstData::CharArray { .. } => "char array",
            ConstData::Vector { .. } => "vector",
            ConstData::ZeroInitializer { .. } => "zeroinitializer",
            ConstData::Undef { .. } => "undef",
            ConstData::BlockAddress { .. } => "blockaddress",
            ConstData::Expr(expr) => expr.kind_name(),
        }
    }
}

/// Constant expressions, grouped the same way as instructions.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstExpr {
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

    // === Vector expressions ===
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

    // === Aggregate expressions ===
    ExtractValue {
        x: Value,
        indices: Vec<u64>,
    },
    InsertValue {
        x: Value,
        elem: Value,
        indices: Vec<u64>,
    },

    GetElementPtr {
        elem_ty: TypeRef,
        src: Value,
        indices: Vec<Value>,
        in_bounds: bool,
    },

    Conversion {
        op: ConvOp,
        from: Value,
        to: TypeRef,
    },

    // === Other expressions ===
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
    Select {
        cond: Value,
        x: Value,
        y: Value,
    },
}

impl ConstExpr {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstExpr::Unary { op, .. } => op.keyword(),
            ConstExpr::Binary { op, .. } => op.keyword(),
            ConstExpr::Bitwise { op, .. } => op.keyword(),
            ConstExpr::ExtractElement { .. } => "extractelement",
            ConstExpr::InsertElement { .. } => "insertelement",
            ConstExpr::ShuffleVector { .. } => "shufflevector",
            ConstExpr::ExtractValue { .. } => "extractvalue",
            ConstExpr::InsertValue { .. } => "insertvalue",
            ConstExpr::GetElementPtr { .. } => "getelementptr",
            ConstExpr::Conversion { op, .. } => op.keyword(),
            ConstExpr::ICmp { .. } => "icmp",
            ConstExpr::FCmp { .. } => "fcmp",
            ConstExpr::Select { .. } => "select",
        }
    }
}
