//! Entity references for the arena IR.
//!
//! Each ref type is a thin `u32` wrapper providing type-safe indexing
//! into `PrimaryMap` storage in `IrContext`.

use cranelift_entity::entity_impl;
use std::fmt;

/// Reference to a module.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleRef(u32);
entity_impl!(ModuleRef, "module");

/// Reference to a global variable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalRef(u32);
entity_impl!(GlobalRef, "global");

/// Reference to a function (declaration or definition).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncRef(u32);
entity_impl!(FuncRef, "func");

/// Reference to an alias.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AliasRef(u32);
entity_impl!(AliasRef, "alias");

/// Reference to an indirect function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IFuncRef(u32);
entity_impl!(IFuncRef, "ifunc");

/// Reference to a function parameter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamRef(u32);
entity_impl!(ParamRef, "param");

/// Reference to a basic block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockRef(u32);
entity_impl!(BlockRef, "block");

/// Reference to a non-terminator instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstRef(u32);
entity_impl!(InstRef, "inst");

/// Reference to a block terminator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermRef(u32);
entity_impl!(TermRef, "term");

/// Reference to a constant (including constant expressions).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstRef(u32);
entity_impl!(ConstRef, "const");

/// Reference to a metadata node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetadataRef(u32);
entity_impl!(MetadataRef, "md");

/// Reference to a named metadata definition (`!name = !{...}`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedMetadataRef(u32);
entity_impl!(NamedMetadataRef, "named_md");

/// Reference to a use-list-order record for a value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UseListOrderRef(u32);
entity_impl!(UseListOrderRef, "uselistorder");

/// Reference to a use-list-order record for a basic block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UseListOrderBbRef(u32);
entity_impl!(UseListOrderBbRef, "uselistorder_bb");

/// Reference to an interned type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(u32);
entity_impl!(TypeRef, "ty");

/// Anything that can occupy an operand slot.
///
/// Branch targets are stored as `Value::Block`, so every operand slot has
/// the same type and a slot rewrite never needs a type check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Const(ConstRef),
    Global(GlobalRef),
    Func(FuncRef),
    Alias(AliasRef),
    IFunc(IFuncRef),
    Param(ParamRef),
    Block(BlockRef),
    /// Result of a value-producing instruction.
    Inst(InstRef),
    /// Result of a value-producing terminator (invoke, callbr, catchswitch).
    Term(TermRef),
    /// Metadata used as a value (e.g. an argument of a debug intrinsic).
    Metadata(MetadataRef),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Const(r) => write!(f, "{r}"),
            Value::Global(r) => write!(f, "{r}"),
            Value::Func(r) => write!(f, "{r}"),
            Value::Alias(r) => write!(f, "{r}"),
            Value::IFunc(r) => write!(f, "{r}"),
            Value::Param(r) => write!(f, "{r}"),
            Value::Block(r) => write!(f, "{r}"),
            Value::Inst(r) => write!(f, "{r}"),
            Value::Term(r) => write!(f, "{r}"),
            Value::Metadata(r) => write!(f, "{r}"),
        }
    }
}

impl From<ConstRef> for Value {
    fn from(r: ConstRef) -> Self {
        Value::Const(r)
    }
}

impl From<GlobalRef> for Value {
    fn from(r: GlobalRef) -> Self {
        Value::Global(r)
    }
}

impl From<FuncRef> for Value {
    fn from(r: FuncRef) -> Self {
        Value::Func(r)
    }
}

impl From<AliasRef> for Value {
    fn from(r: AliasRef) -> Self {
        Value::Alias(r)
    }
}

impl From<IFuncRef> for Value {
    fn from(r: IFuncRef) -> Self {
        Value::IFunc(r)
    }
}

impl From<ParamRef> for Value {
    fn from(r: ParamRef) -> Self {
        Value::Param(r)
    }
}

impl From<BlockRef> for Value {
    fn from(r: BlockRef) -> Self {
        Value::Block(r)
    }
}

impl From<InstRef> for Value {
    fn from(r: InstRef) -> Self {
        Value::Inst(r)
    }
}

impl From<TermRef> for Value {
    fn from(r: TermRef) -> Self {
        Value::Term(r)
    }
}

impl From<MetadataRef> for Value {
    fn from(r: MetadataRef) -> Self {
        Value::Metadata(r)
    }
}
