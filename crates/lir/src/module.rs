//! Module-level items: globals, functions, aliases, ifuncs, parameters,
//! blocks and use-list-order records.

use smallvec::SmallVec;

use crate::ident::Ident;
use crate::refs::*;

/// Data for a module: ordered lists of its top-level items.
#[derive(Clone, Debug, Default)]
pub struct ModuleData {
    pub source_filename: Option<String>,
    /// Raw `target datalayout` string, if any.
    pub data_layout: Option<String>,
    pub target_triple: Option<String>,
    pub globals: Vec<GlobalRef>,
    pub funcs: Vec<FuncRef>,
    pub aliases: Vec<AliasRef>,
    pub ifuncs: Vec<IFuncRef>,
    pub use_list_orders: Vec<UseListOrderRef>,
    pub use_list_order_bbs: Vec<UseListOrderBbRef>,
    pub named_metadata: Vec<NamedMetadataRef>,
}

/// A global variable. Declarations have no initializer.
#[derive(Clone, Debug)]
pub struct GlobalData {
    pub name: String,
    pub content_ty: TypeRef,
    /// `constant` rather than `global`.
    pub immutable: bool,
    pub init: Option<Value>,
}

/// A function declaration or definition.
///
/// A function without blocks is a declaration.
#[derive(Clone, Debug)]
pub struct FuncData {
    pub name: String,
    pub func_ty: TypeRef,
    pub params: SmallVec<[ParamRef; 4]>,
    pub blocks: Vec<BlockRef>,
    pub prefix: Option<Value>,
    pub prologue: Option<Value>,
    pub personality: Option<Value>,
    pub use_list_orders: Vec<UseListOrderRef>,
}

impl FuncData {
    pub fn new(name: impl Into<String>, func_ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            func_ty,
            params: SmallVec::new(),
            blocks: Vec::new(),
            prefix: None,
            prologue: None,
            personality: None,
            use_list_orders: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParamData {
    pub ty: TypeRef,
    pub ident: Ident,
    pub parent_func: Option<FuncRef>,
}

/// A basic block: instructions in order, then an optional terminator.
#[derive(Clone, Debug, Default)]
pub struct BlockData {
    pub ident: Ident,
    pub insts: SmallVec<[InstRef; 8]>,
    pub term: Option<TermRef>,
    pub parent_func: Option<FuncRef>,
}

/// An alias of another global value.
#[derive(Clone, Debug)]
pub struct AliasData {
    pub name: String,
    pub content_ty: TypeRef,
    pub aliasee: Value,
}

/// An indirect function, resolved at load time.
#[derive(Clone, Debug)]
pub struct IFuncData {
    pub name: String,
    pub content_ty: TypeRef,
    pub resolver: Value,
}

/// `uselistorder <ty> <value>, { indices }`
#[derive(Clone, Debug)]
pub struct UseListOrderData {
    pub value: Value,
    pub indices: Vec<u64>,
}

/// `uselistorder_bb @func, %block, { indices }`
#[derive(Clone, Debug)]
pub struct UseListOrderBbData {
    pub func: Value,
    pub block: Value,
    pub indices: Vec<u64>,
}
