//! IrContext: arena-based mutable IR storage.
//!
//! Every module item, block, instruction, terminator, constant and metadata
//! node lives in a `PrimaryMap` owned by `IrContext` and is addressed by its
//! entity ref. Operand slots hold `Value`s, so the graph may contain cycles
//! (blocks branching backwards, self-referential debug scopes) without any
//! ownership trouble.

use cranelift_entity::{PrimaryMap, SecondaryMap};
use tracing::debug;

use crate::constant::{ConstData, ConstExpr};
use crate::ident::{IdError, Ident};
use crate::inst::{InstData, InstKind};
use crate::metadata::{MetadataData, NamedMetadataData};
use crate::module::*;
use crate::refs::*;
use crate::term::{TermData, TermKind};
use crate::types::{TypeData, TypeInterner};

// ============================================================================
// IrContext
// ============================================================================

/// Arena-based mutable IR context.
///
/// Owns all IR entities and provides methods for creating, querying,
/// and mutating them.
pub struct IrContext {
    modules: PrimaryMap<ModuleRef, ModuleData>,
    globals: PrimaryMap<GlobalRef, GlobalData>,
    funcs: PrimaryMap<FuncRef, FuncData>,
    aliases: PrimaryMap<AliasRef, AliasData>,
    ifuncs: PrimaryMap<IFuncRef, IFuncData>,
    params: PrimaryMap<ParamRef, ParamData>,
    blocks: PrimaryMap<BlockRef, BlockData>,
    insts: PrimaryMap<InstRef, InstData>,
    terms: PrimaryMap<TermRef, TermData>,
    consts: PrimaryMap<ConstRef, ConstData>,
    metadata: PrimaryMap<MetadataRef, MetadataData>,
    named_metadata: PrimaryMap<NamedMetadataRef, NamedMetadataData>,
    use_list_orders: PrimaryMap<UseListOrderRef, UseListOrderData>,
    use_list_order_bbs: PrimaryMap<UseListOrderBbRef, UseListOrderBbData>,

    /// Type of each constant, computed once at creation.
    const_tys: SecondaryMap<ConstRef, TypeRef>,

    pub types: TypeInterner,

    void_ty: TypeRef,
    label_ty: TypeRef,
    token_ty: TypeRef,
    metadata_ty: TypeRef,
    ptr_ty: TypeRef,
}

impl IrContext {
    /// Create a new empty IR context.
    pub fn new() -> Self {
        let mut types = TypeInterner::new();
        let void_ty = types.void();
        let label_ty = types.label();
        let token_ty = types.token();
        let metadata_ty = types.metadata();
        let ptr_ty = types.ptr(0);
        Self {
            modules: PrimaryMap::new(),
            globals: PrimaryMap::new(),
            funcs: PrimaryMap::new(),
            aliases: PrimaryMap::new(),
            ifuncs: PrimaryMap::new(),
            params: PrimaryMap::new(),
            blocks: PrimaryMap::new(),
            insts: PrimaryMap::new(),
            terms: PrimaryMap::new(),
            consts: PrimaryMap::new(),
            metadata: PrimaryMap::new(),
            named_metadata: PrimaryMap::new(),
            use_list_orders: PrimaryMap::new(),
            use_list_order_bbs: PrimaryMap::new(),
            const_tys: SecondaryMap::with_default(void_ty),
            types,
            void_ty,
            label_ty,
            token_ty,
            metadata_ty,
            ptr_ty,
        }
    }

    // ========================================================================
    // Module items
    // ========================================================================

    pub fn create_module(&mut self, data: ModuleData) -> ModuleRef {
        self.modules.push(data)
    }

    pub fn module(&self, m: ModuleRef) -> &ModuleData {
        &self.modules[m]
    }

    pub fn create_global(&mut self, data: GlobalData) -> GlobalRef {
        self.globals.push(data)
    }

    pub fn global(&self, g: GlobalRef) -> &GlobalData {
        &self.globals[g]
    }

    /// Create a function, back-linking its parameters and blocks.
    ///
    /// # Panics
    ///
    /// Panics if any parameter or block already belongs to another function.
    pub fn create_func(&mut self, data: FuncData) -> FuncRef {
        let params = data.params.clone();
        let blocks = data.blocks.clone();
        let func = self.funcs.push(data);
        for p in params {
            if let Some(existing) = self.params[p].parent_func {
                panic!(
                    "create_func: param {p} already belongs to function {existing}; \
                     cannot reassign to {func}",
                );
            }
            self.params[p].parent_func = Some(func);
        }
        for b in blocks {
            self.attach_block(func, b);
        }
        func
    }

    pub fn func(&self, f: FuncRef) -> &FuncData {
        &self.funcs[f]
    }

    /// Append a block to the end of a function body.
    ///
    /// # Panics
    ///
    /// Panics if the block already belongs to a function.
    pub fn push_block(&mut self, func: FuncRef, block: BlockRef) {
        self.attach_block(func, block);
        self.funcs[func].blocks.push(block);
    }

    fn attach_block(&mut self, func: FuncRef, block: BlockRef) {
        if let Some(existing) = self.blocks[block].parent_func {
            panic!(
                "block {block} already belongs to function {existing}; \
                 cannot reassign to {func}",
            );
        }
        self.blocks[block].parent_func = Some(func);
    }

    pub fn create_alias(&mut self, data: AliasData) -> AliasRef {
        self.aliases.push(data)
    }

    pub fn alias(&self, a: AliasRef) -> &AliasData {
        &self.aliases[a]
    }

    pub fn create_ifunc(&mut self, data: IFuncData) -> IFuncRef {
        self.ifuncs.push(data)
    }

    pub fn ifunc(&self, i: IFuncRef) -> &IFuncData {
        &self.ifuncs[i]
    }

    pub fn create_use_list_order(&mut self, data: UseListOrderData) -> UseListOrderRef {
        self.use_list_orders.push(data)
    }

    pub fn use_list_order(&self, u: UseListOrderRef) -> &UseListOrderData {
        &self.use_list_orders[u]
    }

    pub fn create_use_list_order_bb(&mut self, data: UseListOrderBbData) -> UseListOrderBbRef {
        self.use_list_order_bbs.push(data)
    }

    pub fn use_list_order_bb(&self, u: UseListOrderBbRef) -> &UseListOrderBbData {
        &self.use_list_order_bbs[u]
    }

    // ========================================================================
    // Parameters and blocks
    // ========================================================================

    pub fn create_param(&mut self, ty: TypeRef, ident: Ident) -> ParamRef {
        self.params.push(ParamData {
            ty,
            ident,
            parent_func: None,
        })
    }

    pub fn param(&self, p: ParamRef) -> &ParamData {
        &self.params[p]
    }

    pub fn create_block(&mut self, ident: Ident) -> BlockRef {
        self.blocks.push(BlockData {
            ident,
            ..BlockData::default()
        })
    }

    pub fn block(&self, b: BlockRef) -> &BlockData {
        &self.blocks[b]
    }

    pub fn block_mut(&mut self, b: BlockRef) -> &mut BlockData {
        &mut self.blocks[b]
    }

    // ========================================================================
    // Instructions
    // ========================================================================

    /// Create a detached instruction, computing its result type from its
    /// operands. Use `push_inst` to attach it to a block.
    pub fn create_inst(&mut self, kind: InstKind, ident: Ident) -> InstRef {
        let ty = self.inst_result_ty(&kind);
        self.insts.push(InstData {
            kind,
            ty,
            ident,
            parent_block: None,
        })
    }

    pub fn inst(&self, i: InstRef) -> &InstData {
        &self.insts[i]
    }

    /// Get mutable reference to instruction data.
    ///
    /// Operand rewrites through this reference do not update the cached
    /// result type; call [`recompute_inst_ty`](Self::recompute_inst_ty)
    /// afterwards.
    pub fn inst_mut(&mut self, i: InstRef) -> &mut InstData {
        &mut self.insts[i]
    }

    /// Recompute the cached result type of `inst` from its current operands.
    /// Returns whether the type changed.
    ///
    /// # Panics
    ///
    /// Panics if the operands no longer have the shape the opcode needs
    /// (e.g. `extractelement` on a non-vector).
    pub fn recompute_inst_ty(&mut self, inst: InstRef) -> bool {
        let kind = self.insts[inst].kind.clone();
        let ty = self.inst_result_ty(&kind);
        let old = std::mem::replace(&mut self.insts[inst].ty, ty);
        old != ty
    }

    /// Append an instruction to the end of a block.
    ///
    /// # Panics
    ///
    /// Panics if the instruction already belongs to a block.
    pub fn push_inst(&mut self, block: BlockRef, inst: InstRef) {
        if let Some(existing) = self.insts[inst].parent_block {
            panic!(
                "push_inst: instruction {inst} already belongs to block {existing}; \
                 remove it from the old block first",
            );
        }
        self.insts[inst].parent_block = Some(block);
        self.blocks[block].insts.push(inst);
    }

    /// Insert an instruction before `before` in the given block.
    ///
    /// # Panics
    ///
    /// Panics if the instruction already belongs to a block, or if `before`
    /// is not found in the block.
    pub fn insert_inst_before(&mut self, block: BlockRef, before: InstRef, inst: InstRef) {
        if let Some(existing) = self.insts[inst].parent_block {
            panic!(
                "insert_inst_before: instruction {inst} already belongs to block {existing}; \
                 remove it from the old block first",
            );
        }
        let insts = &mut self.blocks[block].insts;
        let Some(pos) = insts.iter().position(|&i| i == before) else {
            panic!("insert_inst_before: {before} not found in block {block}");
        };
        insts.insert(pos, inst);
        self.insts[inst].parent_block = Some(block);
    }

    /// Remove an instruction from a block (does not destroy the instruction).
    pub fn remove_inst_from_block(&mut self, block: BlockRef, inst: InstRef) {
        self.blocks[block].insts.retain(|i| *i != inst);
        if self.insts[inst].parent_block == Some(block) {
            self.insts[inst].parent_block = None;
        }
    }

    // ========================================================================
    // Terminators
    // ========================================================================

    pub fn create_term(&mut self, kind: TermKind, ident: Ident) -> TermRef {
        let ty = match &kind {
            TermKind::Invoke { func_ty, .. } | TermKind::CallBr { func_ty, .. } => {
                self.func_ret_ty(*func_ty)
            }
            TermKind::CatchSwitch { .. } => self.token_ty,
            _ => self.void_ty,
        };
        self.terms.push(TermData {
            kind,
            ty,
            ident,
            parent_block: None,
        })
    }

    pub fn term(&self, t: TermRef) -> &TermData {
        &self.terms[t]
    }

    pub fn term_mut(&mut self, t: TermRef) -> &mut TermData {
        &mut self.terms[t]
    }

    /// Set the terminator of a block, detaching any previous one.
    ///
    /// # Panics
    ///
    /// Panics if the terminator already belongs to another block.
    pub fn set_term(&mut self, block: BlockRef, term: TermRef) {
        let attached = self.terms[term].parent_block;
        if let Some(existing) = attached.filter(|&b| b != block) {
            panic!(
                "set_term: terminator {term} already belongs to block {existing}; \
                 cannot reassign to {block}",
            );
        }
        if let Some(old) = self.blocks[block].term.replace(term) {
            self.terms[old].parent_block = None;
        }
        self.terms[term].parent_block = Some(block);
    }

    // ========================================================================
    // Constants and metadata
    // ========================================================================

    pub fn create_const(&mut self, data: ConstData) -> ConstRef {
        let ty = self.const_ty_of(&data);
        let c = self.consts.push(data);
        self.const_tys[c] = ty;
        c
    }

    pub fn constant(&self, c: ConstRef) -> &ConstData {
        &self.consts[c]
    }

    /// Shorthand for an integer literal of the given type.
    pub fn const_int(&mut self, ty: TypeRef, value: i128) -> ConstRef {
        self.create_const(ConstData::Int { ty, value })
    }

    pub fn create_metadata(&mut self, data: MetadataData) -> MetadataRef {
        self.metadata.push(data)
    }

    pub fn metadata(&self, m: MetadataRef) -> &MetadataData {
        &self.metadata[m]
    }

    pub fn metadata_mut(&mut self, m: MetadataRef) -> &mut MetadataData {
        &mut self.metadata[m]
    }

    /// Iterate over every metadata node in creation order.
    pub fn metadata_nodes(&self) -> impl Iterator<Item = (MetadataRef, &MetadataData)> {
        self.metadata.iter()
    }

    pub fn create_named_metadata(&mut self, data: NamedMetadataData) -> NamedMetadataRef {
        self.named_metadata.push(data)
    }

    pub fn named_metadata(&self, n: NamedMetadataRef) -> &NamedMetadataData {
        &self.named_metadata[n]
    }

    // ========================================================================
    // Value types
    // ========================================================================

    /// Get the type of a value.
    pub fn value_ty(&self, v: Value) -> TypeRef {
        match v {
            Value::Const(c) => self.const_tys[c],
            Value::Global(_) | Value::Func(_) | Value::Alias(_) | Value::IFunc(_) => self.ptr_ty,
            Value::Param(p) => self.params[p].ty,
            Value::Block(_) => self.label_ty,
            Value::Inst(i) => self.insts[i].ty,
            Value::Term(t) => self.terms[t].ty,
            Value::Metadata(_) => self.metadata_ty,
        }
    }

    /// Identifier of a local value (parameter, block, instruction or
    /// terminator), or `None` for global and constant values.
    pub fn local_ident(&self, v: Value) -> Option<&Ident> {
        match v {
            Value::Param(p) => Some(&self.params[p].ident),
            Value::Block(b) => Some(&self.blocks[b].ident),
            Value::Inst(i) => Some(&self.insts[i].ident),
            Value::Term(t) => Some(&self.terms[t].ident),
            _ => None,
        }
    }

    /// Name of a global value (`@name`), or `None` for anything else.
    pub fn global_name(&self, v: Value) -> Option<&str> {
        match v {
            Value::Global(g) => Some(&self.globals[g].name),
            Value::Func(f) => Some(&self.funcs[f].name),
            Value::Alias(a) => Some(&self.aliases[a].name),
            Value::IFunc(i) => Some(&self.ifuncs[i].name),
            _ => None,
        }
    }

    fn func_ret_ty(&self, func_ty: TypeRef) -> TypeRef {
        match self.types.get(func_ty) {
            TypeData::Func { ret, .. } => *ret,
            _ => panic!(
                "expected a function type, found `{}`",
                self.types.display(func_ty)
            ),
        }
    }

    fn vector_elem_ty(&self, ty: TypeRef) -> TypeRef {
        match self.types.get(ty) {
            TypeData::Vector { elem, .. } => *elem,
            _ => panic!("expected a vector type, found `{}`", self.types.display(ty)),
        }
    }

    fn aggregate_elem_ty(&self, mut ty: TypeRef, indices: &[u64]) -> TypeRef {
        for &idx in indices {
            ty = match self.types.get(ty) {
                TypeData::Array { elem, .. } | TypeData::Vector { elem, .. } => *elem,
                TypeData::Struct { fields, .. } => match fields.get(idx as usize) {
                    Some(field) => *field,
                    None => panic!(
                        "index {idx} out of range for `{}`",
                        self.types.display(ty)
                    ),
                },
                _ => panic!(
                    "expected an aggregate type, found `{}`",
                    self.types.display(ty)
                ),
            };
        }
        ty
    }

    /// `i1`, or a vector of `i1` matching the length of a vector operand.
    fn cmp_result_ty(&mut self, operand: Value) -> TypeRef {
        let bool_ty = self.types.int(1);
        let (len, scalable) = match self.types.get(self.value_ty(operand)) {
            TypeData::Vector { len, scalable, .. } => (*len, *scalable),
            _ => return bool_ty,
        };
        self.types.intern(TypeData::Vector {
            len,
            elem: bool_ty,
            scalable,
        })
    }

    fn shuffle_result_ty(&mut self, x: Value, mask: Value) -> TypeRef {
        let elem = self.vector_elem_ty(self.value_ty(x));
        let (len, scalable) = match self.types.get(self.value_ty(mask)) {
            TypeData::Vector { len, scalable, .. } => (*len, *scalable),
            _ => panic!("shufflevector: mask is not a vector"),
        };
        self.types.intern(TypeData::Vector {
            len,
            elem,
            scalable,
        })
    }

    fn inst_result_ty(&mut self, kind: &InstKind) -> TypeRef {
        match kind {
            InstKind::Unary { x, .. }
            | InstKind::Binary { x, .. }
            | InstKind::Bitwise { x, .. }
            | InstKind::InsertElement { x, .. }
            | InstKind::InsertValue { x, .. }
            | InstKind::AtomicRmw { x, .. }
            | InstKind::Select { x, .. } => self.value_ty(*x),
            InstKind::ExtractElement { x, .. } => self.vector_elem_ty(self.value_ty(*x)),
            InstKind::ShuffleVector { x, mask, .. } => self.shuffle_result_ty(*x, *mask),
            InstKind::ExtractValue { x, indices } => {
                self.aggregate_elem_ty(self.value_ty(*x), indices)
            }
            InstKind::Alloca { addr_space, .. } => self.types.ptr(*addr_space),
            InstKind::Load { elem_ty, .. } => *elem_ty,
            InstKind::Store { .. } | InstKind::Fence { .. } | InstKind::Comment { .. } => {
                self.void_ty
            }
            InstKind::CmpXchg { cmp, .. } => {
                let cmp_ty = self.value_ty(*cmp);
                let bool_ty = self.types.int(1);
                self.types.intern(TypeData::Struct {
                    fields: [cmp_ty, bool_ty].into_iter().collect(),
                    packed: false,
                })
            }
            InstKind::GetElementPtr { src, .. } => self.value_ty(*src),
            InstKind::Conversion { to, .. } => *to,
            InstKind::ICmp { x, .. } | InstKind::FCmp { x, .. } => self.cmp_result_ty(*x),
            InstKind::Phi { ty, .. } | InstKind::VaArg { ty, .. } => *ty,
            InstKind::LandingPad { ty, .. } => *ty,
            InstKind::Call { func_ty, .. } => self.func_ret_ty(*func_ty),
            InstKind::CatchPad { .. } | InstKind::CleanupPad { .. } => self.token_ty,
        }
    }

    fn const_ty_of(&mut self, data: &ConstData) -> TypeRef {
        match data {
            ConstData::Int { ty, .. }
            | ConstData::Float { ty, .. }
            | ConstData::Null { ty }
            | ConstData::Struct { ty, .. }
            | ConstData::Array { ty, .. }
            | ConstData::CharArray { ty, .. }
            | ConstData::Vector { ty, .. }
            | ConstData::ZeroInitializer { ty }
            | ConstData::Undef { ty } => *ty,
            ConstData::NoneToken => self.token_ty,
            ConstData::BlockAddress { .. } => self.ptr_ty,
            ConstData::Expr(expr) => match expr {
                ConstExpr::Unary { x, .. }
                | ConstExpr::Binary { x, .. }
                | ConstExpr::Bitwise { x, .. }
                | ConstExpr::InsertElement { x, .. }
                | ConstExpr::InsertValue { x, .. }
                | ConstExpr::Select { x, .. } => self.value_ty(*x),
                ConstExpr::ExtractElement { x, .. } => self.vector_elem_ty(self.value_ty(*x)),
                ConstExpr::ShuffleVector { x, mask, .. } => self.shuffle_result_ty(*x, *mask),
                ConstExpr::ExtractValue { x, indices } => {
                    self.aggregate_elem_ty(self.value_ty(*x), indices)
                }
                ConstExpr::GetElementPtr { src, .. } => self.value_ty(*src),
                ConstExpr::Conversion { to, .. } => *to,
                ConstExpr::ICmp { x, .. } | ConstExpr::FCmp { x, .. } => self.cmp_result_ty(*x),
            },
        }
    }

    // ========================================================================
    // Local identifiers
    // ========================================================================

    /// Assign consecutive IDs to the unnamed local values of a function.
    ///
    /// Parameters come first, then for each block its label followed by its
    /// value-producing instructions and terminator. Values that already carry
    /// an ID must carry exactly the ID they would be assigned.
    pub fn assign_ids(&mut self, func: FuncRef) -> Result<(), IdError> {
        let mut next = 0u32;
        let name = self.funcs[func].name.clone();
        let mut assign = |ident: &mut Ident| -> Result<(), IdError> {
            if !ident.is_unnamed() {
                return Ok(());
            }
            match ident.id {
                Some(found) if found != next => {
                    return Err(IdError::OutOfOrder {
                        func: name.clone(),
                        expected: next,
                        found,
                    });
                }
                _ => ident.id = Some(next),
            }
            next += 1;
            Ok(())
        };

        for &p in &self.funcs[func].params {
            assign(&mut self.params[p].ident)?;
        }
        for &b in &self.funcs[func].blocks {
            let block = &mut self.blocks[b];
            assign(&mut block.ident)?;
            for &i in &block.insts {
                let inst = &mut self.insts[i];
                if !self.types.is_void(inst.ty) {
                    assign(&mut inst.ident)?;
                }
            }
            if let Some(t) = block.term {
                let term = &mut self.terms[t];
                if !self.types.is_void(term.ty) {
                    assign(&mut term.ident)?;
                }
            }
        }
        debug!(func = %self.funcs[func].name, count = next, "assigned local IDs");
        Ok(())
    }
}

impl Default for IrContext {
    fn default() -> Self {
        Self::new()
    }
}
