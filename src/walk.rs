//! Depth-first traversal over every node reachable from a root.
//!
//! Each node is reported to the callback at most once per walk, even when it
//! is reachable along several paths or sits on a reference cycle (a loop
//! back-edge, a debug scope pointing at its own subprogram). The callback
//! decides per node whether to descend:
//!
//! - `Continue(WalkAction::Advance)` descends into the node's children.
//! - `Continue(WalkAction::Skip)` leaves the children alone; other paths into
//!   them are unaffected.
//! - `Break(b)` stops the whole walk and returns `Break(b)`.
//!
//! Operands of instructions and terminators are enumerated by the same
//! functions that build the use index, so both always cover the same slots.

use std::collections::HashSet;
use std::ops::ControlFlow;

use lir::{
    AliasRef, BlockRef, ConstData, ConstExpr, ConstRef, FuncRef, GlobalRef, IFuncRef, InstRef,
    IrContext, MetadataData, MetadataRef, ModuleRef, NamedMetadataRef, ParamRef, TermRef,
    UseListOrderBbRef, UseListOrderRef, Value,
};
use smallvec::SmallVec;
use tracing::debug;

use crate::uses::{each_inst_operand, each_term_operand};

/// Controls whether to descend into children during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Continue walking and descend into the node's children.
    Advance,
    /// Skip the children of the current node.
    Skip,
}

/// Any walkable entity, identified by its arena index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Module(ModuleRef),
    Global(GlobalRef),
    Func(FuncRef),
    Alias(AliasRef),
    IFunc(IFuncRef),
    Param(ParamRef),
    Block(BlockRef),
    Inst(InstRef),
    Term(TermRef),
    Const(ConstRef),
    Metadata(MetadataRef),
    NamedMetadata(NamedMetadataRef),
    UseListOrder(UseListOrderRef),
    UseListOrderBb(UseListOrderBbRef),
}

impl From<Value> for Node {
    fn from(v: Value) -> Self {
        match v {
            Value::Const(c) => Node::Const(c),
            Value::Global(g) => Node::Global(g),
            Value::Func(f) => Node::Func(f),
            Value::Alias(a) => Node::Alias(a),
            Value::IFunc(i) => Node::IFunc(i),
            Value::Param(p) => Node::Param(p),
            Value::Block(b) => Node::Block(b),
            Value::Inst(i) => Node::Inst(i),
            Value::Term(t) => Node::Term(t),
            Value::Metadata(m) => Node::Metadata(m),
        }
    }
}

macro_rules! node_from_ref {
    ($($ref:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ref> for Node {
                fn from(r: $ref) -> Self {
                    Node::$variant(r)
                }
            }
        )*
    };
}

node_from_ref! {
    ModuleRef => Module,
    GlobalRef => Global,
    FuncRef => Func,
    AliasRef => Alias,
    IFuncRef => IFunc,
    ParamRef => Param,
    BlockRef => Block,
    InstRef => Inst,
    TermRef => Term,
    ConstRef => Const,
    MetadataRef => Metadata,
    NamedMetadataRef => NamedMetadata,
    UseListOrderRef => UseListOrder,
    UseListOrderBbRef => UseListOrderBb,
}

// ============================================================================
// Public API
// ============================================================================

/// Walk every node reachable from `root`, depth-first, root included.
pub fn walk<B>(
    ctx: &IrContext,
    root: impl Into<Node>,
    f: &mut dyn FnMut(Node) -> ControlFlow<B, WalkAction>,
) -> ControlFlow<B, ()> {
    let root = root.into();
    debug!(?root, "walk started");
    let mut walker = Walker {
        ctx,
        visited: HashSet::new(),
        pending: Vec::new(),
        f,
    };
    let result = walker.run(root);
    debug!(
        ?root,
        visited = walker.visited.len(),
        stopped = result.is_break(),
        "walk finished"
    );
    result
}

/// Every node reachable from `root`, in visit order.
pub fn walk_nodes(ctx: &IrContext, root: impl Into<Node>) -> Vec<Node> {
    let mut nodes = Vec::new();
    let _ = walk::<()>(ctx, root, &mut |node| {
        nodes.push(node);
        ControlFlow::Continue(WalkAction::Advance)
    });
    nodes
}

// ============================================================================
// Walker
// ============================================================================

type Children = SmallVec<[Node; 8]>;

struct Walker<'a, 'f, B> {
    ctx: &'a IrContext,
    visited: HashSet<Node>,
    /// Nodes waiting to be visited; the next one is on top.
    pending: Vec<Node>,
    f: &'f mut dyn FnMut(Node) -> ControlFlow<B, WalkAction>,
}

impl<B> Walker<'_, '_, B> {
    fn run(&mut self, root: Node) -> ControlFlow<B, ()> {
        self.pending.push(root);
        let mut children = Children::new();
        while let Some(node) = self.pending.pop() {
            if !self.visited.insert(node) {
                continue;
            }
            if (self.f)(node)? == WalkAction::Skip {
                continue;
            }
            children.clear();
            self.children(node, &mut children);
            // Reversed so the first child is visited first.
            let visited = &self.visited;
            self.pending.extend(
                children
                    .iter()
                    .rev()
                    .copied()
                    .filter(|c| !visited.contains(c)),
            );
        }
        ControlFlow::Continue(())
    }

    fn children(&self, node: Node, out: &mut Children) {
        let ctx = self.ctx;
        match node {
            Node::Module(m) => module(ctx, m, out),
            Node::Global(_)
            | Node::Func(_)
            | Node::Alias(_)
            | Node::IFunc(_)
            | Node::Param(_)
            | Node::Block(_) => named(ctx, node, out),
            Node::Inst(i) => each_inst_operand(&ctx.inst(i).kind, |_, v| out.push(v.into())),
            Node::Term(t) => each_term_operand(&ctx.term(t).kind, |_, v| out.push(v.into())),
            Node::Const(c) => constant(ctx, c, out),
            Node::Metadata(m) => metadata(ctx, m, out),
            Node::NamedMetadata(n) => {
                out.extend(ctx.named_metadata(n).nodes.iter().map(|&m| Node::Metadata(m)))
            }
            Node::UseListOrder(u) => out.push(ctx.use_list_order(u).value.into()),
            Node::UseListOrderBb(u) => {
                let order = ctx.use_list_order_bb(u);
                values(out, &[order.func, order.block]);
            }
        }
    }
}

fn values(out: &mut Children, vs: &[Value]) {
    out.extend(vs.iter().map(|&v| Node::from(v)));
}

fn opt_value(out: &mut Children, v: Option<Value>) {
    out.extend(v.map(Node::from));
}

fn module(ctx: &IrContext, m: ModuleRef, out: &mut Children) {
    let data = ctx.module(m);
    out.extend(data.globals.iter().map(|&g| Node::Global(g)));
    out.extend(data.funcs.iter().map(|&f| Node::Func(f)));
    out.extend(data.aliases.iter().map(|&a| Node::Alias(a)));
    out.extend(data.ifuncs.iter().map(|&i| Node::IFunc(i)));
    out.extend(data.use_list_orders.iter().map(|&u| Node::UseListOrder(u)));
    out.extend(data.use_list_order_bbs.iter().map(|&u| Node::UseListOrderBb(u)));
    out.extend(data.named_metadata.iter().map(|&n| Node::NamedMetadata(n)));
}

/// Globals, functions, aliases, ifuncs, parameters and blocks.
fn named(ctx: &IrContext, node: Node, out: &mut Children) {
    match node {
        Node::Global(g) => opt_value(out, ctx.global(g).init),
        Node::Func(f) => {
            let data = ctx.func(f);
            out.extend(data.params.iter().map(|&p| Node::Param(p)));
            out.extend(data.blocks.iter().map(|&b| Node::Block(b)));
            opt_value(out, data.prefix);
            opt_value(out, data.prologue);
            opt_value(out, data.personality);
            out.extend(data.use_list_orders.iter().map(|&u| Node::UseListOrder(u)));
        }
        Node::Alias(a) => out.push(ctx.alias(a).aliasee.into()),
        Node::IFunc(i) => out.push(ctx.ifunc(i).resolver.into()),
        Node::Param(_) => {}
        Node::Block(b) => {
            let data = ctx.block(b);
            out.extend(data.insts.iter().map(|&i| Node::Inst(i)));
            // Partially built blocks may not have a terminator yet.
            out.extend(data.term.map(Node::Term));
        }
        _ => unreachable!("{node:?} is not a named value"),
    }
}

fn constant(ctx: &IrContext, c: ConstRef, out: &mut Children) {
    match ctx.constant(c) {
        ConstData::Int { .. }
        | ConstData::Float { .. }
        | ConstData::Null { .. }
        | ConstData::NoneToken
        | ConstData::CharArray { .. }
        | ConstData::ZeroInitializer { .. }
        | ConstData::Undef { .. } => {}
        ConstData::Struct { fields, .. } => values(out, fields),
        ConstData::Array { elems, .. } | ConstData::Vector { elems, .. } => values(out, elems),
        ConstData::BlockAddress { func, block } => values(out, &[*func, *block]),
        ConstData::Expr(expr) => const_expr(expr, out),
    }
}

fn const_expr(expr: &ConstExpr, out: &mut Children) {
    match expr {
        ConstExpr::Unary { x, .. } | ConstExpr::ExtractValue { x, .. } => values(out, &[*x]),
        ConstExpr::Binary { x, y, .. }
        | ConstExpr::Bitwise { x, y, .. }
        | ConstExpr::ICmp { x, y, .. }
        | ConstExpr::FCmp { x, y, .. } => values(out, &[*x, *y]),
        ConstExpr::ExtractElement { x, index } => values(out, &[*x, *index]),
        ConstExpr::InsertElement { x, elem, index } => values(out, &[*x, *elem, *index]),
        ConstExpr::ShuffleVector { x, y, mask } => values(out, &[*x, *y, *mask]),
        ConstExpr::InsertValue { x, elem, .. } => values(out, &[*x, *elem]),
        ConstExpr::GetElementPtr { src, indices, .. } => {
            values(out, &[*src]);
            values(out, indices);
        }
        ConstExpr::Conversion { from, .. } => values(out, &[*from]),
        ConstExpr::Select { cond, x, y } => values(out, &[*cond, *x, *y]),
    }
}

fn md_fields(out: &mut Children, fields: &[Option<MetadataRef>]) {
    out.extend(fields.iter().flatten().map(|&m| Node::Metadata(m)));
}

fn metadata(ctx: &IrContext, m: MetadataRef, out: &mut Children) {
    match ctx.metadata(m) {
        MetadataData::Tuple(nodes) => out.extend(nodes.iter().map(|&m| Node::Metadata(m))),
        MetadataData::Value(v) => out.push((*v).into()),
        MetadataData::String(_) | MetadataData::Null => {}

        MetadataData::DIBasicType(_)
        | MetadataData::DIEnumerator(_)
        | MetadataData::DIExpression(_)
        | MetadataData::DIFile(_)
        | MetadataData::DIMacro(_) => {}
        MetadataData::DICommonBlock(n) => md_fields(out, &[n.scope, n.declaration, n.file]),
        MetadataData::DICompileUnit(n) => md_fields(
            out,
            &[
                n.file,
                n.enums,
                n.retained_types,
                n.globals,
                n.imports,
                n.macros,
            ],
        ),
        MetadataData::DICompositeType(n) => md_fields(
            out,
            &[
                n.scope,
                n.file,
                n.base_type,
                n.elements,
                n.vtable_holder,
                n.template_params,
                n.discriminator,
            ],
        ),
        MetadataData::DIDerivedType(n) => {
            md_fields(out, &[n.scope, n.file, n.base_type, n.extra_data])
        }
        MetadataData::DIGlobalVariable(n) => md_fields(
            out,
            &[
                n.scope,
                n.file,
                n.ty,
                n.template_params,
                n.declaration,
            ],
        ),
        MetadataData::DIGlobalVariableExpression(n) => md_fields(out, &[n.var, n.expr]),
        MetadataData::DIImportedEntity(n) => md_fields(out, &[n.scope, n.entity, n.file]),
        MetadataData::DILabel(n) => md_fields(out, &[n.scope, n.file]),
        MetadataData::DILexicalBlock(n) => md_fields(out, &[n.scope, n.file]),
        MetadataData::DILexicalBlockFile(n) => md_fields(out, &[n.scope, n.file]),
        MetadataData::DILocalVariable(n) => md_fields(out, &[n.scope, n.file, n.ty]),
        MetadataData::DILocation(n) => md_fields(out, &[n.scope, n.inlined_at]),
        MetadataData::DIMacroFile(n) => md_fields(out, &[n.file, n.nodes]),
        MetadataData::DIModule(n) => md_fields(out, &[n.scope]),
        MetadataData::DINamespace(n) => md_fields(out, &[n.scope]),
        MetadataData::DIObjCProperty(n) => md_fields(out, &[n.file, n.ty]),
        MetadataData::DISubprogram(n) => md_fields(
            out,
            &[
                n.scope,
                n.file,
                n.ty,
                n.containing_type,
                n.unit,
                n.template_params,
                n.declaration,
                n.retained_nodes,
                n.thrown_types,
            ],
        ),
        MetadataData::DISubrange(n) => md_fields(out, &[n.count]),
        MetadataData::DISubroutineType(n) => md_fields(out, &[n.types]),
        MetadataData::DITemplateTypeParameter(n) => md_fields(out, &[n.ty]),
        MetadataData::DITemplateValueParameter(n) => md_fields(out, &[n.ty, n.value]),
        MetadataData::GenericDINode(n) => {
            out.extend(n.operands.iter().map(|&m| Node::Metadata(m)))
        }
    }
}

#[cfg(test)]
mod tests {
    use lir::metadata::{DIFile, DILexicalBlock, DISubprogram};
    use lir::opcode::BinaryOp;
    use lir::{
        AliasData, FuncData, GlobalData, IFuncData, Ident, InstKind, ModuleData,
        NamedMetadataData, TermKind, TypeRef, UseListOrderBbData, UseListOrderData,
    };

    use super::*;

    fn int_func(ctx: &mut IrContext, name: &str) -> (FuncRef, ParamRef, TypeRef) {
        let i32_ty = ctx.types.int(32);
        let fn_ty = ctx.types.func(i32_ty, [i32_ty], false);
        let x = ctx.create_param(i32_ty, Ident::named("x"));
        let mut data = FuncData::new(name, fn_ty);
        data.params.push(x);
        (ctx.create_func(data), x, i32_ty)
    }

    #[test]
    fn module_walk_is_depth_first_in_item_order() {
        let mut ctx = IrContext::new();
        let (f, x, i32_ty) = int_func(&mut ctx, "f");
        let seven = ctx.const_int(i32_ty, 7);
        let g = ctx.create_global(GlobalData {
            name: "g".to_owned(),
            content_ty: i32_ty,
            immutable: true,
            init: Some(seven.into()),
        });
        let entry = ctx.create_block(Ident::named("entry"));
        ctx.push_block(f, entry);
        let add = ctx.create_inst(InstKind::binary(BinaryOp::Add, x, seven), Ident::unnamed());
        ctx.push_inst(entry, add);
        let ret = ctx.create_term(TermKind::Ret { x: Some(add.into()) }, Ident::unnamed());
        ctx.set_term(entry, ret);
        let m = ctx.create_module(ModuleData {
            globals: vec![g],
            funcs: vec![f],
            ..ModuleData::default()
        });

        assert_eq!(
            walk_nodes(&ctx, m),
            [
                Node::Module(m),
                Node::Global(g),
                Node::Const(seven),
                Node::Func(f),
                Node::Param(x),
                Node::Block(entry),
                Node::Inst(add),
                Node::Term(ret),
            ]
        );
    }

    #[test]
    fn module_items_after_functions() {
        let mut ctx = IrContext::new();
        let void = ctx.types.void();
        let ptr = ctx.types.ptr(0);
        let fn_ty = ctx.types.func(void, [], false);
        let f = ctx.create_func(FuncData::new("f", fn_ty));
        let entry = ctx.create_block(Ident::named("entry"));
        ctx.push_block(f, entry);
        let ret = ctx.create_term(TermKind::Ret { x: None }, Ident::unnamed());
        ctx.set_term(entry, ret);
        let g = ctx.create_global(GlobalData {
            name: "g".to_owned(),
            content_ty: ptr,
            immutable: false,
            init: None,
        });
        let a = ctx.create_alias(AliasData {
            name: "a".to_owned(),
            content_ty: fn_ty,
            aliasee: f.into(),
        });
        let i = ctx.create_ifunc(IFuncData {
            name: "i".to_owned(),
            content_ty: fn_ty,
            resolver: f.into(),
        });
        let order = ctx.create_use_list_order(UseListOrderData {
            value: g.into(),
            indices: vec![1, 0],
        });
        let order_bb = ctx.create_use_list_order_bb(UseListOrderBbData {
            func: f.into(),
            block: entry.into(),
            indices: vec![1, 0],
        });
        // `g` is only reachable through the use-list order.
        let m = ctx.create_module(ModuleData {
            funcs: vec![f],
            aliases: vec![a],
            ifuncs: vec![i],
            use_list_orders: vec![order],
            use_list_order_bbs: vec![order_bb],
            ..ModuleData::default()
        });

        assert_eq!(
            walk_nodes(&ctx, m),
            [
                Node::Module(m),
                Node::Func(f),
                Node::Block(entry),
                Node::Term(ret),
                Node::Alias(a),
                Node::IFunc(i),
                Node::UseListOrder(order),
                Node::Global(g),
                Node::UseListOrderBb(order_bb),
            ]
        );
    }

    #[test]
    fn shared_operand_is_visited_once() {
        let mut ctx = IrContext::new();
        let (f, x, i32_ty) = int_func(&mut ctx, "f");
        let one = ctx.const_int(i32_ty, 1);
        let entry = ctx.create_block(Ident::unnamed());
        ctx.push_block(f, entry);
        let a = ctx.create_inst(InstKind::binary(BinaryOp::Add, x, one), Ident::unnamed());
        let b = ctx.create_inst(InstKind::binary(BinaryOp::Mul, a, one), Ident::unnamed());
        ctx.push_inst(entry, a);
        ctx.push_inst(entry, b);

        let mut seen = 0;
        let _ = walk::<()>(&ctx, f, &mut |node| {
            if node == Node::Const(one) {
                seen += 1;
            }
            ControlFlow::Continue(WalkAction::Advance)
        });
        assert_eq!(seen, 1);
    }

    #[test]
    fn back_edges_terminate() {
        let mut ctx = IrContext::new();
        let (f, _, _) = int_func(&mut ctx, "spin");
        let header = ctx.create_block(Ident::named("header"));
        let body = ctx.create_block(Ident::named("body"));
        ctx.push_block(f, header);
        ctx.push_block(f, body);
        let to_body = ctx.create_term(
            TermKind::Br {
                target: body.into(),
            },
            Ident::unnamed(),
        );
        let to_header = ctx.create_term(
            TermKind::Br {
                target: header.into(),
            },
            Ident::unnamed(),
        );
        ctx.set_term(header, to_body);
        ctx.set_term(body, to_header);

        let nodes = walk_nodes(&ctx, header);
        assert_eq!(
            nodes,
            [
                Node::Block(header),
                Node::Term(to_body),
                Node::Block(body),
                Node::Term(to_header),
            ]
        );
    }

    #[test]
    fn metadata_cycles_terminate() {
        let mut ctx = IrContext::new();
        let file = ctx.create_metadata(MetadataData::DIFile(DIFile {
            filename: "a.c".to_owned(),
            directory: "/src".to_owned(),
        }));
        let sp = ctx.create_metadata(MetadataData::DISubprogram(DISubprogram {
            name: "main".to_owned(),
            file: Some(file),
            ..DISubprogram::default()
        }));
        let lb = ctx.create_metadata(MetadataData::DILexicalBlock(DILexicalBlock {
            scope: Some(sp),
            file: Some(file),
            ..DILexicalBlock::default()
        }));
        let retained = ctx.create_metadata(MetadataData::Tuple(vec![lb]));
        if let MetadataData::DISubprogram(sp) = ctx.metadata_mut(sp) {
            sp.retained_nodes = Some(retained);
        }
        let named = ctx.create_named_metadata(NamedMetadataData {
            name: "llvm.dbg.sp".to_owned(),
            nodes: vec![sp],
        });

        assert_eq!(
            walk_nodes(&ctx, named),
            [
                Node::NamedMetadata(named),
                Node::Metadata(sp),
                Node::Metadata(file),
                Node::Metadata(retained),
                Node::Metadata(lb),
            ]
        );
    }

    #[test]
    fn skip_prunes_only_that_path() {
        let mut ctx = IrContext::new();
        let (f, _, i32_ty) = int_func(&mut ctx, "f");
        let only_in_add = ctx.const_int(i32_ty, 1);
        let shared = ctx.const_int(i32_ty, 2);
        let entry = ctx.create_block(Ident::unnamed());
        ctx.push_block(f, entry);
        let add = ctx.create_inst(
            InstKind::binary(BinaryOp::Add, only_in_add, shared),
            Ident::unnamed(),
        );
        ctx.push_inst(entry, add);
        let ret = ctx.create_term(TermKind::Ret { x: Some(shared.into()) }, Ident::unnamed());
        ctx.set_term(entry, ret);

        let mut nodes = Vec::new();
        let _ = walk::<()>(&ctx, f, &mut |node| {
            nodes.push(node);
            match node {
                Node::Inst(_) => ControlFlow::Continue(WalkAction::Skip),
                _ => ControlFlow::Continue(WalkAction::Advance),
            }
        });
        assert!(nodes.contains(&Node::Inst(add)));
        assert!(!nodes.contains(&Node::Const(only_in_add)));
        // still reachable through the terminator
        assert!(nodes.contains(&Node::Const(shared)));
    }

    #[test]
    fn break_stops_the_whole_walk() {
        let mut ctx = IrContext::new();
        let (f, x, _) = int_func(&mut ctx, "f");
        let entry = ctx.create_block(Ident::unnamed());
        ctx.push_block(f, entry);
        let add = ctx.create_inst(InstKind::binary(BinaryOp::Add, x, x), Ident::unnamed());
        ctx.push_inst(entry, add);
        let ret = ctx.create_term(TermKind::Ret { x: Some(add.into()) }, Ident::unnamed());
        ctx.set_term(entry, ret);

        let mut visited = 0;
        let result = walk(&ctx, f, &mut |node| {
            visited += 1;
            match node {
                Node::Inst(i) => ControlFlow::Break(i),
                _ => ControlFlow::Continue(WalkAction::Advance),
            }
        });
        assert_eq!(result, ControlFlow::Break(add));
        // func, param, block, inst
        assert_eq!(visited, 4);
    }

    #[test]
    fn long_branch_chains_do_not_grow_the_call_stack() {
        const BLOCKS: usize = 60_000;
        let mut ctx = IrContext::new();
        let void = ctx.types.void();
        let fn_ty = ctx.types.func(void, [], false);
        let f = ctx.create_func(FuncData::new("chain", fn_ty));
        let blocks: Vec<BlockRef> = (0..BLOCKS)
            .map(|_| {
                let b = ctx.create_block(Ident::unnamed());
                ctx.push_block(f, b);
                b
            })
            .collect();
        let mut terms = Vec::with_capacity(BLOCKS);
        for (i, &b) in blocks.iter().enumerate() {
            let kind = match blocks.get(i + 1) {
                Some(&next) => TermKind::Br {
                    target: next.into(),
                },
                None => TermKind::Ret { x: None },
            };
            let t = ctx.create_term(kind, Ident::unnamed());
            ctx.set_term(b, t);
            terms.push(t);
        }

        // From the entry block, every block is only reachable through the
        // previous block's branch.
        let nodes = walk_nodes(&ctx, blocks[0]);
        assert_eq!(nodes.len(), 2 * BLOCKS);
        let expected = blocks
            .iter()
            .zip(&terms)
            .flat_map(|(&b, &t)| [Node::Block(b), Node::Term(t)]);
        assert!(nodes.iter().copied().eq(expected));

        assert_eq!(walk_nodes(&ctx, f).len(), 1 + 2 * BLOCKS);
    }

    #[test]
    fn constant_elements_and_expressions_in_order() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.int(32);
        let arr_ty = ctx.types.array(2, i32_ty);
        let one = ctx.const_int(i32_ty, 1);
        let two = ctx.const_int(i32_ty, 2);
        let sum = ctx.create_const(ConstData::Expr(ConstExpr::Binary {
            op: BinaryOp::Add,
            x: one.into(),
            y: two.into(),
        }));
        let arr = ctx.create_const(ConstData::Array {
            ty: arr_ty,
            elems: vec![one.into(), sum.into()],
        });

        assert_eq!(
            walk_nodes(&ctx, arr),
            [
                Node::Const(arr),
                Node::Const(one),
                Node::Const(sum),
                Node::Const(two),
            ]
        );
    }

    #[test]
    fn block_address_walks_function_then_block() {
        let mut ctx = IrContext::new();
        let (f, _, _) = int_func(&mut ctx, "f");
        let entry = ctx.create_block(Ident::named("entry"));
        ctx.push_block(f, entry);
        let addr = ctx.create_const(ConstData::BlockAddress {
            func: f.into(),
            block: entry.into(),
        });

        let nodes = walk_nodes(&ctx, addr);
        assert_eq!(nodes[..2], [Node::Const(addr), Node::Func(f)]);
        assert!(nodes.contains(&Node::Block(entry)));
    }
}
