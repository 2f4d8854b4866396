//! Every instruction and terminator variant, checked against both the use
//! index and the walker.

use lir::opcode::{AtomicOp, AtomicOrdering, BinaryOp, BitwiseOp, ConvOp, FPred, IPred, UnaryOp};
use lir::{
    Case, Clause, ClauseKind, ConstData, FuncData, Ident, Incoming, InstKind, IrContext,
    OperandBundle, TermKind, TypeRef, Value,
};
use lirutil::{Node, Use, inst_uses, term_uses, walk_nodes};

/// Operands without children of their own, so a walk from an owner visits
/// exactly the owner and its operands.
struct Leaves {
    i32_ty: TypeRef,
    i64_ty: TypeRef,
    callee_ty: TypeRef,
    p: Value,
    q: Value,
    ptr: Value,
    vec: Value,
    mask: Value,
    arr: Value,
    none: Value,
    callee: Value,
    bb: [Value; 3],
}

fn leaves(ctx: &mut IrContext) -> Leaves {
    let void = ctx.types.void();
    let i32_ty = ctx.types.int(32);
    let i64_ty = ctx.types.int(64);
    let ptr_ty = ctx.types.ptr(0);
    let vec_ty = ctx.types.vector(2, i32_ty);
    let arr_ty = ctx.types.array(2, i32_ty);
    let callee_ty = ctx.types.func(void, [], false);

    let p = ctx.create_param(i32_ty, Ident::named("p")).into();
    let q = ctx.create_param(i32_ty, Ident::named("q")).into();
    let ptr = ctx.create_param(ptr_ty, Ident::named("ptr")).into();
    let vec = ctx
        .create_const(ConstData::ZeroInitializer { ty: vec_ty })
        .into();
    let mask = ctx.create_const(ConstData::Undef { ty: vec_ty }).into();
    let arr = ctx
        .create_const(ConstData::ZeroInitializer { ty: arr_ty })
        .into();
    let none = ctx.create_const(ConstData::NoneToken).into();
    let callee = ctx.create_func(FuncData::new("h", callee_ty)).into();
    let bb = [
        ctx.create_block(Ident::named("a")).into(),
        ctx.create_block(Ident::named("b")).into(),
        ctx.create_block(Ident::named("c")).into(),
    ];
    Leaves {
        i32_ty,
        i64_ty,
        callee_ty,
        p,
        q,
        ptr,
        vec,
        mask,
        arr,
        none,
        callee,
        bb,
    }
}

fn bundle(input: Value) -> Vec<OperandBundle> {
    vec![OperandBundle {
        tag: "deopt".to_owned(),
        inputs: vec![input],
    }]
}

fn inst_kinds(l: &Leaves) -> Vec<InstKind> {
    let (p, q, ptr) = (l.p, l.q, l.ptr);
    vec![
        InstKind::Unary {
            op: UnaryOp::FNeg,
            x: p,
        },
        InstKind::binary(BinaryOp::Add, p, q),
        InstKind::bitwise(BitwiseOp::Xor, p, q),
        InstKind::ExtractElement { x: l.vec, index: p },
        InstKind::InsertElement {
            x: l.vec,
            elem: p,
            index: q,
        },
        InstKind::ShuffleVector {
            x: l.vec,
            y: l.vec,
            mask: l.mask,
        },
        InstKind::ExtractValue {
            x: l.arr,
            indices: vec![0],
        },
        InstKind::InsertValue {
            x: l.arr,
            elem: p,
            indices: vec![1],
        },
        InstKind::Alloca {
            elem_ty: l.i32_ty,
            nelems: Some(p),
            addr_space: 0,
        },
        InstKind::Alloca {
            elem_ty: l.i32_ty,
            nelems: None,
            addr_space: 0,
        },
        InstKind::Load {
            elem_ty: l.i32_ty,
            src: ptr,
            volatile: false,
        },
        InstKind::Store {
            src: p,
            dst: ptr,
            volatile: true,
        },
        InstKind::Fence {
            ordering: AtomicOrdering::SeqCst,
        },
        InstKind::CmpXchg {
            ptr,
            cmp: p,
            new: q,
            success: AtomicOrdering::SeqCst,
            failure: AtomicOrdering::Monotonic,
        },
        InstKind::AtomicRmw {
            op: AtomicOp::Add,
            dst: ptr,
            x: p,
            ordering: AtomicOrdering::AcqRel,
        },
        InstKind::GetElementPtr {
            elem_ty: l.i32_ty,
            src: ptr,
            indices: vec![p, q],
            in_bounds: true,
        },
        InstKind::Conversion {
            op: ConvOp::ZExt,
            from: p,
            to: l.i64_ty,
        },
        InstKind::ICmp {
            pred: IPred::Slt,
            x: p,
            y: q,
        },
        InstKind::FCmp {
            pred: FPred::Oeq,
            x: q,
            y: p,
        },
        InstKind::Phi {
            ty: l.i32_ty,
            incs: vec![
                Incoming {
                    x: p,
                    pred: l.bb[0],
                },
                Incoming {
                    x: q,
                    pred: l.bb[1],
                },
            ],
        },
        InstKind::Select { cond: p, x: q, y: p },
        InstKind::Call {
            func_ty: l.callee_ty,
            callee: l.callee,
            args: vec![p, q],
            bundles: bundle(ptr),
            tail: false,
        },
        InstKind::VaArg {
            arg_list: ptr,
            ty: l.i32_ty,
        },
        InstKind::LandingPad {
            ty: l.i32_ty,
            cleanup: true,
            clauses: vec![
                Clause {
                    kind: ClauseKind::Catch,
                    x: ptr,
                },
                Clause {
                    kind: ClauseKind::Filter,
                    x: l.arr,
                },
            ],
        },
        InstKind::CatchPad {
            scope: l.none,
            args: vec![p],
        },
        InstKind::CleanupPad {
            scope: l.none,
            args: Vec::new(),
        },
        InstKind::Comment {
            text: "no operands".to_owned(),
        },
    ]
}

fn term_kinds(l: &Leaves) -> Vec<TermKind> {
    let (p, q, [a, b, c]) = (l.p, l.q, l.bb);
    vec![
        TermKind::Ret { x: None },
        TermKind::Ret { x: Some(p) },
        TermKind::Br { target: a },
        TermKind::CondBr {
            cond: p,
            target_true: a,
            target_false: b,
        },
        TermKind::Switch {
            x: p,
            target_default: a,
            cases: vec![Case { x: q, target: b }],
        },
        TermKind::IndirectBr {
            addr: l.ptr,
            valid_targets: vec![a, b],
        },
        TermKind::Invoke {
            func_ty: l.callee_ty,
            invokee: l.callee,
            args: vec![p],
            normal: a,
            exception: b,
            bundles: bundle(q),
        },
        TermKind::CallBr {
            func_ty: l.callee_ty,
            callee: l.callee,
            args: vec![p],
            normal: a,
            others: vec![b, c],
            bundles: Vec::new(),
        },
        TermKind::Resume { x: p },
        TermKind::CatchSwitch {
            scope: l.none,
            handlers: vec![a, b],
            unwind_target: Some(c),
        },
        TermKind::CatchRet { from: p, to: a },
        TermKind::CleanupRet {
            from: p,
            unwind_target: None,
        },
        TermKind::Unreachable,
    ]
}

/// The owner followed by its distinct operands in use order.
fn expected_walk(ctx: &IrContext, owner: Node, uses: &[Use]) -> Vec<Node> {
    let mut nodes = vec![owner];
    for u in uses {
        let node = Node::from(u.get(ctx));
        if !nodes.contains(&node) {
            nodes.push(node);
        }
    }
    nodes
}

#[test]
fn walker_visits_exactly_the_operands_of_every_instruction() {
    let mut ctx = IrContext::new();
    let l = leaves(&mut ctx);
    for kind in inst_kinds(&l) {
        let name = kind.kind_name();
        let inst = ctx.create_inst(kind, Ident::unnamed());
        let uses = inst_uses(&ctx, inst);
        assert_eq!(
            walk_nodes(&ctx, inst),
            expected_walk(&ctx, Node::Inst(inst), &uses),
            "{name}"
        );
    }
}

#[test]
fn walker_visits_exactly_the_operands_of_every_terminator() {
    let mut ctx = IrContext::new();
    let l = leaves(&mut ctx);
    for kind in term_kinds(&l) {
        let name = kind.kind_name();
        let term = ctx.create_term(kind, Ident::unnamed());
        let uses = term_uses(&ctx, term);
        assert_eq!(
            walk_nodes(&ctx, term),
            expected_walk(&ctx, Node::Term(term), &uses),
            "{name}"
        );
    }
}

#[test]
fn operand_counts_follow_arity() {
    let mut ctx = IrContext::new();
    let l = leaves(&mut ctx);
    let counts: Vec<String> = inst_kinds(&l)
        .into_iter()
        .map(|kind| {
            let name = kind.kind_name();
            let inst = ctx.create_inst(kind, Ident::unnamed());
            format!("{name} {}", inst_uses(&ctx, inst).len())
        })
        .collect();
    insta::assert_snapshot!(counts.join("\n"), @r"
    fneg 1
    add 2
    xor 2
    extractelement 2
    insertelement 3
    shufflevector 3
    extractvalue 1
    insertvalue 2
    alloca 1
    alloca 0
    load 1
    store 2
    fence 0
    cmpxchg 3
    atomicrmw 2
    getelementptr 3
    zext 1
    icmp 2
    fcmp 2
    phi 4
    select 3
    call 4
    va_arg 1
    landingpad 2
    catchpad 2
    cleanuppad 1
    comment 0
    ");
}

#[test]
fn replacing_every_use_round_trips() {
    let mut ctx = IrContext::new();
    let l = leaves(&mut ctx);
    let insts: Vec<_> = inst_kinds(&l)
        .into_iter()
        .map(|kind| ctx.create_inst(kind, Ident::unnamed()))
        .collect();
    let terms: Vec<_> = term_kinds(&l)
        .into_iter()
        .map(|kind| ctx.create_term(kind, Ident::unnamed()))
        .collect();

    let mut all = Vec::new();
    for &inst in &insts {
        all.extend(inst_uses(&ctx, inst));
    }
    for &term in &terms {
        all.extend(term_uses(&ctx, term));
    }

    let fresh: Vec<Value> = all
        .iter()
        .map(|_| ctx.create_param(l.i32_ty, Ident::unnamed()).into())
        .collect();
    for (u, &v) in all.iter().zip(&fresh) {
        u.replace(&mut ctx, v);
    }

    let mut requeried = Vec::new();
    for &inst in &insts {
        requeried.extend(inst_uses(&ctx, inst));
    }
    for &term in &terms {
        requeried.extend(term_uses(&ctx, term));
    }
    assert_eq!(requeried, all);
    let values: Vec<Value> = requeried.iter().map(|u| u.get(&ctx)).collect();
    assert_eq!(values, fresh);
}
