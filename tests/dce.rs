//! Fixed-point dead code elimination driven by the use index.

use std::collections::HashSet;

use lir::opcode::{BinaryOp, BitwiseOp};
use lir::printer::{print_func, print_module};
use lir::{FuncData, FuncRef, Ident, InstKind, IrContext, ModuleData, ModuleRef, TermKind, Value};
use lirutil::comment::new_comment;
use lirutil::reset_names;
use lirutil::uses::func_uses_into;

/// Prune value instructions with unused results until nothing changes.
/// Calls are never pruned as they may have side effects.
fn eliminate_dead_code(ctx: &mut IrContext, func: FuncRef) -> usize {
    let mut rounds = 0;
    let mut uses = Vec::new();
    loop {
        uses.clear();
        func_uses_into(ctx, func, &mut uses);
        let used: HashSet<Value> = uses.iter().map(|u| u.get(ctx)).collect();
        if !prune_unused(ctx, func, &used) {
            return rounds;
        }
        rounds += 1;
        reset_names(ctx, func);
        ctx.assign_ids(func).unwrap();
    }
}

fn prune_unused(ctx: &mut IrContext, func: FuncRef, used: &HashSet<Value>) -> bool {
    let mut pruned = false;
    for block in ctx.func(func).blocks.clone() {
        for inst in ctx.block(block).insts.clone() {
            let data = ctx.inst(inst);
            let keep = ctx.types.is_void(data.ty)
                || matches!(data.kind, InstKind::Call { .. })
                || used.contains(&Value::Inst(inst));
            if !keep {
                ctx.remove_inst_from_block(block, inst);
                pruned = true;
            }
        }
    }
    pruned
}

/// ```llvm
/// define void @g() {
///     ; potential side effects
///     ret void
/// }
///
/// define i32 @f(i32 %x, i32 %y) {
///     %1 = add i32 %x, %y
///     %2 = xor i32 %1, 10
///     %3 = sub i32 %x, %y
///     call void @g()
///     %4 = mul i32 3, 5
///     ret i32 %3
/// }
/// ```
fn build_module(ctx: &mut IrContext) -> (ModuleRef, FuncRef, FuncRef) {
    let void = ctx.types.void();
    let i32_ty = ctx.types.int(32);

    let g_ty = ctx.types.func(void, [], false);
    let g = ctx.create_func(FuncData::new("g", g_ty));
    let g_entry = ctx.create_block(Ident::unnamed());
    ctx.push_block(g, g_entry);
    let note = new_comment(ctx, "potential side effects");
    ctx.push_inst(g_entry, note);
    let ret_void = ctx.create_term(TermKind::Ret { x: None }, Ident::unnamed());
    ctx.set_term(g_entry, ret_void);

    let f_ty = ctx.types.func(i32_ty, [i32_ty, i32_ty], false);
    let x = ctx.create_param(i32_ty, Ident::named("x"));
    let y = ctx.create_param(i32_ty, Ident::named("y"));
    let mut f_data = FuncData::new("f", f_ty);
    f_data.params.extend([x, y]);
    let f = ctx.create_func(f_data);
    let entry = ctx.create_block(Ident::unnamed());
    ctx.push_block(f, entry);

    let ten = ctx.const_int(i32_ty, 10);
    let three = ctx.const_int(i32_ty, 3);
    let five = ctx.const_int(i32_ty, 5);
    let a = ctx.create_inst(InstKind::binary(BinaryOp::Add, x, y), Ident::unnamed());
    let b = ctx.create_inst(InstKind::bitwise(BitwiseOp::Xor, a, ten), Ident::unnamed());
    let c = ctx.create_inst(InstKind::binary(BinaryOp::Sub, x, y), Ident::unnamed());
    let call = ctx.create_inst(InstKind::call(g_ty, g, Vec::new()), Ident::unnamed());
    let d = ctx.create_inst(InstKind::binary(BinaryOp::Mul, three, five), Ident::unnamed());
    for inst in [a, b, c, call, d] {
        ctx.push_inst(entry, inst);
    }
    let ret = ctx.create_term(TermKind::Ret { x: Some(c.into()) }, Ident::unnamed());
    ctx.set_term(entry, ret);

    let module = ctx.create_module(ModuleData {
        funcs: vec![g, f],
        ..ModuleData::default()
    });
    (module, g, f)
}

#[test]
fn dce_reaches_fixed_point() {
    let mut ctx = IrContext::new();
    let (module, g, f) = build_module(&mut ctx);
    ctx.assign_ids(g).unwrap();
    ctx.assign_ids(f).unwrap();
    assert!(print_func(&ctx, f).contains("\t%4 = mul i32 3, 5\n"));

    assert_eq!(eliminate_dead_code(&mut ctx, g), 0);
    // `%2` goes in the first round, which leaves `%1` unused for the second
    assert_eq!(eliminate_dead_code(&mut ctx, f), 2);

    insta::assert_snapshot!(print_module(&ctx, module));
}

#[test]
fn renumbering_after_reset_has_no_gaps() {
    let mut ctx = IrContext::new();
    let (_, _, f) = build_module(&mut ctx);
    ctx.assign_ids(f).unwrap();

    let entry = ctx.func(f).blocks[0];
    let first = ctx.block(entry).insts[0];
    ctx.remove_inst_from_block(entry, first);
    // stale IDs now start at %2
    assert!(ctx.assign_ids(f).is_err());

    reset_names(&mut ctx, f);
    ctx.assign_ids(f).unwrap();
    let ids: Vec<Option<u32>> = ctx
        .block(entry)
        .insts
        .iter()
        .map(|&i| ctx.inst(i).ident.id)
        .collect();
    assert_eq!(ids, [Some(1), Some(2), None, Some(3)]);
}
