//! Result type refresh after operand rewrites.

use lir::{FuncRef, IrContext};
use tracing::debug;

/// Recompute the cached result type of every instruction in `func`, in block
/// order, so that types follow operands rewritten through
/// [`Use::replace`](crate::Use::replace).
///
/// Instructions are visited in layout order, so a result that feeds a later
/// instruction in the same function is refreshed before its user. Terminator
/// types depend only on their callee type and never need a refresh.
///
/// # Panics
///
/// Panics if an instruction's operands no longer fit its opcode, as
/// [`IrContext::recompute_inst_ty`] does.
pub fn reset_types(ctx: &mut IrContext, func: FuncRef) {
    let mut changed = 0usize;
    for bi in 0..ctx.func(func).blocks.len() {
        let block = ctx.func(func).blocks[bi];
        for ii in 0..ctx.block(block).insts.len() {
            let inst = ctx.block(block).insts[ii];
            if ctx.recompute_inst_ty(inst) {
                changed += 1;
            }
        }
    }
    debug!(func = %ctx.func(func).name, changed, "reset result types");
}
