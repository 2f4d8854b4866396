//! Identifier reset after structural edits.

use lir::{FuncRef, Ident, IrContext};
use tracing::debug;

/// Clear the IDs of unnamed local values in `func` so that a following
/// [`IrContext::assign_ids`] hands out a fresh gap-free sequence.
///
/// Covers every unnamed block, instruction and terminator; values that never
/// receive an ID (`store`, `ret`, ...) are unaffected. Named values and
/// parameters keep their identifiers.
pub fn reset_names(ctx: &mut IrContext, func: FuncRef) {
    let mut cleared = 0usize;
    for bi in 0..ctx.func(func).blocks.len() {
        let block = ctx.func(func).blocks[bi];
        cleared += usize::from(clear_id(&mut ctx.block_mut(block).ident));
        for ii in 0..ctx.block(block).insts.len() {
            let inst = ctx.block(block).insts[ii];
            cleared += usize::from(clear_id(&mut ctx.inst_mut(inst).ident));
        }
        if let Some(term) = ctx.block(block).term {
            cleared += usize::from(clear_id(&mut ctx.term_mut(term).ident));
        }
    }
    debug!(func = %ctx.func(func).name, cleared, "reset local IDs");
}

fn clear_id(ident: &mut Ident) -> bool {
    if ident.is_unnamed() && ident.id.is_some() {
        ident.set_name(None);
        true
    } else {
        false
    }
}
