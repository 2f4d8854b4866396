//! Comment pseudo-instructions.

use lir::printer::print_inst;
use lir::{Ident, InstKind, InstRef, IrContext};

/// Create a detached comment instruction. `text` may span several lines.
///
/// Comments have no operands and no result, so they contribute no uses and
/// never receive an ID.
pub fn new_comment(ctx: &mut IrContext, text: impl Into<String>) -> InstRef {
    ctx.create_inst(InstKind::Comment { text: text.into() }, Ident::unnamed())
}

/// Rendered form of a comment (`; line1; line2`), or `None` if `inst` is not
/// a comment.
pub fn comment_text(ctx: &IrContext, inst: InstRef) -> Option<String> {
    match &ctx.inst(inst).kind {
        InstKind::Comment { .. } => Some(print_inst(ctx, inst)),
        _ => None,
    }
}
