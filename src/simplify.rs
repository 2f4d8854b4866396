//! Folding of arithmetic constant expressions.

use lir::opcode::BinaryOp;
use lir::{ConstData, ConstExpr, ConstRef, IrContext, Value};
use tracing::trace;

/// Fold an arithmetic constant expression whose operands reduce to literals.
///
/// Integer `add`, `sub`, `mul`, `sdiv` and `udiv` wrap to the operand bit
/// width; `fadd`, `fsub` and `fmul` fold float literals. Operands are folded
/// first, so nested expressions collapse bottom-up. Anything else, including
/// a division by zero, is returned unchanged.
pub fn simplify(ctx: &mut IrContext, c: ConstRef) -> ConstRef {
    let ConstData::Expr(ConstExpr::Binary { op, x, y }) = ctx.constant(c) else {
        return c;
    };
    let (op, x, y) = (*op, *x, *y);
    let (Value::Const(x), Value::Const(y)) = (x, y) else {
        return c;
    };
    let x = simplify(ctx, x);
    let y = simplify(ctx, y);

    let folded = match (ctx.constant(x), ctx.constant(y)) {
        (ConstData::Int { ty, value: a }, ConstData::Int { value: b, .. }) => {
            let bits = ctx.types.int_bits(*ty).unwrap_or(128);
            fold_int(op, *a, *b, bits).map(|value| ConstData::Int { ty: *ty, value })
        }
        (ConstData::Float { ty, value: a }, ConstData::Float { value: b, .. }) => {
            fold_float(op, *a, *b).map(|value| ConstData::Float { ty: *ty, value })
        }
        _ => None,
    };
    match folded {
        Some(data) => {
            trace!(%op, ?data, "folded constant expression");
            ctx.create_const(data)
        }
        None => c,
    }
}

fn fold_int(op: BinaryOp, a: i128, b: i128, bits: u32) -> Option<i128> {
    let value = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::SDiv => {
            let (a, b) = (wrap(a, bits), wrap(b, bits));
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        BinaryOp::UDiv => {
            let (a, b) = (as_unsigned(a, bits), as_unsigned(b, bits));
            if b == 0 {
                return None;
            }
            (a / b) as i128
        }
        _ => return None,
    };
    Some(wrap(value, bits))
}

fn fold_float(op: BinaryOp, a: f64, b: f64) -> Option<f64> {
    match op {
        BinaryOp::FAdd => Some(a + b),
        BinaryOp::FSub => Some(a - b),
        BinaryOp::FMul => Some(a * b),
        _ => None,
    }
}

/// Truncate to `bits` and sign-extend back, the form integer literals are
/// stored in.
fn wrap(v: i128, bits: u32) -> i128 {
    if bits == 0 || bits >= 128 {
        return v;
    }
    let shift = 128 - bits;
    (v << shift) >> shift
}

fn as_unsigned(v: i128, bits: u32) -> u128 {
    if bits >= 128 {
        v as u128
    } else {
        (v as u128) & ((1u128 << bits) - 1)
    }
}
