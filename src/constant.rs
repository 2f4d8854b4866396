//! Constant constructors.

use lir::{ConstData, ConstRef, IrContext, TypeData, TypeRef};

/// Zero value of `ty`: integer `0`, float `0.0`, `zeroinitializer` otherwise.
pub fn new_zero(ctx: &mut IrContext, ty: TypeRef) -> ConstRef {
    let data = match ctx.types.get(ty) {
        TypeData::Int { .. } => ConstData::Int { ty, value: 0 },
        TypeData::Float(_) => ConstData::Float { ty, value: 0.0 },
        _ => ConstData::ZeroInitializer { ty },
    };
    ctx.create_const(data)
}

/// NUL-terminated character array holding the UTF-8 bytes of `s`.
pub fn new_c_string(ctx: &mut IrContext, s: &str) -> ConstRef {
    let mut bytes = Vec::with_capacity(s.len() + 1);
    bytes.extend_from_slice(s.as_bytes());
    bytes.push(0);
    char_array(ctx, bytes)
}

/// Character array of `s` prefixed by its byte length as a 4-byte big-endian
/// integer. Lengths beyond `u32::MAX` are truncated in the prefix.
pub fn new_pascal_string(ctx: &mut IrContext, s: &str) -> ConstRef {
    let mut bytes = Vec::with_capacity(s.len() + 4);
    bytes.extend_from_slice(&(s.len() as u32).to_be_bytes());
    bytes.extend_from_slice(s.as_bytes());
    char_array(ctx, bytes)
}

fn char_array(ctx: &mut IrContext, bytes: Vec<u8>) -> ConstRef {
    let i8_ty = ctx.types.int(8);
    let ty = ctx.types.array(bytes.len() as u64, i8_ty);
    ctx.create_const(ConstData::CharArray { ty, bytes })
}

#[cfg(test)]
mod tests {
    use lir::FloatKind;
    use lir::printer::print_value;

    use super::*;

    #[test]
    fn zero_values_per_type() {
        let mut ctx = IrContext::new();
        let i64_ty = ctx.types.int(64);
        let double = ctx.types.float(FloatKind::Double);
        let arr = ctx.types.array(2, i64_ty);

        let zi = new_zero(&mut ctx, i64_ty);
        let zf = new_zero(&mut ctx, double);
        let za = new_zero(&mut ctx, arr);
        assert_eq!(print_value(&ctx, zi.into()), "i64 0");
        assert_eq!(print_value(&ctx, zf.into()), "double 0.0");
        assert_eq!(print_value(&ctx, za.into()), "[2 x i64] zeroinitializer");
    }

    #[test]
    fn string_constants() {
        let mut ctx = IrContext::new();
        let c = new_c_string(&mut ctx, "hi");
        assert_eq!(print_value(&ctx, c.into()), "[3 x i8] c\"hi\\00\"");

        let p = new_pascal_string(&mut ctx, "abc");
        assert_eq!(
            ctx.constant(p),
            &ConstData::CharArray {
                ty: ctx.value_ty(p.into()),
                bytes: vec![0, 0, 0, 3, b'a', b'b', b'c'],
            }
        );
    }
}
