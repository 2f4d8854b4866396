//! Type sizes.

use derive_more::{Display, Error};
use lir::{FloatKind, TypeData, TypeInterner, TypeRef};

/// Size queries against a target description.
///
/// Implementations that only know some types can fall back to
/// [`DefaultLayout`] for the rest.
pub trait Layout {
    /// Size of `ty` in bits.
    fn size_of(&self, types: &TypeInterner, ty: TypeRef) -> Result<u64, SizeError>;
}

/// Sizes of integer and floating-point types, which need no target
/// information.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultLayout;

impl Layout for DefaultLayout {
    fn size_of(&self, types: &TypeInterner, ty: TypeRef) -> Result<u64, SizeError> {
        match types.get(ty) {
            TypeData::Int { bits } => Ok(u64::from(*bits)),
            TypeData::Float(kind) => Ok(match kind {
                FloatKind::Half | FloatKind::BFloat => 16,
                FloatKind::Float => 32,
                FloatKind::Double => 64,
                FloatKind::X86Fp80 => 80,
                FloatKind::Fp128 | FloatKind::PpcFp128 => 128,
            }),
            _ => Err(SizeError::Unsupported {
                ty: types.display(ty).to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum SizeError {
    #[display("size of `{ty}` is not known to this layout")]
    Unsupported { ty: String },
    #[display("no pointer specification for address space {addr_space}")]
    MissingPointerSpec { addr_space: u32 },
}
