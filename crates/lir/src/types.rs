//! Type interning.

use std::collections::HashMap;
use std::fmt;

use cranelift_entity::PrimaryMap;
use smallvec::SmallVec;

use crate::refs::TypeRef;

/// Floating-point formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatKind {
    Half,
    BFloat,
    Float,
    Double,
    X86Fp80,
    Fp128,
    PpcFp128,
}

impl FloatKind {
    pub fn keyword(self) -> &'static str {
        match self {
            FloatKind::Half => "half",
            FloatKind::BFloat => "bfloat",
            FloatKind::Float => "float",
            FloatKind::Double => "double",
            FloatKind::X86Fp80 => "x86_fp80",
            FloatKind::Fp128 => "fp128",
            FloatKind::PpcFp128 => "ppc_fp128",
        }
    }
}

/// Data for a single interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Void,
    Label,
    Token,
    Metadata,
    Int {
        bits: u32,
    },
    Float(FloatKind),
    Pointer {
        addr_space: u32,
    },
    Vector {
        len: u64,
        elem: TypeRef,
        scalable: bool,
    },
    Array {
        len: u64,
        elem: TypeRef,
    },
    Struct {
        fields: SmallVec<[TypeRef; 4]>,
        packed: bool,
    },
    Func {
        ret: TypeRef,
        params: SmallVec<[TypeRef; 4]>,
        variadic: bool,
    },
}

/// Deduplicating type interner. Same `TypeData` always yields the same `TypeRef`.
pub struct TypeInterner {
    types: PrimaryMap<TypeRef, TypeData>,
    dedup: HashMap<TypeData, TypeRef>,
}

impl TypeInterner {
    pub fn new() -> Self {
        Self {
            types: PrimaryMap::new(),
            dedup: HashMap::default(),
        }
    }

    /// Intern a type, returning an existing ref if the data matches.
    pub fn intern(&mut self, data: TypeData) -> TypeRef {
        if let Some(&existing) = self.dedup.get(&data) {
            return existing;
        }
        let r = self.types.push(data.clone());
        self.dedup.insert(data, r);
        r
    }

    /// Look up type data by reference.
    pub fn get(&self, r: TypeRef) -> &TypeData {
        &self.types[r]
    }

    pub fn void(&mut self) -> TypeRef {
        self.intern(TypeData::Void)
    }

    pub fn label(&mut self) -> TypeRef {
        self.intern(TypeData::Label)
    }

    pub fn token(&mut self) -> TypeRef {
        self.intern(TypeData::Token)
    }

    pub fn metadata(&mut self) -> TypeRef {
        self.intern(TypeData::Metadata)
    }

    pub fn int(&mut self, bits: u32) -> TypeRef {
        self.intern(TypeData::Int { bits })
    }

    pub fn float(&mut self, kind: FloatKind) -> TypeRef {
        self.intern(TypeData::Float(kind))
    }

    pub fn ptr(&mut self, addr_space: u32) -> TypeRef {
        self.intern(TypeData::Pointer { addr_space })
    }

    pub fn array(&mut self, len: u64, elem: TypeRef) -> TypeRef {
        self.intern(TypeData::Array { len, elem })
    }

    pub fn vector(&mut self, len: u64, elem: TypeRef) -> TypeRef {
        self.intern(TypeData::Vector {
            len,
            elem,
            scalable: false,
        })
    }

    pub fn func(
        &mut self,
        ret: TypeRef,
        params: impl IntoIterator<Item = TypeRef>,
        variadic: bool,
    ) -> TypeRef {
        self.intern(TypeData::Func {
            ret,
            params: params.into_iter().collect(),
            variadic,
        })
    }

    pub fn is_void(&self, r: TypeRef) -> bool {
        matches!(self.types[r], TypeData::Void)
    }

    /// Bit width of an integer type, or `None` for any other type.
    pub fn int_bits(&self, r: TypeRef) -> Option<u32> {
        match self.types[r] {
            TypeData::Int { bits } => Some(bits),
            _ => None,
        }
    }

    /// Render a type in LLVM assembly syntax.
    pub fn display(&self, r: TypeRef) -> DisplayType<'_> {
        DisplayType { types: self, ty: r }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// `Display` adapter returned by [`TypeInterner::display`].
pub struct DisplayType<'a> {
    types: &'a TypeInterner,
    ty: TypeRef,
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |ty| self.types.display(ty);
        match self.types.get(self.ty) {
            TypeData::Void => f.write_str("void"),
            TypeData::Label => f.write_str("label"),
            TypeData::Token => f.write_str("token"),
            TypeData::Metadata => f.write_str("metadata"),
            TypeData::Int { bits } => write!(f, "i{bits}"),
            TypeData::Float(kind) => f.write_str(kind.keyword()),
            TypeData::Pointer { addr_space: 0 } => f.write_str("ptr"),
            TypeData::Pointer { addr_space } => write!(f, "ptr addrspace({addr_space})"),
            TypeData::Vector {
                len,
                elem,
                scalable,
            } => {
                if *scalable {
                    write!(f, "<vscale x {len} x {}>", show(*elem))
                } else {
                    write!(f, "<{len} x {}>", show(*elem))
                }
            }
            TypeData::Array { len, elem } => write!(f, "[{len} x {}]", show(*elem)),
            TypeData::Struct { fields, packed } => {
                if *packed {
                    f.write_str("<")?;
                }
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", show(*field))?;
                }
                f.write_str(" }")?;
                if *packed {
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeData::Func {
                ret,
                params,
                variadic,
            } => {
                write!(f, "{} (", show(*ret))?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", show(*param))?;
                }
                if *variadic {
                    if !params.is_empty() {
                        f.write_str(", ")?;
                    }
                    f.write_str("...")?;
                }
                f.write_str(")")
            }
        }
    }
}
