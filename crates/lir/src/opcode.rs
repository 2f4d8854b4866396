//! Opcode tags shared by instructions and constant expressions.

macro_rules! opcodes {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $kw:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            /// Assembly keyword of the opcode.
            pub fn keyword(self) -> &'static str {
                match self {
                    $($name::$variant => $kw),*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.keyword())
            }
        }
    };
}

opcodes! {
    /// Unary operators.
    UnaryOp {
        FNeg => "fneg",
    }
}

opcodes! {
    /// Binary arithmetic operators.
    BinaryOp {
        Add => "add",
        FAdd => "fadd",
        Sub => "sub",
        FSub => "fsub",
        Mul => "mul",
        FMul => "fmul",
        UDiv => "udiv",
        SDiv => "sdiv",
        FDiv => "fdiv",
        URem => "urem",
        SRem => "srem",
        FRem => "frem",
    }
}

opcodes! {
    /// Bitwise binary operators.
    BitwiseOp {
        Shl => "shl",
        LShr => "lshr",
        AShr => "ashr",
        And => "and",
        Or => "or",
        Xor => "xor",
    }
}

opcodes! {
    /// Conversion operators.
    ConvOp {
        Trunc => "trunc",
        ZExt => "zext",
        SExt => "sext",
        FPTrunc => "fptrunc",
        FPExt => "fpext",
        FPToUI => "fptoui",
        FPToSI => "fptosi",
        UIToFP => "uitofp",
        SIToFP => "sitofp",
        PtrToInt => "ptrtoint",
        IntToPtr => "inttoptr",
        BitCast => "bitcast",
        AddrSpaceCast => "addrspacecast",
    }
}

opcodes! {
    /// Integer comparison predicates.
    IPred {
        Eq => "eq",
        Ne => "ne",
        Sgt => "sgt",
        Sge => "sge",
        Slt => "slt",
        Sle => "sle",
        Ugt => "ugt",
        Uge => "uge",
        Ult => "ult",
        Ule => "ule",
    }
}

opcodes! {
    /// Floating-point comparison predicates.
    FPred {
        False => "false",
        Oeq => "oeq",
        Ogt => "ogt",
        Oge => "oge",
        Olt => "olt",
        Ole => "ole",
        One => "one",
        Ord => "ord",
        Ueq => "ueq",
        Ugt => "ugt",
        Uge => "uge",
        Ult => "ult",
        Ule => "ule",
        Une => "une",
        Uno => "uno",
        True => "true",
    }
}

opcodes! {
    /// `atomicrmw` operations.
    AtomicOp {
        Xchg => "xchg",
        Add => "add",
        Sub => "sub",
        And => "and",
        Nand => "nand",
        Or => "or",
        Xor => "xor",
        Max => "max",
        Min => "min",
        UMax => "umax",
        UMin => "umin",
        FAdd => "fadd",
        FSub => "fsub",
    }
}

opcodes! {
    /// Memory ordering of atomic instructions.
    AtomicOrdering {
        Unordered => "unordered",
        Monotonic => "monotonic",
        Acquire => "acquire",
        Release => "release",
        AcqRel => "acq_rel",
        SeqCst => "seq_cst",
    }
}
