//! Use/def index: every operand slot of an instruction or terminator as an
//! addressable [`Use`].
//!
//! A `Use` names its owner and a slot descriptor. Reading or rewriting the
//! slot goes back through the owner's variant, so a `Use` never aliases IR
//! storage and stays `Copy`. A `Use` is only meaningful until the owner is
//! edited through some other path; resolving a slot the owner no longer has
//! is a panic.

use lir::{
    Case, Clause, FuncRef, Incoming, InstKind, InstRef, IrContext, OperandBundle, TermKind,
    TermRef, Value,
};

// ============================================================================
// Slot descriptors
// ============================================================================

/// Operand slot of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstSlot {
    /// First operand of unary, binary, bitwise, vector, aggregate, compare,
    /// `select` and `atomicrmw` instructions.
    X,
    /// Second operand of binary, bitwise, compare, `shufflevector` and
    /// `select` instructions.
    Y,
    /// `extractelement` / `insertelement` index.
    Index,
    /// Inserted element of `insertelement` / `insertvalue`.
    Elem,
    /// `shufflevector` mask.
    Mask,
    /// `alloca` element count.
    NElems,
    /// Loaded, stored or indexed address (`load`, `getelementptr`), or the
    /// stored value of `store`.
    Src,
    /// Destination address of `store` / `atomicrmw`.
    Dst,
    /// `cmpxchg` address.
    Ptr,
    /// `cmpxchg` expected value.
    Cmp,
    /// `cmpxchg` replacement value.
    New,
    /// `getelementptr` index operand.
    GepIndex(u32),
    /// Converted value of a conversion.
    From,
    /// Value of the i-th `phi` incoming pair.
    IncomingX(u32),
    /// Predecessor block of the i-th `phi` incoming pair.
    IncomingPred(u32),
    /// `select` condition.
    Cond,
    /// Called value of `call`.
    Callee,
    /// i-th call argument, or i-th pad argument.
    Arg(u32),
    /// Input of an operand bundle.
    BundleInput { bundle: u32, input: u32 },
    /// `va_arg` list pointer.
    ArgList,
    /// Value of the i-th `landingpad` clause.
    Clause(u32),
    /// Enclosing `catchswitch` of a `catchpad`, parent pad of a `cleanuppad`.
    Scope,
}

/// Operand slot of a terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TermSlot {
    /// Returned, switched-on or resumed value.
    X,
    /// `br` target.
    Target,
    /// `condbr` condition.
    Cond,
    /// `condbr` target when the condition holds.
    TargetTrue,
    /// `condbr` target otherwise.
    TargetFalse,
    /// `switch` default target.
    TargetDefault,
    /// Value of the i-th `switch` case.
    CaseX(u32),
    /// Target of the i-th `switch` case.
    CaseTarget(u32),
    /// `indirectbr` address.
    Addr,
    /// i-th `indirectbr` destination.
    ValidTarget(u32),
    /// Called value of `invoke`.
    Invokee,
    /// Called value of `callbr`.
    Callee,
    /// i-th `invoke` / `callbr` argument.
    Arg(u32),
    /// Normal return destination of `invoke` / `callbr`.
    Normal,
    /// `invoke` unwind destination.
    Exception,
    /// i-th indirect destination of `callbr`.
    Other(u32),
    /// Input of an operand bundle.
    BundleInput { bundle: u32, input: u32 },
    /// Parent pad of a `catchswitch`.
    Scope,
    /// i-th `catchswitch` handler.
    Handler(u32),
    /// `catchswitch` / `cleanupret` unwind destination.
    UnwindTarget,
    /// Pad exited by `catchret` / `cleanupret`.
    From,
    /// `catchret` destination.
    To,
}

// ============================================================================
// Operand enumeration
// ============================================================================

/// Call `f` for every operand slot of an instruction, in operand order.
pub fn each_inst_operand(kind: &InstKind, mut f: impl FnMut(InstSlot, Value)) {
    use InstSlot as S;
    match kind {
        InstKind::Unary { x, .. } => f(S::X, *x),
        InstKind::Binary { x, y, .. } | InstKind::Bitwise { x, y, .. } => {
            f(S::X, *x);
            f(S::Y, *y);
        }
        InstKind::ExtractElement { x, index } => {
            f(S::X, *x);
            f(S::Index, *index);
        }
        InstKind::InsertElement { x, elem, index } => {
            f(S::X, *x);
            f(S::Elem, *elem);
            f(S::Index, *index);
        }
        InstKind::ShuffleVector { x, y, mask } => {
            f(S::X, *x);
            f(S::Y, *y);
            f(S::Mask, *mask);
        }
        InstKind::ExtractValue { x, .. } => f(S::X, *x),
        InstKind::InsertValue { x, elem, .. } => {
            f(S::X, *x);
            f(S::Elem, *elem);
        }
        InstKind::Alloca { nelems, .. } => {
            if let Some(n) = nelems {
                f(S::NElems, *n);
            }
        }
        InstKind::Load { src, .. } => f(S::Src, *src),
        InstKind::Store { src, dst, .. } => {
            f(S::Src, *src);
            f(S::Dst, *dst);
        }
        InstKind::Fence { .. } => {}
        InstKind::CmpXchg { ptr, cmp, new, .. } => {
            f(S::Ptr, *ptr);
            f(S::Cmp, *cmp);
            f(S::New, *new);
        }
        InstKind::AtomicRmw { dst, x, .. } => {
            f(S::Dst, *dst);
            f(S::X, *x);
        }
        InstKind::GetElementPtr { src, indices, .. } => {
            f(S::Src, *src);
            for (i, idx) in indices.iter().enumerate() {
                f(S::GepIndex(i as u32), *idx);
            }
        }
        InstKind::Conversion { from, .. } => f(S::From, *from),
        InstKind::ICmp { x, y, .. } | InstKind::FCmp { x, y, .. } => {
            f(S::X, *x);
            f(S::Y, *y);
        }
        InstKind::Phi { incs, .. } => {
            for (i, inc) in incs.iter().enumerate() {
                f(S::IncomingX(i as u32), inc.x);
                f(S::IncomingPred(i as u32), inc.pred);
            }
        }
        InstKind::Select { cond, x, y } => {
            f(S::Cond, *cond);
            f(S::X, *x);
            f(S::Y, *y);
        }
        InstKind::Call {
            callee,
            args,
            bundles,
            ..
        } => {
            f(S::Callee, *callee);
            for (i, arg) in args.iter().enumerate() {
                f(S::Arg(i as u32), *arg);
            }
            for (b, bundle) in bundles.iter().enumerate() {
                for (i, input) in bundle.inputs.iter().enumerate() {
                    f(
                        S::BundleInput {
                            bundle: b as u32,
                            input: i as u32,
                        },
                        *input,
                    );
                }
            }
        }
        InstKind::VaArg { arg_list, .. } => f(S::ArgList, *arg_list),
        InstKind::LandingPad { clauses, .. } => {
            for (i, clause) in clauses.iter().enumerate() {
                f(S::Clause(i as u32), clause.x);
            }
        }
        InstKind::CatchPad { scope, args } | InstKind::CleanupPad { scope, args } => {
            f(S::Scope, *scope);
            for (i, arg) in args.iter().enumerate() {
                f(S::Arg(i as u32), *arg);
            }
        }
        InstKind::Comment { .. } => {}
    }
}

/// Call `f` for every operand slot of a terminator, in operand order.
pub fn each_term_operand(kind: &TermKind, mut f: impl FnMut(TermSlot, Value)) {
    use TermSlot as S;
    match kind {
        TermKind::Ret { x } => {
            if let Some(x) = x {
                f(S::X, *x);
            }
        }
        TermKind::Br { target } => f(S::Target, *target),
        TermKind::CondBr {
            cond,
            target_true,
            target_false,
        } => {
            f(S::Cond, *cond);
            f(S::TargetTrue, *target_true);
            f(S::TargetFalse, *target_false);
        }
        TermKind::Switch {
            x,
            target_default,
            cases,
        } => {
            f(S::X, *x);
            f(S::TargetDefault, *target_default);
            for (i, case) in cases.iter().enumerate() {
                f(S::CaseX(i as u32), case.x);
                f(S::CaseTarget(i as u32), case.target);
            }
        }
        TermKind::IndirectBr {
            addr,
            valid_targets,
        } => {
            f(S::Addr, *addr);
            for (i, target) in valid_targets.iter().enumerate() {
                f(S::ValidTarget(i as u32), *target);
            }
        }
        TermKind::Invoke {
            invokee,
            args,
            normal,
            exception,
            bundles,
            ..
        } => {
            f(S::Invokee, *invokee);
            for (i, arg) in args.iter().enumerate() {
                f(S::Arg(i as u32), *arg);
            }
            f(S::Normal, *normal);
            f(S::Exception, *exception);
            each_bundle_input(bundles, &mut f);
        }
        TermKind::CallBr {
            callee,
            args,
            normal,
            others,
            bundles,
            ..
        } => {
            f(S::Callee, *callee);
            for (i, arg) in args.iter().enumerate() {
                f(S::Arg(i as u32), *arg);
            }
            f(S::Normal, *normal);
            for (i, other) in others.iter().enumerate() {
                f(S::Other(i as u32), *other);
            }
            each_bundle_input(bundles, &mut f);
        }
        TermKind::Resume { x } => f(S::X, *x),
        TermKind::CatchSwitch {
            scope,
            handlers,
            unwind_target,
        } => {
            f(S::Scope, *scope);
            for (i, handler) in handlers.iter().enumerate() {
                f(S::Handler(i as u32), *handler);
            }
            if let Some(target) = unwind_target {
                f(S::UnwindTarget, *target);
            }
        }
        TermKind::CatchRet { from, to } => {
            f(S::From, *from);
            f(S::To, *to);
        }
        TermKind::CleanupRet {
            from,
            unwind_target,
        } => {
            f(S::From, *from);
            if let Some(target) = unwind_target {
                f(S::UnwindTarget, *target);
            }
        }
        TermKind::Unreachable => {}
    }
}

fn each_bundle_input(bundles: &[OperandBundle], f: &mut impl FnMut(TermSlot, Value)) {
    for (b, bundle) in bundles.iter().enumerate() {
        for (i, input) in bundle.inputs.iter().enumerate() {
            f(
                TermSlot::BundleInput {
                    bundle: b as u32,
                    input: i as u32,
                },
                *input,
            );
        }
    }
}

// ============================================================================
// Slot resolution
// ============================================================================

// Generates the shared and mutable slot accessors from one table, so reading
// and rewriting a slot can never disagree about where it lives.
macro_rules! inst_slot_accessor {
    ($name:ident, $kind:ty, $value:ty, $get:ident, $as:ident) => {
        fn $name(kind: $kind, slot: InstSlot) -> Option<$value> {
            use InstSlot as S;
            match (kind, slot) {
                (
                    InstKind::Unary { x, .. }
                    | InstKind::Binary { x, .. }
                    | InstKind::Bitwise { x, .. }
                    | InstKind::ExtractElement { x, .. }
                    | InstKind::InsertElement { x, .. }
                    | InstKind::ShuffleVector { x, .. }
                    | InstKind::ExtractValue { x, .. }
                    | InstKind::InsertValue { x, .. }
                    | InstKind::AtomicRmw { x, .. }
                    | InstKind::ICmp { x, .. }
                    | InstKind::FCmp { x, .. }
                    | InstKind::Select { x, .. },
                    S::X,
                ) => Some(x),
                (
                    InstKind::Binary { y, .. }
                    | InstKind::Bitwise { y, .. }
                    | InstKind::ShuffleVector { y, .. }
                    | InstKind::ICmp { y, .. }
                    | InstKind::FCmp { y, .. }
                    | InstKind::Select { y, .. },
                    S::Y,
                ) => Some(y),
                (
                    InstKind::ExtractElement { index, .. } | InstKind::InsertElement { index, .. },
                    S::Index,
                ) => Some(index),
                (
                    InstKind::InsertElement { elem, .. } | InstKind::InsertValue { elem, .. },
                    S::Elem,
                ) => Some(elem),
                (InstKind::ShuffleVector { mask, .. }, S::Mask) => Some(mask),
                (InstKind::Alloca { nelems, .. }, S::NElems) => nelems.$as(),
                (
                    InstKind::Load { src, .. }
                    | InstKind::Store { src, .. }
                    | InstKind::GetElementPtr { src, .. },
                    S::Src,
                ) => Some(src),
                (InstKind::Store { dst, .. } | InstKind::AtomicRmw { dst, .. }, S::Dst) => {
                    Some(dst)
                }
                (InstKind::CmpXchg { ptr, .. }, S::Ptr) => Some(ptr),
                (InstKind::CmpXchg { cmp, .. }, S::Cmp) => Some(cmp),
                (InstKind::CmpXchg { new, .. }, S::New) => Some(new),
                (InstKind::GetElementPtr { indices, .. }, S::GepIndex(i)) => {
                    indices.$get(i as usize)
                }
                (InstKind::Conversion { from, .. }, S::From) => Some(from),
                (InstKind::Phi { incs, .. }, S::IncomingX(i)) => {
                    incs.$get(i as usize).map(|Incoming { x, .. }| x)
                }
                (InstKind::Phi { incs, .. }, S::IncomingPred(i)) => {
                    incs.$get(i as usize).map(|Incoming { pred, .. }| pred)
                }
                (InstKind::Select { cond, .. }, S::Cond) => Some(cond),
                (InstKind::Call { callee, .. }, S::Callee) => Some(callee),
                (
                    InstKind::Call { args, .. }
                    | InstKind::CatchPad { args, .. }
                    | InstKind::CleanupPad { args, .. },
                    S::Arg(i),
                ) => args.$get(i as usize),
                (InstKind::Call { bundles, .. }, S::BundleInput { bundle, input }) => bundles
                    .$get(bundle as usize)
                    .and_then(|OperandBundle { inputs, .. }| inputs.$get(input as usize)),
                (InstKind::VaArg { arg_list, .. }, S::ArgList) => Some(arg_list),
                (InstKind::LandingPad { clauses, .. }, S::Clause(i)) => {
                    clauses.$get(i as usize).map(|Clause { x, .. }| x)
                }
                (
                    InstKind::CatchPad { scope, .. } | InstKind::CleanupPad { scope, .. },
                    S::Scope,
                ) => Some(scope),
                _ => None,
            }
        }
    };
}

macro_rules! term_slot_accessor {
    ($name:ident, $kind:ty, $value:ty, $get:ident, $as:ident) => {
        fn $name(kind: $kind, slot: TermSlot) -> Option<$value> {
            use TermSlot as S;
            match (kind, slot) {
                (TermKind::Ret { x }, S::X) => x.$as(),
                (TermKind::Resume { x } | TermKind::Switch { x, .. }, S::X) => Some(x),
                (TermKind::Br { target }, S::Target) => Some(target),
                (TermKind::CondBr { cond, .. }, S::Cond) => Some(cond),
                (TermKind::CondBr { target_true, .. }, S::TargetTrue) => Some(target_true),
                (TermKind::CondBr { target_false, .. }, S::TargetFalse) => Some(target_false),
                (TermKind::Switch { target_default, .. }, S::TargetDefault) => {
                    Some(target_default)
                }
                (TermKind::Switch { cases, .. }, S::CaseX(i)) => {
                    cases.$get(i as usize).map(|Case { x, .. }| x)
                }
                (TermKind::Switch { cases, .. }, S::CaseTarget(i)) => {
                    cases.$get(i as usize).map(|Case { target, .. }| target)
                }
                (TermKind::IndirectBr { addr, .. }, S::Addr) => Some(addr),
                (TermKind::IndirectBr { valid_targets, .. }, S::ValidTarget(i)) => {
                    valid_targets.$get(i as usize)
                }
                (TermKind::Invoke { invokee, .. }, S::Invokee) => Some(invokee),
                (TermKind::CallBr { callee, .. }, S::Callee) => Some(callee),
                (TermKind::Invoke { args, .. } | TermKind::CallBr { args, .. }, S::Arg(i)) => {
                    args.$get(i as usize)
                }
                (TermKind::Invoke { normal, .. } | TermKind::CallBr { normal, .. }, S::Normal) => {
                    Some(normal)
                }
                (TermKind::Invoke { exception, .. }, S::Exception) => Some(exception),
                (TermKind::CallBr { others, .. }, S::Other(i)) => others.$get(i as usize),
                (
                    TermKind::Invoke { bundles, .. } | TermKind::CallBr { bundles, .. },
                    S::BundleInput { bundle, input },
                ) => bundles
                    .$get(bundle as usize)
                    .and_then(|OperandBundle { inputs, .. }| inputs.$get(input as usize)),
                (TermKind::CatchSwitch { scope, .. }, S::Scope) => Some(scope),
                (TermKind::CatchSwitch { handlers, .. }, S::Handler(i)) => {
                    handlers.$get(i as usize)
                }
                (
                    TermKind::CatchSwitch { unwind_target, .. }
                    | TermKind::CleanupRet { unwind_target, .. },
                    S::UnwindTarget,
                ) => unwind_target.$as(),
                (TermKind::CatchRet { from, .. } | TermKind::CleanupRet { from, .. }, S::From) => {
                    Some(from)
                }
                (TermKind::CatchRet { to, .. }, S::To) => Some(to),
                _ => None,
            }
        }
    };
}

inst_slot_accessor!(inst_slot, &InstKind, &Value, get, as_ref);
inst_slot_accessor!(inst_slot_mut, &mut InstKind, &mut Value, get_mut, as_mut);
term_slot_accessor!(term_slot, &TermKind, &Value, get, as_ref);
term_slot_accessor!(term_slot_mut, &mut TermKind, &mut Value, get_mut, as_mut);

// ============================================================================
// Use
// ============================================================================

/// A single operand slot: its owner and which slot of the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Use {
    Inst(InstRef, InstSlot),
    Term(TermRef, TermSlot),
}

impl Use {
    /// The value currently held by the slot.
    ///
    /// # Panics
    ///
    /// Panics if the owner no longer has this slot.
    pub fn get(self, ctx: &IrContext) -> Value {
        match self {
            Use::Inst(inst, slot) => {
                let kind = &ctx.inst(inst).kind;
                match inst_slot(kind, slot) {
                    Some(v) => *v,
                    None => stale_use(kind.kind_name(), &slot),
                }
            }
            Use::Term(term, slot) => {
                let kind = &ctx.term(term).kind;
                match term_slot(kind, slot) {
                    Some(v) => *v,
                    None => stale_use(kind.kind_name(), &slot),
                }
            }
        }
    }

    /// Rewrite the slot to hold `new`.
    ///
    /// Only the slot changes: the owner's variant, its other operands and its
    /// cached result type are left alone, and no type compatibility between
    /// the old and new value is checked. Use [`reset_types`] to bring result
    /// types back in line after rewrites.
    ///
    /// [`reset_types`]: crate::types::reset_types
    ///
    /// # Panics
    ///
    /// Panics if the owner no longer has this slot.
    pub fn replace(self, ctx: &mut IrContext, new: Value) {
        match self {
            Use::Inst(inst, slot) => {
                let kind = &mut ctx.inst_mut(inst).kind;
                let owner = kind.kind_name();
                match inst_slot_mut(kind, slot) {
                    Some(v) => *v = new,
                    None => stale_use(owner, &slot),
                }
            }
            Use::Term(term, slot) => {
                let kind = &mut ctx.term_mut(term).kind;
                let owner = kind.kind_name();
                match term_slot_mut(kind, slot) {
                    Some(v) => *v = new,
                    None => stale_use(owner, &slot),
                }
            }
        }
    }

    /// The instruction or terminator owning the slot, as a value.
    pub fn user(self) -> Value {
        match self {
            Use::Inst(inst, _) => Value::Inst(inst),
            Use::Term(term, _) => Value::Term(term),
        }
    }
}

fn stale_use(owner: &str, slot: &dyn std::fmt::Debug) -> ! {
    panic!("stale use: `{owner}` has no operand slot {slot:?}")
}

// ============================================================================
// Public API
// ============================================================================

/// Append the uses of an instruction to `out`. Existing contents are kept.
pub fn inst_uses_into(ctx: &IrContext, inst: InstRef, out: &mut Vec<Use>) {
    each_inst_operand(&ctx.inst(inst).kind, |slot, _| out.push(Use::Inst(inst, slot)));
}

/// Append the uses of a terminator to `out`. Existing contents are kept.
pub fn term_uses_into(ctx: &IrContext, term: TermRef, out: &mut Vec<Use>) {
    each_term_operand(&ctx.term(term).kind, |slot, _| out.push(Use::Term(term, slot)));
}

/// Append the uses of every instruction and terminator of a function body,
/// in block order, to `out`. Existing contents are kept.
pub fn func_uses_into(ctx: &IrContext, func: FuncRef, out: &mut Vec<Use>) {
    for &block in &ctx.func(func).blocks {
        let data = ctx.block(block);
        for &inst in &data.insts {
            inst_uses_into(ctx, inst, out);
        }
        if let Some(term) = data.term {
            term_uses_into(ctx, term, out);
        }
    }
}

/// Every operand slot of an instruction, in operand order.
pub fn inst_uses(ctx: &IrContext, inst: InstRef) -> Vec<Use> {
    let mut out = Vec::new();
    inst_uses_into(ctx, inst, &mut out);
    out
}

/// Every operand slot of a terminator, in operand order.
pub fn term_uses(ctx: &IrContext, term: TermRef) -> Vec<Use> {
    let mut out = Vec::new();
    term_uses_into(ctx, term, &mut out);
    out
}

/// Every operand slot of a function body.
pub fn func_uses(ctx: &IrContext, func: FuncRef) -> Vec<Use> {
    let mut out = Vec::new();
    func_uses_into(ctx, func, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use lir::opcode::BinaryOp;
    use lir::{FuncData, Ident, ParamRef, TypeRef};

    use super::*;

    struct Fixture {
        ctx: IrContext,
        i32_ty: TypeRef,
        func: FuncRef,
        x: ParamRef,
        y: ParamRef,
    }

    fn fixture() -> Fixture {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.int(32);
        let fn_ty = ctx.types.func(i32_ty, [i32_ty, i32_ty], false);
        let x = ctx.create_param(i32_ty, Ident::named("x"));
        let y = ctx.create_param(i32_ty, Ident::named("y"));
        let mut data = FuncData::new("f", fn_ty);
        data.params.extend([x, y]);
        let func = ctx.create_func(data);
        Fixture {
            ctx,
            i32_ty,
            func,
            x,
            y,
        }
    }

    fn values(ctx: &IrContext, uses: &[Use]) -> Vec<Value> {
        uses.iter().map(|u| u.get(ctx)).collect()
    }

    #[test]
    fn call_uses_callee_then_args_then_bundles() {
        let Fixture {
            mut ctx, func, x, y, ..
        } = fixture();
        let fn_ty = ctx.func(func).func_ty;
        let call = ctx.create_inst(
            InstKind::Call {
                func_ty: fn_ty,
                callee: func.into(),
                args: vec![x.into(), y.into()],
                bundles: vec![OperandBundle {
                    tag: "deopt".to_owned(),
                    inputs: vec![x.into()],
                }],
                tail: false,
            },
            Ident::unnamed(),
        );

        let uses = inst_uses(&ctx, call);
        assert_eq!(
            uses,
            [
                Use::Inst(call, InstSlot::Callee),
                Use::Inst(call, InstSlot::Arg(0)),
                Use::Inst(call, InstSlot::Arg(1)),
                Use::Inst(call, InstSlot::BundleInput { bundle: 0, input: 0 }),
            ]
        );
        assert_eq!(
            values(&ctx, &uses),
            [
                Value::Func(func),
                Value::Param(x),
                Value::Param(y),
                Value::Param(x)
            ]
        );
        assert!(uses.iter().all(|u| u.user() == Value::Inst(call)));
    }

    #[test]
    fn phi_interleaves_value_and_predecessor() {
        let Fixture {
            mut ctx,
            i32_ty,
            x,
            y,
            ..
        } = fixture();
        let a = ctx.create_block(Ident::named("a"));
        let b = ctx.create_block(Ident::named("b"));
        let phi = ctx.create_inst(
            InstKind::Phi {
                ty: i32_ty,
                incs: vec![
                    Incoming {
                        x: x.into(),
                        pred: a.into(),
                    },
                    Incoming {
                        x: y.into(),
                        pred: b.into(),
                    },
                ],
            },
            Ident::unnamed(),
        );
        let uses = inst_uses(&ctx, phi);
        assert_eq!(
            values(&ctx, &uses),
            [
                Value::Param(x),
                Value::Block(a),
                Value::Param(y),
                Value::Block(b)
            ]
        );
    }

    #[test]
    fn replace_rewrites_each_slot_in_place() {
        let Fixture {
            mut ctx,
            i32_ty,
            x,
            y,
            ..
        } = fixture();
        let add = ctx.create_inst(InstKind::binary(BinaryOp::Add, x, y), Ident::unnamed());
        let one: Value = ctx.const_int(i32_ty, 1).into();
        let two: Value = ctx.const_int(i32_ty, 2).into();

        let uses = inst_uses(&ctx, add);
        assert_eq!(uses.len(), 2);
        uses[0].replace(&mut ctx, one);
        uses[1].replace(&mut ctx, two);

        assert_eq!(values(&ctx, &inst_uses(&ctx, add)), [one, two]);
        assert_eq!(ctx.inst(add).kind, InstKind::binary(BinaryOp::Add, one, two));
    }

    #[test]
    fn switch_cases_contribute_value_and_target() {
        let Fixture {
            mut ctx, i32_ty, x, ..
        } = fixture();
        let dflt = ctx.create_block(Ident::named("default"));
        let one_bb = ctx.create_block(Ident::named("one"));
        let other = ctx.create_block(Ident::named("other"));
        let one = ctx.const_int(i32_ty, 1);
        let switch = ctx.create_term(
            TermKind::Switch {
                x: x.into(),
                target_default: dflt.into(),
                cases: vec![Case {
                    x: one.into(),
                    target: one_bb.into(),
                }],
            },
            Ident::unnamed(),
        );

        let uses = term_uses(&ctx, switch);
        assert_eq!(
            uses.iter().map(|u| match u {
                Use::Term(_, slot) => *slot,
                Use::Inst(..) => unreachable!(),
            }).collect::<Vec<_>>(),
            [
                TermSlot::X,
                TermSlot::TargetDefault,
                TermSlot::CaseX(0),
                TermSlot::CaseTarget(0),
            ]
        );
        uses[3].replace(&mut ctx, other.into());
        let TermKind::Switch { cases, .. } = &ctx.term(switch).kind else {
            unreachable!();
        };
        assert_eq!(cases[0].target, Value::Block(other));
    }

    #[test]
    fn optional_operands_are_counted_when_present() {
        let Fixture {
            mut ctx, i32_ty, x, ..
        } = fixture();
        let ret_void = ctx.create_term(TermKind::Ret { x: None }, Ident::unnamed());
        let ret = ctx.create_term(TermKind::Ret { x: Some(x.into()) }, Ident::unnamed());
        assert!(term_uses(&ctx, ret_void).is_empty());
        assert_eq!(term_uses(&ctx, ret), [Use::Term(ret, TermSlot::X)]);

        let fixed = ctx.create_inst(
            InstKind::Alloca {
                elem_ty: i32_ty,
                nelems: None,
                addr_space: 0,
            },
            Ident::unnamed(),
        );
        let dynamic = ctx.create_inst(
            InstKind::Alloca {
                elem_ty: i32_ty,
                nelems: Some(x.into()),
                addr_space: 0,
            },
            Ident::unnamed(),
        );
        assert!(inst_uses(&ctx, fixed).is_empty());
        assert_eq!(inst_uses(&ctx, dynamic).len(), 1);

        let cleanup = ctx.create_term(
            TermKind::CleanupRet {
                from: x.into(),
                unwind_target: None,
            },
            Ident::unnamed(),
        );
        assert_eq!(term_uses(&ctx, cleanup), [Use::Term(cleanup, TermSlot::From)]);
    }

    #[test]
    fn func_uses_follow_block_order_and_keep_buffer_contents() {
        let Fixture {
            mut ctx, func, x, y, ..
        } = fixture();
        let entry = ctx.create_block(Ident::named("entry"));
        let exit = ctx.create_block(Ident::named("exit"));
        ctx.push_block(func, entry);
        ctx.push_block(func, exit);
        let add = ctx.create_inst(InstKind::binary(BinaryOp::Add, x, y), Ident::unnamed());
        ctx.push_inst(entry, add);
        let br = ctx.create_term(
            TermKind::Br {
                target: exit.into(),
            },
            Ident::unnamed(),
        );
        ctx.set_term(entry, br);
        let ret = ctx.create_term(TermKind::Ret { x: Some(add.into()) }, Ident::unnamed());
        ctx.set_term(exit, ret);

        assert_eq!(
            func_uses(&ctx, func),
            [
                Use::Inst(add, InstSlot::X),
                Use::Inst(add, InstSlot::Y),
                Use::Term(br, TermSlot::Target),
                Use::Term(ret, TermSlot::X),
            ]
        );

        let mut buf = vec![Use::Term(ret, TermSlot::X)];
        term_uses_into(&ctx, br, &mut buf);
        assert_eq!(
            buf,
            [Use::Term(ret, TermSlot::X), Use::Term(br, TermSlot::Target)]
        );
    }

    #[test]
    #[should_panic(expected = "stale use: `add` has no operand slot Arg(3)")]
    fn resolving_a_missing_slot_panics() {
        let Fixture { mut ctx, x, y, .. } = fixture();
        let add = ctx.create_inst(InstKind::binary(BinaryOp::Add, x, y), Ident::unnamed());
        Use::Inst(add, InstSlot::Arg(3)).get(&ctx);
    }
}
