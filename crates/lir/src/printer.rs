//! LLVM-flavoured text printer.
//!
//! ```text
//! define i32 @f(i32 %x, i32 %y) {
//! ; <label>:0
//! 	%1 = sub i32 %x, %y
//! 	call void @g()
//! 	ret i32 %1
//! }
//! ```
//!
//! Local values print by name, or by the ID handed out by
//! [`IrContext::assign_ids`]; values that have neither print as `%?`.

use std::fmt::{self, Write};

use crate::constant::{ConstData, ConstExpr};
use crate::context::IrContext;
use crate::ident::QuotedName;
use crate::inst::{ClauseKind, InstKind, OperandBundle};
use crate::metadata::{MdField, MetadataData};
use crate::refs::*;
use crate::term::TermKind;
use crate::types::TypeData;

// ============================================================================
// Public API
// ============================================================================

/// Print a whole module.
pub fn print_module(ctx: &IrContext, module: ModuleRef) -> String {
    let mut out = String::new();
    write_module(ctx, &mut out, module).expect("fmt::Write to String never fails");
    out
}

/// Print a function definition or declaration.
pub fn print_func(ctx: &IrContext, func: FuncRef) -> String {
    let mut out = String::new();
    write_func(ctx, &mut out, func).expect("fmt::Write to String never fails");
    out
}

/// Print a single instruction without indentation.
pub fn print_inst(ctx: &IrContext, inst: InstRef) -> String {
    let mut out = String::new();
    write_inst(ctx, &mut out, inst).expect("fmt::Write to String never fails");
    out
}

/// Print an operand with its type, e.g. `i32 %x`.
pub fn print_value(ctx: &IrContext, v: Value) -> String {
    let mut out = String::new();
    write_typed(ctx, &mut out, v).expect("fmt::Write to String never fails");
    out
}

/// Escape bytes for a quoted string: printable ASCII other than `"` and `\`
/// is kept, everything else becomes `\XX`.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (0x20..0x7f).contains(&b) && b != b'"' && b != b'\\' {
            out.push(b as char);
        } else {
            let _ = write!(out, "\\{b:02X}");
        }
    }
    out
}

// ============================================================================
// Module items
// ============================================================================

fn write_module(ctx: &IrContext, f: &mut impl Write, module: ModuleRef) -> fmt::Result {
    let data = ctx.module(module);
    let mut chunks: Vec<String> = Vec::new();

    let mut header = String::new();
    if let Some(name) = &data.source_filename {
        writeln!(header, "source_filename = \"{}\"", escape(name.as_bytes()))?;
    }
    if let Some(layout) = &data.data_layout {
        writeln!(header, "target datalayout = \"{}\"", escape(layout.as_bytes()))?;
    }
    if let Some(triple) = &data.target_triple {
        writeln!(header, "target triple = \"{}\"", escape(triple.as_bytes()))?;
    }
    chunks.push(header);

    let mut globals = String::new();
    for &g in &data.globals {
        let global = ctx.global(g);
        write!(globals, "@{} = ", QuotedName(&global.name))?;
        if global.init.is_none() {
            globals.push_str("external ");
        }
        globals.push_str(if global.immutable { "constant " } else { "global " });
        write!(globals, "{}", ctx.types.display(global.content_ty))?;
        if let Some(init) = global.init {
            globals.push(' ');
            write_value(ctx, &mut globals, init)?;
        }
        globals.push('\n');
    }
    chunks.push(globals);

    let mut indirect = String::new();
    for &a in &data.aliases {
        let alias = ctx.alias(a);
        write!(
            indirect,
            "@{} = alias {}, ",
            QuotedName(&alias.name),
            ctx.types.display(alias.content_ty)
        )?;
        write_typed(ctx, &mut indirect, alias.aliasee)?;
        indirect.push('\n');
    }
    for &i in &data.ifuncs {
        let ifunc = ctx.ifunc(i);
        write!(
            indirect,
            "@{} = ifunc {}, ",
            QuotedName(&ifunc.name),
            ctx.types.display(ifunc.content_ty)
        )?;
        write_typed(ctx, &mut indirect, ifunc.resolver)?;
        indirect.push('\n');
    }
    chunks.push(indirect);

    for &func in &data.funcs {
        let mut chunk = String::new();
        write_func(ctx, &mut chunk, func)?;
        chunks.push(chunk);
    }

    let mut orders = String::new();
    for &u in &data.use_list_orders {
        let order = ctx.use_list_order(u);
        orders.push_str("uselistorder ");
        write_typed(ctx, &mut orders, order.value)?;
        writeln!(orders, ", {}", Indices(&order.indices))?;
    }
    for &u in &data.use_list_order_bbs {
        let order = ctx.use_list_order_bb(u);
        orders.push_str("uselistorder_bb ");
        write_value(ctx, &mut orders, order.func)?;
        orders.push_str(", ");
        write_value(ctx, &mut orders, order.block)?;
        writeln!(orders, ", {}", Indices(&order.indices))?;
    }
    chunks.push(orders);

    let mut md = String::new();
    for &n in &data.named_metadata {
        let named = ctx.named_metadata(n);
        write!(md, "!{} = !{{", named.name)?;
        for (i, &node) in named.nodes.iter().enumerate() {
            if i > 0 {
                md.push_str(", ");
            }
            write!(md, "!{}", node.as_u32())?;
        }
        md.push_str("}\n");
    }
    for (m, node) in ctx.metadata_nodes() {
        if matches!(node, MetadataData::Tuple(_)) || node.specialized_name().is_some() {
            write!(md, "!{} = ", m.as_u32())?;
            write_metadata_def(ctx, &mut md, node)?;
            md.push('\n');
        }
    }
    chunks.push(md);

    let chunks: Vec<&str> = chunks
        .iter()
        .map(|c| c.trim_end_matches('\n'))
        .filter(|c| !c.is_empty())
        .collect();
    writeln!(f, "{}", chunks.join("\n\n"))
}

fn write_func(ctx: &IrContext, f: &mut impl Write, func: FuncRef) -> fmt::Result {
    let data = ctx.func(func);
    let (ret, variadic) = match ctx.types.get(data.func_ty) {
        TypeData::Func { ret, variadic, .. } => (*ret, *variadic),
        _ => panic!(
            "function @{} has non-function type `{}`",
            data.name,
            ctx.types.display(data.func_ty)
        ),
    };
    let define = !data.blocks.is_empty();
    write!(
        f,
        "{} {} @{}(",
        if define { "define" } else { "declare" },
        ctx.types.display(ret),
        QuotedName(&data.name)
    )?;
    for (i, &p) in data.params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        let param = ctx.param(p);
        write!(f, "{}", ctx.types.display(param.ty))?;
        if define {
            write!(f, " %{}", param.ident)?;
        }
    }
    if variadic {
        if !data.params.is_empty() {
            f.write_str(", ")?;
        }
        f.write_str("...")?;
    }
    f.write_str(")")?;
    for (keyword, v) in [
        ("prefix", data.prefix),
        ("prologue", data.prologue),
        ("personality", data.personality),
    ] {
        if let Some(v) = v {
            write!(f, " {keyword} ")?;
            write_typed(ctx, f, v)?;
        }
    }
    if !define {
        return writeln!(f);
    }
    f.write_str(" {\n")?;
    for &b in &data.blocks {
        let block = ctx.block(b);
        match (&block.ident.name, block.ident.id) {
            (Some(name), _) => writeln!(f, "{}:", QuotedName(name))?,
            (None, Some(id)) => writeln!(f, "; <label>:{id}")?,
            (None, None) => writeln!(f, "; <label>:?")?,
        }
        for &i in &block.insts {
            f.write_char('\t')?;
            write_inst(ctx, f, i)?;
            f.write_char('\n')?;
        }
        if let Some(t) = block.term {
            f.write_char('\t')?;
            write_term(ctx, f, t)?;
            f.write_char('\n')?;
        }
    }
    for &u in &data.use_list_orders {
        let order = ctx.use_list_order(u);
        f.write_str("\tuselistorder ")?;
        write_typed(ctx, f, order.value)?;
        writeln!(f, ", {}", Indices(&order.indices))?;
    }
    f.write_str("}\n")
}

struct Indices<'a>(&'a [u64]);

impl fmt::Display for Indices<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{idx}")?;
        }
        f.write_str(" }")
    }
}

// ============================================================================
// Operands
// ============================================================================

fn write_value(ctx: &IrContext, f: &mut impl Write, v: Value) -> fmt::Result {
    match v {
        Value::Const(c) => write_const(ctx, f, c),
        Value::Global(_) | Value::Func(_) | Value::Alias(_) | Value::IFunc(_) => {
            let name = ctx.global_name(v).unwrap_or("?");
            write!(f, "@{}", QuotedName(name))
        }
        Value::Param(_) | Value::Block(_) | Value::Inst(_) | Value::Term(_) => {
            match ctx.local_ident(v) {
                Some(ident) => write!(f, "%{ident}"),
                None => f.write_str("%?"),
            }
        }
        Value::Metadata(m) => write_metadata_ref(ctx, f, m),
    }
}

fn write_typed(ctx: &IrContext, f: &mut impl Write, v: Value) -> fmt::Result {
    write!(f, "{} ", ctx.types.display(ctx.value_ty(v)))?;
    write_value(ctx, f, v)
}

fn write_typed_list(ctx: &IrContext, f: &mut impl Write, vs: &[Value]) -> fmt::Result {
    for (i, &v) in vs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_typed(ctx, f, v)?;
    }
    Ok(())
}

fn write_bundles(ctx: &IrContext, f: &mut impl Write, bundles: &[OperandBundle]) -> fmt::Result {
    if bundles.is_empty() {
        return Ok(());
    }
    f.write_str(" [ ")?;
    for (i, bundle) in bundles.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "\"{}\"(", escape(bundle.tag.as_bytes()))?;
        write_typed_list(ctx, f, &bundle.inputs)?;
        f.write_str(")")?;
    }
    f.write_str(" ]")
}

// ============================================================================
// Constants
// ============================================================================

fn write_const(ctx: &IrContext, f: &mut impl Write, c: ConstRef) -> fmt::Result {
    match ctx.constant(c) {
        ConstData::Int { ty, value } => {
            if ctx.types.int_bits(*ty) == Some(1) {
                f.write_str(if *value != 0 { "true" } else { "false" })
            } else {
                write!(f, "{value}")
            }
        }
        ConstData::Float { value, .. } => write!(f, "{value:?}"),
        ConstData::Null { .. } => f.write_str("null"),
        ConstData::NoneToken => f.write_str("none"),
        ConstData::Struct { ty, fields } => {
            let packed = matches!(ctx.types.get(*ty), TypeData::Struct { packed: true, .. });
            f.write_str(if packed { "<{ " } else { "{ " })?;
            write_typed_list(ctx, f, fields)?;
            f.write_str(if packed { " }>" } else { " }" })
        }
        ConstData::Array { elems, .. } => {
            f.write_str("[")?;
            write_typed_list(ctx, f, elems)?;
            f.write_str("]")
        }
        ConstData::CharArray { bytes, .. } => write!(f, "c\"{}\"", escape(bytes)),
        ConstData::Vector { elems, .. } => {
            f.write_str("<")?;
            write_typed_list(ctx, f, elems)?;
            f.write_str(">")
        }
        ConstData::ZeroInitializer { .. } => f.write_str("zeroinitializer"),
        ConstData::Undef { .. } => f.write_str("undef"),
        ConstData::BlockAddress { func, block } => {
            f.write_str("blockaddress(")?;
            write_value(ctx, f, *func)?;
            f.write_str(", ")?;
            write_value(ctx, f, *block)?;
            f.write_str(")")
        }
        ConstData::Expr(expr) => write_const_expr(ctx, f, expr),
    }
}

fn write_const_expr(ctx: &IrContext, f: &mut impl Write, expr: &ConstExpr) -> fmt::Result {
    match expr {
        ConstExpr::Unary { op, x } => {
            write!(f, "{op} (")?;
            write_typed(ctx, f, *x)?;
        }
        ConstExpr::Binary { op, x, y } => {
            write!(f, "{op} (")?;
            write_typed_list(ctx, f, &[*x, *y])?;
        }
        ConstExpr::Bitwise { op, x, y } => {
            write!(f, "{op} (")?;
            write_typed_list(ctx, f, &[*x, *y])?;
        }
        ConstExpr::ExtractElement { x, index } => {
            f.write_str("extractelement (")?;
            write_typed_list(ctx, f, &[*x, *index])?;
        }
        ConstExpr::InsertElement { x, elem, index } => {
            f.write_str("insertelement (")?;
            write_typed_list(ctx, f, &[*x, *elem, *index])?;
        }
        ConstExpr::ShuffleVector { x, y, mask } => {
            f.write_str("shufflevector (")?;
            write_typed_list(ctx, f, &[*x, *y, *mask])?;
        }
        ConstExpr::ExtractValue { x, indices } => {
            f.write_str("extractvalue (")?;
            write_typed(ctx, f, *x)?;
            for idx in indices {
                write!(f, ", {idx}")?;
            }
        }
        ConstExpr::InsertValue { x, elem, indices } => {
            f.write_str("insertvalue (")?;
            write_typed_list(ctx, f, &[*x, *elem])?;
            for idx in indices {
                write!(f, ", {idx}")?;
            }
        }
        ConstExpr::GetElementPtr {
            elem_ty,
            src,
            indices,
            in_bounds,
        } => {
            f.write_str("getelementptr ")?;
            if *in_bounds {
                f.write_str("inbounds ")?;
            }
            write!(f, "({}, ", ctx.types.display(*elem_ty))?;
            write_typed(ctx, f, *src)?;
            for &idx in indices {
                f.write_str(", ")?;
                write_typed(ctx, f, idx)?;
            }
        }
        ConstExpr::Conversion { op, from, to } => {
            write!(f, "{op} (")?;
            write_typed(ctx, f, *from)?;
            write!(f, " to {}", ctx.types.display(*to))?;
        }
        ConstExpr::ICmp { pred, x, y } => {
            write!(f, "icmp {pred} (")?;
            write_typed_list(ctx, f, &[*x, *y])?;
        }
        ConstExpr::FCmp { pred, x, y } => {
            write!(f, "fcmp {pred} (")?;
            write_typed_list(ctx, f, &[*x, *y])?;
        }
        ConstExpr::Select { cond, x, y } => {
            f.write_str("select (")?;
            write_typed_list(ctx, f, &[*cond, *x, *y])?;
        }
    }
    f.write_str(")")
}

// ============================================================================
// Metadata
// ============================================================================

/// Inline form of a metadata operand. Strings, values and `null` print in
/// place; every other node prints as a `!N` reference.
fn write_metadata_ref(ctx: &IrContext, f: &mut impl Write, m: MetadataRef) -> fmt::Result {
    match ctx.metadata(m) {
        MetadataData::String(s) => write!(f, "!\"{}\"", escape(s.as_bytes())),
        MetadataData::Value(v) => write_typed(ctx, f, *v),
        MetadataData::Null => f.write_str("null"),
        _ => write!(f, "!{}", m.as_u32()),
    }
}

fn write_metadata_list(ctx: &IrContext, f: &mut impl Write, nodes: &[MetadataRef]) -> fmt::Result {
    f.write_str("!{")?;
    for (i, &node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_metadata_ref(ctx, f, node)?;
    }
    f.write_str("}")
}

fn write_metadata_def(ctx: &IrContext, f: &mut impl Write, node: &MetadataData) -> fmt::Result {
    let Some(name) = node.specialized_name() else {
        return match node {
            MetadataData::Tuple(nodes) => write_metadata_list(ctx, f, nodes),
            _ => Ok(()),
        };
    };
    write!(f, "!{name}(")?;
    if let MetadataData::DIExpression(expr) = node {
        f.write_str(&expr.elements.join(", "))?;
        return f.write_str(")");
    }
    for (i, (key, field)) in node.specialized_fields().into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key}: ")?;
        match field {
            MdField::Ref(m) => write_metadata_ref(ctx, f, m)?,
            MdField::Str(s) => write!(f, "\"{}\"", escape(s.as_bytes()))?,
            MdField::Enum(s) => f.write_str(s)?,
            MdField::Int(n) => write!(f, "{n}")?,
            MdField::Uint(n) => write!(f, "{n}")?,
            MdField::Bool(b) => write!(f, "{b}")?,
        }
    }
    if let MetadataData::GenericDINode(generic) = node {
        if !generic.operands.is_empty() {
            f.write_str(", operands: ")?;
            write_metadata_list(ctx, f, &generic.operands)?;
        }
    }
    f.write_str(")")
}

// ============================================================================
// Instructions and terminators
// ============================================================================

fn write_inst(ctx: &IrContext, f: &mut impl Write, inst: InstRef) -> fmt::Result {
    let data = ctx.inst(inst);
    if let InstKind::Comment { text } = &data.kind {
        return write!(f, "; {}", text.replace('\n', "; "));
    }
    if !ctx.types.is_void(data.ty) {
        write!(f, "%{} = ", data.ident)?;
    }
    match &data.kind {
        InstKind::Unary { op, x } => {
            write!(f, "{op} ")?;
            write_typed(ctx, f, *x)
        }
        InstKind::Binary { op, x, y } => {
            write!(f, "{op} ")?;
            write_typed(ctx, f, *x)?;
            f.write_str(", ")?;
            write_value(ctx, f, *y)
        }
        InstKind::Bitwise { op, x, y } => {
            write!(f, "{op} ")?;
            write_typed(ctx, f, *x)?;
            f.write_str(", ")?;
            write_value(ctx, f, *y)
        }
        InstKind::ExtractElement { x, index } => {
            f.write_str("extractelement ")?;
            write_typed_list(ctx, f, &[*x, *index])
        }
        InstKind::InsertElement { x, elem, index } => {
            f.write_str("insertelement ")?;
            write_typed_list(ctx, f, &[*x, *elem, *index])
        }
        InstKind::ShuffleVector { x, y, mask } => {
            f.write_str("shufflevector ")?;
            write_typed_list(ctx, f, &[*x, *y, *mask])
        }
        InstKind::ExtractValue { x, indices } => {
            f.write_str("extractvalue ")?;
            write_typed(ctx, f, *x)?;
            indices.iter().try_for_each(|idx| write!(f, ", {idx}"))
        }
        InstKind::InsertValue { x, elem, indices } => {
            f.write_str("insertvalue ")?;
            write_typed_list(ctx, f, &[*x, *elem])?;
            indices.iter().try_for_each(|idx| write!(f, ", {idx}"))
        }
        InstKind::Alloca {
            elem_ty,
            nelems,
            addr_space,
        } => {
            write!(f, "alloca {}", ctx.types.display(*elem_ty))?;
            if let Some(n) = nelems {
                f.write_str(", ")?;
                write_typed(ctx, f, *n)?;
            }
            if *addr_space != 0 {
                write!(f, ", addrspace({addr_space})")?;
            }
            Ok(())
        }
        InstKind::Load {
            elem_ty,
            src,
            volatile,
        } => {
            f.write_str("load ")?;
            if *volatile {
                f.write_str("volatile ")?;
            }
            write!(f, "{}, ", ctx.types.display(*elem_ty))?;
            write_typed(ctx, f, *src)
        }
        InstKind::Store { src, dst, volatile } => {
            f.write_str("store ")?;
            if *volatile {
                f.write_str("volatile ")?;
            }
            write_typed_list(ctx, f, &[*src, *dst])
        }
        InstKind::Fence { ordering } => write!(f, "fence {ordering}"),
        InstKind::CmpXchg {
            ptr,
            cmp,
            new,
            success,
            failure,
        } => {
            f.write_str("cmpxchg ")?;
            write_typed_list(ctx, f, &[*ptr, *cmp, *new])?;
            write!(f, " {success} {failure}")
        }
        InstKind::AtomicRmw {
            op,
            dst,
            x,
            ordering,
        } => {
            write!(f, "atomicrmw {op} ")?;
            write_typed_list(ctx, f, &[*dst, *x])?;
            write!(f, " {ordering}")
        }
        InstKind::GetElementPtr {
            elem_ty,
            src,
            indices,
            in_bounds,
        } => {
            f.write_str("getelementptr ")?;
            if *in_bounds {
                f.write_str("inbounds ")?;
            }
            write!(f, "{}, ", ctx.types.display(*elem_ty))?;
            write_typed(ctx, f, *src)?;
            for &idx in indices {
                f.write_str(", ")?;
                write_typed(ctx, f, idx)?;
            }
            Ok(())
        }
        InstKind::Conversion { op, from, to } => {
            write!(f, "{op} ")?;
            write_typed(ctx, f, *from)?;
            write!(f, " to {}", ctx.types.display(*to))
        }
        InstKind::ICmp { pred, x, y } => {
            write!(f, "icmp {pred} ")?;
            write_typed(ctx, f, *x)?;
            f.write_str(", ")?;
            write_value(ctx, f, *y)
        }
        InstKind::FCmp { pred, x, y } => {
            write!(f, "fcmp {pred} ")?;
            write_typed(ctx, f, *x)?;
            f.write_str(", ")?;
            write_value(ctx, f, *y)
        }
        InstKind::Phi { ty: phi_ty, incs } => {
            write!(f, "phi {} ", ctx.types.display(*phi_ty))?;
            for (i, inc) in incs.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str("[ ")?;
                write_value(ctx, f, inc.x)?;
                f.write_str(", ")?;
                write_value(ctx, f, inc.pred)?;
                f.write_str(" ]")?;
            }
            Ok(())
        }
        InstKind::Select { cond, x, y } => {
            f.write_str("select ")?;
            write_typed_list(ctx, f, &[*cond, *x, *y])
        }
        InstKind::Call {
            func_ty,
            callee,
            args,
            bundles,
            tail,
        } => {
            if *tail {
                f.write_str("tail ")?;
            }
            f.write_str("call ")?;
            write_callee(ctx, f, *func_ty, *callee)?;
            f.write_str("(")?;
            write_typed_list(ctx, f, args)?;
            f.write_str(")")?;
            write_bundles(ctx, f, bundles)
        }
        InstKind::VaArg { arg_list, ty: arg_ty } => {
            f.write_str("va_arg ")?;
            write_typed(ctx, f, *arg_list)?;
            write!(f, ", {}", ctx.types.display(*arg_ty))
        }
        InstKind::LandingPad {
            ty: pad_ty,
            cleanup,
            clauses,
        } => {
            write!(f, "landingpad {}", ctx.types.display(*pad_ty))?;
            if *cleanup {
                f.write_str(" cleanup")?;
            }
            for clause in clauses {
                match clause.kind {
                    ClauseKind::Catch => f.write_str(" catch ")?,
                    ClauseKind::Filter => f.write_str(" filter ")?,
                }
                write_typed(ctx, f, clause.x)?;
            }
            Ok(())
        }
        InstKind::CatchPad { scope, args } => {
            f.write_str("catchpad within ")?;
            write_value(ctx, f, *scope)?;
            f.write_str(" [")?;
            write_typed_list(ctx, f, args)?;
            f.write_str("]")
        }
        InstKind::CleanupPad { scope, args } => {
            f.write_str("cleanuppad within ")?;
            write_value(ctx, f, *scope)?;
            f.write_str(" [")?;
            write_typed_list(ctx, f, args)?;
            f.write_str("]")
        }
        InstKind::Comment { .. } => unreachable!("comments are printed above"),
    }
}

/// `ret_ty callee`, or the full function type for variadic callees.
fn write_callee(
    ctx: &IrContext,
    f: &mut impl Write,
    func_ty: TypeRef,
    callee: Value,
) -> fmt::Result {
    match ctx.types.get(func_ty) {
        TypeData::Func {
            ret,
            variadic: false,
            ..
        } => write!(f, "{} ", ctx.types.display(*ret))?,
        _ => write!(f, "{} ", ctx.types.display(func_ty))?,
    }
    write_value(ctx, f, callee)
}

fn write_label(ctx: &IrContext, f: &mut impl Write, target: Value) -> fmt::Result {
    f.write_str("label ")?;
    write_value(ctx, f, target)
}

fn write_label_list(ctx: &IrContext, f: &mut impl Write, targets: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, &target) in targets.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_label(ctx, f, target)?;
    }
    f.write_str("]")
}

fn write_unwind(ctx: &IrContext, f: &mut impl Write, target: Option<Value>) -> fmt::Result {
    match target {
        Some(target) => {
            f.write_str(" unwind ")?;
            write_label(ctx, f, target)
        }
        None => f.write_str(" unwind to caller"),
    }
}

fn write_term(ctx: &IrContext, f: &mut impl Write, term: TermRef) -> fmt::Result {
    let data = ctx.term(term);
    if !ctx.types.is_void(data.ty) {
        write!(f, "%{} = ", data.ident)?;
    }
    match &data.kind {
        TermKind::Ret { x: None } => f.write_str("ret void"),
        TermKind::Ret { x: Some(x) } => {
            f.write_str("ret ")?;
            write_typed(ctx, f, *x)
        }
        TermKind::Br { target } => {
            f.write_str("br ")?;
            write_label(ctx, f, *target)
        }
        TermKind::CondBr {
            cond,
            target_true,
            target_false,
        } => {
            f.write_str("br ")?;
            write_typed(ctx, f, *cond)?;
            f.write_str(", ")?;
            write_label(ctx, f, *target_true)?;
            f.write_str(", ")?;
            write_label(ctx, f, *target_false)
        }
        TermKind::Switch {
            x,
            target_default,
            cases,
        } => {
            f.write_str("switch ")?;
            write_typed(ctx, f, *x)?;
            f.write_str(", ")?;
            write_label(ctx, f, *target_default)?;
            f.write_str(" [")?;
            for case in cases {
                f.write_char(' ')?;
                write_typed(ctx, f, case.x)?;
                f.write_str(", ")?;
                write_label(ctx, f, case.target)?;
            }
            f.write_str(" ]")
        }
        TermKind::IndirectBr {
            addr,
            valid_targets,
        } => {
            f.write_str("indirectbr ")?;
            write_typed(ctx, f, *addr)?;
            f.write_str(", ")?;
            write_label_list(ctx, f, valid_targets)
        }
        TermKind::Invoke {
            func_ty,
            invokee,
            args,
            normal,
            exception,
            bundles,
        } => {
            f.write_str("invoke ")?;
            write_callee(ctx, f, *func_ty, *invokee)?;
            f.write_str("(")?;
            write_typed_list(ctx, f, args)?;
            f.write_str(")")?;
            write_bundles(ctx, f, bundles)?;
            f.write_str(" to ")?;
            write_label(ctx, f, *normal)?;
            f.write_str(" unwind ")?;
            write_label(ctx, f, *exception)
        }
        TermKind::CallBr {
            func_ty,
            callee,
            args,
            normal,
            others,
            bundles,
        } => {
            f.write_str("callbr ")?;
            write_callee(ctx, f, *func_ty, *callee)?;
            f.write_str("(")?;
            write_typed_list(ctx, f, args)?;
            f.write_str(")")?;
            write_bundles(ctx, f, bundles)?;
            f.write_str(" to ")?;
            write_label(ctx, f, *normal)?;
            f.write_char(' ')?;
            write_label_list(ctx, f, others)
        }
        TermKind::Resume { x } => {
            f.write_str("resume ")?;
            write_typed(ctx, f, *x)
        }
        TermKind::CatchSwitch {
            scope,
            handlers,
            unwind_target,
        } => {
            f.write_str("catchswitch within ")?;
            write_value(ctx, f, *scope)?;
            f.write_char(' ')?;
            write_label_list(ctx, f, handlers)?;
            write_unwind(ctx, f, *unwind_target)
        }
        TermKind::CatchRet { from, to } => {
            f.write_str("catchret from ")?;
            write_value(ctx, f, *from)?;
            f.write_str(" to ")?;
            write_label(ctx, f, *to)
        }
        TermKind::CleanupRet {
            from,
            unwind_target,
        } => {
            f.write_str("cleanupret from ")?;
            write_value(ctx, f, *from)?;
            write_unwind(ctx, f, *unwind_target)
        }
        TermKind::Unreachable => f.write_str("unreachable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::Ident;
    use crate::inst::Incoming;
    use crate::metadata::DIFile;
    use crate::module::{FuncData, GlobalData, ModuleData};
    use crate::opcode::BinaryOp;

    #[test]
    fn escape_non_printable() {
        assert_eq!(escape(b"a\"b\\c\n\0"), "a\\22b\\5Cc\\0A\\00");
    }

    #[test]
    fn print_loop_with_phi() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.int(32);
        let fn_ty = ctx.types.func(i32_ty, [i32_ty], false);
        let n = ctx.create_param(i32_ty, Ident::named("n"));
        let mut data = FuncData::new("count", fn_ty);
        data.params.push(n);
        let f = ctx.create_func(data);

        let entry = ctx.create_block(Ident::named("entry"));
        let body = ctx.create_block(Ident::named("loop"));
        ctx.push_block(f, entry);
        ctx.push_block(f, body);

        let br = ctx.create_term(TermKind::Br { target: body.into() }, Ident::unnamed());
        ctx.set_term(entry, br);

        let zero = ctx.const_int(i32_ty, 0);
        let one = ctx.const_int(i32_ty, 1);
        let phi = ctx.create_inst(
            InstKind::Phi {
                ty: i32_ty,
                incs: vec![Incoming {
                    x: zero.into(),
                    pred: entry.into(),
                }],
            },
            Ident::named("i"),
        );
        let next = ctx.create_inst(InstKind::binary(BinaryOp::Add, phi, one), Ident::unnamed());
        ctx.push_inst(body, phi);
        ctx.push_inst(body, next);
        if let InstKind::Phi { incs, .. } = &mut ctx.inst_mut(phi).kind {
            incs.push(Incoming {
                x: next.into(),
                pred: body.into(),
            });
        }
        let ret = ctx.create_term(TermKind::Ret { x: Some(n.into()) }, Ident::unnamed());
        ctx.set_term(body, ret);

        ctx.assign_ids(f).unwrap();
        assert_eq!(
            print_func(&ctx, f),
            "define i32 @count(i32 %n) {\n\
             entry:\n\
             \tbr label %loop\n\
             loop:\n\
             \t%i = phi i32 [ 0, %entry ], [ %0, %loop ]\n\
             \t%0 = add i32 %i, 1\n\
             \tret i32 %n\n\
             }\n"
        );
    }

    #[test]
    fn print_module_items_and_metadata() {
        let mut ctx = IrContext::new();
        let i8_ty = ctx.types.int(8);
        let arr = ctx.types.array(3, i8_ty);
        let hi = ctx.create_const(ConstData::CharArray {
            ty: arr,
            bytes: b"hi\0".to_vec(),
        });
        let g = ctx.create_global(GlobalData {
            name: "msg".to_owned(),
            content_ty: arr,
            immutable: true,
            init: Some(hi.into()),
        });
        let void = ctx.types.void();
        let fn_ty = ctx.types.func(void, [], false);
        let decl = ctx.create_func(FuncData::new("puts", fn_ty));
        let file = ctx.create_metadata(MetadataData::DIFile(DIFile {
            filename: "a.c".to_owned(),
            directory: "/tmp".to_owned(),
        }));
        let tuple = ctx.create_metadata(MetadataData::Tuple(vec![file]));
        let named = ctx.create_named_metadata(crate::metadata::NamedMetadataData {
            name: "llvm.ident".to_owned(),
            nodes: vec![tuple],
        });
        let m = ctx.create_module(ModuleData {
            source_filename: Some("a.c".to_owned()),
            globals: vec![g],
            funcs: vec![decl],
            named_metadata: vec![named],
            ..ModuleData::default()
        });

        assert_eq!(
            print_module(&ctx, m),
            "source_filename = \"a.c\"\n\
             \n\
             @msg = constant [3 x i8] c\"hi\\00\"\n\
             \n\
             declare void @puts()\n\
             \n\
             !llvm.ident = !{!1}\n\
             !0 = !DIFile(filename: \"a.c\", directory: \"/tmp\")\n\
             !1 = !{!0}\n"
        );
    }
}
