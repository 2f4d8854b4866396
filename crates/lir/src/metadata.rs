//! Metadata nodes.
//!
//! Metadata forms a general graph: debug scopes point at their parents,
//! composite types list members that point back at the composite, and so on.
//! Reference fields are therefore plain `MetadataRef`s and may form cycles.

use crate::refs::{MetadataRef, Value};

/// Data for a single metadata node in the arena.
#[derive(Clone, Debug, PartialEq)]
pub enum MetadataData {
    /// `!{!0, null, !"s"}`
    Tuple(Vec<MetadataRef>),
    /// A value wrapped as metadata (`i32 42`, `ptr @g`).
    Value(Value),
    /// `!"text"`
    String(String),
    /// `null`
    Null,

    DIBasicType(DIBasicType),
    DICommonBlock(DICommonBlock),
    DICompileUnit(DICompileUnit),
    DICompositeType(DICompositeType),
    DIDerivedType(DIDerivedType),
    DIEnumerator(DIEnumerator),
    DIExpression(DIExpression),
    DIFile(DIFile),
    DIGlobalVariable(DIGlobalVariable),
    DIGlobalVariableExpression(DIGlobalVariableExpression),
    DIImportedEntity(DIImportedEntity),
    DILabel(DILabel),
    DILexicalBlock(DILexicalBlock),
    DILexicalBlockFile(DILexicalBlockFile),
    DILocalVariable(DILocalVariable),
    DILocation(DILocation),
    DIMacro(DIMacro),
    DIMacroFile(DIMacroFile),
    DIModule(DIModule),
    DINamespace(DINamespace),
    DIObjCProperty(DIObjCProperty),
    DISubprogram(DISubprogram),
    DISubrange(DISubrange),
    DISubroutineType(DISubroutineType),
    DITemplateTypeParameter(DITemplateTypeParameter),
    DITemplateValueParameter(DITemplateValueParameter),
    GenericDINode(GenericDINode),
}

/// A named metadata definition: `!llvm.dbg.cu = !{!0}`.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedMetadataData {
    pub name: String,
    pub nodes: Vec<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIBasicType {
    pub name: String,
    pub size_bits: u64,
    pub encoding: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DICommonBlock {
    pub scope: Option<MetadataRef>,
    pub declaration: Option<MetadataRef>,
    pub name: String,
    pub file: Option<MetadataRef>,
    pub line: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DICompileUnit {
    pub language: String,
    pub file: Option<MetadataRef>,
    pub producer: String,
    pub enums: Option<MetadataRef>,
    pub retained_types: Option<MetadataRef>,
    pub globals: Option<MetadataRef>,
    pub imports: Option<MetadataRef>,
    pub macros: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DICompositeType {
    pub tag: String,
    pub name: String,
    pub scope: Option<MetadataRef>,
    pub file: Option<MetadataRef>,
    pub line: u32,
    pub base_type: Option<MetadataRef>,
    pub size_bits: u64,
    pub elements: Option<MetadataRef>,
    pub vtable_holder: Option<MetadataRef>,
    pub template_params: Option<MetadataRef>,
    pub identifier: String,
    pub discriminator: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIDerivedType {
    pub tag: String,
    pub name: String,
    pub scope: Option<MetadataRef>,
    pub file: Option<MetadataRef>,
    pub line: u32,
    pub base_type: Option<MetadataRef>,
    pub size_bits: u64,
    pub extra_data: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIEnumerator {
    pub name: String,
    pub value: i64,
    pub is_unsigned: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIExpression {
    /// Opcodes and literal operands, e.g. `DW_OP_plus_uconst`, `8`.
    pub elements: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIFile {
    pub filename: String,
    pub directory: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIGlobalVariable {
    pub name: String,
    pub scope: Option<MetadataRef>,
    pub file: Option<MetadataRef>,
    pub line: u32,
    pub ty: Option<MetadataRef>,
    pub is_local: bool,
    pub is_definition: bool,
    pub template_params: Option<MetadataRef>,
    pub declaration: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIGlobalVariableExpression {
    pub var: Option<MetadataRef>,
    pub expr: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIImportedEntity {
    pub tag: String,
    pub scope: Option<MetadataRef>,
    pub entity: Option<MetadataRef>,
    pub file: Option<MetadataRef>,
    pub line: u32,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DILabel {
    pub scope: Option<MetadataRef>,
    pub name: String,
    pub file: Option<MetadataRef>,
    pub line: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DILexicalBlock {
    pub scope: Option<MetadataRef>,
    pub file: Option<MetadataRef>,
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DILexicalBlockFile {
    pub scope: Option<MetadataRef>,
    pub file: Option<MetadataRef>,
    pub discriminator: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DILocalVariable {
    pub name: String,
    pub arg: u32,
    pub scope: Option<MetadataRef>,
    pub file: Option<MetadataRef>,
    pub line: u32,
    pub ty: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DILocation {
    pub line: u32,
    pub column: u32,
    pub scope: Option<MetadataRef>,
    pub inlined_at: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIMacro {
    pub macinfo_type: String,
    pub line: u32,
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIMacroFile {
    pub line: u32,
    pub file: Option<MetadataRef>,
    pub nodes: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIModule {
    pub scope: Option<MetadataRef>,
    pub name: String,
    pub include_path: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DINamespace {
    pub scope: Option<MetadataRef>,
    pub name: String,
    pub export_symbols: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DIObjCProperty {
    pub name: String,
    pub file: Option<MetadataRef>,
    pub line: u32,
    pub ty: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DISubprogram {
    pub scope: Option<MetadataRef>,
    pub name: String,
    pub linkage_name: String,
    pub file: Option<MetadataRef>,
    pub line: u32,
    pub ty: Option<MetadataRef>,
    pub containing_type: Option<MetadataRef>,
    pub unit: Option<MetadataRef>,
    pub template_params: Option<MetadataRef>,
    pub declaration: Option<MetadataRef>,
    pub retained_nodes: Option<MetadataRef>,
    pub thrown_types: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DISubrange {
    /// Element count; either a constant wrapped as metadata or a variable.
    pub count: Option<MetadataRef>,
    pub lower_bound: i64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DISubroutineType {
    pub types: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DITemplateTypeParameter {
    pub name: String,
    pub ty: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DITemplateValueParameter {
    pub name: String,
    pub ty: Option<MetadataRef>,
    pub value: Option<MetadataRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericDINode {
    pub tag: String,
    pub header: String,
    pub operands: Vec<MetadataRef>,
}

/// A field of a specialised node, as seen by the printer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MdField<'a> {
    Ref(MetadataRef),
    Str(&'a str),
    /// Unquoted enumerator such as `DW_TAG_structure_type`.
    Enum(&'a str),
    Int(i64),
    Uint(u64),
    Bool(bool),
}

macro_rules! md_fields {
    ($($name:literal => $field:expr),* $(,)?) => {{
        let mut fields = Vec::new();
        $(
            if let Some(field) = $field {
                fields.push(($name, field));
            }
        )*
        fields
    }};
}

fn r(field: Option<MetadataRef>) -> Option<MdField<'static>> {
    field.map(MdField::Ref)
}

fn s(field: &str) -> Option<MdField<'_>> {
    (!field.is_empty()).then_some(MdField::Str(field))
}

fn e(field: &str) -> Option<MdField<'_>> {
    (!field.is_empty()).then_some(MdField::Enum(field))
}

fn u(field: impl Into<u64>) -> Option<MdField<'static>> {
    let field = field.into();
    (field != 0).then_some(MdField::Uint(field))
}

fn b(field: bool) -> Option<MdField<'static>> {
    field.then_some(MdField::Bool(true))
}

impl MetadataData {
    /// Keyword of a specialised node (`DIFile`), or `None` for the generic
    /// tuple, value, string and null forms.
    pub fn specialized_name(&self) -> Option<&'static str> {
        let name = match self {
            MetadataData::Tuple(_)
            | MetadataData::Value(_)
            | MetadataData::String(_)
            | MetadataData::Null => return None,
            MetadataData::DIBasicType(_) => "DIBasicType",
            MetadataData::DICommonBlock(_) => "DICommonBlock",
            MetadataData::DICompileUnit(_) => "DICompileUnit",
            MetadataData::DICompositeType(_) => "DICompositeType",
            MetadataData::DIDerivedType(_) => "DIDerivedType",
            MetadataData::DIEnumerator(_) => "DIEnumerator",
            MetadataData::DIExpression(_) => "DIExpression",
            MetadataData::DIFile(_) => "DIFile",
            MetadataData::DIGlobalVariable(_) => "DIGlobalVariable",
            MetadataData::DIGlobalVariableExpression(_) => "DIGlobalVariableExpression",
            MetadataData::DIImportedEntity(_) => "DIImportedEntity",
            MetadataData::DILabel(_) => "DILabel",
            MetadataData::DILexicalBlock(_) => "DILexicalBlock",
            MetadataData::DILexicalBlockFile(_) => "DILexicalBlockFile",
            MetadataData::DILocalVariable(_) => "DILocalVariable",
            MetadataData::DILocation(_) => "DILocation",
            MetadataData::DIMacro(_) => "DIMacro",
            MetadataData::DIMacroFile(_) => "DIMacroFile",
            MetadataData::DIModule(_) => "DIModule",
            MetadataData::DINamespace(_) => "DINamespace",
            MetadataData::DIObjCProperty(_) => "DIObjCProperty",
            MetadataData::DISubprogram(_) => "DISubprogram",
            MetadataData::DISubrange(_) => "DISubrange",
            MetadataData::DISubroutineType(_) => "DISubroutineType",
            MetadataData::DITemplateTypeParameter(_) => "DITemplateTypeParameter",
            MetadataData::DITemplateValueParameter(_) => "DITemplateValueParameter",
            MetadataData::GenericDINode(_) => "GenericDINode",
        };
        Some(name)
    }

    /// Fields of a specialised node in source order, omitting empty ones.
    ///
    /// Returns an empty list for the generic forms; `DIExpression` and
    /// `GenericDINode` list operands the printer renders positionally.
    pub fn specialized_fields(&self) -> Vec<(&'static str, MdField<'_>)> {
        match self {
            MetadataData::Tuple(_)
            | MetadataData::Value(_)
            | MetadataData::String(_)
            | MetadataData::Null
            | MetadataData::DIExpression(_) => Vec::new(),
            MetadataData::DIBasicType(n) => md_fields! {
                "name" => s(&n.name),
                "size" => u(n.size_bits),
                "encoding" => e(&n.encoding),
            },
            MetadataData::DICommonBlock(n) => md_fields! {
                "scope" => r(n.scope),
                "declaration" => r(n.declaration),
                "name" => s(&n.name),
                "file" => r(n.file),
                "line" => u(n.line),
            },
            MetadataData::DICompileUnit(n) => md_fields! {
                "language" => e(&n.language),
                "file" => r(n.file),
                "producer" => s(&n.producer),
                "enums" => r(n.enums),
                "retainedTypes" => r(n.retained_types),
                "globals" => r(n.globals),
                "imports" => r(n.imports),
                "macros" => r(n.macros),
            },
            MetadataData::DICompositeType(n) => md_fields! {
                "tag" => e(&n.tag),
                "name" => s(&n.name),
                "scope" => r(n.scope),
                "file" => r(n.file),
                "line" => u(n.line),
                "baseType" => r(n.base_type),
                "size" => u(n.size_bits),
                "elements" => r(n.elements),
                "vtableHolder" => r(n.vtable_holder),
                "templateParams" => r(n.template_params),
                "identifier" => s(&n.identifier),
                "discriminator" => r(n.discriminator),
            },
            MetadataData::DIDerivedType(n) => md_fields! {
                "tag" => e(&n.tag),
                "name" => s(&n.name),
                "scope" => r(n.scope),
                "file" => r(n.file),
                "line" => u(n.line),
                "baseType" => r(n.base_type),
                "size" => u(n.size_bits),
                "extraData" => r(n.extra_data),
            },
            MetadataData::DIEnumerator(n) => md_fields! {
                "name" => s(&n.name),
                "value" => Some(MdField::Int(n.value)),
                "isUnsigned" => b(n.is_unsigned),
            },
            MetadataData::DIFile(n) => md_fields! {
                "filename" => Some(MdField::Str(&n.filename)),
                "directory" => Some(MdField::Str(&n.directory)),
            },
            MetadataData::DIGlobalVariable(n) => md_fields! {
                "name" => s(&n.name),
                "scope" => r(n.scope),
                "file" => r(n.file),
                "line" => u(n.line),
                "type" => r(n.ty),
                "isLocal" => b(n.is_local),
                "isDefinition" => b(n.is_definition),
                "templateParams" => r(n.template_params),
                "declaration" => r(n.declaration),
            },
            MetadataData::DIGlobalVariableExpression(n) => md_fields! {
                "var" => r(n.var),
                "expr" => r(n.expr),
            },
            MetadataData::DIImportedEntity(n) => md_fields! {
                "tag" => e(&n.tag),
                "scope" => r(n.scope),
                "entity" => r(n.entity),
                "file" => r(n.file),
                "line" => u(n.line),
                "name" => s(&n.name),
            },
            MetadataData::DILabel(n) => md_fields! {
                "scope" => r(n.scope),
                "name" => s(&n.name),
                "file" => r(n.file),
                "line" => u(n.line),
            },
            MetadataData::DILexicalBlock(n) => md_fields! {
                "scope" => r(n.scope),
                "file" => r(n.file),
                "line" => u(n.line),
                "column" => u(n.column),
            },
            MetadataData::DILexicalBlockFile(n) => md_fields! {
                "scope" => r(n.scope),
                "file" => r(n.file),
                "discriminator" => Some(MdField::Uint(n.discriminator.into())),
            },
            MetadataData::DILocalVariable(n) => md_fields! {
                "name" => s(&n.name),
                "arg" => u(n.arg),
                "scope" => r(n.scope),
                "file" => r(n.file),
                "line" => u(n.line),
                "type" => r(n.ty),
            },
            MetadataData::DILocation(n) => md_fields! {
                "line" => Some(MdField::Uint(n.line.into())),
                "column" => u(n.column),
                "scope" => r(n.scope),
                "inlinedAt" => r(n.inlined_at),
            },
            MetadataData::DIMacro(n) => md_fields! {
                "type" => e(&n.macinfo_type),
                "line" => u(n.line),
                "name" => s(&n.name),
                "value" => s(&n.value),
            },
            MetadataData::DIMacroFile(n) => md_fields! {
                "line" => u(n.line),
                "file" => r(n.file),
                "nodes" => r(n.nodes),
            },
            MetadataData::DIModule(n) => md_fields! {
                "scope" => r(n.scope),
                "name" => s(&n.name),
                "includePath" => s(&n.include_path),
            },
            MetadataData::DINamespace(n) => md_fields! {
                "scope" => r(n.scope),
                "name" => s(&n.name),
                "exportSymbols" => b(n.export_symbols),
            },
            MetadataData::DIObjCProperty(n) => md_fields! {
                "name" => s(&n.name),
                "file" => r(n.file),
                "line" => u(n.line),
                "type" => r(n.ty),
            },
            MetadataData::DISubprogram(n) => md_fields! {
                "scope" => r(n.scope),
                "name" => s(&n.name),
                "linkageName" => s(&n.linkage_name),
                "file" => r(n.file),
                "line" => u(n.line),
                "type" => r(n.ty),
                "containingType" => r(n.containing_type),
                "unit" => r(n.unit),
                "templateParams" => r(n.template_params),
                "declaration" => r(n.declaration),
                "retainedNodes" => r(n.retained_nodes),
                "thrownTypes" => r(n.thrown_types),
            },
            MetadataData::DISubrange(n) => md_fields! {
                "count" => r(n.count),
                "lowerBound" => (n.lower_bound != 0).then_some(MdField::Int(n.lower_bound)),
            },
            MetadataData::DISubroutineType(n) => md_fields! {
                "types" => r(n.types),
            },
            MetadataData::DITemplateTypeParameter(n) => md_fields! {
                "name" => s(&n.name),
                "type" => r(n.ty),
            },
            MetadataData::DITemplateValueParameter(n) => md_fields! {
                "name" => s(&n.name),
                "type" => r(n.ty),
                "value" => r(n.value),
            },
            MetadataData::GenericDINode(n) => md_fields! {
                "tag" => e(&n.tag),
                "header" => s(&n.header),
            },
        }
    }
}
