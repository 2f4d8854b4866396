//! Structured `target datalayout` descriptors.
//!
//! A descriptor is a `-`-separated list of specifications such as
//! `e-m:e-p270:32:32-i64:64-n8:16:32:64-S128`. Parsing starts from the
//! defaults for the given OS and architecture and overrides whatever the
//! string specifies. Unrecognised specifications are skipped; malformed
//! numbers in recognised ones are errors.
//!
//! All sizes and alignments are in bits.

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;

use derive_more::{Display, Error};
use lir::{TypeData, TypeInterner, TypeRef};
use tracing::{debug, trace};

use crate::layout::{DefaultLayout, Layout, SizeError};

/// Size and alignments of pointers in one address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerSpec {
    pub size: u64,
    pub abi: u64,
    pub pref: u64,
    /// Size of the index used for address calculation.
    pub index: u64,
}

/// ABI and preferred alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignSpec {
    pub abi: u64,
    pub pref: u64,
}

impl AlignSpec {
    pub const fn new(abi: u64, pref: u64) -> Self {
        Self { abi, pref }
    }
}

/// Function pointer alignment (`Fi<abi>` / `Fn<abi>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionPointerAlign {
    /// `true` if independent of function alignment, `false` if it is a
    /// multiple of the explicit function alignment.
    pub independent: bool,
    pub abi: u64,
}

/// Symbol mangling style (`m:<letter>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mangling {
    Elf,
    Mips,
    MachO,
    WinX86Coff,
    WinCoff,
    XCoff,
}

impl Mangling {
    pub fn letter(self) -> char {
        match self {
            Mangling::Elf => 'e',
            Mangling::Mips => 'm',
            Mangling::MachO => 'o',
            Mangling::WinX86Coff => 'x',
            Mangling::WinCoff => 'w',
            Mangling::XCoff => 'a',
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        Some(match letter {
            "e" => Mangling::Elf,
            "m" => Mangling::Mips,
            "o" => Mangling::MachO,
            "x" => Mangling::WinX86Coff,
            "w" => Mangling::WinCoff,
            "a" => Mangling::XCoff,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum DataLayoutError {
    #[display("invalid number in data layout specification `{spec}`: {source}")]
    InvalidNumber { spec: String, source: ParseIntError },
    #[display("data layout specification `{spec}` is missing a field")]
    MissingField { spec: String },
    #[display("unknown function pointer alignment kind in `{spec}`, expected `Fi` or `Fn`")]
    UnknownFunctionPointerKind { spec: String },
    #[display("unknown mangling style in `{spec}`")]
    UnknownMangling { spec: String },
}

/// Parsed `target datalayout`.
///
/// Tables are keyed by address space (pointers) or bit size (the rest) and
/// kept ordered so that serialisation is deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLayout {
    pub big_endian: bool,
    /// Natural stack alignment; `0` means unspecified.
    pub stack_alignment: u64,
    pub program_addr_space: u64,
    pub global_addr_space: u64,
    pub alloca_addr_space: u64,
    pub pointers: BTreeMap<u64, PointerSpec>,
    pub integers: BTreeMap<u64, AlignSpec>,
    pub vectors: BTreeMap<u64, AlignSpec>,
    pub floats: BTreeMap<u64, AlignSpec>,
    pub aggregate: AlignSpec,
    pub function_pointer: Option<FunctionPointerAlign>,
    pub mangling: Option<Mangling>,
    pub native_int_widths: Vec<u64>,
    pub non_integral_addr_spaces: Vec<u64>,
}

impl DataLayout {
    /// Defaults for the given OS and architecture.
    ///
    /// The mangling style follows the OS (`linux` is ELF, `darwin*` and
    /// `macosx*` are Mach-O); native integer widths are only known for
    /// `x86-64`.
    pub fn new(os: &str, arch: &str) -> Self {
        let mangling = if os == "linux" {
            Some(Mangling::Elf)
        } else if os.starts_with("darwin") || os.starts_with("macosx") {
            Some(Mangling::MachO)
        } else {
            None
        };
        let native_int_widths = match arch {
            "x86-64" => vec![8, 16, 32, 64],
            _ => Vec::new(),
        };
        Self {
            big_endian: true,
            stack_alignment: 0,
            program_addr_space: 0,
            global_addr_space: 0,
            alloca_addr_space: 0,
            pointers: BTreeMap::from([(
                0,
                PointerSpec {
                    size: 64,
                    abi: 64,
                    pref: 64,
                    index: 64,
                },
            )]),
            integers: BTreeMap::from([
                (1, AlignSpec::new(8, 8)),
                (8, AlignSpec::new(8, 8)),
                (16, AlignSpec::new(16, 16)),
                (32, AlignSpec::new(32, 32)),
                (64, AlignSpec::new(32, 64)),
            ]),
            vectors: BTreeMap::from([
                (64, AlignSpec::new(64, 64)),
                (128, AlignSpec::new(128, 128)),
            ]),
            floats: BTreeMap::from([
                (16, AlignSpec::new(16, 16)),
                (32, AlignSpec::new(32, 32)),
                (64, AlignSpec::new(64, 64)),
                (128, AlignSpec::new(128, 128)),
            ]),
            aggregate: AlignSpec::new(0, 64),
            function_pointer: None,
            mangling,
            native_int_widths,
            non_integral_addr_spaces: Vec::new(),
        }
    }

    /// Parse a descriptor on top of the defaults for `os` and `arch`.
    pub fn parse(descriptor: &str, os: &str, arch: &str) -> Result<Self, DataLayoutError> {
        let mut dl = Self::new(os, arch);
        for spec in descriptor.split('-') {
            dl.apply(spec)?;
        }
        debug!(%dl, "parsed data layout");
        Ok(dl)
    }

    fn apply(&mut self, spec: &str) -> Result<(), DataLayoutError> {
        let Some(head) = spec.chars().next() else {
            return Ok(());
        };
        let rest = &spec[head.len_utf8()..];
        match head {
            'e' if rest.is_empty() => self.big_endian = false,
            'E' if rest.is_empty() => self.big_endian = true,
            'S' => self.stack_alignment = number(spec, rest)?,
            'P' => self.program_addr_space = number(spec, rest)?,
            'G' => self.global_addr_space = number(spec, rest)?,
            'A' => self.alloca_addr_space = number(spec, rest)?,
            'p' => {
                let fields = Fields::new(spec);
                let addr_space = match fields.head(1) {
                    "" => 0,
                    n => number(spec, n)?,
                };
                let size = fields.required(1)?;
                let abi = fields.required(2)?;
                let pref = fields.optional(3)?.unwrap_or(abi);
                let index = fields.optional(4)?.unwrap_or(size);
                self.pointers.insert(
                    addr_space,
                    PointerSpec {
                        size,
                        abi,
                        pref,
                        index,
                    },
                );
            }
            'i' | 'v' | 'f' => {
                let fields = Fields::new(spec);
                let size = number(spec, fields.head(1))?;
                let abi = fields.required(1)?;
                let pref = fields.optional(2)?.unwrap_or(abi);
                let table = match head {
                    'i' => &mut self.integers,
                    'v' => &mut self.vectors,
                    _ => &mut self.floats,
                };
                table.insert(size, AlignSpec::new(abi, pref));
            }
            'a' => {
                let fields = Fields::new(spec);
                let abi = fields.required(1)?;
                let pref = fields.optional(2)?.unwrap_or(abi);
                self.aggregate = AlignSpec::new(abi, pref);
            }
            'F' => {
                let independent = match rest.chars().next() {
                    Some('i') => true,
                    Some('n') => false,
                    _ => {
                        return Err(DataLayoutError::UnknownFunctionPointerKind {
                            spec: spec.to_owned(),
                        });
                    }
                };
                self.function_pointer = Some(FunctionPointerAlign {
                    independent,
                    abi: number(spec, &rest[1..])?,
                });
            }
            'm' => {
                let letter = Fields::new(spec).text(1).ok_or_else(|| {
                    DataLayoutError::MissingField {
                        spec: spec.to_owned(),
                    }
                })?;
                self.mangling = Some(Mangling::from_letter(letter).ok_or_else(|| {
                    DataLayoutError::UnknownMangling {
                        spec: spec.to_owned(),
                    }
                })?);
            }
            // `ni` has to be matched before the native integer widths.
            'n' if rest.starts_with('i') => {
                self.non_integral_addr_spaces = number_list(spec, &rest[1..])?;
            }
            'n' => self.native_int_widths = number_list(spec, rest)?,
            _ => trace!(spec, "ignoring unrecognised data layout specification"),
        }
        Ok(())
    }
}

/// Colon-separated fields of one specification.
struct Fields<'a> {
    spec: &'a str,
    parts: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(spec: &'a str) -> Self {
        Self {
            spec,
            parts: spec.split(':').collect(),
        }
    }

    /// The first field with its `prefix_len`-byte tag stripped.
    fn head(&self, prefix_len: usize) -> &'a str {
        &self.parts[0][prefix_len..]
    }

    fn text(&self, i: usize) -> Option<&'a str> {
        self.parts.get(i).copied()
    }

    fn required(&self, i: usize) -> Result<u64, DataLayoutError> {
        match self.text(i) {
            Some(text) => number(self.spec, text),
            None => Err(DataLayoutError::MissingField {
                spec: self.spec.to_owned(),
            }),
        }
    }

    fn optional(&self, i: usize) -> Result<Option<u64>, DataLayoutError> {
        self.text(i).map(|text| number(self.spec, text)).transpose()
    }
}

fn number(spec: &str, text: &str) -> Result<u64, DataLayoutError> {
    text.parse().map_err(|source| DataLayoutError::InvalidNumber {
        spec: spec.to_owned(),
        source,
    })
}

/// `8:16:32`, with empty entries skipped so that both `ni1:2` and `ni:1:2`
/// are accepted.
fn number_list(spec: &str, text: &str) -> Result<Vec<u64>, DataLayoutError> {
    text.split(':')
        .filter(|part| !part.is_empty())
        .map(|part| number(spec, part))
        .collect()
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.big_endian { "E" } else { "e" })?;
        for (tag, value) in [
            ('S', self.stack_alignment),
            ('P', self.program_addr_space),
            ('G', self.global_addr_space),
            ('A', self.alloca_addr_space),
        ] {
            if value != 0 {
                write!(f, "-{tag}{value}")?;
            }
        }
        for (addr_space, p) in &self.pointers {
            f.write_str("-p")?;
            if *addr_space != 0 {
                write!(f, "{addr_space}")?;
            }
            write!(f, ":{}:{}:{}:{}", p.size, p.abi, p.pref, p.index)?;
        }
        for (tag, table) in [
            ('i', &self.integers),
            ('v', &self.vectors),
            ('f', &self.floats),
        ] {
            for (size, align) in table {
                write!(f, "-{tag}{size}:{}:{}", align.abi, align.pref)?;
            }
        }
        write!(f, "-a:{}:{}", self.aggregate.abi, self.aggregate.pref)?;
        if let Some(fp) = self.function_pointer {
            let kind = if fp.independent { 'i' } else { 'n' };
            write!(f, "-F{kind}{}", fp.abi)?;
        }
        if let Some(mangling) = self.mangling {
            write!(f, "-m:{}", mangling.letter())?;
        }
        if !self.native_int_widths.is_empty() {
            f.write_str("-n")?;
            write_number_list(f, &self.native_int_widths)?;
        }
        if !self.non_integral_addr_spaces.is_empty() {
            f.write_str("-ni:")?;
            write_number_list(f, &self.non_integral_addr_spaces)?;
        }
        Ok(())
    }
}

fn write_number_list(f: &mut fmt::Formatter<'_>, values: &[u64]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(":")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl Layout for DataLayout {
    /// Pointers are sized from the pointer table; other types fall back to
    /// [`DefaultLayout`].
    fn size_of(&self, types: &TypeInterner, ty: TypeRef) -> Result<u64, SizeError> {
        match types.get(ty) {
            TypeData::Pointer { addr_space } => self
                .pointers
                .get(&u64::from(*addr_space))
                .map(|p| p.size)
                .ok_or(SizeError::MissingPointerSpec {
                    addr_space: *addr_space,
                }),
            _ => DefaultLayout.size_of(types, ty),
        }
    }
}
