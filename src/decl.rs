use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;
use log::trace;

use crate::error::ResolveError;

/// Where a declaration came from. `index` is its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub index: usize,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Location {
    pub fn at(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line} (#{})", self.index),
            (Some(file), None) => write!(f, "{file} (#{})", self.index),
            _ => write!(f, "#{}", self.index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    // true when only forward declared
    pub opaque: bool,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opaque: false,
        }
    }
}

/// A C type as far as naming cares: the named type, how many `*`, and constness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CType {
    pub name: String,
    pub pointer_depth: u8,
    pub is_const: bool,
}

impl CType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pointer_depth: 0,
            is_const: false,
        }
    }

    pub fn ptr(mut self) -> Self {
        self.pointer_depth += 1;
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: CType,
    // e.g. the `buffer_length` that goes with a `const char *`
    pub len_hint: Option<String>,
}

impl From<CType> for Param {
    fn from(ty: CType) -> Self {
        Self { ty, len_hint: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub raw_name: String,
    pub params: Vec<Param>,
    pub location: Location,
}

impl FunctionDecl {
    pub fn new(raw_name: impl Into<String>) -> Self {
        Self {
            raw_name: raw_name.into(),
            params: vec![],
            location: Location::default(),
        }
    }

    pub fn param(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    /// True when the first parameter is `T *` or `const T *` for `owner`.
    /// `T **` or any other named type can not act as the receiver.
    pub fn has_receiver(&self, owner: &str) -> bool {
        self.params
            .first()
            .map_or(false, |p| p.ty.pointer_depth == 1 && p.ty.name == owner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Type(TypeDecl),
    Function(FunctionDecl),
}

/// The ordered input of one resolution run.
///
/// Function raw names are unique, which is checked on construction.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    types: IndexMap<String, TypeDecl>,
    functions: Vec<FunctionDecl>,
}

impl Declarations {
    pub fn new(decls: Vec<Decl>) -> Result<Self, ResolveError> {
        let mut types = IndexMap::new();
        let mut seen: IndexMap<String, Location> = IndexMap::new();
        let mut functions = vec![];
        for (index, decl) in decls.into_iter().enumerate() {
            match decl {
                Decl::Type(ty) => {
                    // a forward declaration followed by the definition is the same type
                    let known = types.entry(ty.name.clone()).or_insert_with(|| ty.clone());
                    if known.opaque && !ty.opaque {
                        *known = ty;
                    }
                }
                Decl::Function(mut func) => {
                    func.location.index = index;
                    match seen.entry(func.raw_name.clone()) {
                        Entry::Occupied(first) => {
                            return Err(ResolveError::DuplicateRawName {
                                name: func.raw_name,
                                first: first.get().clone(),
                                second: func.location,
                            })
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(func.location.clone());
                        }
                    }
                    functions.push(func);
                }
            }
        }
        trace!(
            "declarations: {} types, {} functions",
            types.len(),
            functions.len()
        );
        Ok(Self { types, functions })
    }

    pub fn functions(&self) -> &[FunctionDecl] {
        &self.functions
    }

    /// The declared type the first parameter points to, as in `T *`.
    pub fn receiver_owner(&self, func: &FunctionDecl) -> Option<&TypeDecl> {
        func.params
            .first()
            .filter(|p| p.ty.pointer_depth == 1)
            .and_then(|p| self.types.get(&p.ty.name))
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The type a function looks like it belongs to: the longest declared `T`
    /// for which the name reads `T_<something>`.
    pub fn candidate_owner(&self, raw_name: &str) -> Option<&TypeDecl> {
        self.types
            .values()
            .filter(|ty| {
                raw_name
                    .strip_prefix(ty.name.as_str())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map_or(false, |rest| !rest.is_empty())
            })
            .max_by_key(|ty| ty.name.len())
    }
}
