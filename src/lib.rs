//! Decide what C functions are called in generated bindings.
//!
//! Functions named `Foo_Something` become methods of `Foo` unless a naming
//! rule says otherwise, and names that end up equal within a scope get a
//! `__N` suffix in declaration order.

pub mod decl;
pub mod disambiguate;
pub mod error;
pub mod names;
pub mod resolver;
pub mod rules;

use indexmap::IndexMap;
use log::{trace, warn};

pub use decl::{CType, Decl, Declarations, FunctionDecl, Location, Param, TypeDecl};
pub use disambiguate::{disambiguate, Scope};
pub use error::{ResolveError, Warning};
pub use names::NameCase;
pub use resolver::{ReceiverPolicy, ResolveOptions, ResolvedSymbol, Resolver, Role};
pub use rules::{Directive, MatchPattern, NamingRule, RuleTable};

/// Output of a run: one symbol per function, in declaration order.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub symbols: Vec<ResolvedSymbol<'a>>,
    pub warnings: Vec<Warning>,
}

impl<'a> Resolution<'a> {
    /// Symbols whose role is a method, grouped by owner in first-seen order.
    /// Methods that are written out as functions are included.
    pub fn methods_by_owner(&self) -> IndexMap<&str, Vec<&ResolvedSymbol<'a>>> {
        let mut groups: IndexMap<&str, Vec<&ResolvedSymbol<'a>>> = IndexMap::new();
        for sym in &self.symbols {
            if let Some(owner) = sym.owner() {
                groups.entry(owner).or_default().push(sym);
            }
        }
        groups
    }
}

/// Resolve every function, then make the names unique.
///
/// Fatal input problems are caught when building [`Declarations`] and
/// [`RuleTable`], so this can not fail. Recovered problems end up in
/// [`Resolution::warnings`].
pub fn resolve_all<'a>(
    decls: &'a Declarations,
    rules: &'a RuleTable,
    options: &'a ResolveOptions,
) -> Resolution<'a> {
    trace!("Starting resolve pass");
    let resolver = Resolver::new(decls, rules, options);
    let mut warnings = vec![];
    let mut candidates = Vec::with_capacity(decls.functions().len());
    for func in decls.functions() {
        let (sym, warning) = resolver.resolve(func);
        if let Some(warning) = warning {
            warn!("{warning}");
            warnings.push(warning);
        }
        candidates.push(sym);
    }
    trace!("Finished resolve pass");

    trace!("Starting disambiguate pass");
    let symbols = disambiguate(candidates);
    trace!("Finished disambiguate pass");
    Resolution { symbols, warnings }
}
