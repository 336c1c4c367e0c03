use std::collections::HashMap;

use log::trace;

use crate::resolver::ResolvedSymbol;

/// The namespace a final name has to be unique in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Owner(String),
}

/// Hands out final names in declaration order: the first `Bar` of a scope
/// stays `Bar`, the next ones become `Bar__1`, `Bar__2`, ...
#[derive(Debug, Default)]
pub struct Disambiguator {
    seen: HashMap<(Scope, String), usize>,
}

impl Disambiguator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick_name(&mut self, scope: Scope, base_name: &str) -> String {
        let count = self.seen.entry((scope, base_name.to_string())).or_insert(0);
        let name = match *count {
            0 => base_name.to_string(),
            n => format!("{base_name}__{n}"),
        };
        *count += 1;
        name
    }
}

/// Rewrites `final_name` of every colliding symbol. Must see the symbols in
/// declaration order.
pub fn disambiguate(mut candidates: Vec<ResolvedSymbol<'_>>) -> Vec<ResolvedSymbol<'_>> {
    let mut names = Disambiguator::new();
    for sym in candidates.iter_mut() {
        sym.final_name = names.pick_name(sym.scope(), &sym.base_name);
        if sym.final_name != sym.base_name {
            trace!("{} renamed to {} to avoid a collision", sym.raw_name(), sym.final_name);
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::FunctionDecl;
    use crate::resolver::Role;

    fn sym<'a>(decl: &'a FunctionDecl, base: &str, role: Role) -> ResolvedSymbol<'a> {
        ResolvedSymbol {
            source: decl,
            base_name: base.into(),
            final_name: base.into(),
            role,
            emit_as_function: false,
        }
    }

    fn final_names(syms: &[ResolvedSymbol]) -> Vec<String> {
        syms.iter().map(|s| s.final_name.clone()).collect()
    }

    #[test]
    fn test_suffix_in_declaration_order() {
        let decls: Vec<_> = ["a", "b", "c", "d"].iter().map(|n| FunctionDecl::new(*n)).collect();
        let out = disambiguate(vec![
            sym(&decls[0], "Bar", Role::Function),
            sym(&decls[1], "Bar", Role::Function),
            sym(&decls[2], "Baz", Role::Function),
            sym(&decls[3], "Bar", Role::Function),
        ]);
        assert_eq!(vec!["Bar", "Bar__1", "Baz", "Bar__2"], final_names(&out));
    }

    #[test]
    fn test_scopes_are_separate() {
        let decls: Vec<_> = ["a", "b", "c", "d"].iter().map(|n| FunctionDecl::new(*n)).collect();
        let out = disambiguate(vec![
            sym(&decls[0], "X", Role::Function),
            sym(&decls[1], "X", Role::Method("Foo".into())),
            sym(&decls[2], "X", Role::Method("Baz".into())),
            sym(&decls[3], "X", Role::Method("Foo".into())),
        ]);
        assert_eq!(vec!["X", "X", "X", "X__1"], final_names(&out));
    }

    #[test]
    fn test_emitted_as_function_is_global() {
        let decls: Vec<_> = ["a", "b"].iter().map(|n| FunctionDecl::new(*n)).collect();
        let mut forced = sym(&decls[1], "Parse", Role::Method("Foo".into()));
        forced.emit_as_function = true;
        let out = disambiguate(vec![sym(&decls[0], "Parse", Role::Function), forced]);
        assert_eq!(vec!["Parse", "Parse__1"], final_names(&out));
    }

    #[test]
    fn test_pick_name_counts_per_scope() {
        let mut names = Disambiguator::new();
        assert_eq!("Bar", names.pick_name(Scope::Global, "Bar"));
        assert_eq!("Bar__1", names.pick_name(Scope::Global, "Bar"));
        assert_eq!("Bar", names.pick_name(Scope::Owner("Foo".into()), "Bar"));
        assert_eq!("Bar__2", names.pick_name(Scope::Global, "Bar"));
    }
}
