use std::fmt;

use log::debug;

use crate::decl::{Declarations, FunctionDecl};
use crate::disambiguate::Scope;
use crate::error::Warning;
use crate::names::{trim_prefix, NameCase};
use crate::rules::{Directive, RuleTable};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Function,
    /// method of the named owner type
    Method(String),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => f.write_str("fn"),
            Self::Method(owner) => write!(f, "method of {owner}"),
        }
    }
}

/// When a function whose name starts with `T_` becomes a method of `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiverPolicy {
    /// the name alone decides
    #[default]
    ByName,
    /// the first parameter must also be a `T *`
    RequireReceiver,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// stripped from plain function names, first match wins
    pub trim_prefixes: Vec<String>,
    pub case: NameCase,
    pub receiver: ReceiverPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol<'a> {
    pub source: &'a FunctionDecl,
    pub base_name: String,
    /// `base_name`, possibly with a `__N` suffix
    pub final_name: String,
    pub role: Role,
    /// the role says method but the symbol is written out as a plain function
    pub emit_as_function: bool,
}

impl ResolvedSymbol<'_> {
    pub fn raw_name(&self) -> &str {
        &self.source.raw_name
    }

    pub fn owner(&self) -> Option<&str> {
        match &self.role {
            Role::Method(owner) => Some(owner),
            Role::Function => None,
        }
    }

    /// Methods are unique per owner, everything written as a function is
    /// unique across the whole output.
    pub fn scope(&self) -> Scope {
        match &self.role {
            Role::Method(owner) if !self.emit_as_function => Scope::Owner(owner.clone()),
            _ => Scope::Global,
        }
    }
}

impl fmt::Display for ResolvedSymbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.raw_name(), self.final_name, self.role)?;
        if self.emit_as_function {
            f.write_str(" [emit as fn]")?;
        }
        Ok(())
    }
}

/// Computes the base name and role of each function on its own.
/// Nothing here looks at other functions, so duplicates are left to
/// [`crate::disambiguate`].
pub struct Resolver<'a> {
    decls: &'a Declarations,
    rules: &'a RuleTable,
    options: &'a ResolveOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(decls: &'a Declarations, rules: &'a RuleTable, options: &'a ResolveOptions) -> Self {
        Self {
            decls,
            rules,
            options,
        }
    }

    pub fn resolve(&self, func: &'a FunctionDecl) -> (ResolvedSymbol<'a>, Option<Warning>) {
        let raw = func.raw_name.as_str();
        let owner = self.decls.candidate_owner(raw).map(|ty| ty.name.as_str());
        let rule = self.rules.lookup(raw);
        let mut warning = None;

        let (mut base_name, role, emit_as_function) = match rule.and_then(|r| r.role()) {
            None | Some(Directive::Rename(_)) => match owner {
                Some(owner) if self.receiver_ok(func, owner) => {
                    (self.method_name(raw, owner), Role::Method(owner.to_string()), false)
                }
                _ => (self.function_name(raw), Role::Function, false),
            },
            Some(Directive::KeepFunction) => (raw.to_string(), Role::Function, false),
            Some(Directive::StripPrefix) => match owner {
                Some(owner) => self.forced_method(func, owner, false),
                None => {
                    warning = Some(Warning::UnknownRuleTarget {
                        symbol: raw.to_string(),
                        target: String::new(),
                    });
                    (self.function_name(raw), Role::Function, false)
                }
            },
            Some(Directive::KeepMethod {
                target,
                force_function_output,
            }) => match target
                .as_deref()
                .or(owner)
                .or_else(|| self.decls.receiver_owner(func).map(|ty| ty.name.as_str()))
            {
                Some(target) if self.decls.has_type(target) => {
                    self.forced_method(func, target, *force_function_output)
                }
                target => {
                    warning = Some(Warning::UnknownRuleTarget {
                        symbol: raw.to_string(),
                        target: target.unwrap_or_default().to_string(),
                    });
                    (self.function_name(raw), Role::Function, false)
                }
            },
        };

        if let Some(rename) = rule.and_then(|r| r.rename()) {
            base_name = rename.to_string();
        }

        debug!("{raw}: base `{base_name}`, {role}, emit as fn: {emit_as_function}");
        (
            ResolvedSymbol {
                source: func,
                final_name: base_name.clone(),
                base_name,
                role,
                emit_as_function,
            },
            warning,
        )
    }

    fn receiver_ok(&self, func: &FunctionDecl, owner: &str) -> bool {
        match self.options.receiver {
            ReceiverPolicy::ByName => true,
            ReceiverPolicy::RequireReceiver => func.has_receiver(owner),
        }
    }

    // configured as a method: keeps the method role even when it has to be
    // written out as a function
    fn forced_method(
        &self,
        func: &FunctionDecl,
        owner: &str,
        force_function_output: bool,
    ) -> (String, Role, bool) {
        let raw = func.raw_name.as_str();
        let role = Role::Method(owner.to_string());
        if force_function_output || !self.receiver_ok(func, owner) {
            (raw.to_string(), role, true)
        } else {
            (self.method_name(raw, owner), role, false)
        }
    }

    fn method_name(&self, raw: &str, owner: &str) -> String {
        let stripped = raw
            .strip_prefix(owner)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(raw);
        self.options.case.apply(stripped)
    }

    fn function_name(&self, raw: &str) -> String {
        self.options
            .case
            .apply(trim_prefix(raw, &self.options.trim_prefixes))
    }
}
