use std::cmp::Reverse;
use std::str::FromStr;

use indexmap::IndexMap;
use log::trace;

use crate::error::ResolveError;
use crate::names::is_identifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPattern {
    Exact(String),
    Prefix(String),
}

impl MatchPattern {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(s) | Self::Prefix(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// make it a method of the type its name starts with
    StripPrefix,
    /// leave name and role alone, even if it looks like a method
    KeepFunction,
    /// method of `target`, or of the inferred owner when `None`.
    /// With `force_function_output` the symbol is still grouped under the
    /// type but written out as a plain function under its raw name.
    KeepMethod {
        target: Option<String>,
        force_function_output: bool,
    },
    Rename(String),
}

impl Directive {
    fn is_role(&self) -> bool {
        !matches!(self, Self::Rename(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRule {
    pub pattern: MatchPattern,
    pub directives: Vec<Directive>,
}

impl NamingRule {
    pub fn exact(name: impl Into<String>, directive: Directive) -> Self {
        Self {
            pattern: MatchPattern::Exact(name.into()),
            directives: vec![directive],
        }
    }

    pub fn prefix(prefix: impl Into<String>, directive: Directive) -> Self {
        Self {
            pattern: MatchPattern::Prefix(prefix.into()),
            directives: vec![directive],
        }
    }

    pub fn and(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// The last role directive of the rule, if any.
    pub fn role(&self) -> Option<&Directive> {
        self.directives.iter().rev().find(|d| d.is_role())
    }

    /// The last rename of the rule, if any.
    pub fn rename(&self) -> Option<&str> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::Rename(name) => Some(name.as_str()),
            _ => None,
        })
    }

    fn matches(&self, raw_name: &str) -> bool {
        match &self.pattern {
            MatchPattern::Exact(name) => name == raw_name,
            MatchPattern::Prefix(prefix) => raw_name.starts_with(prefix.as_str()),
        }
    }

    fn validate(&self) -> Result<(), ResolveError> {
        let pattern = self.pattern.as_str();
        let invalid_pattern = |reason: &str| ResolveError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };
        if pattern.is_empty() {
            return Err(invalid_pattern("empty pattern"));
        }
        if !is_identifier(pattern) {
            return Err(invalid_pattern("not an identifier"));
        }
        if self.directives.is_empty() {
            return Err(ResolveError::InvalidDirective {
                pattern: pattern.to_string(),
                reason: "no directive".into(),
            });
        }
        for directive in &self.directives {
            let name = match directive {
                Directive::Rename(name) => name,
                Directive::KeepMethod {
                    target: Some(target),
                    ..
                } => target,
                _ => continue,
            };
            if !is_identifier(name) {
                return Err(ResolveError::InvalidDirective {
                    pattern: pattern.to_string(),
                    reason: format!("`{name}` is not an identifier"),
                });
            }
        }
        Ok(())
    }
}

/// Parse `PATTERN=DIRECTIVE[,DIRECTIVE...]`.
///
/// A pattern ending in `*` matches by prefix. Directives are `strip`, `fn`,
/// `method`, `method:Type`, `method:Type!` (keep output as function),
/// `rename:Name`, and `.Name` which is short for `method,rename:Name`.
impl FromStr for NamingRule {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pattern, directives) = s.split_once('=').ok_or_else(|| ResolveError::InvalidPattern {
            pattern: s.to_string(),
            reason: "expected PATTERN=DIRECTIVE".into(),
        })?;
        let pattern = pattern.trim();
        let pattern = match pattern.strip_suffix('*') {
            Some(prefix) => MatchPattern::Prefix(prefix.to_string()),
            None => MatchPattern::Exact(pattern.to_string()),
        };
        let mut rule = NamingRule {
            pattern,
            directives: vec![],
        };
        for directive in directives.split(',').map(str::trim) {
            match directive {
                "strip" => rule.directives.push(Directive::StripPrefix),
                "fn" => rule.directives.push(Directive::KeepFunction),
                "method" => rule.directives.push(Directive::KeepMethod {
                    target: None,
                    force_function_output: false,
                }),
                _ => {
                    if let Some(target) = directive.strip_prefix("method:") {
                        let (target, force_function_output) = match target.strip_suffix('!') {
                            Some(target) => (target, true),
                            None => (target, false),
                        };
                        rule.directives.push(Directive::KeepMethod {
                            target: Some(target.to_string()),
                            force_function_output,
                        });
                    } else if let Some(name) = directive.strip_prefix("rename:") {
                        rule.directives.push(Directive::Rename(name.to_string()));
                    } else if let Some(name) = directive.strip_prefix('.') {
                        rule.directives.push(Directive::KeepMethod {
                            target: None,
                            force_function_output: false,
                        });
                        rule.directives.push(Directive::Rename(name.to_string()));
                    } else {
                        return Err(ResolveError::InvalidDirective {
                            pattern: rule.pattern.as_str().to_string(),
                            reason: format!("unknown directive `{directive}`"),
                        });
                    }
                }
            }
        }
        rule.validate()?;
        Ok(rule)
    }
}

/// Rules for one run, looked up by raw symbol name.
///
/// Exact rules win over prefix rules, the longest prefix wins among prefix
/// rules and the earliest registered rule breaks ties.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<NamingRule>,
    exact: IndexMap<String, usize>,
}

impl RuleTable {
    pub fn new(rules: Vec<NamingRule>) -> Result<Self, ResolveError> {
        let mut exact = IndexMap::new();
        for (i, rule) in rules.iter().enumerate() {
            rule.validate()?;
            if let MatchPattern::Exact(name) = &rule.pattern {
                exact.entry(name.clone()).or_insert(i);
            }
        }
        trace!(
            "rule table: {} rules, {} exact",
            rules.len(),
            exact.len()
        );
        Ok(Self { rules, exact })
    }

    pub fn lookup(&self, raw_name: &str) -> Option<&NamingRule> {
        if let Some(&i) = self.exact.get(raw_name) {
            return Some(&self.rules[i]);
        }
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| matches!(rule.pattern, MatchPattern::Prefix(_)))
            .filter(|(_, rule)| rule.matches(raw_name))
            .min_by_key(|(i, rule)| (Reverse(rule.pattern.as_str().len()), *i))
            .map(|(_, rule)| rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        RuleTable::new(vec![
            NamingRule::prefix("Foo_", Directive::StripPrefix),
            NamingRule::prefix("Foo_Parse", Directive::KeepFunction),
            NamingRule::prefix("Foo_Parse", Directive::Rename("Parse".into())),
            NamingRule::exact("Foo_ParseWithSize", Directive::Rename("Sized".into())),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_before_prefix() {
        let table = table();
        assert_eq!(
            Some("Sized"),
            table.lookup("Foo_ParseWithSize").and_then(|r| r.rename())
        );
    }

    #[test]
    fn test_longest_prefix_then_earliest() {
        let table = table();
        let rule = table.lookup("Foo_ParseWithLength").unwrap();
        assert_eq!(Some(&Directive::KeepFunction), rule.role());
        let rule = table.lookup("Foo_Print").unwrap();
        assert_eq!(Some(&Directive::StripPrefix), rule.role());
        assert!(table.lookup("Bar_Print").is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RuleTable::new(vec![NamingRule::exact("", Directive::KeepFunction)]).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPattern { .. }));
        let err =
            RuleTable::new(vec![NamingRule::prefix("Foo-", Directive::StripPrefix)]).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPattern { .. }));
        let err = RuleTable::new(vec![NamingRule::exact(
            "Foo_Bar",
            Directive::Rename("Bar Baz".into()),
        )])
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidDirective { .. }));
    }

    #[test]
    fn test_parse_rule() {
        let rule: NamingRule = "Foo_ParseWithSize=method:Foo!".parse().unwrap();
        assert_eq!(
            NamingRule::exact(
                "Foo_ParseWithSize",
                Directive::KeepMethod {
                    target: Some("Foo".into()),
                    force_function_output: true,
                }
            ),
            rule
        );

        let rule: NamingRule = "Foo_*=strip".parse().unwrap();
        assert_eq!(NamingRule::prefix("Foo_", Directive::StripPrefix), rule);

        let rule: NamingRule = "Foo_ForBar = fn, rename:Bar".parse().unwrap();
        assert_eq!(Some(&Directive::KeepFunction), rule.role());
        assert_eq!(Some("Bar"), rule.rename());
    }

    #[test]
    fn test_parse_dot_shorthand() {
        let rule: NamingRule = "sqlite3_finalize=.Close".parse().unwrap();
        assert_eq!(
            vec![
                Directive::KeepMethod {
                    target: None,
                    force_function_output: false
                },
                Directive::Rename("Close".into()),
            ],
            rule.directives
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("Foo_Bar".parse::<NamingRule>().is_err());
        assert!("Foo_Bar=bogus".parse::<NamingRule>().is_err());
        assert!("=fn".parse::<NamingRule>().is_err());
        assert!("*=fn".parse::<NamingRule>().is_err());
        assert!("r#foo=fn".parse::<NamingRule>().is_err());
    }
}
