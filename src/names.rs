use syn::ext::IdentExt;
use syn::parse::Parser;
use syn::Ident;

/// How names produced by the default rules are shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum NameCase {
    /// keep the C spelling
    #[default]
    Keep,
    /// only make the first letter upper case
    Export,
    /// `foo_bar_baz` -> `FooBarBaz`
    Camel,
}

impl NameCase {
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Keep => name.to_string(),
            Self::Export => export_name(name),
            Self::Camel => pub_name(name),
        }
    }
}

// keywords are fine here, the emitter escapes them. Raw `r#` forms never
// name a C symbol.
pub fn is_identifier(name: &str) -> bool {
    !name.contains('#') && Ident::parse_any.parse_str(name).is_ok()
}

/// Strip the first prefix of the list that matches, in list order.
pub fn trim_prefix<'a>(name: &'a str, prefixes: &[String]) -> &'a str {
    prefixes
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix.as_str()))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name)
}

pub fn export_name(name: &str) -> String {
    match name.chars().next() {
        None => String::new(),
        Some(c) if c == '_' || c.is_ascii_digit() => format!("X{name}"),
        Some(c) => c.to_uppercase().chain(name[c.len_utf8()..].chars()).collect(),
    }
}

/// Camel case on `_` boundaries. Leading and trailing underscores survive,
/// names that could not start an exported identifier get an `X` in front.
pub fn pub_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let base = name.trim_matches('_');
    if base.is_empty() {
        return format!("X{name}");
    }
    let leading = &name[..name.len() - name.trim_start_matches('_').len()];
    let trailing = &name[name.trim_end_matches('_').len()..];
    if !leading.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
        format!("X{leading}{}{trailing}", to_camel_case(base, false))
    } else {
        format!("{}{trailing}", to_camel_case(base, true))
    }
}

pub fn to_camel_case(name: &str, upper_first: bool) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, part) in name.split('_').enumerate() {
        if i == 0 && !upper_first {
            out.push_str(part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Foo_Print"));
        assert!(is_identifier("Foo_"));
        assert!(is_identifier("type"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("Foo Bar"));
        assert!(!is_identifier("Foo*"));
        assert!(!is_identifier("r#foo"));
    }

    #[test]
    fn test_trim_prefix() {
        let prefixes = vec!["lua_".to_string(), "luaL_".to_string()];
        assert_eq!("pushnil", trim_prefix("lua_pushnil", &prefixes));
        assert_eq!("checkint", trim_prefix("luaL_checkint", &prefixes));
        assert_eq!("lua_", trim_prefix("lua_", &prefixes));
        assert_eq!("other", trim_prefix("other", &prefixes));
    }

    #[test]
    fn test_pub_name() {
        assert_eq!("PushNil", pub_name("push_nil"));
        assert_eq!("Print", pub_name("Print"));
        assert_eq!("X_private", pub_name("_private"));
        assert_eq!("X2d", pub_name("2d"));
        assert_eq!("Value_", pub_name("value_"));
        assert_eq!("X__", pub_name("__"));
    }

    #[test]
    fn test_export_name() {
        assert_eq!("Errcode", export_name("errcode"));
        assert_eq!("X_mp", export_name("_mp"));
        assert_eq!("X9lives", export_name("9lives"));
    }

    #[test]
    fn test_case_keep() {
        assert_eq!("push_nil", NameCase::Keep.apply("push_nil"));
        assert_eq!("Push_nil", NameCase::Export.apply("push_nil"));
    }
}
