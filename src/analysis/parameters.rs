//! Parameter tokens to formal method parameters
//!
//! A query parameter token is either an ordinal (`?1`, `:1`, `$1`, SpEL
//! `[0]`) or a name (`:owner`). Anything that does not resolve is simply
//! left alone: no hint, no link and no problem.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::model::{SemanticTokenDatum, TokenType};

/// A declared parameter of the repository method owning the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalParameter {
    pub name: String,
    /// Range of the parameter name in the host document
    pub declaration_range: Range<usize>,
}

impl FormalParameter {
    pub fn new(name: impl Into<String>, declaration_range: Range<usize>) -> Self {
        Self { name: name.into(), declaration_range }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub parameters: Vec<FormalParameter>,
}

impl MethodDeclaration {
    pub fn new(name: impl Into<String>, parameters: Vec<FormalParameter>) -> Self {
        Self { name: name.into(), parameters }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterDescriptor {
    /// Zero-based position in the formal parameter list
    Index(usize),
    Name(String),
}

impl ParameterDescriptor {
    /// Reads the text of a parameter token.
    ///
    /// `N` and `$N` count from one, `[N]` from zero. An ordinal of zero in a
    /// one-based form has no parameter and yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return inner.trim().parse().ok().map(ParameterDescriptor::Index);
        }
        let ordinal = text.strip_prefix('$').unwrap_or(text);
        if !ordinal.is_empty() && ordinal.bytes().all(|b| b.is_ascii_digit()) {
            let n: usize = ordinal.parse().ok()?;
            return n.checked_sub(1).map(ParameterDescriptor::Index);
        }
        let starts_like_name = text.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_');
        starts_like_name.then(|| ParameterDescriptor::Name(text.to_string()))
    }

    pub fn resolve<'a>(&self, method: &'a MethodDeclaration) -> Option<&'a FormalParameter> {
        match self {
            ParameterDescriptor::Index(index) => method.parameters.get(*index),
            ParameterDescriptor::Name(name) => method.parameters.iter().find(|p| &p.name == name),
        }
    }
}

/// A parameter token in the query linked to its declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBinding {
    /// Token text as written in the query
    pub descriptor: String,
    pub usage_range: Range<usize>,
    pub parameter_name: String,
    pub declaration_range: Range<usize>,
}

/// Declaration range for `descriptor`, if it names a parameter of `method`.
pub fn resolve_parameter(method: &MethodDeclaration, descriptor: &str) -> Option<Range<usize>> {
    ParameterDescriptor::parse(descriptor)
        .and_then(|d| d.resolve(method).map(|p| p.declaration_range.clone()))
}

/// Binds every `parameter` token in `tokens` that resolves against `method`.
///
/// `document` is the host text the token offsets refer to.
pub fn bind_parameters(method: &MethodDeclaration, document: &str, tokens: &[SemanticTokenDatum]) -> Vec<ParameterBinding> {
    tokens
        .iter()
        .filter(|t| t.token_type == TokenType::Parameter)
        .filter_map(|t| {
            let text = t.text(document)?;
            let parameter = ParameterDescriptor::parse(text)?.resolve(method)?;
            Some(ParameterBinding {
                descriptor: text.to_string(),
                usage_range: t.range(),
                parameter_name: parameter.name.clone(),
                declaration_range: parameter.declaration_range.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_owners() -> MethodDeclaration {
        MethodDeclaration::new(
            "findOwners",
            vec![
                FormalParameter::new("lastName", 10..18),
                FormalParameter::new("total", 25..30),
                FormalParameter::new("city", 37..41),
            ],
        )
    }

    #[test]
    fn test_descriptor_forms() {
        assert_eq!(ParameterDescriptor::parse("2"), Some(ParameterDescriptor::Index(1)));
        assert_eq!(ParameterDescriptor::parse("$3"), Some(ParameterDescriptor::Index(2)));
        assert_eq!(ParameterDescriptor::parse("[0]"), Some(ParameterDescriptor::Index(0)));
        assert_eq!(ParameterDescriptor::parse("0"), None);
        assert_eq!(ParameterDescriptor::parse("total"), Some(ParameterDescriptor::Name("total".to_string())));
        assert_eq!(ParameterDescriptor::parse("{h-schema}"), None);
    }

    #[test]
    fn test_resolution_is_exact() {
        let method = find_owners();
        assert_eq!(resolve_parameter(&method, "2"), Some(25..30));
        assert_eq!(resolve_parameter(&method, "total"), Some(25..30));
        assert_eq!(resolve_parameter(&method, "Total"), None, "Names are case sensitive");
        assert_eq!(resolve_parameter(&method, "4"), None);
        assert_eq!(resolve_parameter(&method, "missing"), None);
    }

    #[test]
    fn test_bind_only_parameter_tokens() {
        let document = "WHERE o.city = :city AND o.total > ?2 AND o.name = :nobody";
        let tokens = vec![
            SemanticTokenDatum::new(8, 12, TokenType::Method),
            SemanticTokenDatum::new(16, 20, TokenType::Parameter),
            SemanticTokenDatum::new(36, 37, TokenType::Parameter),
            SemanticTokenDatum::new(52, 58, TokenType::Parameter),
        ];
        let bindings = bind_parameters(&find_owners(), document, &tokens);
        assert_eq!(bindings.len(), 2, "Unresolved :nobody is skipped");
        assert_eq!(bindings[0].parameter_name, "city");
        assert_eq!(bindings[1].descriptor, "2");
        assert_eq!(bindings[1].declaration_range, 25..30);
    }
}
