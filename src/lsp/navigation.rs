//! Inlay hints, definitions and highlights for query parameters

use lsp_types::{
    DocumentHighlight, DocumentHighlightKind, GotoDefinitionResponse, InlayHint, InlayHintKind, InlayHintLabel, Location,
};
use tracing::debug;

use crate::analysis::{bind_parameters, MethodDeclaration, ParameterBinding, SemanticTokenDatum};
use crate::document::HostDocument;

/// Parameter bindings of one query, computed per request.
pub struct ParameterNavigator {
    bindings: Vec<ParameterBinding>,
}

impl ParameterNavigator {
    pub fn new(method: &MethodDeclaration, document: &HostDocument, tokens: &[SemanticTokenDatum]) -> Self {
        let text = document.text();
        let bindings = bind_parameters(method, &text, tokens);
        debug!("{} parameter binding(s) in {}", bindings.len(), method.name);
        Self { bindings }
    }

    pub fn bindings(&self) -> &[ParameterBinding] {
        &self.bindings
    }

    /// Formal parameter name after every parameter usage.
    pub fn inlay_hints(&self, document: &HostDocument) -> Vec<InlayHint> {
        self.bindings
            .iter()
            .filter_map(|binding| {
                Some(InlayHint {
                    position: document.position_of(binding.usage_range.end)?,
                    label: InlayHintLabel::String(binding.parameter_name.clone()),
                    kind: Some(InlayHintKind::PARAMETER),
                    text_edits: None,
                    tooltip: None,
                    padding_left: Some(true),
                    padding_right: None,
                    data: None,
                })
            })
            .collect()
    }

    fn usage_at(&self, offset: usize) -> Option<&ParameterBinding> {
        self.bindings.iter().find(|b| b.usage_range.start <= offset && offset <= b.usage_range.end)
    }

    /// Declaration of the parameter used at `offset`.
    pub fn definition(&self, document: &HostDocument, offset: usize) -> Option<GotoDefinitionResponse> {
        let binding = self.usage_at(offset)?;
        let range = document.range_of(binding.declaration_range.clone())?;
        Some(GotoDefinitionResponse::Scalar(Location { uri: document.uri()?, range }))
    }

    /// Every occurrence of the parameter at `offset`, whether the cursor is
    /// on a usage or on the declaration.
    pub fn highlights(&self, document: &HostDocument, offset: usize) -> Vec<DocumentHighlight> {
        let declaration = match self.usage_at(offset) {
            Some(binding) => binding.declaration_range.clone(),
            None => match self
                .bindings
                .iter()
                .find(|b| b.declaration_range.start <= offset && offset <= b.declaration_range.end)
            {
                Some(binding) => binding.declaration_range.clone(),
                None => return Vec::new(),
            },
        };

        let mut highlights = Vec::new();
        if let Some(range) = document.range_of(declaration.clone()) {
            highlights.push(DocumentHighlight { range, kind: Some(DocumentHighlightKind::WRITE) });
        }
        for binding in self.bindings.iter().filter(|b| b.declaration_range == declaration) {
            if let Some(range) = document.range_of(binding.usage_range.clone()) {
                highlights.push(DocumentHighlight { range, kind: Some(DocumentHighlightKind::READ) });
            }
        }
        highlights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FormalParameter, TokenType};
    use indoc::indoc;
    use lsp_types::Position;
    use url::Url;

    const SOURCE: &str = indoc! {r#"
        @Query("select o from Owner o where o.city = :city or o.name = ?1")
        List<Owner> find(String name, String city);
    "#};

    fn setup() -> (HostDocument, ParameterNavigator) {
        let doc = HostDocument::new(Url::parse("file:///repo/OwnerRepository.java").unwrap(), 0, SOURCE);
        let name_decl = SOURCE.find("name,").unwrap();
        let city_decl = SOURCE.find("city)").unwrap();
        let method = MethodDeclaration::new(
            "find",
            vec![
                FormalParameter::new("name", name_decl..name_decl + 4),
                FormalParameter::new("city", city_decl..city_decl + 4),
            ],
        );
        let city_use = SOURCE.find(":city").unwrap() + 1;
        let ordinal_use = SOURCE.find("?1").unwrap() + 1;
        let tokens = vec![
            SemanticTokenDatum::new(city_use, city_use + 4, TokenType::Parameter),
            SemanticTokenDatum::new(ordinal_use, ordinal_use + 1, TokenType::Parameter),
        ];
        let navigator = ParameterNavigator::new(&method, &doc, &tokens);
        (doc, navigator)
    }

    #[test]
    fn test_inlay_hints_follow_usages() {
        let (doc, navigator) = setup();
        let hints = navigator.inlay_hints(&doc);
        assert_eq!(hints.len(), 2);
        let labels: Vec<_> = hints
            .iter()
            .map(|h| match &h.label {
                InlayHintLabel::String(s) => s.clone(),
                InlayHintLabel::LabelParts(_) => String::new(),
            })
            .collect();
        assert_eq!(labels, vec!["city".to_string(), "name".to_string()]);
        assert_eq!(hints[0].position, Position::new(0, 50));
    }

    #[test]
    fn test_definition_links_to_declaration() {
        let (doc, navigator) = setup();
        let ordinal = SOURCE.find("?1").unwrap() + 1;
        let Some(GotoDefinitionResponse::Scalar(location)) = navigator.definition(&doc, ordinal) else {
            panic!("Expected a single location");
        };
        assert_eq!(location.range.start.line, 1);
        assert_eq!(location.range.start.character, 24);
        assert!(navigator.definition(&doc, 0).is_none());
    }

    #[test]
    fn test_highlights_are_symmetric() {
        let (doc, navigator) = setup();
        let from_usage = navigator.highlights(&doc, SOURCE.find(":city").unwrap() + 2);
        let from_declaration = navigator.highlights(&doc, SOURCE.find("city)").unwrap());
        assert_eq!(from_usage, from_declaration);
        assert_eq!(from_usage.len(), 2);
        assert_eq!(from_usage[0].kind, Some(DocumentHighlightKind::WRITE));
    }
}
