// src/core/interpolator.rs

//! # Template Formatter
//!
//! Expands prompt and banner templates. A template is scanned once, left to right, into
//! [`TemplateComponent`]s: registered placeholders, color tokens and literal text (which
//! includes every unknown `{...}` token). Rendering then invokes each placeholder producer
//! and copies its value as plain text, so a value that happens to contain `{red}` or `{U}`
//! is never expanded a second time.

use crate::{
    core::{color, variables::VariableRegistry},
    models::TemplateComponent,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Candidate tokens: letters enclosed in braces.
    static ref TOKEN_RE: Regex = Regex::new(r"\{[A-Za-z]+\}").expect("token regex is valid");
}

/// Expands templates against a [`VariableRegistry`] and the color table.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    registry: &'a VariableRegistry,
}

impl<'a> Interpolator<'a> {
    pub fn new(registry: &'a VariableRegistry) -> Self {
        Self { registry }
    }

    /// Expands every placeholder, then every color token.
    ///
    /// Placeholders take precedence over colors. Unknown tokens are left verbatim.
    pub fn format(&self, template: &str) -> String {
        log::debug!("Format string: {:?}", template);
        let components = self.tokenize(template);
        let formatted = self.render(&components);
        log::debug!("Formatted string: {:?}", formatted);
        formatted
    }

    /// Phase one only: expands placeholders and leaves color tokens in place.
    pub fn expand_placeholders(&self, template: &str) -> String {
        let components = scan(template, |token| {
            self.registry
                .lookup(token)
                .map(|_| TemplateComponent::Placeholder(token.to_string()))
        });
        self.render(&components)
    }

    /// Splits a template into literal, placeholder and color components.
    pub fn tokenize(&self, template: &str) -> Vec<TemplateComponent> {
        scan(template, |token| {
            if self.registry.lookup(token).is_some() {
                Some(TemplateComponent::Placeholder(token.to_string()))
            } else {
                color::lookup_color_token(token).map(TemplateComponent::Color)
            }
        })
    }

    /// Renders components, invoking placeholder producers afresh.
    pub fn render(&self, components: &[TemplateComponent]) -> String {
        let mut output = String::new();
        for component in components {
            match component {
                TemplateComponent::Literal(text) => output.push_str(text),
                TemplateComponent::Placeholder(token) => {
                    if let Some(value) = self.registry.produce(token) {
                        output.push_str(&value);
                    } else {
                        output.push_str(token);
                    }
                }
                TemplateComponent::Color(code) => output.push_str(code),
            }
        }
        output
    }
}

/// Phase two only: expands color tokens and leaves everything else in place.
pub fn expand_colors(template: &str) -> String {
    let components = scan(template, |token| {
        color::lookup_color_token(token).map(TemplateComponent::Color)
    });
    components
        .iter()
        .map(|component| match component {
            TemplateComponent::Literal(text) | TemplateComponent::Placeholder(text) => {
                text.as_str()
            }
            TemplateComponent::Color(code) => *code,
        })
        .collect()
}

/// Single left-to-right pass over `template`. `resolve` decides what each candidate
/// token becomes; unresolved tokens are merged into the surrounding literal.
fn scan(
    template: &str,
    resolve: impl Fn(&str) -> Option<TemplateComponent>,
) -> Vec<TemplateComponent> {
    let mut components = Vec::new();

    // Adjacent literal text is merged into one component.
    let push_literal = |components: &mut Vec<TemplateComponent>, s: &str| {
        if s.is_empty() {
            return;
        }
        if let Some(TemplateComponent::Literal(last)) = components.last_mut() {
            last.push_str(s);
        } else {
            components.push(TemplateComponent::Literal(s.to_string()));
        }
    };

    let mut last_index = 0;
    for token in TOKEN_RE.find_iter(template) {
        push_literal(
            &mut components,
            template.get(last_index..token.start()).unwrap_or_default(),
        );
        match resolve(token.as_str()) {
            Some(component) => components.push(component),
            None => push_literal(&mut components, token.as_str()),
        }
        last_index = token.end();
    }
    push_literal(&mut components, template.get(last_index..).unwrap_or_default());

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> VariableRegistry {
        let mut registry = VariableRegistry::new();
        registry.register("{U}", || "alice".to_string()).unwrap();
        registry.register("{N}", || "box".to_string()).unwrap();
        registry.register("{n}", || "\n".to_string()).unwrap();
        registry
    }

    #[test]
    fn test_format_expands_placeholders_and_colors() {
        let registry = registry();
        let interpolator = Interpolator::new(&registry);
        let formatted = interpolator.format("{color}{green}{U}{color}{reset}@{N}$");
        assert_eq!(formatted, "\x1b[32malice\x1b[0m@box$");
    }

    #[test]
    fn test_known_placeholders_leave_no_tokens() {
        let registry = registry();
        let interpolator = Interpolator::new(&registry);
        let formatted = interpolator.format("{U}{N}{n}{U} and {N}");
        assert!(!formatted.contains("{U}"));
        assert!(!formatted.contains("{N}"));
        assert!(!formatted.contains("{n}"));
        assert_eq!(formatted, "alicebox\nalice and box");
    }

    #[test]
    fn test_phases_separately() {
        let registry = registry();
        let interpolator = Interpolator::new(&registry);
        let template = "{color}{red}{U}{color}{reset}";

        let placeholders_only = interpolator.expand_placeholders(template);
        assert_eq!(placeholders_only, "{color}{red}alice{color}{reset}");

        let colors_only = expand_colors(template);
        assert_eq!(colors_only, "\x1b[31m{U}\x1b[0m");

        assert_eq!(expand_colors(&placeholders_only), interpolator.format(template));
    }

    #[test]
    fn test_unknown_tokens_are_verbatim() {
        let registry = registry();
        let interpolator = Interpolator::new(&registry);
        assert_eq!(interpolator.format("{demo} {U} {} {1}"), "{demo} alice {} {1}");
    }

    #[test]
    fn test_expanded_values_are_not_rescanned() {
        let mut registry = VariableRegistry::new();
        registry.register("{X}", || "{X}{red}{Y}".to_string()).unwrap();
        registry.register("{Y}", || "never".to_string()).unwrap();
        let interpolator = Interpolator::new(&registry);
        assert_eq!(interpolator.format("[{X}]"), "[{X}{red}{Y}]");
    }

    #[test]
    fn test_nested_braces_expand_inner_token() {
        let registry = registry();
        let interpolator = Interpolator::new(&registry);
        assert_eq!(interpolator.format("{{U}}"), "{alice}");
    }

    #[test]
    fn test_tokenize_merges_literals() {
        let registry = registry();
        let interpolator = Interpolator::new(&registry);
        let components = interpolator.tokenize("a{zz}b{U}{bold}c");
        assert_eq!(
            components,
            vec![
                TemplateComponent::Literal("a{zz}b".to_string()),
                TemplateComponent::Placeholder("{U}".to_string()),
                TemplateComponent::Color("1;"),
                TemplateComponent::Literal("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_template() {
        let registry = registry();
        let interpolator = Interpolator::new(&registry);
        assert_eq!(interpolator.format(""), "");
        assert!(interpolator.tokenize("").is_empty());
    }
}
