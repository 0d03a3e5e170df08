//! Endpoint derivation for deployed groups.

use crate::registry::domain::{DisplayName, Endpoint};
use minijinja::Environment;
use serde_json::{Map, Value};
use thiserror::Error;

/// Template used when none is configured.
pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "https://{{ slug }}.fastmcp.app";

/// Errors raised while validating or rendering an endpoint template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EndpointTemplateError {
    /// The template failed to render.
    #[error("endpoint template '{template}' failed to render: {reason}")]
    Render {
        /// Offending template source.
        template: String,
        /// Renderer message.
        reason: String,
    },

    /// The template rendered to blank output.
    #[error("endpoint template '{0}' rendered an empty endpoint")]
    EmptyEndpoint(String),
}

/// `minijinja` template turning a group display name into its endpoint.
///
/// The template sees `slug` (lower-cased display name, spaces replaced by
/// hyphens) and `name` (the display name as given).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    source: String,
}

impl EndpointTemplate {
    /// Creates a template, checking that it renders for a sample name.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointTemplateError`] when the template is malformed or
    /// renders to nothing.
    pub fn new(source: impl Into<String>) -> Result<Self, EndpointTemplateError> {
        let template = Self {
            source: source.into(),
        };
        template.render_parts("sample", "Sample")?;
        Ok(template)
    }

    /// Returns the template source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Renders the endpoint for a display name.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointTemplateError`] when rendering fails.
    pub fn render(&self, display_name: &DisplayName) -> Result<Endpoint, EndpointTemplateError> {
        self.render_parts(&display_name.slug(), display_name.as_str())
            .map(Endpoint::new)
    }

    fn render_parts(&self, slug: &str, name: &str) -> Result<String, EndpointTemplateError> {
        let mut context = Map::new();
        context.insert("slug".to_owned(), Value::String(slug.to_owned()));
        context.insert("name".to_owned(), Value::String(name.to_owned()));

        let rendered = Environment::new()
            .render_str(&self.source, context)
            .map_err(|error| EndpointTemplateError::Render {
                template: self.source.clone(),
                reason: error.to_string(),
            })?;

        let trimmed = rendered.trim();
        if trimmed.is_empty() {
            return Err(EndpointTemplateError::EmptyEndpoint(self.source.clone()));
        }
        Ok(trimmed.to_owned())
    }
}

impl Default for EndpointTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_ENDPOINT_TEMPLATE.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("proj1", "https://proj1.fastmcp.app")]
    #[case("My Cloud Project", "https://my-cloud-project.fastmcp.app")]
    fn default_template_uses_slug(#[case] display_name: &str, #[case] expected: &str) {
        let endpoint = EndpointTemplate::default()
            .render(&DisplayName::new(display_name).expect("valid display name"))
            .expect("default template renders");
        assert_eq!(endpoint.as_str(), expected);
    }

    #[test]
    fn custom_template_can_use_display_name() {
        let source = "https://deploy.example.com/{{ slug }}/{{ name | upper }}";
        let template = EndpointTemplate::new(source).expect("valid template");
        let endpoint = template
            .render(&DisplayName::new("Team A").expect("valid display name"))
            .expect("template renders");
        assert_eq!(
            endpoint.as_str(),
            "https://deploy.example.com/team-a/TEAM A"
        );
    }

    #[rstest]
    #[case("https://{{ slug }.example.com")]
    #[case("   ")]
    fn malformed_templates_are_rejected(#[case] source: &str) {
        assert!(EndpointTemplate::new(source).is_err());
    }
}
