//! Entry configuration documents.

use super::{EntryName, RegistryError, SourceLocator};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Key of the sub-document holding per-server launch definitions.
pub const SERVER_DEFINITIONS_KEY: &str = "mcpServers";

/// JSON object describing how an entry is launched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryConfiguration(Map<String, Value>);

impl EntryConfiguration {
    /// Wraps an existing JSON object.
    #[must_use]
    pub const fn from_map(document: Map<String, Value>) -> Self {
        Self(document)
    }

    /// Synthesizes the configuration stored when an entry is installed.
    ///
    /// The entry is launched through `uv` running `fastmcp` against the
    /// source locator.
    #[must_use]
    pub fn default_for(name: &EntryName, source: &SourceLocator) -> Self {
        let definition = json!({
            "command": "uv",
            "args": ["run", "--with", "fastmcp", "fastmcp", "run", source.as_str()],
            "env": {},
            "disabled": false,
            "alwaysAllow": [],
        });
        let mut servers = Map::new();
        servers.insert(name.as_str().to_owned(), definition);

        let mut document = Map::new();
        document.insert(SERVER_DEFINITIONS_KEY.to_owned(), Value::Object(servers));
        Self(document)
    }

    /// Parses replacement configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidConfiguration`] when the text is not
    /// valid JSON or does not hold a JSON object.
    pub fn parse(text: &str) -> Result<Self, RegistryError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| RegistryError::InvalidConfiguration(err.to_string()))?;
        match value {
            Value::Object(document) => Ok(Self(document)),
            other => Err(RegistryError::InvalidConfiguration(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Folds the server definitions of several configurations, in order.
    ///
    /// Later configurations overwrite colliding server keys. The result holds
    /// only the merged server-definitions sub-document.
    #[must_use]
    pub fn merged<'a>(configurations: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut servers = Map::new();
        for configuration in configurations {
            if let Some(definitions) = configuration.server_definitions() {
                for (key, definition) in definitions {
                    servers.insert(key.clone(), definition.clone());
                }
            }
        }

        let mut document = Map::new();
        document.insert(SERVER_DEFINITIONS_KEY.to_owned(), Value::Object(servers));
        Self(document)
    }

    /// Returns the server-definitions sub-document when it is an object.
    #[must_use]
    pub fn server_definitions(&self) -> Option<&Map<String, Value>> {
        self.0
            .get(SERVER_DEFINITIONS_KEY)
            .and_then(Value::as_object)
    }

    /// Returns the launch definition stored for one server key.
    #[must_use]
    pub fn server_definition(&self, key: &str) -> Option<&Value> {
        self.server_definitions()
            .and_then(|definitions| definitions.get(key))
    }

    /// Returns the wrapped JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the configuration as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn configuration_for(name: &str) -> EntryConfiguration {
        EntryConfiguration::default_for(
            &EntryName::new(name).expect("valid name"),
            &SourceLocator::new("https://github.com/octo/weather").expect("valid locator"),
        )
    }

    #[test]
    fn default_configuration_embeds_source_locator() {
        let configuration = configuration_for("weather");

        let definition = configuration
            .server_definition("weather")
            .expect("definition for the entry");
        assert_eq!(definition["command"], json!("uv"));
        assert_eq!(
            definition["args"],
            json!(["run", "--with", "fastmcp", "fastmcp", "run", "https://github.com/octo/weather"])
        );
        assert_eq!(definition["disabled"], json!(false));
    }

    #[rstest]
    #[case("{not valid json")]
    #[case("[1, 2, 3]")]
    #[case("\"text\"")]
    #[case("")]
    fn parse_rejects_non_object_documents(#[case] text: &str) {
        assert!(matches!(
            EntryConfiguration::parse(text),
            Err(RegistryError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn parse_keeps_document_verbatim() {
        let parsed = EntryConfiguration::parse(r#"{"custom": {"depth": 3}}"#)
            .expect("valid configuration");
        assert_eq!(parsed.to_value(), json!({"custom": {"depth": 3}}));
        assert!(parsed.server_definitions().is_none());
    }

    #[test]
    fn merged_overwrites_colliding_keys_in_order() {
        let first = EntryConfiguration::parse(
            r#"{"mcpServers": {"shared": {"command": "first"}, "a": {"command": "a"}}}"#,
        )
        .expect("valid configuration");
        let second = EntryConfiguration::parse(
            r#"{"mcpServers": {"shared": {"command": "second"}}, "ignored": true}"#,
        )
        .expect("valid configuration");

        let merged = EntryConfiguration::merged([&first, &second]);

        assert_eq!(
            merged.to_value(),
            json!({"mcpServers": {
                "shared": {"command": "second"},
                "a": {"command": "a"}
            }})
        );
    }

    #[test]
    fn merged_skips_configurations_without_server_definitions() {
        let bare = EntryConfiguration::parse(r#"{"mcpServers": "not an object"}"#)
            .expect("valid configuration");
        let merged = EntryConfiguration::merged([&bare]);
        assert_eq!(merged.to_value(), json!({"mcpServers": {}}));
    }
}
