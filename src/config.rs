use crate::route::HandlerSpec;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

/// A route table described as data, typically read from a TOML file.
///
/// ```toml
/// [[routes]]
/// name = "get_user"
/// template = "users/{id}"
/// verbs = ["GET"]
/// parameters = [{ name = "id", type = "i64" }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteTableConfig {
	pub routes: Vec<HandlerSpec>,
}

#[derive(Debug, Error)]
pub enum LoadError {
	#[error("failed to read route table: {0}")]
	Io(#[from] std::io::Error),
	#[error("failed to parse route table: {0}")]
	Parse(#[from] toml::de::Error),
}

impl RouteTableConfig {
	pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(s)
	}

	pub fn load(path: &Path) -> Result<Self, LoadError> {
		let content = fs::read_to_string(path)?;
		Ok(Self::from_toml_str(&content)?)
	}
}

#[cfg(test)]
mod test {
	use super::{LoadError, RouteTableConfig};
	use crate::route::{ParamSource, Verb};
	use std::path::Path;

	#[test]
	fn parses_routes_with_defaults() {
		let config = RouteTableConfig::from_toml_str(
			r#"
			[[routes]]
			name = "create_post"
			template = "users/{id}/posts"
			verbs = ["POST"]
			is_async = true
			parameters = [
				{ name = "id", type = "i64" },
				{ name = "body", type = "string", source = "body" },
			]

			[[routes]]
			name = "status"
			template = "status"
			verbs = ["GET"]
			"#,
		)
		.unwrap();

		assert_eq!(config.routes.len(), 2);

		let create = &config.routes[0];
		assert_eq!(create.verbs, vec![Verb::Post]);
		assert!(create.is_async);
		assert_eq!(create.parameters[0].source, ParamSource::Path);
		assert_eq!(create.parameters[1].source, ParamSource::Body);
		assert_eq!(create.parameters[1].ty, "string");

		let status = &config.routes[1];
		assert!(status.parameters.is_empty());
		assert!(!status.is_async);
	}

	#[test]
	fn empty_document_has_no_routes() {
		assert_eq!(RouteTableConfig::from_toml_str("").unwrap(), RouteTableConfig::default());
	}

	#[test]
	fn rejects_unknown_verbs() {
		let result = RouteTableConfig::from_toml_str(
			r#"
			[[routes]]
			name = "x"
			template = "x"
			verbs = ["FETCH"]
			"#,
		);
		assert!(result.is_err());
	}

	#[test]
	fn reports_missing_files() {
		let err = RouteTableConfig::load(Path::new("/nonexistent/routes.toml")).unwrap_err();
		assert!(matches!(err, LoadError::Io(_)));
	}
}
