use crate::param::{ParamType, ParseError};
use thiserror::Error;

/// A handler description that could not be turned into a route.
///
/// Raised while the route table is being built; the offending route is never registered.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot register handler `{handler}`: {kind}")]
pub struct ConfigError {
	pub handler: String,
	pub kind: ConfigErrorKind,
}

impl ConfigError {
	pub fn new(handler: impl Into<String>, kind: ConfigErrorKind) -> Self {
		Self {
			handler: handler.into(),
			kind,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigErrorKind {
	#[error("unbalanced `{brace}` at position {position} in template `{template}`")]
	UnbalancedBrace {
		template: String,
		brace: char,
		position: usize,
	},
	#[error("invalid placeholder name `{name}` in template `{template}`")]
	InvalidPlaceholder { template: String, name: String },
	#[error("placeholder `{0}` appears more than once in the template")]
	DuplicatePlaceholder(String),
	#[error("parameter `{0}` is declared more than once")]
	DuplicateParameter(String),
	#[error("parameter `{name}` has unsupported type `{ty}`")]
	UnsupportedType { name: String, ty: String },
	#[error("placeholder `{0}` has no matching handler parameter")]
	MissingParameter(String),
	#[error("parameter `{0}` does not appear in the template")]
	UnboundParameter(String),
	#[error("no verb declared")]
	NoVerb,
	#[error("more than one verb declared: {0:?}")]
	MultipleVerbs(Vec<String>),
	#[error("more than one body parameter: `{0}` and `{1}`")]
	MultipleBodyParameters(String, String),
	#[error("{verb} {shape} is already served by handler `{existing}`")]
	Ambiguous {
		verb: String,
		shape: String,
		existing: String,
	},
	#[error("no handler is available under this name")]
	UnknownHandler,
	#[error("failed to compile pattern: {0}")]
	Pattern(String),
}

/// Failure to bind the values of a request path to a route's parameters.
///
/// Recoverable: the dispatcher answers the request with a bad request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
	#[error("path `{path}` does not match route {template}")]
	NoMatch { template: String, path: String },
	#[error("parameter `{name}`: {value:?} is not a valid {ty}: {source}")]
	InvalidValue {
		name: String,
		value: String,
		ty: ParamType,
		source: ParseError,
	},
}
