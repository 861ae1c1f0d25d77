use crate::{
	error::{BindError, ConfigError, ConfigErrorKind},
	param::{ParamType, Params},
	template::Template,
};
use serde::{Deserialize, Serialize};
use std::{
	collections::HashSet,
	fmt::{self, Display, Formatter},
	str::FromStr,
};
use tracing::debug;

/// HTTP verbs a route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
	Get,
	Post,
	Put,
	Delete,
	Patch,
	Head,
	Options,
}

impl Verb {
	pub fn as_str(self) -> &'static str {
		match self {
			Verb::Get => "GET",
			Verb::Post => "POST",
			Verb::Put => "PUT",
			Verb::Delete => "DELETE",
			Verb::Patch => "PATCH",
			Verb::Head => "HEAD",
			Verb::Options => "OPTIONS",
		}
	}
}

impl FromStr for Verb {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let verb = match s {
			"GET" => Verb::Get,
			"POST" => Verb::Post,
			"PUT" => Verb::Put,
			"DELETE" => Verb::Delete,
			"PATCH" => Verb::Patch,
			"HEAD" => Verb::Head,
			"OPTIONS" => Verb::Options,
			other => return Err(other.to_owned()),
		};
		Ok(verb)
	}
}

impl Display for Verb {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Where a handler parameter takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSource {
	Path,
	Body,
}

impl Default for ParamSource {
	fn default() -> Self {
		ParamSource::Path
	}
}

/// A handler parameter as declared by whoever discovered the handler.
///
/// The type is kept as its declared spelling so an unsupported type can be reported by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParameterSpec {
	pub name: String,
	#[serde(rename = "type")]
	pub ty: String,
	#[serde(default)]
	pub source: ParamSource,
}

/// Everything needed to build a [`Route`] for one handler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HandlerSpec {
	pub name: String,
	pub template: String,
	pub verbs: Vec<Verb>,
	#[serde(default)]
	pub parameters: Vec<ParameterSpec>,
	#[serde(default)]
	pub is_async: bool,
}

impl HandlerSpec {
	pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			template: template.into(),
			verbs: Vec::new(),
			parameters: Vec::new(),
			is_async: false,
		}
	}

	pub fn verb(mut self, verb: Verb) -> Self {
		self.verbs.push(verb);
		self
	}

	pub fn path_param(self, name: impl Into<String>, ty: impl Into<String>) -> Self {
		self.param(name, ty, ParamSource::Path)
	}

	pub fn body_param(self, name: impl Into<String>, ty: impl Into<String>) -> Self {
		self.param(name, ty, ParamSource::Body)
	}

	pub fn asynchronous(mut self) -> Self {
		self.is_async = true;
		self
	}

	fn param(mut self, name: impl Into<String>, ty: impl Into<String>, source: ParamSource) -> Self {
		self.parameters.push(ParameterSpec {
			name: name.into(),
			ty: ty.into(),
			source,
		});
		self
	}
}

/// A parameter whose type has been checked against the supported scalar types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
	pub name: String,
	pub ty: ParamType,
}

/// A compiled, immutable route for a single handler and verb.
#[derive(Debug, Clone)]
pub struct Route {
	handler: String,
	verb: Verb,
	template: Template,
	uri_parameters: Vec<Parameter>,
	body_parameter: Option<Parameter>,
	is_async: bool,
}

impl Route {
	/// Validates a handler description and compiles its template.
	///
	/// Fails if the template is malformed, if a parameter type is unsupported, if the template's
	/// placeholders and the path parameters disagree, if there is not exactly one verb, or if more
	/// than one parameter is bound from the body.
	pub fn new(spec: &HandlerSpec) -> Result<Self, ConfigError> {
		let fail = |kind| ConfigError::new(spec.name.as_str(), kind);

		let verb = single_verb(&spec.verbs).map_err(fail)?;
		let template = Template::compile(&spec.template).map_err(fail)?;

		let mut names = HashSet::new();
		let mut uri_parameters = Vec::new();
		let mut body_parameter: Option<Parameter> = None;

		for param in &spec.parameters {
			if !names.insert(param.name.as_str()) {
				return Err(fail(ConfigErrorKind::DuplicateParameter(param.name.clone())));
			}

			let ty = param.ty.parse::<ParamType>().map_err(|_| {
				fail(ConfigErrorKind::UnsupportedType {
					name: param.name.clone(),
					ty: param.ty.clone(),
				})
			})?;
			let parameter = Parameter {
				name: param.name.clone(),
				ty,
			};

			match param.source {
				ParamSource::Path => uri_parameters.push(parameter),
				ParamSource::Body => {
					if let Some(existing) = &body_parameter {
						return Err(fail(ConfigErrorKind::MultipleBodyParameters(
							existing.name.clone(),
							parameter.name,
						)));
					}
					body_parameter = Some(parameter);
				}
			}
		}

		for placeholder in template.placeholders() {
			if !uri_parameters.iter().any(|p| &p.name == placeholder) {
				return Err(fail(ConfigErrorKind::MissingParameter(placeholder.clone())));
			}
		}

		for parameter in &uri_parameters {
			if !template.placeholders().contains(&parameter.name) {
				return Err(fail(ConfigErrorKind::UnboundParameter(parameter.name.clone())));
			}
		}

		let route = Self {
			handler: spec.name.clone(),
			verb,
			template,
			uri_parameters,
			body_parameter,
			is_async: spec.is_async,
		};
		debug!(handler = %route.handler, "{}", route);

		Ok(route)
	}

	pub fn handler(&self) -> &str {
		&self.handler
	}

	pub fn verb(&self) -> Verb {
		self.verb
	}

	pub fn template(&self) -> &Template {
		&self.template
	}

	/// Path parameters in the order the handler declares them.
	pub fn uri_parameters(&self) -> &[Parameter] {
		&self.uri_parameters
	}

	/// The parameter bound from the request body, left for the caller to deserialize.
	pub fn body_parameter(&self) -> Option<&Parameter> {
		self.body_parameter.as_ref()
	}

	pub fn is_async(&self) -> bool {
		self.is_async
	}

	/// Whether the request path (without its query) has the shape of this route.
	pub fn is_match(&self, path: &str) -> bool {
		self.template.is_match(path)
	}

	/// Binds the path's values to the route's parameters, in declaration order.
	///
	/// Meant to be called after [`is_match`](Route::is_match) succeeded; a path that does not fit
	/// the template yields [`BindError::NoMatch`]. Either every parameter binds or none does.
	pub fn extract(&self, path: &str) -> Result<Params, BindError> {
		let captures = self.template.captures(path).ok_or_else(|| BindError::NoMatch {
			template: self.template.to_string(),
			path: path.to_owned(),
		})?;

		self.uri_parameters
			.iter()
			.map(|param| {
				let raw = captures.name(&param.name).map_or("", |m| m.as_str());
				param.ty.parse(raw).map_err(|source| BindError::InvalidValue {
					name: param.name.clone(),
					value: raw.to_owned(),
					ty: param.ty,
					source,
				})
			})
			.collect()
	}
}

impl Display for Route {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Hosting {} method on {}", self.verb, self.template)
	}
}

fn single_verb(verbs: &[Verb]) -> Result<Verb, ConfigErrorKind> {
	let mut distinct: Vec<Verb> = Vec::new();
	for verb in verbs {
		if !distinct.contains(verb) {
			distinct.push(*verb);
		}
	}

	match distinct.as_slice() {
		[] => Err(ConfigErrorKind::NoVerb),
		[verb] => Ok(*verb),
		many => Err(ConfigErrorKind::MultipleVerbs(
			many.iter().map(|v| v.to_string()).collect(),
		)),
	}
}
