use crate::{
	config::RouteTableConfig,
	error::{BindError, ConfigError, ConfigErrorKind},
	param::Params,
	route::{HandlerSpec, Route, Verb},
};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, trace, warn};

#[derive(Debug)]
struct Entry<H> {
	route: Route,
	handler: H,
}

type Routes<H> = HashMap<Verb, Vec<Entry<H>>>;

/// Collects routes before they are frozen into a [`Router`].
#[derive(Debug)]
pub struct RouterBuilder<H> {
	routes: Routes<H>,
}

impl<H> Default for RouterBuilder<H> {
	fn default() -> Self {
		Self {
			routes: Routes::default(),
		}
	}
}

impl<H> RouterBuilder<H> {
	/// Compiles a handler description and registers it with its handler.
	///
	/// Routes of the same verb are tried in registration order. A route whose verb and shape are
	/// already taken by another handler is refused, since no path could ever tell them apart.
	pub fn register(&mut self, spec: &HandlerSpec, handler: H) -> Result<&mut Self, ConfigError> {
		let route = Route::new(spec).map_err(|e| {
			warn!(error = %e, "rejected route");
			e
		})?;

		let entries = self.routes.entry(route.verb()).or_default();
		if let Some(existing) = entries
			.iter()
			.find(|entry| entry.route.template().shape() == route.template().shape())
		{
			let err = ConfigError::new(
				route.handler(),
				ConfigErrorKind::Ambiguous {
					verb: route.verb().to_string(),
					shape: route.template().shape().to_owned(),
					existing: existing.route.handler().to_owned(),
				},
			);
			warn!(error = %err, "rejected route");
			return Err(err);
		}

		debug!(handler = %route.handler(), "registered {}", route);
		entries.push(Entry { route, handler });
		Ok(self)
	}

	/// Registers every route of a route table description, looking handlers up by name.
	pub fn from_config<F>(config: &RouteTableConfig, mut resolve: F) -> Result<Self, ConfigError>
	where
		F: FnMut(&str) -> Option<H>,
	{
		let mut builder = Self::default();
		for spec in &config.routes {
			let handler = resolve(&spec.name)
				.ok_or_else(|| ConfigError::new(spec.name.as_str(), ConfigErrorKind::UnknownHandler))?;
			builder.register(spec, handler)?;
		}

		Ok(builder)
	}

	pub fn build(self) -> Router<H> {
		Router {
			routes: Arc::new(self.routes),
		}
	}
}

/// An immutable route table. Cloning is cheap and clones share the same routes.
#[derive(Debug)]
pub struct Router<H> {
	routes: Arc<Routes<H>>,
}

impl<H> Clone for Router<H> {
	fn clone(&self) -> Self {
		Self {
			routes: Arc::clone(&self.routes),
		}
	}
}

/// A route that matched a request, with its bound path parameters.
#[derive(Debug)]
pub struct Matched<'a, H> {
	pub route: &'a Route,
	pub handler: &'a H,
	pub params: Params,
}

/// The outcome of looking a request up in a [`Router`].
#[derive(Debug)]
pub enum Lookup<'a, H> {
	Found(Matched<'a, H>),
	/// A route has the right shape but its values do not bind.
	BadRequest(BindError),
	/// Only routes registered for other verbs match the path.
	MethodNotAllowed,
	NotFound,
}

impl<H> Router<H> {
	pub fn find(&self, verb: Verb, path: &str) -> Lookup<'_, H> {
		let path = path.split_once('?').map_or(path, |(path, _)| path);
		let mut bind_error = None;

		for entry in self.routes.get(&verb).into_iter().flatten() {
			if !entry.route.is_match(path) {
				continue;
			}

			match entry.route.extract(path) {
				Ok(params) => {
					trace!(handler = %entry.route.handler(), %path, "matched route");
					return Lookup::Found(Matched {
						route: &entry.route,
						handler: &entry.handler,
						params,
					});
				}
				Err(e) => {
					debug!(handler = %entry.route.handler(), error = %e, "failed to bind parameters");
					bind_error.get_or_insert(e);
				}
			}
		}

		if let Some(e) = bind_error {
			return Lookup::BadRequest(e);
		}

		let other_verb = self
			.routes
			.iter()
			.filter(|(other, _)| **other != verb)
			.flat_map(|(_, entries)| entries)
			.any(|entry| entry.route.is_match(path));

		trace!(%verb, %path, "no route");
		if other_verb {
			Lookup::MethodNotAllowed
		} else {
			Lookup::NotFound
		}
	}

	/// All registered routes, grouped by verb in no particular order.
	pub fn routes(&self) -> impl Iterator<Item = &Route> {
		self.routes.values().flatten().map(|entry| &entry.route)
	}
}
