use crate::{
	param::Params,
	route::Verb,
	router::{Lookup, Router, RouterBuilder},
};
use anyhow::{Error, Result};
use hyper::{body::Body, service::Service, StatusCode};
use std::{
	convert::Infallible,
	future::{ready, Future, Ready},
	pin::Pin,
	task::{Context, Poll},
};
use tracing::debug;

pub use hyper;

pub type Request = hyper::Request<Body>;
pub type Response = hyper::Response<Body>;

/// The future a handler resolves to; errors are turned into responses by the [`ErrorHandler`].
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

/// A handler receiving the bound path parameters and the request, whose body it still owns.
pub type Handler = Box<dyn Fn(Params, Request) -> ResponseFuture + Send + Sync>;

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> Response;

/// A function that handles unroutable requests and creates a response.
pub type NotFoundHandler = fn(req: Request) -> Response;

/// Boxes an async function into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
	F: Fn(Params, Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	Box::new(move |params, req| Box::pin(f(params, req)))
}

fn status(code: StatusCode, body: Body) -> Response {
	let mut res = Response::new(body);
	*res.status_mut() = code;
	res
}

fn default_error_handler(e: Error) -> Response {
	status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string().into())
}

fn default_not_found_handler(_req: Request) -> Response {
	status(StatusCode::NOT_FOUND, Body::empty())
}

/// Serves a [`Router`] of [`Handler`]s through hyper.
pub struct HttpRouter {
	router: Router<Handler>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
}

impl From<Router<Handler>> for HttpRouter {
	fn from(router: Router<Handler>) -> Self {
		Self {
			router,
			internal_error: default_error_handler,
			not_found: default_not_found_handler,
		}
	}
}

impl From<RouterBuilder<Handler>> for HttpRouter {
	fn from(builder: RouterBuilder<Handler>) -> Self {
		builder.build().into()
	}
}

impl HttpRouter {
	pub fn internal_error_handler(mut self, handler: ErrorHandler) -> Self {
		self.internal_error = handler;
		self
	}

	pub fn not_found_handler(mut self, handler: NotFoundHandler) -> Self {
		self.not_found = handler;
		self
	}
}

impl<T> Service<T> for HttpRouter {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(RouteHandler {
			router: self.router.clone(),
			internal_error: self.internal_error,
			not_found: self.not_found,
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
pub struct RouteHandler {
	router: Router<Handler>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
}

impl Service<Request> for RouteHandler {
	type Response = Response;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		let verb = match req.method().as_str().parse::<Verb>() {
			Ok(verb) => verb,
			Err(method) => {
				debug!(%method, "unsupported method");
				let response = status(StatusCode::METHOD_NOT_ALLOWED, Body::empty());
				return Box::pin(async { Ok(response) });
			}
		};

		let path = req.uri().path().to_owned();
		let response = match self.router.find(verb, &path) {
			Lookup::Found(matched) => {
				let fut = (matched.handler)(matched.params, req);
				let err = self.internal_error;
				return Box::pin(async move { Ok(fut.await.unwrap_or_else(err)) });
			}
			Lookup::BadRequest(e) => status(StatusCode::BAD_REQUEST, e.to_string().into()),
			Lookup::MethodNotAllowed => status(StatusCode::METHOD_NOT_ALLOWED, Body::empty()),
			Lookup::NotFound => (self.not_found)(req),
		};

		Box::pin(async { Ok(response) })
	}
}
