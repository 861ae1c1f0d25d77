//! URI template routing with typed path parameters.
//!
//! ```
//! use pathbind::{HandlerSpec, Lookup, ParamValue, RouterBuilder, Verb};
//!
//! let mut builder = RouterBuilder::default();
//! builder.register(
//! 	&HandlerSpec::new("get_post", "users/{id}/posts/{postId}")
//! 		.verb(Verb::Get)
//! 		.path_param("id", "i64")
//! 		.path_param("postId", "u32"),
//! 	"get_post",
//! )?;
//! let router = builder.build();
//!
//! match router.find(Verb::Get, "/users/7/posts/99") {
//! 	Lookup::Found(matched) => {
//! 		assert_eq!(*matched.handler, "get_post");
//! 		assert_eq!(matched.params, vec![ParamValue::I64(7), ParamValue::U32(99)]);
//! 	}
//! 	_ => unreachable!(),
//! }
//! # Ok::<(), pathbind::ConfigError>(())
//! ```
//!
//! Placeholders in braces match one or more characters of a single path segment. Literal text
//! matches itself exactly, case included. Each handler declares its parameters with one of the
//! scalar types of [`ParamType`]; the declaration is checked once, when the route is registered,
//! and values are parsed from the path on every request.
//!
//! Routes of one verb that only differ by placeholder names cannot be told apart and are refused
//! at registration.
//!
//! With the `http` feature, [`HttpRouter`] serves a router through hyper: binding failures become
//! `400 Bad Request`, paths served only under other verbs `405 Method Not Allowed`.

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::*;

/// Route tables described as data.
pub mod config;

pub mod error;

/// Supported parameter types and their parsers.
pub mod param;

/// Compiled routes for a single handler.
pub mod route;

/// Contains the route table.
///
/// Use the RouterBuilder to create a Router.
pub mod router;

pub mod template;

pub use config::*;
pub use error::*;
pub use param::*;
pub use route::*;
pub use router::*;
pub use template::Template;
