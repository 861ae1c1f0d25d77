use pathbind::{
	handler,
	hyper::{Body, Server},
	HandlerSpec, HttpRouter, ParamValue, Params, Request, Response, RouterBuilder, Verb,
};
use tracing_subscriber::EnvFilter;

async fn get_post(params: Params, _req: Request) -> anyhow::Result<Response> {
	let ids: Vec<String> = params.iter().map(ParamValue::to_string).collect();
	Ok(Response::new(Body::from(format!("post {}", ids.join("/")))))
}

async fn create_post(params: Params, req: Request) -> anyhow::Result<Response> {
	let body = pathbind::hyper::body::to_bytes(req.into_body()).await?;
	Ok(Response::new(Body::from(format!(
		"user {} posted {} bytes",
		params[0],
		body.len()
	))))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let addr = ([127, 0, 0, 1], 3000).into();

	let mut builder = RouterBuilder::default();
	builder
		.register(
			&HandlerSpec::new("get_post", "users/{id}/posts/{postId}")
				.verb(Verb::Get)
				.path_param("id", "i64")
				.path_param("postId", "u32"),
			handler(get_post),
		)?
		.register(
			&HandlerSpec::new("create_post", "users/{id}/posts")
				.verb(Verb::Post)
				.path_param("id", "i64")
				.body_param("content", "string")
				.asynchronous(),
			handler(create_post),
		)?;

	let router = HttpRouter::from(builder);

	let server = Server::bind(&addr).serve(router);
	println!("Listening on http://{}", addr);

	server.await?;
	Ok(())
}
