use crate::error::ConfigErrorKind;
use regex::{Captures, Regex};
use std::{
	collections::HashSet,
	fmt::{self, Display, Formatter},
	mem,
};
use tracing::debug;

/// Placeholders never span a path separator, so consecutive placeholders cannot race each other
/// across segments.
const MATCH_WILDCARD: &str = "(?:[^/]+?)";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
	Literal(String),
	Placeholder(String),
}

/// A compiled URI template such as `users/{id}/posts/{postId}`.
///
/// Compilation produces two patterns anchored at both ends: one that only tests the shape of a
/// path and one with a named capture per placeholder. Matching is case-sensitive.
///
/// Two templates that differ only in their placeholder names have the same [`shape`] and match
/// exactly the same paths.
///
/// [`shape`]: Template::shape
#[derive(Debug, Clone)]
pub struct Template {
	normalized: String,
	shape: String,
	placeholders: Vec<String>,
	match_pattern: Regex,
	extract_pattern: Regex,
}

impl Template {
	pub fn compile(raw: &str) -> Result<Self, ConfigErrorKind> {
		let normalized = normalize(raw);
		let parts = parse(raw, &normalized)?;

		let mut shape = String::with_capacity(normalized.len());
		let mut match_src = String::from("^");
		let mut extract_src = String::from("^");
		let mut placeholders = Vec::new();

		for part in parts {
			match part {
				Part::Literal(literal) => {
					let escaped = regex::escape(&literal);
					match_src.push_str(&escaped);
					extract_src.push_str(&escaped);
					shape.push_str(&literal);
				}
				Part::Placeholder(name) => {
					match_src.push_str(MATCH_WILDCARD);
					extract_src.push_str(&format!("(?P<{}>[^/]+?)", name));
					shape.push_str("{}");
					placeholders.push(name);
				}
			}
		}

		match_src.push('$');
		extract_src.push('$');

		let match_pattern =
			Regex::new(&match_src).map_err(|e| ConfigErrorKind::Pattern(e.to_string()))?;
		let extract_pattern =
			Regex::new(&extract_src).map_err(|e| ConfigErrorKind::Pattern(e.to_string()))?;

		debug!(template = %normalized, pattern = %match_src, "compiled template");

		Ok(Self {
			normalized,
			shape,
			placeholders,
			match_pattern,
			extract_pattern,
		})
	}

	/// The template with exactly one leading slash and no trailing slash.
	pub fn as_str(&self) -> &str {
		&self.normalized
	}

	/// The template with placeholder names erased, e.g. `/users/{}`.
	pub fn shape(&self) -> &str {
		&self.shape
	}

	/// Placeholder names in the order they appear.
	pub fn placeholders(&self) -> &[String] {
		&self.placeholders
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.match_pattern.is_match(path)
	}

	pub(crate) fn captures<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
		self.extract_pattern.captures(path)
	}
}

impl Display for Template {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.normalized)
	}
}

fn normalize(raw: &str) -> String {
	format!("/{}", raw.trim_matches('/'))
}

/// Splits the normalized template into parts. Errors point into `raw`, the template as written.
fn parse(raw: &str, template: &str) -> Result<Vec<Part>, ConfigErrorKind> {
	// normalized[1..] starts where the leading slashes of `raw` end
	let leading = raw.len() - raw.trim_start_matches('/').len();
	let unbalanced = |brace, position: usize| ConfigErrorKind::UnbalancedBrace {
		template: raw.to_owned(),
		brace,
		position: leading + position - 1,
	};

	let mut parts = Vec::new();
	let mut seen = HashSet::new();
	let mut literal = String::new();
	let mut chars = template.char_indices();

	while let Some((position, ch)) = chars.next() {
		match ch {
			'{' => {
				if !literal.is_empty() {
					parts.push(Part::Literal(mem::take(&mut literal)));
				}

				let mut name = String::new();
				loop {
					match chars.next() {
						Some((_, '}')) => break,
						Some((_, '{')) | None => return Err(unbalanced('{', position)),
						Some((_, c)) => name.push(c),
					}
				}

				if !is_identifier(&name) {
					return Err(ConfigErrorKind::InvalidPlaceholder {
						template: raw.to_owned(),
						name,
					});
				}

				if !seen.insert(name.clone()) {
					return Err(ConfigErrorKind::DuplicatePlaceholder(name));
				}

				parts.push(Part::Placeholder(name));
			}
			'}' => return Err(unbalanced('}', position)),
			c => literal.push(c),
		}
	}

	if !literal.is_empty() {
		parts.push(Part::Literal(literal));
	}

	Ok(parts)
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		_ => false,
	}
}

#[cfg(test)]
mod test {
	use super::Template;
	use crate::error::ConfigErrorKind;
	use std::time::{Duration, Instant};

	#[test]
	fn normalizes_slashes() {
		assert_eq!(Template::compile("users/{id}").unwrap().as_str(), "/users/{id}");
		assert_eq!(Template::compile("//users/{id}//").unwrap().as_str(), "/users/{id}");
		assert_eq!(Template::compile("").unwrap().as_str(), "/");
		assert_eq!(Template::compile("/").unwrap().as_str(), "/");
	}

	#[test]
	fn literal_templates_match_only_themselves() {
		let template = Template::compile("api/status").unwrap();
		assert!(template.is_match("/api/status"));
		assert!(!template.is_match("/api/status/"));
		assert!(!template.is_match("/api/statusx"));
		assert!(!template.is_match("/prefix/api/status"));
		assert!(!template.is_match("api/status"));

		let root = Template::compile("").unwrap();
		assert!(root.is_match("/"));
		assert!(!root.is_match("/a"));
	}

	#[test]
	fn matching_is_case_sensitive() {
		let lower = Template::compile("api/status").unwrap();
		assert!(!lower.is_match("/API/STATUS"));
		assert!(!lower.is_match("/Api/status"));

		let upper = Template::compile("API/Status").unwrap();
		assert!(upper.is_match("/API/Status"));
		assert!(!upper.is_match("/api/status"));
	}

	#[test]
	fn escapes_regex_characters_in_literals() {
		let template = Template::compile("files/{name}.txt").unwrap();
		assert!(template.is_match("/files/readme.txt"));
		assert!(!template.is_match("/files/readmeXtxt"));

		let template = Template::compile("a+b/(c)/[d]/{x}$").unwrap();
		assert!(template.is_match("/a+b/(c)/[d]/1$"));
		assert!(!template.is_match("/aab/c/d/1"));
	}

	#[test]
	fn placeholders_do_not_cross_segments() {
		let template = Template::compile("users/{id}").unwrap();
		assert!(template.is_match("/users/42"));
		assert!(!template.is_match("/users/"));
		assert!(!template.is_match("/users/42/posts"));
	}

	#[test]
	fn extracts_named_values() {
		let template = Template::compile("users/{id}/posts/{postId}").unwrap();
		assert_eq!(template.placeholders(), &["id".to_owned(), "postId".to_owned()]);

		let caps = template.captures("/users/7/posts/99").unwrap();
		assert_eq!(&caps["id"], "7");
		assert_eq!(&caps["postId"], "99");
		assert!(template.captures("/users/7").is_none());
	}

	#[test]
	fn shape_erases_placeholder_names() {
		let a = Template::compile("users/{id}").unwrap();
		let b = Template::compile("/users/{name}/").unwrap();
		assert_eq!(a.shape(), "/users/{}");
		assert_eq!(a.shape(), b.shape());
		assert!(a.is_match("/users/bob") && b.is_match("/users/bob"));
	}

	#[test]
	fn rejects_unbalanced_braces() {
		assert_eq!(
			Template::compile("users/{id").unwrap_err(),
			ConfigErrorKind::UnbalancedBrace {
				template: "users/{id".to_owned(),
				brace: '{',
				position: 6,
			}
		);
		assert_eq!(
			Template::compile("users/id}").unwrap_err(),
			ConfigErrorKind::UnbalancedBrace {
				template: "users/id}".to_owned(),
				brace: '}',
				position: 8,
			}
		);
		assert!(matches!(
			Template::compile("users/{a{b}}"),
			Err(ConfigErrorKind::UnbalancedBrace { brace: '{', .. })
		));
	}

	#[test]
	fn brace_positions_point_into_the_template_as_written() {
		let raw = "//users/{id";
		match Template::compile(raw).unwrap_err() {
			ConfigErrorKind::UnbalancedBrace { template, brace, position } => {
				assert_eq!(template, raw);
				assert_eq!(brace, '{');
				assert_eq!(position, 8);
				assert_eq!(&raw[position..=position], "{");
			}
			other => panic!("unexpected error {:?}", other),
		}

		let raw = "///a/b}/";
		match Template::compile(raw).unwrap_err() {
			ConfigErrorKind::UnbalancedBrace { position, .. } => {
				assert_eq!(&raw[position..=position], "}");
			}
			other => panic!("unexpected error {:?}", other),
		}
	}

	#[test]
	fn rejects_invalid_placeholder_names() {
		assert!(matches!(
			Template::compile("users/{}"),
			Err(ConfigErrorKind::InvalidPlaceholder { .. })
		));
		assert!(matches!(
			Template::compile("users/{1st}"),
			Err(ConfigErrorKind::InvalidPlaceholder { .. })
		));
		assert!(matches!(
			Template::compile("users/{a-b}"),
			Err(ConfigErrorKind::InvalidPlaceholder { .. })
		));
	}

	#[test]
	fn rejects_repeated_placeholders() {
		assert_eq!(
			Template::compile("a/{id}/b/{id}").unwrap_err(),
			ConfigErrorKind::DuplicatePlaceholder("id".to_owned())
		);
	}

	#[test]
	fn compilation_is_deterministic() {
		let first = Template::compile("users/{id}/posts/{postId}").unwrap();
		let second = Template::compile("users/{id}/posts/{postId}").unwrap();

		for path in &["/users/7/posts/99", "/users/abc", "/users/a/posts/b/c", "/"] {
			assert_eq!(first.is_match(path), second.is_match(path));
			let a = first.captures(path).map(|c| (c["id"].to_owned(), c["postId"].to_owned()));
			let b = second.captures(path).map(|c| (c["id"].to_owned(), c["postId"].to_owned()));
			assert_eq!(a, b);
		}
	}

	#[test]
	fn consecutive_placeholders_split_within_one_segment() {
		let template = Template::compile("{a}{b}/end").unwrap();
		let caps = template.captures("/xyz/end").unwrap();
		assert_eq!(&caps["a"], "x");
		assert_eq!(&caps["b"], "yz");
	}

	#[test]
	fn adversarial_paths_match_in_bounded_time() {
		let template = Template::compile("{a}{b}{c}{d}{e}{f}{g}{h}/end").unwrap();

		let miss = format!("/{}/nope", "a".repeat(256_000));
		let started = Instant::now();
		assert!(!template.is_match(&miss));
		assert!(started.elapsed() < Duration::from_secs(5));

		let hit = format!("/{}/end", "a".repeat(256_000));
		let started = Instant::now();
		assert!(template.is_match(&hit));
		assert!(started.elapsed() < Duration::from_secs(5));
	}
}
