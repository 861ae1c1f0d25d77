use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use std::{
	fmt::{self, Display, Formatter},
	num::{ParseFloatError, ParseIntError},
	str::FromStr,
};
use thiserror::Error;

/// Values bound from a request path, in the order the handler declared them.
pub type Params = Vec<ParamValue>;

/// The scalar types a parameter may be declared with.
///
/// Anything outside this set is refused when the route is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
	Text,
	Bool,
	Char,
	I8,
	I16,
	I32,
	I64,
	U8,
	U16,
	U32,
	U64,
	F32,
	F64,
	Decimal,
	DateTime,
}

/// A parameter value after type-directed parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
	Text(String),
	Bool(bool),
	Char(char),
	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	F32(f32),
	F64(f64),
	Decimal(Decimal),
	DateTime(DateTime<FixedOffset>),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
	#[error("expected `true` or `false`")]
	Bool,
	#[error("expected exactly one character")]
	Char,
	#[error(transparent)]
	Int(#[from] ParseIntError),
	#[error(transparent)]
	Float(#[from] ParseFloatError),
	#[error("expected a decimal number: {0}")]
	Decimal(String),
	#[error("expected an RFC 3339 timestamp: {0}")]
	DateTime(#[from] chrono::ParseError),
}

/// Returned when a declared type name is not one of the supported scalar types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported parameter type `{0}`")]
pub struct UnsupportedType(pub String);

impl ParamType {
	/// Parses a raw captured string into a value of this type.
	///
	/// Parsing is locale independent: integers are plain base-10, booleans are the literal
	/// tokens `true` and `false`, decimals keep every digit they were written with, and date/times
	/// are RFC 3339.
	pub fn parse(self, raw: &str) -> Result<ParamValue, ParseError> {
		let value = match self {
			ParamType::Text => ParamValue::Text(raw.to_owned()),
			ParamType::Bool => match raw {
				"true" => ParamValue::Bool(true),
				"false" => ParamValue::Bool(false),
				_ => return Err(ParseError::Bool),
			},
			ParamType::Char => {
				let mut chars = raw.chars();
				match (chars.next(), chars.next()) {
					(Some(c), None) => ParamValue::Char(c),
					_ => return Err(ParseError::Char),
				}
			}
			ParamType::I8 => ParamValue::I8(raw.parse()?),
			ParamType::I16 => ParamValue::I16(raw.parse()?),
			ParamType::I32 => ParamValue::I32(raw.parse()?),
			ParamType::I64 => ParamValue::I64(raw.parse()?),
			ParamType::U8 => ParamValue::U8(raw.parse()?),
			ParamType::U16 => ParamValue::U16(raw.parse()?),
			ParamType::U32 => ParamValue::U32(raw.parse()?),
			ParamType::U64 => ParamValue::U64(raw.parse()?),
			ParamType::F32 => ParamValue::F32(raw.parse()?),
			ParamType::F64 => ParamValue::F64(raw.parse()?),
			ParamType::Decimal => {
				if raw.contains('_') {
					return Err(ParseError::Decimal("digit separators are not allowed".to_owned()));
				}
				let value = Decimal::from_str(raw).map_err(|e| ParseError::Decimal(e.to_string()))?;
				ParamValue::Decimal(value)
			}
			ParamType::DateTime => ParamValue::DateTime(DateTime::parse_from_rfc3339(raw)?),
		};

		Ok(value)
	}

	pub fn name(self) -> &'static str {
		match self {
			ParamType::Text => "string",
			ParamType::Bool => "bool",
			ParamType::Char => "char",
			ParamType::I8 => "i8",
			ParamType::I16 => "i16",
			ParamType::I32 => "i32",
			ParamType::I64 => "i64",
			ParamType::U8 => "u8",
			ParamType::U16 => "u16",
			ParamType::U32 => "u32",
			ParamType::U64 => "u64",
			ParamType::F32 => "f32",
			ParamType::F64 => "f64",
			ParamType::Decimal => "decimal",
			ParamType::DateTime => "datetime",
		}
	}
}

impl FromStr for ParamType {
	type Err = UnsupportedType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let ty = match s {
			"string" | "String" | "str" => ParamType::Text,
			"bool" => ParamType::Bool,
			"char" => ParamType::Char,
			"i8" => ParamType::I8,
			"i16" => ParamType::I16,
			"i32" => ParamType::I32,
			"i64" => ParamType::I64,
			"u8" => ParamType::U8,
			"u16" => ParamType::U16,
			"u32" => ParamType::U32,
			"u64" => ParamType::U64,
			"f32" => ParamType::F32,
			"f64" => ParamType::F64,
			"decimal" | "Decimal" => ParamType::Decimal,
			"datetime" | "DateTime" => ParamType::DateTime,
			other => return Err(UnsupportedType(other.to_owned())),
		};

		Ok(ty)
	}
}

impl Display for ParamType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl ParamValue {
	pub fn ty(&self) -> ParamType {
		match self {
			ParamValue::Text(_) => ParamType::Text,
			ParamValue::Bool(_) => ParamType::Bool,
			ParamValue::Char(_) => ParamType::Char,
			ParamValue::I8(_) => ParamType::I8,
			ParamValue::I16(_) => ParamType::I16,
			ParamValue::I32(_) => ParamType::I32,
			ParamValue::I64(_) => ParamType::I64,
			ParamValue::U8(_) => ParamType::U8,
			ParamValue::U16(_) => ParamType::U16,
			ParamValue::U32(_) => ParamType::U32,
			ParamValue::U64(_) => ParamType::U64,
			ParamValue::F32(_) => ParamType::F32,
			ParamValue::F64(_) => ParamType::F64,
			ParamValue::Decimal(_) => ParamType::Decimal,
			ParamValue::DateTime(_) => ParamType::DateTime,
		}
	}
}

impl Display for ParamValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ParamValue::Text(v) => f.write_str(v),
			ParamValue::Bool(v) => write!(f, "{}", v),
			ParamValue::Char(v) => write!(f, "{}", v),
			ParamValue::I8(v) => write!(f, "{}", v),
			ParamValue::I16(v) => write!(f, "{}", v),
			ParamValue::I32(v) => write!(f, "{}", v),
			ParamValue::I64(v) => write!(f, "{}", v),
			ParamValue::U8(v) => write!(f, "{}", v),
			ParamValue::U16(v) => write!(f, "{}", v),
			ParamValue::U32(v) => write!(f, "{}", v),
			ParamValue::U64(v) => write!(f, "{}", v),
			ParamValue::F32(v) => write!(f, "{}", v),
			ParamValue::F64(v) => write!(f, "{}", v),
			ParamValue::Decimal(v) => write!(f, "{}", v),
			ParamValue::DateTime(v) => f.write_str(&v.to_rfc3339()),
		}
	}
}
