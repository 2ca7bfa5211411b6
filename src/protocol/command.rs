//! Protocol command table types.
//!
//! A protocol table maps endpoint templates to HTTP methods and command
//! descriptors:
//!
//! | Endpoint | Method | Command |
//! |----------|--------|---------|
//! | `/session/:sessionId/url` | `GET` | `getUrl` |
//! | `/session/:sessionId/url` | `POST` | `navigateTo(url)` |
//!
//! Tables are static data and never mutated.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::Error;

// ============================================================================
// HttpMethod
// ============================================================================

/// HTTP method of a protocol endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the method name in upper case.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` if requests with this method carry a JSON body.
    #[inline]
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(Error::invalid_argument(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

// ============================================================================
// Parameter
// ============================================================================

/// Body parameter of a command.
///
/// `ty` is a type expression: a JSON type name (`string`, `number`,
/// `boolean`, `object`, `array`, `null`), `*` for any, alternatives
/// written as `(string|number)`, and a `[]` suffix for arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    /// Name used as key in the request body.
    pub name: &'static str,
    /// Type expression.
    pub ty: &'static str,
    /// Whether the argument must be supplied.
    pub required: bool,
}

impl Parameter {
    /// Returns `true` if `value` satisfies the type expression.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        let (item_ty, is_array) = match self.ty.strip_suffix("[]") {
            Some(item) => (item, true),
            None => (self.ty, false),
        };
        let alternatives = item_ty.trim_start_matches('(').trim_end_matches(')');
        let matches = |item: &Value| {
            alternatives
                .split('|')
                .any(|alt| alt == "*" || alt == json_type(item))
        };

        if is_array {
            value.as_array().is_some_and(|items| items.iter().all(matches))
        } else {
            matches(value)
        }
    }
}

/// Returns the JSON type name of a value.
#[must_use]
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// CommandDescriptor
// ============================================================================

/// Declarative description of one protocol command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Command name exposed on the command surface.
    pub command: &'static str,
    /// URL variables substituted into the endpoint, in argument order.
    pub variables: &'static [&'static str],
    /// Body parameters following the URL variables.
    pub parameters: &'static [Parameter],
    /// Addressed relative to the server root instead of the base path.
    pub is_hub_command: bool,
}

impl CommandDescriptor {
    /// Number of arguments that must be supplied.
    #[inline]
    #[must_use]
    pub fn min_args(&self) -> usize {
        self.variables.len() + self.parameters.iter().filter(|p| p.required).count()
    }

    /// Number of arguments accepted at most.
    #[inline]
    #[must_use]
    pub fn max_args(&self) -> usize {
        self.variables.len() + self.parameters.len()
    }

    /// Renders a call signature, e.g. `getElementAttribute(elementId, name)`.
    #[must_use]
    pub fn usage(&self) -> String {
        let names: Vec<&str> = self
            .variables
            .iter()
            .copied()
            .chain(self.parameters.iter().map(|p| p.name))
            .collect();
        format!("{}({})", self.command, names.join(", "))
    }
}

// ============================================================================
// Endpoint / ProtocolCommandTable
// ============================================================================

/// All commands served under one endpoint template.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    /// Path template, e.g. `/session/:sessionId/element/:elementId`.
    pub path: &'static str,
    /// Commands by HTTP method.
    pub methods: &'static [(HttpMethod, CommandDescriptor)],
}

/// Named, ordered, immutable protocol table.
#[derive(Debug)]
pub struct ProtocolCommandTable {
    /// Table name, e.g. `"webdriver"`.
    pub name: &'static str,
    /// Endpoints in declaration order.
    pub endpoints: &'static [Endpoint],
}

impl ProtocolCommandTable {
    /// Iterates `(endpoint, method, descriptor)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, HttpMethod, &'static CommandDescriptor)> {
        let endpoints: &'static [Endpoint] = self.endpoints;
        endpoints.iter().flat_map(|endpoint| {
            endpoint
                .methods
                .iter()
                .map(move |(method, descriptor)| (endpoint.path, *method, descriptor))
        })
    }

    /// Total number of `(endpoint, method)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.iter().map(|e| e.methods.len()).sum()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a descriptor by command name.
    #[must_use]
    pub fn find(&self, command: &str) -> Option<(&'static str, HttpMethod, &'static CommandDescriptor)> {
        self.iter().find(|(_, _, descriptor)| descriptor.command == command)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    const fn param(ty: &'static str) -> Parameter {
        Parameter {
            name: "p",
            ty,
            required: true,
        }
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!("get".parse::<HttpMethod>().expect("parse"), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().expect("parse"), HttpMethod::Delete);
        assert!("PATCH".parse::<HttpMethod>().is_err());
        assert!(HttpMethod::Post.has_body());
        assert!(!HttpMethod::Get.has_body());
    }

    #[test]
    fn test_parameter_simple_types() {
        assert!(param("string").accepts(&json!("x")));
        assert!(!param("string").accepts(&json!(1)));
        assert!(param("number").accepts(&json!(1.5)));
        assert!(param("object").accepts(&json!({})));
        assert!(param("*").accepts(&json!(null)));
    }

    #[test]
    fn test_parameter_alternatives() {
        let ty = param("(number|null)");
        assert!(ty.accepts(&json!(3)));
        assert!(ty.accepts(&json!(null)));
        assert!(!ty.accepts(&json!("3")));
    }

    #[test]
    fn test_parameter_arrays() {
        let ty = param("string[]");
        assert!(ty.accepts(&json!(["a", "b"])));
        assert!(ty.accepts(&json!([])));
        assert!(!ty.accepts(&json!("a")));
        assert!(!ty.accepts(&json!(["a", 1])));

        let mixed = param("(string|object|number|boolean|null)[]");
        assert!(mixed.accepts(&json!(["a", 1, null, {}, true])));
    }

    #[test]
    fn test_descriptor_usage_and_arity() {
        static PARAMS: [Parameter; 2] = [
            Parameter {
                name: "name",
                ty: "string",
                required: true,
            },
            Parameter {
                name: "flag",
                ty: "boolean",
                required: false,
            },
        ];
        let descriptor = CommandDescriptor {
            command: "getThing",
            variables: &["elementId"],
            parameters: &PARAMS,
            is_hub_command: false,
        };

        assert_eq!(descriptor.usage(), "getThing(elementId, name, flag)");
        assert_eq!(descriptor.min_args(), 2);
        assert_eq!(descriptor.max_args(), 3);
    }
}
