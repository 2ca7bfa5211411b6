//! Executable command bindings.
//!
//! A binding ties a command name to the HTTP method, endpoint template and
//! descriptor that survived the table merge. [`CommandBinding::prepare`]
//! turns positional arguments into a concrete request.
//!
//! # Arguments
//!
//! URL variables come first, then body parameters:
//!
//! ```text
//! getElementAttribute(elementId, name)
//!   → GET /session/{sessionId}/element/{elementId}/attribute/{name}
//! navigateTo(url)
//!   → POST /session/{sessionId}/url  { "url": ... }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::command::{CommandDescriptor, HttpMethod, json_type};

// ============================================================================
// Constants
// ============================================================================

/// Placeholder for the session id in endpoint templates.
const SESSION_ID_PLACEHOLDER: &str = ":sessionId";

// ============================================================================
// CommandBinding
// ============================================================================

/// A callable entry of the command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandBinding {
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint template.
    pub endpoint: &'static str,
    /// Command descriptor.
    pub descriptor: &'static CommandDescriptor,
    /// Double-encode URL variables (Selenium standalone servers decode twice).
    pub double_encode: bool,
    /// Name of the table that supplied this binding.
    pub source: &'static str,
}

/// A request ready to hand to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint with all variables substituted.
    pub path: String,
    /// JSON body, if the request carries one.
    pub body: Option<Value>,
    /// Addressed relative to the server root.
    pub is_hub_command: bool,
}

impl CommandBinding {
    /// Returns the command name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.descriptor.command
    }

    /// Validates `args` and builds the request.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] on wrong argument count or type
    /// - [`Error::NoSession`] if the endpoint needs a session id and none is given
    pub fn prepare(&self, session_id: Option<&SessionId>, args: &[Value]) -> Result<PreparedRequest> {
        let descriptor = self.descriptor;

        if args.len() < descriptor.min_args() || args.len() > descriptor.max_args() {
            return Err(Error::invalid_argument(self.usage_message()));
        }

        let mut path = self.endpoint.to_string();
        if path.contains(SESSION_ID_PLACEHOLDER) {
            let session_id = session_id.ok_or(Error::NoSession)?;
            path = path.replace(SESSION_ID_PLACEHOLDER, &self.encode(session_id.as_str()));
        }

        let mut body = Map::new();
        for (index, arg) in args.iter().enumerate() {
            if let Some(variable) = descriptor.variables.get(index) {
                let Some(value) = arg.as_str() else {
                    return Err(self.malformed(variable, "string", arg));
                };
                path = path.replacen(&format!(":{variable}"), &self.encode(value), 1);
                continue;
            }

            let parameter = &descriptor.parameters[index - descriptor.variables.len()];
            if !parameter.accepts(arg) {
                if arg.is_null() && !parameter.required {
                    continue;
                }
                return Err(self.malformed(parameter.name, parameter.ty, arg));
            }
            body.insert(parameter.name.to_string(), arg.clone());
        }

        let body = (self.method.has_body() || !body.is_empty()).then_some(Value::Object(body));

        Ok(PreparedRequest {
            method: self.method,
            path,
            body,
            is_hub_command: descriptor.is_hub_command,
        })
    }

    /// Percent-encodes a URL variable.
    fn encode<'a>(&self, value: &'a str) -> Cow<'a, str> {
        let encoded = urlencoding::encode(value);
        if self.double_encode {
            Cow::Owned(urlencoding::encode(&encoded).into_owned())
        } else {
            encoded
        }
    }

    /// Builds the wrong-arity message with usage and parameter list.
    fn usage_message(&self) -> String {
        let descriptor = self.descriptor;
        let mut message = format!(
            "Wrong parameters applied for {}\nUsage: {}",
            descriptor.command,
            descriptor.usage()
        );

        if descriptor.max_args() > 0 {
            message.push_str("\n\nProperty Description:");
            for variable in descriptor.variables {
                message.push_str(&format!("\n  \"{variable}\" (string)"));
            }
            for parameter in descriptor.parameters {
                let optional = if parameter.required { "" } else { ", optional" };
                message.push_str(&format!(
                    "\n  \"{}\" ({}{optional})",
                    parameter.name, parameter.ty
                ));
            }
        }

        message
    }

    fn malformed(&self, name: &str, expected: &str, actual: &Value) -> Error {
        let actual = match actual {
            Value::Array(items) if expected.ends_with("[]") => format!(
                "({})[]",
                items.iter().map(json_type).collect::<Vec<_>>().join(",")
            ),
            other => json_type(other).to_string(),
        };

        Error::invalid_argument(format!(
            "Malformed type for \"{name}\" parameter of command {}\nExpected: {expected}\nActual: {actual}",
            self.descriptor.command
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
