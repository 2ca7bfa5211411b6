//! Static protocol command tables.
//!
//! One table per dialect or vendor extension. Which tables take part in a
//! session's command surface is decided by [`crate::surface`].
//!
//! | Table | Source |
//! |-------|--------|
//! | [`WEBDRIVER`] | W3C WebDriver |
//! | [`JSONWP`] | Legacy JSON Wire Protocol |
//! | [`MJSONWP`] | Mobile JSON Wire Protocol |
//! | [`APPIUM`] | Appium extensions |
//! | [`CHROMIUM`] | Chromedriver extensions |
//! | [`GECKO`] | Geckodriver extensions |
//! | [`SAUCELABS`] | Sauce Labs extensions |
//! | [`SELENIUM`] | Selenium standalone / grid extensions |

// ============================================================================
// Table Macros
// ============================================================================

/// Required body parameter.
macro_rules! required {
    ($name:literal, $ty:literal) => {
        $crate::protocol::command::Parameter {
            name: $name,
            ty: $ty,
            required: true,
        }
    };
}

/// Optional body parameter.
macro_rules! optional {
    ($name:literal, $ty:literal) => {
        $crate::protocol::command::Parameter {
            name: $name,
            ty: $ty,
            required: false,
        }
    };
}

/// Command descriptor: `command!("name" vars [..] params [..])`, or
/// `command!(hub "name" vars [..])` for commands addressed at the server root.
macro_rules! command {
    (hub $name:literal $(vars [$($var:literal),*])?) => {
        $crate::protocol::command::CommandDescriptor {
            command: $name,
            variables: &[$($($var),*)?],
            parameters: &[],
            is_hub_command: true,
        }
    };
    ($name:literal $(vars [$($var:literal),*])? $(params [$($param:expr),*])?) => {
        $crate::protocol::command::CommandDescriptor {
            command: $name,
            variables: &[$($($var),*)?],
            parameters: &[$($($param),*)?],
            is_hub_command: false,
        }
    };
}

/// Endpoint with its commands by method.
macro_rules! endpoint {
    ($path:literal { $($method:ident => $descriptor:expr),* }) => {
        $crate::protocol::command::Endpoint {
            path: $path,
            methods: &[$(($crate::protocol::command::HttpMethod::$method, $descriptor)),*],
        }
    };
}

// ============================================================================
// Submodules
// ============================================================================

mod appium;
mod chromium;
mod gecko;
mod jsonwp;
mod mjsonwp;
mod saucelabs;
mod selenium;
mod webdriver;

// ============================================================================
// Re-exports
// ============================================================================

pub use appium::APPIUM;
pub use chromium::CHROMIUM;
pub use gecko::GECKO;
pub use jsonwp::JSONWP;
pub use mjsonwp::MJSONWP;
pub use saucelabs::SAUCELABS;
pub use selenium::SELENIUM;
pub use webdriver::WEBDRIVER;

use super::command::ProtocolCommandTable;

/// Every built-in table.
pub static ALL: [&ProtocolCommandTable; 8] = [
    &WEBDRIVER, &JSONWP, &MJSONWP, &APPIUM, &CHROMIUM, &GECKO, &SAUCELABS, &SELENIUM,
];

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use rustc_hash::FxHashSet;

    #[test]
    fn test_tables_are_populated() {
        for table in ALL {
            assert!(!table.is_empty(), "table {} is empty", table.name);
        }
    }

    #[test]
    fn test_endpoints_unique_within_table() {
        for table in ALL {
            let mut seen = FxHashSet::default();
            for endpoint in table.endpoints {
                assert!(
                    seen.insert(endpoint.path),
                    "duplicate endpoint {} in {}",
                    endpoint.path,
                    table.name
                );
            }
        }
    }

    #[test]
    fn test_variables_appear_in_template() {
        for table in ALL {
            for (path, _, descriptor) in table.iter() {
                for var in descriptor.variables {
                    assert!(
                        path.contains(&format!(":{var}")),
                        "{} declares :{var} missing from {path}",
                        descriptor.command
                    );
                }
            }
        }
    }

    #[test]
    fn test_hub_commands_only_in_selenium() {
        for table in ALL {
            let has_hub = table.iter().any(|(_, _, d)| d.is_hub_command);
            assert_eq!(has_hub, table.name == "selenium", "table {}", table.name);
        }
    }
}
