//! Geckodriver extensions.

use crate::protocol::command::ProtocolCommandTable;

/// Gecko extension table.
pub static GECKO: ProtocolCommandTable = ProtocolCommandTable {
    name: "gecko",
    endpoints: &[
        endpoint!("/session/:sessionId/moz/context" {
            Get => command!("getMozContext"),
            Post => command!("setMozContext" params [required!("context", "string")])
        }),
        endpoint!("/session/:sessionId/moz/addon/install" {
            Post => command!("installAddOn" params [
                required!("addon", "string"),
                required!("temporary", "boolean")
            ])
        }),
        endpoint!("/session/:sessionId/moz/addon/uninstall" {
            Post => command!("uninstallAddOn" params [required!("id", "string")])
        }),
        endpoint!("/session/:sessionId/moz/screenshot/full" {
            Get => command!("fullPageScreenshot")
        })
    ],
};
