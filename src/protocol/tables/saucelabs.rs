//! Sauce Labs extensions.

use crate::protocol::command::ProtocolCommandTable;

/// Sauce Labs extension table.
pub static SAUCELABS: ProtocolCommandTable = ProtocolCommandTable {
    name: "saucelabs",
    endpoints: &[
        endpoint!("/session/:sessionId/sauce/ondemand/log" {
            Post => command!("getPageLogs" params [required!("type", "string")])
        }),
        endpoint!("/session/:sessionId/sauce/ondemand/throttle/network" {
            Post => command!("throttleNetwork" params [required!("condition", "(string|object)")])
        }),
        endpoint!("/session/:sessionId/sauce/ondemand/throttle/cpu" {
            Post => command!("throttleCPU" params [required!("rate", "number")])
        }),
        endpoint!("/session/:sessionId/sauce/ondemand/intercept" {
            Post => command!("interceptRequest" params [required!("rule", "object")])
        })
    ],
};
