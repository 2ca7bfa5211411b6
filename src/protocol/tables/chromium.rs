//! Chromedriver extensions.

use crate::protocol::command::ProtocolCommandTable;

/// Chromium extension table.
pub static CHROMIUM: ProtocolCommandTable = ProtocolCommandTable {
    name: "chromium",
    endpoints: &[
        endpoint!("/session/:sessionId/chromium/network_conditions" {
            Get => command!("getNetworkConditions"),
            Post => command!("setNetworkConditions" params [
                required!("network_conditions", "object"),
                optional!("network_name", "string")
            ]),
            Delete => command!("deleteNetworkConditions")
        }),
        endpoint!("/session/:sessionId/goog/cdp/execute" {
            Post => command!("sendCommandAndGetResult" params [
                required!("cmd", "string"),
                required!("params", "object")
            ])
        }),
        endpoint!("/session/:sessionId/chromium/heap_snapshot" {
            Get => command!("takeHeapSnapshot")
        }),
        endpoint!("/session/:sessionId/goog/cast/get_sinks" {
            Get => command!("getCastSinks")
        }),
        endpoint!("/session/:sessionId/se/file" {
            Post => command!("file" params [required!("file", "string")])
        })
    ],
};
