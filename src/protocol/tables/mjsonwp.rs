//! Mobile JSON Wire Protocol commands.

use crate::protocol::command::ProtocolCommandTable;

/// Mobile JSON Wire Protocol table.
pub static MJSONWP: ProtocolCommandTable = ProtocolCommandTable {
    name: "mjsonwp",
    endpoints: &[
        endpoint!("/session/:sessionId/context" {
            Get => command!("getContext"),
            Post => command!("switchContext" params [required!("name", "string")])
        }),
        endpoint!("/session/:sessionId/contexts" {
            Get => command!("getContexts")
        }),
        endpoint!("/session/:sessionId/touch/perform" {
            Post => command!("touchPerform" params [required!("actions", "object[]")])
        }),
        endpoint!("/session/:sessionId/network_connection" {
            Get => command!("getNetworkConnection"),
            Post => command!("setNetworkConnection" params [required!("parameters", "object")])
        }),
        endpoint!("/session/:sessionId/orientation" {
            Get => command!("getOrientation"),
            Post => command!("setOrientation" params [required!("orientation", "string")])
        })
    ],
};
