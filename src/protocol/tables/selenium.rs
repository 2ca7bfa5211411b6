//! Selenium standalone and grid extensions.

use crate::protocol::command::ProtocolCommandTable;

/// Selenium extension table.
pub static SELENIUM: ProtocolCommandTable = ProtocolCommandTable {
    name: "selenium",
    endpoints: &[
        endpoint!("/session/:sessionId/file" {
            Post => command!("file" params [required!("file", "string")])
        }),
        endpoint!("/grid/api/hub" {
            Get => command!(hub "getHubConfig")
        }),
        endpoint!("/grid/api/testsession?session=:session" {
            Get => command!(hub "gridTestSession" vars ["session"])
        }),
        endpoint!("/grid/api/proxy?id=:id" {
            Get => command!(hub "gridProxyDetails" vars ["id"])
        })
    ],
};
