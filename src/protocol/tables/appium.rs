//! Appium automation extensions.

use crate::protocol::command::ProtocolCommandTable;

/// Appium extension table.
pub static APPIUM: ProtocolCommandTable = ProtocolCommandTable {
    name: "appium",
    endpoints: &[
        endpoint!("/session/:sessionId/appium/app/launch" {
            Post => command!("launchApp")
        }),
        endpoint!("/session/:sessionId/appium/app/close" {
            Post => command!("closeApp")
        }),
        endpoint!("/session/:sessionId/appium/device/lock" {
            Post => command!("lock" params [optional!("seconds", "number")])
        }),
        endpoint!("/session/:sessionId/appium/device/unlock" {
            Post => command!("unlock")
        }),
        endpoint!("/session/:sessionId/appium/device/is_locked" {
            Post => command!("isLocked")
        }),
        endpoint!("/session/:sessionId/appium/device/press_keycode" {
            Post => command!("pressKeyCode" params [
                required!("keycode", "number"),
                optional!("metastate", "number"),
                optional!("flags", "number")
            ])
        }),
        endpoint!("/session/:sessionId/appium/settings" {
            Get => command!("getSettings"),
            Post => command!("updateSettings" params [required!("settings", "object")])
        }),
        endpoint!("/session/:sessionId/appium/element/:elementId/value" {
            Post => command!("setValueImmediate" vars ["elementId"] params [required!("text", "string")])
        })
    ],
};
