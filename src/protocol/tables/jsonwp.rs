//! Legacy JSON Wire Protocol commands.

use crate::protocol::command::ProtocolCommandTable;

/// JSON Wire Protocol table.
pub static JSONWP: ProtocolCommandTable = ProtocolCommandTable {
    name: "jsonwp",
    endpoints: &[
        endpoint!("/session" {
            Post => command!("newSession" params [
                required!("desiredCapabilities", "object"),
                optional!("requiredCapabilities", "object")
            ])
        }),
        endpoint!("/session/:sessionId" {
            Get => command!("getSession"),
            Delete => command!("deleteSession")
        }),
        endpoint!("/status" {
            Get => command!("status")
        }),
        endpoint!("/sessions" {
            Get => command!("getSessions")
        }),
        endpoint!("/session/:sessionId/url" {
            Get => command!("getUrl"),
            Post => command!("navigateTo" params [required!("url", "string")])
        }),
        endpoint!("/session/:sessionId/title" {
            Get => command!("getTitle")
        }),
        endpoint!("/session/:sessionId/window_handle" {
            Get => command!("getWindowHandle")
        }),
        endpoint!("/session/:sessionId/window_handles" {
            Get => command!("getWindowHandles")
        }),
        endpoint!("/session/:sessionId/window/:windowHandle/size" {
            Get => command!("_getWindowSize" vars ["windowHandle"]),
            Post => command!("_setWindowSize" vars ["windowHandle"] params [
                required!("width", "number"),
                required!("height", "number")
            ])
        }),
        endpoint!("/session/:sessionId/element" {
            Post => command!("findElement" params [
                required!("using", "string"),
                required!("value", "string")
            ])
        }),
        endpoint!("/session/:sessionId/element/:elementId/attribute/:name" {
            Get => command!("getElementAttribute" vars ["elementId", "name"])
        }),
        endpoint!("/session/:sessionId/element/:elementId/displayed" {
            Get => command!("isElementDisplayed" vars ["elementId"])
        }),
        endpoint!("/session/:sessionId/execute" {
            Post => command!("executeScript" params [
                required!("script", "string"),
                required!("args", "array")
            ])
        }),
        endpoint!("/session/:sessionId/location" {
            Get => command!("getGeoLocation"),
            Post => command!("setGeoLocation" params [required!("location", "object")])
        }),
        endpoint!("/session/:sessionId/orientation" {
            Get => command!("getOrientation"),
            Post => command!("setOrientation" params [required!("orientation", "string")])
        }),
        endpoint!("/session/:sessionId/moveto" {
            Post => command!("moveToElement" params [
                optional!("element", "(string|null)"),
                optional!("xoffset", "number"),
                optional!("yoffset", "number")
            ])
        }),
        endpoint!("/session/:sessionId/buttondown" {
            Post => command!("buttonDown" params [optional!("button", "number")])
        }),
        endpoint!("/session/:sessionId/keys" {
            Post => command!("sendKeys" params [required!("value", "string[]")])
        }),
        endpoint!("/session/:sessionId/screenshot" {
            Get => command!("takeScreenshot")
        })
    ],
};
