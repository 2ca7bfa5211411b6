//! W3C WebDriver commands.

use crate::protocol::command::ProtocolCommandTable;

/// W3C WebDriver protocol table.
pub static WEBDRIVER: ProtocolCommandTable = ProtocolCommandTable {
    name: "webdriver",
    endpoints: &[
        endpoint!("/session" {
            Post => command!("newSession" params [required!("capabilities", "object")])
        }),
        endpoint!("/session/:sessionId" {
            Delete => command!("deleteSession")
        }),
        endpoint!("/status" {
            Get => command!("status")
        }),
        endpoint!("/session/:sessionId/timeouts" {
            Get => command!("getTimeouts"),
            Post => command!("setTimeouts" params [
                optional!("implicit", "number"),
                optional!("pageLoad", "number"),
                optional!("script", "(number|null)")
            ])
        }),
        endpoint!("/session/:sessionId/url" {
            Get => command!("getUrl"),
            Post => command!("navigateTo" params [required!("url", "string")])
        }),
        endpoint!("/session/:sessionId/back" {
            Post => command!("back")
        }),
        endpoint!("/session/:sessionId/forward" {
            Post => command!("forward")
        }),
        endpoint!("/session/:sessionId/refresh" {
            Post => command!("refresh")
        }),
        endpoint!("/session/:sessionId/title" {
            Get => command!("getTitle")
        }),
        endpoint!("/session/:sessionId/window" {
            Get => command!("getWindowHandle"),
            Delete => command!("closeWindow"),
            Post => command!("switchToWindow" params [required!("handle", "string")])
        }),
        endpoint!("/session/:sessionId/window/handles" {
            Get => command!("getWindowHandles")
        }),
        endpoint!("/session/:sessionId/window/new" {
            Post => command!("createWindow" params [required!("type", "string")])
        }),
        endpoint!("/session/:sessionId/window/rect" {
            Get => command!("getWindowRect"),
            Post => command!("setWindowRect" params [
                optional!("x", "(number|null)"),
                optional!("y", "(number|null)"),
                optional!("width", "(number|null)"),
                optional!("height", "(number|null)")
            ])
        }),
        endpoint!("/session/:sessionId/frame" {
            Post => command!("switchToFrame" params [required!("id", "(number|object|null)")])
        }),
        endpoint!("/session/:sessionId/element" {
            Post => command!("findElement" params [
                required!("using", "string"),
                required!("value", "string")
            ])
        }),
        endpoint!("/session/:sessionId/elements" {
            Post => command!("findElements" params [
                required!("using", "string"),
                required!("value", "string")
            ])
        }),
        endpoint!("/session/:sessionId/element/:elementId/element" {
            Post => command!("findElementFromElement" vars ["elementId"] params [
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
        endpoint!("/session/:sessionId/element/:elementId/text" {
            Get => command!("getElementText" vars ["elementId"])
        }),
        endpoint!("/session/:sessionId/element/:elementId/click" {
            Post => command!("elementClick" vars ["elementId"])
        }),
        endpoint!("/session/:sessionId/element/:elementId/value" {
            Post => command!("elementSendKeys" vars ["elementId"] params [required!("text", "string")])
        }),
        endpoint!("/session/:sessionId/source" {
            Get => command!("getPageSource")
        }),
        endpoint!("/session/:sessionId/execute/sync" {
            Post => command!("executeScript" params [
                required!("script", "string"),
                required!("args", "(string|object|number|boolean|null)[]")
            ])
        }),
        endpoint!("/session/:sessionId/execute/async" {
            Post => command!("executeAsyncScript" params [
                required!("script", "string"),
                required!("args", "(string|object|number|boolean|null)[]")
            ])
        }),
        endpoint!("/session/:sessionId/cookie" {
            Get => command!("getAllCookies"),
            Post => command!("addCookie" params [required!("cookie", "object")]),
            Delete => command!("deleteAllCookies")
        }),
        endpoint!("/session/:sessionId/actions" {
            Post => command!("performActions" params [required!("actions", "object[]")]),
            Delete => command!("releaseActions")
        }),
        endpoint!("/session/:sessionId/alert/text" {
            Get => command!("getAlertText")
        }),
        endpoint!("/session/:sessionId/screenshot" {
            Get => command!("takeScreenshot")
        })
    ],
};
