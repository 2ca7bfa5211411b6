//! Session feature flags and environment detection.
//!
//! Flags are derived once from the capabilities the server resolved and
//! only select which protocol tables take part in the command surface.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::protocol::capabilities::truthy;

// ============================================================================
// Constants
// ============================================================================

/// Mobile platform names.
static MOBILE_PLATFORM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(ios|android)").ok());

/// Browser names only reported by mobile devices.
static MOBILE_BROWSER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(iphone|ipad|android)").ok());

/// Keys reported by Appium servers, with and without vendor prefix.
const APPIUM_MARKERS: &[&str] = &[
    "automationName",
    "deviceName",
    "appiumVersion",
    "appium:automationName",
    "appium:deviceName",
    "appium:appiumVersion",
];

// ============================================================================
// Dialect
// ============================================================================

/// Protocol dialect spoken by the remote end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// W3C WebDriver.
    #[default]
    W3C,
    /// Legacy JSON Wire Protocol.
    Legacy,
}

// ============================================================================
// FeatureFlags
// ============================================================================

/// Session attributes that select protocol tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    /// Protocol dialect.
    pub dialect: Dialect,
    /// Mobile platform (iOS / Android).
    pub mobile: bool,
    /// Chromium-based browser.
    pub chrome: bool,
    /// Firefox.
    pub firefox: bool,
    /// Running on Sauce Labs with extended debugging.
    pub sauce: bool,
    /// Served by a Selenium standalone server or grid.
    pub selenium_standalone: bool,
}

impl FeatureFlags {
    /// Creates flags for a desktop session of the given dialect.
    #[inline]
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Marks the session as mobile.
    #[inline]
    #[must_use]
    pub fn with_mobile(mut self) -> Self {
        self.mobile = true;
        self
    }

    /// Marks the browser as Chromium-based.
    #[inline]
    #[must_use]
    pub fn with_chrome(mut self) -> Self {
        self.chrome = true;
        self
    }

    /// Marks the browser as Firefox.
    #[inline]
    #[must_use]
    pub fn with_firefox(mut self) -> Self {
        self.firefox = true;
        self
    }

    /// Marks the session as running on Sauce Labs.
    #[inline]
    #[must_use]
    pub fn with_sauce(mut self) -> Self {
        self.sauce = true;
        self
    }

    /// Marks the server as a Selenium standalone server.
    #[inline]
    #[must_use]
    pub fn with_selenium_standalone(mut self) -> Self {
        self.selenium_standalone = true;
        self
    }

    /// Returns `true` for the W3C dialect.
    #[inline]
    #[must_use]
    pub fn is_w3c(&self) -> bool {
        self.dialect == Dialect::W3C
    }

    /// Derives flags from resolved and requested capabilities.
    ///
    /// `capabilities` are the capabilities the server resolved;
    /// `requested` is the legacy form of what the caller asked for.
    #[must_use]
    pub fn detect(capabilities: &Value, requested: &Value) -> Self {
        Self {
            dialect: if is_w3c(capabilities) {
                Dialect::W3C
            } else {
                Dialect::Legacy
            },
            mobile: is_mobile(capabilities),
            chrome: is_chrome(capabilities),
            firefox: is_firefox(capabilities),
            sauce: is_sauce(requested),
            selenium_standalone: is_selenium_standalone(capabilities),
        }
    }
}

// ============================================================================
// Detection
// ============================================================================

fn has(caps: &Value, key: &str) -> bool {
    caps.get(key).is_some_and(truthy)
}

fn str_field<'a>(caps: &'a Value, key: &str) -> Option<&'a str> {
    caps.get(key).and_then(Value::as_str)
}

fn is_match(regex: &LazyLock<Option<Regex>>, text: Option<&str>) -> bool {
    match (regex.as_ref(), text) {
        (Some(regex), Some(text)) => regex.is_match(text),
        _ => false,
    }
}

fn is_w3c(caps: &Value) -> bool {
    let is_appium = APPIUM_MARKERS.iter().any(|key| has(caps, key));
    let has_w3c_caps = has(caps, "platformName")
        && has(caps, "browserVersion")
        && (has(caps, "platformVersion") || caps.get("setWindowRect").is_some());

    has_w3c_caps || is_appium
}

fn is_mobile(caps: &Value) -> bool {
    is_match(&MOBILE_PLATFORM, str_field(caps, "platformName"))
        || has(caps, "deviceName")
        || has(caps, "appium:deviceName")
        || is_match(&MOBILE_BROWSER, str_field(caps, "browserName"))
}

fn is_chrome(caps: &Value) -> bool {
    has(caps, "chrome") || has(caps, "goog:chromeOptions")
}

fn is_firefox(caps: &Value) -> bool {
    str_field(caps, "browserName").is_some_and(|name| name.eq_ignore_ascii_case("firefox"))
        || has(caps, "moz:firefoxOptions")
}

fn is_sauce(requested: &Value) -> bool {
    has(requested, "extendedDebugging")
        || requested
            .get("sauce:options")
            .is_some_and(|options| has(options, "extendedDebugging"))
}

fn is_selenium_standalone(caps: &Value) -> bool {
    has(caps, "webdriver.remote.sessionid")
}

// ============================================================================
// Tests
// ============================================================================
