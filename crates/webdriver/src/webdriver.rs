//! Module for the [WebDriver](https://www.w3.org/TR/webdriver2/) commands sent by a session.
//!
//! Each command is a plain struct annotated with the [`WebDriverCommand`] derive macro, which
//! generates its constructor, its HTTP method, its path relative to the session, and binds the
//! body and response types. Commands without meaningful result decode their `value` into
//! [`IgnoredAny`].

use marotte_derive::WebDriverCommand;
use serde::{Deserialize, Serialize, de::IgnoredAny};
use serde_json::{Map, Value};

use crate::{
    capabilities::Capabilities,
    command::Command,
    element::ElementHandle,
    locator::Locator,
    rect::Rect,
    timeouts::Timeouts,
    transport::Method,
};

// --- NewSession command types ---

/// Body of a W3C session request: `{"capabilities": {"alwaysMatch": ...}}`.
#[derive(Debug, Serialize)]
pub struct NewSessionParameters<'a> {
    pub capabilities: AlwaysMatch<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlwaysMatch<'a> {
    pub always_match: &'a Capabilities,
}

/// Body of a legacy session request: `{"desiredCapabilities": ...}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyNewSessionParameters<'a> {
    pub desired_capabilities: &'a Capabilities,
}

impl<'a> NewSessionParameters<'a> {
    #[must_use]
    pub const fn w3c(capabilities: &'a Capabilities) -> Self {
        Self {
            capabilities: AlwaysMatch {
                always_match: capabilities,
            },
        }
    }
}

impl<'a> LegacyNewSessionParameters<'a> {
    #[must_use]
    pub const fn legacy(capabilities: &'a Capabilities) -> Self {
        Self {
            desired_capabilities: capabilities,
        }
    }
}

// --- DeleteSession command types ---

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "DELETE", path = "", response = "IgnoredAny")]
pub struct DeleteSession;

// --- Timeouts command types ---

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "timeouts", response = "Timeouts")]
pub struct GetTimeouts;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "timeouts", response = "IgnoredAny")]
pub struct SetTimeouts {
    parameters: Timeouts,
}

// --- Navigation command types ---

#[derive(Debug, Serialize)]
pub struct NavigateParameters {
    pub url: String,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "url", response = "IgnoredAny")]
pub struct Navigate {
    parameters: NavigateParameters,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "url", response = "String")]
pub struct GetCurrentUrl;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "back", response = "IgnoredAny")]
pub struct Back;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "forward", response = "IgnoredAny")]
pub struct Forward;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "refresh", response = "IgnoredAny")]
pub struct Refresh;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "title", response = "String")]
pub struct GetTitle;

// --- Window command types ---

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "window", response = "String")]
pub struct GetWindowHandle;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "window/handles", response = "Vec<String>")]
pub struct GetWindowHandles;

/// Closes the current window, the remote end answers with the remaining handles.
#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "DELETE", path = "window", response = "IgnoredAny")]
pub struct CloseWindow;

#[derive(Debug, Serialize)]
pub struct SwitchToWindowParameters {
    pub handle: String,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "window", response = "IgnoredAny")]
pub struct SwitchToWindow {
    parameters: SwitchToWindowParameters,
}

#[derive(Debug, Serialize)]
pub struct SwitchToFrameParameters {
    pub id: u16,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "frame", response = "IgnoredAny")]
pub struct SwitchToFrame {
    parameters: SwitchToFrameParameters,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "frame/parent", response = "IgnoredAny")]
pub struct SwitchToParentFrame;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "window/rect", response = "Rect")]
pub struct GetWindowRect;

#[derive(Debug, Default, Serialize)]
pub struct SetWindowRectParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
}

impl From<Rect> for SetWindowRectParameters {
    fn from(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
        }
    }
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "window/rect", response = "Rect")]
pub struct SetWindowRect {
    parameters: SetWindowRectParameters,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "window/maximize", response = "Rect")]
pub struct MaximizeWindow;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "window/minimize", response = "Rect")]
pub struct MinimizeWindow;

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "window/fullscreen", response = "Rect")]
pub struct FullscreenWindow;

// --- FindElement command types ---

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "element", response = "ElementHandle")]
pub struct FindElement<'a> {
    parameters: &'a Locator,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "elements", response = "Vec<ElementHandle>")]
pub struct FindElements<'a> {
    parameters: &'a Locator,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "element/active", response = "ElementHandle")]
pub struct GetActiveElement;

// --- ExecuteScript command types ---

#[derive(Debug, Serialize)]
pub struct ExecuteScriptParameters {
    pub script: String,
    pub args: Vec<Value>,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "execute/sync", response = "Value")]
pub struct ExecuteScript {
    parameters: ExecuteScriptParameters,
}

// --- Element command types ---

#[derive(Debug, WebDriverCommand)]
#[webdriver(
    method = "POST",
    path = "element/{element}/element",
    response = "ElementHandle"
)]
pub struct FindElementFromElement<'a> {
    element: &'a ElementHandle,
    parameters: &'a Locator,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(
    method = "POST",
    path = "element/{element}/elements",
    response = "Vec<ElementHandle>"
)]
pub struct FindElementsFromElement<'a> {
    element: &'a ElementHandle,
    parameters: &'a Locator,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "element/{element}/selected", response = "bool")]
pub struct IsElementSelected<'a> {
    element: &'a ElementHandle,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "element/{element}/enabled", response = "bool")]
pub struct IsElementEnabled<'a> {
    element: &'a ElementHandle,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(
    method = "GET",
    path = "element/{element}/attribute/{name}",
    response = "Option<String>"
)]
pub struct GetElementAttribute<'a> {
    element: &'a ElementHandle,
    name: &'a str,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(
    method = "GET",
    path = "element/{element}/property/{name}",
    response = "Value"
)]
pub struct GetElementProperty<'a> {
    element: &'a ElementHandle,
    name: &'a str,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "element/{element}/css/{name}", response = "String")]
pub struct GetElementCssValue<'a> {
    element: &'a ElementHandle,
    name: &'a str,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "element/{element}/text", response = "String")]
pub struct GetElementText<'a> {
    element: &'a ElementHandle,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "element/{element}/name", response = "String")]
pub struct GetElementTagName<'a> {
    element: &'a ElementHandle,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "GET", path = "element/{element}/rect", response = "Rect")]
pub struct GetElementRect<'a> {
    element: &'a ElementHandle,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "element/{element}/click", response = "IgnoredAny")]
pub struct ElementClick<'a> {
    element: &'a ElementHandle,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "element/{element}/clear", response = "IgnoredAny")]
pub struct ElementClear<'a> {
    element: &'a ElementHandle,
}

#[derive(Debug, Serialize)]
pub struct ElementSendKeysParameters {
    pub text: String,
}

#[derive(Debug, WebDriverCommand)]
#[webdriver(method = "POST", path = "element/{element}/value", response = "IgnoredAny")]
pub struct ElementSendKeys<'a> {
    element: &'a ElementHandle,
    parameters: ElementSendKeysParameters,
}

// --- Session reply types ---

/// The W3C shape of a new session reply: `{"value": {"sessionId", "capabilities"}}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct NewSessionResponse {
    pub session_id: String,
    #[serde(default)]
    pub capabilities: Map<String, Value>,
}
