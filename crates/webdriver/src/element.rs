//! Elements of the page a [`Session`] is browsing.
//!
//! An [`ElementHandle`] is the opaque id the remote end returned for an element, together with
//! the JSON key it used to wrap it. W3C remote ends use [`W3C_ELEMENT_KEY`], older ones use
//! [`LEGACY_ELEMENT_KEY`]; whichever key came in is the key that goes out, so a handle passed back
//! as a script argument or command body always speaks the dialect of the remote end that minted it.
//!
//! An [`Element`] binds a handle to the session it belongs to and exposes the element commands.

use std::{fmt, fmt::Debug};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{error::Result, locator::Locator, rect::Rect, session::Session, webdriver};

pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: String,
    reference_key: String,
}

impl ElementHandle {
    pub fn new<I: Into<String>, K: Into<String>>(id: I, reference_key: K) -> Self {
        Self {
            id: id.into(),
            reference_key: reference_key.into(),
        }
    }

    /// Reads a handle out of an element reference object.
    ///
    /// The W3C key wins over the legacy key. Failing both, an object holding a single string
    /// entry is taken as a reference under an unknown key.
    #[must_use]
    pub fn from_reference(reference: &Map<String, Value>) -> Option<Self> {
        for key in [W3C_ELEMENT_KEY, LEGACY_ELEMENT_KEY] {
            if let Some(Value::String(id)) = reference.get(key) {
                return Some(Self::new(id.as_str(), key));
            }
        }

        match reference.iter().next() {
            Some((key, Value::String(id))) if reference.len() == 1 => {
                Some(Self::new(id.as_str(), key.as_str()))
            },
            _ => None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn reference_key(&self) -> &str {
        &self.reference_key
    }

    /// The reference object `{<reference_key>: <id>}`, as sent in command bodies.
    #[must_use]
    pub fn to_reference(&self) -> Value {
        let mut reference = Map::with_capacity(1);
        reference.insert(self.reference_key.clone(), Value::String(self.id.clone()));

        Value::Object(reference)
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&ElementHandle> for Value {
    fn from(handle: &ElementHandle) -> Self {
        handle.to_reference()
    }
}

impl Serialize for ElementHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.reference_key, &self.id)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ElementHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let reference = Map::<String, Value>::deserialize(deserializer)?;

        Self::from_reference(&reference).ok_or_else(|| {
            de::Error::custom(format!(
                "expected an element reference, found: {}",
                Value::Object(reference)
            ))
        })
    }
}

/// An element bound to the session it was found in.
///
/// Handles do not outlive page changes on the remote end: commands on an element from a
/// previous document fail with a protocol error, see [`Error::is_stale_element`](crate::Error::is_stale_element).
#[derive(Debug, Clone)]
pub struct Element<'s> {
    session: &'s Session,
    handle: ElementHandle,
}

impl<'s> Element<'s> {
    #[must_use]
    pub const fn new(session: &'s Session, handle: ElementHandle) -> Self {
        Self { session, handle }
    }

    #[must_use]
    pub const fn handle(&self) -> &ElementHandle {
        &self.handle
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.handle.id()
    }

    #[must_use]
    pub fn into_handle(self) -> ElementHandle {
        self.handle
    }

    /// Finds the first descendant matching `locator`.
    #[instrument(name = "Element::find_element", skip(self), fields(element = %self.handle))]
    pub async fn find_element(&self, locator: &Locator) -> Result<Element<'s>> {
        let handle = self
            .session
            .send(&webdriver::FindElementFromElement::new(&self.handle, locator))
            .await?;

        Ok(self.session.element(handle))
    }

    /// Finds every descendant matching `locator`, an empty list when none matches.
    #[instrument(name = "Element::find_elements", skip(self), fields(element = %self.handle))]
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<Element<'s>>> {
        let handles = self
            .session
            .send(&webdriver::FindElementsFromElement::new(
                &self.handle,
                locator,
            ))
            .await?;

        Ok(handles
            .into_iter()
            .map(|handle| self.session.element(handle))
            .collect())
    }

    #[instrument(name = "Element::is_selected", skip(self), fields(element = %self.handle))]
    pub async fn is_selected(&self) -> Result<bool> {
        self.session
            .send(&webdriver::IsElementSelected::new(&self.handle))
            .await
    }

    #[instrument(name = "Element::is_enabled", skip(self), fields(element = %self.handle))]
    pub async fn is_enabled(&self) -> Result<bool> {
        self.session
            .send(&webdriver::IsElementEnabled::new(&self.handle))
            .await
    }

    /// Reads an attribute, `None` when the element does not carry it.
    #[instrument(name = "Element::attribute", skip(self), fields(element = %self.handle))]
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.session
            .send(&webdriver::GetElementAttribute::new(&self.handle, name))
            .await
    }

    #[instrument(name = "Element::property", skip(self), fields(element = %self.handle))]
    pub async fn property(&self, name: &str) -> Result<Value> {
        self.session
            .send(&webdriver::GetElementProperty::new(&self.handle, name))
            .await
    }

    #[instrument(name = "Element::css_value", skip(self), fields(element = %self.handle))]
    pub async fn css_value(&self, name: &str) -> Result<String> {
        self.session
            .send(&webdriver::GetElementCssValue::new(&self.handle, name))
            .await
    }

    #[instrument(name = "Element::text", skip(self), fields(element = %self.handle))]
    pub async fn text(&self) -> Result<String> {
        self.session
            .send(&webdriver::GetElementText::new(&self.handle))
            .await
    }

    #[instrument(name = "Element::tag_name", skip(self), fields(element = %self.handle))]
    pub async fn tag_name(&self) -> Result<String> {
        self.session
            .send(&webdriver::GetElementTagName::new(&self.handle))
            .await
    }

    #[instrument(name = "Element::rect", skip(self), fields(element = %self.handle))]
    pub async fn rect(&self) -> Result<Rect> {
        self.session
            .send(&webdriver::GetElementRect::new(&self.handle))
            .await
    }

    #[instrument(name = "Element::click", skip(self), fields(element = %self.handle))]
    pub async fn click(&self) -> Result<()> {
        self.session
            .send(&webdriver::ElementClick::new(&self.handle))
            .await?;

        Ok(())
    }

    #[instrument(name = "Element::clear", skip(self), fields(element = %self.handle))]
    pub async fn clear(&self) -> Result<()> {
        self.session
            .send(&webdriver::ElementClear::new(&self.handle))
            .await?;

        Ok(())
    }

    #[instrument(name = "Element::send_keys", skip(self, text), fields(element = %self.handle))]
    pub async fn send_keys<T: Into<String> + Send>(&self, text: T) -> Result<()> {
        self.session
            .send(&webdriver::ElementSendKeys::new(
                &self.handle,
                webdriver::ElementSendKeysParameters { text: text.into() },
            ))
            .await?;

        Ok(())
    }

    /// Submits the form enclosing this element, or the element itself when it is a form.
    #[instrument(name = "Element::submit", skip(self), fields(element = %self.handle))]
    pub async fn submit(&self) -> Result<()> {
        let form = self
            .find_element(&Locator::xpath("./ancestor-or-self::form"))
            .await?;
        debug!(form = %form.handle, "Submit form");

        self.session
            .execute_script("arguments[0].submit()", vec![form.handle.to_reference()])
            .await?;

        Ok(())
    }

    /// Whether the element rect overlaps the window rect.
    ///
    /// Occlusion and CSS visibility are not considered.
    #[instrument(name = "Element::is_displayed", skip(self), fields(element = %self.handle))]
    pub async fn is_displayed(&self) -> Result<bool> {
        let rect = self.rect().await?;
        let window = self.session.window_rect().await?;
        let displayed = rect.overlaps(&window);
        debug!(?rect, ?window, displayed, "Element display state");

        Ok(displayed)
    }
}
