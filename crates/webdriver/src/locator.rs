use std::fmt;

use serde::Serialize;

/// Element location strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Using {
    #[serde(rename = "css selector")]
    CssSelector,
    #[serde(rename = "link text")]
    LinkText,
    #[serde(rename = "partial link text")]
    PartialLinkText,
    #[serde(rename = "tag name")]
    TagName,
    #[serde(rename = "xpath")]
    XPath,
}

impl Using {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CssSelector => "css selector",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::TagName => "tag name",
            Self::XPath => "xpath",
        }
    }
}

/// A strategy and the selector it applies to; serialized as the body of find commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Locator {
    pub using: Using,
    pub value: String,
}

impl Locator {
    pub fn new<V: Into<String>>(using: Using, value: V) -> Self {
        Self {
            using,
            value: value.into(),
        }
    }

    pub fn css<V: Into<String>>(selector: V) -> Self {
        Self::new(Using::CssSelector, selector)
    }

    #[must_use]
    pub fn id(id: &str) -> Self {
        Self::css(format!("#{id}"))
    }

    #[must_use]
    pub fn name(name: &str) -> Self {
        Self::css(format!("input[name='{name}']"))
    }

    pub fn tag<V: Into<String>>(name: V) -> Self {
        Self::new(Using::TagName, name)
    }

    pub fn link_text<V: Into<String>>(text: V) -> Self {
        Self::new(Using::LinkText, text)
    }

    pub fn partial_link_text<V: Into<String>>(text: V) -> Self {
        Self::new(Using::PartialLinkText, text)
    }

    pub fn xpath<V: Into<String>>(selector: V) -> Self {
        Self::new(Using::XPath, selector)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.using.as_str(), self.value)
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_shorthands() {
        assert_eq!(Locator::id("main"), Locator::css("#main"));
        assert_eq!(Locator::name("q"), Locator::css("input[name='q']"));
        assert_eq!(Locator::tag("h1").using, Using::TagName);
        assert_eq!(Locator::link_text("Home").using, Using::LinkText);
        assert_eq!(
            Locator::partial_link_text("Ho").using,
            Using::PartialLinkText
        );
        assert_eq!(Locator::xpath("//div").using, Using::XPath);
    }

    #[test]
    fn test_serialize_find_body() {
        assert_eq!(
            serde_json::to_value(Locator::css("#my-element")).unwrap(),
            json!({"using": "css selector", "value": "#my-element"})
        );
        assert_eq!(
            serde_json::to_value(Locator::xpath("//div")).unwrap(),
            json!({"using": "xpath", "value": "//div"})
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Locator::css("#a").to_string(), "css selector '#a'");
    }
}
