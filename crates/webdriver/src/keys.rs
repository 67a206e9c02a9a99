//! Special keys for [`Element::send_keys`](crate::Element::send_keys).
//!
//! Each key is a code point of the Unicode private use area the remote end maps to a key press.
//! They are plain `&str` so they can be mixed with text:
//!
//! ```
//! use marotte_webdriver::keys;
//!
//! let text = format!("marotte{}", keys::ENTER);
//! assert_eq!(text, "marotte\u{e007}");
//! ```

pub const NULL: &str = "\u{e000}";
pub const CANCEL: &str = "\u{e001}";
pub const HELP: &str = "\u{e002}";
pub const BACKSPACE: &str = "\u{e003}";
pub const TAB: &str = "\u{e004}";
pub const CLEAR: &str = "\u{e005}";
pub const RETURN: &str = "\u{e006}";
pub const ENTER: &str = "\u{e007}";
pub const SHIFT: &str = "\u{e008}";
pub const CONTROL: &str = "\u{e009}";
pub const ALT: &str = "\u{e00a}";
pub const PAUSE: &str = "\u{e00b}";
pub const ESCAPE: &str = "\u{e00c}";
pub const SPACE: &str = "\u{e00d}";
pub const PAGE_UP: &str = "\u{e00e}";
pub const PAGE_DOWN: &str = "\u{e00f}";
pub const END: &str = "\u{e010}";
pub const HOME: &str = "\u{e011}";
pub const LEFT: &str = "\u{e012}";
pub const UP: &str = "\u{e013}";
pub const RIGHT: &str = "\u{e014}";
pub const DOWN: &str = "\u{e015}";
pub const INSERT: &str = "\u{e016}";
pub const DELETE: &str = "\u{e017}";
pub const SEMICOLON: &str = "\u{e018}";
pub const EQUALS: &str = "\u{e019}";

pub const NUMPAD_0: &str = "\u{e01a}";
pub const NUMPAD_1: &str = "\u{e01b}";
pub const NUMPAD_2: &str = "\u{e01c}";
pub const NUMPAD_3: &str = "\u{e01d}";
pub const NUMPAD_4: &str = "\u{e01e}";
pub const NUMPAD_5: &str = "\u{e01f}";
pub const NUMPAD_6: &str = "\u{e020}";
pub const NUMPAD_7: &str = "\u{e021}";
pub const NUMPAD_8: &str = "\u{e022}";
pub const NUMPAD_9: &str = "\u{e023}";
pub const MULTIPLY: &str = "\u{e024}";
pub const ADD: &str = "\u{e025}";
pub const SEPARATOR: &str = "\u{e026}";
pub const SUBTRACT: &str = "\u{e027}";
pub const DECIMAL: &str = "\u{e028}";
pub const DIVIDE: &str = "\u{e029}";

pub const F1: &str = "\u{e031}";
pub const F2: &str = "\u{e032}";
pub const F3: &str = "\u{e033}";
pub const F4: &str = "\u{e034}";
pub const F5: &str = "\u{e035}";
pub const F6: &str = "\u{e036}";
pub const F7: &str = "\u{e037}";
pub const F8: &str = "\u{e038}";
pub const F9: &str = "\u{e039}";
pub const F10: &str = "\u{e03a}";
pub const F11: &str = "\u{e03b}";
pub const F12: &str = "\u{e03c}";

pub const META: &str = "\u{e03d}";

// Aliases.
pub const ARROW_LEFT: &str = LEFT;
pub const ARROW_UP: &str = UP;
pub const ARROW_RIGHT: &str = RIGHT;
pub const ARROW_DOWN: &str = DOWN;
pub const LEFT_SHIFT: &str = SHIFT;
pub const LEFT_CONTROL: &str = CONTROL;
pub const LEFT_ALT: &str = ALT;
pub const COMMAND: &str = META;

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::webdriver::ElementSendKeysParameters;

    #[test]
    fn test_keys_are_single_private_use_code_points() {
        for key in [NULL, BACKSPACE, TAB, ENTER, ESCAPE, NUMPAD_0, DIVIDE, F1, F12, META] {
            let mut chars = key.chars();
            let code = chars.next().map(u32::from).unwrap();

            assert!(chars.next().is_none(), "{key:?} should be one code point");
            assert!((0xe000..=0xe03d).contains(&code), "{code:#x} out of range");
        }
        assert_eq!(u32::from(DIVIDE.chars().next().unwrap()), 0xe029);
        assert_eq!(u32::from(F1.chars().next().unwrap()), 0xe031);
    }

    #[test]
    fn test_keys_in_send_keys_body() {
        let parameters = ElementSendKeysParameters {
            text: format!("{CONTROL}a{NULL}marotte{ENTER}"),
        };

        assert_eq!(
            serde_json::to_value(&parameters).unwrap(),
            json!({"text": "\u{e009}a\u{e000}marotte\u{e007}"})
        );
    }

    #[test]
    fn test_aliases() {
        assert_eq!(ARROW_DOWN, DOWN);
        assert_eq!(LEFT_SHIFT, SHIFT);
        assert_eq!(COMMAND, META);
    }
}
