use serde::{Deserialize, Serialize};

/// Session timeouts, in milliseconds.
///
/// Fields left to `None` are not sent when setting timeouts. A `script` timeout read back as
/// `None` means scripts never time out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_load: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit: Option<u64>,
}

impl Timeouts {
    #[must_use]
    pub const fn new(script: u64, page_load: u64, implicit: u64) -> Self {
        Self {
            script: Some(script),
            page_load: Some(page_load),
            implicit: Some(implicit),
        }
    }
}
