//! Flatten tool call results into the single string the host expects.

use crate::types::ContentBlock;

/// Join content blocks into one string, in order, separated by newlines.
///
/// Text blocks contribute their text verbatim; every other block contributes
/// its compact JSON form. An empty result yields an empty string. Never fails.
#[must_use]
pub fn format_content(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            ContentBlock::Text(text) => text.clone(),
            ContentBlock::Structured(value) => value.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
