//! Reasoning-region handling for R1-family responses.
//!
//! R1-style models interleave `<think>...</think>` regions with their
//! visible output. Complete responses are split with the string helpers;
//! streamed responses go through [`ThinkTagScanner`], which tolerates tags
//! split across fragment boundaries by holding back a potential partial
//! tag until the next fragment resolves it.

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Check if content contains thinking tags (`<think>` or `</think>`)
pub fn contains_thinking_tags(content: &str) -> bool {
    content.contains(THINK_OPEN) || content.contains(THINK_CLOSE)
}

/// Extract thinking content from `<think>...</think>` tags
/// Returns the content inside the tags, or None if no valid tags found
pub fn extract_thinking_content(content: &str) -> Option<String> {
    let start_pos = content.find(THINK_OPEN)?;
    let content_start = start_pos + THINK_OPEN.len();
    let end_pos = content[content_start..].find(THINK_CLOSE)?;

    let thinking = content[content_start..content_start + end_pos].trim();
    if thinking.is_empty() {
        None
    } else {
        Some(thinking.to_string())
    }
}

/// Filter out thinking content from text for display purposes
/// Removes `<think>...</think>` tags and their content
pub fn filter_thinking_content(content: &str) -> String {
    let mut result = String::new();
    let mut remaining = content;

    while let Some(start_pos) = remaining.find(THINK_OPEN) {
        result.push_str(&remaining[..start_pos]);

        if let Some(end_pos) = remaining[start_pos..].find(THINK_CLOSE) {
            let skip_to = start_pos + end_pos + THINK_CLOSE.len();
            remaining = &remaining[skip_to..];
        } else {
            // No matching end tag, drop everything from the start tag onwards
            remaining = "";
            break;
        }
    }

    result.push_str(remaining);
    result.trim().to_string()
}

/// Output of one scanner step: visible text and thinking text carved out
/// of the fragment (either may be empty).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ScannedDelta {
    pub visible: String,
    pub thinking: String,
}

/// Incremental `<think>` region scanner for streamed fragments.
#[derive(Debug, Default)]
pub(crate) struct ThinkTagScanner {
    buffer: String,
    inside: bool,
}

impl ThinkTagScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fragment; returns the text that can be emitted now.
    ///
    /// Text that could be the start of a tag stays buffered until a later
    /// fragment either completes the tag or rules it out.
    pub fn push(&mut self, fragment: &str) -> ScannedDelta {
        self.buffer.push_str(fragment);
        let mut out = ScannedDelta::default();

        loop {
            let tag = if self.inside { THINK_CLOSE } else { THINK_OPEN };
            match self.buffer.find(tag) {
                Some(pos) => {
                    self.emit(&mut out, pos);
                    self.buffer.drain(..tag.len());
                    self.inside = !self.inside;
                }
                None => {
                    let keep_from = partial_tag_start(&self.buffer, tag);
                    self.emit(&mut out, keep_from);
                    break;
                }
            }
        }

        out
    }

    /// Flush whatever remains buffered at end of stream.
    pub fn finish(&mut self) -> ScannedDelta {
        let remainder = std::mem::take(&mut self.buffer);
        let mut out = ScannedDelta::default();
        if self.inside {
            out.thinking = remainder;
        } else {
            out.visible = remainder;
        }
        out
    }

    fn emit(&mut self, out: &mut ScannedDelta, up_to: usize) {
        if up_to == 0 {
            return;
        }
        let text: String = self.buffer.drain(..up_to).collect();
        if self.inside {
            out.thinking.push_str(&text);
        } else {
            out.visible.push_str(&text);
        }
    }
}

/// Earliest index from which the buffer's suffix is a prefix of `tag`.
/// Returns `buffer.len()` when no suffix could start the tag.
fn partial_tag_start(buffer: &str, tag: &str) -> usize {
    let start = buffer.len().saturating_sub(tag.len() - 1);
    for i in start..buffer.len() {
        if buffer.is_char_boundary(i) && tag.starts_with(&buffer[i..]) {
            return i;
        }
    }
    buffer.len()
}
