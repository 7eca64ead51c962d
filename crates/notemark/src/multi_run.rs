//! Block constructs that bracket many fragments: lists, code fences and
//! aligned paragraphs.

use crate::types::{Formatting, StyleType};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MultiRun {
    #[default]
    None,
    List,
    Monospaced,
    Alignment,
}

/// Result of feeding one fragment to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: MultiRun,
    /// Markup closing the previous block and/or opening the next one.
    pub prefix: String,
}

/// Advance the block state for a fragment. The close check runs before the
/// open check, so one block may end and another begin on the same fragment.
pub fn transition(state: MultiRun, format: &Formatting, text: &str) -> Transition {
    let style = format.style_type();
    let mut state = state;
    let mut prefix = String::new();

    match state {
        MultiRun::List => {
            let leaves_list = format.indent_amount() == 0 && !style.is_list();
            if leaves_list || format.is_block_attachment() {
                state = MultiRun::None;
            }
        }
        MultiRun::Monospaced => {
            // Only the paragraph style ends a fence; tags inside code keep it open.
            if style != StyleType::Monospaced {
                state = MultiRun::None;
                prefix.push_str("```\n");
            }
        }
        MultiRun::Alignment => {
            if format.alignment().is_none() {
                state = MultiRun::None;
                prefix.push_str("</p>\n");
            }
        }
        MultiRun::None => {}
    }

    if state == MultiRun::None {
        let only_spaces = !text.is_empty() && text.bytes().all(|b| b == b' ');

        if format.is_hashtag() {
            // Tags keep their meaning only outside code.
        } else if style == StyleType::Monospaced && !only_spaces {
            state = MultiRun::Monospaced;
            prefix.push_str("\n```\n");
        } else if style.is_list() {
            state = MultiRun::List;
            // A list that starts indented needs a parent item to nest under.
            if format.indent_amount() > 0 {
                prefix.push_str("\n  - \n");
            }
        } else if let Some(alignment) = format.alignment() {
            state = MultiRun::Alignment;
            prefix.push_str("\n<p style=\"text-align:");
            prefix.push_str(alignment.as_css());
            prefix.push_str(";margin:0\">");
        }
    }

    Transition { state, prefix }
}

/// Markup closing whatever block is still open at the end of a note.
pub fn finish(state: MultiRun) -> String {
    transition(state, &Formatting::default(), "").prefix
}
