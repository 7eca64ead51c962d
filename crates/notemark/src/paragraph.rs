use crate::multi_run::MultiRun;
use crate::types::{Formatting, StyleType};

/// Running ordinal for numbered lists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListCounter {
    pub number: usize,
    pub indent: usize,
}

impl ListCounter {
    /// Reset when the indent changes or the paragraph leaves the list family.
    fn observe(&mut self, style: StyleType, indent: usize) {
        let counted = matches!(
            style,
            StyleType::NumberedList | StyleType::DashedList | StyleType::DottedList
        );
        if self.number != 0 && (!counted || self.indent != indent) {
            self.number = 0;
        }
        self.indent = indent;
    }

    fn next(&mut self) -> usize {
        self.number += 1;
        self.number
    }
}

/// Apply paragraph-level markup (headings, list markers, quotes) to an
/// already inline-rendered fragment.
pub fn format_paragraph(
    format: &Formatting,
    text: &str,
    at_line_start: bool,
    multi_run: MultiRun,
    counter: &mut ListCounter,
) -> String {
    let indent_amount = format.indent_amount();
    let indent = "\t".repeat(indent_amount);
    let style = format.style_type();
    let mut prelude = String::from(if format.is_blockquote() { "> " } else { "" });

    counter.observe(style, indent_amount);

    let blank = text.trim().is_empty();
    match style {
        StyleType::Title | StyleType::Heading | StyleType::Subheading => {
            if blank {
                return text.to_string();
            }
            let hashes = match style {
                StyleType::Title => "#",
                StyleType::Heading => "##",
                _ => "###",
            };
            format!("{prelude}{hashes} {text}")
        }
        StyleType::DashedList | StyleType::DottedList => {
            if blank && !at_line_start {
                return text.to_string();
            }
            format!("{prelude}{indent}- {text}")
        }
        StyleType::NumberedList => {
            let body = if !at_line_start && text.contains('\n') {
                // A break inside the item: start a fresh numbered line.
                prelude.insert(0, '\n');
                ""
            } else if !at_line_start && blank {
                return text.to_string();
            } else {
                text
            };
            let n = counter.next();
            format!("{prelude}{indent}{n}. {body}")
        }
        StyleType::Checkbox => {
            if blank && !at_line_start {
                return text.to_string();
            }
            let box_ = if format.is_checked() { "[x]" } else { "[ ]" };
            format!("{prelude}{indent}- {box_} {}", text.trim())
        }
        StyleType::Default | StyleType::Monospaced => {
            // Continuation text of a list item lines up with it.
            if multi_run == MultiRun::List {
                prelude.push_str(&indent);
            }
            format!("{prelude}{text}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Checklist, ParagraphStyle};

    fn styled(style: ParagraphStyle) -> Formatting {
        Formatting {
            paragraph_style: Some(style),
            ..Default::default()
        }
    }

    fn render(format: &Formatting, text: &str, counter: &mut ListCounter) -> String {
        format_paragraph(format, text, true, MultiRun::List, counter)
    }

    #[test]
    fn test_headings() {
        let mut counter = ListCounter::default();
        let title = styled(ParagraphStyle::new(StyleType::Title));
        let heading = styled(ParagraphStyle::new(StyleType::Heading));
        let mut sub = ParagraphStyle::new(StyleType::Subheading);
        sub.blockquote = true;
        let sub = styled(sub);

        assert_eq!(render(&title, "Top", &mut counter), "# Top");
        assert_eq!(render(&heading, "Mid", &mut counter), "## Mid");
        assert_eq!(render(&sub, "Low", &mut counter), "> ### Low");
        assert_eq!(render(&title, "  ", &mut counter), "  ");
    }

    #[test]
    fn test_numbering_resets_on_indent_change() {
        let mut counter = ListCounter::default();
        let top = styled(ParagraphStyle::new(StyleType::NumberedList));
        let nested = styled(ParagraphStyle::new(StyleType::NumberedList).indented(1));

        assert_eq!(render(&top, "a", &mut counter), "1. a");
        assert_eq!(render(&top, "b", &mut counter), "2. b");
        assert_eq!(render(&nested, "c", &mut counter), "\t1. c");
        assert_eq!(render(&top, "d", &mut counter), "1. d");
    }

    #[test]
    fn test_numbering_continues_in_an_indented_list() {
        let mut counter = ListCounter::default();
        let nested = styled(ParagraphStyle::new(StyleType::NumberedList).indented(2));

        assert_eq!(render(&nested, "a", &mut counter), "\t\t1. a");
        assert_eq!(render(&nested, "b", &mut counter), "\t\t2. b");
    }

    #[test]
    fn test_numbered_continuation() {
        let mut counter = ListCounter::default();
        let numbered = styled(ParagraphStyle::new(StyleType::NumberedList));

        assert_eq!(
            format_paragraph(&numbered, "  ", false, MultiRun::List, &mut counter),
            "  "
        );
        assert_eq!(counter.number, 0);
        assert_eq!(
            format_paragraph(&numbered, " \n", false, MultiRun::List, &mut counter),
            "\n1. "
        );
    }

    #[test]
    fn test_bullets_and_checkboxes() {
        let mut counter = ListCounter::default();
        let dotted = styled(ParagraphStyle::new(StyleType::DottedList).indented(1));
        let mut done = ParagraphStyle::new(StyleType::Checkbox);
        done.checklist = Some(Checklist { done: true });
        let done = styled(done);
        let todo = styled(ParagraphStyle::new(StyleType::Checkbox));

        assert_eq!(render(&dotted, "item", &mut counter), "\t- item");
        assert_eq!(render(&done, " milk ", &mut counter), "- [x] milk");
        assert_eq!(render(&todo, "eggs", &mut counter), "- [ ] eggs");
        assert_eq!(
            format_paragraph(&todo, " ", false, MultiRun::List, &mut counter),
            " "
        );
    }

    #[test]
    fn test_list_continuation_indent() {
        let mut counter = ListCounter::default();
        let plain = styled(ParagraphStyle::new(StyleType::Default).indented(1));

        assert_eq!(
            format_paragraph(&plain, "more", true, MultiRun::List, &mut counter),
            "\tmore"
        );
        assert_eq!(
            format_paragraph(&plain, "more", true, MultiRun::None, &mut counter),
            "more"
        );
    }
}
