use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{FormatItem, FormatOptions};
use crate::interaction::{SectionDetail, SectionMetadata};

thread_local! {
    static SHARED_TOOLTIP: RefCell<Weak<RefCell<TooltipElement>>> = RefCell::new(Weak::new());
}

/// State of the page-wide tooltip element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipElement {
    pub visible: bool,
    pub lines: Vec<String>,
    pub left: f64,
    pub top: f64,
    /// Id of the graph that last showed content.
    pub owner: Option<String>,
}

/// Reference-counted handle to the shared tooltip element.
///
/// Every graph holds one handle. The element is created by the first
/// acquisition on a thread and dropped with the last handle.
#[derive(Debug, Clone)]
pub struct TooltipHandle {
    element: Rc<RefCell<TooltipElement>>,
}

impl TooltipHandle {
    #[must_use]
    pub fn acquire() -> Self {
        SHARED_TOOLTIP.with(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(element) = slot.upgrade() {
                return Self { element };
            }
            let element = Rc::new(RefCell::new(TooltipElement::default()));
            *slot = Rc::downgrade(&element);
            debug!("shared tooltip element created");
            Self { element }
        })
    }

    pub fn show(&self, owner: &str, lines: Vec<String>, left: f64, top: f64) {
        let mut element = self.element.borrow_mut();
        element.visible = true;
        element.lines = lines;
        element.left = left;
        element.top = top;
        element.owner = Some(owner.to_owned());
    }

    pub fn hide(&self) {
        let mut element = self.element.borrow_mut();
        element.visible = false;
        element.lines.clear();
        element.owner = None;
    }

    /// Hides the element only when `owner` put the current content there.
    pub fn hide_if_owned(&self, owner: &str) {
        let owned = self.element.borrow().owner.as_deref() == Some(owner);
        if owned {
            self.hide();
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> TooltipElement {
        self.element.borrow().clone()
    }

    #[must_use]
    pub fn is_shared_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.element, &other.element)
    }
}

/// Number of live handles to this thread's tooltip element.
#[must_use]
pub fn shared_tooltip_handles() -> usize {
    SHARED_TOOLTIP.with(|slot| slot.borrow().strong_count())
}

/// Payload handed to consumer tooltip callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipPayload {
    pub label: String,
    pub value: Option<f64>,
    pub x: f64,
    pub y: f64,
    pub section_details: Option<Vec<SectionDetail>>,
}

/// Tooltip title: the stage label or `"Value"`; in 2D the sub-label wins.
#[must_use]
pub fn tooltip_label(metadata: &SectionMetadata, is_2d: bool) -> String {
    let label = metadata.label.as_deref().unwrap_or("Value");
    let label = if is_2d {
        metadata.sub_label.as_deref().unwrap_or(label)
    } else {
        label
    };
    label.to_owned()
}

/// Lines shown by the shared element.
///
/// A sub-series breakdown yields one `name: value` line per entry; otherwise
/// a single `label: value` line. Sections without a value yield nothing.
#[must_use]
pub fn tooltip_lines(metadata: &SectionMetadata, is_2d: bool, format: &FormatOptions) -> Vec<String> {
    let item = |label: &str, value: f64| FormatItem {
        index: metadata.section_index,
        label: label.to_owned(),
        value,
        percentage: None,
    };

    if let Some(details) = metadata.section_details.as_ref().filter(|d| !d.is_empty()) {
        return details
            .iter()
            .map(|detail| {
                format!(
                    "{}: {}",
                    detail.name,
                    format.format_tooltip(&item(&detail.name, detail.value))
                )
            })
            .collect();
    }

    let Some(value) = metadata.value else {
        return Vec::new();
    };
    let label = tooltip_label(metadata, is_2d);
    let formatted = format.format_tooltip(&item(&label, value));
    vec![format!("{label}: {formatted}")]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> SectionMetadata {
        SectionMetadata {
            index: 0,
            value: Some(1_500.0),
            label: Some("Visits".to_owned()),
            sub_label: Some("Direct".to_owned()),
            section_index: 1,
            section_details: None,
        }
    }

    #[test]
    fn acquisitions_share_one_element() {
        let first = TooltipHandle::acquire();
        let second = TooltipHandle::acquire();
        assert!(first.is_shared_with(&second));
        assert_eq!(shared_tooltip_handles(), 2);

        first.show("graph", vec!["a: 1".to_owned()], 10.0, 20.0);
        assert!(second.snapshot().visible);

        drop(first);
        drop(second);
        assert_eq!(shared_tooltip_handles(), 0);
    }

    #[test]
    fn label_falls_back_and_prefers_sub_label_in_2d() {
        let mut meta = metadata();
        assert_eq!(tooltip_label(&meta, false), "Visits");
        assert_eq!(tooltip_label(&meta, true), "Direct");
        meta.label = None;
        meta.sub_label = None;
        assert_eq!(tooltip_label(&meta, true), "Value");
    }

    #[test]
    fn lines_use_breakdown_when_present() {
        let mut meta = metadata();
        let format = FormatOptions::default();
        assert_eq!(tooltip_lines(&meta, false, &format), vec!["Visits: 1,500"]);

        meta.section_details = Some(vec![
            SectionDetail {
                value: 1_000.0,
                name: "Direct".to_owned(),
                share: 66.67,
            },
            SectionDetail {
                value: 500.0,
                name: "Ads".to_owned(),
                share: 33.33,
            },
        ]);
        assert_eq!(
            tooltip_lines(&meta, true, &format),
            vec!["Direct: 1,000", "Ads: 500"]
        );
    }
}
