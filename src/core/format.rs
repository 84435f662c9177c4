use std::fmt;
use std::rc::Rc;

/// Item handed to value/tooltip formatters.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatItem {
    pub index: usize,
    pub label: String,
    pub value: f64,
    pub percentage: Option<String>,
}

pub type FormatFn = Rc<dyn Fn(&FormatItem) -> String>;

/// Optional per-chart formatters.
#[derive(Clone, Default)]
pub struct FormatOptions {
    /// Formats label values (and tooltips when no tooltip formatter is set).
    pub value: Option<FormatFn>,
    /// Formats tooltip values.
    pub tooltip: Option<FormatFn>,
}

impl fmt::Debug for FormatOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatOptions")
            .field("value", &self.value.is_some())
            .field("tooltip", &self.tooltip.is_some())
            .finish()
    }
}

impl FormatOptions {
    #[must_use]
    pub fn with_value(mut self, formatter: impl Fn(&FormatItem) -> String + 'static) -> Self {
        self.value = Some(Rc::new(formatter));
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, formatter: impl Fn(&FormatItem) -> String + 'static) -> Self {
        self.tooltip = Some(Rc::new(formatter));
        self
    }

    #[must_use]
    pub fn format_value(&self, item: &FormatItem) -> String {
        match &self.value {
            Some(formatter) => formatter(item),
            None => format_number(item.value),
        }
    }

    #[must_use]
    pub fn format_tooltip(&self, item: &FormatItem) -> String {
        match (&self.tooltip, &self.value) {
            (Some(formatter), _) | (None, Some(formatter)) => formatter(item),
            (None, None) => format_number(item.value),
        }
    }
}

/// Rounds to an integer and groups thousands with commas.
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
