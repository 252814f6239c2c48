//! Rendering strategies, one per family of field kinds.
//!
//! Every strategy renders its control from a [`FieldDescriptor`] and turns
//! raw [`UiEvent`]s into canonical values for the form.

mod autocomplete;
mod choice;
mod chips;
mod file;
mod numeric;
mod text;
mod toggle;

pub use autocomplete::AutocompleteInput;
pub use chips::ChipsInput;
pub use choice::{MultiSelectInput, RadioGroup, SelectInput};
pub use file::FileInput;
pub use numeric::{NumberInput, RangeInput, RatingInput};
pub use text::{ColorInput, PasswordInput, TemporalInput, TextInput, Textarea};
pub use toggle::{CheckboxInput, SwitchInput};

use stockdesk_forms::FieldDescriptor;

use crate::event::{Handled, UiEvent};

/// A field control.
pub trait Widget: Send + Sync {
    /// Renders the control, without label or feedback.
    fn render(&self, field: &FieldDescriptor) -> String;

    /// Handles one event other than a blur.
    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled;

    /// Handles the input losing focus.
    fn blur(&mut self, field: &FieldDescriptor) -> Handled {
        field.on_blur();
        Handled::Blurred
    }

    /// Returns whether the control renders its own label.
    fn inline_label(&self) -> bool {
        false
    }
}

/// Reads a number the way a browser's numeric input does: the longest
/// numeric prefix, or zero when there is none.
///
/// An exponent that overflows is dropped and the mantissa is used alone.
pub(crate) fn parse_number(raw: &str) -> f64 {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }

    let mantissa_end = end;
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    [end, mantissa_end]
        .into_iter()
        .filter_map(|end| raw[..end].parse::<f64>().ok())
        .find(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number(" 2.5 "), 2.5);
        assert_eq!(parse_number("12abc"), 12.0);
        assert_eq!(parse_number("-3"), -3.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number("-.5"), -0.5);
        assert_eq!(parse_number("7."), 7.0);
        assert_eq!(parse_number("."), 0.0);
    }

    #[test]
    fn test_parse_number_exponents() {
        assert_eq!(parse_number("2e3x"), 2000.0);
        assert_eq!(parse_number("1.5E-1"), 0.15);
        assert_eq!(parse_number("1e"), 1.0);
        assert_eq!(parse_number("1e+"), 1.0);
        assert_eq!(parse_number("1e400"), 1.0);
        assert_eq!(parse_number(&"9".repeat(400)), 0.0);
    }

    #[test]
    fn test_parse_number_long_trailing_text() {
        let raw = format!("3{}", "x".repeat(200_000));
        assert_eq!(parse_number(&raw), 3.0);
    }
}
