//! Per-codepoint display substitutions such as password masking.

use std::borrow::Cow;

/// Maps each displayed codepoint to exactly one codepoint, so display and
/// stored offsets are always the same.
pub trait CodepointTransformation {
    fn transform(&self, index: usize, ch: char) -> char;
}

/// Shows every codepoint as the mask character, e.g. `MaskWith('•')` for
/// passwords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskWith(pub char);

impl CodepointTransformation for MaskWith {
    fn transform(&self, _index: usize, _ch: char) -> char {
        self.0
    }
}

/// Shows line breaks of a single-line field inline: `\n` as a space and `\r`
/// as a zero-width no-break space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SingleLine;

impl CodepointTransformation for SingleLine {
    fn transform(&self, _index: usize, ch: char) -> char {
        match ch {
            '\n' => ' ',
            '\r' => '\u{FEFF}',
            other => other,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl CodepointTransformation for Identity {
    fn transform(&self, _index: usize, ch: char) -> char {
        ch
    }
}

/// Adapts a closure into a [`CodepointTransformation`].
#[derive(Clone, Copy)]
pub struct CodepointTransformationFn<F>(pub F);

impl<F: Fn(usize, char) -> char> CodepointTransformation for CodepointTransformationFn<F> {
    fn transform(&self, index: usize, ch: char) -> char {
        (self.0)(index, ch)
    }
}

/// Applies `transformation` to every codepoint of `text`.
///
/// Borrows `text` when no codepoint changes.
pub fn apply_codepoint_transformation<'a, T>(text: &'a str, transformation: &T) -> Cow<'a, str>
where
    T: CodepointTransformation + ?Sized,
{
    let first_change = text.chars().enumerate().position(|(index, ch)| {
        transformation.transform(index, ch) != ch
    });
    let Some(first_change) = first_change else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len());
    for (index, ch) in text.chars().enumerate() {
        if index < first_change {
            out.push(ch);
        } else {
            out.push(transformation.transform(index, ch));
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_every_codepoint() {
        let masked = apply_codepoint_transformation("Hello 世界", &MaskWith('●'));
        assert_eq!(masked, "●●●●●●●●");
        assert_eq!(masked.chars().count(), 8);
    }

    #[test]
    fn unchanged_text_is_borrowed() {
        let text = "plain";
        assert!(matches!(
            apply_codepoint_transformation(text, &Identity),
            Cow::Borrowed(_)
        ));
        assert!(matches!(
            apply_codepoint_transformation(text, &SingleLine),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn single_line_replaces_breaks() {
        let shown = apply_codepoint_transformation("a\r\nb", &SingleLine);
        assert_eq!(shown, "a\u{FEFF} b");
    }

    #[test]
    fn closure_sees_indices() {
        let mask_prefix = CodepointTransformationFn(|index: usize, ch: char| {
            if index < 3 {
                '*'
            } else {
                ch
            }
        });
        assert_eq!(apply_codepoint_transformation("abcd", &mask_prefix), "***d");
    }
}
