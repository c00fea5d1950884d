//! Transformations applied to the buffer after every edit.

use std::fmt;
use std::rc::Rc;

use crate::buffer::TextFieldBuffer;
use crate::chars::{char_slice, diff_window};

/// Inspects or rewrites the buffer at the end of each edit, after the edit
/// block ran. Calling
/// [`revert_all_changes`](TextFieldBuffer::revert_all_changes) rejects the
/// edit.
pub trait InputTransformation {
    fn transform_input(&self, buffer: &mut TextFieldBuffer);

    /// Runs `self`, then `next`.
    fn then<T>(self, next: T) -> Chain<Self, T>
    where
        Self: Sized,
        T: InputTransformation,
    {
        Chain::new(self, next)
    }
}

impl<T: InputTransformation + ?Sized> InputTransformation for Rc<T> {
    fn transform_input(&self, buffer: &mut TextFieldBuffer) {
        (**self).transform_input(buffer);
    }
}

impl<T: InputTransformation + ?Sized> InputTransformation for Box<T> {
    fn transform_input(&self, buffer: &mut TextFieldBuffer) {
        (**self).transform_input(buffer);
    }
}

/// Replaces the whole buffer with `text`, touching only the codepoints that
/// differ so the selection and change list follow the real edit.
fn replace_differing(buffer: &mut TextFieldBuffer, text: &str) {
    let current = buffer.to_string();
    if current == text {
        return;
    }
    let (start, pre_end, post_end) = diff_window(&current, text);
    buffer
        .replace(start, pre_end, char_slice(text, start, post_end))
        .expect("diff window should lie inside the buffer");
}

/// Rejects edits that make the text longer than `max` codepoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxLength(pub usize);

impl InputTransformation for MaxLength {
    fn transform_input(&self, buffer: &mut TextFieldBuffer) {
        if buffer.len() > self.0 {
            log::trace!("rejecting edit: {} codepoints > max {}", buffer.len(), self.0);
            buffer.revert_all_changes();
        }
    }
}

/// Uppercases all text, keeping the selection where it was.
///
/// `locale` is a BCP 47 hint carried for platforms with locale-aware casing;
/// the mapping itself is Unicode's default case conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllCaps {
    locale: Option<String>,
}

impl AllCaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(locale: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
        }
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl InputTransformation for AllCaps {
    fn transform_input(&self, buffer: &mut TextFieldBuffer) {
        let current = buffer.to_string();
        let upper = current.to_uppercase();
        if upper == current {
            return;
        }
        let selection = buffer.selection();
        replace_differing(buffer, &upper);
        buffer.set_selection_coerced(selection);
    }
}

/// Drops every codepoint for which the predicate returns false.
pub struct Filter<F> {
    predicate: F,
}

impl<F: Fn(char) -> bool> Filter<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> fmt::Debug for Filter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").finish_non_exhaustive()
    }
}

impl<F: Fn(char) -> bool> InputTransformation for Filter<F> {
    fn transform_input(&self, buffer: &mut TextFieldBuffer) {
        let chars: Vec<char> = buffer.to_string().chars().collect();
        // Delete rejected runs back to front so earlier offsets stay valid.
        let mut end = chars.len();
        while end > 0 {
            if (self.predicate)(chars[end - 1]) {
                end -= 1;
                continue;
            }
            let mut start = end - 1;
            while start > 0 && !(self.predicate)(chars[start - 1]) {
                start -= 1;
            }
            buffer
                .delete(start, end)
                .expect("rejected run should lie inside the buffer");
            end = start;
        }
    }
}

/// Rewrites the text with a function of `(original, proposed)`.
///
/// Returning the original text rejects the edit.
pub struct ByValue<F> {
    transformation: F,
}

impl<F: Fn(&str, &str) -> String> ByValue<F> {
    pub fn new(transformation: F) -> Self {
        Self { transformation }
    }
}

impl<F> fmt::Debug for ByValue<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByValue").finish_non_exhaustive()
    }
}

impl<F: Fn(&str, &str) -> String> InputTransformation for ByValue<F> {
    fn transform_input(&self, buffer: &mut TextFieldBuffer) {
        let proposed = buffer.to_string();
        let accepted = (self.transformation)(buffer.original_value().text(), &proposed);
        if accepted == proposed {
            return;
        }
        if buffer.original_value().content_equals(&accepted) {
            buffer.revert_all_changes();
            return;
        }
        replace_differing(buffer, &accepted);
        let selection = buffer.selection();
        buffer.set_selection_coerced(selection);
    }
}

/// Two transformations applied in order.
#[derive(Clone, Debug)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: InputTransformation, B: InputTransformation> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: InputTransformation, B: InputTransformation> InputTransformation for Chain<A, B> {
    fn transform_input(&self, buffer: &mut TextFieldBuffer) {
        self.first.transform_input(buffer);
        self.second.transform_input(buffer);
    }
}

/// Chains two optional transformations. A missing side is skipped.
pub fn chain(
    first: Option<Rc<dyn InputTransformation>>,
    second: Option<Rc<dyn InputTransformation>>,
) -> Option<Rc<dyn InputTransformation>> {
    match (first, second) {
        (Some(first), Some(second)) => {
            let chained: Rc<dyn InputTransformation> = Rc::new(Chain::new(first, second));
            Some(chained)
        }
        (first, None) => first,
        (None, second) => second,
    }
}

/// Adapts a closure into an [`InputTransformation`].
pub struct InputTransformationFn<F>(pub F);

impl<F> fmt::Debug for InputTransformationFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InputTransformationFn")
    }
}

impl<F: Fn(&mut TextFieldBuffer)> InputTransformation for InputTransformationFn<F> {
    fn transform_input(&self, buffer: &mut TextFieldBuffer) {
        (self.0)(buffer);
    }
}
