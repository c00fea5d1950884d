//! Plug-in transformations of text field content.
//!
//! - [`InputTransformation`] - Filters or rewrites edits before they commit
//! - [`OutputTransformation`] - Rewrites the displayed text only
//! - [`CodepointTransformation`] - One-to-one codepoint substitution for display

mod codepoint;
mod input;
mod output;

pub use codepoint::{
    apply_codepoint_transformation, CodepointTransformation, CodepointTransformationFn, Identity,
    MaskWith, SingleLine,
};
pub use input::{
    chain, AllCaps, ByValue, Chain, Filter, InputTransformation, InputTransformationFn, MaxLength,
};
pub use output::{
    apply_output_transformation, OffsetMapping, OutputTransformation, OutputTransformationFn,
    TransformedText,
};
