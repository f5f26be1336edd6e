//! Inline style properties widgets assign

use std::fmt;

/// A single inline style assignment
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StyleProperty {
    /// `width: <px>px`
    Width(f32),
    /// `float: left`
    FloatLeft,
    /// `overflow: hidden`
    OverflowHidden,
    /// `transform: translateX(<px>px)`
    TranslateX(i32),
    /// `transition-duration: <ms>ms`
    TransitionDuration(u32),
}

impl StyleProperty {
    /// Standard (unprefixed, kebab-case) property name
    pub fn name(&self) -> &'static str {
        match self {
            StyleProperty::Width(_) => "width",
            StyleProperty::FloatLeft => "float",
            StyleProperty::OverflowHidden => "overflow",
            StyleProperty::TranslateX(_) => "transform",
            StyleProperty::TransitionDuration(_) => "transition-duration",
        }
    }

    /// CSS value text
    pub fn value(&self) -> String {
        match self {
            StyleProperty::Width(px) => format!("{px}px"),
            StyleProperty::FloatLeft => "left".to_string(),
            StyleProperty::OverflowHidden => "hidden".to_string(),
            StyleProperty::TranslateX(px) => format!("translateX({px}px)"),
            StyleProperty::TransitionDuration(ms) => format!("{ms}ms"),
        }
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_text() {
        assert_eq!(StyleProperty::Width(320.0).to_string(), "width: 320px");
        assert_eq!(
            StyleProperty::TranslateX(-640).to_string(),
            "transform: translateX(-640px)"
        );
        assert_eq!(StyleProperty::TransitionDuration(0).value(), "0ms");
    }
}
