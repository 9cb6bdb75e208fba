//! Stylesheets for generated documents.

use mdconvert_core::StyleName;

const BASE_CSS: &str = include_str!("../styles/base.css");
const DEFAULT_CSS: &str = include_str!("../styles/default.css");
const PROFESSIONAL_CSS: &str = include_str!("../styles/professional.css");
const MINIMAL_CSS: &str = include_str!("../styles/minimal.css");

/// Page layout shared by every style plus the named style's rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    name: StyleName,
}

impl Style {
    pub fn new(name: StyleName) -> Self {
        Self { name }
    }

    pub fn name(&self) -> StyleName {
        self.name
    }

    /// Full stylesheet text
    pub fn stylesheet(&self) -> String {
        let overlay = match self.name {
            StyleName::Default => DEFAULT_CSS,
            StyleName::Professional => PROFESSIONAL_CSS,
            StyleName::Minimal => MINIMAL_CSS,
        };
        format!("{BASE_CSS}\n/* {} */\n{overlay}", self.name)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(StyleName::default())
    }
}

impl From<StyleName> for Style {
    fn from(name: StyleName) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_style_has_page_rules() {
        for name in StyleName::ALL {
            let css = Style::new(*name).stylesheet();
            assert!(css.contains("size: A4"));
            assert!(css.contains("counter(page)"));
            assert!(css.contains(&format!("/* {name} */")));
        }
    }

    #[test]
    fn test_styles_differ() {
        let default = Style::new(StyleName::Default).stylesheet();
        let professional = Style::new(StyleName::Professional).stylesheet();
        assert!(default.contains("#4CAF50"));
        assert!(professional.contains("Georgia"));
        assert!(!default.contains("Georgia"));
    }
}
