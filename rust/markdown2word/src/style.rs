use crate::xml::Element;

pub const LINK_COLOR: &str = "0000FF";
pub const MUTED_COLOR: &str = "808080";

/// One span of inline text sharing a single set of style attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    /// Hyperlink target; `Some` marks the run as a link.
    pub link: Option<String>,
    /// Foreground colour as a hex triplet without `#`.
    pub color: Option<String>,
    pub highlight: bool,
    /// A hard line break; carries no text.
    pub line_break: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            monospace: true,
            highlight: true,
            ..Self::plain(text)
        }
    }

    pub fn link(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            link: Some(target.into()),
            color: Some(LINK_COLOR.to_string()),
            ..Self::plain(text)
        }
    }

    /// Stand-in for an image: `[alt]`, or `[Image]` without alt text.
    pub fn image_placeholder(alt: &str) -> Self {
        let alt = if alt.is_empty() { "Image" } else { alt };
        Self {
            italic: true,
            color: Some(MUTED_COLOR.to_string()),
            ..Self::plain(format!("[{alt}]"))
        }
    }

    pub fn line_break() -> Self {
        Self {
            line_break: true,
            ..Self::default()
        }
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }

    /// Builds the `w:r` element for this run.
    pub fn to_element(&self, props: &RunProps<'_>) -> Element {
        let size = if self.monospace {
            props.code_size
        } else {
            props.size
        };

        let mut rpr = Element::new("w:rPr");
        if self.monospace {
            rpr.push(
                Element::new("w:rFonts")
                    .attr("w:ascii", props.code_font)
                    .attr("w:hAnsi", props.code_font),
            );
        }
        if self.bold {
            rpr.push(Element::new("w:b"));
        }
        if self.italic {
            rpr.push(Element::new("w:i"));
        }
        if let Some(color) = &self.color {
            rpr.push(Element::new("w:color").attr("w:val", color));
        }
        rpr.push(Element::new("w:sz").attr("w:val", size));
        rpr.push(Element::new("w:szCs").attr("w:val", size));
        if self.highlight {
            rpr.push(Element::new("w:highlight").attr("w:val", "lightGray"));
        }
        if self.is_link() {
            rpr.push(Element::new("w:u").attr("w:val", "single"));
        }

        let content = if self.line_break {
            Element::new("w:br")
        } else {
            text_element(&self.text)
        };
        Element::new("w:r").child(rpr).child(content)
    }
}

/// Sizes (half-points) and fonts a run is rendered with.
#[derive(Debug, Clone, Copy)]
pub struct RunProps<'a> {
    pub size: u32,
    pub code_size: u32,
    pub code_font: &'a str,
}

/// `w:t` with whitespace preserved.
pub fn text_element(text: &str) -> Element {
    Element::new("w:t")
        .attr("xml:space", "preserve")
        .text(text)
}
