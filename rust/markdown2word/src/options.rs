/// Page sizes understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
    Legal,
}

impl PageSize {
    /// Resolves a page-size name case-insensitively. Unknown names fall back
    /// to [`PageSize::Letter`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "a4" => PageSize::A4,
            "legal" => PageSize::Legal,
            _ => PageSize::Letter,
        }
    }

    /// Width and height in twips.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            PageSize::Letter => (12240, 15840), // 8.5in x 11in
            PageSize::A4 => (11906, 16838),     // 210mm x 297mm
            PageSize::Legal => (12240, 20160),  // 8.5in x 14in
        }
    }
}

/// Settings for one conversion. Sizes are in points, margins in inches.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub font_family: String,
    pub font_size: f64,
    pub code_font_family: String,
    pub code_font_size: f64,

    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,

    pub page_size: PageSize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            font_family: "Calibri".to_string(),
            font_size: 11.0,
            code_font_family: "Consolas".to_string(),
            code_font_size: 10.0,
            margin_top: 1.0,
            margin_bottom: 1.0,
            margin_left: 1.0,
            margin_right: 1.0,
            page_size: PageSize::Letter,
        }
    }
}

impl ConvertOptions {
    /// Body text size in half-points.
    pub fn body_half_points(&self) -> u32 {
        half_points(self.font_size)
    }

    /// Code text size in half-points.
    pub fn code_half_points(&self) -> u32 {
        half_points(self.code_font_size)
    }
}

pub(crate) fn half_points(points: f64) -> u32 {
    (points * 2.0) as u32
}

/// Converts inches to twips (1/1440 inch), truncating toward zero.
pub(crate) fn inches_to_twips(inches: f64) -> i64 {
    (inches * 1440.0) as i64
}
