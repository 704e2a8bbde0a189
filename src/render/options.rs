//! Rendering options shared by the DOCX and Markdown renderers.

/// Options for rendering an assembled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Font family for all DOCX text.
    /// Default: "Arial"
    pub font: String,

    /// Body font size in half-points (22 = 11pt).
    pub font_size: u32,

    /// Maximum heading level to use (1-6).
    /// Headings beyond this level will use this level.
    pub max_heading_level: u8,

    /// Whether to include the table of contents.
    pub include_toc: bool,

    /// Whether to add `{#anchor}` ids to Markdown section headings and link
    /// table of contents entries to them.
    pub heading_anchors: bool,

    /// Whether to preserve line breaks within paragraphs.
    /// If false, they are rendered as spaces.
    pub preserve_line_breaks: bool,

    /// Character to use for Markdown bullet lists.
    /// Default: '-'
    pub list_marker: char,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_size: 22,
            max_heading_level: 6,
            include_toc: true,
            heading_anchors: true,
            preserve_line_breaks: true,
            list_marker: '-',
        }
    }
}

impl RenderOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the DOCX font family.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Sets the DOCX body font size in points.
    pub fn with_font_size_pt(mut self, points: u32) -> Self {
        self.font_size = points.max(1) * 2;
        self
    }

    /// Sets the maximum heading level, clamped to 1-6.
    pub fn with_max_heading_level(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Omits the table of contents.
    pub fn without_toc(mut self) -> Self {
        self.include_toc = false;
        self
    }

    /// Omits Markdown heading anchors.
    pub fn without_anchors(mut self) -> Self {
        self.heading_anchors = false;
        self
    }

    /// Joins paragraph lines with spaces instead of line breaks.
    pub fn without_line_breaks(mut self) -> Self {
        self.preserve_line_breaks = false;
        self
    }

    /// Sets the Markdown bullet character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Maps a body header level to an output heading level.
    ///
    /// `section_tier` is the level used for section titles; body headers sit
    /// below it. The result is capped at `max_heading_level` and 6.
    pub fn body_heading_level(&self, level: u8, section_tier: u8) -> u8 {
        level
            .saturating_add(section_tier)
            .min(self.max_heading_level)
            .min(6)
    }
}
