//! Style templates: the per-block-type formatting rules a script is laid out with.
//!
//! A [`Template`] is a value object. Swapping templates changes how blocks are
//! rendered and paginated, never the text stored in the document.

pub mod builtin;
pub mod rules;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::models::{Block, BlockType};

pub use builtin::TemplateLibrary;
pub use rules::{Alignment, CaseTransform, LineSpacing, Margins, StyleRule};

const MM_PER_INCH: f32 = 25.4;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Malformed template: {0}")]
    Malformed(String),
    #[error("Failed to encode template: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Physical page the template lays text out on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margins: Margins,
    /// Printed lines that fit on one page.
    pub lines_per_page: u32,
    /// Monospaced characters per inch (10 for 12pt Courier).
    pub chars_per_inch: f32,
}

impl PageMetrics {
    pub fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margins: Margins {
                left: 37.5,
                right: 25.0,
                top: 25.0,
                bottom: 25.0,
            },
            lines_per_page: 54,
            chars_per_inch: 10.0,
        }
    }

    pub fn us_letter() -> Self {
        Self {
            width_mm: 215.9,
            height_mm: 279.4,
            margins: Margins {
                left: 38.1,
                right: 25.4,
                top: 25.4,
                bottom: 25.4,
            },
            lines_per_page: 55,
            chars_per_inch: 10.0,
        }
    }

    pub fn text_width_mm(&self) -> f32 {
        self.width_mm - self.margins.left - self.margins.right
    }

    pub fn line_height_mm(&self) -> f32 {
        (self.height_mm - self.margins.top - self.margins.bottom) / self.lines_per_page as f32
    }
}

/// On-disk shape of a template: a flat list of rules.
#[derive(Serialize, Deserialize)]
struct TemplateFile {
    name: String,
    #[serde(default = "default_version")]
    version: u32,
    page: PageMetrics,
    #[serde(default)]
    rules: Vec<StyleRule>,
}

fn default_version() -> u32 {
    1
}

/// Named, versioned set of style rules, one per block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TemplateFile", into = "TemplateFile")]
pub struct Template {
    name: String,
    version: u32,
    page: PageMetrics,
    rules: BTreeMap<BlockType, StyleRule>,
    fallback: StyleRule,
}

impl TryFrom<TemplateFile> for Template {
    type Error = TemplateError;

    fn try_from(file: TemplateFile) -> Result<Self, Self::Error> {
        Template::new(file.name, file.version, file.page, file.rules)
    }
}

impl From<Template> for TemplateFile {
    fn from(template: Template) -> Self {
        TemplateFile {
            name: template.name,
            version: template.version,
            page: template.page,
            rules: template.rules.into_values().collect(),
        }
    }
}

impl Template {
    /// Build a template, validating page geometry and rule uniqueness.
    pub fn new(
        name: impl Into<String>,
        version: u32,
        page: PageMetrics,
        rules: Vec<StyleRule>,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TemplateError::Malformed("template name is empty".into()));
        }
        validate_page(&page)?;

        let mut by_type = BTreeMap::new();
        for rule in rules {
            let block_type = rule.block_type;
            let margins = &rule.margins;
            if [margins.left, margins.right, margins.top, margins.bottom]
                .iter()
                .any(|m| !m.is_finite() || *m < 0.0)
            {
                return Err(TemplateError::Malformed(format!(
                    "margins for {block_type} must be finite and not negative"
                )));
            }
            if let LineSpacing::FixedMm(height) = rule.line_spacing
                && !(height.is_finite() && height > 0.0)
            {
                return Err(TemplateError::Malformed(format!(
                    "fixed line height for {block_type} must be positive"
                )));
            }
            if by_type.insert(block_type, rule).is_some() {
                return Err(TemplateError::Malformed(format!(
                    "duplicate rule for {block_type}"
                )));
            }
        }

        let fallback = by_type
            .get(&BlockType::Undefined)
            .cloned()
            .unwrap_or_else(|| StyleRule::new(BlockType::Undefined, "U").top_space(1));

        Ok(Self {
            name,
            version,
            page,
            rules: by_type,
            fallback,
        })
    }

    /// Parse a template file.
    pub fn load(bytes: &[u8]) -> Result<Self, TemplateError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| TemplateError::Malformed(format!("invalid UTF-8: {e}")))?;
        let template: Template =
            toml::from_str(text).map_err(|e| TemplateError::Malformed(e.to_string()))?;
        log::info!(
            "Loaded template '{}' v{} with {} rules",
            template.name,
            template.version,
            template.rules.len()
        );
        Ok(template)
    }

    /// Serialize to the template file format.
    pub fn save(&self) -> Result<Vec<u8>, TemplateError> {
        Ok(toml::to_string_pretty(self)?.into_bytes())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn page(&self) -> &PageMetrics {
        &self.page
    }

    /// Rule for a block type; types without a rule use the Undefined rule.
    pub fn resolve(&self, block_type: BlockType) -> &StyleRule {
        self.rules.get(&block_type).unwrap_or(&self.fallback)
    }

    /// Template rule with the block's local overrides applied.
    pub fn effective_rule(&self, block: &Block) -> StyleRule {
        let mut rule = self.resolve(block.block_type).clone();
        let overrides = &block.style_overrides;
        if let Some(alignment) = overrides.alignment {
            rule.alignment = alignment;
        }
        if let Some(bold) = overrides.bold {
            rule.bold = bold;
        }
        if let Some(italic) = overrides.italic {
            rule.italic = italic;
        }
        if let Some(underline) = overrides.underline {
            rule.underline = underline;
        }
        rule
    }

    /// Text as it is printed: prefix/postfix and case transform applied.
    pub fn render_text<'a>(&self, block: &'a Block) -> Cow<'a, str> {
        let rule = self.resolve(block.block_type);
        if rule.prefix.is_empty() && rule.postfix.is_empty() && !rule.is_uppercase() {
            return Cow::Borrowed(&block.text);
        }

        let mut text = format!("{}{}{}", rule.prefix, block.text, rule.postfix);
        if rule.is_uppercase() {
            text = text.to_uppercase();
        }
        Cow::Owned(text)
    }

    /// Monospaced characters that fit on one line of this block type.
    pub fn chars_per_line(&self, block_type: BlockType) -> usize {
        let rule = self.resolve(block_type);
        let width = self.page.text_width_mm() - rule.margins.left - rule.margins.right;
        let chars = (width * self.page.chars_per_inch / MM_PER_INCH).floor();
        if chars < 1.0 { 1 } else { chars as usize }
    }
}

fn validate_page(page: &PageMetrics) -> Result<(), TemplateError> {
    let positive = |x: f32| x.is_finite() && x > 0.0;
    if page.lines_per_page == 0 {
        return Err(TemplateError::Malformed("lines_per_page must be positive".into()));
    }
    if !positive(page.chars_per_inch) {
        return Err(TemplateError::Malformed("chars_per_inch must be positive".into()));
    }
    if !positive(page.width_mm) || !positive(page.height_mm) {
        return Err(TemplateError::Malformed("page size must be positive".into()));
    }
    let margins = &page.margins;
    if [margins.left, margins.right, margins.top, margins.bottom]
        .iter()
        .any(|m| !m.is_finite())
    {
        return Err(TemplateError::Malformed("page margins must be finite".into()));
    }
    if !positive(page.text_width_mm()) || !positive(page.line_height_mm()) {
        return Err(TemplateError::Malformed(
            "page margins leave no room for text".into(),
        ));
    }
    Ok(())
}

impl Default for Template {
    fn default() -> Self {
        builtin::default_template()
    }
}
