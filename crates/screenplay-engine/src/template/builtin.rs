use std::collections::BTreeMap;

use crate::models::BlockType;
use crate::template::{Alignment, Margins, PageMetrics, StyleRule, Template, TemplateError};

pub const DEFAULT_TEMPLATE_NAME: &str = "Default";
pub const US_LETTER_TEMPLATE_NAME: &str = "US Letter";

/// Rules shared by the built-in templates; only dialogue-column widths differ.
fn standard_rules(dialogue: Margins, parenthetical: Margins, character: Margins) -> Vec<StyleRule> {
    use BlockType::*;

    vec![
        StyleRule::new(SceneHeading, "SH").uppercase().top_space(1),
        StyleRule::new(SceneCharacters, "SC").uppercase(),
        StyleRule::new(Action, "A").top_space(1),
        StyleRule::new(Character, "C")
            .uppercase()
            .margins(character)
            .top_space(1),
        StyleRule::new(Parenthetical, "P").margins(parenthetical),
        StyleRule::new(Dialogue, "D").margins(dialogue),
        StyleRule::new(Transition, "Tr")
            .uppercase()
            .aligned(Alignment::Right)
            .top_space(1),
        StyleRule::new(Shot, "S").uppercase().top_space(1),
        StyleRule::new(TitleHeader, "TH").uppercase().top_space(1),
        StyleRule::new(Title, "Ti")
            .aligned(Alignment::Center)
            .margins(Margins::horizontal(63.5, 38.1)),
        StyleRule::new(NoprintableText, "NT").italic().top_space(1),
        StyleRule::new(SceneGroup, "SG")
            .uppercase()
            .bold()
            .with_footer()
            .top_space(1),
        StyleRule::new(SceneGroupFooter, "SGF").uppercase().bold(),
        StyleRule::new(Folder, "F").uppercase().bold().with_footer().top_space(1),
        StyleRule::new(FolderFooter, "FF").uppercase().bold(),
        StyleRule::new(SceneDescription, "SD").italic(),
        StyleRule::new(Undefined, "U").top_space(1),
    ]
}

/// The A4 template every new project starts with.
pub fn default_template() -> Template {
    let rules = standard_rules(
        Margins::horizontal(25.4, 50.8),
        Margins::horizontal(38.1, 63.5),
        Margins::horizontal(67.5, 0.0),
    );
    build(DEFAULT_TEMPLATE_NAME, PageMetrics::a4(), rules)
}

/// US Letter layout with the wider Hollywood dialogue column.
pub fn us_letter_template() -> Template {
    let rules = standard_rules(
        Margins::horizontal(25.4, 36.0),
        Margins::horizontal(38.1, 50.0),
        Margins::horizontal(50.0, 0.0),
    );
    build(US_LETTER_TEMPLATE_NAME, PageMetrics::us_letter(), rules)
}

fn build(name: &str, page: PageMetrics, rules: Vec<StyleRule>) -> Template {
    let rules: BTreeMap<_, _> = rules.into_iter().map(|r| (r.block_type, r)).collect();
    let fallback = rules
        .get(&BlockType::Undefined)
        .cloned()
        .unwrap_or_else(|| StyleRule::new(BlockType::Undefined, "U"));
    Template {
        name: name.to_string(),
        version: 1,
        page,
        rules,
        fallback,
    }
}

/// Templates available to a project, keyed by name.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, Template>,
}

impl TemplateLibrary {
    pub fn with_builtins() -> Self {
        let mut templates = BTreeMap::new();
        for template in [default_template(), us_letter_template()] {
            templates.insert(template.name().to_string(), template);
        }
        Self { templates }
    }

    /// Add or replace a template. Returns the replaced one.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.name().to_string(), template)
    }

    /// Load a template file into the library.
    pub fn load(&mut self, bytes: &[u8]) -> Result<&Template, TemplateError> {
        let template = Template::load(bytes)?;
        let name = template.name().to_string();
        self.templates.insert(name.clone(), template);
        self.templates
            .get(&name)
            .ok_or_else(|| TemplateError::Malformed(format!("template '{name}' vanished")))
    }

    /// Remove a user template. Built-in "Default" cannot be removed.
    pub fn remove(&mut self, name: &str) -> Option<Template> {
        if name == DEFAULT_TEMPLATE_NAME {
            return None;
        }
        self.templates.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Template by name, falling back to "Default".
    pub fn get_or_default(&self, name: &str) -> Template {
        self.get(name).cloned().unwrap_or_else(default_template)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::with_builtins()
    }
}
