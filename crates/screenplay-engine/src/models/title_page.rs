use serde::{Deserialize, Serialize};

/// Title-page and synopsis data kept next to the block sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub contacts: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub synopsis: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleAlign {
    Center,
    Right,
}

/// One printed line of the title page, `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLine {
    pub line: usize,
    pub align: TitleAlign,
    pub text: String,
}

impl ScriptInfo {
    /// Lay the title page out on a page of `lines_per_page` lines.
    ///
    /// The name sits on line 13; genre, author and extra info follow with one
    /// blank line between each; contacts are right-aligned on line 30 and the
    /// year goes on the last line of the page.
    pub fn title_page(&self, lines_per_page: usize) -> Vec<TitleLine> {
        let mut lines = Vec::new();
        let mut current = 13;
        lines.push(TitleLine {
            line: current,
            align: TitleAlign::Center,
            text: self.name.clone(),
        });

        for extra in [&self.genre, &self.author, &self.additional_info] {
            if !extra.is_empty() {
                current += 2;
                lines.push(TitleLine {
                    line: current,
                    align: TitleAlign::Center,
                    text: extra.clone(),
                });
            }
        }

        let contacts_line = current.max(29) + 1;
        lines.push(TitleLine {
            line: contacts_line,
            align: TitleAlign::Right,
            text: self.contacts.clone(),
        });

        lines.push(TitleLine {
            line: lines_per_page.max(contacts_line + 1),
            align: TitleAlign::Center,
            text: self.year.clone(),
        });

        lines
    }
}
