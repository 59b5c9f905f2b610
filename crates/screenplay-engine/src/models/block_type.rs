use serde::{Deserialize, Serialize};

/// Closed set of paragraph types a screenplay is built from.
///
/// Nesting is expressed in-band: `Folder` and `SceneGroup` open a region that
/// is closed by the matching `FolderFooter` / `SceneGroupFooter` later in the
/// sequence. Everything else is a leaf paragraph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    SceneHeading,
    SceneCharacters,
    Action,
    Character,
    Parenthetical,
    Dialogue,
    Transition,
    Shot,
    Title,
    TitleHeader,
    NoprintableText,
    SceneGroup,
    SceneGroupFooter,
    Folder,
    FolderFooter,
    SceneDescription,
    #[default]
    Undefined,
}

/// The two kinds of balanced regions a document can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Folder,
    SceneGroup,
}

impl GroupKind {
    pub fn opener(self) -> BlockType {
        match self {
            GroupKind::Folder => BlockType::Folder,
            GroupKind::SceneGroup => BlockType::SceneGroup,
        }
    }

    pub fn footer(self) -> BlockType {
        match self {
            GroupKind::Folder => BlockType::FolderFooter,
            GroupKind::SceneGroup => BlockType::SceneGroupFooter,
        }
    }
}

impl BlockType {
    /// Every variant in declaration order.
    pub const ALL: [BlockType; 17] = [
        BlockType::SceneHeading,
        BlockType::SceneCharacters,
        BlockType::Action,
        BlockType::Character,
        BlockType::Parenthetical,
        BlockType::Dialogue,
        BlockType::Transition,
        BlockType::Shot,
        BlockType::Title,
        BlockType::TitleHeader,
        BlockType::NoprintableText,
        BlockType::SceneGroup,
        BlockType::SceneGroupFooter,
        BlockType::Folder,
        BlockType::FolderFooter,
        BlockType::SceneDescription,
        BlockType::Undefined,
    ];

    /// Human readable name, as shown in type pickers and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            BlockType::SceneHeading => "Scene Heading",
            BlockType::SceneCharacters => "Scene Characters",
            BlockType::Action => "Action",
            BlockType::Character => "Character",
            BlockType::Parenthetical => "Parenthetical",
            BlockType::Dialogue => "Dialogue",
            BlockType::Transition => "Transition",
            BlockType::Shot => "Shot",
            BlockType::Title => "Title",
            BlockType::TitleHeader => "Title Header",
            BlockType::NoprintableText => "Note",
            BlockType::SceneGroup => "Scene Group",
            BlockType::SceneGroupFooter => "Scene Group Footer",
            BlockType::Folder => "Folder",
            BlockType::FolderFooter => "Folder Footer",
            BlockType::SceneDescription => "Scene Description",
            BlockType::Undefined => "Undefined",
        }
    }

    /// The group this type opens, if it is an opener.
    pub fn opens(self) -> Option<GroupKind> {
        match self {
            BlockType::Folder => Some(GroupKind::Folder),
            BlockType::SceneGroup => Some(GroupKind::SceneGroup),
            _ => None,
        }
    }

    /// The group this type closes, if it is a footer.
    pub fn closes(self) -> Option<GroupKind> {
        match self {
            BlockType::FolderFooter => Some(GroupKind::Folder),
            BlockType::SceneGroupFooter => Some(GroupKind::SceneGroup),
            _ => None,
        }
    }

    /// Openers and footers take part in the balance invariant.
    pub fn is_structural(self) -> bool {
        self.opens().is_some() || self.closes().is_some()
    }

    /// Whether the paragraph ends up on the printed page.
    ///
    /// Folder markers, notes and scene synopses live only in the editor.
    pub fn is_printable(self) -> bool {
        !matches!(
            self,
            BlockType::Folder
                | BlockType::FolderFooter
                | BlockType::NoprintableText
                | BlockType::SceneDescription
        )
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
