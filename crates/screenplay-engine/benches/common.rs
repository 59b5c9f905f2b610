// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use screenplay_engine::models::{Block, BlockType};

#[allow(dead_code)]
pub fn generate_script(scenes: usize) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(scenes * 8);
    for scene in 0..scenes {
        let time = if scene % 2 == 0 { "DAY" } else { "NIGHT" };
        blocks.push(Block::new(
            BlockType::SceneHeading,
            format!("INT. LOCATION {} - {time}", scene % 25),
        ));
        blocks.push(Block::new(
            BlockType::Action,
            "The room is quiet. Somewhere a clock ticks, slower than it should.",
        ));
        for speaker in ["ANNA", "BORIS"] {
            blocks.push(Block::new(BlockType::Character, speaker));
            blocks.push(Block::new(
                BlockType::Dialogue,
                "I keep telling you the same thing and you keep not hearing it. \
                 Maybe this time it will be different.",
            ));
        }
        blocks.push(Block::new(BlockType::Transition, "CUT TO:"));
    }
    blocks
}

#[allow(dead_code)]
pub fn generate_grouped_script(folders: usize, scenes_per_folder: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    for folder in 0..folders {
        blocks.push(Block::new(BlockType::Folder, format!("ACT {}", folder + 1)));
        blocks.extend(generate_script(scenes_per_folder));
        blocks.push(Block::new(BlockType::FolderFooter, ""));
    }
    blocks
}
