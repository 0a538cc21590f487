//! Speaker diarization grouping
//!
//! Turns an ordered sequence of `(speaker_tag, word)` pairs into per-speaker
//! text blocks. Blocks appear in first-appearance order of their tag; a
//! speaker's later words are appended to its existing block.

use std::collections::HashMap;

/// Speaker tag used when the recognizer did not label a word
pub const UNTAGGED_SPEAKER: u32 = 0;

/// All words attributed to one speaker within a grouped utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerBlock {
    pub speaker_tag: u32,
    /// Words joined by a single space
    pub text: String,
}

/// Group words by speaker in a single pass
pub fn group_by_speaker<'a, I>(words: I) -> Vec<SpeakerBlock>
where
    I: IntoIterator<Item = (u32, &'a str)>,
{
    let mut by_tag: HashMap<u32, Vec<&'a str>> = HashMap::new();
    let mut order: Vec<u32> = Vec::new();

    for (tag, word) in words {
        by_tag
            .entry(tag)
            .or_insert_with(|| {
                order.push(tag);
                Vec::new()
            })
            .push(word);
    }

    order
        .into_iter()
        .map(|tag| SpeakerBlock {
            speaker_tag: tag,
            text: by_tag.remove(&tag).unwrap_or_default().join(" "),
        })
        .collect()
}

/// Display label for a speaker tag
pub fn speaker_label(tag: u32) -> String {
    format!("Speaker {}", tag)
}

/// Render blocks as `"<label> <words>\n"`, one line per block
pub fn render_blocks(blocks: &[SpeakerBlock]) -> String {
    blocks
        .iter()
        .map(|block| format!("{} {}\n", speaker_label(block.speaker_tag), block.text))
        .collect()
}
