//! The fixed, ordered list of terms shown by the presentation.
//!
//! Records are created once as static data and never change. Media paths are
//! relative and resolve against the configured media root.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where the circle sits relative to the term text. Layout hint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CirclePosition {
    Left,
    Right,
    Top,
    Bottom,
}

/// Cosmetic indentation tag (`offset-1` .. `offset-5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Offset {
    #[serde(rename = "offset-1")]
    One,
    #[serde(rename = "offset-2")]
    Two,
    #[serde(rename = "offset-3")]
    Three,
    #[serde(rename = "offset-4")]
    Four,
    #[serde(rename = "offset-5")]
    Five,
}

impl Offset {
    pub fn class_name(self) -> &'static str {
        match self {
            Offset::One => "offset-1",
            Offset::Two => "offset-2",
            Offset::Three => "offset-3",
            Offset::Four => "offset-4",
            Offset::Five => "offset-5",
        }
    }

    /// Left indent in columns applied when the view is laid out.
    pub fn indent(self) -> u16 {
        match self {
            Offset::One => 0,
            Offset::Two => 3,
            Offset::Three => 6,
            Offset::Four => 9,
            Offset::Five => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TermRecord {
    /// 1-based position in the sequence.
    pub number: u8,
    pub text: &'static str,
    pub audio_file: &'static str,
    pub gif_file: &'static str,
    pub circle_position: CirclePosition,
    pub offset: Offset,
}

impl TermRecord {
    /// Display text with the sequence number prefixed, e.g. `"6. Sonic archives ..."`.
    pub fn label(&self) -> String {
        format!("{}. {}", self.number, self.text)
    }

    pub fn audio_path(&self, media_root: &Path) -> PathBuf {
        media_root.join(self.audio_file)
    }

    pub fn gif_path(&self, media_root: &Path) -> PathBuf {
        media_root.join(self.gif_file)
    }
}

static TERMS: [TermRecord; 10] = [
    TermRecord {
        number: 1,
        text: "A sonic archive is something you actively assemble, rather than something you passively accrue. Your sonic archive grows with you; you can add to it, prune from it, or reimagine it at any time.",
        audio_file: "audio/term-1.wav",
        gif_file: "gifs/term-1.gif",
        circle_position: CirclePosition::Left,
        offset: Offset::One,
    },
    TermRecord {
        number: 2,
        text: "Listening is both an act of making and un-making. Listening to your sonic archive will change it and will change you.",
        audio_file: "audio/term-2.wav",
        gif_file: "gifs/term-2.gif",
        circle_position: CirclePosition::Right,
        offset: Offset::Three,
    },
    TermRecord {
        number: 3,
        text: "Sonic archives are created for personal association and serendipitous connections, and their interfaces should reflect that. By tending your sonic archive, you amplify the linkages between sounds, and between sounds and ideas.",
        audio_file: "audio/term-3.wav",
        gif_file: "gifs/term-3.gif",
        circle_position: CirclePosition::Left,
        offset: Offset::Two,
    },
    TermRecord {
        number: 4,
        text: "By keeping your sonic materials at hand, you can patch together a new sonic experience whenever the need arises.",
        audio_file: "audio/term-4.wav",
        gif_file: "gifs/term-4.gif",
        circle_position: CirclePosition::Right,
        offset: Offset::Four,
    },
    TermRecord {
        number: 5,
        text: "A sonic experience need not be a polished sound composition \u{2014} it could be savoring a fleeting speck of sound, or enjoying a shared moment of reflective listening.",
        audio_file: "audio/term-5.wav",
        gif_file: "gifs/term-5.gif",
        circle_position: CirclePosition::Top,
        offset: Offset::One,
    },
    TermRecord {
        number: 6,
        text: "Sonic archives unfold at the pace of sound.",
        audio_file: "audio/term-6.wav",
        gif_file: "gifs/term-6.gif",
        circle_position: CirclePosition::Left,
        offset: Offset::Five,
    },
    TermRecord {
        number: 7,
        text: "Your sonic archive is not simply nostalgia: It is an act of exercising your own power and agency.",
        audio_file: "audio/term-7.wav",
        gif_file: "gifs/term-7.gif",
        circle_position: CirclePosition::Right,
        offset: Offset::Two,
    },
    TermRecord {
        number: 8,
        text: "Sound is always intertwined with other modalities. We encourage you to patch visuals into your sonic archive and tend to them by letting sound and visuals inform each other, rather than allow the visual to dominate.",
        audio_file: "audio/term-8.wav",
        gif_file: "gifs/term-8.gif",
        circle_position: CirclePosition::Left,
        offset: Offset::Three,
    },
    TermRecord {
        number: 9,
        text: "Chronological order can be useful, as sound is temporal, but it should not be constraining.",
        audio_file: "audio/term-9.wav",
        gif_file: "gifs/term-9.gif",
        circle_position: CirclePosition::Bottom,
        offset: Offset::Four,
    },
    TermRecord {
        number: 10,
        text: "It is important to distinguish between \"me\" and \"my\" in your sonic archive: Your sonic archive reflects parts of you, but is not you.",
        audio_file: "audio/term-10.wav",
        gif_file: "gifs/term-10.gif",
        circle_position: CirclePosition::Right,
        offset: Offset::One,
    },
];

/// The full term sequence, in reveal order.
pub fn catalog() -> &'static [TermRecord] {
    &TERMS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_contiguous_from_one() {
        for (idx, record) in catalog().iter().enumerate() {
            assert_eq!(usize::from(record.number), idx + 1);
        }
        assert_eq!(catalog().len(), 10);
    }

    #[test]
    fn label_prefixes_number() {
        let record = &catalog()[5];
        assert_eq!(record.label(), "6. Sonic archives unfold at the pace of sound.");
    }

    #[test]
    fn media_paths_resolve_against_root() {
        let record = &catalog()[0];
        let root = Path::new("/srv/media");
        assert_eq!(record.audio_path(root), Path::new("/srv/media/audio/term-1.wav"));
        assert_eq!(record.gif_path(root), Path::new("/srv/media/gifs/term-1.gif"));
    }

    #[test]
    fn serializes_layout_tags_like_class_names() {
        let json = serde_json::to_value(catalog()[8]).expect("serialize record");
        assert_eq!(json["circle_position"], "bottom");
        assert_eq!(json["offset"], "offset-4");
        assert_eq!(json["offset"], catalog()[8].offset.class_name());
    }
}
