//! Builds the on-screen representation of one term.

use crate::audio::{AudioOutput, AudioTransport, ClipId};
use crate::catalog::{CirclePosition, Offset, TermRecord};
use crate::visual::VisualState;
use std::path::{Path, PathBuf};

/// Circle size in terminal cells. Visual pixels are twice as tall as cells
/// are, because each cell draws two half-block pixels.
pub const CIRCLE_COLS: u16 = 14;
pub const CIRCLE_ROWS: u16 = 7;

#[derive(Debug, Clone)]
pub struct TermView {
    pub number: u8,
    /// Text with the sequence number prefixed.
    pub label: String,
    pub clip: ClipId,
    pub visual: VisualState,
    pub circle_position: CirclePosition,
    pub offset: Offset,
}

/// Constructs [`TermView`]s. Building never starts playback and never
/// appends the view anywhere; the caller decides both.
#[derive(Debug, Clone)]
pub struct ViewBuilder {
    media_root: PathBuf,
    load_visuals: bool,
}

impl ViewBuilder {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            load_visuals: true,
        }
    }

    /// Skip GIF decoding; every circle uses the flat fill.
    pub fn without_visuals(mut self) -> Self {
        self.load_visuals = false;
        self
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn build<O: AudioOutput>(
        &self,
        record: &TermRecord,
        transport: &mut AudioTransport<O>,
    ) -> TermView {
        let clip = transport.load_clip(&record.audio_path(&self.media_root));
        let visual = if self.load_visuals {
            VisualState::load_or_fallback(
                &record.gif_path(&self.media_root),
                CIRCLE_COLS,
                CIRCLE_ROWS * 2,
            )
        } else {
            VisualState::Fallback
        };
        TermView {
            number: record.number,
            label: record.label(),
            clip,
            visual,
            circle_position: record.circle_position,
            offset: record.offset,
        }
    }
}
