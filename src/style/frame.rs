use std::sync::Arc;

use crate::foundation::core::{Affine, Color, Vec2};

pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_TEXT_SIZE: f64 = 12.0;

/// Horizontal text alignment relative to the anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAlign {
    /// Offset from the anchor to the top-left of a laid-out text block.
    ///
    /// The block is shifted up by the text size so the anchor sits on the baseline, and left by
    /// nothing, half, or all of its laid-out width.
    pub fn anchor_offset(self, width: f64, size: f64) -> Vec2 {
        let dx = match self {
            Self::Start => 0.0,
            Self::Middle => -0.5 * width,
            Self::End => -width,
        };
        Vec2::new(dx, -size)
    }
}

/// Font bytes registered with the text collaborator.
#[derive(Debug)]
pub struct FontFace {
    name: String,
    bytes: Arc<Vec<u8>>,
}

impl FontFace {
    /// Font named `name` from raw TrueType/OpenType bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Display name, used in log messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw font data.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }
}

/// Cheap handle to a font; the empty handle means "the runtime's default font".
#[derive(Clone, Debug, Default)]
pub struct FontRef(Option<Arc<FontFace>>);

impl FontRef {
    /// Handle to `face`.
    pub fn new(face: FontFace) -> Self {
        Self(Some(Arc::new(face)))
    }

    /// The font, or `None` for the default handle.
    pub fn face(&self) -> Option<&Arc<FontFace>> {
        self.0.as_ref()
    }

    /// Whether this is the default-font handle.
    pub fn is_default(&self) -> bool {
        self.0.is_none()
    }
}

impl PartialEq for FontRef {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// `None` disables stroking.
    pub color: Option<Color>,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f64,
    pub align: TextAlign,
    pub font: FontRef,
}

/// One saved snapshot of drawing attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleFrame {
    pub background: Option<Color>,
    /// `None` disables filling.
    pub fill: Option<Color>,
    pub stroke: StrokeStyle,
    pub text: TextStyle,
    /// Device-space transform applied to every primitive.
    pub transform: Affine,
}

impl Default for StyleFrame {
    fn default() -> Self {
        Self {
            background: Some(Color::TRANSPARENT),
            fill: Some(Color::WHITE),
            stroke: StrokeStyle {
                color: Some(Color::BLACK),
                width: DEFAULT_STROKE_WIDTH,
            },
            text: TextStyle {
                color: Color::BLACK,
                size: DEFAULT_TEXT_SIZE,
                align: TextAlign::Start,
                font: FontRef::default(),
            },
            transform: Affine::IDENTITY,
        }
    }
}

impl StyleFrame {
    /// Stroke color and width when stroking is enabled.
    pub fn stroke_paint(&self) -> Option<(Color, f64)> {
        match self.stroke.color {
            Some(c) if self.stroke.width > 0.0 => Some((c, self.stroke.width)),
            _ => None,
        }
    }
}
