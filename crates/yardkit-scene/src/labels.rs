//! Text label sprites
//!
//! Survey TEXT/MTEXT entities become billboard label sprites sized from
//! the entity's text height and the coordinate-system scale. MTEXT
//! formatting control codes are stripped before display. The billboard
//! orientation itself is transient render-loop state, not part of the
//! scene output.

use glam::Vec3;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use yardkit_core::constants::MAX_LABEL_TEXTURE_PX;

/// Font rasterization size used for canvas estimation (px)
const LABEL_FONT_PX: f64 = 64.0;

/// Average glyph advance as a fraction of the font size
const GLYPH_ASPECT: f64 = 0.6;

/// Line advance as a fraction of the font size
const LINE_ADVANCE: f64 = 1.2;

/// A billboard text label positioned in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSprite {
    /// Display text, control codes already stripped
    pub text: String,
    /// Anchor position in world space
    pub position: [f32; 3],
    /// World-space height of one text line (meters)
    pub world_height: f32,
    /// In-plane rotation from the source entity, degrees
    pub rotation_deg: f32,
    /// Backing canvas size in pixels, clamped to the texture ceiling
    pub canvas_size: (u32, u32),
    /// Owning layer
    pub layer: String,
}

impl LabelSprite {
    pub fn position_vec3(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Strip MTEXT formatting control codes for display.
///
/// Handles `\P` paragraph breaks (become newlines), argumented escapes
/// (`\f`/`\F` font, `\H` height, `\W` width factor, `\Q` oblique, `\T`
/// tracking, `\C` color, `\A` alignment — argument runs to the next
/// `;`), toggle escapes (`\L \l \O \o \K \k` over/underline and
/// strikethrough), brace grouping, and the `\\`, `\{`, `\}` literals.
pub fn strip_mtext_codes(raw: &str) -> String {
    static ARGUMENT_ESCAPE: OnceLock<Regex> = OnceLock::new();
    static TOGGLE_ESCAPE: OnceLock<Regex> = OnceLock::new();

    // Protect escaped literals before stripping, restore after.
    let mut text = raw
        .replace(r"\\", "\u{1}")
        .replace(r"\{", "\u{2}")
        .replace(r"\}", "\u{3}");

    text = text.replace(r"\P", "\n");

    let argumented =
        ARGUMENT_ESCAPE.get_or_init(|| Regex::new(r"\\[fFHWQTCA][^;]*;").expect("invalid mtext pattern"));
    text = argumented.replace_all(&text, "").into_owned();

    let toggles = TOGGLE_ESCAPE.get_or_init(|| Regex::new(r"\\[LlOoKk]").expect("invalid mtext pattern"));
    text = toggles.replace_all(&text, "").into_owned();

    text = text.replace(['{', '}'], "");

    text.replace('\u{1}', r"\")
        .replace('\u{2}', "{")
        .replace('\u{3}', "}")
}

/// Compute a canvas size large enough to hold the rotated bounding box of
/// the rendered text, clamped to the hardware texture ceiling.
pub fn label_canvas_size(text: &str, rotation_deg: f64) -> (u32, u32) {
    let longest_line = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let line_count = text.lines().count().max(1);

    let w = longest_line as f64 * GLYPH_ASPECT * LABEL_FONT_PX;
    let h = line_count as f64 * LINE_ADVANCE * LABEL_FONT_PX;

    let theta = rotation_deg.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let rotated_w = w * cos + h * sin;
    let rotated_h = w * sin + h * cos;

    let clamp = |v: f64| (v.ceil().max(1.0) as u32).min(MAX_LABEL_TEXTURE_PX);
    (clamp(rotated_w), clamp(rotated_h))
}
