//! # Text to texture
//!
//! An offscreen 2D surface that turns a string into an RGBA image the 3D
//! scene can map onto a plane or a sprite. Panel shapes (background fill and
//! border) are drawn with `tiny-skia`; glyphs are shaped and rasterized on
//! the CPU by `cosmic-text` (re-exported through `glyphon`) using the fonts
//! that ship with `egui`, so no system fonts are needed and the output is the
//! same on every platform.
//!
//! The rasterizer is expensive to create (font database, shaping caches), so
//! demos share one instance per thread through [`with_rasterizer`].

use std::cell::RefCell;

use glyphon::cosmic_text::fontdb;
use glyphon::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::color::Color;
use crate::error::{LessonError, Result};
use crate::resources::TextureImage;

/// Where the text sits on the surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Anchor {
    /// Centered both ways.
    Center,
    /// Baseline at `y`; horizontally centered when `left` is `None`,
    /// otherwise starting at `left`.
    Baseline { left: Option<f32>, y: f32 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Typeface {
    Proportional,
    Monospace,
}

/// A stroked rectangle drawn over the background.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Border {
    pub color: Color,
    pub rect: [f32; 4],
    pub width: f32,
}

/// Surface size, panel decoration and font settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub width: u32,
    pub height: u32,
    pub background: Option<Color>,
    pub border: Option<Border>,
    pub ink: Color,
    pub font_size: f32,
    pub typeface: Typeface,
    pub weight: fontdb::Weight,
    pub anchor: Anchor,
}

impl TextStyle {
    /// The 512x256 purple panel of the canvas-texture demo.
    pub fn panel() -> Self {
        Self {
            width: 512,
            height: 256,
            background: Some(Color::rgb_u32(0x2d1b69)),
            border: Some(Border {
                color: Color::rgb_u32(0x6c5ce7),
                rect: [8.0, 8.0, 496.0, 240.0],
                width: 4.0,
            }),
            ink: Color::WHITE,
            font_size: 52.0,
            typeface: Typeface::Proportional,
            weight: fontdb::Weight::BOLD,
            anchor: Anchor::Center,
        }
    }

    /// A transparent label with horizontally centered text.
    pub fn label(width: u32, height: u32, font_size: f32, baseline: f32, ink: Color) -> Self {
        Self {
            width,
            height,
            background: None,
            border: None,
            ink,
            font_size,
            typeface: Typeface::Proportional,
            weight: fontdb::Weight::NORMAL,
            anchor: Anchor::Baseline {
                left: None,
                y: baseline,
            },
        }
    }
}

pub struct TextRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    proportional: Option<String>,
    monospace: Option<String>,
}

impl TextRasterizer {
    pub fn new() -> Self {
        let definitions = egui::FontDefinitions::default();
        let mut database = fontdb::Database::new();
        let mut load = |key: &str| -> Option<String> {
            let data = definitions.font_data.get(key)?;
            database.load_font_data(data.font.to_vec());
            let family = database.faces().last()?.families.first()?.0.clone();
            log::debug!("Loaded font {key} as family {family:?}");
            Some(family)
        };
        let proportional = load("Ubuntu-Light");
        let monospace = load("Hack");
        if proportional.is_none() && monospace.is_none() {
            log::warn!("No bundled fonts available; text textures will be blank");
        }
        Self {
            font_system: FontSystem::new_with_locale_and_db("en-US".to_owned(), database),
            swash_cache: SwashCache::new(),
            proportional,
            monospace,
        }
    }

    /// Renders `text` onto a fresh surface described by `style`.
    pub fn render(&mut self, text: &str, style: &TextStyle) -> Result<TextureImage> {
        let mut pixmap = Pixmap::new(style.width, style.height).ok_or(LessonError::Pixmap {
            width: style.width,
            height: style.height,
        })?;

        if let Some(background) = style.background {
            let [r, g, b, a] = background.to_rgba8();
            pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        }
        if let Some(border) = style.border {
            let [x, y, w, h] = border.rect;
            if let Some(rect) = Rect::from_xywh(x, y, w, h) {
                let path = PathBuilder::from_rect(rect);
                let mut paint = Paint::default();
                let [r, g, b, a] = border.color.to_rgba8();
                paint.set_color_rgba8(r, g, b, a);
                let stroke = Stroke {
                    width: border.width,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        if !text.is_empty() {
            self.draw_text(&mut pixmap, text, style);
        }

        Ok(TextureImage {
            width: style.width,
            height: style.height,
            pixels: unpremultiply(&pixmap),
        })
    }

    fn draw_text(&mut self, pixmap: &mut Pixmap, text: &str, style: &TextStyle) {
        let family = match style.typeface {
            Typeface::Proportional => self.proportional.as_ref().or(self.monospace.as_ref()),
            Typeface::Monospace => self.monospace.as_ref().or(self.proportional.as_ref()),
        };
        let Some(family) = family else {
            return;
        };

        let line_height = style.font_size * 1.2;
        let metrics = Metrics::new(style.font_size, line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            text,
            Attrs::new()
                .family(Family::Name(family))
                .weight(style.weight),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let Some(run) = buffer.layout_runs().next() else {
            return;
        };
        let (width, height) = (style.width as f32, style.height as f32);
        let offset_x = match style.anchor {
            Anchor::Center | Anchor::Baseline { left: None, .. } => (width - run.line_w) * 0.5,
            Anchor::Baseline { left: Some(left), .. } => left,
        };
        let offset_y = match style.anchor {
            Anchor::Center => (height - line_height) * 0.5 - run.line_top,
            Anchor::Baseline { y, .. } => y - run.line_y,
        };
        let (dx, dy) = (offset_x.round() as i32, offset_y.round() as i32);

        let [r, g, b, a] = style.ink.to_rgba8();
        let ink = glyphon::Color::rgba(r, g, b, a);
        let mut paint = Paint {
            anti_alias: false,
            ..Paint::default()
        };
        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            ink,
            |x, y, w, h, color| {
                if color.a() == 0 {
                    return;
                }
                let Some(rect) = Rect::from_xywh((x + dx) as f32, (y + dy) as f32, w as f32, h as f32)
                else {
                    return;
                };
                paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            },
        );
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn unpremultiply(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect()
}

thread_local! {
    static RASTERIZER: RefCell<Option<TextRasterizer>> = const { RefCell::new(None) };
}

/// Runs `f` with this thread's shared rasterizer, creating it on first use.
pub fn with_rasterizer<R>(f: impl FnOnce(&mut TextRasterizer) -> R) -> R {
    RASTERIZER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let rasterizer = slot.get_or_insert_with(TextRasterizer::new);
        f(rasterizer)
    })
}

/// Shorthand for rendering with the shared rasterizer.
pub fn render_text(text: &str, style: &TextStyle) -> Result<TextureImage> {
    with_rasterizer(|rasterizer| rasterizer.render(text, style))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_ink(pixel: [u8; 4]) -> bool {
        pixel[0] > 200 && pixel[1] > 200 && pixel[2] > 200
    }

    #[test]
    fn panel_has_fixed_size_and_frame() {
        let image = render_text("Hello 3D!", &TextStyle::panel()).unwrap();
        assert_eq!((image.width, image.height), (512, 256));
        assert_eq!(image.pixels.len(), 512 * 256 * 4);
        assert_eq!(image.pixel(0, 0), Some([0x2d, 0x1b, 0x69, 0xff]));
        assert_eq!(image.pixel(8, 128), Some([0x6c, 0x5c, 0xe7, 0xff]));
        assert_eq!(image.pixel(256, 8), Some([0x6c, 0x5c, 0xe7, 0xff]));
    }

    #[test]
    fn panel_text_is_bold_and_labels_are_not() {
        assert_eq!(TextStyle::panel().weight, fontdb::Weight::BOLD);
        let label = TextStyle::label(64, 32, 18.0, 22.0, Color::WHITE);
        assert_eq!(label.weight, fontdb::Weight::NORMAL);
    }

    #[test]
    fn panel_text_is_centered() {
        let image = render_text("Hello 3D!", &TextStyle::panel()).unwrap();
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (u32::MAX, 0, u32::MAX, 0);
        // Stay inside the border so its stroke is not mistaken for ink.
        for y in 16..240 {
            for x in 16..496 {
                if image.pixel(x, y).is_some_and(is_ink) {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }
        assert!(min_x <= max_x, "no glyph ink found");
        let center_x = (min_x + max_x) as f32 * 0.5;
        let center_y = (min_y + max_y) as f32 * 0.5;
        assert!((center_x - 256.0).abs() < 24.0, "horizontal center {center_x}");
        assert!((center_y - 128.0).abs() < 32.0, "vertical center {center_y}");
    }

    #[test]
    fn empty_text_leaves_a_clear_label() {
        let style = TextStyle::label(64, 32, 18.0, 22.0, Color::WHITE);
        let image = render_text("", &style).unwrap();
        assert!(image.pixels.chunks_exact(4).all(|p| p[3] == 0));
    }

    #[test]
    fn label_ink_uses_its_color() {
        let style = TextStyle::label(64, 40, 28.0, 30.0, Color::rgb_u32(0xff6b6b));
        let image = render_text("X", &style).unwrap();
        let strongest = image
            .pixels
            .chunks_exact(4)
            .max_by_key(|p| p[3])
            .map(|p| [p[0], p[1], p[2], p[3]])
            .unwrap();
        assert!(strongest[3] > 128);
        assert!(strongest[0] > strongest[1] && strongest[0] > strongest[2]);
    }

    #[test]
    fn zero_sized_surface_is_an_error() {
        let mut style = TextStyle::panel();
        style.width = 0;
        assert!(matches!(
            render_text("x", &style),
            Err(LessonError::Pixmap { width: 0, .. })
        ));
    }
}
