//! Frame description handed to the renderer.
//!
//! Views never draw. Each frame the active view emits a [`RenderModel`] and
//! the host turns it into pixels. Widgets live in UI space: origin at the top
//! left of the window, y pointing down. World sprites use world space (y up)
//! and are placed through the camera.

use glam::DMat4;

use crate::assets::TextureHandle;
use crate::camera::Viewport;
use crate::config::{Rgb, Rgba, Style};
use crate::console::EntryKind;
use crate::math::{Camera2D, Vec2};
use crate::views::ButtonId;

pub const BUTTON_WIDTH: f64 = 200.0;
pub const BUTTON_HEIGHT: f64 = 50.0;
pub const BUTTON_SPACING: f64 = 10.0;
pub const MESSAGE_BOX_WIDTH: f64 = 400.0;
pub const MESSAGE_BOX_HEIGHT: f64 = 300.0;
const MESSAGE_BOX_BUTTON_WIDTH: f64 = 100.0;
const MESSAGE_BOX_BUTTON_HEIGHT: f64 = 30.0;
const MESSAGE_BOX_PADDING: f64 = 10.0;

/// Axis-aligned rectangle in UI space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// A `width`×`height` rect centred in the viewport.
    pub fn centered(width: f64, height: f64, viewport: Viewport) -> Self {
        Self::new(
            (viewport.width - width) / 2.0,
            (viewport.height - height) / 2.0,
            width,
            height,
        )
    }
}

/// Vertical stack of equally sized children.
#[derive(Clone, Copy, Debug)]
pub struct VBox {
    pub child_width: f64,
    pub child_height: f64,
    pub spacing: f64,
}

impl VBox {
    /// The menu button column.
    pub fn buttons() -> Self {
        Self {
            child_width: BUTTON_WIDTH,
            child_height: BUTTON_HEIGHT,
            spacing: BUTTON_SPACING,
        }
    }

    pub fn height(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        count as f64 * self.child_height + (count - 1) as f64 * self.spacing
    }

    /// Child rects for a column centred in the viewport, top to bottom.
    pub fn layout_centered(&self, count: usize, viewport: Viewport) -> Vec<Rect> {
        let x = (viewport.width - self.child_width) / 2.0;
        let top = (viewport.height - self.height(count)) / 2.0;
        (0..count)
            .map(|i| {
                let y = top + i as f64 * (self.child_height + self.spacing);
                Rect::new(x, y, self.child_width, self.child_height)
            })
            .collect()
    }

    /// Child rects for a column resting on the bottom edge, top to bottom.
    pub fn layout_bottom(&self, count: usize, viewport: Viewport) -> Vec<Rect> {
        let top = viewport.height - self.height(count);
        (0..count)
            .map(|i| {
                let y = top + i as f64 * (self.child_height + self.spacing);
                Rect::new(0.0, y, self.child_width, self.child_height)
            })
            .collect()
    }
}

/// A clickable (or, without an id, purely decorative) button.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonWidget {
    pub id: Option<ButtonId>,
    pub label: String,
    pub rect: Rect,
    pub style: Style,
}

/// Modal dialog with a single dismiss button.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageBoxWidget {
    pub text: String,
    pub rect: Rect,
    pub button: ButtonWidget,
}

impl MessageBoxWidget {
    /// A centred message box whose OK button reports `dismiss`.
    pub fn centered(text: impl Into<String>, dismiss: ButtonId, viewport: Viewport) -> Self {
        let rect = Rect::centered(MESSAGE_BOX_WIDTH, MESSAGE_BOX_HEIGHT, viewport);
        let button_rect = Rect::new(
            rect.x + (rect.width - MESSAGE_BOX_BUTTON_WIDTH) / 2.0,
            rect.y + rect.height - MESSAGE_BOX_BUTTON_HEIGHT - MESSAGE_BOX_PADDING,
            MESSAGE_BOX_BUTTON_WIDTH,
            MESSAGE_BOX_BUTTON_HEIGHT,
        );
        Self {
            text: text.into(),
            rect,
            button: ButtonWidget {
                id: Some(dismiss),
                label: "Ok".into(),
                rect: button_rect,
                style: Style::default(),
            },
        }
    }
}

/// One console transcript line.
#[derive(Clone, Debug, PartialEq)]
pub struct ConsoleLineWidget {
    pub kind: EntryKind,
    pub text: String,
    pub rect: Rect,
    pub background: Rgba,
    pub text_color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    Button(ButtonWidget),
    MessageBox(MessageBoxWidget),
    ConsoleLine(ConsoleLineWidget),
}

/// Full-window background image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Background {
    pub texture: TextureHandle,
    pub rect: Rect,
}

/// Sprite placed in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldSprite {
    pub texture: TextureHandle,
    /// Centre of the sprite.
    pub position: Vec2,
}

/// The lit world layer, seen through the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldLayer {
    pub camera: Camera2D,
    pub view_projection: DMat4,
    pub sprites: Vec<WorldSprite>,
    pub ambient_light: Rgb,
}

impl WorldLayer {
    pub fn new(camera: Camera2D, viewport: Viewport) -> Self {
        Self {
            camera,
            view_projection: camera.view_projection(viewport.width, viewport.height),
            sprites: Vec::new(),
            ambient_light: Rgb::WHITE,
        }
    }
}

/// Everything the renderer needs for one frame, drawn in field order:
/// clear colour, background, world, widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderModel {
    pub clear_color: Rgb,
    pub background: Option<Background>,
    pub world: Option<WorldLayer>,
    pub widgets: Vec<Widget>,
}

impl RenderModel {
    pub fn new(clear_color: Rgb) -> Self {
        Self {
            clear_color,
            background: None,
            world: None,
            widgets: Vec::new(),
        }
    }

    pub fn add_button(&mut self, button: ButtonWidget) {
        self.widgets.push(Widget::Button(button));
    }

    pub fn add_message_box(&mut self, message_box: MessageBoxWidget) {
        self.widgets.push(Widget::MessageBox(message_box));
    }

    pub fn add_console_line(&mut self, line: ConsoleLineWidget) {
        self.widgets.push(Widget::ConsoleLine(line));
    }

    /// All buttons, including the ones inside message boxes.
    pub fn buttons(&self) -> impl Iterator<Item = &ButtonWidget> {
        self.widgets.iter().filter_map(|widget| match widget {
            Widget::Button(button) => Some(button),
            Widget::MessageBox(message_box) => Some(&message_box.button),
            Widget::ConsoleLine(_) => None,
        })
    }

    /// The clickable button under `point`, topmost first.
    pub fn button_at(&self, point: Vec2) -> Option<ButtonId> {
        self.buttons()
            .filter(|button| button.rect.contains(point))
            .filter_map(|button| button.id)
            .last()
    }

    pub fn console_lines(&self) -> impl Iterator<Item = &ConsoleLineWidget> {
        self.widgets.iter().filter_map(|widget| match widget {
            Widget::ConsoleLine(line) => Some(line),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn button(id: Option<ButtonId>, rect: Rect) -> ButtonWidget {
        ButtonWidget {
            id,
            label: String::new(),
            rect,
            style: Style::default(),
        }
    }

    #[test]
    fn button_column_is_centred() {
        let rects = VBox::buttons().layout_centered(3, VIEWPORT);
        // 3 * 50 + 2 * 10 = 170 tall, so the top sits at (600 - 170) / 2.
        assert_eq!(rects[0], Rect::new(300.0, 215.0, 200.0, 50.0));
        assert_eq!(rects[1].y, 275.0);
        assert_eq!(rects[2].y, 335.0);
        assert!(VBox::buttons().layout_centered(0, VIEWPORT).is_empty());
    }

    #[test]
    fn bottom_column_ends_at_viewport_edge() {
        let lines = VBox {
            child_width: 800.0,
            child_height: 25.0,
            spacing: 0.0,
        };
        let rects = lines.layout_bottom(4, VIEWPORT);
        assert_eq!(rects[0].y, 500.0);
        assert_eq!(rects[3].y + rects[3].height, 600.0);
    }

    #[test]
    fn rect_edges_are_half_open() {
        let rect = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(14.9, 14.9)));
        assert!(!rect.contains(Vec2::new(15.0, 12.0)));
        assert!(!rect.contains(Vec2::new(12.0, 9.9)));
    }

    #[test]
    fn hit_test_skips_decorative_buttons() {
        let mut model = RenderModel::new(Rgb::WHITE);
        model.add_button(button(Some(ButtonId::Play), Rect::new(0.0, 0.0, 100.0, 100.0)));
        model.add_button(button(None, Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(model.button_at(Vec2::new(25.0, 25.0)), Some(ButtonId::Play));
        assert_eq!(model.button_at(Vec2::new(150.0, 25.0)), None);
    }

    #[test]
    fn message_box_button_is_hit_testable() {
        let mut model = RenderModel::new(Rgb::WHITE);
        let dialog = MessageBoxWidget::centered("hi", ButtonId::DismissMessage, VIEWPORT);
        let ok = dialog.button.rect;
        assert!(dialog.rect.contains(Vec2::new(ok.x, ok.y)));
        model.add_message_box(dialog);
        assert_eq!(
            model.button_at(Vec2::new(ok.x + 1.0, ok.y + 1.0)),
            Some(ButtonId::DismissMessage)
        );
    }
}
