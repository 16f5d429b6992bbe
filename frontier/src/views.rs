//! The three application screens.
//!
//! Each view owns exactly the data that is valid while it is shown. Views
//! react to [`ViewEvent`]s by mutating themselves and returning a
//! [`Response`]; the [`crate::state::ViewStateMachine`] performs the actual
//! screen changes.

use winit::event::MouseButton;

use crate::assets::{TextureHandle, Textures};
use crate::camera::{self, CameraFollow, CameraTarget, Offset, Viewport};
use crate::commands::DebugShell;
use crate::config::{GameConfig, Style};
use crate::console::{ConsoleSession, EntryKind};
use crate::input::Key;
use crate::math::{Camera2D, Vec2};
use crate::render::{
    Background, ButtonWidget, ConsoleLineWidget, MessageBoxWidget, Rect, RenderModel, VBox,
    WorldLayer, WorldSprite,
};
use crate::state::ViewEvent;

pub const HOW_TO_PLAY_TEXT: &str = "Welcome Good luck!";

/// Buttons the UI host can report clicks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Play,
    HowToPlay,
    Exit,
    Restart,
    /// The OK button of the How-to-Play dialog.
    DismissMessage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Lose,
}

/// End-of-game event, injected from outside the gameplay view.
#[derive(Clone, Debug, PartialEq)]
pub struct GameOver {
    pub outcome: Outcome,
    pub message: String,
}

impl GameOver {
    pub fn new(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
        }
    }

    pub fn with_default_message(outcome: Outcome) -> Self {
        let message = match outcome {
            Outcome::Win => "You Won",
            Outcome::Lose => "You Lost",
        };
        Self::new(outcome, message)
    }
}

/// What a view wants the state machine to do after an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    /// The event is not valid for this view.
    Ignored,
    /// The view updated itself.
    Handled,
    /// Start a fresh game.
    Play,
    End(GameOver),
    Exit,
}

/// Settings and resources shared by all views.
#[derive(Clone, Debug)]
pub struct ViewContext {
    pub config: GameConfig,
    pub textures: Textures,
    pub viewport: Viewport,
    pub button_style: Style,
}

impl ViewContext {
    pub fn new(config: GameConfig, textures: Textures) -> Self {
        Self {
            viewport: config.viewport(),
            button_style: config.button_style.resolve(),
            config,
            textures,
        }
    }

    fn button(&self, id: Option<ButtonId>, label: impl Into<String>, rect: Rect) -> ButtonWidget {
        ButtonWidget {
            id,
            label: label.into(),
            rect,
            style: self.button_style.clone(),
        }
    }

    fn backdrop(&self, texture: TextureHandle) -> RenderModel {
        let mut model = RenderModel::new(self.config.background_color);
        model.background = Some(Background {
            texture,
            rect: Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height),
        });
        model
    }

    /// Centred button column; `None` ids are display-only.
    fn button_column(&self, model: &mut RenderModel, buttons: &[(Option<ButtonId>, &str)]) {
        let rects = VBox::buttons().layout_centered(buttons.len(), self.viewport);
        for ((id, label), rect) in buttons.iter().zip(rects) {
            model.add_button(self.button(*id, *label, rect));
        }
    }
}

/// Behaviour shared by every screen.
pub trait View {
    fn name(&self) -> &'static str;

    /// React to one input event.
    fn handle(&mut self, event: &ViewEvent, ctx: &ViewContext) -> Response;

    /// Advance one simulation step. Most views are static.
    fn tick(&mut self, _ctx: &ViewContext) {}

    /// Describe the current frame.
    fn render(&self, ctx: &ViewContext) -> RenderModel;
}

/// Left-button press and release, in UI coordinates.
fn left_pointer(event: &ViewEvent) -> Option<(Vec2, bool)> {
    match event {
        ViewEvent::MousePress {
            position,
            button: MouseButton::Left,
        } => Some((*position, true)),
        ViewEvent::MouseRelease {
            position,
            button: MouseButton::Left,
        } => Some((*position, false)),
        _ => None,
    }
}

/// Result of feeding one left-button event to a [`ClickTracker`].
#[derive(Clone, Copy, Debug, PartialEq)]
enum Click {
    /// Released over the button that was pressed.
    Completed(ButtonId),
    /// A button was pressed, or a pressed button was released elsewhere.
    Tracked,
    /// Nothing clickable was involved.
    Missed,
}

/// Pairs a press on a button with the release that completes the click.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct ClickTracker {
    pressed: Option<ButtonId>,
}

impl ClickTracker {
    /// `target` is the button under the pointer, if any.
    fn update(&mut self, target: Option<ButtonId>, pressed: bool) -> Click {
        if pressed {
            self.pressed = target;
            return if target.is_some() { Click::Tracked } else { Click::Missed };
        }
        match self.pressed.take() {
            Some(id) if target == Some(id) => Click::Completed(id),
            Some(_) => Click::Tracked,
            None => Click::Missed,
        }
    }
}

/// The button under a left press or release, and whether it was a press.
///
/// Returns `None` for every other event.
fn pointer_target(
    view: &dyn View,
    event: &ViewEvent,
    ctx: &ViewContext,
) -> Option<(Option<ButtonId>, bool)> {
    let (position, pressed) = left_pointer(event)?;
    Some((view.render(ctx).button_at(position), pressed))
}

/// How-to-Play dialog shown over the menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageOverlay {
    pub text: String,
}

/// Title screen.
#[derive(Clone, Debug, Default)]
pub struct MenuView {
    overlay: Option<MessageOverlay>,
    clicks: ClickTracker,
}

impl MenuView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> Option<&MessageOverlay> {
        self.overlay.as_ref()
    }

    fn click(&mut self, id: ButtonId) -> Response {
        match (id, self.overlay.is_some()) {
            (ButtonId::Play, false) => Response::Play,
            (ButtonId::HowToPlay, false) => {
                self.overlay = Some(MessageOverlay {
                    text: HOW_TO_PLAY_TEXT.into(),
                });
                Response::Handled
            }
            (ButtonId::Exit, false) => Response::Exit,
            (ButtonId::DismissMessage, true) => {
                self.overlay = None;
                Response::Handled
            }
            _ => Response::Ignored,
        }
    }
}

impl View for MenuView {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn handle(&mut self, event: &ViewEvent, ctx: &ViewContext) -> Response {
        let click = pointer_target(&*self, event, ctx)
            .map(|(target, pressed)| self.clicks.update(target, pressed));
        match (click, event) {
            (Some(Click::Completed(id)), _) => self.click(id),
            (Some(Click::Tracked), _) => Response::Handled,
            (None, ViewEvent::ButtonClicked(id)) => self.click(*id),
            _ => Response::Ignored,
        }
    }

    fn render(&self, ctx: &ViewContext) -> RenderModel {
        let mut model = ctx.backdrop(ctx.textures.menu_background);
        match &self.overlay {
            Some(overlay) => model.add_message_box(MessageBoxWidget::centered(
                overlay.text.clone(),
                ButtonId::DismissMessage,
                ctx.viewport,
            )),
            None => ctx.button_column(
                &mut model,
                &[
                    (Some(ButtonId::Play), "Play"),
                    (Some(ButtonId::HowToPlay), "How to Play"),
                    (Some(ButtonId::Exit), "Exit"),
                ],
            ),
        }
        model
    }
}

/// The gameplay screen: a camera following a sprite, plus the debug console.
#[derive(Clone, Debug)]
pub struct PlayingView {
    target: CameraTarget,
    follow: CameraFollow,
    viewport: Viewport,
    offset: Offset,
    tick: u64,
    console: ConsoleSession,
    last_click: Option<Vec2>,
    left_pressed: bool,
}

impl PlayingView {
    /// A fresh game: target at the origin, tick zero, console hidden and empty.
    pub fn new(ctx: &ViewContext) -> Self {
        let target = CameraTarget::new();
        Self {
            offset: camera::center_on(&target, ctx.viewport),
            target,
            follow: ctx.config.camera_follow(),
            viewport: ctx.viewport,
            tick: 0,
            console: ConsoleSession::new().with_history_limit(ctx.config.console.history_limit),
            last_click: None,
            left_pressed: false,
        }
    }

    pub fn target(&self) -> &CameraTarget {
        &self.target
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn console(&self) -> &ConsoleSession {
        &self.console
    }

    pub fn last_click(&self) -> Option<Vec2> {
        self.last_click
    }

    pub fn is_left_pressed(&self) -> bool {
        self.left_pressed
    }

    fn submit_console(&mut self) -> Response {
        let mut game_over = None;
        let mut shell = DebugShell {
            target: &mut self.target,
            offset: self.offset,
            tick: self.tick,
            last_click: self.last_click,
            game_over: &mut game_over,
        };
        self.console.submit_input(&mut shell);
        match game_over {
            Some(game_over) => Response::End(game_over),
            None => Response::Handled,
        }
    }

    fn key_down(&mut self, key: Key) -> Response {
        match key {
            Key::Move(direction) => {
                self.follow.apply_movement_input(&mut self.target, direction, true);
                Response::Handled
            }
            Key::ToggleConsole => {
                let active = self.console.toggle();
                log::debug!("console {}", if active { "shown" } else { "hidden" });
                Response::Handled
            }
            Key::Submit if self.console.is_active() => self.submit_console(),
            Key::Backspace if self.console.is_active() => {
                self.console.backspace();
                Response::Handled
            }
            Key::Submit | Key::Backspace => Response::Ignored,
        }
    }

    fn render_console(&self, ctx: &ViewContext, model: &mut RenderModel) {
        let style = &ctx.config.console;
        let transcript = self.console.transcript();
        let live_prompt = transcript
            .iter()
            .rposition(|entry| entry.kind == EntryKind::Prompt);

        // Earlier prompts were already answered; only the live one is drawn,
        // showing the line being typed.
        let lines: Vec<_> = transcript
            .iter()
            .enumerate()
            .filter(|(i, entry)| entry.kind != EntryKind::Prompt || Some(*i) == live_prompt)
            .map(|(_, entry)| match entry.kind {
                EntryKind::Prompt => (entry.kind, self.console.input().to_string()),
                _ => (entry.kind, entry.text.clone()),
            })
            .collect();

        let column = VBox {
            child_width: self.viewport.width,
            child_height: style.line_height,
            spacing: 0.0,
        };
        let rects = column.layout_bottom(lines.len(), self.viewport);
        for ((kind, text), rect) in lines.into_iter().zip(rects) {
            let (background, text_color) = match kind {
                EntryKind::Prompt | EntryKind::Echo => (style.input_background, style.input_text),
                EntryKind::Result => (style.output_background, style.result_text),
                EntryKind::Error => (style.output_background, style.error_text),
            };
            model.add_console_line(ConsoleLineWidget {
                kind,
                text,
                rect,
                background,
                text_color,
            });
        }
    }
}

impl View for PlayingView {
    fn name(&self) -> &'static str {
        "playing"
    }

    fn handle(&mut self, event: &ViewEvent, _ctx: &ViewContext) -> Response {
        match event {
            ViewEvent::KeyDown(key) => self.key_down(*key),
            ViewEvent::KeyUp(Key::Move(direction)) => {
                self.follow.apply_movement_input(&mut self.target, *direction, false);
                Response::Handled
            }
            ViewEvent::Text(text) if self.console.is_active() => {
                self.console.push_text(text);
                Response::Handled
            }
            ViewEvent::MouseDrag { delta } => {
                self.follow.apply_drag(&mut self.target, *delta);
                Response::Handled
            }
            ViewEvent::MousePress {
                position,
                button: MouseButton::Left,
            } => {
                self.left_pressed = true;
                self.last_click = Some(camera::to_world(*position, self.offset, self.viewport));
                Response::Handled
            }
            ViewEvent::MouseRelease {
                button: MouseButton::Left,
                ..
            } => {
                self.left_pressed = false;
                Response::Handled
            }
            ViewEvent::GameOver(game_over) => Response::End(game_over.clone()),
            _ => Response::Ignored,
        }
    }

    fn tick(&mut self, _ctx: &ViewContext) {
        camera::integrate(&mut self.target);
        self.offset = camera::center_on(&self.target, self.viewport);
        self.tick += 1;
    }

    fn render(&self, ctx: &ViewContext) -> RenderModel {
        let mut model = RenderModel::new(ctx.config.background_color);
        let mut world = WorldLayer::new(Camera2D::new(self.offset), self.viewport);
        world.sprites.push(WorldSprite {
            texture: ctx.textures.camera_sprite,
            position: self.target.position,
        });
        model.world = Some(world);
        if self.console.is_active() {
            self.render_console(ctx, &mut model);
        }
        model
    }
}

/// Win/lose screen.
#[derive(Clone, Debug)]
pub struct EndView {
    game_over: GameOver,
    clicks: ClickTracker,
}

impl EndView {
    pub fn new(game_over: GameOver) -> Self {
        Self {
            game_over,
            clicks: ClickTracker::default(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.game_over.outcome
    }

    pub fn message(&self) -> &str {
        &self.game_over.message
    }

    fn click(&self, id: ButtonId) -> Response {
        match id {
            ButtonId::Restart => Response::Play,
            ButtonId::Exit => Response::Exit,
            _ => Response::Ignored,
        }
    }
}

impl View for EndView {
    fn name(&self) -> &'static str {
        "end"
    }

    fn handle(&mut self, event: &ViewEvent, ctx: &ViewContext) -> Response {
        let click = pointer_target(&*self, event, ctx)
            .map(|(target, pressed)| self.clicks.update(target, pressed));
        match (click, event) {
            (Some(Click::Completed(id)), _) => self.click(id),
            (Some(Click::Tracked), _) => Response::Handled,
            (None, ViewEvent::ButtonClicked(id)) => self.click(*id),
            _ => Response::Ignored,
        }
    }

    fn render(&self, ctx: &ViewContext) -> RenderModel {
        let mut model = ctx.backdrop(ctx.textures.end_background);
        ctx.button_column(
            &mut model,
            &[
                (None, self.game_over.message.as_str()),
                (Some(ButtonId::Restart), "Restart"),
                (Some(ButtonId::Exit), "Exit"),
            ],
        );
        model
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::console::ConsoleEntry;

    pub(crate) fn context() -> ViewContext {
        ViewContext::new(
            GameConfig::default(),
            Textures {
                menu_background: TextureHandle(0),
                end_background: TextureHandle(1),
                camera_sprite: TextureHandle(2),
            },
        )
    }

    fn left_press(position: Vec2) -> ViewEvent {
        ViewEvent::MousePress {
            position,
            button: MouseButton::Left,
        }
    }

    fn left_release(position: Vec2) -> ViewEvent {
        ViewEvent::MouseRelease {
            position,
            button: MouseButton::Left,
        }
    }

    /// Press and release at `position`, returning the release response.
    fn click_at(view: &mut dyn View, position: Vec2, ctx: &ViewContext) -> Response {
        view.handle(&left_press(position), ctx);
        view.handle(&left_release(position), ctx)
    }

    fn center_of(model: &RenderModel, id: ButtonId) -> Vec2 {
        let rect = model
            .buttons()
            .find(|b| b.id == Some(id))
            .map(|b| b.rect)
            .unwrap();
        Vec2::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    #[test]
    fn menu_buttons_respond_to_clicks_on_their_rects() {
        let ctx = context();
        let mut menu = MenuView::new();
        let model = menu.render(&ctx);
        assert_eq!(model.background.unwrap().texture, TextureHandle(0));

        let play = center_of(&model, ButtonId::Play);
        assert_eq!(click_at(&mut menu, play, &ctx), Response::Play);
        let exit = center_of(&model, ButtonId::Exit);
        assert_eq!(click_at(&mut menu, exit, &ctx), Response::Exit);
        assert_eq!(click_at(&mut menu, Vec2::ZERO, &ctx), Response::Ignored);
    }

    #[test]
    fn buttons_fire_on_release_over_the_pressed_button() {
        let ctx = context();
        let mut menu = MenuView::new();
        let model = menu.render(&ctx);
        let play = center_of(&model, ButtonId::Play);
        let exit = center_of(&model, ButtonId::Exit);

        assert_eq!(menu.handle(&left_press(play), &ctx), Response::Handled);
        assert_eq!(menu.handle(&left_release(exit), &ctx), Response::Handled);

        assert_eq!(menu.handle(&left_press(Vec2::ZERO), &ctx), Response::Ignored);
        assert_eq!(menu.handle(&left_release(play), &ctx), Response::Ignored);

        assert_eq!(menu.handle(&left_press(exit), &ctx), Response::Handled);
        assert_eq!(menu.handle(&left_release(exit), &ctx), Response::Exit);
    }

    #[test]
    fn how_to_play_overlay_blocks_menu_buttons() {
        let ctx = context();
        let mut menu = MenuView::new();
        let play = center_of(&menu.render(&ctx), ButtonId::Play);

        assert_eq!(
            menu.handle(&ViewEvent::ButtonClicked(ButtonId::HowToPlay), &ctx),
            Response::Handled
        );
        assert_eq!(menu.overlay().unwrap().text, HOW_TO_PLAY_TEXT);
        assert_eq!(
            menu.handle(&ViewEvent::ButtonClicked(ButtonId::Play), &ctx),
            Response::Ignored
        );
        assert_eq!(click_at(&mut menu, play, &ctx), Response::Ignored);

        let ok = center_of(&menu.render(&ctx), ButtonId::DismissMessage);
        assert_eq!(click_at(&mut menu, ok, &ctx), Response::Handled);
        assert!(menu.overlay().is_none());
        assert_eq!(
            menu.handle(&ViewEvent::ButtonClicked(ButtonId::DismissMessage), &ctx),
            Response::Ignored
        );
    }

    #[test]
    fn playing_starts_centred_on_origin() {
        let ctx = context();
        let view = PlayingView::new(&ctx);
        assert_eq!(view.tick_count(), 0);
        assert_eq!(view.target().position, Vec2::ZERO);
        assert_eq!(view.offset(), Vec2::new(-400.0, -300.0));
        assert!(view.console().transcript().is_empty());
        assert!(!view.console().is_active());
    }

    #[test]
    fn tick_integrates_then_recentres() {
        let ctx = context();
        let mut view = PlayingView::new(&ctx);
        view.handle(&ViewEvent::KeyDown(Key::Move(camera::Direction::Right)), &ctx);
        view.tick(&ctx);
        assert_eq!(view.target().position, Vec2::new(5.0, 0.0));
        assert_eq!(view.offset(), Vec2::new(-395.0, -300.0));
        assert_eq!(view.tick_count(), 1);

        view.handle(&ViewEvent::KeyUp(Key::Move(camera::Direction::Right)), &ctx);
        view.tick(&ctx);
        assert_eq!(view.target().position, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn drag_moves_target_without_velocity() {
        let ctx = context();
        let mut view = PlayingView::new(&ctx);
        view.handle(
            &ViewEvent::MouseDrag {
                delta: Vec2::new(10.0, 20.0),
            },
            &ctx,
        );
        assert_eq!(view.target().position, Vec2::new(10.0, 20.0));
        assert_eq!(view.target().velocity, Vec2::ZERO);
    }

    #[test]
    fn left_click_records_world_position() {
        let ctx = context();
        let mut view = PlayingView::new(&ctx);
        view.handle(&left_press(Vec2::new(400.0, 300.0)), &ctx);
        assert!(view.is_left_pressed());
        assert_eq!(view.last_click(), Some(Vec2::ZERO));
        view.handle(
            &ViewEvent::MouseRelease {
                position: Vec2::ZERO,
                button: MouseButton::Left,
            },
            &ctx,
        );
        assert!(!view.is_left_pressed());
    }

    #[test]
    fn console_input_only_reaches_an_active_console() {
        let ctx = context();
        let mut view = PlayingView::new(&ctx);
        assert_eq!(view.handle(&ViewEvent::Text("pos".into()), &ctx), Response::Ignored);
        assert_eq!(view.handle(&ViewEvent::KeyDown(Key::Submit), &ctx), Response::Ignored);
        assert!(view.console().transcript().is_empty());

        view.handle(&ViewEvent::KeyDown(Key::ToggleConsole), &ctx);
        view.handle(&ViewEvent::Text("teleport 7 8".into()), &ctx);
        view.handle(&ViewEvent::KeyDown(Key::Submit), &ctx);

        assert_eq!(view.target().position, Vec2::new(7.0, 8.0));
        let transcript = view.console().transcript();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[1], ConsoleEntry::new(EntryKind::Echo, ">teleport 7 8"));
        assert_eq!(transcript[2].kind, EntryKind::Result);
    }

    #[test]
    fn lose_command_ends_the_game() {
        let ctx = context();
        let mut view = PlayingView::new(&ctx);
        view.handle(&ViewEvent::KeyDown(Key::ToggleConsole), &ctx);
        view.handle(&ViewEvent::Text("lose".into()), &ctx);
        assert_eq!(
            view.handle(&ViewEvent::KeyDown(Key::Submit), &ctx),
            Response::End(GameOver::new(Outcome::Lose, "You Lost"))
        );
    }

    #[test]
    fn console_renders_only_while_active_with_live_prompt_last() {
        let ctx = context();
        let mut view = PlayingView::new(&ctx);
        assert_eq!(view.render(&ctx).console_lines().count(), 0);

        view.handle(&ViewEvent::KeyDown(Key::ToggleConsole), &ctx);
        view.handle(&ViewEvent::Text("bogus".into()), &ctx);
        view.handle(&ViewEvent::KeyDown(Key::Submit), &ctx);
        view.handle(&ViewEvent::Text("ti".into()), &ctx);

        let model = view.render(&ctx);
        let lines: Vec<_> = model.console_lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, ">bogus");
        assert_eq!(lines[1].kind, EntryKind::Error);
        assert_eq!(lines[1].text_color, ctx.config.console.error_text);
        assert_eq!(lines[2].kind, EntryKind::Prompt);
        assert_eq!(lines[2].text, ">ti");
        assert_eq!(lines[2].rect.y + lines[2].rect.height, 600.0);
        assert_eq!(lines[2].rect.width, 800.0);

        let world = model.world.unwrap();
        assert_eq!(world.sprites[0].texture, TextureHandle(2));
        assert_eq!(world.camera.position, view.offset());
    }

    #[test]
    fn end_view_shows_message_and_restarts() {
        let ctx = context();
        let mut end = EndView::new(GameOver::new(Outcome::Win, "Victory"));
        let model = end.render(&ctx);
        let labels: Vec<_> = model.buttons().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Victory", "Restart", "Exit"]);

        let message = center_of(&model, ButtonId::Restart) - Vec2::new(0.0, 60.0);
        assert_eq!(click_at(&mut end, message, &ctx), Response::Ignored);
        let restart = center_of(&model, ButtonId::Restart);
        assert_eq!(click_at(&mut end, restart, &ctx), Response::Play);
        assert_eq!(
            end.handle(&ViewEvent::ButtonClicked(ButtonId::Exit), &ctx),
            Response::Exit
        );
        assert_eq!(
            end.handle(&ViewEvent::ButtonClicked(ButtonId::Play), &ctx),
            Response::Ignored
        );
    }
}
