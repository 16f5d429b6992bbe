use winit::event::MouseButton;

use crate::assets::Textures;
use crate::config::GameConfig;
use crate::input::Key;
use crate::math::Vec2;
use crate::render::RenderModel;
use crate::views::{
    ButtonId, EndView, GameOver, MenuView, PlayingView, Response, View, ViewContext,
};

/// Input delivered by the host, in arrival order.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    ButtonClicked(ButtonId),
    KeyDown(Key),
    KeyUp(Key),
    /// Text typed on the keyboard.
    Text(String),
    /// Cursor moved with the left button held; world orientation (y up).
    MouseDrag { delta: Vec2 },
    /// Button pressed at a UI position (origin top-left, y down).
    MousePress { position: Vec2, button: MouseButton },
    MouseRelease { position: Vec2, button: MouseButton },
    /// End the game. Nothing in gameplay raises this on its own.
    GameOver(GameOver),
    CloseRequested,
}

/// The active screen, carrying only the data valid for it.
#[derive(Clone, Debug)]
pub enum ViewState {
    Menu(MenuView),
    Playing(PlayingView),
    End(EndView),
}

impl ViewState {
    fn view(&self) -> &dyn View {
        match self {
            ViewState::Menu(view) => view,
            ViewState::Playing(view) => view,
            ViewState::End(view) => view,
        }
    }

    fn view_mut(&mut self) -> &mut dyn View {
        match self {
            ViewState::Menu(view) => view,
            ViewState::Playing(view) => view,
            ViewState::End(view) => view,
        }
    }

    pub fn name(&self) -> &'static str {
        self.view().name()
    }

    pub fn as_playing(&self) -> Option<&PlayingView> {
        match self {
            ViewState::Playing(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_end(&self) -> Option<&EndView> {
        match self {
            ViewState::End(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_menu(&self) -> Option<&MenuView> {
        match self {
            ViewState::Menu(view) => Some(view),
            _ => None,
        }
    }
}

/// Owns the active [`ViewState`] and applies screen transitions.
///
/// Events that are not valid for the active screen are ignored. Once an exit
/// has been requested every further event is ignored too.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
///
/// use frontier::assets::TextureInfo;
/// use frontier::{
///     AssetError, AssetLoader, AssetManager, ButtonId, GameConfig, Textures, ViewEvent,
///     ViewStateMachine,
/// };
///
/// struct AnySize;
///
/// impl AssetLoader for AnySize {
///     fn load_texture(&mut self, _path: &Path) -> Result<TextureInfo, AssetError> {
///         Ok(TextureInfo { width: 32, height: 32 })
///     }
/// }
///
/// let config = GameConfig::default();
/// let textures = Textures::load(&mut AssetManager::new(), &mut AnySize, &config.assets)?;
/// let mut machine = ViewStateMachine::new(config, textures);
///
/// machine.handle(ViewEvent::ButtonClicked(ButtonId::Play));
/// machine.tick();
/// assert_eq!(machine.state().as_playing().map(|view| view.tick_count()), Some(1));
/// # Ok::<(), AssetError>(())
/// ```
pub struct ViewStateMachine {
    state: ViewState,
    ctx: ViewContext,
    exit_requested: bool,
}

impl ViewStateMachine {
    /// Start at the menu.
    pub fn new(config: GameConfig, textures: Textures) -> Self {
        log::info!("showing menu");
        Self {
            state: ViewState::Menu(MenuView::new()),
            ctx: ViewContext::new(config, textures),
            exit_requested: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Apply one event. Returns `false` if the event was ignored.
    pub fn handle(&mut self, event: ViewEvent) -> bool {
        if self.exit_requested {
            log::trace!("exit pending, ignoring {event:?}");
            return false;
        }
        if event == ViewEvent::CloseRequested {
            self.request_exit();
            return true;
        }

        let response = self.state.view_mut().handle(&event, &self.ctx);
        match response {
            Response::Ignored => {
                log::trace!("{} ignored {event:?}", self.state.name());
                return false;
            }
            Response::Handled => {}
            Response::Play => self.enter(ViewState::Playing(PlayingView::new(&self.ctx))),
            Response::End(game_over) => {
                log::info!("game over: {:?} ({})", game_over.outcome, game_over.message);
                self.enter(ViewState::End(EndView::new(game_over)));
            }
            Response::Exit => self.request_exit(),
        }
        true
    }

    /// Advance the active view by one frame.
    pub fn tick(&mut self) {
        if !self.exit_requested {
            self.state.view_mut().tick(&self.ctx);
        }
    }

    pub fn render_model(&self) -> RenderModel {
        self.state.view().render(&self.ctx)
    }

    fn enter(&mut self, next: ViewState) {
        log::info!("{} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    fn request_exit(&mut self) {
        log::info!("exit requested from {}", self.state.name());
        self.exit_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Direction;
    use crate::views::{tests::context, Outcome};

    fn machine() -> ViewStateMachine {
        let ctx = context();
        ViewStateMachine::new(ctx.config, ctx.textures)
    }

    fn lose() -> ViewEvent {
        ViewEvent::GameOver(GameOver::new(Outcome::Lose, "You Lost"))
    }

    #[test]
    fn starts_at_menu() {
        let machine = machine();
        assert!(machine.state().as_menu().is_some());
        assert!(!machine.exit_requested());
    }

    #[test]
    fn events_outside_the_table_are_no_ops() {
        let mut machine = machine();
        assert!(!machine.handle(lose()));
        assert!(!machine.handle(ViewEvent::ButtonClicked(ButtonId::Restart)));
        assert!(!machine.handle(ViewEvent::KeyDown(Key::ToggleConsole)));
        assert!(machine.state().as_menu().is_some());

        machine.handle(ViewEvent::ButtonClicked(ButtonId::Play));
        assert!(!machine.handle(ViewEvent::ButtonClicked(ButtonId::Play)));
        assert!(!machine.handle(ViewEvent::ButtonClicked(ButtonId::Restart)));
        assert_eq!(machine.state().as_playing().unwrap().tick_count(), 0);

        machine.handle(lose());
        assert!(!machine.handle(ViewEvent::ButtonClicked(ButtonId::HowToPlay)));
        assert!(!machine.handle(ViewEvent::KeyDown(Key::Move(Direction::Up))));
        assert!(!machine.handle(lose()));
        assert_eq!(machine.state().as_end().unwrap().message(), "You Lost");
    }

    #[test]
    fn exit_from_menu_and_end() {
        let mut machine = machine();
        assert!(machine.handle(ViewEvent::ButtonClicked(ButtonId::Exit)));
        assert!(machine.exit_requested());
        assert!(!machine.handle(ViewEvent::ButtonClicked(ButtonId::Play)));
        assert!(machine.state().as_menu().is_some());

        let mut machine = self::machine();
        machine.handle(ViewEvent::ButtonClicked(ButtonId::Play));
        machine.handle(lose());
        machine.handle(ViewEvent::ButtonClicked(ButtonId::Exit));
        assert!(machine.exit_requested());
    }

    #[test]
    fn close_request_exits_from_any_state() {
        let mut machine = machine();
        machine.handle(ViewEvent::ButtonClicked(ButtonId::Play));
        assert!(machine.handle(ViewEvent::CloseRequested));
        assert!(machine.exit_requested());

        machine.tick();
        assert_eq!(machine.state().as_playing().unwrap().tick_count(), 0);
    }

    #[test]
    fn ticks_only_advance_gameplay() {
        let mut machine = machine();
        machine.tick();
        assert!(machine.state().as_menu().is_some());

        machine.handle(ViewEvent::ButtonClicked(ButtonId::Play));
        machine.tick();
        machine.tick();
        assert_eq!(machine.state().as_playing().unwrap().tick_count(), 2);
    }

    #[test]
    fn restart_builds_a_fresh_game() {
        let mut machine = machine();
        machine.handle(ViewEvent::ButtonClicked(ButtonId::Play));
        machine.handle(ViewEvent::KeyDown(Key::ToggleConsole));
        machine.handle(ViewEvent::KeyDown(Key::Move(Direction::Left)));
        machine.tick();
        machine.handle(lose());

        machine.handle(ViewEvent::ButtonClicked(ButtonId::Restart));
        let playing = machine.state().as_playing().unwrap();
        assert_eq!(playing.tick_count(), 0);
        assert_eq!(playing.target().position, Vec2::ZERO);
        assert_eq!(playing.target().velocity, Vec2::ZERO);
        assert!(playing.console().transcript().is_empty());
        assert!(!playing.console().is_active());
    }

    #[test]
    fn render_model_follows_the_active_view() {
        let mut machine = machine();
        assert!(machine.render_model().world.is_none());
        machine.handle(ViewEvent::ButtonClicked(ButtonId::Play));
        assert!(machine.render_model().world.is_some());
        assert!(machine.render_model().background.is_none());
    }
}
