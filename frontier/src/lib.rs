//! Frontier - view state machine, camera follow and debug console for a
//! small 2D arcade prototype.
//!
//! The window host lives in [`engine`]; everything else is plain state that
//! can be driven and inspected without a window.

pub mod assets;
pub mod camera;
pub mod commands;
pub mod config;
pub mod console;
pub mod engine;
pub mod input;
pub mod math;
pub mod render;
pub mod state;
pub mod views;

pub use crate::assets::{AssetError, AssetLoader, AssetManager, ImageLoader, TextureHandle, Textures};
pub use crate::camera::{center_on, CameraFollow, CameraTarget, Direction, Offset, Viewport};
pub use crate::commands::{CommandError, DebugCommand, DebugShell};
pub use crate::config::{ConfigError, GameConfig, Style, StylePreset};
pub use crate::console::{ConsoleEntry, ConsoleSession, EntryKind, Evaluator};
pub use crate::engine::{Engine, LogPresenter, Presenter, TickClock};
pub use crate::input::{InputMap, Key, PointerState};
pub use crate::math::{Camera2D, Vec2};
pub use crate::render::{RenderModel, Widget};
pub use crate::state::{ViewEvent, ViewState, ViewStateMachine};
pub use crate::views::{ButtonId, EndView, GameOver, MenuView, Outcome, PlayingView};
pub use winit::{event::MouseButton, keyboard::KeyCode};
