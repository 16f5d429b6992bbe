use std::time::{Duration, Instant};

use anyhow::Result;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::Window,
};

use crate::config::GameConfig;
use crate::input::{InputMap, PointerState};
use crate::render::{RenderModel, Widget};
use crate::state::{ViewEvent, ViewStateMachine};

/// Turns render models into pixels. The engine never draws by itself.
pub trait Presenter {
    fn present(&mut self, window: &Window, model: &RenderModel) -> Result<()>;
}

/// Presenter that only logs a summary of each frame.
#[derive(Debug, Default)]
pub struct LogPresenter {
    frames: u64,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, _window: &Window, model: &RenderModel) -> Result<()> {
        self.frames += 1;
        log::trace!("frame {}: {}", self.frames, summarize(model));
        Ok(())
    }
}

/// One-line description of a frame, for logs.
pub fn summarize(model: &RenderModel) -> String {
    let mut buttons = 0;
    let mut dialogs = 0;
    let mut console_lines = 0;
    for widget in &model.widgets {
        match widget {
            Widget::Button(_) => buttons += 1,
            Widget::MessageBox(_) => dialogs += 1,
            Widget::ConsoleLine(_) => console_lines += 1,
        }
    }
    let camera = model
        .world
        .as_ref()
        .map(|world| world.camera.position.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "background={} camera={camera} buttons={buttons} dialogs={dialogs} console_lines={console_lines}",
        model.background.is_some(),
    )
}

/// Translate a winit key event into view events.
///
/// Repeats are dropped for mapped keys; typed text is always forwarded.
pub fn translate_key(input_map: &InputMap, event: &KeyEvent) -> Vec<ViewEvent> {
    let mut events = Vec::new();
    if let PhysicalKey::Code(code) = event.physical_key {
        if let Some(key) = input_map.key_for(code) {
            match event.state {
                ElementState::Pressed if !event.repeat => events.push(ViewEvent::KeyDown(key)),
                ElementState::Released => events.push(ViewEvent::KeyUp(key)),
                ElementState::Pressed => {}
            }
        }
    }
    if event.state == ElementState::Pressed {
        if let Some(text) = &event.text {
            events.push(ViewEvent::Text(text.to_string()));
        }
    }
    events
}

/// Most ticks run back to back after a stall; older ones are dropped.
const MAX_CATCH_UP_TICKS: u32 = 5;

/// Fixed-rate tick deadline for the event loop.
#[derive(Clone, Copy, Debug)]
pub struct TickClock {
    period: Duration,
    next_tick: Instant,
}

impl TickClock {
    /// A clock ticking `rate` times per second, first due one period after `start`.
    pub fn new(rate: f64, start: Instant) -> Self {
        let period = Duration::from_secs_f64(1.0 / rate);
        Self {
            period,
            next_tick: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the loop should wake for the next tick.
    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    /// Number of ticks due at `now`, advancing the deadline past them.
    ///
    /// After a long stall at most [`MAX_CATCH_UP_TICKS`] are reported and the
    /// schedule restarts from `now`.
    pub fn due(&mut self, now: Instant) -> u32 {
        if now < self.next_tick {
            return 0;
        }
        let behind = now - self.next_tick;
        let missed = (behind.as_secs_f64() / self.period.as_secs_f64()) as u64;
        if missed >= u64::from(MAX_CATCH_UP_TICKS) {
            log::debug!("tick clock {behind:?} behind, skipping ahead");
            self.next_tick = now + self.period;
            return MAX_CATCH_UP_TICKS;
        }
        let count = missed as u32 + 1;
        self.next_tick += self.period * count;
        count
    }
}

/// Main entrypoint: opens the window and drives a [`ViewStateMachine`].
pub struct Engine {
    config: GameConfig,
    input_map: InputMap,
}

impl Engine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            input_map: InputMap::default(),
        }
    }

    /// Replace the default key bindings.
    #[must_use]
    pub fn with_input_map(mut self, input_map: InputMap) -> Self {
        self.input_map = input_map;
        self
    }

    /// Run until the window is closed or a view requests exit.
    ///
    /// Events are applied in arrival order. The machine is ticked at
    /// `tick_rate` per second, and every tick requests a redraw.
    #[allow(deprecated)]
    pub fn run<P: Presenter + 'static>(
        self,
        mut machine: ViewStateMachine,
        mut presenter: P,
    ) -> Result<()> {
        let Engine { config, input_map } = self;

        let event_loop = EventLoop::new()?;
        let mut window_attributes = Window::default_attributes();
        window_attributes.title = config.title.clone();
        window_attributes.inner_size = Some(LogicalSize::new(config.width, config.height).into());
        window_attributes.resizable = false;
        let window = event_loop.create_window(window_attributes)?;
        log::info!("window {}x{} \"{}\" created", config.width, config.height, config.title);

        let mut pointer = PointerState::new();
        let mut clock = TickClock::new(config.tick_rate, Instant::now());

        event_loop.run(move |event, elwt| {
            match event {
                Event::WindowEvent { event, .. } => {
                    let view_events = match event {
                        WindowEvent::CloseRequested => vec![ViewEvent::CloseRequested],
                        WindowEvent::KeyboardInput { event, .. } => translate_key(&input_map, &event),
                        WindowEvent::CursorMoved { position, .. } => {
                            let logical = position.to_logical::<f64>(window.scale_factor());
                            pointer
                                .handle_cursor_moved(logical.x, logical.y)
                                .map(|delta| vec![ViewEvent::MouseDrag { delta }])
                                .unwrap_or_default()
                        }
                        WindowEvent::MouseInput { state, button, .. } => {
                            let pressed = state == ElementState::Pressed;
                            pointer.handle_mouse_button(button, pressed);
                            let position = pointer.position();
                            if pressed {
                                vec![ViewEvent::MousePress { position, button }]
                            } else {
                                vec![ViewEvent::MouseRelease { position, button }]
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            if let Err(err) = presenter.present(&window, &machine.render_model()) {
                                log::error!("Encountered error during present: {err:?}");
                                elwt.exit();
                            }
                            Vec::new()
                        }
                        _ => Vec::new(),
                    };

                    for view_event in view_events {
                        machine.handle(view_event);
                    }
                    if machine.exit_requested() {
                        elwt.exit();
                    }
                }
                Event::AboutToWait => {
                    let due = clock.due(Instant::now());
                    for _ in 0..due {
                        machine.tick();
                    }
                    if machine.exit_requested() {
                        elwt.exit();
                        return;
                    }
                    if due > 0 {
                        window.request_redraw();
                    }
                    elwt.set_control_flow(ControlFlow::WaitUntil(clock.next_tick()));
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;
    use crate::render::{ButtonWidget, Rect};

    const RATE: f64 = 50.0;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn nothing_is_due_before_the_first_period() {
        let start = Instant::now();
        let mut clock = TickClock::new(RATE, start);
        assert_eq!(clock.period(), ms(20));
        assert_eq!(clock.next_tick(), start + ms(20));
        assert_eq!(clock.due(start), 0);
        assert_eq!(clock.due(start + ms(19)), 0);
    }

    #[test]
    fn one_tick_per_elapsed_period() {
        let start = Instant::now();
        let mut clock = TickClock::new(RATE, start);
        assert_eq!(clock.due(start + ms(20)), 1);
        assert_eq!(clock.next_tick(), start + ms(40));
        // Polling again inside the same period does not tick twice.
        assert_eq!(clock.due(start + ms(25)), 0);
        assert_eq!(clock.due(start + ms(85)), 3);
        assert_eq!(clock.next_tick(), start + ms(100));
    }

    #[test]
    fn long_stalls_are_capped() {
        let start = Instant::now();
        let mut clock = TickClock::new(RATE, start);
        let late = start + Duration::from_secs(10);
        assert_eq!(clock.due(late), MAX_CATCH_UP_TICKS);
        assert_eq!(clock.next_tick(), late + ms(20));
        assert_eq!(clock.due(late + ms(10)), 0);
    }

    #[test]
    fn summary_counts_widgets() {
        let mut model = RenderModel::new(Rgb::WHITE);
        model.add_button(ButtonWidget {
            id: None,
            label: "x".into(),
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            style: Default::default(),
        });
        assert_eq!(
            summarize(&model),
            "background=false camera=- buttons=1 dialogs=0 console_lines=0"
        );
    }
}
