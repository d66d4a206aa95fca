//! Cooperative poll loop
//!
//! Provides portable pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between ticks.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

use crate::OutputDriver;
use crate::button::{Button, ButtonAction};
use crate::config::ControllerConfig;
use crate::dispatcher::{Dispatcher, Transport};
use crate::liveness::LivenessMonitor;
use crate::renderer::Renderer;
use crate::session::Session;

/// Result of a poll tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether a frame was pushed to the strip during this tick.
    pub rendered: bool,
}

/// Session controller driving buttons, liveness and rendering.
///
/// Each tick:
/// - Polls both buttons and runs their bound actions
/// - Disconnects participants that timed out
/// - Renders and pushes a frame when the render interval has elapsed
///
/// # Usage
///
/// ```ignore
/// static SESSION: Session = Session::new(Timings::new(), EffectId::Progress);
///
/// let mut controller = Controller::new(&SESSION, &config, strip, transport, button1, button2);
///
/// loop {
///     let result = controller.tick(Instant::now());
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct Controller<'a, O, T, P1, P2>
where
    O: OutputDriver,
    T: Transport,
    P1: InputPin,
    P2: InputPin,
{
    session: &'a Session,
    renderer: Renderer,
    liveness: LivenessMonitor,
    output: O,
    dispatcher: Dispatcher<T>,
    play_pause: Button<P1>,
    effect_stop: Button<P2>,
    next_tick: Instant,
    poll_interval: Duration,
}

impl<'a, O, T, P1, P2> Controller<'a, O, T, P1, P2>
where
    O: OutputDriver,
    T: Transport,
    P1: InputPin,
    P2: InputPin,
{
    /// Create a new controller.
    ///
    /// Timing thresholds are taken from the session, button actions from
    /// `config`.
    pub fn new(
        session: &'a Session,
        config: &ControllerConfig,
        output: O,
        transport: T,
        play_pause: P1,
        effect_stop: P2,
    ) -> Self {
        let timings = *session.timings();
        Self {
            session,
            renderer: Renderer::new(timings),
            liveness: LivenessMonitor::new(timings.liveness_timeout),
            output,
            dispatcher: Dispatcher::new(transport),
            play_pause: Button::new(play_pause, config.play_pause_button, &timings),
            effect_stop: Button::new(effect_stop, config.effect_stop_button, &timings),
            next_tick: Instant::from_millis(0),
            poll_interval: timings.poll_interval,
        }
    }

    /// Run one iteration of the poll loop and return timing information.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        // Skip the backlog after long stalls instead of catching up
        let max_drift = self.poll_interval.as_millis() * 2;
        if now.as_millis() > self.next_tick.as_millis() + max_drift {
            self.next_tick = now;
        }

        self.poll_buttons(now);

        let liveness = &self.liveness;
        self.session
            .lock(|state| liveness.check(&mut state.participants, now));

        let renderer = &mut self.renderer;
        let rendered = self.session.lock(|state| renderer.render(now, state));
        if rendered {
            self.output.write(self.renderer.frame());
        }

        self.next_tick += self.poll_interval;
        let sleep_duration = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
            rendered,
        }
    }

    fn poll_buttons(&mut self, now: Instant) {
        if let Some(action) = self.play_pause.poll(now) {
            self.run_action(action, now);
        }
        if let Some(action) = self.effect_stop.poll(now) {
            self.run_action(action, now);
        }
    }

    /// Run a button action, broadcasting the resulting commands
    pub fn run_action(&mut self, action: ButtonAction, now: Instant) {
        let commands = match action {
            ButtonAction::TogglePlayback(target) => self.session.toggle_playback(target, now),
            ButtonAction::Stop(target) => self.session.stop(target, now),
            ButtonAction::CycleEffect => {
                self.session.apply(crate::Intent::CycleEffect, now);
                return;
            }
            ButtonAction::Ignore => return,
        };
        for (command, player) in commands {
            self.dispatcher.send_logged(command, player);
        }
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// Get a reference to the renderer.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }
}
