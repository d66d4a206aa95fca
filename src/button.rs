//! Physical button debouncing
//!
//! Buttons are active-low with a pull-up. A level change is accepted only
//! once it has been stable for the debounce delay. The short press fires on
//! the accepted press edge; the long press fires once per hold, later in the
//! same hold.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

use crate::config::Timings;
use crate::participant::Target;

/// Debounced button event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Accepted press edge
    Press,
    /// Press held past the long-press threshold
    LongPress,
}

/// Action bound to a button event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    /// Pause playing participants, resume paused ones, start the others
    TogglePlayback(Target),
    /// Stop playback and return to ready
    Stop(Target),
    /// Advance the effect selector
    CycleEffect,
    /// Do nothing
    Ignore,
}

/// Actions of a single button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonBinding {
    pub on_press: ButtonAction,
    pub on_long_press: ButtonAction,
}

impl ButtonBinding {
    /// Get the action bound to an event
    pub const fn action(&self, event: ButtonEvent) -> ButtonAction {
        match event {
            ButtonEvent::Press => self.on_press,
            ButtonEvent::LongPress => self.on_long_press,
        }
    }
}

/// Debounce state of a single button
#[derive(Clone, Debug)]
pub struct Debouncer {
    pressed: bool,
    last_reading: bool,
    last_debounce: Instant,
    press_start: Instant,
    long_press_fired: bool,
    debounce: Duration,
    long_press: Duration,
}

impl Debouncer {
    pub const fn new(debounce: Duration, long_press: Duration) -> Self {
        Self {
            pressed: false,
            last_reading: false,
            last_debounce: Instant::from_ticks(0),
            press_start: Instant::from_ticks(0),
            long_press_fired: false,
            debounce,
            long_press,
        }
    }

    /// Check if the debounced level is pressed
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feed one raw reading (`true` = pressed)
    pub fn update(&mut self, reading: bool, now: Instant) -> Option<ButtonEvent> {
        if reading != self.last_reading {
            self.last_debounce = now;
        }
        self.last_reading = reading;

        let mut event = None;
        let stable_for = now.saturating_duration_since(self.last_debounce);
        if stable_for >= self.debounce && reading != self.pressed {
            self.pressed = reading;
            self.long_press_fired = false;
            if reading {
                self.press_start = now;
                event = Some(ButtonEvent::Press);
            }
        }

        if event.is_none()
            && self.pressed
            && !self.long_press_fired
            && now.saturating_duration_since(self.press_start) > self.long_press
        {
            self.long_press_fired = true;
            event = Some(ButtonEvent::LongPress);
        }

        event
    }
}

/// Debounced button on an active-low input pin
pub struct Button<P: InputPin> {
    pin: P,
    debouncer: Debouncer,
    binding: ButtonBinding,
}

impl<P: InputPin> Button<P> {
    pub fn new(pin: P, binding: ButtonBinding, timings: &Timings) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(timings.debounce, timings.long_press),
            binding,
        }
    }

    /// Poll the pin, returning the action to run, if any
    ///
    /// A failed pin read is treated as no reading for this poll.
    pub fn poll(&mut self, now: Instant) -> Option<ButtonAction> {
        let pressed = match self.pin.is_low() {
            Ok(level) => level,
            Err(_e) => {
                crate::log!("button: pin read failed");
                return None;
            }
        };
        let event = self.debouncer.update(pressed, now)?;
        crate::log!("button: {:?}", event);
        Some(self.binding.action(event))
    }

    pub fn binding(&self) -> &ButtonBinding {
        &self.binding
    }
}
