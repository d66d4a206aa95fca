mod tests {
    use core::cell::Cell;
    use core::convert::Infallible;

    use embedded_hal::digital::{ErrorType, InputPin};
    use session_strip::config::{DEBOUNCE_DELAY_MS, LONG_PRESS_TIME_MS};
    use session_strip::{
        Button, ButtonAction, ButtonBinding, ButtonEvent, Debouncer, Duration, Instant, PlayerId,
        Target, Timings,
    };

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn debouncer() -> Debouncer {
        Debouncer::new(
            Duration::from_millis(DEBOUNCE_DELAY_MS),
            Duration::from_millis(LONG_PRESS_TIME_MS),
        )
    }

    /// Active-low pin whose level is driven by the test
    struct MockPin<'a> {
        pressed: &'a Cell<bool>,
    }

    impl ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.pressed.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.pressed.get())
        }
    }

    /// Poll every 10 ms over `[from, to)`, collecting events
    fn hold(
        debouncer: &mut Debouncer,
        reading: bool,
        from: u64,
        to: u64,
    ) -> Vec<(u64, ButtonEvent)> {
        (from..to)
            .step_by(10)
            .filter_map(|ms| debouncer.update(reading, at(ms)).map(|event| (ms, event)))
            .collect()
    }

    #[test]
    fn test_press_fires_after_debounce() {
        let mut debouncer = debouncer();
        assert_eq!(debouncer.update(true, at(0)), None);
        assert_eq!(debouncer.update(true, at(49)), None);
        assert_eq!(debouncer.update(true, at(50)), Some(ButtonEvent::Press));
        assert!(debouncer.is_pressed());
        assert_eq!(debouncer.update(true, at(60)), None);
    }

    #[test]
    fn test_bounce_restarts_debounce() {
        let mut debouncer = debouncer();
        assert_eq!(debouncer.update(true, at(0)), None);
        assert_eq!(debouncer.update(false, at(20)), None);
        assert_eq!(debouncer.update(true, at(30)), None);
        assert_eq!(debouncer.update(true, at(70)), None);
        assert_eq!(debouncer.update(true, at(80)), Some(ButtonEvent::Press));
    }

    #[test]
    fn test_long_press_fires_once() {
        let mut debouncer = debouncer();
        let events = hold(&mut debouncer, true, 0, 3000);
        assert_eq!(
            events,
            vec![(50, ButtonEvent::Press), (1060, ButtonEvent::LongPress)]
        );
    }

    #[test]
    fn test_long_press_threshold_is_strict() {
        let mut debouncer = debouncer();
        debouncer.update(true, at(0));
        assert_eq!(debouncer.update(true, at(50)), Some(ButtonEvent::Press));
        assert_eq!(debouncer.update(true, at(1050)), None);
        assert_eq!(debouncer.update(true, at(1051)), Some(ButtonEvent::LongPress));
    }

    #[test]
    fn test_short_press_has_no_long_press() {
        let mut debouncer = debouncer();
        let mut events = hold(&mut debouncer, true, 0, 300);
        events.extend(hold(&mut debouncer, false, 300, 3000));
        assert_eq!(events, vec![(50, ButtonEvent::Press)]);
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_second_hold_fires_again() {
        let mut debouncer = debouncer();
        let mut events = hold(&mut debouncer, true, 0, 1500);
        events.extend(hold(&mut debouncer, false, 1500, 2000));
        events.extend(hold(&mut debouncer, true, 2000, 3500));
        assert_eq!(
            events,
            vec![
                (50, ButtonEvent::Press),
                (1060, ButtonEvent::LongPress),
                (2050, ButtonEvent::Press),
                (3060, ButtonEvent::LongPress),
            ]
        );
    }

    #[test]
    fn test_binding_actions() {
        let binding = ButtonBinding {
            on_press: ButtonAction::TogglePlayback(Target::Player(PlayerId::Two)),
            on_long_press: ButtonAction::CycleEffect,
        };
        assert_eq!(
            binding.action(ButtonEvent::Press),
            ButtonAction::TogglePlayback(Target::Player(PlayerId::Two))
        );
        assert_eq!(binding.action(ButtonEvent::LongPress), ButtonAction::CycleEffect);
    }

    #[test]
    fn test_button_reads_active_low_pin() {
        let pressed = Cell::new(false);
        let binding = ButtonBinding {
            on_press: ButtonAction::TogglePlayback(Target::All),
            on_long_press: ButtonAction::Stop(Target::All),
        };
        let mut button = Button::new(MockPin { pressed: &pressed }, binding, &Timings::new());

        assert_eq!(button.poll(at(0)), None);
        pressed.set(true);
        assert_eq!(button.poll(at(10)), None);
        assert_eq!(
            button.poll(at(60)),
            Some(ButtonAction::TogglePlayback(Target::All))
        );
        assert_eq!(button.poll(at(500)), None);
        assert_eq!(button.poll(at(1061)), Some(ButtonAction::Stop(Target::All)));
        assert_eq!(button.binding(), &binding);
    }
}
