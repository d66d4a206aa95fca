mod tests {
    use core::cell::Cell;
    use core::convert::Infallible;

    use embedded_hal::digital::{ErrorType, InputPin};
    use heapless::Vec as HVec;
    use session_strip::color::{BLACK, BLUE};
    use session_strip::config::NUM_LEDS;
    use session_strip::dispatcher::MAX_ENDPOINTS;
    use session_strip::{
        ButtonAction, Controller, ControllerConfig, EffectId, EndpointId, Instant, OutputDriver,
        PlayerId, PlayerState, Rgb, Session, Target, Transport,
    };

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

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

    struct MockOutput {
        writes: usize,
        last: [Rgb; NUM_LEDS],
    }

    impl MockOutput {
        fn new() -> Self {
            Self {
                writes: 0,
                last: [BLACK; NUM_LEDS],
            }
        }
    }

    impl OutputDriver for MockOutput {
        fn write(&mut self, colors: &[Rgb]) {
            self.writes += 1;
            self.last.copy_from_slice(colors);
        }
    }

    #[derive(Default)]
    struct MockTransport {
        connected: Vec<EndpointId>,
        sent: Vec<String>,
    }

    impl Transport for MockTransport {
        type Error = Infallible;

        fn endpoints(&self) -> HVec<EndpointId, MAX_ENDPOINTS> {
            self.connected.iter().copied().collect()
        }

        fn send_text(&mut self, _endpoint: EndpointId, frame: &str) -> Result<(), Self::Error> {
            self.sent.push(frame.to_string());
            Ok(())
        }
    }

    fn connected_transport() -> MockTransport {
        MockTransport {
            connected: vec![1],
            ..Default::default()
        }
    }

    fn run<O, T, P1, P2>(controller: &mut Controller<'_, O, T, P1, P2>, from: u64, to: u64)
    where
        O: OutputDriver,
        T: Transport,
        P1: InputPin,
        P2: InputPin,
    {
        for ms in (from..to).step_by(10) {
            controller.tick(at(ms));
        }
    }

    #[test]
    fn test_play_pause_button_toggles_both() {
        let config = ControllerConfig::default();
        let session = Session::with_config(&config);
        let button1 = Cell::new(true);
        let button2 = Cell::new(false);
        let mut controller = Controller::new(
            &session,
            &config,
            MockOutput::new(),
            connected_transport(),
            MockPin { pressed: &button1 },
            MockPin { pressed: &button2 },
        );

        run(&mut controller, 0, 60);
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Playing);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Playing);
        assert_eq!(
            controller.dispatcher().transport().sent,
            vec![
                r#"{"command":"play","player":1}"#,
                r#"{"command":"play","player":2}"#,
            ]
        );

        button1.set(false);
        run(&mut controller, 60, 400);
        button1.set(true);
        run(&mut controller, 400, 500);
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Paused);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Paused);
        assert_eq!(
            &controller.dispatcher().transport().sent[2..],
            &[
                r#"{"command":"pause","player":1}"#,
                r#"{"command":"pause","player":2}"#,
            ]
        );
    }

    #[test]
    fn test_long_press_stops_both() {
        let config = ControllerConfig::default();
        let session = Session::with_config(&config);
        let button1 = Cell::new(true);
        let button2 = Cell::new(false);
        let mut controller = Controller::new(
            &session,
            &config,
            MockOutput::new(),
            connected_transport(),
            MockPin { pressed: &button1 },
            MockPin { pressed: &button2 },
        );

        run(&mut controller, 0, 1100);
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Ready);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Ready);
        let sent = &controller.dispatcher().transport().sent;
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[2], r#"{"command":"stop","player":1}"#);
        assert_eq!(sent[3], r#"{"command":"stop","player":2}"#);
    }

    #[test]
    fn test_second_button_drives_player_two_and_resets() {
        let config = ControllerConfig::default();
        let session = Session::with_config(&config);
        let button1 = Cell::new(false);
        let button2 = Cell::new(true);
        let mut controller = Controller::new(
            &session,
            &config,
            MockOutput::new(),
            connected_transport(),
            MockPin { pressed: &button1 },
            MockPin { pressed: &button2 },
        );

        run(&mut controller, 0, 60);
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Disconnected);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Playing);
        assert_eq!(
            controller.dispatcher().transport().sent,
            vec![r#"{"command":"play","player":2}"#]
        );

        run(&mut controller, 60, 1100);
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Ready);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Ready);
        assert_eq!(session.snapshot(PlayerId::Two).progress, 0.0);
        assert_eq!(
            &controller.dispatcher().transport().sent[1..],
            &[
                r#"{"command":"stop","player":1}"#,
                r#"{"command":"stop","player":2}"#,
            ]
        );
        assert_eq!(session.effect(), EffectId::Progress);
    }

    #[test]
    fn test_effect_can_be_bound_to_a_button() {
        let mut config = ControllerConfig::default();
        config.effect_stop_button.on_long_press = ButtonAction::CycleEffect;
        let session = Session::with_config(&config);
        let button1 = Cell::new(false);
        let button2 = Cell::new(true);
        let mut controller = Controller::new(
            &session,
            &config,
            MockOutput::new(),
            MockTransport::default(),
            MockPin { pressed: &button1 },
            MockPin { pressed: &button2 },
        );

        run(&mut controller, 0, 1100);
        assert_eq!(session.effect(), EffectId::ReadyBlink);
        assert_eq!(controller.session().effect(), EffectId::ReadyBlink);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Playing);
        assert!(controller.dispatcher().transport().sent.is_empty());
    }

    #[test]
    fn test_toggle_skips_headset_paused_participant() {
        let config = ControllerConfig::default();
        let session = Session::with_config(&config);
        let button1 = Cell::new(false);
        let button2 = Cell::new(false);
        let mut controller = Controller::new(
            &session,
            &config,
            MockOutput::new(),
            connected_transport(),
            MockPin { pressed: &button1 },
            MockPin { pressed: &button2 },
        );

        assert!(session.handle_frame(1, "led1:40", at(0)).is_ok());
        assert!(
            session
                .handle_frame(1, r#"{"command":"off","player":1}"#, at(0))
                .is_ok()
        );
        assert_eq!(
            session.snapshot(PlayerId::One).state,
            PlayerState::PausedByHeadset
        );

        button1.set(true);
        run(&mut controller, 0, 60);
        let participant = session.snapshot(PlayerId::One);
        assert_eq!(participant.state, PlayerState::PausedByHeadset);
        assert_eq!(participant.progress, 0.4);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Playing);
        assert_eq!(
            controller.dispatcher().transport().sent,
            vec![r#"{"command":"play","player":2}"#]
        );

        assert!(
            session
                .toggle_playback(Target::Player(PlayerId::One), at(100))
                .is_empty()
        );
        assert!(
            session
                .handle_frame(1, r#"{"command":"on","player":1}"#, at(200))
                .is_ok()
        );
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Playing);
    }

    #[test]
    fn test_silent_participant_is_disconnected() {
        let config = ControllerConfig::default();
        let session = Session::with_config(&config);
        let released = Cell::new(false);
        let mut controller = Controller::new(
            &session,
            &config,
            MockOutput::new(),
            MockTransport::default(),
            MockPin { pressed: &released },
            MockPin { pressed: &released },
        );

        assert!(session.handle_frame(1, r#"{"command":"on1"}"#, at(0)).is_ok());
        controller.tick(at(5000));
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Ready);
        controller.tick(at(5001));
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Disconnected);
    }

    #[test]
    fn test_transport_disconnect_unbinds_participant() {
        let session = Session::with_config(&ControllerConfig::default());
        assert!(
            session
                .handle_frame(7, r#"{"player":2,"status":"ready"}"#, at(0))
                .is_ok()
        );
        assert_eq!(session.snapshot(PlayerId::Two).endpoint, Some(7));

        assert!(session.handle_disconnect(3).is_empty());
        let disconnected = session.handle_disconnect(7);
        assert_eq!(disconnected.as_slice(), &[PlayerId::Two]);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Disconnected);
    }

    #[test]
    fn test_malformed_frame_changes_nothing() {
        let session = Session::with_config(&ControllerConfig::default());
        assert!(session.handle_frame(1, "led3:50", at(0)).is_err());
        assert!(session.handle_frame(1, r#"{"player":9}"#, at(0)).is_err());
        assert_eq!(session.snapshot(PlayerId::One).state, PlayerState::Disconnected);
        assert_eq!(session.snapshot(PlayerId::Two).state, PlayerState::Disconnected);
    }

    #[test]
    fn test_frames_are_pushed_at_render_interval() {
        let config = ControllerConfig::default();
        let session = Session::with_config(&config);
        let released = Cell::new(false);
        let mut controller = Controller::new(
            &session,
            &config,
            MockOutput::new(),
            MockTransport::default(),
            MockPin { pressed: &released },
            MockPin { pressed: &released },
        );

        assert!(session.handle_frame(1, "led1:50", at(0)).is_ok());
        run(&mut controller, 0, 300);
        assert_eq!(controller.output().writes, 3);
        let frame = controller.output().last;
        assert_eq!(controller.renderer().frame(), &frame);
        assert!(frame[..4].iter().all(|c| *c == BLUE));
        assert!(frame[4..].iter().all(|c| *c == BLACK));
    }

    #[test]
    fn test_tick_pacing() {
        let config = ControllerConfig::default();
        let session = Session::with_config(&config);
        let released = Cell::new(false);
        let mut controller = Controller::new(
            &session,
            &config,
            MockOutput::new(),
            MockTransport::default(),
            MockPin { pressed: &released },
            MockPin { pressed: &released },
        );

        let result = controller.tick(at(0));
        assert!(result.rendered);
        assert_eq!(result.next_deadline, at(10));
        assert_eq!(result.sleep_duration.as_millis(), 10);

        let result = controller.tick(at(14));
        assert!(!result.rendered);
        assert_eq!(result.next_deadline, at(20));
        assert_eq!(result.sleep_duration.as_millis(), 6);

        // Long stall: the schedule restarts from now
        let result = controller.tick(at(5000));
        assert_eq!(result.next_deadline, at(5010));
        assert_eq!(result.sleep_duration.as_millis(), 10);
    }
}
