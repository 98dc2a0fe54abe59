//! Roll Ball headless runner
//!
//! Drives the gameplay state against a tiny stand-in physics world so the
//! simulation can be exercised natively without an engine:
//!
//! ```text
//! roll-ball [--seconds N] [--prefs PATH] [--settings PATH] [--reset-high-score]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::{Vec2, Vec3, Vec4};

    use roll_ball::audio::AudioManager;
    use roll_ball::consts::FRAME_DT;
    use roll_ball::persistence::{FileStore, KeyValueStore};
    use roll_ball::platform::{Collaborators, ForceMode, Hud, PhysicsBody, SceneLoader, TimeControl};
    use roll_ball::settings::Settings;
    use roll_ball::sim::animation::{AnimationConfig, Animator, Bob, Spin, Transform};
    use roll_ball::sim::{ContactEvent, ContactOutcome, ContactTag, GameState, TickInput, dispatch_contact, tick};
    use roll_ball::ui::{DEFAULT_TWEEN, Panel, UiAnimator};

    const GRAVITY: f32 = 9.81;
    const BALL_RADIUS: f32 = 0.5;

    struct Options {
        seconds: f32,
        prefs: String,
        settings: Option<String>,
        reset_high_score: bool,
    }

    fn parse_args() -> Result<Options, String> {
        let mut opts = Options {
            seconds: 30.0,
            prefs: "roll_ball_prefs.json".to_string(),
            settings: None,
            reset_high_score: false,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seconds" => {
                    let v = args.next().ok_or("--seconds needs a value")?;
                    opts.seconds = v.parse().map_err(|_| format!("bad --seconds value: {}", v))?;
                }
                "--prefs" => opts.prefs = args.next().ok_or("--prefs needs a path")?,
                "--settings" => opts.settings = Some(args.next().ok_or("--settings needs a path")?),
                "--reset-high-score" => opts.reset_high_score = true,
                other => return Err(format!("unknown argument: {}", other)),
            }
        }
        Ok(opts)
    }

    /// Logs HUD updates
    struct ConsoleHud;

    impl Hud for ConsoleHud {
        fn set_max_health(&mut self, max: u32) {
            log::info!("[hud] max health {}", max);
        }
        fn set_health(&mut self, health: u32) {
            log::info!("[hud] health {}", health);
        }
        fn set_score(&mut self, text: &str) {
            log::debug!("[hud] {}", text);
        }
        fn set_high_score(&mut self, text: &str) {
            log::debug!("[hud] {}", text);
        }
        fn show_pause_menu(&mut self, visible: bool) {
            log::info!("[hud] pause menu {}", if visible { "shown" } else { "hidden" });
        }
        fn show_final_score(&mut self, text: &str) {
            log::info!("[hud] {}", text);
        }
        fn hide_final_score(&mut self) {}
    }

    /// Point-mass ball integrated with explicit Euler
    struct Body {
        position: Vec3,
        velocity: Vec3,
        dt: f32,
    }

    impl PhysicsBody for Body {
        fn add_force(&mut self, force: Vec3, mode: ForceMode) {
            // Unit mass
            match mode {
                ForceMode::Force | ForceMode::Acceleration => self.velocity += force * self.dt,
                ForceMode::Impulse => self.velocity += force,
            }
        }
    }

    impl Body {
        fn integrate(&mut self) {
            self.velocity.y -= GRAVITY * self.dt;
            // Rolling resistance
            self.velocity.x *= 0.98;
            self.velocity.z *= 0.98;
            self.position += self.velocity * self.dt;
            if self.position.y < BALL_RADIUS {
                self.position.y = BALL_RADIUS;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }
    }

    struct Clock {
        scale: f32,
    }

    impl TimeControl for Clock {
        fn set_time_scale(&mut self, scale: f32) {
            self.scale = scale;
        }
        fn set_cursor_captured(&mut self, _captured: bool) {}
    }

    #[derive(Default)]
    struct Scenes {
        reload: bool,
        quit: bool,
    }

    impl SceneLoader for Scenes {
        fn reload_current(&mut self) {
            self.reload = true;
        }
        fn load_main_menu(&mut self) {
            self.quit = true;
        }
        fn quit(&mut self) {
            self.quit = true;
        }
    }

    /// Axis-aligned region of the test level
    struct Zone {
        tag: ContactTag,
        min: Vec3,
        max: Vec3,
        trigger: bool,
        inside: bool,
        /// Spinning, bobbing pickup visual
        visual: Option<Animator>,
        consumed: bool,
    }

    impl Zone {
        fn solid(tag: ContactTag, min: Vec3, max: Vec3) -> Self {
            Self {
                tag,
                min,
                max,
                trigger: false,
                inside: false,
                visual: None,
                consumed: false,
            }
        }

        fn trigger(tag: ContactTag, min: Vec3, max: Vec3) -> Self {
            Self {
                trigger: true,
                ..Self::solid(tag, min, max)
            }
        }

        fn touches(&self, p: Vec3) -> bool {
            let r = Vec3::splat(BALL_RADIUS);
            p.cmpge(self.min - r).all() && p.cmple(self.max + r).all()
        }
    }

    fn build_level() -> Vec<Zone> {
        let heart_center = Vec3::new(12.0, 1.0, 0.0);
        let heart_visual = Animator::new(
            AnimationConfig {
                spin: Some(Spin::default()),
                bob: Some(Bob::default()),
                ..Default::default()
            },
            Transform::from_position(heart_center),
            Some(Vec4::new(1.0, 0.2, 0.3, 1.0)),
            7,
        );
        let mut heart = Zone::trigger(
            ContactTag::Heart,
            heart_center - Vec3::splat(0.5),
            heart_center + Vec3::splat(0.5),
        );
        heart.visual = Some(heart_visual);

        vec![
            Zone::solid(
                ContactTag::Ground,
                Vec3::new(-1000.0, -1.0, -1000.0),
                Vec3::new(1000.0, 0.0, 1000.0),
            ),
            Zone::solid(ContactTag::Spike, Vec3::new(6.0, 0.0, -1.0), Vec3::new(7.0, 0.5, 1.0)),
            heart,
            Zone::trigger(ContactTag::Water, Vec3::new(16.0, 0.0, -5.0), Vec3::new(22.0, 2.0, 5.0)),
            Zone::solid(ContactTag::Spike, Vec3::new(26.0, 0.0, -1.0), Vec3::new(28.0, 0.5, 1.0)),
            Zone::solid(ContactTag::Obstacle, Vec3::new(30.0, 0.0, -1.0), Vec3::new(31.0, 1.0, 1.0)),
            Zone::solid(ContactTag::Spike, Vec3::new(34.0, 0.0, -1.0), Vec3::new(36.0, 0.5, 1.0)),
        ]
    }

    /// Emit begin/end events for zones the ball entered or left this frame
    fn detect_contacts(zones: &mut [Zone], position: Vec3) -> Vec<(usize, ContactEvent)> {
        let mut events = Vec::new();
        for (i, zone) in zones.iter_mut().enumerate() {
            if zone.consumed {
                continue;
            }
            let touching = zone.touches(position);
            if touching == zone.inside {
                continue;
            }
            zone.inside = touching;
            let event = match (zone.trigger, touching) {
                (false, true) => ContactEvent::CollisionBegin(zone.tag),
                (false, false) => ContactEvent::CollisionEnd(zone.tag),
                (true, true) => ContactEvent::TriggerEnter(zone.tag),
                (true, false) => ContactEvent::TriggerExit(zone.tag),
            };
            events.push((i, event));
        }
        events
    }

    pub fn run() {
        env_logger::init();
        let opts = match parse_args() {
            Ok(opts) => opts,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        };
        log::info!("Roll Ball (headless) starting...");

        let mut store = FileStore::open_or_empty(&opts.prefs);
        let settings = match &opts.settings {
            Some(path) => match std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()))
            {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Could not load settings from {}: {} - using defaults", path, e);
                    Settings::default()
                }
            },
            None => Settings::load(&store),
        };

        let mut state = GameState::new(&settings, Some(&store as &dyn KeyValueStore));
        let mut hud = ConsoleHud;
        let mut audio = AudioManager::new(&settings.audio);
        let mut body = Body {
            position: Vec3::new(0.0, 3.0, 0.0),
            velocity: Vec3::ZERO,
            dt: FRAME_DT,
        };
        let mut clock = Clock { scale: 1.0 };
        let mut scenes = Scenes::default();
        let mut level = build_level();
        let mut ui = UiAnimator::new();
        let game_over_panel = ui.add_panel(Panel {
            alpha: 0.0,
            ..Default::default()
        });
        let mut showed_game_over = false;

        let frames = (opts.seconds / FRAME_DT).ceil() as u64;
        for frame in 0..frames {
            let t = frame as f32 * FRAME_DT;
            let input = TickInput {
                movement: Vec2::new(1.0, 0.0),
                // Tap jump every two seconds
                jump: frame % 120 == 60,
                // Pause for one second at the 5 second mark
                pause: frame == 300 || frame == 360,
            };

            let mut ctx = Collaborators {
                hud: Some(&mut hud),
                audio: Some(&mut audio),
                body: Some(&mut body),
                time: Some(&mut clock),
                scene: Some(&mut scenes),
                store: Some(&mut store),
            };

            if frame == 0 {
                if opts.reset_high_score {
                    state.session.reset_high_score(&mut ctx);
                }
                state.start(&mut ctx);
            }

            tick(&mut state, &input, FRAME_DT, &mut ctx);
            drop(ctx);

            if state.session.is_running() {
                body.integrate();
            }

            for (i, event) in detect_contacts(&mut level, body.position) {
                let mut ctx = Collaborators {
                    hud: Some(&mut hud),
                    audio: Some(&mut audio),
                    time: Some(&mut clock),
                    store: Some(&mut store),
                    ..Default::default()
                };
                if dispatch_contact(&mut state, event, &mut ctx) == ContactOutcome::Consume {
                    let zone = &mut level[i];
                    zone.consumed = true;
                    if let Some(visual) = zone.visual.as_mut() {
                        visual.play_collect();
                    }
                    log::info!("Picked up {} at t={:.2}s", zone.tag.as_str(), t);
                }
            }

            let scaled_dt = FRAME_DT * clock.scale;
            for zone in level.iter_mut() {
                if let Some(visual) = zone.visual.as_mut() {
                    visual.update(scaled_dt, None);
                }
            }
            level.retain(|z| !z.visual.as_ref().is_some_and(Animator::should_despawn));

            if state.session.is_game_over() && !showed_game_over {
                ui.fade_in(game_over_panel, DEFAULT_TWEEN);
                showed_game_over = true;
            }
            ui.update(FRAME_DT);

            if scenes.reload || scenes.quit {
                break;
            }
            if showed_game_over && !ui.is_animating() {
                break;
            }
        }

        let mut ctx = Collaborators {
            store: Some(&mut store),
            ..Default::default()
        };
        state.session.shutdown(&mut ctx);
        log::info!(
            "Run finished at x={:.1}: score {}, high score {}, health {}/{}",
            body.position.x,
            state.session.current_score(),
            state.session.high_score(),
            state.actor.health(),
            state.actor.max_health()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build is driven from JavaScript through `roll_ball::web::WebGame`
}
