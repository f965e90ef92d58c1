mod render;

use std::{cell::RefCell, rc::Rc};

use bracket_terminal::prelude::*;
use clap::Parser;
use hexwander::{
    NavigationController, NavigationError,
    config::{Args, SessionConfig},
    map::{Direction, Location},
    scripted_input::ScriptedInput,
};
use render::{RoomPanel, draw_compass, draw_history, draw_log};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const SCREEN_HEIGHT: i32 = 50;
const COMPASS_ORIGIN: (i32, i32) = (40, 14);
const HISTORY_START: i32 = 21;
const HISTORY_ROWS: usize = 8;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 6;
const LOG_MAX_ENTRIES: usize = 8;

struct HexWanderState {
    navigation: NavigationController,
    panel: RoomPanel,
    frame: u64,
    message_log: Vec<String>,
    arrivals: Rc<RefCell<Vec<String>>>,
    quit: bool,
}

impl HexWanderState {
    fn new(mut navigation: NavigationController) -> Self {
        let arrivals: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&arrivals);
        navigation.on_location_changed(move |location: &Location| {
            sink.borrow_mut().push(format!(
                "Entered {} at {}",
                location.room_type.as_str(),
                location.coordinate
            ));
        });

        let mut state = Self {
            navigation,
            panel: RoomPanel::new(),
            frame: 0,
            message_log: Vec::new(),
            arrivals,
            quit: false,
        };
        state.push_log_entry(format!(
            "Standing in {} ({} rooms known)",
            state.navigation.current(),
            state.navigation.graph().len()
        ));
        state
    }

    fn handle_input(&mut self, ctx: &mut BTerm) {
        if let Some(key) = ctx.key {
            match key_direction(key) {
                Some(direction) => self.try_traverse(direction),
                None if key == VirtualKeyCode::Escape => self.quit = true,
                None => {}
            }
        }
    }

    fn try_traverse(&mut self, direction: Direction) {
        match self.navigation.traverse(direction) {
            Ok(_) => {}
            Err(err @ NavigationError::GraphCorruption { .. }) => {
                error!(%err, "room graph is corrupt, closing the session");
                self.quit = true;
            }
            Err(err) => {
                warn!(%err, "traversal refused");
                self.push_log_entry(format!("No way {}.", direction.display_name()));
            }
        }
    }

    fn flush_arrivals(&mut self) {
        let arrivals: Vec<String> = self.arrivals.borrow_mut().drain(..).collect();
        for entry in arrivals {
            self.push_log_entry(entry);
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    fn draw_scene(&self, ctx: &mut BTerm) {
        if let Some(location) = self.navigation.current_location() {
            self.panel.draw(
                ctx,
                location,
                self.navigation.log().unique_room_count(),
                self.frame,
            );
            draw_compass(ctx, location, COMPASS_ORIGIN);
        }
        let history = self.navigation.log().recent_history(HISTORY_ROWS);
        draw_history(ctx, &history, HISTORY_START);
        draw_log(ctx, &self.message_log, LOG_PANEL_START);
    }
}

impl GameState for HexWanderState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.handle_input(ctx);
        if self.quit {
            ctx.quit();
            return;
        }
        self.frame = self.frame.wrapping_add(1);
        self.flush_arrivals();
        ctx.cls();
        self.draw_scene(ctx);
    }
}

fn key_direction(key: VirtualKeyCode) -> Option<Direction> {
    match key {
        VirtualKeyCode::E => Some(Direction::NE),
        VirtualKeyCode::Q => Some(Direction::NW),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(Direction::EE),
        VirtualKeyCode::A | VirtualKeyCode::Left => Some(Direction::WW),
        VirtualKeyCode::C => Some(Direction::SE),
        VirtualKeyCode::Z => Some(Direction::SW),
        VirtualKeyCode::PageUp | VirtualKeyCode::Comma => Some(Direction::UP),
        VirtualKeyCode::PageDown | VirtualKeyCode::Period => Some(Direction::DN),
        _ => None,
    }
}

fn run_script(mut navigation: NavigationController, script: ScriptedInput) {
    for direction in script {
        match navigation.traverse(direction) {
            Ok(location) => info!(
                %direction,
                room = %location.id(),
                exits = ?location.exits,
                "moved"
            ),
            Err(err) if err.is_fatal() => {
                error!(%err, "room graph is corrupt, stopping the script");
                break;
            }
            Err(err) => warn!(%err, "step refused"),
        }
    }
    println!(
        "at {} after {} traversals, {} distinct rooms, {} rooms generated",
        navigation.current(),
        navigation.log().len(),
        navigation.log().unique_room_count(),
        navigation.graph().len()
    );
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> BError {
    let args = Args::parse();
    init_tracing(if args.script.is_some() { "info" } else { "warn" });

    let config = SessionConfig::from(&args);
    info!(save = %config.store().path().display(), seed = ?config.seed, "opening session");
    let navigation =
        NavigationController::resume(Box::new(config.store()), config.random_source());

    if let Some(path) = &args.script {
        let script = ScriptedInput::from_file(path)?;
        run_script(navigation, script);
        return Ok(());
    }

    let context = BTermBuilder::simple80x50()
        .with_title("HexWander · Stacks")
        .build()?;
    main_loop(context, HexWanderState::new(navigation))
}
