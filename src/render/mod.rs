use bracket_terminal::prelude::*;

use hexwander::{
    history::TraversalRecord,
    map::{Direction, Location, PlanarDirection, RoomAction, RoomType, VerticalDirection},
};

pub struct RoomPanel;

impl RoomPanel {
    pub const fn new() -> Self {
        Self
    }

    pub fn draw(&self, ctx: &mut BTerm, location: &Location, unique_rooms: usize, frame: u64) {
        let (width, _) = ctx.get_char_size();
        ctx.draw_box(0, 0, width - 1, 6, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(
            2,
            1,
            room_color(location.room_type),
            RGB::named(BLACK),
            format!(
                "{} · {}",
                location.room_type.as_str().to_uppercase(),
                location.id()
            ),
        );
        ctx.print_color(
            2,
            2,
            RGB::named(LIGHT_BLUE),
            RGB::named(BLACK),
            format!(
                "Floor {} · Hex {},{} · Rooms seen {} · Frame {}",
                location.coordinate.z,
                location.coordinate.x,
                location.coordinate.y,
                unique_rooms,
                frame
            ),
        );

        let mut x = 2;
        for action in location.actions() {
            let direction = action.direction();
            let fg = match action {
                RoomAction::Exit(_) if location.connection(direction).is_some() => {
                    RGB::named(LIGHT_GREEN)
                }
                RoomAction::Exit(_) => RGB::named(WHITE),
                RoomAction::Stairs(_) => RGB::named(YELLOW),
            };
            let label = format!(
                "[{}] {}",
                key_hint(direction),
                direction.display_name()
            );
            ctx.print_color(x, 4, fg, RGB::named(BLACK), &label);
            x += label.len() as i32 + 2;
        }
    }
}

fn room_color(room_type: RoomType) -> RGB {
    match room_type {
        RoomType::Gallery => RGB::from_u8(241, 241, 87),
        RoomType::Vestibule => RGB::from_u8(96, 165, 255),
    }
}

fn key_hint(direction: Direction) -> &'static str {
    match direction {
        Direction::Planar(PlanarDirection::Ne) => "E",
        Direction::Planar(PlanarDirection::Nw) => "Q",
        Direction::Planar(PlanarDirection::Ee) => "D",
        Direction::Planar(PlanarDirection::Ww) => "A",
        Direction::Planar(PlanarDirection::Se) => "C",
        Direction::Planar(PlanarDirection::Sw) => "Z",
        Direction::Vertical(VerticalDirection::Up) => "<",
        Direction::Vertical(VerticalDirection::Dn) => ">",
    }
}

/// Draws a compass of the six hex neighbours around the room glyph.
pub fn draw_compass(ctx: &mut BTerm, location: &Location, origin: (i32, i32)) {
    let (cx, cy) = origin;
    let glyph = match location.room_type {
        RoomType::Gallery => 'G',
        RoomType::Vestibule => 'V',
    };
    ctx.set(
        cx,
        cy,
        room_color(location.room_type),
        RGB::named(BLACK),
        to_cp437(glyph),
    );

    for action in location.actions() {
        let (dx, dy, glyph) = match action {
            RoomAction::Exit(planar) => {
                let delta = planar.delta();
                // Screen y grows downward; the axial y axis leans west.
                (delta.x * 4 - delta.y * 2, -delta.y * 2, '*')
            }
            RoomAction::Stairs(VerticalDirection::Up) => (0, -3, '<'),
            RoomAction::Stairs(VerticalDirection::Dn) => (0, 3, '>'),
        };
        let fg = if location.connection(action.direction()).is_some() {
            RGB::named(LIGHT_GREEN)
        } else {
            RGB::named(DARK_GRAY)
        };
        ctx.set(cx + dx, cy + dy, fg, RGB::named(BLACK), to_cp437(glyph));
    }
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let height = (log.len() as i32).min(5) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(
        2,
        top + 1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Event Log",
    );
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}

pub fn draw_history(ctx: &mut BTerm, history: &[&TraversalRecord], start_y: i32) {
    ctx.print_color(
        2,
        start_y,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Recent Traversals",
    );
    for (row, record) in history.iter().enumerate() {
        ctx.print_color(
            2,
            start_y + 1 + row as i32,
            RGB::named(GRAY),
            RGB::named(BLACK),
            format!(
                "{} {} -> {} ({})",
                record.timestamp.format("%H:%M:%S"),
                record.from,
                record.to,
                record.direction
            ),
        );
    }
}
