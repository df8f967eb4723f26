//! Random room placement with a one-cell wall buffer between rooms

use crate::{
    algorithm::layout::LayoutConfig,
    io::configuration::{MIN_ROOMS, ROOM_ATTEMPTS_PER_ROOM},
    math::random::RandomSelector,
    spatial::{DungeonGrid, Rect},
};

/// Total placement attempts granted for one layout attempt
pub const fn room_attempt_budget(room_count: usize) -> usize {
    room_count * ROOM_ATTEMPTS_PER_ROOM
}

/// Fewest rooms an attempt may place before it is rejected
pub fn min_rooms_required(room_count: usize) -> usize {
    MIN_ROOMS.max(room_count / 2)
}

/// Check a candidate against every placed room expanded by one cell
pub fn overlaps_existing(candidate: &Rect, rooms: &[Rect]) -> bool {
    rooms
        .iter()
        .any(|room| candidate.intersects(&room.expanded(1)))
}

/// Sample one candidate rectangle, `None` when the grid cannot fit it
///
/// Position is drawn from `[padding, dimension - padding - size - 1]`.
pub fn sample_room(config: &LayoutConfig, rng: &mut RandomSelector) -> Option<Rect> {
    let (w_min, w_max) = config.room_width_range();
    let (h_min, h_max) = config.room_height_range();
    let width = rng.range_inclusive(w_min, w_max);
    let height = rng.range_inclusive(h_min, h_max);

    let padding = config.padding();
    let x_max = config.width() as i32 - padding - width - 1;
    let y_max = config.height() as i32 - padding - height - 1;
    if x_max < padding || y_max < padding {
        return None;
    }

    let x = rng.range_inclusive(padding, x_max);
    let y = rng.range_inclusive(padding, y_max);
    Some(Rect::new(x, y, width, height))
}

/// Run one placement attempt, carving and returning the room when accepted
pub fn try_place_room(
    grid: &mut DungeonGrid,
    rooms: &mut Vec<Rect>,
    config: &LayoutConfig,
    rng: &mut RandomSelector,
) -> Option<Rect> {
    let candidate = sample_room(config, rng)?;
    if overlaps_existing(&candidate, rooms) {
        return None;
    }

    grid.carve_room(&candidate, rooms.len() as i32);
    rooms.push(candidate);
    Some(candidate)
}
