//! Tests for generation constants and their relationships

#[cfg(test)]
mod tests {
    use roomstamp::io::configuration::{
        DEFAULT_CONNECTIVITY_THRESHOLD, DEFAULT_HEIGHT, DEFAULT_MAX_RETRY, DEFAULT_PADDING,
        DEFAULT_ROOM_SIZE_MAX, DEFAULT_ROOM_SIZE_MIN, DEFAULT_WIDTH, MIN_ROOMS,
        PLACEMENT_ITERATION_CAP, ROOM_ATTEMPTS_PER_ROOM,
    };

    // Tests the generation limits keep their documented values
    #[test]
    fn test_generation_limits() {
        assert_eq!(ROOM_ATTEMPTS_PER_ROOM, 30);
        assert_eq!(MIN_ROOMS, 3);
        assert_eq!(PLACEMENT_ITERATION_CAP, 100_000);
        assert_eq!(DEFAULT_MAX_RETRY, 10);
        assert!((DEFAULT_CONNECTIVITY_THRESHOLD - 0.8).abs() < f64::EPSILON);
    }

    // Tests the default room range fits the default grid with padding
    #[test]
    fn test_default_rooms_fit_default_grid() {
        assert!(DEFAULT_ROOM_SIZE_MIN <= DEFAULT_ROOM_SIZE_MAX);
        let needed = DEFAULT_ROOM_SIZE_MAX + 2 * DEFAULT_PADDING + 1;
        assert!(needed <= DEFAULT_WIDTH as i32);
        assert!(needed <= DEFAULT_HEIGHT as i32);
    }
}
