//! Tests for points, rectangles and direction masks

#[cfg(test)]
mod tests {
    use roomstamp::spatial::{Direction, Point, Rect};

    // Tests that the center rounds toward the top-left corner
    // Verified by rounding the half extents up
    #[test]
    fn test_rect_center_rounds_down() {
        assert_eq!(Rect::new(2, 3, 5, 4).center(), Point::new(4, 5));
        assert_eq!(Rect::new(0, 0, 1, 1).center(), Point::new(0, 0));
    }

    // Tests that touching rectangles do not intersect but a one-cell margin makes them
    // Verified by making the far edges inclusive
    #[test]
    fn test_rect_intersects_is_half_open() {
        let room = Rect::new(0, 0, 3, 3);
        let neighbour = Rect::new(3, 0, 2, 2);
        assert!(!room.intersects(&neighbour));
        assert!(room.expanded(1).intersects(&neighbour));

        let apart = Rect::new(4, 0, 2, 2);
        assert!(!room.expanded(1).intersects(&apart));
    }

    // Tests row-major cell iteration covers the area
    #[test]
    fn test_rect_cells_row_major() {
        let cells: Vec<_> = Rect::new(1, 2, 2, 2).cells().collect();
        assert_eq!(
            cells,
            vec![
                Point::new(1, 2),
                Point::new(2, 2),
                Point::new(1, 3),
                Point::new(2, 3)
            ]
        );
        assert_eq!(Rect::new(1, 2, 2, 2).area(), 4);
        assert!(Rect::new(1, 2, 2, 2).contains(Point::new(2, 3)));
        assert!(!Rect::new(1, 2, 2, 2).contains(Point::new(3, 3)));
    }

    // Tests mask bits decode to directions in bit order
    // Verified by swapping the right and left bits
    #[test]
    fn test_direction_mask_decoding() {
        let decoded: Vec<_> = Direction::from_mask(0b0101).collect();
        assert_eq!(decoded, vec![Direction::Up, Direction::Down]);

        let all: u8 = Direction::ALL.iter().map(|d| d.bit()).sum();
        assert_eq!(all, 0b1111);
        assert_eq!(Direction::from_mask(0).count(), 0);
    }

    // Tests steps move one cell with y growing downward
    #[test]
    fn test_point_step_and_distance() {
        let origin = Point::new(5, 5);
        assert_eq!(origin.step(Direction::Up), Point::new(5, 4));
        assert_eq!(origin.step(Direction::Right), Point::new(6, 5));
        assert_eq!(origin.step(Direction::Down), Point::new(5, 6));
        assert_eq!(origin.step(Direction::Left), Point::new(4, 5));
        assert_eq!(origin.manhattan(Point::new(2, 9)), 7);
        assert_eq!(Point::from((3, -1)), Point::new(3, -1));
    }
}
