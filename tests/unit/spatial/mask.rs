//! Tests for bit-packed cell masks

#[cfg(test)]
mod tests {
    use roomstamp::spatial::{CellMask, Point};

    // Tests insert reports only the first set of a cell
    // Verified by returning the previous bit instead of its negation
    #[test]
    fn test_insert_reports_new_cells() {
        let mut mask = CellMask::new(4, 3);
        assert!(mask.insert(Point::new(1, 2)));
        assert!(!mask.insert(Point::new(1, 2)));
        assert!(mask.contains(Point::new(1, 2)));
        assert_eq!(mask.count(), 1);
    }

    // Tests out-of-bounds access is inert
    // Verified by wrapping x into the next row
    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut mask = CellMask::new(3, 3);
        mask.set(Point::new(3, 0), true);
        mask.set(Point::new(-1, 1), true);
        assert!(!mask.insert(Point::new(0, 3)));
        assert!(mask.is_empty());
        assert!(!mask.contains(Point::new(0, 1)));
        assert!(!mask.contains(Point::new(-1, -1)));
    }

    // Tests iteration yields set cells in row-major order
    #[test]
    fn test_iter_row_major() {
        let mut mask = CellMask::new(3, 2);
        mask.set(Point::new(2, 1), true);
        mask.set(Point::new(1, 0), true);
        mask.set(Point::new(0, 1), true);

        let cells: Vec<_> = mask.iter().collect();
        assert_eq!(
            cells,
            vec![Point::new(1, 0), Point::new(0, 1), Point::new(2, 1)]
        );

        mask.clear();
        assert!(mask.is_empty());
        assert_eq!((mask.width(), mask.height()), (3, 2));
    }
}
