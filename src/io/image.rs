//! PNG export of a layout with placement passes overlaid

use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

use crate::{
    io::error::{DungeonError, Result, invalid_parameter},
    spatial::{Cell, DungeonGrid, Point},
};

const WALL_COLOR: [u8; 4] = [40, 40, 48, 255];
const FLOOR_COLOR: [u8; 4] = [200, 196, 184, 255];
const DOOR_COLOR: [u8; 4] = [150, 96, 48, 255];

// Cycled per pass
const OVERLAY_COLORS: [[u8; 4]; 6] = [
    [214, 69, 65, 255],
    [65, 131, 215, 255],
    [38, 166, 91, 255],
    [244, 179, 80, 255],
    [155, 89, 182, 255],
    [26, 188, 156, 255],
];

const fn cell_color(cell: Cell) -> [u8; 4] {
    match cell {
        Cell::Wall => WALL_COLOR,
        Cell::Floor => FLOOR_COLOR,
        Cell::Door => DOOR_COLOR,
    }
}

/// Overlay color for the pass at `index`
pub fn overlay_color(index: usize) -> [u8; 4] {
    OVERLAY_COLORS
        .get(index % OVERLAY_COLORS.len())
        .copied()
        .unwrap_or(FLOOR_COLOR)
}

fn fill_block(img: &mut RgbaImage, point: Point, scale: u32, color: [u8; 4]) {
    if point.x < 0 || point.y < 0 {
        return;
    }
    let (origin_x, origin_y) = (point.x as u32 * scale, point.y as u32 * scale);
    for dy in 0..scale {
        for dx in 0..scale {
            let (x, y) = (origin_x + dx, origin_y + dy);
            if x < img.width() && y < img.height() {
                img.put_pixel(x, y, Rgba(color));
            }
        }
    }
}

/// Render the grid, then each overlay in order, `scale` pixels per cell
///
/// # Errors
///
/// Returns an invalid parameter error for a zero scale
pub fn render_layout(grid: &DungeonGrid, overlays: &[Vec<Point>], scale: u32) -> Result<RgbaImage> {
    if scale == 0 {
        return Err(invalid_parameter("scale", &scale, &"must be at least 1"));
    }

    let width = grid.width() as u32 * scale;
    let height = grid.height() as u32 * scale;
    let mut img = ImageBuffer::new(width, height);

    for ((y, x), &cell) in grid.cells.indexed_iter() {
        fill_block(
            &mut img,
            Point::new(x as i32, y as i32),
            scale,
            cell_color(cell),
        );
    }

    for (index, cells) in overlays.iter().enumerate() {
        let color = overlay_color(index);
        for &point in cells {
            fill_block(&mut img, point, scale, color);
        }
    }

    Ok(img)
}

/// Export the layout as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The scale is zero
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_layout_png(
    grid: &DungeonGrid,
    overlays: &[Vec<Point>],
    scale: u32,
    output_path: &Path,
) -> Result<()> {
    let img = render_layout(grid, overlays, scale)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DungeonError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| DungeonError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
