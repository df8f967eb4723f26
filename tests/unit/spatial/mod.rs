mod geometry;
mod mask;
