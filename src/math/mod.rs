/// Seeded random selection utilities
pub mod random;
