//! Per-pattern placement constraints resolved from sparse raw configuration
//!
//! Raw configuration arrives as loosely-typed maps keyed by pattern index
//! (JSON object keys, so strings). [`ConstraintIndex::from_raw`] turns them
//! into one strongly-typed record per index with every missing or malformed
//! field replaced by its default.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    io::configuration::DEFAULT_PATTERN_WEIGHT,
    patterns::pattern::PatternSource,
    spatial::{Direction, Point},
};

/// Tri-state flag that can defer to a pass-wide setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Override {
    /// Use the pass-wide flag
    #[default]
    Inherit,
    /// Always enabled
    ForceOn,
    /// Always disabled
    ForceOff,
}

impl Override {
    /// Effective value given the pass-wide flag
    pub const fn resolve(self, global: bool) -> bool {
        match self {
            Self::Inherit => global,
            Self::ForceOn => true,
            Self::ForceOff => false,
        }
    }

    /// Decode `0`/`1`/`2` or `"inherit"`/`"on"`/`"off"`
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => match number.as_i64()? {
                0 => Some(Self::Inherit),
                1 => Some(Self::ForceOn),
                2 => Some(Self::ForceOff),
                _ => None,
            },
            Value::String(text) => match text.to_ascii_lowercase().as_str() {
                "inherit" => Some(Self::Inherit),
                "on" | "force_on" => Some(Self::ForceOn),
                "off" | "force_off" => Some(Self::ForceOff),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Effective constraints for one pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatternConstraint {
    /// Relative selection weight; 0 disables the pattern
    pub weight: f64,
    /// Directions (see [`Direction::bit`]) that must touch a non-target cell
    pub adjacency: u8,
    /// Footprint-local cells that must each satisfy the adjacency mask
    pub required_cells: Vec<Point>,
    /// Placements pursued before general coverage filling
    pub min_count: usize,
    /// Placement cap; `None` is unlimited
    pub max_count: Option<usize>,
    /// Whether stamped cells are reported to the caller
    pub register: Override,
    /// Whether candidates are restricted to free cells
    pub unoccupied: Override,
}

impl Default for PatternConstraint {
    fn default() -> Self {
        Self {
            weight: DEFAULT_PATTERN_WEIGHT,
            adjacency: 0,
            required_cells: Vec::new(),
            min_count: 0,
            max_count: None,
            register: Override::Inherit,
            unoccupied: Override::Inherit,
        }
    }
}

impl PatternConstraint {
    /// Whether the pattern may be drawn at all
    pub const fn is_enabled(&self) -> bool {
        self.weight > 0.0
    }

    /// Whether `placed` has reached the cap
    pub fn at_max(&self, placed: usize) -> bool {
        self.max_count.is_some_and(|max| placed >= max)
    }

    /// Whether `placed` is still below the minimum
    pub const fn below_min(&self, placed: usize) -> bool {
        placed < self.min_count
    }
}

/// Sparse raw constraint maps keyed by pattern index
///
/// Values are kept as JSON so malformed entries can be dropped per field
/// instead of failing the whole settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConstraints {
    /// Selection weight per pattern
    pub weights: BTreeMap<String, Value>,
    /// Adjacency bitmask (or list of direction names) per pattern
    pub adjacency: BTreeMap<String, Value>,
    /// Required cells per pattern: flat indices, `[x, y]` pairs or `{x, y}` objects
    pub required_cells: BTreeMap<String, Value>,
    /// Minimum placements per pattern
    pub min_counts: BTreeMap<String, Value>,
    /// Maximum placements per pattern (negative is unlimited)
    pub max_counts: BTreeMap<String, Value>,
    /// Register override per pattern
    pub register_overrides: BTreeMap<String, Value>,
    /// Unoccupied override per pattern
    pub unoccupied_overrides: BTreeMap<String, Value>,
}

impl RawConstraints {
    fn maps(&self) -> [&BTreeMap<String, Value>; 7] {
        [
            &self.weights,
            &self.adjacency,
            &self.required_cells,
            &self.min_counts,
            &self.max_counts,
            &self.register_overrides,
            &self.unoccupied_overrides,
        ]
    }

    /// Every pattern index mentioned by any map
    pub fn indices(&self) -> BTreeSet<usize> {
        self.maps()
            .into_iter()
            .flat_map(BTreeMap::keys)
            .filter_map(|key| key.trim().parse::<usize>().ok())
            .collect()
    }

    fn lookup<'a>(map: &'a BTreeMap<String, Value>, index: usize) -> Option<&'a Value> {
        map.iter()
            .find(|(key, _)| key.trim().parse::<usize>().ok() == Some(index))
            .map(|(_, value)| value)
    }
}

/// Strongly-typed sparse map from pattern index to constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintIndex {
    entries: BTreeMap<usize, PatternConstraint>,
    fallback: PatternConstraint,
}

impl ConstraintIndex {
    /// Index where every pattern uses the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constraints of one pattern
    pub fn insert(&mut self, index: usize, constraint: PatternConstraint) {
        self.entries.insert(index, constraint);
    }

    /// Builder form of [`Self::insert`]
    #[must_use]
    pub fn with(mut self, index: usize, constraint: PatternConstraint) -> Self {
        self.insert(index, constraint);
        self
    }

    /// Effective constraints for `index`
    pub fn get(&self, index: usize) -> &PatternConstraint {
        self.entries.get(&index).unwrap_or(&self.fallback)
    }

    /// Number of patterns with explicit entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pattern has explicit entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve raw maps into typed records
    ///
    /// Flat required-cell indices are decoded against the footprint width of
    /// the pattern at that index; without a pattern they are dropped.
    pub fn from_raw(raw: &RawConstraints, patterns: &dyn PatternSource) -> Self {
        let mut index = Self::new();
        for pattern_index in raw.indices() {
            let footprint_width = patterns
                .pattern(pattern_index)
                .map(|pattern| pattern.size().0);
            index.insert(
                pattern_index,
                resolve_constraint(raw, pattern_index, footprint_width),
            );
        }
        index
    }
}

fn resolve_constraint(
    raw: &RawConstraints,
    index: usize,
    footprint_width: Option<i32>,
) -> PatternConstraint {
    let mut constraint = PatternConstraint::default();

    if let Some(value) = RawConstraints::lookup(&raw.weights, index) {
        match value.as_f64().filter(|weight| weight.is_finite()) {
            Some(weight) => constraint.weight = weight.max(0.0),
            None => debug!("pattern {index}: ignoring malformed weight {value}"),
        }
    }

    if let Some(value) = RawConstraints::lookup(&raw.adjacency, index) {
        match decode_adjacency(value) {
            Some(mask) => constraint.adjacency = mask,
            None => debug!("pattern {index}: ignoring malformed adjacency {value}"),
        }
    }

    if let Some(value) = RawConstraints::lookup(&raw.required_cells, index) {
        constraint.required_cells = decode_required_cells(value, footprint_width);
    }

    if let Some(value) = RawConstraints::lookup(&raw.min_counts, index) {
        match value.as_u64() {
            Some(min) => constraint.min_count = min as usize,
            None => debug!("pattern {index}: ignoring malformed min count {value}"),
        }
    }

    if let Some(value) = RawConstraints::lookup(&raw.max_counts, index) {
        match value.as_i64() {
            Some(max) if max < 0 => constraint.max_count = None,
            Some(max) => constraint.max_count = Some(max as usize),
            None => debug!("pattern {index}: ignoring malformed max count {value}"),
        }
    }

    if let Some(value) = RawConstraints::lookup(&raw.register_overrides, index) {
        constraint.register = Override::from_value(value).unwrap_or_default();
    }

    if let Some(value) = RawConstraints::lookup(&raw.unoccupied_overrides, index) {
        constraint.unoccupied = Override::from_value(value).unwrap_or_default();
    }

    constraint
}

/// Decode an integer mask or a list of direction names
pub fn decode_adjacency(value: &Value) -> Option<u8> {
    match value {
        Value::Number(number) => number.as_u64().map(|mask| (mask & 0b1111) as u8),
        Value::Array(items) => {
            let mut mask = 0;
            for item in items {
                let direction = match item.as_str()?.to_ascii_lowercase().as_str() {
                    "up" | "top" => Direction::Up,
                    "right" => Direction::Right,
                    "down" | "bottom" => Direction::Down,
                    "left" => Direction::Left,
                    _ => return None,
                };
                mask |= direction.bit();
            }
            Some(mask)
        }
        _ => None,
    }
}

/// Decode a required-cell list mixing flat indices and coordinate pairs
///
/// Flat indices are row-major within the footprint's bounding box
/// (`index = y * width + x`). Items of any other shape are skipped.
pub fn decode_required_cells(value: &Value, footprint_width: Option<i32>) -> Vec<Point> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    let mut cells = Vec::with_capacity(items.len());
    for item in items {
        let cell = match item {
            Value::Number(number) => number.as_u64().and_then(|flat| {
                let width = u64::try_from(footprint_width?).ok().filter(|&w| w > 0)?;
                Some(Point::new((flat % width) as i32, (flat / width) as i32))
            }),
            Value::Array(pair) => match pair.as_slice() {
                [x, y] => coordinate_pair(x, y),
                _ => None,
            },
            Value::Object(fields) => match (fields.get("x"), fields.get("y")) {
                (Some(x), Some(y)) => coordinate_pair(x, y),
                _ => None,
            },
            _ => None,
        };
        if let Some(cell) = cell {
            if !cells.contains(&cell) {
                cells.push(cell);
            }
        }
    }
    cells
}

fn coordinate_pair(x: &Value, y: &Value) -> Option<Point> {
    let x = i32::try_from(x.as_i64()?).ok()?;
    let y = i32::try_from(y.as_i64()?).ok()?;
    Some(Point::new(x, y))
}
