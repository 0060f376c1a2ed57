use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Length in scaled sub-units (see [`crate::scale::SCALE`]).
pub type Length = i64;

/// Area in squared sub-units.
pub type Area = i64;

/// Opaque piece identifier: the position of the piece in the caller's list.
pub type PieceId = usize;

/// Rectangular piece to be cut. Width and height carry no orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub width: Length,
    pub height: Length,
}

impl Piece {
    pub fn new(id: PieceId, width: Length, height: Length) -> Self {
        Self { id, width, height }
    }

    pub fn area(&self) -> Area {
        self.width * self.height
    }

    pub fn min_side(&self) -> Length {
        self.width.min(self.height)
    }

    pub fn max_side(&self) -> Length {
        self.width.max(self.height)
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// One way of laying a piece across the roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    pub width: Length,
    pub height: Length,
    pub rotated: bool,
}

/// Position of a piece on the roll. `x` runs across the roll, `y` along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub piece_id: PieceId,
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
    pub rotated: bool,
}

impl Placement {
    pub fn right(&self) -> Length {
        self.x + self.width
    }

    pub fn bottom(&self) -> Length {
        self.y + self.height
    }

    pub fn area(&self) -> Area {
        self.width * self.height
    }

    /// True when the two rectangles share interior area. Touching edges do not count.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Packing heuristic selectable by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    GuillotineBssf,
    LargestFirstShelf,
    NarrowOrientationShelf,
    GroupedBestFitShelf,
    GapFillShelf,
}

impl HeuristicKind {
    /// Every heuristic, in the order comparisons report them.
    pub const ALL: [HeuristicKind; 5] = [
        HeuristicKind::GuillotineBssf,
        HeuristicKind::LargestFirstShelf,
        HeuristicKind::NarrowOrientationShelf,
        HeuristicKind::GroupedBestFitShelf,
        HeuristicKind::GapFillShelf,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            HeuristicKind::GuillotineBssf => "MaxRects (BSSF)",
            HeuristicKind::LargestFirstShelf => "Standard (FFD)",
            HeuristicKind::NarrowOrientationShelf => "Rotated",
            HeuristicKind::GroupedBestFitShelf => "Size-Based",
            HeuristicKind::GapFillShelf => "Cut-Corner",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            HeuristicKind::GuillotineBssf => "guillotine-bssf",
            HeuristicKind::LargestFirstShelf => "largest-first",
            HeuristicKind::NarrowOrientationShelf => "narrow",
            HeuristicKind::GroupedBestFitShelf => "grouped",
            HeuristicKind::GapFillShelf => "gap-fill",
        }
    }

    /// Shelf heuristics reject oversized pieces up front; the guillotine packer skips them.
    pub fn is_shelf(&self) -> bool {
        !matches!(self, HeuristicKind::GuillotineBssf)
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for HeuristicKind {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self> {
        HeuristicKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| {
                PackError::InvalidInput(format!(
                    "unknown heuristic '{}', expected one of: {}",
                    s,
                    HeuristicKind::ALL
                        .iter()
                        .map(|k| k.key())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Spacing policy a result was computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Spacing used on the cutting floor.
    Production,
    /// No spacing; a lower bound estimate.
    Zero,
}

impl GapPolicy {
    pub const ALL: [GapPolicy; 2] = [GapPolicy::Production, GapPolicy::Zero];
}

/// Placement plus derived metrics for one heuristic run. All values are scaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingResult {
    pub heuristic: HeuristicKind,
    pub container_width: Length,
    pub gap: Length,
    pub total_length: Length,
    pub total_area: Area,
    pub used_area: Area,
    pub waste_area: Area,
    pub efficiency_pct: f64,
    pub placements: Vec<Placement>,
    /// Pieces the guillotine packer could not place. Always empty for shelf heuristics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<PieceId>,
}

/// Several single rolls seamed side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub roll_count: u32,
    pub single_roll_width: Length,
    pub joined_width: Length,
    /// Offsets across the joined roll where seams fall.
    pub seam_positions: Vec<Length>,
}

/// Canvas type with its own roll width, in scaled units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub single_roll_width: Length,
}

/// One (container, heuristic, gap policy) outcome of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub container_id: String,
    pub heuristic: HeuristicKind,
    pub gap_policy: GapPolicy,
    pub result: PackingResult,
    pub fittable_count: usize,
    pub skipped_piece_ids: Vec<PieceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinSpec>,
}

impl ComparisonEntry {
    pub fn is_joined(&self) -> bool {
        self.join.is_some()
    }
}

/// Every successful comparison entry plus the index of the best one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub entries: Vec<ComparisonEntry>,
    pub best: usize,
    pub total_selected: usize,
}

impl Comparison {
    /// `None` only for a hand-built value whose `best` is out of range.
    pub fn best_entry(&self) -> Option<&ComparisonEntry> {
        self.entries.get(self.best)
    }
}

/// Piece as supplied by the order source, in meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceSpec {
    pub id: String,
    pub width: f64,
    pub length: f64,
}

/// Canvas type as supplied by the caller, in meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub roll_width: f64,
}

/// Manually tagged dimensions that replace a piece's own before packing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DimensionOverride {
    pub width: f64,
    pub length: f64,
}

fn default_production_gap() -> f64 {
    0.15
}

/// Input: what the caller provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub containers: Vec<ContainerSpec>,
    pub pieces: Vec<PieceSpec>,
    /// Restrict the run to these piece ids. Empty selects every piece.
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub overrides: HashMap<String, DimensionOverride>,
    /// Spacing between pieces on the cutting floor, in meters.
    #[serde(default = "default_production_gap")]
    pub production_gap: f64,
}

/// Placed piece expressed in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedItem {
    pub id: String,
    pub original_width: f64,
    pub original_length: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
    pub rotated: bool,
}

/// Meter-denominated view of a [`PackingResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub roll_width: f64,
    pub single_roll_width: f64,
    pub joined_roll_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seam_positions: Vec<f64>,
    pub gap: f64,
    pub total_length: f64,
    pub total_area: f64,
    pub used_area: f64,
    pub waste_area: f64,
    pub efficiency_pct: f64,
    pub piece_count: usize,
    pub packed_items: Vec<PackedItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<String>,
}

/// One row of a comparison report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub algorithm: String,
    pub heuristic: HeuristicKind,
    pub container_id: String,
    pub description: String,
    pub gap_policy: GapPolicy,
    pub is_best: bool,
    pub fittable_count: usize,
    pub skipped_count: usize,
    pub skipped_ids: Vec<String>,
    pub layout: LayoutSummary,
}

/// Output: what the planner returns for a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub rows: Vec<ComparisonRow>,
    pub total_selected: usize,
}

impl ComparisonReport {
    pub fn best(&self) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.is_best)
    }
}

/// Error type for packing and comparison
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    #[error("Piece {piece_id} is too large for a {container_width} wide roll (narrowest side {min_side})")]
    OversizedPiece {
        piece_id: PieceId,
        min_side: Length,
        container_width: Length,
    },

    #[error("Invalid container width: {width}")]
    InvalidContainer { width: Length },

    #[error("No pieces selected")]
    EmptyPieceSet,

    #[error("No containers provided")]
    NoContainers,

    #[error("No feasible layout for the selected pieces")]
    NoFeasibleLayout,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PackError>;
