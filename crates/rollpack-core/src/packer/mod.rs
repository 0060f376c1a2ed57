use crate::scale::MAX_LENGTH;
use crate::types::*;
use tracing::debug;

mod guillotine;
mod orientation;
mod shelf;
mod summary;
#[cfg(test)]
mod tests;

pub use orientation::{orientations, OrientationPreference};
pub use summary::efficiency_pct;

/// Packs pieces onto a roll of fixed width and unbounded length.
///
/// A packer is cheap to build and holds no state between calls, so one
/// instance can serve any number of heuristics concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Packer {
    container_width: Length,
    gap: Length,
}

impl Packer {
    /// Validates the roll width and spacing.
    pub fn new(container_width: Length, gap: Length) -> Result<Self> {
        if container_width <= 0 || container_width > MAX_LENGTH {
            return Err(PackError::InvalidContainer {
                width: container_width,
            });
        }

        if !(0..=MAX_LENGTH).contains(&gap) {
            return Err(PackError::InvalidInput(format!(
                "gap must lie between 0 and {}, got {}",
                MAX_LENGTH, gap
            )));
        }

        Ok(Self {
            container_width,
            gap,
        })
    }

    pub fn container_width(&self) -> Length {
        self.container_width
    }

    pub fn gap(&self) -> Length {
        self.gap
    }

    /// Runs one heuristic and builds its metrics.
    ///
    /// Shelf heuristics fail with [`PackError::OversizedPiece`] when any piece
    /// cannot be laid across the roll; the guillotine packer skips such pieces
    /// and reports them in [`PackingResult::skipped`].
    pub fn pack(&self, pieces: &[Piece], heuristic: HeuristicKind) -> Result<PackingResult> {
        validate_pieces(pieces)?;
        if heuristic.is_shelf() {
            self.validate_fit(pieces)?;
        }

        let (placements, skipped) = match heuristic {
            HeuristicKind::LargestFirstShelf => (self.pack_largest_first(pieces)?, Vec::new()),
            HeuristicKind::NarrowOrientationShelf => (self.pack_narrow(pieces)?, Vec::new()),
            HeuristicKind::GroupedBestFitShelf => (self.pack_grouped(pieces)?, Vec::new()),
            HeuristicKind::GapFillShelf => (self.pack_gap_fill(pieces)?, Vec::new()),
            HeuristicKind::GuillotineBssf => self.pack_guillotine(pieces),
        };

        let result = self.build_result(heuristic, placements, skipped)?;
        debug!(
            heuristic = heuristic.key(),
            width = self.container_width,
            gap = self.gap,
            placed = result.placements.len(),
            length = result.total_length,
            efficiency = result.efficiency_pct,
            "packed"
        );

        Ok(result)
    }

    /// Fails on the first piece whose narrowest side exceeds the roll width.
    fn validate_fit(&self, pieces: &[Piece]) -> Result<()> {
        match pieces
            .iter()
            .find(|piece| piece.min_side() > self.container_width)
        {
            Some(piece) => Err(PackError::OversizedPiece {
                piece_id: piece.id,
                min_side: piece.min_side(),
                container_width: self.container_width,
            }),
            None => Ok(()),
        }
    }
}

/// Rejects pieces with a side that is not positive or exceeds [`MAX_LENGTH`].
pub(crate) fn validate_pieces(pieces: &[Piece]) -> Result<()> {
    match pieces
        .iter()
        .find(|p| !(1..=MAX_LENGTH).contains(&p.width) || !(1..=MAX_LENGTH).contains(&p.height))
    {
        Some(piece) => Err(PackError::InvalidInput(format!(
            "piece {} has invalid dimensions {} x {}",
            piece.id, piece.width, piece.height
        ))),
        None => Ok(()),
    }
}

/// Packs `pieces` onto a roll `container_width` wide with `gap` spacing.
pub fn pack(
    container_width: Length,
    pieces: &[Piece],
    heuristic: HeuristicKind,
    gap: Length,
) -> Result<PackingResult> {
    Packer::new(container_width, gap)?.pack(pieces, heuristic)
}
