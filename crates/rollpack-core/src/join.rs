//! Joined rolls for pieces wider than a single roll.

use crate::types::*;

impl JoinSpec {
    /// Number of rolls needed so that the piece with the widest narrow side fits
    /// across, never fewer than two. Returns `None` when every piece already
    /// fits a single roll.
    pub fn for_pieces(single_roll_width: Length, pieces: &[Piece]) -> Result<Option<JoinSpec>> {
        if single_roll_width <= 0 {
            return Err(PackError::InvalidContainer {
                width: single_roll_width,
            });
        }

        let widest = match pieces.iter().map(|p| p.min_side()).max() {
            Some(widest) if widest > single_roll_width => widest,
            _ => return Ok(None),
        };

        let needed = (widest + single_roll_width - 1) / single_roll_width;
        let roll_count = u32::try_from(needed.max(2)).map_err(|_| {
            PackError::InvalidInput(format!("{} rolls cannot be joined", needed))
        })?;

        Ok(Some(JoinSpec::new(single_roll_width, roll_count)))
    }

    /// Join of `roll_count` rolls, seams at every multiple of the single width.
    pub fn new(single_roll_width: Length, roll_count: u32) -> JoinSpec {
        let seam_positions = (1..roll_count)
            .map(|i| single_roll_width * Length::from(i))
            .collect();

        JoinSpec {
            roll_count,
            single_roll_width,
            joined_width: single_roll_width * Length::from(roll_count),
            seam_positions,
        }
    }
}
