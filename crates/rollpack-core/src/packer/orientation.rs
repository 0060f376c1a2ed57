use super::*;

/// How a heuristic ranks the orientations of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationPreference {
    /// Larger placed width first: fewer, shorter rows.
    WidestFirst,
    /// Smaller placed width first: more pieces per row.
    NarrowestFirst,
}

/// Returns the orientations of `piece` that fit across `container_width`,
/// ranked by `preference`. Squares yield a single orientation.
pub fn orientations(
    piece: &Piece,
    container_width: Length,
    preference: OrientationPreference,
) -> Result<Vec<Orientation>> {
    let mut candidates = Vec::with_capacity(2);

    if piece.width <= container_width {
        candidates.push(Orientation {
            width: piece.width,
            height: piece.height,
            rotated: false,
        });
    }

    if !piece.is_square() && piece.height <= container_width {
        candidates.push(Orientation {
            width: piece.height,
            height: piece.width,
            rotated: true,
        });
    }

    if candidates.is_empty() {
        return Err(PackError::OversizedPiece {
            piece_id: piece.id,
            min_side: piece.min_side(),
            container_width,
        });
    }

    // Stable sort keeps the unrotated orientation ahead on equal widths.
    match preference {
        OrientationPreference::WidestFirst => candidates.sort_by(|a, b| b.width.cmp(&a.width)),
        OrientationPreference::NarrowestFirst => candidates.sort_by_key(|o| o.width),
    }

    Ok(candidates)
}

impl Packer {
    pub(super) fn orientations(
        &self,
        piece: &Piece,
        preference: OrientationPreference,
    ) -> Result<Vec<Orientation>> {
        orientations(piece, self.container_width, preference)
    }
}
