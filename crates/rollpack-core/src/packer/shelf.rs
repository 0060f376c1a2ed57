use super::*;
use std::cmp::Reverse;

/// Members of a size group lie within this percentage of the group's seed.
const GROUP_TOLERANCE_PERCENT: Length = 25;

/// Horizontal row of pieces sharing one height.
#[derive(Debug, Clone)]
struct Shelf {
    y: Length,
    height: Length,
    cursor_x: Length,
    remaining_width: Length,
}

impl Shelf {
    fn admits(&self, orientation: &Orientation) -> bool {
        self.remaining_width >= orientation.width && self.height >= orientation.height
    }
}

/// Unused space above a short piece on a taller shelf.
#[derive(Debug, Clone, Copy)]
struct GapRegion {
    x: Length,
    y: Length,
    width: Length,
    height: Length,
}

impl GapRegion {
    fn admits(&self, orientation: &Orientation) -> bool {
        orientation.width <= self.width && orientation.height <= self.height
    }

    fn area(&self) -> Area {
        self.width * self.height
    }
}

/// Per-call shelf state. Shelves are kept in the order they were opened,
/// which is also top to bottom.
struct ShelfLayout {
    container_width: Length,
    gap: Length,
    track_gaps: bool,
    shelves: Vec<Shelf>,
    gaps: Vec<GapRegion>,
    placements: Vec<Placement>,
}

impl ShelfLayout {
    fn new(packer: &Packer, track_gaps: bool) -> Self {
        Self {
            container_width: packer.container_width,
            gap: packer.gap,
            track_gaps,
            shelves: Vec::new(),
            gaps: Vec::new(),
            placements: Vec::new(),
        }
    }

    /// First shelf, in opening order, that admits any orientation.
    fn first_fit(&self, orientations: &[Orientation]) -> Option<(usize, Orientation)> {
        self.shelves.iter().enumerate().find_map(|(idx, shelf)| {
            orientations
                .iter()
                .find(|o| shelf.admits(o))
                .map(|o| (idx, *o))
        })
    }

    /// Admitting shelf that leaves the least width behind. Ties keep the
    /// earlier shelf, then the preferred orientation.
    fn best_fit(&self, orientations: &[Orientation]) -> Option<(usize, Orientation)> {
        let mut best: Option<(usize, Orientation, Length)> = None;

        for (idx, shelf) in self.shelves.iter().enumerate() {
            for orientation in orientations {
                if !shelf.admits(orientation) {
                    continue;
                }
                let slack = shelf.remaining_width - orientation.width;
                match best {
                    None => best = Some((idx, *orientation, slack)),
                    Some((_, _, best_slack)) if slack < best_slack => {
                        best = Some((idx, *orientation, slack));
                    }
                    _ => {}
                }
            }
        }

        best.map(|(idx, orientation, _)| (idx, orientation))
    }

    /// Smallest recorded gap, by area, that admits any orientation.
    fn smallest_gap(&self, orientations: &[Orientation]) -> Option<(usize, Orientation)> {
        let mut best: Option<(usize, Orientation, Area)> = None;

        for (idx, region) in self.gaps.iter().enumerate() {
            let Some(orientation) = orientations.iter().find(|o| region.admits(o)) else {
                continue;
            };
            let area = region.area();
            match best {
                None => best = Some((idx, *orientation, area)),
                Some((_, _, best_area)) if area < best_area => {
                    best = Some((idx, *orientation, area));
                }
                _ => {}
            }
        }

        best.map(|(idx, orientation, _)| (idx, orientation))
    }

    fn place_on_shelf(&mut self, shelf_idx: usize, piece: &Piece, orientation: Orientation) {
        let gap = self.gap;
        let container_width = self.container_width;
        let shelf = &mut self.shelves[shelf_idx];

        let x = shelf.cursor_x;
        let y = shelf.y;
        shelf.cursor_x += orientation.width + gap;
        shelf.remaining_width = container_width - shelf.cursor_x;

        if self.track_gaps && orientation.height + gap < shelf.height {
            let region = GapRegion {
                x,
                y: y + orientation.height + gap,
                width: orientation.width,
                height: shelf.height - orientation.height - gap,
            };
            self.gaps.push(region);
        }

        self.placements.push(Placement {
            piece_id: piece.id,
            x,
            y,
            width: orientation.width,
            height: orientation.height,
            rotated: orientation.rotated,
        });
    }

    /// Opens a shelf below the lowest one, sized to `orientation`.
    fn open_shelf(&mut self, piece: &Piece, orientation: Orientation) {
        let y = self
            .shelves
            .last()
            .map(|last| last.y + last.height + self.gap)
            .unwrap_or(0);

        self.shelves.push(Shelf {
            y,
            height: orientation.height,
            cursor_x: 0,
            remaining_width: self.container_width,
        });
        self.place_on_shelf(self.shelves.len() - 1, piece, orientation);
    }

    /// Places a piece in a recorded gap, retiring it and keeping what is left
    /// to the right of and below the piece.
    fn place_in_gap(&mut self, gap_idx: usize, piece: &Piece, orientation: Orientation) {
        let region = self.gaps.remove(gap_idx);

        let right_width = region.width - orientation.width - self.gap;
        if right_width > 0 {
            self.gaps.push(GapRegion {
                x: region.x + orientation.width + self.gap,
                y: region.y,
                width: right_width,
                height: region.height,
            });
        }

        let below_height = region.height - orientation.height - self.gap;
        if below_height > 0 {
            self.gaps.push(GapRegion {
                x: region.x,
                y: region.y + orientation.height + self.gap,
                width: orientation.width,
                height: below_height,
            });
        }

        self.placements.push(Placement {
            piece_id: piece.id,
            x: region.x,
            y: region.y,
            width: orientation.width,
            height: orientation.height,
            rotated: orientation.rotated,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShelfChoice {
    FirstFit,
    BestFit,
}

impl Packer {
    /// Largest side first, widest orientation, first admitting shelf.
    pub(super) fn pack_largest_first(&self, pieces: &[Piece]) -> Result<Vec<Placement>> {
        let mut sorted = pieces.to_vec();
        sorted.sort_by_key(|p| Reverse(p.max_side()));

        let mut layout = ShelfLayout::new(self, false);
        for piece in &sorted {
            self.place_piece(
                &mut layout,
                piece,
                OrientationPreference::WidestFirst,
                ShelfChoice::FirstFit,
            )?;
        }
        Ok(layout.placements)
    }

    /// Narrowest side first, narrow orientation, first admitting shelf.
    pub(super) fn pack_narrow(&self, pieces: &[Piece]) -> Result<Vec<Placement>> {
        let mut sorted = pieces.to_vec();
        sorted.sort_by_key(|p| Reverse(p.min_side()));

        let mut layout = ShelfLayout::new(self, false);
        for piece in &sorted {
            self.place_piece(
                &mut layout,
                piece,
                OrientationPreference::NarrowestFirst,
                ShelfChoice::FirstFit,
            )?;
        }
        Ok(layout.placements)
    }

    /// Similar-size groups in turn, each largest side first onto the best-fit shelf.
    pub(super) fn pack_grouped(&self, pieces: &[Piece]) -> Result<Vec<Placement>> {
        let mut layout = ShelfLayout::new(self, false);

        for mut group in similar_size_groups(pieces) {
            group.sort_by_key(|p| Reverse(p.max_side()));
            for piece in &group {
                self.place_piece(
                    &mut layout,
                    piece,
                    OrientationPreference::WidestFirst,
                    ShelfChoice::BestFit,
                )?;
            }
        }
        Ok(layout.placements)
    }

    /// Largest area first; recorded gaps are tried before the best-fit shelf.
    pub(super) fn pack_gap_fill(&self, pieces: &[Piece]) -> Result<Vec<Placement>> {
        let mut sorted = pieces.to_vec();
        sorted.sort_by_key(|p| Reverse(p.area()));

        let mut layout = ShelfLayout::new(self, true);
        for piece in &sorted {
            let orientations = self.orientations(piece, OrientationPreference::NarrowestFirst)?;
            if let Some((gap_idx, orientation)) = layout.smallest_gap(&orientations) {
                layout.place_in_gap(gap_idx, piece, orientation);
                continue;
            }
            match layout.best_fit(&orientations) {
                Some((shelf_idx, orientation)) => {
                    layout.place_on_shelf(shelf_idx, piece, orientation)
                }
                None => layout.open_shelf(piece, orientations[0]),
            }
        }
        Ok(layout.placements)
    }

    fn place_piece(
        &self,
        layout: &mut ShelfLayout,
        piece: &Piece,
        preference: OrientationPreference,
        choice: ShelfChoice,
    ) -> Result<()> {
        let orientations = self.orientations(piece, preference)?;
        let target = match choice {
            ShelfChoice::FirstFit => layout.first_fit(&orientations),
            ShelfChoice::BestFit => layout.best_fit(&orientations),
        };

        match target {
            Some((shelf_idx, orientation)) => layout.place_on_shelf(shelf_idx, piece, orientation),
            None => layout.open_shelf(piece, orientations[0]),
        }
        Ok(())
    }
}

/// Partitions pieces into groups of similar narrowest side.
///
/// Seeds are taken in descending narrowest-side order; every ungrouped piece
/// within [`GROUP_TOLERANCE_PERCENT`] of the seed joins its group.
fn similar_size_groups(pieces: &[Piece]) -> Vec<Vec<Piece>> {
    let mut by_min_side = pieces.to_vec();
    by_min_side.sort_by_key(|p| Reverse(p.min_side()));

    let mut grouped = vec![false; by_min_side.len()];
    let mut groups = Vec::new();

    for seed_idx in 0..by_min_side.len() {
        if grouped[seed_idx] {
            continue;
        }
        let seed = by_min_side[seed_idx].min_side();

        let mut group = Vec::new();
        for (idx, piece) in by_min_side.iter().enumerate().skip(seed_idx) {
            if grouped[idx] {
                continue;
            }
            let diff = (seed - piece.min_side()).abs();
            if diff * 100 <= seed * GROUP_TOLERANCE_PERCENT {
                grouped[idx] = true;
                group.push(*piece);
            }
        }
        groups.push(group);
    }

    groups
}
