use super::*;

/// Stand-in for the unbounded roll length. Large enough never to be reached,
/// small enough that coordinates plus lengths stay inside `i64`.
const UNBOUNDED_LENGTH: Length = i64::MAX / 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct FreeRect {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
}

impl FreeRect {
    fn right(&self) -> Length {
        self.x + self.width
    }

    fn bottom(&self) -> Length {
        self.y + self.height
    }

    fn intersects(&self, other: &FreeRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    fn contains(&self, other: &FreeRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    fn admits(&self, orientation: &Orientation) -> bool {
        orientation.width <= self.width && orientation.height <= self.height
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct ScoredPlacement {
    pub free_idx: usize,
    pub orientation: Orientation,
    /// (short side leftover, long side leftover); lower is better.
    pub score: (Length, Length),
}

/// Maximal free rectangles of a roll being packed.
#[derive(Debug, Clone)]
pub(super) struct FreeRectBin {
    gap: Length,
    pub free_rects: Vec<FreeRect>,
}

impl FreeRectBin {
    pub fn new(container_width: Length, gap: Length) -> Self {
        Self {
            gap,
            free_rects: vec![FreeRect {
                x: 0,
                y: 0,
                width: container_width,
                height: UNBOUNDED_LENGTH,
            }],
        }
    }

    /// Best short side fit over every free rectangle and orientation.
    /// Ties keep the first candidate encountered.
    pub fn find_best(&self, orientations: &[Orientation]) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            for orientation in orientations {
                if !free.admits(orientation) {
                    continue;
                }
                let score = Self::score(free, orientation);
                match best {
                    Some(current) if current.score <= score => {}
                    _ => {
                        best = Some(ScoredPlacement {
                            free_idx: idx,
                            orientation: *orientation,
                            score,
                        })
                    }
                }
            }
        }

        best
    }

    fn score(free: &FreeRect, orientation: &Orientation) -> (Length, Length) {
        let leftover_w = free.width - orientation.width;
        let leftover_h = free.height - orientation.height;
        (leftover_w.min(leftover_h), leftover_w.max(leftover_h))
    }

    pub fn place(&mut self, piece_id: PieceId, scored: ScoredPlacement) -> Placement {
        let free = self.free_rects[scored.free_idx];
        let orientation = scored.orientation;

        // The spacing travels with the piece but never leaves its free rectangle.
        let used = FreeRect {
            x: free.x,
            y: free.y,
            width: (orientation.width + self.gap).min(free.width),
            height: (orientation.height + self.gap).min(free.height),
        };

        self.split(used);
        self.prune();

        Placement {
            piece_id,
            x: free.x,
            y: free.y,
            width: orientation.width,
            height: orientation.height,
            rotated: orientation.rotated,
        }
    }

    /// Replaces every free rectangle touching `used` by its remainders.
    fn split(&mut self, used: FreeRect) {
        let current = std::mem::take(&mut self.free_rects);
        let mut next = Vec::with_capacity(current.len() + 4);

        for free in current {
            if !free.intersects(&used) {
                next.push(free);
                continue;
            }

            // Left
            if used.x > free.x {
                next.push(FreeRect {
                    x: free.x,
                    y: free.y,
                    width: used.x - free.x,
                    height: free.height,
                });
            }
            // Right
            if used.right() < free.right() {
                next.push(FreeRect {
                    x: used.right(),
                    y: free.y,
                    width: free.right() - used.right(),
                    height: free.height,
                });
            }
            // Above
            if used.y > free.y {
                next.push(FreeRect {
                    x: free.x,
                    y: free.y,
                    width: free.width,
                    height: used.y - free.y,
                });
            }
            // Below
            if used.bottom() < free.bottom() {
                next.push(FreeRect {
                    x: free.x,
                    y: used.bottom(),
                    width: free.width,
                    height: free.bottom() - used.bottom(),
                });
            }
        }

        self.free_rects = next;
    }

    /// Drops free rectangles contained in another one. Of two identical
    /// rectangles the earlier survives.
    fn prune(&mut self) {
        let mut i = 0;
        while i < self.free_rects.len() {
            let mut removed = false;
            let mut j = i + 1;
            while j < self.free_rects.len() {
                if self.free_rects[i].contains(&self.free_rects[j]) {
                    self.free_rects.remove(j);
                } else if self.free_rects[j].contains(&self.free_rects[i]) {
                    self.free_rects.remove(i);
                    removed = true;
                    break;
                } else {
                    j += 1;
                }
            }
            if !removed {
                i += 1;
            }
        }
    }
}

impl Packer {
    /// Best short side fit over maximal free rectangles. Pieces that cannot be
    /// laid across the roll are skipped rather than failing the run.
    pub(super) fn pack_guillotine(&self, pieces: &[Piece]) -> (Vec<Placement>, Vec<PieceId>) {
        let mut sorted = pieces.to_vec();
        sorted.sort_by(|a, b| {
            b.area()
                .cmp(&a.area())
                .then_with(|| b.max_side().cmp(&a.max_side()))
        });

        let mut bin = FreeRectBin::new(self.container_width, self.gap);
        let mut placements = Vec::with_capacity(sorted.len());
        let mut skipped = Vec::new();

        for piece in &sorted {
            let orientations = match self.orientations(piece, OrientationPreference::WidestFirst) {
                Ok(orientations) => orientations,
                Err(err) => {
                    debug!(piece = piece.id, %err, "skipping piece");
                    skipped.push(piece.id);
                    continue;
                }
            };

            match bin.find_best(&orientations) {
                Some(scored) => placements.push(bin.place(piece.id, scored)),
                None => {
                    debug!(piece = piece.id, "no free rectangle admits piece");
                    skipped.push(piece.id);
                }
            }
        }

        (placements, skipped)
    }
}

#[cfg(test)]
mod bin_tests {
    use super::*;

    fn upright(width: Length, height: Length) -> Orientation {
        Orientation {
            width,
            height,
            rotated: false,
        }
    }

    #[test]
    fn test_place_splits_right_and_below() {
        let mut bin = FreeRectBin::new(4000, 0);
        let scored = bin.find_best(&[upright(1000, 500)]).unwrap();
        let p = bin.place(0, scored);

        assert_eq!((p.x, p.y), (0, 0));
        assert_eq!(bin.free_rects.len(), 2);
        assert!(bin
            .free_rects
            .iter()
            .any(|f| f.x == 1000 && f.y == 0 && f.width == 3000));
        assert!(bin
            .free_rects
            .iter()
            .any(|f| f.x == 0 && f.y == 500 && f.width == 4000));
    }

    #[test]
    fn test_gap_grows_consumed_region() {
        let mut bin = FreeRectBin::new(4000, 150);
        let scored = bin.find_best(&[upright(1000, 500)]).unwrap();
        bin.place(0, scored);

        assert!(bin.free_rects.iter().any(|f| f.x == 1150 && f.width == 2850));
        assert!(bin.free_rects.iter().any(|f| f.y == 650 && f.width == 4000));
    }

    #[test]
    fn test_gap_capped_at_roll_edge() {
        let mut bin = FreeRectBin::new(1000, 150);
        let scored = bin.find_best(&[upright(1000, 500)]).unwrap();
        bin.place(0, scored);

        // Nothing is left across the roll, only below the piece and its spacing.
        assert_eq!(bin.free_rects.len(), 1);
        assert_eq!(bin.free_rects[0].x, 0);
        assert_eq!(bin.free_rects[0].y, 650);
    }

    #[test]
    fn test_prune_removes_contained() {
        let mut bin = FreeRectBin::new(100, 0);
        bin.free_rects = vec![
            FreeRect { x: 0, y: 0, width: 10, height: 10 },
            FreeRect { x: 0, y: 0, width: 50, height: 50 },
            FreeRect { x: 0, y: 0, width: 50, height: 50 },
            FreeRect { x: 60, y: 0, width: 10, height: 10 },
        ];
        bin.prune();

        assert_eq!(
            bin.free_rects,
            vec![
                FreeRect { x: 0, y: 0, width: 50, height: 50 },
                FreeRect { x: 60, y: 0, width: 10, height: 10 },
            ]
        );
    }

    #[test]
    fn test_short_side_score_prefers_tight_width() {
        let bin = FreeRectBin::new(4000, 0);
        let scored = bin
            .find_best(&[upright(2000, 3000), upright(3000, 2000)])
            .unwrap();
        // 1000 left across the roll beats 2000.
        assert_eq!(scored.orientation.width, 3000);
        assert_eq!(scored.score.0, 1000);
    }
}
