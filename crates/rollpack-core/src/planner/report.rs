use super::*;
use crate::scale::{to_meters, to_square_meters};

impl Planner {
    /// Converts a packing result back to meters, labelling pieces with the
    /// caller's ids.
    pub fn summarize(&self, result: &PackingResult, join: Option<&JoinSpec>) -> LayoutSummary {
        let packed_items = result
            .placements
            .iter()
            .map(|p| {
                let piece = self.pieces.get(p.piece_id);
                PackedItem {
                    id: self.piece_label(p.piece_id).to_string(),
                    original_width: piece.map(|piece| to_meters(piece.width)).unwrap_or_default(),
                    original_length: piece.map(|piece| to_meters(piece.height)).unwrap_or_default(),
                    x: to_meters(p.x),
                    y: to_meters(p.y),
                    width: to_meters(p.width),
                    length: to_meters(p.height),
                    rotated: p.rotated,
                }
            })
            .collect();

        let (single_roll_width, joined_roll_count, seam_positions) = match join {
            Some(join) => (
                to_meters(join.single_roll_width),
                join.roll_count,
                join.seam_positions.iter().map(|&s| to_meters(s)).collect(),
            ),
            None => (to_meters(result.container_width), 1, Vec::new()),
        };

        LayoutSummary {
            roll_width: to_meters(result.container_width),
            single_roll_width,
            joined_roll_count,
            seam_positions,
            gap: to_meters(result.gap),
            total_length: to_meters(result.total_length),
            total_area: to_square_meters(result.total_area),
            used_area: to_square_meters(result.used_area),
            waste_area: to_square_meters(result.waste_area),
            efficiency_pct: result.efficiency_pct,
            piece_count: result.placements.len(),
            packed_items,
            unplaced: self.labels(&result.skipped),
        }
    }

    /// Flattens a comparison into display rows, best row flagged.
    pub fn report(&self, comparison: &Comparison) -> ComparisonReport {
        let rows = comparison
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| ComparisonRow {
                algorithm: entry.heuristic.display_name().to_string(),
                heuristic: entry.heuristic,
                container_id: entry.container_id.clone(),
                description: self.description_of(&entry.container_id),
                gap_policy: entry.gap_policy,
                is_best: idx == comparison.best,
                fittable_count: entry.fittable_count,
                skipped_count: entry.skipped_piece_ids.len(),
                skipped_ids: self.labels(&entry.skipped_piece_ids),
                layout: self.summarize(&entry.result, entry.join.as_ref()),
            })
            .collect();

        ComparisonReport {
            rows,
            total_selected: comparison.total_selected,
        }
    }

    fn labels(&self, ids: &[PieceId]) -> Vec<String> {
        ids.iter().map(|&id| self.piece_label(id).to_string()).collect()
    }

    fn description_of(&self, container_id: &str) -> String {
        self.containers
            .iter()
            .position(|c| c.id == container_id)
            .and_then(|idx| self.descriptions.get(idx))
            .cloned()
            .unwrap_or_default()
    }
}
