use super::*;

/// `used / total` as a percentage rounded to two decimals, half to even;
/// zero for an empty total.
pub fn efficiency_pct(used_area: Area, total_area: Area) -> f64 {
    if total_area <= 0 {
        return 0.0;
    }

    // Hundredths of a percent, computed exactly.
    let scaled = i128::from(used_area) * 10_000;
    let total = i128::from(total_area);
    let mut hundredths = scaled.div_euclid(total);
    let twice_rem = 2 * scaled.rem_euclid(total);
    if twice_rem > total || (twice_rem == total && hundredths % 2 != 0) {
        hundredths += 1;
    }
    hundredths as f64 / 100.0
}

impl Packer {
    /// Derives length, area and efficiency figures from a finished placement list.
    pub(super) fn build_result(
        &self,
        heuristic: HeuristicKind,
        placements: Vec<Placement>,
        skipped: Vec<PieceId>,
    ) -> Result<PackingResult> {
        let total_length = placements.iter().map(|p| p.bottom()).max().unwrap_or(0);
        let total_area = self
            .container_width
            .checked_mul(total_length)
            .ok_or_else(|| area_overflow(self.container_width, total_length))?;
        // Placed dimensions are a permutation of the originals, so this is the piece area.
        let used_area = placements
            .iter()
            .try_fold(0 as Area, |sum, p| sum.checked_add(p.area()))
            .ok_or_else(|| area_overflow(self.container_width, total_length))?;

        Ok(PackingResult {
            heuristic,
            container_width: self.container_width,
            gap: self.gap,
            total_length,
            total_area,
            used_area,
            waste_area: total_area - used_area,
            efficiency_pct: efficiency_pct(used_area, total_area),
            placements,
            skipped,
        })
    }
}

fn area_overflow(width: Length, length: Length) -> PackError {
    PackError::InvalidInput(format!(
        "layout of {} x {} is too large to measure",
        width, length
    ))
}
