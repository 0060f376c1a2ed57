//! Runs every heuristic against every container and picks the best layout.

use crate::packer::{validate_pieces, Packer};
use crate::scale::MAX_LENGTH;
use crate::types::*;
use rayon::prelude::*;
use tracing::{debug, info, warn};


/// Spacing used on the cutting floor, in sub-units.
pub const DEFAULT_PRODUCTION_GAP: Length = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub production_gap: Length,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            production_gap: DEFAULT_PRODUCTION_GAP,
        }
    }
}

impl CompareOptions {
    fn gap_for(&self, policy: GapPolicy) -> Length {
        match policy {
            GapPolicy::Production => self.production_gap,
            GapPolicy::Zero => 0,
        }
    }
}

/// Outcome of one (heuristic, gap policy) job on one roll width.
struct Run {
    heuristic: HeuristicKind,
    gap_policy: GapPolicy,
    outcome: Result<PackingResult>,
}

/// Compares all heuristics over all containers.
///
/// Per container, pieces that fit a single roll are packed at the single
/// width. When some do not, every selected piece is also packed on a joined
/// roll, of which only the heuristic with the best production efficiency is
/// kept. Zero-gap entries are never longer than their production entries.
/// Invalid pieces or containers are rejected before anything is packed;
/// after that, failed combinations are dropped and the call only fails when
/// nothing succeeded.
pub fn compare(
    containers: &[Container],
    pieces: &[Piece],
    options: &CompareOptions,
) -> Result<Comparison> {
    if pieces.is_empty() {
        return Err(PackError::EmptyPieceSet);
    }
    if containers.is_empty() {
        return Err(PackError::NoContainers);
    }
    if options.production_gap < 0 {
        return Err(PackError::InvalidInput(format!(
            "production gap must not be negative, got {}",
            options.production_gap
        )));
    }

    validate_pieces(pieces)?;
    if let Some(container) = containers
        .iter()
        .find(|c| c.single_roll_width <= 0 || c.single_roll_width > MAX_LENGTH)
    {
        return Err(PackError::InvalidContainer {
            width: container.single_roll_width,
        });
    }

    let mut entries = Vec::new();

    for container in containers {
        let width = container.single_roll_width;

        let (fittable, oversized): (Vec<Piece>, Vec<Piece>) =
            pieces.iter().partition(|p| p.min_side() <= width);
        let skipped_piece_ids: Vec<PieceId> = oversized.iter().map(|p| p.id).collect();

        debug!(
            container = %container.id,
            width,
            fittable = fittable.len(),
            oversized = oversized.len(),
            "comparing container"
        );

        if !fittable.is_empty() {
            for run in run_all(width, &fittable, options) {
                match run.outcome {
                    Ok(result) => entries.push(ComparisonEntry {
                        container_id: container.id.clone(),
                        heuristic: run.heuristic,
                        gap_policy: run.gap_policy,
                        result,
                        fittable_count: fittable.len(),
                        skipped_piece_ids: skipped_piece_ids.clone(),
                        join: None,
                    }),
                    Err(err) => warn!(
                        container = %container.id,
                        heuristic = run.heuristic.key(),
                        %err,
                        "heuristic failed"
                    ),
                }
            }
        }

        if oversized.is_empty() {
            continue;
        }

        let Some(join) = JoinSpec::for_pieces(width, pieces)? else {
            continue;
        };
        let runs = run_all(join.joined_width, pieces, options);

        let Some(winner) = best_joined_heuristic(&runs) else {
            warn!(container = %container.id, "no heuristic packed the joined roll");
            continue;
        };

        for run in runs.into_iter().filter(|run| run.heuristic == winner) {
            match run.outcome {
                Ok(result) => entries.push(ComparisonEntry {
                    container_id: container.id.clone(),
                    heuristic: run.heuristic,
                    gap_policy: run.gap_policy,
                    result,
                    fittable_count: pieces.len(),
                    skipped_piece_ids: Vec::new(),
                    join: Some(join.clone()),
                }),
                Err(err) => warn!(
                    container = %container.id,
                    heuristic = run.heuristic.key(),
                    %err,
                    "heuristic failed on joined roll"
                ),
            }
        }
    }

    let best = select_best(&entries).ok_or(PackError::NoFeasibleLayout)?;
    let chosen = &entries[best];
    info!(
        container = %chosen.container_id,
        heuristic = chosen.heuristic.key(),
        efficiency = chosen.result.efficiency_pct,
        joined = chosen.is_joined(),
        candidates = entries.len(),
        "comparison complete"
    );

    Ok(Comparison {
        entries,
        best,
        total_selected: pieces.len(),
    })
}

/// Every heuristic under every gap policy on one roll width. Jobs run in
/// parallel; results come back in job order.
fn run_all(width: Length, pieces: &[Piece], options: &CompareOptions) -> Vec<Run> {
    let jobs: Vec<(HeuristicKind, GapPolicy)> = HeuristicKind::ALL
        .iter()
        .flat_map(|&heuristic| GapPolicy::ALL.iter().map(move |&policy| (heuristic, policy)))
        .collect();

    let mut runs: Vec<Run> = jobs
        .into_par_iter()
        .map(|(heuristic, gap_policy)| Run {
            heuristic,
            gap_policy,
            outcome: Packer::new(width, options.gap_for(gap_policy))
                .and_then(|packer| packer.pack(pieces, heuristic)),
        })
        .collect();

    settle_zero_gap(&mut runs);
    runs
}

/// A spaced layout is also a valid gapless one, so a zero-gap run that came
/// out longer than its production run is replaced by the production layout.
fn settle_zero_gap(runs: &mut [Run]) {
    for heuristic in HeuristicKind::ALL {
        let production = runs.iter().find_map(|run| match &run.outcome {
            Ok(result) if run.heuristic == heuristic && run.gap_policy == GapPolicy::Production => {
                Some(result.clone())
            }
            _ => None,
        });
        let Some(production) = production else {
            continue;
        };

        for run in runs
            .iter_mut()
            .filter(|run| run.heuristic == heuristic && run.gap_policy == GapPolicy::Zero)
        {
            let longer = match &run.outcome {
                Ok(zero) => {
                    zero.total_length > production.total_length
                        || zero.efficiency_pct < production.efficiency_pct
                }
                Err(_) => true,
            };
            if longer {
                debug!(
                    heuristic = heuristic.key(),
                    length = production.total_length,
                    "zero-gap run takes the production layout"
                );
                run.outcome = Ok(PackingResult {
                    gap: 0,
                    ..production.clone()
                });
            }
        }
    }
}

/// Heuristic with the highest production-gap efficiency; earliest wins ties.
fn best_joined_heuristic(runs: &[Run]) -> Option<HeuristicKind> {
    runs.iter()
        .filter(|run| run.gap_policy == GapPolicy::Production)
        .filter_map(|run| run.outcome.as_ref().ok().map(|r| (run.heuristic, r.efficiency_pct)))
        .fold(None, |best: Option<(HeuristicKind, f64)>, candidate| match best {
            Some((_, best_eff)) if best_eff >= candidate.1 => best,
            _ => Some(candidate),
        })
        .map(|(heuristic, _)| heuristic)
}

/// Index of the best production-gap entry. Single-roll entries always rank
/// ahead of joined ones; within a class the highest efficiency wins and the
/// earliest entry wins ties.
pub(crate) fn select_best(entries: &[ComparisonEntry]) -> Option<usize> {
    let production: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.gap_policy == GapPolicy::Production)
        .map(|(idx, _)| idx)
        .collect();

    // Zero-gap results only compete if nothing was packed with production spacing.
    let candidates: Vec<usize> = if production.is_empty() {
        (0..entries.len()).collect()
    } else {
        production
    };

    candidates.into_iter().fold(None, |best, idx| match best {
        None => Some(idx),
        Some(best_idx) if ranks_above(&entries[idx], &entries[best_idx]) => Some(idx),
        Some(best_idx) => Some(best_idx),
    })
}

fn ranks_above(candidate: &ComparisonEntry, current: &ComparisonEntry) -> bool {
    match (candidate.is_joined(), current.is_joined()) {
        (false, true) => true,
        (true, false) => false,
        _ => candidate.result.efficiency_pct > current.result.efficiency_pct,
    }
}
