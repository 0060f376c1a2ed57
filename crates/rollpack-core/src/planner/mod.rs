use crate::compare::{compare, CompareOptions};
use crate::packer::Packer;
use crate::scale::to_scaled;
use crate::types::*;
use std::collections::HashSet;
use tracing::debug;

mod report;

/// Turns a meter-denominated [`PlanRequest`] into engine inputs and back.
pub struct Planner {
    specs: Vec<PieceSpec>,
    pieces: Vec<Piece>,
    descriptions: Vec<String>,
    containers: Vec<Container>,
    options: CompareOptions,
}

impl Planner {
    /// Validates the request, applies the selection filter and dimension
    /// overrides, and scales every dimension.
    pub fn new(request: PlanRequest) -> Result<Self> {
        if request.containers.is_empty() {
            return Err(PackError::NoContainers);
        }

        let mut containers = Vec::with_capacity(request.containers.len());
        let mut descriptions = Vec::with_capacity(request.containers.len());
        for spec in &request.containers {
            let width = to_scaled(spec.roll_width)?;
            if width <= 0 {
                return Err(PackError::InvalidContainer { width });
            }
            containers.push(Container {
                id: spec.id.clone(),
                single_roll_width: width,
            });
            descriptions.push(spec.description.clone());
        }

        let mut seen = HashSet::new();
        for spec in &request.pieces {
            if !seen.insert(spec.id.as_str()) {
                return Err(PackError::InvalidInput(format!(
                    "Piece '{}' appears more than once",
                    spec.id
                )));
            }
        }

        let selected: HashSet<&str> = request.selected.iter().map(String::as_str).collect();
        let specs: Vec<PieceSpec> = request
            .pieces
            .iter()
            .filter(|spec| selected.is_empty() || selected.contains(spec.id.as_str()))
            .map(|spec| match request.overrides.get(&spec.id) {
                Some(tag) => PieceSpec {
                    id: spec.id.clone(),
                    width: tag.width,
                    length: tag.length,
                },
                None => spec.clone(),
            })
            .collect();

        if specs.is_empty() {
            return Err(PackError::EmptyPieceSet);
        }

        let pieces = specs
            .iter()
            .enumerate()
            .map(|(idx, spec)| {
                let width = to_scaled(spec.width)?;
                let height = to_scaled(spec.length)?;
                if width <= 0 || height <= 0 {
                    return Err(PackError::InvalidInput(format!(
                        "Piece '{}' must have positive dimensions",
                        spec.id
                    )));
                }
                Ok(Piece::new(idx, width, height))
            })
            .collect::<Result<Vec<_>>>()?;

        let production_gap = to_scaled(request.production_gap)?;
        if production_gap < 0 {
            return Err(PackError::InvalidInput(format!(
                "Production gap must not be negative, got {}",
                request.production_gap
            )));
        }

        debug!(
            pieces = pieces.len(),
            containers = containers.len(),
            production_gap,
            "plan prepared"
        );

        Ok(Self {
            specs,
            pieces,
            descriptions,
            containers,
            options: CompareOptions { production_gap },
        })
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Caller's id for an engine piece.
    pub fn piece_label(&self, id: PieceId) -> &str {
        self.specs.get(id).map(|s| s.id.as_str()).unwrap_or_default()
    }

    /// Runs every heuristic over every container.
    pub fn compare(&self) -> Result<Comparison> {
        compare(&self.containers, &self.pieces, &self.options)
    }

    /// Runs one heuristic on one roll width. `gap` defaults to the production gap.
    pub fn pack(
        &self,
        roll_width: f64,
        heuristic: HeuristicKind,
        gap: Option<f64>,
    ) -> Result<PackingResult> {
        let width = to_scaled(roll_width)?;
        let gap = match gap {
            Some(meters) => to_scaled(meters)?,
            None => self.options.production_gap,
        };
        Packer::new(width, gap)?.pack(&self.pieces, heuristic)
    }
}
