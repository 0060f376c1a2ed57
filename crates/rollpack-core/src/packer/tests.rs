use super::*;

/// Validates a finished layout:
/// 1. Every placement lies across the roll, at non-negative coordinates
/// 2. No two placements overlap
/// 3. Placed dimensions are the piece's own, possibly swapped
/// 4. Every piece is placed or skipped exactly once
fn assert_layout_valid(result: &PackingResult, pieces: &[Piece]) {
    for p in &result.placements {
        assert!(p.x >= 0 && p.y >= 0, "piece {} at negative position", p.piece_id);
        assert!(
            p.right() <= result.container_width,
            "piece {} exceeds roll width: x={} + w={} > {}",
            p.piece_id,
            p.x,
            p.width,
            result.container_width
        );

        let piece = pieces.iter().find(|piece| piece.id == p.piece_id).unwrap();
        let expected = if p.rotated {
            (piece.height, piece.width)
        } else {
            (piece.width, piece.height)
        };
        assert_eq!((p.width, p.height), expected, "piece {} distorted", p.piece_id);
    }

    for i in 0..result.placements.len() {
        for j in (i + 1)..result.placements.len() {
            let a = &result.placements[i];
            let b = &result.placements[j];
            assert!(
                !a.overlaps(b),
                "piece {} @ ({},{}) overlaps piece {} @ ({},{})",
                a.piece_id,
                a.x,
                a.y,
                b.piece_id,
                b.x,
                b.y
            );
        }
    }

    let mut seen: Vec<PieceId> = result
        .placements
        .iter()
        .map(|p| p.piece_id)
        .chain(result.skipped.iter().copied())
        .collect();
    seen.sort_unstable();
    let mut expected: Vec<PieceId> = pieces.iter().map(|p| p.id).collect();
    expected.sort_unstable();
    assert_eq!(seen, expected);

    assert!(result.efficiency_pct >= 0.0 && result.efficiency_pct <= 100.0);
    assert_eq!(result.waste_area, result.total_area - result.used_area);
}

fn placement_of(result: &PackingResult, piece_id: PieceId) -> Placement {
    *result
        .placements
        .iter()
        .find(|p| p.piece_id == piece_id)
        .unwrap()
}

fn mixed_pieces() -> Vec<Piece> {
    vec![
        Piece::new(0, 3000, 4000),
        Piece::new(1, 2500, 2000),
        Piece::new(2, 1200, 3600),
        Piece::new(3, 4000, 5000),
        Piece::new(4, 2000, 2000),
        Piece::new(5, 800, 600),
        Piece::new(6, 1500, 900),
        Piece::new(7, 600, 600),
        Piece::new(8, 3300, 1100),
        Piece::new(9, 450, 2100),
    ]
}

#[test]
fn test_single_piece_largest_first() {
    // 2.0 x 3.0 m on a 4.0 m roll: the widest orientation lies 3.0 m across.
    let pieces = vec![Piece::new(0, 2000, 3000)];
    let result = pack(4000, &pieces, HeuristicKind::LargestFirstShelf, 150).unwrap();

    assert_layout_valid(&result, &pieces);
    let p = placement_of(&result, 0);
    assert_eq!((p.x, p.y), (0, 0));
    assert!(p.rotated);
    assert_eq!(result.total_length, 2000);
    assert_eq!(result.efficiency_pct, 75.0);
}

#[test]
fn test_single_piece_narrow_orientation() {
    let pieces = vec![Piece::new(0, 2000, 3000)];
    let result = pack(4000, &pieces, HeuristicKind::NarrowOrientationShelf, 150).unwrap();

    let p = placement_of(&result, 0);
    assert_eq!((p.x, p.y), (0, 0));
    assert!(!p.rotated);
    assert_eq!(result.total_length, 3000);
    assert_eq!(result.total_area, 12_000_000);
    assert_eq!(result.used_area, 6_000_000);
    assert_eq!(result.efficiency_pct, 50.0);
}

#[test]
fn test_single_piece_only_upright_fits() {
    let pieces = vec![Piece::new(0, 2000, 3000)];
    let result = pack(2500, &pieces, HeuristicKind::LargestFirstShelf, 150).unwrap();

    let p = placement_of(&result, 0);
    assert!(!p.rotated);
    assert_eq!(result.total_length, 3000);
    assert_eq!(result.efficiency_pct, 80.0);
}

#[test]
fn test_two_pieces_share_shelf_without_gap() {
    let pieces = vec![Piece::new(0, 2000, 1000), Piece::new(1, 2000, 1000)];
    let result = pack(4000, &pieces, HeuristicKind::LargestFirstShelf, 0).unwrap();

    assert_layout_valid(&result, &pieces);
    assert_eq!(placement_of(&result, 0).x, 0);
    assert_eq!(placement_of(&result, 1).x, 2000);
    assert_eq!(placement_of(&result, 1).y, 0);
    assert_eq!(result.total_length, 1000);
    assert_eq!(result.efficiency_pct, 100.0);
}

#[test]
fn test_gap_pushes_second_piece_to_new_shelf() {
    let pieces = vec![Piece::new(0, 2000, 1000), Piece::new(1, 2000, 1000)];
    let result = pack(4000, &pieces, HeuristicKind::LargestFirstShelf, 150).unwrap();

    assert_layout_valid(&result, &pieces);
    let second = placement_of(&result, 1);
    assert_eq!((second.x, second.y), (0, 1150));
    assert_eq!(result.total_length, 2150);
    assert_eq!(result.efficiency_pct, 46.51);
}

#[test]
fn test_oversized_piece_rejected_by_shelf_heuristics() {
    let pieces = vec![Piece::new(0, 1000, 1000), Piece::new(7, 5000, 6000)];

    for heuristic in HeuristicKind::ALL.into_iter().filter(|h| h.is_shelf()) {
        let err = pack(4000, &pieces, heuristic, 150).unwrap_err();
        assert_eq!(
            err,
            PackError::OversizedPiece {
                piece_id: 7,
                min_side: 5000,
                container_width: 4000,
            }
        );
    }
}

#[test]
fn test_oversized_piece_skipped_by_guillotine() {
    let pieces = vec![Piece::new(0, 5000, 6000), Piece::new(1, 1000, 1000)];
    let result = pack(4000, &pieces, HeuristicKind::GuillotineBssf, 150).unwrap();

    assert_layout_valid(&result, &pieces);
    assert_eq!(result.skipped, vec![0]);
    assert_eq!(result.placements.len(), 1);
    assert_eq!(result.used_area, 1_000_000);
}

#[test]
fn test_oversized_piece_fits_joined_width() {
    let pieces = vec![Piece::new(0, 5000, 6000)];

    for heuristic in HeuristicKind::ALL {
        let result = pack(8000, &pieces, heuristic, 150).unwrap();
        assert_layout_valid(&result, &pieces);
        assert_eq!(result.placements.len(), 1);
    }

    let narrow = pack(8000, &pieces, HeuristicKind::NarrowOrientationShelf, 150).unwrap();
    assert!(!narrow.placements[0].rotated);
    assert_eq!(narrow.total_length, 6000);
}

#[test]
fn test_invalid_container_rejected() {
    let pieces = vec![Piece::new(0, 1000, 1000)];
    assert_eq!(
        pack(0, &pieces, HeuristicKind::LargestFirstShelf, 0).unwrap_err(),
        PackError::InvalidContainer { width: 0 }
    );
    assert!(matches!(
        pack(1000, &pieces, HeuristicKind::LargestFirstShelf, -1),
        Err(PackError::InvalidInput(_))
    ));
}

#[test]
fn test_empty_piece_list_packs_nothing() {
    let result = pack(4000, &[], HeuristicKind::GapFillShelf, 150).unwrap();
    assert!(result.placements.is_empty());
    assert_eq!(result.total_length, 0);
    assert_eq!(result.efficiency_pct, 0.0);
}

#[test]
fn test_square_has_single_orientation() {
    let piece = Piece::new(0, 1000, 1000);
    let found = orientations(&piece, 4000, OrientationPreference::WidestFirst).unwrap();
    assert_eq!(found.len(), 1);
    assert!(!found[0].rotated);
}

#[test]
fn test_orientation_preferences() {
    let piece = Piece::new(0, 1000, 3000);

    let widest = orientations(&piece, 4000, OrientationPreference::WidestFirst).unwrap();
    assert_eq!((widest[0].width, widest[0].rotated), (3000, true));
    assert_eq!((widest[1].width, widest[1].rotated), (1000, false));

    let narrowest = orientations(&piece, 4000, OrientationPreference::NarrowestFirst).unwrap();
    assert_eq!((narrowest[0].width, narrowest[0].rotated), (1000, false));

    // Only the upright orientation fits a 2 m roll.
    let limited = orientations(&piece, 2000, OrientationPreference::WidestFirst).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].width, 1000);

    assert!(matches!(
        orientations(&piece, 900, OrientationPreference::WidestFirst),
        Err(PackError::OversizedPiece { piece_id: 0, .. })
    ));
}

#[test]
fn test_narrow_orientation_packs_more_per_row() {
    let pieces = vec![Piece::new(0, 3000, 1000), Piece::new(1, 3000, 1000)];

    let narrow = pack(4000, &pieces, HeuristicKind::NarrowOrientationShelf, 0).unwrap();
    assert_eq!(placement_of(&narrow, 1).x, 1000);
    assert_eq!(narrow.total_length, 3000);
    assert_eq!(narrow.efficiency_pct, 50.0);

    let largest = pack(4000, &pieces, HeuristicKind::LargestFirstShelf, 0).unwrap();
    assert_eq!(placement_of(&largest, 1).y, 1000);
    assert_eq!(largest.total_length, 2000);
    assert_eq!(largest.efficiency_pct, 75.0);
}

#[test]
fn test_grouped_uses_best_fit_shelf() {
    let pieces = vec![
        Piece::new(0, 4000, 1500),
        Piece::new(1, 4800, 1000),
        Piece::new(2, 150, 150),
    ];

    // Groups: {0}, {1}, {2}. The second shelf leaves 200 across, the first 1000.
    let grouped = pack(5000, &pieces, HeuristicKind::GroupedBestFitShelf, 0).unwrap();
    assert_layout_valid(&grouped, &pieces);
    assert_eq!(placement_of(&grouped, 0).y, 0);
    assert_eq!(placement_of(&grouped, 1).y, 1500);
    let small = placement_of(&grouped, 2);
    assert_eq!((small.x, small.y), (4800, 1500));

    // First fit takes the first shelf with room instead.
    let first_fit = pack(5000, &pieces, HeuristicKind::LargestFirstShelf, 0).unwrap();
    let small = placement_of(&first_fit, 2);
    assert_eq!((small.x, small.y), (4800, 0));
}

#[test]
fn test_gap_fill_uses_space_above_short_piece() {
    let pieces = vec![
        Piece::new(0, 3000, 2000),
        Piece::new(1, 1000, 1000),
        Piece::new(2, 1000, 1000),
    ];
    let result = pack(4000, &pieces, HeuristicKind::GapFillShelf, 0).unwrap();

    assert_layout_valid(&result, &pieces);
    let tall = placement_of(&result, 0);
    assert!(tall.rotated);
    assert_eq!((tall.width, tall.height), (2000, 3000));
    assert_eq!(placement_of(&result, 1).x, 2000);
    let filled = placement_of(&result, 2);
    assert_eq!((filled.x, filled.y), (2000, 1000));
    assert_eq!(result.total_length, 3000);
    assert_eq!(result.efficiency_pct, 66.67);
}

#[test]
fn test_gap_fill_respects_spacing() {
    let pieces = vec![
        Piece::new(0, 3000, 2000),
        Piece::new(1, 1000, 1000),
        Piece::new(2, 900, 900),
    ];
    let result = pack(4000, &pieces, HeuristicKind::GapFillShelf, 100).unwrap();

    assert_layout_valid(&result, &pieces);
    // Piece 1 sits at x=2100; the gap above it starts 100 below its edge.
    let filled = placement_of(&result, 2);
    assert_eq!((filled.x, filled.y), (2100, 1100));
    assert_eq!(result.total_length, 3000);
}

#[test]
fn test_guillotine_gap_changes_layout() {
    let pieces = vec![Piece::new(0, 2000, 1000), Piece::new(1, 2000, 1000)];

    let tight = pack(4000, &pieces, HeuristicKind::GuillotineBssf, 0).unwrap();
    assert_layout_valid(&tight, &pieces);
    assert_eq!(placement_of(&tight, 1).x, 2000);
    assert_eq!(tight.total_length, 1000);
    assert_eq!(tight.efficiency_pct, 100.0);

    let spaced = pack(4000, &pieces, HeuristicKind::GuillotineBssf, 150).unwrap();
    assert_layout_valid(&spaced, &pieces);
    let second = placement_of(&spaced, 1);
    assert_eq!((second.x, second.y), (2150, 0));
    assert!(second.rotated);
    assert_eq!(spaced.total_length, 2000);
    assert!(tight.total_length <= spaced.total_length);
    assert!(tight.efficiency_pct >= spaced.efficiency_pct);
}

#[test]
fn test_all_heuristics_produce_valid_layouts() {
    let pieces = mixed_pieces();
    let total_area: Area = pieces.iter().map(|p| p.area()).sum();

    for heuristic in HeuristicKind::ALL {
        for gap in [0, 150] {
            let result = pack(9600, &pieces, heuristic, gap).unwrap();
            assert_layout_valid(&result, &pieces);
            assert!(result.skipped.is_empty());
            assert_eq!(result.used_area, total_area, "{heuristic} gap {gap}");
        }
    }
}

#[test]
fn test_all_heuristics_valid_on_narrow_roll() {
    let pieces = mixed_pieces();

    for heuristic in HeuristicKind::ALL {
        for gap in [0, 150] {
            let result = pack(4000, &pieces, heuristic, gap).unwrap();
            assert_layout_valid(&result, &pieces);
        }
    }
}

#[test]
fn test_packing_is_deterministic() {
    let pieces = mixed_pieces();

    for heuristic in HeuristicKind::ALL {
        let first = pack(5000, &pieces, heuristic, 150).unwrap();
        let second = pack(5000, &pieces, heuristic, 150).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_efficiency_rounding() {
    assert_eq!(efficiency_pct(1, 3), 33.33);
    assert_eq!(efficiency_pct(2, 3), 66.67);
    assert_eq!(efficiency_pct(5, 0), 0.0);
    assert_eq!(efficiency_pct(4, 4), 100.0);
}

#[test]
fn test_efficiency_halves_round_to_even() {
    // 3.125 % and 9.375 % sit exactly between two hundredths.
    assert_eq!(efficiency_pct(1, 32), 3.12);
    assert_eq!(efficiency_pct(3, 32), 9.38);
}

#[test]
fn test_non_positive_piece_dimensions_rejected() {
    let pieces = vec![Piece::new(0, -1000, 500), Piece::new(1, 500, 500)];
    for heuristic in HeuristicKind::ALL {
        assert!(matches!(
            pack(4000, &pieces, heuristic, 0),
            Err(PackError::InvalidInput(_))
        ));
    }

    let flat = vec![Piece::new(0, 1000, 0)];
    assert!(matches!(
        pack(4000, &flat, HeuristicKind::GuillotineBssf, 0),
        Err(PackError::InvalidInput(_))
    ));
}

#[test]
fn test_dimensions_beyond_limit_rejected() {
    let pieces = vec![Piece::new(0, 1000, MAX_LENGTH + 1)];
    assert!(matches!(
        pack(4000, &pieces, HeuristicKind::LargestFirstShelf, 0),
        Err(PackError::InvalidInput(_))
    ));
    assert_eq!(
        pack(MAX_LENGTH + 1, &[Piece::new(0, 1000, 1000)], HeuristicKind::LargestFirstShelf, 0)
            .unwrap_err(),
        PackError::InvalidContainer {
            width: MAX_LENGTH + 1
        }
    );
}

#[test]
fn test_layout_area_overflow_is_an_error() {
    let side = 900_000_000;
    let ten: Vec<Piece> = (0..10).map(|id| Piece::new(id, side, side)).collect();
    let result = pack(MAX_LENGTH, &ten, HeuristicKind::LargestFirstShelf, 0).unwrap();
    assert_eq!(result.total_length, 10 * side);

    // Eleven stacked rows push the roll area past i64.
    let eleven: Vec<Piece> = (0..11).map(|id| Piece::new(id, side, side)).collect();
    assert!(matches!(
        pack(MAX_LENGTH, &eleven, HeuristicKind::LargestFirstShelf, 0),
        Err(PackError::InvalidInput(_))
    ));
}
