//! Integration tests for the Hexisle board engine.
//!
//! These drive the public API the way the protocol layer does: load a map,
//! ask legality questions, commit placements and read derived scores.

use hexisle_core::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

fn node(board: &Board, x: i32, y: i32, pos: u8) -> NodeId {
    board.node_at(x, y, pos).expect("node exists")
}

fn edge(board: &Board, x: i32, y: i32, pos: u8) -> EdgeId {
    board.edge_at(x, y, pos).expect("edge exists")
}

fn sorted<T: Ord>(mut items: Vec<T>) -> Vec<T> {
    items.sort();
    items
}

// ==================== Graph ====================

#[test]
fn test_standard_graph_shape() {
    let board = Board::standard();
    // 7 rows of the map text, 37 hexes in all
    assert_eq!(board.hexes().count(), 37);
    for id in board.node_ids() {
        let node = board.node(id);
        assert!((1..=3).contains(&node.hexes().len()));
        assert!((2..=3).contains(&node.edges().len()));
    }
    for id in board.edge_ids() {
        assert!((1..=2).contains(&board.edge(id).hexes().len()));
    }
}

#[test]
fn test_slots_resolve_from_any_touching_hex() {
    let board = Board::standard();
    for hex in board.hexes() {
        for k in 0..6u8 {
            let n = hex.node(k as usize);
            let loc = board.node(n).location();
            assert_eq!(board.node_at(loc.x, loc.y, loc.pos), Some(n));

            let e = hex.edge(k as usize);
            let loc = board.edge(e).location();
            assert_eq!(board.edge_at(loc.x, loc.y, loc.pos), Some(e));
        }
    }
}

// ==================== Normal play ====================

#[test]
fn test_settlement_on_single_hex_opens_its_sides() {
    let mut board = Board::load("h0", Rules::default()).unwrap();
    let mut record = BuildRecord::new();
    let home = node(&board, 0, 0, 0);
    board.commit(&mut record, 0, Placement::Settlement(home)).unwrap();

    for &e in board.node(home).edges() {
        assert!(board.can_build_road(e, 0));
    }
    assert!(!board.can_build_road(edge(&board, 0, 0, 3), 0));
    assert_eq!(
        sorted(board.legal_edges(BuildKind::Road, 0)),
        sorted(board.node(home).edges().to_vec())
    );
}

#[test]
fn test_inland_settlement_has_three_roads() {
    let mut board = Board::standard();
    let mut record = BuildRecord::new();
    let home = node(&board, 2, 2, 0);
    assert_eq!(board.node(home).edges().len(), 3);
    board.commit(&mut record, 0, Placement::Settlement(home)).unwrap();

    let legal = sorted(board.legal_edges(BuildKind::Road, 0));
    assert_eq!(legal, sorted(board.node(home).edges().to_vec()));
    assert!(board.legal_edges(BuildKind::Road, 1).is_empty());
}

#[test]
fn test_turn_undo_restores_legality() {
    let mut board = Board::standard();
    let mut record = BuildRecord::new();
    let home = node(&board, 2, 2, 0);
    board.commit(&mut record, 0, Placement::Settlement(home)).unwrap();
    record.clear();

    let before = board.clone();
    let road = board.legal_edges(BuildKind::Road, 0)[0];
    board.commit(&mut record, 0, Placement::Road(road)).unwrap();
    assert!(!board.can_build_road(road, 0));
    assert!(record.is_connected(&board, 0));

    board.undo(&mut record).unwrap();
    assert_eq!(board, before);
    assert!(board.can_build_road(road, 0));
}

// ==================== Setup ====================

#[test]
fn test_double_setup_first_edge() {
    let mut board = Board::standard();
    let mut record = BuildRecord::new();
    let mode = SetupMode::Double;

    // Nothing placed: an edge is fine as long as one end could be settled
    for e in board.edge_ids() {
        let expected = board.edge_on_land(e)
            && board.edge(e).nodes().iter().any(|&n| board.node_settleable(n));
        assert_eq!(board.can_setup_edge(&record, e, EdgeKind::Road, mode), expected);
    }

    let first = node(&board, 2, 2, 0);
    board.commit(&mut record, 0, Placement::Settlement(first)).unwrap();
    for e in board.edge_ids() {
        let expected = board.edge_on_land(e)
            && board.edge(e).piece().is_empty()
            && (board.edge_adjacent_to_node(e, first) || board.edge_has_place_for_settlement(e));
        assert_eq!(board.can_setup_edge(&record, e, EdgeKind::Road, mode), expected);
    }
}

#[test]
fn test_double_setup_full_step() {
    let mut board = Board::standard();
    let mut record = BuildRecord::new();
    let mode = SetupMode::Double;

    // Greedily take the first legal piece until the step is complete
    while !record.setup_complete(&board, mode) {
        let placement = if let Some(&n) = board.legal_setup_settlements(&record, mode).first() {
            Placement::Settlement(n)
        } else if let Some(&e) = board.legal_setup_edges(&record, EdgeKind::Road, mode).first() {
            Placement::Road(e)
        } else {
            panic!("setup step got stuck after {} placements", record.len());
        };
        board.commit(&mut record, 3, placement).unwrap();
        assert!(record.len() <= 4);
    }

    let step = record.take();
    assert_eq!(step.len(), 4);
    assert!(record.is_empty());
    let settled: HashSet<_> = board
        .node_ids()
        .filter(|&n| board.node(n).owner() == Some(3))
        .collect();
    assert_eq!(settled.len(), 2);
}

// ==================== Routes ====================

/// Edge chain along the top of row 0 of the strip map
fn top_chain(board: &Board, length: usize) -> Vec<EdgeId> {
    (0..)
        .flat_map(|x| [edge(board, x, 0, 2), edge(board, x, 0, 1)])
        .take(length)
        .collect()
}

const STRIP: &str = "h0,f1,m2,p3,t4\n";

fn build_chain(board: &mut Board, edges: &[EdgeId], owner: impl Fn(usize) -> PlayerId) {
    let mut record = BuildRecord::new();
    for (i, &e) in edges.iter().enumerate() {
        board.commit(&mut record, owner(i), Placement::Road(e)).unwrap();
    }
}

#[test]
fn test_route_scores() {
    let mut board = Board::load(STRIP, Rules::default()).unwrap();
    assert_eq!(board.longest_route(0), 0);

    let chain = top_chain(&board, 7);
    build_chain(&mut board, &chain, |i| if i == 2 { 1 } else { 0 });
    assert_eq!(board.route_lengths(2), vec![4, 1]);
}

// ==================== Chits and ports ====================

#[test]
fn test_chit_layout_scenario() {
    let rules = Rules {
        chits: vec![5, 6, 8],
        ..Rules::default()
    };
    let mut board = Board::load("s,d0,h1\ns,f2,m3", rules).unwrap();
    let roll = |board: &Board, x, y| board.hex(HexPos::new(x, y)).unwrap().roll;
    assert_eq!(roll(&board, 1, 0), 0);
    assert_eq!(board.robber(), Some(HexPos::new(1, 0)));
    assert_eq!(
        [roll(&board, 2, 0), roll(&board, 1, 1), roll(&board, 2, 1)],
        [5, 6, 8]
    );

    board.layout_chits(&[5, 6]).unwrap();
    assert_eq!(
        [roll(&board, 2, 0), roll(&board, 1, 1), roll(&board, 2, 1)],
        [5, 6, 5]
    );
}

#[test]
fn test_standard_rolls() {
    let board = Board::standard();
    let mut rolls: Vec<u8> = board.hexes().map(|h| h.roll).filter(|&r| r > 0).collect();
    rolls.sort();
    let mut expected = STANDARD_CHITS.to_vec();
    expected.sort();
    assert_eq!(rolls, expected);
}

#[test]
fn test_port_access_after_setup() {
    let mut board = Board::standard();
    let mut record = BuildRecord::new();
    // Upper corner of the generic port's facing side
    let harbour = node(&board, 2, 0, 5);
    board.commit(&mut record, 0, Placement::Settlement(harbour)).unwrap();
    let info = board.maritime_info(0);
    assert!(info.any_resource);
    assert_eq!(info.rate(Resource::Ore), 3);
}

#[test]
fn test_warnings_do_not_stop_loading() {
    let (board, warnings) = Board::load_with_warnings("h0,x,f1\ns7,m2", Rules::default()).unwrap();
    assert_eq!(warnings.len(), 2);
    assert_eq!(board.hexes().count(), 4);
    assert!(matches!(
        Board::load("h0,f", Rules::default()),
        Err(LoadError::Parse(ParseError::MissingChit { x: 1, y: 0 }))
    ));
}

// ==================== Properties ====================

fn cell() -> impl Strategy<Value = Option<char>> {
    prop_oneof![
        1 => Just(None),
        2 => Just(Some('s')),
        4 => prop::sample::select(vec!['h', 'f', 'm', 'p', 't', 'd', 'g']).prop_map(Some),
    ]
}

/// Map text with sequential chit indices on every land hex
fn map_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::collection::vec(cell(), 1..7), 1..7).prop_map(|rows| {
        let mut chit = 0;
        let mut lines = Vec::new();
        for row in rows {
            let mut tokens = Vec::new();
            for cell in row {
                tokens.push(match cell {
                    None => "-".to_string(),
                    Some('s') => "s".to_string(),
                    Some(terrain) => {
                        chit += 1;
                        format!("{}{}", terrain, chit - 1)
                    }
                });
            }
            lines.push(tokens.join(","));
        }
        lines.join("\n")
    })
}

proptest! {
    /// Property: every node lists an edge exactly when that edge lists the node
    #[test]
    fn prop_adjacency_is_symmetric(text in map_text()) {
        prop_assume!(text.chars().any(|c| c.is_ascii_alphabetic()));
        let board = Board::load(&text, Rules::default()).unwrap();

        for n in board.node_ids() {
            for e in board.edge_ids() {
                prop_assert_eq!(
                    board.node(n).edges().contains(&e),
                    board.edge(e).nodes().contains(&n)
                );
            }
        }
        for hex in board.hexes() {
            for k in 0..6 {
                prop_assert!(board.node(hex.node(k)).hexes().contains(&hex.pos));
                prop_assert!(board.edge(hex.edge(k)).hexes().contains(&hex.pos));
            }
        }
    }

    /// Property: re-encoding a board and loading it again keeps every hex
    #[test]
    fn prop_text_round_trip(text in map_text()) {
        prop_assume!(text.chars().any(|c| c.is_ascii_alphabetic()));
        let board = Board::load(&text, Rules::default()).unwrap();
        let again = Board::load(&board.to_text(), Rules::default()).unwrap();

        let tiles: Vec<_> = board.hexes().map(|h| (h.pos, h.tile())).collect();
        let again_tiles: Vec<_> = again.hexes().map(|h| (h.pos, h.tile())).collect();
        prop_assert_eq!(tiles, again_tiles);
    }

    /// Property: a plain chain of N roads scores N, and an opponent's road
    /// inside it leaves the longer of the two pieces
    #[test]
    fn prop_chain_scores(length in 1usize..=10, cut in 0usize..10) {
        let mut board = Board::load(STRIP, Rules::default()).unwrap();
        let chain = top_chain(&board, length);
        if cut < length {
            build_chain(&mut board, &chain, |i| if i == cut { 1 } else { 0 });
            let expected = cut.max(length - cut - 1) as u32;
            prop_assert_eq!(board.longest_route(0), expected);
        } else {
            build_chain(&mut board, &chain, |_| 0);
            prop_assert_eq!(board.longest_route(0), length as u32);
        }
    }

    /// Property: asking setup questions never changes the board
    #[test]
    fn prop_setup_checks_are_pure(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..3)) {
        let mut board = Board::standard();
        let mut record = BuildRecord::new();
        let mode = SetupMode::Double;
        for pick in picks {
            let nodes = board.legal_setup_settlements(&record, mode);
            if nodes.is_empty() {
                break;
            }
            board.commit(&mut record, 0, Placement::Settlement(nodes[pick.index(nodes.len())])).unwrap();
        }

        let before = board.clone();
        for e in board.edge_ids() {
            let _ = board.can_setup_edge(&record, e, EdgeKind::Road, mode);
        }
        for n in board.node_ids() {
            let _ = board.can_setup_settlement(&record, n, mode);
        }
        prop_assert_eq!(board, before);
    }
}
