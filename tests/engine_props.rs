mod common;

use std::collections::HashSet;

use arborlab::bst::{self, DuplicatePolicy};
use arborlab::maze::{
    evaluate_user_path, generate_maze, has_path, shortest_path, MazeConfig, MazeGrid,
};
use arborlab::shape;
use arborlab::traversal::{traverse, traverse_steps, TraversalKind};
use arborlab::tree::{layout, validate_structure, LayoutConfig, NodeIdGen};
use arborlab::util::seeded_rng;
use proptest::prelude::*;

fn maze_text(size: usize, walls: &[bool]) -> String {
    let mut text = String::new();
    for row in 0..size {
        for col in 0..size {
            let ch = if row == 0 && col == 0 {
                'S'
            } else if row == size - 1 && col == size - 1 {
                'E'
            } else if walls[row * size + col] {
                '#'
            } else {
                '.'
            };
            text.push(ch);
        }
        text.push('\n');
    }
    text
}

proptest! {
    #[test]
    fn inorder_of_built_bst_is_sorted(values in proptest::collection::vec(-500i32..500, 0..40)) {
        let tree = bst::build(values.clone());
        let mut sorted = values;
        sorted.sort();
        prop_assert_eq!(traverse(tree.as_ref(), TraversalKind::Inorder), sorted);
    }

    #[test]
    fn distinct_values_build_a_valid_bst(
        values in proptest::collection::hash_set(0i32..1000, 1..40),
    ) {
        let values: Vec<i32> = values.into_iter().collect();
        let tree = bst::build(values.iter().copied()).expect("non-empty");
        prop_assert!(bst::is_valid_bst(Some(&tree)));
        prop_assert!(validate_structure(Some(&tree)).is_ok());
        for v in &values {
            prop_assert!(bst::contains(Some(&tree), v));
        }
    }

    #[test]
    fn traversals_agree_on_contents(values in proptest::collection::vec(0i32..100, 1..30)) {
        let tree = bst::build(values).expect("non-empty");
        let root = Some(&tree);
        let count = shape::node_count(root);

        let mut reference = traverse(root, TraversalKind::Inorder);
        reference.sort();
        for kind in TraversalKind::ALL {
            let mut order = traverse(root, kind);
            prop_assert_eq!(order.len(), count);
            order.sort();
            prop_assert_eq!(&order, &reference);
            prop_assert_eq!(traverse_steps(root, kind).len(), count);
        }

        prop_assert_eq!(traverse(root, TraversalKind::Preorder)[0], tree.value);
        let postorder = traverse(root, TraversalKind::Postorder);
        prop_assert_eq!(*postorder.last().expect("non-empty"), tree.value);
        prop_assert_eq!(
            traverse(root, TraversalKind::Dfs),
            traverse(root, TraversalKind::Preorder)
        );
    }

    #[test]
    fn slot_lookup_matches_insertion(
        values in proptest::collection::hash_set(0i32..200, 1..25),
        candidate in 0i32..200,
    ) {
        let values: Vec<i32> = values.into_iter().collect();
        prop_assume!(!values.contains(&candidate));
        let tree = bst::build(values.iter().copied()).expect("non-empty");

        let slot = bst::find_insertion_slot(Some(&tree), &candidate, DuplicatePolicy::Reject)
            .expect("absent value has a slot");
        let again = bst::find_insertion_slot(Some(&tree), &candidate, DuplicatePolicy::Reject);
        prop_assert_eq!(Some(&slot), again.as_ref());

        let grown = bst::insert(Some(&tree), "candidate", candidate);
        let parent = grown.find(&slot.parent_id).expect("parent survives");
        let child = parent.child(slot.side).expect("slot filled");
        prop_assert_eq!(child.id.as_str(), "candidate");
        prop_assert!(bst::is_valid_bst(Some(&grown)));
        prop_assert_eq!(shape::node_count(Some(&tree)) + 1, shape::node_count(Some(&grown)));
    }

    #[test]
    fn balanced_build_is_balanced(values in proptest::collection::vec(0i32..1000, 1..64)) {
        let tree = bst::build_balanced(&values, &mut NodeIdGen::default()).expect("non-empty");
        prop_assert!(bst::is_valid_bst(Some(&tree)));
        prop_assert!(shape::is_balanced(Some(&tree)));
        let distinct: HashSet<i32> = values.into_iter().collect();
        prop_assert_eq!(shape::node_count(Some(&tree)), distinct.len());
    }

    #[test]
    fn layout_places_every_node_inside_margins(
        values in proptest::collection::vec(0i32..100, 1..20),
    ) {
        let tree = bst::build(values).expect("non-empty");
        let config = LayoutConfig::default();
        let positions = layout(Some(&tree), &config);
        prop_assert_eq!(positions.len(), shape::node_count(Some(&tree)));
        for pos in &positions {
            prop_assert!(pos.x >= config.margin && pos.x <= config.width - config.margin);
            prop_assert_eq!(pos.y, config.level_y(pos.level));
            if let Some(py) = pos.parent_y {
                prop_assert!(py < pos.y);
            }
        }
    }

    #[test]
    fn generated_mazes_are_solvable(seed in any::<u64>(), size in 2usize..10, p in 0.0f64..=1.0) {
        let config = MazeConfig::new(size, p).expect("valid config");
        let grid = generate_maze(&mut seeded_rng(seed), &config).expect("generation succeeds");
        prop_assert!(has_path(&grid));
    }

    #[test]
    fn shortest_path_is_optimal(walls in proptest::collection::vec(any::<bool>(), 16)) {
        let grid = MazeGrid::parse(&maze_text(4, &walls)).expect("well-formed");
        let best = common::brute_force_shortest(&grid);
        let found = shortest_path(&grid);
        prop_assert_eq!(found.as_ref().map(Vec::len), best);
        if let Some(path) = found {
            let eval = evaluate_user_path(&grid, &path);
            prop_assert!(eval.valid && eval.reached_end);
            prop_assert_eq!(eval.efficiency, 1.0);
        }
    }
}
