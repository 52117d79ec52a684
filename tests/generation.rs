use std::collections::HashSet;

use pipe_dream::{BoardGenerator, GeneratorOption, PipeKind};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_board_is_solvable(seed in any::<u64>(), size in 2i32..12, bias in 1usize..6) {
        let generator = BoardGenerator::new(GeneratorOption {
            size,
            bias,
            ..GeneratorOption::default()
        })
        .unwrap();
        let generated = generator.generate_with_route(&mut StdRng::seed_from_u64(seed)).unwrap();
        let board = &generated.board;

        prop_assert_eq!(board.size(), size);
        prop_assert_eq!(board.start().x(), 0);
        prop_assert_eq!(board.end().x(), size - 1);

        let route = &generated.route;
        prop_assert_eq!(route.iter().collect::<HashSet<_>>().len(), route.len());
        for w in route.windows(2) {
            prop_assert!((w[1] - w[0]).is_unit());
        }

        let path = board.with_solution_rotations().flow_path();
        prop_assert_eq!(path.as_ref(), Some(route));
    }

    #[test]
    fn only_terminals_are_fixed(seed in any::<u64>()) {
        let generator = BoardGenerator::new(GeneratorOption::default()).unwrap();
        let board = generator.generate(&mut StdRng::seed_from_u64(seed)).unwrap();
        let kinds = board.tiles().iter().map(|(_, t)| t.kind).collect::<Vec<_>>();
        prop_assert_eq!(kinds.iter().filter(|&&k| k == PipeKind::Start).count(), 1);
        prop_assert_eq!(kinds.iter().filter(|&&k| k == PipeKind::End).count(), 1);
        prop_assert!(board.tiles().iter().all(|(_, t)| t.rotation < 4));
    }
}
