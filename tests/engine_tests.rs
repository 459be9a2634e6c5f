use std::collections::HashSet;

use guesstech::{
    apply_answer, hint_letter, is_correct, normalize_answer, points_for, rng_for_round,
    select_question, Catalog, Difficulty, GameError, GameMode, GameState, Rules, TechItem,
};

fn catalog() -> Catalog {
    Catalog::builtin().expect("builtin catalog")
}

fn playing(mode: GameMode, question: u16) -> GameState {
    GameState::default()
        .set_game_mode(mode)
        .start_game()
        .set_current_question(question)
}

#[test]
fn selection_respects_tier() {
    let cat = catalog();
    let mut rng = rng_for_round(42, 1);
    for d in Difficulty::all() {
        for _ in 0..200 {
            let item = select_question(&cat, d, &mut rng).expect("non-empty catalog");
            assert_eq!(item.difficulty, d);
        }
    }
}

#[test]
fn selection_covers_the_tier() {
    let cat = catalog();
    let mut rng = rng_for_round(7, 1);
    let seen: HashSet<u16> = (0..500)
        .filter_map(|_| select_question(&cat, Difficulty::Hard, &mut rng).map(|t| t.id))
        .collect();
    let expected: HashSet<u16> = cat
        .by_difficulty(Difficulty::Hard)
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn empty_tier_falls_back_to_whole_catalog() {
    let cat = Catalog::from_items(vec![
        TechItem {
            id: 1,
            name: "React".into(),
            aliases: vec![],
            difficulty: Difficulty::Easy,
            glyph: "fa:FaReact".into(),
        },
        TechItem {
            id: 2,
            name: "Docker".into(),
            aliases: vec![],
            difficulty: Difficulty::Medium,
            glyph: "fa:FaDocker".into(),
        },
    ])
    .expect("catalog");
    let mut rng = rng_for_round(1, 1);
    let seen: HashSet<u16> = (0..100)
        .filter_map(|_| select_question(&cat, Difficulty::Hard, &mut rng).map(|t| t.id))
        .collect();
    assert_eq!(seen, HashSet::from([1, 2]));
}

#[test]
fn same_seed_same_questions() {
    let cat = catalog();
    let pick = |seed| {
        let mut rng = rng_for_round(seed, 1);
        (0..10)
            .map(|_| select_question(&cat, Difficulty::Easy, &mut rng).map(|t| t.id))
            .collect::<Vec<_>>()
    };
    assert_eq!(pick(99), pick(99));
}

#[test]
fn answers_ignore_case_and_whitespace() {
    let cat = catalog();
    let react = cat.get(1).expect("React");
    assert!(is_correct(react, " REACT "));
    assert!(is_correct(react, "reactjs"));
    assert!(is_correct(react, "React.JS\t"));
    assert!(!is_correct(react, "reac"));
    assert!(!is_correct(react, "react native"));
    assert!(!is_correct(react, "   "));
    assert_eq!(normalize_answer("  Tailwind CSS "), "tailwind css");
}

#[test]
fn hint_is_first_letter() {
    let cat = catalog();
    assert_eq!(hint_letter(cat.get(4).expect("Node.js")), Some('N'));
}

#[test]
fn scoring_table() {
    let rules = Rules::default();
    assert_eq!(points_for(&rules, true, 0), 10);
    assert_eq!(points_for(&rules, true, 1), 11);
    assert_eq!(points_for(&rules, true, 3), 13);
    assert_eq!(points_for(&rules, false, 0), 5);
    assert_eq!(points_for(&rules, false, 3), 6);
    assert_eq!(points_for(&rules, false, 2), 6);
    assert_eq!(points_for(&rules, true, 10), 20);
}

#[test]
fn correct_answer_scores_with_combo() {
    let cat = catalog();
    let mut s = playing(GameMode::Classic, 1);
    s.consecutive_correct_answers = 3;
    let (ns, out) = apply_answer(&s, &cat, "reactjs").expect("apply");
    assert!(out.correct);
    assert_eq!(out.points, 13);
    assert_eq!(out.answer, "React");
    assert_eq!(ns.score, 13);
    assert_eq!(ns.consecutive_correct_answers, 4);
    assert_eq!(ns.questions_answered, 1);
    assert_eq!(ns.lives, 3);
}

#[test]
fn hinted_answer_scores_half_base() {
    let cat = catalog();
    let mut s = playing(GameMode::Classic, 1).use_hint();
    s.consecutive_correct_answers = 3;
    let (ns, out) = apply_answer(&s, &cat, "React").expect("apply");
    assert_eq!(out.points, 6);
    assert_eq!(ns.score, 6);
}

#[test]
fn wrong_answer_costs_a_life_in_classic() {
    let cat = catalog();
    let s = playing(GameMode::Classic, 1).increase_score(None);
    let (ns, out) = apply_answer(&s, &cat, "angular").expect("apply");
    assert!(!out.correct);
    assert_eq!(out.points, 0);
    assert_eq!(out.answer, "React");
    assert_eq!(ns.lives, 2);
    assert_eq!(ns.consecutive_correct_answers, 0);
    assert_eq!(ns.score, 10);
    assert_eq!(ns.questions_answered, 1);
}

#[test]
fn wrong_answer_keeps_lives_in_time_attack() {
    let cat = catalog();
    let s = playing(GameMode::TimeAttack, 1).increase_score(None);
    let (ns, _) = apply_answer(&s, &cat, "vue").expect("apply");
    assert_eq!(ns.lives, 3);
    assert_eq!(ns.consecutive_correct_answers, 0);
}

#[test]
fn three_misses_end_classic() {
    let cat = catalog();
    let mut s = playing(GameMode::Classic, 2);
    for expected in [2u8, 1, 0] {
        s = apply_answer(&s, &cat, "nope").expect("apply").0;
        assert_eq!(s.lives, expected);
    }
    assert!(s.is_terminal());
}

#[test]
fn needs_a_question_and_a_running_game() {
    let cat = catalog();
    let idle = GameState::default().set_current_question(1);
    assert!(matches!(apply_answer(&idle, &cat, "react"), Err(GameError::NotPlaying)));

    let no_question = GameState::default().start_game();
    assert!(matches!(
        apply_answer(&no_question, &cat, "react"),
        Err(GameError::NoActiveQuestion)
    ));
}
