//! Battle bot tests: policies over several instantiations of a battle.

use battle_search::battle::{Battle, Creature, ScoringEvaluator};
use battle_search::games::duel::{DuelBuilder, DuelEngine};
use battle_search::{
    Aggregation, BattleBot, BattleState, DecisionPolicy, ExpectiminimaxConfig,
    ExpectiminimaxPolicy, MCTSConfig, MctsPolicy, MoveId, RandomPolicy, SearchError,
};

/// The same battle with a different guess for the opponent's hidden
/// second creature.
fn worlds(guesses: &[i64]) -> (DuelEngine, Vec<Battle>) {
    let (engine, base) = DuelBuilder::new()
        .user_hp(20)
        .opponent_hp(20)
        .user_moves(["growl", "tackle"])
        .opponent_moves(["tackle"])
        .build();

    let worlds = guesses
        .iter()
        .enumerate()
        .map(|(i, &hp)| {
            let mut world = base.clone();
            world.opponent = world
                .opponent
                .with_reserve(Creature::new(format!("hidden{i}"), hp).with_moves(["tackle"]));
            world
        })
        .collect();

    (engine, worlds)
}

#[test]
fn test_expectiminimax_bot_votes() {
    let (engine, worlds) = worlds(&[100, 60, 30]);
    let config = ExpectiminimaxConfig::default()
        .with_depth(1)
        .with_aggregation(Aggregation::PluralityVote);
    let mut bot = BattleBot::new(ExpectiminimaxPolicy::new(engine, ScoringEvaluator, config), 1);

    assert_eq!(bot.find_best_move(&worlds).unwrap(), MoveId::new("tackle"));
    assert_eq!(bot.policy_name(), "expectiminimax");
}

#[test]
fn test_mcts_bot_samples_one_world() {
    let (engine, worlds) = worlds(&[100, 60, 30]);
    let config = MCTSConfig::default().with_iterations(150);
    let mut policy = MctsPolicy::<Battle, _, _>::new(engine, ScoringEvaluator, config);

    let choice = policy.choose_move(&worlds).unwrap();

    assert!(worlds[0].legal_options().self_moves.contains(&choice));
    assert_eq!(policy.search().stats().iterations, 150);
    let searched = policy.search().root().unwrap().state();
    assert!(worlds.contains(searched));
}

#[test]
fn test_mcts_bot_votes_when_configured() {
    let (engine, worlds) = worlds(&[100, 60]);
    let config = MCTSConfig::default()
        .with_iterations(100)
        .with_aggregation(Aggregation::PluralityVote);
    let (engine_again, config_again) = (engine.clone(), config.clone());
    let mut bot = BattleBot::new(MctsPolicy::new(engine, ScoringEvaluator, config), 1);
    let mut again = BattleBot::new(
        MctsPolicy::new(engine_again, ScoringEvaluator, config_again),
        1,
    );

    let choice = bot.find_best_move(&worlds).unwrap();
    assert!(worlds[0].legal_options().self_moves.contains(&choice));
    assert_eq!(again.find_best_move(&worlds).unwrap(), choice);
}

#[test]
fn test_bot_forced_switch() {
    let (engine, mut worlds) = worlds(&[80]);
    let world = &mut worlds[0];
    world.user = world
        .user
        .clone()
        .with_reserve(Creature::new("backup", 100).with_moves(["tackle"]));
    world.user.active.hp = 0;
    world.opponent.active.hp = 0;

    let mut bot = BattleBot::new(
        MctsPolicy::new(engine, ScoringEvaluator, MCTSConfig::default()),
        1,
    );

    assert_eq!(
        bot.find_best_move(&worlds).unwrap(),
        MoveId::switch_to("backup")
    );
}

#[test]
fn test_bot_falls_back_to_random() {
    // Depth zero never produces a move, so the bot has to fall back.
    let (engine, worlds) = worlds(&[100]);
    let config = ExpectiminimaxConfig::default().with_depth(0);
    let mut bot = BattleBot::new(ExpectiminimaxPolicy::new(engine, ScoringEvaluator, config), 7);

    let choice = bot.find_best_move(&worlds).unwrap();
    assert!(worlds[0].legal_options().self_moves.contains(&choice));
}

#[test]
fn test_bot_without_any_option() {
    let (_, mut worlds) = worlds(&[100]);
    worlds[0].user.active.moves.clear();

    let mut bot: BattleBot<Battle> = BattleBot::new(RandomPolicy::new(1), 1);
    assert!(matches!(
        bot.find_best_move(&worlds),
        Err(SearchError::ExhaustedOptions { self_moves: 0, .. })
    ));
}

#[test]
fn test_random_policy_is_seeded() {
    let (_, worlds) = worlds(&[100]);

    let picks = |seed| {
        let mut policy = RandomPolicy::new(seed);
        (0..10)
            .map(|_| DecisionPolicy::<Battle>::choose_move(&mut policy, &worlds).unwrap())
            .collect::<Vec<_>>()
    };

    assert_eq!(picks(11), picks(11));
}
