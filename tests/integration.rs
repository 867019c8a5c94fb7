//! Integration tests for voxel-serpents

use voxel_serpents::config::Config;
use voxel_serpents::grid::{Direction, GridSize, Position};
use voxel_serpents::palette::{Color, FOOD_COLOR};
use voxel_serpents::snake::Snake;
use voxel_serpents::world::World;

const BLUE: Color = Color::from_rgb(0x3b82f6);
const PINK: Color = Color::from_rgb(0xec4899);

fn base_config(grid: i32, snakes: usize) -> Config {
    let mut config = Config::default();
    config.world.base_grid_size = grid;
    config.world.aspect_ratio = 1.0;
    config.snakes.count = snakes;
    config.snakes.initial_length = 3;
    config.food.count = 0;
    config
}

/// World with no snakes or food, ready for a hand-built scenario.
fn empty_world(grid: i32) -> World {
    let mut world = World::new_with_seed(base_config(grid, 1), 1);
    world.snakes.clear();
    world.foods.clear();
    world
}

#[test]
fn test_scenario_a_chase_eat_grow() {
    // One length-3 snake at (5,5,5) heading +X, food directly ahead.
    let mut world = empty_world(10);
    assert_eq!(world.grid, GridSize::new(10, 10, 10));
    world.snakes.push(Snake::new(
        Position::new(5, 5, 5),
        Direction::PosX,
        BLUE,
        3,
        world.grid,
    ));
    world
        .foods
        .spawn_at(world.grid, Position::new(6, 5, 5), FOOD_COLOR, 0, false);

    world.step();

    let snake = &world.snakes[0];
    assert!(snake.alive);
    assert_eq!(snake.head(), Position::new(6, 5, 5));
    assert_eq!(snake.len(), 4);
    // The eaten item is gone and exactly one replacement exists elsewhere
    assert_eq!(world.foods.len(), 1);
    assert!(!world.foods.occupied(Position::new(6, 5, 5)));
}

#[test]
fn test_scenario_b_head_on_collision() {
    // Lengths 3 and 5, both heads arriving at (4,4,4) this tick.
    let mut world = empty_world(10);
    world.snakes.push(Snake::new(
        Position::new(3, 4, 4),
        Direction::PosX,
        PINK,
        3,
        world.grid,
    ));
    world.snakes.push(Snake::new(
        Position::new(5, 4, 4),
        Direction::NegX,
        BLUE,
        5,
        world.grid,
    ));

    world.step();

    assert!(!world.snakes[0].alive);
    assert!(world.snakes[1].alive);
    assert_eq!(world.snakes[1].len(), 5);

    // The dead snake deposited exactly one food item per former segment
    assert_eq!(world.foods.len(), 3);
    for pos in [
        Position::new(4, 4, 4),
        Position::new(3, 4, 4),
        Position::new(2, 4, 4),
    ] {
        assert!(world.foods.occupied(pos), "missing deposit at {:?}", pos);
    }
    assert!(world.foods.items().iter().all(|f| f.color == PINK));
}

#[test]
fn test_scenario_c_density_cluster_spawn() {
    // A 2x2x2 sub-cube plus one adjacent cell: 9 items at threshold 9.
    let mut world = empty_world(10);
    for x in 0..2 {
        for y in 0..2 {
            for z in 0..2 {
                world
                    .foods
                    .spawn_at(world.grid, Position::new(x, y, z), FOOD_COLOR, 0, false);
            }
        }
    }
    world
        .foods
        .spawn_at(world.grid, Position::new(2, 0, 0), FOOD_COLOR, 0, false);
    assert_eq!(world.foods.len(), 9);

    world.check_food_clusters();

    assert!(world.foods.is_empty());
    assert_eq!(world.snakes.len(), 1);
    let snake = &world.snakes[0];
    assert!(snake.alive);
    assert_eq!(snake.len(), 3);
    // Centered near the consumed region
    assert!(world.grid.within_cube(snake.head(), Position::new(1, 0, 0), 2));
}

#[test]
fn test_food_expires_through_world_clock() {
    let mut config = base_config(10, 1);
    config.world.tick_ms = 16;
    config.food.max_age_ms = 100;
    let mut world = World::new_with_seed(config, 3);
    world.snakes.clear();
    world.foods.clear();
    world
        .foods
        .spawn_at(world.grid, Position::new(5, 5, 5), FOOD_COLOR, 0, false);

    world.run(6); // clock 96ms, age below the limit
    assert_eq!(world.foods.len(), 1);

    world.step(); // clock 112ms
    assert!(world.foods.is_empty());
}

#[test]
fn test_full_simulation_cycle() {
    let mut config = base_config(30, 20);
    config.food.count = 30;

    let mut world = World::new_with_seed(config, 12345);
    world.run(500);

    assert_eq!(world.tick, 500);

    // All coordinates stay wrapped and bodies stay non-empty
    for snake in &world.snakes {
        assert!(!snake.is_empty());
        for &seg in &snake.body {
            assert_eq!(seg, world.grid.wrap(seg));
        }
    }
    for item in world.foods.items() {
        assert_eq!(item.position, world.grid.wrap(item.position));
    }

    // Dead snakes are inert records, never resurrected
    assert!(world.snakes.len() >= 20);
    assert_eq!(
        world.population(),
        world.snakes.iter().filter(|s| s.alive).count()
    );
}

#[test]
fn test_restart_produces_fresh_state() {
    let mut config = base_config(20, 10);
    config.food.count = 15;

    let mut world = World::new_with_seed(config.clone(), 7);
    world.run(300);
    let aged_tick = world.tick;

    // Restart is reconstruction from config: nothing carries over
    let fresh = World::new_with_seed(config, 8);
    assert_eq!(fresh.tick, 0);
    assert_eq!(fresh.clock_ms, 0);
    assert_eq!(fresh.population(), 10);
    assert_eq!(fresh.foods.len(), 15);
    assert!(aged_tick > fresh.tick);
}

#[test]
fn test_reproducibility_exact() {
    let mut config = base_config(25, 12);
    config.food.count = 20;

    let mut a = World::new_with_seed(config.clone(), 31337);
    let mut b = World::new_with_seed(config, 31337);
    a.run(400);
    b.run(400);

    assert_eq!(a.population(), b.population());
    assert_eq!(a.snakes.len(), b.snakes.len());
    for (sa, sb) in a.snakes.iter().zip(b.snakes.iter()) {
        assert_eq!(sa.alive, sb.alive);
        assert_eq!(sa.body, sb.body);
    }
    let foods_a: Vec<_> = a.foods.items().iter().map(|f| f.position).collect();
    let foods_b: Vec<_> = b.foods.items().iter().map(|f| f.position).collect();
    assert_eq!(foods_a, foods_b);
}
