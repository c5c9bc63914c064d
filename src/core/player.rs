//=========================================================================
// Player Entity
//
// The two movable entities of the game. One player hunts (attack),
// the other evades (defense); which id plays which role is fixed by
// the id itself, and the engine swaps ids between the two slots when
// the round timer expires.
//
// Players are cheap value objects: a role swap reconstructs both of
// them from the configured start state rather than mutating survivors.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::config::GameConfig;

use super::event::Direction;
use super::math::Vec2;

//=== Role ================================================================

/// Attack/defense assignment of a player id.
///
/// The mapping is fixed: id 1 attacks, every other id defends. Role
/// determines speed and start position (both from [`GameConfig`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The pursuer: faster, wins by touching the defender.
    Attack,

    /// The evader: slower, wins by surviving the round.
    Defense,
}

impl Role {
    /// Returns the role a player id plays.
    #[inline]
    pub const fn of(player_id: usize) -> Self {
        if player_id == 1 {
            Role::Attack
        } else {
            Role::Defense
        }
    }
}

//=== Player ==============================================================

/// A movable player entity.
///
/// Position always lies within the arena: every move clamps both
/// coordinates independently into `[0, arena_width] × [0, arena_height]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Identity of this player (0 or 1); fixes the role.
    pub player_id: usize,

    /// Current position, in world units.
    pub position: Vec2,

    /// Movement speed, world units per second.
    pub speed: f32,
}

impl Player {
    /// Creates a player at its role's configured start state.
    pub fn new(player_id: usize, config: &GameConfig) -> Self {
        let role = Role::of(player_id);
        Self {
            player_id,
            position: config.start_position(role),
            speed: config.speed(role),
        }
    }

    /// Returns the role this player plays.
    #[inline]
    pub fn role(&self) -> Role {
        Role::of(self.player_id)
    }

    /// Moves the player along the direction by its speed.
    ///
    /// One call covers one tick's worth of travel (`speed / fps`). The
    /// resulting position is clipped to the arena, so callers never
    /// need to worry about out-of-bound moves.
    pub fn move_direction(&mut self, direction: Direction, config: &GameConfig) {
        self.position += direction.unit() * (self.speed / config.fps as f32);
        self.position = self.position.clamp(Vec2::ZERO, config.arena_max());
    }

    /// Euclidean distance to another player.
    #[inline]
    pub fn distance(&self, other: &Player) -> f32 {
        self.position.distance(other.position)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_fixed_by_id() {
        assert_eq!(Role::of(0), Role::Defense);
        assert_eq!(Role::of(1), Role::Attack);
    }

    #[test]
    fn new_player_takes_role_start_state() {
        let config = GameConfig::default();

        let defender = Player::new(0, &config);
        assert_eq!(defender.role(), Role::Defense);
        assert_eq!(defender.position, config.defense_start);
        assert_eq!(defender.speed, config.defense_speed);

        let attacker = Player::new(1, &config);
        assert_eq!(attacker.role(), Role::Attack);
        assert_eq!(attacker.position, config.attack_start);
        assert_eq!(attacker.speed, config.attack_speed);
    }

    #[test]
    fn move_covers_speed_over_fps_per_tick() {
        let config = GameConfig::default();
        let mut player = Player::new(1, &config);
        let start = player.position;

        player.move_direction(Direction::Right, &config);

        let expected = start + Direction::Right.unit() * (config.attack_speed / config.fps as f32);
        assert_eq!(player.position, expected);
    }

    #[test]
    fn position_stays_in_arena_under_any_move_sequence() {
        let config = GameConfig::default();
        let mut player = Player::new(0, &config);

        // Walk a deterministic but eventful path that slams into every
        // wall, and check the invariant after each single move.
        let pattern = [
            Direction::Left,
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
            Direction::Down,
            Direction::Up,
        ];
        for (i, &direction) in pattern.iter().cycle().take(5_000).enumerate() {
            player.move_direction(direction, &config);

            let p = player.position;
            assert!(
                p.x >= 0.0 && p.x <= config.arena_width,
                "x escaped after move {}: {:?}",
                i,
                p
            );
            assert!(
                p.y >= 0.0 && p.y <= config.arena_height,
                "y escaped after move {}: {:?}",
                i,
                p
            );
        }
    }

    #[test]
    fn clamping_pins_player_to_wall() {
        let config = GameConfig::default();
        let mut player = Player::new(0, &config);

        // More than enough moves to cross the whole arena leftwards.
        let ticks_to_wall =
            (config.arena_width / (config.defense_speed / config.fps as f32)).ceil() as usize;
        for _ in 0..ticks_to_wall + 10 {
            player.move_direction(Direction::Left, &config);
        }

        assert_eq!(player.position.x, 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let config = GameConfig::default();
        let a = Player::new(0, &config);
        let b = Player::new(1, &config);

        assert_eq!(a.distance(&b), b.distance(&a));
        assert_eq!(a.distance(&b), config.defense_start.distance(config.attack_start));
    }
}
