//! Hit direction resolution between two characters.

use bryte_core::{Direction, Random};

use crate::character::Character;

/// Direction the victim is shoved when `attacker` hits it.
///
/// The axis with the larger center-to-center offset wins. An exact tie is a
/// coin flip on the shared generator between the horizontal and vertical
/// candidates.
pub fn determine_damage_direction(
    attacker: &Character,
    victim: &Character,
    random: &mut Random,
) -> Direction {
    let offset = victim.collision_center() - attacker.collision_center();

    let horizontal = if offset.x > 0.0 {
        Direction::Right
    } else {
        Direction::Left
    };
    let vertical = if offset.y > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };

    let (abs_x, abs_y) = (offset.x.abs(), offset.y.abs());
    if abs_x > abs_y {
        horizontal
    } else if abs_y > abs_x {
        vertical
    } else if random.generate(0, 2) == 0 {
        horizontal
    } else {
        vertical
    }
}
