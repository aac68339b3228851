#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating batched key and mouse edges into world commands.

use bryte_core::{Command, Direction, EnemyKind, PickupKind};
use glam::Vec2;

/// Maximum number of key edges a single frame may carry.
pub const MAX_KEY_CHANGES: usize = 8;
/// Maximum number of mouse-button edges a single frame may carry.
pub const MAX_MOUSE_BUTTON_CHANGES: usize = 4;

/// Keyboard keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Walk up.
    W,
    /// Walk left.
    A,
    /// Walk down.
    S,
    /// Walk right.
    D,
    /// Swing the weapon.
    Space,
    /// Activate the faced tile.
    E,
    /// Fire the bow.
    Q,
    /// Place a bomb.
    B,
    /// Hold the shield.
    Shift,
    /// Debug: spawn a rat beside the player.
    Digit8,
    /// Debug: grant a key.
    K,
    /// Debug: toggle enemy AI.
    I,
    /// Any key without a binding.
    Other,
}

/// Mouse buttons the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Swing the weapon.
    Left,
    /// Fire the bow.
    Right,
    /// Unbound.
    Middle,
}

/// Press or release of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyChange {
    /// Key that changed.
    pub key: Key,
    /// Whether the key went down.
    pub down: bool,
}

/// Press or release of a mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseButtonChange {
    /// Button that changed.
    pub button: MouseButton,
    /// Whether the button went down.
    pub down: bool,
}

/// Input edges gathered during one frame.
///
/// Edges beyond the per-frame limits are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputBatch {
    key_changes: Vec<KeyChange>,
    mouse_button_changes: Vec<MouseButtonChange>,
}

impl InputBatch {
    /// Records a key edge. Returns `false` if the batch is already full.
    pub fn add_key_change(&mut self, key: Key, down: bool) -> bool {
        if self.key_changes.len() >= MAX_KEY_CHANGES {
            return false;
        }
        self.key_changes.push(KeyChange { key, down });
        true
    }

    /// Records a mouse-button edge. Returns `false` if the batch is already full.
    pub fn add_mouse_button_change(&mut self, button: MouseButton, down: bool) -> bool {
        if self.mouse_button_changes.len() >= MAX_MOUSE_BUTTON_CHANGES {
            return false;
        }
        self.mouse_button_changes.push(MouseButtonChange { button, down });
        true
    }

    /// Key edges in arrival order.
    #[must_use]
    pub fn key_changes(&self) -> &[KeyChange] {
        &self.key_changes
    }

    /// Mouse-button edges in arrival order.
    #[must_use]
    pub fn mouse_button_changes(&self) -> &[MouseButtonChange] {
        &self.mouse_button_changes
    }

    /// Drops every recorded edge.
    pub fn clear(&mut self) {
        self.key_changes.clear();
        self.mouse_button_changes.clear();
    }
}

/// Player geometry the debug spawn key needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerAnchor {
    /// Lower-left corner of the player sprite.
    pub position: Vec2,
    /// Width of the player sprite.
    pub width: f32,
}

/// Pure system that maps input edges to commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputMapper {
    debug_keys: bool,
}

impl InputMapper {
    /// Creates a mapper; `debug_keys` enables the spawn, key and AI toggles.
    #[must_use]
    pub const fn new(debug_keys: bool) -> Self {
        Self { debug_keys }
    }

    /// Translates the batch into commands appended to `out`.
    pub fn handle(&self, batch: &InputBatch, player: PlayerAnchor, out: &mut Vec<Command>) {
        for change in batch.key_changes() {
            self.map_key(*change, player, out);
        }

        for change in batch.mouse_button_changes() {
            match (change.button, change.down) {
                (MouseButton::Left, true) => out.push(Command::TriggerAttack),
                (MouseButton::Right, true) => out.push(Command::TriggerFire),
                _ => {}
            }
        }
    }

    fn map_key(&self, change: KeyChange, player: PlayerAnchor, out: &mut Vec<Command>) {
        let KeyChange { key, down } = change;
        if let Some(direction) = walk_direction(key) {
            out.push(Command::SetDirectionHeld {
                direction,
                held: down,
            });
            return;
        }

        match key {
            Key::Shift => out.push(Command::SetBlocking { held: down }),
            Key::Space if down => out.push(Command::TriggerAttack),
            Key::E if down => out.push(Command::TriggerActivate),
            Key::Q if down => out.push(Command::TriggerFire),
            Key::B if down => out.push(Command::TriggerBomb),
            Key::Digit8 if down && self.debug_keys => out.push(Command::SpawnEnemy {
                kind: EnemyKind::Rat,
                position: Vec2::new(player.position.x - player.width, player.position.y),
                facing: Direction::Left,
                drop: PickupKind::Health,
            }),
            Key::K if down && self.debug_keys => out.push(Command::GiveKey),
            Key::I if down && self.debug_keys => out.push(Command::ToggleEnemyThink),
            _ => {}
        }
    }
}

fn walk_direction(key: Key) -> Option<Direction> {
    match key {
        Key::W => Some(Direction::Up),
        Key::A => Some(Direction::Left),
        Key::S => Some(Direction::Down),
        Key::D => Some(Direction::Right),
        _ => None,
    }
}
