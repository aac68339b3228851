//! The player character and the progress it carries between rooms.

use std::time::Duration;

use bryte_core::{PickupKind, PlayerProgress, Stopwatch, Upgrade};
use glam::Vec2;

use crate::{character::Character, pickup::HEALTH_PICKUP_AMOUNT};

/// Pause after using an item before the next one.
pub const ITEM_COOLDOWN: Duration = Duration::from_secs(1);
/// Arrows granted by an arrow pickup.
pub const ARROW_INCREMENT: u8 = 5;
/// Bombs granted by a bomb pickup.
pub const BOMB_INCREMENT: u8 = 1;
/// Health ceiling gained from a heart upgrade.
pub const MAX_HEALTH_INCREMENT: i32 = 5;
/// Arrow capacity gained from a quiver upgrade.
pub const MAX_ARROW_INCREMENT: u8 = 5;
/// Bomb capacity gained from a bomb bag upgrade.
pub const MAX_BOMB_INCREMENT: u8 = 2;

/// Player character plus inventory.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Shared character state.
    pub character: Character,
    /// Keys carried.
    pub key_count: u8,
    /// Arrows carried.
    pub arrow_count: u8,
    /// Arrow capacity.
    pub max_arrows: u8,
    /// Bombs carried.
    pub bomb_count: u8,
    /// Bomb capacity.
    pub max_bombs: u8,
    /// Whether the bow was found.
    pub has_bow: bool,
    /// Crafting ingredients collected.
    pub ingredient_count: u32,
    /// Cooldown between item uses.
    pub item_cooldown: Stopwatch,
}

impl Player {
    /// Creates a fresh player at `position` with an empty inventory.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            character: Character::player(position),
            key_count: 0,
            arrow_count: 0,
            max_arrows: 10,
            bomb_count: 0,
            max_bombs: 4,
            has_bow: false,
            ingredient_count: 0,
            item_cooldown: Stopwatch::expired_watch(),
        }
    }

    /// Snapshot of the fields stored in a save slot.
    #[must_use]
    pub fn progress(&self) -> PlayerProgress {
        PlayerProgress {
            health: self.character.health,
            max_health: self.character.max_health,
            key_count: self.key_count,
            arrow_count: self.arrow_count,
            max_arrows: self.max_arrows,
            bomb_count: self.bomb_count,
            max_bombs: self.max_bombs,
            has_bow: self.has_bow,
        }
    }

    /// Overwrites the progress fields from a save slot.
    ///
    /// Counts above their capacity and health above its ceiling are clamped.
    pub fn restore(&mut self, progress: PlayerProgress) {
        self.character.max_health = progress.max_health.max(1);
        self.character.health = progress.health.min(self.character.max_health);
        self.key_count = progress.key_count;
        self.max_arrows = progress.max_arrows;
        self.arrow_count = progress.arrow_count.min(progress.max_arrows);
        self.max_bombs = progress.max_bombs;
        self.bomb_count = progress.bomb_count.min(progress.max_bombs);
        self.has_bow = progress.has_bow;
    }

    /// Adds arrows up to the quiver capacity.
    pub fn give_arrow(&mut self) {
        self.arrow_count = self
            .arrow_count
            .saturating_add(ARROW_INCREMENT)
            .min(self.max_arrows);
    }

    /// Adds bombs up to the bag capacity.
    pub fn give_bomb(&mut self) {
        self.bomb_count = self
            .bomb_count
            .saturating_add(BOMB_INCREMENT)
            .min(self.max_bombs);
    }

    /// Applies a permanent upgrade. A heart also refills health.
    pub fn give_upgrade(&mut self, upgrade: Upgrade) {
        match upgrade {
            Upgrade::Heart => {
                self.character.max_health += MAX_HEALTH_INCREMENT;
                self.character.health = self.character.max_health;
            }
            Upgrade::Quiver => self.max_arrows = self.max_arrows.saturating_add(MAX_ARROW_INCREMENT),
            Upgrade::BombBag => self.max_bombs = self.max_bombs.saturating_add(MAX_BOMB_INCREMENT),
            Upgrade::Bow => self.has_bow = true,
        }
    }

    /// Spends an arrow if the bow is ready.
    pub fn use_bow(&mut self) -> bool {
        if !self.has_bow || self.arrow_count == 0 || !self.item_cooldown.expired() {
            return false;
        }
        self.arrow_count -= 1;
        self.item_cooldown.reset(ITEM_COOLDOWN);
        true
    }

    /// Spends a bomb if one is carried and items are off cooldown.
    pub fn use_bomb(&mut self) -> bool {
        if self.bomb_count == 0 || !self.item_cooldown.expired() {
            return false;
        }
        self.bomb_count -= 1;
        self.item_cooldown.reset(ITEM_COOLDOWN);
        true
    }

    /// Applies the effect of a collected item.
    pub fn collect(&mut self, kind: PickupKind) {
        match kind {
            PickupKind::None => {}
            PickupKind::Health => self.character.heal(HEALTH_PICKUP_AMOUNT),
            PickupKind::Key => self.key_count = self.key_count.saturating_add(1),
            PickupKind::Arrow => self.give_arrow(),
            PickupKind::Bomb => self.give_bomb(),
            PickupKind::Ingredient => self.ingredient_count = self.ingredient_count.saturating_add(1),
        }
    }

    /// Returns the player to full health at `position`, keeping the inventory.
    pub fn respawn(&mut self, position: Vec2) {
        let max_health = self.character.max_health;
        self.character = Character::player(position);
        self.character.max_health = max_health;
        self.character.health = max_health;
    }
}
