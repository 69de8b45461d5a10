//! Health changes. Abilities, passives and captures all route through
//! `damage_piece` / `heal_piece` so kill and damage accounting stays in one
//! place; tile effects use `tile_damage`, which credits nobody.

use crate::board::Board;
use crate::passives::Passive;
use crate::piece::PieceId;
use crate::tiles::TileEffect;

/// XP awarded for eliminating a piece.
pub const KILL_XP: u32 = 10;

/// Health System Reboot restores after a kill.
pub const REBOOT_HEAL: u32 = 5;

impl Board {
    /// Deal `amount` to `target`, credited to `attacker`.
    ///
    /// No-op on an already eliminated target. The attacker is credited the
    /// full amount regardless of overkill, and exactly one kill when the
    /// target drops to 0.
    pub fn damage_piece(&mut self, attacker: PieceId, target: PieceId, amount: u32) {
        let Some(victim) = self.piece(target).copied() else {
            return;
        };
        if !victim.is_alive() {
            return;
        }
        let remaining = victim.health.saturating_sub(amount);
        if let Some(t) = self.piece_mut(target) {
            t.health = remaining;
        }
        if let Some(a) = self.piece_mut(attacker) {
            a.damage_dealt += amount;
        }

        let who = self.describe(attacker);
        let whom = self.describe(target);
        self.log_turn(format!("{who} dealt {amount} damage to {whom}"));

        if remaining > 0 {
            return;
        }
        if let Some(a) = self.piece_mut(attacker) {
            a.kills += 1;
        }
        self.log_turn(format!("{whom} was eliminated by {who}"));
        self.award_xp(attacker, KILL_XP);

        let reboot = self
            .piece(attacker)
            .is_some_and(|a| a.is_alive() && a.passive == Some(Passive::SystemReboot));
        if reboot {
            self.heal_piece(attacker, attacker, REBOOT_HEAL);
        }
    }

    /// Restore up to `amount` health, capped at the target's max health.
    pub fn heal_piece(&mut self, healer: PieceId, target: PieceId, amount: u32) {
        let Some(t) = self.piece_mut(target) else {
            return;
        };
        if !t.is_alive() {
            return;
        }
        let before = t.health;
        t.health = (t.health + amount).min(t.max_health.max(before));
        let healed = t.health - before;

        let who = self.describe(healer);
        let whom = self.describe(target);
        self.log_turn(format!("{who} heals {whom} for {healed} HP"));
    }

    /// Environmental damage from a tile. Credits nobody.
    pub fn tile_damage(&mut self, target: PieceId, amount: u32, effect: TileEffect) {
        let Some(t) = self.piece_mut(target) else {
            return;
        };
        if !t.is_alive() {
            return;
        }
        t.health = t.health.saturating_sub(amount);
        let eliminated = t.health == 0;
        let pos = t.pos;

        let whom = self.describe(target);
        self.log_turn(format!("{whom} takes {amount} damage from {effect} Tile at {pos}!"));
        if eliminated {
            self.log_turn(format!("{whom} was eliminated by the {effect} Tile."));
        }
    }
}
