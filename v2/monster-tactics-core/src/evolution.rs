//! Experience, levels, ultimate charge, evolution and pawn promotion.

use crate::board::Board;
use crate::catalog::TemplateId;
use crate::piece::{PieceId, MAX_LEVEL, ULTIMATE_CHARGE_FULL};

/// XP needed to leave levels 1 through 9.
pub const XP_TABLE: [u32; 9] = [10, 20, 30, 50, 70, 100, 130, 170, 220];

/// Level at which the ultimate unlocks.
pub const ULTIMATE_UNLOCK_LEVEL: u8 = 5;

/// XP needed to advance from `level`, or `None` at the cap.
pub fn xp_required(level: u8) -> Option<u32> {
    if level == 0 || level >= MAX_LEVEL {
        return None;
    }
    XP_TABLE.get(level as usize - 1).copied()
}

impl Board {
    // ========== Experience ==========

    /// Add XP and apply every level-up it pays for.
    pub fn award_xp(&mut self, id: PieceId, xp: u32) {
        let Some(p) = self.piece_mut(id) else {
            return;
        };
        p.experience += xp;

        while let Some(p) = self.piece(id).copied() {
            match xp_required(p.level) {
                Some(need) if p.experience >= need => self.level_up(id, need),
                _ => break,
            }
        }
    }

    fn level_up(&mut self, id: PieceId, spent: u32) {
        let Some(p) = self.piece_mut(id) else {
            return;
        };
        p.level += 1;
        p.experience -= spent;
        p.health = p.health * 105 / 100;
        p.max_health = p.max_health * 105 / 100;
        p.attack = p.attack * 103 / 100;
        p.defense = p.defense * 102 / 100;
        let level = p.level;
        let unlock = level >= ULTIMATE_UNLOCK_LEVEL && !p.ultimate_unlocked;
        if unlock {
            p.ultimate_unlocked = true;
        }
        let template = p.template;

        let who = self.describe(id);
        self.log_turn(format!("{who} leveled up to Level {level}!"));
        if unlock {
            self.log_turn(format!("{who} unlocked their Ultimate Ability!"));
        }

        if let Some(next) = self.catalog().evolution_at(template, level) {
            self.evolve_piece(id, next);
        }
    }

    // ========== Ultimate ==========

    /// Build ultimate charge. At full charge the ultimate fires and the
    /// charge resets. Does nothing until the ultimate is unlocked.
    pub fn charge_ultimate(&mut self, id: PieceId, amount: u32) {
        let Some(p) = self.piece_mut(id) else {
            return;
        };
        if !p.ultimate_unlocked {
            return;
        }
        let charged = (p.ultimate_charge as u32 + amount).min(ULTIMATE_CHARGE_FULL as u32);
        p.ultimate_charge = charged as u8;
        if p.ultimate_charge < ULTIMATE_CHARGE_FULL {
            return;
        }
        p.ultimate_charge = 0;
        let ultimate = p.ultimate;

        let who = self.describe(id);
        match ultimate {
            Some(ult) => {
                self.log_turn(format!("{who} unleashes their Ultimate Ability: {ult}!"));
                self.apply_ability_effect(id, ult);
            }
            None => self.log_turn(format!("{who} has no Ultimate Ability to unleash.")),
        }
    }

    // ========== Replacement ==========

    /// Turn a piece into another template in place. A template missing from
    /// the catalog is logged and ignored.
    pub fn evolve_piece(&mut self, id: PieceId, into: TemplateId) -> bool {
        let who = self.describe(id);
        match self.replace_with_template(id, into) {
            Ok(()) => {
                let name = self.template_name(id).to_string();
                self.log_turn(format!("{who} evolved into {name}!"));
                true
            }
            Err(err) => {
                tracing::warn!(piece = %who, %err, "evolution target missing");
                self.log_turn(format!("Evolution error: {err}"));
                false
            }
        }
    }

    /// Replace a Pawn on the far rank with its pack's promotion template.
    pub fn promote(&mut self, id: PieceId) -> bool {
        let Some(pack) = self.piece(id).map(|p| p.pack) else {
            return false;
        };
        let who = self.describe(id);
        let Some(target) = self.catalog().promotion_template(pack) else {
            self.log_turn(format!("{who} has no promotion target."));
            return false;
        };
        match self.replace_with_template(id, target) {
            Ok(()) => {
                let name = self.template_name(id).to_string();
                let pos = self.piece(id).map(|p| p.pos);
                if let Some(pos) = pos {
                    self.log_turn(format!("{who} promoted to {name} at {pos}!"));
                }
                true
            }
            Err(err) => {
                self.log_turn(format!("Promotion error: {err}"));
                false
            }
        }
    }
}
