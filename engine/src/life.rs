use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Conscious,
    Unconscious,
    /// At 0 HP carrying a major wound.
    Dying,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub max_hp: i32,
    pub major_wound: bool,
    pub state: LifeState,
}

impl Health {
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            major_wound: false,
            state: LifeState::Conscious,
        }
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0 || !matches!(self.state, LifeState::Conscious)
    }
}

/// Apply one blow. Returns true if the creature dropped to 0 this call.
///
/// A blow of at least half max HP is a major wound; a blow of at least max
/// HP kills outright.
pub fn apply_damage(name: &str, health: &mut Health, dmg: i32, mut log: impl FnMut(String)) -> bool {
    if matches!(health.state, LifeState::Dead) || dmg <= 0 {
        return false;
    }

    let before = health.hp;
    health.hp = (health.hp - dmg).max(0);
    log(format!("[DMG][{}] {} → {} (−{})", name, before, health.hp, dmg));

    if dmg >= health.max_hp {
        health.state = LifeState::Dead;
        log(format!("[STATE][{}] takes {} in one blow → Dead", name, dmg));
        return before > 0;
    }

    if dmg * 2 >= health.max_hp && !health.major_wound {
        health.major_wound = true;
        log(format!("[WOUND][{}] suffers a major wound", name));
    }

    if before > 0 && health.hp == 0 {
        health.state = if health.major_wound {
            LifeState::Dying
        } else {
            LifeState::Unconscious
        };
        log(format!("[STATE][{}] drops to 0 HP → {:?}", name, health.state));
        return true;
    }
    false
}

/// Healing; anything short of dead regains consciousness once above 0 HP.
pub fn heal(name: &str, health: &mut Health, amount: i32, mut log: impl FnMut(String)) {
    if amount <= 0 || matches!(health.state, LifeState::Dead) {
        return;
    }
    let before = health.hp;
    let was_down = !matches!(health.state, LifeState::Conscious);
    health.hp = (health.hp + amount).min(health.max_hp);
    if was_down && health.hp > 0 {
        health.state = LifeState::Conscious;
        log(format!(
            "[HEAL][{}] +{} HP ({} → {}) and regains consciousness",
            name, amount, before, health.hp
        ));
    } else {
        log(format!("[HEAL][{}] +{} HP ({} → {})", name, amount, before, health.hp));
    }
}
