use std::time::Duration;

use super::food::PowerupKind;

/// Timer slot of one power-up kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PowerupSlot {
    pub active: bool,
    pub remaining: Duration,
}

/// Active power-ups, one slot per [`PowerupKind`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivePowerups {
    slots: [PowerupSlot; 4],
}

impl ActivePowerups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or refresh) a power-up. Returns true if it was already running.
    pub fn activate(&mut self, kind: PowerupKind, duration: Duration) -> bool {
        let slot = &mut self.slots[kind.index()];
        let was_active = slot.active;
        slot.active = true;
        slot.remaining = duration;
        was_active
    }

    /// Count every active timer down by `dt` and return the kinds that ran out
    pub fn tick(&mut self, dt: Duration) -> Vec<PowerupKind> {
        let mut expired = Vec::new();
        for kind in PowerupKind::ALL {
            let slot = &mut self.slots[kind.index()];
            if !slot.active {
                continue;
            }
            slot.remaining = slot.remaining.saturating_sub(dt);
            if slot.remaining.is_zero() {
                slot.active = false;
                expired.push(kind);
            }
        }
        expired
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.slots[kind.index()].active
    }

    pub fn remaining(&self, kind: PowerupKind) -> Option<Duration> {
        let slot = &self.slots[kind.index()];
        slot.active.then_some(slot.remaining)
    }

    /// Active kinds with their remaining time
    pub fn iter_active(&self) -> impl Iterator<Item = (PowerupKind, Duration)> + '_ {
        PowerupKind::ALL
            .into_iter()
            .filter_map(|kind| self.remaining(kind).map(|left| (kind, left)))
    }

    pub fn any_active(&self) -> bool {
        self.slots.iter().any(|slot| slot.active)
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_expire() {
        let mut powerups = ActivePowerups::new();
        assert!(!powerups.activate(PowerupKind::Ghost, Duration::from_secs(5)));
        assert!(powerups.is_active(PowerupKind::Ghost));
        assert!(!powerups.is_active(PowerupKind::Speed));

        assert!(powerups.tick(Duration::from_millis(4999)).is_empty());
        assert_eq!(
            powerups.remaining(PowerupKind::Ghost),
            Some(Duration::from_millis(1))
        );

        assert_eq!(powerups.tick(Duration::from_millis(1)), vec![PowerupKind::Ghost]);
        assert!(!powerups.is_active(PowerupKind::Ghost));
        assert_eq!(powerups.remaining(PowerupKind::Ghost), None);
    }

    #[test]
    fn test_retrigger_refreshes() {
        let mut powerups = ActivePowerups::new();
        powerups.activate(PowerupKind::Speed, Duration::from_secs(5));
        powerups.tick(Duration::from_secs(4));

        assert!(powerups.activate(PowerupKind::Speed, Duration::from_secs(5)));
        assert_eq!(
            powerups.remaining(PowerupKind::Speed),
            Some(Duration::from_secs(5))
        );
        assert_eq!(powerups.iter_active().count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut powerups = ActivePowerups::new();
        powerups.activate(PowerupKind::Slow, Duration::from_secs(5));
        powerups.activate(PowerupKind::Shrink, Duration::from_secs(5));
        assert!(powerups.any_active());

        powerups.clear();
        assert!(!powerups.any_active());
    }
}
