//! Combat events and the subscriber list they are delivered through

use crate::pipeline::AppliedEffect;
use crate::types::{Side, SpellId, SpellIntent};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// What a fired spell did
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub spell_id: SpellId,
    pub intent: SpellIntent,
    pub hit: bool,
    /// Damage dealt or HP healed
    pub amount: i32,
    pub effects: Vec<AppliedEffect>,
}

/// Everything observable that happens in an encounter
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// A human readable line for the combat log
    Log(String),
    HpChanged { side: Side, hp: i32, max_hp: i32, delta: i32 },
    ManaChanged { side: Side, mana: i32, max_mana: i32, delta: i32 },
    TurnMeterChanged { player: f64, enemy: f64 },
    SpellQueued { side: Side, spell_id: SpellId },
    SpellFired { side: Side, outcome: ActionOutcome },
    EnemyDecisionRequested,
    CombatEnded { winner: Side },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::Log(line) => write!(f, "{line}"),
            CombatEvent::HpChanged { side, hp, max_hp, delta } => {
                write!(f, "[{side}] HP {hp}/{max_hp} ({delta:+})")
            }
            CombatEvent::ManaChanged {
                side,
                mana,
                max_mana,
                delta,
            } => write!(f, "[{side}] Mana {mana}/{max_mana} ({delta:+})"),
            CombatEvent::TurnMeterChanged { player, enemy } => {
                write!(f, "Meters: player {player:.1} / enemy {enemy:.1}")
            }
            CombatEvent::SpellQueued { side, spell_id } => write!(f, "[{side}] queued {spell_id}"),
            CombatEvent::SpellFired { side, outcome } => {
                if outcome.hit {
                    write!(f, "[{side}] {} landed for {}", outcome.spell_id, outcome.amount)
                } else {
                    write!(f, "[{side}] {} missed", outcome.spell_id)
                }
            }
            CombatEvent::EnemyDecisionRequested => write!(f, "Waiting for enemy decision"),
            CombatEvent::CombatEnded { winner } => write!(f, "Combat over, {winner} wins"),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

type Subscriber = Box<dyn FnMut(&CombatEvent)>;

/// Explicit list of event subscribers, called in subscription order
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_id: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&CombatEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Subscribe a recorder that keeps a copy of every event
    pub fn recorder(&mut self) -> Rc<RefCell<Vec<CombatEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        self.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        log
    }

    pub fn emit(&mut self, event: CombatEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus").field("subscribers", &self.subscribers.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_called_in_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&order);
        let second = Rc::clone(&order);
        bus.subscribe(move |_| first.borrow_mut().push(1));
        bus.subscribe(move |_| second.borrow_mut().push(2));

        bus.emit(CombatEvent::EnemyDecisionRequested);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let log = bus.recorder();
        let other = bus.recorder();
        assert_eq!(bus.len(), 2);

        bus.emit(CombatEvent::Log("one".to_string()));
        assert!(bus.unsubscribe(SubscriberId(0)));
        bus.emit(CombatEvent::Log("two".to_string()));

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(other.borrow().len(), 2);
    }

    #[test]
    fn test_display() {
        let event = CombatEvent::HpChanged {
            side: Side::Enemy,
            hp: 40,
            max_hp: 100,
            delta: -12,
        };
        assert_eq!(event.to_string(), "[enemy] HP 40/100 (-12)");
        assert_eq!(
            CombatEvent::CombatEnded { winner: Side::Player }.to_string(),
            "Combat over, player wins"
        );
    }
}
