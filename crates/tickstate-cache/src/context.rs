//! Session-scoped mutable state shared by the builders.

use std::collections::HashMap;

use tickstate_core::{AccountId, SessionId, Tick};

use crate::dirty::DirtyFlags;

/// Tick counter, dirty flags and recorded facts for one session.
///
/// Owned by the tick thread; builders receive it explicitly.
#[derive(Debug)]
pub struct CacheContext {
    tick: Tick,
    logged_in: bool,
    session_id: Option<SessionId>,
    account: Option<AccountId>,
    /// Per-family dirty flags.
    pub dirty: DirtyFlags,
    local_attack_tick: Option<Tick>,
    npc_attacks: HashMap<i32, Tick>,
    cant_reach_tick: Option<Tick>,
}

impl CacheContext {
    /// A logged-out context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick: 0,
            logged_in: false,
            session_id: None,
            account: None,
            dirty: DirtyFlags::all_dirty(),
            local_attack_tick: None,
            npc_attacks: HashMap::new(),
            cant_reach_tick: None,
        }
    }

    /// Current tick.
    #[must_use]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Advance one tick and return the new value.
    pub fn advance(&mut self) -> Tick {
        self.tick += 1;
        self.tick
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Id of the active session.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Account of the active session, once known.
    #[must_use]
    pub fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }

    /// Start a session. Clears everything recorded by a previous one.
    pub fn begin_session(&mut self, account: Option<AccountId>) -> SessionId {
        self.reset();
        let id = SessionId::new();
        self.session_id = Some(id.clone());
        self.account = account;
        self.logged_in = true;
        id
    }

    /// Attach the account once it becomes known.
    pub fn set_account(&mut self, account: AccountId) {
        self.account = Some(account);
    }

    /// End the session.
    pub fn end_session(&mut self) {
        self.reset();
        self.logged_in = false;
        self.session_id = None;
        self.account = None;
    }

    /// Back to tick 0 with every family dirty and no recorded facts.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.dirty.mark_all();
        self.local_attack_tick = None;
        self.npc_attacks.clear();
        self.cant_reach_tick = None;
    }

    /// Record an outgoing attack on the current tick.
    pub fn record_local_attack(&mut self) {
        self.local_attack_tick = Some(self.tick);
    }

    /// Tick of the last outgoing attack.
    #[must_use]
    pub fn local_attack_tick(&self) -> Option<Tick> {
        self.local_attack_tick
    }

    /// Record that an NPC attacked on the current tick.
    pub fn record_npc_attack(&mut self, npc_index: i32) {
        let _ = self.npc_attacks.insert(npc_index, self.tick);
    }

    /// Tick an NPC was last seen attacking.
    #[must_use]
    pub fn npc_last_attack(&self, npc_index: i32) -> Option<Tick> {
        self.npc_attacks.get(&npc_index).copied()
    }

    /// Attack table for the combat builder.
    pub fn npc_attacks_mut(&mut self) -> &mut HashMap<i32, Tick> {
        &mut self.npc_attacks
    }

    /// Record an unreachable-target message on the current tick.
    pub fn record_cant_reach(&mut self) {
        self.cant_reach_tick = Some(self.tick);
    }

    /// Tick of the last unreachable-target message.
    #[must_use]
    pub fn cant_reach_tick(&self) -> Option<Tick> {
        self.cant_reach_tick
    }

    /// Forget the unreachable-target message.
    pub fn clear_cant_reach(&mut self) {
        self.cant_reach_tick = None;
    }
}

impl Default for CacheContext {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty::Family;

    #[test]
    fn session_lifecycle() {
        let mut ctx = CacheContext::new();
        assert!(!ctx.is_logged_in());
        let id = ctx.begin_session(Some(AccountId::from("zezima")));
        assert!(ctx.is_logged_in());
        assert_eq!(ctx.session_id(), Some(&id));
        assert_eq!(ctx.advance(), 1);
        assert_eq!(ctx.advance(), 2);
        ctx.end_session();
        assert!(!ctx.is_logged_in());
        assert_eq!(ctx.tick(), 0);
        assert!(ctx.account().is_none());
    }

    #[test]
    fn reset_clears_recorded_facts() {
        let mut ctx = CacheContext::new();
        let _ = ctx.begin_session(None);
        let _ = ctx.advance();
        ctx.record_local_attack();
        ctx.record_npc_attack(7);
        ctx.record_cant_reach();
        ctx.dirty.clear(Family::Inventory);
        ctx.reset();
        assert_eq!(ctx.local_attack_tick(), None);
        assert_eq!(ctx.npc_last_attack(7), None);
        assert_eq!(ctx.cant_reach_tick(), None);
        assert!(ctx.dirty.is_dirty(Family::Inventory));
    }

    #[test]
    fn facts_are_stamped_with_current_tick() {
        let mut ctx = CacheContext::new();
        let _ = ctx.begin_session(None);
        for _ in 0..5 {
            let _ = ctx.advance();
        }
        ctx.record_local_attack();
        ctx.record_npc_attack(3);
        assert_eq!(ctx.local_attack_tick(), Some(5));
        assert_eq!(ctx.npc_last_attack(3), Some(5));
    }

    #[test]
    fn new_session_gets_new_id() {
        let mut ctx = CacheContext::new();
        let first = ctx.begin_session(None);
        let second = ctx.begin_session(None);
        assert_ne!(first, second);
    }
}
