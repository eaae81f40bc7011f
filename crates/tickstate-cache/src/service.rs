//! The state service: pull accessors over the tick-scoped cache.
//!
//! Everything here runs on the tick thread. Events only mark families dirty
//! or record facts; the next pull decides, through the entry's policy,
//! whether to serve the cached snapshot or rebuild it. Pull accessors never
//! fail. Logged out they return the family's empty snapshot, and a builder
//! that panics is replaced by the empty snapshot for that read.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tickstate_core::constants::varbits;
use tickstate_core::{AccountId, ActorRef, SessionId, SimulationClient, Tick};
use tickstate_settings::{BudgetSettings, StateSettings, get_settings};
use tickstate_state::{
    ActorState, CombatState, EquipmentState, InterfaceMode, InventoryState, TaskProgressState,
    WorldState,
};
use tickstate_telemetry::{HistogramSummary, MetricsRecorder};
use tracing::{debug, info, warn};

use crate::builders::actor::build_actor;
use crate::builders::combat::{CombatInputs, build_combat};
use crate::builders::containers::{build_equipment, build_inventory};
use crate::builders::guarded;
use crate::builders::panels::PanelScanCache;
use crate::builders::task::TaskProgressBuilder;
use crate::builders::world::build_world;
use crate::context::CacheContext;
use crate::diagnostics::{CacheStats, EntryStats, metric};
use crate::dirty::Family;
use crate::enrichment::{PriceEnricher, PriceSource};
use crate::entry::{CacheEntry, Policy};
use crate::events::{SimEvent, dirty_family_for, is_cant_reach};
use crate::lifecycle::{HookRegistry, SessionContext, SessionHook};
use crate::reference::{CombatReference, StaticCombatReference, TaskInfoProvider};

/// Wall-clock source in Unix seconds.
pub type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// What happened on one pull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rebuild {
    Cached,
    Built(Duration),
    Failed,
}

struct RebuildTimer<'a> {
    metrics: &'a MetricsRecorder,
    debug_after: Duration,
}

impl<'a> RebuildTimer<'a> {
    fn new(metrics: &'a MetricsRecorder, budget: &BudgetSettings) -> Self {
        Self {
            metrics,
            debug_after: Duration::from_millis(budget.entry_rebuild_debug_ms),
        }
    }
}

/// Serve from `entry` or rebuild it behind the panic boundary.
fn serve<T>(
    entry: &mut CacheEntry<T>,
    family: Family,
    tick: Tick,
    dirty: bool,
    timer: &RebuildTimer<'_>,
    build: impl FnOnce() -> T,
    fallback: impl FnOnce() -> T,
) -> (Arc<T>, Rebuild) {
    if let Some(value) = entry.get_if_valid(tick, dirty) {
        return (value, Rebuild::Cached);
    }

    let labels = [("family", family.as_str())];
    let started = Instant::now();
    match guarded(family, build) {
        Ok(value) => {
            let elapsed = started.elapsed();
            timer.metrics.increment_counter(metric::REBUILDS, &labels, 1);
            timer
                .metrics
                .record_histogram(metric::REBUILD_MS, &labels, elapsed.as_secs_f64() * 1000.0);
            if elapsed > timer.debug_after {
                debug!(
                    family = %family,
                    entry = entry.name(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "slow rebuild"
                );
            }
            (entry.set(tick, value), Rebuild::Built(elapsed))
        }
        Err(error) => {
            warn!(family = %family, %error, "snapshot builder failed, serving empty");
            timer.metrics.increment_counter(metric::BUILDER_FAILURES, &labels, 1);
            (entry.set(tick, fallback()), Rebuild::Failed)
        }
    }
}

/// Pre-allocated empty snapshots handed out while logged out.
struct Empties {
    actor: Arc<ActorState>,
    inventory: Arc<InventoryState>,
    equipment: Arc<EquipmentState>,
    combat: Arc<CombatState>,
    world: Arc<WorldState>,
    task: Arc<TaskProgressState>,
}

impl Empties {
    fn new() -> Self {
        Self {
            actor: Arc::new(ActorState::empty()),
            inventory: Arc::new(InventoryState::empty()),
            equipment: Arc::new(EquipmentState::empty()),
            combat: Arc::new(CombatState::empty()),
            world: Arc::new(WorldState::empty()),
            task: Arc::new(TaskProgressState::empty()),
        }
    }
}

/// Tick-scoped state cache over a [`SimulationClient`].
pub struct StateService {
    client: Arc<dyn SimulationClient>,
    reference: Arc<dyn CombatReference>,
    task_provider: Option<Arc<dyn TaskInfoProvider>>,
    prices: Option<PriceEnricher>,
    settings: StateSettings,
    hooks: HookRegistry,
    clock: Clock,
    metrics: Arc<MetricsRecorder>,

    ctx: CacheContext,
    actor: CacheEntry<ActorState>,
    inventory: CacheEntry<InventoryState>,
    equipment: CacheEntry<EquipmentState>,
    combat: CacheEntry<CombatState>,
    world: CacheEntry<WorldState>,
    task: CacheEntry<TaskProgressState>,
    panels: PanelScanCache,
    task_builder: TaskProgressBuilder,
    interface_mode: InterfaceMode,
    pending_start: bool,
    hooks_started: bool,
    empty: Empties,
}

impl StateService {
    /// Start building a service over `client`.
    pub fn builder(client: Arc<dyn SimulationClient>) -> StateServiceBuilder {
        StateServiceBuilder::new(client)
    }

    // ── Pull accessors ──────────────────────────────────────────────────

    /// Local actor snapshot. Rebuilt once per tick.
    pub fn get_actor_state(&mut self) -> Arc<ActorState> {
        if !self.ctx.is_logged_in() {
            return Arc::clone(&self.empty.actor);
        }
        let tick = self.ctx.tick();
        let now = (self.clock)();
        let client = self.client.as_ref();
        let timer = RebuildTimer::new(&self.metrics, &self.settings.budget);
        let (value, _) = serve(
            &mut self.actor,
            Family::Actor,
            tick,
            false,
            &timer,
            || build_actor(client, now),
            ActorState::empty,
        );
        value
    }

    /// Inventory snapshot. Rebuilt only after the inventory changes, or on
    /// every read while it is still unknown.
    pub fn get_inventory_state(&mut self) -> Arc<InventoryState> {
        if !self.ctx.is_logged_in() {
            return Arc::clone(&self.empty.inventory);
        }
        let tick = self.ctx.tick();
        let dirty = self.ctx.dirty.is_dirty(Family::Inventory);
        let client = self.client.as_ref();
        let timer = RebuildTimer::new(&self.metrics, &self.settings.budget);
        let (value, outcome) = serve(
            &mut self.inventory,
            Family::Inventory,
            tick,
            dirty,
            &timer,
            || build_inventory(client),
            InventoryState::empty,
        );
        if matches!(outcome, Rebuild::Built(_)) && !value.is_unknown() {
            self.ctx.dirty.clear(Family::Inventory);
        }
        value
    }

    /// Equipment snapshot. Rebuilt only after the equipment changes, or on
    /// every read while it is still unknown.
    pub fn get_equipment_state(&mut self) -> Arc<EquipmentState> {
        if !self.ctx.is_logged_in() {
            return Arc::clone(&self.empty.equipment);
        }
        let tick = self.ctx.tick();
        let dirty = self.ctx.dirty.is_dirty(Family::Equipment);
        let client = self.client.as_ref();
        let timer = RebuildTimer::new(&self.metrics, &self.settings.budget);
        let (value, outcome) = serve(
            &mut self.equipment,
            Family::Equipment,
            tick,
            dirty,
            &timer,
            || build_equipment(client),
            EquipmentState::empty,
        );
        if matches!(outcome, Rebuild::Built(_)) && !value.is_unknown() {
            self.ctx.dirty.clear(Family::Equipment);
        }
        value
    }

    /// Combat snapshot. Rebuilt once per tick, and again within the tick
    /// when equipment or stats change.
    pub fn get_combat_state(&mut self) -> Arc<CombatState> {
        if !self.ctx.is_logged_in() {
            return Arc::clone(&self.empty.combat);
        }
        let equipment = self.get_equipment_state();
        let tick = self.ctx.tick();
        let dirty = self.ctx.dirty.is_dirty(Family::Combat);
        if dirty {
            self.combat.invalidate();
        }

        let client = self.client.as_ref();
        let reference = self.reference.as_ref();
        let entity_radius = self.settings.world.entity_radius;
        let local_attack_tick = self.ctx.local_attack_tick();
        let npc_attacks = self.ctx.npc_attacks_mut();
        let timer = RebuildTimer::new(&self.metrics, &self.settings.budget);
        let (value, outcome) = serve(
            &mut self.combat,
            Family::Combat,
            tick,
            dirty,
            &timer,
            || {
                build_combat(
                    client,
                    reference,
                    CombatInputs {
                        tick,
                        local_attack_tick,
                        npc_attacks,
                        equipment: &equipment,
                        entity_radius,
                    },
                )
            },
            CombatState::empty,
        );
        if matches!(outcome, Rebuild::Built(_)) {
            self.ctx.dirty.clear(Family::Combat);
        }
        value
    }

    /// World snapshot. Rebuilt when its TTL expires or something spawns or
    /// despawns, at most once per tick.
    pub fn get_world_state(&mut self) -> Arc<WorldState> {
        if !self.ctx.is_logged_in() {
            return Arc::clone(&self.empty.world);
        }
        let tick = self.ctx.tick();
        let dirty = self.ctx.dirty.is_dirty(Family::World);
        let client = self.client.as_ref();
        let scan = &self.settings.world;
        let prices = self.prices.as_ref();
        let panels = &mut self.panels;
        let timer = RebuildTimer::new(&self.metrics, &self.settings.budget);
        let (value, outcome) = serve(
            &mut self.world,
            Family::World,
            tick,
            dirty,
            &timer,
            || build_world(client, scan, prices, panels),
            WorldState::empty,
        );
        if let Rebuild::Built(elapsed) = outcome {
            self.ctx.dirty.clear(Family::World);
            let budget = Duration::from_millis(self.settings.budget.world_build_warn_ms);
            if elapsed > budget {
                warn!(
                    tick,
                    elapsed_us = elapsed.as_micros() as u64,
                    budget_ms = self.settings.budget.world_build_warn_ms,
                    entities = value.total_entity_count(),
                    "world rebuild over soft deadline"
                );
                self.metrics
                    .increment_counter(metric::WORLD_OVER_BUDGET, &[], 1);
            }
        }
        value
    }

    /// Assignment progress snapshot. Rebuilt once per tick.
    pub fn get_task_progress_state(&mut self) -> Arc<TaskProgressState> {
        if !self.ctx.is_logged_in() {
            return Arc::clone(&self.empty.task);
        }
        let tick = self.ctx.tick();
        let client = self.client.as_ref();
        let provider = self.task_provider.as_deref();
        let builder = &mut self.task_builder;
        let timer = RebuildTimer::new(&self.metrics, &self.settings.budget);
        let (value, _) = serve(
            &mut self.task,
            Family::Task,
            tick,
            false,
            &timer,
            || builder.build(client, provider),
            TaskProgressState::empty,
        );
        value
    }

    /// Last built actor snapshot, without rebuilding.
    pub fn peek_actor_state(&self) -> Option<Arc<ActorState>> {
        self.actor.get_stale()
    }

    /// Last built inventory snapshot, without rebuilding.
    pub fn peek_inventory_state(&self) -> Option<Arc<InventoryState>> {
        self.inventory.get_stale()
    }

    /// Last built equipment snapshot, without rebuilding.
    pub fn peek_equipment_state(&self) -> Option<Arc<EquipmentState>> {
        self.equipment.get_stale()
    }

    /// Last built combat snapshot, without rebuilding.
    pub fn peek_combat_state(&self) -> Option<Arc<CombatState>> {
        self.combat.get_stale()
    }

    /// Last built world snapshot, without rebuilding.
    pub fn peek_world_state(&self) -> Option<Arc<WorldState>> {
        self.world.get_stale()
    }

    /// Last built assignment snapshot, without rebuilding.
    pub fn peek_task_progress_state(&self) -> Option<Arc<TaskProgressState>> {
        self.task.get_stale()
    }

    // ── Recorded facts ──────────────────────────────────────────────────

    /// Record an outgoing attack on the current tick.
    pub fn record_local_attack(&mut self) {
        self.ctx.record_local_attack();
    }

    /// Record that an NPC attacked on the current tick.
    pub fn record_npc_attack(&mut self, npc_index: i32) {
        self.ctx.record_npc_attack(npc_index);
    }

    /// Whether "can't reach" was seen within the last `within_ticks` ticks.
    pub fn was_cant_reach_recent(&self, within_ticks: u64) -> bool {
        let tick = self.ctx.tick();
        self.ctx
            .cant_reach_tick()
            .is_some_and(|seen| tick.saturating_sub(seen) <= within_ticks)
    }

    /// Forget the last "can't reach" message.
    pub fn clear_cant_reach(&mut self) {
        self.ctx.clear_cant_reach();
    }

    // ── Operational control ─────────────────────────────────────────────

    /// Invalidate every entry and mark every family dirty.
    pub fn invalidate_all(&mut self) {
        self.actor.invalidate();
        self.inventory.invalidate();
        self.equipment.invalidate();
        self.combat.invalidate();
        self.world.invalidate();
        self.task.invalidate();
        self.ctx.dirty.mark_all();
        debug!(tick = self.ctx.tick(), "all cache entries invalidated");
    }

    /// Session reset without ending the session.
    pub fn force_reset(&mut self) {
        self.reset_caches();
        self.ctx.reset();
        info!("state cache reset");
    }

    fn reset_caches(&mut self) {
        self.actor.reset();
        self.inventory.reset();
        self.equipment.reset();
        self.combat.reset();
        self.world.reset();
        self.task.reset();
        self.panels.clear();
        self.task_builder.clear();
        if let Some(prices) = &self.prices {
            prices.clear();
        }
    }

    // ── Session lifecycle ───────────────────────────────────────────────

    /// Begin a session. When `account` is not given it is read from the
    /// local actor's name; if that is not loaded yet, the session hooks
    /// are deferred to the first tick where it is.
    pub fn on_session_start(&mut self, account: Option<AccountId>) -> SessionId {
        if self.ctx.is_logged_in() {
            self.on_session_end();
        }
        self.reset_caches();
        self.interface_mode = InterfaceMode::Unknown;

        let account = account.or_else(|| self.account_from_client());
        let session_id = self.ctx.begin_session(account.clone());
        info!(
            session_id = %session_id,
            account = account.as_ref().map_or("<pending>", AccountId::as_str),
            "session started"
        );

        if account.is_some() {
            self.start_hooks();
        } else {
            self.pending_start = true;
            debug!(session_id = %session_id, "account not loaded, deferring session hooks");
        }
        session_id
    }

    /// End the session and reset all cached state.
    pub fn on_session_end(&mut self) {
        if !self.ctx.is_logged_in() {
            return;
        }
        if self.hooks_started {
            if let Some(ctx) = self.session_context() {
                let _ = self.hooks.fire_end(&ctx);
            }
        }
        info!(
            session_id = ?self.ctx.session_id().map(SessionId::as_str),
            ticks = self.ctx.tick(),
            "session ended"
        );
        self.reset_caches();
        self.ctx.end_session();
        self.pending_start = false;
        self.hooks_started = false;
        self.interface_mode = InterfaceMode::Unknown;
    }

    fn retry_pending_start(&mut self) {
        if !self.pending_start {
            return;
        }
        let Some(account) = self.account_from_client() else {
            return;
        };
        debug!(account = account.as_str(), "account loaded, running deferred session hooks");
        self.ctx.set_account(account);
        self.pending_start = false;
        self.start_hooks();
    }

    fn start_hooks(&mut self) {
        if let Some(ctx) = self.session_context() {
            let _ = self.hooks.fire_start(&ctx);
            self.hooks_started = true;
        }
    }

    fn session_context(&self) -> Option<SessionContext> {
        Some(SessionContext {
            session_id: self.ctx.session_id()?.clone(),
            account: self.ctx.account().cloned(),
            tick: self.ctx.tick(),
        })
    }

    fn account_from_client(&self) -> Option<AccountId> {
        self.client
            .local_actor()
            .and_then(|local| local.name)
            .filter(|name| !name.is_empty())
            .map(AccountId::from)
    }

    // ── Tick pass and events ────────────────────────────────────────────

    /// Advance one tick and refresh the cheap families.
    pub fn on_tick(&mut self) {
        if !self.ctx.is_logged_in() {
            return;
        }
        let started = Instant::now();
        let tick = self.ctx.advance();

        self.retry_pending_start();
        self.refresh_interface_mode();

        let _ = self.get_actor_state();
        if self.ctx.dirty.is_dirty(Family::Inventory) {
            let _ = self.get_inventory_state();
        }
        if self.ctx.dirty.is_dirty(Family::Equipment) {
            let _ = self.get_equipment_state();
        }

        let elapsed = started.elapsed();
        self.metrics
            .record_histogram(metric::TICK_MS, &[], elapsed.as_secs_f64() * 1000.0);
        let budget_ms = self.settings.budget.tick_budget_ms;
        if elapsed > Duration::from_millis(budget_ms) {
            warn!(
                tick,
                elapsed_us = elapsed.as_micros() as u64,
                budget_ms,
                "tick pass over budget"
            );
            self.metrics.increment_counter(metric::TICK_OVER_BUDGET, &[], 1);
        }
    }

    fn refresh_interface_mode(&mut self) {
        let mode = InterfaceMode::from_layout(
            self.client.is_resized(),
            self.client.varbit(varbits::RESIZABLE_ARRANGEMENT),
        );
        if mode != self.interface_mode {
            info!(from = %self.interface_mode, to = %mode, "interface mode changed");
            self.interface_mode = mode;
        }
    }

    /// Apply one simulation notification.
    pub fn handle_event(&mut self, event: &SimEvent) {
        match event {
            SimEvent::SessionStateChanged { logged_in: true } => {
                if !self.ctx.is_logged_in() {
                    let _ = self.on_session_start(None);
                }
            }
            SimEvent::SessionStateChanged { logged_in: false } => self.on_session_end(),
            SimEvent::Tick => self.on_tick(),
            SimEvent::AnimationChanged { actor, animation } => {
                self.observe_animation(*actor, *animation);
            }
            SimEvent::ChatMessage { kind, text } => {
                if is_cant_reach(*kind, text) {
                    self.ctx.record_cant_reach();
                }
            }
            _ => {}
        }
        if let Some(family) = dirty_family_for(event) {
            self.ctx.dirty.mark(family);
        }
    }

    fn observe_animation(&mut self, actor: ActorRef, animation: i32) {
        if !self.ctx.is_logged_in() {
            return;
        }
        let is_local = self
            .client
            .local_actor()
            .is_some_and(|local| actor == ActorRef::Player(local.index));
        if !is_local {
            return;
        }
        let weapon = self.equipment.get_stale().and_then(|e| e.weapon_id());
        if self.reference.is_weapon_attack_animation(weapon, animation) {
            self.ctx.record_local_attack();
        }
    }

    // ── Inspection ──────────────────────────────────────────────────────

    /// Current tick.
    pub fn tick(&self) -> Tick {
        self.ctx.tick()
    }

    /// Whether a session is active.
    pub fn is_logged_in(&self) -> bool {
        self.ctx.is_logged_in()
    }

    /// Id of the active session.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.ctx.session_id()
    }

    /// Account of the active session, once known.
    pub fn account(&self) -> Option<&AccountId> {
        self.ctx.account()
    }

    /// Whether a family is waiting for a rebuild.
    pub fn is_dirty(&self, family: Family) -> bool {
        self.ctx.dirty.is_dirty(family)
    }

    /// Layout detected on the last tick.
    pub fn interface_mode(&self) -> InterfaceMode {
        self.interface_mode
    }

    /// Effective settings.
    pub fn settings(&self) -> &StateSettings {
        &self.settings
    }

    /// Metrics recorder shared with the service.
    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }

    /// Background price table, when enrichment is running.
    pub fn prices(&self) -> Option<&PriceEnricher> {
        self.prices.as_ref()
    }

    /// Hit and rebuild counters of every entry.
    pub fn cache_stats(&self) -> CacheStats {
        let tick = self.ctx.tick();
        let dirty = |family: Family| self.ctx.dirty.is_dirty(family);
        CacheStats {
            tick,
            entries: vec![
                EntryStats::of(&self.actor, tick, false),
                EntryStats::of(&self.inventory, tick, dirty(Family::Inventory)),
                EntryStats::of(&self.equipment, tick, dirty(Family::Equipment)),
                EntryStats::of(&self.combat, tick, false),
                EntryStats::of(&self.world, tick, dirty(Family::World)),
                EntryStats::of(&self.task, tick, false),
            ],
        }
    }

    /// One status line per entry.
    pub fn describe_entries(&self) -> Vec<String> {
        let tick = self.ctx.tick();
        let dirty = |family: Family| self.ctx.dirty.is_dirty(family);
        vec![
            self.actor.describe(tick, false),
            self.inventory.describe(tick, dirty(Family::Inventory)),
            self.equipment.describe(tick, dirty(Family::Equipment)),
            self.combat.describe(tick, false),
            self.world.describe(tick, dirty(Family::World)),
            self.task.describe(tick, false),
        ]
    }

    /// Whether every entry read so far meets the configured hit-rate target.
    pub fn targets_met(&self) -> bool {
        let cache = &self.settings.cache;
        self.cache_stats()
            .targets_met(cache.hit_rate_target, cache.warmup_accesses)
    }

    /// Rebuild duration summaries per family, in milliseconds.
    pub fn rebuild_timings(&self) -> Vec<(Family, HistogramSummary)> {
        Family::ALL
            .into_iter()
            .map(|family| {
                let labels = [("family", family.as_str())];
                (family, self.metrics.histogram_summary(metric::REBUILD_MS, &labels))
            })
            .collect()
    }
}

impl std::fmt::Debug for StateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateService")
            .field("tick", &self.ctx.tick())
            .field("logged_in", &self.ctx.is_logged_in())
            .field("interface_mode", &self.interface_mode)
            .field("hooks", &self.hooks.hook_count())
            .field("prices", &self.prices)
            .finish_non_exhaustive()
    }
}

/// Configures and builds a [`StateService`].
pub struct StateServiceBuilder {
    client: Arc<dyn SimulationClient>,
    reference: Option<Arc<dyn CombatReference>>,
    task_provider: Option<Arc<dyn TaskInfoProvider>>,
    price_source: Option<Arc<dyn PriceSource>>,
    settings: Option<StateSettings>,
    hooks: Vec<Arc<dyn SessionHook>>,
    clock: Option<Clock>,
    metrics: Option<Arc<MetricsRecorder>>,
}

impl StateServiceBuilder {
    fn new(client: Arc<dyn SimulationClient>) -> Self {
        Self {
            client,
            reference: None,
            task_provider: None,
            price_source: None,
            settings: None,
            hooks: Vec::new(),
            clock: None,
            metrics: None,
        }
    }

    /// Combat reference tables. Defaults to an empty table.
    #[must_use]
    pub fn with_reference(mut self, reference: Arc<dyn CombatReference>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Assignment tracking service.
    #[must_use]
    pub fn with_task_provider(mut self, provider: Arc<dyn TaskInfoProvider>) -> Self {
        self.task_provider = Some(provider);
        self
    }

    /// Market price source for ground-item enrichment.
    #[must_use]
    pub fn with_price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.price_source = Some(source);
        self
    }

    /// Settings. Defaults to the global settings.
    #[must_use]
    pub fn with_settings(mut self, settings: StateSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Add a session hook.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn SessionHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Wall clock in Unix seconds. Defaults to the system clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Metrics recorder. Defaults to a private one.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the service. Starts the price worker when a source is set and
    /// enrichment is enabled; if the worker cannot start, enrichment is
    /// disabled with a warning.
    pub fn build(self) -> StateService {
        let settings = self.settings.unwrap_or_else(|| get_settings().clone());

        let prices = self
            .price_source
            .filter(|_| settings.enrichment.enabled)
            .and_then(|source| {
                match PriceEnricher::spawn(source, &settings.enrichment.thread_name) {
                    Ok(prices) => Some(prices),
                    Err(error) => {
                        warn!(%error, "price enrichment disabled");
                        None
                    }
                }
            });

        let mut hooks = HookRegistry::new(&settings.hooks);
        for hook in self.hooks {
            hooks.register(hook);
        }

        let world_policy = Policy::BoundedTtl {
            ttl: settings.cache.world_ttl_ticks,
            family: Family::World,
        };

        StateService {
            client: self.client,
            reference: self
                .reference
                .unwrap_or_else(|| Arc::new(StaticCombatReference::new())),
            task_provider: self.task_provider,
            prices,
            hooks,
            clock: self
                .clock
                .unwrap_or_else(|| Box::new(|| chrono::Utc::now().timestamp()) as Clock),
            metrics: self.metrics.unwrap_or_default(),
            ctx: CacheContext::new(),
            actor: CacheEntry::new("actor", Policy::PerTick),
            inventory: CacheEntry::new("inventory", Policy::EventInvalidated(Family::Inventory)),
            equipment: CacheEntry::new("equipment", Policy::EventInvalidated(Family::Equipment)),
            combat: CacheEntry::new("combat", Policy::PerTick),
            world: CacheEntry::new("world", world_policy),
            task: CacheEntry::new("task", Policy::PerTick),
            panels: PanelScanCache::new(),
            task_builder: TaskProgressBuilder::new(),
            interface_mode: InterfaceMode::Unknown,
            pending_start: false,
            hooks_started: false,
            empty: Empties::new(),
            settings,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
