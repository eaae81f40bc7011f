#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tickstate_cache::diagnostics::metric;
use tickstate_cache::{
    CombatReference, Family, NpcCombatData, PriceSource, SessionContext, SessionHook, SimEvent,
    StateService, StaticCombatReference, WeaponData,
};
use tickstate_core::constants::containers;
use tickstate_core::{
    ActorRef, ChatKind, GraphicRecord, GroundItemRecord, Item, ItemDefinition, LocalActor,
    NpcRecord, ObjectDefinition, ObjectRecord, PlayerRecord, ProjectileRecord, SceneBounds,
    SimulationClient, Skill, StateError, WorldPoint,
};
use tickstate_settings::StateSettings;
use tickstate_state::{ActorState, AttackStyle, InventoryState, WorldState};

const COINS: i32 = 995;
const LOBSTER: i32 = 379;
const PUNCH: i32 = 422;

// ─────────────────────────────────────────────────────────────────────────────
// Scripted simulation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Scene {
    local: Option<LocalActor>,
    containers: HashMap<i32, Vec<Item>>,
    npcs: Vec<NpcRecord>,
    ground_items: Vec<GroundItemRecord>,
    item_defs: HashMap<i32, ItemDefinition>,
    panic_on_npcs: bool,
}

#[derive(Default)]
struct ScriptedClient {
    scene: Mutex<Scene>,
    npc_scans: AtomicUsize,
}

impl ScriptedClient {
    fn logged_in() -> Arc<Self> {
        let client = Arc::new(Self::default());
        client.edit(|s| s.local = Some(local("Zezima")));
        client
    }

    fn edit(&self, f: impl FnOnce(&mut Scene)) {
        f(&mut self.scene.lock());
    }

    fn npc_scans(&self) -> usize {
        self.npc_scans.load(Ordering::Relaxed)
    }
}

fn local(name: &str) -> LocalActor {
    LocalActor {
        index: 0,
        name: Some(name.to_string()),
        position: WorldPoint::new(3200, 3200, 0),
        animation: -1,
        pose_animation: 808,
        idle_pose_animation: 808,
        interacting: None,
        skull_icon: -1,
        combat_level: 70,
    }
}

fn goblin(index: i32) -> NpcRecord {
    NpcRecord {
        index,
        id: 3029,
        name: Some("Goblin".into()),
        combat_level: 2,
        position: WorldPoint::new(3201, 3200, 0),
        health_ratio: -1,
        health_scale: -1,
        animation: 0,
        interacting: Some(ActorRef::Player(0)),
        is_dead: false,
        size: 1,
    }
}

impl SimulationClient for ScriptedClient {
    fn local_actor(&self) -> Option<LocalActor> {
        self.scene.lock().local.clone()
    }

    fn game_cycle(&self) -> i32 {
        0
    }

    fn container(&self, container_id: i32) -> Option<Vec<Item>> {
        self.scene.lock().containers.get(&container_id).cloned()
    }

    fn npcs(&self) -> Vec<NpcRecord> {
        let _ = self.npc_scans.fetch_add(1, Ordering::Relaxed);
        let (panic, npcs) = {
            let scene = self.scene.lock();
            (scene.panic_on_npcs, scene.npcs.clone())
        };
        assert!(!panic, "npc table unavailable");
        npcs
    }

    fn players(&self) -> Vec<PlayerRecord> {
        Vec::new()
    }

    fn objects_in(&self, _bounds: SceneBounds) -> Vec<ObjectRecord> {
        Vec::new()
    }

    fn ground_items_in(&self, bounds: SceneBounds) -> Vec<GroundItemRecord> {
        self.scene
            .lock()
            .ground_items
            .iter()
            .filter(|g| bounds.contains(&g.position))
            .cloned()
            .collect()
    }

    fn projectiles(&self) -> Vec<ProjectileRecord> {
        Vec::new()
    }

    fn graphics_objects(&self) -> Vec<GraphicRecord> {
        Vec::new()
    }

    fn varp(&self, _id: i32) -> i32 {
        0
    }

    fn varbit(&self, _id: i32) -> i32 {
        0
    }

    fn base_level(&self, _skill: Skill) -> i32 {
        1
    }

    fn boosted_level(&self, _skill: Skill) -> i32 {
        1
    }

    fn run_energy(&self) -> i32 {
        10_000
    }

    fn is_resized(&self) -> bool {
        false
    }

    fn is_panel_visible(&self, _panel_id: i32) -> bool {
        false
    }

    fn object_definition(&self, _object_id: i32) -> Option<ObjectDefinition> {
        None
    }

    fn item_definition(&self, item_id: i32) -> Option<ItemDefinition> {
        self.scene.lock().item_defs.get(&item_id).cloned()
    }

    fn task_target_name(&self, _target_id: i32) -> Option<String> {
        None
    }

    fn task_area_name(&self, _area_id: i32) -> Option<String> {
        None
    }

    fn task_unlocks(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Default)]
struct CountingHook {
    starts: AtomicUsize,
    ends: AtomicUsize,
    accounts: Mutex<Vec<Option<String>>>,
}

impl SessionHook for CountingHook {
    fn name(&self) -> &str {
        "counting"
    }

    fn on_session_start(&self, ctx: &SessionContext) -> Result<(), StateError> {
        let _ = self.starts.fetch_add(1, Ordering::Relaxed);
        self.accounts
            .lock()
            .push(ctx.account.as_ref().map(|a| a.as_str().to_string()));
        Ok(())
    }

    fn on_session_end(&self, _ctx: &SessionContext) -> Result<(), StateError> {
        let _ = self.ends.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

struct FixedPrices;

impl PriceSource for FixedPrices {
    fn price(&self, item_id: i32) -> Result<Option<i32>, StateError> {
        Ok((item_id == COINS).then_some(1))
    }
}

fn settings() -> StateSettings {
    StateSettings::default()
}

fn service_with(client: &Arc<ScriptedClient>, settings: StateSettings) -> StateService {
    StateService::builder(Arc::clone(client) as Arc<dyn SimulationClient>)
        .with_settings(settings)
        .with_clock(|| 1_800_000_000)
        .build()
}

fn started(client: &Arc<ScriptedClient>) -> StateService {
    let mut service = service_with(client, settings());
    let _ = service.on_session_start(None);
    service.on_tick();
    service
}

fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

// ─────────────────────────────────────────────────────────────────────────────
// Policies
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn per_tick_reads_are_idempotent_within_a_tick() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);

    let first = service.get_actor_state();
    let second = service.get_actor_state();
    assert!(Arc::ptr_eq(&first, &second));

    service.on_tick();
    let third = service.get_actor_state();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(first.position, third.position);
}

#[test]
fn inventory_survives_ticks_until_changed() {
    let client = ScriptedClient::logged_in();
    client.edit(|s| {
        let _ = s.containers.insert(containers::INVENTORY, vec![Item::new(LOBSTER, 1)]);
    });
    let mut service = started(&client);

    let before = service.get_inventory_state();
    for _ in 0..10 {
        service.on_tick();
    }
    let after = service.get_inventory_state();
    assert!(Arc::ptr_eq(&before, &after));

    let stats = service.cache_stats();
    let inventory = stats.entry("inventory").expect("inventory row");
    assert_eq!(inventory.rebuilds, 1);
}

#[test]
fn container_change_shows_up_on_the_next_tick() {
    let client = ScriptedClient::logged_in();
    client.edit(|s| {
        let _ = s.containers.insert(containers::INVENTORY, vec![Item::new(LOBSTER, 1)]);
    });
    let mut service = started(&client);
    assert!(!service.get_inventory_state().has_item(COINS));

    client.edit(|s| {
        let _ = s
            .containers
            .insert(containers::INVENTORY, vec![Item::new(LOBSTER, 1), Item::new(COINS, 500)]);
    });
    service.handle_event(&SimEvent::ContainerChanged {
        container_id: containers::INVENTORY,
    });
    assert!(service.is_dirty(Family::Inventory));

    service.handle_event(&SimEvent::Tick);
    assert!(!service.is_dirty(Family::Inventory));
    let inventory = service.get_inventory_state();
    assert_eq!(inventory.count_item(COINS), 500);
    assert_eq!(
        service.cache_stats().entry("inventory").map(|e| e.rebuilds),
        Some(2)
    );
}

#[test]
fn inventory_fills_after_login_with_no_container() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);
    let unloaded = service.get_inventory_state();
    assert!(unloaded.is_unknown());
    assert_ne!(*unloaded, InventoryState::empty());
    assert!(service.is_dirty(Family::Inventory));
    assert!(service.get_equipment_state().is_unknown());

    client.edit(|s| {
        let _ = s.containers.insert(containers::INVENTORY, vec![Item::new(COINS, 10)]);
    });
    service.on_tick();
    assert!(!service.is_dirty(Family::Inventory));
    let inventory = service.get_inventory_state();
    assert!(!inventory.is_empty());
    assert_eq!(inventory.slot_of(COINS), Some(0));
}

#[test]
fn world_rebuilds_when_ttl_expires() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);

    let first = service.get_world_state();
    for _ in 0..5 {
        service.on_tick();
        let _ = service.get_world_state();
    }

    let stats = service.cache_stats();
    let world = stats.entry("world").expect("world row");
    assert_eq!(world.rebuilds, 2);
    assert_eq!(world.hits, 4);
    assert!(!Arc::ptr_eq(&first, &service.get_world_state()));
}

#[test]
fn world_rebuild_is_coalesced_within_a_tick() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);

    let first = service.get_world_state();
    let scans = client.npc_scans();
    client.edit(|s| s.npcs.push(goblin(5)));
    service.handle_event(&SimEvent::NpcSpawned { index: 5 });
    let second = service.get_world_state();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(client.npc_scans(), scans);

    service.on_tick();
    let third = service.get_world_state();
    assert_eq!(third.npcs.len(), 1);
    assert_eq!(service.cache_stats().entry("world").map(|e| e.rebuilds), Some(2));
}

// ─────────────────────────────────────────────────────────────────────────────
// Failure and logout
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn builder_panic_serves_empty() {
    let (logs, _guard) = tickstate_telemetry::capture_logs();
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);
    client.edit(|s| s.panic_on_npcs = true);

    let world = service.get_world_state();
    assert_eq!(*world, WorldState::empty());
    assert!(service.is_dirty(Family::World));
    assert_eq!(
        service
            .metrics()
            .counter(metric::BUILDER_FAILURES, &[("family", "world")]),
        1
    );
    let failure = logs.find("snapshot builder failed").expect("failure logged");
    assert_eq!(failure.family(), Some("world"));
    assert_eq!(failure.level, tracing::Level::WARN);

    client.edit(|s| {
        s.panic_on_npcs = false;
        s.npcs.push(goblin(5));
    });
    service.on_tick();
    assert_eq!(service.get_world_state().npcs.len(), 1);
}

#[test]
fn tick_over_budget_is_logged_with_timing() {
    let (logs, _guard) = tickstate_telemetry::capture_logs();
    let client = ScriptedClient::logged_in();
    let mut config = settings();
    config.budget.tick_budget_ms = 0;
    let mut service = service_with(&client, config);
    let _ = service.on_session_start(None);
    service.on_tick();

    let slow = logs.find("tick pass over budget").expect("over budget");
    assert_eq!(slow.tick(), Some(service.tick()));
    assert!(slow.elapsed_us().is_some());
    assert!(service.metrics().counter(metric::TICK_OVER_BUDGET, &[]) >= 1);
}

#[test]
fn logged_out_returns_empty_snapshots() {
    let client = ScriptedClient::logged_in();
    let mut service = service_with(&client, settings());

    assert!(!service.is_logged_in());
    assert_eq!(*service.get_actor_state(), ActorState::empty());
    assert_eq!(*service.get_inventory_state(), InventoryState::empty());
    assert_eq!(*service.get_world_state(), WorldState::empty());
    assert!(service.get_combat_state().aggressive_npcs.is_empty());
    assert_eq!(service.get_task_progress_state().name, None);
    assert_eq!(client.npc_scans(), 0);
}

#[test]
fn session_events_drive_login_state() {
    let client = ScriptedClient::logged_in();
    let mut service = service_with(&client, settings());

    service.handle_event(&SimEvent::SessionStateChanged { logged_in: true });
    assert!(service.is_logged_in());
    assert!(service.session_id().is_some());
    service.handle_event(&SimEvent::Tick);
    assert_eq!(service.tick(), 1);

    service.handle_event(&SimEvent::SessionStateChanged { logged_in: false });
    assert!(!service.is_logged_in());
    assert_eq!(service.tick(), 0);
    assert!(service.peek_actor_state().is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Combat
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn recorded_npc_attack_makes_an_aggressor() {
    let client = ScriptedClient::logged_in();
    client.edit(|s| s.npcs.push(goblin(5)));
    let mut service = started(&client);

    assert_eq!(service.get_combat_state().aggressor_count(), 0);

    service.record_npc_attack(5);
    service.on_tick();
    let combat = service.get_combat_state();
    assert_eq!(combat.aggressor_count(), 1);
    assert_eq!(combat.aggressive_npcs[0].npc_index, 5);
    assert_eq!(combat.aggressive_npcs[0].last_attack_tick, 1);
    assert!(combat.is_being_attacked());
}

#[test]
fn interacting_npc_joins_once_it_attacks() {
    const GOBLIN_STAB: i32 = 6184;
    let client = ScriptedClient::logged_in();
    client.edit(|s| s.npcs.push(goblin(5)));
    let reference = StaticCombatReference::new().with_npc(
        3029,
        NpcCombatData {
            attack_animations: vec![GOBLIN_STAB],
            attack_speed: 4,
            max_hit: 1,
            attack_style: AttackStyle::Melee,
        },
    );
    let mut service = StateService::builder(Arc::clone(&client) as Arc<dyn SimulationClient>)
        .with_settings(settings())
        .with_reference(Arc::new(reference))
        .build();
    let _ = service.on_session_start(None);
    service.on_tick();
    assert_eq!(service.get_combat_state().aggressor_count(), 0);

    client.edit(|s| s.npcs[0].animation = GOBLIN_STAB);
    service.on_tick();
    let combat = service.get_combat_state();
    assert_eq!(combat.aggressor_count(), 1);
    assert_eq!(combat.aggressive_npcs[0].last_attack_tick, 2);
    assert_eq!(combat.aggressive_npcs[0].expected_max_hit, 1);

    client.edit(|s| s.npcs[0].animation = -1);
    service.on_tick();
    let combat = service.get_combat_state();
    assert_eq!(combat.aggressor_count(), 1);
    assert!(!combat.aggressive_npcs[0].is_attacking);
}

#[test]
fn local_attack_animation_is_recorded() {
    let client = ScriptedClient::logged_in();
    let reference = StaticCombatReference::new().with_unarmed(WeaponData {
        attack_speed: 4,
        attack_style: AttackStyle::Melee,
        attack_animations: vec![PUNCH],
    });
    let mut service = StateService::builder(Arc::clone(&client) as Arc<dyn SimulationClient>)
        .with_settings(settings())
        .with_reference(Arc::new(reference))
        .build();
    let _ = service.on_session_start(None);
    service.on_tick();
    let _ = service.get_equipment_state();

    service.handle_event(&SimEvent::AnimationChanged {
        actor: ActorRef::Player(7),
        animation: PUNCH,
    });
    service.on_tick();
    assert_eq!(service.get_combat_state().last_attack_tick, None);

    service.handle_event(&SimEvent::AnimationChanged {
        actor: ActorRef::Player(0),
        animation: PUNCH,
    });
    service.on_tick();
    let combat = service.get_combat_state();
    assert_eq!(combat.last_attack_tick, Some(2));
    assert_eq!(combat.ticks_since_last_attack, Some(1));
    assert!(!combat.can_attack);
}

#[test]
fn stat_change_rebuilds_combat_within_the_tick() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);

    let first = service.get_combat_state();
    assert!(Arc::ptr_eq(&first, &service.get_combat_state()));

    service.handle_event(&SimEvent::StatChanged {
        skill: Skill::Strength,
    });
    let second = service.get_combat_state();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!service.is_dirty(Family::Combat));
}

#[test]
fn weapon_swap_reaches_combat_within_the_tick() {
    const WHIP: i32 = 4151;
    const SHORTBOW: i32 = 841;
    fn worn(weapon: i32) -> Vec<Item> {
        let mut slots = vec![Item::empty(); 14];
        slots[3] = Item::new(weapon, 1);
        slots
    }

    let client = ScriptedClient::logged_in();
    client.edit(|s| {
        let _ = s.containers.insert(containers::EQUIPMENT, worn(WHIP));
    });
    let reference = StaticCombatReference::new()
        .with_weapon(
            WHIP,
            WeaponData {
                attack_speed: 4,
                attack_style: AttackStyle::Melee,
                attack_animations: vec![1658],
            },
        )
        .with_weapon(
            SHORTBOW,
            WeaponData {
                attack_speed: 3,
                attack_style: AttackStyle::Ranged,
                attack_animations: vec![426],
            },
        );
    let mut service = StateService::builder(Arc::clone(&client) as Arc<dyn SimulationClient>)
        .with_settings(settings())
        .with_reference(Arc::new(reference))
        .build();
    let _ = service.on_session_start(None);
    service.on_tick();

    let before = service.get_combat_state();
    assert_eq!(before.weapon_attack_speed, 4);
    assert_eq!(before.current_attack_style, AttackStyle::Melee);

    let tick = service.tick();
    client.edit(|s| {
        let _ = s.containers.insert(containers::EQUIPMENT, worn(SHORTBOW));
    });
    service.handle_event(&SimEvent::ContainerChanged {
        container_id: containers::EQUIPMENT,
    });
    assert!(service.is_dirty(Family::Combat));

    let after = service.get_combat_state();
    assert_eq!(service.tick(), tick);
    assert_eq!(after.weapon_attack_speed, 3);
    assert_eq!(after.current_attack_style, AttackStyle::Ranged);
    assert_eq!(service.get_equipment_state().weapon_id(), Some(SHORTBOW));
    assert!(!service.is_dirty(Family::Equipment));
}

#[test]
fn cant_reach_is_remembered_for_a_window() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);

    service.handle_event(&SimEvent::ChatMessage {
        kind: ChatKind::Public,
        text: "I can't reach that!".into(),
    });
    assert!(!service.was_cant_reach_recent(5));

    service.handle_event(&SimEvent::ChatMessage {
        kind: ChatKind::Game,
        text: "I can't reach that!".into(),
    });
    assert!(service.was_cant_reach_recent(2));
    for _ in 0..3 {
        service.on_tick();
    }
    assert!(!service.was_cant_reach_recent(2));
    assert!(service.was_cant_reach_recent(3));

    service.clear_cant_reach();
    assert!(!service.was_cant_reach_recent(100));
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle, enrichment, diagnostics
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hooks_fire_once_per_session() {
    let client = ScriptedClient::logged_in();
    let hook = Arc::new(CountingHook::default());
    let mut service = StateService::builder(Arc::clone(&client) as Arc<dyn SimulationClient>)
        .with_settings(settings())
        .with_hook(hook.clone())
        .build();

    let _ = service.on_session_start(None);
    for _ in 0..3 {
        service.on_tick();
    }
    service.on_session_end();
    service.on_session_end();

    assert_eq!(hook.starts.load(Ordering::Relaxed), 1);
    assert_eq!(hook.ends.load(Ordering::Relaxed), 1);
    assert_eq!(*hook.accounts.lock(), vec![Some("Zezima".to_string())]);
}

#[test]
fn hooks_wait_for_the_account_name() {
    let client = ScriptedClient::logged_in();
    client.edit(|s| {
        if let Some(local) = s.local.as_mut() {
            local.name = None;
        }
    });
    let hook = Arc::new(CountingHook::default());
    let mut service = StateService::builder(Arc::clone(&client) as Arc<dyn SimulationClient>)
        .with_settings(settings())
        .with_hook(hook.clone())
        .build();

    let _ = service.on_session_start(None);
    service.on_tick();
    assert_eq!(hook.starts.load(Ordering::Relaxed), 0);
    assert!(service.account().is_none());

    client.edit(|s| s.local = Some(local("Zezima")));
    service.on_tick();
    service.on_tick();
    assert_eq!(hook.starts.load(Ordering::Relaxed), 1);
    assert_eq!(service.account().map(|a| a.as_str()), Some("Zezima"));
}

#[test]
fn session_without_identity_skips_end_hooks() {
    let client = ScriptedClient::logged_in();
    client.edit(|s| s.local = None);
    let hook = Arc::new(CountingHook::default());
    let mut service = StateService::builder(Arc::clone(&client) as Arc<dyn SimulationClient>)
        .with_settings(settings())
        .with_hook(hook.clone())
        .build();

    let _ = service.on_session_start(None);
    service.on_tick();
    service.on_session_end();
    assert_eq!(hook.starts.load(Ordering::Relaxed), 0);
    assert_eq!(hook.ends.load(Ordering::Relaxed), 0);
}

#[test]
fn ground_item_prices_arrive_in_the_background() {
    let client = ScriptedClient::logged_in();
    client.edit(|s| {
        s.ground_items.push(GroundItemRecord {
            id: COINS,
            quantity: 250,
            position: WorldPoint::new(3202, 3201, 0),
        });
        let _ = s.item_defs.insert(
            COINS,
            ItemDefinition {
                name: "Coins".into(),
                high_alch_price: 0,
                tradeable: true,
                stackable: true,
            },
        );
    });
    let mut service = StateService::builder(Arc::clone(&client) as Arc<dyn SimulationClient>)
        .with_settings(settings())
        .with_price_source(Arc::new(FixedPrices))
        .build();
    let _ = service.on_session_start(None);
    service.on_tick();

    let world = service.get_world_state();
    assert_eq!(world.ground_items[0].ge_price, None);
    assert_eq!(world.ground_items[0].name, "Coins");

    let prices = service.prices().expect("enrichment running");
    assert!(wait_until(|| prices.lookup(COINS).is_some()));

    service.handle_event(&SimEvent::GroundItemSpawned { id: COINS });
    service.on_tick();
    let world = service.get_world_state();
    assert_eq!(world.ground_items[0].ge_price, Some(1));
    assert_eq!(world.ground_items[0].total_ge_value(), Some(250));
}

#[test]
fn disabled_enrichment_starts_no_worker() {
    let client = ScriptedClient::logged_in();
    let mut settings = settings();
    settings.enrichment.enabled = false;
    let service = StateService::builder(Arc::clone(&client) as Arc<dyn SimulationClient>)
        .with_settings(settings)
        .with_price_source(Arc::new(FixedPrices))
        .build();
    assert!(service.prices().is_none());
}

#[test]
fn force_reset_forgets_everything_but_the_session() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);
    let _ = service.get_world_state();
    service.record_local_attack();
    let session = service.session_id().cloned();

    service.force_reset();
    assert!(service.is_logged_in());
    assert_eq!(service.session_id().cloned(), session);
    assert_eq!(service.tick(), 0);
    assert!(service.peek_world_state().is_none());
    assert!(service.cache_stats().entries.iter().all(|e| e.accesses() == 0));
    assert_eq!(service.get_combat_state().last_attack_tick, None);
}

#[test]
fn invalidate_all_forces_rebuilds() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);
    let inventory = service.get_inventory_state();
    let world = service.get_world_state();

    service.invalidate_all();
    assert!(Family::ALL.into_iter().all(|f| service.is_dirty(f)));
    assert!(!Arc::ptr_eq(&inventory, &service.get_inventory_state()));
    assert!(!Arc::ptr_eq(&world, &service.get_world_state()));
}

#[test]
fn stats_and_timings_track_reads() {
    let client = ScriptedClient::logged_in();
    let mut service = started(&client);
    for _ in 0..20 {
        let _ = service.get_actor_state();
        service.on_tick();
    }

    let stats = service.cache_stats();
    let actor = stats.entry("actor").expect("actor row");
    assert_eq!(actor.rebuilds, 21);
    assert_eq!(actor.hits, 20);
    assert!(service.targets_met());
    assert!(stats.to_string().starts_with("CacheStats[tick=21] actor=48.8%"));

    let timings = service.rebuild_timings();
    let (family, actor_timing) = &timings[0];
    assert_eq!(*family, Family::Actor);
    assert_eq!(actor_timing.count, 21);
    assert!(
        service
            .metrics()
            .histogram_summary(metric::TICK_MS, &[])
            .count
            >= 21
    );
}

#[test]
fn families_never_read_do_not_fail_hit_rate_targets() {
    let client = ScriptedClient::logged_in();
    client.edit(|s| {
        let _ = s.containers.insert(containers::INVENTORY, vec![Item::new(LOBSTER, 1)]);
        let _ = s.containers.insert(containers::EQUIPMENT, Vec::new());
    });
    let mut service = started(&client);
    for _ in 0..200 {
        for _ in 0..20 {
            let _ = service.get_actor_state();
            let _ = service.get_inventory_state();
            let _ = service.get_equipment_state();
            let _ = service.get_combat_state();
            let _ = service.get_world_state();
        }
        service.on_tick();
    }

    let stats = service.cache_stats();
    let task = stats.entry("task").expect("task row");
    assert_eq!(task.accesses(), 0);
    assert!(stats.entry("combat").expect("combat row").hit_rate >= 0.9);
    assert!(service.targets_met());
}

#[test]
fn default_reference_has_no_weapon_data() {
    let reference = StaticCombatReference::new();
    assert_eq!(reference.weapon_data(None), None);
    assert!(!reference.is_weapon_attack_animation(None, PUNCH));
}
