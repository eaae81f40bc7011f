//! Scripted simulation for unit tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tickstate_core::{
    GraphicRecord, GroundItemRecord, Item, ItemDefinition, LocalActor, NpcRecord,
    ObjectDefinition, ObjectRecord, PlayerRecord, ProjectileRecord, SceneBounds,
    SimulationClient, Skill, WorldPoint,
};

#[derive(Default)]
pub(crate) struct FakeWorld {
    pub local: Option<LocalActor>,
    pub cycle: i32,
    pub containers: HashMap<i32, Vec<Item>>,
    pub npcs: Vec<NpcRecord>,
    pub players: Vec<PlayerRecord>,
    pub objects: Vec<ObjectRecord>,
    pub ground_items: Vec<GroundItemRecord>,
    pub projectiles: Vec<ProjectileRecord>,
    pub graphics: Vec<GraphicRecord>,
    pub varps: HashMap<i32, i32>,
    pub varbits: HashMap<i32, i32>,
    pub base_levels: HashMap<Skill, i32>,
    pub boosted_levels: HashMap<Skill, i32>,
    pub run_energy: i32,
    pub resized: bool,
    pub panels: BTreeSet<i32>,
    pub object_defs: HashMap<i32, ObjectDefinition>,
    pub item_defs: HashMap<i32, ItemDefinition>,
    pub target_names: HashMap<i32, String>,
    pub area_names: HashMap<i32, String>,
    pub unlocks: Vec<String>,
    pub panic_on_npcs: bool,
}

#[derive(Default)]
pub(crate) struct FakeClient {
    world: Mutex<FakeWorld>,
    pub panel_checks: AtomicUsize,
    pub name_lookups: AtomicUsize,
}

pub(crate) fn local_actor(index: i32, at: WorldPoint) -> LocalActor {
    LocalActor {
        index,
        name: Some("Tester".into()),
        position: at,
        animation: -1,
        pose_animation: 808,
        idle_pose_animation: 808,
        interacting: None,
        skull_icon: -1,
        combat_level: 60,
    }
}

pub(crate) fn npc(index: i32, id: i32, at: WorldPoint) -> NpcRecord {
    NpcRecord {
        index,
        id,
        name: Some(format!("npc-{id}")),
        combat_level: 30,
        position: at,
        health_ratio: -1,
        health_scale: -1,
        animation: -1,
        interacting: None,
        is_dead: false,
        size: 1,
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A logged-in actor at `at`, index 0.
    pub fn with_actor(at: WorldPoint) -> Self {
        let client = Self::new();
        client.update(|w| w.local = Some(local_actor(0, at)));
        client
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeWorld)) {
        f(&mut self.world.lock());
    }

    pub fn panel_checks(&self) -> usize {
        self.panel_checks.load(Ordering::Relaxed)
    }

    pub fn name_lookups(&self) -> usize {
        self.name_lookups.load(Ordering::Relaxed)
    }
}

impl SimulationClient for FakeClient {
    fn local_actor(&self) -> Option<LocalActor> {
        self.world.lock().local.clone()
    }

    fn game_cycle(&self) -> i32 {
        self.world.lock().cycle
    }

    fn container(&self, container_id: i32) -> Option<Vec<Item>> {
        self.world.lock().containers.get(&container_id).cloned()
    }

    fn npcs(&self) -> Vec<NpcRecord> {
        let world = self.world.lock();
        assert!(!world.panic_on_npcs, "npc list corrupted");
        world.npcs.clone()
    }

    fn players(&self) -> Vec<PlayerRecord> {
        self.world.lock().players.clone()
    }

    fn objects_in(&self, bounds: SceneBounds) -> Vec<ObjectRecord> {
        self.world
            .lock()
            .objects
            .iter()
            .filter(|o| bounds.contains(&o.position))
            .cloned()
            .collect()
    }

    fn ground_items_in(&self, bounds: SceneBounds) -> Vec<GroundItemRecord> {
        self.world
            .lock()
            .ground_items
            .iter()
            .filter(|g| bounds.contains(&g.position))
            .cloned()
            .collect()
    }

    fn projectiles(&self) -> Vec<ProjectileRecord> {
        self.world.lock().projectiles.clone()
    }

    fn graphics_objects(&self) -> Vec<GraphicRecord> {
        self.world.lock().graphics.clone()
    }

    fn varp(&self, id: i32) -> i32 {
        self.world.lock().varps.get(&id).copied().unwrap_or(0)
    }

    fn varbit(&self, id: i32) -> i32 {
        self.world.lock().varbits.get(&id).copied().unwrap_or(0)
    }

    fn base_level(&self, skill: Skill) -> i32 {
        self.world.lock().base_levels.get(&skill).copied().unwrap_or(1)
    }

    fn boosted_level(&self, skill: Skill) -> i32 {
        let world = self.world.lock();
        world
            .boosted_levels
            .get(&skill)
            .or_else(|| world.base_levels.get(&skill))
            .copied()
            .unwrap_or(1)
    }

    fn run_energy(&self) -> i32 {
        self.world.lock().run_energy
    }

    fn is_resized(&self) -> bool {
        self.world.lock().resized
    }

    fn is_panel_visible(&self, panel_id: i32) -> bool {
        let _ = self.panel_checks.fetch_add(1, Ordering::Relaxed);
        self.world.lock().panels.contains(&panel_id)
    }

    fn object_definition(&self, object_id: i32) -> Option<ObjectDefinition> {
        self.world.lock().object_defs.get(&object_id).cloned()
    }

    fn item_definition(&self, item_id: i32) -> Option<ItemDefinition> {
        self.world.lock().item_defs.get(&item_id).cloned()
    }

    fn task_target_name(&self, target_id: i32) -> Option<String> {
        let _ = self.name_lookups.fetch_add(1, Ordering::Relaxed);
        self.world.lock().target_names.get(&target_id).cloned()
    }

    fn task_area_name(&self, area_id: i32) -> Option<String> {
        let _ = self.name_lookups.fetch_add(1, Ordering::Relaxed);
        self.world.lock().area_names.get(&area_id).cloned()
    }

    fn task_unlocks(&self) -> Vec<String> {
        self.world.lock().unlocks.clone()
    }
}
