//! Spatial snapshot of the neighborhood around the local actor.
//!
//! The scan reads only the bounded region around the actor. Ground items
//! use the tighter radius. Definition lookups are expected to be cheap
//! (the simulation caches them); market prices come from the enricher and
//! are `None` until resolved.

use tickstate_core::{
    GraphicRecord, GroundItemRecord, LocalActor, ObjectRecord, PlayerRecord, ProjectileRecord,
    SceneBounds, SimulationClient,
};
use tickstate_settings::WorldScanSettings;
use tickstate_state::{
    GraphicsSnapshot, GroundItemSnapshot, ObjectSnapshot, PlayerSnapshot, ProjectileSnapshot,
    WorldState,
};

use super::panels::PanelScanCache;
use super::{npc_snapshot, targets_local};
use crate::enrichment::PriceEnricher;

/// Build the world snapshot.
pub fn build_world(
    client: &dyn SimulationClient,
    settings: &WorldScanSettings,
    prices: Option<&PriceEnricher>,
    panels: &mut PanelScanCache,
) -> WorldState {
    let Some(local) = client.local_actor() else {
        return WorldState::empty();
    };
    let here = local.position;
    let radius = settings.entity_radius;

    let npcs = client
        .npcs()
        .iter()
        .filter(|n| n.position.is_within(&here, radius))
        .map(|n| npc_snapshot(n, &local))
        .collect();

    let objects = client
        .objects_in(SceneBounds::around(here, radius))
        .into_iter()
        .filter(|o| o.position.is_within(&here, radius))
        .map(|o| object_snapshot(client, o))
        .collect();

    let players = client
        .players()
        .into_iter()
        .filter(|p| p.index != local.index && p.position.is_within(&here, radius))
        .map(player_snapshot)
        .collect();

    let item_radius = settings.ground_item_radius;
    let ground_items = client
        .ground_items_in(SceneBounds::around(here, item_radius))
        .into_iter()
        .filter(|g| g.position.is_within(&here, item_radius))
        .map(|g| ground_item_snapshot(client, prices, g))
        .collect();

    let projectiles = client
        .projectiles()
        .into_iter()
        .map(|p| projectile_snapshot(p, &local))
        .collect();

    let graphics = client
        .graphics_objects()
        .into_iter()
        .filter(|g| g.position.is_within(&here, radius))
        .map(graphics_snapshot)
        .collect();

    WorldState {
        npcs,
        objects,
        players,
        ground_items,
        projectiles,
        graphics,
        visible_panel_ids: panels.scan(client, settings),
    }
}

fn object_snapshot(client: &dyn SimulationClient, object: ObjectRecord) -> ObjectSnapshot {
    let definition = client.object_definition(object.id).unwrap_or_default();
    ObjectSnapshot {
        id: object.id,
        position: object.position,
        name: definition.name,
        actions: definition.actions,
        size_x: object.size_x,
        size_y: object.size_y,
        orientation: object.orientation,
        impassable: definition.impassable,
    }
}

fn player_snapshot(player: PlayerRecord) -> PlayerSnapshot {
    PlayerSnapshot {
        is_in_combat: player.interacting.is_some() && player.animation != -1,
        name: player.name,
        combat_level: player.combat_level,
        position: player.position,
        skull_icon: player.skull_icon,
        animation: player.animation,
        interacting: player.interacting,
        is_friend: player.is_friend,
        is_clan_member: player.is_clan_member,
        overhead_icon: player.overhead_icon,
    }
}

fn ground_item_snapshot(
    client: &dyn SimulationClient,
    prices: Option<&PriceEnricher>,
    item: GroundItemRecord,
) -> GroundItemSnapshot {
    let definition = client.item_definition(item.id).unwrap_or_default();
    GroundItemSnapshot {
        id: item.id,
        quantity: item.quantity,
        position: item.position,
        name: definition.name,
        ge_price: prices.and_then(|p| p.lookup_or_request(item.id)),
        ha_price: definition.high_alch_price,
        tradeable: definition.tradeable,
        stackable: definition.stackable,
    }
}

fn projectile_snapshot(projectile: ProjectileRecord, local: &LocalActor) -> ProjectileSnapshot {
    ProjectileSnapshot {
        is_targeting_actor: targets_local(projectile.target, local),
        id: projectile.id,
        source: projectile.source,
        destination: projectile.destination,
        start_cycle: projectile.start_cycle,
        end_cycle: projectile.end_cycle,
        target: projectile.target,
        start_height: projectile.start_height,
        end_height: projectile.end_height,
        slope: projectile.slope,
    }
}

fn graphics_snapshot(graphic: GraphicRecord) -> GraphicsSnapshot {
    GraphicsSnapshot {
        id: graphic.id,
        position: graphic.position,
        start_cycle: graphic.start_cycle,
        height: graphic.height,
        finished: graphic.finished,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
