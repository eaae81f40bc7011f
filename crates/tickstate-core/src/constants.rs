//! Well-known simulation ids.
//!
//! Counter ("varp") and flag ("varbit") ids are the simulation's own numbering.

/// Container ids.
pub mod containers {
    /// The 28-slot carried inventory.
    pub const INVENTORY: i32 = 93;
    /// The worn equipment container.
    pub const EQUIPMENT: i32 = 94;
}

/// Player counters.
pub mod varps {
    /// Poison state: positive = poison, negative = venom, zero = clean.
    pub const POISON: i32 = 102;
    /// Special attack energy, 0..=1000.
    pub const SPECIAL_ATTACK: i32 = 300;
    /// Minute (since epoch) the minigame teleport was last used.
    pub const LAST_MINIGAME_TELEPORT: i32 = 888;
    /// Minute (since epoch) the home teleport was last used.
    pub const LAST_HOME_TELEPORT: i32 = 892;
    /// Kills remaining on the current assignment.
    pub const TASK_REMAINING: i32 = 394;
    /// Target id of the current assignment.
    pub const TASK_TARGET: i32 = 395;
    /// Kills the current assignment started with.
    pub const TASK_ORIGINAL_COUNT: i32 = 2095;
    /// Area restriction of the current assignment.
    pub const TASK_AREA: i32 = 2096;
    /// Block-list slots. Each holds the target id of a blocked assignment.
    pub const TASK_BLOCK_SLOTS: [i32; 15] = [
        1096, 4830, 4831, 4832, 4833, 4834, 4835, 4836, 4837, 4838, 4839, 4840, 4841, 4842, 4843,
    ];
}

/// Player flags.
pub mod varbits {
    /// Active spellbook.
    pub const SPELLBOOK: i32 = 4070;
    /// 1 when standing in a multi-combat area.
    pub const MULTI_COMBAT: i32 = 4605;
    /// Resizable layout arrangement: 1 = modern (bottom bar).
    pub const RESIZABLE_ARRANGEMENT: i32 = 4607;
    /// Assignment master id.
    pub const TASK_MASTER: i32 = 4067;
    /// Reward points.
    pub const TASK_POINTS: i32 = 4068;
    /// Consecutive completed assignments.
    pub const TASK_STREAK: i32 = 4069;
    /// Consecutive completed wilderness assignments.
    pub const TASK_WILDERNESS_STREAK: i32 = 5617;
}

/// UI panel group ids.
pub mod panels {
    /// Top-level group in fixed layout.
    pub const TOPLEVEL_FIXED: i32 = 548;
    /// Top-level group in resizable classic layout.
    pub const TOPLEVEL_RESIZABLE_CLASSIC: i32 = 161;
    /// Top-level group in resizable modern layout.
    pub const TOPLEVEL_RESIZABLE_MODERN: i32 = 164;

    /// Panels that can open mid-session and must be checked even when the
    /// first full scan did not see them (dialogue, bank, shops).
    pub const KNOWN: [i32; 19] = [
        149, 161, 218, 387, 162, 163, 182, 541, 548, 601, 217, 216, 12, 131, 84, 270, 219, 231, 116,
    ];
}

/// Chat text that marks an unreachable target.
pub const CANT_REACH_MESSAGE: &str = "I can't reach that";
