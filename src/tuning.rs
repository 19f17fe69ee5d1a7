/// Gameplay tuning.
///
/// Keep this separate from runtime configuration (seed, skin, frame rate);
/// these values are compiled in and are the same for every session.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Logical field size.
    pub field_width: f32,
    pub field_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    /// Units per normalized frame.
    pub player_speed: f32,
    /// Distance from the player's top edge to the bottom of the field.
    pub player_bottom_offset: f32,

    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    /// How far above the player's top edge a new bullet appears.
    pub bullet_spawn_offset: f32,
    /// Frames between player shots.
    pub fire_cooldown: f32,

    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_padding_x: f32,
    pub enemy_padding_y: f32,
    pub enemy_origin_x: f32,
    pub enemy_origin_y: f32,

    pub formation_speed: f32,
    pub formation_down_step: f32,
    /// Multiplier applied to the formation speed on every edge bounce.
    pub formation_speed_growth: f32,
    /// Distance from either field edge that triggers a bounce.
    pub formation_margin: f32,

    /// Per tick, per eligible enemy.
    pub enemy_fire_chance: f64,
    pub enemy_bullet_speed: f32,
    /// Enemy bullets are dropped once their top passes `field_height + slack`.
    pub enemy_bullet_slack: f32,

    pub score_per_kill: u32,
    pub starting_lives: u32,

    /// Milliseconds in one nominal frame; `dt = elapsed / frame_ms`.
    pub frame_ms: f32,
    pub max_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 480.0,
            field_height: 640.0,

            player_width: 40.0,
            player_height: 18.0,
            player_speed: 5.0,
            player_bottom_offset: 60.0,

            bullet_width: 4.0,
            bullet_height: 12.0,
            bullet_speed: 8.0,
            bullet_spawn_offset: 8.0,
            fire_cooldown: 14.0,

            enemy_rows: 4,
            enemy_cols: 8,
            enemy_width: 34.0,
            enemy_height: 20.0,
            enemy_padding_x: 18.0,
            enemy_padding_y: 18.0,
            enemy_origin_x: 40.0,
            enemy_origin_y: 60.0,

            formation_speed: 1.1,
            formation_down_step: 22.0,
            formation_speed_growth: 1.05,
            formation_margin: 6.0,

            enemy_fire_chance: 0.002,
            enemy_bullet_speed: 4.0,
            enemy_bullet_slack: 16.0,

            score_per_kill: 20,
            starting_lives: 3,

            frame_ms: 16.67,
            max_dt: 2.0,
        }
    }
}

impl Tuning {
    pub fn enemy_count(&self) -> usize {
        self.enemy_rows * self.enemy_cols
    }

    /// Y coordinate of the player's top edge.
    pub fn player_y(&self) -> f32 {
        self.field_height - self.player_bottom_offset
    }

    /// X coordinate that centres the player in the field.
    pub fn player_start_x(&self) -> f32 {
        self.field_width / 2.0 - self.player_width / 2.0
    }
}
