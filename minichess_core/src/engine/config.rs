use crate::engine::error::EngineResult;
use crate::engine::PieceKind;
use serde::{Deserialize, Serialize};

pub const VAL_PAWN: i32 = 20;
pub const VAL_BISHOP: i32 = 70;
pub const VAL_KNIGHT: i32 = 70;
pub const VAL_KING: i32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_bishop: i32,
    pub val_knight: i32,
    pub val_king: i32,
    pub mobility_weight: i32,
    pub check_bonus: i32,

    // Move Ordering Parameters
    pub score_killer_move: i32,
    pub score_capture_pawn: i32,
    pub score_capture_bishop: i32,
    pub score_capture_knight: i32,
    pub score_capture_king: i32,
    pub score_capture_unknown: i32,
    pub score_capture_notation: i32,

    // Search Parameters
    pub max_depth: u8,
    pub default_time_ms: u64, // used when the position reports no clock
    pub time_fraction: f64,
    pub tt_capacity: Option<usize>, // None: unbounded
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_bishop: VAL_BISHOP,
            val_knight: VAL_KNIGHT,
            val_king: VAL_KING,
            mobility_weight: 1,
            check_bonus: 2,

            score_killer_move: 1000,
            score_capture_pawn: 20,
            score_capture_bishop: 70,
            score_capture_knight: 70,
            score_capture_king: 600,
            score_capture_unknown: 50,
            score_capture_notation: 40,

            max_depth: 3,
            default_time_ms: 1500,
            time_fraction: 0.9,
            tt_capacity: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn piece_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.val_pawn,
            PieceKind::Bishop => self.val_bishop,
            PieceKind::Knight => self.val_knight,
            PieceKind::King => self.val_king,
            PieceKind::Other => 0,
        }
    }

    #[must_use]
    pub const fn capture_value(&self, victim: PieceKind) -> i32 {
        match victim {
            PieceKind::Pawn => self.score_capture_pawn,
            PieceKind::Bishop => self.score_capture_bishop,
            PieceKind::Knight => self.score_capture_knight,
            PieceKind::King => self.score_capture_king,
            PieceKind::Other => self.score_capture_unknown,
        }
    }
}

/// Tuning file format: weights are scale factors applied to the defaults,
/// search settings are absolute.
#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_bishop: Option<f32>,
    val_knight: Option<f32>,
    val_king: Option<f32>,
    mobility_weight: Option<f32>,
    check_bonus: Option<f32>,

    score_killer_move: Option<f32>,
    score_capture_pawn: Option<f32>,
    score_capture_bishop: Option<f32>,
    score_capture_knight: Option<f32>,
    score_capture_king: Option<f32>,
    score_capture_unknown: Option<f32>,
    score_capture_notation: Option<f32>,

    max_depth: Option<u8>,
    default_time_ms: Option<u64>,
    time_fraction: Option<f64>,
    tt_capacity: Option<usize>,
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns [`crate::engine::error::EngineError::Config`] when the text is
    /// not valid JSON for the tuning format.
    pub fn load_from_json(json_str: &str) -> EngineResult<Self> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_king: apply_scale(default.val_king, json_config.val_king),
            mobility_weight: apply_scale(default.mobility_weight, json_config.mobility_weight),
            check_bonus: apply_scale(default.check_bonus, json_config.check_bonus),

            score_killer_move: apply_scale(
                default.score_killer_move,
                json_config.score_killer_move,
            ),
            score_capture_pawn: apply_scale(
                default.score_capture_pawn,
                json_config.score_capture_pawn,
            ),
            score_capture_bishop: apply_scale(
                default.score_capture_bishop,
                json_config.score_capture_bishop,
            ),
            score_capture_knight: apply_scale(
                default.score_capture_knight,
                json_config.score_capture_knight,
            ),
            score_capture_king: apply_scale(
                default.score_capture_king,
                json_config.score_capture_king,
            ),
            score_capture_unknown: apply_scale(
                default.score_capture_unknown,
                json_config.score_capture_unknown,
            ),
            score_capture_notation: apply_scale(
                default.score_capture_notation,
                json_config.score_capture_notation,
            ),

            max_depth: json_config.max_depth.unwrap_or(default.max_depth),
            default_time_ms: json_config
                .default_time_ms
                .unwrap_or(default.default_time_ms),
            time_fraction: json_config.time_fraction.unwrap_or(default.time_fraction),
            tt_capacity: json_config.tt_capacity.or(default.tt_capacity),
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
