use qtris_engine::{Action, GameState};
use qtris_learning::{FeatureExtractor, FeatureVector};
use qtris_stats::summary::Summary;

pub const BIAS: &str = "bias";
pub const POSITION: &str = "position";
pub const SMOOTHNESS: &str = "smoothnessColumns";

/// All feature values are divided by this before use.
const FEATURE_SCALE: f32 = 100.0;

/// Features of the state an action leads to.
///
/// The action is applied first, so two actions from the same state get different vectors.
/// On the successor:
///
/// - `bias`: 1
/// - the piece kind tag (`"I"`, `"O"`, ...): 1
/// - `position`: playable column of the piece's leftmost block
/// - `smoothnessColumns`: standard deviation of the column heights
///
/// Every value is then divided by 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TetrisFeatures;

impl FeatureExtractor<GameState> for TetrisFeatures {
    #[expect(clippy::cast_precision_loss)]
    fn features(&self, state: &GameState, action: Action) -> FeatureVector {
        let successor = state.generate_successor_state(action);
        let piece = successor.piece();

        let mut features = FeatureVector::new();
        features.insert(BIAS, 1.0);
        features.insert(piece.kind().to_string(), 1.0);
        features.insert(POSITION, piece.column() as f32);
        features.insert(SMOOTHNESS, smoothness(&successor));
        features.divide_by(FEATURE_SCALE);
        features
    }
}

/// Standard deviation of the column heights; 0 for a flat surface.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn smoothness(state: &GameState) -> f32 {
    state
        .board()
        .column_heights()
        .iter()
        .map(|&height| height as f32)
        .collect::<Summary>()
        .std_dev()
        .unwrap_or(0.0)
}
