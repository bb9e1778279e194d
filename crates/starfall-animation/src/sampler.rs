//! Pure evaluation of animation kinds

use crate::asset::AnimateKind;
use crate::field::FieldValue;

/// Evaluate an animation at elapsed time `t`.
///
/// Callers must skip instances with `t > duration`; past that point lerp
/// would extrapolate beyond its target. A lerp with no positive duration
/// lands on its target immediately.
pub fn evaluate(kind: &AnimateKind, src: &FieldValue, t: f32, duration: f32) -> FieldValue {
    match kind {
        AnimateKind::Set { target } => *target,
        AnimateKind::Add { speed } => src.added(&speed.scaled(t)),
        AnimateKind::Lerp { target } => {
            let k = if duration > 0.0 { t / duration } else { 1.0 };
            src.scaled(1.0 - k).added(&target.scaled(k))
        }
    }
}
