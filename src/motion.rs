use nalgebra as na;

use crate::bbox::{BBox, Ltwh};

/// `[cx, cy, w, h, vcx, vcy, vw, vh]`
type StateVector = na::SVector<f32, 8>;
/// Diagonal of the 8x8 uncertainty matrix; cross-terms are not modeled.
type StateDiag = na::SVector<f32, 8>;

const STD_WEIGHT_POSITION: f32 = 1.0 / 20.0;
const STD_WEIGHT_VELOCITY: f32 = 1.0 / 160.0;

/// Fixed blend toward the measurement on update.
const BLEND: f32 = 0.5;

/// Constant-velocity estimator over box center and size.
///
/// This is deliberately not a textbook Kalman filter: there is no computed
/// gain, the update blends position/size toward the measurement with a fixed
/// weight and re-derives velocity as a finite difference, and uncertainty
/// only ever grows on predict. Track stability downstream depends on this
/// exact damping behavior.
#[derive(Debug, Clone)]
pub(crate) struct MotionFilter {
    state: StateVector,
    variance: StateDiag,
}

impl MotionFilter {
    pub(crate) fn new(bbox: &BBox<Ltwh>) -> Self {
        let m = bbox.as_xywh();
        let height = m.height();

        let state = StateVector::from_column_slice(&[
            m.cx(),
            m.cy(),
            m.width(),
            m.height(),
            0.0,
            0.0,
            0.0,
            0.0,
        ]);

        let pos = (STD_WEIGHT_POSITION * height).powi(2);
        let vel = (STD_WEIGHT_VELOCITY * height).powi(2);
        let variance =
            StateDiag::from_column_slice(&[pos, pos, 1e-2, 1e-2, vel, vel, 1e-5, 1e-5]);

        Self { state, variance }
    }

    /// One constant-velocity step with unit dt. Uncertainty is inflated,
    /// never reset, so it is monotonically non-decreasing between updates.
    pub(crate) fn predict(&mut self) {
        let height = self.state[3];
        let pos = (STD_WEIGHT_POSITION * height).powi(2);
        let vel = (STD_WEIGHT_VELOCITY * height).powi(2);

        for i in 0..4 {
            self.state[i] += self.state[i + 4];
            self.variance[i] += pos;
            self.variance[i + 4] += vel;
        }
    }

    /// Blends the state toward a new measurement box and re-derives velocity
    /// as `measurement - (old state - old velocity)`. Uncertainty is left
    /// untouched in this simplified model.
    pub(crate) fn update(&mut self, bbox: &BBox<Ltwh>) {
        let m = bbox.as_xywh();
        let measurement = [m.cx(), m.cy(), m.width(), m.height()];

        for i in 0..4 {
            let old = self.state[i];
            let old_vel = self.state[i + 4];

            self.state[i] = old * (1.0 - BLEND) + measurement[i] * BLEND;
            self.state[i + 4] = measurement[i] - (old - old_vel);
        }
    }

    pub(crate) fn bbox(&self) -> BBox<Ltwh> {
        BBox::xywh(self.state[0], self.state[1], self.state[2], self.state[3]).as_ltwh()
    }

    #[cfg(test)]
    pub(crate) fn variance(&self) -> &StateDiag {
        &self.variance
    }
}
