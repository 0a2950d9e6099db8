//! Profile construction and incremental reservation updates
//!
//! A reservation curve tracks the cumulative contribution of a task over
//! its execution window. When a window boundary or a capacity bound moves,
//! the whole curve is not rebuilt: a small correction profile describing
//! exactly the change is synthesized here and folded into the target via
//! `sum`. The merge-based algebra is what makes this cheap.

use crate::tree::Curve;

/// Tolerance below which a parameter move is treated as a no-op.
const PARAM_TOLERANCE: f64 = 1e-6;

/// Ramp profile: flat until `a`, ramps by `gap` over `[a, b]`, returns to
/// flat over `[b, c]`.
pub fn delta_profile(gap: f64, a: f64, b: f64, c: f64) -> Curve {
    let mut profile = Curve::new();
    profile.insert(a, 0.0);
    profile.insert(b, gap);
    profile.insert(c, -gap);
    profile
}

/// Step profile: flat until `a`, ramps to a permanent step of `cap` at `b`.
pub fn cba_profile(cap: f64, a: f64, b: f64) -> Curve {
    let mut profile = Curve::new();
    profile.insert(a, 0.0);
    profile.insert(b, cap);
    profile
}

impl Curve {
    /// Fold in the change induced by the minimum start time moving from
    /// `stmin_old` to `stmin`, with completion bound `ctmin` and capacity
    /// bounds `cap_min`/`cap_max`.
    ///
    /// Three geometric cases: the start moved inside the window, moved past
    /// the completion bound, or the pair was already inverted and the start
    /// keeps moving away. Each yields a ramp whose slope spreads the
    /// capacity over the surviving window.
    pub fn update_cbr_stmin(
        &mut self,
        stmin_old: f64,
        stmin: f64,
        ctmin: f64,
        cap_min: f64,
        cap_max: f64,
    ) {
        let cap = if cap_min > 0.0 { cap_max } else { cap_min };
        if (stmin - stmin_old).abs() < PARAM_TOLERANCE {
            return;
        }
        tracing::debug!(stmin_old, stmin, ctmin, cap, "updating stmin contribution");

        let delta = if stmin_old < stmin && stmin < ctmin {
            let slope = -cap / (ctmin - stmin_old);
            let gap = slope * (stmin - stmin_old);
            delta_profile(gap, stmin_old, stmin, ctmin)
        } else if stmin_old <= ctmin && ctmin < stmin {
            delta_profile(-cap, stmin_old, ctmin, stmin)
        } else if ctmin < stmin_old && stmin_old < stmin {
            let slope = -cap / (ctmin - stmin);
            let gap = slope * (stmin_old - stmin);
            delta_profile(gap, ctmin, stmin_old, stmin)
        } else {
            return;
        };
        self.sum(&delta);
    }

    /// Fold in the change induced by the minimum completion time moving
    /// from `ctmin_old` to `ctmin`; mirror of [`Curve::update_cbr_stmin`]
    /// on the other window boundary.
    pub fn update_cbr_ctmin(
        &mut self,
        ctmin_old: f64,
        ctmin: f64,
        stmin: f64,
        cap_min: f64,
        cap_max: f64,
    ) {
        let cap = if cap_min > 0.0 { cap_max } else { cap_min };
        if (ctmin - ctmin_old).abs() < PARAM_TOLERANCE {
            return;
        }
        tracing::debug!(ctmin_old, ctmin, stmin, cap, "updating ctmin contribution");

        let delta = if stmin < ctmin_old && ctmin_old < ctmin {
            let slope = -cap / (ctmin - stmin);
            let gap = slope * (ctmin - ctmin_old);
            delta_profile(gap, stmin, ctmin_old, ctmin)
        } else if ctmin_old <= stmin && stmin < ctmin {
            delta_profile(-cap, ctmin_old, stmin, ctmin)
        } else if ctmin_old < ctmin && ctmin < stmin {
            let slope = -cap / (ctmin_old - stmin);
            let gap = slope * (ctmin_old - ctmin);
            delta_profile(gap, ctmin_old, ctmin, stmin)
        } else {
            return;
        };
        self.sum(&delta);
    }

    /// Fold in the change induced by the maximum start time moving from
    /// `stmax_old` to `stmax`, with completion bound `ctmax`.
    pub fn update_cbr_stmax(
        &mut self,
        stmax_old: f64,
        stmax: f64,
        ctmax: f64,
        cap_min: f64,
        cap_max: f64,
    ) {
        let cap = if cap_min > 0.0 { cap_min } else { cap_max };
        if (stmax - stmax_old).abs() < PARAM_TOLERANCE {
            return;
        }
        tracing::debug!(stmax_old, stmax, ctmax, cap, "updating stmax contribution");

        let delta = if stmax < stmax_old && stmax_old < ctmax {
            let slope = cap / (ctmax - stmax);
            let gap = slope * (stmax_old - stmax);
            delta_profile(gap, stmax, stmax_old, ctmax)
        } else if stmax <= ctmax && ctmax < stmax_old {
            delta_profile(cap, stmax, ctmax, stmax_old)
        } else if ctmax < stmax && stmax < stmax_old {
            let slope = cap / (ctmax - stmax_old);
            let gap = slope * (stmax - stmax_old);
            delta_profile(gap, ctmax, stmax, stmax_old)
        } else {
            return;
        };
        self.sum(&delta);
    }

    /// Fold in the change induced by the maximum completion time moving
    /// from `ctmax_old` to `ctmax`; mirror of [`Curve::update_cbr_stmax`].
    pub fn update_cbr_ctmax(
        &mut self,
        ctmax_old: f64,
        ctmax: f64,
        stmax: f64,
        cap_min: f64,
        cap_max: f64,
    ) {
        let cap = if cap_min > 0.0 { cap_min } else { cap_max };
        if (ctmax - ctmax_old).abs() < PARAM_TOLERANCE {
            return;
        }
        tracing::debug!(ctmax_old, ctmax, stmax, cap, "updating ctmax contribution");

        let delta = if stmax < ctmax && ctmax < ctmax_old {
            let slope = cap / (ctmax_old - stmax);
            let gap = slope * (ctmax_old - ctmax);
            delta_profile(gap, stmax, ctmax, ctmax_old)
        } else if ctmax <= stmax && stmax < ctmax_old {
            delta_profile(cap, ctmax, stmax, ctmax_old)
        } else if ctmax < ctmax_old && ctmax_old < stmax {
            let slope = cap / (ctmax - stmax);
            let gap = slope * (ctmax - ctmax_old);
            delta_profile(gap, ctmax, ctmax_old, stmax)
        } else {
            return;
        };
        self.sum(&delta);
    }

    /// Fold in a capacity change from `cap_old` to `cap` over the window
    /// `[start, end]`: a single step profile for the difference.
    pub fn update_cbr_cap(&mut self, cap_old: f64, cap: f64, start: f64, end: f64) {
        if (cap - cap_old).abs() < PARAM_TOLERANCE {
            return;
        }
        tracing::debug!(cap_old, cap, start, end, "updating capacity contribution");
        let delta = cba_profile(cap - cap_old, start, end);
        self.sum(&delta);
    }
}
