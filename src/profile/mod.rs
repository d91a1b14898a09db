//! One measured entity: observed data, parameter wiring, forward model.
//!
//! A `Profile` owns everything needed to turn a global parameter set into a
//! residual vector for its measurement:
//!
//! - the parsed assignment (observed nucleus i, coupled nucleus s)
//! - observed shift-difference values and their errors
//! - experiment metadata and the ppm→rad/s factors for both nuclei
//! - the fixed mapping from local role names to global parameter names
//! - a private bounded cache of forward-model evaluations
//!
//! Evaluation is logically read-only; the cache sits behind a `RefCell`
//! since fitting runs strictly single-threaded (a parallel driver would need
//! per-profile locking, or no cache at all).

use std::cell::{Cell, RefCell};

use crate::cache::{DEFAULT_CACHE_CAPACITY, EvalCache, EvalKey};
use crate::domain::{ExperimentConfig, Measurement, Peak};
use crate::error::Result;
use crate::math::shift_sq_mq_2st;
use crate::params::{Parameter, ParameterName, Parameters};

/// Fixed mapping from local role names to global parameter identifiers.
///
/// Built once at construction; two profiles sharing a physical condition
/// resolve the same role to the same identifier and therefore share the fit
/// parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMap {
    pub pb: String,
    pub kex_ab: String,
    pub dw_i_ab: String,
    pub dw_s_ab: String,
}

/// One measurement profile wired to the two-state SQ/MQ forward model.
#[derive(Debug)]
pub struct Profile {
    name: String,
    peak: Peak,
    val: Vec<f64>,
    err: Vec<f64>,
    config: ExperimentConfig,
    ppm_to_rads_i: f64,
    ppm_to_rads_s: f64,
    map_names: RoleMap,
    cache: RefCell<EvalCache>,
    evaluations: Cell<u64>,
}

impl Profile {
    pub fn new(measurement: &Measurement, config: &ExperimentConfig) -> Result<Self> {
        let peak = Peak::parse(&measurement.name, config.kind.default_atoms())?;

        let ppm_to_rads_i = peak.resonance_i.atom.ppm_to_rads(config.h_larmor_frq);
        let ppm_to_rads_s = peak.resonance_s.atom.ppm_to_rads(config.h_larmor_frq);

        // pb and kex_ab are temperature-global; the shift differences belong
        // to their nucleus at that temperature (field-independent, so
        // experiments at different B0 share them).
        let map_names = RoleMap {
            pb: ParameterName::new("pb")
                .with_temperature(config.temperature)
                .full_name(),
            kex_ab: ParameterName::new("kex_ab")
                .with_temperature(config.temperature)
                .full_name(),
            dw_i_ab: ParameterName::new("dw_ab")
                .with_nuclei(&peak.resonance_i.name)
                .with_temperature(config.temperature)
                .full_name(),
            dw_s_ab: ParameterName::new("dw_ab")
                .with_nuclei(&peak.resonance_s.name)
                .with_temperature(config.temperature)
                .full_name(),
        };

        Ok(Profile {
            name: measurement.name.clone(),
            peak,
            val: vec![measurement.shift],
            err: vec![measurement.shift_err],
            config: config.clone(),
            ppm_to_rads_i,
            ppm_to_rads_s,
            map_names,
            cache: RefCell::new(EvalCache::new(DEFAULT_CACHE_CAPACITY)),
            evaluations: Cell::new(0),
        })
    }

    /// Replace the evaluation cache with one of the given capacity.
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        Profile {
            cache: RefCell::new(EvalCache::new(capacity)),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn peak(&self) -> &Peak {
        &self.peak
    }

    pub fn experiment_name(&self) -> &str {
        &self.config.name
    }

    pub fn map_names(&self) -> &RoleMap {
        &self.map_names
    }

    pub fn val(&self) -> &[f64] {
        &self.val
    }

    pub fn err(&self) -> &[f64] {
        &self.err
    }

    /// Number of observed data points.
    pub fn len(&self) -> usize {
        self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.val.is_empty()
    }

    /// Underlying forward-model evaluations so far (cache misses).
    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }

    /// Back-calculate the SQ−MQ shift difference (ppm) for the current
    /// global parameter values.
    ///
    /// Deterministic: identical parameter values produce bit-identical
    /// output. The only side effect is the private cache.
    pub fn predict(&self, params: &Parameters) -> Result<Vec<f64>> {
        let pb = params.value(&self.map_names.pb)?;
        let kex_ab = params.value(&self.map_names.kex_ab)?;
        let dw_i_ab = params.value(&self.map_names.dw_i_ab)?;
        let dw_s_ab = params.value(&self.map_names.dw_s_ab)?;

        let key = EvalKey::new([pb, kex_ab, dw_i_ab, dw_s_ab]);
        if let Some(hit) = self.cache.borrow_mut().get(&key) {
            return Ok(hit);
        }

        let values = self.evaluate(pb, kex_ab, dw_i_ab, dw_s_ab);
        self.cache.borrow_mut().insert(key, values.clone());
        Ok(values)
    }

    fn evaluate(&self, pb: f64, kex_ab: f64, dw_i_ab: f64, dw_s_ab: f64) -> Vec<f64> {
        self.evaluations.set(self.evaluations.get() + 1);

        let domega_i = dw_i_ab * self.ppm_to_rads_i;
        let domega_s = dw_s_ab * self.ppm_to_rads_s;

        let (shift_sq, shift_mq) = shift_sq_mq_2st(pb, kex_ab, domega_i, domega_s);

        vec![(shift_sq - shift_mq) / self.ppm_to_rads_i]
    }

    /// Error-normalized residuals `(observed − predicted) / error`.
    pub fn residuals(&self, params: &Parameters) -> Result<Vec<f64>> {
        let values = self.predict(params)?;
        Ok(self
            .val
            .iter()
            .zip(self.err.iter())
            .zip(values.iter())
            .map(|((&val, &err), &cal)| (val - cal) / err)
            .collect())
    }

    /// Whether this profile should be dropped from the fit at the current
    /// parameter values.
    ///
    /// Per-experiment-kind hook for exchange-regime cutoffs; the SQ/MQ shift
    /// experiment excludes nothing.
    pub fn is_excluded(&self, _params: &Parameters) -> bool {
        match self.config.kind {
            crate::domain::ExperimentKind::ShiftNSqMq2St => false,
        }
    }

    /// Seed default parameters for this profile's four roles.
    pub fn default_parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.add(
            &self.map_names.pb,
            Parameter::new(0.05).with_bounds(Some(0.0), Some(1.0)),
        );
        params.add(
            &self.map_names.kex_ab,
            Parameter::new(200.0).with_bounds(Some(0.0), None),
        );
        params.add(&self.map_names.dw_i_ab, Parameter::new(0.0));
        params.add(&self.map_names.dw_s_ab, Parameter::fixed(0.0));
        params
    }

    /// Fixed-width report line(s): identity, metadata, observed value/error,
    /// and the back-calculated value when parameters are supplied.
    ///
    /// Upper-cased for compatibility with downstream results files.
    pub fn report(&self, params: Option<&Parameters>) -> Result<String> {
        let values = match params {
            Some(params) => Some(self.predict(params)?),
            None => None,
        };

        let mut lines = Vec::with_capacity(self.val.len() + 1);
        for (i, (&val, &err)) in self.val.iter().zip(self.err.iter()).enumerate() {
            let mut line = format!(
                "{:<10} {:>8.1} {:>5.1} {:>15.8e} {:>15.8e}",
                self.name, self.config.h_larmor_frq, self.config.temperature, val, err,
            );
            if let Some(values) = &values {
                line.push_str(&format!(" {:>15.8e}", values[i]));
            }
            lines.push(line);
        }
        lines.push(String::new());

        Ok(lines.join("\n").to_uppercase())
    }
}
