//! JSON fit report.
//!
//! The report is the portable representation of one fit cycle:
//! - true and estimated parameters
//! - solver diagnostics
//! - the sample set the fit ran on

use serde::{Deserialize, Serialize};

use crate::domain::{FitResult, ParameterVector, SamplePoint, SampleSet, Termination};
use crate::error::FitError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub tool: String,
    pub truth: ParameterVector,
    pub estimate: ParameterVector,
    pub initial_guess: ParameterVector,
    pub diagnostics: FitDiagnostics,
    pub samples: Vec<SamplePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    pub sse: f64,
    pub rmse: f64,
    pub evaluations: usize,
    pub termination: Termination,
}

impl FitReport {
    pub fn new(sample: &SampleSet, fit: &FitResult) -> Self {
        Self {
            tool: "fourpl".to_string(),
            truth: sample.truth,
            estimate: fit.params,
            initial_guess: fit.initial_guess,
            diagnostics: FitDiagnostics {
                sse: fit.sse,
                rmse: fit.rmse,
                evaluations: fit.evaluations,
                termination: fit.termination,
            },
            samples: sample.points.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, FitError> {
        serde_json::to_string_pretty(self).map_err(|e| FitError::Report(e.to_string()))
    }
}
