//! Knowledge base: diagnosis definitions and the finding vocabulary.
//!
//! The KB is pure data, built once and shared read-only as
//! `Arc<KnowledgeBase>`. Every ordered collection here is a `Vec` because
//! definition order is observable downstream (scan order, follow-up order,
//! order-list order).
//!
//! ## File format
//!
//! ```json
//! {
//!   "diagnoses": [
//!     { "key": "influenza", "label": "Influenza", "prior": -1.2,
//!       "findingWeights": [ { "finding": "fever", "positive": 1.0, "negative": -0.3 } ],
//!       "recommendedOrders": [ "Influenza NAAT (LOINC 94500-6)" ] }
//!   ],
//!   "findings": [
//!     { "name": "fever", "question": "Have you had a measured fever?", "aliases": [] }
//!   ]
//! }
//! ```

mod builtin;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScribeError};

/// Positive/negative contribution of one finding to a diagnosis logit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingWeight {
    pub finding: String,
    /// Added when the finding is held with certainty above the threshold.
    pub positive: f64,
    /// Added (damped) when the finding is held with low certainty.
    pub negative: f64,
}

/// Static definition of one diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisDefinition {
    pub key: String,
    pub label: String,
    /// Log-prior, the starting logit.
    pub prior: f64,
    pub finding_weights: Vec<FindingWeight>,
    #[serde(default)]
    pub recommended_orders: Vec<String>,
}

impl DiagnosisDefinition {
    pub fn weight_for(&self, finding: &str) -> Option<&FindingWeight> {
        self.finding_weights.iter().find(|w| w.finding == finding)
    }

    /// Finding names in definition order.
    pub fn finding_names(&self) -> impl Iterator<Item = &str> {
        self.finding_weights.iter().map(|w| w.finding.as_str())
    }
}

/// One entry of the detectable finding vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingSpec {
    /// Canonical finding name, also the primary trigger phrase.
    pub name: String,
    /// Follow-up question asked when the finding is still missing.
    pub question: String,
    /// Extra trigger phrases recorded under `name`.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl FindingSpec {
    /// All trigger phrases, lowercased, canonical name first.
    pub fn triggers(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .map(|t| t.to_lowercase())
    }
}

#[derive(Debug, Deserialize)]
struct KnowledgeBaseFile {
    diagnoses: Vec<DiagnosisDefinition>,
    #[serde(default)]
    findings: Vec<FindingSpec>,
}

/// Immutable registry of diagnoses and finding questions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    diagnoses: Vec<DiagnosisDefinition>,
    findings: Vec<FindingSpec>,
}

impl KnowledgeBase {
    /// Build a validated knowledge base.
    ///
    /// # Errors
    /// - `DuplicateDiagnosis` / `DuplicateLabel` / `DuplicateFinding` on repeats.
    /// - `InvalidKnowledgeBase` on blank names or non-finite numbers.
    pub fn new(diagnoses: Vec<DiagnosisDefinition>, findings: Vec<FindingSpec>) -> Result<Self> {
        let mut keys = HashSet::new();
        let mut labels = HashSet::new();
        for dx in &diagnoses {
            validate_diagnosis(dx)?;
            if !keys.insert(dx.key.as_str()) {
                return Err(ScribeError::DuplicateDiagnosis {
                    key: dx.key.clone(),
                });
            }
            if !labels.insert(dx.label.as_str()) {
                return Err(ScribeError::DuplicateLabel {
                    label: dx.label.clone(),
                });
            }
        }

        let mut names = HashSet::new();
        for spec in &findings {
            if spec.name.trim().is_empty() {
                return Err(ScribeError::InvalidKnowledgeBase(
                    "finding vocabulary entry with blank name".into(),
                ));
            }
            if spec.aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(ScribeError::InvalidKnowledgeBase(format!(
                    "finding '{}' has a blank alias",
                    spec.name
                )));
            }
            if !names.insert(spec.name.as_str()) {
                return Err(ScribeError::DuplicateFinding {
                    name: spec.name.clone(),
                });
            }
        }

        for dx in &diagnoses {
            for name in dx.finding_names() {
                if !names.contains(name) {
                    debug!(
                        diagnosis = %dx.key,
                        finding = name,
                        "weighted finding has no vocabulary entry; it can be asked about but never detected"
                    );
                }
            }
        }

        Ok(Self {
            diagnoses,
            findings,
        })
    }

    /// Parse and validate a JSON knowledge base.
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: KnowledgeBaseFile = serde_json::from_str(raw)?;
        Self::new(file.diagnoses, file.findings)
    }

    /// Load a JSON knowledge base from disk.
    ///
    /// # Errors
    /// - `KnowledgeBaseNotFound` if `path` does not exist.
    /// - `Parse` / validation errors from [`KnowledgeBase::from_json`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScribeError::KnowledgeBaseNotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        let kb = Self::from_json(&raw)?;
        info!(
            path = ?path,
            diagnoses = kb.diagnoses.len(),
            findings = kb.findings.len(),
            "knowledge base loaded"
        );
        Ok(kb)
    }

    /// Diagnoses in definition order.
    pub fn diagnoses(&self) -> &[DiagnosisDefinition] {
        &self.diagnoses
    }

    /// Detectable findings in vocabulary order.
    pub fn findings(&self) -> &[FindingSpec] {
        &self.findings
    }

    pub fn diagnosis_by_label(&self, label: &str) -> Option<&DiagnosisDefinition> {
        self.diagnoses.iter().find(|dx| dx.label == label)
    }

    pub fn question_for(&self, finding: &str) -> Option<&str> {
        self.findings
            .iter()
            .find(|spec| spec.name == finding)
            .map(|spec| spec.question.as_str())
    }

    /// Question text for `finding`, falling back to a generic prompt.
    pub fn follow_up_text(&self, finding: &str) -> String {
        match self.question_for(finding) {
            Some(q) => q.to_string(),
            None => format!("Tell me more about {finding}?"),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_diagnosis(dx: &DiagnosisDefinition) -> Result<()> {
    let invalid = |msg: String| Err(ScribeError::InvalidKnowledgeBase(msg));

    if dx.key.trim().is_empty() {
        return invalid("diagnosis with blank key".into());
    }
    if dx.label.trim().is_empty() {
        return invalid(format!("diagnosis '{}' has a blank label", dx.key));
    }
    if !dx.prior.is_finite() {
        return invalid(format!("diagnosis '{}' has a non-finite prior", dx.key));
    }

    let mut seen = HashSet::new();
    for w in &dx.finding_weights {
        if w.finding.trim().is_empty() {
            return invalid(format!("diagnosis '{}' weights a blank finding", dx.key));
        }
        if !w.positive.is_finite() || !w.negative.is_finite() {
            return invalid(format!(
                "diagnosis '{}' has a non-finite weight for '{}'",
                dx.key, w.finding
            ));
        }
        if !seen.insert(w.finding.as_str()) {
            return invalid(format!(
                "diagnosis '{}' weights '{}' twice",
                dx.key, w.finding
            ));
        }
    }
    Ok(())
}
