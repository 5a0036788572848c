//! Illustrative reference knowledge base. Not clinically validated.

use super::{DiagnosisDefinition, FindingSpec, FindingWeight, KnowledgeBase};

fn w(finding: &str, positive: f64, negative: f64) -> FindingWeight {
    FindingWeight {
        finding: finding.to_string(),
        positive,
        negative,
    }
}

fn dx(
    key: &str,
    label: &str,
    prior: f64,
    finding_weights: Vec<FindingWeight>,
    orders: &[&str],
) -> DiagnosisDefinition {
    DiagnosisDefinition {
        key: key.to_string(),
        label: label.to_string(),
        prior,
        finding_weights,
        recommended_orders: orders.iter().map(|o| o.to_string()).collect(),
    }
}

fn q(name: &str, question: &str) -> FindingSpec {
    FindingSpec {
        name: name.to_string(),
        question: question.to_string(),
        aliases: Vec::new(),
    }
}

impl KnowledgeBase {
    /// The built-in respiratory/pharyngeal knowledge base.
    pub fn builtin() -> Self {
        let diagnoses = vec![
            dx(
                "influenza",
                "Influenza",
                -1.2,
                vec![
                    w("fever", 1.0, -0.3),
                    w("cough", 0.7, -0.2),
                    w("myalgias", 0.8, -0.2),
                    w("sore throat", 0.4, -0.1),
                ],
                &["Influenza NAAT (LOINC 94500-6)"],
            ),
            dx(
                "pneumonia",
                "Community-acquired pneumonia",
                -1.6,
                vec![
                    w("fever", 0.6, -0.2),
                    w("productive cough", 1.0, -0.3),
                    w("pleuritic chest pain", 0.8, -0.2),
                    w("tachypnea", 0.7, -0.2),
                    w("focal crackles", 1.1, -0.3),
                ],
                &["CXR PA/LAT", "CBC with diff", "Pulse oximetry"],
            ),
            dx(
                "mononucleosis",
                "Infectious mononucleosis",
                -2.0,
                vec![
                    w("sore throat", 0.9, -0.2),
                    w("fatigue", 0.7, -0.2),
                    w("posterior LAD", 1.1, -0.3),
                    w("splenomegaly", 0.9, -0.3),
                ],
                &[
                    "Monospot/EBV serology",
                    "Avoid contact sports if splenomegaly",
                ],
            ),
        ];

        let findings = vec![
            q(
                "fever",
                "Have you had a measured fever? How high and how many days?",
            ),
            q(
                "cough",
                "Is the cough dry or productive? Any blood or sputum color?",
            ),
            q("myalgias", "Do you have body aches or chills?"),
            q("sore throat", "Any trouble swallowing or swollen glands?"),
            q(
                "pleuritic chest pain",
                "Does it hurt more with a deep breath?",
            ),
            q("tachypnea", "Any shortness of breath or breathing fast?"),
            q(
                "focal crackles",
                "Has anyone mentioned abnormal lung sounds?",
            ),
        ];

        Self {
            diagnoses,
            findings,
        }
    }
}
