use serde::{Deserialize, Serialize};

/// Instructions given to the note-generation backend. The note must use only
/// transcript-stated facts, mark missing fields "Not documented." and keep
/// the template's section headers verbatim.
pub const SCRIBE_SYSTEM_PROMPT: &str = "\
You are an expert medical scribe.

Generate a structured clinical note using ONLY the information explicitly stated in the transcript provided.

Rules:
- If a field has no corresponding information in the transcript, write \"Not documented.\"
- Do not infer, assume, or fabricate diagnoses, medications, vitals, or treatment plans.
- Use standard medical terminology appropriate for the specialty.
- Follow the exact format and section headers of the template provided.
- CPT and ICD codes should only be suggested if the procedure or diagnosis is explicitly discussed.
- Keep the note concise and clinically accurate.

The output should be ready to paste directly into an EHR system.";

/// Optional patient metadata attached to a visit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: Option<String>,
    pub dob: Option<String>,
}

impl PatientInfo {
    pub fn new(name: Option<String>, dob: Option<String>) -> Self {
        Self { name, dob }
    }
}

/// A fully assembled note-generation request.
///
/// Immutable once constructed; built only from a finalized transcript,
/// never a partial one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRequest {
    pub transcript: String,
    pub template_body: String,
    pub patient_name: Option<String>,
    pub patient_dob: Option<String>,
}

impl NoteRequest {
    /// Combine transcript, template body and optional patient metadata.
    /// Pure, no side effects.
    pub fn build(
        transcript: impl Into<String>,
        template_body: impl Into<String>,
        patient: Option<&PatientInfo>,
    ) -> Self {
        Self {
            transcript: transcript.into(),
            template_body: template_body.into(),
            patient_name: patient
                .and_then(|p| p.name.clone())
                .filter(|n| !n.trim().is_empty()),
            patient_dob: patient
                .and_then(|p| p.dob.clone())
                .filter(|d| !d.trim().is_empty()),
        }
    }

    /// Render the user-facing prompt body.
    ///
    /// The patient header is omitted entirely when there is no name, even if
    /// a DOB was supplied.
    pub fn user_prompt(&self) -> String {
        let header = match &self.patient_name {
            Some(name) => match &self.patient_dob {
                Some(dob) => format!("PATIENT: {}, DOB: {}\n\n", name, dob),
                None => format!("PATIENT: {}\n\n", name),
            },
            None => String::new(),
        };

        format!(
            "{}TRANSCRIPT:\n{}\n\nTEMPLATE TO FILL OUT:\n{}",
            header, self.transcript, self.template_body
        )
    }
}
