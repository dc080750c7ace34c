// Note request construction and prompt rendering

use ambient_scribe::note::{NoteRequest, PatientInfo, SCRIBE_SYSTEM_PROMPT};

const TEMPLATE: &str = "CHIEF COMPLAINT:\n\nHPI:\n\nASSESSMENT & PLAN:";

#[test]
fn test_prompt_includes_patient_header_with_name_and_dob() {
    let patient = PatientInfo::new(Some("Jane Doe".to_string()), Some("1980-04-02".to_string()));
    let request = NoteRequest::build("chief complaint sore throat", TEMPLATE, Some(&patient));

    let prompt = request.user_prompt();
    assert!(prompt.starts_with("PATIENT: Jane Doe, DOB: 1980-04-02\n\n"));
    assert!(prompt.contains("TRANSCRIPT:\nchief complaint sore throat\n\n"));
    assert!(prompt.ends_with(&format!("TEMPLATE TO FILL OUT:\n{}", TEMPLATE)));
}

#[test]
fn test_prompt_header_with_name_only() {
    let patient = PatientInfo::new(Some("Jane Doe".to_string()), None);
    let request = NoteRequest::build("transcript", TEMPLATE, Some(&patient));

    let prompt = request.user_prompt();
    assert!(prompt.starts_with("PATIENT: Jane Doe\n\n"));
    assert!(!prompt.contains("DOB"));
}

#[test]
fn test_prompt_omits_header_when_name_missing() {
    // A DOB with no name renders no header at all
    let patient = PatientInfo::new(None, Some("1980-04-02".to_string()));
    let request = NoteRequest::build("transcript", TEMPLATE, Some(&patient));

    let prompt = request.user_prompt();
    assert!(prompt.starts_with("TRANSCRIPT:\n"));
    assert!(!prompt.contains("PATIENT"));
    assert!(!prompt.contains("1980-04-02"));
}

#[test]
fn test_prompt_omits_header_without_patient() {
    let request = NoteRequest::build("transcript", TEMPLATE, None);
    assert!(request.user_prompt().starts_with("TRANSCRIPT:\n"));
}

#[test]
fn test_blank_patient_fields_are_dropped() {
    let patient = PatientInfo::new(Some("   ".to_string()), Some("".to_string()));
    let request = NoteRequest::build("transcript", TEMPLATE, Some(&patient));

    assert!(request.patient_name.is_none());
    assert!(request.patient_dob.is_none());
    assert!(request.user_prompt().starts_with("TRANSCRIPT:\n"));
}

#[test]
fn test_transcript_passed_verbatim() {
    // Transcript text is never altered on its way into the prompt
    let transcript = "Patient reports 3 days of sore throat.\nDenies fever.";
    let request = NoteRequest::build(transcript, TEMPLATE, None);

    assert_eq!(request.transcript, transcript);
    assert!(request
        .user_prompt()
        .contains("TRANSCRIPT:\nPatient reports 3 days of sore throat.\nDenies fever.\n\n"));
}

#[test]
fn test_system_prompt_constrains_generation() {
    assert!(SCRIBE_SYSTEM_PROMPT.contains("ONLY the information explicitly stated"));
    assert!(SCRIBE_SYSTEM_PROMPT.contains("Not documented."));
    assert!(SCRIBE_SYSTEM_PROMPT.contains("section headers"));
}
