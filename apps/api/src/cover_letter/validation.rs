//! Length gate applied to the cleaned job posting and resume text before any
//! prompt is built.

pub const MIN_JOB_POSTING_CHARS: usize = 50;
pub const MIN_RESUME_CHARS: usize = 100;
pub const MAX_INPUT_CHARS: usize = 50_000;

/// Returns `(true, "")` when both inputs are usable, otherwise `(false, reason)`.
/// Minimums apply to trimmed text; maximums to the text as given.
pub fn validate_inputs(job_posting: &str, resume: &str) -> (bool, String) {
    if job_posting.trim().chars().count() < MIN_JOB_POSTING_CHARS {
        return (
            false,
            "Job posting is too short or missing. Please provide a valid job description."
                .to_string(),
        );
    }

    if resume.trim().chars().count() < MIN_RESUME_CHARS {
        return (
            false,
            "Resume is too short or missing. Please upload a valid resume.".to_string(),
        );
    }

    if job_posting.chars().count() > MAX_INPUT_CHARS {
        return (
            false,
            "Job posting is too long. Please provide a shorter description.".to_string(),
        );
    }

    if resume.chars().count() > MAX_INPUT_CHARS {
        return (
            false,
            "Resume is too long. Please provide a more concise resume.".to_string(),
        );
    }

    (true, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_valid_inputs_pass() {
        assert_eq!(validate_inputs(&text(50), &text(100)), (true, String::new()));
    }

    #[test]
    fn test_short_job_posting_is_rejected() {
        let (ok, msg) = validate_inputs(&text(49), &text(200));
        assert!(!ok);
        assert!(msg.starts_with("Job posting is too short or missing"));
    }

    #[test]
    fn test_job_posting_minimum_ignores_surrounding_whitespace() {
        let padded = format!("   {}   ", text(49));
        let (ok, _) = validate_inputs(&padded, &text(200));
        assert!(!ok);
    }

    #[test]
    fn test_short_resume_is_rejected() {
        let (ok, msg) = validate_inputs(&text(200), &text(99));
        assert!(!ok);
        assert!(msg.starts_with("Resume is too short or missing"));
    }

    #[test]
    fn test_overlong_inputs_are_rejected() {
        let (ok, msg) = validate_inputs(&text(50_001), &text(200));
        assert!(!ok);
        assert!(msg.starts_with("Job posting is too long"));

        let (ok, msg) = validate_inputs(&text(200), &text(50_001));
        assert!(!ok);
        assert!(msg.starts_with("Resume is too long"));
    }

    #[test]
    fn test_exact_maximum_is_accepted() {
        assert!(validate_inputs(&text(50_000), &text(50_000)).0);
    }
}
