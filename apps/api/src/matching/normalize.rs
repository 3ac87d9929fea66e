use crate::matching::ScoreError;

/// Lowercased copies of the two inputs. Nothing else is altered: whitespace and
/// punctuation survive so substring matching sees the text as the user wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPair {
    pub resume: String,
    pub job_description: String,
}

/// Rejects empty or whitespace-only input before any scoring work happens.
/// The resume is checked first.
pub fn normalize(resume: &str, job_description: &str) -> Result<NormalizedPair, ScoreError> {
    if resume.trim().is_empty() {
        return Err(ScoreError::EmptyInput { field: "resume" });
    }
    if job_description.trim().is_empty() {
        return Err(ScoreError::EmptyInput {
            field: "job_description",
        });
    }

    Ok(NormalizedPair {
        resume: resume.to_lowercase(),
        job_description: job_description.to_lowercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_both_inputs() {
        let pair = normalize("Built RUST Services", "Senior Rust Engineer").unwrap();
        assert_eq!(pair.resume, "built rust services");
        assert_eq!(pair.job_description, "senior rust engineer");
    }

    #[test]
    fn test_preserves_surrounding_whitespace() {
        let pair = normalize("  Rust \n", "Go").unwrap();
        assert_eq!(pair.resume, "  rust \n");
    }

    #[test]
    fn test_empty_resume_rejected() {
        let err = normalize("", "rust engineer").unwrap_err();
        assert!(matches!(err, ScoreError::EmptyInput { field: "resume" }));
    }

    #[test]
    fn test_whitespace_job_description_rejected() {
        let err = normalize("rust", " \t\n ").unwrap_err();
        assert!(matches!(
            err,
            ScoreError::EmptyInput {
                field: "job_description"
            }
        ));
    }

    #[test]
    fn test_both_empty_reports_resume() {
        let err = normalize("   ", "").unwrap_err();
        assert!(matches!(err, ScoreError::EmptyInput { field: "resume" }));
    }
}
