//! Static feedback catalog. One message per rubric criterion, shown when the
//! criterion fails.

use crate::analysis::rubric::{Criterion, MAX_WORDS, MIN_WORDS};

/// Prepended to the feedback when no text could be read from the document.
pub const EXTRACTION_FAILED_FEEDBACK: &str =
    "We could not read any text from your document. Make sure it is not a scanned image or a password-protected file.";

pub fn criterion_feedback(criterion: Criterion) -> String {
    match criterion {
        Criterion::Name => "Add your full name at the top of your resume.".to_string(),
        Criterion::Contact => {
            "Include contact details such as an email address and a phone number.".to_string()
        }
        Criterion::Address => {
            "Add your location or mailing address so recruiters know where you are based."
                .to_string()
        }
        Criterion::Skills => {
            "Add a dedicated Skills section listing your key technical and soft skills."
                .to_string()
        }
        Criterion::Experience => {
            "Add a Work Experience section describing your previous roles and achievements."
                .to_string()
        }
        Criterion::Projects => {
            "Add a Projects section to showcase work you have built or contributed to.".to_string()
        }
        Criterion::Interests => {
            "Consider adding an Interests or Hobbies section to round out your profile."
                .to_string()
        }
        Criterion::Certifications => {
            "List any certifications or courses that support your application.".to_string()
        }
        Criterion::Length => format!(
            "Keep your resume between {MIN_WORDS} and {MAX_WORDS} words so it stays focused and complete."
        ),
        Criterion::Grammar => {
            "Proofread your resume for spelling mistakes, repeated words and punctuation errors."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_criterion_has_distinct_message() {
        let mut messages: Vec<String> = Criterion::ALL.iter().map(|c| criterion_feedback(*c)).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), Criterion::ALL.len());
    }

    #[test]
    fn test_length_message_mentions_bounds() {
        let msg = criterion_feedback(Criterion::Length);
        assert!(msg.contains(&MIN_WORDS.to_string()));
        assert!(msg.contains(&MAX_WORDS.to_string()));
    }
}
