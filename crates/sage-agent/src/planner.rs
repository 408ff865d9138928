//! Plan generation — assemble one prompt from every stored subject and send
//! it to the resolved model. The model's text comes back verbatim; table
//! parsing is the frontend's job.

use tracing::info;

use sage_core::types::Subject;

use crate::provider::{GenerativeProvider, ProviderError};

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("no subjects recorded — add subjects before generating a plan")]
    NoSubjects,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Generates study plans against a model resolved at startup.
///
/// Constructed only with a resolved model identifier, so an unresolved
/// model can never reach a request handler.
pub struct PlanGenerator {
    provider: Box<dyn GenerativeProvider>,
    model: String,
}

impl PlanGenerator {
    pub fn new(provider: Box<dyn GenerativeProvider>, model: String) -> Self {
        Self { provider, model }
    }

    /// The model identifier this generator was resolved with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the prompt from the given subjects and send it to the model.
    /// `hours` is opaque text interpolated into the prompt, not validated.
    pub async fn generate(
        &self,
        subjects: &[Subject],
        hours: &str,
        user_prompt: Option<&str>,
    ) -> Result<String, PlanError> {
        if subjects.is_empty() {
            return Err(PlanError::NoSubjects);
        }

        let prompt = build_prompt(subjects, hours, user_prompt);
        info!(
            model = %self.model,
            subjects = subjects.len(),
            "sending plan-generation prompt"
        );

        Ok(self.provider.generate(&self.model, &prompt).await?)
    }
}

/// Assemble the full plan-generation prompt. Pure — unit-tested directly.
pub fn build_prompt(subjects: &[Subject], hours: &str, user_prompt: Option<&str>) -> String {
    let mut syllabus_details = String::new();
    for subject in subjects {
        syllabus_details.push_str(&format!(
            "Subject: {}, Exam Date: {}, Difficulty: {}, Comments: {}, Syllabus: {}\n\n",
            subject.sub,
            subject.date.format("%a %b %d %Y"),
            subject.difficulty,
            subject.comments,
            subject.syllabus,
        ));
    }

    let user_section = match user_prompt {
        Some(extra) if !extra.trim().is_empty() => format!("\n\nUser Prompt: {extra}"),
        _ => String::new(),
    };

    format!(
        "You are a study planner AI. Generate a **Markdown formatted table** for a smart daily study plan. The table should include the following columns:\n\
         | Date | Subject | Topics | Tasks |\n\
         Study hours/day: {hours}\n\
         Analyze the following subjects and syllabus content:\n\
         {syllabus_details}\
         Instructions:\n\
         - Group topics by subject and day.\n\
         - Use realistic daily workload considering study hours.\n\
         - Prioritize **harder subjects** and **earlier exam dates**.\n\
         - Include **revision days**.\n\
         - Keep Markdown syntax clean and aligned.\n\
         Output only the table. After the table, add 4-5 important general tips in bullet points like break suggestions, recall, etc.\
         {user_section}"
    )
}
