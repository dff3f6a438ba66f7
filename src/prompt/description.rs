//! Text prompts built from classifier labels

use crate::inference::Classification;

/// Number of leading predictions carried into prompts
pub const TOP_LABEL_COUNT: usize = 3;

/// Join the first three labels with ", ", keeping the classifier's order
pub fn top_labels(predictions: &[Classification]) -> String {
    predictions
        .iter()
        .take(TOP_LABEL_COUNT)
        .map(|p| p.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Instruction sent to the text model to describe an image.
///
/// A custom instruction, when present, is appended so the description already
/// leans toward the requested change.
pub fn describe_instruction(labels: &str, custom: Option<&str>) -> String {
    let mut prompt = format!(
        "Describe an image that contains: {}. Provide a detailed, creative description \
         in one or two sentences that could be used to generate a similar image.",
        labels
    );

    if let Some(custom) = custom {
        prompt.push_str(&format!(" The user wants to modify it as follows: {}.", custom));
    }

    prompt
}

pub fn fallback_description(labels: &str) -> String {
    format!("An image containing {}", labels)
}

/// The model's description, or the label fallback when it produced only whitespace
pub fn description_or_fallback(generated: &str, labels: &str) -> String {
    match generated.trim() {
        "" => fallback_description(labels),
        text => text.to_string(),
    }
}

/// Final transform description: `base`, or `base. custom` when a custom prompt was given
pub fn final_description(base: &str, custom: Option<&str>) -> String {
    match custom {
        Some(custom) if !custom.is_empty() => format!("{}. {}", base, custom),
        _ => base.to_string(),
    }
}
