//! Fixed initial dataset used to seed a fresh store on first run.

use crate::models::{Prompt, PromptKind, Tag};

/// Category filter values. `"All"` is the sentinel that bypasses the
/// category filter in search queries.
pub const CATEGORIES: [&str; 6] = [
    "All", "Writing", "Coding", "Creative", "Business", "Learning",
];

const TAG_NAMES: [&str; 14] = [
    "GPT",
    "Claude",
    "Copilot",
    "Email",
    "Blog",
    "Code",
    "Debug",
    "Story",
    "Art",
    "Marketing",
    "Analysis",
    "Summary",
    "Translation",
    "Brainstorm",
];

/// The full tag list seeded on first run.
pub fn seed_tags() -> Vec<Tag> {
    TAG_NAMES
        .iter()
        .map(|name| Tag { name: (*name).to_string(), image: None })
        .collect()
}

fn prompt(
    id: &str,
    title: &str,
    content: &str,
    tags: &[&str],
    category: &str,
    kind: PromptKind,
    favorite: bool,
) -> Prompt {
    Prompt {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        category: category.to_string(),
        kind,
        favorite,
        preview_image: None,
        generated_media: None,
    }
}

/// The sample prompts seeded on first run.
pub fn seed_prompts() -> Vec<Prompt> {
    vec![
        prompt(
            "1",
            "Code Reviewer",
            "Review this code for bugs, performance issues, and best practices. Suggest improvements with explanations:\n\n[paste code here]",
            &["Code", "Debug", "Claude"],
            "Coding",
            PromptKind::Text,
            true,
        ),
        prompt(
            "2",
            "Blog Post Writer",
            "Write a comprehensive blog post about [topic]. Include an engaging introduction, 3-5 main sections with subheadings, practical examples, and a compelling conclusion with a call to action.",
            &["Blog", "GPT", "Marketing"],
            "Writing",
            PromptKind::Text,
            false,
        ),
        prompt(
            "3",
            "Email Composer",
            "Compose a professional email to [recipient] regarding [subject]. Keep it concise, polite, and action-oriented. Include a clear subject line suggestion.",
            &["Email", "GPT", "Business"],
            "Business",
            PromptKind::Text,
            true,
        ),
        prompt(
            "4",
            "Story Generator",
            "Create a short story in the [genre] genre. Include vivid descriptions, compelling characters, and an unexpected twist. Target length: 500-800 words.",
            &["Story", "Creative", "Claude"],
            "Creative",
            PromptKind::Text,
            false,
        ),
        prompt(
            "5",
            "Debug Assistant",
            "I'm getting this error: [error message]\n\nIn this code: [code]\n\nExplain what's causing it and provide a fix with step-by-step reasoning.",
            &["Debug", "Code", "Copilot"],
            "Coding",
            PromptKind::Text,
            false,
        ),
        prompt(
            "6",
            "Text Summarizer",
            "Summarize the following text in [number] bullet points, capturing the key insights and actionable takeaways:\n\n[paste text]",
            &["Summary", "Analysis", "GPT"],
            "Learning",
            PromptKind::Text,
            false,
        ),
        prompt(
            "7",
            "Brainstorm Ideas",
            "Generate 10 creative ideas for [topic/problem]. For each idea, provide a brief description and potential benefits. Think outside the box!",
            &["Brainstorm", "Creative", "Claude"],
            "Creative",
            PromptKind::Text,
            true,
        ),
        prompt(
            "8",
            "Marketing Copy",
            "Write compelling marketing copy for [product/service]. Include a catchy headline, 3 key benefits, social proof suggestions, and a strong CTA.",
            &["Marketing", "Business", "GPT"],
            "Business",
            PromptKind::Text,
            false,
        ),
        prompt(
            "9",
            "Translation Helper",
            "Translate the following text from [source language] to [target language]. Maintain the original tone and context. Explain any cultural nuances:\n\n[text]",
            &["Translation", "GPT"],
            "Writing",
            PromptKind::Text,
            false,
        ),
        prompt(
            "10",
            "Art Prompt Creator",
            "Create a detailed image generation prompt for [concept]. Include style, mood, lighting, composition, and specific visual elements. Format for [AI tool].",
            &["Art", "Creative", "Claude"],
            "Creative",
            PromptKind::Image,
            false,
        ),
    ]
}
