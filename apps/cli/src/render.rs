use console::style;
use tldw_core::{
    ContentResult, LayoutConfig, LayoutNode, PersistedState, Role, SourceKind, Tab, ViewTransform,
    bucket_transcript, format_report_readable, layout_forest, segment_text,
};

pub fn render_tab(
    state: &PersistedState,
    result: &ContentResult,
    tab: Tab,
    layout: &LayoutConfig,
) -> String {
    match tab {
        Tab::Overview => format_report_readable(result),
        Tab::Chapters => render_chapters(result),
        Tab::Terms => render_terms(result),
        Tab::Flashcards => render_flashcards(result),
        Tab::Quiz => render_quiz(result),
        Tab::Transcript => render_transcript(result),
        Tab::Mindmap => render_mindmap(
            &layout_forest(&result.mindmap, layout),
            &ViewTransform::default(),
        ),
        Tab::Chat => render_chat(state),
    }
}

fn placeholder(text: &str) -> String {
    format!("{}\n", style(text).dim())
}

fn render_chapters(result: &ContentResult) -> String {
    let points = if result.chapters.is_empty() {
        &result.major_points
    } else {
        &result.chapters
    };
    if points.is_empty() {
        return placeholder("No chapters available.");
    }

    let mut output = String::new();
    for point in points {
        let stamp = point
            .timestamp
            .as_ref()
            .map(|t| t.display())
            .unwrap_or_default();
        output.push_str(&format!(
            "{:>8}  {}\n",
            style(stamp).cyan(),
            style(&point.title).bold()
        ));
        if !point.summary.is_empty() {
            output.push_str(&format!("          {}\n", point.summary));
        }
    }
    output
}

fn render_terms(result: &ContentResult) -> String {
    if result.terminologies.is_empty() {
        return placeholder("No key terms available.");
    }
    result
        .terminologies
        .iter()
        .map(|term| {
            if term.term.is_empty() {
                format!("• {}\n", term.definition)
            } else {
                format!("• {}: {}\n", style(&term.term).bold(), term.definition)
            }
        })
        .collect()
}

fn render_flashcards(result: &ContentResult) -> String {
    if result.flashcards.is_empty() {
        return placeholder("No flashcards available.");
    }
    result
        .flashcards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            format!(
                "{}. {}\n   {}\n",
                i + 1,
                style(&card.question).bold(),
                style(&card.answer).green()
            )
        })
        .collect()
}

fn render_quiz(result: &ContentResult) -> String {
    if result.quiz.is_empty() {
        return placeholder("No quiz available.");
    }

    let mut output = String::new();
    for (i, item) in result.quiz.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, style(&item.question).bold()));
        for (letter, choice) in ('a'..='z').zip(&item.choices) {
            let line = format!("   {}) {}", letter, choice);
            if *choice == item.answer {
                output.push_str(&format!("{}\n", style(line).green()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
    }
    output
}

fn render_transcript(result: &ContentResult) -> String {
    if !result.transcript.is_empty() {
        let mut output = String::new();
        for bucket in bucket_transcript(&result.transcript, result.duration_seconds()) {
            output.push_str(&format!("{}\n", style(bucket.label()).cyan().bold()));
            for item in &bucket.items {
                output.push_str(&format!(
                    "  {} {}\n",
                    style(format!("[{}]", item.formatted_timestamp)).dim(),
                    item.text
                ));
            }
        }
        return output;
    }

    let raw = match &result.origin {
        Some(origin) if origin.kind == SourceKind::Text => origin.input.as_str(),
        _ => return placeholder("No transcript available."),
    };

    let segments = segment_text(raw);
    if segments.segments.is_empty() && segments.preamble.is_none() {
        return placeholder("No transcript available.");
    }

    let mut output = String::new();
    if let Some(preamble) = &segments.preamble {
        output.push_str(&format!("{}\n\n", preamble));
    }
    for segment in &segments.segments {
        output.push_str(&format!("{}\n", style(&segment.label).cyan().bold()));
        output.push_str(&format!("  {}\n", segment.text));
    }
    output
}

pub fn render_mindmap(nodes: &[LayoutNode], view: &ViewTransform) -> String {
    if nodes.is_empty() {
        return placeholder("No mind map generated.");
    }

    let mut output = String::new();
    output.push_str(&format!("{}\n", style(view.to_svg()).dim()));
    for node in nodes {
        let (sx, sy) = view.apply(node.x, node.y);
        output.push_str(&format!(
            "{}{} {}\n",
            "  ".repeat(node.depth),
            node.title,
            style(format!("({:.0}, {:.0})", sx, sy)).dim()
        ));
    }
    output
}

fn render_chat(state: &PersistedState) -> String {
    if state.chat_history.is_empty() {
        return placeholder("No questions asked yet.");
    }
    state
        .chat_history
        .iter()
        .map(|message| match message.role {
            Role::User => format!("{} {}\n", style("you:").cyan().bold(), message.content),
            Role::Assistant => format!("{} {}\n", style("tldw:").green().bold(), message.content),
        })
        .collect()
}
